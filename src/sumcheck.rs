// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the Spartan2 project.
// See the LICENSE file in the project root for full license information.
// Source repository: https://github.com/Microsoft/Spartan2

//! This module implements the sum-check protocol, generic over the summed polynomial.
use crate::{
  errors::GkrError,
  polys::{multilinear::MultilinearPolynomial, univariate::UniPoly},
  traits::{Engine, transcript::TranscriptEngineTrait},
};
use ff::{Field, PrimeField};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Transcript label of a round polynomial.
pub(crate) const ROUND_POLY_LABEL: &[u8] = b"p";
/// Transcript label of a round challenge.
pub(crate) const CHALLENGE_LABEL: &[u8] = b"c";

/// A polynomial summed over the hypercube, one variable bound per round.
pub trait SumcheckInstance<F: Field> {
  /// Number of variables, hence rounds.
  fn num_rounds(&self) -> usize;

  /// Maximum degree of any variable.
  fn degree(&self) -> usize;

  /// Evaluations of the current round polynomial at `0, 1, ..., degree`.
  fn round_evals(&self) -> Vec<F>;

  /// Binds the current variable to `r`.
  fn bind(&mut self, r: &F);
}

/// A sum-check proof: one univariate polynomial per round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct SumcheckProof<E: Engine> {
  pub(crate) polys: Vec<UniPoly<E::Scalar>>,
}

impl<E: Engine> SumcheckProof<E> {
  /// Returns the round polynomials.
  pub fn round_polys(&self) -> &[UniPoly<E::Scalar>] {
    &self.polys
  }

  /// Proves that `instance` sums to `claim`. Returns the proof, the challenges and the final claim.
  pub fn prove<S: SumcheckInstance<E::Scalar>>(
    claim: &E::Scalar,
    instance: &mut S,
    transcript: &mut E::TE,
  ) -> Result<(Self, Vec<E::Scalar>, E::Scalar), GkrError> {
    let num_rounds = instance.num_rounds();
    let mut polys = Vec::with_capacity(num_rounds);
    let mut r = Vec::with_capacity(num_rounds);
    let mut claim_per_round = *claim;

    for _ in 0..num_rounds {
      let evals = instance.round_evals();
      let poly = UniPoly::from_evals(&evals)?;

      transcript.absorb(ROUND_POLY_LABEL, &poly);
      let r_i = transcript.squeeze(CHALLENGE_LABEL)?;

      claim_per_round = poly.evaluate(&r_i);
      instance.bind(&r_i);
      polys.push(poly);
      r.push(r_i);
    }

    Ok((SumcheckProof { polys }, r, claim_per_round))
  }

  /// Verifies the proof against `claim`. The caller must check the returned final claim
  /// against the summed polynomial at the returned point.
  ///
  /// `layer` only tags the error.
  pub fn verify(
    &self,
    claim: E::Scalar,
    num_rounds: usize,
    degree: usize,
    layer: usize,
    transcript: &mut E::TE,
  ) -> Result<(E::Scalar, Vec<E::Scalar>), GkrError> {
    if self.polys.len() != num_rounds {
      return Err(GkrError::MalformedProof {
        reason: format!(
          "expected {num_rounds} sum-check rounds, got {}",
          self.polys.len()
        ),
      });
    }

    let mut e = claim;
    let mut r = Vec::with_capacity(num_rounds);
    for (round, poly) in self.polys.iter().enumerate() {
      if poly.coeffs.len() != degree + 1 {
        return Err(GkrError::MalformedProof {
          reason: format!(
            "round {round} polynomial has {} coefficients, expected {}",
            poly.coeffs.len(),
            degree + 1
          ),
        });
      }

      if poly.eval_at_zero() + poly.eval_at_one() != e {
        return Err(GkrError::SumcheckConsistencyFailure { layer, round });
      }

      transcript.absorb(ROUND_POLY_LABEL, poly);
      let r_i = transcript.squeeze(CHALLENGE_LABEL)?;

      e = poly.evaluate(&r_i);
      r.push(r_i);
    }

    Ok((e, r))
  }
}

/// `Σ_x Π_j P_j(x)` for multilinear `P_j`, each bound variable 0 first.
pub struct ProductInstance<F: PrimeField> {
  polys: Vec<MultilinearPolynomial<F>>,
}

impl<F: PrimeField> ProductInstance<F> {
  /// Creates the instance; all factors must have the same number of variables.
  pub fn new(polys: Vec<MultilinearPolynomial<F>>) -> Result<Self, GkrError> {
    let num_vars = polys.first().map(|p| p.get_num_vars()).ok_or_else(|| {
      GkrError::InvalidInputLength {
        reason: "product instance needs at least one factor".to_string(),
      }
    })?;
    if polys.iter().any(|p| p.get_num_vars() != num_vars) {
      return Err(GkrError::InvalidInputLength {
        reason: "product factors differ in number of variables".to_string(),
      });
    }
    Ok(Self { polys })
  }

  /// The sum over the hypercube.
  pub fn claim(&self) -> F {
    (0..self.polys[0].len())
      .into_par_iter()
      .map(|i| self.polys.iter().map(|p| p[i]).product::<F>())
      .sum()
  }

  /// The product of the factors' final values, once every variable is bound.
  pub fn final_value(&self) -> F {
    self.polys.iter().map(|p| p[0]).product()
  }
}

impl<F: PrimeField> SumcheckInstance<F> for ProductInstance<F> {
  fn num_rounds(&self) -> usize {
    self.polys[0].get_num_vars()
  }

  fn degree(&self) -> usize {
    self.polys.len()
  }

  fn round_evals(&self) -> Vec<F> {
    let degree = self.degree();
    let half = self.polys[0].len() / 2;
    (0..half)
      .into_par_iter()
      .map(|j| {
        (0..=degree)
          .map(|k| {
            let x = F::from(k as u64);
            self
              .polys
              .iter()
              .map(|p| p[2 * j] + x * (p[2 * j + 1] - p[2 * j]))
              .product::<F>()
          })
          .collect::<Vec<F>>()
      })
      .reduce(
        || vec![F::ZERO; degree + 1],
        |a, b| a.iter().zip(b.iter()).map(|(x, y)| *x + y).collect(),
      )
  }

  fn bind(&mut self, r: &F) {
    self.polys.par_iter_mut().for_each(|p| p.bind(r));
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::provider::{Bn254Engine, PallasEngine, VestaEngine};
  use rand::{SeedableRng, rngs::StdRng};

  fn random_instance<E: Engine>(
    num_vars: usize,
    factors: usize,
    seed: u64,
  ) -> ProductInstance<E::Scalar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let polys = (0..factors)
      .map(|_| {
        MultilinearPolynomial::new(
          (0..1 << num_vars)
            .map(|_| E::Scalar::random(&mut rng))
            .collect(),
        )
      })
      .collect();
    ProductInstance::new(polys).unwrap()
  }

  fn test_sumcheck_round_trip_with<E: Engine>() {
    for (num_vars, factors) in [(1, 1), (3, 2), (4, 3)] {
      let mut instance = random_instance::<E>(num_vars, factors, 42);
      let claim = instance.claim();

      let mut pt = E::TE::new(b"sumcheck");
      let (proof, r_p, final_p) = SumcheckProof::<E>::prove(&claim, &mut instance, &mut pt).unwrap();
      assert_eq!(final_p, instance.final_value());

      // round-sum invariant on the honest proof
      let mut e = claim;
      for (poly, r) in proof.round_polys().iter().zip(r_p.iter()) {
        assert_eq!(poly.eval_at_zero() + poly.eval_at_one(), e);
        e = poly.evaluate(r);
      }

      let mut vt = E::TE::new(b"sumcheck");
      let (final_v, r_v) = proof.verify(claim, num_vars, factors, 0, &mut vt).unwrap();
      assert_eq!(final_v, final_p);
      assert_eq!(r_v, r_p);
    }
  }

  #[test]
  fn test_sumcheck_round_trip() {
    test_sumcheck_round_trip_with::<Bn254Engine>();
    test_sumcheck_round_trip_with::<PallasEngine>();
    test_sumcheck_round_trip_with::<VestaEngine>();
  }

  #[test]
  fn test_sumcheck_rejects_wrong_claim() {
    type E = PallasEngine;
    let mut instance = random_instance::<E>(3, 2, 7);
    let claim = instance.claim();
    let mut pt = <E as Engine>::TE::new(b"sumcheck");
    let (proof, _, _) = SumcheckProof::<E>::prove(&claim, &mut instance, &mut pt).unwrap();

    let mut vt = <E as Engine>::TE::new(b"sumcheck");
    let res = proof.verify(claim + <E as Engine>::Scalar::ONE, 3, 2, 5, &mut vt);
    assert_eq!(
      res,
      Err(GkrError::SumcheckConsistencyFailure { layer: 5, round: 0 })
    );
  }

  #[test]
  fn test_sumcheck_rejects_tampered_round() {
    type E = Bn254Engine;
    let mut instance = random_instance::<E>(3, 2, 9);
    let claim = instance.claim();
    let mut pt = <E as Engine>::TE::new(b"sumcheck");
    let (mut proof, _, _) = SumcheckProof::<E>::prove(&claim, &mut instance, &mut pt).unwrap();
    proof.polys[1].coeffs[2] += <E as Engine>::Scalar::ONE;

    let mut vt = <E as Engine>::TE::new(b"sumcheck");
    let res = proof.verify(claim, 3, 2, 0, &mut vt);
    assert_eq!(
      res,
      Err(GkrError::SumcheckConsistencyFailure { layer: 0, round: 1 })
    );
  }

  #[test]
  fn test_sumcheck_rejects_malformed_shape() {
    type E = Bn254Engine;
    let mut instance = random_instance::<E>(2, 2, 1);
    let claim = instance.claim();
    let mut pt = <E as Engine>::TE::new(b"sumcheck");
    let (proof, _, _) = SumcheckProof::<E>::prove(&claim, &mut instance, &mut pt).unwrap();

    let mut vt = <E as Engine>::TE::new(b"sumcheck");
    assert!(matches!(
      proof.verify(claim, 3, 2, 0, &mut vt),
      Err(GkrError::MalformedProof { .. })
    ));
    let mut vt = <E as Engine>::TE::new(b"sumcheck");
    assert!(matches!(
      proof.verify(claim, 2, 3, 0, &mut vt),
      Err(GkrError::MalformedProof { .. })
    ));
  }
}
