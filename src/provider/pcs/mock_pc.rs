//! A mock polynomial commitment whose commitment is the evaluation table itself.
//!
//! The commitment is NOT binding and hides nothing. It exists so the GKR layers, and the
//! in-circuit verifier, can be exercised without a real scheme underneath.
use crate::{
  errors::GkrError,
  gadgets::{
    num::{enforce_equal, mle_evaluate},
    transcript::AllocatedTranscript,
  },
  polys::multilinear::MultilinearPolynomial,
  traits::{
    Engine,
    pcs::{CommitmentTrait, PCSCircuitTrait, PCSEngineTrait},
    transcript::TranscriptReprTrait,
  },
};
use bellpepper_core::{ConstraintSystem, SynthesisError, num::AllocatedNum};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Commitment key for the mock PCS: the largest table it accepts.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MockCommitmentKey {
  max_len: usize,
}

/// Verifier key for the mock PCS
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MockVerifierKey {
  max_len: usize,
}

/// The committed evaluations, in the clear
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct MockCommitment<E: Engine> {
  evals: Vec<E::Scalar>,
}

impl<E: Engine> MockCommitment<E> {
  /// Returns the committed evaluations.
  pub fn evals(&self) -> &[E::Scalar] {
    &self.evals
  }
}

impl<E: Engine> TranscriptReprTrait<E::Scalar> for MockCommitment<E> {
  fn to_transcript_scalars(&self) -> Vec<E::Scalar> {
    self.evals.clone()
  }
}

impl<E: Engine> CommitmentTrait<E> for MockCommitment<E> {}

/// Empty evaluation argument
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockEvaluationArgument;

/// Non-binding PCS for tests and recursion experiments
#[derive(Clone, Debug)]
pub struct MockPCS<E: Engine> {
  _p: PhantomData<E>,
}

fn check_opening_shape<E: Engine>(
  comm: &MockCommitment<E>,
  point: &[E::Scalar],
) -> Result<(), GkrError> {
  if comm.evals.len() != 1 << point.len() {
    return Err(GkrError::InvalidInputLength {
      reason: format!(
        "MockPCS: commitment has {} evaluations, point has {} coordinates",
        comm.evals.len(),
        point.len()
      ),
    });
  }
  Ok(())
}

impl<E: Engine> PCSEngineTrait<E> for MockPCS<E> {
  type CommitmentKey = MockCommitmentKey;
  type VerifierKey = MockVerifierKey;
  type Commitment = MockCommitment<E>;
  type EvaluationArgument = MockEvaluationArgument;
  type BatchEvaluationArgument = MockEvaluationArgument;

  fn setup(_label: &'static [u8], n: usize) -> (Self::CommitmentKey, Self::VerifierKey) {
    (
      MockCommitmentKey { max_len: n },
      MockVerifierKey { max_len: n },
    )
  }

  fn commit(ck: &Self::CommitmentKey, poly: &[E::Scalar]) -> Result<Self::Commitment, GkrError> {
    if !poly.len().is_power_of_two() || poly.len() > ck.max_len.max(1) {
      return Err(GkrError::InvalidInputLength {
        reason: format!(
          "MockPCS: cannot commit to {} evaluations with a key for {}",
          poly.len(),
          ck.max_len
        ),
      });
    }
    Ok(MockCommitment {
      evals: poly.to_vec(),
    })
  }

  fn prove(
    _ck: &Self::CommitmentKey,
    _transcript: &mut E::TE,
    comm: &Self::Commitment,
    poly: &[E::Scalar],
    point: &[E::Scalar],
  ) -> Result<(E::Scalar, Self::EvaluationArgument), GkrError> {
    check_opening_shape(comm, point)?;
    let eval = MultilinearPolynomial::evaluate_with(poly, point);
    Ok((eval, MockEvaluationArgument))
  }

  fn verify(
    vk: &Self::VerifierKey,
    _transcript: &mut E::TE,
    comm: &Self::Commitment,
    point: &[E::Scalar],
    eval: &E::Scalar,
    _arg: &Self::EvaluationArgument,
  ) -> Result<(), GkrError> {
    check_opening_shape(comm, point)?;
    if comm.evals.len() > vk.max_len.max(1) {
      return Err(GkrError::CommitmentVerificationFailure {
        reason: "MockPCS: commitment exceeds the verifier key".to_string(),
      });
    }
    if MultilinearPolynomial::evaluate_with(&comm.evals, point) != *eval {
      return Err(GkrError::CommitmentVerificationFailure {
        reason: "MockPCS: claimed evaluation does not match".to_string(),
      });
    }
    Ok(())
  }

  fn batch_prove(
    ck: &Self::CommitmentKey,
    transcript: &mut E::TE,
    comms: &[Self::Commitment],
    polys: &[Vec<E::Scalar>],
    point: &[E::Scalar],
  ) -> Result<(Vec<E::Scalar>, Self::BatchEvaluationArgument), GkrError> {
    if comms.len() != polys.len() {
      return Err(GkrError::InvalidInputLength {
        reason: "MockPCS: number of commitments and polynomials differ".to_string(),
      });
    }
    let evals = comms
      .iter()
      .zip(polys.iter())
      .map(|(comm, poly)| Self::prove(ck, transcript, comm, poly, point).map(|(eval, _)| eval))
      .collect::<Result<Vec<_>, _>>()?;
    Ok((evals, MockEvaluationArgument))
  }

  fn batch_verify(
    vk: &Self::VerifierKey,
    transcript: &mut E::TE,
    comms: &[Self::Commitment],
    point: &[E::Scalar],
    evals: &[E::Scalar],
    arg: &Self::BatchEvaluationArgument,
  ) -> Result<(), GkrError> {
    if comms.len() != evals.len() {
      return Err(GkrError::InvalidInputLength {
        reason: "MockPCS: number of commitments and evaluations differ".to_string(),
      });
    }
    for (comm, eval) in comms.iter().zip(evals.iter()) {
      Self::verify(vk, transcript, comm, point, eval, arg)?;
    }
    Ok(())
  }
}

impl<E: Engine> PCSCircuitTrait<E> for MockPCS<E> {
  type AllocatedCommitment = Vec<AllocatedNum<E::Scalar>>;

  fn alloc_commitment<CS: ConstraintSystem<E::Scalar>>(
    cs: &mut CS,
    comm: Option<&Self::Commitment>,
    num_vars: usize,
  ) -> Result<Self::AllocatedCommitment, SynthesisError> {
    let n = 1usize << num_vars;
    if comm.is_some_and(|c| c.evals.len() != n) {
      return Err(SynthesisError::Unsatisfiable);
    }
    (0..n)
      .map(|i| {
        AllocatedNum::alloc_input(cs.namespace(|| format!("mock_comm_{i}")), || {
          comm
            .map(|c| c.evals[i])
            .ok_or(SynthesisError::AssignmentMissing)
        })
      })
      .collect()
  }

  fn commitment_scalars(comm: &Self::AllocatedCommitment) -> Vec<AllocatedNum<E::Scalar>> {
    comm.clone()
  }

  fn verify_circuit<CS: ConstraintSystem<E::Scalar>>(
    cs: &mut CS,
    _transcript: &mut AllocatedTranscript<E>,
    comm: &Self::AllocatedCommitment,
    point: &[AllocatedNum<E::Scalar>],
    eval: &AllocatedNum<E::Scalar>,
    _arg: Option<&Self::EvaluationArgument>,
  ) -> Result<(), SynthesisError> {
    let expected = mle_evaluate(cs.namespace(|| "mock_opening"), comm, point)?;
    enforce_equal(cs.namespace(|| "mock_opening_matches"), &expected, eval);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    provider::{Bn254Engine, PallasEngine},
    traits::transcript::TranscriptEngineTrait,
  };
  use bellpepper_core::test_cs::TestConstraintSystem;
  use ff::Field;
  use rand::{SeedableRng, rngs::StdRng};

  type E = PallasEngine;
  type F = <E as Engine>::Scalar;

  #[test]
  fn test_mock_round_trip() {
    let mut rng = StdRng::seed_from_u64(1);
    let poly: Vec<F> = (0..8).map(|_| F::random(&mut rng)).collect();
    let point: Vec<F> = (0..3).map(|_| F::random(&mut rng)).collect();

    let (ck, vk) = MockPCS::<E>::setup(b"test", poly.len());
    let comm = MockPCS::<E>::commit(&ck, &poly).unwrap();
    let mut tr = <E as Engine>::TE::new(b"test");
    let (eval, arg) = MockPCS::<E>::prove(&ck, &mut tr, &comm, &poly, &point).unwrap();
    assert_eq!(eval, MultilinearPolynomial::new(poly).evaluate(&point));

    let mut tr = <E as Engine>::TE::new(b"test");
    assert!(MockPCS::<E>::verify(&vk, &mut tr, &comm, &point, &eval, &arg).is_ok());
    assert!(matches!(
      MockPCS::<E>::verify(&vk, &mut tr, &comm, &point, &(eval + F::ONE), &arg),
      Err(GkrError::CommitmentVerificationFailure { .. })
    ));
  }

  #[test]
  fn test_mock_batch() {
    type E = Bn254Engine;
    type F = <E as Engine>::Scalar;
    let mut rng = StdRng::seed_from_u64(2);
    let polys: Vec<Vec<F>> = (0..3)
      .map(|_| (0..4).map(|_| F::random(&mut rng)).collect())
      .collect();
    let point: Vec<F> = (0..2).map(|_| F::random(&mut rng)).collect();

    let (ck, vk) = MockPCS::<E>::setup(b"test", 4);
    let comms = polys
      .iter()
      .map(|p| MockPCS::<E>::commit(&ck, p).unwrap())
      .collect::<Vec<_>>();
    let mut tr = <E as Engine>::TE::new(b"batch");
    let (mut evals, arg) = MockPCS::<E>::batch_prove(&ck, &mut tr, &comms, &polys, &point).unwrap();

    let mut tr = <E as Engine>::TE::new(b"batch");
    assert!(MockPCS::<E>::batch_verify(&vk, &mut tr, &comms, &point, &evals, &arg).is_ok());

    evals[1] += F::ONE;
    let mut tr = <E as Engine>::TE::new(b"batch");
    assert!(MockPCS::<E>::batch_verify(&vk, &mut tr, &comms, &point, &evals, &arg).is_err());
  }

  #[test]
  fn test_commit_rejects_oversized_table() {
    let (ck, _) = MockPCS::<E>::setup(b"test", 4);
    assert!(MockPCS::<E>::commit(&ck, &[F::ONE; 8]).is_err());
    assert!(MockPCS::<E>::commit(&ck, &[F::ONE; 3]).is_err());
  }

  #[test]
  fn test_verify_circuit() {
    let mut rng = StdRng::seed_from_u64(3);
    let poly: Vec<F> = (0..4).map(|_| F::random(&mut rng)).collect();
    let point: Vec<F> = (0..2).map(|_| F::random(&mut rng)).collect();
    let (ck, _) = MockPCS::<E>::setup(b"test", 4);
    let comm = MockPCS::<E>::commit(&ck, &poly).unwrap();
    let eval = MultilinearPolynomial::new(poly).evaluate(&point);

    for (claimed, satisfied) in [(eval, true), (eval + F::ONE, false)] {
      let mut cs = TestConstraintSystem::<F>::new();
      let comm_var = MockPCS::<E>::alloc_commitment(&mut cs, Some(&comm), 2).unwrap();
      let point_var = point
        .iter()
        .enumerate()
        .map(|(i, x)| AllocatedNum::alloc(cs.namespace(|| format!("r_{i}")), || Ok(*x)).unwrap())
        .collect::<Vec<_>>();
      let eval_var = AllocatedNum::alloc(cs.namespace(|| "eval"), || Ok(claimed)).unwrap();
      let mut transcript = AllocatedTranscript::<E>::new(&mut cs, b"test").unwrap();
      MockPCS::<E>::verify_circuit(&mut cs, &mut transcript, &comm_var, &point_var, &eval_var, None)
        .unwrap();
      assert_eq!(cs.is_satisfied(), satisfied);
    }
  }
}
