//! The sum-check verifier over allocated round polynomials.
use crate::{
  gadgets::{num::horner, transcript::AllocatedTranscript},
  sumcheck::{CHALLENGE_LABEL, ROUND_POLY_LABEL, SumcheckProof},
  traits::Engine,
};
use bellpepper_core::{ConstraintSystem, LinearCombination, SynthesisError, num::AllocatedNum};
use ff::Field;

/// Round polynomials in coefficient form, lowest degree first.
pub type AllocatedRoundPolys<F> = Vec<Vec<AllocatedNum<F>>>;

/// Allocates the coefficients of `proof` as witness, shaped `num_rounds × (degree + 1)`.
///
/// Without a proof the values are left unassigned. A proof of any other shape cannot be
/// assigned.
pub fn alloc_sumcheck_proof<E: Engine, CS: ConstraintSystem<E::Scalar>>(
  mut cs: CS,
  proof: Option<&SumcheckProof<E>>,
  num_rounds: usize,
  degree: usize,
) -> Result<AllocatedRoundPolys<E::Scalar>, SynthesisError> {
  if let Some(proof) = proof {
    let polys = proof.round_polys();
    if polys.len() != num_rounds || polys.iter().any(|p| p.coeffs().len() != degree + 1) {
      return Err(SynthesisError::Unsatisfiable);
    }
  }

  (0..num_rounds)
    .map(|i| {
      (0..=degree)
        .map(|j| {
          AllocatedNum::alloc(cs.namespace(|| format!("round_{i}_coeff_{j}")), || {
            proof
              .map(|p| p.round_polys()[i].coeffs()[j])
              .ok_or(SynthesisError::AssignmentMissing)
          })
        })
        .collect::<Result<Vec<_>, _>>()
    })
    .collect()
}

/// Enforces the round-sum checks and returns the final claim and the challenges.
pub fn verify_sumcheck<E: Engine, CS: ConstraintSystem<E::Scalar>>(
  mut cs: CS,
  transcript: &mut AllocatedTranscript<E>,
  claim: &AllocatedNum<E::Scalar>,
  polys: &[Vec<AllocatedNum<E::Scalar>>],
) -> Result<(AllocatedNum<E::Scalar>, Vec<AllocatedNum<E::Scalar>>), SynthesisError> {
  let mut e = claim.clone();
  let mut r = Vec::with_capacity(polys.len());
  for (i, coeffs) in polys.iter().enumerate() {
    // g(0) + g(1) = 2·c_0 + c_1 + ... + c_d
    let round_sum = coeffs
      .iter()
      .enumerate()
      .fold(LinearCombination::zero(), |lc, (j, c)| {
        let coeff = if j == 0 {
          E::Scalar::ONE.double()
        } else {
          E::Scalar::ONE
        };
        lc + (coeff, c.get_variable())
      });
    cs.enforce(
      || format!("round {i} sum"),
      |_| round_sum,
      |lc| lc + CS::one(),
      |lc| lc + e.get_variable(),
    );

    transcript.absorb(&mut cs, ROUND_POLY_LABEL, coeffs)?;
    let r_i = transcript.squeeze(&mut cs, CHALLENGE_LABEL)?;
    e = horner(cs.namespace(|| format!("round_{i}_eval")), coeffs, &r_i)?;
    r.push(r_i);
  }
  Ok((e, r))
}
