//! In-circuit MiMC compression, constraint-for-operation identical to [`Mimc`].
use crate::{
  gadgets::num::{linear_combination, mul},
  provider::mimc::{HashStrategy, Mimc},
  traits::PrimeFieldExt,
};
use bellpepper_core::{ConstraintSystem, SynthesisError, num::AllocatedNum};

/// Applies the round function selected by `strategy` to `t`.
///
/// The inverse variant maps zero to zero, as the native one does: with `z` the zero flag,
/// `t·inv = 1 - z`, `t·z = 0` and `inv·z = 0` pin `inv` to `t^{-1}` or to zero.
fn round_function<F: PrimeFieldExt, CS: ConstraintSystem<F>>(
  mut cs: CS,
  strategy: HashStrategy,
  t: &AllocatedNum<F>,
) -> Result<AllocatedNum<F>, SynthesisError> {
  match strategy {
    HashStrategy::Pow5 => {
      let t2 = mul(cs.namespace(|| "t2"), t, t)?;
      let t4 = mul(cs.namespace(|| "t4"), &t2, &t2)?;
      mul(cs.namespace(|| "t5"), &t4, t)
    }
    HashStrategy::Inverse => {
      let t_val = t.get_value();
      let inv = AllocatedNum::alloc(cs.namespace(|| "inv"), || {
        let t = t_val.ok_or(SynthesisError::AssignmentMissing)?;
        Ok(Option::<F>::from(t.invert()).unwrap_or(F::ZERO))
      })?;
      let z = AllocatedNum::alloc(cs.namespace(|| "is_zero"), || {
        let t = t_val.ok_or(SynthesisError::AssignmentMissing)?;
        Ok(if t.is_zero_vartime() { F::ONE } else { F::ZERO })
      })?;
      cs.enforce(
        || "t * inv = 1 - z",
        |lc| lc + t.get_variable(),
        |lc| lc + inv.get_variable(),
        |lc| lc + CS::one() - z.get_variable(),
      );
      cs.enforce(
        || "t * z = 0",
        |lc| lc + t.get_variable(),
        |lc| lc + z.get_variable(),
        |lc| lc,
      );
      cs.enforce(
        || "inv * z = 0",
        |lc| lc + inv.get_variable(),
        |lc| lc + z.get_variable(),
        |lc| lc,
      );
      Ok(inv)
    }
  }
}

/// Encrypts `msg` under `key`.
pub fn encrypt<F: PrimeFieldExt, CS: ConstraintSystem<F>>(
  mut cs: CS,
  hasher: &Mimc<F>,
  key: &AllocatedNum<F>,
  msg: &AllocatedNum<F>,
) -> Result<AllocatedNum<F>, SynthesisError> {
  let mut x = msg.clone();
  for (i, c) in hasher.constants().iter().enumerate() {
    let t = linear_combination(
      cs.namespace(|| format!("round_{i}_input")),
      &[(F::ONE, &x), (F::ONE, key)],
      *c,
    )?;
    x = round_function(
      cs.namespace(|| format!("round_{i}")),
      hasher.strategy(),
      &t,
    )?;
  }
  linear_combination(
    cs.namespace(|| "whiten"),
    &[(F::ONE, &x), (F::ONE, key)],
    F::ZERO,
  )
}

/// Miyaguchi-Preneel compression: `E_h(m) + h + m`.
pub fn compress<F: PrimeFieldExt, CS: ConstraintSystem<F>>(
  mut cs: CS,
  hasher: &Mimc<F>,
  h: &AllocatedNum<F>,
  m: &AllocatedNum<F>,
) -> Result<AllocatedNum<F>, SynthesisError> {
  let e = encrypt(cs.namespace(|| "encrypt"), hasher, h, m)?;
  linear_combination(
    cs.namespace(|| "feed_forward"),
    &[(F::ONE, &e), (F::ONE, h), (F::ONE, m)],
    F::ZERO,
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::provider::{
    bn254::bn254,
    mimc::MIMC_ROUNDS,
    pasta::{pallas, vesta},
  };
  use bellpepper_core::test_cs::TestConstraintSystem;
  use ff::Field;
  use rand::{SeedableRng, rngs::StdRng};

  fn test_compress_matches_native_with<F: PrimeFieldExt>(strategy: HashStrategy) {
    let hasher = Mimc::<F>::new(strategy);
    let mut rng = StdRng::seed_from_u64(17);
    for (h, m) in [
      (F::ZERO, F::ZERO),
      (F::random(&mut rng), F::random(&mut rng)),
      (F::ONE, -F::ONE),
    ] {
      let mut cs = TestConstraintSystem::<F>::new();
      let h_var = AllocatedNum::alloc(cs.namespace(|| "h"), || Ok(h)).unwrap();
      let m_var = AllocatedNum::alloc(cs.namespace(|| "m"), || Ok(m)).unwrap();
      let out = compress(cs.namespace(|| "compress"), &hasher, &h_var, &m_var).unwrap();
      assert_eq!(out.get_value(), Some(hasher.compress(&h, &m)));
      assert!(cs.is_satisfied());
    }
  }

  #[test]
  fn test_compress_matches_native() {
    test_compress_matches_native_with::<bn254::Scalar>(HashStrategy::Pow5);
    test_compress_matches_native_with::<pallas::Scalar>(HashStrategy::Pow5);
    test_compress_matches_native_with::<vesta::Scalar>(HashStrategy::Inverse);
    test_compress_matches_native_with::<bn254::Scalar>(HashStrategy::Inverse);
  }

  #[test]
  fn test_inverse_round_of_zero() {
    let mut cs = TestConstraintSystem::<vesta::Scalar>::new();
    let t = AllocatedNum::alloc(cs.namespace(|| "t"), || Ok(vesta::Scalar::ZERO)).unwrap();
    let out = round_function(cs.namespace(|| "round"), HashStrategy::Inverse, &t).unwrap();
    assert_eq!(out.get_value(), Some(vesta::Scalar::ZERO));
    assert!(cs.is_satisfied());
  }

  #[test]
  fn test_constraint_counts() {
    let pow5 = Mimc::<bn254::Scalar>::new(HashStrategy::Pow5);
    let mut cs = TestConstraintSystem::<bn254::Scalar>::new();
    let h = AllocatedNum::alloc(cs.namespace(|| "h"), || Ok(bn254::Scalar::ONE)).unwrap();
    compress(cs.namespace(|| "compress"), &pow5, &h, &h).unwrap();
    // one input combination and three multiplications per round, plus two whitening steps
    assert_eq!(cs.num_constraints(), 4 * MIMC_ROUNDS + 2);
  }
}
