//! `AllocatedTranscript`: the in-circuit twin of [`MimcTranscript`].
//!
//! Every label and element advances the allocated chaining value by one compression, in the
//! order the native transcript applies them, so both derive the same challenges.
use crate::{
  gadgets::{mimc::compress, num::alloc_constant},
  provider::mimc::{Mimc, label_to_scalar},
  traits::Engine,
};
use bellpepper_core::{ConstraintSystem, SynthesisError, num::AllocatedNum};
use ff::Field;

#[cfg(doc)]
use crate::provider::mimc::MimcTranscript;

/// A Fiat-Shamir transcript over allocated field elements.
pub struct AllocatedTranscript<E: Engine> {
  hasher: Mimc<E::Scalar>,
  state: AllocatedNum<E::Scalar>,
  steps: usize,
}

impl<E: Engine> AllocatedTranscript<E> {
  /// Initializes the transcript, matching `MimcTranscript::new(label)`.
  pub fn new<CS: ConstraintSystem<E::Scalar>>(
    cs: &mut CS,
    label: &'static [u8],
  ) -> Result<Self, SynthesisError> {
    let zero = alloc_constant(cs.namespace(|| "transcript_init"), E::Scalar::ZERO)?;
    let mut transcript = Self {
      hasher: Mimc::new(E::HASH_STRATEGY),
      state: zero,
      steps: 0,
    };
    transcript.absorb_label(cs, label)?;
    Ok(transcript)
  }

  fn absorb_num<CS: ConstraintSystem<E::Scalar>>(
    &mut self,
    cs: &mut CS,
    x: &AllocatedNum<E::Scalar>,
  ) -> Result<(), SynthesisError> {
    let step = self.steps;
    self.state = compress(
      cs.namespace(|| format!("transcript_step_{step}")),
      &self.hasher,
      &self.state,
      x,
    )?;
    self.steps += 1;
    Ok(())
  }

  fn absorb_label<CS: ConstraintSystem<E::Scalar>>(
    &mut self,
    cs: &mut CS,
    label: &'static [u8],
  ) -> Result<(), SynthesisError> {
    let step = self.steps;
    let label = alloc_constant(
      cs.namespace(|| format!("transcript_label_{step}")),
      label_to_scalar::<E::Scalar>(label),
    )?;
    self.absorb_num(cs, &label)
  }

  /// Absorbs allocated elements under a label.
  pub fn absorb<CS: ConstraintSystem<E::Scalar>>(
    &mut self,
    cs: &mut CS,
    label: &'static [u8],
    elems: &[AllocatedNum<E::Scalar>],
  ) -> Result<(), SynthesisError> {
    self.absorb_label(cs, label)?;
    for x in elems {
      self.absorb_num(cs, x)?;
    }
    Ok(())
  }

  /// Absorbs values fixed at circuit-compile time under a label.
  pub fn absorb_constants<CS: ConstraintSystem<E::Scalar>>(
    &mut self,
    cs: &mut CS,
    label: &'static [u8],
    elems: &[E::Scalar],
  ) -> Result<(), SynthesisError> {
    let step = self.steps;
    let elems = elems
      .iter()
      .enumerate()
      .map(|(i, x)| alloc_constant(cs.namespace(|| format!("transcript_const_{step}_{i}")), *x))
      .collect::<Result<Vec<_>, _>>()?;
    self.absorb(cs, label, &elems)
  }

  /// Returns a challenge, matching `MimcTranscript::squeeze(label)`.
  pub fn squeeze<CS: ConstraintSystem<E::Scalar>>(
    &mut self,
    cs: &mut CS,
    label: &'static [u8],
  ) -> Result<AllocatedNum<E::Scalar>, SynthesisError> {
    self.absorb_label(cs, label)?;
    Ok(self.state.clone())
  }

  /// Adds a domain separator.
  pub fn dom_sep<CS: ConstraintSystem<E::Scalar>>(
    &mut self,
    cs: &mut CS,
    bytes: &'static [u8],
  ) -> Result<(), SynthesisError> {
    self.absorb_label(cs, bytes)
  }

  /// Returns the current chaining value.
  pub fn state(&self) -> &AllocatedNum<E::Scalar> {
    &self.state
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    provider::{Bn254Engine, PallasEngine, VestaEngine, mimc::MimcTranscript},
    traits::transcript::TranscriptEngineTrait,
  };
  use bellpepper_core::test_cs::TestConstraintSystem;
  use rand::{SeedableRng, rngs::StdRng};

  fn test_transcript_matches_native_with<E: Engine<TE = MimcTranscript<E>>>() {
    let mut rng = StdRng::seed_from_u64(23);
    let xs: Vec<E::Scalar> = (0..3).map(|_| E::Scalar::random(&mut rng)).collect();
    let consts = [E::Scalar::from(9u64), E::Scalar::from(10u64)];

    let mut native = E::TE::new(b"test");
    native.absorb(b"xs", &xs.as_slice());
    native.absorb(b"consts", &consts.as_slice());
    native.dom_sep(b"sep");
    let c1 = native.squeeze(b"c").unwrap();
    let c2 = native.squeeze(b"c").unwrap();

    let mut cs = TestConstraintSystem::<E::Scalar>::new();
    let xs_var = xs
      .iter()
      .enumerate()
      .map(|(i, x)| AllocatedNum::alloc(cs.namespace(|| format!("x_{i}")), || Ok(*x)).unwrap())
      .collect::<Vec<_>>();
    let mut transcript = AllocatedTranscript::<E>::new(&mut cs, b"test").unwrap();
    transcript.absorb(&mut cs, b"xs", &xs_var).unwrap();
    transcript.absorb_constants(&mut cs, b"consts", &consts).unwrap();
    transcript.dom_sep(&mut cs, b"sep").unwrap();
    let c1_var = transcript.squeeze(&mut cs, b"c").unwrap();
    let c2_var = transcript.squeeze(&mut cs, b"c").unwrap();

    assert_eq!(c1_var.get_value(), Some(c1));
    assert_eq!(c2_var.get_value(), Some(c2));
    assert_eq!(transcript.state().get_value(), Some(native.state()));
    assert!(cs.is_satisfied());
  }

  #[test]
  fn test_transcript_matches_native() {
    test_transcript_matches_native_with::<Bn254Engine>();
    test_transcript_matches_native_with::<PallasEngine>();
    test_transcript_matches_native_with::<VestaEngine>();
  }
}
