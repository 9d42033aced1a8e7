//! This module provides the trait definitions for transcript functionality.
//! Transcripts are used for Fiat-Shamir transformations to make interactive proof systems non-interactive.
use crate::{errors::GkrError, traits::Engine};
use ff::PrimeField;

/// This trait allows types to implement how they want to be added to `TranscriptEngine`.
///
/// Values are absorbed as field elements so that an arithmetic hash can consume them
/// both natively and inside a constraint system.
pub trait TranscriptReprTrait<F: PrimeField>: Send + Sync {
  /// returns the field elements representing self in the transcript
  fn to_transcript_scalars(&self) -> Vec<F>;
}

/// This trait defines the behavior of a transcript engine
pub trait TranscriptEngineTrait<E: Engine>: Send + Sync {
  /// initializes the transcript
  fn new(label: &'static [u8]) -> Self;

  /// returns a scalar element of the group as a challenge
  fn squeeze(&mut self, label: &'static [u8]) -> Result<E::Scalar, GkrError>;

  /// returns `len` challenges squeezed one after the other under the same label
  fn squeeze_vec(&mut self, len: usize, label: &'static [u8]) -> Result<Vec<E::Scalar>, GkrError> {
    (0..len).map(|_| self.squeeze(label)).collect()
  }

  /// absorbs any type that implements `TranscriptReprTrait` under a label
  fn absorb<T: TranscriptReprTrait<E::Scalar>>(&mut self, label: &'static [u8], o: &T);

  /// adds a domain separator
  fn dom_sep(&mut self, bytes: &'static [u8]);
}

impl<F: PrimeField, T: TranscriptReprTrait<F>> TranscriptReprTrait<F> for &[T] {
  fn to_transcript_scalars(&self) -> Vec<F> {
    self
      .iter()
      .flat_map(|t| t.to_transcript_scalars())
      .collect::<Vec<F>>()
  }
}

/// 32-byte digests enter the transcript as two 128-bit limbs, which fit any supported field.
impl<F: PrimeField> TranscriptReprTrait<F> for [u8; 32] {
  fn to_transcript_scalars(&self) -> Vec<F> {
    self
      .chunks_exact(16)
      .map(|chunk| {
        let mut limb = [0u8; 16];
        limb.copy_from_slice(chunk);
        F::from_u128(u128::from_le_bytes(limb))
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::TranscriptReprTrait;
  use crate::provider::bn254::bn254::Scalar;
  use ff::Field;

  #[test]
  fn test_digest_limbs_are_injective_on_halves() {
    let mut a = [0u8; 32];
    let mut b = [0u8; 32];
    a[0] = 1;
    b[16] = 1;
    let sa: Vec<Scalar> = a.to_transcript_scalars();
    let sb: Vec<Scalar> = b.to_transcript_scalars();
    assert_eq!(sa, vec![Scalar::ONE, Scalar::ZERO]);
    assert_eq!(sb, vec![Scalar::ZERO, Scalar::ONE]);
  }
}
