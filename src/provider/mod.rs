//! This module implements the library's traits using the following several different combinations

// public modules to be used as an evaluation engine with the GKR prover
pub mod bn254;
pub mod mimc;
pub mod pasta;
pub mod pcs;

use crate::{
  provider::{
    bn254::bn254 as bn256,
    mimc::{HashStrategy, MimcTranscript},
    pasta::{pallas, vesta},
    pcs::{merkle_mle_pc::HashMlePCS, mock_pc::MockPCS},
  },
  traits::Engine,
};
use serde::{Deserialize, Serialize};

/// Implements `PrimeFieldExt` and `TranscriptReprTrait` for the scalar field of a curve module
#[macro_export]
macro_rules! impl_traits {
  ($name:ident) => {
    impl $crate::traits::PrimeFieldExt for $name::Scalar {
      fn from_uniform(bytes: &[u8]) -> Self {
        let mut uniform_bytes = [0u8; 64];
        let len = bytes.len().min(64);
        uniform_bytes[..len].copy_from_slice(&bytes[..len]);
        <$name::Scalar as ::ff::FromUniformBytes<64>>::from_uniform_bytes(&uniform_bytes)
      }
    }

    impl $crate::traits::transcript::TranscriptReprTrait<$name::Scalar> for $name::Scalar {
      fn to_transcript_scalars(&self) -> Vec<$name::Scalar> {
        vec![*self]
      }
    }
  };
}

/// An implementation of the `Engine` trait with BN254 scalars, a x^5 MiMC transcript and the mock commitment
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bn254Engine;

/// An implementation of the `Engine` trait with BN254 scalars and the hash-based multilinear commitment
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bn254HashMleEngine;

/// An implementation of the `Engine` trait with Pallas scalars and the mock commitment
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PallasEngine;

/// An implementation of the `Engine` trait with Vesta scalars, an inverse MiMC transcript and the mock commitment
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct VestaEngine;

impl Engine for Bn254Engine {
  type Scalar = bn256::Scalar;
  type TE = MimcTranscript<Self>;
  type PCS = MockPCS<Self>;
  const HASH_STRATEGY: HashStrategy = HashStrategy::Pow5;
}

impl Engine for Bn254HashMleEngine {
  type Scalar = bn256::Scalar;
  type TE = MimcTranscript<Self>;
  type PCS = HashMlePCS<Self>;
  const HASH_STRATEGY: HashStrategy = HashStrategy::Pow5;
}

impl Engine for PallasEngine {
  type Scalar = pallas::Scalar;
  type TE = MimcTranscript<Self>;
  type PCS = MockPCS<Self>;
  const HASH_STRATEGY: HashStrategy = HashStrategy::Pow5;
}

impl Engine for VestaEngine {
  type Scalar = vesta::Scalar;
  type TE = MimcTranscript<Self>;
  type PCS = MockPCS<Self>;
  const HASH_STRATEGY: HashStrategy = HashStrategy::Inverse;
}

#[cfg(test)]
mod tests {
  use crate::{
    provider::{bn254::bn254, pasta::pallas},
    traits::{PrimeFieldExt, transcript::TranscriptReprTrait},
  };
  use digest::{ExtendableOutput, Update, XofReader};
  use sha3::Shake256;

  macro_rules! impl_from_uniform_test {
    ($name:ident) => {
      let mut shake = Shake256::default();
      shake.update(b"test_from_uniform");
      let mut reader = shake.finalize_xof();
      let mut uniform_bytes = [0u8; 64];
      reader.read(&mut uniform_bytes);

      let a = $name::Scalar::from_uniform(&uniform_bytes);
      let b = $name::Scalar::from_uniform(&uniform_bytes);
      assert_eq!(a, b);

      // short inputs are zero-padded
      let short = $name::Scalar::from_uniform(&uniform_bytes[..16]);
      let mut padded = [0u8; 64];
      padded[..16].copy_from_slice(&uniform_bytes[..16]);
      assert_eq!(short, $name::Scalar::from_uniform(&padded));
      assert_eq!(a.to_transcript_scalars(), vec![a]);
    };
  }

  #[test]
  fn test_bn254_from_uniform() {
    impl_from_uniform_test!(bn254);
  }

  #[test]
  fn test_pallas_from_uniform() {
    impl_from_uniform_test!(pallas);
  }
}
