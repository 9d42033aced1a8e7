//! This module defines various traits required by the users of the library to implement.
use crate::provider::mimc::HashStrategy;
use core::fmt::Debug;
use ff::PrimeField;
use serde::{Deserialize, Serialize};

pub mod pcs;
pub mod transcript;

use pcs::PCSEngineTrait;
use transcript::{TranscriptEngineTrait, TranscriptReprTrait};

/// A collection of engines that are required by the library
pub trait Engine: Clone + Copy + Debug + Send + Sync + Sized + Eq + PartialEq {
  /// A type representing an element of the field the circuits and proofs live in
  type Scalar: PrimeFieldExt
    + Send
    + Sync
    + TranscriptReprTrait<Self::Scalar>
    + Serialize
    + for<'de> Deserialize<'de>;

  /// A type that provides a generic Fiat-Shamir transcript to be used when externalizing proofs
  type TE: TranscriptEngineTrait<Self>;

  /// A type that defines a polynomial commitment scheme over scalars
  type PCS: PCSEngineTrait<Self>;

  /// The MiMC round function used by this engine's transcript, native and in-circuit
  const HASH_STRATEGY: HashStrategy;
}

/// Defines additional methods on `PrimeField` objects
pub trait PrimeFieldExt: PrimeField {
  /// Returns a scalar representing the bytes
  fn from_uniform(bytes: &[u8]) -> Self;
}
