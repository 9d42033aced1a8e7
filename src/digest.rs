//! Circuit identifiers.
//!
//! A circuit is identified by the SHA3-256 hash of its canonical bincode encoding
//! (little-endian, fixed-width integers). Cached fields must be `#[serde(skip)]` so the
//! identifier depends on the topology alone.
use crate::errors::GkrError;
use bincode::Options;
use serde::Serialize;
use sha3::{Digest, Sha3_256};

/// Types whose serde encoding is their identity.
pub trait SimpleDigestible: Serialize {}

/// Hashes a [`SimpleDigestible`] value into a 32-byte identifier.
pub struct DigestComputer<'a, T> {
  inner: &'a T,
}

impl<'a, T: SimpleDigestible> DigestComputer<'a, T> {
  /// Wraps `inner` for hashing.
  pub fn new(inner: &'a T) -> Self {
    DigestComputer { inner }
  }

  /// Streams the canonical encoding of the wrapped value through SHA3-256.
  pub fn digest(&self) -> Result<[u8; 32], GkrError> {
    let mut hasher = Sha3_256::new();
    bincode::DefaultOptions::new()
      .with_little_endian()
      .with_fixint_encoding()
      .serialize_into(&mut hasher, self.inner)
      .map_err(|e| GkrError::DigestError {
        reason: e.to_string(),
      })?;
    Ok(hasher.finalize().into())
  }
}
