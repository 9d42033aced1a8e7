//! This module defines errors returned by the library.
use core::fmt::Debug;
use thiserror::Error;

/// Errors returned by the GKR prover, the verifiers and the commitment schemes
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum GkrError {
  /// returned if the supplied input is not of the right length
  #[error("InvalidInputLength: {reason}")]
  InvalidInputLength {
    /// The reason for the invalid input length error
    reason: String,
  },
  /// returned if a circuit description violates a structural invariant
  #[error("InvalidCircuit: {reason}")]
  InvalidCircuit {
    /// The reason the circuit was rejected
    reason: String,
  },
  /// returned if a proof does not have the shape dictated by the circuit
  #[error("MalformedProof: {reason}")]
  MalformedProof {
    /// The reason the proof was rejected
    reason: String,
  },
  /// returned when a round polynomial does not sum to the running claim
  #[error("SumcheckConsistencyFailure: layer {layer}, round {round}")]
  SumcheckConsistencyFailure {
    /// The circuit layer whose sum-check failed
    layer: usize,
    /// The round at which the check failed
    round: usize,
  },
  /// returned when the final sum-check claim disagrees with the wiring-combined `Vl`, `Vr`
  #[error("GateConsistencyFailure: layer {layer}")]
  GateConsistencyFailure {
    /// The circuit layer whose gate check failed
    layer: usize,
  },
  /// returned when the polynomial commitment scheme rejects an opening
  #[error("CommitmentVerificationFailure: {reason}")]
  CommitmentVerificationFailure {
    /// The reason for the commitment verification failure
    reason: String,
  },
  /// returned if the supplied witness is not a satisfying witness to the verifier circuit
  #[error("UnSat: {reason}")]
  UnSat {
    /// The reason for circuit UnSat failure
    reason: String,
  },
  /// return when error during synthesis
  #[error("SynthesisError: {reason}")]
  SynthesisError {
    /// The reason for circuit synthesis failure
    reason: String,
  },
  /// returned when there is an error creating a digest
  #[error("DigestError: {reason}")]
  DigestError {
    /// The reason for the digest error
    reason: String,
  },
  /// returned when the prover cannot prove the provided statement due to completeness error
  #[error("InternalError")]
  InternalError,
  /// returned when attempting to divide by zero
  #[error("DivisionByZero")]
  DivisionByZero,
}

impl From<bellpepper_core::SynthesisError> for GkrError {
  fn from(err: bellpepper_core::SynthesisError) -> Self {
    GkrError::SynthesisError {
      reason: err.to_string(),
    }
  }
}
