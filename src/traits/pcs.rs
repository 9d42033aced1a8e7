//! This module defines a collection of traits that define the behavior of a polynomial commitment scheme.
//! The GKR prover and verifiers depend only on these traits, never on a concrete scheme.
use crate::{
  errors::GkrError,
  gadgets::transcript::AllocatedTranscript,
  traits::{Engine, transcript::TranscriptReprTrait},
};
use bellpepper_core::{ConstraintSystem, SynthesisError, num::AllocatedNum};
use core::fmt::Debug;
use serde::{Deserialize, Serialize};

/// This trait defines the behavior of the commitment
pub trait CommitmentTrait<E: Engine>:
  Clone
  + Debug
  + PartialEq
  + Eq
  + Send
  + Sync
  + TranscriptReprTrait<E::Scalar>
  + Serialize
  + for<'de> Deserialize<'de>
{
}

/// A trait that ties different pieces of the commitment generation together
pub trait PCSEngineTrait<E: Engine>: Clone + Send + Sync {
  /// Holds the type of the commitment key
  type CommitmentKey: Clone + Debug + Send + Sync + Serialize + for<'de> Deserialize<'de>;

  /// A type that holds the verifier key
  type VerifierKey: Clone + Debug + Send + Sync + Serialize + for<'de> Deserialize<'de>;

  /// Holds the type of the commitment
  type Commitment: CommitmentTrait<E>;

  /// A type that holds the evaluation argument
  type EvaluationArgument: Clone + Debug + Send + Sync + Serialize + for<'de> Deserialize<'de>;

  /// A type that holds an argument for several polynomials opened at one shared point
  type BatchEvaluationArgument: Clone + Debug + Send + Sync + Serialize + for<'de> Deserialize<'de>;

  /// Samples a new commitment key able to commit to `n` evaluations, and a verifier key
  fn setup(label: &'static [u8], n: usize) -> (Self::CommitmentKey, Self::VerifierKey);

  /// Commits to the evaluations of a multilinear polynomial over the hypercube
  fn commit(ck: &Self::CommitmentKey, poly: &[E::Scalar]) -> Result<Self::Commitment, GkrError>;

  /// A method to prove the evaluation of a multilinear polynomial
  fn prove(
    ck: &Self::CommitmentKey,
    transcript: &mut E::TE,
    comm: &Self::Commitment,
    poly: &[E::Scalar],
    point: &[E::Scalar],
  ) -> Result<(E::Scalar, Self::EvaluationArgument), GkrError>;

  /// A method to verify the purported evaluation of a multilinear polynomial
  fn verify(
    vk: &Self::VerifierKey,
    transcript: &mut E::TE,
    comm: &Self::Commitment,
    point: &[E::Scalar],
    eval: &E::Scalar,
    arg: &Self::EvaluationArgument,
  ) -> Result<(), GkrError>;

  /// Proves the evaluations of several multilinear polynomials at a single point
  fn batch_prove(
    ck: &Self::CommitmentKey,
    transcript: &mut E::TE,
    comms: &[Self::Commitment],
    polys: &[Vec<E::Scalar>],
    point: &[E::Scalar],
  ) -> Result<(Vec<E::Scalar>, Self::BatchEvaluationArgument), GkrError>;

  /// Verifies the purported evaluations of several multilinear polynomials at a single point
  fn batch_verify(
    vk: &Self::VerifierKey,
    transcript: &mut E::TE,
    comms: &[Self::Commitment],
    point: &[E::Scalar],
    evals: &[E::Scalar],
    arg: &Self::BatchEvaluationArgument,
  ) -> Result<(), GkrError>;
}

/// A commitment scheme whose opening check can be expressed as constraints.
///
/// Implementations must absorb exactly what their native `verify` absorbs, in the same order.
pub trait PCSCircuitTrait<E: Engine>: PCSEngineTrait<E> {
  /// The commitment as it lives inside a constraint system
  type AllocatedCommitment: Clone;

  /// Allocates the commitment to a polynomial in `num_vars` variables as public input
  fn alloc_commitment<CS: ConstraintSystem<E::Scalar>>(
    cs: &mut CS,
    comm: Option<&Self::Commitment>,
    num_vars: usize,
  ) -> Result<Self::AllocatedCommitment, SynthesisError>;

  /// The allocated counterpart of `TranscriptReprTrait::to_transcript_scalars`
  fn commitment_scalars(comm: &Self::AllocatedCommitment) -> Vec<AllocatedNum<E::Scalar>>;

  /// Enforces that `eval` is the evaluation at `point` of the committed polynomial
  fn verify_circuit<CS: ConstraintSystem<E::Scalar>>(
    cs: &mut CS,
    transcript: &mut AllocatedTranscript<E>,
    comm: &Self::AllocatedCommitment,
    point: &[AllocatedNum<E::Scalar>],
    eval: &AllocatedNum<E::Scalar>,
    arg: Option<&Self::EvaluationArgument>,
  ) -> Result<(), SynthesisError>;
}
