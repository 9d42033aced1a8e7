//! The GKR protocol for layered arithmetic circuits.
//!
//! The prover reduces a claim about the output layer to a claim about the input layer, one
//! sum-check per gate layer, and opens the committed inputs at the final point. The verifier
//! is implemented twice: natively in [`verifier`] and as constraints in [`verifier_circuit`].
use crate::{
  Commitment, CommitmentKey, PCSVerifierKey,
  errors::GkrError,
  polys::multilinear::MultilinearPolynomial,
  sumcheck::SumcheckProof,
  traits::{Engine, pcs::PCSEngineTrait, transcript::TranscriptEngineTrait},
};
use serde::{Deserialize, Serialize};

pub mod circuit;
pub mod prover;
pub mod reduction;
pub mod verifier;
pub mod verifier_circuit;

use circuit::Circuit;

pub(crate) const PROOF_LABEL: &[u8] = b"GKRProof";
pub(crate) const CIRCUIT_LABEL: &[u8] = b"circuit";
pub(crate) const COMM_LABEL: &[u8] = b"comm";
pub(crate) const OUTPUTS_LABEL: &[u8] = b"outputs";
pub(crate) const POINT_LABEL: &[u8] = b"q0";
pub(crate) const LAYER_EVALS_LABEL: &[u8] = b"layer_evals";
pub(crate) const LINE_CHALLENGE_LABEL: &[u8] = b"t";

/// The part of a [`GKRProof`] produced for one gate layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct LayerProof<E: Engine> {
  pub(crate) sumcheck: SumcheckProof<E>,
  pub(crate) vl: E::Scalar,
  pub(crate) vr: E::Scalar,
  pub(crate) line_evals: Vec<E::Scalar>,
}

impl<E: Engine> LayerProof<E> {
  /// Returns `[Vl, Vr, h(2), ..]`, the values the transcript absorbs after the sum-check.
  pub(crate) fn evals(&self) -> Vec<E::Scalar> {
    [self.vl, self.vr]
      .into_iter()
      .chain(self.line_evals.iter().copied())
      .collect()
  }
}

/// A GKR proof: one [`LayerProof`] per gate layer, output layer first, then the input opening.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct GKRProof<E: Engine> {
  pub(crate) layers: Vec<LayerProof<E>>,
  pub(crate) input_eval: E::Scalar,
  pub(crate) opening: <E::PCS as PCSEngineTrait<E>>::EvaluationArgument,
}

impl<E: Engine> GKRProof<E> {
  /// Returns the per-layer proofs, output layer first.
  pub fn layers(&self) -> &[LayerProof<E>] {
    &self.layers
  }

  /// Returns the claimed evaluation of the input polynomial at the final point.
  pub fn input_eval(&self) -> E::Scalar {
    self.input_eval
  }
}

/// A type that holds the prover key
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct GKRProverKey<E: Engine> {
  ck: CommitmentKey<E>,
}

/// A type that holds the verifier key
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct GKRVerifierKey<E: Engine> {
  vk: PCSVerifierKey<E>,
}

/// Generates the keys for proving and verifying evaluations of `circuit`.
pub fn setup<E: Engine>(circuit: &Circuit<E::Scalar>) -> (GKRProverKey<E>, GKRVerifierKey<E>) {
  let (ck, vk) = E::PCS::setup(b"gkr", 1 << circuit.input_vars());
  (GKRProverKey { ck }, GKRVerifierKey { vk })
}

/// Commits to the inputs of a circuit evaluation.
pub fn commit_inputs<E: Engine>(
  pk: &GKRProverKey<E>,
  inputs: &[E::Scalar],
) -> Result<Commitment<E>, GkrError> {
  E::PCS::commit(&pk.ck, inputs)
}

/// Starts the transcript shared by the prover and the native verifier, and returns it with
/// the initial claim `MLE(outputs)(q0)`.
pub(crate) fn start_transcript<E: Engine>(
  circuit: &Circuit<E::Scalar>,
  comm: &Commitment<E>,
  outputs: &[E::Scalar],
  q0: &[E::Scalar],
) -> Result<(E::TE, E::Scalar), GkrError> {
  if outputs.len() != 1 << circuit.output_vars() || q0.len() != circuit.output_vars() {
    return Err(GkrError::InvalidInputLength {
      reason: format!(
        "circuit has {} outputs, got {} outputs and a point of length {}",
        1usize << circuit.output_vars(),
        outputs.len(),
        q0.len()
      ),
    });
  }

  let mut transcript = E::TE::new(PROOF_LABEL);
  transcript.absorb(CIRCUIT_LABEL, &circuit.digest()?);
  transcript.absorb(COMM_LABEL, comm);
  transcript.absorb(OUTPUTS_LABEL, &outputs);
  transcript.absorb(POINT_LABEL, &q0);

  let claim = MultilinearPolynomial::evaluate_with(outputs, q0);
  Ok((transcript, claim))
}
