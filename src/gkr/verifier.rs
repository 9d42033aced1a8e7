//! The native GKR verifier.
use crate::{
  Commitment,
  errors::GkrError,
  gkr::{
    GKRProof, GKRVerifierKey, LAYER_EVALS_LABEL, LINE_CHALLENGE_LABEL,
    circuit::Circuit,
    reduction::{num_line_evals, reduce},
    start_transcript,
  },
  traits::{Engine, pcs::PCSEngineTrait, transcript::TranscriptEngineTrait},
};
use tracing::{debug, info_span};

impl<E: Engine> GKRProof<E> {
  /// Verifies that `outputs` is the evaluation of `circuit` on the inputs committed in `comm`.
  pub fn verify(
    &self,
    vk: &GKRVerifierKey<E>,
    circuit: &Circuit<E::Scalar>,
    outputs: &[E::Scalar],
    comm: &Commitment<E>,
    q0: &[E::Scalar],
  ) -> Result<(), GkrError> {
    let _span = info_span!("GKRProof::verify").entered();
    if self.layers.len() != circuit.num_layers() {
      return Err(GkrError::MalformedProof {
        reason: format!(
          "proof has {} layers, circuit has {}",
          self.layers.len(),
          circuit.num_layers()
        ),
      });
    }
    if let Some(i) = (0..circuit.num_layers())
      .find(|i| self.layers[*i].line_evals.len() != num_line_evals(circuit.next_vars(*i)))
    {
      return Err(GkrError::MalformedProof {
        reason: format!("layer {i} has the wrong number of line evaluations"),
      });
    }

    let (mut transcript, mut claim) = start_transcript::<E>(circuit, comm, outputs, q0)?;
    let mut q = q0.to_vec();

    for (i, (layer, proof)) in circuit.layers().iter().zip(self.layers.iter()).enumerate() {
      let n = circuit.next_vars(i);
      let (final_claim, r) =
        proof
          .sumcheck
          .verify(claim, 2 * n, layer.gate.degree() + 1, i, &mut transcript)?;
      let (x, y) = r.split_at(n);

      transcript.absorb(LAYER_EVALS_LABEL, &proof.evals().as_slice());

      let expected = layer.wiring.evaluate(&q, x, y) * layer.gate.apply(&proof.vl, &proof.vr);
      if final_claim != expected {
        debug!(layer = i, "gate consistency check failed");
        return Err(GkrError::GateConsistencyFailure { layer: i });
      }

      let t = transcript.squeeze(LINE_CHALLENGE_LABEL)?;
      (q, claim) = reduce(&proof.vl, &proof.vr, &proof.line_evals, x, y, &t)?;
    }

    if self.input_eval != claim {
      return Err(GkrError::CommitmentVerificationFailure {
        reason: "input evaluation does not match the reduced claim".to_string(),
      });
    }
    E::PCS::verify(&vk.vk, &mut transcript, comm, &q, &self.input_eval, &self.opening)
  }
}
