//! The GKR verifier as an R1CS circuit.
//!
//! [`GKRVerifierCircuit`] enforces every check [`GKRProof::verify`] performs, deriving its
//! challenges with an [`AllocatedTranscript`] that replays the native transcript. The circuit
//! shape depends only on the [`Circuit`] it verifies: the number of layers, sum-check rounds,
//! round degrees and line evaluations are all fixed by it.
use crate::{
  Commitment,
  errors::GkrError,
  gadgets::{
    AllocatedTranscript,
    num::{
      add, alloc_constant, enforce_equal, eq_table, lerp, linear_combination, mle_evaluate, mul,
      pow, sum,
    },
    sumcheck::{alloc_sumcheck_proof, verify_sumcheck},
  },
  gkr::{
    CIRCUIT_LABEL, COMM_LABEL, GKRProof, LAYER_EVALS_LABEL, LINE_CHALLENGE_LABEL,
    OUTPUTS_LABEL, POINT_LABEL, PROOF_LABEL,
    circuit::{Circuit, Gate, Wiring},
    reduction::{lagrange_denominator_inverses, num_line_evals},
  },
  provider::mimc::MimcTranscript,
  traits::{Engine, pcs::PCSCircuitTrait, transcript::TranscriptReprTrait},
};
use bellpepper_core::{
  Circuit as R1CSCircuit, ConstraintSystem, SynthesisError, num::AllocatedNum,
  test_cs::TestConstraintSystem,
};
use ff::PrimeField;
use std::sync::Arc;
use tracing::{debug, info_span};

type AN<E> = AllocatedNum<<E as Engine>::Scalar>;

/// Verifies a [`GKRProof`] inside a constraint system.
///
/// The initial point, the outputs and the input commitment are public inputs, allocated in
/// that order. The proof is witness.
#[derive(Clone)]
pub struct GKRVerifierCircuit<E: Engine> {
  circuit: Arc<Circuit<E::Scalar>>,
  digest: [u8; 32],
  q0: Option<Vec<E::Scalar>>,
  outputs: Option<Vec<E::Scalar>>,
  comm: Option<Commitment<E>>,
  proof: Option<GKRProof<E>>,
}

impl<E> GKRVerifierCircuit<E>
where
  E: Engine<TE = MimcTranscript<E>>,
  E::PCS: PCSCircuitTrait<E>,
{
  /// Creates a verifier circuit with every public input and the proof assigned.
  pub fn new(
    circuit: Arc<Circuit<E::Scalar>>,
    q0: Vec<E::Scalar>,
    outputs: Vec<E::Scalar>,
    comm: Commitment<E>,
    proof: GKRProof<E>,
  ) -> Result<Self, GkrError> {
    let digest = circuit.digest()?;
    Ok(Self {
      circuit,
      digest,
      q0: Some(q0),
      outputs: Some(outputs),
      comm: Some(comm),
      proof: Some(proof),
    })
  }

  /// Creates an unassigned verifier circuit, for extracting its shape.
  pub fn blank(circuit: Arc<Circuit<E::Scalar>>) -> Result<Self, GkrError> {
    let digest = circuit.digest()?;
    Ok(Self {
      circuit,
      digest,
      q0: None,
      outputs: None,
      comm: None,
      proof: None,
    })
  }

  /// Synthesizes the circuit into a [`TestConstraintSystem`] and reports the first
  /// unsatisfied constraint.
  pub fn check(&self) -> Result<(), GkrError> {
    let _span = info_span!("GKRVerifierCircuit::check").entered();
    let mut cs = TestConstraintSystem::<E::Scalar>::new();
    self.clone().synthesize(&mut cs)?;
    debug!(constraints = cs.num_constraints(), "verifier circuit synthesized");
    if !cs.is_satisfied() {
      return Err(GkrError::UnSat {
        reason: cs
          .which_is_unsatisfied()
          .unwrap_or("unknown constraint")
          .to_string(),
      });
    }
    Ok(())
  }

  fn alloc_public<CS: ConstraintSystem<E::Scalar>>(
    mut cs: CS,
    values: Option<&[E::Scalar]>,
    len: usize,
  ) -> Result<Vec<AN<E>>, SynthesisError> {
    if values.is_some_and(|v| v.len() != len) {
      return Err(SynthesisError::Unsatisfiable);
    }
    (0..len)
      .map(|i| {
        AllocatedNum::alloc_input(cs.namespace(|| format!("{i}")), || {
          values.map(|v| v[i]).ok_or(SynthesisError::AssignmentMissing)
        })
      })
      .collect()
  }

  fn alloc_witness<CS: ConstraintSystem<E::Scalar>>(
    mut cs: CS,
    value: Option<E::Scalar>,
  ) -> Result<AN<E>, SynthesisError> {
    AllocatedNum::alloc(cs.namespace(|| "value"), || {
      value.ok_or(SynthesisError::AssignmentMissing)
    })
  }

  /// Rejects a proof whose shape differs from the one the circuit dictates.
  fn check_shape(&self) -> Result<(), SynthesisError> {
    if let Some(proof) = &self.proof {
      if proof.layers.len() != self.circuit.num_layers() {
        return Err(SynthesisError::Unsatisfiable);
      }
      for (i, layer) in proof.layers.iter().enumerate() {
        if layer.line_evals.len() != num_line_evals(self.circuit.next_vars(i)) {
          return Err(SynthesisError::Unsatisfiable);
        }
      }
    }
    Ok(())
  }
}

/// Allocates `W(q, x, y)` for `wiring`.
fn wiring_predicate<F: PrimeField, CS: ConstraintSystem<F>>(
  mut cs: CS,
  wiring: &Wiring,
  width: usize,
  q: &[AllocatedNum<F>],
  x: &[AllocatedNum<F>],
  y: &[AllocatedNum<F>],
) -> Result<AllocatedNum<F>, SynthesisError> {
  match wiring {
    Wiring::Identity => {
      // Π_i (q_i x_i y_i + (1 - q_i)(1 - x_i)(1 - y_i))
      let mut acc = alloc_constant(cs.namespace(|| "one"), F::ONE)?;
      for (i, ((q_i, x_i), y_i)) in q.iter().zip(x.iter()).zip(y.iter()).enumerate() {
        let qx = mul(cs.namespace(|| format!("qx_{i}")), q_i, x_i)?;
        let qxy = mul(cs.namespace(|| format!("qxy_{i}")), &qx, y_i)?;
        let a = linear_combination(
          cs.namespace(|| format!("not_q_not_x_{i}")),
          &[(-F::ONE, q_i), (-F::ONE, x_i), (F::ONE, &qx)],
          F::ONE,
        )?;
        let ay = mul(cs.namespace(|| format!("ay_{i}")), &a, y_i)?;
        let term = linear_combination(
          cs.namespace(|| format!("term_{i}")),
          &[(F::ONE, &qxy), (F::ONE, &a), (-F::ONE, &ay)],
          F::ZERO,
        )?;
        acc = mul(cs.namespace(|| format!("acc_{i}")), &acc, &term)?;
      }
      Ok(acc)
    }
    _ => {
      let eq_q = eq_table(cs.namespace(|| "eq_q"), q)?;
      let eq_x = eq_table(cs.namespace(|| "eq_x"), x)?;
      let eq_y = eq_table(cs.namespace(|| "eq_y"), y)?;
      let terms = wiring
        .wires(width)
        .iter()
        .enumerate()
        .map(|(i, w)| {
          let gx = mul(cs.namespace(|| format!("wire_{i}_gx")), &eq_q[w.out], &eq_x[w.left])?;
          mul(cs.namespace(|| format!("wire_{i}_gxy")), &gx, &eq_y[w.right])
        })
        .collect::<Result<Vec<_>, _>>()?;
      sum(cs.namespace(|| "sum"), &terms)
    }
  }
}

/// Allocates `op(vl, vr)` for `gate`.
fn gate_op<F: PrimeField, CS: ConstraintSystem<F>>(
  mut cs: CS,
  gate: &Gate<F>,
  vl: &AllocatedNum<F>,
  vr: &AllocatedNum<F>,
) -> Result<AllocatedNum<F>, SynthesisError> {
  match gate {
    Gate::Add => add(cs.namespace(|| "add"), vl, vr),
    Gate::Sub => linear_combination(cs.namespace(|| "sub"), &[(F::ONE, vl), (-F::ONE, vr)], F::ZERO),
    Gate::Mul => mul(cs.namespace(|| "mul"), vl, vr),
    Gate::AddConstPow { constant, exponent } => {
      let base = linear_combination(
        cs.namespace(|| "base"),
        &[(F::ONE, vl), (F::ONE, vr)],
        *constant,
      )?;
      pow(cs.namespace(|| "pow"), &base, *exponent)
    }
  }
}

/// Allocates `h(t)` for the polynomial taking `evals[k]` at node `k`.
fn interpolate<F: PrimeField, CS: ConstraintSystem<F>>(
  mut cs: CS,
  evals: &[AllocatedNum<F>],
  t: &AllocatedNum<F>,
) -> Result<AllocatedNum<F>, SynthesisError> {
  let degree = evals.len().checked_sub(1).ok_or(SynthesisError::Unsatisfiable)?;
  let inv_denoms =
    lagrange_denominator_inverses::<F>(degree).map_err(|_| SynthesisError::Unsatisfiable)?;
  let diffs = (0..=degree)
    .map(|j| {
      linear_combination(
        cs.namespace(|| format!("t_minus_{j}")),
        &[(F::ONE, t)],
        -F::from(j as u64),
      )
    })
    .collect::<Result<Vec<_>, _>>()?;

  let mut terms = Vec::with_capacity(degree + 1);
  for (k, h_k) in evals.iter().enumerate() {
    let mut acc = h_k.clone();
    for (j, d) in diffs.iter().enumerate().filter(|(j, _)| *j != k) {
      acc = mul(cs.namespace(|| format!("basis_{k}_{j}")), &acc, d)?;
    }
    terms.push(acc);
  }
  let weighted = inv_denoms.iter().copied().zip(terms.iter()).collect::<Vec<_>>();
  linear_combination(cs.namespace(|| "h_t"), &weighted, F::ZERO)
}

impl<E> R1CSCircuit<E::Scalar> for GKRVerifierCircuit<E>
where
  E: Engine<TE = MimcTranscript<E>>,
  E::PCS: PCSCircuitTrait<E>,
{
  fn synthesize<CS: ConstraintSystem<E::Scalar>>(self, cs: &mut CS) -> Result<(), SynthesisError> {
    self.check_shape()?;
    let circuit = &self.circuit;
    let out_vars = circuit.output_vars();

    let q0 = Self::alloc_public(cs.namespace(|| "q0"), self.q0.as_deref(), out_vars)?;
    let outputs = Self::alloc_public(
      cs.namespace(|| "outputs"),
      self.outputs.as_deref(),
      1 << out_vars,
    )?;
    let comm = E::PCS::alloc_commitment(
      &mut cs.namespace(|| "comm"),
      self.comm.as_ref(),
      circuit.input_vars(),
    )?;

    let mut transcript = AllocatedTranscript::<E>::new(cs, PROOF_LABEL)?;
    let digest_scalars: Vec<E::Scalar> = self.digest.to_transcript_scalars();
    transcript.absorb_constants(cs, CIRCUIT_LABEL, &digest_scalars)?;
    transcript.absorb(cs, COMM_LABEL, &E::PCS::commitment_scalars(&comm))?;
    transcript.absorb(cs, OUTPUTS_LABEL, &outputs)?;
    transcript.absorb(cs, POINT_LABEL, &q0)?;

    let mut claim = mle_evaluate(cs.namespace(|| "initial_claim"), &outputs, &q0)?;
    let mut q = q0;

    for (i, layer) in circuit.layers().iter().enumerate() {
      let mut cs = cs.namespace(|| format!("layer_{i}"));
      let n = circuit.next_vars(i);
      let layer_proof = self.proof.as_ref().map(|p| &p.layers[i]);

      let polys = alloc_sumcheck_proof::<E, _>(
        cs.namespace(|| "sumcheck_proof"),
        layer_proof.map(|p| &p.sumcheck),
        2 * n,
        layer.gate.degree() + 1,
      )?;
      let vl = Self::alloc_witness(cs.namespace(|| "vl"), layer_proof.map(|p| p.vl))?;
      let vr = Self::alloc_witness(cs.namespace(|| "vr"), layer_proof.map(|p| p.vr))?;
      let line_evals = (0..num_line_evals(n))
        .map(|k| {
          Self::alloc_witness(
            cs.namespace(|| format!("line_eval_{k}")),
            layer_proof.map(|p| p.line_evals[k]),
          )
        })
        .collect::<Result<Vec<_>, _>>()?;

      let (final_claim, r) = verify_sumcheck(
        cs.namespace(|| "sumcheck"),
        &mut transcript,
        &claim,
        &polys,
      )?;
      let (x, y) = r.split_at(n);

      let evals = [vl, vr]
        .into_iter()
        .chain(line_evals)
        .collect::<Vec<_>>();
      transcript.absorb(&mut cs, LAYER_EVALS_LABEL, &evals)?;

      let w = wiring_predicate(
        cs.namespace(|| "wiring"),
        &layer.wiring,
        1 << layer.num_vars,
        &q,
        x,
        y,
      )?;
      let op = gate_op(cs.namespace(|| "gate"), &layer.gate, &evals[0], &evals[1])?;
      let expected = mul(cs.namespace(|| "expected"), &w, &op)?;
      enforce_equal(cs.namespace(|| "gate_check"), &final_claim, &expected);

      let t = transcript.squeeze(&mut cs, LINE_CHALLENGE_LABEL)?;
      q = x
        .iter()
        .zip(y.iter())
        .enumerate()
        .map(|(j, (x_j, y_j))| lerp(cs.namespace(|| format!("line_point_{j}")), x_j, y_j, &t))
        .collect::<Result<Vec<_>, _>>()?;
      claim = interpolate(cs.namespace(|| "line_eval"), &evals, &t)?;
    }

    let input_eval = Self::alloc_witness(
      cs.namespace(|| "input_eval"),
      self.proof.as_ref().map(|p| p.input_eval),
    )?;
    enforce_equal(cs.namespace(|| "input_claim"), &input_eval, &claim);
    E::PCS::verify_circuit(
      &mut cs.namespace(|| "opening"),
      &mut transcript,
      &comm,
      &q,
      &input_eval,
      self.proof.as_ref().map(|p| &p.opening),
    )
  }
}
