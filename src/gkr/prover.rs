//! The GKR prover.
use crate::{
  Commitment, start_span,
  errors::GkrError,
  gkr::{
    GKRProof, GKRProverKey, LAYER_EVALS_LABEL, LINE_CHALLENGE_LABEL, LayerProof,
    circuit::{Assignment, Circuit, Gate, Wire},
    reduction::{line_degree, line_point, reduce},
    start_transcript,
  },
  math::Math,
  polys::multilinear::{MultilinearPolynomial, fold_evals},
  polys::eq::{EqPolynomial, eq_bit},
  sumcheck::{SumcheckInstance, SumcheckProof},
  traits::{Engine, pcs::PCSEngineTrait, transcript::TranscriptEngineTrait},
};
use ff::PrimeField;
use rayon::prelude::*;
use tracing::{debug, info};

/// `Σ_{x,y} W(q, x, y) · op(V(x), V(y))` over the `2·n` variables `(x, y)`, `x` bound first.
///
/// Each wire carries its weight `eq(q, g)·Π eq(r_j, bit_j)` over the variables bound so far,
/// so a round costs one pass over the wires.
struct LayerInstance<'a, F: PrimeField> {
  gate: &'a Gate<F>,
  wires: Vec<Wire>,
  weights: Vec<F>,
  left: Vec<F>,
  right: Vec<F>,
  num_vars: usize,
  round: usize,
}

impl<'a, F: PrimeField> LayerInstance<'a, F> {
  fn new(gate: &'a Gate<F>, wires: Vec<Wire>, q: &[F], next: &[F]) -> Self {
    let eq_q = EqPolynomial::evals_from_points(q);
    let weights = wires.iter().map(|w| eq_q[w.out]).collect();
    Self {
      gate,
      wires,
      weights,
      left: next.to_vec(),
      right: next.to_vec(),
      num_vars: next.len().log_2(),
      round: 0,
    }
  }

  /// Returns `(Vl, Vr)` once every variable is bound.
  fn final_values(&self) -> (F, F) {
    (self.left[0], self.right[0])
  }
}

impl<F: PrimeField> SumcheckInstance<F> for LayerInstance<'_, F> {
  fn num_rounds(&self) -> usize {
    2 * self.num_vars
  }

  fn degree(&self) -> usize {
    self.gate.degree() + 1
  }

  fn round_evals(&self) -> Vec<F> {
    let degree = self.degree();
    let points = (0..=degree).map(|k| F::from(k as u64)).collect::<Vec<_>>();
    let in_x_phase = self.round < self.num_vars;
    let i = if in_x_phase {
      self.round
    } else {
      self.round - self.num_vars
    };

    self
      .wires
      .par_iter()
      .zip(self.weights.par_iter())
      .map(|(w, weight)| {
        let idx = if in_x_phase { w.left } else { w.right };
        let m = idx >> (i + 1);
        let bit = idx.get_bit(i);
        let table = if in_x_phase { &self.left } else { &self.right };
        let (lo, hi) = (table[2 * m], table[2 * m + 1]);

        points
          .iter()
          .map(|X| {
            let z = lo + *X * (hi - lo);
            let op = if in_x_phase {
              self.gate.apply(&z, &self.right[w.right])
            } else {
              self.gate.apply(&self.left[0], &z)
            };
            *weight * eq_bit(X, bit) * op
          })
          .collect::<Vec<F>>()
      })
      .reduce(
        || vec![F::ZERO; degree + 1],
        |a, b| a.iter().zip(b.iter()).map(|(x, y)| *x + y).collect(),
      )
  }

  fn bind(&mut self, r: &F) {
    let in_x_phase = self.round < self.num_vars;
    let i = if in_x_phase {
      self.round
    } else {
      self.round - self.num_vars
    };
    self
      .weights
      .par_iter_mut()
      .zip(self.wires.par_iter())
      .for_each(|(weight, w)| {
        let idx = if in_x_phase { w.left } else { w.right };
        *weight *= eq_bit(r, idx.get_bit(i));
      });
    if in_x_phase {
      self.left = fold_evals(&self.left, r);
    } else {
      self.right = fold_evals(&self.right, r);
    }
    self.round += 1;
  }
}

impl<E: Engine> GKRProof<E> {
  /// Proves that `assignment` evaluates `circuit` on the inputs committed in `comm`.
  ///
  /// `q0` is the point the output layer is first evaluated at.
  pub fn prove(
    pk: &GKRProverKey<E>,
    circuit: &Circuit<E::Scalar>,
    assignment: &Assignment<E::Scalar>,
    comm: &Commitment<E>,
    q0: &[E::Scalar],
  ) -> Result<Self, GkrError> {
    if assignment.values.len() != circuit.num_layers() + 1 {
      return Err(GkrError::InvalidInputLength {
        reason: format!(
          "assignment has {} layers, circuit has {}",
          assignment.values.len(),
          circuit.num_layers() + 1
        ),
      });
    }
    let (mut transcript, mut claim) =
      start_transcript::<E>(circuit, comm, assignment.outputs(), q0)?;
    let mut q = q0.to_vec();

    let mut layers = Vec::with_capacity(circuit.num_layers());
    for (i, layer) in circuit.layers().iter().enumerate() {
      let (_layer_span, layer_t) = start_span!("prove_layer", layer = i);
      let next = assignment.layer(i + 1);
      let n = circuit.next_vars(i);
      if next.len() != 1 << n {
        return Err(GkrError::InvalidInputLength {
          reason: format!("layer {} of the assignment has the wrong width", i + 1),
        });
      }

      let mut instance = LayerInstance::new(
        &layer.gate,
        layer.wiring.wires(1 << layer.num_vars),
        &q,
        next,
      );
      let (sumcheck, r, _final_claim) =
        SumcheckProof::<E>::prove(&claim, &mut instance, &mut transcript)?;
      let (x, y) = r.split_at(n);

      let vl = MultilinearPolynomial::evaluate_with(next, x);
      let vr = MultilinearPolynomial::evaluate_with(next, y);
      debug_assert_eq!((vl, vr), instance.final_values());
      let line_evals = (2..=line_degree(n))
        .map(|k| {
          MultilinearPolynomial::evaluate_with(
            next,
            &line_point(x, y, &E::Scalar::from(k as u64)),
          )
        })
        .collect::<Vec<_>>();

      let layer_proof = LayerProof {
        sumcheck,
        vl,
        vr,
        line_evals,
      };
      transcript.absorb(LAYER_EVALS_LABEL, &layer_proof.evals().as_slice());
      let t = transcript.squeeze(LINE_CHALLENGE_LABEL)?;
      (q, claim) = reduce(&vl, &vr, &layer_proof.line_evals, x, y, &t)?;

      debug!(layer = i, rounds = 2 * n, "layer reduced");
      info!(elapsed_ms = %layer_t.elapsed().as_millis(), layer = i, "prove_layer");
      layers.push(layer_proof);
    }

    let (_open_span, open_t) = start_span!("open_inputs");
    let (input_eval, opening) =
      E::PCS::prove(&pk.ck, &mut transcript, comm, assignment.inputs(), &q)?;
    info!(elapsed_ms = %open_t.elapsed().as_millis(), "open_inputs");

    Ok(GKRProof {
      layers,
      input_eval,
      opening,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    gkr::circuit::{Layer, Wiring},
    provider::pasta::pallas::Scalar,
  };
  use ff::Field;
  use rand::{SeedableRng, rngs::StdRng};

  fn check_instance(gate: Gate<Scalar>, wiring: Wiring, n_out: usize, n_next: usize) {
    let mut rng = StdRng::seed_from_u64(13);
    let next: Vec<Scalar> = (0..1 << n_next).map(|_| Scalar::random(&mut rng)).collect();
    let q: Vec<Scalar> = (0..n_out).map(|_| Scalar::random(&mut rng)).collect();
    let circuit = Circuit::new(vec![Layer::new(n_out, gate.clone(), wiring.clone())], n_next).unwrap();
    let outputs = circuit.evaluate(&next).unwrap().outputs().to_vec();
    let claim = MultilinearPolynomial::evaluate_with(&outputs, &q);

    let mut instance = LayerInstance::new(&gate, wiring.wires(1 << n_out), &q, &next);
    let mut e = claim;
    let mut r = Vec::new();
    for _ in 0..instance.num_rounds() {
      let evals = instance.round_evals();
      assert_eq!(evals[0] + evals[1], e);
      let r_i = Scalar::random(&mut rng);
      e = crate::polys::univariate::UniPoly::from_evals(&evals)
        .unwrap()
        .evaluate(&r_i);
      instance.bind(&r_i);
      r.push(r_i);
    }

    let (x, y) = r.split_at(n_next);
    let (vl, vr) = instance.final_values();
    assert_eq!(vl, MultilinearPolynomial::evaluate_with(&next, x));
    assert_eq!(vr, MultilinearPolynomial::evaluate_with(&next, y));
    assert_eq!(e, wiring.evaluate(&q, x, y) * gate.apply(&vl, &vr));
  }

  #[test]
  fn test_layer_instance_round_sums() {
    check_instance(Gate::Mul, Wiring::Dense(vec![(0, 1), (2, 3)]), 1, 2);
    check_instance(Gate::Add, Wiring::Identity, 2, 2);
    check_instance(Gate::Sub, Wiring::Permutation(vec![2, 0, 3, 1]), 2, 2);
    check_instance(
      Gate::AddConstPow {
        constant: Scalar::from(7u64),
        exponent: 3,
      },
      Wiring::SparseList(4, vec![(0, 1, 2), (3, 0, 0)]),
      2,
      2,
    );
    check_instance(Gate::Mul, Wiring::Dense(vec![(0, 0)]), 0, 0);
  }
}
