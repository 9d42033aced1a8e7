//! Layered arithmetic circuits: gates, wiring descriptors and assignments.
//!
//! Layer 0 is the output layer. Layer `L` reads its inputs from layer `L + 1`, and the last
//! gate layer reads from the input layer. Every layer width is a power of two.
use crate::{
  digest::{DigestComputer, SimpleDigestible},
  errors::GkrError,
  polys::eq::EqPolynomial,
};
use ff::PrimeField;
use once_cell::sync::OnceCell;
use rayon::prelude::*;
use serde::Serialize;

/// Largest exponent an `AddConstPow` gate may use. Round polynomials have degree
/// `exponent + 1`.
pub const MAX_GATE_EXPONENT: u64 = 1 << 8;

/// The operation every gate of a layer applies to its two inputs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Gate<F: PrimeField> {
  /// u + v
  Add,
  /// u · v
  Mul,
  /// u - v
  Sub,
  /// (u + v + constant)^exponent, a MiMC-style round
  AddConstPow {
    /// added before exponentiation
    constant: F,
    /// in `1..=MAX_GATE_EXPONENT`
    exponent: u64,
  },
}

impl<F: PrimeField> Gate<F> {
  /// Applies the gate to its inputs.
  pub fn apply(&self, u: &F, v: &F) -> F {
    match self {
      Gate::Add => *u + v,
      Gate::Mul => *u * v,
      Gate::Sub => *u - v,
      Gate::AddConstPow { constant, exponent } => (*u + v + constant).pow_vartime([*exponent]),
    }
  }

  /// Degree of the gate in either input.
  pub fn degree(&self) -> usize {
    match self {
      Gate::Add | Gate::Mul | Gate::Sub => 1,
      Gate::AddConstPow { exponent, .. } => *exponent as usize,
    }
  }
}

/// One gate and the two gates of the next layer it reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Wire {
  /// index of the gate in its own layer
  pub out: usize,
  /// index of the left input in the next layer
  pub left: usize,
  /// index of the right input in the next layer
  pub right: usize,
}

/// How a layer's gates read the next layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Wiring {
  /// gate g reads (g, g)
  Identity,
  /// gate g reads (g, π(g)) for a bijection π
  Permutation(Vec<usize>),
  /// only the listed gates `(g, l, r)` of a layer of the given width; the others are zero
  SparseList(usize, Vec<(usize, usize, usize)>),
  /// gate g reads the g-th pair
  Dense(Vec<(usize, usize)>),
}

impl Wiring {
  /// Lists the wires of a layer of `width` gates.
  pub fn wires(&self, width: usize) -> Vec<Wire> {
    match self {
      Wiring::Identity => (0..width)
        .map(|g| Wire {
          out: g,
          left: g,
          right: g,
        })
        .collect(),
      Wiring::Permutation(pi) => pi
        .iter()
        .enumerate()
        .map(|(g, p)| Wire {
          out: g,
          left: g,
          right: *p,
        })
        .collect(),
      Wiring::SparseList(_, list) => list
        .iter()
        .map(|(g, l, r)| Wire {
          out: *g,
          left: *l,
          right: *r,
        })
        .collect(),
      Wiring::Dense(pairs) => pairs
        .iter()
        .enumerate()
        .map(|(g, (l, r))| Wire {
          out: g,
          left: *l,
          right: *r,
        })
        .collect(),
    }
  }

  /// Number of terms [`Self::evaluate`] sums for a layer in `num_vars` variables.
  pub fn cost(&self, num_vars: usize) -> usize {
    match self {
      Wiring::Identity => num_vars,
      Wiring::Permutation(pi) => pi.len(),
      Wiring::SparseList(_, list) => list.len(),
      Wiring::Dense(pairs) => pairs.len(),
    }
  }

  /// Evaluates the wiring predicate `W(q, x, y) = Σ_wires eq(q, g)·eq(x, l)·eq(y, r)`.
  pub fn evaluate<F: PrimeField>(&self, q: &[F], x: &[F], y: &[F]) -> F {
    match self {
      Wiring::Identity => q
        .iter()
        .zip(x.iter())
        .zip(y.iter())
        .map(|((q, x), y)| *q * x * y + (F::ONE - q) * (F::ONE - x) * (F::ONE - y))
        .product(),
      // a wire costs one product per coordinate; the tables cost one per entry
      _ if self.cost(q.len()) * (q.len() + x.len() + y.len())
        < (1 << q.len()) + (1 << x.len()) + (1 << y.len()) =>
      {
        let (eq_q, eq_x, eq_y) = (
          EqPolynomial::new(q.to_vec()),
          EqPolynomial::new(x.to_vec()),
          EqPolynomial::new(y.to_vec()),
        );
        self
          .wires(1 << q.len())
          .par_iter()
          .map(|w| {
            eq_q.evaluate_at_index(w.out)
              * eq_x.evaluate_at_index(w.left)
              * eq_y.evaluate_at_index(w.right)
          })
          .sum()
      }
      _ => {
        let eq_q = EqPolynomial::evals_from_points(q);
        let eq_x = EqPolynomial::evals_from_points(x);
        let eq_y = EqPolynomial::evals_from_points(y);
        self
          .wires(eq_q.len())
          .par_iter()
          .map(|w| eq_q[w.out] * eq_x[w.left] * eq_y[w.right])
          .sum()
      }
    }
  }
}

/// A gate layer: `2^num_vars` gates of one kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Layer<F: PrimeField> {
  /// log2 of the layer width
  pub num_vars: usize,
  /// the gate every output applies
  pub gate: Gate<F>,
  /// how the gates read the next layer
  pub wiring: Wiring,
}

impl<F: PrimeField> Layer<F> {
  /// Creates a layer.
  pub fn new(num_vars: usize, gate: Gate<F>, wiring: Wiring) -> Self {
    Self {
      num_vars,
      gate,
      wiring,
    }
  }

  fn validate(&self, index: usize, next_vars: usize) -> Result<(), GkrError> {
    let width = 1usize << self.num_vars;
    let next_width = 1usize << next_vars;
    let invalid = |reason: String| GkrError::InvalidCircuit {
      reason: format!("layer {index}: {reason}"),
    };

    if let Gate::AddConstPow { exponent, .. } = self.gate {
      if !(1..=MAX_GATE_EXPONENT).contains(&exponent) {
        return Err(invalid(format!(
          "exponent {exponent} is outside 1..={MAX_GATE_EXPONENT}"
        )));
      }
    }

    match &self.wiring {
      Wiring::Identity => {
        if width != next_width {
          return Err(invalid(format!(
            "identity wiring needs equal widths, got {width} and {next_width}"
          )));
        }
      }
      Wiring::Permutation(pi) => {
        if width != next_width || pi.len() != width {
          return Err(invalid(
            "permutation wiring needs equal widths and one image per gate".to_string(),
          ));
        }
        let mut seen = vec![false; width];
        for p in pi {
          if *p >= width || seen[*p] {
            return Err(invalid("permutation is not a bijection".to_string()));
          }
          seen[*p] = true;
        }
      }
      Wiring::SparseList(list_width, list) => {
        if *list_width != width {
          return Err(invalid(format!(
            "sparse wiring declares width {list_width}, layer has {width}"
          )));
        }
        let mut seen = vec![false; width];
        for (g, _, _) in list {
          if *g >= width || seen[*g] {
            return Err(invalid(format!("sparse wiring lists gate {g} twice or out of range")));
          }
          seen[*g] = true;
        }
      }
      Wiring::Dense(pairs) => {
        if pairs.len() != width {
          return Err(invalid(format!(
            "dense wiring has {} pairs for {width} gates",
            pairs.len()
          )));
        }
      }
    }

    if let Some(w) = self
      .wiring
      .wires(width)
      .iter()
      .find(|w| w.left >= next_width || w.right >= next_width)
    {
      return Err(invalid(format!(
        "gate {} reads ({}, {}) from a layer of width {next_width}",
        w.out, w.left, w.right
      )));
    }
    Ok(())
  }
}

/// An immutable layered circuit.
#[derive(Clone, Debug, Serialize)]
pub struct Circuit<F: PrimeField> {
  layers: Vec<Layer<F>>,
  input_vars: usize,
  #[serde(skip)]
  digest: OnceCell<[u8; 32]>,
}

impl<F: PrimeField + Serialize> SimpleDigestible for Circuit<F> {}

impl<F: PrimeField> Circuit<F> {
  /// Creates a circuit from its gate layers, output layer first, over `2^input_vars` inputs.
  pub fn new(layers: Vec<Layer<F>>, input_vars: usize) -> Result<Self, GkrError> {
    if layers.is_empty() {
      return Err(GkrError::InvalidCircuit {
        reason: "a circuit needs at least one gate layer".to_string(),
      });
    }
    for (i, layer) in layers.iter().enumerate() {
      let next_vars = layers.get(i + 1).map_or(input_vars, |l| l.num_vars);
      layer.validate(i, next_vars)?;
    }
    Ok(Self {
      layers,
      input_vars,
      digest: OnceCell::new(),
    })
  }

  /// Returns the gate layers, output layer first.
  pub fn layers(&self) -> &[Layer<F>] {
    &self.layers
  }

  /// Returns the number of gate layers.
  pub fn num_layers(&self) -> usize {
    self.layers.len()
  }

  /// Returns log2 of the number of inputs.
  pub fn input_vars(&self) -> usize {
    self.input_vars
  }

  /// Returns log2 of the number of outputs.
  pub fn output_vars(&self) -> usize {
    self.layers[0].num_vars
  }

  /// Returns log2 of the width of the layer gate layer `i` reads from.
  pub fn next_vars(&self, i: usize) -> usize {
    self
      .layers
      .get(i + 1)
      .map_or(self.input_vars, |l| l.num_vars)
  }

  /// Evaluates the circuit on `inputs`.
  pub fn evaluate(&self, inputs: &[F]) -> Result<Assignment<F>, GkrError> {
    if inputs.len() != 1 << self.input_vars {
      return Err(GkrError::InvalidInputLength {
        reason: format!(
          "circuit expects {} inputs, got {}",
          1usize << self.input_vars,
          inputs.len()
        ),
      });
    }

    let mut values = vec![inputs.to_vec()];
    for layer in self.layers.iter().rev() {
      let next = &values[values.len() - 1];
      let mut out = vec![F::ZERO; 1 << layer.num_vars];
      for w in layer.wiring.wires(out.len()) {
        out[w.out] = layer.gate.apply(&next[w.left], &next[w.right]);
      }
      values.push(out);
    }
    values.reverse();
    Ok(Assignment { values })
  }
}

impl<F: PrimeField + Serialize> Circuit<F> {
  /// Returns the SHA3-256 digest of the circuit, computed once.
  pub fn digest(&self) -> Result<[u8; 32], GkrError> {
    self
      .digest
      .get_or_try_init(|| DigestComputer::new(self).digest())
      .cloned()
  }
}

/// The value of every gate, produced once by [`Circuit::evaluate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment<F: PrimeField> {
  /// `values[0]` is the output layer and the last entry the inputs
  pub(crate) values: Vec<Vec<F>>,
}

impl<F: PrimeField> Assignment<F> {
  /// Returns the outputs.
  pub fn outputs(&self) -> &[F] {
    &self.values[0]
  }

  /// Returns the inputs.
  pub fn inputs(&self) -> &[F] {
    &self.values[self.values.len() - 1]
  }

  /// Returns the values of layer `i`; the inputs are layer `num_layers`.
  pub fn layer(&self, i: usize) -> &[F] {
    &self.values[i]
  }
}
