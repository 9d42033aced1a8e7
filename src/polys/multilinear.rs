// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the Spartan2 project.
// See the LICENSE file in the project root for full license information.
// Source repository: https://github.com/Microsoft/Spartan2

//! `MultilinearPolynomial`: Dense representation of multilinear polynomials, represented by evaluations over all possible binary inputs.

use crate::math::Math;
use core::ops::Index;
use ff::PrimeField;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Below this many entries a fold is cheaper on one thread.
const PAR_FOLD_THRESHOLD: usize = 1 << 10;

/// A multilinear extension of a polynomial $Z(\cdot)$, denote it as $\tilde{Z}(x_1, ..., x_m)$
/// where the degree of each variable is at most one.
///
/// This is the dense representation of a multilinear polynomial.
/// Let it be $\mathbb{G}(\cdot): \mathbb{F}^m \rightarrow \mathbb{F}$, it can be represented uniquely by the list of
/// evaluations of $\mathbb{G}(\cdot)$ over the Boolean hypercube $\{0, 1\}^m$.
///
/// The implementation follows
/// $$
/// \tilde{Z}(x_1, ..., x_m) = \sum_{e\in {0,1}^m}Z(e) \cdot \prod_{i=1}^m(x_i \cdot e_i + (1-x_i) \cdot (1-e_i))
/// $$
///
/// Vector $Z$ indicates $Z(e)$ where $e$ ranges from $0$ to $2^m-1$, and bit `i` of the index
/// is the value of variable `i`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MultilinearPolynomial<Scalar: PrimeField> {
  num_vars: usize,  // the number of variables in the multilinear polynomial
  pub(crate) Z: Vec<Scalar>, // evaluations of the polynomial in all the 2^num_vars Boolean inputs
}

impl<Scalar: PrimeField> MultilinearPolynomial<Scalar> {
  /// Creates a new `MultilinearPolynomial` from the given evaluations.
  ///
  /// # Panics
  /// The number of evaluations must be a power of two.
  pub fn new(Z: Vec<Scalar>) -> Self {
    assert!(
      Z.len().is_power_of_two(),
      "number of evaluations must be a power of two"
    );
    MultilinearPolynomial {
      num_vars: Z.len().log_2(),
      Z,
    }
  }

  /// Returns the number of variables in the multilinear polynomial
  pub const fn get_num_vars(&self) -> usize {
    self.num_vars
  }

  /// Returns the total number of evaluations.
  pub fn len(&self) -> usize {
    self.Z.len()
  }

  /// Returns true if no evaluations are stored.
  pub fn is_empty(&self) -> bool {
    self.Z.is_empty()
  }

  /// Returns the evaluations over the hypercube.
  pub fn evaluations(&self) -> &[Scalar] {
    &self.Z
  }

  /// Binds variable 0 to `r`, consuming the polynomial and returning one in `num_vars - 1` variables.
  ///
  /// Formula: new[i] = (1 - r) * old[2i] + r * old[2i + 1]
  pub fn fold(mut self, r: &Scalar) -> Self {
    self.bind(r);
    self
  }

  /// In-place variant of [`Self::fold`], for buffers held exclusively by the caller.
  pub fn bind(&mut self, r: &Scalar) {
    assert!(
      self.num_vars > 0,
      "cannot bind a variable of a constant polynomial"
    );
    self.Z = fold_evals(&self.Z, r);
    self.num_vars -= 1;
  }

  /// Evaluates the polynomial at the given point by folding once per coordinate.
  pub fn evaluate(&self, r: &[Scalar]) -> Scalar {
    assert_eq!(r.len(), self.get_num_vars());
    Self::evaluate_with(&self.Z, r)
  }

  /// Evaluates the multilinear extension of `Z` at `r` without building a polynomial.
  pub fn evaluate_with(Z: &[Scalar], r: &[Scalar]) -> Scalar {
    assert_eq!(Z.len(), 1 << r.len());
    match r.split_first() {
      None => Z[0],
      Some((r0, rest)) => {
        let mut cur = fold_evals(Z, r0);
        for r_i in rest {
          cur = fold_evals(&cur, r_i);
        }
        cur[0]
      }
    }
  }
}

/// Halves `Z` by linear interpolation along variable 0.
pub(crate) fn fold_evals<Scalar: PrimeField>(Z: &[Scalar], r: &Scalar) -> Vec<Scalar> {
  let interpolate = |pair: &[Scalar]| pair[0] + *r * (pair[1] - pair[0]);
  if Z.len() >= PAR_FOLD_THRESHOLD {
    Z.par_chunks_exact(2).map(interpolate).collect()
  } else {
    Z.chunks_exact(2).map(interpolate).collect()
  }
}

impl<Scalar: PrimeField> Index<usize> for MultilinearPolynomial<Scalar> {
  type Output = Scalar;

  #[inline(always)]
  fn index(&self, _index: usize) -> &Scalar {
    &(self.Z[_index])
  }
}
