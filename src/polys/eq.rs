// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the Spartan2 project.
// See the LICENSE file in the project root for full license information.
// Source repository: https://github.com/Microsoft/Spartan2

//! The equality polynomial `eq(r, b) = Π_i (r_i·b_i + (1 - r_i)(1 - b_i))`.
//!
//! Coordinate `i` of a point pairs with bit `i` of a hypercube index, least significant bit
//! first, matching [`crate::polys::multilinear::MultilinearPolynomial`].
use crate::math::Math;
use ff::PrimeField;
use rayon::prelude::*;

/// Tables at least this long are expanded on the rayon pool.
const PAR_EXPAND_THRESHOLD: usize = 1 << 10;

/// `eq(r, bit)` for a single coordinate.
#[inline]
pub(crate) fn eq_bit<F: PrimeField>(r: &F, bit: bool) -> F {
  if bit { *r } else { F::ONE - r }
}

/// `eq(r, ·)` for a fixed point `r`.
#[derive(Debug)]
pub struct EqPolynomial<Scalar: PrimeField> {
  r: Vec<Scalar>,
}

impl<Scalar: PrimeField> EqPolynomial<Scalar> {
  /// Fixes the first argument to `r`.
  pub const fn new(r: Vec<Scalar>) -> Self {
    EqPolynomial { r }
  }

  /// `eq(r, b)` for the hypercube point `b` with index `idx`.
  pub fn evaluate_at_index(&self, idx: usize) -> Scalar {
    self
      .r
      .iter()
      .enumerate()
      .map(|(i, r_i)| eq_bit(r_i, idx.get_bit(i)))
      .product()
  }

  /// The table `b -> eq(r, b)` over `{0,1}^|r|`.
  ///
  /// After absorbing `r_0..r_{i-1}` the table holds `2^i` entries; absorbing `r_i` splits
  /// entry `b` into `b` (bit `i` clear) and `b + 2^i` (bit `i` set).
  pub fn evals_from_points(r: &[Scalar]) -> Vec<Scalar> {
    let mut table = vec![Scalar::ZERO; 1 << r.len()];
    table[0] = Scalar::ONE;
    for (i, r_i) in r.iter().enumerate() {
      let (low, high) = table[..2 << i].split_at_mut(1 << i);
      let split = |(lo, hi): (&mut Scalar, &mut Scalar)| {
        *hi = *lo * r_i;
        *lo -= *hi;
      };
      if low.len() >= PAR_EXPAND_THRESHOLD {
        low.par_iter_mut().zip(high.par_iter_mut()).for_each(split);
      } else {
        low.iter_mut().zip(high.iter_mut()).for_each(split);
      }
    }
    table
  }
}
