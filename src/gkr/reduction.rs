//! Claim reduction: two claims `V(x*) = Vl`, `V(y*) = Vr` become one claim on the line through them.
//!
//! With `ℓ(t) = x* + t·(y* - x*)` and `h = V ∘ ℓ`, a univariate of degree at most `n`,
//! the prover sends `h(k)` for `k = 2..=max(n, 1)`. Together with `h(0) = Vl` and `h(1) = Vr`
//! these fix `h`, and after a challenge `t` the next claim is `V(ℓ(t)) = h(t)`.
//!
//! The prover, the native verifier and the circuit verifier all take the node count and the
//! Lagrange denominators from here.
use crate::{errors::GkrError, polys::univariate::div_f};
use ff::PrimeField;
use itertools::izip;

/// Degree bound of `h` for a layer in `num_vars` variables, the last interpolation node.
pub fn line_degree(num_vars: usize) -> usize {
  num_vars.max(1)
}

/// Number of values `h(2), ..., h(line_degree)` the prover sends.
pub fn num_line_evals(num_vars: usize) -> usize {
  line_degree(num_vars) - 1
}

/// Returns `x + t·(y - x)`.
pub fn line_point<F: PrimeField>(x: &[F], y: &[F], t: &F) -> Vec<F> {
  x.iter()
    .zip(y.iter())
    .map(|(x_i, y_i)| *x_i + *t * (*y_i - x_i))
    .collect()
}

/// Inverses of `Π_{j≠k} (k - j)` over the nodes `0..=degree`.
pub fn lagrange_denominator_inverses<F: PrimeField>(degree: usize) -> Result<Vec<F>, GkrError> {
  (0..=degree)
    .map(|k| {
      let denom = (0..=degree)
        .filter(|j| *j != k)
        .map(|j| F::from(k as u64) - F::from(j as u64))
        .product::<F>();
      div_f(F::ONE, denom)
    })
    .collect()
}

/// Evaluates at `t` the polynomial taking `evals[k]` at node `k`.
pub fn interpolate<F: PrimeField>(evals: &[F], t: &F) -> Result<F, GkrError> {
  if evals.is_empty() {
    return Err(GkrError::InvalidInputLength {
      reason: "cannot interpolate from zero evaluations".to_string(),
    });
  }
  let degree = evals.len() - 1;
  let diffs = (0..=degree)
    .map(|j| *t - F::from(j as u64))
    .collect::<Vec<_>>();
  let inv_denoms = lagrange_denominator_inverses::<F>(degree)?;

  Ok(
    izip!(0..=degree, evals, inv_denoms)
      .map(|(k, e, inv)| {
        let numer = diffs
          .iter()
          .enumerate()
          .filter(|(j, _)| *j != k)
          .map(|(_, d)| *d)
          .product::<F>();
        *e * numer * inv
      })
      .sum(),
  )
}

/// Reduces `(x*, Vl)`, `(y*, Vr)` to `(ℓ(t), h(t))`.
pub fn reduce<F: PrimeField>(
  vl: &F,
  vr: &F,
  line_evals: &[F],
  x: &[F],
  y: &[F],
  t: &F,
) -> Result<(Vec<F>, F), GkrError> {
  if x.len() != y.len() || line_evals.len() != num_line_evals(x.len()) {
    return Err(GkrError::MalformedProof {
      reason: format!(
        "expected {} line evaluations for {} variables, got {}",
        num_line_evals(x.len()),
        x.len(),
        line_evals.len()
      ),
    });
  }
  let evals = [*vl, *vr]
    .into_iter()
    .chain(line_evals.iter().copied())
    .collect::<Vec<_>>();
  Ok((line_point(x, y, t), interpolate(&evals, t)?))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{polys::multilinear::MultilinearPolynomial, provider::bn254::bn254::Scalar};
  use ff::Field;
  use rand::{SeedableRng, rngs::StdRng};

  #[test]
  fn test_interpolate_matches_polynomial() {
    // h(t) = t^3 - 2t + 5
    let h = |t: Scalar| t * t * t - Scalar::from(2u64) * t + Scalar::from(5u64);
    let evals = (0..4u64).map(|k| h(Scalar::from(k))).collect::<Vec<_>>();
    let t = Scalar::from(11u64);
    assert_eq!(interpolate(&evals, &t).unwrap(), h(t));
    // at a node the weights are an indicator
    assert_eq!(interpolate(&evals, &Scalar::from(2u64)).unwrap(), evals[2]);
  }

  #[test]
  fn test_denominators() {
    // nodes 0, 1, 2: (0-1)(0-2) = 2, (1-0)(1-2) = -1, (2-0)(2-1) = 2
    let inv = lagrange_denominator_inverses::<Scalar>(2).unwrap();
    assert_eq!(inv[0] * Scalar::from(2u64), Scalar::ONE);
    assert_eq!(inv[1], -Scalar::ONE);
    assert_eq!(inv[2] * Scalar::from(2u64), Scalar::ONE);
  }

  #[test]
  fn test_reduce_gives_true_evaluation() {
    let mut rng = StdRng::seed_from_u64(8);
    for n in 0..5usize {
      let poly = MultilinearPolynomial::new((0..1 << n).map(|_| Scalar::random(&mut rng)).collect());
      let x = (0..n).map(|_| Scalar::random(&mut rng)).collect::<Vec<_>>();
      let y = (0..n).map(|_| Scalar::random(&mut rng)).collect::<Vec<_>>();
      let line_evals = (2..=line_degree(n))
        .map(|k| poly.evaluate(&line_point(&x, &y, &Scalar::from(k as u64))))
        .collect::<Vec<_>>();
      let t = Scalar::random(&mut rng);

      let (q, v) = reduce(&poly.evaluate(&x), &poly.evaluate(&y), &line_evals, &x, &y, &t).unwrap();
      assert_eq!(q, line_point(&x, &y, &t));
      assert_eq!(v, poly.evaluate(&q));
    }
  }

  #[test]
  fn test_reduce_rejects_wrong_count() {
    let x = vec![Scalar::ONE; 3];
    let res = reduce(&Scalar::ONE, &Scalar::ONE, &[Scalar::ONE], &x, &x, &Scalar::ONE);
    assert!(matches!(res, Err(GkrError::MalformedProof { .. })));
  }
}
