//! Univariate polynomials in coefficient form, as sent in sum-check rounds.
use crate::{errors::GkrError, traits::transcript::TranscriptReprTrait};
use ff::PrimeField;
use serde::{Deserialize, Serialize};

/// `c_0 + c_1·X + ... + c_d·X^d`, stored as `[c_0, ..., c_d]`.
///
/// A round message of degree `d` always carries `d + 1` coefficients, even when the leading
/// ones vanish, so its length fixes the degree the verifier checks against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniPoly<Scalar: PrimeField> {
  pub(crate) coeffs: Vec<Scalar>,
}

impl<Scalar: PrimeField> UniPoly<Scalar> {
  /// Wraps coefficients given lowest degree first.
  pub fn from_coeffs(coeffs: Vec<Scalar>) -> Self {
    Self { coeffs }
  }

  /// Interpolates the unique polynomial of degree `< evals.len()` with `p(k) = evals[k]`.
  ///
  /// Builds the Newton divided differences over the nodes `0..n`, then expands the Newton
  /// form into monomials from the innermost term outwards.
  pub fn from_evals(evals: &[Scalar]) -> Result<Self, GkrError> {
    let n = evals.len();
    if n == 0 {
      return Err(GkrError::InvalidInputLength {
        reason: "cannot interpolate from zero evaluations".to_string(),
      });
    }

    // nodes k apart differ by k
    let mut diffs = evals.to_vec();
    for k in 1..n {
      let inv_k = div_f(Scalar::ONE, Scalar::from(k as u64))?;
      for i in (k..n).rev() {
        diffs[i] = (diffs[i] - diffs[i - 1]) * inv_k;
      }
    }

    // Horner on the Newton form: p <- p·(X - k) + diffs[k], for k = n-2 down to 0
    let mut coeffs = vec![Scalar::ZERO; n];
    coeffs[0] = diffs[n - 1];
    for k in (0..n - 1).rev() {
      let node = Scalar::from(k as u64);
      let len = n - 1 - k;
      for j in (1..=len).rev() {
        coeffs[j] = coeffs[j - 1] - node * coeffs[j];
      }
      coeffs[0] = diffs[k] - node * coeffs[0];
    }

    Ok(Self { coeffs })
  }

  /// Number of coefficients minus one.
  pub fn degree(&self) -> usize {
    self.coeffs.len() - 1
  }

  /// Coefficients, lowest degree first.
  pub fn coeffs(&self) -> &[Scalar] {
    &self.coeffs
  }

  /// `p(0)`, the constant term.
  pub fn eval_at_zero(&self) -> Scalar {
    self.coeffs[0]
  }

  /// `p(1)`, the sum of the coefficients.
  pub fn eval_at_one(&self) -> Scalar {
    self.coeffs.iter().sum()
  }

  /// `p(r)` by Horner's rule.
  pub fn evaluate(&self, r: &Scalar) -> Scalar {
    self
      .coeffs
      .iter()
      .rfold(Scalar::ZERO, |acc, c| acc * r + c)
  }
}

impl<Scalar: PrimeField> TranscriptReprTrait<Scalar> for UniPoly<Scalar> {
  fn to_transcript_scalars(&self) -> Vec<Scalar> {
    self.coeffs.clone()
  }
}

/// `a / b` in the field.
///
/// # Errors
/// Returns `GkrError::DivisionByZero` when `b` is zero.
pub fn div_f<F: PrimeField>(a: F, b: F) -> Result<F, GkrError> {
  Option::<F>::from(b.invert())
    .map(|inv| a * inv)
    .ok_or(GkrError::DivisionByZero)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::provider::{bn254::bn254, pasta::pallas};
  use ff::Field;
  use rand::{SeedableRng, rngs::StdRng};

  fn scalars<F: PrimeField>(xs: &[u64]) -> Vec<F> {
    xs.iter().map(|x| F::from(*x)).collect()
  }

  fn check_known_coeffs_with<F: PrimeField>() {
    // 5 + 4X + 3X^2 + 2X^3 + X^4 sampled at 0..5
    let p = UniPoly::from_evals(&scalars::<F>(&[5, 15, 57, 179, 453])).unwrap();
    assert_eq!(p.coeffs(), scalars::<F>(&[5, 4, 3, 2, 1]).as_slice());
    assert_eq!(p.degree(), 4);
    assert_eq!(p.evaluate(&F::from(5)), F::from(975));

    // 1 + 3X + 2X^2, the shape of a product-gate round message
    let q = UniPoly::from_evals(&scalars::<F>(&[1, 6, 15])).unwrap();
    assert_eq!(q.coeffs(), scalars::<F>(&[1, 3, 2]).as_slice());
    assert_eq!(q.eval_at_zero() + q.eval_at_one(), F::from(7));
  }

  #[test]
  fn test_known_coeffs() {
    check_known_coeffs_with::<pallas::Scalar>();
    check_known_coeffs_with::<bn254::Scalar>();
  }

  #[test]
  fn test_interpolation_reproduces_random_polynomial() {
    let mut rng = StdRng::seed_from_u64(17);
    for degree in 0..6 {
      let coeffs: Vec<pallas::Scalar> =
        (0..=degree).map(|_| pallas::Scalar::random(&mut rng)).collect();
      let p = UniPoly::from_coeffs(coeffs.clone());
      let evals: Vec<_> = (0..=degree as u64)
        .map(|k| p.evaluate(&pallas::Scalar::from(k)))
        .collect();
      let q = UniPoly::from_evals(&evals).unwrap();
      assert_eq!(q.coeffs(), coeffs.as_slice());
    }
  }

  #[test]
  fn test_vanishing_leading_coeffs_are_kept() {
    // a linear polynomial sent as a cubic round message
    let p = UniPoly::from_evals(&scalars::<pallas::Scalar>(&[2, 3, 4, 5])).unwrap();
    assert_eq!(p.degree(), 3);
    assert_eq!(p.coeffs(), scalars::<pallas::Scalar>(&[2, 1, 0, 0]).as_slice());
  }

  #[test]
  fn test_single_eval_is_constant() {
    let p = UniPoly::from_evals(&[pallas::Scalar::from(9)]).unwrap();
    assert_eq!(p.degree(), 0);
    assert_eq!(p.evaluate(&pallas::Scalar::from(1234)), pallas::Scalar::from(9));
  }

  #[test]
  fn test_empty_and_zero_divisor_fail() {
    assert!(matches!(
      UniPoly::<pallas::Scalar>::from_evals(&[]),
      Err(GkrError::InvalidInputLength { .. })
    ));
    assert_eq!(
      div_f(pallas::Scalar::ONE, pallas::Scalar::ZERO),
      Err(GkrError::DivisionByZero)
    );
  }
}
