//! Field arithmetic over `AllocatedNum`, one constraint per operation.
//!
//! Every helper takes its constraint system by value, so callers pass `cs.namespace(..)`
//! with a name unique within the enclosing scope.
use bellpepper_core::{ConstraintSystem, LinearCombination, SynthesisError, num::AllocatedNum};
use ff::PrimeField;

fn value_of<F: PrimeField>(a: &AllocatedNum<F>) -> Result<F, SynthesisError> {
  a.get_value().ok_or(SynthesisError::AssignmentMissing)
}

/// Allocates `value` and pins it with a constraint.
pub fn alloc_constant<F: PrimeField, CS: ConstraintSystem<F>>(
  mut cs: CS,
  value: F,
) -> Result<AllocatedNum<F>, SynthesisError> {
  let x = AllocatedNum::alloc(cs.namespace(|| "value"), || Ok(value))?;
  cs.enforce(
    || "value is constant",
    |lc| lc + x.get_variable(),
    |lc| lc + CS::one(),
    |lc| lc + (value, CS::one()),
  );
  Ok(x)
}

/// Allocates `constant + Σ coeff_i · term_i`.
pub fn linear_combination<F: PrimeField, CS: ConstraintSystem<F>>(
  mut cs: CS,
  terms: &[(F, &AllocatedNum<F>)],
  constant: F,
) -> Result<AllocatedNum<F>, SynthesisError> {
  let res = AllocatedNum::alloc(cs.namespace(|| "lc"), || {
    terms.iter().try_fold(constant, |acc, (coeff, term)| {
      Ok(acc + *coeff * value_of(term)?)
    })
  })?;
  let lc = terms
    .iter()
    .fold(LinearCombination::zero() + (constant, CS::one()), |lc, (coeff, term)| {
      lc + (*coeff, term.get_variable())
    });
  cs.enforce(
    || "lc is correct",
    |_| lc,
    |lc| lc + CS::one(),
    |lc| lc + res.get_variable(),
  );
  Ok(res)
}

/// Allocates `a + b`.
pub fn add<F: PrimeField, CS: ConstraintSystem<F>>(
  cs: CS,
  a: &AllocatedNum<F>,
  b: &AllocatedNum<F>,
) -> Result<AllocatedNum<F>, SynthesisError> {
  linear_combination(cs, &[(F::ONE, a), (F::ONE, b)], F::ZERO)
}

/// Allocates `a - b`.
pub fn sub<F: PrimeField, CS: ConstraintSystem<F>>(
  cs: CS,
  a: &AllocatedNum<F>,
  b: &AllocatedNum<F>,
) -> Result<AllocatedNum<F>, SynthesisError> {
  linear_combination(cs, &[(F::ONE, a), (-F::ONE, b)], F::ZERO)
}

/// Allocates `Σ terms`.
pub fn sum<F: PrimeField, CS: ConstraintSystem<F>>(
  cs: CS,
  terms: &[AllocatedNum<F>],
) -> Result<AllocatedNum<F>, SynthesisError> {
  let weighted = terms.iter().map(|t| (F::ONE, t)).collect::<Vec<_>>();
  linear_combination(cs, &weighted, F::ZERO)
}

/// Allocates `a · b`.
pub fn mul<F: PrimeField, CS: ConstraintSystem<F>>(
  mut cs: CS,
  a: &AllocatedNum<F>,
  b: &AllocatedNum<F>,
) -> Result<AllocatedNum<F>, SynthesisError> {
  let res = AllocatedNum::alloc(cs.namespace(|| "product"), || {
    Ok(value_of(a)? * value_of(b)?)
  })?;
  cs.enforce(
    || "product is correct",
    |lc| lc + a.get_variable(),
    |lc| lc + b.get_variable(),
    |lc| lc + res.get_variable(),
  );
  Ok(res)
}

/// Allocates `a + t · (b - a)`.
pub fn lerp<F: PrimeField, CS: ConstraintSystem<F>>(
  mut cs: CS,
  a: &AllocatedNum<F>,
  b: &AllocatedNum<F>,
  t: &AllocatedNum<F>,
) -> Result<AllocatedNum<F>, SynthesisError> {
  let res = AllocatedNum::alloc(cs.namespace(|| "lerp"), || {
    let (a, b, t) = (value_of(a)?, value_of(b)?, value_of(t)?);
    Ok(a + t * (b - a))
  })?;
  // t * (b - a) = res - a
  cs.enforce(
    || "lerp is correct",
    |lc| lc + t.get_variable(),
    |lc| lc + b.get_variable() - a.get_variable(),
    |lc| lc + res.get_variable() - a.get_variable(),
  );
  Ok(res)
}

/// Enforces `a == b`.
pub fn enforce_equal<F: PrimeField, CS: ConstraintSystem<F>>(
  mut cs: CS,
  a: &AllocatedNum<F>,
  b: &AllocatedNum<F>,
) {
  cs.enforce(
    || "a == b",
    |lc| lc + a.get_variable(),
    |lc| lc + CS::one(),
    |lc| lc + b.get_variable(),
  );
}

/// Evaluates the polynomial with coefficients `coeffs` (lowest degree first) at `x`.
pub fn horner<F: PrimeField, CS: ConstraintSystem<F>>(
  mut cs: CS,
  coeffs: &[AllocatedNum<F>],
  x: &AllocatedNum<F>,
) -> Result<AllocatedNum<F>, SynthesisError> {
  let (top, rest) = coeffs.split_last().ok_or(SynthesisError::Unsatisfiable)?;
  let mut acc = top.clone();
  for (i, c) in rest.iter().enumerate().rev() {
    let next = AllocatedNum::alloc(cs.namespace(|| format!("acc_{i}")), || {
      Ok(value_of(&acc)? * value_of(x)? + value_of(c)?)
    })?;
    // acc * x = next - c
    cs.enforce(
      || format!("horner step {i}"),
      |lc| lc + acc.get_variable(),
      |lc| lc + x.get_variable(),
      |lc| lc + next.get_variable() - c.get_variable(),
    );
    acc = next;
  }
  Ok(acc)
}

/// Allocates `x^e` by square-and-multiply; `e` must be at least one.
pub fn pow<F: PrimeField, CS: ConstraintSystem<F>>(
  mut cs: CS,
  x: &AllocatedNum<F>,
  e: u64,
) -> Result<AllocatedNum<F>, SynthesisError> {
  if e == 0 {
    return Err(SynthesisError::Unsatisfiable);
  }
  let bits = u64::BITS - e.leading_zeros();
  let mut acc = x.clone();
  for i in (0..bits - 1).rev() {
    acc = mul(cs.namespace(|| format!("square_{i}")), &acc, &acc)?;
    if (e >> i) & 1 == 1 {
      acc = mul(cs.namespace(|| format!("times_x_{i}")), &acc, x)?;
    }
  }
  Ok(acc)
}

/// Builds the table of `eq(r, e)` over the hypercube, with `r[i]` paired with bit `i` of `e`.
pub fn eq_table<F: PrimeField, CS: ConstraintSystem<F>>(
  mut cs: CS,
  r: &[AllocatedNum<F>],
) -> Result<Vec<AllocatedNum<F>>, SynthesisError> {
  let mut evals = vec![alloc_constant(cs.namespace(|| "one"), F::ONE)?];
  for (i, r_i) in r.iter().enumerate() {
    let mut hi = Vec::with_capacity(evals.len());
    for (j, e) in evals.iter_mut().enumerate() {
      let y = mul(cs.namespace(|| format!("hi_{i}_{j}")), e, r_i)?;
      *e = sub(cs.namespace(|| format!("lo_{i}_{j}")), e, &y)?;
      hi.push(y);
    }
    evals.extend(hi);
  }
  Ok(evals)
}

/// Evaluates the multilinear extension of `evals` at `point`, folding variable 0 first.
pub fn mle_evaluate<F: PrimeField, CS: ConstraintSystem<F>>(
  mut cs: CS,
  evals: &[AllocatedNum<F>],
  point: &[AllocatedNum<F>],
) -> Result<AllocatedNum<F>, SynthesisError> {
  if evals.len() != 1 << point.len() {
    return Err(SynthesisError::Unsatisfiable);
  }
  let mut cur = evals.to_vec();
  for (i, r) in point.iter().enumerate() {
    cur = cur
      .chunks_exact(2)
      .enumerate()
      .map(|(j, pair)| lerp(cs.namespace(|| format!("fold_{i}_{j}")), &pair[0], &pair[1], r))
      .collect::<Result<Vec<_>, _>>()?;
  }
  Ok(cur[0].clone())
}
