use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spartan2_gkr::{
  errors::GkrError,
  polys::multilinear::MultilinearPolynomial,
  provider::Bn254HashMleEngine as E,
  provider::pcs::merkle_mle_pc::HashMlePCS,
  traits::{Engine, pcs::PCSEngineTrait, transcript::TranscriptEngineTrait},
};

type PCS = HashMlePCS<E>;
type F = <E as Engine>::Scalar;

fn rs(rng: &mut StdRng) -> F {
  F::from(rng.r#gen::<u64>())
}

#[test]
fn mle_roundtrip_fixed() {
  let m = 5usize;
  let n = 1usize << m;
  let mut rng = StdRng::seed_from_u64(7);
  let poly: Vec<F> = (0..n).map(|_| rs(&mut rng)).collect();
  let point: Vec<F> = (0..m).map(|_| rs(&mut rng)).collect();

  let (ck, vk) = <PCS as PCSEngineTrait<E>>::setup(b"t", n);
  let com = <PCS as PCSEngineTrait<E>>::commit(&ck, &poly).unwrap();

  let mut tp = <E as Engine>::TE::new(b"t");
  let (eval, arg) = <PCS as PCSEngineTrait<E>>::prove(&ck, &mut tp, &com, &poly, &point).unwrap();

  let mut tv = <E as Engine>::TE::new(b"t");
  <PCS as PCSEngineTrait<E>>::verify(&vk, &mut tv, &com, &point, &eval, &arg).unwrap();

  assert_eq!(eval, MultilinearPolynomial::new(poly).evaluate(&point));
}

#[test]
fn mle_rejects_wrong_value() {
  let m = 4usize;
  let n = 1usize << m;
  let mut rng = StdRng::seed_from_u64(9);
  let poly: Vec<F> = (0..n).map(|_| rs(&mut rng)).collect();
  let point: Vec<F> = (0..m).map(|_| rs(&mut rng)).collect();

  let (ck, vk) = <PCS as PCSEngineTrait<E>>::setup(b"t", n);
  let com = <PCS as PCSEngineTrait<E>>::commit(&ck, &poly).unwrap();
  let mut tp = <E as Engine>::TE::new(b"t");
  let (eval, arg) = <PCS as PCSEngineTrait<E>>::prove(&ck, &mut tp, &com, &poly, &point).unwrap();

  let mut tv = <E as Engine>::TE::new(b"t");
  let res = <PCS as PCSEngineTrait<E>>::verify(&vk, &mut tv, &com, &point, &(eval + F::from(1)), &arg);
  assert!(matches!(res, Err(GkrError::CommitmentVerificationFailure { .. })));
}

#[test]
fn mle_batch_roundtrip() {
  let m = 3usize;
  let n = 1usize << m;
  let mut rng = StdRng::seed_from_u64(21);
  let polys: Vec<Vec<F>> = (0..3)
    .map(|_| (0..n).map(|_| rs(&mut rng)).collect())
    .collect();
  let point: Vec<F> = (0..m).map(|_| rs(&mut rng)).collect();

  let (ck, vk) = <PCS as PCSEngineTrait<E>>::setup(b"b", n);
  let comms = polys
    .iter()
    .map(|p| <PCS as PCSEngineTrait<E>>::commit(&ck, p).unwrap())
    .collect::<Vec<_>>();

  let mut tp = <E as Engine>::TE::new(b"b");
  let (evals, arg) =
    <PCS as PCSEngineTrait<E>>::batch_prove(&ck, &mut tp, &comms, &polys, &point).unwrap();
  for (p, e) in polys.iter().zip(evals.iter()) {
    assert_eq!(*e, MultilinearPolynomial::new(p.clone()).evaluate(&point));
  }

  let mut tv = <E as Engine>::TE::new(b"b");
  assert!(<PCS as PCSEngineTrait<E>>::batch_verify(&vk, &mut tv, &comms, &point, &evals, &arg).is_ok());

  let mut bad = evals.clone();
  bad[1] += F::from(1);
  let mut tv = <E as Engine>::TE::new(b"b");
  assert!(<PCS as PCSEngineTrait<E>>::batch_verify(&vk, &mut tv, &comms, &point, &bad, &arg).is_err());
}

proptest! {
  #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
  #[test]
  fn mle_roundtrip_random(m in 1usize..=5, seed in any::<u64>()) {
    let n = 1usize << m;
    let mut rng = StdRng::seed_from_u64(seed);
    let poly: Vec<F> = (0..n).map(|_| rs(&mut rng)).collect();
    let point: Vec<F> = (0..m).map(|_| rs(&mut rng)).collect();

    let (ck, vk) = <PCS as PCSEngineTrait<E>>::setup(b"p", n);
    let com = <PCS as PCSEngineTrait<E>>::commit(&ck, &poly).unwrap();

    let mut tp = <E as Engine>::TE::new(b"p");
    let (eval, arg) = <PCS as PCSEngineTrait<E>>::prove(&ck, &mut tp, &com, &poly, &point).unwrap();

    let mut tv = <E as Engine>::TE::new(b"p");
    prop_assert!(<PCS as PCSEngineTrait<E>>::verify(&vk, &mut tv, &com, &point, &eval, &arg).is_ok());
  }
}

#[test]
fn commit_rejects_non_power_of_two() {
  let n = 12usize;
  let (ck, _vk) = <PCS as PCSEngineTrait<E>>::setup(b"x", n);
  let poly: Vec<F> = (0..n).map(|i| F::from(i as u64)).collect();
  assert!(<PCS as PCSEngineTrait<E>>::commit(&ck, &poly).is_err());
}

#[test]
fn mle_rejects_opening_of_another_polynomial() {
  // the argument is honest for a polynomial that differs from the committed one in a
  // single entry, so every row combination and column it carries is self-consistent
  let m = 10usize;
  let n = 1usize << m;
  let mut rng = StdRng::seed_from_u64(33);
  let poly: Vec<F> = (0..n).map(|_| rs(&mut rng)).collect();
  let point: Vec<F> = (0..m).map(|_| rs(&mut rng)).collect();

  let (ck, vk) = <PCS as PCSEngineTrait<E>>::setup(b"swap", n);
  let com = <PCS as PCSEngineTrait<E>>::commit(&ck, &poly).unwrap();

  for j in [0usize, 1, 37, n - 1] {
    let mut other = poly.clone();
    other[j] += F::from(1);
    let other_com = <PCS as PCSEngineTrait<E>>::commit(&ck, &other).unwrap();
    let mut tp = <E as Engine>::TE::new(b"swap");
    let (other_eval, arg) =
      <PCS as PCSEngineTrait<E>>::prove(&ck, &mut tp, &other_com, &other, &point).unwrap();

    let mut tv = <E as Engine>::TE::new(b"swap");
    let res = <PCS as PCSEngineTrait<E>>::verify(&vk, &mut tv, &com, &point, &other_eval, &arg);
    assert!(
      matches!(res, Err(GkrError::CommitmentVerificationFailure { .. })),
      "opening of a polynomial differing at {j} accepted"
    );
  }
}
