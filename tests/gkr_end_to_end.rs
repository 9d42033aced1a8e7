use spartan2_gkr::{
  errors::GkrError,
  gkr::{
    GKRProof, commit_inputs,
    circuit::{Circuit, Gate, Layer, Wiring},
    setup,
    verifier_circuit::GKRVerifierCircuit,
  },
  provider::{Bn254Engine, Bn254HashMleEngine, VestaEngine, mimc::MimcTranscript},
  traits::{Engine, pcs::PCSCircuitTrait},
};
use std::sync::Arc;

/// ((a·b)·(c·d))
fn product_tree<F: ff::PrimeField>() -> Circuit<F> {
  Circuit::new(
    vec![
      Layer::new(0, Gate::Mul, Wiring::Dense(vec![(0, 1)])),
      Layer::new(1, Gate::Mul, Wiring::Dense(vec![(0, 1), (2, 3)])),
    ],
    2,
  )
  .unwrap()
}

fn inputs<F: ff::PrimeField>() -> Vec<F> {
  [2u64, 3, 5, 7].into_iter().map(F::from).collect()
}

fn product_of_four_with<E>()
where
  E: Engine<TE = MimcTranscript<E>>,
  E::PCS: PCSCircuitTrait<E>,
{
  let circuit = product_tree::<E::Scalar>();
  let inputs = inputs::<E::Scalar>();
  let (pk, vk) = setup::<E>(&circuit);
  let comm = commit_inputs(&pk, &inputs).unwrap();
  let assignment = circuit.evaluate(&inputs).unwrap();
  assert_eq!(assignment.outputs(), &[E::Scalar::from(210u64)]);

  let proof = GKRProof::<E>::prove(&pk, &circuit, &assignment, &comm, &[]).unwrap();
  assert_eq!(proof.layers().len(), 2);

  let good = vec![E::Scalar::from(210u64)];
  let bad = vec![E::Scalar::from(211u64)];
  assert_eq!(proof.verify(&vk, &circuit, &good, &comm, &[]), Ok(()));
  assert!(proof.verify(&vk, &circuit, &bad, &comm, &[]).is_err());

  let circuit = Arc::new(circuit);
  let check = |outputs: Vec<E::Scalar>| {
    GKRVerifierCircuit::new(circuit.clone(), vec![], outputs, comm.clone(), proof.clone())
      .unwrap()
      .check()
  };
  assert_eq!(check(good), Ok(()));
  assert!(matches!(check(bad), Err(GkrError::UnSat { .. })));
}

#[test]
fn product_of_four() {
  product_of_four_with::<Bn254Engine>();
  product_of_four_with::<VestaEngine>();
}

#[test]
fn product_of_four_with_merkle_commitment() {
  type E = Bn254HashMleEngine;
  let circuit = product_tree::<<E as Engine>::Scalar>();
  let inputs = inputs();
  let (pk, vk) = setup::<E>(&circuit);
  let comm = commit_inputs(&pk, &inputs).unwrap();
  let assignment = circuit.evaluate(&inputs).unwrap();
  let proof = GKRProof::<E>::prove(&pk, &circuit, &assignment, &comm, &[]).unwrap();
  assert!(
    proof
      .verify(&vk, &circuit, assignment.outputs(), &comm, &[])
      .is_ok()
  );

  // a commitment to other inputs does not open to the proven claim
  let reversed = inputs.iter().rev().copied().collect::<Vec<_>>();
  let other = commit_inputs(&pk, &reversed).unwrap();
  assert!(
    proof
      .verify(&vk, &circuit, assignment.outputs(), &other, &[])
      .is_err()
  );
}

#[test]
fn mimc_layers() {
  // four rounds of (u + v + c)^5 over a lane of eight values
  type E = Bn254Engine;
  type F = <E as Engine>::Scalar;
  let layers = (0..4u64)
    .map(|i| {
      Layer::new(
        3,
        Gate::AddConstPow {
          constant: F::from(1000 + i),
          exponent: 5,
        },
        Wiring::Permutation(vec![1, 2, 3, 4, 5, 6, 7, 0]),
      )
    })
    .collect();
  let circuit = Circuit::new(layers, 3).unwrap();
  let inputs: Vec<F> = (0..8u64).map(F::from).collect();
  let (pk, vk) = setup::<E>(&circuit);
  let comm = commit_inputs(&pk, &inputs).unwrap();
  let assignment = circuit.evaluate(&inputs).unwrap();
  let q0 = vec![F::from(3u64), F::from(5u64), F::from(8u64)];
  let proof = GKRProof::<E>::prove(&pk, &circuit, &assignment, &comm, &q0).unwrap();
  assert_eq!(
    proof.verify(&vk, &circuit, assignment.outputs(), &comm, &q0),
    Ok(())
  );
}
