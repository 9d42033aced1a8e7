// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the Spartan2 project.
// See the LICENSE file in the project root for full license information.
// Source repository: https://github.com/Microsoft/Spartan2

//! demos/gkr_mimc.rs
//!
//! Proves and verifies a layered circuit of MiMC-style rounds `(u + v + c)^5`, natively and
//! with the R1CS verifier circuit.
//!
//! Run with:
//!   RUST_LOG=info cargo run --release --example gkr_mimc
use spartan2_gkr::{
  gkr::{
    GKRProof, commit_inputs,
    circuit::{Circuit, Gate, Layer, Wiring},
    setup,
    verifier_circuit::GKRVerifierCircuit,
  },
  provider::Bn254Engine,
  traits::Engine,
};
use std::{sync::Arc, time::Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

type E = Bn254Engine;
type F = <E as Engine>::Scalar;

const NUM_VARS: usize = 4;
const NUM_ROUNDS: u64 = 8;

fn mimc_circuit() -> Circuit<F> {
  let width = 1usize << NUM_VARS;
  // each lane mixes with its neighbour
  let rotate = (0..width).map(|g| (g + 1) % width).collect::<Vec<_>>();
  let layers = (0..NUM_ROUNDS)
    .map(|i| {
      Layer::new(
        NUM_VARS,
        Gate::AddConstPow {
          constant: F::from(0x9e37_79b9 + i),
          exponent: 5,
        },
        Wiring::Permutation(rotate.clone()),
      )
    })
    .collect();
  // circuit shape is fixed above
  Circuit::new(layers, NUM_VARS).expect("valid circuit")
}

fn main() {
  tracing_subscriber::fmt()
    .with_target(false)
    .with_ansi(false)
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let circuit = mimc_circuit();
  info!(
    layers = circuit.num_layers(),
    width = 1usize << NUM_VARS,
    digest = %hex::encode(circuit.digest().expect("digest")),
    "circuit"
  );

  let t0 = Instant::now();
  let (pk, vk) = setup::<E>(&circuit);
  let inputs = (0..1u64 << NUM_VARS).map(F::from).collect::<Vec<_>>();
  let comm = commit_inputs(&pk, &inputs).expect("commit");
  let assignment = circuit.evaluate(&inputs).expect("evaluate");
  info!(elapsed_ms = %t0.elapsed().as_millis(), "setup_and_evaluate");

  let q0 = (0..NUM_VARS as u64).map(|i| F::from(7 * i + 1)).collect::<Vec<_>>();
  let t0 = Instant::now();
  let proof = GKRProof::<E>::prove(&pk, &circuit, &assignment, &comm, &q0).expect("prove");
  info!(elapsed_ms = %t0.elapsed().as_millis(), "prove");

  let proof_len = bincode::serialize(&proof).expect("serialize").len();
  info!(proof_bytes = proof_len, "proof_size");

  let t0 = Instant::now();
  proof
    .verify(&vk, &circuit, assignment.outputs(), &comm, &q0)
    .expect("native verification");
  info!(elapsed_ms = %t0.elapsed().as_millis(), "verify");

  let t0 = Instant::now();
  GKRVerifierCircuit::new(
    Arc::new(circuit),
    q0,
    assignment.outputs().to_vec(),
    comm,
    proof,
  )
  .and_then(|c| c.check())
  .expect("in-circuit verification");
  info!(elapsed_ms = %t0.elapsed().as_millis(), "verify_in_circuit");
}
