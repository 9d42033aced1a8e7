// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the Spartan2 project.
// See the LICENSE file in the project root for full license information.
// Source repository: https://github.com/Microsoft/Spartan2

//! MiMC over the scalar field, in Miyaguchi-Preneel mode, and a Fiat-Shamir transcript built on it.
//!
//! The round function is an explicit [`HashStrategy`] fixed by each [`Engine`]: `x -> x^5`,
//! a permutation only when 5 is coprime to `p - 1`, or `x -> x^{-1}`, a permutation of every
//! prime field. `VestaEngine` uses the inverse map even though x^5 would also be valid there.
//! The in-circuit counterpart in [`crate::gadgets`] reads the same strategy and round constants.
use crate::{
  errors::GkrError,
  traits::{
    Engine, PrimeFieldExt,
    transcript::{TranscriptEngineTrait, TranscriptReprTrait},
  },
};
use digest::{ExtendableOutput, Update, XofReader};
use ff::Field;
use serde::{Deserialize, Serialize};
use sha3::Shake256;

/// Number of MiMC rounds used by [`Mimc::new`].
pub const MIMC_ROUNDS: usize = 91;

const ROUND_CONSTANTS_SEED: &[u8] = b"spartan2-gkr/mimc/round_constants";
const TRANSCRIPT_LABEL_SEED: &[u8] = b"spartan2-gkr/transcript/label";

/// The non-linear layer of a MiMC round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashStrategy {
  /// x -> x^5
  Pow5,
  /// x -> x^{-1}, with 0 mapped to 0
  Inverse,
}

/// The MiMC block cipher keyed by the chaining value, used as a compression function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mimc<F: PrimeFieldExt> {
  strategy: HashStrategy,
  constants: Vec<F>,
}

impl<F: PrimeFieldExt> Mimc<F> {
  /// Creates a hasher with the default number of rounds.
  pub fn new(strategy: HashStrategy) -> Self {
    Self::with_rounds(strategy, MIMC_ROUNDS)
  }

  /// Creates a hasher with `rounds` round constants derived from a fixed seed.
  pub fn with_rounds(strategy: HashStrategy, rounds: usize) -> Self {
    let mut shake = Shake256::default();
    shake.update(ROUND_CONSTANTS_SEED);
    let mut reader = shake.finalize_xof();
    let constants = (0..rounds)
      .map(|_| {
        let mut uniform_bytes = [0u8; 64];
        reader.read(&mut uniform_bytes);
        F::from_uniform(&uniform_bytes)
      })
      .collect();
    Self {
      strategy,
      constants,
    }
  }

  /// Returns the round function this hasher applies.
  pub fn strategy(&self) -> HashStrategy {
    self.strategy
  }

  /// Returns the round constants, one per round.
  pub fn constants(&self) -> &[F] {
    &self.constants
  }

  /// Applies the round function to `t`.
  pub fn round_function(&self, t: F) -> F {
    match self.strategy {
      HashStrategy::Pow5 => {
        let t2 = t.square();
        t2.square() * t
      }
      HashStrategy::Inverse => t.invert().unwrap_or(F::ZERO),
    }
  }

  /// Encrypts `msg` under `key`.
  pub fn encrypt(&self, key: &F, msg: &F) -> F {
    let x = self
      .constants
      .iter()
      .fold(*msg, |x, c| self.round_function(x + key + c));
    x + key
  }

  /// Miyaguchi-Preneel compression: `E_h(m) + h + m`.
  pub fn compress(&self, h: &F, m: &F) -> F {
    self.encrypt(h, m) + h + m
  }
}

/// Maps a transcript label to the field element absorbed in its place.
pub fn label_to_scalar<F: PrimeFieldExt>(label: &[u8]) -> F {
  let mut shake = Shake256::default();
  shake.update(TRANSCRIPT_LABEL_SEED);
  shake.update(label);
  let mut uniform_bytes = [0u8; 64];
  shake.finalize_xof().read(&mut uniform_bytes);
  F::from_uniform(&uniform_bytes)
}

/// A Fiat-Shamir transcript whose state is a single MiMC chaining value.
///
/// Every absorbed label and element, and every squeeze label, advances the state by one
/// compression. A challenge is the state right after its label is absorbed, so two squeezes
/// in a row never return the same value.
#[derive(Clone, Debug)]
pub struct MimcTranscript<E: Engine> {
  hasher: Mimc<E::Scalar>,
  state: E::Scalar,
}

impl<E: Engine> MimcTranscript<E> {
  fn absorb_scalar(&mut self, x: &E::Scalar) {
    self.state = self.hasher.compress(&self.state, x);
  }

  /// Returns the current chaining value.
  pub fn state(&self) -> E::Scalar {
    self.state
  }
}

impl<E: Engine> TranscriptEngineTrait<E> for MimcTranscript<E> {
  fn new(label: &'static [u8]) -> Self {
    let mut transcript = Self {
      hasher: Mimc::new(E::HASH_STRATEGY),
      state: E::Scalar::ZERO,
    };
    transcript.absorb_scalar(&label_to_scalar(label));
    transcript
  }

  fn squeeze(&mut self, label: &'static [u8]) -> Result<E::Scalar, GkrError> {
    self.absorb_scalar(&label_to_scalar(label));
    Ok(self.state)
  }

  fn absorb<T: TranscriptReprTrait<E::Scalar>>(&mut self, label: &'static [u8], o: &T) {
    self.absorb_scalar(&label_to_scalar(label));
    for x in o.to_transcript_scalars() {
      self.absorb_scalar(&x);
    }
  }

  fn dom_sep(&mut self, bytes: &'static [u8]) {
    self.absorb_scalar(&label_to_scalar(bytes));
  }
}
