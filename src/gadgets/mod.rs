// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the Spartan2 project.
// See the LICENSE file in the project root for full license information.
// Source repository: https://github.com/Microsoft/Spartan2

//! Circuit gadgets used by the in-circuit GKR verifier.
//!
//! # Available Gadgets
//!
//! - [`num`]: field arithmetic, equality polynomials and multilinear evaluation
//! - [`mimc`]: MiMC compression with the native round constants
//! - [`transcript`]: [`AllocatedTranscript`], the in-circuit Fiat-Shamir transcript
//! - [`sumcheck`]: the sum-check verifier over allocated round polynomials

pub mod mimc;
pub mod num;
pub mod sumcheck;
pub mod transcript;

pub use transcript::AllocatedTranscript;
