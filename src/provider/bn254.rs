// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the Spartan2 project.
// See the LICENSE file in the project root for full license information.
// Source repository: https://github.com/Microsoft/Spartan2

//! This module implements the scalar-field traits for BN254 (also known as BN256 or alt_bn128).
use crate::impl_traits;

/// Re-exports that give access to the standard aliases used in the code base, for bn254
#[allow(clippy::module_inception)]
pub mod bn254 {
  pub use halo2curves::bn256::Fr as Scalar;
}

impl_traits!(bn254);
