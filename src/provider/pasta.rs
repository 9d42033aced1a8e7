//! This module implements the scalar-field traits for `pallas::Scalar` and `vesta::Scalar`.
use crate::impl_traits;

/// Re-exports that give access to the standard aliases used in the code base, for pallas
pub mod pallas {
  pub use halo2curves::pasta::Fq as Scalar;
}

/// Re-exports that give access to the standard aliases used in the code base, for vesta
pub mod vesta {
  pub use halo2curves::pasta::Fp as Scalar;
}

impl_traits!(pallas);

impl_traits!(vesta);
