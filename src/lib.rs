//! This library implements the GKR protocol for layered arithmetic circuits.
//! The prover reduces a claim about a circuit's outputs to an opening of its committed inputs,
//! one sum-check per layer. The verifier exists natively and as an R1CS circuit, so a GKR proof
//! can itself be checked inside an outer proof system.
#![deny(
  warnings,
  unused,
  future_incompatible,
  nonstandard_style,
  rust_2018_idioms,
  missing_docs
)]
#![allow(non_snake_case)]
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::type_complexity)]
#![forbid(unsafe_code)]

// private modules
mod math;

// public modules
pub mod digest;
pub mod errors;
pub mod gadgets;
pub mod gkr;
pub mod polys;
pub mod provider;
pub mod sumcheck;
pub mod traits;

/// Start an entered span + timer, return `(EnteredSpan, Instant)`.
macro_rules! start_span {
    ($name:expr $(, $($fmt:tt)+)?) => {{
        let span = tracing::info_span!($name $(, $($fmt)+)?).entered();
        (span, std::time::Instant::now())
    }};
}
pub(crate) use start_span;

use traits::{Engine, pcs::PCSEngineTrait};
type CommitmentKey<E> = <<E as traits::Engine>::PCS as PCSEngineTrait<E>>::CommitmentKey;
type PCSVerifierKey<E> = <<E as traits::Engine>::PCS as PCSEngineTrait<E>>::VerifierKey;
type Commitment<E> = <<E as Engine>::PCS as PCSEngineTrait<E>>::Commitment;
