//! This module contains the definitions of polynomial types used by the sum-check and GKR protocols.
pub mod eq;
pub mod multilinear;
pub mod univariate;
