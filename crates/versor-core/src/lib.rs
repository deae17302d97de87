//! # versor-core
//!
//! Foundations of the versor geometric algebra engine.
//!
//! Provides:
//! - `MetricSignature`: generator squares (+1, -1, 0) for Cl(p,q,r)
//! - `BladeBasis`: bitmask-indexed basis blades, labels and permutation parity
//! - `VersorError`: the error taxonomy used across the workspace

pub mod basis;
pub mod error;
pub mod signature;

pub use basis::{BladeBasis, Canonical};
pub use error::VersorError;
pub use signature::{MetricSignature, MAX_GENERATORS};

pub type Result<T> = std::result::Result<T, VersorError>;
