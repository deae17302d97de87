//! # versor-clifford
//!
//! Geometric algebra engine.
//!
//! Provides Clifford algebras Cl(p,q,r) with:
//! - Multiplication tables built from bitmask blades
//! - Memoized layouts shared by every multivector of an algebra
//! - Geometric, inner, outer products and operator overloads
//! - Grade projection, dual, reverse, involute
//! - Inverse, exponential, norm and normalization
//! - Blade/versor tests and blade factorisation
//! - Frames with reciprocal frames, and the conformal model
//!
//! ```
//! use versor_clifford::cl;
//!
//! let (_, b) = cl(3, 0, 0).unwrap();
//! let e12 = &b["e1"] ^ &b["e2"];
//! assert_eq!((&e12 * &e12).scalar_part(), -1.0);
//! ```

pub mod algebra;
pub mod array;
mod classify;
pub mod config;
pub mod conformal;
pub mod dispatch;
mod exp;
pub mod frame;
mod inverse;
pub mod layout;
pub mod multivector;
mod operators;
pub mod ops;
pub mod products;
pub mod registry;

pub use algebra::{MultiplicationTableBuilder, MultiplicationTables, Product, Sign};
pub use array::MvArray;
pub use config::LayoutConfig;
pub use conformal::{conformalize, Conformal};
pub use dispatch::{apply, compare, BinaryOp, CmpOp, Operand, Value};
pub use frame::Frame;
pub use layout::{build_layout, cl, Layout};
pub use multivector::MultiVector;
pub use registry::{cached_layout_count, clear_layout_cache};
pub use versor_core::{MetricSignature, Result, VersorError};
