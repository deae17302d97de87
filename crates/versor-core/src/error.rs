//! Error taxonomy shared by every versor crate.

/// Errors raised by algebra construction and multivector operations.
///
/// Every failure is local and synchronous: it is returned at the point of the
/// offending operation and never retried internally.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VersorError {
    /// Bad construction parameters (signature entries, dimension, names).
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Operands belong to algebras with different signatures.
    #[error("incompatible algebras: {left} vs {right}")]
    IncompatibleAlgebra { left: String, right: String },

    /// Undefined comparison or unsupported operand kinds.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// Inversion of a singular element, or a linearly dependent frame.
    #[error("not invertible: {0}")]
    NonInvertible(String),

    /// Factorization requested on something that is not a blade.
    #[error("not a blade: {0}")]
    NotABlade(String),

    /// Dual requested in an algebra whose pseudoscalar squares to zero.
    #[error("pseudoscalar of {0} is not invertible")]
    NonInvertiblePseudoscalar(String),

    /// A coefficient array does not match the algebra's blade count.
    #[error("length mismatch: expected {expected} coefficients, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    /// A blade name or generator index that the layout does not define.
    #[error("unknown blade: {0}")]
    UnknownBlade(String),
}
