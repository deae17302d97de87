//! Dynamic dispatch of binary operations over mixed operand kinds.
//!
//! Operands are plain numbers, arrays of numbers, multivectors, arrays of
//! multivectors, or nothing at all. Resolution order:
//! 1. `Nil` on either side is a `TypeMismatch`.
//! 2. An array on either side broadcasts the operation element-wise and
//!    yields an `MvArray`.
//! 3. A number next to a multivector is promoted onto the scalar blade.
//! 4. Two numbers are not an algebra operation: `TypeMismatch`.
//!
//! The `std::ops` impls on `MultiVector` route through here.

use std::fmt;

use versor_core::{Result, VersorError};

use crate::array::MvArray;
use crate::multivector::MultiVector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    /// Geometric product.
    Mul,
    /// Outer product.
    Outer,
    /// Inner product.
    Inner,
    Div,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Outer => "^",
            BinaryOp::Inner => "|",
            BinaryOp::Div => "/",
        };
        f.write_str(symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// One side of a binary operation.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    Scalar(f64),
    Array(&'a [f64]),
    Element(&'a MultiVector),
    Elements(&'a MvArray),
    Nil,
}

impl Operand<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Operand::Scalar(_) => "scalar",
            Operand::Array(_) => "array",
            Operand::Element(_) => "multivector",
            Operand::Elements(_) => "multivector array",
            Operand::Nil => "nil",
        }
    }

    fn is_array(&self) -> bool {
        matches!(self, Operand::Array(_) | Operand::Elements(_))
    }
}

/// Result of a dispatched operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Element(MultiVector),
    Elements(MvArray),
}

impl Value {
    pub fn into_element(self) -> Result<MultiVector> {
        match self {
            Value::Element(mv) => Ok(mv),
            Value::Elements(_) => Err(VersorError::TypeMismatch(
                "expected a multivector, got an array".into(),
            )),
        }
    }

    pub fn into_elements(self) -> Result<MvArray> {
        match self {
            Value::Elements(arr) => Ok(arr),
            Value::Element(_) => Err(VersorError::TypeMismatch(
                "expected an array, got a multivector".into(),
            )),
        }
    }
}

fn mismatch(op: impl fmt::Display, lhs: &Operand<'_>, rhs: &Operand<'_>) -> VersorError {
    VersorError::TypeMismatch(format!(
        "unsupported operands for {}: {} and {}",
        op,
        lhs.kind(),
        rhs.kind()
    ))
}

/// Apply `op` to two multivectors of one algebra.
pub fn binary(op: BinaryOp, a: &MultiVector, b: &MultiVector) -> Result<MultiVector> {
    match op {
        BinaryOp::Add => a.try_add(b),
        BinaryOp::Sub => a.try_sub(b),
        BinaryOp::Mul => a.gp(b),
        BinaryOp::Outer => a.outer(b),
        BinaryOp::Inner => a.inner(b),
        BinaryOp::Div => a.try_div(b),
    }
}

/// Evaluate `lhs op rhs` for any pair of operand kinds.
pub fn apply(op: BinaryOp, lhs: Operand<'_>, rhs: Operand<'_>) -> Result<Value> {
    if matches!(lhs, Operand::Nil) || matches!(rhs, Operand::Nil) {
        return Err(mismatch(op, &lhs, &rhs));
    }
    if lhs.is_array() || rhs.is_array() {
        return broadcast(op, lhs, rhs).map(Value::Elements);
    }
    match (lhs, rhs) {
        (Operand::Element(a), Operand::Element(b)) => binary(op, a, b).map(Value::Element),
        (Operand::Element(a), Operand::Scalar(s)) => {
            binary(op, a, &a.layout().scalar(s)).map(Value::Element)
        }
        (Operand::Scalar(s), Operand::Element(b)) => {
            binary(op, &b.layout().scalar(s), b).map(Value::Element)
        }
        _ => Err(mismatch(op, &lhs, &rhs)),
    }
}

fn broadcast(op: BinaryOp, lhs: Operand<'_>, rhs: Operand<'_>) -> Result<MvArray> {
    let items = match (lhs, rhs) {
        (Operand::Element(a), Operand::Array(xs)) => xs
            .iter()
            .map(|&x| binary(op, a, &a.layout().scalar(x)))
            .collect::<Result<Vec<_>>>()?,
        (Operand::Array(xs), Operand::Element(b)) => xs
            .iter()
            .map(|&x| binary(op, &b.layout().scalar(x), b))
            .collect::<Result<Vec<_>>>()?,
        (Operand::Element(a), Operand::Elements(arr)) => {
            arr.iter().map(|b| binary(op, a, b)).collect::<Result<Vec<_>>>()?
        }
        (Operand::Elements(arr), Operand::Element(b)) => {
            arr.iter().map(|a| binary(op, a, b)).collect::<Result<Vec<_>>>()?
        }
        (Operand::Elements(arr), Operand::Scalar(s)) => arr
            .iter()
            .map(|a| binary(op, a, &a.layout().scalar(s)))
            .collect::<Result<Vec<_>>>()?,
        (Operand::Scalar(s), Operand::Elements(arr)) => arr
            .iter()
            .map(|b| binary(op, &b.layout().scalar(s), b))
            .collect::<Result<Vec<_>>>()?,
        (Operand::Elements(a), Operand::Elements(b)) => {
            a.check_len(b.len())?;
            a.iter().zip(b.iter()).map(|(x, y)| binary(op, x, y)).collect::<Result<Vec<_>>>()?
        }
        (Operand::Elements(arr), Operand::Array(xs)) => {
            arr.check_len(xs.len())?;
            arr.iter()
                .zip(xs)
                .map(|(a, &x)| binary(op, a, &a.layout().scalar(x)))
                .collect::<Result<Vec<_>>>()?
        }
        (Operand::Array(xs), Operand::Elements(arr)) => {
            arr.check_len(xs.len())?;
            xs.iter()
                .zip(arr.iter())
                .map(|(&x, b)| binary(op, &b.layout().scalar(x), b))
                .collect::<Result<Vec<_>>>()?
        }
        // Number arrays alone involve no algebra.
        _ => return Err(mismatch(op, &lhs, &rhs)),
    };
    Ok(MvArray::from_vec(items))
}

/// Evaluate a comparison. Multivectors have no order, so only `Eq` and
/// `Ne` are defined; comparing against `Nil` is never equal.
pub fn compare(op: CmpOp, lhs: Operand<'_>, rhs: Operand<'_>) -> Result<bool> {
    let equal = match op {
        CmpOp::Eq | CmpOp::Ne => equals(&lhs, &rhs)?,
        _ => {
            return Err(VersorError::TypeMismatch(format!(
                "multivectors are not ordered: {:?} between {} and {}",
                op,
                lhs.kind(),
                rhs.kind()
            )))
        }
    };
    Ok(if op == CmpOp::Eq { equal } else { !equal })
}

fn equals(lhs: &Operand<'_>, rhs: &Operand<'_>) -> Result<bool> {
    Ok(match (lhs, rhs) {
        (Operand::Nil, Operand::Nil) => true,
        (Operand::Nil, _) | (_, Operand::Nil) => false,
        (Operand::Element(a), Operand::Element(b)) => a == b,
        (Operand::Element(a), Operand::Scalar(s)) | (Operand::Scalar(s), Operand::Element(a)) => {
            **a == a.layout().scalar(*s)
        }
        (Operand::Elements(a), Operand::Elements(b)) => a == b,
        (Operand::Scalar(a), Operand::Scalar(b)) => a == b,
        _ => {
            return Err(VersorError::TypeMismatch(format!(
                "cannot compare {} with {}",
                lhs.kind(),
                rhs.kind()
            )))
        }
    })
}
