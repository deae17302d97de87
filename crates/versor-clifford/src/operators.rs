//! `std::ops` impls for multivectors.
//!
//! `*` is the geometric product, `^` the outer product, `|` the inner
//! product and `!` the reverse. Numbers on either side promote onto the
//! scalar blade; number arrays and `MvArray`s broadcast into an `MvArray`.
//! Operators panic where the `Result`-returning methods would fail.

use std::ops::{Add, BitOr, BitXor, Div, Mul, Neg, Not, Sub};

use crate::array::MvArray;
use crate::dispatch::{apply, BinaryOp, Operand};
use crate::multivector::MultiVector;

fn element(op: BinaryOp, lhs: Operand<'_>, rhs: Operand<'_>) -> MultiVector {
    apply(op, lhs, rhs)
        .and_then(|v| v.into_element())
        .unwrap_or_else(|e| panic!("operator {} failed: {}", op, e))
}

fn elements(op: BinaryOp, lhs: Operand<'_>, rhs: Operand<'_>) -> MvArray {
    apply(op, lhs, rhs)
        .and_then(|v| v.into_elements())
        .unwrap_or_else(|e| panic!("operator {} failed: {}", op, e))
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $op:expr) => {
        impl<'a, 'b> $trait<&'b MultiVector> for &'a MultiVector {
            type Output = MultiVector;
            fn $method(self, rhs: &'b MultiVector) -> MultiVector {
                element($op, Operand::Element(self), Operand::Element(rhs))
            }
        }

        impl $trait<MultiVector> for MultiVector {
            type Output = MultiVector;
            fn $method(self, rhs: MultiVector) -> MultiVector {
                $trait::$method(&self, &rhs)
            }
        }

        impl<'b> $trait<&'b MultiVector> for MultiVector {
            type Output = MultiVector;
            fn $method(self, rhs: &'b MultiVector) -> MultiVector {
                $trait::$method(&self, rhs)
            }
        }

        impl<'a> $trait<MultiVector> for &'a MultiVector {
            type Output = MultiVector;
            fn $method(self, rhs: MultiVector) -> MultiVector {
                $trait::$method(self, &rhs)
            }
        }

        impl<'a> $trait<f64> for &'a MultiVector {
            type Output = MultiVector;
            fn $method(self, rhs: f64) -> MultiVector {
                element($op, Operand::Element(self), Operand::Scalar(rhs))
            }
        }

        impl $trait<f64> for MultiVector {
            type Output = MultiVector;
            fn $method(self, rhs: f64) -> MultiVector {
                $trait::$method(&self, rhs)
            }
        }

        impl<'b> $trait<&'b MultiVector> for f64 {
            type Output = MultiVector;
            fn $method(self, rhs: &'b MultiVector) -> MultiVector {
                element($op, Operand::Scalar(self), Operand::Element(rhs))
            }
        }

        impl $trait<MultiVector> for f64 {
            type Output = MultiVector;
            fn $method(self, rhs: MultiVector) -> MultiVector {
                $trait::$method(self, &rhs)
            }
        }

        impl<'a, 'b> $trait<&'b [f64]> for &'a MultiVector {
            type Output = MvArray;
            fn $method(self, rhs: &'b [f64]) -> MvArray {
                elements($op, Operand::Element(self), Operand::Array(rhs))
            }
        }

        impl<'a, 'b> $trait<&'b MultiVector> for &'a [f64] {
            type Output = MvArray;
            fn $method(self, rhs: &'b MultiVector) -> MvArray {
                elements($op, Operand::Array(self), Operand::Element(rhs))
            }
        }

        impl<'a, 'b> $trait<&'b MvArray> for &'a MultiVector {
            type Output = MvArray;
            fn $method(self, rhs: &'b MvArray) -> MvArray {
                elements($op, Operand::Element(self), Operand::Elements(rhs))
            }
        }

        impl<'a, 'b> $trait<&'b MultiVector> for &'a MvArray {
            type Output = MvArray;
            fn $method(self, rhs: &'b MultiVector) -> MvArray {
                elements($op, Operand::Elements(self), Operand::Element(rhs))
            }
        }
    };
}

impl_binop!(Add, add, BinaryOp::Add);
impl_binop!(Sub, sub, BinaryOp::Sub);
impl_binop!(Mul, mul, BinaryOp::Mul);
impl_binop!(BitXor, bitxor, BinaryOp::Outer);
impl_binop!(BitOr, bitor, BinaryOp::Inner);
impl_binop!(Div, div, BinaryOp::Div);

impl Neg for &MultiVector {
    type Output = MultiVector;
    fn neg(self) -> MultiVector {
        self.scale(-1.0)
    }
}

impl Neg for MultiVector {
    type Output = MultiVector;
    fn neg(self) -> MultiVector {
        self.scale(-1.0)
    }
}

/// `!a` is the reverse, written ~a in most texts.
impl Not for &MultiVector {
    type Output = MultiVector;
    fn not(self) -> MultiVector {
        self.reverse()
    }
}

impl Not for MultiVector {
    type Output = MultiVector;
    fn not(self) -> MultiVector {
        self.reverse()
    }
}
