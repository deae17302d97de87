//! Clifford algebra products: geometric, inner, outer.
//!
//! Each product is a bilinear contraction of two coefficient arrays against
//! one of the layout's multiplication tables:
//!
//! (A ∘ B)_k = Σ_ij table[i][j].sign * A_i * B_j  (where i XOR j == k)
//!
//! Zero coefficients on the left skip a whole row, and the sparse outer and
//! inner rows only visit structurally nonzero entries.

use versor_core::Result;

use crate::algebra::Product;
use crate::multivector::MultiVector;

/// Contract `a` and `b` against one table. Layouts must already match.
fn contract(product: Product, a: &MultiVector, b: &MultiVector) -> MultiVector {
    let tables = a.layout().tables();
    let bv = b.value();
    let mut out = vec![0.0; tables.dim()];

    for (i, &ai) in a.value().iter().enumerate() {
        if ai == 0.0 {
            continue;
        }
        match product {
            Product::Geometric => {
                for (j, sign) in tables.geometric_row(i).iter().enumerate() {
                    let bj = bv[j];
                    if bj == 0.0 || sign.is_zero() {
                        continue;
                    }
                    out[i ^ j] += sign.as_f64() * ai * bj;
                }
            }
            Product::Outer | Product::Inner => {
                for entry in tables.sparse_row(product, i) {
                    let bj = bv[entry.right];
                    if bj != 0.0 {
                        out[i ^ entry.right] += entry.sign.as_f64() * ai * bj;
                    }
                }
            }
        }
    }

    a.with_value(out)
}

pub(crate) fn geometric_unchecked(a: &MultiVector, b: &MultiVector) -> MultiVector {
    contract(Product::Geometric, a, b)
}

pub(crate) fn outer_unchecked(a: &MultiVector, b: &MultiVector) -> MultiVector {
    contract(Product::Outer, a, b)
}

/// ⟨AB⟩₀ without building the full product.
pub(crate) fn scalar_product_unchecked(a: &MultiVector, b: &MultiVector) -> f64 {
    let tables = a.layout().tables();
    let bv = b.value();
    a.value()
        .iter()
        .enumerate()
        .filter(|&(_, &ai)| ai != 0.0)
        // Only blade i times itself lands on the scalar.
        .map(|(i, &ai)| tables.geometric_entry(i, i).sign.as_f64() * ai * bv[i])
        .sum()
}

/// Geometric product A B.
pub fn geometric(a: &MultiVector, b: &MultiVector) -> Result<MultiVector> {
    a.check_compatible(b)?;
    Ok(contract(Product::Geometric, a, b))
}

/// Outer (wedge) product A ∧ B: keeps terms between disjoint blades.
pub fn outer(a: &MultiVector, b: &MultiVector) -> Result<MultiVector> {
    a.check_compatible(b)?;
    Ok(contract(Product::Outer, a, b))
}

/// Inner product A | B: keeps terms that contract shared generators down to
/// grade |r - s|. Scalars never contract, so (1 | 1) = 0.
pub fn inner(a: &MultiVector, b: &MultiVector) -> Result<MultiVector> {
    a.check_compatible(b)?;
    Ok(contract(Product::Inner, a, b))
}

/// Scalar product: <AB>_0 (grade-0 part of geometric product).
pub fn scalar_product(a: &MultiVector, b: &MultiVector) -> Result<f64> {
    a.check_compatible(b)?;
    Ok(scalar_product_unchecked(a, b))
}

impl MultiVector {
    /// Geometric product, `self * other`.
    pub fn gp(&self, other: &MultiVector) -> Result<MultiVector> {
        geometric(self, other)
    }

    /// Outer product, `self ^ other`.
    pub fn outer(&self, other: &MultiVector) -> Result<MultiVector> {
        outer(self, other)
    }

    /// Inner product, `self | other`.
    pub fn inner(&self, other: &MultiVector) -> Result<MultiVector> {
        inner(self, other)
    }
}
