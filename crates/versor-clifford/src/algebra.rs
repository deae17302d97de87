//! Multiplication tables for a Clifford algebra Cl(p,q,r).
//!
//! Blades are bitmasks (see `versor_core::basis`). The product of two basis
//! blades A and B is always a single signed blade:
//! - the result blade is A XOR B
//! - the sign is the reordering parity of A followed by B, times the square
//!   of every generator in A AND B (a null generator zeroes the entry)
//!
//! The outer and inner tables keep the subset of geometric entries that
//! belong to each product.

use rayon::prelude::*;
use versor_core::basis::reorder_sign;
use versor_core::MetricSignature;

/// Rows per table before construction is spread over rayon.
const PAR_ROW_THRESHOLD: usize = 64;

/// Sign result from multiplying two basis blades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Pos,
    Neg,
    Zero,
}

impl Sign {
    pub fn from_i8(s: i8) -> Self {
        match s.signum() {
            1 => Sign::Pos,
            -1 => Sign::Neg,
            _ => Sign::Zero,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Sign::Pos => 1.0,
            Sign::Neg => -1.0,
            Sign::Zero => 0.0,
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Sign::Pos => Sign::Neg,
            Sign::Neg => Sign::Pos,
            Sign::Zero => Sign::Zero,
        }
    }

    pub fn is_zero(self) -> bool {
        self == Sign::Zero
    }
}

impl std::ops::Mul for Sign {
    type Output = Sign;
    fn mul(self, rhs: Sign) -> Sign {
        match (self, rhs) {
            (Sign::Zero, _) | (_, Sign::Zero) => Sign::Zero,
            (Sign::Pos, s) | (s, Sign::Pos) => s,
            (Sign::Neg, Sign::Neg) => Sign::Pos,
        }
    }
}

/// Entry in a multiplication table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CayleyEntry {
    /// Resulting basis blade index.
    pub blade: usize,
    /// Sign of the product.
    pub sign: Sign,
}

/// Which bilinear product a table describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Product {
    Geometric,
    Outer,
    Inner,
}

/// Structurally nonzero entry of a table row: `left * right = sign * (left ^ right)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowEntry {
    pub right: usize,
    pub sign: Sign,
}

/// Outer product keeps the geometric entry only for disjoint blades.
pub fn outer_keeps(a: usize, b: usize) -> bool {
    a & b == 0
}

/// Inner product keeps the geometric entry when the blades share generators
/// and the result has grade |grade(a) - grade(b)|.
pub fn inner_keeps(a: usize, b: usize) -> bool {
    if a & b == 0 {
        return false;
    }
    let ga = a.count_ones() as i64;
    let gb = b.count_ones() as i64;
    (a ^ b).count_ones() as i64 == (ga - gb).abs()
}

/// Precomputed geometric, outer and inner tables of one algebra.
///
/// The geometric table is dense (one sign per ordered pair). Outer and inner
/// are stored as sparse rows so products skip structural zeros.
#[derive(Debug, Clone)]
pub struct MultiplicationTables {
    dim: usize,
    geometric: Vec<Sign>,
    outer: Vec<Vec<RowEntry>>,
    inner: Vec<Vec<RowEntry>>,
}

impl MultiplicationTables {
    /// Number of basis blades each table is indexed by.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Geometric product of blades `a` and `b`.
    pub fn geometric_entry(&self, a: usize, b: usize) -> CayleyEntry {
        CayleyEntry {
            blade: a ^ b,
            sign: self.geometric[a * self.dim + b],
        }
    }

    /// Entry of any of the three tables.
    pub fn entry(&self, product: Product, a: usize, b: usize) -> CayleyEntry {
        let geo = self.geometric_entry(a, b);
        let keep = match product {
            Product::Geometric => true,
            Product::Outer => outer_keeps(a, b),
            Product::Inner => inner_keeps(a, b),
        };
        if keep {
            geo
        } else {
            CayleyEntry { blade: geo.blade, sign: Sign::Zero }
        }
    }

    /// Dense geometric signs of row `a` (indexed by the right blade).
    pub fn geometric_row(&self, a: usize) -> &[Sign] {
        &self.geometric[a * self.dim..(a + 1) * self.dim]
    }

    /// Sparse nonzero entries of row `a` for the outer or inner table.
    ///
    /// # Panics
    /// Panics for `Product::Geometric`, which is stored densely.
    pub fn sparse_row(&self, product: Product, a: usize) -> &[RowEntry] {
        match product {
            Product::Outer => &self.outer[a],
            Product::Inner => &self.inner[a],
            Product::Geometric => panic!("geometric table is dense; use geometric_row"),
        }
    }

    /// Number of structurally nonzero entries in a table.
    pub fn nnz(&self, product: Product) -> usize {
        match product {
            Product::Geometric => self.geometric.iter().filter(|s| !s.is_zero()).count(),
            Product::Outer => self.outer.iter().map(Vec::len).sum(),
            Product::Inner => self.inner.iter().map(Vec::len).sum(),
        }
    }
}

/// Builds the three multiplication tables for a signature.
pub struct MultiplicationTableBuilder<'a> {
    signature: &'a MetricSignature,
}

impl<'a> MultiplicationTableBuilder<'a> {
    pub fn new(signature: &'a MetricSignature) -> Self {
        Self { signature }
    }

    /// Multiply two basis blades represented as bitmasks.
    pub fn multiply_blades(&self, a: usize, b: usize) -> CayleyEntry {
        let metric = self.signature.metric_product(a & b);
        let sign = Sign::from_i8(reorder_sign(a, b)) * Sign::from_i8(metric);
        CayleyEntry { blade: a ^ b, sign }
    }

    pub fn build(&self) -> MultiplicationTables {
        let dim = self.signature.blade_count();

        let mut geometric = vec![Sign::Zero; dim * dim];
        let fill_row = |(a, row): (usize, &mut [Sign])| {
            for (b, slot) in row.iter_mut().enumerate() {
                *slot = self.multiply_blades(a, b).sign;
            }
        };
        if dim >= PAR_ROW_THRESHOLD {
            geometric.par_chunks_mut(dim).enumerate().for_each(fill_row);
        } else {
            geometric.chunks_mut(dim).enumerate().for_each(fill_row);
        }

        let sparse = |keeps: fn(usize, usize) -> bool| -> Vec<Vec<RowEntry>> {
            let row = |a: usize| -> Vec<RowEntry> {
                (0..dim)
                    .filter(|&b| keeps(a, b))
                    .map(|b| RowEntry { right: b, sign: geometric[a * dim + b] })
                    .filter(|e| !e.sign.is_zero())
                    .collect()
            };
            if dim >= PAR_ROW_THRESHOLD {
                (0..dim).into_par_iter().map(row).collect()
            } else {
                (0..dim).map(row).collect()
            }
        };
        let outer = sparse(outer_keeps);
        let inner = sparse(inner_keeps);

        MultiplicationTables { dim, geometric, outer, inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(squares: Vec<i8>) -> MultiplicationTables {
        let sig = MetricSignature::new(squares).unwrap();
        MultiplicationTableBuilder::new(&sig).build()
    }

    #[test]
    fn test_cl2_0() {
        let t = tables(vec![1, 1]);
        assert_eq!(t.dim(), 4);

        // e1 * e1 = +1
        let e1e1 = t.geometric_entry(0b01, 0b01);
        assert_eq!(e1e1.blade, 0);
        assert_eq!(e1e1.sign, Sign::Pos);

        // e1 * e2 = e12
        let e1e2 = t.geometric_entry(0b01, 0b10);
        assert_eq!(e1e2.blade, 0b11);
        assert_eq!(e1e2.sign, Sign::Pos);

        // e2 * e1 = -e12
        let e2e1 = t.geometric_entry(0b10, 0b01);
        assert_eq!(e2e1.blade, 0b11);
        assert_eq!(e2e1.sign, Sign::Neg);

        // e12 * e12 = -1
        assert_eq!(t.geometric_entry(0b11, 0b11).sign, Sign::Neg);
    }

    #[test]
    fn test_negative_generator() {
        // Cl(0,1): e1^2 = -1 like the imaginary unit
        let t = tables(vec![-1]);
        let e1e1 = t.geometric_entry(1, 1);
        assert_eq!(e1e1.blade, 0);
        assert_eq!(e1e1.sign, Sign::Neg);
    }

    #[test]
    fn test_mixed_signature_sign() {
        // Cl(1,1): e12 * e12 = e1 e2 e1 e2 = -e1 e1 e2 e2 = -(1)(-1) = +1
        let t = tables(vec![1, -1]);
        assert_eq!(t.geometric_entry(0b11, 0b11).sign, Sign::Pos);
        // e12 * e2 = e1 e2 e2 = -e1
        let e = t.geometric_entry(0b11, 0b10);
        assert_eq!((e.blade, e.sign), (0b01, Sign::Neg));
    }

    #[test]
    fn test_null_generator_vanishes() {
        // Cl(2,0,1): e3 is null
        let t = tables(vec![1, 1, 0]);
        assert_eq!(t.geometric_entry(0b100, 0b100).sign, Sign::Zero);
        assert_eq!(t.geometric_entry(0b101, 0b110).sign, Sign::Zero);
        assert_eq!(t.geometric_entry(0b001, 0b100).sign, Sign::Pos);
        assert!(t.sparse_row(Product::Inner, 0b100).is_empty());
    }

    #[test]
    fn test_outer_and_inner_split() {
        let t = tables(vec![1, 1, 1]);
        // e1 ^ e2 = e12, e1 ^ e1 = 0
        assert_eq!(t.entry(Product::Outer, 0b001, 0b010).sign, Sign::Pos);
        assert_eq!(t.entry(Product::Outer, 0b001, 0b001).sign, Sign::Zero);
        // e1 | e1 = 1, e1 | e2 = 0
        assert_eq!(t.entry(Product::Inner, 0b001, 0b001).sign, Sign::Pos);
        assert_eq!(t.entry(Product::Inner, 0b001, 0b010).sign, Sign::Zero);
        // e1 | e12 = e2, e12 | e1 = -e2
        let l = t.entry(Product::Inner, 0b001, 0b011);
        assert_eq!((l.blade, l.sign), (0b010, Sign::Pos));
        let r = t.entry(Product::Inner, 0b011, 0b001);
        assert_eq!((r.blade, r.sign), (0b010, Sign::Neg));
        // scalars never contract: 1 | 1 = 0
        assert_eq!(t.entry(Product::Inner, 0, 0).sign, Sign::Zero);
        // e12 | e13 shares e1 but is a grade-2 result, not a contraction
        assert_eq!(t.entry(Product::Inner, 0b011, 0b101).sign, Sign::Zero);
    }

    #[test]
    fn test_sparse_rows_match_entries() {
        let t = tables(vec![1, 1, -1, 0]);
        for product in [Product::Outer, Product::Inner] {
            for a in 0..t.dim() {
                let row = t.sparse_row(product, a);
                let dense: Vec<usize> = (0..t.dim())
                    .filter(|&b| !t.entry(product, a, b).sign.is_zero())
                    .collect();
                let sparse: Vec<usize> = row.iter().map(|e| e.right).collect();
                assert_eq!(dense, sparse, "row {} of {:?}", a, product);
            }
        }
    }

    #[test]
    fn test_outer_nnz_is_three_to_the_n() {
        // Each generator is in a, in b, or in neither.
        let t = tables(vec![1; 5]);
        assert_eq!(t.nnz(Product::Outer), 3usize.pow(5));
        assert_eq!(t.nnz(Product::Geometric), 32 * 32);
    }

    #[test]
    fn test_parallel_build_matches_direct() {
        let sig = MetricSignature::new(vec![1, -1, 1, 1, -1, 0, 1]).unwrap();
        let builder = MultiplicationTableBuilder::new(&sig);
        let t = builder.build();
        assert!(t.dim() >= PAR_ROW_THRESHOLD);
        for a in (0..t.dim()).step_by(7) {
            for b in (0..t.dim()).step_by(5) {
                assert_eq!(t.geometric_entry(a, b), builder.multiply_blades(a, b));
            }
        }
    }

    #[test]
    fn test_sign_arithmetic() {
        assert_eq!(Sign::Pos * Sign::Pos, Sign::Pos);
        assert_eq!(Sign::Pos * Sign::Neg, Sign::Neg);
        assert_eq!(Sign::Neg * Sign::Neg, Sign::Pos);
        assert_eq!(Sign::Zero * Sign::Pos, Sign::Zero);
        assert_eq!(Sign::from_i8(-1).flip(), Sign::Pos);
    }
}
