//! Basis blades of an n-generator algebra.
//!
//! Each blade is a bitmask over the generators: bit i set means e_i is a
//! factor. For 3 generators: e1=0b001, e2=0b010, e12=0b011, e123=0b111.
//! The bitmask is also the blade's index into a coefficient array, and its
//! coefficient is stored relative to the generators in increasing order.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::{Result, VersorError};

/// Generator indices of a single blade (zero-based).
pub type Generators = SmallVec<[usize; 8]>;

/// Sign of reordering `a` followed by `b` into increasing generator order.
///
/// For every generator of `b`, each generator of `a` with a higher index has
/// to be swapped past it; the result is (-1)^swaps.
pub fn reorder_sign(a: usize, b: usize) -> i8 {
    let mut a = a >> 1;
    let mut swaps = 0u32;
    while a != 0 {
        swaps += (a & b).count_ones();
        a >>= 1;
    }
    if swaps % 2 == 0 {
        1
    } else {
        -1
    }
}

/// Result of reducing an arbitrary generator tuple to a canonical blade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonical {
    /// Blade left after all repeated generators have been contracted.
    pub mask: usize,
    /// Permutation sign (+1 or -1) picked up while sorting.
    pub sign: i8,
    /// Zero-based generators that met themselves, once per contraction.
    pub contracted: Generators,
}

/// Enumeration and naming of the 2^n basis blades.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BladeBasis {
    n: usize,
    prefix: String,
    first_index: usize,
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl BladeBasis {
    /// Basis for `n` generators labelled `{prefix}{first_index}`, ...
    pub fn new(n: usize, prefix: &str, first_index: usize) -> Result<Self> {
        if prefix.is_empty() {
            return Err(VersorError::InvalidSignature("blade name prefix must not be empty".into()));
        }
        let dim = 1usize << n;
        // Multi-digit indices need a separator to keep labels unambiguous.
        let separator = if n + first_index > 10 { "_" } else { "" };

        let labels: Vec<String> = (0..dim)
            .map(|mask| {
                if mask == 0 {
                    return String::new();
                }
                let digits: Vec<String> = generators(mask)
                    .iter()
                    .map(|g| (g + first_index).to_string())
                    .collect();
                format!("{}{}", prefix, digits.join(separator))
            })
            .collect();
        let index = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), i))
            .collect();

        Ok(Self {
            n,
            prefix: prefix.to_string(),
            first_index,
            labels,
            index,
        })
    }

    /// Number of generators.
    pub fn dims(&self) -> usize {
        self.n
    }

    /// Number of blades (2^n).
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn first_index(&self) -> usize {
        self.first_index
    }

    /// Grade of a blade (popcount of its mask).
    pub fn grade(&self, mask: usize) -> usize {
        mask.count_ones() as usize
    }

    /// Label of a blade; the scalar blade has the empty label.
    pub fn label(&self, mask: usize) -> &str {
        &self.labels[mask]
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Blade index for a label such as `e12`.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Blade masks of a grade, in lexicographic generator order.
    ///
    /// For Cl(4) grade 2 this is e12, e13, e14, e23, e24, e34.
    pub fn blades_of_grade(&self, grade: usize) -> Vec<usize> {
        let mut blades: Vec<usize> = (0..self.len())
            .filter(|&m| self.grade(m) == grade)
            .collect();
        blades.sort_by_key(|&m| generators(m));
        blades
    }

    /// Reduce a tuple of user-facing generator indices (offset by
    /// `first_index`) to a canonical blade.
    ///
    /// `(2, 1)` gives e12 with sign -1; `(1, 2, 3)` and `(2, 3, 1)` share a
    /// sign. Repeated generators are reported in `contracted` so the caller
    /// can apply their metric squares.
    pub fn canonicalize(&self, indices: &[usize]) -> Result<Canonical> {
        let mut mask = 0usize;
        let mut sign = 1i8;
        let mut contracted = Generators::new();
        for &idx in indices {
            if idx < self.first_index || idx - self.first_index >= self.n {
                return Err(VersorError::UnknownBlade(format!(
                    "generator index {} outside {}..{}",
                    idx,
                    self.first_index,
                    self.first_index + self.n
                )));
            }
            let g = idx - self.first_index;
            let bit = 1usize << g;
            sign *= reorder_sign(mask, bit);
            if mask & bit != 0 {
                contracted.push(g);
            }
            mask ^= bit;
        }
        Ok(Canonical { mask, sign, contracted })
    }
}

/// Zero-based generators of a blade mask, in increasing order.
pub fn generators(mask: usize) -> Generators {
    let mut out = Generators::new();
    let mut bits = mask;
    while bits != 0 {
        out.push(bits.trailing_zeros() as usize);
        bits &= bits - 1;
    }
    out
}
