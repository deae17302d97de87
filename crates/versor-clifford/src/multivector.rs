//! MultiVector: the fundamental element of a Clifford algebra.
//!
//! A multivector is a linear combination of basis blades:
//! M = a₀·1 + a₁·e₁ + a₂·e₂ + a₃·e₁₂ + ...
//!
//! Coefficients are stored densely, indexed by blade bitmask, next to a
//! handle to the layout that defines how they multiply.

use std::fmt;

use versor_core::{Result, VersorError};

use crate::layout::Layout;

/// Default tolerance for deciding which grades are present.
pub const GRADE_TOL: f64 = 1e-12;

/// A multivector in a Clifford algebra.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiVector {
    layout: Layout,
    /// Coefficients for each basis blade (length = 2^n).
    value: Vec<f64>,
}

impl MultiVector {
    /// Wrap a coefficient array; its length must be the layout's blade count.
    pub fn new(layout: &Layout, value: Vec<f64>) -> Result<Self> {
        if value.len() != layout.ga_dims() {
            return Err(VersorError::LengthMismatch {
                expected: layout.ga_dims(),
                got: value.len(),
            });
        }
        Ok(Self::from_parts(layout, value))
    }

    /// Callers guarantee `value.len() == layout.ga_dims()`.
    pub(crate) fn from_parts(layout: &Layout, value: Vec<f64>) -> Self {
        debug_assert_eq!(value.len(), layout.ga_dims());
        Self { layout: layout.clone(), value }
    }

    pub fn zero(layout: &Layout) -> Self {
        Self::from_parts(layout, vec![0.0; layout.ga_dims()])
    }

    pub fn scalar(layout: &Layout, value: f64) -> Self {
        Self::from_blade(layout, 0, value)
    }

    /// `coeff` times the basis blade `mask`.
    pub(crate) fn from_blade(layout: &Layout, mask: usize, coeff: f64) -> Self {
        let mut mv = Self::zero(layout);
        mv.value[mask] = coeff;
        mv
    }

    /// Zero multivector in the same layout as `self`.
    pub(crate) fn zeros_like(&self) -> Self {
        Self::zero(&self.layout)
    }

    /// Multivector in the same layout as `self` with new coefficients.
    pub(crate) fn with_value(&self, value: Vec<f64>) -> Self {
        Self::from_parts(&self.layout, value)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn value(&self) -> &[f64] {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut [f64] {
        &mut self.value
    }

    pub fn into_value(self) -> Vec<f64> {
        self.value
    }

    /// Fail with `IncompatibleAlgebra` unless both operands share an algebra.
    pub fn check_compatible(&self, other: &MultiVector) -> Result<()> {
        self.layout.check_same(&other.layout)
    }

    /// Get the scalar (grade-0) part.
    pub fn scalar_part(&self) -> f64 {
        self.value[0]
    }

    /// True if every coefficient is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.value.iter().all(|&c| c == 0.0)
    }

    /// Largest absolute coefficient.
    pub fn max_abs(&self) -> f64 {
        self.value.iter().fold(0.0f64, |m, c| m.max(c.abs()))
    }

    /// Coefficient-wise comparison within `tol`.
    pub fn approx_eq(&self, other: &MultiVector, tol: f64) -> bool {
        self.layout == other.layout
            && self.value.iter().zip(&other.value).all(|(a, b)| (a - b).abs() <= tol)
    }

    // --- grades ---

    /// Grade projection ⟨A⟩_r.
    pub fn grade(&self, r: usize) -> MultiVector {
        let value = self
            .value
            .iter()
            .enumerate()
            .map(|(m, &c)| if self.layout.basis().grade(m) == r { c } else { 0.0 })
            .collect();
        self.with_value(value)
    }

    /// Grades with a coefficient larger than `tol` in magnitude, ascending.
    pub fn grades(&self, tol: f64) -> Vec<usize> {
        let mut present = vec![false; self.layout.dims() + 1];
        for (m, &c) in self.value.iter().enumerate() {
            if c.abs() > tol {
                present[self.layout.basis().grade(m)] = true;
            }
        }
        present
            .iter()
            .enumerate()
            .filter_map(|(g, &p)| p.then_some(g))
            .collect()
    }

    /// The single grade of a homogeneous multivector, `None` if it is zero
    /// or mixes grades.
    pub fn grade_obj(&self, tol: f64) -> Option<usize> {
        match self.grades(tol).as_slice() {
            [g] => Some(*g),
            _ => None,
        }
    }

    /// Reverse: reverses the order of basis vectors in each blade.
    /// For a grade-k blade: rev = (-1)^(k(k-1)/2) * blade
    pub fn reverse(&self) -> MultiVector {
        self.map_by_grade(|k| if (k * k.saturating_sub(1) / 2) % 2 == 0 { 1.0 } else { -1.0 })
    }

    /// Grade involution: negates odd-grade components.
    pub fn grade_involution(&self) -> MultiVector {
        self.map_by_grade(|k| if k % 2 == 0 { 1.0 } else { -1.0 })
    }

    /// Clifford conjugate: reverse followed by grade involution.
    pub fn conjugate(&self) -> MultiVector {
        self.reverse().grade_involution()
    }

    fn map_by_grade(&self, sign: impl Fn(usize) -> f64) -> MultiVector {
        let value = self
            .value
            .iter()
            .enumerate()
            .map(|(m, &c)| c * sign(self.layout.basis().grade(m)))
            .collect();
        self.with_value(value)
    }

    // --- norms ---

    /// Squared magnitude ⟨A Ã⟩₀; negative in indefinite signatures.
    pub fn mag2(&self) -> f64 {
        crate::products::scalar_product_unchecked(self, &self.reverse())
    }

    /// Magnitude: sqrt(|⟨A Ã⟩₀|).
    pub fn abs(&self) -> f64 {
        self.mag2().abs().sqrt()
    }

    /// A / |A|.
    pub fn normal(&self) -> Result<MultiVector> {
        let norm = self.abs();
        if norm == 0.0 {
            return Err(VersorError::NonInvertible("cannot normalize a null multivector".into()));
        }
        Ok(self.scale(1.0 / norm))
    }

    // --- elementwise arithmetic ---

    pub fn try_add(&self, other: &MultiVector) -> Result<MultiVector> {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn try_sub(&self, other: &MultiVector) -> Result<MultiVector> {
        self.zip_with(other, |a, b| a - b)
    }

    fn zip_with(&self, other: &MultiVector, f: impl Fn(f64, f64) -> f64) -> Result<MultiVector> {
        self.check_compatible(other)?;
        let value = self.value.iter().zip(&other.value).map(|(&a, &b)| f(a, b)).collect();
        Ok(self.with_value(value))
    }

    pub fn scale(&self, factor: f64) -> MultiVector {
        self.with_value(self.value.iter().map(|&c| c * factor).collect())
    }

    /// Add a plain number onto the scalar blade.
    pub fn add_scalar(&self, s: f64) -> MultiVector {
        let mut out = self.clone();
        out.value[0] += s;
        out
    }

    // --- indexing ---

    /// Coefficient of a signed basis blade, `A[blade]`.
    ///
    /// `blade` must be a nonzero multiple of a single basis blade; the result
    /// is expressed relative to it, so `A[-e12] == -A[e12]`.
    pub fn coeff_of(&self, blade: &MultiVector) -> Result<f64> {
        self.check_compatible(blade)?;
        let mut nonzero = blade.value.iter().enumerate().filter(|&(_, &c)| c != 0.0);
        match (nonzero.next(), nonzero.next()) {
            (Some((m, &c)), None) => Ok(self.value[m] / c),
            _ => Err(VersorError::TypeMismatch(
                "blade index must be a single basis blade".into(),
            )),
        }
    }

    /// Coefficient of the blade named by a generator tuple, `A[(i, j, ...)]`.
    ///
    /// Generators are numbered from the layout's first index. An unsorted
    /// tuple picks up the sign of its sorting permutation; repeated
    /// generators contract through their square, and a repeated null
    /// generator denotes the zero blade.
    pub fn get_blade(&self, indices: &[usize]) -> Result<f64> {
        let canon = self.layout.basis().canonicalize(indices)?;
        let signature = self.layout.signature();
        let metric: i8 = canon.contracted.iter().map(|&g| signature.square(g)).product();
        if metric == 0 {
            return Ok(0.0);
        }
        Ok(self.value[canon.mask] * f64::from(canon.sign * metric))
    }
}

impl std::ops::Index<usize> for MultiVector {
    type Output = f64;

    /// Coefficient by blade bitmask.
    fn index(&self, mask: usize) -> &f64 {
        &self.value[mask]
    }
}

impl fmt::Display for MultiVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (m, &c) in self.value.iter().enumerate() {
            if c == 0.0 {
                continue;
            }
            let magnitude = c.abs();
            if first {
                if c < 0.0 {
                    write!(f, "-")?;
                }
            } else if c < 0.0 {
                write!(f, " - ")?;
            } else {
                write!(f, " + ")?;
            }
            if m == 0 {
                write!(f, "{}", magnitude)?;
            } else {
                write!(f, "({}^{})", magnitude, self.layout.basis().label(m))?;
            }
            first = false;
        }
        if first {
            write!(f, "0")?;
        }
        Ok(())
    }
}
