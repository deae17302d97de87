//! Exponential of a multivector.

use nalgebra::DMatrix;

use crate::multivector::MultiVector;
use crate::products::{geometric_unchecked, outer_unchecked, scalar_product_unchecked};

/// Non-scalar residue of A·A (relative) still treated as a pure scalar.
const SQUARE_SCALAR_TOL: f64 = 1e-12;
/// Relative error allowed when checking a bivector split.
const SPLIT_TOL: f64 = 1e-10;
/// Taylor terms below this size end the series.
const TERM_TOL: f64 = 1e-17;
const MAX_TERMS: usize = 64;

impl MultiVector {
    /// exp(A) = Σ Aᵏ / k!.
    ///
    /// Elements that square to a scalar use the trigonometric, hyperbolic or
    /// nilpotent closed form. A scalar plus a bivector is split into
    /// commuting parts that each square to a scalar, and the closed forms
    /// are multiplied. Everything else goes through a scaling-and-squaring
    /// Taylor series.
    pub fn exp(&self) -> MultiVector {
        if let Some(out) = self.exp_closed_form(SQUARE_SCALAR_TOL) {
            return out;
        }
        if let Some(out) = self.exp_split() {
            return out;
        }
        self.exp_taylor()
    }

    fn exp_closed_form(&self, tol: f64) -> Option<MultiVector> {
        let sq = geometric_unchecked(self, self);
        let s = sq.scalar_part();
        let residue = sq.value()[1..].iter().fold(0.0f64, |m, c| m.max(c.abs()));
        if residue > tol * s.abs().max(1.0) {
            return None;
        }
        if s < 0.0 {
            let alpha = (-s).sqrt();
            tracing::trace!("exp: circular closed form, alpha = {}", alpha);
            return Some(self.scale(alpha.sin() / alpha).add_scalar(alpha.cos()));
        }
        if s > 0.0 {
            let alpha = s.sqrt();
            tracing::trace!("exp: hyperbolic closed form, alpha = {}", alpha);
            return Some(self.scale(alpha.sinh() / alpha).add_scalar(alpha.cosh()));
        }
        Some(self.add_scalar(1.0))
    }

    /// exp(s + B) = eˢ Π exp(Bᵢ) over the commuting simple parts of B.
    fn exp_split(&self) -> Option<MultiVector> {
        let basis = self.layout().basis();
        let even = self
            .value()
            .iter()
            .enumerate()
            .all(|(m, &c)| c == 0.0 || matches!(basis.grade(m), 0 | 2));
        if !even {
            return None;
        }
        let parts = split_bivector(&self.grade(2))?;
        tracing::trace!("exp: {} commuting bivector parts", parts.len());

        let mut out = self.layout().scalar(self.scalar_part().exp());
        for part in &parts {
            out = geometric_unchecked(&out, &part.exp_closed_form(SPLIT_TOL)?);
        }
        Some(out)
    }

    fn exp_taylor(&self) -> MultiVector {
        let norm = self.value().iter().map(|c| c * c).sum::<f64>().sqrt();
        let squarings = if norm > 0.5 { (norm / 0.5).log2().ceil() as i32 } else { 0 };
        tracing::trace!("exp: taylor series with {} squarings", squarings);

        let x = self.scale(0.5f64.powi(squarings));
        let mut sum = self.layout().scalar(1.0);
        let mut term = sum.clone();
        for k in 1..=MAX_TERMS {
            term = geometric_unchecked(&term, &x).scale(1.0 / k as f64);
            for (s, t) in sum.value_mut().iter_mut().zip(term.value()) {
                *s += t;
            }
            if term.max_abs() < TERM_TOL {
                break;
            }
        }

        for _ in 0..squarings {
            sum = geometric_unchecked(&sum, &sum);
        }
        sum
    }
}

/// Invariant decomposition B = Σ Bᵢ with BᵢBⱼ = BⱼBᵢ and Bᵢ² = λᵢ scalar.
///
/// With W_m = B^∧m / m!, the λᵢ are the roots of Σ (-1)^m ⟨W_m W_m⟩₀ x^(k-m)
/// for k = ⌊n/2⌋, and each part solves Bᵢ · Σ_odd λᵢ^((l-1)/2) W_(k-l)
/// = Σ_even λᵢ^(l/2) W_(k-l). Returns `None` for complex roots, a singular
/// divisor (repeated roots), or parts that fail to reassemble B.
fn split_bivector(b: &MultiVector) -> Option<Vec<MultiVector>> {
    let layout = b.layout();
    let k = layout.dims() / 2;
    if k == 0 {
        return None;
    }

    let mut wedges = Vec::with_capacity(k + 1);
    wedges.push(layout.scalar(1.0));
    for m in 1..=k {
        let next = outer_unchecked(&wedges[m - 1], b).scale(1.0 / m as f64);
        wedges.push(next);
    }
    let invariants: Vec<f64> = wedges.iter().map(|w| scalar_product_unchecked(w, w)).collect();

    // Companion matrix of the monic polynomial above.
    let mut companion = DMatrix::<f64>::zeros(k, k);
    for i in 0..k {
        if i + 1 < k {
            companion[(i + 1, i)] = 1.0;
        }
        let e = invariants[k - i];
        let coeff = if (k - i) % 2 == 0 { e } else { -e };
        companion[(i, k - 1)] = -coeff;
    }
    let roots = companion.eigenvalues()?;

    let mut parts = Vec::with_capacity(k);
    for &lambda in roots.iter() {
        let mut num = layout.zero();
        let mut den = layout.zero();
        let mut power = 1.0;
        for l in 0..=k {
            let target = if l % 2 == 0 { &mut num } else { &mut den };
            for (t, w) in target.value_mut().iter_mut().zip(wedges[k - l].value()) {
                *t += power * w;
            }
            if l % 2 == 1 {
                power *= lambda;
            }
        }
        let den_inv = den.inv().ok()?;
        parts.push(geometric_unchecked(&num, &den_inv).grade(2));
    }

    let size = b.max_abs().max(1.0);
    let mut total = layout.zero();
    for part in &parts {
        for (t, c) in total.value_mut().iter_mut().zip(part.value()) {
            *t += c;
        }
    }
    if !total.approx_eq(b, SPLIT_TOL * size) {
        return None;
    }
    for (i, p) in parts.iter().enumerate() {
        for q in &parts[i + 1..] {
            let pq = geometric_unchecked(p, q);
            let qp = geometric_unchecked(q, p);
            if !pq.approx_eq(&qp, SPLIT_TOL * size * size) {
                return None;
            }
        }
    }
    Some(parts)
}
