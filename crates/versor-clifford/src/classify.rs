//! Blade and versor tests, and factorisation of blades into vectors.

use versor_core::basis::{generators, reorder_sign};
use versor_core::{Result, VersorError};

use crate::multivector::{MultiVector, GRADE_TOL};
use crate::products::{geometric_unchecked, outer_unchecked, scalar_product_unchecked};

/// Relative tolerance for the versor conditions.
const VERSOR_TOL: f64 = 1e-8;
/// Candidate projections with |f²| below this are skipped while factorising.
const FACTOR_TOL: f64 = 1e-10;

impl MultiVector {
    /// True if `self` is a product of invertible vectors.
    ///
    /// With V̂ the grade involution, Ṽ the reverse and V⁻¹ = Ṽ / ⟨VṼ⟩₀,
    /// V is a versor iff V̂V⁻¹ is a nonzero scalar equal to V⁻¹V̂ and the
    /// twisted sandwich V̂ e Ṽ maps every basis vector e to a vector.
    pub fn is_versor(&self) -> bool {
        let peak = self.max_abs();
        if peak == 0.0 {
            return false;
        }
        let v = self.scale(1.0 / peak);
        let involute = v.grade_involution();
        let reverse = v.reverse();

        let d = scalar_product_unchecked(&v, &reverse);
        if d.abs() <= VERSOR_TOL {
            return false;
        }
        let v_inv = reverse.scale(1.0 / d);

        let left = geometric_unchecked(&involute, &v_inv);
        let right = geometric_unchecked(&v_inv, &involute);
        let s = left.scalar_part();
        if s.abs() <= VERSOR_TOL || non_scalar_residue(&left) > VERSOR_TOL * s.abs() {
            return false;
        }
        if !left.approx_eq(&right, VERSOR_TOL * s.abs().max(1.0)) {
            return false;
        }

        self.layout().basis_vectors().iter().all(|e| {
            let image = geometric_unchecked(&geometric_unchecked(&involute, e), &reverse);
            let off_grade = image
                .value()
                .iter()
                .enumerate()
                .filter(|&(m, _)| self.layout().basis().grade(m) != 1)
                .fold(0.0f64, |acc, (_, c)| acc.max(c.abs()));
            off_grade <= VERSOR_TOL * image.max_abs().max(1.0)
        })
    }

    /// True if `self` is a nonzero outer product of vectors.
    ///
    /// Nonzero scalars and vectors are always blades. Higher grades must be
    /// homogeneous, and then either versors or, when ⟨AÃ⟩₀ vanishes, a
    /// multiple of the outer product of their spanning vectors.
    pub fn is_blade(&self) -> bool {
        match self.grade_obj(GRADE_TOL * self.max_abs().max(1.0)) {
            None => false,
            Some(0) | Some(1) => true,
            Some(k) if self.is_null() => spanning_vectors(self, k).is_some(),
            Some(_) => self.is_versor(),
        }
    }

    /// ⟨AÃ⟩₀ vanishes relative to the largest coefficient.
    fn is_null(&self) -> bool {
        let peak = self.max_abs();
        if peak == 0.0 {
            return true;
        }
        let v = self.scale(1.0 / peak);
        scalar_product_unchecked(&v, &v.reverse()).abs() <= VERSOR_TOL
    }

    /// Split a blade into orthogonal unit vectors and a scale.
    ///
    /// Returns `(factors, scale)` with `scale * (f₁ ∧ f₂ ∧ … ∧ f_k) == self`.
    /// A scalar returns no factors and itself as the scale. Null blades have
    /// no metric norm: their factors span the blade with unit coefficient
    /// length and are not orthogonalised.
    pub fn factorise(&self) -> Result<(Vec<MultiVector>, f64)> {
        if !self.is_blade() {
            return Err(VersorError::NotABlade(self.to_string()));
        }
        let k = self.grade_obj(GRADE_TOL * self.max_abs().max(1.0)).unwrap_or(0);
        if k == 0 {
            return Ok((Vec::new(), self.scalar_part()));
        }

        let scale = self.abs();
        if k == 1 {
            return Ok(match self.normal() {
                Ok(unit) => (vec![unit], scale),
                // Null vectors keep their length.
                Err(_) => (vec![self.clone()], 1.0),
            });
        }

        if self.is_null() {
            let (factors, scale) = spanning_vectors(self, k)
                .ok_or_else(|| VersorError::NotABlade(self.to_string()))?;
            tracing::trace!("factorised null grade-{} blade with scale {}", k, scale);
            return Ok((factors, scale));
        }

        let layout = self.layout();
        let dims = layout.dims();

        // Try the generators of the dominant blade first.
        let dominant = self
            .value()
            .iter()
            .enumerate()
            .fold((0, 0.0f64), |best, (m, c)| if c.abs() > best.1 { (m, c.abs()) } else { best })
            .0;
        let mut candidates: Vec<usize> = generators(dominant).to_vec();
        candidates.extend((0..dims).filter(|&g| dominant & (1 << g) == 0));

        let basis_vectors = layout.basis_vectors();
        let mut remaining = self.scale(1.0 / scale);
        let mut factors = Vec::with_capacity(k);

        for grade in (2..=k).rev() {
            // Blades invert through their reverse; non-null is preserved at every step.
            let remaining_inv = remaining.reverse().scale(1.0 / remaining.mag2());
            let found = candidates.iter().position(|&g| {
                let proj = basis_vectors[g]
                    .inner(&remaining)
                    .map(|c| geometric_unchecked(&c, &remaining_inv).grade(1));
                matches!(proj, Ok(ref f) if f.mag2().abs() > FACTOR_TOL)
            });
            let Some(pos) = found else {
                return Err(VersorError::NotABlade(format!(
                    "{} has no non-null vector factor",
                    self
                )));
            };
            let g = candidates.remove(pos);
            let f = geometric_unchecked(&basis_vectors[g].inner(&remaining)?, &remaining_inv)
                .grade(1)
                .normal()?;
            let f_inv = f.scale(1.0 / f.mag2());
            remaining = geometric_unchecked(&f_inv, &remaining).grade(grade - 1);
            factors.push(f);
        }
        factors.push(remaining);

        tracing::trace!("factorised grade-{} blade with scale {}", k, scale);
        Ok((factors, scale))
    }
}

/// Metric-free factorisation of a homogeneous grade-`k` element.
///
/// Contracting every other generator of the dominant blade out of `a` leaves
/// one vector per generator of that blade. `a` is a blade iff it is a multiple
/// of their outer product. Returns the vectors, scaled to unit coefficient
/// length, and that multiple.
fn spanning_vectors(a: &MultiVector, k: usize) -> Option<(Vec<MultiVector>, f64)> {
    let layout = a.layout();
    let basis = layout.basis();
    let value = a.value();
    let dominant = value
        .iter()
        .enumerate()
        .filter(|&(m, _)| basis.grade(m) == k)
        .fold((0, 0.0f64), |best, (m, c)| if c.abs() > best.1 { (m, c.abs()) } else { best })
        .0;
    let peak = value[dominant];
    if peak == 0.0 {
        return None;
    }

    let mut factors = Vec::with_capacity(k);
    for g in generators(dominant) {
        let rest = dominant & !(1 << g);
        let mut coeffs = vec![0.0; layout.ga_dims()];
        for (m, &c) in value.iter().enumerate() {
            if c != 0.0 && m & rest == rest && basis.grade(m) == k {
                let r = m ^ rest;
                coeffs[r] += f64::from(reorder_sign(rest, r)) * c;
            }
        }
        // The coefficient on generator g is ±peak, so the length is nonzero.
        let len = coeffs.iter().map(|c| c * c).sum::<f64>().sqrt();
        factors.push(a.with_value(coeffs).scale(1.0 / len));
    }

    let wedge = factors[1..].iter().fold(factors[0].clone(), |acc, f| outer_unchecked(&acc, f));
    let w = wedge.value()[dominant];
    if w == 0.0 {
        return None;
    }
    let scale = peak / w;
    wedge
        .scale(scale)
        .approx_eq(a, VERSOR_TOL * a.max_abs())
        .then_some((factors, scale))
}

fn non_scalar_residue(mv: &MultiVector) -> f64 {
    mv.value()[1..].iter().fold(0.0f64, |m, c| m.max(c.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::cl;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_categorisation_cl3() {
        let (layout, b) = cl(3, 0, 0).unwrap();
        let one = layout.scalar(1.0);
        let e12_from_wedge = b["e1"].try_add(&b["e2"]).unwrap().outer(&b["e2"]).unwrap();

        let blades = [one.clone(), b["e1"].clone(), b["e12"].clone(), e12_from_wedge];
        for x in &blades {
            assert!(x.is_blade(), "{} should be a blade", x);
            assert!(x.is_versor(), "{} should be a versor", x);
        }

        let versors = [b["e12"].add_scalar(1.0), b["e1"].try_add(&b["e123"]).unwrap()];
        for x in &versors {
            assert!(!x.is_blade(), "{} should not be a blade", x);
            assert!(x.is_versor(), "{} should be a versor", x);
        }

        let neither = [layout.zero(), b["e1"].add_scalar(1.0), b["e123"].add_scalar(1.0)];
        for x in &neither {
            assert!(!x.is_blade(), "{} should not be a blade", x);
            assert!(!x.is_versor(), "{} should not be a versor", x);
        }
    }

    #[test]
    fn test_random_rotor_is_versor() {
        let (layout, _) = cl(4, 0, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let rotor = layout.random_rotor_with(&mut rng);
        assert!(rotor.is_versor());
        assert!(!rotor.is_blade());
    }

    #[test]
    fn test_factorise_bivector() {
        let (_, b) = cl(3, 0, 0).unwrap();
        let a = b["e1"].scale(2.0).try_add(&b["e2"]).unwrap();
        let c = b["e2"].try_sub(&b["e3"].scale(3.0)).unwrap();
        let blade = a.outer(&c).unwrap();

        let (factors, scale) = blade.factorise().unwrap();
        assert_eq!(factors.len(), 2);
        // orthogonal unit factors
        assert!(factors[0].inner(&factors[1]).unwrap().scalar_part().abs() < 1e-12);
        for f in &factors {
            assert!((f.abs() - 1.0).abs() < 1e-12);
        }
        let rebuilt = factors[0].outer(&factors[1]).unwrap().scale(scale);
        assert!(rebuilt.approx_eq(&blade, 1e-10), "{} vs {}", rebuilt, blade);
    }

    #[test]
    fn test_null_blades_degenerate() {
        let (_, b) = cl(3, 0, 1).unwrap();
        let e14 = &b["e14"];
        assert_eq!(e14.mag2(), 0.0);
        assert!(e14.is_blade());
        assert!(!e14.is_versor());

        let (factors, scale) = e14.factorise().unwrap();
        assert_eq!(factors.len(), 2);
        let rebuilt = factors[0].outer(&factors[1]).unwrap().scale(scale);
        assert!(rebuilt.approx_eq(e14, 1e-12), "{} vs {}", rebuilt, e14);

        // (e1 + 3e2 + e3) ^ e4
        let v = b["e1"].try_add(&b["e2"].scale(3.0)).unwrap().try_add(&b["e3"]).unwrap();
        let line = v.outer(&b["e4"]).unwrap();
        assert!(line.is_blade());
        let (factors, scale) = line.factorise().unwrap();
        let rebuilt = factors[0].outer(&factors[1]).unwrap().scale(scale);
        assert!(rebuilt.approx_eq(&line, 1e-12), "{} vs {}", rebuilt, line);

        let plane = b["e12"].outer(&b["e4"]).unwrap().scale(-2.0);
        let (factors, scale) = plane.factorise().unwrap();
        assert_eq!(factors.len(), 3);
        let rebuilt = factors[1..]
            .iter()
            .fold(factors[0].clone(), |acc, f| acc.outer(f).unwrap())
            .scale(scale);
        assert!(rebuilt.approx_eq(&plane, 1e-12), "{} vs {}", rebuilt, plane);
    }

    #[test]
    fn test_null_blade_indefinite() {
        // (e1 + e3) ^ e2 in Cl(2,1) squares to zero
        let (_, b) = cl(2, 1, 0).unwrap();
        let blade = b["e1"].try_add(&b["e3"]).unwrap().outer(&b["e2"]).unwrap();
        assert_eq!(blade.mag2(), 0.0);
        assert!(blade.is_blade());
        let (factors, scale) = blade.factorise().unwrap();
        let rebuilt = factors[0].outer(&factors[1]).unwrap().scale(scale);
        assert!(rebuilt.approx_eq(&blade, 1e-12), "{} vs {}", rebuilt, blade);
    }

    #[test]
    fn test_null_non_blade_rejected() {
        let (_, b) = cl(2, 0, 2).unwrap();
        let x = b["e13"].try_add(&b["e24"]).unwrap();
        assert_eq!(x.mag2(), 0.0);
        assert!(!x.is_blade());
        assert!(matches!(x.factorise(), Err(VersorError::NotABlade(_))));
    }

    #[test]
    fn test_factorise_low_grades() {
        let (layout, b) = cl(3, 0, 0).unwrap();
        let (f, s) = layout.scalar(-2.0).factorise().unwrap();
        assert!(f.is_empty());
        assert_eq!(s, -2.0);

        let (f, s) = b["e3"].scale(4.0).factorise().unwrap();
        assert_eq!(f, vec![b["e3"].clone()]);
        assert_eq!(s, 4.0);
    }

    #[test]
    fn test_factorise_rejects_non_blade() {
        let (_, b) = cl(3, 0, 0).unwrap();
        let x = b["e12"].add_scalar(1.0);
        assert!(matches!(x.factorise(), Err(VersorError::NotABlade(_))));
    }
}
