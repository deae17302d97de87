//! Multiplicative inverse and division.

use nalgebra::DVector;
use versor_core::{Result, VersorError};

use crate::multivector::MultiVector;
use crate::products::{geometric_unchecked, scalar_product_unchecked};

/// Relative pivot size below which the left-multiplication matrix is
/// treated as singular.
const SINGULAR_RTOL: f64 = 1e-12;

impl MultiVector {
    /// Multiplicative inverse A⁻¹ with A A⁻¹ = A⁻¹ A = 1.
    ///
    /// Scalar-plus-vector elements use the closed form
    /// (a₁ - a₀) / (a₁² - a₀²); everything else solves L(A) x = 1.
    pub fn inv(&self) -> Result<MultiVector> {
        let basis = self.layout().basis();
        let linear = self
            .value()
            .iter()
            .enumerate()
            .all(|(m, &c)| c == 0.0 || basis.grade(m) <= 1);

        if linear {
            tracing::trace!("inverse: closed form for grades 0 and 1");
            self.inv_linear()
        } else {
            tracing::trace!("inverse: LU solve on {} blades", self.layout().ga_dims());
            self.inv_general()
        }
    }

    fn inv_linear(&self) -> Result<MultiVector> {
        let a0 = self.scalar_part();
        let a1 = self.grade(1);
        let denom = scalar_product_unchecked(&a1, &a1) - a0 * a0;
        if denom == 0.0 {
            return Err(VersorError::NonInvertible(self.to_string()));
        }
        Ok(a1.add_scalar(-a0).scale(1.0 / denom))
    }

    fn inv_general(&self) -> Result<MultiVector> {
        let dim = self.layout().ga_dims();
        let lu = self.layout().get_left_gmt_matrix(self)?.lu();

        let u = lu.u();
        let pivots = u.diagonal();
        let largest = pivots.iter().fold(0.0f64, |m, p| m.max(p.abs()));
        let smallest = pivots.iter().fold(f64::INFINITY, |m, p| m.min(p.abs()));
        if largest == 0.0 || smallest <= SINGULAR_RTOL * largest {
            return Err(VersorError::NonInvertible(self.to_string()));
        }

        let mut one = DVector::<f64>::zeros(dim);
        one[0] = 1.0;
        let x = lu
            .solve(&one)
            .ok_or_else(|| VersorError::NonInvertible(self.to_string()))?;
        Ok(self.with_value(x.iter().copied().collect()))
    }

    /// A / B = A B⁻¹.
    pub fn try_div(&self, other: &MultiVector) -> Result<MultiVector> {
        self.check_compatible(other)?;
        Ok(geometric_unchecked(self, &other.inv()?))
    }

    /// s / A = s A⁻¹.
    pub fn rdiv_scalar(&self, s: f64) -> Result<MultiVector> {
        Ok(self.inv()?.scale(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::cl;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_is_one(mv: &MultiVector) {
        let one = mv.layout().scalar(1.0);
        assert!(mv.approx_eq(&one, 1e-11), "expected 1, got {}", mv);
    }

    #[test]
    fn test_linear_inverse_random() {
        let (layout, _) = cl(3, 0, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..10 {
            let a = layout.random_mv_with(&mut rng, Some(&[0, 1]));
            let ai = a.inv().unwrap();
            assert_is_one(&a.gp(&ai).unwrap());
            assert_is_one(&ai.gp(&a).unwrap());
        }
    }

    #[test]
    fn test_one_plus_e1_is_singular() {
        let (_, b) = cl(3, 0, 0).unwrap();
        let a = b["e1"].add_scalar(1.0);
        assert!(matches!(a.inv(), Err(VersorError::NonInvertible(_))));
    }

    #[test]
    fn test_null_vector_is_singular() {
        let (_, b) = cl(1, 1, 0).unwrap();
        let null = b["e1"].try_add(&b["e2"]).unwrap();
        assert!(null.inv().is_err());
    }

    #[test]
    fn test_bivector_inverse() {
        let (_, b) = cl(3, 0, 0).unwrap();
        assert_eq!(b["e12"].inv().unwrap(), b["e12"].scale(-1.0));
    }

    #[test]
    fn test_general_inverse_random() {
        let (layout, _) = cl(2, 1, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let a = layout.random_mv_with(&mut rng, None);
        let ai = a.inv().unwrap();
        assert_is_one(&a.gp(&ai).unwrap());
        assert_is_one(&ai.gp(&a).unwrap());
    }

    #[test]
    fn test_zero_divisor_product_is_singular() {
        // (1 + e1) is a zero divisor, so is anything it multiplies.
        let (_, b) = cl(3, 0, 0).unwrap();
        let a = b["e1"].add_scalar(1.0).gp(&b["e23"]).unwrap();
        assert_eq!(a.grades(0.0), vec![2, 3]);
        assert!(matches!(a.inv(), Err(VersorError::NonInvertible(_))));
    }

    #[test]
    fn test_division() {
        let (_, b) = cl(3, 0, 0).unwrap();
        // e1 / e12 = e1 * (-e12) = -e2
        assert_eq!(b["e1"].try_div(&b["e12"]).unwrap(), b["e2"].scale(-1.0));
        assert_eq!(b["e2"].rdiv_scalar(2.0).unwrap(), b["e2"].scale(2.0));
    }
}
