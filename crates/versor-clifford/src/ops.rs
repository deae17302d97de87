//! Higher-level operations on multivectors: dual, sandwich product, rotor.

use versor_core::{Result, VersorError};

use crate::multivector::MultiVector;
use crate::products::{geometric, geometric_unchecked, scalar_product_unchecked};

/// Dual: M* = M · I^{-1} where I is the pseudoscalar.
///
/// Fails with `NonInvertiblePseudoscalar` in degenerate algebras, where
/// I · rev(I) vanishes.
pub fn dual(mv: &MultiVector) -> Result<MultiVector> {
    let pseudo = mv.layout().pseudoscalar();
    let pseudo_rev = pseudo.reverse();
    let norm_sq = scalar_product_unchecked(&pseudo, &pseudo_rev);
    if norm_sq == 0.0 {
        return Err(VersorError::NonInvertiblePseudoscalar(mv.layout().signature().to_string()));
    }
    // I^{-1} = rev(I) / (I * rev(I))
    let pseudo_inv = pseudo_rev.scale(1.0 / norm_sq);
    Ok(geometric_unchecked(mv, &pseudo_inv))
}

/// Sandwich product: R * M * R̃ (used for rotations/reflections).
///
/// R is typically a rotor (even-grade multivector with |R|=1).
pub fn sandwich(rotor: &MultiVector, mv: &MultiVector) -> Result<MultiVector> {
    let temp = geometric(rotor, mv)?;
    Ok(geometric_unchecked(&temp, &rotor.reverse()))
}

/// Create a rotor from a bivector angle: R = exp(-B θ/2)
pub fn rotor_from_bivector(bivector: &MultiVector, angle: f64) -> MultiVector {
    bivector.scale(-angle / 2.0).exp()
}

/// Reflect `v` in the hyperplane orthogonal to `normal`: -n v n^{-1}.
pub fn reflect(normal: &MultiVector, v: &MultiVector) -> Result<MultiVector> {
    let n_sq = scalar_product_unchecked(normal, normal);
    if n_sq == 0.0 {
        return Err(VersorError::NonInvertible(normal.to_string()));
    }
    let n_inv = normal.scale(1.0 / n_sq);
    let temp = geometric(normal, v)?;
    Ok(geometric_unchecked(&temp, &n_inv).scale(-1.0))
}

impl MultiVector {
    /// A · I⁻¹.
    pub fn dual(&self) -> Result<MultiVector> {
        dual(self)
    }
}
