//! Conformal model: embed an algebra G(n) into G(n+1, 1).
//!
//! Two generators are appended to the base signature, `ep` squaring to +1
//! and `en` squaring to -1. Points map to null vectors through `up`.

use std::collections::BTreeMap;

use versor_core::{Result, VersorError};

use crate::layout::Layout;
use crate::multivector::MultiVector;
use crate::registry;

/// A conformalized algebra and its distinguished elements.
#[derive(Debug, Clone)]
pub struct Conformal {
    base: Layout,
    layout: Layout,
    blades: BTreeMap<String, MultiVector>,
    /// Added generator squaring to +1.
    pub ep: MultiVector,
    /// Added generator squaring to -1.
    pub en: MultiVector,
    /// Origin, ½(en − ep).
    pub eo: MultiVector,
    /// Point at infinity, en + ep.
    pub einf: MultiVector,
    /// Minkowski plane einf ∧ eo.
    pub e0: MultiVector,
    /// Pseudoscalar of the base algebra, embedded.
    pub i_base: MultiVector,
}

/// Build the conformal algebra over `base`.
///
/// The base must be non-degenerate. Blade names keep the base's prefix and
/// numbering, so base blades keep their names in the new algebra.
pub fn conformalize(base: &Layout) -> Result<Conformal> {
    if base.signature().is_degenerate() {
        return Err(VersorError::InvalidSignature(format!(
            "cannot conformalize degenerate {}",
            base.signature()
        )));
    }
    let n = base.dims();
    let signature = base.signature().extended(&[1, -1])?;
    let layout = registry::get_or_build(&signature, base.basis().prefix(), base.basis().first_index())?;

    let ep = layout.blade(1 << n)?;
    let en = layout.blade(1 << (n + 1))?;
    let eo = en.try_sub(&ep)?.scale(0.5);
    let einf = en.try_add(&ep)?;
    let e0 = einf.outer(&eo)?;
    let i_base = layout.blade((1 << n) - 1)?;
    tracing::debug!("conformalized {} into {}", base.signature(), signature);

    Ok(Conformal {
        base: base.clone(),
        blades: layout.blades(),
        layout,
        ep,
        en,
        eo,
        einf,
        e0,
        i_base,
    })
}

impl Conformal {
    pub fn base(&self) -> &Layout {
        &self.base
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Every non-scalar blade of the conformal algebra keyed by name.
    pub fn blades(&self) -> &BTreeMap<String, MultiVector> {
        &self.blades
    }

    /// Carry an element of the base algebra across blade-for-blade.
    /// Elements already in the conformal algebra are returned unchanged.
    pub fn embed(&self, x: &MultiVector) -> Result<MultiVector> {
        if x.layout() == &self.layout {
            return Ok(x.clone());
        }
        self.base.check_same(x.layout())?;
        let mut value = vec![0.0; self.layout.ga_dims()];
        value[..x.value().len()].copy_from_slice(x.value());
        MultiVector::new(&self.layout, value)
    }

    /// Restrict an element to the base blades.
    pub fn project(&self, y: &MultiVector) -> Result<MultiVector> {
        self.layout.check_same(y.layout())?;
        MultiVector::new(&self.base, y.value()[..self.base.ga_dims()].to_vec())
    }

    /// up(x) = x + ½ x² einf + eo.
    pub fn up(&self, x: &MultiVector) -> Result<MultiVector> {
        let x = self.embed(x)?;
        let x2 = x.gp(&x)?;
        x.try_add(&x2.gp(&self.einf)?.scale(0.5))?.try_add(&self.eo)
    }

    /// Normalize a point so that y | einf = -1.
    pub fn homo(&self, y: &MultiVector) -> Result<MultiVector> {
        let w = y.inner(&self.einf)?.scale(-1.0);
        y.try_div(&w)
    }

    /// down(y) = (homo(y) ∧ E0) E0, the Euclidean part of a point.
    pub fn down(&self, y: &MultiVector) -> Result<MultiVector> {
        self.homo(y)?.outer(&self.e0)?.gp(&self.e0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::cl;

    fn cga3() -> (Conformal, BTreeMap<String, MultiVector>) {
        let (base, blades) = cl(3, 0, 0).unwrap();
        (conformalize(&base).unwrap(), blades)
    }

    #[test]
    fn test_null_basis() {
        let (c, _) = cga3();
        assert_eq!(c.layout().signature().squares(), &[1, 1, 1, 1, -1]);
        assert!(c.eo.gp(&c.eo).unwrap().is_zero());
        assert!(c.einf.gp(&c.einf).unwrap().is_zero());
        assert_eq!(c.eo.inner(&c.einf).unwrap(), c.layout().scalar(-1.0));
        assert_eq!(c.e0.gp(&c.e0).unwrap(), c.layout().scalar(1.0));
        assert_eq!(c.e0, c.ep.gp(&c.en).unwrap());
        assert_eq!(c.i_base, c.blades()["e123"]);
    }

    #[test]
    fn test_up_is_null_and_down_inverts() {
        let (c, b) = cga3();
        let x = b["e1"].try_add(&b["e2"].scale(3.0)).unwrap().try_add(&b["e3"].scale(-4.0)).unwrap();
        let p = c.up(&x).unwrap();
        assert!(p.gp(&p).unwrap().max_abs() < 1e-12);

        let back = c.down(&p.scale(7.5)).unwrap();
        assert!(back.approx_eq(&c.embed(&x).unwrap(), 1e-12), "{}", back);
        assert!(c.project(&back).unwrap().approx_eq(&x, 1e-12));
    }

    #[test]
    fn test_inner_product_is_distance() {
        let (c, b) = cga3();
        let x = b["e1"].scale(2.0);
        let y = b["e2"].scale(-1.0);
        let d = c.up(&x).unwrap().inner(&c.up(&y).unwrap()).unwrap();
        // -½|x - y|² = -½(4 + 1)
        assert!((d.scalar_part() + 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_embed_keeps_blade_names() {
        let (c, b) = cga3();
        let e12 = c.embed(&b["e12"]).unwrap();
        assert_eq!(e12, c.blades()["e12"]);
        let (_, b4) = cl(4, 0, 0).unwrap();
        assert!(c.embed(&b4["e1"]).is_err());
    }

    #[test]
    fn test_homo_normalizes_weight() {
        let (c, b) = cga3();
        let p = c.up(&b["e2"]).unwrap().scale(-3.0);
        let h = c.homo(&p).unwrap();
        assert!((h.inner(&c.einf).unwrap().scalar_part() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_base_rejected() {
        let (base, _) = cl(2, 0, 1).unwrap();
        assert!(matches!(conformalize(&base), Err(VersorError::InvalidSignature(_))));
    }
}
