//! Layout: one concrete Clifford algebra.
//!
//! A layout owns the signature, the blade basis, the multiplication tables
//! and the grade/rotor masks. It is immutable after construction and cheap to
//! clone: every `MultiVector` carries a handle to the layout it lives in.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use nalgebra::DMatrix;
use rand::Rng;
use versor_core::{BladeBasis, MetricSignature, Result, VersorError};

use crate::algebra::{MultiplicationTableBuilder, MultiplicationTables};
use crate::config::LayoutConfig;
use crate::multivector::MultiVector;
use crate::registry;

struct LayoutData {
    signature: MetricSignature,
    basis: BladeBasis,
    tables: MultiplicationTables,
    /// grade_masks[g][blade] is true iff the blade has grade g.
    grade_masks: Vec<Vec<bool>>,
    /// Even-grade blades: the support of products of an even number of vectors.
    rotor_mask: Vec<bool>,
}

/// Shared handle to an immutable algebra.
#[derive(Clone)]
pub struct Layout {
    data: Arc<LayoutData>,
}

impl Layout {
    /// Build a layout without consulting the registry.
    pub(crate) fn build(signature: MetricSignature, prefix: &str, first_index: usize) -> Result<Self> {
        let start = Instant::now();
        let n = signature.dims();
        let basis = BladeBasis::new(n, prefix, first_index)?;
        let tables = MultiplicationTableBuilder::new(&signature).build();
        let dim = tables.dim();

        let grade_masks = (0..=n)
            .map(|g| (0..dim).map(|m| basis.grade(m) == g).collect())
            .collect();
        let rotor_mask = (0..dim).map(|m| basis.grade(m) % 2 == 0).collect();

        tracing::debug!(
            "built {} tables: {} blades in {:.3} ms",
            signature,
            dim,
            start.elapsed().as_secs_f64() * 1e3
        );

        Ok(Self {
            data: Arc::new(LayoutData {
                signature,
                basis,
                tables,
                grade_masks,
                rotor_mask,
            }),
        })
    }

    /// Cached layout for a signature, with blades named `e1`, `e2`, ...
    pub fn from_signature(signature: &MetricSignature) -> Result<Self> {
        registry::get_or_build(signature, "e", 1)
    }

    /// Cached layout described by a config.
    pub fn from_config(config: &LayoutConfig) -> Result<Self> {
        registry::get_or_build(&config.signature()?, &config.prefix, config.first_index)
    }

    /// True if both handles point at the same table storage.
    pub fn ptr_eq(&self, other: &Layout) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    pub fn signature(&self) -> &MetricSignature {
        &self.data.signature
    }

    pub fn basis(&self) -> &BladeBasis {
        &self.data.basis
    }

    pub fn tables(&self) -> &MultiplicationTables {
        &self.data.tables
    }

    /// Number of generators n.
    pub fn dims(&self) -> usize {
        self.data.signature.dims()
    }

    /// Number of blades, 2^n.
    pub fn ga_dims(&self) -> usize {
        self.data.tables.dim()
    }

    /// Boolean mask over blades selecting those of `grade`.
    ///
    /// # Panics
    /// Panics if `grade > self.dims()`.
    pub fn grade_mask(&self, grade: usize) -> &[bool] {
        &self.data.grade_masks[grade]
    }

    /// Boolean mask over blades selecting the even sub-algebra.
    pub fn rotor_mask(&self) -> &[bool] {
        &self.data.rotor_mask
    }

    /// Wrap a coefficient array (indexed by blade bitmask).
    pub fn multivector(&self, value: Vec<f64>) -> Result<MultiVector> {
        MultiVector::new(self, value)
    }

    pub fn zero(&self) -> MultiVector {
        MultiVector::zero(self)
    }

    /// `value` on the scalar blade.
    pub fn scalar(&self, value: f64) -> MultiVector {
        MultiVector::scalar(self, value)
    }

    /// Unit basis blade with bitmask `mask`.
    pub fn blade(&self, mask: usize) -> Result<MultiVector> {
        if mask >= self.ga_dims() {
            return Err(VersorError::UnknownBlade(format!(
                "blade index {} outside 0..{}",
                mask,
                self.ga_dims()
            )));
        }
        Ok(MultiVector::from_blade(self, mask, 1.0))
    }

    /// Unit basis blade by name, e.g. `e12`.
    pub fn blade_by_name(&self, name: &str) -> Result<MultiVector> {
        let mask = self
            .basis()
            .index_of(name)
            .ok_or_else(|| VersorError::UnknownBlade(name.to_string()))?;
        self.blade(mask)
    }

    /// Every non-scalar basis blade keyed by name.
    pub fn blades(&self) -> BTreeMap<String, MultiVector> {
        (1..self.ga_dims())
            .map(|m| (self.basis().label(m).to_string(), MultiVector::from_blade(self, m, 1.0)))
            .collect()
    }

    /// Unit blades of one grade, in lexicographic generator order.
    pub fn blades_of_grade(&self, grade: usize) -> Vec<MultiVector> {
        self.basis()
            .blades_of_grade(grade)
            .into_iter()
            .map(|m| MultiVector::from_blade(self, m, 1.0))
            .collect()
    }

    /// The generators e1..en as multivectors.
    pub fn basis_vectors(&self) -> Vec<MultiVector> {
        self.blades_of_grade(1)
    }

    /// Unit pseudoscalar e12...n.
    pub fn pseudoscalar(&self) -> MultiVector {
        MultiVector::from_blade(self, self.ga_dims() - 1, 1.0)
    }

    pub(crate) fn check_same(&self, other: &Layout) -> Result<()> {
        if self == other {
            Ok(())
        } else {
            Err(VersorError::IncompatibleAlgebra {
                left: self.signature().to_string(),
                right: other.signature().to_string(),
            })
        }
    }

    /// Matrix L(a) with `L(a) · b.value == (a * b).value`.
    pub fn get_left_gmt_matrix(&self, a: &MultiVector) -> Result<DMatrix<f64>> {
        self.check_same(a.layout())?;
        let dim = self.ga_dims();
        let tables = self.tables();
        let mut m = DMatrix::zeros(dim, dim);
        for (i, &ai) in a.value().iter().enumerate() {
            if ai == 0.0 {
                continue;
            }
            for (j, sign) in tables.geometric_row(i).iter().enumerate() {
                if !sign.is_zero() {
                    m[(i ^ j, j)] += sign.as_f64() * ai;
                }
            }
        }
        Ok(m)
    }

    /// Matrix R(b) with `R(b) · a.value == (a * b).value`.
    pub fn get_right_gmt_matrix(&self, b: &MultiVector) -> Result<DMatrix<f64>> {
        self.check_same(b.layout())?;
        let dim = self.ga_dims();
        let tables = self.tables();
        let mut m = DMatrix::zeros(dim, dim);
        for (j, &bj) in b.value().iter().enumerate() {
            if bj == 0.0 {
                continue;
            }
            for i in 0..dim {
                let entry = tables.geometric_entry(i, j);
                if !entry.sign.is_zero() {
                    m[(entry.blade, i)] += entry.sign.as_f64() * bj;
                }
            }
        }
        Ok(m)
    }

    /// Random multivector with coefficients uniform in [-1, 1) on the given
    /// grades (all grades when `None`).
    pub fn random_mv_with<R: Rng + ?Sized>(&self, rng: &mut R, grades: Option<&[usize]>) -> MultiVector {
        let value = (0..self.ga_dims())
            .map(|m| {
                let wanted = grades.map_or(true, |gs| gs.contains(&self.basis().grade(m)));
                if wanted {
                    rng.gen_range(-1.0..1.0)
                } else {
                    0.0
                }
            })
            .collect();
        MultiVector::from_parts(self, value)
    }

    pub fn random_mv(&self, grades: Option<&[usize]>) -> MultiVector {
        self.random_mv_with(&mut rand::thread_rng(), grades)
    }

    /// `count` random vectors.
    pub fn random_v_with<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<MultiVector> {
        (0..count).map(|_| self.random_mv_with(rng, Some(&[1]))).collect()
    }

    pub fn random_v(&self, count: usize) -> Vec<MultiVector> {
        self.random_v_with(&mut rand::thread_rng(), count)
    }

    /// Random rotor: the product of an even number of random unit vectors.
    ///
    /// Uses the largest even count not exceeding n (at least two), so the
    /// result generically covers the whole rotor mask.
    pub fn random_rotor_with<R: Rng + ?Sized>(&self, rng: &mut R) -> MultiVector {
        let count = (self.dims() - self.dims() % 2).max(2);
        let mut rotor = self.scalar(1.0);
        for v in self.random_v_with(rng, count) {
            // Null vectors cannot be normalized; they still multiply in.
            let unit = v.normal().unwrap_or(v);
            rotor = crate::products::geometric_unchecked(&rotor, &unit);
        }
        rotor
    }

    pub fn random_rotor(&self) -> MultiVector {
        self.random_rotor_with(&mut rand::thread_rng())
    }
}

impl PartialEq for Layout {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.data.signature == other.data.signature
    }
}

impl Eq for Layout {}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layout")
            .field("signature", &self.signature().squares())
            .field("blades", &self.ga_dims())
            .field("prefix", &self.basis().prefix())
            .finish()
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Layout({})", self.signature())
    }
}

/// Build (or fetch from cache) an algebra and its named blades.
pub fn build_layout(config: &LayoutConfig) -> Result<(Layout, BTreeMap<String, MultiVector>)> {
    let layout = Layout::from_config(config)?;
    let blades = layout.blades();
    Ok((layout, blades))
}

/// Cl(p,q,r) with default blade names.
pub fn cl(p: usize, q: usize, r: usize) -> Result<(Layout, BTreeMap<String, MultiVector>)> {
    build_layout(&LayoutConfig::new(p, q, r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_cl3_shape() {
        let (layout, blades) = cl(3, 0, 0).unwrap();
        assert_eq!(layout.dims(), 3);
        assert_eq!(layout.ga_dims(), 8);
        assert_eq!(blades.len(), 7);
        assert!(blades.contains_key("e123"));
        assert_eq!(blades["e12"].value()[0b011], 1.0);
    }

    #[test]
    fn test_grade_masks_partition() {
        let (layout, _) = cl(4, 1, 0).unwrap();
        for blade in 0..layout.ga_dims() {
            let hits = (0..=layout.dims()).filter(|&g| layout.grade_mask(g)[blade]).count();
            assert_eq!(hits, 1);
        }
        assert_eq!(layout.grade_mask(2).iter().filter(|&&b| b).count(), 10);
        assert_eq!(layout.rotor_mask().iter().filter(|&&b| b).count(), 16);
    }

    #[test]
    fn test_layout_equality() {
        let (a, _) = cl(3, 0, 0).unwrap();
        let (b, _) = cl(3, 0, 0).unwrap();
        let (c, _) = cl(4, 0, 0).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "Layout(Cl(3,0))");
    }

    #[test]
    fn test_layout_debug() {
        let (layout, _) = cl(2, 1, 0).unwrap();
        let dbg = format!("{:?}", layout);
        assert!(dbg.contains("signature: [1, 1, -1]"), "{}", dbg);
        assert!(dbg.contains("blades: 8"), "{}", dbg);
    }

    #[test]
    fn test_blade_lookup() {
        let (layout, _) = cl(3, 0, 0).unwrap();
        assert_eq!(layout.blade_by_name("e23").unwrap().value()[0b110], 1.0);
        assert!(matches!(layout.blade_by_name("e4"), Err(VersorError::UnknownBlade(_))));
        assert!(layout.blade(8).is_err());
        assert_eq!(layout.pseudoscalar().value()[7], 1.0);
    }

    #[test]
    fn test_multivector_length_checked() {
        let (layout, _) = cl(2, 0, 0).unwrap();
        assert!(matches!(
            layout.multivector(vec![0.0; 3]),
            Err(VersorError::LengthMismatch { expected: 4, got: 3 })
        ));
    }

    #[test]
    fn test_random_mv_respects_grades() {
        let (layout, _) = cl(4, 0, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let mv = layout.random_mv_with(&mut rng, Some(&[1, 3]));
        for (m, &c) in mv.value().iter().enumerate() {
            let g = layout.basis().grade(m);
            if g != 1 && g != 3 {
                assert_eq!(c, 0.0);
            }
        }
        assert_eq!(layout.random_v_with(&mut rng, 5).len(), 5);
    }

    #[test]
    fn test_left_right_matrix_on_basis() {
        let (layout, blades) = cl(3, 0, 0).unwrap();
        let e1 = &blades["e1"];
        let e2 = &blades["e2"];
        let l = layout.get_left_gmt_matrix(e1).unwrap();
        let r = layout.get_right_gmt_matrix(e1).unwrap();
        // e1 * e2 = e12, e2 * e1 = -e12
        let v = nalgebra::DVector::from_column_slice(e2.value());
        assert_eq!((&l * &v)[0b011], 1.0);
        assert_eq!((&r * &v)[0b011], -1.0);
    }

    #[test]
    fn test_matrix_rejects_foreign_layout() {
        let (l3, _) = cl(3, 0, 0).unwrap();
        let (_, b2) = cl(2, 0, 0).unwrap();
        assert!(matches!(
            l3.get_left_gmt_matrix(&b2["e1"]),
            Err(VersorError::IncompatibleAlgebra { .. })
        ));
    }
}
