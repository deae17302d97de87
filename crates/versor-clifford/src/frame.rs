//! Frames of vectors and their reciprocal frames.

use std::ops::Index;
use std::sync::OnceLock;

use nalgebra::DMatrix;
use versor_core::{Result, VersorError};

use crate::layout::Layout;
use crate::multivector::{MultiVector, GRADE_TOL};
use crate::products::outer;

/// Gram matrix entries closer than this are considered equal.
const INNERMORPHIC_TOL: f64 = 1e-8;

/// An ordered list of vectors from one layout.
///
/// The reciprocal frame is computed on first use and dropped whenever the
/// membership changes.
#[derive(Debug, Clone)]
pub struct Frame {
    layout: Layout,
    vectors: Vec<MultiVector>,
    reciprocal: OnceLock<Vec<MultiVector>>,
}

impl Frame {
    /// Frame over `vectors`; all must be grade-1 elements of one layout.
    pub fn new(vectors: Vec<MultiVector>) -> Result<Self> {
        let layout = vectors
            .first()
            .map(|v| v.layout().clone())
            .ok_or_else(|| VersorError::TypeMismatch("a frame needs at least one vector".into()))?;
        for v in &vectors {
            check_member(&layout, v)?;
        }
        Ok(Self {
            layout,
            vectors,
            reciprocal: OnceLock::new(),
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MultiVector> {
        self.vectors.iter()
    }

    pub fn vectors(&self) -> &[MultiVector] {
        &self.vectors
    }

    pub fn push(&mut self, v: MultiVector) -> Result<()> {
        check_member(&self.layout, &v)?;
        self.vectors.push(v);
        self.reciprocal.take();
        Ok(())
    }

    pub fn set(&mut self, index: usize, v: MultiVector) -> Result<()> {
        check_member(&self.layout, &v)?;
        let len = self.vectors.len();
        let slot = self.vectors.get_mut(index).ok_or_else(|| {
            VersorError::TypeMismatch(format!("frame index {} out of range for {} vectors", index, len))
        })?;
        *slot = v;
        self.reciprocal.take();
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Option<MultiVector> {
        if index >= self.vectors.len() {
            return None;
        }
        self.reciprocal.take();
        Some(self.vectors.remove(index))
    }

    /// G_ij = a_i | a_j.
    pub fn gram_matrix(&self) -> DMatrix<f64> {
        let n = self.vectors.len();
        DMatrix::from_fn(n, n, |i, j| {
            crate::products::scalar_product_unchecked(&self.vectors[i], &self.vectors[j])
        })
    }

    /// The reciprocal frame {aʲ} with a_i | aʲ = δ_ij.
    pub fn reciprocal(&self) -> Result<&[MultiVector]> {
        if let Some(r) = self.reciprocal.get() {
            return Ok(r);
        }
        let computed = self.compute_reciprocal()?;
        Ok(self.reciprocal.get_or_init(|| computed))
    }

    fn compute_reciprocal(&self) -> Result<Vec<MultiVector>> {
        let g_inv = self
            .gram_matrix()
            .try_inverse()
            .ok_or_else(|| VersorError::NonInvertible("frame Gram matrix is singular".into()))?;
        tracing::trace!("computed reciprocal of a {}-vector frame", self.len());

        let n = self.vectors.len();
        let recip = (0..n)
            .map(|j| {
                let mut value = vec![0.0; self.layout.ga_dims()];
                for (k, a) in self.vectors.iter().enumerate() {
                    let w = g_inv[(k, j)];
                    for (slot, c) in value.iter_mut().zip(a.value()) {
                        *slot += w * c;
                    }
                }
                MultiVector::new(&self.layout, value)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(recip)
    }

    /// The reciprocal frame as a new `Frame`.
    pub fn inv(&self) -> Result<Frame> {
        Frame::new(self.reciprocal()?.to_vec())
    }

    /// True if both frames have the same length and the same pairwise inner
    /// products.
    pub fn is_innermorphic_to(&self, other: &Frame) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let a = self.gram_matrix();
        let b = other.gram_matrix();
        a.iter()
            .zip(b.iter())
            .all(|(x, y)| (x - y).abs() <= INNERMORPHIC_TOL * x.abs().max(1.0))
    }

    /// Outer product of the members, a₁ ∧ a₂ ∧ … ∧ a_n.
    pub fn blade(&self) -> MultiVector {
        self.vectors.iter().fold(self.layout.scalar(1.0), |acc, v| {
            outer(&acc, v).unwrap_or_else(|_| acc.zeros_like())
        })
    }
}

fn check_member(layout: &Layout, v: &MultiVector) -> Result<()> {
    layout.check_same(v.layout())?;
    match v.grades(GRADE_TOL).as_slice() {
        [1] => Ok(()),
        _ => Err(VersorError::TypeMismatch(format!("frame members must be vectors, got {}", v))),
    }
}

impl Index<usize> for Frame {
    type Output = MultiVector;

    fn index(&self, index: usize) -> &MultiVector {
        &self.vectors[index]
    }
}

impl<'a> IntoIterator for &'a Frame {
    type Item = &'a MultiVector;
    type IntoIter = std::slice::Iter<'a, MultiVector>;

    fn into_iter(self) -> Self::IntoIter {
        self.vectors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::cl;
    use crate::ops::sandwich;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn check_reciprocal(frame: &Frame) {
        let recip = frame.reciprocal().unwrap();
        for (i, a) in frame.iter().enumerate() {
            for (j, r) in recip.iter().enumerate() {
                let ip = a.inner(r).unwrap().scalar_part();
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((ip - expected).abs() < 1e-9, "a{} | a^{} = {}", i, j, ip);
            }
        }
    }

    #[test]
    fn test_reciprocal_orthonormal_basis() {
        let (layout, _) = cl(3, 0, 0).unwrap();
        let frame = Frame::new(layout.basis_vectors()).unwrap();
        assert_eq!(frame.reciprocal().unwrap(), layout.basis_vectors().as_slice());
    }

    #[test]
    fn test_reciprocal_random_frames() {
        let mut rng = StdRng::seed_from_u64(21);
        for n in 2..=4 {
            let (layout, _) = cl(n, 0, 0).unwrap();
            let frame = Frame::new(layout.random_v_with(&mut rng, n)).unwrap();
            check_reciprocal(&frame);
            check_reciprocal(&frame.inv().unwrap());
        }
    }

    #[test]
    fn test_cache_invalidated_on_change() {
        let (_, b) = cl(3, 0, 0).unwrap();
        let mut frame = Frame::new(vec![b["e1"].clone(), b["e2"].clone()]).unwrap();
        assert_eq!(frame.reciprocal().unwrap()[1], b["e2"]);

        frame.set(1, b["e2"].scale(2.0)).unwrap();
        assert_eq!(frame.reciprocal().unwrap()[1], b["e2"].scale(0.5));

        frame.push(b["e3"].clone()).unwrap();
        assert_eq!(frame.reciprocal().unwrap().len(), 3);

        assert_eq!(frame.remove(0), Some(b["e1"].clone()));
        assert_eq!(frame.reciprocal().unwrap().len(), 2);
        assert_eq!(frame.remove(5), None);
    }

    #[test]
    fn test_singular_frame() {
        let (_, b) = cl(3, 0, 0).unwrap();
        let frame = Frame::new(vec![b["e1"].clone(), b["e1"].scale(3.0)]).unwrap();
        assert!(matches!(frame.reciprocal(), Err(VersorError::NonInvertible(_))));
    }

    #[test]
    fn test_members_must_be_vectors() {
        let (_, b) = cl(3, 0, 0).unwrap();
        assert!(matches!(
            Frame::new(vec![b["e12"].clone()]),
            Err(VersorError::TypeMismatch(_))
        ));
        assert!(Frame::new(Vec::new()).is_err());
        let (_, b4) = cl(4, 0, 0).unwrap();
        let mut frame = Frame::new(vec![b["e1"].clone()]).unwrap();
        assert!(matches!(
            frame.push(b4["e1"].clone()),
            Err(VersorError::IncompatibleAlgebra { .. })
        ));
    }

    #[test]
    fn test_innermorphic_under_rotation() {
        let mut rng = StdRng::seed_from_u64(8);
        for n in 2..=4 {
            let (layout, _) = cl(n, 0, 0).unwrap();
            let a = Frame::new(layout.random_v_with(&mut rng, n)).unwrap();
            let r = layout.random_rotor_with(&mut rng);
            let rotated = a
                .iter()
                .map(|v| sandwich(&r, v).unwrap())
                .collect();
            let b = Frame::new(rotated).unwrap();
            assert!(a.is_innermorphic_to(&b));
        }
        let (layout, _) = cl(3, 0, 0).unwrap();
        let a = Frame::new(layout.basis_vectors()).unwrap();
        let stretched = Frame::new(layout.basis_vectors().iter().map(|v| v.scale(2.0)).collect()).unwrap();
        assert!(!a.is_innermorphic_to(&stretched));
    }

    #[test]
    fn test_frame_blade() {
        let (_, b) = cl(3, 0, 0).unwrap();
        let frame = Frame::new(vec![b["e1"].clone(), b["e2"].clone(), b["e3"].clone()]).unwrap();
        assert_eq!(frame.blade(), b["e123"]);
    }
}
