//! Arrays of multivectors produced by broadcasting.

use std::ops::Index;

use versor_core::{Result, VersorError};

use crate::layout::Layout;
use crate::multivector::MultiVector;

/// An ordered collection of multivectors sharing one layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MvArray {
    items: Vec<MultiVector>,
}

impl MvArray {
    /// Wrap `items`; every element must live in the same algebra.
    pub fn new(items: Vec<MultiVector>) -> Result<Self> {
        if let Some(first) = items.first() {
            for item in &items[1..] {
                first.check_compatible(item)?;
            }
        }
        Ok(Self { items })
    }

    /// Callers guarantee the elements share a layout.
    pub(crate) fn from_vec(items: Vec<MultiVector>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MultiVector> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[MultiVector] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<MultiVector> {
        self.items
    }

    /// Layout of the elements, `None` when empty.
    pub fn layout(&self) -> Option<&Layout> {
        self.items.first().map(MultiVector::layout)
    }

    /// Coefficient arrays, one row per element.
    pub fn values(&self) -> Vec<Vec<f64>> {
        self.items.iter().map(|mv| mv.value().to_vec()).collect()
    }

    pub fn map<F>(&self, f: F) -> Result<MvArray>
    where
        F: FnMut(&MultiVector) -> Result<MultiVector>,
    {
        self.items.iter().map(f).collect::<Result<Vec<_>>>().map(Self::from_vec)
    }

    /// Each element divided by its magnitude.
    pub fn normal(&self) -> Result<MvArray> {
        self.map(MultiVector::normal)
    }

    /// Each element's dual.
    pub fn dual(&self) -> Result<MvArray> {
        self.map(MultiVector::dual)
    }

    /// Element-wise `approx_eq`; lengths must match.
    pub fn approx_eq(&self, other: &MvArray, tol: f64) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a.approx_eq(b, tol))
    }

    /// Sum of the elements, `None` when empty.
    pub fn sum(&self) -> Option<MultiVector> {
        let (first, rest) = self.items.split_first()?;
        let mut total = first.clone();
        for mv in rest {
            for (t, c) in total.value_mut().iter_mut().zip(mv.value()) {
                *t += c;
            }
        }
        Some(total)
    }

    pub(crate) fn check_len(&self, got: usize) -> Result<()> {
        if self.len() == got {
            Ok(())
        } else {
            Err(VersorError::LengthMismatch { expected: self.len(), got })
        }
    }
}

impl Index<usize> for MvArray {
    type Output = MultiVector;

    fn index(&self, index: usize) -> &MultiVector {
        &self.items[index]
    }
}

impl IntoIterator for MvArray {
    type Item = MultiVector;
    type IntoIter = std::vec::IntoIter<MultiVector>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a MvArray {
    type Item = &'a MultiVector;
    type IntoIter = std::slice::Iter<'a, MultiVector>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::cl;

    #[test]
    fn test_mixed_layouts_rejected() {
        let (_, b3) = cl(3, 0, 0).unwrap();
        let (_, b2) = cl(2, 0, 0).unwrap();
        assert!(MvArray::new(vec![b3["e1"].clone(), b2["e1"].clone()]).is_err());
        assert!(MvArray::new(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_normal_and_sum() {
        let (_, b) = cl(3, 0, 0).unwrap();
        let arr = MvArray::new(vec![b["e1"].scale(2.0), b["e2"].scale(-4.0)]).unwrap();
        let n = arr.normal().unwrap();
        assert_eq!(n[0], b["e1"]);
        assert_eq!(n[1], b["e2"].scale(-1.0));
        assert_eq!(arr.sum().unwrap(), b["e1"].scale(2.0).try_sub(&b["e2"].scale(4.0)).unwrap());
        assert_eq!(arr.values()[1][0b010], -4.0);
    }

    #[test]
    fn test_dual_each() {
        let (_, b) = cl(3, 0, 0).unwrap();
        let arr = MvArray::new(vec![b["e1"].clone(), b["e12"].clone()]).unwrap();
        let d = arr.dual().unwrap();
        assert_eq!(d[0].grades(0.0), vec![2]);
        assert_eq!(d[1].grades(0.0), vec![1]);
    }
}
