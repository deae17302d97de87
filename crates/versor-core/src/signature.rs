//! Metric signature of a Clifford algebra Cl(p,q,r).
//!
//! The signature is an ordered list of generator squares:
//! - p generators square to +1
//! - q generators square to -1
//! - r generators square to 0 (degenerate / null)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Result, VersorError};

/// Largest supported number of generators (4096 blades).
pub const MAX_GENERATORS: usize = 12;

/// Ordered generator squares, each one of +1, -1 or 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i8>", into = "Vec<i8>")]
pub struct MetricSignature {
    squares: Vec<i8>,
}

impl MetricSignature {
    /// Build a signature from explicit generator squares.
    pub fn new(squares: Vec<i8>) -> Result<Self> {
        if squares.is_empty() {
            return Err(VersorError::InvalidSignature(
                "an algebra needs at least one generator".into(),
            ));
        }
        if squares.len() > MAX_GENERATORS {
            return Err(VersorError::InvalidSignature(format!(
                "{} generators exceeds the supported maximum of {}",
                squares.len(),
                MAX_GENERATORS
            )));
        }
        if let Some((i, s)) = squares.iter().enumerate().find(|(_, s)| !matches!(**s, -1..=1)) {
            return Err(VersorError::InvalidSignature(format!(
                "generator {} squares to {}, expected +1, -1 or 0",
                i, s
            )));
        }
        Ok(Self { squares })
    }

    /// Signature for `n` generators; fails if `squares.len() != n`.
    pub fn with_dimension(n: usize, squares: Vec<i8>) -> Result<Self> {
        if squares.len() != n {
            return Err(VersorError::InvalidSignature(format!(
                "expected {} generator squares, got {}",
                n,
                squares.len()
            )));
        }
        Self::new(squares)
    }

    /// Cl(p,q,r): p positive, then q negative, then r null generators.
    pub fn from_pqr(p: usize, q: usize, r: usize) -> Result<Self> {
        let n = p
            .checked_add(q)
            .and_then(|s| s.checked_add(r))
            .filter(|&n| n <= MAX_GENERATORS)
            .ok_or_else(|| {
                VersorError::InvalidSignature(format!(
                    "Cl({},{},{}) exceeds {} generators",
                    p, q, r, MAX_GENERATORS
                ))
            })?;
        let mut squares = Vec::with_capacity(n);
        squares.extend(std::iter::repeat(1i8).take(p));
        squares.extend(std::iter::repeat(-1i8).take(q));
        squares.extend(std::iter::repeat(0i8).take(r));
        Self::new(squares)
    }

    /// Accept floating-point squares as long as each is exactly +1, -1 or 0.
    pub fn from_f64(squares: &[f64]) -> Result<Self> {
        let converted = squares
            .iter()
            .enumerate()
            .map(|(i, &s)| {
                if s == 1.0 {
                    Ok(1)
                } else if s == -1.0 {
                    Ok(-1)
                } else if s == 0.0 {
                    Ok(0)
                } else {
                    Err(VersorError::InvalidSignature(format!(
                        "generator {} squares to {}, expected +1, -1 or 0",
                        i, s
                    )))
                }
            })
            .collect::<Result<Vec<i8>>>()?;
        Self::new(converted)
    }

    /// Number of generators n.
    pub fn dims(&self) -> usize {
        self.squares.len()
    }

    /// Number of basis blades, 2^n.
    pub fn blade_count(&self) -> usize {
        1 << self.squares.len()
    }

    /// Square of generator `i`.
    pub fn square(&self, i: usize) -> i8 {
        self.squares[i]
    }

    pub fn squares(&self) -> &[i8] {
        &self.squares
    }

    /// Number of generators squaring to +1.
    pub fn p(&self) -> usize {
        self.squares.iter().filter(|&&s| s == 1).count()
    }

    /// Number of generators squaring to -1.
    pub fn q(&self) -> usize {
        self.squares.iter().filter(|&&s| s == -1).count()
    }

    /// Number of null generators.
    pub fn r(&self) -> usize {
        self.squares.iter().filter(|&&s| s == 0).count()
    }

    pub fn is_degenerate(&self) -> bool {
        self.squares.contains(&0)
    }

    pub fn is_euclidean(&self) -> bool {
        self.squares.iter().all(|&s| s == 1)
    }

    /// Product of the squares of every generator set in `mask`.
    ///
    /// This is the metric factor picked up when the generators in `mask`
    /// are contracted against themselves.
    pub fn metric_product(&self, mask: usize) -> i8 {
        let mut product = 1i8;
        let mut bits = mask;
        while bits != 0 {
            let i = bits.trailing_zeros() as usize;
            product *= self.squares[i];
            if product == 0 {
                return 0;
            }
            bits &= bits - 1;
        }
        product
    }

    /// Append generators, e.g. the extra pair used by the conformal model.
    pub fn extended(&self, extra: &[i8]) -> Result<Self> {
        let mut squares = self.squares.clone();
        squares.extend_from_slice(extra);
        Self::new(squares)
    }
}

impl TryFrom<Vec<i8>> for MetricSignature {
    type Error = VersorError;

    fn try_from(squares: Vec<i8>) -> Result<Self> {
        Self::new(squares)
    }
}

impl From<MetricSignature> for Vec<i8> {
    fn from(sig: MetricSignature) -> Self {
        sig.squares
    }
}

impl fmt::Display for MetricSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (p, q, r) = (self.p(), self.q(), self.r());
        // The (p,q,r) shorthand only describes signatures in canonical order.
        let canonical = Self::from_pqr(p, q, r).map(|s| s == *self).unwrap_or(false);
        if canonical {
            if r == 0 {
                write!(f, "Cl({},{})", p, q)
            } else {
                write!(f, "Cl({},{},{})", p, q, r)
            }
        } else {
            write!(f, "Cl{:?}", self.squares)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pqr_order() {
        let sig = MetricSignature::from_pqr(2, 1, 1).unwrap();
        assert_eq!(sig.squares(), &[1, 1, -1, 0]);
        assert_eq!(sig.dims(), 4);
        assert_eq!(sig.blade_count(), 16);
        assert_eq!((sig.p(), sig.q(), sig.r()), (2, 1, 1));
        assert!(sig.is_degenerate());
    }

    #[test]
    fn test_rejects_bad_squares() {
        assert!(matches!(
            MetricSignature::new(vec![1, 2]),
            Err(VersorError::InvalidSignature(_))
        ));
        assert!(MetricSignature::new(vec![]).is_err());
        assert!(MetricSignature::from_pqr(MAX_GENERATORS + 1, 0, 0).is_err());
        assert!(MetricSignature::from_f64(&[1.0, 0.5]).is_err());
        assert_eq!(
            MetricSignature::from_f64(&[1.0, -1.0, 0.0]).unwrap().squares(),
            &[1, -1, 0]
        );
    }

    #[test]
    fn test_from_pqr_rejects_oversized() {
        assert!(matches!(
            MetricSignature::from_pqr(usize::MAX, 1, 0),
            Err(VersorError::InvalidSignature(_))
        ));
        assert!(matches!(
            MetricSignature::from_pqr(1, usize::MAX, usize::MAX),
            Err(VersorError::InvalidSignature(_))
        ));
        assert!(MetricSignature::from_pqr(1_000_000_000, 0, 0).is_err());
        assert!(MetricSignature::from_pqr(6, 4, 2).is_ok());
        assert!(MetricSignature::from_pqr(6, 4, 3).is_err());
    }

    #[test]
    fn test_with_dimension_checks_length() {
        assert!(MetricSignature::with_dimension(3, vec![1, 1]).is_err());
        assert!(MetricSignature::with_dimension(2, vec![1, -1]).is_ok());
    }

    #[test]
    fn test_metric_product() {
        let sig = MetricSignature::new(vec![1, -1, -1, 0]).unwrap();
        assert_eq!(sig.metric_product(0b0000), 1);
        assert_eq!(sig.metric_product(0b0001), 1);
        assert_eq!(sig.metric_product(0b0010), -1);
        assert_eq!(sig.metric_product(0b0110), 1);
        assert_eq!(sig.metric_product(0b1001), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(MetricSignature::from_pqr(3, 0, 0).unwrap().to_string(), "Cl(3,0)");
        assert_eq!(MetricSignature::from_pqr(3, 0, 1).unwrap().to_string(), "Cl(3,0,1)");
        assert_eq!(MetricSignature::new(vec![-1, 1]).unwrap().to_string(), "Cl[-1, 1]");
    }

    #[test]
    fn test_serde_validates() {
        let sig: MetricSignature = serde_json::from_str("[1,1,-1]").unwrap();
        assert_eq!(sig.q(), 1);
        assert!(serde_json::from_str::<MetricSignature>("[1,3]").is_err());
    }
}
