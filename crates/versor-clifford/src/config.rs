//! Algebra construction parameters.

use serde::{Deserialize, Serialize};
use versor_core::{MetricSignature, Result};

/// Parameters for building a layout.
///
/// ```json
/// { "p": 4, "q": 1, "prefix": "e", "first_index": 1 }
/// ```
///
/// An explicit `signature` takes precedence over `p`, `q`, `r`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Generators squaring to +1.
    pub p: usize,
    /// Generators squaring to -1.
    pub q: usize,
    /// Null generators.
    pub r: usize,
    /// Explicit generator squares, in order.
    pub signature: Option<MetricSignature>,
    /// Blade name prefix (`e` gives `e1`, `e12`, ...).
    pub prefix: String,
    /// Index of the first generator in blade names.
    pub first_index: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            p: 0,
            q: 0,
            r: 0,
            signature: None,
            prefix: "e".to_string(),
            first_index: 1,
        }
    }
}

impl LayoutConfig {
    pub fn new(p: usize, q: usize, r: usize) -> Self {
        Self { p, q, r, ..Self::default() }
    }

    pub fn from_signature(signature: MetricSignature) -> Self {
        Self { signature: Some(signature), ..Self::default() }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn with_first_index(mut self, first_index: usize) -> Self {
        self.first_index = first_index;
        self
    }

    /// Resolve the metric signature this config describes.
    pub fn signature(&self) -> Result<MetricSignature> {
        match &self.signature {
            Some(sig) => Ok(sig.clone()),
            None => MetricSignature::from_pqr(self.p, self.q, self.r),
        }
    }
}
