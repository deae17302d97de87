//! Process-wide memoization of constructed layouts.
//!
//! Building the multiplication tables is the only expensive step of using an
//! algebra, so layouts are cached by (signature, blade prefix, first index).
//! Repeated construction of the same algebra returns a clone of the cached
//! handle, which shares the tables.

use std::collections::HashMap;
use std::sync::OnceLock;

use parking_lot::Mutex;
use versor_core::{MetricSignature, Result};

use crate::layout::Layout;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LayoutKey {
    signature: MetricSignature,
    prefix: String,
    first_index: usize,
}

/// Global registry of layouts.
static LAYOUTS: OnceLock<Mutex<HashMap<LayoutKey, Layout>>> = OnceLock::new();

fn layouts() -> &'static Mutex<HashMap<LayoutKey, Layout>> {
    LAYOUTS.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Get or build the layout for a signature and naming scheme.
///
/// The lock is held while building so concurrent callers never build the
/// same tables twice.
pub fn get_or_build(signature: &MetricSignature, prefix: &str, first_index: usize) -> Result<Layout> {
    let key = LayoutKey {
        signature: signature.clone(),
        prefix: prefix.to_string(),
        first_index,
    };
    let mut map = layouts().lock();
    if let Some(layout) = map.get(&key) {
        tracing::trace!("layout cache hit for {}", signature);
        return Ok(layout.clone());
    }
    let layout = Layout::build(signature.clone(), prefix, first_index)?;
    map.insert(key, layout.clone());
    Ok(layout)
}

/// Drop every cached layout. Layouts already handed out stay valid.
pub fn clear_layout_cache() {
    layouts().lock().clear();
}

/// Number of layouts currently cached.
pub fn cached_layout_count() -> usize {
    layouts().lock().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_key_shares_tables() {
        let sig = MetricSignature::from_pqr(2, 2, 0).unwrap();
        let a = get_or_build(&sig, "e", 1).unwrap();
        let b = get_or_build(&sig, "e", 1).unwrap();
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn test_naming_is_part_of_key() {
        let sig = MetricSignature::from_pqr(1, 3, 0).unwrap();
        let e = get_or_build(&sig, "e", 1).unwrap();
        let d = get_or_build(&sig, "d", 0).unwrap();
        assert!(!e.ptr_eq(&d));
        // Same signature, so the algebras are still interchangeable.
        assert_eq!(e, d);
        assert_eq!(d.basis().label(0b11), "d01");
    }
}
