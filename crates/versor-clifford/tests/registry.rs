//! Layout cache reset. Kept in its own test binary so that clearing the
//! process-wide cache cannot race with other tests.

use versor_clifford::{cached_layout_count, cl, clear_layout_cache};

#[test]
fn test_clear_rebuilds_layouts() {
    let (first, blades) = cl(3, 1, 0).unwrap();
    let (again, _) = cl(3, 1, 0).unwrap();
    assert!(first.ptr_eq(&again));
    assert!(cached_layout_count() >= 1);

    clear_layout_cache();
    assert_eq!(cached_layout_count(), 0);

    let (rebuilt, _) = cl(3, 1, 0).unwrap();
    assert!(!first.ptr_eq(&rebuilt));
    assert_eq!(first, rebuilt);
    // Elements built before the reset still work with the new handle.
    let e1 = rebuilt.blade_by_name("e1").unwrap();
    assert_eq!((&blades["e1"] * &e1).scalar_part(), 1.0);
}
