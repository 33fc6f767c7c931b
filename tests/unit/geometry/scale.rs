use proptest::prelude::*;

use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn band_without_padding_splits_range_evenly() {
    let s = BandScale::new().domain(["a", "b", "c", "d"]).range(0.0, 100.0);
    assert!(approx(s.bandwidth(), 25.0));
    assert!(approx(s.get("a").unwrap(), 0.0));
    assert!(approx(s.get("d").unwrap(), 75.0));
    assert_eq!(s.get("zzz"), None);
}

#[test]
fn band_padding_matches_reference_values() {
    let s = BandScale::new()
        .domain(["a", "b"])
        .range(0.0, 100.0)
        .padding_inner(0.2)
        .padding_outer(0.1);
    // step = 100 / (2 - 0.2 + 0.2) = 50
    assert!(approx(s.step(), 50.0));
    assert!(approx(s.bandwidth(), 40.0));
    // start = (100 - 50 * 1.8) * 0.5 = 5
    assert!(approx(s.get("a").unwrap(), 5.0));
    assert!(approx(s.get("b").unwrap(), 55.0));
}

#[test]
fn band_reversed_range_reverses_positions() {
    let s = BandScale::new().domain(["a", "b"]).range(100.0, 0.0);
    assert!(approx(s.get("a").unwrap(), 50.0));
    assert!(approx(s.get("b").unwrap(), 0.0));
}

#[test]
fn band_duplicate_keys_keep_first_slot() {
    let s = BandScale::new().domain(["a", "b", "a"]).range(0.0, 10.0);
    assert_eq!(s.len(), 2);
}

#[test]
fn point_scale_puts_ends_on_range_bounds() {
    let s = PointScale::new().domain(["x", "y", "z"]).range(10.0, 30.0);
    assert!(approx(s.get("x").unwrap(), 10.0));
    assert!(approx(s.get("y").unwrap(), 20.0));
    assert!(approx(s.get("z").unwrap(), 30.0));
}

#[test]
fn single_point_is_centered() {
    let s = PointScale::new().domain(["only"]).range(0.0, 10.0);
    assert!(approx(s.get("only").unwrap(), 5.0));
}

#[test]
fn linear_maps_and_handles_degenerate_domain() {
    let s = LinearScale::new((0.0, 10.0), (100.0, 200.0));
    assert!(approx(s.apply(5.0), 150.0));
    let flat = LinearScale::new((3.0, 3.0), (0.0, 10.0));
    assert!(approx(flat.apply(3.0), 5.0));
}

#[test]
fn ordinal_cycles_and_remembers() {
    let mut s = OrdinalScale::new(vec![1, 2]);
    assert_eq!(s.get("a"), Some(1));
    assert_eq!(s.get("b"), Some(2));
    assert_eq!(s.get("c"), Some(1));
    assert_eq!(s.get("a"), Some(1));
    assert_eq!(OrdinalScale::<u8>::new(vec![]).get("a"), None);
}

#[test]
fn extent_ignores_non_finite() {
    assert_eq!(extent([3.0, f64::NAN, -1.0, 7.0]), Some((-1.0, 7.0)));
    assert_eq!(extent(std::iter::empty()), None);
}

proptest! {
    #[test]
    fn bands_stay_inside_range(n in 1usize..20, pi in 0.0f64..1.0, po in 0.0f64..2.0, w in 1.0f64..1000.0) {
        let keys: Vec<String> = (0..n).map(|i| format!("k{i}")).collect();
        let s = BandScale::new().domain(keys.clone()).range(0.0, w).padding_inner(pi).padding_outer(po);
        for k in &keys {
            let x = s.get(k).unwrap();
            prop_assert!(x >= -1e-9);
            prop_assert!(x + s.bandwidth() <= w + 1e-6);
        }
    }
}
