use std::time::Duration;

use super::*;
use crate::{
    animation::clock::ManualClock,
    render::{config::SurfaceConfig, surface::ChartSurface},
};

fn pair(label: &str, value: f64) -> Pair {
    (label.to_string(), value)
}

fn surface(clock: &ManualClock) -> ChartSurface<RadialFan> {
    let config = SurfaceConfig {
        width: 320,
        height: 240,
        duration_ms: 400,
        ..SurfaceConfig::default()
    };
    ChartSurface::with_clock(RadialFan::default(), config, clock.clone()).unwrap()
}

fn attr(s: &ChartSurface<RadialFan>, key: &str, name: &str) -> f64 {
    s.scene()
        .find(GROUP, key)
        .unwrap()
        .read_all()
        .unwrap()
        .num(name)
        .unwrap()
}

#[test]
fn entering_wedges_start_collapsed_at_the_fan_start() {
    let clock = ManualClock::new();
    let mut s = surface(&clock);
    s.render(vec![pair("a", 10.0), pair("b", 20.0)]).unwrap();
    for key in ["a", "b"] {
        assert_eq!(attr(&s, key, "startAngle"), PI);
        assert_eq!(attr(&s, key, "endAngle"), PI);
        assert_eq!(attr(&s, key, "value"), 0.0);
    }
}

#[test]
fn settled_wedges_split_the_fan_evenly() {
    let clock = ManualClock::new();
    let mut s = surface(&clock);
    s.render(vec![pair("a", 10.0), pair("b", 20.0)]).unwrap();
    clock.advance(Duration::from_millis(200));
    s.tick().unwrap();
    let mid = attr(&s, "b", "endAngle");
    assert!(mid > PI && mid < TAU);

    clock.advance(Duration::from_millis(200));
    s.tick().unwrap();
    assert!(!s.is_animating());
    assert!((attr(&s, "a", "startAngle") - PI).abs() < 1e-9);
    assert!((attr(&s, "a", "endAngle") - 1.5 * PI).abs() < 1e-9);
    assert!((attr(&s, "b", "endAngle") - TAU).abs() < 1e-9);
    assert!((attr(&s, "b", "fanRd") - PI / 2.0).abs() < 1e-9);
    assert_eq!(attr(&s, "b", "value"), 20.0);
    assert!(!s.frame().is_blank());
}

#[test]
fn one_timeline_drives_every_wedge() {
    let clock = ManualClock::new();
    let mut s = surface(&clock);
    s.render(vec![pair("a", 1.0), pair("b", 2.0), pair("c", 3.0)]).unwrap();
    assert_eq!(s.render_loop().active_count(), 1);
}

#[test]
fn tiny_canvas_paints_nothing() {
    let config = SurfaceConfig {
        width: 60,
        height: 60,
        ..SurfaceConfig::default()
    };
    let mut s = ChartSurface::with_clock(RadialFan::default(), config, ManualClock::new()).unwrap();
    s.render(vec![pair("a", 1.0)]).unwrap();
    assert!(s.frame().is_blank());
}
