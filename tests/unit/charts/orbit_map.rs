use std::time::Duration;

use super::*;
use crate::{
    animation::clock::ManualClock,
    render::{config::SurfaceConfig, surface::ChartSurface},
};

fn pair(label: &str, value: f64) -> Pair {
    (label.to_string(), value)
}

fn surface(clock: &ManualClock) -> ChartSurface<OrbitMap> {
    let config = SurfaceConfig {
        width: 420,
        height: 320,
        ..SurfaceConfig::default()
    };
    ChartSurface::with_clock(OrbitMap::default(), config, clock.clone()).unwrap()
}

fn num(s: &ChartSurface<OrbitMap>, group: &str, key: &str, name: &str) -> f64 {
    s.scene()
        .find(group, key)
        .unwrap()
        .read_all()
        .unwrap()
        .num(name)
        .unwrap()
}

#[test]
fn map_zooms_in_from_ten_times_its_size() {
    let clock = ManualClock::new();
    let mut s = surface(&clock);
    s.render(vec![pair("tax", 12.5)]).unwrap();
    // R = min((420 - 20) / 4, (320 - 20) / 3) = 100
    assert_eq!(num(&s, MAP, MAP, "R"), 1000.0);
    clock.advance(Duration::from_secs(1));
    s.tick().unwrap();
    assert!((num(&s, MAP, MAP, "R") - 100.0 / 1.2).abs() < 1e-9);
}

#[test]
fn circles_swing_out_to_their_orbit_slots() {
    let clock = ManualClock::new();
    let mut s = surface(&clock);
    s.render(vec![pair("tax", 12.5), pair("people", 3.0), pair("share", 0.4)])
        .unwrap();
    assert_eq!(num(&s, CIRCLES, "tax", "distance"), 0.0);
    assert_eq!(num(&s, CIRCLES, "people", "angle"), 0.0);

    clock.advance(Duration::from_secs(1));
    s.tick().unwrap();
    assert!((num(&s, CIRCLES, "tax", "angle") - PI).abs() < 1e-9);
    assert!((num(&s, CIRCLES, "people", "distance") - 0.9 * 150.0).abs() < 1e-9);
    assert!((num(&s, CIRCLES, "share", "lineDistance") - 150.0 / 2.5).abs() < 1e-9);
    assert_eq!(num(&s, CIRCLES, "people", "R"), 45.0);
    assert!(!s.frame().is_blank());
}

#[test]
fn decorations_close_from_full_circles() {
    let clock = ManualClock::new();
    let mut s = surface(&clock);
    s.render(Vec::new()).unwrap();
    assert_eq!(s.scene().live_in(DECORATIONS).count(), 7);
    assert_eq!(num(&s, DECORATIONS, "2", "endAngle"), TAU);
    assert_eq!(num(&s, DECORATIONS, "2", "dashed"), 1.0);
    assert_eq!(num(&s, DECORATIONS, "6", "R"), 50.0);
    assert_eq!(num(&s, DECORATIONS, "0", "R"), 60.0);

    clock.advance(Duration::from_secs(1));
    s.tick().unwrap();
    assert!((num(&s, DECORATIONS, "2", "startAngle") - PI / 16.0 * 9.0).abs() < 1e-9);
    assert!((num(&s, DECORATIONS, "2", "endAngle") - PI / 16.0 * 14.0).abs() < 1e-9);
}

#[test]
fn second_render_keeps_the_zoom() {
    let clock = ManualClock::new();
    let mut s = surface(&clock);
    s.render(vec![pair("tax", 1.0)]).unwrap();
    clock.advance(Duration::from_secs(1));
    s.tick().unwrap();
    s.render(vec![pair("tax", 2.0)]).unwrap();
    assert!((num(&s, MAP, MAP, "R") - 100.0 / 1.2).abs() < 1e-9);
    assert!((num(&s, CIRCLES, "tax", "angle") - PI).abs() < 1e-9);
    assert_eq!(num(&s, CIRCLES, "tax", "value"), 2.0);
}

#[test]
fn outline_accepts_geojson_in_options() {
    let json = serde_json::json!({
        "outline": {"type": "Polygon", "coordinates": [[[0, 0], [4, 0], [4, 8], [0, 8], [0, 0]]]}
    });
    let options: OrbitMapOptions = serde_json::from_value(json).unwrap();
    assert_eq!(options.outline.bounds().height(), 8.0);
    assert_eq!(options.padding, 10.0);
}
