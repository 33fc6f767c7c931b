use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(60, 0).is_err());
}

#[test]
fn fps_frame_time_is_linear() {
    let fps = Fps::new(60, 1).unwrap();
    let t = fps.frame_time(FrameIndex(30));
    assert!((t.as_secs_f64() - 0.5).abs() < 1e-9);
    assert!((fps.frame_duration().as_secs_f64() - 1.0 / 60.0).abs() < 1e-9);
}

#[test]
fn premul_roundtrips_opaque_and_clears_transparent() {
    let c = Rgba8Premul::from_straight_rgba(10, 200, 30, 255);
    assert_eq!(c.to_straight_rgba(), [10, 200, 30, 255]);
    assert_eq!(Rgba8Premul::transparent().to_straight_rgba(), [0, 0, 0, 0]);

    let half = Rgba8Premul::from_straight_rgba(255, 0, 0, 128);
    assert_eq!(half.r, 128);
    assert_eq!(half.to_straight_rgba()[0], 255);
}

#[test]
fn canvas_rect_covers_surface() {
    let c = Canvas {
        width: 40,
        height: 20,
    };
    assert_eq!(c.rect(), Rect::new(0.0, 0.0, 40.0, 20.0));
}
