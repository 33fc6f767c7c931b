use super::*;

fn ctx(w: u32, h: u32) -> RasterContext {
    RasterContext::new(Canvas {
        width: w,
        height: h,
    })
    .unwrap()
}

fn is_red(px: [u8; 4]) -> bool {
    px[0] > 250 && px[1] < 5 && px[2] < 5 && px[3] > 250
}

#[test]
fn zero_sized_canvas_is_rejected() {
    assert!(RasterContext::new(Canvas { width: 0, height: 4 }).is_err());
    assert!(RasterContext::new(Canvas { width: 70_000, height: 4 }).is_err());
}

#[test]
fn fill_rect_covers_exactly_its_pixels() {
    let mut c = ctx(16, 16);
    c.begin_frame();
    c.set_fill_style(Color::rgb8(255, 0, 0));
    c.fill_rect(4.0, 4.0, 8.0, 8.0);
    c.present();
    let f = c.frame();
    assert!(is_red(f.pixel(8, 8).unwrap()));
    assert_eq!(f.pixel(1, 1), Some([0, 0, 0, 0]));
    assert_eq!(f.pixel(16, 0), None);
}

#[test]
fn frame_only_changes_on_present() {
    let mut c = ctx(8, 8);
    c.begin_frame();
    c.set_fill_style(Color::rgb8(255, 0, 0));
    c.fill_rect(0.0, 0.0, 8.0, 8.0);
    assert!(c.frame().is_blank());
    c.present();
    assert!(!c.frame().is_blank());

    c.begin_frame();
    assert!(!c.frame().is_blank());
    c.present();
    assert!(c.frame().is_blank());
}

#[test]
fn restore_brings_back_transform_and_paint() {
    let mut c = ctx(20, 20);
    c.begin_frame();
    c.set_fill_style(Color::rgb8(255, 0, 0));
    c.save();
    c.translate(10.0, 10.0);
    c.set_fill_style(Color::rgb8(0, 0, 255));
    c.restore();
    assert_eq!(c.current_transform(), Affine::IDENTITY);
    c.fill_rect(0.0, 0.0, 5.0, 5.0);
    c.present();
    let f = c.frame();
    assert!(is_red(f.pixel(2, 2).unwrap()));
    assert_eq!(f.pixel(12, 12), Some([0, 0, 0, 0]));
}

#[test]
fn unbalanced_restore_is_ignored() {
    let mut c = ctx(4, 4);
    c.translate(1.0, 2.0);
    c.restore();
    assert_eq!(c.current_transform(), Affine::translate((1.0, 2.0)));
}

#[test]
fn path_points_keep_the_transform_they_were_added_with() {
    let mut c = ctx(20, 20);
    c.begin_frame();
    c.set_fill_style(Color::rgb8(255, 0, 0));
    c.translate(10.0, 10.0);
    c.begin_path();
    c.rect(0.0, 0.0, 6.0, 6.0);
    c.set_transform(Affine::IDENTITY);
    c.fill();
    c.present();
    let f = c.frame();
    assert!(is_red(f.pixel(13, 13).unwrap()));
    assert_eq!(f.pixel(3, 3), Some([0, 0, 0, 0]));
}

#[test]
fn full_circle_arc_fills_its_disc() {
    let mut c = ctx(40, 40);
    c.begin_frame();
    c.set_fill_style(Color::rgb8(255, 0, 0));
    c.begin_path();
    c.arc(20.0, 20.0, 10.0, 0.0, std::f64::consts::TAU, false);
    c.fill();
    c.present();
    let f = c.frame();
    assert!(is_red(f.pixel(20, 20).unwrap()));
    assert!(is_red(f.pixel(27, 20).unwrap()));
    assert_eq!(f.pixel(2, 2), Some([0, 0, 0, 0]));
}

#[test]
fn global_alpha_scales_coverage() {
    let mut c = ctx(8, 8);
    c.begin_frame();
    c.set_global_alpha(0.5);
    c.set_fill_style(Color::rgb8(255, 0, 0));
    c.fill_rect(0.0, 0.0, 8.0, 8.0);
    c.present();
    let a = c.frame().pixel(4, 4).unwrap()[3];
    assert!((120..=136).contains(&a), "alpha {a}");
}

#[test]
fn gradient_runs_from_start_to_end_color() {
    let mut c = ctx(100, 4);
    c.begin_frame();
    let g = LinearGradient::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0))
        .add_stop(0.0, Color::rgb8(255, 0, 0))
        .add_stop(1.0, Color::rgb8(0, 0, 255));
    c.set_fill_style(g);
    c.fill_rect(0.0, 0.0, 100.0, 4.0);
    c.present();
    let f = c.frame();
    let left = f.pixel(1, 2).unwrap();
    let right = f.pixel(98, 2).unwrap();
    assert!(left[0] > left[2]);
    assert!(right[2] > right[0]);
}

#[test]
fn gradient_stops_are_sorted_and_clamped() {
    let g = LinearGradient::new(Point::ZERO, Point::new(1.0, 0.0))
        .add_stop(1.5, Color::WHITE)
        .add_stop(0.2, Color::BLACK);
    let offsets: Vec<f64> = g.stops.iter().map(|(o, _)| *o).collect();
    assert_eq!(offsets, vec![0.2, 1.0]);
}

#[test]
fn stroke_paints_along_the_outline_only() {
    let mut c = ctx(30, 30);
    c.begin_frame();
    c.set_stroke_style(Color::rgb8(255, 0, 0));
    c.set_line_width(4.0);
    c.begin_path();
    c.rect(5.0, 5.0, 20.0, 20.0);
    c.stroke();
    c.present();
    let f = c.frame();
    assert!(is_red(f.pixel(5, 15).unwrap()));
    assert_eq!(f.pixel(15, 15), Some([0, 0, 0, 0]));
}

#[test]
fn text_without_font_is_skipped_and_measured_by_estimate() {
    let mut c = ctx(40, 20);
    assert!(!c.has_font());
    c.begin_frame();
    c.set_font_size(10.0);
    c.fill_text("hello", 2.0, 15.0);
    c.present();
    assert!(c.frame().is_blank());
    assert!((c.measure_text("hello") - 30.0).abs() < 1e-9);
}

#[test]
fn odd_dash_patterns_are_repeated() {
    let mut c = ctx(4, 4);
    c.set_line_dash(&[2.0, 1.0, 3.0]);
    assert_eq!(c.state.line_dash, vec![2.0, 1.0, 3.0, 2.0, 1.0, 3.0]);
    c.set_line_dash(&[-1.0]);
    assert_eq!(c.state.line_dash.len(), 6);
}
