use super::*;
use crate::{animation::timeline::TimelineState, foundation::color::Color};

struct Bars;

impl Chart for Bars {
    type Datum = (&'static str, f64);

    fn bind_data(&mut self, data: &[Self::Datum], stage: &mut Stage<'_>) -> ChartResult<()> {
        let join = stage.join("bars", data, |d| d.0.to_string());
        let mut t = stage.transition();
        for &id in join.bound() {
            let Some(index) = stage.scene().shape(id).map(|s| s.datum_index()) else {
                continue;
            };
            let (label, value) = data[index];
            stage.write(id, "label", label);
            stage.write(id, "index", index as f64);
            t = t.attr(id, "value", value);
        }
        stage.start(t);
        Ok(())
    }

    fn paint_shapes(&self, scene: &Scene, ctx: &mut RasterContext) -> ChartResult<()> {
        ctx.set_fill_style(Color::rgb8(200, 40, 40));
        for shape in scene.shapes_in("bars") {
            let attrs = shape.read_all()?;
            let x = attrs.num("index")? * 10.0;
            ctx.fill_rect(x, 0.0, 8.0, attrs.num("value")?);
        }
        Ok(())
    }
}

struct Unwired;

impl Chart for Unwired {
    type Datum = u8;

    fn bind_data(&mut self, data: &[u8], stage: &mut Stage<'_>) -> ChartResult<()> {
        stage.join("g", data, |d| d.to_string());
        Ok(())
    }

    fn paint_shapes(&self, scene: &Scene, _ctx: &mut RasterContext) -> ChartResult<()> {
        for s in scene.shapes_in("g") {
            s.read_all()?;
        }
        Ok(())
    }
}

// Binds like `Unwired` but rejects datasets containing zero after joining them.
struct NoZeros;

impl Chart for NoZeros {
    type Datum = u8;

    fn bind_data(&mut self, data: &[u8], stage: &mut Stage<'_>) -> ChartResult<()> {
        let join = stage.join("g", data, |d| d.to_string());
        for &id in join.bound() {
            stage.write(id, "seen", 1.0);
        }
        if data.contains(&0) {
            return Err(ChartError::malformed("zero is not allowed"));
        }
        Ok(())
    }

    fn paint_shapes(&self, _scene: &Scene, _ctx: &mut RasterContext) -> ChartResult<()> {
        Ok(())
    }
}

fn surface(clock: &ManualClock) -> ChartSurface<Bars> {
    let config = SurfaceConfig {
        width: 64,
        height: 64,
        duration_ms: 100,
        ..SurfaceConfig::default()
    };
    ChartSurface::with_clock(Bars, config, clock.clone()).unwrap()
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn render_paints_once_synchronously() {
    let clock = ManualClock::new();
    let mut s = surface(&clock);
    s.render(vec![("a", 10.0), ("b", 20.0)]).unwrap();
    assert_eq!(s.stats().paints, 1);
    assert_eq!(s.stats().ticks, 0);
    assert!(s.is_animating());
    assert_eq!(s.root_datum().len(), 2);
}

#[test]
fn tick_without_animation_does_nothing() {
    let clock = ManualClock::new();
    let mut s = surface(&clock);
    assert!(!s.tick().unwrap());
    assert_eq!(s.stats(), SurfaceStats::default());
}

#[test]
fn last_tick_adds_one_settled_repaint() {
    let clock = ManualClock::new();
    let mut s = surface(&clock);
    s.render(vec![("a", 10.0)]).unwrap();

    clock.advance(ms(50));
    assert!(s.tick().unwrap());
    assert_eq!(s.stats().paints, 2);

    clock.advance(ms(50));
    assert!(s.tick().unwrap());
    assert_eq!(s.stats().paints, 4);
    assert!(!s.is_animating());
    assert!(s.render_loop().invariant_holds());

    assert!(!s.tick().unwrap());
    assert_eq!(s.stats().paints, 4);
}

#[test]
fn repeated_paint_is_pixel_identical() {
    let clock = ManualClock::new();
    let mut s = surface(&clock);
    s.render(vec![("a", 10.0), ("b", 40.0)]).unwrap();
    clock.advance(ms(30));
    s.tick().unwrap();
    s.paint().unwrap();
    let first = s.frame();
    s.paint().unwrap();
    assert_eq!(first, s.frame());
    assert!(!first.is_blank());
}

#[test]
fn background_fills_the_surface() {
    let clock = ManualClock::new();
    let config = SurfaceConfig {
        width: 8,
        height: 8,
        background: Color::rgb8(0, 0, 255),
        ..SurfaceConfig::default()
    };
    let mut s = ChartSurface::with_clock(Bars, config, clock).unwrap();
    s.render(Vec::new()).unwrap();
    assert_eq!(s.frame().pixel(7, 7), Some([0, 0, 255, 255]));
}

#[test]
fn run_until_idle_delivers_every_frame() {
    let clock = ManualClock::new();
    let mut s = surface(&clock);
    s.render(vec![("a", 10.0)]).unwrap();
    let mut seen = Vec::new();
    let n = s
        .run_until_idle(&clock, Fps::new(50, 1).unwrap(), 1000, |i, f| {
            seen.push((i, f.width));
            Ok(())
        })
        .unwrap();
    // 100 ms at 50 fps: the initial frame plus 5 ticks
    assert_eq!(n, 6);
    assert_eq!(seen.len(), 6);
    assert_eq!(seen[5].0, FrameIndex(5));
    assert!(!s.is_animating());
    let v = s.scene().find("bars", "a").unwrap().read_all().unwrap().num("value").unwrap();
    assert_eq!(v, 10.0);
}

#[test]
fn run_until_idle_honours_frame_limit() {
    let clock = ManualClock::new();
    let mut s = surface(&clock);
    s.render(vec![("a", 10.0)]).unwrap();
    let n = s
        .run_until_idle(&clock, Fps::new(1000, 1).unwrap(), 3, |_, _| Ok(()))
        .unwrap();
    assert_eq!(n, 3);
    assert!(s.is_animating());
}

#[test]
fn rerender_prunes_finished_timelines() {
    let clock = ManualClock::new();
    let mut s = surface(&clock);
    s.render(vec![("a", 10.0)]).unwrap();
    clock.advance(ms(200));
    s.tick().unwrap();
    assert!(
        s.animator()
            .timelines()
            .all(|t| t.state() == TimelineState::Completed)
    );
    s.render(vec![("a", 5.0)]).unwrap();
    assert_eq!(s.animator().timelines().count(), 1);
}

#[test]
fn reading_undeclared_attributes_fails_the_paint() {
    let mut s = ChartSurface::with_clock(Unwired, SurfaceConfig::default(), ManualClock::new()).unwrap();
    let err = s.render(vec![1, 2]).unwrap_err();
    assert!(err.is_precondition());
    assert_eq!(s.stats().paints, 0);
}

#[test]
fn missing_font_file_is_reported() {
    let config = SurfaceConfig {
        font_path: Some("/definitely/not/here.ttf".into()),
        ..SurfaceConfig::default()
    };
    assert!(matches!(
        ChartSurface::new(Bars, config),
        Err(ChartError::Render(_))
    ));
}

#[test]
fn failed_bind_keeps_previous_root_and_settles_exits() {
    let clock = ManualClock::new();
    let config = SurfaceConfig {
        width: 16,
        height: 16,
        ..SurfaceConfig::default()
    };
    let mut s = ChartSurface::with_clock(NoZeros, config, clock.clone()).unwrap();
    s.render(vec![1, 2]).unwrap();
    assert_eq!(s.stats().renders, 1);

    let err = s.render(vec![2, 0]).unwrap_err();
    assert!(matches!(err, ChartError::MalformedInput(_)));
    assert_eq!(s.root_datum(), &[1, 2]);
    assert_eq!(s.stats().renders, 1);
    assert_eq!(s.stats().paints, 1);
    assert!(s.scene().find("g", "1").is_none());
    assert!(s.scene().shapes_in("g").all(|sh| sh.is_live()));
    assert_eq!(s.scene().removed().len(), 1);
}
