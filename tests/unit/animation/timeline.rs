use super::*;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn builder_collects_targets() {
    let t = Transition::new(ms(300))
        .ease(Ease::InOutCubic)
        .attr(ShapeId(1), "value", 5.0)
        .attr_from(ShapeId(1), "angle", 0.0, 2.0)
        .attr(ShapeId(2), "fillStyle", "#ff0000");
    assert_eq!(t.len(), 3);
    assert_eq!(t.ease, Ease::InOutCubic);
    assert_eq!(t.targets[1].from, Some(AttrValue::Num(0.0)));
}

#[test]
fn progress_is_clamped_and_relative_to_start() {
    let mut tl = Timeline::pending(TimelineId(0), Transition::new(ms(100)), None);
    assert_eq!(tl.progress_at(ms(50)), 0.0);
    tl.started_at = Some(ms(1000));
    assert_eq!(tl.progress_at(ms(900)), 0.0);
    assert!((tl.progress_at(ms(1050)) - 0.5).abs() < 1e-9);
    assert_eq!(tl.progress_at(ms(5000)), 1.0);
}

#[test]
fn zero_duration_is_complete_immediately() {
    let mut tl = Timeline::pending(TimelineId(0), Transition::new(Duration::ZERO), None);
    tl.started_at = Some(ms(10));
    assert_eq!(tl.progress_at(ms(10)), 1.0);
}

#[test]
fn numeric_tracks_interpolate_and_strings_switch() {
    let num = Track {
        shape: ShapeId(0),
        name: "v".into(),
        from: AttrValue::Num(20.0),
        to: AttrValue::Num(25.0),
        owned: true,
    };
    assert!(num.interpolates());
    assert_eq!(num.value_at(0.5), AttrValue::Num(22.5));

    let text = Track {
        shape: ShapeId(0),
        name: "label".into(),
        from: AttrValue::Str("a".into()),
        to: AttrValue::Str("b".into()),
        owned: false,
    };
    assert!(!text.interpolates());
    assert_eq!(text.value_at(0.0), AttrValue::Str("b".into()));
}

#[test]
fn terminal_states() {
    assert!(!TimelineState::Pending.is_terminal());
    assert!(!TimelineState::Running.is_terminal());
    assert!(TimelineState::Completed.is_terminal());
    assert!(TimelineState::Interrupted.is_terminal());
}
