use super::*;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn scene_with(keys: &[&str]) -> (Scene, Vec<ShapeId>) {
    let mut scene = Scene::new();
    let items: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
    let join = scene.join("g", &items, |k| k.clone());
    (scene, join.entered().to_vec())
}

fn num(scene: &Scene, id: ShapeId, name: &str) -> f64 {
    scene.shape(id).unwrap().read_all().unwrap().num(name).unwrap()
}

#[test]
fn missing_start_value_animates_from_zero() {
    let (mut scene, ids) = scene_with(&["a"]);
    let mut anim = Animator::new();
    let t = anim.start(&mut scene, Transition::new(ms(100)).attr(ids[0], "value", 10.0), ms(0));

    assert_eq!(num(&scene, ids[0], "value"), 0.0);
    assert!(anim.render_loop().is_ticking());

    anim.advance(&mut scene, ms(50));
    assert!((num(&scene, ids[0], "value") - 5.0).abs() < 1e-9);

    anim.advance(&mut scene, ms(100));
    assert_eq!(num(&scene, ids[0], "value"), 10.0);
    assert_eq!(anim.timeline(t).unwrap().state(), TimelineState::Completed);
    assert!(!anim.render_loop().is_ticking());
    assert!(anim.render_loop().final_repaint_pending());
}

#[test]
fn completion_writes_exact_target() {
    let (mut scene, ids) = scene_with(&["a"]);
    let mut anim = Animator::new();
    anim.start(
        &mut scene,
        Transition::new(ms(3)).ease(crate::animation::ease::Ease::InOutCubic).attr_from(ids[0], "v", 0.1, 0.7),
        ms(0),
    );
    anim.advance(&mut scene, ms(1));
    anim.advance(&mut scene, ms(2));
    anim.advance(&mut scene, ms(9));
    assert_eq!(num(&scene, ids[0], "v"), 0.7);
}

#[test]
fn interruption_starts_from_interpolated_value_and_ends_once() {
    let (mut scene, ids) = scene_with(&["a"]);
    let mut anim = Animator::new();
    let t1 = anim.start(&mut scene, Transition::new(ms(100)).attr_from(ids[0], "v", 0.0, 100.0), ms(0));
    anim.advance(&mut scene, ms(30));

    let t2 = anim.start(&mut scene, Transition::new(ms(100)).attr(ids[0], "v", 0.0), ms(40));
    let t1_state = anim.timeline(t1).unwrap().state();
    assert_eq!(t1_state, TimelineState::Interrupted);
    assert_eq!(anim.render_loop().ends(), 1);
    assert_eq!(anim.render_loop().active_count(), 1);
    assert!(anim.render_loop().is_ticking());

    let from = anim.timeline(t2).unwrap().track(ids[0], "v").unwrap().from.as_num().unwrap();
    assert!((from - 40.0).abs() < 1e-9, "from={from}");
    assert_eq!(anim.owner_of(ids[0], "v"), Some(t2));

    anim.advance(&mut scene, ms(200));
    assert_eq!(anim.render_loop().ends(), 2);
    assert_eq!(anim.timeline(t1).unwrap().state(), TimelineState::Interrupted);
    assert!(anim.is_idle());
}

#[test]
fn disjoint_attributes_run_concurrently() {
    let (mut scene, ids) = scene_with(&["a"]);
    let mut anim = Animator::new();
    let t1 = anim.start(&mut scene, Transition::new(ms(100)).attr(ids[0], "x", 1.0), ms(0));
    let t2 = anim.start(&mut scene, Transition::new(ms(50)).attr(ids[0], "y", 1.0), ms(0));
    assert_eq!(anim.render_loop().active_count(), 2);

    anim.advance(&mut scene, ms(60));
    assert_eq!(anim.timeline(t2).unwrap().state(), TimelineState::Completed);
    assert_eq!(anim.timeline(t1).unwrap().state(), TimelineState::Running);
    assert!(anim.render_loop().is_ticking());
}

#[test]
fn partial_takeover_interrupts_the_old_timeline_on_that_shape() {
    let (mut scene, ids) = scene_with(&["a"]);
    let mut anim = Animator::new();
    let t1 = anim.start(
        &mut scene,
        Transition::new(ms(100))
            .attr_from(ids[0], "x", 0.0, 10.0)
            .attr_from(ids[0], "y", 0.0, 10.0),
        ms(0),
    );
    anim.start(&mut scene, Transition::new(ms(100)).attr(ids[0], "x", 0.0), ms(50));

    let tl = anim.timeline(t1).unwrap();
    assert_eq!(tl.state(), TimelineState::Interrupted);
    assert!(!tl.track(ids[0], "y").unwrap().is_owned());
    assert!(anim.owner_of(ids[0], "y").is_none());
    assert_eq!(anim.render_loop().ends(), 1);

    let y = num(&scene, ids[0], "y");
    assert!((y - 5.0).abs() < 1e-9, "y={y}");
    anim.advance(&mut scene, ms(80));
    assert_eq!(num(&scene, ids[0], "y"), y);
}

#[test]
fn takeover_leaves_other_shapes_animating() {
    let (mut scene, ids) = scene_with(&["a", "b"]);
    let mut anim = Animator::new();
    let t1 = anim.start(
        &mut scene,
        Transition::new(ms(100))
            .attr_from(ids[0], "x", 0.0, 10.0)
            .attr_from(ids[1], "x", 0.0, 10.0),
        ms(0),
    );
    anim.start(&mut scene, Transition::new(ms(100)).attr(ids[0], "x", 0.0), ms(50));

    assert_eq!(anim.timeline(t1).unwrap().state(), TimelineState::Running);
    assert_eq!(anim.owner_of(ids[1], "x"), Some(t1));
    anim.advance(&mut scene, ms(100));
    assert_eq!(num(&scene, ids[1], "x"), 10.0);
    assert_eq!(anim.timeline(t1).unwrap().state(), TimelineState::Completed);
}

#[test]
fn string_target_takes_over_a_running_number() {
    let (mut scene, ids) = scene_with(&["a"]);
    let mut anim = Animator::new();
    let t1 = anim.start(&mut scene, Transition::new(ms(100)).attr_from(ids[0], "x", 0.0, 100.0), ms(0));
    let t2 = anim.start(&mut scene, Transition::new(ms(100)).attr(ids[0], "x", "none"), ms(10));

    assert_eq!(anim.timeline(t1).unwrap().state(), TimelineState::Interrupted);
    assert!(anim.owner_of(ids[0], "x").is_none());

    anim.advance(&mut scene, ms(50));
    let attrs = scene.shape(ids[0]).unwrap().read_all().unwrap();
    assert_eq!(attrs.text("x").unwrap(), "none");
    assert_eq!(anim.timeline(t2).unwrap().state(), TimelineState::Running);

    anim.advance(&mut scene, ms(110));
    assert_eq!(anim.timeline(t2).unwrap().state(), TimelineState::Completed);
    assert!(anim.is_idle());
}

#[test]
fn string_targets_switch_at_start() {
    let (mut scene, ids) = scene_with(&["a"]);
    let mut anim = Animator::new();
    anim.start(&mut scene, Transition::new(ms(100)).attr(ids[0], "fillStyle", "#ff0000"), ms(0));
    let attrs = scene.shape(ids[0]).unwrap().read_all().unwrap();
    assert_eq!(attrs.text("fillStyle").unwrap(), "#ff0000");
    assert!(anim.owner_of(ids[0], "fillStyle").is_none());
}

#[test]
fn chained_timeline_waits_for_predecessor() {
    let (mut scene, ids) = scene_with(&["a"]);
    let mut anim = Animator::new();
    let t1 = anim.start(&mut scene, Transition::new(ms(100)).attr(ids[0], "r", 10.0), ms(0));
    let t2 = anim
        .start_after(&mut scene, t1, Transition::new(ms(100)).attr(ids[0], "h", 5.0), ms(0))
        .unwrap();
    assert_eq!(anim.timeline(t2).unwrap().state(), TimelineState::Pending);
    assert!(scene.shape(ids[0]).unwrap().attrs().raw("h").is_none());

    anim.advance(&mut scene, ms(100));
    assert_eq!(anim.timeline(t2).unwrap().state(), TimelineState::Running);
    assert_eq!(anim.timeline(t2).unwrap().started_at(), Some(ms(100)));
    // the hand-over never stopped the ticker
    assert!(anim.render_loop().is_ticking());
    assert!(!anim.render_loop().final_repaint_pending());

    anim.advance(&mut scene, ms(200));
    assert_eq!(num(&scene, ids[0], "h"), 5.0);
    assert!(anim.is_idle());
}

#[test]
fn chained_timeline_is_cancelled_with_its_predecessor() {
    let (mut scene, ids) = scene_with(&["a"]);
    let mut anim = Animator::new();
    let t1 = anim.start(&mut scene, Transition::new(ms(100)).attr(ids[0], "r", 10.0), ms(0));
    let t2 = anim
        .start_after(&mut scene, t1, Transition::new(ms(100)).attr(ids[0], "h", 5.0), ms(0))
        .unwrap();
    anim.start(&mut scene, Transition::new(ms(100)).attr(ids[0], "r", 0.0), ms(10));

    assert_eq!(anim.timeline(t1).unwrap().state(), TimelineState::Interrupted);
    assert_eq!(anim.timeline(t2).unwrap().state(), TimelineState::Interrupted);
    assert_eq!(anim.render_loop().starts(), 2);
}

#[test]
fn start_after_unknown_timeline_is_a_precondition_error() {
    let (mut scene, _) = scene_with(&["a"]);
    let mut anim = Animator::new();
    let err = anim
        .start_after(&mut scene, TimelineId(42), Transition::new(ms(1)), ms(0))
        .unwrap_err();
    assert!(err.is_precondition());
}

#[test]
fn zero_duration_completes_on_first_tick() {
    let (mut scene, ids) = scene_with(&["a"]);
    let mut anim = Animator::new();
    let t = anim.start(&mut scene, Transition::new(Duration::ZERO).attr(ids[0], "v", 3.0), ms(5));
    assert_eq!(anim.timeline(t).unwrap().state(), TimelineState::Running);
    anim.advance(&mut scene, ms(5));
    assert_eq!(anim.timeline(t).unwrap().state(), TimelineState::Completed);
    assert_eq!(num(&scene, ids[0], "v"), 3.0);
}

#[test]
fn exit_timeline_removes_shape_when_done() {
    let (mut scene, ids) = scene_with(&["a", "b"]);
    let mut anim = Animator::new();
    let items = vec!["b".to_string()];
    let join = scene.join("g", &items, |k| k.clone());
    assert_eq!(join.exited(), &[ids[0]]);

    anim.exit_with(&mut scene, ids[0], Transition::new(ms(100)).attr(ids[0], "r", 0.0), ms(0));
    anim.sweep_exited(&mut scene, ms(0));
    assert!(scene.shape(ids[0]).is_some());

    anim.advance(&mut scene, ms(100));
    assert!(scene.shape(ids[0]).is_none());
    assert_eq!(scene.removed()[0].key, "a");
}

#[test]
fn removing_an_animated_shape_releases_its_timeline() {
    let (mut scene, ids) = scene_with(&["a"]);
    let mut anim = Animator::new();
    let t = anim.start(&mut scene, Transition::new(ms(100)).attr(ids[0], "v", 1.0), ms(0));
    anim.remove_shape(&mut scene, ids[0], ms(10));
    assert_eq!(anim.timeline(t).unwrap().state(), TimelineState::Interrupted);
    assert!(anim.is_idle());
    assert!(!anim.render_loop().is_ticking());
}

#[test]
fn prune_drops_only_terminal_timelines() {
    let (mut scene, ids) = scene_with(&["a"]);
    let mut anim = Animator::new();
    let t1 = anim.start(&mut scene, Transition::new(ms(10)).attr(ids[0], "x", 1.0), ms(0));
    let t2 = anim.start(&mut scene, Transition::new(ms(100)).attr(ids[0], "y", 1.0), ms(0));
    anim.advance(&mut scene, ms(20));
    anim.prune();
    assert!(anim.timeline(t1).is_none());
    assert!(anim.timeline(t2).is_some());
}
