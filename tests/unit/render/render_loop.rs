use proptest::prelude::*;

use super::*;

const T0: Duration = Duration::ZERO;

#[test]
fn idle_loop_has_no_ticker() {
    let rl = RenderLoop::new();
    assert!(!rl.is_ticking());
    assert!(rl.invariant_holds());
    assert!(!rl.final_repaint_pending());
}

#[test]
fn overlapping_timelines_share_one_ticker() {
    let mut rl = RenderLoop::new();
    rl.note_timeline_started(T0);
    let first = *rl.ticker().unwrap();
    rl.note_timeline_started(Duration::from_millis(5));
    assert_eq!(rl.ticker().unwrap().started_at(), first.started_at());
    assert!(!rl.note_timeline_ended(Duration::from_millis(10)));
    assert!(rl.is_ticking());
    assert!(rl.note_timeline_ended(Duration::from_millis(20)));
    assert!(!rl.is_ticking());
    assert!(rl.take_final_repaint());
    assert!(!rl.take_final_repaint());
}

#[test]
fn unmatched_end_is_ignored() {
    let mut rl = RenderLoop::new();
    assert!(!rl.note_timeline_ended(T0));
    assert_eq!(rl.ends(), 0);
    assert!(!rl.final_repaint_pending());
}

#[test]
fn ticks_are_counted_only_while_running() {
    let mut rl = RenderLoop::new();
    assert!(!rl.record_tick());
    rl.note_timeline_started(T0);
    assert!(rl.record_tick());
    assert!(rl.record_tick());
    assert_eq!(rl.ticker().unwrap().ticks(), 2);
}

proptest! {
    #[test]
    fn ticker_runs_iff_timelines_active(ops in proptest::collection::vec(any::<bool>(), 0..64)) {
        let mut rl = RenderLoop::new();
        let mut expected = 0usize;
        for (i, start) in ops.into_iter().enumerate() {
            let now = Duration::from_millis(i as u64);
            if start {
                rl.note_timeline_started(now);
                expected += 1;
            } else {
                rl.note_timeline_ended(now);
                expected = expected.saturating_sub(1);
            }
            prop_assert_eq!(rl.active_count(), expected);
            prop_assert!(rl.invariant_holds());
        }
    }
}
