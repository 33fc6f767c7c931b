use std::{
    collections::{BTreeMap, HashMap, HashSet},
    time::Duration,
};

use crate::{
    animation::timeline::{Timeline, TimelineId, TimelineState, Track, Transition},
    foundation::error::{ChartError, ChartResult},
    render::render_loop::RenderLoop,
    scene::{
        attrs::AttrValue,
        shape::{Removal, Scene, ShapeId},
    },
};

type TrackKey = (ShapeId, String);

/// Owns every timeline of a surface and drives their attribute writes.
///
/// Each numeric `(shape, attribute)` pair is owned by at most one running timeline. Starting a
/// timeline that targets an owned pair, with a number or a string, first samples the previous
/// owner at the current time and releases every pair it holds on that shape; a timeline left
/// without pairs is interrupted. Start and end notifications to the [`RenderLoop`] are
/// therefore paired exactly once per timeline.
#[derive(Debug, Default)]
pub struct Animator {
    timelines: BTreeMap<TimelineId, Timeline>,
    owners: HashMap<TrackKey, TimelineId>,
    next_id: u64,
    render_loop: RenderLoop,
}

impl Animator {
    /// Animator with no timelines.
    pub fn new() -> Self {
        Self::default()
    }

    /// The surface's repaint scheduler.
    pub fn render_loop(&self) -> &RenderLoop {
        &self.render_loop
    }

    pub(crate) fn render_loop_mut(&mut self) -> &mut RenderLoop {
        &mut self.render_loop
    }

    /// Timeline by id (terminal ones are kept until the next prune).
    pub fn timeline(&self, id: TimelineId) -> Option<&Timeline> {
        self.timelines.get(&id)
    }

    /// Known timelines in creation order.
    pub fn timelines(&self) -> impl Iterator<Item = &Timeline> {
        self.timelines.values()
    }

    /// Timeline currently driving `name` on `shape`.
    pub fn owner_of(&self, shape: ShapeId, name: &str) -> Option<TimelineId> {
        self.owners.get(&(shape, name.to_string())).copied()
    }

    /// Whether no timeline is running.
    pub fn is_idle(&self) -> bool {
        self.render_loop.active_count() == 0
    }

    /// Start `transition` now. Older pending timelines targeting the same pairs are cancelled.
    pub fn start(&mut self, scene: &mut Scene, transition: Transition, now: Duration) -> TimelineId {
        let id = self.insert_pending(transition, None);
        self.cancel_superseded_pending(scene, id, now);
        self.activate(scene, id, now);
        id
    }

    /// Start `transition` when `prev` completes. If `prev` was interrupted the new timeline is
    /// cancelled; if it already completed the new one starts immediately.
    pub fn start_after(
        &mut self,
        scene: &mut Scene,
        prev: TimelineId,
        transition: Transition,
        now: Duration,
    ) -> ChartResult<TimelineId> {
        let prev_state = self
            .timelines
            .get(&prev)
            .map(Timeline::state)
            .ok_or_else(|| {
                ChartError::precondition(format!("unknown predecessor timeline {}", prev.0))
            })?;
        let id = self.insert_pending(transition, Some(prev));
        match prev_state {
            TimelineState::Pending | TimelineState::Running => {}
            TimelineState::Completed => self.activate(scene, id, now),
            TimelineState::Interrupted => self.cancel(scene, id, now),
        }
        Ok(id)
    }

    /// Start `transition` and remove `shape` once it finishes.
    pub fn exit_with(
        &mut self,
        scene: &mut Scene,
        shape: ShapeId,
        transition: Transition,
        now: Duration,
    ) -> TimelineId {
        let id = self.start(scene, transition, now);
        scene.set_exiting(shape);
        if let Some(s) = scene.shape_mut(shape) {
            s.removal = Removal::AfterTimeline(id);
        }
        id
    }

    /// Sample every running timeline at `now`, completing those that reached their end.
    /// Returns how many timelines were sampled.
    pub fn advance(&mut self, scene: &mut Scene, now: Duration) -> usize {
        let running: Vec<TimelineId> = self
            .timelines
            .values()
            .filter(|t| t.state == TimelineState::Running)
            .map(|t| t.id)
            .collect();

        let mut sampled = 0;
        for id in running {
            let Some(tl) = self.timelines.get_mut(&id) else {
                continue;
            };
            // An earlier completion in this pass may have interrupted it.
            if tl.state != TimelineState::Running {
                continue;
            }
            sampled += 1;
            let t = tl.progress_at(now);
            if let Some(start) = tl.started_at {
                tl.elapsed = now.saturating_sub(start);
            }
            let done = t >= 1.0;
            let e = tl.ease.apply(t);
            let writes: Vec<(ShapeId, String, AttrValue)> = tl
                .tracks
                .iter()
                .filter(|tr| tr.owned)
                .map(|tr| {
                    let v = if done { tr.to.clone() } else { tr.value_at(e) };
                    (tr.shape, tr.name.clone(), v)
                })
                .collect();
            for (shape, name, v) in writes {
                write(scene, shape, &name, v);
            }
            if done {
                self.finish(scene, id, TimelineState::Completed, now);
            }
        }
        tracing::trace!(sampled, at_ms = now.as_millis() as u64, "advanced timelines");
        sampled
    }

    /// Remove exiting shapes that are due at the end of a bind phase.
    pub fn sweep_exited(&mut self, scene: &mut Scene, now: Duration) {
        for id in scene.exiting_due() {
            self.remove_shape(scene, id, now);
        }
    }

    /// Remove `shape` from the scene, releasing any attribute it was animating.
    pub fn remove_shape(&mut self, scene: &mut Scene, shape: ShapeId, now: Duration) {
        let keys: Vec<TrackKey> = self
            .owners
            .keys()
            .filter(|(s, _)| *s == shape)
            .cloned()
            .collect();
        for key in keys {
            if let Some(owner) = self.owners.get(&key).copied() {
                self.release_track(scene, owner, &key, now);
            }
        }
        scene.remove(shape);
    }

    /// Forget terminal timelines.
    pub fn prune(&mut self) {
        self.timelines.retain(|_, t| !t.state.is_terminal());
    }

    fn insert_pending(&mut self, transition: Transition, after: Option<TimelineId>) -> TimelineId {
        let id = TimelineId(self.next_id);
        self.next_id += 1;
        self.timelines
            .insert(id, Timeline::pending(id, transition, after));
        id
    }

    fn successors_of(&self, id: TimelineId) -> Vec<TimelineId> {
        self.timelines
            .values()
            .filter(|t| t.state == TimelineState::Pending && t.after == Some(id))
            .map(|t| t.id)
            .collect()
    }

    fn cancel_superseded_pending(&mut self, scene: &mut Scene, id: TimelineId, now: Duration) {
        let Some(tl) = self.timelines.get(&id) else {
            return;
        };
        let claimed: HashSet<(ShapeId, &str)> = tl
            .targets
            .iter()
            .map(|t| (t.shape, t.name.as_str()))
            .collect();
        let victims: Vec<TimelineId> = self
            .timelines
            .range(..id)
            .filter(|(_, t)| t.state == TimelineState::Pending)
            .filter(|(_, t)| claimed.iter().any(|(s, n)| t.targets_pair(*s, n)))
            .map(|(k, _)| *k)
            .collect();
        for v in victims {
            self.cancel(scene, v, now);
        }
    }

    // Pending -> Interrupted without touching the active count; chained successors follow.
    fn cancel(&mut self, scene: &mut Scene, id: TimelineId, now: Duration) {
        let Some(tl) = self.timelines.get_mut(&id) else {
            return;
        };
        if tl.state != TimelineState::Pending {
            return;
        }
        tl.state = TimelineState::Interrupted;
        tracing::debug!(timeline = id.0, "pending timeline cancelled");
        for succ in self.successors_of(id) {
            self.cancel(scene, succ, now);
        }
        for shape in scene.exiting_after(id) {
            self.remove_shape(scene, shape, now);
        }
    }

    fn activate(&mut self, scene: &mut Scene, id: TimelineId, now: Duration) {
        let Some(mut tl) = self.timelines.remove(&id) else {
            return;
        };
        if tl.state != TimelineState::Pending {
            self.timelines.insert(id, tl);
            return;
        }

        // Count first so that superseding an older timeline never drops the count to zero.
        self.render_loop.note_timeline_started(now);
        tl.state = TimelineState::Running;
        tl.started_at = Some(now);

        for target in std::mem::take(&mut tl.targets) {
            if scene.shape(target.shape).is_none() {
                tracing::debug!(
                    timeline = id.0,
                    shape = target.shape.0,
                    attr = %target.name,
                    "skipping target on a removed shape"
                );
                continue;
            }

            let key = (target.shape, target.name.clone());
            if let Some(owner) = self.owners.get(&key).copied() {
                if owner != id {
                    self.release_instance(scene, owner, target.shape, now);
                }
            }

            match target.to {
                AttrValue::Str(_) => {
                    let from = current(scene, target.shape, &target.name)
                        .unwrap_or_else(|| target.to.clone());
                    write(scene, target.shape, &target.name, target.to.clone());
                    tl.tracks.push(Track {
                        shape: target.shape,
                        name: target.name,
                        from,
                        to: target.to,
                        owned: false,
                    });
                }
                AttrValue::Num(to) => {
                    let from = target
                        .from
                        .map(|f| f.coerced())
                        .or_else(|| current(scene, target.shape, &target.name))
                        .and_then(|v| v.as_num())
                        .unwrap_or(0.0);
                    write(scene, target.shape, &target.name, AttrValue::Num(from));
                    self.owners.insert(key, id);
                    tl.tracks.push(Track {
                        shape: target.shape,
                        name: target.name,
                        from: AttrValue::Num(from),
                        to: AttrValue::Num(to),
                        owned: true,
                    });
                }
            }
        }

        self.timelines.insert(id, tl);
    }

    // Interrupting a timeline on one shape releases everything it animates there.
    fn release_instance(&mut self, scene: &mut Scene, owner: TimelineId, shape: ShapeId, now: Duration) {
        let keys: Vec<TrackKey> = self
            .owners
            .iter()
            .filter(|((s, _), o)| *s == shape && **o == owner)
            .map(|(k, _)| k.clone())
            .collect();
        for key in keys {
            self.release_track(scene, owner, &key, now);
        }
    }

    fn release_track(&mut self, scene: &mut Scene, owner: TimelineId, key: &TrackKey, now: Duration) {
        let Some(tl) = self.timelines.get_mut(&owner) else {
            return;
        };
        if tl.state != TimelineState::Running {
            return;
        }
        let e = tl.eased_at(now);
        let mut sampled = None;
        if let Some(track) = tl
            .tracks
            .iter_mut()
            .find(|t| t.owned && t.shape == key.0 && t.name == key.1)
        {
            track.owned = false;
            sampled = Some(track.value_at(e));
        }
        let exhausted = !tl.tracks.iter().any(|t| t.owned);
        if let Some(v) = sampled {
            write(scene, key.0, &key.1, v);
        }
        if self.owners.get(key) == Some(&owner) {
            self.owners.remove(key);
        }
        if exhausted {
            tracing::debug!(timeline = owner.0, "timeline interrupted");
            self.finish(scene, owner, TimelineState::Interrupted, now);
        }
    }

    fn finish(&mut self, scene: &mut Scene, id: TimelineId, state: TimelineState, now: Duration) {
        let Some(tl) = self.timelines.get_mut(&id) else {
            return;
        };
        if tl.state != TimelineState::Running {
            return;
        }
        tl.state = state;
        let mut released = Vec::new();
        for track in tl.tracks.iter_mut().filter(|t| t.owned) {
            track.owned = false;
            released.push((track.shape, track.name.clone()));
        }
        for key in released {
            if self.owners.get(&key) == Some(&id) {
                self.owners.remove(&key);
            }
        }

        // Successors start before this end is noted so the ticker does not stop in between.
        for succ in self.successors_of(id) {
            if state == TimelineState::Completed {
                self.activate(scene, succ, now);
            } else {
                self.cancel(scene, succ, now);
            }
        }
        for shape in scene.exiting_after(id) {
            self.remove_shape(scene, shape, now);
        }

        self.render_loop.note_timeline_ended(now);
    }
}

fn current(scene: &Scene, shape: ShapeId, name: &str) -> Option<AttrValue> {
    scene
        .shape(shape)
        .and_then(|s| s.attrs.raw(name))
        .map(AttrValue::coerced)
}

fn write(scene: &mut Scene, shape: ShapeId, name: &str, value: AttrValue) {
    if let Some(s) = scene.shape_mut(shape) {
        s.attrs.declare_and_write(name, value);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/animator.rs"]
mod tests;
