use std::time::Duration;

use crate::{
    animation::ease::Ease,
    foundation::math::lerp,
    scene::{attrs::AttrValue, shape::ShapeId},
};

/// Identity of a timeline within one surface; ids grow in creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimelineId(pub u64);

/// Timeline lifecycle. `Completed` and `Interrupted` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimelineState {
    /// Created but waiting for its predecessor.
    Pending,
    /// Interpolating on every tick.
    Running,
    /// Reached its end and wrote the exact target values.
    Completed,
    /// Superseded (or cancelled while pending) before completing.
    Interrupted,
}

impl TimelineState {
    /// Whether no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Interrupted)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Target {
    pub(crate) shape: ShapeId,
    pub(crate) name: String,
    pub(crate) from: Option<AttrValue>,
    pub(crate) to: AttrValue,
}

/// Description of a timeline to start: duration, easing and attribute targets.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub(crate) duration: Duration,
    pub(crate) ease: Ease,
    pub(crate) targets: Vec<Target>,
}

impl Transition {
    /// Empty transition lasting `duration`, with linear easing.
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            ease: Ease::Linear,
            targets: Vec::new(),
        }
    }

    /// Override the duration.
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Override the easing.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Animate `name` on `shape` from its current value to `to`.
    ///
    /// Numeric targets interpolate; string targets are written when the timeline starts.
    pub fn attr(mut self, shape: ShapeId, name: &str, to: impl Into<AttrValue>) -> Self {
        self.targets.push(Target {
            shape,
            name: name.to_string(),
            from: None,
            to: to.into(),
        });
        self
    }

    /// Animate `name` on `shape` from an explicit `from` value.
    pub fn attr_from(
        mut self,
        shape: ShapeId,
        name: &str,
        from: impl Into<AttrValue>,
        to: impl Into<AttrValue>,
    ) -> Self {
        self.targets.push(Target {
            shape,
            name: name.to_string(),
            from: Some(from.into()),
            to: to.into(),
        });
        self
    }

    /// Number of attribute targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the transition targets nothing.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// One attribute of one shape driven by a timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    /// Target shape.
    pub shape: ShapeId,
    /// Attribute name.
    pub name: String,
    /// Value captured when the timeline started.
    pub from: AttrValue,
    /// Target value.
    pub to: AttrValue,
    pub(crate) owned: bool,
}

impl Track {
    /// Whether the track interpolates (numeric on both ends).
    pub fn interpolates(&self) -> bool {
        matches!((&self.from, &self.to), (AttrValue::Num(_), AttrValue::Num(_)))
    }

    /// Whether this timeline still drives the attribute.
    pub fn is_owned(&self) -> bool {
        self.owned
    }

    /// Value at eased progress `e`.
    pub fn value_at(&self, e: f64) -> AttrValue {
        match (&self.from, &self.to) {
            (AttrValue::Num(a), AttrValue::Num(b)) => AttrValue::Num(lerp(*a, *b, e)),
            _ => self.to.clone(),
        }
    }
}

/// An eased interpolation of attributes over a duration.
#[derive(Clone, Debug)]
pub struct Timeline {
    pub(crate) id: TimelineId,
    pub(crate) state: TimelineState,
    pub(crate) duration: Duration,
    pub(crate) ease: Ease,
    pub(crate) after: Option<TimelineId>,
    pub(crate) targets: Vec<Target>,
    pub(crate) tracks: Vec<Track>,
    pub(crate) started_at: Option<Duration>,
    pub(crate) elapsed: Duration,
}

impl Timeline {
    pub(crate) fn pending(id: TimelineId, transition: Transition, after: Option<TimelineId>) -> Self {
        Self {
            id,
            state: TimelineState::Pending,
            duration: transition.duration,
            ease: transition.ease,
            after,
            targets: transition.targets,
            tracks: Vec::new(),
            started_at: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Id.
    pub fn id(&self) -> TimelineId {
        self.id
    }

    /// Lifecycle state.
    pub fn state(&self) -> TimelineState {
        self.state
    }

    /// Configured duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Easing function.
    pub fn ease(&self) -> Ease {
        self.ease
    }

    /// Timeline this one waits for, if chained.
    pub fn after(&self) -> Option<TimelineId> {
        self.after
    }

    /// Clock time at which the timeline started running.
    pub fn started_at(&self) -> Option<Duration> {
        self.started_at
    }

    /// Time elapsed at the last sample.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Tracks captured at start (empty while pending).
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Track for `name` on `shape`.
    pub fn track(&self, shape: ShapeId, name: &str) -> Option<&Track> {
        self.tracks
            .iter()
            .find(|t| t.shape == shape && t.name == name)
    }

    pub(crate) fn targets_pair(&self, shape: ShapeId, name: &str) -> bool {
        self.targets
            .iter()
            .any(|t| t.shape == shape && t.name == name)
    }

    /// Linear progress at clock time `now`, in `[0, 1]`. Zero-length timelines are done at once.
    pub(crate) fn progress_at(&self, now: Duration) -> f64 {
        let Some(start) = self.started_at else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub(crate) fn eased_at(&self, now: Duration) -> f64 {
        self.ease.apply(self.progress_at(now))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;
