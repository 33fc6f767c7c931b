use std::time::Duration;

use crate::{
    animation::{
        animator::Animator,
        timeline::{TimelineId, Transition},
    },
    foundation::{core::Canvas, error::ChartResult},
    scene::{
        attrs::AttrValue,
        join::Join,
        shape::{Scene, ShapeId},
    },
};

/// Bind-phase handle given to [`crate::Chart::bind_data`].
///
/// Everything a chart may do while binding goes through here: joins, direct attribute
/// writes and timelines, all stamped with the time the bind started.
pub struct Stage<'a> {
    scene: &'a mut Scene,
    animator: &'a mut Animator,
    now: Duration,
    canvas: Canvas,
    duration: Duration,
}

impl<'a> Stage<'a> {
    pub(crate) fn new(
        scene: &'a mut Scene,
        animator: &'a mut Animator,
        now: Duration,
        canvas: Canvas,
        duration: Duration,
    ) -> Self {
        Self {
            scene,
            animator,
            now,
            canvas,
            duration,
        }
    }

    /// Surface size.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Clock time of this bind.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Surface default animation duration.
    pub fn default_duration(&self) -> Duration {
        self.duration
    }

    /// Read-only view of the scene.
    pub fn scene(&self) -> &Scene {
        self.scene
    }

    /// Join `items` against `group`; see [`Scene::join`].
    pub fn join<T>(&mut self, group: &str, items: &[T], key: impl Fn(&T) -> String) -> Join {
        self.scene.join(group, items, key)
    }

    /// Write an attribute immediately, without animation.
    pub fn write(&mut self, shape: ShapeId, name: &str, value: impl Into<AttrValue>) {
        if let Some(s) = self.scene.shape_mut(shape) {
            s.attrs.declare_and_write(name, value);
        }
    }

    /// Empty transition with the surface default duration.
    pub fn transition(&self) -> Transition {
        Transition::new(self.duration)
    }

    /// Start a timeline now.
    pub fn start(&mut self, transition: Transition) -> TimelineId {
        self.animator.start(self.scene, transition, self.now)
    }

    /// Start a timeline once `prev` completes.
    pub fn start_after(&mut self, prev: TimelineId, transition: Transition) -> ChartResult<TimelineId> {
        self.animator
            .start_after(self.scene, prev, transition, self.now)
    }

    /// Animate an exiting shape out and remove it when done.
    pub fn exit_with(&mut self, shape: ShapeId, transition: Transition) -> TimelineId {
        self.animator
            .exit_with(self.scene, shape, transition, self.now)
    }

    /// Remove a shape now.
    pub fn remove(&mut self, shape: ShapeId) {
        self.animator.remove_shape(self.scene, shape, self.now);
    }
}
