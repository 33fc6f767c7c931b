use std::collections::HashSet;

use crate::scene::shape::{Scene, ShapeId, ShapeState};

/// Result of joining a dataset against a shape group.
///
/// All lists follow incoming data order, except `exited` which follows the previous order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Join {
    entered: Vec<ShapeId>,
    updated: Vec<ShapeId>,
    exited: Vec<ShapeId>,
    bound: Vec<ShapeId>,
}

impl Join {
    /// Shapes created for keys that were not bound before.
    pub fn entered(&self) -> &[ShapeId] {
        &self.entered
    }

    /// Existing shapes whose key is still present.
    pub fn updated(&self) -> &[ShapeId] {
        &self.updated
    }

    /// Shapes whose key disappeared in this join.
    pub fn exited(&self) -> &[ShapeId] {
        &self.exited
    }

    /// Entered and updated shapes together, in data order.
    pub fn bound(&self) -> &[ShapeId] {
        &self.bound
    }

    /// Whether `id` was created by this join.
    pub fn is_entered(&self, id: ShapeId) -> bool {
        self.entered.contains(&id)
    }
}

impl Scene {
    /// Reconcile `items` with the shapes of `group` by identity key.
    ///
    /// Unknown keys create shapes with no attributes, known keys are updated in place and
    /// keys that disappeared mark their shapes as exiting. An exiting shape whose key comes
    /// back is revived as an update. When a key repeats, the first item wins.
    pub fn join<T>(&mut self, group: &str, items: &[T], key: impl Fn(&T) -> String) -> Join {
        let gi = self.group_mut_or_insert(group);
        let mut join = Join::default();
        let mut seen = HashSet::new();

        for (i, item) in items.iter().enumerate() {
            let k = key(item);
            if !seen.insert(k.clone()) {
                tracing::warn!(group, key = %k, "duplicate join key; keeping the first item");
                continue;
            }
            let existing = self.groups_mut()[gi].id_for(&k);
            let id = match existing {
                Some(id) => {
                    self.set_live(id, i);
                    join.updated.push(id);
                    id
                }
                None => {
                    let id = self.create_shape(group, &k, i);
                    self.groups_mut()[gi].by_key_mut().insert(k, id);
                    join.entered.push(id);
                    id
                }
            };
            join.bound.push(id);
        }

        let bound: HashSet<ShapeId> = join.bound.iter().copied().collect();
        let previous = std::mem::take(self.groups_mut()[gi].order_mut());
        let mut trailing = Vec::new();
        for id in previous {
            if bound.contains(&id) {
                continue;
            }
            match self.shape(id).map(|s| s.state()) {
                Some(ShapeState::Live) => {
                    self.set_exiting(id);
                    join.exited.push(id);
                    trailing.push(id);
                }
                Some(ShapeState::Exiting) => trailing.push(id),
                None => {}
            }
        }

        let mut order = join.bound.clone();
        order.extend(trailing);
        *self.groups_mut()[gi].order_mut() = order;

        tracing::debug!(
            group,
            entered = join.entered.len(),
            updated = join.updated.len(),
            exited = join.exited.len(),
            "joined data"
        );
        join
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/join.rs"]
mod tests;
