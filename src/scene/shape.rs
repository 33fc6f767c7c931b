use std::collections::HashMap;

use crate::{
    animation::timeline::TimelineId,
    foundation::error::ChartResult,
    scene::attrs::{AttrStore, Attrs},
};

/// Stable identity of a shape instance within one surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u64);

/// Lifecycle of a shape instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeState {
    /// Bound to a datum in the latest bind.
    Live,
    /// Its key left the dataset; awaiting removal.
    Exiting,
}

/// When an exiting shape is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Removal {
    /// At the end of the bind phase that marked it.
    EndOfBind,
    /// When the given exit timeline finishes.
    AfterTimeline(TimelineId),
}

/// One paintable element bound to one datum.
#[derive(Clone, Debug)]
pub struct ShapeInstance {
    id: ShapeId,
    key: String,
    group: String,
    datum_index: usize,
    state: ShapeState,
    pub(crate) removal: Removal,
    pub(crate) attrs: AttrStore,
}

impl ShapeInstance {
    /// Stable id.
    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// Identity key of the bound datum.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Name of the group this shape belongs to.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Position of the bound datum in the latest bind.
    pub fn datum_index(&self) -> usize {
        self.datum_index
    }

    /// Lifecycle state.
    pub fn state(&self) -> ShapeState {
        self.state
    }

    /// Whether the shape is bound to current data.
    pub fn is_live(&self) -> bool {
        self.state == ShapeState::Live
    }

    /// Attribute storage.
    pub fn attrs(&self) -> &AttrStore {
        &self.attrs
    }

    /// Shorthand for `attrs().read_all()`.
    pub fn read_all(&self) -> ChartResult<Attrs> {
        self.attrs.read_all()
    }
}

/// Named, ordered collection of shapes joined against one dataset.
#[derive(Clone, Debug, Default)]
pub struct ShapeGroup {
    name: String,
    order: Vec<ShapeId>,
    by_key: HashMap<String, ShapeId>,
}

impl ShapeGroup {
    /// Group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shape ids in paint order: current data order, then shapes still exiting.
    pub fn ids(&self) -> &[ShapeId] {
        &self.order
    }

    /// Id of the shape bound to `key`.
    pub fn id_for(&self, key: &str) -> Option<ShapeId> {
        self.by_key.get(key).copied()
    }
}

/// Shape removed from a scene since the last bind started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemovedShape {
    /// Former id.
    pub id: ShapeId,
    /// Group it belonged to.
    pub group: String,
    /// Its data key.
    pub key: String,
}

/// Every shape instance on a surface, organised in named groups.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    groups: Vec<ShapeGroup>,
    shapes: HashMap<ShapeId, ShapeInstance>,
    next_id: u64,
    removed: Vec<RemovedShape>,
}

impl Scene {
    /// Empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Group by name.
    pub fn group(&self, name: &str) -> Option<&ShapeGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Shapes of `group` in paint order (exiting shapes still animating included).
    pub fn shapes_in<'a>(&'a self, group: &str) -> impl Iterator<Item = &'a ShapeInstance> + 'a {
        self.group(group)
            .into_iter()
            .flat_map(|g| g.order.iter())
            .filter_map(move |id| self.shapes.get(id))
    }

    /// Live shapes of `group` in data order.
    pub fn live_in<'a>(&'a self, group: &str) -> impl Iterator<Item = &'a ShapeInstance> + 'a {
        self.shapes_in(group).filter(|s| s.is_live())
    }

    /// Shape by id.
    pub fn shape(&self, id: ShapeId) -> Option<&ShapeInstance> {
        self.shapes.get(&id)
    }

    pub(crate) fn shape_mut(&mut self, id: ShapeId) -> Option<&mut ShapeInstance> {
        self.shapes.get_mut(&id)
    }

    /// Shape bound to `key` in `group`.
    pub fn find(&self, group: &str, key: &str) -> Option<&ShapeInstance> {
        self.group(group)
            .and_then(|g| g.id_for(key))
            .and_then(|id| self.shapes.get(&id))
    }

    /// Total number of shapes, exiting ones included.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether the scene holds no shapes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shapes removed since the current (or last) bind phase began.
    pub fn removed(&self) -> &[RemovedShape] {
        &self.removed
    }

    pub(crate) fn clear_removed(&mut self) {
        self.removed.clear();
    }

    pub(crate) fn group_mut_or_insert(&mut self, name: &str) -> usize {
        match self.groups.iter().position(|g| g.name == name) {
            Some(i) => i,
            None => {
                self.groups.push(ShapeGroup {
                    name: name.to_string(),
                    ..ShapeGroup::default()
                });
                self.groups.len() - 1
            }
        }
    }

    pub(crate) fn groups_mut(&mut self) -> &mut Vec<ShapeGroup> {
        &mut self.groups
    }

    pub(crate) fn create_shape(&mut self, group: &str, key: &str, datum_index: usize) -> ShapeId {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        self.shapes.insert(
            id,
            ShapeInstance {
                id,
                key: key.to_string(),
                group: group.to_string(),
                datum_index,
                state: ShapeState::Live,
                removal: Removal::EndOfBind,
                attrs: AttrStore::new(),
            },
        );
        id
    }

    pub(crate) fn set_live(&mut self, id: ShapeId, datum_index: usize) {
        if let Some(s) = self.shapes.get_mut(&id) {
            s.state = ShapeState::Live;
            s.removal = Removal::EndOfBind;
            s.datum_index = datum_index;
        }
    }

    pub(crate) fn set_exiting(&mut self, id: ShapeId) {
        if let Some(s) = self.shapes.get_mut(&id) {
            s.state = ShapeState::Exiting;
        }
    }

    /// Exiting shapes whose removal is due at the end of the bind phase.
    pub(crate) fn exiting_due(&self) -> Vec<ShapeId> {
        let mut ids: Vec<ShapeId> = self
            .shapes
            .values()
            .filter(|s| s.state == ShapeState::Exiting && s.removal == Removal::EndOfBind)
            .map(|s| s.id)
            .collect();
        ids.sort();
        ids
    }

    /// Exiting shapes bound to the given exit timeline.
    pub(crate) fn exiting_after(&self, timeline: TimelineId) -> Vec<ShapeId> {
        let mut ids: Vec<ShapeId> = self
            .shapes
            .values()
            .filter(|s| {
                s.state == ShapeState::Exiting && s.removal == Removal::AfterTimeline(timeline)
            })
            .map(|s| s.id)
            .collect();
        ids.sort();
        ids
    }

    /// Drop a shape from its group and the scene.
    pub(crate) fn remove(&mut self, id: ShapeId) -> Option<ShapeInstance> {
        let shape = self.shapes.remove(&id)?;
        if let Some(g) = self.groups.iter_mut().find(|g| g.name == shape.group) {
            g.order.retain(|x| *x != id);
            if g.by_key.get(&shape.key) == Some(&id) {
                g.by_key.remove(&shape.key);
            }
        }
        self.removed.push(RemovedShape {
            id,
            group: shape.group.clone(),
            key: shape.key.clone(),
        });
        Some(shape)
    }
}

impl ShapeGroup {
    pub(crate) fn order_mut(&mut self) -> &mut Vec<ShapeId> {
        &mut self.order
    }

    pub(crate) fn by_key_mut(&mut self) -> &mut HashMap<String, ShapeId> {
        &mut self.by_key
    }
}
