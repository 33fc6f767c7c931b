//! Shape instances, their attributes and the enter/update/exit join.

/// Attribute values and per-shape attribute stores.
pub mod attrs;
/// Keyed reconciliation of data against shape groups.
pub mod join;
/// Shapes, groups and the scene that owns them.
pub mod shape;
/// Bind-phase handle.
pub mod stage;
