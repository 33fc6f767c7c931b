//! Attribute timelines and the clocks that drive them.
//!
//! An [`animator::Animator`] owns every timeline of one surface and reports starts and ends to
//! that surface's [`crate::RenderLoop`].

/// Timeline ownership, interruption and chaining.
pub mod animator;
/// Time sources.
pub mod clock;
/// Easing curves.
pub mod ease;
/// Transition builders and timeline state.
pub mod timeline;
