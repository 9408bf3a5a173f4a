//! Entity Component System integration with hecs.
//!
//! Bodies and fixtures are plain hecs entities. A fixture entity refers to
//! its body through [`Collider::body`](components::Collider), so the world
//! doubles as the fixture arena: a `hecs::Entity` is a stable, generational
//! fixture id and lookups on despawned fixtures fail instead of dangling.

pub mod bridge;
pub mod components;

pub mod prelude {
    pub use super::bridge::*;
    pub use super::components::*;
}
