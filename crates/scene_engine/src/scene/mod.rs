//! Scene tree
//!
//! An ownership tree of entities with four cascading lifecycle phases.
//!
//! ## Architecture
//!
//! ```text
//! World
//!  ├── entity registry (EntityId → Entity)
//!  ├── root ── children ── ...
//!  └── cameras (current camera slot)
//! ```
//!
//! - `attach` preloads a subtree before it becomes reachable, then readies
//!   it if the parent is already live
//! - `update` / `draw` cascade through the tree once per tick
//! - `remove` unlinks an entity and destroys its subtree

mod entity;
mod error;
mod hooks;
mod spatial;
mod world;

#[cfg(test)]
mod tests;

pub use entity::{Entity, EntityBuilder, EntityId};
pub use error::{SceneError, SceneResult};
pub use hooks::{Behavior, FrameHook, HookOrder, LifecycleHook, Phase};
pub use spatial::Spatial;
pub use world::{World, DEFAULT_ROOT_NAME};
