//! # Scene Engine
//!
//! Simulation core of a real-time 2D engine for platformer-style games.
//!
//! ## Features
//!
//! - **Scene Tree**: entities with preload/ready/update/draw cascades
//! - **Clearance Physics**: AABB colliders, kinematic and physics bodies
//!   that never move into one another
//! - **Cameras**: clamped zoom and world↔screen transforms
//! - **Renderer Hand-off**: world-space draw commands for any backend
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! struct NullRenderer;
//!
//! impl Renderer for NullRenderer {
//!     fn present(&mut self, _frame: &Frame<'_>) -> Result<(), RenderError> {
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut engine = Engine::new(EngineConfig::default())?;
//!     let body = engine.physics_body();
//!     let world = engine.world_mut();
//!     let root = world.root();
//!     let player = world.spawn(EntityBuilder::new("player").with_physics(body));
//!     world.attach(root, player)?;
//!
//!     engine.start()?;
//!     engine.tick(1.0 / 60.0, &mut NullRenderer)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;
pub mod render;
pub mod scene;

mod engine;

pub use engine::{CameraConfig, Engine, EngineConfig, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        foundation::{
            math::{Rect2, Vec2},
            time::Timer,
        },
        physics::{Clearance, Contacts, Environment, PhysicsBody},
        render::{Camera, CameraId, Color, DrawCommand, Frame, RectShape, RectStyle, RenderError, Renderer, Viewport},
        scene::{Behavior, EntityBuilder, EntityId, HookOrder, SceneError, SceneResult, World},
        CameraConfig, Engine, EngineConfig, EngineError,
    };
}
