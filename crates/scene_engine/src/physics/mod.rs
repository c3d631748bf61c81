//! Physics module for axis-aligned collision and platformer motion
//!
//! Provides colliders with a whole-tree clearance query, kinematic bodies
//! that never move into another collider, and physics bodies integrating
//! gravity, friction and air resistance before each kinematic move.

pub mod body;
pub mod collision;
pub mod kinematic;

pub use body::{Environment, PhysicsBody};
pub use collision::{Clearance, Collider, Contacts};
pub use kinematic::KinematicBody;
