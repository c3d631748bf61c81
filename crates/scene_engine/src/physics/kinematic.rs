//! Kinematic bodies: velocity-driven movement clamped by clearance

use crate::foundation::math::{utils, Vec2};
use crate::scene::{EntityId, SceneError, SceneResult, World};

/// Component for spatial nodes that move by their own velocity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicBody {
    /// Linear velocity in units per second
    pub velocity: Vec2,

    /// Run the move step automatically on every update
    pub move_every_frame: bool,
}

impl KinematicBody {
    /// Create a body at rest
    pub fn new(move_every_frame: bool) -> Self {
        Self {
            velocity: Vec2::zeros(),
            move_every_frame,
        }
    }

    /// Create a body with an initial velocity
    pub fn with_velocity(velocity: Vec2, move_every_frame: bool) -> Self {
        Self { velocity, move_every_frame }
    }
}

impl Default for KinematicBody {
    fn default() -> Self {
        Self::new(true)
    }
}

impl World {
    /// Move a kinematic body by `velocity * dt`
    ///
    /// When the body has a collider among its direct children each axis of
    /// the displacement is clamped into `[-clearance.neg, clearance.pos]`.
    /// Returns the displacement actually applied.
    pub fn move_body(&mut self, id: EntityId, dt: f32) -> SceneResult<Vec2> {
        let velocity = self
            .entity(id)?
            .kinematic
            .as_ref()
            .map(|k| k.velocity)
            .ok_or(SceneError::MissingCapability { entity: id, capability: "kinematic" })?;

        let mut displacement = velocity * dt;
        if let Some(clearance) = self.body_clearance(id) {
            displacement.x = utils::clamp(displacement.x, -clearance.neg_x, clearance.pos_x);
            displacement.y = utils::clamp(displacement.y, -clearance.neg_y, clearance.pos_y);
        }

        let spatial = self
            .entity_mut(id)?
            .spatial
            .as_mut()
            .ok_or(SceneError::MissingCapability { entity: id, capability: "spatial" })?;
        spatial.position += displacement;

        log::trace!("Moved {id} by ({}, {})", displacement.x, displacement.y);
        Ok(displacement)
    }

    /// Velocity of a kinematic body
    pub fn velocity(&self, id: EntityId) -> Option<Vec2> {
        self.lookup(id)?.kinematic.map(|k| k.velocity)
    }

    /// Overwrite the velocity of a kinematic body
    pub fn set_velocity(&mut self, id: EntityId, velocity: Vec2) -> SceneResult {
        let kinematic = self
            .entity_mut(id)?
            .kinematic
            .as_mut()
            .ok_or(SceneError::MissingCapability { entity: id, capability: "kinematic" })?;
        kinematic.velocity = velocity;
        Ok(())
    }
}
