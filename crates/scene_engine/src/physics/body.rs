//! Physics bodies: gravity, friction and air resistance on top of the kinematic move

use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils, Vec2};
use crate::physics::Contacts;
use crate::scene::{EntityId, SceneError, SceneResult, World};

/// Forces acting on a physics body
///
/// Defaults to a platformer feel: strong gravity, no floor friction and
/// heavy air resistance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    /// Downward acceleration in units per second squared
    pub gravity: f32,
    /// Horizontal slow-down while on the floor
    pub friction: f32,
    /// Horizontal slow-down at all times
    pub air_resistance: f32,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            gravity: 2400.0,
            friction: 0.0,
            air_resistance: 1000.0,
        }
    }
}

impl Environment {
    /// Create an environment
    pub fn new(gravity: f32, friction: f32, air_resistance: f32) -> Self {
        Self { gravity, friction, air_resistance }
    }
}

/// Component for kinematic bodies integrated under an environment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsBody {
    /// Per-body forces
    pub environment: Environment,

    /// Horizontal acceleration applied every tick
    pub acceleration: f32,

    /// Limit on horizontal speed
    pub max_speed: f32,
}

impl PhysicsBody {
    /// Create a body in `environment` with no acceleration and no speed limit
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            acceleration: 0.0,
            max_speed: f32::INFINITY,
        }
    }

    /// Set the horizontal acceleration
    pub fn with_acceleration(mut self, acceleration: f32) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Set the horizontal speed limit
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Velocity after one tick, given the contacts measured before the tick
    pub fn integrate(&self, velocity: Vec2, contacts: Contacts, dt: f32) -> Vec2 {
        let env = &self.environment;
        let mut v = velocity;

        if contacts.wall {
            v.x = 0.0;
        } else {
            v.x += self.acceleration * dt;
            let friction = if contacts.floor { env.friction } else { 0.0 };
            v.x = utils::approach_zero(v.x, (env.air_resistance + friction) * dt);
            v.x = utils::clamp(v.x, -self.max_speed, self.max_speed);
        }

        v.y += env.gravity * dt;
        if (contacts.floor && v.y >= 0.0) || (contacts.ceiling && v.y <= 0.0) {
            v.y = 0.0;
        }
        v
    }
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self::new(Environment::default())
    }
}

impl World {
    /// Integrate a physics body for one tick, then move it
    pub fn step_physics(&mut self, id: EntityId, dt: f32) -> SceneResult {
        let entity = self.entity(id)?;
        let body = entity
            .physics
            .ok_or(SceneError::MissingCapability { entity: id, capability: "physics" })?;
        let velocity = entity
            .kinematic
            .map(|k| k.velocity)
            .ok_or(SceneError::MissingCapability { entity: id, capability: "kinematic" })?;

        let contacts = self.contacts(id);
        let velocity = body.integrate(velocity, contacts, dt);
        self.set_velocity(id, velocity)?;
        self.move_body(id, dt)?;
        Ok(())
    }
}
