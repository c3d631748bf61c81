//! Scene-level errors

use crate::render::CameraId;
use crate::scene::EntityId;
use thiserror::Error;

/// Result alias used by tree operations, hooks and behaviors
pub type SceneResult<T = ()> = Result<T, SceneError>;

/// Errors raised by the scene tree and the systems running on it
#[derive(Error, Debug)]
pub enum SceneError {
    /// A tree invariant would be violated (e.g. removing an entity with no parent)
    #[error("Structural error: {0}")]
    Structural(String),

    /// The entity does not exist or has been removed
    #[error("Entity {0} not found")]
    NotFound(EntityId),

    /// The camera does not exist
    #[error("{0} not found")]
    CameraNotFound(CameraId),

    /// The operation needs a capability the entity does not carry
    #[error("Entity {entity} has no {capability} capability")]
    MissingCapability {
        /// Entity the operation was called on
        entity: EntityId,
        /// Name of the missing capability
        capability: &'static str,
    },

    /// A user callback or behavior failed
    #[error("Hook failed on entity {entity}: {message}")]
    Hook {
        /// Entity whose hook failed
        entity: EntityId,
        /// Failure description
        message: String,
    },
}

impl SceneError {
    /// Build a hook failure for `entity`
    pub fn hook(entity: EntityId, message: impl Into<String>) -> Self {
        Self::Hook { entity, message: message.into() }
    }
}
