//! Spatial nodes: local offsets composed into global positions
//!
//! Global positions are derived, never stored. The composition walks up
//! through spatial ancestors only; the first non-spatial ancestor acts as
//! the origin of that chain.

use crate::foundation::math::Vec2;
use crate::scene::{EntityId, SceneError, SceneResult, World};

/// Local 2D position relative to the nearest spatial ancestor
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spatial {
    /// Offset from the parent's global position (or from the origin)
    pub position: Vec2,
}

impl Spatial {
    /// Create a spatial capability at `position`
    pub fn new(position: Vec2) -> Self {
        Self { position }
    }
}

impl World {
    /// Global position of a spatial node, `None` if the entity is not spatial
    pub fn global_position(&self, id: EntityId) -> Option<Vec2> {
        self.lookup(id)?;
        self.composed_position(id)
    }

    /// Local offsets summed up the spatial ancestor chain, removed ancestors included
    fn composed_position(&self, id: EntityId) -> Option<Vec2> {
        let entity = self.entity(id).ok()?;
        let mut position = entity.spatial.as_ref()?.position;
        let mut parent = entity.parent;
        while let Some(parent_id) = parent {
            let Ok(ancestor) = self.entity(parent_id) else { break };
            let Some(spatial) = ancestor.spatial.as_ref() else { break };
            position += spatial.position;
            parent = ancestor.parent;
        }
        Some(position)
    }

    /// Move a spatial node so that its global position becomes `desired`
    pub fn set_global_position(&mut self, id: EntityId, desired: Vec2) -> SceneResult {
        let parent_global = self
            .entity(id)?
            .parent
            .and_then(|parent| self.composed_position(parent))
            .unwrap_or_else(Vec2::zeros);
        let spatial = self
            .entity_mut(id)?
            .spatial
            .as_mut()
            .ok_or(SceneError::MissingCapability { entity: id, capability: "spatial" })?;
        spatial.position = desired - parent_global;
        Ok(())
    }

    /// Local position of a spatial node
    pub fn local_position(&self, id: EntityId) -> Option<Vec2> {
        self.lookup(id)?.spatial.map(|s| s.position)
    }

    /// Overwrite the local position of a spatial node
    pub fn set_local_position(&mut self, id: EntityId, position: Vec2) -> SceneResult {
        let spatial = self
            .entity_mut(id)?
            .spatial
            .as_mut()
            .ok_or(SceneError::MissingCapability { entity: id, capability: "spatial" })?;
        spatial.position = position;
        Ok(())
    }
}
