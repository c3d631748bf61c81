//! Collider capability and the directional clearance query
//!
//! The query is a deliberate full linear scan over every collider reachable
//! from the scene root, recomputed on every call. It measures how far a
//! collider may travel along each axis before touching another one, which
//! is enough for axis-aligned contact without manifold resolution.

use crate::foundation::math::Rect2;
use crate::scene::{EntityId, World};

/// Axis-aligned collision box attached to a spatial node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    /// Box relative to the owner's global position; negative sizes are allowed
    pub rect: Rect2,
}

impl Collider {
    /// Create a collider from a local rectangle
    pub fn new(rect: Rect2) -> Self {
        Self { rect }
    }
}

/// Room to move in each axial direction; `f32::INFINITY` when unconstrained
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clearance {
    /// Distance available toward -X (left)
    pub neg_x: f32,
    /// Distance available toward +X (right)
    pub pos_x: f32,
    /// Distance available toward -Y (up)
    pub neg_y: f32,
    /// Distance available toward +Y (down)
    pub pos_y: f32,
}

impl Clearance {
    /// No constraint in any direction
    pub const UNBOUNDED: Self = Self {
        neg_x: f32::INFINITY,
        pos_x: f32::INFINITY,
        neg_y: f32::INFINITY,
        pos_y: f32::INFINITY,
    };

    /// Resting on something below
    pub fn on_floor(&self) -> bool {
        self.pos_y == 0.0
    }

    /// Pressed against something above
    pub fn on_ceiling(&self) -> bool {
        self.neg_y == 0.0
    }

    /// Pressed against something on either side
    pub fn on_wall(&self) -> bool {
        self.neg_x == 0.0 || self.pos_x == 0.0
    }

    /// Contact flags derived from this clearance
    pub fn contacts(&self) -> Contacts {
        Contacts {
            floor: self.on_floor(),
            wall: self.on_wall(),
            ceiling: self.on_ceiling(),
        }
    }
}

impl Default for Clearance {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

/// Contact state of a body for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Contacts {
    /// Zero clearance below
    pub floor: bool,
    /// Zero clearance to the left or right
    pub wall: bool,
    /// Zero clearance above
    pub ceiling: bool,
}

impl World {
    /// Every collider reachable from the root, in tree order
    pub fn colliders(&self) -> Vec<EntityId> {
        self.descendants()
            .into_iter()
            .filter(|id| self.lookup(*id).is_some_and(|e| e.collider.is_some()))
            .collect()
    }

    /// Collider box in world space
    pub fn collider_rect(&self, id: EntityId) -> Option<Rect2> {
        let collider = self.lookup(id)?.collider?;
        let origin = self.global_position(id)?;
        Some(collider.rect.translate(origin))
    }

    /// Directional clearance of a collider against every other collider in the tree
    ///
    /// Never fails: an entity without a collider, or one with no other
    /// collider in reach, gets unbounded clearance.
    pub fn clearance(&self, id: EntityId) -> Clearance {
        let Some(own) = self.collider_rect(id) else {
            log::warn!("Clearance query on {id}, which has no collider");
            return Clearance::UNBOUNDED;
        };

        let mut clearance = Clearance::UNBOUNDED;
        for other in self.colliders() {
            if other == id {
                continue;
            }
            let Some(other_rect) = self.collider_rect(other) else { continue };
            let cmp = own.compare(&other_rect);
            clearance.neg_x = clearance.neg_x.min(cmp.left_space);
            clearance.pos_x = clearance.pos_x.min(cmp.right_space);
            clearance.neg_y = clearance.neg_y.min(cmp.top_space);
            clearance.pos_y = clearance.pos_y.min(cmp.bottom_space);
        }

        log::trace!("Clearance of {id}: {clearance:?}");
        clearance
    }

    /// The first direct child of `body` carrying a collider
    pub fn body_collider(&self, body: EntityId) -> Option<EntityId> {
        self.lookup(body)?
            .children
            .iter()
            .copied()
            .find(|child| self.lookup(*child).is_some_and(|e| e.collider.is_some()))
    }

    /// Clearance of a body's collider, `None` when the body has no collider
    pub fn body_clearance(&self, body: EntityId) -> Option<Clearance> {
        self.body_collider(body).map(|collider| self.clearance(collider))
    }

    /// Contact flags of a body this tick; all false without a collider
    pub fn contacts(&self, body: EntityId) -> Contacts {
        self.body_clearance(body).map(|c| c.contacts()).unwrap_or_default()
    }
}
