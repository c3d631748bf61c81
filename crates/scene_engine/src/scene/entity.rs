//! Entity implementation
//!
//! An entity is a node of the scene tree. Beyond its place in the tree it
//! carries a set of optional capabilities; each capability contributes a
//! fixed step to the entity's own per-phase hook (see `World`).

use std::fmt;

use crate::foundation::math::{Rect2, Vec2};
use crate::physics::{Collider, KinematicBody, PhysicsBody};
use crate::render::{CameraId, RectShape};
use crate::scene::hooks::{Behavior, PhaseHooks};
use crate::scene::{SceneResult, Spatial, World};

/// Entity identifier
///
/// Handed out from a monotonic per-world counter and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw numeric ID
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node of the scene tree
pub struct Entity {
    pub(crate) id: EntityId,
    pub(crate) name: String,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
    pub(crate) in_tree: bool,

    pub(crate) spatial: Option<Spatial>,
    pub(crate) collider: Option<Collider>,
    pub(crate) kinematic: Option<KinematicBody>,
    pub(crate) physics: Option<PhysicsBody>,
    pub(crate) shape: Option<RectShape>,
    pub(crate) camera_follow: Option<CameraId>,

    pub(crate) hooks: PhaseHooks,
    pub(crate) behaviors: Vec<Box<dyn Behavior>>,
}

impl Entity {
    /// Get the entity ID
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Get the entity name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent in the scene tree, `None` for the root and detached entities
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    /// Whether the ready cascade has reached this entity
    pub fn is_in_tree(&self) -> bool {
        self.in_tree
    }

    /// Local position, if the entity is a spatial node
    pub fn spatial(&self) -> Option<&Spatial> {
        self.spatial.as_ref()
    }

    /// Mutable local position
    pub fn spatial_mut(&mut self) -> Option<&mut Spatial> {
        self.spatial.as_mut()
    }

    /// Collider capability
    pub fn collider(&self) -> Option<&Collider> {
        self.collider.as_ref()
    }

    /// Mutable collider capability
    pub fn collider_mut(&mut self) -> Option<&mut Collider> {
        self.collider.as_mut()
    }

    /// Kinematic capability
    pub fn kinematic(&self) -> Option<&KinematicBody> {
        self.kinematic.as_ref()
    }

    /// Mutable kinematic capability
    pub fn kinematic_mut(&mut self) -> Option<&mut KinematicBody> {
        self.kinematic.as_mut()
    }

    /// Physics capability
    pub fn physics(&self) -> Option<&PhysicsBody> {
        self.physics.as_ref()
    }

    /// Mutable physics capability
    pub fn physics_mut(&mut self) -> Option<&mut PhysicsBody> {
        self.physics.as_mut()
    }

    /// Drawable rectangle
    pub fn shape(&self) -> Option<&RectShape> {
        self.shape.as_ref()
    }

    /// Mutable drawable rectangle
    pub fn shape_mut(&mut self) -> Option<&mut RectShape> {
        self.shape.as_mut()
    }

    /// Camera this entity drives, if any
    pub fn camera_follow(&self) -> Option<CameraId> {
        self.camera_follow
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("in_tree", &self.in_tree)
            .field("spatial", &self.spatial)
            .field("collider", &self.collider)
            .field("kinematic", &self.kinematic)
            .field("physics", &self.physics)
            .field("behaviors", &self.behaviors.len())
            .finish_non_exhaustive()
    }
}

/// Builder describing an entity before it is spawned into a `World`
///
/// Capabilities imply their prerequisites: a collider, kinematic body,
/// drawable shape or camera follow makes the entity a spatial node, and a
/// physics body makes it a kinematic body that moves every frame.
#[derive(Default)]
pub struct EntityBuilder {
    name: String,
    spatial: Option<Spatial>,
    collider: Option<Collider>,
    kinematic: Option<KinematicBody>,
    physics: Option<PhysicsBody>,
    shape: Option<RectShape>,
    camera_follow: Option<CameraId>,
    hooks: PhaseHooks,
    behaviors: Vec<Box<dyn Behavior>>,
}

impl EntityBuilder {
    /// Start describing an entity
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Make the entity a spatial node at `position` (relative to its parent)
    pub fn at(mut self, position: Vec2) -> Self {
        self.spatial = Some(Spatial::new(position));
        self
    }

    /// Attach a collider with a local AABB
    pub fn with_collider(mut self, rect: Rect2) -> Self {
        self.ensure_spatial();
        self.collider = Some(Collider::new(rect));
        self
    }

    /// Make the entity a kinematic body
    pub fn with_kinematic(mut self, move_every_frame: bool) -> Self {
        self.ensure_spatial();
        match self.kinematic.as_mut() {
            Some(kinematic) => kinematic.move_every_frame = move_every_frame,
            None => self.kinematic = Some(KinematicBody::new(move_every_frame)),
        }
        self
    }

    /// Set the initial velocity (makes the entity a kinematic body if needed)
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        if self.kinematic.is_none() {
            self = self.with_kinematic(true);
        }
        if let Some(kinematic) = self.kinematic.as_mut() {
            kinematic.velocity = velocity;
        }
        self
    }

    /// Make the entity a physics body
    pub fn with_physics(mut self, body: PhysicsBody) -> Self {
        self = self.with_kinematic(true);
        self.physics = Some(body);
        self
    }

    /// Attach a drawable rectangle
    pub fn with_shape(mut self, shape: RectShape) -> Self {
        self.ensure_spatial();
        self.shape = Some(shape);
        self
    }

    /// Copy this entity's global position into `camera` on every update
    pub fn following_camera(mut self, camera: CameraId) -> Self {
        self.ensure_spatial();
        self.camera_follow = Some(camera);
        self
    }

    /// Attach a behavior
    pub fn with_behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.behaviors.push(Box::new(behavior));
        self
    }

    /// Register a preload callback
    pub fn on_preload(mut self, hook: impl FnMut(&mut World, EntityId) -> SceneResult + 'static) -> Self {
        self.hooks.preload.push(Box::new(hook));
        self
    }

    /// Register a ready callback
    pub fn on_ready(mut self, hook: impl FnMut(&mut World, EntityId) -> SceneResult + 'static) -> Self {
        self.hooks.ready.push(Box::new(hook));
        self
    }

    /// Register an update callback
    pub fn on_update(mut self, hook: impl FnMut(&mut World, EntityId, f32) -> SceneResult + 'static) -> Self {
        self.hooks.update.push(Box::new(hook));
        self
    }

    /// Register a draw callback
    pub fn on_draw(mut self, hook: impl FnMut(&mut World, EntityId, f32) -> SceneResult + 'static) -> Self {
        self.hooks.draw.push(Box::new(hook));
        self
    }

    fn ensure_spatial(&mut self) {
        if self.spatial.is_none() {
            self.spatial = Some(Spatial::default());
        }
    }

    pub(crate) fn build(self, id: EntityId) -> Entity {
        Entity {
            id,
            name: self.name,
            parent: None,
            children: Vec::new(),
            in_tree: false,
            spatial: self.spatial,
            collider: self.collider,
            kinematic: self.kinematic,
            physics: self.physics,
            shape: self.shape,
            camera_follow: self.camera_follow,
            hooks: self.hooks,
            behaviors: self.behaviors,
        }
    }
}
