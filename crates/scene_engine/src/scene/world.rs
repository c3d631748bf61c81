//! Scene world: entity registry, tree structure and lifecycle cascades
//!
//! The world is the single owner of every entity. It replaces process-wide
//! state (ID registry, current camera) with one explicit value, so several
//! independent simulations can live side by side.

use std::collections::{HashMap, HashSet};

use crate::render::{Cameras, DrawCommand, Viewport};
use crate::scene::hooks::{Behavior, HookOrder, Phase};
use crate::scene::{Entity, EntityBuilder, EntityId, SceneError, SceneResult};

/// Name given to the root entity of a fresh world
pub const DEFAULT_ROOT_NAME: &str = "Default Scene Root";

/// Scene world containing the entity tree and its cameras
pub struct World {
    next_entity_id: u64,
    entities: HashMap<EntityId, Entity>,
    removed: HashSet<EntityId>,
    root: EntityId,
    started: bool,
    pub(crate) cameras: Cameras,
    pub(crate) viewport: Viewport,
    pub(crate) draw_list: Vec<DrawCommand>,
}

impl World {
    /// Create a new world with a default viewport
    pub fn new() -> Self {
        Self::with_viewport(Viewport::default())
    }

    /// Create a new world rendering into `viewport`
    pub fn with_viewport(viewport: Viewport) -> Self {
        let mut world = Self {
            next_entity_id: 0,
            entities: HashMap::new(),
            removed: HashSet::new(),
            root: EntityId::new(0),
            started: false,
            cameras: Cameras::new(),
            viewport,
            draw_list: Vec::new(),
        };
        world.root = world.spawn(EntityBuilder::new(DEFAULT_ROOT_NAME));
        world
    }

    /// Create and register a new, detached entity
    pub fn spawn(&mut self, builder: EntityBuilder) -> EntityId {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id += 1;
        let entity = builder.build(id);
        log::trace!("Spawned entity {} '{}'", id, entity.name);
        self.entities.insert(id, entity);
        id
    }

    /// Root of the scene tree
    pub fn root(&self) -> EntityId {
        self.root
    }

    /// Whether `start` has run
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Look up an entity by ID; `None` once it has been removed
    pub fn lookup(&self, id: EntityId) -> Option<&Entity> {
        if self.removed.contains(&id) {
            return None;
        }
        self.entities.get(&id)
    }

    /// Look up an entity by ID for mutation
    pub fn lookup_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        if self.removed.contains(&id) {
            return None;
        }
        self.entities.get_mut(&id)
    }

    /// Check if an entity exists and has not been removed
    pub fn contains(&self, id: EntityId) -> bool {
        !self.removed.contains(&id) && self.entities.contains_key(&id)
    }

    /// Whether `id` was unlinked by `remove` (or replaced as root) and not attached since
    pub fn is_removed(&self, id: EntityId) -> bool {
        self.removed.contains(&id)
    }

    /// Number of registered entities that have not been removed
    ///
    /// Descendants of a removed entity stay registered and are counted.
    pub fn entity_count(&self) -> usize {
        self.entities.len() - self.removed.len()
    }

    pub(crate) fn entity(&self, id: EntityId) -> SceneResult<&Entity> {
        self.entities.get(&id).ok_or(SceneError::NotFound(id))
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> SceneResult<&mut Entity> {
        self.entities.get_mut(&id).ok_or(SceneError::NotFound(id))
    }

    /// Get a child by position in its parent's child list
    pub fn child_by_index(&self, parent: EntityId, index: usize) -> Option<EntityId> {
        self.lookup(parent)?.children.get(index).copied()
    }

    /// Get a direct child by ID
    pub fn child_by_id(&self, parent: EntityId, child: EntityId) -> Option<EntityId> {
        self.lookup(parent)?.children.iter().copied().find(|c| *c == child)
    }

    /// Get the first direct child with the given name
    pub fn child_by_name(&self, parent: EntityId, name: &str) -> Option<EntityId> {
        self.lookup(parent)?
            .children
            .iter()
            .copied()
            .find(|c| self.lookup(*c).is_some_and(|e| e.name == name))
    }

    /// Preload and ready the scene tree, making the root live
    pub fn start(&mut self) -> SceneResult {
        if self.started {
            return Err(SceneError::Structural("world already started".to_string()));
        }
        let root = self.root;
        self.preload_cascade(root)?;
        self.started = true;
        self.ready_cascade(root)?;
        log::info!("Scene started with {} entities", self.entities.len());
        Ok(())
    }

    /// Attach `child` under `parent`
    ///
    /// The child's subtree is preloaded depth-first before it becomes
    /// reachable from `parent`. A preload failure leaves both the tree and
    /// the child as they were. When `parent` is already in the tree the
    /// child is readied immediately; otherwise readiness is deferred until
    /// the parent's own ready cascade reaches it.
    ///
    /// A previously removed entity may be attached again, together with the
    /// subtree it kept; it becomes visible to `lookup` once linked.
    pub fn attach(&mut self, parent: EntityId, child: EntityId) -> SceneResult {
        if self.removed.contains(&parent) {
            return Err(SceneError::NotFound(parent));
        }
        self.entity(parent)?;
        let child_entity = self.entity(child)?;
        if child == self.root {
            return Err(SceneError::Structural(format!("cannot attach scene root {child}")));
        }
        if let Some(existing) = child_entity.parent {
            return Err(SceneError::Structural(format!(
                "entity {child} already has parent {existing}"
            )));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::Structural(format!(
                "attaching {child} under {parent} would create a cycle"
            )));
        }

        self.entity_mut(child)?.parent = Some(parent);
        if let Err(err) = self.preload_cascade(child) {
            log::warn!("Preload of {child} failed, attach aborted: {err}");
            if let Some(entity) = self.entities.get_mut(&child) {
                entity.parent = None;
            }
            return Err(err);
        }

        if !self.entities.contains_key(&child) {
            return Err(SceneError::NotFound(child));
        }
        let parent_in_tree = match self.entities.get_mut(&parent) {
            Some(parent_entity) => {
                parent_entity.children.push(child);
                parent_entity.in_tree
            }
            None => {
                if let Some(entity) = self.entities.get_mut(&child) {
                    entity.parent = None;
                }
                return Err(SceneError::NotFound(parent));
            }
        };
        self.removed.remove(&child);
        log::debug!("Attached {child} under {parent}");

        if parent_in_tree {
            self.ready_cascade(child)?;
        }
        Ok(())
    }

    /// Unlink an entity from its parent's child list
    ///
    /// Only `id` itself stops being found by `lookup`. Its descendants stay
    /// registered and linked to it, unreachable from the root. Registry
    /// entries are never purged. Fails with a structural error, leaving the
    /// tree untouched, when the entity has no parent.
    pub fn remove(&mut self, id: EntityId) -> SceneResult {
        if self.removed.contains(&id) {
            return Err(SceneError::NotFound(id));
        }
        let Some(parent) = self.entity(id)?.parent else {
            return Err(SceneError::Structural(format!("cannot remove {id}: it has no parent")));
        };
        if let Some(parent_entity) = self.entities.get_mut(&parent) {
            parent_entity.children.retain(|c| *c != id);
        }
        self.entity_mut(id)?.parent = None;
        self.removed.insert(id);
        log::debug!("Removed {id} from {parent}");
        Ok(())
    }

    /// Install a detached entity as the new scene root
    ///
    /// The new root is preloaded first; the previous root is then marked
    /// removed, keeping its subtree registered but unreachable. If the world
    /// has started, the new root is readied immediately.
    pub fn replace_root(&mut self, new_root: EntityId) -> SceneResult {
        if self.removed.contains(&new_root) {
            return Err(SceneError::NotFound(new_root));
        }
        let entity = self.entity(new_root)?;
        if new_root == self.root {
            return Ok(());
        }
        if entity.parent.is_some() {
            return Err(SceneError::Structural(format!(
                "new root {new_root} must be detached first"
            )));
        }

        self.preload_cascade(new_root)?;
        let old_root = std::mem::replace(&mut self.root, new_root);
        self.removed.insert(old_root);
        log::debug!("Replaced scene root {old_root} with {new_root}");

        if self.started {
            self.ready_cascade(new_root)?;
        }
        Ok(())
    }

    /// Register a preload callback on an existing entity
    pub fn on_preload(
        &mut self,
        id: EntityId,
        hook: impl FnMut(&mut World, EntityId) -> SceneResult + 'static,
    ) -> SceneResult {
        self.entity_mut(id)?.hooks.preload.push(Box::new(hook));
        Ok(())
    }

    /// Register a ready callback on an existing entity
    pub fn on_ready(
        &mut self,
        id: EntityId,
        hook: impl FnMut(&mut World, EntityId) -> SceneResult + 'static,
    ) -> SceneResult {
        self.entity_mut(id)?.hooks.ready.push(Box::new(hook));
        Ok(())
    }

    /// Register an update callback on an existing entity
    pub fn on_update(
        &mut self,
        id: EntityId,
        hook: impl FnMut(&mut World, EntityId, f32) -> SceneResult + 'static,
    ) -> SceneResult {
        self.entity_mut(id)?.hooks.update.push(Box::new(hook));
        Ok(())
    }

    /// Register a draw callback on an existing entity
    pub fn on_draw(
        &mut self,
        id: EntityId,
        hook: impl FnMut(&mut World, EntityId, f32) -> SceneResult + 'static,
    ) -> SceneResult {
        self.entity_mut(id)?.hooks.draw.push(Box::new(hook));
        Ok(())
    }

    /// Attach a behavior to an existing entity
    pub fn add_behavior(&mut self, id: EntityId, behavior: impl Behavior + 'static) -> SceneResult {
        self.entity_mut(id)?.behaviors.push(Box::new(behavior));
        Ok(())
    }

    /// Run the update cascade from the root
    pub fn update(&mut self, dt: f32) -> SceneResult {
        let root = self.root;
        self.update_cascade(root, dt)
    }

    /// Run the draw cascade from the root, rebuilding the frame's draw list
    pub fn draw(&mut self, dt: f32) -> SceneResult {
        self.draw_list.clear();
        let root = self.root;
        self.draw_cascade(root, dt)
    }

    /// Every entity reachable from the root, depth-first in child order
    pub fn descendants(&self) -> Vec<EntityId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(entity) = self.entities.get(&id) else { continue };
            out.push(id);
            stack.extend(entity.children.iter().rev().copied());
        }
        out
    }

    fn is_ancestor_or_self(&self, candidate: EntityId, mut node: EntityId) -> bool {
        loop {
            if node == candidate {
                return true;
            }
            match self.entities.get(&node).and_then(|e| e.parent) {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn children_snapshot(&self, id: EntityId) -> Vec<EntityId> {
        self.entities.get(&id).map(|e| e.children.clone()).unwrap_or_default()
    }

    /// `child` is still linked under `parent`; false once removed or re-parented mid-cascade
    fn still_child_of(&self, child: EntityId, parent: EntityId) -> bool {
        self.entities.get(&child).is_some_and(|e| e.parent == Some(parent))
    }

    fn preload_cascade(&mut self, id: EntityId) -> SceneResult {
        self.run_behaviors(id, HookOrder::BeforeOwner, Phase::Preload, 0.0)?;
        for child in self.children_snapshot(id) {
            if self.still_child_of(child, id) {
                self.preload_cascade(child)?;
            }
        }
        self.run_lifecycle_hooks(id, Phase::Preload)?;
        self.run_behaviors(id, HookOrder::AfterOwner, Phase::Preload, 0.0)
    }

    fn ready_cascade(&mut self, id: EntityId) -> SceneResult {
        self.run_behaviors(id, HookOrder::BeforeOwner, Phase::Ready, 0.0)?;
        match self.entities.get_mut(&id) {
            Some(entity) => entity.in_tree = true,
            None => return Ok(()),
        }
        self.run_lifecycle_hooks(id, Phase::Ready)?;
        self.run_behaviors(id, HookOrder::AfterOwner, Phase::Ready, 0.0)?;
        for child in self.children_snapshot(id) {
            if self.still_child_of(child, id) {
                self.ready_cascade(child)?;
            }
        }
        Ok(())
    }

    fn update_cascade(&mut self, id: EntityId, dt: f32) -> SceneResult {
        self.run_behaviors(id, HookOrder::BeforeOwner, Phase::Update, dt)?;
        self.own_update(id, dt)?;
        self.run_frame_hooks(id, Phase::Update, dt)?;
        self.run_behaviors(id, HookOrder::AfterOwner, Phase::Update, dt)?;
        for child in self.children_snapshot(id) {
            if self.still_child_of(child, id) {
                self.update_cascade(child, dt)?;
            }
        }
        Ok(())
    }

    fn draw_cascade(&mut self, id: EntityId, dt: f32) -> SceneResult {
        self.run_behaviors(id, HookOrder::BeforeOwner, Phase::Draw, dt)?;
        self.own_draw(id);
        self.run_frame_hooks(id, Phase::Draw, dt)?;
        self.run_behaviors(id, HookOrder::AfterOwner, Phase::Draw, dt)?;
        for child in self.children_snapshot(id) {
            if self.still_child_of(child, id) {
                self.draw_cascade(child, dt)?;
            }
        }
        Ok(())
    }

    /// Fixed-order update steps contributed by the entity's capabilities:
    /// physics integration (which ends in the kinematic move), otherwise the
    /// automatic kinematic move, then camera follow.
    fn own_update(&mut self, id: EntityId, dt: f32) -> SceneResult {
        let Some(entity) = self.entities.get(&id) else { return Ok(()) };
        let has_physics = entity.physics.is_some();
        let moves = entity.kinematic.as_ref().is_some_and(|k| k.move_every_frame);
        let follow = entity.camera_follow;

        if has_physics {
            self.step_physics(id, dt)?;
        } else if moves {
            self.move_body(id, dt)?;
        }
        if let Some(camera) = follow {
            self.sync_follow_camera(id, camera);
        }
        Ok(())
    }

    fn own_draw(&mut self, id: EntityId) {
        if let Some(command) = self.shape_command(id) {
            self.draw_list.push(command);
        }
    }

    fn run_behaviors(&mut self, id: EntityId, order: HookOrder, phase: Phase, dt: f32) -> SceneResult {
        let Some(entity) = self.entities.get_mut(&id) else { return Ok(()) };
        if entity.behaviors.is_empty() {
            return Ok(());
        }

        // Behaviors are taken out while they run so they can borrow the world.
        let mut behaviors = std::mem::take(&mut entity.behaviors);
        let result = behaviors
            .iter_mut()
            .filter(|behavior| behavior.order() == order)
            .try_for_each(|behavior| match phase {
                Phase::Preload => behavior.preload(self, id),
                Phase::Ready => behavior.ready(self, id),
                Phase::Update => behavior.update(self, id, dt),
                Phase::Draw => behavior.draw(self, id, dt),
            });

        if let Some(entity) = self.entities.get_mut(&id) {
            behaviors.append(&mut entity.behaviors);
            entity.behaviors = behaviors;
        }
        result
    }

    fn run_lifecycle_hooks(&mut self, id: EntityId, phase: Phase) -> SceneResult {
        let Some(entity) = self.entities.get_mut(&id) else { return Ok(()) };
        let mut hooks = std::mem::take(entity.hooks.lifecycle_mut(phase));
        let result = hooks.iter_mut().try_for_each(|hook| hook(self, id));

        if let Some(entity) = self.entities.get_mut(&id) {
            let slot = entity.hooks.lifecycle_mut(phase);
            hooks.append(slot);
            *slot = hooks;
        }
        result
    }

    fn run_frame_hooks(&mut self, id: EntityId, phase: Phase, dt: f32) -> SceneResult {
        let Some(entity) = self.entities.get_mut(&id) else { return Ok(()) };
        let mut hooks = std::mem::take(entity.hooks.frame_mut(phase));
        let result = hooks.iter_mut().try_for_each(|hook| hook(self, id, dt));

        if let Some(entity) = self.entities.get_mut(&id) {
            let slot = entity.hooks.frame_mut(phase);
            hooks.append(slot);
            *slot = hooks;
        }
        result
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    fn recorder(log: &Log, label: &str) -> impl FnMut(&mut World, EntityId) -> SceneResult + 'static {
        let log = Rc::clone(log);
        let label = label.to_string();
        move |_, _| {
            log.borrow_mut().push(label.clone());
            Ok(())
        }
    }

    fn frame_recorder(log: &Log, label: &str) -> impl FnMut(&mut World, EntityId, f32) -> SceneResult + 'static {
        let log = Rc::clone(log);
        let label = label.to_string();
        move |_, _, _| {
            log.borrow_mut().push(label.clone());
            Ok(())
        }
    }

    struct Tagged {
        label: &'static str,
        order: HookOrder,
        log: Log,
    }

    impl Behavior for Tagged {
        fn order(&self) -> HookOrder {
            self.order
        }

        fn update(&mut self, _world: &mut World, _owner: EntityId, _dt: f32) -> SceneResult {
            self.log.borrow_mut().push(self.label.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_ids_are_unique_and_monotonic() {
        let mut world = World::new();
        let a = world.spawn(EntityBuilder::new("a"));
        let b = world.spawn(EntityBuilder::new("b"));

        assert!(b.raw() > a.raw());
        assert!(a.raw() > world.root().raw());

        let root = world.root();
        world.attach(root, a).unwrap();
        world.remove(a).unwrap();
        let c = world.spawn(EntityBuilder::new("c"));
        assert!(c.raw() > b.raw());
    }

    #[test]
    fn test_lookup_until_removed() {
        let mut world = World::new();
        let root = world.root();
        let child = world.spawn(EntityBuilder::new("child"));
        let grandchild = world.spawn(EntityBuilder::new("grandchild"));
        world.attach(child, grandchild).unwrap();
        world.attach(root, child).unwrap();

        assert_eq!(world.lookup(child).map(Entity::name), Some("child"));

        world.remove(child).unwrap();
        assert!(world.lookup(child).is_none());
        assert!(world.is_removed(child));
        assert!(world.lookup(root).unwrap().children().is_empty());

        // Descendants stay registered and linked to the removed entity
        let kept = world.lookup(grandchild).unwrap();
        assert_eq!(kept.parent(), Some(child));
        assert!(!world.descendants().contains(&grandchild));
        assert!(matches!(world.remove(child), Err(SceneError::NotFound(_))));
    }

    #[test]
    fn test_removed_subtree_can_be_attached_again() {
        let mut world = World::new();
        let root = world.root();
        world.start().unwrap();
        let parent = world.spawn(EntityBuilder::new("parent"));
        let child = world.spawn(EntityBuilder::new("child"));
        world.attach(parent, child).unwrap();
        world.attach(root, parent).unwrap();
        let count = world.entity_count();

        world.remove(parent).unwrap();
        assert_eq!(world.entity_count(), count - 1);
        let orphan = world.spawn(EntityBuilder::new("orphan"));
        assert!(matches!(world.attach(parent, orphan), Err(SceneError::NotFound(_))));

        let holder = world.spawn(EntityBuilder::new("holder"));
        world.attach(root, holder).unwrap();
        world.attach(holder, parent).unwrap();

        assert_eq!(world.lookup(parent).unwrap().parent(), Some(holder));
        assert_eq!(world.lookup(parent).unwrap().children(), &[child]);
        assert!(!world.is_removed(parent));
        assert!(world.descendants().contains(&child));
    }

    #[test]
    fn test_remove_without_parent_is_structural_error() {
        let mut world = World::new();
        let root = world.root();
        let detached = world.spawn(EntityBuilder::new("detached"));
        let count_before = world.entity_count();

        assert!(matches!(world.remove(detached), Err(SceneError::Structural(_))));
        assert!(matches!(world.remove(root), Err(SceneError::Structural(_))));
        assert_eq!(world.entity_count(), count_before);
        assert!(world.lookup(detached).is_some());
    }

    #[test]
    fn test_attach_rejects_second_parent_and_cycles() {
        let mut world = World::new();
        let root = world.root();
        let a = world.spawn(EntityBuilder::new("a"));
        let b = world.spawn(EntityBuilder::new("b"));
        world.attach(root, a).unwrap();
        world.attach(a, b).unwrap();

        assert!(matches!(world.attach(root, b), Err(SceneError::Structural(_))));
        assert!(matches!(world.attach(a, a), Err(SceneError::Structural(_))));

        let c = world.spawn(EntityBuilder::new("c"));
        let d = world.spawn(EntityBuilder::new("d"));
        world.attach(c, d).unwrap();
        assert!(matches!(world.attach(d, c), Err(SceneError::Structural(_))));
        assert!(matches!(world.attach(c, root), Err(SceneError::Structural(_))));
    }

    #[test]
    fn test_preload_order_is_depth_first() {
        let log: Log = Rc::default();
        let mut world = World::new();
        let root = world.root();

        let parent = world.spawn(EntityBuilder::new("parent").on_preload(recorder(&log, "parent")));
        let child = world.spawn(EntityBuilder::new("child").on_preload(recorder(&log, "child")));
        let grandchild = world.spawn(EntityBuilder::new("grandchild").on_preload(recorder(&log, "grandchild")));
        world.attach(child, grandchild).unwrap();
        world.attach(parent, child).unwrap();
        log.borrow_mut().clear();

        world.attach(root, parent).unwrap();
        assert_eq!(*log.borrow(), vec!["grandchild", "child", "parent"]);
    }

    #[test]
    fn test_failed_preload_aborts_attach() {
        let mut world = World::new();
        let root = world.root();
        world.start().unwrap();

        let failing = Rc::new(Cell::new(false));
        let armed = Rc::clone(&failing);
        let parent = world.spawn(EntityBuilder::new("parent"));
        let loader = world.spawn(EntityBuilder::new("loader").on_preload(move |_, id| {
            if armed.get() {
                Err(SceneError::hook(id, "texture missing"))
            } else {
                Ok(())
            }
        }));
        world.attach(parent, loader).unwrap();

        failing.set(true);
        let result = world.attach(root, parent);
        assert!(matches!(result, Err(SceneError::Hook { .. })));
        assert!(world.lookup(root).unwrap().children().is_empty());
        assert_eq!(world.lookup(parent).unwrap().parent(), None);
        assert!(!world.lookup(parent).unwrap().is_in_tree());

        // The same subtree attaches once the cause is gone
        failing.set(false);
        world.attach(root, parent).unwrap();
        assert!(world.lookup(parent).unwrap().is_in_tree());
        assert!(world.lookup(loader).unwrap().is_in_tree());
    }

    #[test]
    fn test_update_order_within_entity() {
        let log: Log = Rc::default();
        let mut world = World::new();
        let root = world.root();

        let entity = world.spawn(
            EntityBuilder::new("entity")
                .on_update(frame_recorder(&log, "callback"))
                .with_behavior(Tagged { label: "after", order: HookOrder::AfterOwner, log: Rc::clone(&log) })
                .with_behavior(Tagged { label: "before", order: HookOrder::BeforeOwner, log: Rc::clone(&log) }),
        );
        let child = world.spawn(EntityBuilder::new("child").on_update(frame_recorder(&log, "child")));
        world.attach(entity, child).unwrap();
        world.attach(root, entity).unwrap();

        world.update(0.016).unwrap();
        assert_eq!(*log.borrow(), vec!["before", "callback", "after", "child"]);
    }

    #[test]
    fn test_children_update_in_insertion_order() {
        let log: Log = Rc::default();
        let mut world = World::new();
        let root = world.root();
        for name in ["first", "second", "third"] {
            let id = world.spawn(EntityBuilder::new(name).on_draw(frame_recorder(&log, name)));
            world.attach(root, id).unwrap();
        }

        world.draw(0.016).unwrap();
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
        assert_eq!(world.child_by_index(root, 1), world.child_by_name(root, "second"));
    }

    #[test]
    fn test_failing_update_callback_interrupts_cascade() {
        let log: Log = Rc::default();
        let mut world = World::new();
        let root = world.root();

        let failing = world.spawn(
            EntityBuilder::new("failing")
                .on_update(|_, id, _| Err(SceneError::hook(id, "boom")))
                .on_update(frame_recorder(&log, "second callback")),
        );
        let child = world.spawn(EntityBuilder::new("child").on_update(frame_recorder(&log, "child")));
        world.attach(failing, child).unwrap();
        world.attach(root, failing).unwrap();

        assert!(world.update(0.016).is_err());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_callbacks_may_mutate_the_tree() {
        let mut world = World::new();
        let root = world.root();
        world.start().unwrap();

        let spawner = world.spawn(EntityBuilder::new("spawner").on_update(|world, id, _| {
            if world.lookup(id).is_some_and(|e| e.children().is_empty()) {
                let spawned = world.spawn(EntityBuilder::new("spawned"));
                world.attach(id, spawned)?;
            }
            Ok(())
        }));
        world.attach(root, spawner).unwrap();

        world.update(0.016).unwrap();
        world.update(0.016).unwrap();
        let spawned = world.child_by_name(spawner, "spawned").unwrap();
        assert!(world.lookup(spawned).unwrap().is_in_tree());
        assert_eq!(world.lookup(spawner).unwrap().children().len(), 1);
    }

    #[test]
    fn test_replace_root() {
        let mut world = World::new();
        let old_root = world.root();
        let old_child = world.spawn(EntityBuilder::new("old child"));
        world.attach(old_root, old_child).unwrap();
        world.start().unwrap();

        let level = world.spawn(EntityBuilder::new("level"));
        world.replace_root(level).unwrap();

        assert_eq!(world.root(), level);
        assert!(world.lookup(level).unwrap().is_in_tree());
        assert!(world.lookup(old_root).is_none());
        assert!(world.lookup(old_child).is_some());
        assert_eq!(world.descendants(), vec![level]);
        assert!(matches!(world.start(), Err(SceneError::Structural(_))));
    }
}
