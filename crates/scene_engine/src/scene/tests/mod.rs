//! Scene scenarios spanning the tree, physics and camera modules

use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;

use crate::foundation::math::{Rect2, Vec2};
use crate::physics::{Environment, PhysicsBody};
use crate::render::{Color, RectShape};
use crate::scene::{Behavior, EntityBuilder, EntityId, HookOrder, SceneResult, World};

type Log = Rc<RefCell<Vec<String>>>;

fn ready_recorder(log: &Log, label: &str) -> impl FnMut(&mut World, EntityId) -> SceneResult + 'static {
    let log = Rc::clone(log);
    let label = format!("ready {label}");
    move |_, _| {
        log.borrow_mut().push(label.clone());
        Ok(())
    }
}

fn preload_recorder(log: &Log, label: &str) -> impl FnMut(&mut World, EntityId) -> SceneResult + 'static {
    let log = Rc::clone(log);
    let label = format!("preload {label}");
    move |_, _| {
        log.borrow_mut().push(label.clone());
        Ok(())
    }
}

fn tracked(log: &Log, name: &str) -> EntityBuilder {
    EntityBuilder::new(name)
        .on_preload(preload_recorder(log, name))
        .on_ready(ready_recorder(log, name))
}

struct PhaseRecorder {
    order: HookOrder,
    log: Log,
}

impl Behavior for PhaseRecorder {
    fn order(&self) -> HookOrder {
        self.order
    }

    fn preload(&mut self, _world: &mut World, _owner: EntityId) -> SceneResult {
        self.log.borrow_mut().push(format!("preload {:?}", self.order));
        Ok(())
    }

    fn ready(&mut self, world: &mut World, owner: EntityId) -> SceneResult {
        let in_tree = world.lookup(owner).is_some_and(|e| e.is_in_tree());
        self.log.borrow_mut().push(format!("ready {:?} in_tree={in_tree}", self.order));
        Ok(())
    }
}

#[test]
fn test_attach_before_start_defers_ready() {
    let log: Log = Rc::default();
    let mut world = World::new();
    let root = world.root();
    let parent = world.spawn(tracked(&log, "parent"));
    let child = world.spawn(tracked(&log, "child"));
    world.attach(parent, child).unwrap();
    world.attach(root, parent).unwrap();

    assert!(!log.borrow().iter().any(|entry| entry.starts_with("ready")));
    assert!(!world.lookup(parent).unwrap().is_in_tree());

    log.borrow_mut().clear();
    world.start().unwrap();

    // Start re-runs the preload cascade over children attached earlier,
    // then readies top-down
    assert_eq!(
        *log.borrow(),
        vec!["preload child", "preload parent", "ready parent", "ready child"]
    );
    assert!(world.lookup(child).unwrap().is_in_tree());
}

#[test]
fn test_attach_after_start_readies_immediately() {
    let log: Log = Rc::default();
    let mut world = World::new();
    let root = world.root();
    world.start().unwrap();

    let late = world.spawn(tracked(&log, "late"));
    world.attach(root, late).unwrap();

    assert_eq!(*log.borrow(), vec!["preload late", "ready late"]);
    assert!(world.lookup(late).unwrap().is_in_tree());
}

#[test]
fn test_detached_parent_defers_until_it_joins_the_tree() {
    let log: Log = Rc::default();
    let mut world = World::new();
    let root = world.root();
    world.start().unwrap();

    let holder = world.spawn(tracked(&log, "holder"));
    let item = world.spawn(tracked(&log, "item"));
    world.attach(holder, item).unwrap();
    assert_eq!(*log.borrow(), vec!["preload item"]);

    log.borrow_mut().clear();
    world.attach(root, holder).unwrap();
    assert_eq!(
        *log.borrow(),
        vec!["preload item", "preload holder", "ready holder", "ready item"]
    );
}

#[test]
fn test_behaviors_take_part_in_lifecycle_phases() {
    let log: Log = Rc::default();
    let mut world = World::new();
    let root = world.root();
    world.start().unwrap();

    let entity = world.spawn(
        tracked(&log, "entity")
            .with_behavior(PhaseRecorder { order: HookOrder::AfterOwner, log: Rc::clone(&log) })
            .with_behavior(PhaseRecorder { order: HookOrder::BeforeOwner, log: Rc::clone(&log) }),
    );
    world.attach(root, entity).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "preload BeforeOwner",
            "preload entity",
            "preload AfterOwner",
            "ready BeforeOwner in_tree=false",
            "ready entity",
            "ready AfterOwner in_tree=true",
        ]
    );
}

/// Behavior that keeps the default ordering
struct Stamp {
    log: Log,
}

impl Behavior for Stamp {
    fn update(&mut self, _world: &mut World, _owner: EntityId, _dt: f32) -> SceneResult {
        self.log.borrow_mut().push("stamp".to_string());
        Ok(())
    }
}

#[test]
fn test_behaviors_run_before_owner_unless_told_otherwise() {
    let log: Log = Rc::default();
    let mut world = World::new();
    let root = world.root();
    let owner_log = Rc::clone(&log);
    let owner = world.spawn(
        EntityBuilder::new("owner")
            .on_update(move |_, _, _| {
                owner_log.borrow_mut().push("owner".to_string());
                Ok(())
            })
            .with_behavior(Stamp { log: Rc::clone(&log) }),
    );
    world.attach(root, owner).unwrap();
    world.start().unwrap();

    assert_eq!(HookOrder::default(), HookOrder::BeforeOwner);
    world.update(0.016).unwrap();
    assert_eq!(*log.borrow(), vec!["stamp", "owner"]);
}

#[test]
fn test_removed_sibling_is_skipped_mid_cascade() {
    let log: Log = Rc::default();
    let mut world = World::new();
    let root = world.root();

    let victim_log = Rc::clone(&log);
    let killer = world.spawn(EntityBuilder::new("killer").on_update(|world, id, _| {
        let parent = world.lookup(id).and_then(|e| e.parent());
        if let Some(victim) = parent.and_then(|p| world.child_by_name(p, "victim")) {
            world.remove(victim)?;
        }
        Ok(())
    }));
    let victim = world.spawn(EntityBuilder::new("victim").on_update(move |_, _, _| {
        victim_log.borrow_mut().push("victim updated".to_string());
        Ok(())
    }));
    world.attach(root, killer).unwrap();
    world.attach(root, victim).unwrap();

    world.update(0.016).unwrap();
    assert!(log.borrow().is_empty());
    assert!(world.lookup(victim).is_none());
    assert_eq!(world.lookup(root).unwrap().children(), &[killer]);

    // The victim can be put back and takes part in the next update
    world.attach(root, victim).unwrap();
    assert_eq!(world.lookup(victim).unwrap().parent(), Some(root));
}

#[test]
fn test_platformer_body_runs_into_corner() {
    // Dyadic values keep every clamp exact, so contacts are exact too
    let env = Environment::new(32.0, 0.0, 0.0);
    let mut world = World::new();
    let root = world.root();
    let camera = world.cameras().current_id();

    let player = world.spawn(
        EntityBuilder::new("player")
            .at(Vec2::zeros())
            .with_physics(PhysicsBody::new(env).with_acceleration(64.0))
            .with_shape(RectShape::filled(Rect2::xywh(0.0, 0.0, 10.0, 10.0), Color::WHITE))
            .following_camera(camera),
    );
    let feet = world.spawn(EntityBuilder::new("feet").with_collider(Rect2::xywh(0.0, 0.0, 10.0, 10.0)));
    let floor = world.spawn(
        EntityBuilder::new("floor").at(Vec2::new(-50.0, 20.0)).with_collider(Rect2::xywh(0.0, 0.0, 200.0, 10.0)),
    );
    let wall = world.spawn(
        EntityBuilder::new("wall").at(Vec2::new(30.0, -50.0)).with_collider(Rect2::xywh(0.0, 0.0, 10.0, 100.0)),
    );
    world.attach(player, feet).unwrap();
    for id in [player, floor, wall] {
        world.attach(root, id).unwrap();
    }
    world.start().unwrap();

    for _ in 0..3 {
        world.update(0.25).unwrap();
    }
    assert_relative_eq!(world.global_position(player).unwrap(), Vec2::new(20.0, 10.0));

    let contacts = world.contacts(player);
    assert!(contacts.floor);
    assert!(contacts.wall);
    assert!(!contacts.ceiling);

    // Pinned in the corner: both velocity components are cancelled
    world.update(0.25).unwrap();
    assert_relative_eq!(world.velocity(player).unwrap(), Vec2::zeros());
    assert_relative_eq!(world.global_position(player).unwrap(), Vec2::new(20.0, 10.0));
    assert_relative_eq!(world.cameras().current().position, Vec2::new(20.0, 10.0));

    world.draw(0.25).unwrap();
    let frame = world.frame(0.25);
    assert_eq!(frame.commands.len(), 1);
    let on_screen = frame.commands[0].screen_rect(frame.camera, &frame.viewport);
    assert_relative_eq!(on_screen.position, frame.viewport.center());
}
