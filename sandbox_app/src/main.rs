//! Platformer sandbox
//!
//! Headless demo of the scene engine: a player physics body runs right
//! across a floor, hops on a timer and stops against a wall, with the scene
//! camera following it. Frames are presented by a renderer that only logs
//! the projected rectangles.
//!
//! Usage: `platformer_sandbox [TICKS]`. Settings are read from
//! `sandbox.toml` in the working directory when present.

use scene_engine::foundation::logging;
use scene_engine::prelude::*;
use thiserror::Error;

const CONFIG_PATH: &str = "sandbox.toml";
const DEFAULT_TICKS: u32 = 180;
const TICK: f32 = 1.0 / 60.0;

#[derive(Error, Debug)]
enum SandboxError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("Invalid tick count '{0}'")]
    InvalidTicks(String),
}

/// Renderer that writes each frame to the log instead of the screen
struct LogRenderer {
    frames: u64,
}

impl Renderer for LogRenderer {
    fn present(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
        self.frames += 1;
        for command in frame.commands {
            let rect = command.screen_rect(frame.camera, &frame.viewport);
            log::debug!(
                "frame {} {}: screen rect at ({:.1}, {:.1}) size ({:.1}, {:.1})",
                self.frames,
                command.entity,
                rect.position.x,
                rect.position.y,
                rect.size.x,
                rect.size.y
            );
        }
        if self.frames % 60 == 0 {
            log::info!(
                "frame {}: {} commands, camera at ({:.1}, {:.1})",
                self.frames,
                frame.commands.len(),
                frame.camera.position.x,
                frame.camera.position.y
            );
        }
        Ok(())
    }
}

/// Makes its owner hop whenever it has been on the floor for `interval` seconds
struct Hop {
    interval: f32,
    impulse: f32,
    grounded_for: f32,
}

impl Behavior for Hop {
    fn update(&mut self, world: &mut World, owner: EntityId, dt: f32) -> SceneResult {
        if !world.contacts(owner).floor {
            self.grounded_for = 0.0;
            return Ok(());
        }
        self.grounded_for += dt;
        if self.grounded_for >= self.interval {
            self.grounded_for = 0.0;
            let mut velocity = world.velocity(owner).unwrap_or_else(Vec2::zeros);
            velocity.y = -self.impulse;
            world.set_velocity(owner, velocity)?;
            log::info!("{owner} hops");
        }
        Ok(())
    }
}

fn solid(world: &mut World, name: &str, rect: Rect2, color: Color) -> SceneResult<EntityId> {
    let root = world.root();
    let local = Rect2::new(Vec2::zeros(), rect.size);
    let id = world.spawn(
        EntityBuilder::new(name)
            .at(rect.position)
            .with_collider(local)
            .with_shape(RectShape::filled(local, color)),
    );
    world.attach(root, id)?;
    Ok(id)
}

fn build_level(engine: &mut Engine) -> Result<EntityId, SandboxError> {
    let body = engine.physics_body().with_acceleration(600.0).with_max_speed(240.0);
    let camera = engine.scene_camera();
    let world = engine.world_mut();

    solid(world, "floor", Rect2::xywh(-400.0, 100.0, 1600.0, 40.0), Color::rgb(0.3, 0.3, 0.35))?;
    solid(world, "wall", Rect2::xywh(600.0, -300.0, 40.0, 400.0), Color::rgb(0.5, 0.3, 0.2))?;

    let root = world.root();
    let player = world.spawn(
        EntityBuilder::new("player")
            .at(Vec2::new(0.0, 0.0))
            .with_physics(body)
            .with_shape(RectShape::outlined(Rect2::xywh(0.0, 0.0, 32.0, 48.0), Color::WHITE, 2.0))
            .following_camera(camera)
            .with_behavior(Hop { interval: 0.75, impulse: 420.0, grounded_for: 0.0 }),
    );
    let hitbox = world.spawn(EntityBuilder::new("hitbox").with_collider(Rect2::xywh(0.0, 0.0, 32.0, 48.0)));
    world.attach(player, hitbox)?;
    world.attach(root, player)?;

    let hud = world.spawn(
        EntityBuilder::new("hud").with_shape(RectShape::filled(Rect2::xywh(16.0, 16.0, 200.0, 24.0), Color::BLACK).on_screen()),
    );
    world.attach(root, hud)?;

    log::info!("Level built with {} entities", world.entity_count());
    Ok(player)
}

fn run() -> Result<(), SandboxError> {
    let ticks = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<u32>().map_err(|_| SandboxError::InvalidTicks(arg))?,
        None => DEFAULT_TICKS,
    };

    let mut engine = Engine::from_config_file(CONFIG_PATH)?;
    let player = build_level(&mut engine)?;
    engine.start()?;

    let mut renderer = LogRenderer { frames: 0 };
    for _ in 0..ticks {
        engine.tick(TICK, &mut renderer)?;
    }

    let world = engine.world();
    let position = world.global_position(player).unwrap_or_else(Vec2::zeros);
    let contacts = world.contacts(player);
    log::info!(
        "After {ticks} ticks the player is at ({:.1}, {:.1}) floor={} wall={}",
        position.x,
        position.y,
        contacts.floor,
        contacts.wall
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init("info");

    log::info!("Starting platformer sandbox");

    match run() {
        Ok(()) => {
            log::info!("Sandbox completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Sandbox failed: {e}");
            Err(e.into())
        }
    }
}
