//! Core engine implementation

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::{Config, ConfigError},
    foundation::time::Timer,
    physics::{Environment, PhysicsBody},
    render::{CameraId, RenderError, Renderer, Viewport, DEFAULT_ZOOM_MAX, DEFAULT_ZOOM_MIN},
    scene::{SceneError, World},
};

/// Main engine struct
///
/// The engine owns the scene world and drives it one tick at a time:
/// update cascade, draw cascade, then presentation through a `Renderer`.
pub struct Engine {
    /// Scene world containing the entity tree and its cameras
    world: World,

    /// Frame timing
    timer: Timer,

    /// Engine configuration
    config: EngineConfig,

    /// Camera created from the configuration and made current at startup
    scene_camera: CameraId,
}

impl Engine {
    /// Create a new engine instance
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        log::info!("Initializing engine...");

        let mut world = World::with_viewport(config.viewport);
        let scene_camera = world.cameras_mut().create(config.camera.zoom_min, config.camera.zoom_max);
        if let Some(camera) = world.cameras_mut().get_mut(scene_camera) {
            camera.set_zoom(config.camera.zoom);
        }
        world.cameras_mut().set_current(scene_camera, true)?;

        Ok(Self {
            world,
            timer: Timer::new(),
            config,
            scene_camera,
        })
    }

    /// Create an engine from a `.toml` or `.ron` file, using defaults when it is missing
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let config = EngineConfig::load_or_default(path)?;
        Self::new(config)
    }

    /// Preload and ready the scene
    pub fn start(&mut self) -> Result<(), EngineError> {
        self.world.start()?;
        self.timer = Timer::new();
        log::info!("Engine started");
        Ok(())
    }

    /// Advance the scene by `delta_time` seconds and present the frame
    pub fn tick(&mut self, delta_time: f32, renderer: &mut dyn Renderer) -> Result<(), EngineError> {
        self.timer.advance(delta_time);
        self.step(delta_time, renderer)
    }

    /// Advance the scene by the wall-clock time since the previous frame
    pub fn frame(&mut self, renderer: &mut dyn Renderer) -> Result<(), EngineError> {
        self.timer.update();
        let delta_time = self.timer.delta_time();
        self.step(delta_time, renderer)
    }

    fn step(&mut self, delta_time: f32, renderer: &mut dyn Renderer) -> Result<(), EngineError> {
        self.world.update(delta_time)?;
        self.world.draw(delta_time)?;
        renderer.present(&self.world.frame(delta_time))?;
        Ok(())
    }

    /// Get the scene world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the scene world
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Get the engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Camera configured by `EngineConfig::camera`
    pub fn scene_camera(&self) -> CameraId {
        self.scene_camera
    }

    /// A physics body in the configured environment
    pub fn physics_body(&self) -> PhysicsBody {
        PhysicsBody::new(self.config.physics)
    }

    /// Frames per second, from the length of the last tick
    pub fn fps(&self) -> f32 {
        self.timer.current_fps()
    }

    /// Ticks run since `start`
    pub fn frame_count(&self) -> u64 {
        self.timer.frame_count()
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Screen the cameras project into
    pub viewport: Viewport,

    /// Scene camera configuration
    pub camera: CameraConfig,

    /// Environment given to physics bodies built by the engine
    pub physics: Environment,
}

/// Scene camera configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Smallest allowed zoom
    pub zoom_min: f32,

    /// Largest allowed zoom
    pub zoom_max: f32,

    /// Starting zoom
    pub zoom: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            zoom_min: DEFAULT_ZOOM_MIN,
            zoom_max: DEFAULT_ZOOM_MAX,
            zoom: 1.0,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            camera: CameraConfig::default(),
            physics: Environment::default(),
        }
    }
}

impl Config for EngineConfig {}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Scene tree error
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Rendering error
    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Rect2, Vec2};
    use crate::render::{Color, Frame, RectShape};
    use crate::scene::EntityBuilder;
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct CountingRenderer {
        frames: usize,
        commands: usize,
        camera_position: Vec2,
    }

    impl Renderer for CountingRenderer {
        fn present(&mut self, frame: &Frame<'_>) -> Result<(), RenderError> {
            self.frames += 1;
            self.commands = frame.commands.len();
            self.camera_position = frame.camera.position;
            Ok(())
        }
    }

    struct FailingRenderer;

    impl Renderer for FailingRenderer {
        fn present(&mut self, _frame: &Frame<'_>) -> Result<(), RenderError> {
            Err(RenderError::PresentFailed("device lost".to_string()))
        }
    }

    #[test]
    fn test_scene_camera_follows_config() {
        let config = EngineConfig {
            camera: CameraConfig { zoom_min: 0.5, zoom_max: 3.0, zoom: 10.0 },
            ..Default::default()
        };
        let engine = Engine::new(config).unwrap();

        let cameras = engine.world().cameras();
        assert!(cameras.is_current(engine.scene_camera()));
        assert_eq!(cameras.current().zoom(), 3.0);
        assert_eq!(cameras.current().zoom_min, 0.5);
    }

    #[test]
    fn test_tick_runs_update_draw_and_present() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        let camera = engine.scene_camera();
        let world = engine.world_mut();
        let root = world.root();
        let mover = world.spawn(
            EntityBuilder::new("mover")
                .with_velocity(Vec2::new(10.0, 0.0))
                .with_shape(RectShape::filled(Rect2::xywh(0.0, 0.0, 1.0, 1.0), Color::WHITE))
                .following_camera(camera),
        );
        world.attach(root, mover).unwrap();
        engine.start().unwrap();

        let mut renderer = CountingRenderer::default();
        engine.tick(0.5, &mut renderer).unwrap();
        engine.tick(0.5, &mut renderer).unwrap();

        assert_eq!(renderer.frames, 2);
        assert_eq!(engine.frame_count(), 2);
        assert_eq!(engine.fps(), 2.0);
        assert_eq!(renderer.commands, 1);
        assert_relative_eq!(renderer.camera_position, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_render_failure_is_reported() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        engine.start().unwrap();

        let result = engine.tick(0.016, &mut FailingRenderer);
        assert!(matches!(result, Err(EngineError::Render(_))));

        // Wall-clock frames go through the same pipeline
        let mut renderer = CountingRenderer::default();
        engine.frame(&mut renderer).unwrap();
        assert_eq!(renderer.frames, 1);
    }

    #[test]
    fn test_physics_body_uses_configured_environment() {
        let config = EngineConfig {
            physics: Environment::new(10.0, 2.0, 1.0),
            ..Default::default()
        };
        let engine = Engine::new(config).unwrap();

        assert_eq!(engine.physics_body().environment, Environment::new(10.0, 2.0, 1.0));
        assert_eq!(engine.physics_body().max_speed, f32::INFINITY);
    }

    #[test]
    fn test_from_config_file_reads_toml() {
        let path = std::env::temp_dir().join(format!("scene_engine_engine_{}.toml", std::process::id()));
        std::fs::write(&path, "[viewport]\nwidth = 640.0\nheight = 480.0\n\n[physics]\ngravity = 50.0\n").unwrap();

        let engine = Engine::from_config_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(engine.world().viewport(), Viewport::new(640.0, 480.0));
        assert_eq!(engine.config().physics.gravity, 50.0);
        assert_eq!(engine.config().physics.friction, 0.0);
        assert_eq!(engine.config().physics.air_resistance, 1000.0);
        assert_eq!(engine.config().camera, CameraConfig::default());
    }

    #[test]
    fn test_second_start_is_rejected() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        engine.start().unwrap();

        assert!(matches!(engine.start(), Err(EngineError::Scene(SceneError::Structural(_)))));
    }
}
