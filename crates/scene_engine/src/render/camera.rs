//! # 2D Camera System
//!
//! Provides the camera used to project world-space geometry onto the screen.
//!
//! ## Design Principles
//! - **Zoom always in range**: zoom is clamped into `[zoom_min, zoom_max]`
//!   on both write and read, so callers may change the bounds freely
//! - **One current camera**: each `World` owns a `Cameras` table with a
//!   single "current" slot; the last camera made current wins
//! - **Screen convention**: +X is right, +Y is down, origin at the top-left
//!   corner of the viewport

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Rect2, Vec2};
use crate::scene::{EntityId, SceneError, SceneResult, World};

/// Lower zoom bound of a default camera
pub const DEFAULT_ZOOM_MIN: f32 = 0.2;

/// Upper zoom bound of a default camera
pub const DEFAULT_ZOOM_MAX: f32 = 5.0;

/// Camera identity token within a `Cameras` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CameraId(usize);

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "camera {}", self.0)
    }
}

/// Screen area the cameras project into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl Viewport {
    /// Create a viewport
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Center of the screen in screen coordinates
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1920.0, 1080.0)
    }
}

/// 2D camera with a clamped zoom
///
/// The camera position is the world point shown at the center of the
/// viewport. A zoom above 1 magnifies, below 1 shrinks.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    id: CameraId,

    /// World point at the center of the screen
    pub position: Vec2,

    /// Smallest allowed zoom
    pub zoom_min: f32,

    /// Largest allowed zoom
    pub zoom_max: f32,

    zoom: f32,
}

impl Camera {
    fn new(id: CameraId, zoom_min: f32, zoom_max: f32) -> Self {
        Self {
            id,
            position: Vec2::zeros(),
            zoom_min,
            zoom_max,
            zoom: 1.0,
        }
    }

    /// Identity of this camera in its table
    pub fn id(&self) -> CameraId {
        self.id
    }

    /// Current zoom, clamped into the current bounds
    pub fn zoom(&self) -> f32 {
        self.clamp_zoom(self.zoom)
    }

    /// Set the zoom
    ///
    /// # Arguments
    /// * `zoom` - Requested zoom; stored clamped into `[zoom_min, zoom_max]`
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = self.clamp_zoom(zoom);
        log::trace!("{} zoom set to {:.3}", self.id, self.zoom);
    }

    fn clamp_zoom(&self, zoom: f32) -> f32 {
        zoom.max(self.zoom_min).min(self.zoom_max)
    }

    /// Copy position, zoom and bounds from another camera, keeping this camera's identity
    ///
    /// Bounds are copied first so the copied zoom is clamped against them.
    pub fn copy_from(&mut self, other: &Camera) {
        self.position = other.position;
        self.zoom_min = other.zoom_min;
        self.zoom_max = other.zoom_max;
        self.set_zoom(other.zoom());
    }

    /// Project a world point onto the screen
    ///
    /// # Arguments
    /// * `point` - Point in world space
    /// * `viewport` - Screen the camera renders into
    ///
    /// # Returns
    /// `(point - position) * zoom + screen_center`
    pub fn to_screen(&self, point: Vec2, viewport: &Viewport) -> Vec2 {
        (point - self.position) * self.zoom() + viewport.center()
    }

    /// Unproject a screen point into the world
    ///
    /// # Returns
    /// `(point - screen_center) / zoom + position`
    pub fn to_world(&self, point: Vec2, viewport: &Viewport) -> Vec2 {
        (point - viewport.center()) / self.zoom() + self.position
    }

    /// Project a world rectangle onto the screen
    pub fn rect_to_screen(&self, rect: &Rect2, viewport: &Viewport) -> Rect2 {
        Rect2::new(self.to_screen(rect.position, viewport), rect.size * self.zoom())
    }

    /// Unproject a screen rectangle into the world
    pub fn rect_to_world(&self, rect: &Rect2, viewport: &Viewport) -> Rect2 {
        Rect2::new(self.to_world(rect.position, viewport), rect.size / self.zoom())
    }
}

/// Camera table with a single "current camera" slot
#[derive(Debug, Clone)]
pub struct Cameras {
    cameras: Vec<Camera>,
    current: CameraId,
}

impl Cameras {
    /// Create a table holding one default camera, which is current
    pub fn new() -> Self {
        let mut table = Self {
            cameras: Vec::new(),
            current: CameraId(0),
        };
        table.current = table.create(DEFAULT_ZOOM_MIN, DEFAULT_ZOOM_MAX);
        table
    }

    /// Create a camera at the origin with zoom 1 (clamped into the bounds)
    pub fn create(&mut self, zoom_min: f32, zoom_max: f32) -> CameraId {
        let id = CameraId(self.cameras.len());
        self.cameras.push(Camera::new(id, zoom_min, zoom_max));
        id
    }

    /// Get a camera
    pub fn get(&self, id: CameraId) -> Option<&Camera> {
        self.cameras.get(id.0)
    }

    /// Get a camera for mutation
    pub fn get_mut(&mut self, id: CameraId) -> Option<&mut Camera> {
        self.cameras.get_mut(id.0)
    }

    /// The camera occupying the current slot
    pub fn current(&self) -> &Camera {
        &self.cameras[self.current.0]
    }

    /// The camera occupying the current slot, for mutation
    pub fn current_mut(&mut self) -> &mut Camera {
        &mut self.cameras[self.current.0]
    }

    /// ID of the current camera
    pub fn current_id(&self) -> CameraId {
        self.current
    }

    /// Whether `id` occupies the current slot
    pub fn is_current(&self, id: CameraId) -> bool {
        self.current == id
    }

    /// Set or clear a camera's current flag
    ///
    /// Making a camera current replaces whatever occupied the slot. Clearing
    /// the flag on the current camera installs a brand-new default camera;
    /// clearing it on any other camera does nothing.
    pub fn set_current(&mut self, id: CameraId, current: bool) -> SceneResult {
        if self.get(id).is_none() {
            return Err(SceneError::CameraNotFound(id));
        }
        if current {
            self.current = id;
            log::debug!("{id} is now current");
        } else if self.current == id {
            self.current = self.create(DEFAULT_ZOOM_MIN, DEFAULT_ZOOM_MAX);
            log::debug!("{id} released the current slot, default {} installed", self.current);
        }
        Ok(())
    }
}

impl Default for Cameras {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Camera table of this world
    pub fn cameras(&self) -> &Cameras {
        &self.cameras
    }

    /// Camera table of this world, for mutation
    pub fn cameras_mut(&mut self) -> &mut Cameras {
        &mut self.cameras
    }

    /// Screen the cameras project into
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Change the screen size
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Copy an entity's global position into `camera`
    pub(crate) fn sync_follow_camera(&mut self, id: EntityId, camera: CameraId) {
        let Some(position) = self.global_position(id) else { return };
        match self.cameras.get_mut(camera) {
            Some(target) => {
                target.position = position;
                log::trace!("{camera} follows {id} to ({}, {})", position.x, position.y);
            }
            None => log::warn!("{id} follows unknown {camera}"),
        }
    }
}
