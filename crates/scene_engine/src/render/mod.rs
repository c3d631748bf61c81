//! Rendering module
//!
//! Cameras projecting world space onto the screen, plus the draw-command
//! hand-off to an external renderer.
//!
//! # Architecture
//!
//! - **Camera**: position, clamped zoom, world↔screen transforms
//! - **Cameras**: per-world camera table with one current slot
//! - **DrawCommand / Frame**: world-space geometry emitted by the draw cascade
//! - **Renderer**: collaborator trait presenting a `Frame`

pub mod camera;
pub mod draw;

pub use camera::{Camera, CameraId, Cameras, Viewport, DEFAULT_ZOOM_MAX, DEFAULT_ZOOM_MIN};
pub use draw::{Color, DrawCommand, Frame, RectShape, RectStyle, RenderError, Renderer};

/// Result type for rendering operations
pub type RenderResult<T = ()> = Result<T, RenderError>;
