//! Draw commands and the renderer collaborator
//!
//! The scene never draws pixels itself. During the draw cascade entities
//! emit world-space `DrawCommand`s into the world's draw list; the engine
//! hands the list, the current camera and the viewport to a `Renderer` as
//! one `Frame`.
//!
//! # Design Philosophy
//!
//! The renderer should be a passive collaborator that:
//! - Accepts world-space geometry (no scene traversal)
//! - Projects through the camera it is given (no camera ownership)
//! - Only handles presentation (no lifecycle, input, or timing)

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::foundation::math::{Rect2, Vec2};
use crate::render::{Camera, Viewport};
use crate::scene::{EntityId, SceneError, SceneResult, World};

/// RGBA color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red component
    pub r: f32,
    /// Green component
    pub g: f32,
    /// Blue component
    pub b: f32,
    /// Alpha component
    pub a: f32,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Fully transparent
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    /// Create an opaque color
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Create a color with alpha
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Components as an array
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// How a rectangle is filled and outlined
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectStyle {
    /// Fill color; `None` draws the outline only
    pub fill: Option<Color>,
    /// Outline color; `None` draws no outline
    pub stroke: Option<Color>,
    /// Outline width in screen pixels
    pub stroke_width: f32,
    /// Treat the rectangle as screen-space (HUD) instead of projecting it
    pub ignore_camera: bool,
}

impl Default for RectStyle {
    fn default() -> Self {
        Self {
            fill: Some(Color::WHITE),
            stroke: None,
            stroke_width: 1.0,
            ignore_camera: false,
        }
    }
}

/// Drawable rectangle attached to a spatial node
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectShape {
    /// Rectangle relative to the owner's global position
    pub rect: Rect2,
    /// Fill, outline and projection options
    pub style: RectStyle,
}

impl RectShape {
    /// Create a filled rectangle
    pub fn filled(rect: Rect2, color: Color) -> Self {
        Self {
            rect,
            style: RectStyle { fill: Some(color), ..Default::default() },
        }
    }

    /// Create an outlined rectangle
    pub fn outlined(rect: Rect2, color: Color, stroke_width: f32) -> Self {
        Self {
            rect,
            style: RectStyle {
                fill: None,
                stroke: Some(color),
                stroke_width,
                ignore_camera: false,
            },
        }
    }

    /// Draw in screen space, ignoring the camera
    pub fn on_screen(mut self) -> Self {
        self.style.ignore_camera = true;
        self
    }
}

/// A world-space rectangle to present this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    /// Entity that emitted the command
    pub entity: EntityId,
    /// Rectangle in world space (screen space when `style.ignore_camera`)
    pub rect: Rect2,
    /// Fill and outline
    pub style: RectStyle,
}

impl DrawCommand {
    /// Rectangle in screen space as seen through `camera`
    pub fn screen_rect(&self, camera: &Camera, viewport: &Viewport) -> Rect2 {
        if self.style.ignore_camera {
            self.rect
        } else {
            camera.rect_to_screen(&self.rect, viewport)
        }
    }
}

/// Everything a renderer needs to present one frame
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Commands in emission order (tree order)
    pub commands: &'a [DrawCommand],
    /// Current camera
    pub camera: &'a Camera,
    /// Screen size
    pub viewport: Viewport,
    /// Time since the previous frame in seconds
    pub delta_time: f32,
}

/// Renderer collaborator presenting frames
pub trait Renderer {
    /// Present one frame
    fn present(&mut self, frame: &Frame<'_>) -> Result<(), RenderError>;
}

/// Rendering error types
#[derive(Error, Debug)]
pub enum RenderError {
    /// A frame could not be presented
    #[error("Presenting frame failed: {0}")]
    PresentFailed(String),

    /// Backend-specific error occurred
    #[error("Backend error: {0}")]
    BackendError(String),
}

impl World {
    /// World-space command for an entity's drawable rectangle
    pub(crate) fn shape_command(&self, id: EntityId) -> Option<DrawCommand> {
        let shape = self.lookup(id)?.shape?;
        let rect = if shape.style.ignore_camera {
            shape.rect
        } else {
            shape.rect.translate(self.global_position(id)?)
        };
        Some(DrawCommand { entity: id, rect, style: shape.style })
    }

    /// Emit a rectangle from a draw callback
    ///
    /// `rect` is relative to the entity's global position (or absolute when
    /// the entity is not spatial or the style ignores the camera).
    pub fn emit(&mut self, id: EntityId, rect: Rect2, style: RectStyle) -> SceneResult {
        if !self.contains(id) {
            return Err(SceneError::NotFound(id));
        }
        let origin = if style.ignore_camera {
            Vec2::zeros()
        } else {
            self.global_position(id).unwrap_or_else(Vec2::zeros)
        };
        self.draw_list.push(DrawCommand { entity: id, rect: rect.translate(origin), style });
        Ok(())
    }

    /// Commands emitted by the last draw cascade
    pub fn draw_list(&self) -> &[DrawCommand] {
        &self.draw_list
    }

    /// Package the last draw cascade for a renderer
    pub fn frame(&self, delta_time: f32) -> Frame<'_> {
        Frame {
            commands: &self.draw_list,
            camera: self.cameras.current(),
            viewport: self.viewport,
            delta_time,
        }
    }
}
