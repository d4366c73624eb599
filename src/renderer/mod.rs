//! Drawing surface abstraction
//!
//! Games and the runtime draw through the `Surface` trait. `CommandBuffer`
//! is the in-crate implementation: it records every call as a `DrawCommand`
//! and tessellates solid fills into vertices a host renderer can upload.

pub mod shapes;
pub mod vertex;

use glam::Vec2;

use crate::resources::ImageHandle;
use crate::{Color, Rect};
pub use vertex::{Vertex, as_bytes, colors};

/// Circle tessellation density
const CIRCLE_SEGMENTS: u32 = 24;

/// Horizontal anchor for text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Immediate-mode 2D drawing target
///
/// All coordinates are in pixels and are offset by the current translation.
/// The global alpha multiplies every color drawn while it is set.
pub trait Surface {
    /// Logical size in pixels
    fn size(&self) -> Vec2;
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, thickness: f32, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn draw_image(&mut self, image: &ImageHandle, dest: Rect);
    fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color, align: TextAlign);

    fn global_alpha(&self) -> f32;
    fn set_global_alpha(&mut self, alpha: f32);

    fn translation(&self) -> Vec2;
    fn set_translation(&mut self, offset: Vec2);

    /// Drop any translation so following draws land in screen space
    fn reset_transform(&mut self) {
        self.set_translation(Vec2::ZERO);
    }
}

/// A recorded draw call (positions already translated)
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, thickness: f32, color: Color },
    FillCircle { center: Vec2, radius: f32, color: Color },
    Image { width: u32, height: u32, dest: Rect, alpha: f32 },
    Text { text: String, pos: Vec2, size: f32, color: Color, align: TextAlign },
}

/// Recording surface
#[derive(Debug, Clone)]
pub struct CommandBuffer {
    size: Vec2,
    alpha: f32,
    offset: Vec2,
    commands: Vec<DrawCommand>,
    vertices: Vec<Vertex>,
}

impl CommandBuffer {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            alpha: 1.0,
            offset: Vec2::ZERO,
            commands: Vec::new(),
            vertices: Vec::new(),
        }
    }

    /// Surface sized to the host (game area + input bar)
    pub fn host() -> Self {
        use crate::consts::{HOST_HEIGHT, SCREEN_WIDTH};
        Self::new(SCREEN_WIDTH, HOST_HEIGHT)
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Start a new frame; alpha and translation are reset too
    pub fn begin_frame(&mut self) {
        self.commands.clear();
        self.vertices.clear();
        self.alpha = 1.0;
        self.offset = Vec2::ZERO;
    }

    /// All text drawn this frame, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    fn tint(&self, color: Color) -> Color {
        color.with_alpha(color.a * self.alpha)
    }
}

impl Surface for CommandBuffer {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
        self.vertices.extend(shapes::quad(
            Rect::new(0.0, 0.0, self.size.x, self.size.y),
            color.to_array(),
        ));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let rect = rect.translated(self.offset);
        let color = self.tint(color);
        self.vertices.extend(shapes::quad(rect, color.to_array()));
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, thickness: f32, color: Color) {
        let rect = rect.translated(self.offset);
        let color = self.tint(color);
        self.vertices
            .extend(shapes::outline(rect, thickness, color.to_array()));
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            thickness,
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let center = center + self.offset;
        let color = self.tint(color);
        self.vertices.extend(shapes::circle(
            center,
            radius,
            color.to_array(),
            CIRCLE_SEGMENTS,
        ));
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn draw_image(&mut self, image: &ImageHandle, dest: Rect) {
        self.commands.push(DrawCommand::Image {
            width: image.width(),
            height: image.height(),
            dest: dest.translated(self.offset),
            alpha: self.alpha,
        });
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color, align: TextAlign) {
        let color = self.tint(color);
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos: pos + self.offset,
            size,
            color,
            align,
        });
    }

    fn global_alpha(&self) -> f32 {
        self.alpha
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn translation(&self) -> Vec2 {
        self.offset
    }

    fn set_translation(&mut self, offset: Vec2) {
        self.offset = offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_applies_to_fills() {
        let mut buf = CommandBuffer::new(100.0, 100.0);
        buf.set_translation(Vec2::new(-10.0, -5.0));
        buf.fill_rect(Rect::new(20.0, 20.0, 4.0, 4.0), Color::WHITE);
        buf.reset_transform();
        buf.fill_rect(Rect::new(20.0, 20.0, 4.0, 4.0), Color::WHITE);
        assert_eq!(
            buf.commands()[0],
            DrawCommand::FillRect {
                rect: Rect::new(10.0, 15.0, 4.0, 4.0),
                color: Color::WHITE
            }
        );
        assert!(matches!(
            buf.commands()[1],
            DrawCommand::FillRect { rect, .. } if rect.x == 20.0
        ));
        assert_eq!(buf.vertices().len(), 12);
    }

    #[test]
    fn test_global_alpha_tints() {
        let mut buf = CommandBuffer::new(10.0, 10.0);
        buf.set_global_alpha(0.5);
        buf.fill_circle(Vec2::ZERO, 2.0, Color::WHITE.with_alpha(0.8));
        match &buf.commands()[0] {
            DrawCommand::FillCircle { color, .. } => assert!((color.a - 0.4).abs() < 1e-6),
            other => panic!("unexpected {:?}", other),
        }
        buf.set_global_alpha(4.0);
        assert_eq!(buf.global_alpha(), 1.0);
    }

    #[test]
    fn test_stroke_rect_is_translated_outline() {
        let mut buf = CommandBuffer::new(100.0, 100.0);
        buf.set_translation(Vec2::new(5.0, 5.0));
        buf.stroke_rect(Rect::new(10.0, 10.0, 20.0, 10.0), 2.0, Color::RED);
        assert_eq!(
            buf.commands()[0],
            DrawCommand::StrokeRect {
                rect: Rect::new(15.0, 15.0, 20.0, 10.0),
                thickness: 2.0,
                color: Color::RED
            }
        );
        // Four edge quads
        assert_eq!(buf.vertices().len(), 24);
    }

    #[test]
    fn test_begin_frame_resets() {
        let mut buf = CommandBuffer::host();
        buf.draw_text("HI", Vec2::ZERO, 12.0, Color::WHITE, TextAlign::Center);
        buf.set_global_alpha(0.2);
        assert!(buf.has_text("HI"));
        buf.begin_frame();
        assert!(buf.commands().is_empty());
        assert_eq!(buf.global_alpha(), 1.0);
        assert_eq!(buf.size(), Vec2::new(360.0, 640.0));
    }
}
