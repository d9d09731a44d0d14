//! 2D drawing surface abstraction
//!
//! Modeled on the canvas 2D context: a transform/alpha/clip state stack plus
//! a handful of fill and stroke primitives. Angles are radians, clockwise
//! from +x in screen space (y points down).

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use crate::assets::ImageSize;
use crate::customization::Rgba;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            origin: center - size / 2.0,
            size,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.origin + self.size / 2.0
    }
}

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// Drop shadow applied to subsequent fills
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Rgba,
    pub blur: f32,
    pub offset: Vec2,
}

/// Something the wheel can be drawn onto
pub trait Surface {
    type Image: ImageSize;

    /// Drawing area in device-independent pixels
    fn size(&self) -> Vec2;

    fn clear(&mut self);
    /// Push transform, alpha, shadow and clip state
    fn save(&mut self);
    /// Pop the state pushed by the matching `save`
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, radians: f32);
    fn set_alpha(&mut self, alpha: f32);
    fn set_shadow(&mut self, shadow: Option<Shadow>);
    fn set_font(&mut self, font: &str);

    /// Pie slice from `center` spanning `[start, end)`
    fn fill_wedge(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Rgba);
    fn stroke_wedge(
        &mut self,
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        color: Rgba,
        line_width: f32,
    );
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgba, line_width: f32);
    /// Intersect the clip region with a circle (until the next `restore`)
    fn clip_circle(&mut self, center: Vec2, radius: f32);

    fn draw_image(&mut self, image: &Self::Image, dest: Rect);

    /// Width of `text` in the current font
    fn measure_text(&self, text: &str) -> f32;
    /// Draw text vertically centered on `at`
    fn fill_text(&mut self, text: &str, at: Vec2, align: TextAlign, color: Rgba);
}

/// A recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Save,
    Restore,
    Translate(Vec2),
    Rotate(f32),
    SetAlpha(f32),
    SetShadow(Option<Shadow>),
    SetFont(String),
    FillWedge {
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        color: Rgba,
    },
    StrokeWedge {
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        color: Rgba,
        line_width: f32,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    StrokeCircle {
        center: Vec2,
        radius: f32,
        color: Rgba,
        line_width: f32,
    },
    ClipCircle {
        center: Vec2,
        radius: f32,
    },
    DrawImage {
        src: String,
        dest: Rect,
    },
    FillText {
        text: String,
        at: Vec2,
        align: TextAlign,
        color: Rgba,
    },
}

/// A decoded image known only by name and size (headless rendering)
#[derive(Debug, Clone, PartialEq)]
pub struct SizedImage {
    pub src: String,
    pub width: f32,
    pub height: f32,
}

impl ImageSize for SizedImage {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }
}

/// Headless surface that records every call
///
/// Clones share one command log, so a copy can be inspected while a render
/// future still holds the original.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: Vec2,
    /// Fixed advance per character used by `measure_text`
    char_width: f32,
    log: Rc<RefCell<Vec<DrawCommand>>>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            char_width: 8.0,
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn with_char_width(mut self, char_width: f32) -> Self {
        self.char_width = char_width;
        self
    }

    /// Snapshot of everything drawn so far
    pub fn commands(&self) -> Vec<DrawCommand> {
        self.log.borrow().clone()
    }

    /// Drawn text, in draw order
    pub fn texts(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, command: DrawCommand) {
        self.log.borrow_mut().push(command);
    }
}

impl Surface for RecordingSurface {
    type Image = SizedImage;

    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self) {
        self.push(DrawCommand::Clear);
    }

    fn save(&mut self) {
        self.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.push(DrawCommand::Restore);
    }

    fn translate(&mut self, offset: Vec2) {
        self.push(DrawCommand::Translate(offset));
    }

    fn rotate(&mut self, radians: f32) {
        self.push(DrawCommand::Rotate(radians));
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.push(DrawCommand::SetAlpha(alpha));
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.push(DrawCommand::SetShadow(shadow));
    }

    fn set_font(&mut self, font: &str) {
        self.push(DrawCommand::SetFont(font.to_string()));
    }

    fn fill_wedge(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Rgba) {
        self.push(DrawCommand::FillWedge {
            center,
            radius,
            start,
            end,
            color,
        });
    }

    fn stroke_wedge(
        &mut self,
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        color: Rgba,
        line_width: f32,
    ) {
        self.push(DrawCommand::StrokeWedge {
            center,
            radius,
            start,
            end,
            color,
            line_width,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgba, line_width: f32) {
        self.push(DrawCommand::StrokeCircle {
            center,
            radius,
            color,
            line_width,
        });
    }

    fn clip_circle(&mut self, center: Vec2, radius: f32) {
        self.push(DrawCommand::ClipCircle { center, radius });
    }

    fn draw_image(&mut self, image: &SizedImage, dest: Rect) {
        self.push(DrawCommand::DrawImage {
            src: image.src.clone(),
            dest,
        });
    }

    fn measure_text(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }

    fn fill_text(&mut self, text: &str, at: Vec2, align: TextAlign, color: Rgba) {
        self.push(DrawCommand::FillText {
            text: text.to_string(),
            at,
            align,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_log() {
        let surface = RecordingSurface::new(100.0, 100.0);
        let mut writer = surface.clone();
        writer.clear();
        writer.fill_text("hi", Vec2::ZERO, TextAlign::Left, Rgba::WHITE);
        assert_eq!(surface.commands().len(), 2);
        assert_eq!(surface.texts(), vec!["hi".to_string()]);
    }

    #[test]
    fn test_measure_counts_chars() {
        let surface = RecordingSurface::new(10.0, 10.0).with_char_width(5.0);
        assert_eq!(surface.measure_text("héllo"), 25.0);
    }

    #[test]
    fn test_rect_centered() {
        let r = Rect::centered(Vec2::new(50.0, 50.0), Vec2::new(20.0, 10.0));
        assert_eq!(r.origin, Vec2::new(40.0, 45.0));
        assert_eq!(r.center(), Vec2::new(50.0, 50.0));
    }
}
