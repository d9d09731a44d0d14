//! Wheel rendering
//!
//! Drawing goes through the [`Surface`] trait so the same code paints a
//! browser canvas or a headless recording.

pub mod surface;
pub mod wheel;

pub use surface::{DrawCommand, RecordingSurface, Rect, Shadow, SizedImage, Surface, TextAlign};
pub use wheel::{
    AssetStatus, RenderGeneration, RenderReport, RenderToken, WheelLayout, fit_label, render,
};
