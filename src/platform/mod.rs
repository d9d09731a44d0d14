//! Platform abstraction layer
//!
//! Browser glue lives in `web` (wasm32 only):
//! - Canvas 2D surface for the wheel renderer
//! - Image loading through `HtmlImageElement`
//! - Small DOM helpers for the winner modal and celebration bursts
//!
//! Native builds draw onto `renderer::RecordingSurface` instead.

#[cfg(target_arch = "wasm32")]
pub mod web;
