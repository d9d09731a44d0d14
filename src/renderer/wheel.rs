//! Wheel renderer
//!
//! Two passes:
//! - base: segments, labels and the center hub, drawn synchronously
//! - overlay: background and logo, drawn once their images decode
//!
//! The background lands *under* the segments, so when it arrives the whole
//! wheel is redrawn on top of it. The logo always goes last. A failed image
//! is logged and skipped; the wheel itself always renders.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

use super::surface::{Rect, Shadow, Surface, TextAlign};
use crate::assets::{ImageLoader, ImageSize};
use crate::consts::*;
use crate::customization::{Customization, Rgba};
use crate::error::AssetError;
use crate::sim::WheelGeometry;

/// Where the wheel sits on the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelLayout {
    pub center: Vec2,
    pub radius: f32,
}

impl WheelLayout {
    /// Centered, radius from the smaller surface dimension minus `margin`
    pub fn for_surface(size: Vec2, margin: f32) -> Self {
        let center = size / 2.0;
        Self {
            center,
            radius: (center.x.min(center.y) - margin).max(1.0),
        }
    }

    pub fn label_radius(&self) -> f32 {
        self.radius * LABEL_RADIUS_FACTOR
    }

    pub fn max_label_width(&self) -> f32 {
        self.radius * LABEL_MAX_WIDTH_FACTOR
    }

    pub fn hub_radius(&self) -> f32 {
        self.radius * HUB_RADIUS_FACTOR
    }

    pub fn logo_radius(&self) -> f32 {
        self.radius * LOGO_RADIUS_FACTOR
    }
}

/// Shorten `text` with a trailing ellipsis until it fits `max_width`.
///
/// Keeps the longest prefix that fits alongside the ellipsis, and always ends
/// up with fewer characters than it started with. Labels of three characters
/// or fewer are returned as is.
pub fn fit_label<S: Surface + ?Sized>(surface: &S, text: &str, max_width: f32) -> String {
    if surface.measure_text(text) <= max_width {
        return text.to_string();
    }
    let len = text.chars().count();
    let reserved = ELLIPSIS.chars().count();
    // An ellipsis would not shorten these, so they overflow instead
    if len <= reserved {
        return text.to_string();
    }

    let budget = max_width - surface.measure_text(ELLIPSIS);
    let prefix = |n: usize| match text.char_indices().nth(n) {
        Some((end, _)) => &text[..end],
        None => text,
    };

    // Width grows with prefix length, so binary search the cut point
    let (mut lo, mut hi) = (0, len - reserved - 1);
    while lo < hi {
        let mid = (lo + hi).div_ceil(2);
        if surface.measure_text(prefix(mid)) <= budget {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    format!("{}{}", prefix(lo), ELLIPSIS)
}

/// Size and place an image so it covers a circle of `diameter`: the smaller
/// image side maps to the diameter, the rest is cropped by the clip
pub fn cover_rect<I: ImageSize + ?Sized>(image: &I, center: Vec2, diameter: f32) -> Rect {
    let (w, h) = (image.width(), image.height());
    let shorter = w.min(h);
    let size = if shorter > 0.0 {
        Vec2::new(w, h) * (diameter / shorter)
    } else {
        Vec2::splat(diameter)
    };
    Rect::centered(center, size)
}

/// Label drop shadow for legibility
const LABEL_SHADOW: Shadow = Shadow {
    color: Rgba::BLACK.with_alpha(0.5),
    blur: 2.0,
    offset: Vec2::new(1.0, 1.0),
};

/// Draw every segment with its label
pub fn draw_segments<S: Surface + ?Sized>(
    surface: &mut S,
    layout: &WheelLayout,
    entries: &[String],
    customization: &Customization,
) {
    let Some(geometry) = WheelGeometry::new(entries.len()) else {
        return;
    };
    let outline = Rgba::WHITE.with_alpha(0.3);
    let text_color = customization.text_color.to_rgba();
    let max_label = layout.max_label_width();
    surface.set_font(LABEL_FONT);

    for (i, entry) in entries.iter().enumerate() {
        let (start, end) = geometry.segment_span(i);
        let (start, end) = ((start as f32).to_radians(), (end as f32).to_radians());
        let color = customization.segment_color(i);

        surface.fill_wedge(layout.center, layout.radius, start, end, color);
        surface.stroke_wedge(layout.center, layout.radius, start, end, outline, 1.0);

        surface.save();
        surface.translate(layout.center);
        surface.rotate((geometry.segment_midpoint(i) as f32).to_radians());
        surface.set_shadow(Some(LABEL_SHADOW));
        let label = fit_label(&*surface, entry, max_label);
        surface.fill_text(
            &label,
            Vec2::new(layout.label_radius(), 0.0),
            TextAlign::Right,
            text_color,
        );
        surface.restore();
    }
}

/// White hub over the segment apexes
pub fn draw_hub<S: Surface + ?Sized>(surface: &mut S, layout: &WheelLayout) {
    surface.fill_circle(layout.center, layout.hub_radius(), Rgba::WHITE);
    surface.stroke_circle(layout.center, layout.hub_radius(), Rgba::BLACK.with_alpha(0.2), 2.0);
}

/// Base pass: clear, segments, hub
pub fn draw_base<S: Surface + ?Sized>(
    surface: &mut S,
    layout: &WheelLayout,
    entries: &[String],
    customization: &Customization,
) {
    surface.clear();
    draw_segments(surface, layout, entries, customization);
    draw_hub(surface, layout);
}

/// Faint background image clipped to the wheel
pub fn draw_background<S: Surface + ?Sized>(surface: &mut S, layout: &WheelLayout, image: &S::Image) {
    surface.save();
    surface.clip_circle(layout.center, layout.radius);
    surface.set_alpha(BACKGROUND_ALPHA);
    surface.draw_image(image, cover_rect(image, layout.center, layout.radius * 2.0));
    surface.restore();
}

/// Circular logo over the hub with a white ring
pub fn draw_logo<S: Surface + ?Sized>(surface: &mut S, layout: &WheelLayout, image: &S::Image) {
    let r = layout.logo_radius();
    surface.save();
    surface.clip_circle(layout.center, r);
    surface.draw_image(image, cover_rect(image, layout.center, r * 2.0));
    surface.restore();
    surface.stroke_circle(layout.center, r, Rgba::WHITE, 3.0);
}

/// Counter that invalidates in-flight renders when a newer one starts
#[derive(Debug, Clone, Default)]
pub struct RenderGeneration(Rc<Cell<u64>>);

impl RenderGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a render; every earlier token goes stale
    pub fn begin(&self) -> RenderToken {
        let generation = self.0.get() + 1;
        self.0.set(generation);
        RenderToken {
            generation,
            current: self.0.clone(),
        }
    }
}

/// Proof that a render is still the latest one
#[derive(Debug, Clone)]
pub struct RenderToken {
    generation: u64,
    current: Rc<Cell<u64>>,
}

impl RenderToken {
    pub fn is_current(&self) -> bool {
        self.current.get() == self.generation
    }
}

/// What happened to an optional image during a render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetStatus {
    NotConfigured,
    Drawn,
    Failed(AssetError),
    /// A newer render started before this image arrived
    Superseded,
}

/// Outcome of one full render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderReport {
    pub background: AssetStatus,
    pub logo: AssetStatus,
}

/// Render the wheel for `entries` and `customization`.
///
/// The base pass is on the surface before the first await, so a slow or
/// broken image never leaves the wheel blank. Image loads start together;
/// the background (if any) is composited first, then the logo.
pub async fn render<S, L>(
    surface: &mut S,
    loader: &L,
    entries: &[String],
    customization: &Customization,
    margin: f32,
    token: &RenderToken,
) -> RenderReport
where
    S: Surface + ?Sized,
    L: ImageLoader<Image = S::Image> + ?Sized,
{
    let layout = WheelLayout::for_surface(surface.size(), margin);
    draw_base(surface, &layout, entries, customization);

    let background = customization.background_image.as_ref().map(|src| loader.load(src));
    let logo = customization.logo_url.as_ref().map(|src| loader.load(src));

    let mut report = RenderReport {
        background: AssetStatus::NotConfigured,
        logo: AssetStatus::NotConfigured,
    };

    if let Some(pending) = background {
        let loaded = pending.await;
        if !token.is_current() {
            report.background = AssetStatus::Superseded;
            if logo.is_some() {
                report.logo = AssetStatus::Superseded;
            }
            return report;
        }
        report.background = match loaded {
            Ok(image) => {
                surface.clear();
                draw_background(surface, &layout, &image);
                draw_segments(surface, &layout, entries, customization);
                draw_hub(surface, &layout);
                AssetStatus::Drawn
            }
            Err(e) => {
                log::warn!("Background image skipped: {}", e);
                AssetStatus::Failed(e)
            }
        };
    }

    if let Some(pending) = logo {
        let loaded = pending.await;
        if !token.is_current() {
            report.logo = AssetStatus::Superseded;
            return report;
        }
        report.logo = match loaded {
            Ok(image) => {
                draw_logo(surface, &layout, &image);
                AssetStatus::Drawn
            }
            Err(e) => {
                log::warn!("Logo image skipped: {}", e);
                AssetStatus::Failed(e)
            }
        };
    }

    report
}
