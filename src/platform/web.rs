//! Browser platform: canvas surface, image loader, DOM helpers

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement, HtmlImageElement};

use crate::assets::{ImageLoader, ImageRef, ImageSize};
use crate::customization::{ButtonStyle, Rgba};
use crate::effects::{Celebration, SPARKLE_LIFETIME_MS};
use crate::error::AssetError;
use crate::renderer::{Rect, Shadow, Surface, TextAlign};

/// A decoded browser image
#[derive(Debug, Clone)]
pub struct WebImage(HtmlImageElement);

impl ImageSize for WebImage {
    fn width(&self) -> f32 {
        self.0.natural_width() as f32
    }

    fn height(&self) -> f32 {
        self.0.natural_height() as f32
    }
}

/// Loads images by URL (or data URL) and waits for them to decode
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlImageLoader;

impl ImageLoader for HtmlImageLoader {
    type Image = WebImage;

    fn load(&self, src: &ImageRef) -> LocalBoxFuture<'static, Result<WebImage, AssetError>> {
        let src = src.as_str().to_string();
        async move {
            let failed = |reason: String| AssetError::LoadFailed {
                src: ImageRef::new(src.clone()).to_string(),
                reason,
            };
            let img = HtmlImageElement::new().map_err(|e| failed(js_reason(&e)))?;
            img.set_cross_origin(Some("anonymous"));
            img.set_src(&src);
            JsFuture::from(img.decode())
                .await
                .map_err(|e| failed(js_reason(&e)))?;
            Ok(WebImage(img))
        }
        .boxed_local()
    }
}

fn js_reason(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// The wheel canvas
///
/// Cloning is cheap (JS handles), and every clone draws to the same canvas.
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    size: Vec2,
}

impl CanvasSurface {
    /// Size the backing store for the device pixel ratio and grab a 2D context
    pub fn new(canvas: HtmlCanvasElement, edge: f32) -> Result<Self, JsValue> {
        let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
        let backing = (edge as f64 * dpr).round() as u32;
        canvas.set_width(backing);
        canvas.set_height(backing);
        let style = canvas.style();
        style.set_property("width", &format!("{}px", edge))?;
        style.set_property("height", &format!("{}px", edge))?;

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        ctx.scale(dpr, dpr)?;

        Ok(Self {
            canvas,
            ctx,
            size: Vec2::splat(edge),
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Spin the whole canvas; the wheel image itself is never redrawn for rotation
    pub fn set_rotation(&self, degrees: f64) {
        if let Err(e) = self
            .canvas
            .style()
            .set_property("transform", &format!("rotate({}deg)", degrees))
        {
            log::debug!("Canvas rotation not applied: {}", js_reason(&e));
        }
    }

    fn wedge_path(&self, center: Vec2, radius: f32, start: f32, end: f32) {
        self.ctx.begin_path();
        self.ctx.move_to(center.x as f64, center.y as f64);
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, start as f64, end as f64);
        self.ctx.close_path();
    }

    fn circle_path(&self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            radius as f64,
            0.0,
            std::f64::consts::TAU,
        );
    }
}

impl Surface for CanvasSurface {
    type Image = WebImage;

    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.size.x as f64, self.size.y as f64);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, offset: Vec2) {
        let _ = self.ctx.translate(offset.x as f64, offset.y as f64);
    }

    fn rotate(&mut self, radians: f32) {
        let _ = self.ctx.rotate(radians as f64);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        match shadow {
            Some(s) => {
                self.ctx.set_shadow_color(&s.color.to_css());
                self.ctx.set_shadow_blur(s.blur as f64);
                self.ctx.set_shadow_offset_x(s.offset.x as f64);
                self.ctx.set_shadow_offset_y(s.offset.y as f64);
            }
            None => {
                self.ctx.set_shadow_color("transparent");
                self.ctx.set_shadow_blur(0.0);
                self.ctx.set_shadow_offset_x(0.0);
                self.ctx.set_shadow_offset_y(0.0);
            }
        }
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn fill_wedge(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Rgba) {
        self.wedge_path(center, radius, start, end);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
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
        self.wedge_path(center, radius, start, end);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(line_width as f64);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.circle_path(center, radius);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Rgba, line_width: f32) {
        self.circle_path(center, radius);
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(line_width as f64);
        self.ctx.stroke();
    }

    fn clip_circle(&mut self, center: Vec2, radius: f32) {
        self.circle_path(center, radius);
        self.ctx.clip();
    }

    fn draw_image(&mut self, image: &WebImage, dest: Rect) {
        if let Err(e) = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            &image.0,
            dest.origin.x as f64,
            dest.origin.y as f64,
            dest.size.x as f64,
            dest.size.y as f64,
        ) {
            log::warn!("drawImage failed: {}", js_reason(&e));
        }
    }

    fn measure_text(&self, text: &str) -> f32 {
        self.ctx
            .measure_text(text)
            .map(|m| m.width() as f32)
            .unwrap_or(0.0)
    }

    fn fill_text(&mut self, text: &str, at: Vec2, align: TextAlign, color: Rgba) {
        self.ctx.set_text_align(align.as_str());
        self.ctx.set_text_baseline("middle");
        self.ctx.set_fill_style_str(&color.to_css());
        let _ = self.ctx.fill_text(text, at.x as f64, at.y as f64);
    }
}

// === DOM helpers ===

pub fn document() -> Option<Document> {
    web_sys::window()?.document()
}

pub fn element(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

pub fn html_element(id: &str) -> Option<HtmlElement> {
    element(id)?.dyn_into().ok()
}

/// Toggle the `hidden` class
pub fn set_hidden(id: &str, hidden: bool) {
    if let Some(el) = element(id) {
        let classes = el.class_list();
        let _ = if hidden {
            classes.add_1("hidden")
        } else {
            classes.remove_1("hidden")
        };
    }
}

pub fn set_text(id: &str, text: &str) {
    if let Some(el) = element(id) {
        el.set_text_content(Some(text));
    }
}

pub fn set_disabled(id: &str, disabled: bool) {
    if let Some(el) = element(id) {
        let _ = if disabled {
            el.set_attribute("disabled", "")
        } else {
            el.remove_attribute("disabled")
        };
    }
}

/// Paint a button with a derived color scheme
pub fn apply_button_style(id: &str, style: &ButtonStyle) {
    let Some(el) = html_element(id) else {
        return;
    };
    let css = el.style();
    let _ = css.set_property("background-color", &style.background.to_css());
    let _ = css.set_property("color", &style.foreground.to_css());
    match style.text_shadow {
        Some(shadow) => {
            let _ = css.set_property("text-shadow", &format!("0 1px 2px {}", shadow.to_css()));
        }
        None => {
            let _ = css.remove_property("text-shadow");
        }
    }
    match style.border {
        Some(border) => {
            let _ = css.set_property("border", &format!("1px solid {}", border.to_css()));
        }
        None => {
            let _ = css.remove_property("border");
        }
    }
}

/// Spawn the DOM nodes for a burst and schedule their removal
///
/// Nodes rely on the page's `.confetti` / `.sparkle` keyframes.
pub fn spawn_celebration(celebration: &Celebration) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?;

    let mut nodes = Vec::with_capacity(celebration.confetti.len() + celebration.sparkles.len());

    for piece in &celebration.confetti {
        let el: HtmlElement = document.create_element("div")?.dyn_into()?;
        el.set_class_name("confetti");
        let css = el.style();
        css.set_property("--color", &piece.color.to_string())?;
        css.set_property("--shape", piece.shape.clip_path())?;
        css.set_property("--duration", &format!("{}s", piece.duration_s))?;
        css.set_property("--delay", &format!("{}s", piece.delay_s))?;
        css.set_property("left", &format!("{}%", piece.left * 100.0))?;
        css.set_property("top", "-20px")?;
        css.set_property("width", &format!("{}px", piece.size))?;
        css.set_property("height", &format!("{}px", piece.size))?;
        body.append_child(&el)?;
        nodes.push(el);
    }

    for sparkle in &celebration.sparkles {
        let el: HtmlElement = document.create_element("div")?.dyn_into()?;
        el.set_class_name("sparkle");
        let css = el.style();
        css.set_property("left", &format!("{}vw", sparkle.position.x * 100.0))?;
        css.set_property("top", &format!("{}vh", sparkle.position.y * 100.0))?;
        css.set_property("width", &format!("{}px", sparkle.size))?;
        css.set_property("height", &format!("{}px", sparkle.size))?;
        css.set_property("animation-duration", &format!("{}s", sparkle.duration_s))?;
        css.set_property("animation-delay", &format!("{}ms", sparkle.appear_ms))?;
        body.append_child(&el)?;
        nodes.push(el);
    }

    let lifetime = celebration
        .lifetime_ms()
        .max(SPARKLE_LIFETIME_MS)
        .round() as i32;
    let cleanup = Closure::once_into_js(move || {
        for node in nodes {
            node.remove();
        }
    });
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        cleanup.unchecked_ref(),
        lifetime,
    )?;
    Ok(())
}
