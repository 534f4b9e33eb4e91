//! Browser backend: a `<canvas>` 2D context as the drawing surface and
//! `window.localStorage` as durable storage.

use crate::draw::{Color, CompositeMode, Surface, SurfaceError};
use crate::session::{KeyValueStore, StoreError};
use crate::view::SurfaceRect;
use log::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, DomException, HtmlCanvasElement, Storage};

/// Routes `log` output to the browser console.
pub fn init_logging(level: log::Level) {
    if let Err(err) = console_log::init_with_level(level) {
        debug!("Console logger not installed: {err}");
    }
}

/// `window.devicePixelRatio`, or 1 outside a window context.
pub fn device_pixel_ratio() -> f64 {
    web_sys::window().map_or(1.0, |window| window.device_pixel_ratio())
}

/// Geometry for `canvas` with a backing store matching its CSS box at `ratio`
/// device pixels per CSS pixel. Pass the result to `Engine::new` or
/// `Engine::on_resize`; the engine resizes the canvas accordingly.
pub fn fitted_rect(canvas: &HtmlCanvasElement, ratio: f64) -> SurfaceRect {
    let bounds = canvas.get_bounding_client_rect();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let backing = |css: f64| (css * ratio).round().max(1.0) as u32;
    SurfaceRect::new(
        bounds.left(),
        bounds.top(),
        bounds.width(),
        bounds.height(),
        backing(bounds.width()),
        backing(bounds.height()),
    )
}

/// Drawing surface backed by a canvas 2D rendering context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Acquires the canvas' 2D context.
    ///
    /// # Errors
    /// Returns [`SurfaceError::Unavailable`] if the browser will not provide one.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, SurfaceError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|err| SurfaceError::Unavailable(js_message(&err)))?
            .ok_or_else(|| SurfaceError::Unavailable("canvas has no 2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::Unavailable("2d context has an unexpected type".into()))?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Current on-page geometry with the canvas' existing backing size.
    pub fn rect(&self) -> SurfaceRect {
        let bounds = self.canvas.get_bounding_client_rect();
        SurfaceRect::new(
            bounds.left(),
            bounds.top(),
            bounds.width(),
            bounds.height(),
            self.canvas.width(),
            self.canvas.height(),
        )
    }
}

fn backend(err: JsValue) -> SurfaceError {
    SurfaceError::Backend(js_message(&err))
}

impl Surface for CanvasSurface {
    fn backing_size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        Ok(())
    }

    fn set_transform(
        &mut self,
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        e: f64,
        f: f64,
    ) -> Result<(), SurfaceError> {
        self.ctx.set_transform(a, b, c, d, e, f).map_err(backend)
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), SurfaceError> {
        self.ctx.translate(x, y).map_err(backend)
    }

    fn scale(&mut self, x: f64, y: f64) -> Result<(), SurfaceError> {
        self.ctx.scale(x, y).map_err(backend)
    }

    fn set_composite(&mut self, mode: CompositeMode) -> Result<(), SurfaceError> {
        self.ctx
            .set_global_composite_operation(mode.as_css())
            .map_err(backend)
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.ctx.set_stroke_style_str(&color.to_css_rgba());
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_round_caps(&mut self) {
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn stroke(&mut self) -> Result<(), SurfaceError> {
        self.ctx.stroke();
        Ok(())
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), SurfaceError> {
        self.ctx.clear_rect(x, y, width, height);
        Ok(())
    }
}

/// `window.localStorage` as a [`KeyValueStore`].
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// # Errors
    /// Returns [`StoreError::Unavailable`] when there is no window or storage
    /// is disabled (private browsing, sandboxed frames).
    pub fn new() -> Result<Self, StoreError> {
        let window =
            web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(|err| StoreError::Unavailable(js_message(&err)))?
            .ok_or_else(|| StoreError::Unavailable("localStorage is disabled".into()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage
            .get_item(key)
            .map_err(|err| StoreError::Unavailable(js_message(&err)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage.set_item(key, value).map_err(|err| {
            let quota = err
                .dyn_ref::<DomException>()
                .is_some_and(|exception| exception.name() == "QuotaExceededError");
            if quota {
                // The browser does not expose its quota.
                StoreError::QuotaExceeded {
                    bytes: key.len() + value.len(),
                    limit: None,
                }
            } else {
                StoreError::Unavailable(js_message(&err))
            }
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage
            .remove_item(key)
            .map_err(|err| StoreError::Unavailable(js_message(&err)))
    }
}

fn js_message(value: &JsValue) -> String {
    if let Some(exception) = value.dyn_ref::<DomException>() {
        return format!("{}: {}", exception.name(), exception.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
