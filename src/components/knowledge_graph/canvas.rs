use std::f64::consts::PI;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use crate::graph::render::Surface;
use crate::graph::{GraphError, Result, Viewport};

pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d> {
	canvas
		.get_context("2d")
		.map_err(|err| GraphError::Canvas(format!("{err:?}")))?
		.ok_or_else(|| GraphError::Canvas("2d context not supported".into()))?
		.dyn_into()
		.map_err(|_| GraphError::Canvas("unexpected rendering context".into()))
}

/// Sizes the backing store to the parent element at device resolution and
/// returns the size in CSS pixels.
pub fn fit_canvas(
	canvas: &HtmlCanvasElement,
	ctx: &CanvasRenderingContext2d,
	window: &Window,
) -> Viewport {
	let (w, h) = canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or_else(|| {
			(
				window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0),
				window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0),
			)
		});
	let dpr = window.device_pixel_ratio().max(1.0);

	canvas.set_width((w * dpr).round() as u32);
	canvas.set_height((h * dpr).round() as u32);
	let style = canvas.style();
	let _ = style.set_property("width", &format!("{w}px"));
	let _ = style.set_property("height", &format!("{h}px"));

	// Resizing resets the context, so the ratio is set here and nowhere else.
	let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
	Viewport::new(w, h)
}

impl Surface for CanvasRenderingContext2d {
	fn fill_background(&mut self, width: f64, height: f64, color: &str) {
		self.set_fill_style_str(color);
		self.fill_rect(0.0, 0.0, width, height);
	}

	fn save(&mut self) {
		CanvasRenderingContext2d::save(self);
	}

	fn restore(&mut self) {
		CanvasRenderingContext2d::restore(self);
	}

	fn transform(&mut self, x: f64, y: f64, scale: f64) {
		let _ = self.translate(x, y);
		let _ = self.scale(scale, scale);
	}

	fn set_line_dash(&mut self, pattern: &[f64]) {
		let segments: js_sys::Array = pattern.iter().map(|&v| JsValue::from_f64(v)).collect();
		let _ = CanvasRenderingContext2d::set_line_dash(self, &segments);
	}

	fn line(&mut self, from: (f64, f64), to: (f64, f64), color: &str, width: f64) {
		self.set_stroke_style_str(color);
		self.set_line_width(width);
		self.begin_path();
		self.move_to(from.0, from.1);
		self.line_to(to.0, to.1);
		self.stroke();
	}

	fn triangle(&mut self, [a, b, c]: [(f64, f64); 3], color: &str) {
		self.set_fill_style_str(color);
		self.begin_path();
		self.move_to(a.0, a.1);
		self.line_to(b.0, b.1);
		self.line_to(c.0, c.1);
		self.close_path();
		self.fill();
	}

	fn circle(
		&mut self,
		(x, y): (f64, f64),
		radius: f64,
		fill: &str,
		stroke: &str,
		stroke_width: f64,
	) {
		self.begin_path();
		let _ = self.arc(x, y, radius, 0.0, 2.0 * PI);
		self.set_fill_style_str(fill);
		self.fill();
		self.set_stroke_style_str(stroke);
		self.set_line_width(stroke_width);
		self.stroke();
	}

	fn text(&mut self, text: &str, (x, y): (f64, f64), color: &str, font_px: f64) {
		self.set_fill_style_str(color);
		self.set_font(&format!("{font_px}px sans-serif"));
		self.set_text_align("center");
		self.set_text_baseline("top");
		let _ = self.fill_text(text, x, y);
	}
}
