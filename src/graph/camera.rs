//! Pan/zoom transform between graph space and the canvas.
//!
//! `screen = graph * zoom + pan`, with `pan` in CSS pixels.

use euclid::{Box2D, point2, vec2};
use serde::Deserialize;

use super::{GraphPoint, GraphSpace, ScreenPoint, ScreenVector};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraLimits {
	pub min_zoom: f64,
	pub max_zoom: f64,
	/// Zoom factor applied per wheel notch.
	pub wheel_step: f64,
	/// Screen margin kept around the graph by auto-fit.
	pub fit_padding: f64,
}

impl Default for CameraLimits {
	fn default() -> Self {
		Self {
			min_zoom: 0.1,
			max_zoom: 4.0,
			wheel_step: 1.1,
			fit_padding: 40.0,
		}
	}
}

impl CameraLimits {
	fn clamp(&self, zoom: f64) -> f64 {
		zoom.min(self.max_zoom).max(self.min_zoom)
	}
}

/// Canvas size in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	pub fn is_empty(&self) -> bool {
		!(self.width > 0.0 && self.height > 0.0)
	}

	pub fn center(&self) -> ScreenPoint {
		point2(self.width / 2.0, self.height / 2.0)
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
	pub pan: ScreenVector,
	pub zoom: f64,
}

impl Default for Camera {
	fn default() -> Self {
		Self {
			pan: ScreenVector::zero(),
			zoom: 1.0,
		}
	}
}

impl Camera {
	/// Graph origin in the middle of `viewport`, unit zoom.
	pub fn centered(viewport: Viewport) -> Self {
		Self {
			pan: viewport.center().to_vector(),
			zoom: 1.0,
		}
	}

	pub fn screen_to_graph(&self, p: ScreenPoint) -> GraphPoint {
		point2((p.x - self.pan.x) / self.zoom, (p.y - self.pan.y) / self.zoom)
	}

	pub fn graph_to_screen(&self, p: GraphPoint) -> ScreenPoint {
		point2(p.x * self.zoom + self.pan.x, p.y * self.zoom + self.pan.y)
	}

	pub fn pan_by(&mut self, delta: ScreenVector) {
		self.pan += delta;
	}

	/// Multiplies the zoom by `factor`, clamped to the limits, keeping the
	/// graph point under `anchor` fixed on screen.
	pub fn zoom_at(&mut self, anchor: ScreenPoint, factor: f64, limits: &CameraLimits) {
		if !(factor.is_finite() && factor > 0.0) {
			return;
		}
		let zoom = limits.clamp(self.zoom * factor);
		let ratio = zoom / self.zoom;
		let anchor = anchor.to_vector();
		self.pan = anchor - (anchor - self.pan) * ratio;
		self.zoom = zoom;
	}

	/// One wheel notch: scrolling down (`delta_y > 0`) zooms out.
	pub fn wheel(&mut self, anchor: ScreenPoint, delta_y: f64, limits: &CameraLimits) {
		let factor = if delta_y > 0.0 {
			1.0 / limits.wheel_step
		} else if delta_y < 0.0 {
			limits.wheel_step
		} else {
			return;
		};
		self.zoom_at(anchor, factor, limits);
	}

	/// Camera that shows all of `bounds` inside `viewport`, minus padding.
	pub fn fit(bounds: Box2D<f64, GraphSpace>, viewport: Viewport, limits: &CameraLimits) -> Self {
		if viewport.is_empty() {
			return Self::default();
		}
		let avail_w = (viewport.width - 2.0 * limits.fit_padding).max(1.0);
		let avail_h = (viewport.height - 2.0 * limits.fit_padding).max(1.0);
		let zoom = limits
			.clamp((avail_w / bounds.width().max(1.0)).min(avail_h / bounds.height().max(1.0)));
		let center = bounds.center();
		Self {
			pan: viewport.center().to_vector() - vec2(center.x, center.y) * zoom,
			zoom,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn screen_graph_round_trip() {
		let camera = Camera {
			pan: vec2(120.0, -40.0),
			zoom: 2.5,
		};
		let p: GraphPoint = point2(13.0, -7.5);
		let back = camera.screen_to_graph(camera.graph_to_screen(p));
		assert!((back - p).length() < 1e-12);
	}

	#[test]
	fn zoom_keeps_anchor_fixed() {
		let limits = CameraLimits::default();
		let mut camera = Camera::centered(Viewport::new(800.0, 600.0));
		let anchor = point2(300.0, 200.0);
		let before = camera.screen_to_graph(anchor);
		camera.wheel(anchor, -1.0, &limits);
		let after = camera.screen_to_graph(anchor);
		assert!((before - after).length() < 1e-9);
		assert!(camera.zoom > 1.0);
	}

	#[test]
	fn zoom_in_is_pinned_at_max() {
		let limits = CameraLimits::default();
		let mut camera = Camera::default();
		for _ in 0..200 {
			camera.wheel(point2(10.0, 10.0), -120.0, &limits);
			assert!(camera.zoom <= limits.max_zoom);
		}
		assert_eq!(camera.zoom, limits.max_zoom);
	}

	#[test]
	fn zoom_out_is_pinned_at_min() {
		let limits = CameraLimits::default();
		let mut camera = Camera::default();
		for _ in 0..200 {
			camera.wheel(point2(10.0, 10.0), 120.0, &limits);
		}
		assert_eq!(camera.zoom, limits.min_zoom);
	}

	#[test]
	fn zero_delta_wheel_is_ignored() {
		let mut camera = Camera::default();
		camera.wheel(point2(5.0, 5.0), 0.0, &CameraLimits::default());
		assert_eq!(camera, Camera::default());
	}

	#[test]
	fn fit_contains_bounds() {
		let limits = CameraLimits::default();
		let viewport = Viewport::new(800.0, 600.0);
		let bounds = Box2D::new(point2(-500.0, -100.0), point2(300.0, 900.0));
		let camera = Camera::fit(bounds, viewport, &limits);
		for corner in [bounds.min, bounds.max] {
			let s = camera.graph_to_screen(corner);
			let (lo, eps) = (limits.fit_padding, 1e-9);
			assert!(s.x >= lo - eps && s.x <= viewport.width - lo + eps);
			assert!(s.y >= lo - eps && s.y <= viewport.height - lo + eps);
		}
	}

	#[test]
	fn fit_of_point_centres_it() {
		let viewport = Viewport::new(400.0, 300.0);
		let bounds = Box2D::new(point2(10.0, 20.0), point2(10.0, 20.0));
		let camera = Camera::fit(bounds, viewport, &CameraLimits::default());
		let s = camera.graph_to_screen(point2(10.0, 20.0));
		assert!((s - viewport.center()).length() < 1e-9);
		assert_eq!(camera.zoom, CameraLimits::default().max_zoom);
	}
}
