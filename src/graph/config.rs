//! Tuning knobs of the graph view, deserialisable from the host's JSON.
//!
//! Every section falls back to its defaults, so `{}` is a valid config and a
//! host only overrides what it cares about.

use log::warn;
use serde::Deserialize;

use super::camera::CameraLimits;
use super::error::{GraphError, Result};
use super::layout::LayoutParams;
use super::simulation::SimulationParams;
use super::style::Style;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	pub simulation: SimulationParams,
	pub layout: LayoutParams,
	pub style: Style,
	pub camera: CameraLimits,
}

impl GraphConfig {
	pub fn from_json(json: &str) -> Result<Self> {
		let config: Self = serde_json::from_str(json)?;
		config.validate().inspect_err(|err| warn!("rejected graph config: {err}"))?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<()> {
		let sim = &self.simulation;
		check(sim.damping > 0.0 && sim.damping < 1.0, "simulation.damping", "must be in (0, 1)")?;
		check(sim.max_speed > 0.0, "simulation.max_speed", "must be positive")?;
		check(sim.max_dt > 0.0, "simulation.max_dt", "must be positive")?;
		check(
			sim.repulsion >= 0.0
				&& sim.overlap_strength >= 0.0
				&& sim.spring_strength >= 0.0
				&& sim.centering >= 0.0,
			"simulation",
			"force strengths must not be negative",
		)?;
		check(sim.min_link_distance > 0.0, "simulation.min_link_distance", "must be positive")?;
		check(
			sim.link_distance >= sim.min_link_distance,
			"simulation.link_distance",
			"must be at least min_link_distance",
		)?;

		check(self.layout.base_spacing > 0.0, "layout.base_spacing", "must be positive")?;
		check(self.layout.spacing_growth >= 0.0, "layout.spacing_growth", "must not be negative")?;

		let style = &self.style;
		check(style.min_radius > 0.0, "style.min_radius", "must be positive")?;
		check(
			style.max_radius >= style.min_radius,
			"style.max_radius",
			"must be at least min_radius",
		)?;
		check(style.grid_size > 0.0, "style.grid_size", "must be positive")?;

		let cam = &self.camera;
		check(cam.min_zoom > 0.0, "camera.min_zoom", "must be positive")?;
		check(cam.max_zoom >= cam.min_zoom, "camera.max_zoom", "must be at least min_zoom")?;
		check(cam.wheel_step > 1.0, "camera.wheel_step", "must be greater than 1")?;
		check(cam.fit_padding >= 0.0, "camera.fit_padding", "must not be negative")
	}
}

fn check(ok: bool, field: &'static str, reason: &'static str) -> Result<()> {
	if ok {
		Ok(())
	} else {
		Err(GraphError::InvalidConfig { field, reason })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_valid() {
		GraphConfig::default().validate().unwrap();
		assert_eq!(GraphConfig::from_json("{}").unwrap(), GraphConfig::default());
	}

	#[test]
	fn partial_sections_keep_other_defaults() {
		let json = r#"{"camera":{"max_zoom":8.0},"style":{"palette":{"current":"gold"}}}"#;
		let config = GraphConfig::from_json(json).unwrap();
		assert_eq!(config.camera.max_zoom, 8.0);
		assert_eq!(config.camera.min_zoom, CameraLimits::default().min_zoom);
		assert_eq!(config.style.palette.current, "gold");
		assert_eq!(config.style.palette.selected, Style::default().palette.selected);
	}

	#[test]
	fn inverted_zoom_bounds_are_rejected() {
		let err =
			GraphConfig::from_json(r#"{"camera":{"min_zoom":5.0,"max_zoom":1.0}}"#).unwrap_err();
		assert!(matches!(err, GraphError::InvalidConfig { field: "camera.max_zoom", .. }));
	}

	#[test]
	fn damping_must_lose_energy() {
		let mut config = GraphConfig::default();
		config.simulation.damping = 1.0;
		assert!(matches!(
			config.validate(),
			Err(GraphError::InvalidConfig { field: "simulation.damping", .. })
		));
	}

	#[test]
	fn malformed_json_is_a_parse_error() {
		assert!(matches!(GraphConfig::from_json("{not json"), Err(GraphError::Parse(_))));
	}
}
