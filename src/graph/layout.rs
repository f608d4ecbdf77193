//! Initial placement on a golden-angle (sunflower) spiral.

use euclid::point2;
use serde::Deserialize;

use super::types::GraphNode;
use super::{GraphPoint, GraphVector};

/// π(3 − √5): successive nodes turn by this angle so the spiral fills evenly.
pub const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
	/// Spiral spacing for a tiny graph.
	pub base_spacing: f64,
	/// Extra spacing per `sqrt(node count)`.
	pub spacing_growth: f64,
}

impl Default for LayoutParams {
	fn default() -> Self {
		Self {
			base_spacing: 24.0,
			spacing_growth: 3.0,
		}
	}
}

impl LayoutParams {
	pub fn spacing(&self, count: usize) -> f64 {
		self.base_spacing + self.spacing_growth * (count as f64).sqrt()
	}
}

/// Starting positions for `nodes`, index-aligned with the slice.
///
/// The `focus` note, when present, lands on the origin; otherwise the
/// centroid does. No two positions coincide.
pub fn spiral_layout(
	nodes: &[GraphNode],
	focus: Option<&str>,
	params: &LayoutParams,
) -> Vec<GraphPoint> {
	match nodes.len() {
		0 => return Vec::new(),
		1 => return vec![GraphPoint::origin()],
		_ => {}
	}

	let spacing = params.spacing(nodes.len());
	let mut points: Vec<GraphPoint> = (0..nodes.len())
		.map(|i| {
			let angle = i as f64 * GOLDEN_ANGLE;
			let radius = spacing * ((i + 1) as f64).sqrt();
			point2(angle.cos() * radius, angle.sin() * radius)
		})
		.collect();

	let anchor = focus
		.and_then(|id| nodes.iter().position(|n| n.id == id))
		.map(|i| points[i].to_vector())
		.unwrap_or_else(|| centroid(&points));
	for p in &mut points {
		*p -= anchor;
	}
	points
}

fn centroid(points: &[GraphPoint]) -> GraphVector {
	let sum = points
		.iter()
		.fold(GraphVector::zero(), |acc, p| acc + p.to_vector());
	sum / points.len().max(1) as f64
}
