//! Scene drawing against an abstract 2D surface.
//!
//! The renderer only issues primitive calls; the canvas implementation lives
//! with the web component. The surface is expected to already carry the
//! device-pixel-ratio scale, so everything here is in CSS pixels or graph
//! units.

use super::style::{NodeCategory, Style, truncate_label};
use super::view::Frame;

/// Grid lines closer than this many screen pixels are thinned out.
const MIN_GRID_PX: f64 = 16.0;

pub trait Surface {
	fn fill_background(&mut self, width: f64, height: f64, color: &str);
	fn save(&mut self);
	fn restore(&mut self);
	/// Appends `translate(x, y)` then a uniform `scale` to the current transform.
	fn transform(&mut self, x: f64, y: f64, scale: f64);
	fn set_line_dash(&mut self, pattern: &[f64]);
	fn line(&mut self, from: (f64, f64), to: (f64, f64), color: &str, width: f64);
	fn triangle(&mut self, points: [(f64, f64); 3], color: &str);
	fn circle(
		&mut self,
		center: (f64, f64),
		radius: f64,
		fill: &str,
		stroke: &str,
		stroke_width: f64,
	);
	/// Horizontally centred text with its top edge at `at`.
	fn text(&mut self, text: &str, at: (f64, f64), color: &str, font_px: f64);
}

/// Redraws the whole scene.
pub fn render(frame: &Frame, style: &Style, surface: &mut impl Surface) {
	let vp = frame.viewport;
	surface.fill_background(vp.width, vp.height, &style.palette.background);
	draw_grid(frame, style, surface);

	let camera = frame.camera;
	surface.save();
	surface.transform(camera.pan.x, camera.pan.y, camera.zoom);
	draw_edges(frame, style, surface);
	draw_nodes(frame, style, surface);
	draw_labels(frame, style, surface);
	surface.restore();
}

fn draw_grid(frame: &Frame, style: &Style, surface: &mut impl Surface) {
	let (vp, camera) = (frame.viewport, frame.camera);
	let mut step = style.grid_size * camera.zoom;
	if !(step.is_finite() && step > 0.0) || vp.is_empty() {
		return;
	}
	while step < MIN_GRID_PX {
		step *= 2.0;
	}

	surface.set_line_dash(&[2.0, 4.0]);
	let color = style.palette.grid.as_str();
	let mut x = camera.pan.x.rem_euclid(step);
	while x <= vp.width {
		surface.line((x, 0.0), (x, vp.height), color, 1.0);
		x += step;
	}
	let mut y = camera.pan.y.rem_euclid(step);
	while y <= vp.height {
		surface.line((0.0, y), (vp.width, y), color, 1.0);
		y += step;
	}
	surface.set_line_dash(&[]);
}

fn draw_edges(frame: &Frame, style: &Style, surface: &mut impl Surface) {
	let k = frame.camera.zoom;
	let width = style.edge_width / k;

	for edge in &frame.edges {
		let (Some(src), Some(tgt)) = (frame.nodes.get(edge.source), frame.nodes.get(edge.target))
		else {
			continue;
		};
		let delta = tgt.position - src.position;
		let dist = delta.length();
		let gap = dist - src.radius - tgt.radius;
		if gap <= 0.0 {
			continue;
		}
		let color = if edge.highlighted {
			style.palette.edge_highlight.as_str()
		} else {
			style.palette.edge.as_str()
		};

		let (ux, uy) = (delta.x / dist, delta.y / dist);
		let arrow = style.arrow_size.min(gap);
		let (sx, sy) = (src.position.x + ux * src.radius, src.position.y + uy * src.radius);
		let (tip_x, tip_y) = (tgt.position.x - ux * tgt.radius, tgt.position.y - uy * tgt.radius);
		let (back_x, back_y) = (tip_x - ux * arrow, tip_y - uy * arrow);
		let (px, py) = (-uy * arrow * 0.5, ux * arrow * 0.5);

		surface.line((sx, sy), (back_x, back_y), color, width);
		surface.triangle(
			[(tip_x, tip_y), (back_x + px, back_y + py), (back_x - px, back_y - py)],
			color,
		);
	}
}

fn draw_nodes(frame: &Frame, style: &Style, surface: &mut impl Surface) {
	let k = frame.camera.zoom;
	for node in &frame.nodes {
		let category = NodeCategory::classify(node.flags, node.kind);
		let stroke_width = if node.flags.current || node.flags.selected {
			2.5 / k
		} else {
			1.0 / k
		};
		let stroke = if node.flags.neighbour {
			&style.palette.edge_highlight
		} else {
			&style.palette.node_stroke
		};
		surface.circle(
			(node.position.x, node.position.y),
			node.radius,
			style.palette.fill(category),
			stroke,
			stroke_width,
		);
	}
}

fn draw_labels(frame: &Frame, style: &Style, surface: &mut impl Surface) {
	let k = frame.camera.zoom;
	let font_px = style.label_font_px / k;
	for node in frame.nodes.iter().filter(|n| style.label_visible(n.flags, k)) {
		let label = truncate_label(&node.label, style.label_max_chars);
		surface.text(
			&label,
			(node.position.x, node.position.y + node.radius + 3.0 / k),
			&style.palette.label,
			font_px,
		);
	}
}

#[cfg(test)]
mod tests {
	use euclid::{point2, vec2};

	use super::*;
	use crate::graph::camera::{Camera, Viewport};
	use crate::graph::style::NodeFlags;
	use crate::graph::types::NoteKind;
	use crate::graph::view::{EdgeSnapshot, NodeSnapshot};

	#[derive(Debug, Clone, PartialEq)]
	enum Op {
		Background,
		Save,
		Restore,
		Transform(f64, f64, f64),
		Dash(Vec<f64>),
		Line((f64, f64), (f64, f64), String),
		Triangle([(f64, f64); 3]),
		Circle((f64, f64), f64, String),
		Text(String),
	}

	#[derive(Default)]
	struct Recorder(Vec<Op>);

	impl Surface for Recorder {
		fn fill_background(&mut self, _: f64, _: f64, _: &str) {
			self.0.push(Op::Background);
		}
		fn save(&mut self) {
			self.0.push(Op::Save);
		}
		fn restore(&mut self) {
			self.0.push(Op::Restore);
		}
		fn transform(&mut self, x: f64, y: f64, scale: f64) {
			self.0.push(Op::Transform(x, y, scale));
		}
		fn set_line_dash(&mut self, pattern: &[f64]) {
			self.0.push(Op::Dash(pattern.to_vec()));
		}
		fn line(&mut self, from: (f64, f64), to: (f64, f64), color: &str, _: f64) {
			self.0.push(Op::Line(from, to, color.into()));
		}
		fn triangle(&mut self, points: [(f64, f64); 3], _: &str) {
			self.0.push(Op::Triangle(points));
		}
		fn circle(&mut self, center: (f64, f64), radius: f64, fill: &str, _: &str, _: f64) {
			self.0.push(Op::Circle(center, radius, fill.into()));
		}
		fn text(&mut self, text: &str, _: (f64, f64), _: &str, _: f64) {
			self.0.push(Op::Text(text.into()));
		}
	}

	fn node(id: &str, x: f64, y: f64, flags: NodeFlags) -> NodeSnapshot {
		NodeSnapshot {
			id: id.into(),
			label: id.to_uppercase(),
			kind: NoteKind::Drawing,
			position: point2(x, y),
			radius: 10.0,
			flags,
		}
	}

	fn frame(nodes: Vec<NodeSnapshot>, edges: Vec<EdgeSnapshot>, zoom: f64) -> Frame {
		Frame {
			nodes,
			edges,
			camera: Camera {
				pan: vec2(400.0, 300.0),
				zoom,
			},
			viewport: Viewport::new(800.0, 600.0),
			..Frame::default()
		}
	}

	fn scene_ops(ops: &[Op]) -> &[Op] {
		let start = ops.iter().position(|op| *op == Op::Save).unwrap();
		&ops[start..]
	}

	#[test]
	fn scene_is_wrapped_in_camera_transform() {
		let mut out = Recorder::default();
		render(&frame(vec![], vec![], 2.0), &Style::default(), &mut out);
		assert_eq!(out.0.first(), Some(&Op::Background));
		assert_eq!(scene_ops(&out.0), &[Op::Save, Op::Transform(400.0, 300.0, 2.0), Op::Restore]);
	}

	#[test]
	fn grid_tracks_pan_and_resets_dash() {
		let style = Style::default();
		let mut out = Recorder::default();
		render(&frame(vec![], vec![], 1.0), &style, &mut out);
		let first_vertical = out.0.iter().find_map(|op| match op {
			Op::Line(from, (_, y2), _) if *y2 == 600.0 => Some(from.0),
			_ => None,
		});
		assert_eq!(first_vertical, Some(400.0_f64.rem_euclid(style.grid_size)));
		let dashes: Vec<_> = out.0.iter().filter(|op| matches!(op, Op::Dash(_))).collect();
		assert_eq!(dashes.last(), Some(&&Op::Dash(vec![])));
	}

	#[test]
	fn edge_stops_at_node_boundaries() {
		let style = Style::default();
		let nodes = vec![
			node("a", 0.0, 0.0, NodeFlags::default()),
			node("b", 100.0, 0.0, NodeFlags::default()),
		];
		let edges = vec![EdgeSnapshot {
			source: 0,
			target: 1,
			highlighted: false,
		}];
		let mut out = Recorder::default();
		render(&frame(nodes, edges, 1.0), &style, &mut out);
		let ops = scene_ops(&out.0);

		let shaft_end = (90.0 - style.arrow_size, 0.0);
		let trimmed = Op::Line((10.0, 0.0), shaft_end, style.palette.edge.clone());
		assert!(ops.contains(&trimmed));
		let tri = ops.iter().find_map(|op| match op {
			Op::Triangle(points) => Some(*points),
			_ => None,
		});
		assert_eq!(tri.map(|t| t[0]), Some((90.0, 0.0)));
	}

	#[test]
	fn overlapping_nodes_draw_no_edge() {
		let nodes = vec![
			node("a", 0.0, 0.0, NodeFlags::default()),
			node("b", 15.0, 0.0, NodeFlags::default()),
		];
		let edges = vec![EdgeSnapshot {
			source: 0,
			target: 1,
			highlighted: true,
		}];
		let mut out = Recorder::default();
		render(&frame(nodes, edges, 1.0), &Style::default(), &mut out);
		let ops = scene_ops(&out.0);
		assert!(!ops.iter().any(|op| matches!(op, Op::Line(..) | Op::Triangle(..))));
	}

	#[test]
	fn node_fill_follows_category() {
		let style = Style::default();
		let selected = NodeFlags {
			selected: true,
			..NodeFlags::default()
		};
		let nodes = vec![node("a", 0.0, 0.0, NodeFlags::default()), node("b", 50.0, 0.0, selected)];
		let mut out = Recorder::default();
		render(&frame(nodes, vec![], 1.0), &style, &mut out);
		let fills: Vec<_> = out
			.0
			.iter()
			.filter_map(|op| match op {
				Op::Circle(_, _, fill) => Some(fill.clone()),
				_ => None,
			})
			.collect();
		assert_eq!(fills, vec![style.palette.drawing_note.clone(), style.palette.selected.clone()]);
	}

	#[test]
	fn labels_only_for_emphasised_nodes_when_zoomed_out() {
		let hovered = NodeFlags {
			hovered: true,
			..NodeFlags::default()
		};
		let nodes =
			|| vec![node("a", 0.0, 0.0, NodeFlags::default()), node("b", 50.0, 0.0, hovered)];
		let texts = |zoom| {
			let mut out = Recorder::default();
			render(&frame(nodes(), vec![], zoom), &Style::default(), &mut out);
			out.0
				.into_iter()
				.filter_map(|op| match op {
					Op::Text(t) => Some(t),
					_ => None,
				})
				.collect::<Vec<_>>()
		};
		assert_eq!(texts(0.5), vec!["B".to_string()]);
		assert_eq!(texts(2.0), vec!["A".to_string(), "B".to_string()]);
	}
}
