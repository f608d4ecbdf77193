//! Visual constants: node sizing, colour categories and label rules.

use std::borrow::Cow;

use serde::Deserialize;

use super::types::NoteKind;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Palette {
	pub background: String,
	pub grid: String,
	pub edge: String,
	pub edge_highlight: String,
	pub label: String,
	pub node_stroke: String,
	pub current: String,
	pub selected: String,
	pub hovered: String,
	pub text_note: String,
	pub drawing_note: String,
	pub mindmap_note: String,
	pub default: String,
}

impl Default for Palette {
	fn default() -> Self {
		Self {
			background: "#1a1a2e".into(),
			grid: "rgba(255, 255, 255, 0.06)".into(),
			edge: "rgba(100, 180, 255, 0.45)".into(),
			edge_highlight: "rgba(100, 180, 255, 0.95)".into(),
			label: "rgba(255, 255, 255, 0.85)".into(),
			node_stroke: "rgba(255, 255, 255, 0.6)".into(),
			current: "#ff7f0e".into(),
			selected: "#d62728".into(),
			hovered: "#bcbd22".into(),
			text_note: "#1f77b4".into(),
			drawing_note: "#2ca02c".into(),
			mindmap_note: "#9467bd".into(),
			default: "#7f7f7f".into(),
		}
	}
}

impl Palette {
	pub fn fill(&self, category: NodeCategory) -> &str {
		match category {
			NodeCategory::Current => self.current.as_str(),
			NodeCategory::Selected => self.selected.as_str(),
			NodeCategory::Hovered => self.hovered.as_str(),
			NodeCategory::Kind(NoteKind::Text) => self.text_note.as_str(),
			NodeCategory::Kind(NoteKind::Drawing) => self.drawing_note.as_str(),
			NodeCategory::Kind(NoteKind::Mindmap) => self.mindmap_note.as_str(),
			NodeCategory::Kind(NoteKind::Other) | NodeCategory::Default => self.default.as_str(),
		}
	}
}

/// Per-frame emphasis of a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeFlags {
	/// The note open in the editor when the view was launched.
	pub current: bool,
	pub selected: bool,
	pub hovered: bool,
	/// Linked to the hovered node.
	pub neighbour: bool,
}

impl NodeFlags {
	pub fn any(self) -> bool {
		self.current || self.selected || self.hovered
	}
}

/// Colour category of a node, in precedence order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeCategory {
	Current,
	Selected,
	Hovered,
	Kind(NoteKind),
	Default,
}

impl NodeCategory {
	pub fn classify(flags: NodeFlags, kind: NoteKind) -> Self {
		if flags.current {
			Self::Current
		} else if flags.selected {
			Self::Selected
		} else if flags.hovered {
			Self::Hovered
		} else if kind == NoteKind::Other {
			Self::Default
		} else {
			Self::Kind(kind)
		}
	}
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Style {
	pub min_radius: f64,
	pub max_radius: f64,
	/// Radius added per `sqrt(degree)`.
	pub radius_growth: f64,
	/// Zoom at which every label is drawn, not just emphasised ones.
	pub label_zoom_threshold: f64,
	/// Label size in screen pixels.
	pub label_font_px: f64,
	pub label_max_chars: usize,
	/// Edge width in screen pixels.
	pub edge_width: f64,
	/// Arrowhead length in graph units.
	pub arrow_size: f64,
	/// Grid cell size in graph units.
	pub grid_size: f64,
	pub palette: Palette,
}

impl Default for Style {
	fn default() -> Self {
		Self {
			min_radius: 6.0,
			max_radius: 18.0,
			radius_growth: 2.5,
			label_zoom_threshold: 1.2,
			label_font_px: 11.0,
			label_max_chars: 24,
			edge_width: 1.2,
			arrow_size: 6.0,
			grid_size: 40.0,
			palette: Palette::default(),
		}
	}
}

impl Style {
	/// Non-decreasing in `degree`, always within `[min_radius, max_radius]`.
	pub fn node_radius(&self, degree: usize) -> f64 {
		let grown = self.min_radius + self.radius_growth.max(0.0) * (degree as f64).sqrt();
		grown.min(self.max_radius).max(self.min_radius)
	}

	pub fn label_visible(&self, flags: NodeFlags, zoom: f64) -> bool {
		flags.any() || flags.neighbour || zoom >= self.label_zoom_threshold
	}
}

pub fn truncate_label(label: &str, max_chars: usize) -> Cow<'_, str> {
	if max_chars == 0 || label.chars().count() <= max_chars {
		return Cow::Borrowed(label);
	}
	let mut short: String = label.chars().take(max_chars.saturating_sub(1)).collect();
	short.push('…');
	Cow::Owned(short)
}
