//! One open session of the knowledge-graph view.
//!
//! [`GraphView`] owns the simulation, the camera and the pointer state. The
//! host feeds it notes, viewport sizes, pointer events and frame times, and
//! draws the [`Frame`] it hands back.

use euclid::{Box2D, point2};
use log::{debug, info};

use super::builder::{GraphStats, build_graph};
use super::camera::{Camera, Viewport};
use super::config::GraphConfig;
use super::layout::spiral_layout;
use super::simulation::{Simulation, TickStats};
use super::style::NodeFlags;
use super::types::{GraphData, GraphFilter, GraphNode, NoteId, NoteKind, NoteRecord};
use super::{GraphPoint, GraphSpace, GraphVector, ScreenPoint, ScreenVector};

/// Pointer travel, in screen pixels, that turns a press on a node into a drag.
const DRAG_THRESHOLD: f64 = 4.0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewEvent {
	/// A node was clicked. The host should report the note and close the view.
	NodeSelected(NoteId),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum Pointer {
	#[default]
	Idle,
	Pressed {
		node: usize,
		origin: ScreenPoint,
		grab: GraphVector,
	},
	DraggingNode {
		node: usize,
		grab: GraphVector,
	},
	Panning {
		origin: ScreenPoint,
		pan_start: ScreenVector,
	},
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeSnapshot {
	pub id: NoteId,
	pub label: String,
	pub kind: NoteKind,
	pub position: GraphPoint,
	pub radius: f64,
	pub flags: NodeFlags,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeSnapshot {
	pub source: usize,
	pub target: usize,
	/// Touches the hovered or selected node.
	pub highlighted: bool,
}

/// Immutable copy of everything the renderer needs for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
	pub nodes: Vec<NodeSnapshot>,
	pub edges: Vec<EdgeSnapshot>,
	pub camera: Camera,
	pub viewport: Viewport,
	pub tick: TickStats,
}

pub struct GraphView {
	config: GraphConfig,
	data: GraphData,
	stats: GraphStats,
	simulation: Simulation,
	camera: Camera,
	viewport: Viewport,
	pointer: Pointer,
	hovered: Option<usize>,
	/// Nodes sharing an edge with `hovered`, sorted.
	neighbours: Vec<usize>,
	selected: Option<usize>,
	current: Option<usize>,
	fit_pending: bool,
	last_tick: TickStats,
}

impl GraphView {
	pub fn new(config: GraphConfig) -> Self {
		let simulation = Simulation::new(config.simulation.clone());
		Self {
			config,
			data: GraphData::default(),
			stats: GraphStats::default(),
			simulation,
			camera: Camera::default(),
			viewport: Viewport::default(),
			pointer: Pointer::Idle,
			hovered: None,
			neighbours: Vec::new(),
			selected: None,
			current: None,
			fit_pending: true,
			last_tick: TickStats::default(),
		}
	}

	/// Rebuilds the graph from scratch, e.g. after the folder filter changed.
	/// The layout starts centred on `current` when it passes the filter.
	pub fn load(&mut self, notes: &[NoteRecord], filter: &GraphFilter, current: Option<&str>) {
		let built = build_graph(notes, filter);
		let positions = spiral_layout(&built.data.nodes, current, &self.config.layout);
		self.simulation.load(&built.data, &positions, &self.config.style);
		self.data = built.data;
		self.stats = built.stats;
		self.current = current.and_then(|id| self.index_of(id));
		self.set_hovered(None);
		self.selected = None;
		self.pointer = Pointer::Idle;
		self.fit_pending = true;
		debug!("graph view loaded {} of {} notes", self.stats.nodes, notes.len());
	}

	pub fn open(&mut self) {
		info!("knowledge graph opened ({} nodes)", self.data.nodes.len());
		self.simulation.start();
		self.fit_pending = true;
	}

	pub fn close(&mut self) {
		info!("knowledge graph closed");
		self.simulation.stop();
		self.pointer = Pointer::Idle;
		self.set_hovered(None);
	}

	pub fn config(&self) -> &GraphConfig {
		&self.config
	}

	pub fn data(&self) -> &GraphData {
		&self.data
	}

	pub fn stats(&self) -> GraphStats {
		self.stats
	}

	pub fn simulation(&self) -> &Simulation {
		&self.simulation
	}

	pub fn camera(&self) -> Camera {
		self.camera
	}

	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	pub fn hovered(&self) -> Option<&GraphNode> {
		self.hovered.and_then(|i| self.data.nodes.get(i))
	}

	/// Nodes linked to the hovered one.
	pub fn neighbours(&self) -> impl Iterator<Item = &GraphNode> {
		self.neighbours.iter().filter_map(|&i| self.data.nodes.get(i))
	}

	fn set_hovered(&mut self, hovered: Option<usize>) {
		if hovered == self.hovered {
			return;
		}
		self.hovered = hovered;
		self.neighbours.clear();
		if let Some(h) = hovered {
			self.neighbours.extend(self.simulation.edges().iter().filter_map(|&(s, t)| {
				if s == h {
					Some(t)
				} else if t == h {
					Some(s)
				} else {
					None
				}
			}));
			self.neighbours.sort_unstable();
			self.neighbours.dedup();
		}
	}

	pub fn selected(&self) -> Option<&GraphNode> {
		self.selected.and_then(|i| self.data.nodes.get(i))
	}

	/// Whether the pointer is panning or dragging a node.
	pub fn is_dragging(&self) -> bool {
		matches!(self.pointer, Pointer::DraggingNode { .. } | Pointer::Panning { .. })
	}

	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.data.nodes.iter().position(|n| n.id == id)
	}

	/// Replaces the camera, e.g. one restored by the host. Zoom is clamped
	/// and any pending auto-fit is dropped.
	pub fn set_camera(&mut self, camera: Camera) {
		let limits = &self.config.camera;
		self.camera = Camera {
			zoom: camera.zoom.min(limits.max_zoom).max(limits.min_zoom),
			..camera
		};
		self.fit_pending = false;
	}

	/// Keeps the graph centre stable on screen while the canvas resizes.
	pub fn resize(&mut self, viewport: Viewport) {
		if !self.viewport.is_empty() {
			self.camera.pan_by(viewport.center() - self.viewport.center());
		}
		self.viewport = viewport;
	}

	/// Ticks the simulation and snapshots the scene. Performs the pending
	/// auto-fit once nodes and a viewport are both available.
	pub fn frame(&mut self, dt: f64) -> Frame {
		if self.fit_pending && !self.data.nodes.is_empty() && !self.viewport.is_empty() {
			self.fit_to_view();
		}
		self.last_tick = self.simulation.tick(dt);
		self.snapshot()
	}

	pub fn snapshot(&self) -> Frame {
		let focus = [self.hovered, self.selected];
		let nodes = self
			.data
			.nodes
			.iter()
			.zip(self.simulation.nodes())
			.enumerate()
			.map(|(i, (node, sim))| NodeSnapshot {
				id: node.id.clone(),
				label: node.label.clone(),
				kind: node.kind,
				position: sim.position,
				radius: sim.radius,
				flags: NodeFlags {
					current: self.current == Some(i),
					selected: self.selected == Some(i),
					hovered: self.hovered == Some(i),
					neighbour: self.neighbours.binary_search(&i).is_ok(),
				},
			})
			.collect();
		let edges = self
			.simulation
			.edges()
			.iter()
			.map(|&(source, target)| EdgeSnapshot {
				source,
				target,
				highlighted: focus.contains(&Some(source)) || focus.contains(&Some(target)),
			})
			.collect();
		Frame {
			nodes,
			edges,
			camera: self.camera,
			viewport: self.viewport,
			tick: self.last_tick,
		}
	}

	/// Frames every node, radius included.
	pub fn fit_to_view(&mut self) {
		self.fit_pending = false;
		let mut nodes = self.simulation.nodes().iter();
		let Some(first) = nodes.next() else {
			self.camera = Camera::centered(self.viewport);
			return;
		};
		let grow = |b: Box2D<f64, GraphSpace>, p: GraphPoint, r: f64| -> Box2D<f64, GraphSpace> {
			Box2D::new(
				point2(b.min.x.min(p.x - r), b.min.y.min(p.y - r)),
				point2(b.max.x.max(p.x + r), b.max.y.max(p.y + r)),
			)
		};
		let seed = grow(Box2D::new(first.position, first.position), first.position, first.radius);
		let bounds = nodes.fold(seed, |b, n| grow(b, n.position, n.radius));
		self.camera = Camera::fit(bounds, self.viewport, &self.config.camera);
		debug!("auto-fit camera zoom {:.3}", self.camera.zoom);
	}

	/// Topmost node under the pointer, tested in graph space.
	pub fn node_at(&self, p: ScreenPoint) -> Option<usize> {
		let g = self.camera.screen_to_graph(p);
		self.simulation
			.nodes()
			.iter()
			.enumerate()
			.rev()
			.find(|(_, n)| (n.position - g).length() <= n.radius)
			.map(|(i, _)| i)
	}

	pub fn pointer_down(&mut self, p: ScreenPoint) {
		self.pointer = match self.node_at(p) {
			Some(node) => Pointer::Pressed {
				node,
				origin: p,
				grab: self.simulation.nodes()[node].position - self.camera.screen_to_graph(p),
			},
			None => Pointer::Panning {
				origin: p,
				pan_start: self.camera.pan,
			},
		};
	}

	pub fn pointer_move(&mut self, p: ScreenPoint) {
		match self.pointer {
			Pointer::Idle => self.set_hovered(self.node_at(p)),
			Pointer::Pressed { node, origin, grab } => {
				if (p - origin).length() > DRAG_THRESHOLD {
					self.pointer = Pointer::DraggingNode { node, grab };
					self.simulation.pin(node, self.camera.screen_to_graph(p) + grab);
				}
			}
			Pointer::DraggingNode { node, grab } => {
				self.simulation.pin(node, self.camera.screen_to_graph(p) + grab);
			}
			Pointer::Panning { origin, pan_start } => {
				self.camera.pan = pan_start + (p - origin);
			}
		}
	}

	pub fn pointer_up(&mut self, p: ScreenPoint) -> Option<ViewEvent> {
		let event = match std::mem::take(&mut self.pointer) {
			Pointer::Pressed { node, .. } => {
				self.selected = Some(node);
				let id = self.data.nodes[node].id.clone();
				info!("note {id} selected in knowledge graph");
				Some(ViewEvent::NodeSelected(id))
			}
			Pointer::DraggingNode { node, .. } => {
				self.simulation.release(node);
				None
			}
			Pointer::Panning { .. } | Pointer::Idle => None,
		};
		self.set_hovered(self.node_at(p));
		event
	}

	pub fn pointer_leave(&mut self) {
		if let Pointer::DraggingNode { node, .. } = std::mem::take(&mut self.pointer) {
			self.simulation.release(node);
		}
		self.set_hovered(None);
	}

	pub fn wheel(&mut self, p: ScreenPoint, delta_y: f64) {
		self.camera.wheel(p, delta_y, &self.config.camera);
	}
}
