//! Force-directed layout step.
//!
//! [`Simulation`] owns the authoritative node positions and velocities. The
//! host drives it by calling [`Simulation::tick`] with the elapsed time from
//! whatever loop it has (animation frames, a timer, or a test).

use std::collections::HashMap;

use euclid::vec2;
use log::debug;
use serde::Deserialize;

use super::layout::GOLDEN_ANGLE;
use super::style::Style;
use super::types::GraphData;
use super::{GraphPoint, GraphVector};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
	/// Inverse-square repulsion, scaled by `1 + ln(n)`.
	pub repulsion: f64,
	/// Linear push per unit of overlap between two node discs.
	pub overlap_strength: f64,
	/// Gap kept between node discs before the overlap push kicks in.
	pub overlap_padding: f64,
	/// Spring constant along edges.
	pub spring_strength: f64,
	/// Edge rest length for a tiny graph; shrinks with `sqrt(n)`.
	pub link_distance: f64,
	pub min_link_distance: f64,
	/// Pull toward the origin per unit of distance.
	pub centering: f64,
	/// Velocity multiplier applied every tick.
	pub damping: f64,
	pub max_speed: f64,
	/// Longest step accepted, in seconds.
	pub max_dt: f64,
}

impl Default for SimulationParams {
	fn default() -> Self {
		Self {
			repulsion: 2.0e6,
			overlap_strength: 60.0,
			overlap_padding: 4.0,
			spring_strength: 8.0,
			link_distance: 140.0,
			min_link_distance: 50.0,
			centering: 0.3,
			damping: 0.85,
			max_speed: 800.0,
			max_dt: 0.1,
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SimulationPhase {
	/// View closed: ticks do nothing.
	#[default]
	Idle,
	Running,
}

/// Result of one [`Simulation::tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickStats {
	pub phase: SimulationPhase,
	/// Ticks performed while running since the graph was loaded.
	pub ticks: u64,
	/// Fastest node speed after the step.
	pub max_speed: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimNode {
	pub position: GraphPoint,
	pub velocity: GraphVector,
	pub radius: f64,
	/// Held by the pointer; excluded from integration.
	pub pinned: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Simulation {
	params: SimulationParams,
	nodes: Vec<SimNode>,
	edges: Vec<(usize, usize)>,
	phase: SimulationPhase,
	ticks: u64,
	last_max_speed: f64,
}

impl Simulation {
	pub fn new(params: SimulationParams) -> Self {
		Self {
			params,
			..Self::default()
		}
	}

	/// Replaces the node set. `positions` is index-aligned with
	/// `data.nodes`; velocities start at zero. The phase is kept.
	pub fn load(&mut self, data: &GraphData, positions: &[GraphPoint], style: &Style) {
		let index: HashMap<&str, usize> = data
			.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.as_str(), i))
			.collect();

		self.nodes = data
			.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| SimNode {
				position: positions.get(i).copied().unwrap_or_else(GraphPoint::origin),
				velocity: GraphVector::zero(),
				radius: style.node_radius(n.degree),
				pinned: false,
			})
			.collect();
		self.edges = data
			.links
			.iter()
			.filter_map(|l| Some((*index.get(l.source.as_str())?, *index.get(l.target.as_str())?)))
			.collect();
		self.ticks = 0;
		self.last_max_speed = 0.0;
	}

	pub fn params(&self) -> &SimulationParams {
		&self.params
	}

	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	/// Edges as `(source, target)` node indices.
	pub fn edges(&self) -> &[(usize, usize)] {
		&self.edges
	}

	pub fn phase(&self) -> SimulationPhase {
		self.phase
	}

	pub fn start(&mut self) {
		if self.phase == SimulationPhase::Idle {
			debug!("simulation running with {} nodes", self.nodes.len());
		}
		self.phase = SimulationPhase::Running;
	}

	pub fn stop(&mut self) {
		self.phase = SimulationPhase::Idle;
	}

	/// Holds node `idx` at `position` until [`Simulation::release`].
	pub fn pin(&mut self, idx: usize, position: GraphPoint) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.position = position;
			node.velocity = GraphVector::zero();
			node.pinned = true;
		}
	}

	pub fn release(&mut self, idx: usize) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.pinned = false;
		}
	}

	pub fn repulsion_strength(&self) -> f64 {
		let n = self.nodes.len().max(1) as f64;
		self.params.repulsion * (1.0 + n.ln())
	}

	pub fn rest_length(&self) -> f64 {
		let n = self.nodes.len().max(1) as f64;
		let p = &self.params;
		(p.link_distance / n.sqrt()).min(p.link_distance).max(p.min_link_distance)
	}

	/// Advances the layout by `dt` seconds, capped at `max_dt`.
	pub fn tick(&mut self, dt: f64) -> TickStats {
		if self.phase == SimulationPhase::Idle {
			return self.stats();
		}
		let dt = if dt.is_finite() { dt.max(0.0).min(self.params.max_dt) } else { 0.0 };

		let forces = self.forces();
		let p = &self.params;
		let mut max_speed: f64 = 0.0;
		for (node, force) in self.nodes.iter_mut().zip(forces) {
			if node.pinned {
				node.velocity = GraphVector::zero();
				continue;
			}
			let mut velocity = (node.velocity + force * dt) * p.damping;
			let speed = velocity.length();
			if !speed.is_finite() {
				velocity = GraphVector::zero();
			} else if speed > p.max_speed {
				velocity = velocity * (p.max_speed / speed);
			}
			node.velocity = velocity;
			node.position += velocity * dt;
			max_speed = max_speed.max(velocity.length());
		}

		self.ticks += 1;
		self.last_max_speed = max_speed;
		self.stats()
	}

	fn stats(&self) -> TickStats {
		TickStats {
			phase: self.phase,
			ticks: self.ticks,
			max_speed: self.last_max_speed,
		}
	}

	fn forces(&self) -> Vec<GraphVector> {
		let p = &self.params;
		let n = self.nodes.len();
		let mut forces = vec![GraphVector::zero(); n];

		let repulsion = self.repulsion_strength();
		for i in 0..n {
			for j in (i + 1)..n {
				let (a, b) = (&self.nodes[i], &self.nodes[j]);
				let delta = a.position - b.position;
				let dist = delta.length();
				let dir = if dist > 1e-9 {
					delta / dist
				} else {
					let angle = (i + j) as f64 * GOLDEN_ANGLE;
					vec2(angle.cos(), angle.sin())
				};
				let clamped = dist.max(1.0);
				let mut magnitude = repulsion / (clamped * clamped);
				let overlap = a.radius + b.radius + p.overlap_padding - dist;
				if overlap > 0.0 {
					magnitude += overlap * p.overlap_strength;
				}
				forces[i] += dir * magnitude;
				forces[j] -= dir * magnitude;
			}
		}

		let rest = self.rest_length();
		for &(s, t) in &self.edges {
			let delta = self.nodes[t].position - self.nodes[s].position;
			let dist = delta.length();
			if dist <= 1e-9 {
				continue;
			}
			let pull = delta / dist * (p.spring_strength * (dist - rest));
			forces[s] += pull;
			forces[t] -= pull;
		}

		for (force, node) in forces.iter_mut().zip(&self.nodes) {
			*force -= node.position.to_vector() * p.centering;
		}
		forces
	}
}
