//! Platform-independent engine behind the knowledge-graph view.
//!
//! Notes go through [`builder::build_graph`], are placed by
//! [`layout::spiral_layout`], animated by [`simulation::Simulation`] and drawn
//! by [`render::render`] onto any [`render::Surface`]. [`view::GraphView`] ties
//! the pieces together for one open session of the view.

pub mod builder;
pub mod camera;
pub mod config;
pub mod error;
pub mod layout;
pub mod links;
pub mod render;
pub mod simulation;
pub mod style;
pub mod types;
pub mod view;

use euclid::{Point2D, Vector2D};

/// Unit of the simulation plane. Unbounded, origin at the layout centre.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphSpace;

/// Unit of the canvas in CSS pixels, origin at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSpace;

/// A position in graph space.
pub type GraphPoint = Point2D<f64, GraphSpace>;
/// A displacement, velocity or force in graph space.
pub type GraphVector = Vector2D<f64, GraphSpace>;
/// A pointer or canvas position in screen space.
pub type ScreenPoint = Point2D<f64, ScreenSpace>;
/// A displacement in screen space (pan offsets, drags).
pub type ScreenVector = Vector2D<f64, ScreenSpace>;

pub use builder::{BuiltGraph, GraphStats, build_graph};
pub use camera::{Camera, CameraLimits, Viewport};
pub use config::GraphConfig;
pub use error::{GraphError, Result};
pub use layout::{GOLDEN_ANGLE, LayoutParams, spiral_layout};
pub use links::extract_links;
pub use render::{Surface, render};
pub use simulation::{SimNode, Simulation, SimulationParams, SimulationPhase, TickStats};
pub use style::{NodeCategory, NodeFlags, Palette, Style};
pub use types::{
	GraphData, GraphFilter, GraphLink, GraphNode, NoteId, NoteKind, NoteRecord, NotesLoad,
};
pub use view::{EdgeSnapshot, Frame, GraphView, NodeSnapshot, ViewEvent};
