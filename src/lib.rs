//! Knowledge-graph view for a note-taking app.
//!
//! [`graph`] holds the engine: link extraction, spiral layout, force
//! simulation, camera, hit testing and surface-agnostic rendering. It builds
//! on any target. On `wasm32` the crate also ships a Leptos client-side app
//! with the `KnowledgeGraph` canvas component.

pub mod graph;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod components;
#[cfg(target_arch = "wasm32")]
mod pages;

#[cfg(target_arch = "wasm32")]
pub use app::{App, init_logging};
#[cfg(target_arch = "wasm32")]
pub use components::knowledge_graph::KnowledgeGraph;
