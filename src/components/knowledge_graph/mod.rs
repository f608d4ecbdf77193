mod canvas;
mod component;

pub use component::KnowledgeGraph;
