use std::collections::{HashMap, HashSet};

use log::debug;

use super::links::extract_links;
use super::types::{GraphData, GraphFilter, GraphLink, GraphNode, NoteRecord};

/// Counts gathered while building, shown in the view header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GraphStats {
	pub nodes: usize,
	pub links: usize,
	pub orphans: usize,
	/// References whose target is missing or outside the filter.
	pub dropped_links: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuiltGraph {
	pub data: GraphData,
	pub stats: GraphStats,
}

/// Turns the host's notes into nodes and deduplicated undirected links.
///
/// Every link endpoint is guaranteed to be a node of the result. Links
/// pointing outside the filtered set, or back at their own note, are
/// skipped silently.
pub fn build_graph(notes: &[NoteRecord], filter: &GraphFilter) -> BuiltGraph {
	let included: Vec<&NoteRecord> = notes.iter().filter(|note| filter.accepts(note)).collect();

	let mut index: HashMap<&str, usize> = HashMap::with_capacity(included.len());
	let mut nodes = Vec::with_capacity(included.len());
	let mut kept: Vec<(usize, &NoteRecord)> = Vec::with_capacity(included.len());
	for note in included {
		if index.contains_key(note.id.as_str()) {
			continue;
		}
		index.insert(note.id.as_str(), nodes.len());
		kept.push((nodes.len(), note));
		nodes.push(GraphNode::from_note(note));
	}

	let mut seen: HashSet<(usize, usize)> = HashSet::new();
	let mut links = Vec::new();
	let mut dropped_links = 0;
	for (src, note) in kept {
		for target in extract_links(note) {
			let Some(&tgt) = index.get(target.as_str()) else {
				dropped_links += 1;
				continue;
			};
			if tgt == src || !seen.insert((src.min(tgt), src.max(tgt))) {
				continue;
			}
			nodes[src].degree += 1;
			nodes[tgt].degree += 1;
			links.push(GraphLink {
				source: nodes[src].id.clone(),
				target,
			});
		}
	}

	let mut orphans = nodes.iter().filter(|n| n.degree == 0).count();
	if filter.hide_orphans {
		nodes.retain(|n| n.degree > 0);
		orphans = 0;
	}

	let stats = GraphStats {
		nodes: nodes.len(),
		links: links.len(),
		orphans,
		dropped_links,
	};
	debug!(
		"built note graph: {} nodes, {} links, {} orphans, {} dropped references",
		stats.nodes, stats.links, stats.orphans, stats.dropped_links
	);

	BuiltGraph {
		data: GraphData { nodes, links },
		stats,
	}
}
