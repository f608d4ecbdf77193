use serde::Deserialize;

/// Identifier of a note, as issued by the host's note storage.
pub type NoteId = String;

/// Editor a note was written with. Drives the node colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
	#[default]
	Text,
	Drawing,
	Mindmap,
	#[serde(other)]
	Other,
}

/// A note as handed over by the host application.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct NoteRecord {
	pub id: NoteId,
	#[serde(default)]
	pub title: String,
	/// Raw markup produced by the editor; scanned for inline note references.
	#[serde(default)]
	pub content: String,
	#[serde(default)]
	pub folder_id: Option<String>,
	#[serde(default, alias = "type")]
	pub kind: NoteKind,
	/// Typed references to other notes, kept alongside the inline markers.
	#[serde(default)]
	pub references: Vec<NoteId>,
}

/// Fetch state of the host's note list.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum NotesLoad {
	#[default]
	Loading,
	Ready(Vec<NoteRecord>),
	/// Terminal until the view is reopened; there is no retry.
	Failed(String),
}

/// Which notes enter the graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphFilter {
	pub folder: Option<String>,
	/// Drop notes that end up without any link.
	pub hide_orphans: bool,
}

impl GraphFilter {
	pub fn folder(folder: impl Into<String>) -> Self {
		Self {
			folder: Some(folder.into()),
			..Self::default()
		}
	}

	pub fn accepts(&self, note: &NoteRecord) -> bool {
		match &self.folder {
			Some(folder) => note.folder_id.as_deref() == Some(folder.as_str()),
			None => true,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: NoteId,
	pub label: String,
	pub kind: NoteKind,
	pub folder: Option<String>,
	/// Number of accepted edges touching this node.
	pub degree: usize,
}

impl GraphNode {
	pub fn from_note(note: &NoteRecord) -> Self {
		let title = note.title.trim();
		Self {
			id: note.id.clone(),
			label: if title.is_empty() {
				"Untitled".into()
			} else {
				title.into()
			},
			kind: note.kind,
			folder: note.folder_id.clone(),
			degree: 0,
		}
	}
}

/// An undirected link; `source` is the note whose content produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphLink {
	pub source: NoteId,
	pub target: NoteId,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

impl GraphData {
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn note_record_accepts_host_json() {
		let note: NoteRecord = serde_json::from_str(
			r#"{"id":"n1","title":"Plans","type":"mindmap","folder_id":"f1","references":["n2"]}"#,
		)
		.unwrap();
		assert_eq!(note.kind, NoteKind::Mindmap);
		assert_eq!(note.folder_id.as_deref(), Some("f1"));
		assert_eq!(note.references, vec!["n2".to_string()]);
		assert!(note.content.is_empty());
	}

	#[test]
	fn unknown_note_kind_falls_back_to_other() {
		let note: NoteRecord = serde_json::from_str(r#"{"id":"n1","kind":"spreadsheet"}"#).unwrap();
		assert_eq!(note.kind, NoteKind::Other);
	}

	#[test]
	fn blank_title_gets_placeholder_label() {
		let node = GraphNode::from_note(&NoteRecord {
			id: "n1".into(),
			title: "   ".into(),
			..NoteRecord::default()
		});
		assert_eq!(node.label, "Untitled");
	}

	#[test]
	fn folder_filter_matches_exact_folder() {
		let filter = GraphFilter::folder("work");
		let mut note = NoteRecord {
			id: "n1".into(),
			folder_id: Some("work".into()),
			..NoteRecord::default()
		};
		assert!(filter.accepts(&note));
		note.folder_id = None;
		assert!(!filter.accepts(&note));
		assert!(GraphFilter::default().accepts(&note));
	}
}
