//! Cross-note reference extraction.
//!
//! The rich-text editor embeds a reference to another note as an inline
//! element carrying a `data-note-id` attribute, e.g.
//! `<span class="note-link" data-note-id="abc">Plans</span>`. Notes may also
//! carry typed references directly. Anything that does not match is ignored,
//! so unparseable content simply yields no links.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{NoteId, NoteRecord};

static NOTE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"data-note-id\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
		.expect("note marker pattern is valid")
});

/// Ids referenced by inline markers in `content`, in document order.
pub fn content_links(content: &str) -> impl Iterator<Item = &str> {
	NOTE_MARKER
		.captures_iter(content)
		.filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
		.map(|m| m.as_str().trim())
		.filter(|id| !id.is_empty())
}

/// Every note referenced by `note`: typed references first, then inline
/// markers. Each target appears once.
pub fn extract_links(note: &NoteRecord) -> Vec<NoteId> {
	let mut links: Vec<NoteId> = Vec::new();
	let typed = note.references.iter().map(|r| r.trim()).filter(|id| !id.is_empty());
	for id in typed.chain(content_links(&note.content)) {
		if !links.iter().any(|seen| seen == id) {
			links.push(id.to_owned());
		}
	}
	links
}

#[cfg(test)]
mod tests {
	use super::*;

	fn note(content: &str, references: &[&str]) -> NoteRecord {
		NoteRecord {
			id: "self".into(),
			content: content.into(),
			references: references.iter().map(|r| r.to_string()).collect(),
			..NoteRecord::default()
		}
	}

	#[test]
	fn finds_double_and_single_quoted_markers() {
		let content =
			r#"<p>See <span data-note-id="a">A</span> and <span data-note-id='b'>B</span></p>"#;
		assert_eq!(content_links(content).collect::<Vec<_>>(), vec!["a", "b"]);
	}

	#[test]
	fn tolerates_spacing_around_equals() {
		let content = r#"<a data-note-id = "a">x</a>"#;
		assert_eq!(content_links(content).collect::<Vec<_>>(), vec!["a"]);
	}

	#[test]
	fn malformed_markup_yields_no_links() {
		for content in [
			"",
			"plain text without markup",
			r#"<span data-note-id="unterminated>broken"#,
			r#"<span data-note-id=bare>no quotes</span>"#,
			r#"<span data-note-id="">empty</span>"#,
			"<<<>>>\u{0}\u{fffd}",
		] {
			assert!(extract_links(&note(content, &[])).is_empty(), "{content:?}");
		}
	}

	#[test]
	fn typed_references_come_first_and_duplicates_collapse() {
		let content = concat!(
			r#"<span data-note-id="b"></span>"#,
			r#"<span data-note-id="a"></span>"#,
			r#"<span data-note-id="b"></span>"#,
		);
		assert_eq!(extract_links(&note(content, &["a", " c "])), vec!["a", "c", "b"]);
	}
}
