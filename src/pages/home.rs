use leptos::prelude::*;

use crate::components::knowledge_graph::KnowledgeGraph;
use crate::graph::{NoteKind, NoteRecord, NotesLoad};

const FOLDERS: [&str; 3] = ["work", "reading", "journal"];

/// Sample notes linked as a random tree, with a few extra cross links.
fn generate_sample_notes(n: usize) -> Vec<NoteRecord> {
	let kinds = [NoteKind::Text, NoteKind::Text, NoteKind::Drawing, NoteKind::Mindmap];
	(0..n)
		.map(|i| {
			let mut content = format!("<p>Sample note {i}</p>");
			if i > 0 {
				let target = (rand_simple(i) * (i as f64)) as usize;
				content.push_str(&format!(
					r#"<p>See <span class="note-link" data-note-id="note-{target}">"#
				));
				content.push_str(&format!("note {target}</span></p>"));
			}
			let references = if i > 2 && i % 7 == 0 {
				vec![format!("note-{}", i - 3)]
			} else {
				Vec::new()
			};
			NoteRecord {
				id: format!("note-{i}"),
				title: if i % 11 == 5 { String::new() } else { format!("Note {i}") },
				content,
				folder_id: Some(FOLDERS[i % FOLDERS.len()].to_string()),
				kind: kinds[i % kinds.len()],
				references,
			}
		})
		.collect()
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let notes = Signal::stored(NotesLoad::Ready(generate_sample_notes(60)));
	let (folder, set_folder) = signal(None::<String>);
	let (current, set_current) = signal(Some("note-0".to_string()));
	let (open, set_open) = signal(false);

	let on_select = Callback::new(move |note: NoteRecord| set_current.set(Some(note.id)));
	let on_close = Callback::new(move |()| set_open.set(false));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="notes-demo">
				<div class="graph-toolbar">
					<label>
						"Folder "
						<select on:change=move |ev| {
							let value = event_target_value(&ev);
							set_folder.set((!value.is_empty()).then_some(value));
						}>
							<option value="">"All notes"</option>
							{FOLDERS
								.iter()
								.map(|f| view! { <option value=*f>{*f}</option> })
								.collect_view()}
						</select>
					</label>
					<span class="current-note">
						"Current note: "
						{move || current.get().unwrap_or_else(|| "none".to_string())}
					</span>
					<button on:click=move |_| set_open.set(true)>"Open graph"</button>
				</div>
				<p class="subtitle">
					"Click a note to open it. Drag nodes to reposition. "
					"Scroll to zoom. Drag background to pan."
				</p>
				<Show when=move || open.get()>
					<div class="fullscreen-graph">
						<KnowledgeGraph
							notes=notes
							folder=folder
							current_note=current
							on_select=on_select
							on_close=on_close
						/>
					</div>
				</Show>
			</div>
		</ErrorBoundary>
	}
}
