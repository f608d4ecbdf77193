//! Camera and pointer behaviour of an open graph view.

use euclid::{point2, vec2};
use note_graph_canvas::graph::{
	Camera, GraphConfig, GraphFilter, GraphView, NoteRecord, ViewEvent, Viewport,
};
use proptest::prelude::*;

fn view_with(n: usize) -> GraphView {
	let notes: Vec<NoteRecord> = (0..n)
		.map(|i| NoteRecord {
			id: format!("n{i}"),
			title: format!("Note {i}"),
			..NoteRecord::default()
		})
		.collect();
	let mut view = GraphView::new(GraphConfig::default());
	view.resize(Viewport::new(800.0, 600.0));
	view.load(&notes, &GraphFilter::default(), None);
	view.open();
	view.frame(0.0);
	view
}

proptest! {
	#[test]
	fn node_centre_hits_node_at_any_zoom(
		n in 1usize..40,
		pick in any::<prop::sample::Index>(),
		zoom_t in 0.0f64..=1.0,
		pan_x in -2_000.0f64..2_000.0,
		pan_y in -2_000.0f64..2_000.0,
	) {
		let mut view = view_with(n);
		let limits = view.config().camera.clone();
		let zoom = limits.min_zoom + (limits.max_zoom - limits.min_zoom) * zoom_t;
		view.set_camera(Camera { pan: vec2(pan_x, pan_y), zoom });

		let idx = pick.index(n);
		let centre = view.simulation().nodes()[idx].position;
		let screen = view.camera().graph_to_screen(centre);
		prop_assert_eq!(view.node_at(screen), Some(idx));
	}

	#[test]
	fn wheel_zoom_stays_in_bounds(deltas in proptest::collection::vec(-500.0f64..500.0, 1..300)) {
		let mut view = view_with(3);
		let limits = view.config().camera.clone();
		for delta in deltas {
			view.wheel(point2(120.0, 80.0), delta);
			let zoom = view.camera().zoom;
			prop_assert!(zoom >= limits.min_zoom && zoom <= limits.max_zoom);
		}
	}
}

#[test]
fn repeated_zoom_in_pins_at_max() {
	let mut view = view_with(5);
	let max = view.config().camera.max_zoom;
	for _ in 0..100 {
		view.wheel(point2(400.0, 300.0), -100.0);
	}
	assert_eq!(view.camera().zoom, max);
	view.wheel(point2(400.0, 300.0), -100.0);
	assert_eq!(view.camera().zoom, max);
}

#[test]
fn click_reports_the_note() {
	let mut view = view_with(4);
	let screen = view.camera().graph_to_screen(view.simulation().nodes()[2].position);
	view.pointer_down(screen);
	assert_eq!(view.pointer_up(screen), Some(ViewEvent::NodeSelected("n2".into())));
}
