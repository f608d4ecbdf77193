use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use euclid::point2;
use leptos::ev;
use leptos::prelude::*;
use log::{error, warn};
use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent};

use super::canvas::{context_2d, fit_canvas};
use crate::graph::{
	GraphConfig, GraphFilter, GraphStats, GraphView, NoteRecord, NotesLoad, ScreenPoint,
	SimulationPhase, ViewEvent, render,
};

/// Frame scheduling of one open view. Cancelling stops the chain for good.
#[derive(Clone, Default)]
struct FrameLoop {
	pending: Arc<Mutex<Option<AnimationFrameRequestHandle>>>,
	closed: Arc<AtomicBool>,
}

impl FrameLoop {
	/// Calls `step` with the seconds elapsed since the previous frame, for as
	/// long as it returns `true`.
	fn schedule(&self, step: Rc<dyn Fn(f64) -> bool>, last_ms: Option<f64>) {
		if self.closed.load(Ordering::Relaxed) {
			return;
		}
		let next = self.clone();
		let requested = request_animation_frame_with_handle(move || {
			let now = js_sys::Date::now();
			let dt = last_ms.map_or(0.0, |last| (now - last) / 1000.0);
			if step(dt) {
				next.schedule(step, Some(now));
			}
		});
		match requested {
			Ok(handle) => {
				if let Ok(mut pending) = self.pending.lock() {
					*pending = Some(handle);
				}
			}
			Err(err) => warn!("requestAnimationFrame failed: {err:?}"),
		}
	}

	fn cancel(&self) {
		self.closed.store(true, Ordering::Relaxed);
		if let Some(handle) = self.pending.lock().ok().and_then(|mut p| p.take()) {
			handle.cancel();
		}
	}
}

fn pointer(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> ScreenPoint {
	let rect = canvas.get_bounding_client_rect();
	point2(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Force-directed graph of the host's notes. Mounting the component opens
/// the view. Escape, the close button and picking a note all stop the view
/// before `on_close` runs; unmounting cancels any pending frame.
#[component]
pub fn KnowledgeGraph(
	#[prop(into)] notes: Signal<NotesLoad>,
	/// Only notes of this folder enter the graph.
	#[prop(into, optional)]
	folder: MaybeProp<String>,
	/// Note open in the editor; centred and highlighted.
	#[prop(into, optional)]
	current_note: MaybeProp<String>,
	#[prop(optional)] config: Option<GraphConfig>,
	/// Receives the clicked note; the view closes afterwards.
	#[prop(optional, into)]
	on_select: Option<Callback<NoteRecord>>,
	#[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state = Rc::new(RefCell::new(GraphView::new(config.unwrap_or_default())));
	let stats = RwSignal::new(GraphStats::default());

	// Stops the simulation, which ends the frame loop, before the host unmounts us.
	let close_view = {
		let state = state.clone();
		move || {
			state.borrow_mut().close();
			on_close.run(());
		}
	};

	let state_load = state.clone();
	Effect::new(move |_| {
		let filter = GraphFilter {
			folder: folder.get(),
			..GraphFilter::default()
		};
		let current = current_note.get();
		notes.with(|load| {
			if let NotesLoad::Ready(list) = load {
				let mut view = state_load.borrow_mut();
				view.load(list, &filter, current.as_deref());
				stats.set(view.stats());
			}
		});
	});

	let state_init = state.clone();
	let close_init = close_view.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let ctx = match context_2d(&canvas) {
			Ok(ctx) => ctx,
			Err(err) => {
				error!("knowledge graph disabled: {err}");
				return;
			}
		};
		{
			let mut view = state_init.borrow_mut();
			view.resize(fit_canvas(&canvas, &ctx, &window));
			view.open();
		}

		let (state_resize, canvas_resize, ctx_resize) =
			(state_init.clone(), canvas.clone(), ctx.clone());
		let resize = window_event_listener(ev::resize, move |_| {
			if let Some(win) = web_sys::window() {
				let viewport = fit_canvas(&canvas_resize, &ctx_resize, &win);
				state_resize.borrow_mut().resize(viewport);
			}
		});
		let close_esc = close_init.clone();
		let escape = window_event_listener(ev::keydown, move |ev: KeyboardEvent| {
			if ev.key() == "Escape" {
				close_esc();
			}
		});

		let state_anim = state_init.clone();
		let step: Rc<dyn Fn(f64) -> bool> = Rc::new(move |dt| {
			let mut view = state_anim.borrow_mut();
			let frame = view.frame(dt);
			let mut surface = ctx.clone();
			render(&frame, &view.config().style, &mut surface);
			view.simulation().phase() == SimulationPhase::Running
		});
		let frame_loop = FrameLoop::default();
		frame_loop.schedule(step, None);

		on_cleanup(move || {
			frame_loop.cancel();
			resize.remove();
			escape.remove();
		});
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		state_md.borrow_mut().pointer_down(pointer(&canvas, &ev));
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let mut view = state_mm.borrow_mut();
		view.pointer_move(pointer(&canvas, &ev));
		let cursor = if view.is_dragging() {
			"grabbing"
		} else if view.hovered().is_some() {
			"pointer"
		} else {
			"grab"
		};
		let _ = canvas.style().set_property("cursor", cursor);
	};

	let state_mu = state.clone();
	let close_mu = close_view.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let event = state_mu.borrow_mut().pointer_up(pointer(&canvas, &ev));
		let Some(ViewEvent::NodeSelected(id)) = event else {
			return;
		};
		let Some(on_select) = on_select else {
			return;
		};
		let note = notes.with_untracked(|load| match load {
			NotesLoad::Ready(list) => list.iter().find(|n| n.id == id).cloned(),
			_ => None,
		});
		if let Some(note) = note {
			on_select.run(note);
			close_mu();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		state_ml.borrow_mut().pointer_leave();
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		state_wh.borrow_mut().wheel(pointer(&canvas, &ev), ev.delta_y());
	};

	let state_fit = state.clone();
	let on_fit = move |_| state_fit.borrow_mut().fit_to_view();

	let status = move || {
		notes.with(|load| match load {
			NotesLoad::Loading => Some("Loading notes…"),
			NotesLoad::Failed(_) => {
				Some("Could not load notes. Close and reopen the graph to retry.")
			}
			NotesLoad::Ready(_) if stats.get().nodes == 0 => Some("No notes to show."),
			NotesLoad::Ready(_) => None,
		})
	};

	view! {
		<div class="knowledge-graph">
			<div class="graph-header">
				<span class="graph-stats">
					{move || {
						let s = stats.get();
						format!("{} notes · {} links · {} unlinked", s.nodes, s.links, s.orphans)
					}}
				</span>
				<button class="graph-fit" on:click=on_fit>"Fit"</button>
				<button class="graph-close" on:click=move |_| close_view()>"Close"</button>
			</div>
			<canvas
				node_ref=canvas_ref
				class="knowledge-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			{move || status().map(|msg| view! { <div class="graph-status">{msg}</div> })}
		</div>
	}
}
