use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, Element, HtmlCanvasElement, MouseEvent, WheelEvent, Window,
};

use super::fullscreen::{self, CHANGE_EVENTS, FullscreenState};
use super::orbit::FRAME_DT;
use super::render;
use super::state::OrbitalGraphState;
use super::types::GraphData;
use super::viewport;

type SharedState = Rc<RefCell<Option<OrbitalGraphState>>>;

/// Resize the canvas and graph state to the viewport implied by the
/// window and the fullscreen flag.
fn apply_viewport(canvas: &HtmlCanvasElement, state: &SharedState, fullscreen: bool) {
	let (win_w, win_h) = viewport::window_size();
	let (w, h) = viewport::viewport_size(fullscreen, win_w, win_h);
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
	if let Some(ref mut s) = *state.borrow_mut() {
		s.resize(w, h);
	}
}

/// Arm the frame loop if the graph wants frames and none is pending.
fn schedule_frame(
	state: &SharedState,
	animate: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	raf_id: &Rc<RefCell<Option<i32>>>,
) {
	let wants = state.borrow().as_ref().is_some_and(|s| s.should_animate());
	if !wants || raf_id.borrow().is_some() {
		return;
	}
	if let Some(ref cb) = *animate.borrow() {
		if let Ok(id) = web_sys::window()
			.unwrap()
			.request_animation_frame(cb.as_ref().unchecked_ref())
		{
			*raf_id.borrow_mut() = Some(id);
		}
	}
}

#[component]
pub fn OrbitalGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	/// Pauses the orbit (and cancels the pending frame) when false.
	#[prop(into, default = Signal::derive(|| true))]
	active: Signal<bool>,
) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let raf_id: Rc<RefCell<Option<i32>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let fs_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let fs_state: Rc<RefCell<FullscreenState>> = Rc::new(RefCell::new(FullscreenState::default()));
	let scroll: Rc<RefCell<fullscreen::ScrollGuard>> =
		Rc::new(RefCell::new(fullscreen::ScrollGuard::default()));
	let is_fullscreen = RwSignal::new(false);

	let (state_init, animate_init, raf_init, resize_cb_init, fs_cb_init, fs_state_init, scroll_init) = (
		state.clone(),
		animate.clone(),
		raf_id.clone(),
		resize_cb.clone(),
		fs_cb.clone(),
		fs_state.clone(),
		scroll.clone(),
	);
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (win_w, win_h) = viewport::window_size();
		let (w, h) = viewport::viewport_size(is_fullscreen.get_untracked(), win_w, win_h);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		let seed = js_sys::Date::now() as u64;
		*state_init.borrow_mut() = Some(OrbitalGraphState::new(&data.get(), w, h, seed));

		// Data changes re-run this effect to rebuild the graph state;
		// listeners and the frame loop are wired once. A loop that
		// stopped on an empty collection is re-armed here when nodes
		// come back.
		if animate_init.borrow().is_some() {
			if active.get_untracked() {
				schedule_frame(&state_init, &animate_init, &raf_init);
			}
			return;
		}

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			apply_viewport(&canvas_resize, &state_resize, is_fullscreen.get_untracked());
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		// Native fullscreen changes, including external exits (Esc, OS
		// controls), reconcile the controller and the canvas size.
		let document = window.document().unwrap();
		let (state_fs, canvas_fs, fs_sync, doc_sync) = (
			state_init.clone(),
			canvas.clone(),
			fs_state_init.clone(),
			document.clone(),
		);
		let scroll_sync = scroll_init.clone();
		*fs_cb_init.borrow_mut() = Some(Closure::new(move || {
			let browser_fs = fullscreen::browser_is_fullscreen(&doc_sync);
			if let Some(cmd) = fs_sync.borrow_mut().sync(browser_fs) {
				match cmd {
					fullscreen::FullscreenCommand::LockScroll => {
						scroll_sync.borrow_mut().lock(&doc_sync)
					}
					fullscreen::FullscreenCommand::UnlockScroll => {
						scroll_sync.borrow_mut().unlock(&doc_sync)
					}
					_ => {}
				}
			}
			is_fullscreen.set(browser_fs);
			apply_viewport(&canvas_fs, &state_fs, browser_fs);
		}));
		if let Some(ref cb) = *fs_cb_init.borrow() {
			for event in CHANGE_EVENTS {
				let _ =
					document.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner, raf_inner) = (
			state_init.clone(),
			animate_init.clone(),
			raf_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			*raf_inner.borrow_mut() = None;
			let mut running = false;
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.should_animate() {
					s.tick(FRAME_DT as f32);
				}
				render::render(s, &ctx);
				running = s.should_animate();
			}
			// A paused graph or an emptied collection stops scheduling;
			// reactivation or fresh data restarts it.
			if running {
				if let Some(ref cb) = *animate_inner.borrow() {
					if let Ok(id) = web_sys::window()
						.unwrap()
						.request_animation_frame(cb.as_ref().unchecked_ref())
					{
						*raf_inner.borrow_mut() = Some(id);
					}
				}
			}
		}));
		if active.get_untracked() {
			schedule_frame(&state_init, &animate_init, &raf_init);
		}
	});

	// Active-flag transitions: pause cancels the pending frame so no
	// orphaned callback fires; resume schedules a fresh one.
	let (state_active, animate_active, raf_active) = (state.clone(), animate.clone(), raf_id.clone());
	Effect::new(move |_| {
		let on = active.get();
		if let Some(ref mut s) = *state_active.borrow_mut() {
			s.set_running(on);
		}
		if on {
			schedule_frame(&state_active, &animate_active, &raf_active);
		} else if let Some(id) = raf_active.borrow_mut().take() {
			let _ = web_sys::window().unwrap().cancel_animation_frame(id);
		}
	});

	let (state_toggle, fs_toggle, scroll_toggle) = (state.clone(), fs_state.clone(), scroll.clone());
	let on_toggle = move |_: MouseEvent| {
		let Some(container) = container_ref.get() else {
			return;
		};
		let container: Element = container.into();
		let document = web_sys::window().unwrap().document().unwrap();
		for cmd in fs_toggle.borrow_mut().toggle() {
			fullscreen::apply(cmd, &container, &document, &mut scroll_toggle.borrow_mut());
		}
		let fs = fs_toggle.borrow().is_fullscreen();
		is_fullscreen.set(fs);
		// The logical flag flips even when the fullscreen API is a
		// no-op; size the canvas to match it.
		if let Some(canvas) = canvas_ref.get() {
			apply_viewport(&canvas.into(), &state_toggle, fs);
		}
	};

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pan.active = true;
			s.pan.start_x = x;
			s.pan.start_y = y;
			s.pan.transform_start_x = s.transform.x;
			s.pan.transform_start_y = s.transform.y;
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if s.pan.active {
				s.transform.x = s.pan.transform_start_x + (x - s.pan.start_x);
				s.transform.y = s.pan.transform_start_y + (y - s.pan.start_y);
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.pan.active = false;
		}
	};
	let on_mouseleave = on_mouseup.clone();

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (s.transform.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / s.transform.k;
			s.transform.x = x - (x - s.transform.x) * ratio;
			s.transform.y = y - (y - s.transform.y) * ratio;
			s.transform.k = new_k;
		}
	};

	// Every exit path: cancel the frame, drop the listeners, release
	// the scroll lock whatever the current fullscreen value.
	let cleanup = send_wrapper::SendWrapper::new(move || {
		if let Some(id) = raf_id.borrow_mut().take() {
			if let Some(window) = web_sys::window() {
				let _ = window.cancel_animation_frame(id);
			}
		}
		if let Some(window) = web_sys::window() {
			if let Some(ref cb) = *resize_cb.borrow() {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
			if let Some(document) = window.document() {
				if let Some(ref cb) = *fs_cb.borrow() {
					for event in CHANGE_EVENTS {
						let _ = document
							.remove_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
					}
				}
				fs_state.borrow_mut().teardown();
				scroll.borrow_mut().unlock(&document);
			}
		}
		*animate.borrow_mut() = None;
		*resize_cb.borrow_mut() = None;
		*fs_cb.borrow_mut() = None;
	});
	on_cleanup(move || cleanup.take()());

	view! {
		<div node_ref=container_ref class="orbital-graph">
			<canvas
				node_ref=canvas_ref
				class="orbital-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<button class="fullscreen-toggle" on:click=on_toggle>
				{move || if is_fullscreen.get() { "Exit fullscreen" } else { "Fullscreen" }}
			</button>
		</div>
	}
}
