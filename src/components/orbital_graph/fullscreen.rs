//! Fullscreen tracking split in two layers: a platform-agnostic state
//! machine that returns commands (data in via parameters, actions out
//! via return values), and thin DOM glue that executes them through an
//! ordered vendor fallback chain. Absent APIs degrade to a no-op; no
//! call in this module throws.

use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element};

/// Fullscreen request methods, standard API first.
pub const REQUEST_METHODS: [&str; 4] = [
	"requestFullscreen",
	"webkitRequestFullscreen",
	"mozRequestFullScreen",
	"msRequestFullscreen",
];

/// Fullscreen exit methods, standard API first.
pub const EXIT_METHODS: [&str; 4] = [
	"exitFullscreen",
	"webkitExitFullscreen",
	"mozCancelFullScreen",
	"msExitFullscreen",
];

/// Change events to subscribe to; externally triggered exits (Esc, OS
/// controls) arrive through these.
pub const CHANGE_EVENTS: [&str; 4] = [
	"fullscreenchange",
	"webkitfullscreenchange",
	"mozfullscreenchange",
	"MSFullscreenChange",
];

/// Document properties holding the current fullscreen element.
pub const ELEMENT_PROPS: [&str; 4] = [
	"fullscreenElement",
	"webkitFullscreenElement",
	"mozFullScreenElement",
	"msFullscreenElement",
];

/// Side effects the state machine asks the DOM layer to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FullscreenCommand {
	EnterFullscreen,
	ExitFullscreen,
	LockScroll,
	UnlockScroll,
}

/// Desired fullscreen state, reconciled against what the browser
/// reports. Keeping this separate from the DOM keeps the reconciliation
/// rules testable without a display surface.
#[derive(Debug, Default)]
pub struct FullscreenState {
	active: bool,
}

impl FullscreenState {
	pub fn is_fullscreen(&self) -> bool {
		self.active
	}

	/// Flip the desired state. The logical flag flips even when the
	/// browser ends up ignoring the request (best effort).
	pub fn toggle(&mut self) -> [FullscreenCommand; 2] {
		self.active = !self.active;
		if self.active {
			[
				FullscreenCommand::EnterFullscreen,
				FullscreenCommand::LockScroll,
			]
		} else {
			[
				FullscreenCommand::ExitFullscreen,
				FullscreenCommand::UnlockScroll,
			]
		}
	}

	/// Reconcile against a native fullscreen-change observation. An
	/// external exit releases the scroll lock without a second toggle.
	pub fn sync(&mut self, browser_fullscreen: bool) -> Option<FullscreenCommand> {
		if self.active == browser_fullscreen {
			return None;
		}
		self.active = browser_fullscreen;
		if browser_fullscreen {
			Some(FullscreenCommand::LockScroll)
		} else {
			Some(FullscreenCommand::UnlockScroll)
		}
	}

	/// Unconditional unlock for unmount, whatever the current state. No
	/// stuck scroll lock on any exit path.
	pub fn teardown(&mut self) -> FullscreenCommand {
		self.active = false;
		FullscreenCommand::UnlockScroll
	}
}

fn call_first(target: &JsValue, methods: &[&str]) -> bool {
	for name in methods {
		if let Ok(value) = Reflect::get(target, &JsValue::from_str(name)) {
			if let Some(func) = value.dyn_ref::<Function>() {
				let _ = func.call0(target);
				return true;
			}
		}
	}
	false
}

/// Request fullscreen on `element`, trying the standard API then vendor
/// prefixes. Returns false when no API is available.
pub fn request_fullscreen(element: &Element) -> bool {
	call_first(element, &REQUEST_METHODS)
}

/// Exit fullscreen, same fallback chain as the request path.
pub fn exit_fullscreen(document: &Document) -> bool {
	call_first(document, &EXIT_METHODS)
}

/// Whether the browser currently reports any fullscreen element.
pub fn browser_is_fullscreen(document: &Document) -> bool {
	ELEMENT_PROPS.iter().any(|prop| {
		Reflect::get(document, &JsValue::from_str(prop))
			.map(|v| !v.is_null() && !v.is_undefined())
			.unwrap_or(false)
	})
}

/// What unlock should write back: a non-empty saved inline style is
/// reinstated, anything else drops the override and returns control to
/// the stylesheet.
pub fn restore_value(saved: Option<String>) -> Option<String> {
	saved.filter(|v| !v.is_empty())
}

/// Freezes page scrolling while fullscreen, remembering the body's
/// prior inline `overflow` so unlock restores the pre-fullscreen value.
#[derive(Debug, Default)]
pub struct ScrollGuard {
	saved: Option<String>,
}

impl ScrollGuard {
	pub fn lock(&mut self, document: &Document) {
		if let Some(body) = document.body() {
			let style = body.style();
			// Capture once; a repeated lock must not save "hidden".
			if self.saved.is_none() {
				self.saved = Some(style.get_property_value("overflow").unwrap_or_default());
			}
			let _ = style.set_property("overflow", "hidden");
		}
	}

	pub fn unlock(&mut self, document: &Document) {
		if let Some(body) = document.body() {
			let style = body.style();
			match restore_value(self.saved.take()) {
				Some(prev) => {
					let _ = style.set_property("overflow", &prev);
				}
				None => {
					let _ = style.remove_property("overflow");
				}
			}
		}
	}
}

/// Execute one command against the DOM.
pub fn apply(
	command: FullscreenCommand,
	container: &Element,
	document: &Document,
	scroll: &mut ScrollGuard,
) {
	match command {
		FullscreenCommand::EnterFullscreen => {
			request_fullscreen(container);
		}
		FullscreenCommand::ExitFullscreen => {
			exit_fullscreen(document);
		}
		FullscreenCommand::LockScroll => scroll.lock(document),
		FullscreenCommand::UnlockScroll => scroll.unlock(document),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn toggle_emits_matching_command_pairs() {
		let mut state = FullscreenState::default();

		assert_eq!(
			state.toggle(),
			[
				FullscreenCommand::EnterFullscreen,
				FullscreenCommand::LockScroll
			]
		);
		assert!(state.is_fullscreen());

		assert_eq!(
			state.toggle(),
			[
				FullscreenCommand::ExitFullscreen,
				FullscreenCommand::UnlockScroll
			]
		);
		assert!(!state.is_fullscreen());
	}

	#[test]
	fn external_exit_reconciles_without_second_toggle() {
		let mut state = FullscreenState::default();
		state.toggle();

		// Our own request echoes back as a change event; no-op.
		assert_eq!(state.sync(true), None);
		assert!(state.is_fullscreen());

		// User presses Esc: browser leaves fullscreen behind our back.
		assert_eq!(state.sync(false), Some(FullscreenCommand::UnlockScroll));
		assert!(!state.is_fullscreen());

		// Further change events are idempotent.
		assert_eq!(state.sync(false), None);
	}

	#[test]
	fn external_enter_is_adopted() {
		let mut state = FullscreenState::default();
		assert_eq!(state.sync(true), Some(FullscreenCommand::LockScroll));
		assert!(state.is_fullscreen());
	}

	#[test]
	fn teardown_always_unlocks() {
		let mut idle = FullscreenState::default();
		assert_eq!(idle.teardown(), FullscreenCommand::UnlockScroll);

		let mut active = FullscreenState::default();
		active.toggle();
		assert_eq!(active.teardown(), FullscreenCommand::UnlockScroll);
		assert!(!active.is_fullscreen());
	}

	#[test]
	fn unlock_restores_prior_inline_overflow() {
		// A body that already carried an inline style gets it back.
		assert_eq!(
			restore_value(Some("scroll".into())),
			Some("scroll".to_owned())
		);
		// No prior inline style: the override is dropped entirely.
		assert_eq!(restore_value(Some(String::new())), None);
		assert_eq!(restore_value(None), None);
	}

	#[test]
	fn fallback_tables_try_the_standard_api_first() {
		assert_eq!(REQUEST_METHODS[0], "requestFullscreen");
		assert_eq!(EXIT_METHODS[0], "exitFullscreen");
		assert_eq!(CHANGE_EVENTS[0], "fullscreenchange");
		assert_eq!(ELEMENT_PROPS[0], "fullscreenElement");
	}
}
