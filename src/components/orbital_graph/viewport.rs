//! Rendering-surface size derived from window dimensions and the
//! fullscreen flag. Pure computation; the component wires the resize
//! listener.

/// Vertical space taken by the surrounding app chrome (header, tab bar)
/// when not fullscreen.
pub const CHROME_OFFSET: f64 = 120.0;

/// Floor for the non-fullscreen canvas height.
pub const MIN_HEIGHT: f64 = 600.0;

/// Canvas size for the current window. Fullscreen uses the window
/// verbatim; otherwise the chrome offset is subtracted from the height,
/// clamped to the minimum.
pub fn viewport_size(fullscreen: bool, window_w: f64, window_h: f64) -> (f64, f64) {
	if fullscreen {
		(window_w, window_h)
	} else {
		(window_w, (window_h - CHROME_OFFSET).max(MIN_HEIGHT))
	}
}

/// Current window inner dimensions.
pub fn window_size() -> (f64, f64) {
	let window = web_sys::window().unwrap();
	(
		window.inner_width().unwrap().as_f64().unwrap(),
		window.inner_height().unwrap().as_f64().unwrap(),
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fullscreen_uses_window_verbatim() {
		assert_eq!(viewport_size(true, 1920.0, 1080.0), (1920.0, 1080.0));
		assert_eq!(viewport_size(true, 400.0, 300.0), (400.0, 300.0));
	}

	#[test]
	fn windowed_subtracts_chrome() {
		assert_eq!(viewport_size(false, 1280.0, 900.0), (1280.0, 780.0));
	}

	#[test]
	fn windowed_height_never_drops_below_floor() {
		// 400 - 120 would be 280; the floor wins.
		let (_, h) = viewport_size(false, 1024.0, 400.0);
		assert_eq!(h, MIN_HEIGHT);

		// Exactly at the threshold.
		let (_, h) = viewport_size(false, 1024.0, MIN_HEIGHT + CHROME_OFFSET);
		assert_eq!(h, MIN_HEIGHT);
	}
}
