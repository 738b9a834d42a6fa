use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::OrbitalGraphState;

pub fn render(state: &OrbitalGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#0f0f1e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_edges(state: &OrbitalGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (line_width, dash, gap) = (1.2 / k, 6.0 / k, 5.0 / k);
	// Dash offset drifts with time so connections appear to flow
	// toward the assistant.
	let dash_offset = -(state.flow_time * 25.0) % (dash + gap);

	ctx.set_stroke_style_str("rgba(167, 139, 250, 0.35)");
	ctx.set_line_width(line_width);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(dash),
		&JsValue::from_f64(gap),
	));
	ctx.set_line_dash_offset(dash_offset);

	state.graph.visit_edges(|n1, n2, _| {
		ctx.begin_path();
		ctx.move_to(n1.x() as f64, n1.y() as f64);
		ctx.line_to(n2.x() as f64, n2.y() as f64);
		ctx.stroke();
	});
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(state: &OrbitalGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;

	state.graph.visit_nodes(|node| {
		let (x, y) = (node.x() as f64, node.y() as f64);
		let info = &node.data.user_data;
		let radius = info.draw_radius;

		if info.is_center {
			// Soft halo behind the assistant node.
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.4, x, y, radius * 3.0)
			{
				let _ = gradient.add_color_stop(0.0, "rgba(167, 139, 250, 0.45)");
				let _ = gradient.add_color_stop(1.0, "rgba(167, 139, 250, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, radius * 3.0, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&info.color);
		ctx.fill();

		if info.is_center {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.5 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.6)");
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		if let Some(label) = &info.label {
			ctx.set_fill_style_str("rgba(255, 255, 255, 0.85)");
			ctx.set_font(&format!("{}px sans-serif", 11.0 / k.max(0.5)));
			let _ = ctx.fill_text(label, x + radius + 4.0, y + 4.0);
		}
	});
}
