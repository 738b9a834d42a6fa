fn main() {
	#[cfg(target_arch = "wasm32")]
	{
		cortex_graph_canvas::init_logging();
		leptos::mount::mount_to_body(cortex_graph_canvas::App);
	}
}
