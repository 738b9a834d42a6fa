use leptos::prelude::*;

use crate::components::orbital_graph::{
	CENTER_ID, GraphData, GraphLink, GraphNode, OrbitalGraphCanvas,
};

/// The CÓRTEX knowledge clusters orbiting the Athena assistant, with
/// relevance weights that widen and speed up the more important orbits.
fn cortex_graph() -> GraphData {
	let nodes = vec![
		GraphNode::new(CENTER_ID).with_label("Athena"),
		GraphNode::new("habits")
			.with_label("Hábitos")
			.with_relevance(8.0),
		GraphNode::new("projects")
			.with_label("Projetos")
			.with_relevance(9.0),
		GraphNode::new("diary")
			.with_label("Diário")
			.with_relevance(6.0),
		GraphNode::new("favorites")
			.with_label("Favoritos")
			.with_relevance(4.0),
		GraphNode::new("connecta")
			.with_label("Connecta")
			.with_relevance(7.0),
		GraphNode::new("insights")
			.with_label("Insights")
			.with_relevance(5.0),
	];
	let links = nodes
		.iter()
		.filter(|n| !n.is_center())
		.map(|n| GraphLink {
			source: n.id.clone(),
			target: CENTER_ID.into(),
		})
		.collect();
	GraphData { nodes, links }
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let graph_data = Signal::derive(cortex_graph);
	let (active, set_active) = signal(true);

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

			<div class="graph-page">
				<OrbitalGraphCanvas data=graph_data active=active />
				<div class="graph-overlay">
					<h1>"CÓRTEX"</h1>
					<p class="subtitle">
						"Seu conhecimento orbitando a Athena. Arraste para mover, role para ampliar."
					</p>
					<button class="pause-toggle" on:click=move |_| set_active.update(|a| *a = !*a)>
						{move || if active.get() { "Pausar" } else { "Retomar" }}
					</button>
				</div>
			</div>
		</ErrorBoundary>
	}
}
