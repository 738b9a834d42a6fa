use leptos::prelude::*;

/// 404 Not Found Page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"404"</h1>
			<p>"Página não encontrada."</p>
			<a href="/">"Voltar ao CÓRTEX"</a>
		</div>
	}
}
