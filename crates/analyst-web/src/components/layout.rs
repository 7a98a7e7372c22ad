//! Page chrome and status blocks

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="hero">
            <h1>"Trading for Beginners with Me"</h1>
            <p class="tagline">"Seu Assistente de Trading 24h"</p>
        </header>
    }
}

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer class="footer">
            <p>"Criado por Totti Alves Studios AI"</p>
            <p class="disclaimer">
                "Aviso: Informações apenas para fins educativos, não constitui conselho financeiro."
            </p>
        </footer>
    }
}

#[component]
pub fn LoadingSpinner() -> impl IntoView {
    view! {
        <div class="loading">
            <div class="spinner"></div>
            <p>"Buscando dados de mercado..."</p>
        </div>
    }
}

#[component]
pub fn ErrorBanner(message: String) -> impl IntoView {
    view! { <div class="error-banner" role="alert">{message}</div> }
}
