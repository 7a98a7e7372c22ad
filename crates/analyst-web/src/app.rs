//! Main App Component

use leptos::prelude::*;

use crate::components::{Footer, Header};
use crate::pages::AnalysisPage;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    view! {
        <div class="app">
            <Header />
            <main>
                <AnalysisPage />
            </main>
            <Footer />
        </div>
    }
}
