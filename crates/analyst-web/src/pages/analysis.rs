//! Analysis Page

use leptos::ev::SubmitEvent;
use leptos::prelude::*;

use analyst_core::{QueryState, DEFAULT_SYMBOL};

use crate::api;
use crate::components::{AnalysisDisplay, ErrorBanner, InputForm, LoadingSpinner};

#[component]
pub fn AnalysisPage() -> impl IntoView {
    let state = RwSignal::new(QueryState::initial());
    let (asset, set_asset) = signal(DEFAULT_SYMBOL.to_string());

    // Completions from superseded requests are dropped by `QueryState::finish`
    let run = move |symbol: String| {
        let mut ticket = None;
        state.update(|s| ticket = s.begin(&symbol));
        let Some(ticket) = ticket else {
            return;
        };

        leptos::task::spawn_local(async move {
            let outcome = api::request_analysis(&ticket.symbol).await;
            state.update(|s| {
                s.finish(&ticket, outcome);
            });
        });
    };

    run(DEFAULT_SYMBOL.to_string());

    let loading = Signal::derive(move || state.with(|s| s.loading));

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        run(asset.get_untracked());
    };

    view! {
        <div class="analysis-page">
            <InputForm asset=asset set_asset=set_asset loading=loading on_submit=on_submit />

            <div class="results">
                <Show when=move || loading.get()>
                    <LoadingSpinner />
                </Show>

                {move || {
                    state
                        .with(|s| s.error.clone())
                        .map(|message| view! { <ErrorBanner message=message /> })
                }}

                {move || {
                    state
                        .with(|s| if s.loading { None } else { s.report.clone() })
                        .map(|report| view! { <AnalysisDisplay report=report /> })
                }}
            </div>
        </div>
    }
}
