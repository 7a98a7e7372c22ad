//! Asset Input Form

use leptos::ev::SubmitEvent;
use leptos::prelude::*;

/// Symbol input and submit button; both are disabled while loading
#[component]
pub fn InputForm(
    asset: ReadSignal<String>,
    set_asset: WriteSignal<String>,
    loading: Signal<bool>,
    on_submit: impl FnMut(SubmitEvent) + 'static,
) -> impl IntoView {
    view! {
        <form class="input-form" on:submit=on_submit>
            <input
                type="text"
                placeholder="Ex: BTC/USD, ETH, EUR/USD"
                prop:value=move || asset.get()
                on:input=move |ev| set_asset.set(event_target_value(&ev).to_uppercase())
                disabled=move || loading.get()
            />
            <button type="submit" disabled=move || loading.get()>
                {move || if loading.get() { "Analisando..." } else { "Analisar Ativo" }}
            </button>
        </form>
    }
}
