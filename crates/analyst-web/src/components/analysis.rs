//! Analysis Result View

use leptos::prelude::*;

use analyst_core::display::{delta_tone, RecommendationStyle};
use analyst_core::{AnalysisReport, Source};

/// Full result view for one report
#[component]
pub fn AnalysisDisplay(report: AnalysisReport) -> impl IntoView {
    let AnalysisReport {
        analysis,
        sources,
        generated_at,
    } = report;
    let treatment = RecommendationStyle::for_recommendation(&analysis.recommendation);
    let generated = generated_at.format("%d/%m/%Y %H:%M UTC").to_string();

    view! {
        <section class="analysis">
            <div class="asset-header">
                <div>
                    <h2 class="asset">{analysis.asset}</h2>
                    <p class="price">{analysis.price}</p>
                </div>
                <div class="chart-emoji">{analysis.chart_emoji}</div>
            </div>

            <div class="stat-grid">
                <StatCard title="Variação 24h" value=analysis.change_24h />
                <StatCard title="Variação 7d" value=analysis.change_7d />
                <StatCard title="Volume 24h" value=analysis.volume />
                <StatCard title="Tendência Curto Prazo" value=analysis.trend_short_term />
            </div>

            <div class="analysis-body">
                <div class="main-column">
                    <RecommendationPanel
                        treatment=treatment
                        stop_loss=analysis.stop_loss
                        take_profit=analysis.take_profit
                    />
                    <div class="summary">
                        <h3>"Resumo da Análise"</h3>
                        <p>{analysis.summary}</p>
                    </div>
                </div>

                <div class="side-column">
                    <StatCard title="Tendência Médio Prazo" value=analysis.trend_medium_term />
                    <StatCard title="Suporte" value=analysis.support />
                    <StatCard title="Resistência" value=analysis.resistance />
                    <StatCard title="RSI" value=analysis.rsi />
                    <StatCard title="MACD" value=analysis.macd />
                    <StatCard title="Médias Móveis" value=analysis.moving_averages />
                </div>
            </div>

            <SourceList sources=sources />

            <p class="generated-at">{format!("Gerado em {generated}")}</p>
        </section>
    }
}

/// Labeled value; sign-prefixed values are colored
#[component]
fn StatCard(title: &'static str, value: String) -> impl IntoView {
    let class = format!("stat-value {}", delta_tone(&value).css_class());

    view! {
        <div class="stat-card">
            <h3>{title}</h3>
            <p class=class>{value}</p>
        </div>
    }
}

#[component]
fn RecommendationPanel(
    treatment: RecommendationStyle,
    stop_loss: String,
    take_profit: String,
) -> impl IntoView {
    view! {
        <div class=format!("recommendation {}", treatment.panel_class)>
            <h2>"Recomendação"</h2>
            <div class=format!("recommendation-label {}", treatment.text_class)>
                <span class="recommendation-icon">{treatment.icon.glyph()}</span>
                <p>{treatment.label}</p>
            </div>
            <div class="levels">
                <div class="stop-loss">
                    <span class="level-label">"Stop-Loss: "</span>
                    {stop_loss}
                </div>
                <div class="take-profit">
                    <span class="level-label">"Take-Profit: "</span>
                    {take_profit}
                </div>
            </div>
        </div>
    }
}

/// Cited sources; renders nothing when the list is empty
#[component]
fn SourceList(sources: Vec<Source>) -> impl IntoView {
    (!sources.is_empty()).then(move || {
        view! {
            <div class="sources">
                <h3>"Fontes"</h3>
                <ul>
                    {sources
                        .into_iter()
                        .map(|source| {
                            view! {
                                <li>
                                    <a href=source.uri target="_blank" rel="noopener noreferrer">
                                        {source.title}
                                    </a>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            </div>
        }
    })
}
