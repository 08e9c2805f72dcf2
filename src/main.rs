use yew::prelude::*;

use cluster_dashboard::components::{
    ConnectionStatus, FilterBar, LiveMetrics, LogPanel, NodeGrid, OverviewCards, PerformanceChart,
    status::placeholder,
};
use cluster_dashboard::hooks::{use_cluster, use_logs, use_performance, use_realtime};
use cluster_dashboard::models::{cluster::NodeFilter, metrics::PerformanceMetric};

#[function_component(App)]
fn app() -> Html {
    let logs = use_logs();
    let realtime = use_realtime(logs.log.clone());
    let cluster = use_cluster(realtime.liveness.clone(), logs.log.clone());
    let performance = use_performance(logs.log.clone());
    let filter = use_state(NodeFilter::default);

    let on_refresh = {
        let refresh = cluster.refresh.clone();
        Callback::from(move |_| refresh.emit(()))
    };

    let on_filter = {
        let filter = filter.clone();
        Callback::from(move |next| filter.set(next))
    };

    let last_update = cluster.last_update.map_or_else(
        || "Never".to_string(),
        |at| at.with_timezone(&chrono::Local).format("%H:%M:%S").to_string(),
    );

    html! {
        <div class="app-container">
            <header class="app-header">
                <h1>{"Cluster Dashboard"}</h1>
                <div class="header-controls">
                    <ConnectionStatus state={realtime.state} on_toggle={realtime.toggle.clone()} />
                    <span class="last-update">{format!("Last update: {last_update}")}</span>
                    <button class="btn-refresh" onclick={on_refresh}>{"Refresh"}</button>
                </div>
            </header>

            <main class="app-main">
                <section class="overview-section">
                    <h2>{"Cluster Overview"}</h2>
                    <OverviewCards overview={cluster.overview.clone()} />
                </section>

                <section class="live-section">
                    <h2>{"Live Metrics"}</h2>
                    <LiveMetrics metrics={realtime.metrics.clone()} state={realtime.state} />
                </section>

                <section class="chart-section">
                    <h2>{"Performance (24h)"}</h2>
                    if let Some(history) = performance.data() {
                        <div class="chart-grid">
                            { for PerformanceMetric::all().iter().map(|&metric| html! {
                                <PerformanceChart history={history.clone()} {metric} />
                            }) }
                        </div>
                    } else {
                        { placeholder("performance data", &performance).unwrap_or_default() }
                    }
                </section>

                <FilterBar filter={*filter} on_change={on_filter} />
                <NodeGrid
                    managers={cluster.managers.clone()}
                    workers={cluster.workers.clone()}
                    filter={*filter}
                    on_restart={cluster.restart.clone()}
                    on_details={cluster.details.clone()}
                />

                <LogPanel entries={logs.entries.clone()} on_clear={logs.clear.clone()} />
            </main>

            <style>
                {include_str!("style.css")}
            </style>
        </div>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
