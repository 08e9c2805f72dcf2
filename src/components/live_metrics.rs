use crate::models::metrics::RealtimeMetrics;
use crate::realtime::ConnectionState;
use std::rc::Rc;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LiveMetricsProps {
    pub metrics: Option<Rc<RealtimeMetrics>>,
    pub state: ConnectionState,
}

#[function_component(LiveMetrics)]
pub fn live_metrics(props: &LiveMetricsProps) -> Html {
    let Some(metrics) = &props.metrics else {
        let hint = if props.state.is_live() {
            "Waiting for the first update..."
        } else {
            "Connect to receive live metrics"
        };
        return html! {
            <div class="live-metrics empty">
                <p>{hint}</p>
            </div>
        };
    };

    let items = [
        ("CPU", format!("{:.1}%", metrics.cpu_usage)),
        ("Memory", format!("{:.1}%", metrics.memory_usage)),
        ("Disk", format!("{:.1}%", metrics.disk_usage)),
        ("Network In", format!("{:.2} MB/s", metrics.network_in)),
        ("Network Out", format!("{:.2} MB/s", metrics.network_out)),
        ("Nodes", metrics.total_nodes.to_string()),
        ("Services", metrics.total_services.to_string()),
    ];

    html! {
        <div class={classes!("live-metrics", (!props.state.is_live()).then_some("stale"))}>
            { for items.into_iter().map(|(label, value)| html! {
                <div class="live-metric">
                    <span class="live-label">{label}</span>
                    <span class="live-value">{value}</span>
                </div>
            }) }
        </div>
    }
}
