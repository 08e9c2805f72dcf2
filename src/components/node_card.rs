use crate::models::cluster::{NodeKind, NodeView};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct NodeCardProps {
    pub node: NodeView,
    pub on_restart: Callback<(NodeKind, String)>,
    pub on_details: Callback<(NodeKind, String)>,
}

fn usage_bar(label: &'static str, value: f64) -> Html {
    let width = value.clamp(0.0, 100.0);
    let level = if value >= 90.0 {
        "critical"
    } else if value >= 75.0 {
        "high"
    } else {
        "normal"
    };

    html! {
        <div class="usage-row">
            <span class="usage-label">{label}</span>
            <div class="usage-bar">
                <div class={classes!("usage-fill", level)} style={format!("width: {width:.1}%")}></div>
            </div>
            <span class="usage-value">{format!("{value:.1}%")}</span>
        </div>
    }
}

#[function_component(NodeCard)]
pub fn node_card(props: &NodeCardProps) -> Html {
    let node = &props.node;

    let action = |callback: &Callback<(NodeKind, String)>| {
        let callback = callback.clone();
        let target = (node.kind, node.id.clone());
        Callback::from(move |_: MouseEvent| callback.emit(target.clone()))
    };

    html! {
        <div class={classes!("node-card", node.kind.as_str(), node.status.as_str())}>
            <div class="node-header">
                <div>
                    <h4 class="node-hostname">{&node.hostname}</h4>
                    <span class="node-subtitle">{&node.subtitle}</span>
                </div>
                <span class={classes!("status-badge", node.status.as_str())}>
                    {node.status.as_str()}
                </span>
            </div>

            <div class="node-metrics">
                {usage_bar("CPU", node.cpu_usage)}
                {usage_bar("Memory", node.memory_usage)}
                {usage_bar("Disk", node.disk_usage)}
            </div>

            <div class="node-footer">
                <span>{&node.ratio_label}</span>
                <span>{format!("Uptime: {}", node.uptime)}</span>
            </div>

            <div class="node-actions">
                <button class="btn-restart" onclick={action(&props.on_restart)}>{"Restart"}</button>
                <button class="btn-details" onclick={action(&props.on_details)}>{"Details"}</button>
            </div>
        </div>
    }
}
