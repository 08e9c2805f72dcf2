use crate::models::cluster::{KindFilter, NodeFilter, StatusFilter};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct FilterBarProps {
    pub filter: NodeFilter,
    pub on_change: Callback<NodeFilter>,
}

/// Status and type filter buttons for the node cards.
#[function_component(FilterBar)]
pub fn filter_bar(props: &FilterBarProps) -> Html {
    let filter = props.filter;

    let status_buttons = StatusFilter::all().iter().map(|&status| {
        let on_change = props.on_change.clone();
        let onclick = Callback::from(move |_| on_change.emit(NodeFilter { status, ..filter }));
        html! {
            <button
                class={classes!("filter-btn", (filter.status == status).then_some("active"))}
                {onclick}
            >
                {status.label()}
            </button>
        }
    });

    let kind_buttons = KindFilter::all().iter().map(|&kind| {
        let on_change = props.on_change.clone();
        let onclick = Callback::from(move |_| on_change.emit(NodeFilter { kind, ..filter }));
        html! {
            <button
                class={classes!("filter-btn", (filter.kind == kind).then_some("active"))}
                {onclick}
            >
                {kind.label()}
            </button>
        }
    });

    html! {
        <div class="filter-bar">
            <div class="filter-group">
                <span class="filter-label">{"Status:"}</span>
                { for status_buttons }
            </div>
            <div class="filter-group">
                <span class="filter-label">{"Type:"}</span>
                { for kind_buttons }
            </div>
        </div>
    }
}
