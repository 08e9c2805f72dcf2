use crate::components::status::placeholder;
use crate::models::cluster::{Overview, SectionState};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct OverviewCardsProps {
    pub overview: SectionState<Overview>,
}

#[function_component(OverviewCards)]
pub fn overview_cards(props: &OverviewCardsProps) -> Html {
    let Some(overview) = props.overview.data() else {
        return placeholder("overview", &props.overview).unwrap_or_default();
    };

    html! {
        <div class="overview-grid">
            <div class="overview-card">
                <h3>{"Managers"}</h3>
                <p class="overview-value">
                    {format!("{}/{}", overview.healthy_managers, overview.total_managers)}
                </p>
                <p class="overview-caption">{"healthy"}</p>
            </div>
            <div class="overview-card">
                <h3>{"Workers"}</h3>
                <p class="overview-value">
                    {format!("{}/{}", overview.healthy_workers, overview.total_workers)}
                </p>
                <p class="overview-caption">{"healthy"}</p>
            </div>
            <div class="overview-card">
                <h3>{"Services"}</h3>
                <p class="overview-value">
                    {format!("{}/{}", overview.running_services, overview.total_services)}
                </p>
                <p class="overview-caption">{"running"}</p>
            </div>
            <div class="overview-card">
                <h3>{"Active Nodes"}</h3>
                <p class="overview-value">{overview.active_ratio()}</p>
                <p class="overview-caption">{"workers"}</p>
            </div>
            <div class={classes!("overview-card", "health", overview.cluster_health.as_str())}>
                <h3>{"Cluster Health"}</h3>
                <p class="overview-value">{overview.cluster_health.to_string()}</p>
            </div>
        </div>
    }
}
