use crate::components::{node_card::NodeCard, status::placeholder};
use crate::models::cluster::{
    KindFilter, Manager, NodeFilter, NodeKind, NodeView, SectionState, Worker,
};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct NodeGridProps {
    pub managers: SectionState<Vec<Manager>>,
    pub workers: SectionState<Vec<Worker>>,
    pub filter: NodeFilter,
    pub on_restart: Callback<(NodeKind, String)>,
    pub on_details: Callback<(NodeKind, String)>,
}

/// Cards left after the status and type filter, in backend order.
pub fn visible_nodes(nodes: Vec<NodeView>, filter: NodeFilter) -> Vec<NodeView> {
    nodes.into_iter().filter(|node| filter.shows(node)).collect()
}

/// Manager and worker cards, each section loading and failing on its own.
#[function_component(NodeGrid)]
pub fn node_grid(props: &NodeGridProps) -> Html {
    let show_managers = props.filter.kind != KindFilter::Workers;
    let show_workers = props.filter.kind != KindFilter::Managers;

    let section = |title: &'static str, label: &'static str, nodes: Option<Vec<NodeView>>, fallback: Option<Html>| {
        let body = match (nodes, fallback) {
            (Some(nodes), _) => {
                let cards = visible_nodes(nodes, props.filter);
                if cards.is_empty() {
                    html! { <p class="empty">{format!("No {label} match the current filter")}</p> }
                } else {
                    html! {
                        <div class="node-grid">
                            { for cards.into_iter().map(|node| {
                                let key = node.id.clone();
                                html! {
                                    <NodeCard
                                        key={key}
                                        {node}
                                        on_restart={props.on_restart.clone()}
                                        on_details={props.on_details.clone()}
                                    />
                                }
                            }) }
                        </div>
                    }
                }
            }
            (None, fallback) => fallback.unwrap_or_default(),
        };

        html! {
            <section class="nodes-section">
                <h2>{title}</h2>
                {body}
            </section>
        }
    };

    let managers: Option<Vec<NodeView>> = props
        .managers
        .data()
        .map(|list| list.iter().map(NodeView::from).collect());
    let workers: Option<Vec<NodeView>> = props
        .workers
        .data()
        .map(|list| list.iter().map(NodeView::from).collect());

    html! {
        <>
            if show_managers {
                {section("Managers", "managers", managers, placeholder("managers", &props.managers))}
            }
            if show_workers {
                {section("Workers", "workers", workers, placeholder("workers", &props.workers))}
            }
        </>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cluster::{NodeStatus, StatusFilter};

    fn view(id: &str, kind: NodeKind, status: NodeStatus) -> NodeView {
        NodeView {
            kind,
            id: id.to_string(),
            hostname: format!("host-{id}"),
            subtitle: String::new(),
            status,
            cpu_usage: 0.0,
            memory_usage: 0.0,
            disk_usage: 0.0,
            ratio_label: String::new(),
            uptime: "0m".to_string(),
        }
    }

    #[test]
    fn test_visible_nodes_keep_order_and_ids() {
        let nodes = vec![
            view("wkr-1", NodeKind::Worker, NodeStatus::Failed),
            view("wkr-2", NodeKind::Worker, NodeStatus::Healthy),
            view("wkr-3", NodeKind::Worker, NodeStatus::Failed),
        ];
        let filter = NodeFilter {
            status: StatusFilter::Failed,
            kind: KindFilter::All,
        };

        let ids: Vec<_> = visible_nodes(nodes, filter)
            .into_iter()
            .map(|node| node.id)
            .collect();
        assert_eq!(ids, vec!["wkr-1", "wkr-3"]);
    }
}
