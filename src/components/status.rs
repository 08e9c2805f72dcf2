use crate::models::cluster::SectionState;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct StatusProps {
    /// What is being loaded, e.g. "workers".
    pub label: AttrValue,
    #[prop_or_default]
    pub error: Option<AttrValue>,
}

/// Placeholder shown in a section until its data has loaded.
#[function_component(Status)]
pub fn status(props: &StatusProps) -> Html {
    match &props.error {
        None => html! {
            <div class="status loading">
                <div class="spinner"></div>
                <p>{format!("Loading {}...", props.label)}</p>
            </div>
        },
        Some(msg) => html! {
            <div class="status error">
                <p>{format!("Failed to load {}: ", props.label)}{msg}</p>
            </div>
        },
    }
}

/// Renders `Status` for a section that is not loaded, `None` otherwise.
pub fn placeholder<T>(label: &'static str, state: &SectionState<T>) -> Option<Html> {
    match state {
        SectionState::Loaded(_) => None,
        SectionState::Loading => Some(html! { <Status {label} /> }),
        SectionState::Error(msg) => Some(html! {
            <Status {label} error={AttrValue::from(msg.clone())} />
        }),
    }
}
