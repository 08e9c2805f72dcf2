use crate::realtime::ConnectionState;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ConnectionStatusProps {
    pub state: ConnectionState,
    pub on_toggle: Callback<()>,
}

/// Connection indicator with the connect/disconnect toggle.
#[function_component(ConnectionStatus)]
pub fn connection_status(props: &ConnectionStatusProps) -> Html {
    let label = match props.state {
        ConnectionState::Disconnected | ConnectionState::GivenUp => "Connect",
        ConnectionState::Connecting
        | ConnectionState::Connected
        | ConnectionState::Reconnecting => "Disconnect",
    };

    let onclick = {
        let toggle = props.on_toggle.clone();
        Callback::from(move |_| toggle.emit(()))
    };

    html! {
        <div class="connection-status">
            <span class={classes!("status-dot", props.state.css_class())}></span>
            <span class="status-text">{props.state.label()}</span>
            <button class="connection-toggle" {onclick} title={label}>
                {label}
            </button>
        </div>
    }
}
