use crate::models::logs::LogEntry;
use std::rc::Rc;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LogPanelProps {
    pub entries: Rc<Vec<LogEntry>>,
    pub on_clear: Callback<()>,
}

/// Operator log, newest entry first.
#[function_component(LogPanel)]
pub fn log_panel(props: &LogPanelProps) -> Html {
    let onclick = {
        let clear = props.on_clear.clone();
        Callback::from(move |_| clear.emit(()))
    };

    html! {
        <section class="log-section">
            <div class="log-header">
                <h2>{"Activity Log"}</h2>
                <button class="btn-clear" {onclick}>{"Clear Logs"}</button>
            </div>
            <div class="log-container">
                { for props.entries.iter().rev().map(|entry| html! {
                    <div class={classes!("log-entry", entry.level.as_str())}>
                        <span class="log-time">{entry.timestamp.format("%H:%M:%S").to_string()}</span>
                        <span class="log-level">{entry.level.as_str().to_uppercase()}</span>
                        <span class="log-message">{&entry.message}</span>
                    </div>
                }) }
            </div>
        </section>
    }
}
