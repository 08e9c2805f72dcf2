use charming::{
    Chart as CharmingChart,
    component::{Axis, Grid, Title},
    element::{
        AxisLabel, AxisType, ItemStyle, LineStyle, LineStyleType, SplitLine, TextStyle, Tooltip,
        Trigger,
    },
    renderer::WasmRenderer,
    series::Line,
};
use gloo::events::EventListener;
use std::rc::Rc;
use web_sys::HtmlElement;
use yew::prelude::*;

use crate::models::metrics::{PerformanceHistory, PerformanceMetric};

#[derive(Properties, PartialEq)]
pub struct PerformanceChartProps {
    pub history: Rc<PerformanceHistory>,
    pub metric: PerformanceMetric,
}

fn chart_id(metric: PerformanceMetric) -> &'static str {
    match metric {
        PerformanceMetric::Cpu => "cpu-chart",
        PerformanceMetric::Memory => "memory-chart",
        PerformanceMetric::Network => "network-chart",
    }
}

#[function_component(PerformanceChart)]
pub fn performance_chart(props: &PerformanceChartProps) -> Html {
    let container_ref = use_node_ref();
    let metric = props.metric;
    let series_data = use_memo((props.history.clone(), metric), |(history, metric)| {
        history.series_data(*metric)
    });

    {
        let container_ref = container_ref.clone();

        use_effect_with(
            (series_data, container_ref, metric),
            |(series_data, container_ref, metric)| {
                let metric = *metric;
                // An empty series leaves the last drawing in place.
                let listener = series_data
                    .is_some()
                    .then(|| container_ref.cast::<HtmlElement>())
                    .flatten()
                    .and_then(|container| {
                        render_chart(&container, series_data, metric);

                        let window = web_sys::window()?;
                        let series_data = series_data.clone();
                        Some(EventListener::new(&window, "resize", move |_| {
                            render_chart(&container, &series_data, metric);
                        }))
                    });

                move || drop(listener)
            },
        );
    }

    html! {
        <div class="chart-container" ref={container_ref}>
            <div id={chart_id(metric)} />
        </div>
    }
}

fn render_chart(
    container: &HtmlElement,
    series_data: &Option<(Vec<String>, Vec<f64>)>,
    metric: PerformanceMetric,
) {
    let width = container.client_width().cast_unsigned();
    let height = container.client_height().cast_unsigned();

    if width == 0 || height == 0 {
        return;
    }

    if let Some(data) = series_data {
        let chart = build_chart(data, metric);
        if let Err(e) = WasmRenderer::new(width, height).render(chart_id(metric), &chart) {
            gloo::console::error!(format!("Render error: {e:?}"));
        }
    }
}

fn build_chart(series_data: &(Vec<String>, Vec<f64>), metric: PerformanceMetric) -> CharmingChart {
    let (x_data, y_data) = series_data;

    let color = match metric {
        PerformanceMetric::Cpu => "#648fff",
        PerformanceMetric::Memory => "#785ef0",
        PerformanceMetric::Network => "#00b4a0",
    };

    CharmingChart::new()
        .title(
            Title::new()
                .text(metric.label())
                .left("center")
                .text_style(TextStyle::new().font_size(14).color("#1f2937")),
        )
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .grid(
            Grid::new()
                .left("8%")
                .right("4%")
                .bottom("15%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(x_data.clone())
                .axis_label(AxisLabel::new().color("#6b7280")),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .name(metric.unit())
                .axis_label(AxisLabel::new().color("#6b7280"))
                .split_line(
                    SplitLine::new().line_style(
                        LineStyle::new()
                            .color("#e5e7eb")
                            .type_(LineStyleType::Dashed),
                    ),
                ),
        )
        .series(
            Line::new()
                .data(y_data.clone())
                .item_style(ItemStyle::new().color(color))
                .line_style(LineStyle::new().color(color)),
        )
}
