pub mod connection_status;
pub mod filters;
pub mod live_metrics;
pub mod log_panel;
pub mod node_card;
pub mod node_grid;
pub mod overview;
pub mod performance_chart;
pub mod status;

pub use connection_status::ConnectionStatus;
pub use filters::FilterBar;
pub use live_metrics::LiveMetrics;
pub use log_panel::LogPanel;
pub use node_grid::NodeGrid;
pub use overview::OverviewCards;
pub use performance_chart::PerformanceChart;
