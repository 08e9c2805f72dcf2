use super::error::AppError;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

const METRICS_UPDATE: &str = "metrics_update";

/// Accepts RFC 3339 timestamps as well as offset-less ISO timestamps, which
/// are taken to be UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, AppError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| AppError::DataError(format!("Invalid timestamp {raw:?}: {e}")))
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TimeSeriesPoint {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PerformanceMetric {
    Cpu,
    Memory,
    Network,
}

impl PerformanceMetric {
    pub fn all() -> &'static [PerformanceMetric] {
        &[
            PerformanceMetric::Cpu,
            PerformanceMetric::Memory,
            PerformanceMetric::Network,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceMetric::Cpu => "CPU Usage",
            PerformanceMetric::Memory => "Memory Usage",
            PerformanceMetric::Network => "Network Throughput",
        }
    }

    /// Axis name of the chart.
    pub fn unit(&self) -> &'static str {
        match self {
            PerformanceMetric::Cpu | PerformanceMetric::Memory => "%",
            PerformanceMetric::Network => "MB/s",
        }
    }
}

/// Time-series payload of `/api/analytics/performance`.
#[derive(Clone, Debug, PartialEq, Default, Deserialize)]
pub struct PerformanceHistory {
    #[serde(default)]
    pub cpu_history: Vec<TimeSeriesPoint>,
    #[serde(default)]
    pub memory_history: Vec<TimeSeriesPoint>,
    #[serde(default)]
    pub network_history: Vec<TimeSeriesPoint>,
}

impl PerformanceHistory {
    pub fn points(&self, metric: PerformanceMetric) -> &[TimeSeriesPoint] {
        match metric {
            PerformanceMetric::Cpu => &self.cpu_history,
            PerformanceMetric::Memory => &self.memory_history,
            PerformanceMetric::Network => &self.network_history,
        }
    }

    /// Chart labels and values for one metric, ordered by timestamp.
    /// Returns `None` for an empty series so the chart keeps what it shows.
    pub fn series_data(&self, metric: PerformanceMetric) -> Option<(Vec<String>, Vec<f64>)> {
        let points = self.points(metric);
        if points.is_empty() {
            return None;
        }

        let mut sorted = points.to_vec();
        sorted.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

        let x_data = sorted
            .iter()
            .map(|p| p.timestamp.format("%H:%M").to_string())
            .collect();
        let y_data = sorted.iter().map(|p| p.value).collect();

        Some((x_data, y_data))
    }
}

/// Payload of a `metrics_update` push frame.
#[derive(Clone, Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RealtimeMetrics {
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_usage: f64,
    pub network_in: f64,
    pub network_out: f64,
    pub total_nodes: u32,
    pub total_services: u32,
}

/// Inbound push-channel event.
#[derive(Clone, Debug, PartialEq)]
pub enum MetricEvent {
    MetricsUpdate(RealtimeMetrics),
    /// Any frame whose `type` is not recognized. Ignored by consumers.
    Other(serde_json::Value),
}

impl MetricEvent {
    /// Parses a text frame. Fails only when the frame is not JSON or a
    /// `metrics_update` frame carries an unreadable payload.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let frame: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| AppError::DataError(format!("Malformed frame: {e}")))?;

        let is_update = frame
            .get("type")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|t| t == METRICS_UPDATE);
        if !is_update {
            return Ok(MetricEvent::Other(frame));
        }

        let data = frame
            .get("data")
            .cloned()
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));
        RealtimeMetrics::deserialize(data)
            .map(MetricEvent::MetricsUpdate)
            .map_err(|e| AppError::DataError(format!("Malformed metrics_update: {e}")))
    }
}
