use serde::Deserialize;
use std::fmt;
use std::rc::Rc;

/// Overall health reported by `/api/analytics/overview`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterHealth {
    Healthy,
    Warning,
    Degraded,
    Critical,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ClusterHealth {
    /// Lowercase name, also used as the CSS class of the health indicator.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterHealth::Healthy => "healthy",
            ClusterHealth::Warning => "warning",
            ClusterHealth::Degraded => "degraded",
            ClusterHealth::Critical => "critical",
            ClusterHealth::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ClusterHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Overview {
    pub healthy_managers: u32,
    pub total_managers: u32,
    pub healthy_workers: u32,
    pub total_workers: u32,
    pub running_services: u32,
    pub total_services: u32,
    #[serde(default)]
    pub cluster_health: ClusterHealth,
}

impl Overview {
    /// Healthy over total workers, e.g. `4/5`.
    pub fn active_ratio(&self) -> String {
        format!("{}/{}", self.healthy_workers, self.total_workers)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Healthy,
    Degraded,
    Failed,
    Draining,
    #[default]
    #[serde(other)]
    Unknown,
}

impl NodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Healthy => "healthy",
            NodeStatus::Degraded => "degraded",
            NodeStatus::Failed => "failed",
            NodeStatus::Draining => "draining",
            NodeStatus::Unknown => "unknown",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerPool {
    Web,
    Api,
    Database,
    #[default]
    Worker,
    #[serde(other)]
    Custom,
}

impl WorkerPool {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerPool::Web => "web",
            WorkerPool::Api => "api",
            WorkerPool::Database => "database",
            WorkerPool::Worker => "worker",
            WorkerPool::Custom => "custom",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Manager {
    pub id: String,
    pub hostname: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub status: NodeStatus,
    #[serde(default)]
    pub cpu_usage: f64,
    #[serde(default)]
    pub memory_usage: f64,
    #[serde(default)]
    pub disk_usage: f64,
    #[serde(default)]
    pub healthy_workers: u32,
    #[serde(default)]
    pub managed_workers: u32,
    #[serde(default)]
    pub uptime_seconds: u64,
}

fn default_role() -> String {
    "primary".to_string()
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Worker {
    pub id: String,
    pub hostname: String,
    #[serde(default)]
    pub pool: WorkerPool,
    #[serde(default)]
    pub status: NodeStatus,
    #[serde(default)]
    pub cpu_usage: f64,
    #[serde(default)]
    pub memory_usage: f64,
    #[serde(default)]
    pub disk_usage: f64,
    #[serde(default)]
    pub healthy_services: u32,
    #[serde(default)]
    pub total_services: u32,
    #[serde(default)]
    pub uptime_seconds: u64,
}

/// Which kind of node a card or REST path refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Manager,
    Worker,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Manager => "manager",
            NodeKind::Worker => "worker",
        }
    }

    /// Collection segment of the REST path (`/api/{segment}/`).
    pub fn collection(&self) -> &'static str {
        match self {
            NodeKind::Manager => "managers",
            NodeKind::Worker => "workers",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RestartResponse {
    pub message: String,
}

/// Per-section render state. A failed fetch only affects its own section.
#[derive(Clone, PartialEq, Debug)]
pub enum SectionState<T> {
    Loading,
    Loaded(Rc<T>),
    Error(String),
}

impl<T> SectionState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, SectionState::Loading)
    }

    pub fn data(&self) -> Option<&Rc<T>> {
        match self {
            SectionState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SectionState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

impl<T, E: fmt::Display> From<Result<T, E>> for SectionState<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => SectionState::Loaded(Rc::new(data)),
            Err(e) => SectionState::Error(e.to_string()),
        }
    }
}

/// Card-ready view of a manager or worker.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeView {
    pub kind: NodeKind,
    pub id: String,
    pub hostname: String,
    /// Role for managers, pool for workers.
    pub subtitle: String,
    pub status: NodeStatus,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_usage: f64,
    pub ratio_label: String,
    pub uptime: String,
}

impl From<&Manager> for NodeView {
    fn from(m: &Manager) -> Self {
        Self {
            kind: NodeKind::Manager,
            id: m.id.clone(),
            hostname: m.hostname.clone(),
            subtitle: m.role.clone(),
            status: m.status,
            cpu_usage: m.cpu_usage,
            memory_usage: m.memory_usage,
            disk_usage: m.disk_usage,
            ratio_label: format!("Workers: {}/{}", m.healthy_workers, m.managed_workers),
            uptime: format_uptime(m.uptime_seconds),
        }
    }
}

impl From<&Worker> for NodeView {
    fn from(w: &Worker) -> Self {
        Self {
            kind: NodeKind::Worker,
            id: w.id.clone(),
            hostname: w.hostname.clone(),
            subtitle: w.pool.as_str().to_string(),
            status: w.status,
            cpu_usage: w.cpu_usage,
            memory_usage: w.memory_usage,
            disk_usage: w.disk_usage,
            ratio_label: format!("Services: {}/{}", w.healthy_services, w.total_services),
            uptime: format_uptime(w.uptime_seconds),
        }
    }
}

/// Formats an uptime as `Nd Nh`, `Nh Nm` or `Nm`.
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let mins = (seconds % 3_600) / 60;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Healthy,
    Degraded,
    Failed,
}

impl StatusFilter {
    pub fn all() -> &'static [StatusFilter] {
        &[
            StatusFilter::All,
            StatusFilter::Healthy,
            StatusFilter::Degraded,
            StatusFilter::Failed,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Healthy => "Healthy",
            StatusFilter::Degraded => "Degraded",
            StatusFilter::Failed => "Failed",
        }
    }

    fn matches(&self, status: NodeStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Healthy => status == NodeStatus::Healthy,
            StatusFilter::Degraded => status == NodeStatus::Degraded,
            StatusFilter::Failed => status == NodeStatus::Failed,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KindFilter {
    #[default]
    All,
    Managers,
    Workers,
}

impl KindFilter {
    pub fn all() -> &'static [KindFilter] {
        &[KindFilter::All, KindFilter::Managers, KindFilter::Workers]
    }

    pub fn label(&self) -> &'static str {
        match self {
            KindFilter::All => "All",
            KindFilter::Managers => "Managers",
            KindFilter::Workers => "Workers",
        }
    }

    fn matches(&self, kind: NodeKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Managers => kind == NodeKind::Manager,
            KindFilter::Workers => kind == NodeKind::Worker,
        }
    }
}

/// Status and type filter applied to node cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct NodeFilter {
    pub status: StatusFilter,
    pub kind: KindFilter,
}

impl NodeFilter {
    pub fn matches(&self, kind: NodeKind, status: NodeStatus) -> bool {
        self.status.matches(status) && self.kind.matches(kind)
    }

    pub fn shows(&self, node: &NodeView) -> bool {
        self.matches(node.kind, node.status)
    }
}
