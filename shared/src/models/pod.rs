use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::metadata::Metadata;

// --- Core ---

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Pod {
    pub metadata: Metadata,
    pub spec: PodSpec,
    pub status: PodStatus,
}

/// Desired state
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PodSpec {
    pub node_name: String,
    pub containers: Vec<ContainerSpec>,
}

/// Actual state
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PodStatus {
    pub phase: PodPhase,
    pub last_update: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum PodPhase {
    Pending,
    Running,
    Unknown,
    Failed,
    Succeeded,
}

/// Definition of a container within a Pod.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
}

// --- Impl ---

impl Pod {
    /// Pending pod carrying the given labels, handy for building snapshots
    pub fn with_labels<I, K, V>(labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut pod = Pod::default();
        pod.metadata.labels = labels
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        pod
    }
}

impl Default for PodStatus {
    fn default() -> Self {
        PodStatus {
            phase: PodPhase::Pending,
            last_update: None,
        }
    }
}

impl Default for ContainerSpec {
    fn default() -> Self {
        ContainerSpec {
            name: "test-container".to_string(),
            image: "busybox:latest".to_string(),
        }
    }
}

impl Default for PodSpec {
    fn default() -> Self {
        PodSpec {
            node_name: "".to_string(),
            containers: vec![ContainerSpec::default()],
        }
    }
}
