use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a node in the cluster.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Node {
    pub id: Uuid,
    pub name: String,
    pub status: NodeStatus,
    pub addr: String,
    pub started_at: DateTime<Utc>,
    pub last_heartbeat: DateTime<Utc>,
}

/// Status of a node in the cluster.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum NodeStatus {
    Ready,
    Running,
    Stopped,
}

impl Default for Node {
    fn default() -> Self {
        let now = Utc::now();
        let id = Uuid::new_v4();
        Node {
            id,
            name: format!("node-{}", id),
            status: NodeStatus::Ready,
            addr: "127.0.0.1:0".to_string(),
            started_at: now,
            last_heartbeat: now,
        }
    }
}
