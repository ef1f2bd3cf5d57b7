use serde::{Deserialize, Serialize};

use crate::models::{node::Node, pod::Pod};

// ============================= EVENTS

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PodEvent {
    pub event_type: EventType,
    pub pod: Pod,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeEvent {
    pub event_type: EventType,
    pub node: Node,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum EventType {
    Added,
    Deleted,
    Modified,
}

// ============================= POD PATCH

#[derive(Deserialize, Serialize, Debug)]
pub struct PodPatch {
    pub pod_field: PodField,
    pub value: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub enum PodField {
    #[serde(rename = "node_name")]
    NodeName,
}
