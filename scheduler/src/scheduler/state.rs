use dashmap::{DashMap, DashSet};
use shared::models::{
    node::{Node, NodeStatus},
    pod::Pod,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::interference::NodeLister;

const UNASSIGNED_NODE: &str = "";

pub type State = Arc<SchedulerState>;

/// In-memory snapshot of the cluster shared across tasks.
#[derive(Debug)]
pub struct SchedulerState {
    pub nodes: DashMap<String, Node>,
    pub pods: DashMap<Uuid, Pod>,
    /// Node name to the pods placed on it, unassigned pods live under ""
    pub pod_map: DashMap<String, DashSet<Uuid>>,
    pub pods_uri: String,
}

impl SchedulerState {
    pub fn new(apiserver: &str) -> State {
        Arc::new(Self {
            nodes: DashMap::new(),
            pods: DashMap::new(),
            pod_map: DashMap::new(),
            pods_uri: format!("{}/pods", apiserver),
        })
    }

    /// Track a pod under its current node (or as pending).
    pub fn add_pod(&self, pod: &Pod) {
        self.pods.insert(pod.metadata.id, pod.clone());
        self.pod_map
            .entry(pod.spec.node_name.clone())
            .or_insert_with(DashSet::new)
            .insert(pod.metadata.id);
    }

    pub fn add_node(&self, node: &Node) {
        self.nodes.insert(node.name.clone(), node.clone());
        self.pod_map
            .entry(node.name.clone())
            .or_insert_with(DashSet::new);
    }

    /// Forget a node. Its pods stay tracked until their own delete events arrive,
    /// an empty bucket is dropped right away.
    pub fn delete_node(&self, name: &str) {
        if self.nodes.remove(name).is_none() {
            tracing::warn!(node=%name, "Failed to delete node");
        }
        self.pod_map.remove_if(name, |_, set| set.is_empty());
    }

    pub fn delete_pod(&self, id: &Uuid) {
        if let Some((_, pod)) = self.pods.remove(id) {
            let node = &pod.spec.node_name;
            if let Some(set) = self.pod_map.get(node) {
                set.remove(id);
            }
            // last resident of a node that is already gone
            if !node.is_empty() && !self.nodes.contains_key(node) {
                self.pod_map.remove_if(node, |_, set| set.is_empty());
            }
        } else {
            tracing::warn!(%id, "Failed to delete pod");
        }
    }

    pub fn assign_pod(&self, id: &Uuid, node: &str) {
        let Some(current_node) = self.pods.get(id).map(|pod| pod.spec.node_name.clone()) else {
            return;
        };

        if let Some(set) = self.pod_map.get(&current_node) {
            set.remove(id);
        }
        self.pod_map
            .entry(node.to_string())
            .or_insert_with(DashSet::new)
            .insert(*id);

        if let Some(mut pod) = self.pods.get_mut(id) {
            pod.spec.node_name = node.to_string();
        }
    }

    pub fn pending_pods(&self) -> Vec<Uuid> {
        self.pod_map
            .get(UNASSIGNED_NODE)
            .map(|set| set.iter().map(|id| *id).collect())
            .unwrap_or_default()
    }

    /// Names of nodes able to take new pods
    pub fn ready_nodes(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|entry| entry.value().status == NodeStatus::Ready)
            .map(|entry| entry.key().clone())
            .collect()
    }
}

impl NodeLister for SchedulerState {
    fn pods_on_node(&self, node_name: &str) -> Option<Vec<Pod>> {
        if !self.nodes.contains_key(node_name) {
            return None;
        }
        let pods = self
            .pod_map
            .get(node_name)
            .map(|set| {
                set.iter()
                    .filter_map(|id| self.pods.get(&*id).map(|p| p.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Some(pods)
    }
}
