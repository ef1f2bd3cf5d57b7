use std::fmt;
use std::path::Path;

use shared::models::pod::Pod;

use super::errors::{LoadError, ScoreError};
use super::sanitize::sanitize_task_name;
use super::table::{DirectorySource, InterferenceTable, ResourceKind, TableSource};

/// Upper bound of the node score range
pub const MAX_NODE_SCORE: i64 = 100;

/// Label workflow engines stamp on task pods
pub const DEFAULT_TASK_LABEL: &str = "nextflow.io/taskName";

/// Read access to the pods currently placed on a node.
pub trait NodeLister {
    /// `None` when the node is not part of the snapshot
    fn pods_on_node(&self, node_name: &str) -> Option<Vec<Pod>>;
}

/// Score entry for one candidate node in a scheduling cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeScore {
    pub name: String,
    pub score: i64,
}

impl NodeScore {
    pub fn new(name: impl Into<String>, score: i64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

impl fmt::Display for NodeScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.score)
    }
}

/// Score plugin favoring nodes whose resident tasks are known to interfere the
/// least on one resource kind.
#[derive(Debug)]
pub struct InterferencePlugin {
    table: InterferenceTable,
    task_label: String,
}

impl InterferencePlugin {
    pub fn new(table: InterferenceTable, task_label: impl Into<String>) -> Self {
        Self {
            table,
            task_label: task_label.into(),
        }
    }

    /// Loads the table for `resource` from a measurement directory.
    pub fn from_dir(
        dir: impl AsRef<Path>,
        resource: &str,
        task_label: impl Into<String>,
    ) -> Result<Self, LoadError> {
        let kind = resource.parse::<ResourceKind>()?;
        Self::from_source(&DirectorySource::new(dir), kind, task_label)
    }

    pub fn from_source(
        source: &dyn TableSource,
        kind: ResourceKind,
        task_label: impl Into<String>,
    ) -> Result<Self, LoadError> {
        Ok(Self::new(source.load(kind)?, task_label))
    }

    pub fn name(&self) -> &'static str {
        match self.table.kind() {
            ResourceKind::Cpu => "InterferenceCPU",
            ResourceKind::Bio => "InterferenceBIO",
        }
    }

    /// Raw interference on `node_name`: sum of the coefficients of every resident
    /// task, rounded. Higher means more interference.
    pub fn score(
        &self,
        lister: &dyn NodeLister,
        pod: &Pod,
        node_name: &str,
    ) -> Result<i64, ScoreError> {
        let pods = lister
            .pods_on_node(node_name)
            .ok_or_else(|| ScoreError::NodeLookupFailed(node_name.to_string()))?;

        tracing::debug!(plugin = self.name(), node=%node_name, "Collecting scores");
        let mut total = 0.0;
        for resident in &pods {
            let Some(task_name) = resident.metadata.label(&self.task_label) else {
                tracing::debug!(plugin = self.name(), pod=%resident.metadata.name, "Skipping untracked pod");
                continue;
            };
            let key = sanitize_task_name(task_name);
            match self.table.get(&key) {
                Some(coefficient) => {
                    tracing::trace!(plugin = self.name(), %key, coefficient, "Matched interference key");
                    total += coefficient;
                }
                None => tracing::trace!(plugin = self.name(), %key, "No interference record"),
            }
        }

        let score = total.round() as i64;
        tracing::debug!(
            plugin = self.name(),
            node=%node_name,
            pod=%pod.metadata.name,
            score,
            "Node scored"
        );
        Ok(score)
    }

    /// Rescales the raw scores of one cycle so the most interfered node ends at 0
    /// and an interference-free node at `MAX_NODE_SCORE`.
    pub fn normalize_scores(&self, scores: &mut [NodeScore]) {
        normalize_scores(scores);
        tracing::debug!(
            plugin = self.name(),
            scores=%scores.iter().map(ToString::to_string).collect::<Vec<_>>().join(","),
            "Nodes final score"
        );
    }
}

/// Inverting min-max rescale. Leaves everything untouched when no node has a
/// positive score.
pub fn normalize_scores(scores: &mut [NodeScore]) {
    let highest = scores.iter().map(|s| s.score).fold(0, i64::max);
    if highest <= 0 {
        return;
    }
    // widened so huge coefficients cannot overflow the product
    let (max, highest) = (MAX_NODE_SCORE as i128, highest as i128);
    for entry in scores.iter_mut() {
        let scaled = max - (entry.score as i128 * max / highest);
        entry.score = scaled.clamp(i64::MIN as i128, i64::MAX as i128) as i64;
    }
}
