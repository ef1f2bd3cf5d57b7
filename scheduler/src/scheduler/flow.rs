use std::collections::{HashMap, HashSet};

use rand::prelude::IndexedRandom;
use reqwest::Client;
use shared::{
    api::{PodField, PodPatch},
    models::pod::Pod,
};

use super::state::State;
use crate::interference::{InterferencePlugin, NodeScore};

/// Scheduling cycle for a single pod: collects candidate nodes, scores them
/// with every plugin, and binds the pod if a node is chosen
pub struct SchedulerFlow<'a> {
    state: State,
    client: &'a Client,
    plugins: &'a [InterferencePlugin],
    pod: Pod,
    candidates: Vec<String>,
    pub totals: Vec<NodeScore>,
    pub chosen: Option<String>,
    pub accepted: bool,
}

impl<'a> SchedulerFlow<'a> {
    pub fn new(state: &State, client: &'a Client, plugins: &'a [InterferencePlugin], pod: Pod) -> Self {
        Self {
            state: state.clone(),
            client,
            plugins,
            pod,
            candidates: Vec::new(),
            totals: Vec::new(),
            chosen: None,
            accepted: false,
        }
    }

    pub async fn execute(self) -> Self {
        self.filter().score().select().bind().await
    }

    /// Every ready node is a candidate.
    fn filter(mut self) -> Self {
        self.candidates = self.state.ready_nodes();
        self.candidates.sort();
        self
    }

    /// Run each plugin over all candidates, normalize per plugin, then sum.
    /// A node any plugin fails to score is dropped for this cycle.
    fn score(mut self) -> Self {
        if self.candidates.is_empty() {
            return self;
        }

        let mut failed: HashSet<String> = HashSet::new();
        let mut per_plugin: Vec<Vec<NodeScore>> = Vec::with_capacity(self.plugins.len());

        for plugin in self.plugins {
            let mut raw = Vec::with_capacity(self.candidates.len());
            for node in &self.candidates {
                match plugin.score(self.state.as_ref(), &self.pod, node) {
                    Ok(score) => raw.push(NodeScore::new(node.clone(), score)),
                    Err(err) => {
                        tracing::warn!(plugin = plugin.name(), %node, error=%err, "Excluding node from cycle");
                        failed.insert(node.clone());
                    }
                }
            }
            per_plugin.push(raw);
        }

        let mut totals: HashMap<String, i64> = self
            .candidates
            .iter()
            .filter(|n| !failed.contains(*n))
            .map(|n| (n.clone(), 0))
            .collect();

        for (plugin, mut scores) in self.plugins.iter().zip(per_plugin) {
            scores.retain(|s| !failed.contains(&s.name));
            plugin.normalize_scores(&mut scores);
            for entry in scores {
                if let Some(total) = totals.get_mut(&entry.name) {
                    *total += entry.score;
                }
            }
        }

        self.totals = totals
            .into_iter()
            .map(|(name, score)| NodeScore::new(name, score))
            .collect();
        self.totals.sort_by(|a, b| a.name.cmp(&b.name));
        self
    }

    /// Highest total wins, ties are broken at random.
    fn select(mut self) -> Self {
        let Some(best) = self.totals.iter().map(|s| s.score).max() else {
            return self;
        };
        let top: Vec<&NodeScore> = self.totals.iter().filter(|s| s.score == best).collect();
        self.chosen = top.choose(&mut rand::rng()).map(|s| s.name.clone());
        self
    }

    /// Bind the pod to the chosen node by patching the API server.
    async fn bind(mut self) -> Self {
        let Some(ref node) = self.chosen else {
            tracing::warn!(pod=%self.pod.metadata.name, "No suitable node found after scoring");
            return self;
        };

        let patch = PodPatch {
            pod_field: PodField::NodeName,
            value: node.clone(),
        };
        let url = format!("{}/{}", self.state.pods_uri, self.pod.metadata.name);

        match self.client.patch(&url).json(&patch).send().await {
            Ok(resp) if resp.status().is_success() => {
                tracing::info!(
                    pod=%self.pod.metadata.name,
                    %node,
                    "Scheduled"
                );
                self.accepted = true;
            }
            Ok(resp) => {
                tracing::error!(
                    status = %resp.status(),
                    "Failed to patch pod: non-success response"
                );
            }
            Err(err) => {
                tracing::error!("Failed to patch pod: {}", err);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interference::{DEFAULT_TASK_LABEL, InterferenceTable, ResourceKind};
    use crate::scheduler::state::SchedulerState;
    use shared::models::node::{Node, NodeStatus};
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn plugin(kind: ResourceKind, entries: &[(&str, f64)]) -> InterferencePlugin {
        InterferencePlugin::new(
            InterferenceTable::new(
                kind,
                entries.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            ),
            DEFAULT_TASK_LABEL,
        )
    }

    fn named_node(name: &str) -> Node {
        Node {
            name: name.to_string(),
            ..Node::default()
        }
    }

    fn place(state: &State, node: &str, task: &str) {
        let mut pod = Pod::with_labels([(DEFAULT_TASK_LABEL, task)]);
        pod.spec.node_name = node.to_string();
        state.add_pod(&pod);
    }

    fn cluster(apiserver: &str) -> State {
        let state = SchedulerState::new(apiserver);
        for name in ["x", "y", "z"] {
            state.add_node(&named_node(name));
        }
        place(&state, "x", "wf:step (A)");
        place(&state, "x", "wf:step (B)");
        place(&state, "y", "wf:step (A)");
        state
    }

    #[tokio::test]
    async fn test_flow_binds_least_interfering_node() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path_regex(r"^/pods/.*$"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let state = cluster(&server.uri());
        let plugins = vec![plugin(
            ResourceKind::Cpu,
            &[("wf.step.A.", 10.0), ("wf.step.B.", 4.0)],
        )];
        let client = Client::new();

        let flow = SchedulerFlow::new(&state, &client, &plugins, Pod::default())
            .execute()
            .await;

        assert_eq!(
            flow.totals,
            vec![
                NodeScore::new("x", 0),
                NodeScore::new("y", 29),
                NodeScore::new("z", 100),
            ]
        );
        assert_eq!(flow.chosen.as_deref(), Some("z"));
        assert!(flow.accepted);
    }

    #[tokio::test]
    async fn test_flow_sums_plugins() {
        let state = cluster("http://127.0.0.1:9");
        let plugins = vec![
            plugin(ResourceKind::Cpu, &[("wf.step.A.", 10.0), ("wf.step.B.", 4.0)]),
            plugin(ResourceKind::Bio, &[("wf.step.B.", 8.0)]),
        ];
        let client = Client::new();

        let flow = SchedulerFlow::new(&state, &client, &plugins, Pod::default())
            .filter()
            .score()
            .select();

        // cpu: x=0 y=29 z=100, bio: x=0 y=100 z=100
        assert_eq!(
            flow.totals,
            vec![
                NodeScore::new("x", 0),
                NodeScore::new("y", 129),
                NodeScore::new("z", 200),
            ]
        );
        assert_eq!(flow.chosen.as_deref(), Some("z"));
    }

    #[tokio::test]
    async fn test_flow_drops_node_removed_mid_cycle() {
        let state = cluster("http://127.0.0.1:9");
        let plugins = vec![
            plugin(ResourceKind::Cpu, &[("wf.step.A.", 10.0), ("wf.step.B.", 4.0)]),
            plugin(ResourceKind::Bio, &[("wf.step.A.", 2.0)]),
        ];
        let client = Client::new();

        let flow = SchedulerFlow::new(&state, &client, &plugins, Pod::default()).filter();
        state.delete_node("y");
        let flow = flow.score().select();

        // y is gone, not zeroed, and x/z still span the full range
        assert_eq!(
            flow.totals,
            vec![NodeScore::new("x", 0), NodeScore::new("z", 200)]
        );
        assert_eq!(flow.chosen.as_deref(), Some("z"));
    }

    #[tokio::test]
    async fn test_flow_skips_stopped_nodes() {
        let state = cluster("http://127.0.0.1:9");
        if let Some(mut z) = state.nodes.get_mut("z") {
            z.status = NodeStatus::Stopped;
        }
        let plugins = vec![plugin(ResourceKind::Cpu, &[("wf.step.A.", 10.0), ("wf.step.B.", 4.0)])];
        let client = Client::new();

        let flow = SchedulerFlow::new(&state, &client, &plugins, Pod::default())
            .filter()
            .score()
            .select();

        assert_eq!(flow.totals.len(), 2);
        assert_eq!(flow.chosen.as_deref(), Some("y"));
    }

    #[tokio::test]
    async fn test_flow_without_interference_picks_any_node() {
        let state = SchedulerState::new("http://127.0.0.1:9");
        state.add_node(&named_node("a"));
        state.add_node(&named_node("b"));
        let plugins = vec![plugin(ResourceKind::Cpu, &[("known", 1.0)])];
        let client = Client::new();

        let flow = SchedulerFlow::new(&state, &client, &plugins, Pod::default())
            .filter()
            .score()
            .select();

        assert!(flow.totals.iter().all(|s| s.score == 0));
        assert!(matches!(flow.chosen.as_deref(), Some("a") | Some("b")));
    }

    #[tokio::test]
    async fn test_flow_without_nodes_does_not_bind() {
        let state = SchedulerState::new("http://127.0.0.1:9");
        let plugins = vec![plugin(ResourceKind::Cpu, &[])];
        let client = Client::new();

        let flow = SchedulerFlow::new(&state, &client, &plugins, Pod::default())
            .execute()
            .await;

        assert!(flow.totals.is_empty());
        assert!(flow.chosen.is_none());
        assert!(!flow.accepted);
    }

    #[tokio::test]
    async fn test_flow_rejected_patch_is_not_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(409))
            .mount(&server)
            .await;

        let state = cluster(&server.uri());
        let plugins = vec![plugin(ResourceKind::Cpu, &[("wf.step.A.", 10.0)])];
        let client = Client::new();

        let flow = SchedulerFlow::new(&state, &client, &plugins, Pod::default())
            .execute()
            .await;

        assert!(flow.chosen.is_some());
        assert!(!flow.accepted);
    }
}
