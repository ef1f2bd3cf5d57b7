mod flow;
mod state;

use std::sync::Arc;

use reqwest::Client;
use shared::api::{EventType, NodeEvent, PodEvent};
use shared::utils::watch_stream;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::config::Config;
use crate::interference::InterferencePlugin;

pub use flow::SchedulerFlow;
pub use state::{SchedulerState, State};

pub struct Scheduler {
    state: State,
    client: Client,
    plugins: Vec<InterferencePlugin>,
    tx: mpsc::Sender<Uuid>,
    pods_uri: String,
    nodes_uri: String,
}

impl Scheduler {
    fn new(apiserver: &str, plugins: Vec<InterferencePlugin>) -> (Arc<Self>, mpsc::Receiver<Uuid>) {
        let (tx, rx) = mpsc::channel::<Uuid>(100);
        (
            Arc::new(Self {
                state: SchedulerState::new(apiserver),
                client: Client::new(),
                plugins,
                tx,
                pods_uri: format!("{}/pods?watch=true", apiserver),
                nodes_uri: format!("{}/nodes?watch=true", apiserver),
            }),
            rx,
        )
    }

    /// Watches nodes and pods on the apiserver and schedules every pending pod.
    pub async fn run(config: &Config, plugins: Vec<InterferencePlugin>) {
        tracing::debug!(
            plugins = ?plugins.iter().map(|p| p.name()).collect::<Vec<_>>(),
            "Running"
        );
        let (sched, mut rx) = Scheduler::new(&config.server_url, plugins);

        let _ = tokio::try_join!(
            // Watch nodes
            {
                let sched = sched.clone();
                tokio::spawn(async move {
                    let watcher = sched.clone();
                    watch_stream(&sched.client, &sched.nodes_uri, move |event| {
                        watcher.handle_node_event(event);
                    })
                    .await;
                })
            },
            // Watch pods
            {
                let sched = sched.clone();
                tokio::spawn(async move {
                    let watcher = sched.clone();
                    watch_stream(&sched.client, &sched.pods_uri, move |event| {
                        watcher.handle_pod_event(event);
                    })
                    .await;
                })
            },
            // Pull jobs and schedule pods
            {
                let sched = sched.clone();
                tokio::spawn(async move {
                    while let Some(pod_id) = rx.recv().await {
                        sched.schedule(pod_id).await;
                    }
                })
            }
        );
    }

    async fn schedule(&self, id: Uuid) {
        let pod = match self.state.pods.get(&id) {
            Some(p) if p.spec.node_name.is_empty() => p.clone(),
            Some(_) => {
                tracing::debug!(%id, "Pod already assigned");
                return;
            }
            None => {
                tracing::warn!(%id, "Pod not found in state");
                return;
            }
        };

        let flow = SchedulerFlow::new(&self.state, &self.client, &self.plugins, pod)
            .execute()
            .await;

        if let (true, Some(node)) = (flow.accepted, &flow.chosen) {
            self.state.assign_pod(&id, node);
        } else {
            tracing::error!(%id, "Could not schedule pod");
        }
    }

    fn handle_pod_event(&self, event: PodEvent) {
        let id = event.pod.metadata.id;
        match event.event_type {
            EventType::Added => {
                self.state.add_pod(&event.pod);
                if event.pod.spec.node_name.is_empty() {
                    let _ = self.tx.try_send(id);
                }
            }
            EventType::Modified => {
                if self.state.pods.contains_key(&id) {
                    self.state.assign_pod(&id, &event.pod.spec.node_name);
                }
                self.state.add_pod(&event.pod);
            }
            EventType::Deleted => self.state.delete_pod(&id),
        }
    }

    fn handle_node_event(&self, event: NodeEvent) {
        match event.event_type {
            EventType::Added | EventType::Modified => {
                self.state.add_node(&event.node);
                // pods created before any node was ready are retried here
                for pod_id in self.state.pending_pods() {
                    let res = self.tx.try_send(pod_id);
                    tracing::debug!(%pod_id, ?res, "Requeued pending pod");
                }
            }
            EventType::Deleted => self.state.delete_node(&event.node.name),
        }
    }
}
