use std::env;

use crate::interference::DEFAULT_TASK_LABEL;

const CR8S_SERVER_HOST: &str = "localhost";
const CR8S_SERVER_PORT: u16 = 7620;
const INTERFERENCE_METRICS_DIR: &str = "/etc/interferencemetrics";
const INTERFERENCE_RESOURCES: &str = "cpu";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_url: String,
    /// Directory holding one measurement file per task type
    pub metrics_dir: String,
    /// Resource kinds to score on, one plugin each
    pub resources: Vec<String>,
    /// Pod label carrying the task identity
    pub task_label: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let address = lookup("CR8S_SERVER_HOST").unwrap_or_else(|| CR8S_SERVER_HOST.to_string());

        let port = lookup("CR8S_SERVER_PORT")
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(CR8S_SERVER_PORT);

        let metrics_dir = lookup("INTERFERENCE_METRICS_DIR")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| INTERFERENCE_METRICS_DIR.to_string());

        // kept verbatim, unknown kinds are rejected when the tables load
        let resources = lookup("INTERFERENCE_RESOURCES")
            .unwrap_or_else(|| INTERFERENCE_RESOURCES.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let task_label = lookup("INTERFERENCE_TASK_LABEL")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_TASK_LABEL.to_string());

        Self {
            server_url: format!("http://{}:{}", address, port),
            metrics_dir,
            resources,
            task_label,
        }
    }
}
