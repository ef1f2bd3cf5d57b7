use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Metadata ---

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Metadata {
    pub id: Uuid,
    pub name: String,
    /// Free-form labels, workflow engines put task identity here
    #[serde(default)]
    pub labels: HashMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub generation: u16,
}

impl Metadata {
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}

impl Default for Metadata {
    fn default() -> Self {
        let now = Utc::now();
        let id = Uuid::new_v4();
        Metadata {
            id,
            name: id.to_string(),
            labels: HashMap::new(),
            created_at: now,
            modified_at: now,
            generation: 0,
        }
    }
}
