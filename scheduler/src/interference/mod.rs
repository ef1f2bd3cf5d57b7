//! Interference-aware node scoring
//!
//! Coefficients come from one measurement file per task type and are looked up
//! by the sanitized task label of every pod already running on a node.

mod errors;
mod plugin;
mod record;
mod sanitize;
mod table;

pub use errors::{LoadError, ScoreError};
pub use plugin::{
    DEFAULT_TASK_LABEL, InterferencePlugin, MAX_NODE_SCORE, NodeLister, NodeScore,
    normalize_scores,
};
pub use record::InterferenceRecord;
pub use sanitize::sanitize_task_name;
pub use table::{DirectorySource, InterferenceTable, ResourceKind, TableSource};
