use std::fmt;

/// Errors raised while building an interference table. All of them are fatal
/// for the plugin that requested the table.
#[derive(Debug)]
pub enum LoadError {
    /// Measurement directory could not be listed
    DirectoryUnreadable(String, String),
    /// A measurement file could not be read or decoded
    MalformedRecord(String, String),
    /// Resource kind other than `cpu` or `bio`
    UnsupportedResourceKind(String),
    /// Directory holds no measurement file at all
    NoRecords(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::DirectoryUnreadable(path, msg) => {
                write!(f, "Reading directory {}: {}", path, msg)
            }
            LoadError::MalformedRecord(name, msg) => write!(f, "Reading {}: {}", name, msg),
            LoadError::UnsupportedResourceKind(kind) => {
                write!(f, "Unsupported resource {}", kind)
            }
            LoadError::NoRecords(path) => write!(f, "No interference records in {}", path),
        }
    }
}

impl std::error::Error for LoadError {}

/// Per-node scoring failure, only affects that node for the current cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreError {
    NodeLookupFailed(String),
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::NodeLookupFailed(node) => {
                write!(f, "Getting node {:?} from snapshot: not found", node)
            }
        }
    }
}

impl std::error::Error for ScoreError {}
