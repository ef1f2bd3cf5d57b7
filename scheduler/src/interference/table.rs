use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::errors::LoadError;
use super::record::InterferenceRecord;

/// Entry that mounted config volumes use as the symlink to their current revision
const DATA_SENTINEL: &str = "..data";

/// Resource dimension a table is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// `cpu` field of the record
    Cpu,
    /// Block I/O, `blk` field of the record
    Bio,
}

impl FromStr for ResourceKind {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpu" => Ok(ResourceKind::Cpu),
            "bio" => Ok(ResourceKind::Bio),
            other => Err(LoadError::UnsupportedResourceKind(other.to_string())),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Cpu => write!(f, "cpu"),
            ResourceKind::Bio => write!(f, "bio"),
        }
    }
}

/// Canonical task key to interference coefficient, for a single resource kind.
/// Never mutated once built.
#[derive(Debug, Clone)]
pub struct InterferenceTable {
    kind: ResourceKind,
    coefficients: HashMap<String, f64>,
}

impl InterferenceTable {
    pub fn new(kind: ResourceKind, coefficients: HashMap<String, f64>) -> Self {
        Self { kind, coefficients }
    }

    /// Builds a table by scanning `dir` for measurement files.
    pub fn load(dir: impl AsRef<Path>, resource: &str) -> Result<Self, LoadError> {
        let kind = resource.parse::<ResourceKind>()?;
        DirectorySource::new(dir).load(kind)
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.coefficients.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }
}

/// Where interference records come from. Scoring only ever sees the resulting table.
pub trait TableSource {
    fn load(&self, kind: ResourceKind) -> Result<InterferenceTable, LoadError>;
}

/// One JSON measurement file per task type, file name is the canonical task key.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn read_record(path: &Path) -> Result<InterferenceRecord, String> {
        let content = fs::read(path).map_err(|e| e.to_string())?;
        serde_json::from_slice(&content).map_err(|e| e.to_string())
    }
}

impl TableSource for DirectorySource {
    fn load(&self, kind: ResourceKind) -> Result<InterferenceTable, LoadError> {
        let dir_display = self.dir.display().to_string();
        let entries = fs::read_dir(&self.dir)
            .map_err(|e| LoadError::DirectoryUnreadable(dir_display.clone(), e.to_string()))?;

        let mut coefficients = HashMap::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| LoadError::DirectoryUnreadable(dir_display.clone(), e.to_string()))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name == DATA_SENTINEL {
                continue;
            }

            // follow symlinks, mounted volumes expose files as links into ..data
            let path = entry.path();
            let metadata = fs::metadata(&path)
                .map_err(|e| LoadError::MalformedRecord(name.clone(), e.to_string()))?;
            if !metadata.is_file() {
                tracing::trace!(entry=%name, "Skipping non-regular entry");
                continue;
            }

            let record = Self::read_record(&path)
                .map_err(|msg| LoadError::MalformedRecord(name.clone(), msg))?;
            let coefficient = record.coefficient(kind);
            tracing::trace!(key=%name, %kind, coefficient, "Loaded interference record");
            coefficients.insert(name, coefficient);
        }

        if coefficients.is_empty() {
            return Err(LoadError::NoRecords(dir_display));
        }

        tracing::debug!(dir=%dir_display, %kind, entries = coefficients.len(), "Interference table loaded");
        Ok(InterferenceTable::new(kind, coefficients))
    }
}
