use serde::Deserialize;

use super::table::ResourceKind;

/// Measured interference profile of one task type, as stored in a measurement file.
/// Missing fields read as zero.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InterferenceRecord {
    pub cpu: f64,
    pub llc: f64,
    pub mem: f64,
    pub blk: f64,
    pub netpr: f64,
    pub netbw: f64,
}

impl InterferenceRecord {
    /// Coefficient tracked for the given resource kind
    pub fn coefficient(&self, kind: ResourceKind) -> f64 {
        match kind {
            ResourceKind::Cpu => self.cpu,
            ResourceKind::Bio => self.blk,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_zero() {
        let record: InterferenceRecord = serde_json::from_str(r#"{"cpu": 1.5}"#).unwrap();
        assert_eq!(record.cpu, 1.5);
        assert_eq!(record.blk, 0.0);
        assert_eq!(record.netbw, 0.0);
    }

    #[test]
    fn test_coefficient_selects_field() {
        let record: InterferenceRecord =
            serde_json::from_str(r#"{"cpu": 2.0, "llc": 3.0, "mem": 4.0, "blk": 7.25}"#).unwrap();
        assert_eq!(record.coefficient(ResourceKind::Cpu), 2.0);
        assert_eq!(record.coefficient(ResourceKind::Bio), 7.25);
    }
}
