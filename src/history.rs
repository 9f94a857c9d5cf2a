use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::{FlightRecorder, SimulationRecord};
use crate::error::{LabError, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: u64,
    #[serde(flatten)]
    pub record: SimulationRecord,
    pub timestamp: DateTime<Utc>,
}

/// Completed simulations, oldest first in storage.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationHistory {
    #[serde(default)]
    next_id: u64,
    entries: Vec<HistoryEntry>,
}

impl SimulationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: SimulationRecord) -> Result<u64> {
        self.add_at(record, Utc::now())
    }

    pub fn add_at(&mut self, record: SimulationRecord, timestamp: DateTime<Utc>) -> Result<u64> {
        validate(&record)?;
        self.next_id += 1;
        let id = self.next_id;
        self.entries.push(HistoryEntry {
            id,
            record,
            timestamp,
        });
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Newest first, at most `limit` entries.
    pub fn recent(&self, limit: usize) -> Vec<&HistoryEntry> {
        let mut entries: Vec<&HistoryEntry> = self.entries.iter().collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        entries.truncate(limit);
        entries
    }

    pub fn delete(&mut self, id: u64) -> Result<HistoryEntry> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(LabError::NotFound(id))?;
        Ok(self.entries.remove(index))
    }

    /// Removes every entry and returns how many were dropped. Ids keep
    /// increasing afterwards.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    /// Reads a history file. A file that does not exist yet is an empty
    /// history.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(source) if source.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no history file yet");
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(LabError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut history: Self = serde_json::from_str(&text)?;
        let max_id = history.entries.iter().map(|e| e.id).max().unwrap_or(0);
        history.next_id = history.next_id.max(max_id);
        Ok(history)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| LabError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn validate(record: &SimulationRecord) -> Result<()> {
    let fields = [
        ("velocity", record.velocity),
        ("angle", record.angle),
        ("height", record.height),
        ("distance", record.distance),
    ];
    match fields.iter().find(|(_, value)| !value.is_finite()) {
        Some((name, value)) => Err(LabError::InvalidRecord(format!(
            "{name} must be a finite number, got {value}"
        ))),
        None => Ok(()),
    }
}

impl FlightRecorder for SimulationHistory {
    fn record(&mut self, record: SimulationRecord) {
        match self.add(record) {
            Ok(id) => debug!(id, "simulation saved to history"),
            Err(err) => warn!(%err, "could not save simulation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn record(distance: f64) -> SimulationRecord {
        SimulationRecord {
            velocity: 25.0,
            angle: 45.0,
            height: 15.94,
            distance,
        }
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).single().unwrap_or_default() + Duration::seconds(seconds)
    }

    #[test]
    fn recent_lists_newest_first_within_limit() {
        let mut history = SimulationHistory::new();
        for i in 0..12 {
            history.add_at(record(i as f64), at(i)).expect("valid record");
        }

        let recent = history.recent(10);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].record.distance, 11.0);
        assert_eq!(recent[9].record.distance, 2.0);
    }

    #[test]
    fn same_timestamp_orders_by_insertion() {
        let mut history = SimulationHistory::new();
        let first = history.add_at(record(1.0), at(0)).expect("valid");
        let second = history.add_at(record(2.0), at(0)).expect("valid");

        let ids: Vec<u64> = history.recent(5).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[test]
    fn delete_unknown_id_is_not_found() {
        let mut history = SimulationHistory::new();
        let id = history.add(record(1.0)).expect("valid");

        assert!(matches!(history.delete(id + 1), Err(LabError::NotFound(_))));
        assert_eq!(history.delete(id).map(|e| e.id).ok(), Some(id));
        assert!(history.is_empty());
    }

    #[test]
    fn clear_reports_count_and_ids_keep_growing() {
        let mut history = SimulationHistory::new();
        history.add(record(1.0)).expect("valid");
        let last = history.add(record(2.0)).expect("valid");

        assert_eq!(history.clear(), 2);
        assert!(history.is_empty());
        assert!(history.add(record(3.0)).expect("valid") > last);
    }

    #[test]
    fn non_finite_record_is_rejected() {
        let mut history = SimulationHistory::new();
        let err = history.add(record(f64::NAN)).expect_err("NaN distance");

        assert!(matches!(err, LabError::InvalidRecord(_)));
        assert!(history.is_empty());
    }

    #[test]
    fn recorder_swallows_invalid_records() {
        let mut history = SimulationHistory::new();
        history.record(record(f64::INFINITY));
        history.record(record(5.0));

        assert_eq!(history.len(), 1);
    }

    #[test]
    fn file_round_trip_preserves_ids() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history.json");

        let mut history = SimulationHistory::new();
        history.add_at(record(1.0), at(0)).expect("valid");
        let kept = history.add_at(record(2.0), at(1)).expect("valid");
        history.save(&path).expect("save");

        let mut loaded = SimulationHistory::load(&path).expect("load");
        assert_eq!(loaded, history);
        assert!(loaded.add(record(3.0)).expect("valid") > kept);
    }

    #[test]
    fn missing_file_loads_empty_history() {
        let dir = tempfile::tempdir().expect("tempdir");
        let history = SimulationHistory::load(&dir.path().join("none.json")).expect("load");
        assert!(history.is_empty());
    }

    #[test]
    fn entries_serialize_flat() {
        let mut history = SimulationHistory::new();
        history.add_at(record(63.78), at(0)).expect("valid");

        let json = serde_json::to_value(history.get(1)).expect("serialize");
        assert_eq!(json["distance"], 63.78);
        assert_eq!(json["id"], 1);
        assert!(json.get("record").is_none());
    }
}
