// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Persisted flight activity log.
//!
//! The log accumulates every flight record ever listed for the tracked
//! aircraft. Each refresh merges the newly fetched listing with the
//! persisted one: the new listing comes first, and any previously known
//! record that is not structurally present in it is appended. A record is
//! never dropped once seen.

use aeroapi_client::FlightRecord;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Persisted collection of all known flight records, most recent first.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct FlightLog {
    flights: Vec<FlightRecord>,
}

impl FlightLog {
    /// Load the log from disk, or start empty if the file does not exist.
    ///
    /// A file that exists but fails to decode is an unrecoverable error;
    /// there is no corruption recovery for the cache.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let log: Self = serde_json::from_str(&contents)?;
        info!("Loaded {} known flights from {}", log.flights.len(), path.display());
        Ok(log)
    }

    /// Merge a newly fetched listing into the log.
    ///
    /// The result is the new listing followed by every previously known
    /// record not structurally equal to any new one, i.e. a set union under
    /// structural equality that keeps the upstream's most-recent-first
    /// ordering at the head.
    pub fn merge(&mut self, new_flights: Vec<FlightRecord>) {
        let mut merged = new_flights;
        for old in self.flights.drain(..) {
            if !merged.contains(&old) {
                merged.push(old);
            }
        }
        self.flights = merged;
    }

    /// Persist the log, overwriting the cache file in place.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        fs::write(path.as_ref(), serde_json::to_string(self)?)?;
        Ok(())
    }

    /// Flight identifiers in log order (most recent first).
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.flights
            .iter()
            .map(|f| f.fa_flight_id.clone())
            .collect()
    }

    /// Identifier of the most-recently-listed flight.
    ///
    /// Selection is strictly by log order; directory or fetch order is
    /// never consulted.
    #[must_use]
    pub fn latest(&self) -> Option<&str> {
        self.flights.first().map(|f| f.fa_flight_id.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.flights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(body: &str) -> FlightRecord {
        serde_json::from_str(body).unwrap()
    }

    fn log_of(bodies: &[&str]) -> FlightLog {
        FlightLog {
            flights: bodies.iter().map(|b| record(b)).collect(),
        }
    }

    #[test]
    fn test_merge_new_first_old_appended() {
        let mut log = log_of(&[r#"{"fa_flight_id": "F1"}"#]);
        log.merge(vec![record(r#"{"fa_flight_id": "F2"}"#)]);

        assert_eq!(log.ids(), vec!["F2".to_owned(), "F1".to_owned()]);
        assert_eq!(log.latest(), Some("F2"));
    }

    #[test]
    fn test_merge_is_union_without_duplicates() {
        let mut log = log_of(&[
            r#"{"fa_flight_id": "F2", "ident": "UAL2"}"#,
            r#"{"fa_flight_id": "F1", "ident": "UAL1"}"#,
        ]);
        log.merge(vec![
            record(r#"{"fa_flight_id": "F3", "ident": "UAL3"}"#),
            record(r#"{"fa_flight_id": "F2", "ident": "UAL2"}"#),
        ]);

        // Superset of both inputs, shared record kept once
        assert_eq!(
            log.ids(),
            vec!["F3".to_owned(), "F2".to_owned(), "F1".to_owned()]
        );
    }

    #[test]
    fn test_merge_keeps_structurally_distinct_records_with_same_id() {
        // Equality is over the whole record, not just the identifier
        let mut log = log_of(&[r#"{"fa_flight_id": "F1", "progress_percent": 50}"#]);
        log.merge(vec![record(
            r#"{"fa_flight_id": "F1", "progress_percent": 100}"#,
        )]);

        assert_eq!(log.len(), 2);
        assert_eq!(log.ids(), vec!["F1".to_owned(), "F1".to_owned()]);
    }

    #[test]
    fn test_merge_into_empty_log() {
        let mut log = FlightLog::default();
        log.merge(vec![record(r#"{"fa_flight_id": "F1"}"#)]);
        assert_eq!(log.ids(), vec!["F1".to_owned()]);
    }

    #[test]
    fn test_merge_empty_listing_keeps_old_records() {
        let mut log = log_of(&[r#"{"fa_flight_id": "F1"}"#]);
        log.merge(Vec::new());
        assert_eq!(log.ids(), vec!["F1".to_owned()]);
    }

    #[test]
    fn test_latest_of_empty_log_is_none() {
        assert_eq!(FlightLog::default().latest(), None);
    }

    #[test]
    fn test_load_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = FlightLog::load(dir.path().join("flights.json")).unwrap();
        assert!(log.is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flights.json");

        let mut log = FlightLog::default();
        log.merge(vec![
            record(r#"{"fa_flight_id": "F2", "ident": "UAL2"}"#),
            record(r#"{"fa_flight_id": "F1", "ident": "UAL1"}"#),
        ]);
        log.save(&path).unwrap();

        let reloaded = FlightLog::load(&path).unwrap();
        assert_eq!(reloaded.ids(), log.ids());
    }

    #[test]
    fn test_load_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flights.json");
        fs::write(&path, "{not json").unwrap();

        assert!(FlightLog::load(&path).is_err());
    }
}
