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

//! Typed AeroAPI response structures.
//!
//! Each structure names the fields this crate's callers depend on and
//! carries everything else the upstream document contained in a flattened
//! map, so decode-then-persist keeps the full document intact. Equality is
//! full structural equality over named and flattened fields alike.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One flight activity record from the recent-flights listing.
///
/// `fa_flight_id` is the upstream-assigned unique identifier for the
/// flight; all other upstream fields ride along in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub fa_flight_id: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Response body of the recent-flights endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightsResponse {
    pub flights: Vec<FlightRecord>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FlightsResponse {
    /// Flight identifiers in listing order (most recent first).
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.flights
            .iter()
            .map(|f| f.fa_flight_id.clone())
            .collect()
    }
}

/// One timestamped position report within a flight track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionReport {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PositionReport {
    /// Position as a `(latitude, longitude)` pair.
    #[must_use]
    pub fn coordinate(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Response body of the flight-track endpoint.
///
/// Positions are in chronological order as returned by the upstream API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackResponse {
    pub positions: Vec<PositionReport>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TrackResponse {
    /// The final (most recent) position report, if the track is non-empty.
    #[must_use]
    pub fn last_position(&self) -> Option<&PositionReport> {
        self.positions.last()
    }
}
