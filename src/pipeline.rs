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

//! Run orchestration.
//!
//! One linear pass per invocation: refresh the flight log, fetch any track
//! not yet cached, assemble the map from the full cache. Upstream request
//! failures degrade the run (the affected data simply does not update);
//! only a missing credential aborts, and that is handled before this
//! module is reached. All cross-run state lives in the cache files.

use crate::config;
use crate::flight_log::FlightLog;
use crate::map_render::MapBuilder;
use crate::track_cache::TrackCache;
use aeroapi_client::FlightSource;
use chrono::Local;
use log::{info, warn};
use std::path::PathBuf;

/// Outcome of one pipeline run.
///
/// Carries the request count and the refresh-success flag as explicit
/// results instead of ambient counters.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunSummary {
    /// Number of upstream API requests issued, successful or not.
    pub api_calls: u32,
    /// Whether this run's flight-list refresh succeeded.
    pub auth_ok: bool,
}

/// Filesystem layout for one run.
#[derive(Debug, Clone)]
pub struct Paths {
    pub flight_log: PathBuf,
    pub track_dir: PathBuf,
    pub map_output: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            flight_log: PathBuf::from(config::FLIGHT_LOG_PATH),
            track_dir: PathBuf::from(config::TRACK_CACHE_DIR),
            map_output: PathBuf::from(config::MAP_OUTPUT_PATH),
        }
    }
}

/// Execute one run against the given flight data source.
///
/// Returns the run summary on completion (the artifact was written, though
/// its data may be stale or partial if requests failed). Cache files that
/// exist but fail to decode are unrecoverable and abort the run.
pub fn run(
    source: &impl FlightSource,
    paths: &Paths,
) -> Result<RunSummary, Box<dyn std::error::Error>> {
    let mut summary = RunSummary::default();

    let mut flight_log = FlightLog::load(&paths.flight_log)?;

    info!("Grabbing latest flights for {}...", config::TRACKED_IDENT);
    summary.api_calls += 1;
    let fetched_ids = match source.recent_flights(config::TRACKED_IDENT, config::MAX_PAGES) {
        Ok(response) => {
            let ids = response.ids();
            flight_log.merge(response.flights);
            flight_log.save(&paths.flight_log)?;
            info!("Flight log now holds {} flights", flight_log.len());
            summary.auth_ok = true;
            ids
        }
        Err(e) => {
            // Degraded mode: no identifiers propagate downstream this run
            warn!("Flight list request failed: {}", e);
            Vec::new()
        }
    };

    let mut cache = TrackCache::open(&paths.track_dir)?;
    for flight_id in &fetched_ids {
        if cache.contains(flight_id) {
            info!("Skipping flight {}, already logged", flight_id);
            continue;
        }

        info!("Found new flight {} - querying and recording...", flight_id);
        summary.api_calls += 1;
        match source.flight_track(flight_id) {
            Ok(track) => cache.store(flight_id, &track)?,
            Err(e) => {
                // Left un-cached; picked up again on the next run
                warn!("Track request for {} failed: {}", flight_id, e);
            }
        }
    }

    // The map reflects the entire cache, not just this run's fetches
    let mut map = MapBuilder::new(config::MAP_CENTER, config::MAP_ZOOM);
    for flight_id in cache.entries() {
        let track = cache.load(&flight_id)?;
        map.add_track(&flight_id, &track);
    }
    if let Some(latest) = flight_log.latest() {
        map.set_latest(latest);
    }
    map.set_generated_on(Local::now().date_naive());
    map.set_auth_ok(summary.auth_ok);
    map.write(&paths.map_output)?;
    info!("Map written to {}", paths.map_output.display());

    Ok(summary)
}
