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

//! Static HTML map assembly.
//!
//! Builds a self-contained Leaflet document from the full set of cached
//! tracks. Every track renders as one polyline; the most-recently-listed
//! flight is highlighted and gets a marker at its final known position plus
//! a time scrubber that walks a marker along its position reports. Track
//! data is embedded by serializing it straight into the script block, so no
//! hand escaping is involved.

use aeroapi_client::TrackResponse;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// One track's render data, embedded into the document as JSON.
#[derive(Debug, Serialize)]
struct TrackOverlay {
    flight_id: String,
    /// `[latitude, longitude]` pairs in file order.
    points: Vec<[f64; 2]>,
    /// RFC 3339 timestamp per point, parallel to `points`.
    times: Vec<String>,
}

/// Assembles the map artifact for one run.
#[derive(Debug)]
pub struct MapBuilder {
    center: (f64, f64),
    zoom: u8,
    tracks: Vec<TrackOverlay>,
    latest_id: Option<String>,
    generated_on: Option<NaiveDate>,
    auth_ok: bool,
}

impl MapBuilder {
    #[must_use]
    pub fn new(center: (f64, f64), zoom: u8) -> Self {
        Self {
            center,
            zoom,
            tracks: Vec::new(),
            latest_id: None,
            generated_on: None,
            auth_ok: false,
        }
    }

    /// Add one cached track to the map.
    pub fn add_track(&mut self, flight_id: &str, track: &TrackResponse) {
        self.tracks.push(TrackOverlay {
            flight_id: flight_id.to_owned(),
            points: track
                .positions
                .iter()
                .map(|p| [p.latitude, p.longitude])
                .collect(),
            times: track
                .positions
                .iter()
                .map(|p| p.timestamp.to_rfc3339())
                .collect(),
        });
    }

    /// Mark the most-recently-listed flight.
    ///
    /// Selection is the flight log's first entry, never directory order. If
    /// no added track matches the identifier, the map renders without a
    /// highlight.
    pub fn set_latest(&mut self, flight_id: &str) {
        self.latest_id = Some(flight_id.to_owned());
    }

    /// Record the generation date shown in the map's date stamp.
    pub fn set_generated_on(&mut self, date: NaiveDate) {
        self.generated_on = Some(date);
    }

    /// Record whether this run's flight-list refresh succeeded.
    ///
    /// The auth indicator on the map is the user-facing signal that the
    /// refresh went through.
    pub fn set_auth_ok(&mut self, auth_ok: bool) {
        self.auth_ok = auth_ok;
    }

    /// Render the complete HTML document.
    #[must_use]
    pub fn render(&self) -> String {
        let tracks_json = serde_json::to_string(&self.tracks).unwrap_or_else(|_| "[]".to_owned());
        let latest_json =
            serde_json::to_string(&self.latest_id).unwrap_or_else(|_| "null".to_owned());

        let mut overlays = String::new();
        if let Some(date) = self.generated_on {
            let _ = write!(
                overlays,
                r#"<div class="info-box" id="updated">Last Updated On {}</div>"#,
                date
            );
        }
        if self.auth_ok {
            overlays.push_str(r#"<div class="info-box" id="auth">Auth Success</div>"#);
        }

        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str("<title>Flight Track History</title>\n");
        html.push_str(
            "<link rel=\"stylesheet\" href=\"https://unpkg.com/leaflet@1.9.4/dist/leaflet.css\">\n",
        );
        html.push_str("<script src=\"https://unpkg.com/leaflet@1.9.4/dist/leaflet.js\"></script>\n");
        html.push_str("<style>");
        html.push_str(STYLE);
        html.push_str("</style>\n</head>\n<body>\n");
        html.push_str("<div id=\"map\"></div>\n");
        html.push_str(&overlays);
        html.push('\n');
        html.push_str("<script>\n");
        let _ = writeln!(
            html,
            "const MAP_CENTER = [{}, {}];",
            self.center.0, self.center.1
        );
        let _ = writeln!(html, "const MAP_ZOOM = {};", self.zoom);
        let _ = writeln!(html, "const TRACKS = {};", tracks_json);
        let _ = writeln!(html, "const LATEST_ID = {};", latest_json);
        html.push_str(RUNTIME_JS);
        html.push_str("</script>\n</body>\n</html>\n");
        html
    }

    /// Serialize the artifact to disk, unconditionally overwriting.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        fs::write(path.as_ref(), self.render())
    }
}

const STYLE: &str = "\
html, body { margin: 0; height: 100%; }\
#map { height: 100%; }\
.info-box { position: absolute; z-index: 1000; background: rgba(255,255,255,0.9); \
padding: 4px 10px; font: 12pt sans-serif; border-radius: 4px; }\
#updated { bottom: 24px; left: 12px; }\
#auth { bottom: 24px; right: 12px; }\
#scrubber { top: 12px; right: 12px; display: none; }\
.plane-icon { color: #2a8f3c; font-size: 20px; }\
";

const RUNTIME_JS: &str = r#"
const map = L.map('map').setView(MAP_CENTER, MAP_ZOOM);
L.tileLayer('https://tile.openstreetmap.org/{z}/{x}/{y}.png', {
    attribution: '&copy; OpenStreetMap contributors'
}).addTo(map);

let latest = null;
for (const track of TRACKS) {
    const isLatest = LATEST_ID !== null && track.flight_id === LATEST_ID;
    const line = L.polyline(track.points, {
        color: isLatest ? '#2a8f3c' : '#3366cc',
        weight: isLatest ? 3 : 2,
        opacity: 0.8
    });
    if (track.times.length > 0) {
        line.bindTooltip(track.times[track.times.length - 1]);
    }
    line.addTo(map);
    if (isLatest) {
        latest = track;
    }
}

if (latest !== null && latest.points.length > 0) {
    const planeIcon = L.divIcon({className: 'plane-icon', html: '&#9992;', iconSize: [20, 20]});
    const last = latest.points[latest.points.length - 1];
    L.marker(last, {icon: planeIcon}).addTo(map);

    const box = document.createElement('div');
    box.className = 'info-box';
    box.id = 'scrubber';
    box.innerHTML = '<button id="play">&#9654;</button> ' +
        '<input type="range" id="scrub" min="0" max="' + (latest.points.length - 1) +
        '" value="0"> <span id="scrub-time"></span>';
    document.body.appendChild(box);
    box.style.display = 'block';

    const scrubMarker = L.circleMarker(latest.points[0], {
        radius: 6, color: '#2a8f3c', fillOpacity: 1
    }).addTo(map);
    const scrub = document.getElementById('scrub');
    const timeLabel = document.getElementById('scrub-time');

    function showPoint(i) {
        scrubMarker.setLatLng(latest.points[i]);
        timeLabel.textContent = latest.times[i];
    }
    showPoint(0);
    scrub.addEventListener('input', () => showPoint(Number(scrub.value)));

    let playTimer = null;
    document.getElementById('play').addEventListener('click', () => {
        if (playTimer !== null) {
            clearInterval(playTimer);
            playTimer = null;
            return;
        }
        playTimer = setInterval(() => {
            let next = Number(scrub.value) + 1;
            if (next > Number(scrub.max)) {
                next = 0;
            }
            scrub.value = next;
            showPoint(next);
        }, 150);
    });
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn track(body: &str) -> TrackResponse {
        serde_json::from_str(body).unwrap()
    }

    const TRACK_A: &str = r#"{"positions": [
        {"latitude": 33.9, "longitude": -118.4, "timestamp": "2024-03-01T12:00:00Z"},
        {"latitude": 34.1, "longitude": -117.9, "timestamp": "2024-03-01T12:05:00Z"}
    ]}"#;

    const TRACK_B: &str = r#"{"positions": [
        {"latitude": 40.6, "longitude": -73.7, "timestamp": "2024-03-02T09:00:00Z"}
    ]}"#;

    fn builder() -> MapBuilder {
        MapBuilder::new((39.0, -95.0), 5)
    }

    #[test]
    fn test_every_track_embedded_exactly_once() {
        let mut map = builder();
        map.add_track("F1", &track(TRACK_A));
        map.add_track("F2", &track(TRACK_B));

        let html = map.render();
        assert_eq!(html.matches("\"F1\"").count(), 1);
        assert_eq!(html.matches("\"F2\"").count(), 1);
    }

    #[test]
    fn test_latest_id_embedded_when_set() {
        let mut map = builder();
        map.add_track("F1", &track(TRACK_A));
        map.set_latest("F1");

        let html = map.render();
        assert!(html.contains("const LATEST_ID = \"F1\";"));
        // Once in the track data, once as the latest marker
        assert_eq!(html.matches("\"F1\"").count(), 2);
    }

    #[test]
    fn test_no_latest_renders_null() {
        let mut map = builder();
        map.add_track("F1", &track(TRACK_A));

        assert!(map.render().contains("const LATEST_ID = null;"));
    }

    #[test]
    fn test_auth_indicator_only_on_success() {
        let mut map = builder();
        assert!(!map.render().contains("Auth Success"));

        map.set_auth_ok(true);
        assert!(map.render().contains("Auth Success"));
    }

    #[test]
    fn test_date_stamp_rendered() {
        let mut map = builder();
        map.set_generated_on(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        assert!(map.render().contains("Last Updated On 2024-03-01"));
    }

    #[test]
    fn test_track_points_and_times_embedded() {
        let mut map = builder();
        map.add_track("F1", &track(TRACK_A));

        let html = map.render();
        assert!(html.contains("[33.9,-118.4]"));
        assert!(html.contains("2024-03-01T12:05:00+00:00"));
    }

    #[test]
    fn test_empty_map_is_still_a_document() {
        let html = builder().render();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("const TRACKS = [];"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn test_write_overwrites_prior_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        fs::write(&path, "stale").unwrap();

        builder().write(&path).unwrap();
        assert!(fs::read_to_string(&path).unwrap().starts_with("<!DOCTYPE html>"));
    }
}
