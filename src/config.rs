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

//! Fixed pipeline settings and credential acquisition.
//!
//! There are no command-line flags and no configuration file; every tunable
//! is a constant here. The only runtime input is the API key, resolved from
//! the environment with an interactive masked prompt as fallback.

/// Aircraft registration monitored across runs.
pub const TRACKED_IDENT: &str = "N785RW";

/// Page limit for the recent-flights listing.
pub const MAX_PAGES: u32 = 2;

/// Flight activity log cache file.
pub const FLIGHT_LOG_PATH: &str = "flights.json";

/// Directory holding one JSON document per cached flight track.
pub const TRACK_CACHE_DIR: &str = "tracks";

/// Rendered map artifact, overwritten each run.
pub const MAP_OUTPUT_PATH: &str = "index.html";

/// Initial map view over the continental US.
pub const MAP_CENTER: (f64, f64) = (39.0, -95.0);
pub const MAP_ZOOM: u8 = 5;

/// Environment variable checked first for the AeroAPI key.
pub const API_KEY_ENV: &str = "AEROAPI_KEY";

/// Resolve the AeroAPI key from the environment, falling back to an
/// interactive masked prompt. Returns `None` when neither source yields a
/// non-empty key; the caller treats that as a fatal precondition failure.
pub fn resolve_api_key() -> Option<String> {
    resolve_api_key_from(std::env::var(API_KEY_ENV).ok(), prompt_api_key)
}

fn prompt_api_key() -> Option<String> {
    rpassword::prompt_password("API Key: ").ok()
}

fn resolve_api_key_from(
    env_value: Option<String>,
    prompt: impl FnOnce() -> Option<String>,
) -> Option<String> {
    // Environment variable takes precedence over the prompt
    if let Some(key) = env_value {
        if !key.is_empty() {
            return Some(key);
        }
    }

    prompt().filter(|key| !key.is_empty())
}
