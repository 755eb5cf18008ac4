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

//! Client library for the FlightAware AeroAPI flight data service.
//!
//! This library provides a small, reusable client for the two read-only
//! AeroAPI endpoints used for historical flight tracking:
//!
//! - **Recent flights**: the flight activity list for an aircraft
//!   registration (paginated, page limit configurable)
//! - **Flight track**: the ordered position history for a single flight
//!
//! Responses are decoded into typed structures ([`FlightsResponse`],
//! [`TrackResponse`]) that validate the fields the caller depends on while
//! preserving every other upstream field through flattened maps, so a
//! decoded document can be persisted without losing data.
//!
//! The [`FlightSource`] trait abstracts the transport so callers can be
//! tested against stub implementations without network access.
//!
//! # Quick Start
//!
//! ```no_run
//! use aeroapi_client::{ApiClient, FlightSource};
//!
//! fn main() -> Result<(), aeroapi_client::ApiError> {
//!     let client = ApiClient::new("my-api-key");
//!
//!     let flights = client.recent_flights("N785RW", 2)?;
//!     for flight in &flights.flights {
//!         let track = client.flight_track(&flight.fa_flight_id)?;
//!         println!("{}: {} positions", flight.fa_flight_id, track.positions.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod types;

use log::debug;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use types::{FlightRecord, FlightsResponse, PositionReport, TrackResponse};

/// Default AeroAPI base URL.
pub const DEFAULT_BASE_URL: &str = "https://aeroapi.flightaware.com/aeroapi";

/// Errors that can occur while talking to the AeroAPI.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to '{endpoint}' failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("upstream returned status {status} for '{endpoint}'")]
    Status { endpoint: String, status: u16 },

    #[error("invalid response body from '{endpoint}': {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of flight activity and track data.
///
/// Implemented by [`ApiClient`] for live AeroAPI access. Callers that only
/// need the two read operations should accept this trait so they can be
/// exercised against canned data in tests.
pub trait FlightSource {
    /// List recent flight activity for an aircraft registration.
    fn recent_flights(&self, ident: &str, max_pages: u32) -> Result<FlightsResponse, ApiError>;

    /// Fetch the position track for a single flight.
    fn flight_track(&self, flight_id: &str) -> Result<TrackResponse, ApiError>;
}

/// Blocking AeroAPI client.
///
/// Authentication is a per-request `x-apikey` header. The client never
/// retries; each operation maps to exactly one HTTP request.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl ApiClient {
    /// Create a client for the production AeroAPI endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against an alternate base URL.
    #[must_use]
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header("x-apikey", &self.api_key)
            .query(query)
            .send()
            .map_err(|source| ApiError::Http {
                endpoint: endpoint.to_owned(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: endpoint.to_owned(),
                status: status.as_u16(),
            });
        }

        // Decode from text so transport and decode failures stay distinguishable
        let body = response.text().map_err(|source| ApiError::Http {
            endpoint: endpoint.to_owned(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_owned(),
            source,
        })
    }
}

impl FlightSource for ApiClient {
    fn recent_flights(&self, ident: &str, max_pages: u32) -> Result<FlightsResponse, ApiError> {
        let endpoint = format!("flights/{}", ident);
        self.get_json(&endpoint, &[("max_pages", max_pages.to_string())])
    }

    fn flight_track(&self, flight_id: &str) -> Result<TrackResponse, ApiError> {
        let endpoint = format!("flights/{}/track", flight_id);
        self.get_json(&endpoint, &[])
    }
}
