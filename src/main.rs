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

mod config;
mod flight_log;
mod map_render;
mod pipeline;
mod track_cache;

use aeroapi_client::ApiClient;
use log::{error, info};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Starting AeroTrail...");

    // Fatal precondition: without a key there is no network activity and
    // no artifact
    let Some(api_key) = config::resolve_api_key() else {
        error!(
            "No AeroAPI key available; set {} or enter one at the prompt",
            config::API_KEY_ENV
        );
        return ExitCode::FAILURE;
    };

    let client = ApiClient::new(api_key);
    let paths = pipeline::Paths::default();

    match pipeline::run(&client, &paths) {
        Ok(summary) => {
            info!("Total API calls = {}", summary.api_calls);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Pipeline failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
