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

//! On-disk flight track cache.
//!
//! One JSON document per flight, named `<flight identifier>.json`, plus a
//! manifest file holding the set of cached identifiers. The manifest is the
//! existence index, so membership checks never scan the directory; it is
//! rewritten through a temp-file rename on every addition. Track files are
//! immutable once written and are never re-fetched or expired.

use aeroapi_client::TrackResponse;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct Manifest {
    tracks: BTreeSet<String>,
}

/// Track cache rooted at a single directory.
#[derive(Debug)]
pub struct TrackCache {
    dir: PathBuf,
    manifest: Manifest,
}

impl TrackCache {
    /// Open the cache, creating the directory if needed.
    ///
    /// Track files present in the directory but missing from the manifest
    /// (written before the manifest existed, or after a lost manifest) are
    /// indexed once here, so every file in the directory stays visible to
    /// readers.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, Box<dyn std::error::Error>> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        let manifest_path = dir.join(MANIFEST_FILE);
        let manifest = if manifest_path.exists() {
            serde_json::from_str(&fs::read_to_string(&manifest_path)?)?
        } else {
            Manifest::default()
        };

        let mut cache = Self { dir, manifest };
        cache.reconcile()?;
        Ok(cache)
    }

    fn reconcile(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let mut discovered = 0;
        for entry in fs::read_dir(&self.dir)? {
            let name = entry?.file_name();
            let Some(name) = name.to_str() else { continue };
            if name == MANIFEST_FILE {
                continue;
            }
            if let Some(id) = name.strip_suffix(".json") {
                if self.manifest.tracks.insert(id.to_owned()) {
                    discovered += 1;
                }
            }
        }

        if discovered > 0 {
            info!("Indexed {} track files missing from manifest", discovered);
            self.save_manifest()?;
        }
        Ok(())
    }

    /// Whether a track for this flight is already cached.
    #[must_use]
    pub fn contains(&self, flight_id: &str) -> bool {
        self.manifest.tracks.contains(flight_id)
    }

    /// Cached flight identifiers in sorted order.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.manifest.tracks.iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.manifest.tracks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.manifest.tracks.is_empty()
    }

    /// Write a newly fetched track and index it.
    ///
    /// An identifier that is already cached is left untouched; existing
    /// entries are never overwritten.
    pub fn store(
        &mut self,
        flight_id: &str,
        track: &TrackResponse,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if self.contains(flight_id) {
            debug!("Track {} already cached, not overwriting", flight_id);
            return Ok(());
        }

        fs::write(self.track_path(flight_id), serde_json::to_string(track)?)?;
        self.manifest.tracks.insert(flight_id.to_owned());
        self.save_manifest()?;
        Ok(())
    }

    /// Decode one cached track.
    ///
    /// A cache file that fails to decode is an unrecoverable error; there
    /// is no corruption recovery.
    pub fn load(&self, flight_id: &str) -> Result<TrackResponse, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(self.track_path(flight_id))?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn track_path(&self, flight_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", flight_id))
    }

    fn save_manifest(&self) -> Result<(), Box<dyn std::error::Error>> {
        // Temp file + rename keeps the index update atomic
        let tmp = self.dir.join(format!("{}.tmp", MANIFEST_FILE));
        fs::write(&tmp, serde_json::to_string(&self.manifest)?)?;
        fs::rename(&tmp, self.dir.join(MANIFEST_FILE))?;
        Ok(())
    }
}
