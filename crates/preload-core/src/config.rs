// Copyright 2025 eraflo
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

//! Loader settings, usually read from the `[loader]` table of an asset manifest.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for a loading cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// If set, requests still outstanding this many milliseconds after
    /// `start_loading` settle as timed out. `None` waits forever.
    pub cycle_timeout_ms: Option<u64>,
    /// Run decoders on the runtime's blocking pool instead of the async workers.
    pub decode_on_blocking_pool: bool,
}

impl Default for LoaderConfig {
    /// No timeout, decoding off the async workers.
    fn default() -> Self {
        Self {
            cycle_timeout_ms: None,
            decode_on_blocking_pool: true,
        }
    }
}

impl LoaderConfig {
    /// The cycle timeout as a [`Duration`].
    pub fn cycle_timeout(&self) -> Option<Duration> {
        self.cycle_timeout_ms.map(Duration::from_millis)
    }

    /// Returns a copy with the given cycle timeout.
    pub fn with_cycle_timeout(mut self, timeout: Duration) -> Self {
        self.cycle_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: LoaderConfig = toml::from_str("cycle_timeout_ms = 2500").unwrap();
        assert_eq!(config.cycle_timeout(), Some(Duration::from_millis(2500)));
        assert!(config.decode_on_blocking_pool);

        let empty: LoaderConfig = toml::from_str("").unwrap();
        assert_eq!(empty, LoaderConfig::default());
        assert_eq!(empty.cycle_timeout(), None);
    }

    #[test]
    fn test_with_cycle_timeout() {
        let config = LoaderConfig::default().with_cycle_timeout(Duration::from_secs(3));
        assert_eq!(config.cycle_timeout_ms, Some(3000));
    }
}
