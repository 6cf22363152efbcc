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

use crate::asset_lane::AssetDecoderLane;
use anyhow::anyhow;
use preload_core::SoundData;
use std::{error::Error, io::Cursor};

/// A 16-bit mono 44.1kHz WAV holding four samples, shared with the sibling tests.
#[cfg(test)]
pub(crate) const TEST_WAV_BYTES: &[u8] = &[
    82, 73, 70, 70, 52, 0, 0, 0, 87, 65, 86, 69, 102, 109, 116, 32, 16, 0, 0, 0, 1, 0, 1, 0, 68,
    172, 0, 0, 136, 88, 1, 0, 2, 0, 16, 0, 100, 97, 116, 97, 8, 0, 0, 0, 0, 12, 204, 251, 51, 13,
    205, 243,
];

/// Decodes PCM and IEEE-float `.wav` files with `hound`.
#[derive(Debug, Default)]
pub struct WavDecoderLane;

impl WavDecoderLane {
    /// Creates a new instance of `WavDecoderLane`.
    pub fn new() -> Self {
        Self
    }
}

impl AssetDecoderLane<SoundData> for WavDecoderLane {
    /// Parses a byte slice representing a `.wav` file into normalized samples.
    fn decode(&self, bytes: &[u8]) -> Result<SoundData, Box<dyn Error + Send + Sync>> {
        let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();

        let samples: Result<Vec<f32>, _> = match spec.sample_format {
            hound::SampleFormat::Float => reader.samples::<f32>().collect(),
            hound::SampleFormat::Int => {
                let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|sample| sample.map(|s| s as f32 / max_value))
                    .collect()
            }
        };

        let samples = samples.map_err(|e| anyhow!("Failed to parse WAV samples: {}", e))?;

        Ok(SoundData {
            samples,
            channels: spec.channels,
            sample_rate: spec.sample_rate,
        })
    }

    fn strategy_name(&self) -> &'static str {
        "WavDecoder"
    }
}
