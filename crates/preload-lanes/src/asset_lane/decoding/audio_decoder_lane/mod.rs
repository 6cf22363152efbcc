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

//! Audio decoding lanes.
//!
//! Plain PCM `.wav` files go through `hound`, which is small and strict.
//! Everything else (mp3, ogg/vorbis, flac, aac, ...) goes through `symphonia`.

mod symphonia_decoder_lane;
mod wav_decoder_lane;

pub use symphonia_decoder_lane::*;
pub use wav_decoder_lane::*;

use crate::asset_lane::AssetDecoderLane;
use preload_core::SoundData;
use std::error::Error;

/// Picks the WAV or Symphonia lane by sniffing the container header.
#[derive(Debug, Default)]
pub struct AudioDecoderLane {
    wav: WavDecoderLane,
    symphonia: SymphoniaDecoderLane,
}

impl AudioDecoderLane {
    /// Creates a new instance of `AudioDecoderLane`.
    pub fn new() -> Self {
        Self::default()
    }
}

fn is_riff_wave(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE"
}

impl AssetDecoderLane<SoundData> for AudioDecoderLane {
    fn decode(&self, bytes: &[u8]) -> Result<SoundData, Box<dyn Error + Send + Sync>> {
        if is_riff_wave(bytes) {
            match self.wav.decode(bytes) {
                Ok(sound) => return Ok(sound),
                // hound only handles PCM/float WAV; ADPCM and friends fall through.
                Err(e) => log::debug!("WAV lane rejected input ({e}), retrying with Symphonia"),
            }
        }
        self.symphonia.decode(bytes)
    }

    fn strategy_name(&self) -> &'static str {
        "AudioDecoder"
    }
}
