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

//! Decoded asset payloads.

use super::Asset;
use std::fmt;

/// A decoded image held in CPU memory, ready to be uploaded or blitted.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    /// Tightly packed RGBA8 pixels, row-major, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageData {
    /// Returns the RGBA value of the pixel at `(x, y)`, or `None` if out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y as usize * self.width as usize) + x as usize) * 4;
        self.pixels
            .get(offset..offset + 4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }
}

// Pixel buffers are far too large to be useful in debug output.
impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

impl Asset for ImageData {}

/// Decoded audio, ready to be handed to a mixer.
#[derive(Clone, PartialEq)]
pub struct SoundData {
    /// The raw, interleaved audio samples.
    /// For stereo, samples are ordered `[L, R, L, R, ...]`.
    /// Values are expected to be in the range `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// The number of channels in the audio data (e.g., 1 for mono, 2 for stereo).
    pub channels: u16,
    /// The number of samples per second (e.g., 44100 Hz).
    pub sample_rate: u32,
}

impl SoundData {
    /// Length of the sound in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.channels == 0 || self.sample_rate == 0 {
            return 0.0;
        }
        let frames = self.samples.len() / self.channels as usize;
        frames as f32 / self.sample_rate as f32
    }
}

impl fmt::Debug for SoundData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoundData")
            .field("channels", &self.channels)
            .field("sample_rate", &self.sample_rate)
            .field("samples", &self.samples.len())
            .finish()
    }
}

impl Asset for SoundData {}
