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
use symphonia::core::{
    audio::SampleBuffer, codecs::DecoderOptions, errors::Error as SymphoniaError,
    formats::FormatOptions, io::MediaSourceStream, meta::MetadataOptions, probe::Hint,
};

/// Decodes compressed audio (mp3, ogg/vorbis, flac, ...) with `symphonia`.
#[derive(Debug, Default)]
pub struct SymphoniaDecoderLane;

impl SymphoniaDecoderLane {
    /// Creates a new instance of `SymphoniaDecoderLane`.
    pub fn new() -> Self {
        Self
    }
}

impl AssetDecoderLane<SoundData> for SymphoniaDecoderLane {
    fn decode(&self, bytes: &[u8]) -> Result<SoundData, Box<dyn Error + Send + Sync>> {
        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

        // No extension hint: the source location is not always a file name.
        let probed = symphonia::default::get_probe().format(
            &Hint::new(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )?;
        let mut format_reader = probed.format;

        let track = format_reader
            .default_track()
            .ok_or_else(|| anyhow!("No default audio track found"))?;

        let track_id = track.id;
        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| anyhow!("Unknown sample rate"))?;
        let channels = track
            .codec_params
            .channels
            .ok_or_else(|| anyhow!("Unknown channel count"))?;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())?;

        let mut all_samples = Vec::<f32>::new();

        loop {
            let packet = match format_reader.next_packet() {
                Ok(packet) => packet,
                // End of stream.
                Err(SymphoniaError::IoError(_)) => break,
                Err(e) => return Err(Box::new(e)),
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => {
                    // Planar (LLL..., RRR...) to interleaved (LRLR...).
                    let mut sample_buf =
                        SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
                    sample_buf.copy_interleaved_ref(decoded);
                    all_samples.extend_from_slice(sample_buf.samples());
                }
                // A corrupt packet is not fatal.
                Err(SymphoniaError::DecodeError(e)) => {
                    log::warn!("Skipping undecodable audio packet: {e}");
                }
                Err(e) => return Err(Box::new(e)),
            }
        }

        if all_samples.is_empty() {
            return Err(anyhow!("Audio stream contained no decodable samples").into());
        }

        Ok(SoundData {
            samples: all_samples,
            channels: channels.count() as u16,
            sample_rate,
        })
    }

    fn strategy_name(&self) -> &'static str {
        "SymphoniaDecoder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_stream_fails() {
        assert!(SymphoniaDecoderLane::new().decode(b"not audio at all").is_err());
        assert!(SymphoniaDecoderLane::new().decode(&[]).is_err());
    }
}
