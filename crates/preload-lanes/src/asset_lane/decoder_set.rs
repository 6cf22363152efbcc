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

//! One decoding lane per asset kind.

use super::{AssetDecoderLane, AudioDecoderLane, ImageDecoderLane, JsonDataLane};
use preload_core::{
    AssetHandle, AssetKind, ImageData, LoadError, LoadedAsset, SoundData,
};
use std::sync::Arc;

/// The set of lanes a loader uses, one per [`AssetKind`].
///
/// Cloning is cheap; lanes are shared.
#[derive(Clone)]
pub struct DecoderSet {
    image: Arc<dyn AssetDecoderLane<ImageData>>,
    audio: Arc<dyn AssetDecoderLane<SoundData>>,
    data: Arc<dyn AssetDecoderLane<serde_json::Value>>,
}

impl Default for DecoderSet {
    /// `image` for pictures, `hound`/`symphonia` for sound, `serde_json` for data.
    fn default() -> Self {
        Self {
            image: Arc::new(ImageDecoderLane),
            audio: Arc::new(AudioDecoderLane::new()),
            data: Arc::new(JsonDataLane),
        }
    }
}

impl DecoderSet {
    /// Creates the default set of lanes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the image lane.
    pub fn with_image_lane(mut self, lane: impl AssetDecoderLane<ImageData> + 'static) -> Self {
        self.image = Arc::new(lane);
        self
    }

    /// Replaces the audio lane.
    pub fn with_audio_lane(mut self, lane: impl AssetDecoderLane<SoundData> + 'static) -> Self {
        self.audio = Arc::new(lane);
        self
    }

    /// Replaces the structured-data lane.
    pub fn with_data_lane(
        mut self,
        lane: impl AssetDecoderLane<serde_json::Value> + 'static,
    ) -> Self {
        self.data = Arc::new(lane);
        self
    }

    /// The name of the lane that handles `kind`.
    pub fn strategy_name(&self, kind: AssetKind) -> &'static str {
        match kind {
            AssetKind::Image => self.image.strategy_name(),
            AssetKind::Audio => self.audio.strategy_name(),
            AssetKind::Data => self.data.strategy_name(),
        }
    }

    /// Decodes `bytes` fetched from `location` with the lane for `kind`.
    ///
    /// Any lane error is reported as [`LoadError::Decode`].
    pub fn decode(
        &self,
        kind: AssetKind,
        location: &str,
        bytes: &[u8],
    ) -> Result<LoadedAsset, LoadError> {
        let decoded = match kind {
            AssetKind::Image => self
                .image
                .decode(bytes)
                .map(|image| LoadedAsset::Image(AssetHandle::new(image))),
            AssetKind::Audio => self
                .audio
                .decode(bytes)
                .map(|sound| LoadedAsset::Audio(AssetHandle::new(sound))),
            AssetKind::Data => self
                .data
                .decode(bytes)
                .map(|value| LoadedAsset::Data(AssetHandle::new(value))),
        };

        decoded.map_err(|e| LoadError::decode(kind, location, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    struct SolidColorLane;

    impl AssetDecoderLane<ImageData> for SolidColorLane {
        fn decode(&self, _bytes: &[u8]) -> Result<ImageData, Box<dyn Error + Send + Sync>> {
            Ok(ImageData {
                pixels: vec![255, 0, 0, 255],
                width: 1,
                height: 1,
            })
        }

        fn strategy_name(&self) -> &'static str {
            "SolidColor"
        }
    }

    #[test]
    fn test_decode_dispatches_on_kind() {
        let decoders = DecoderSet::new();
        let asset = decoders
            .decode(AssetKind::Data, "facts.json", br#"{"born": 1583}"#)
            .unwrap();

        assert_eq!(asset.kind(), AssetKind::Data);
        assert_eq!(asset.as_data().unwrap()["born"], 1583);
    }

    #[test]
    fn test_decode_failure_is_reported_as_decode_error() {
        let decoders = DecoderSet::new();
        let err = decoders
            .decode(AssetKind::Image, "broken.png", b"definitely not a png")
            .unwrap_err();

        match err {
            LoadError::Decode { kind, location, .. } => {
                assert_eq!(kind, AssetKind::Image);
                assert_eq!(location, "broken.png");
            }
            other => panic!("expected a decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_lanes_can_be_replaced() {
        let decoders = DecoderSet::new().with_image_lane(SolidColorLane);
        assert_eq!(decoders.strategy_name(AssetKind::Image), "SolidColor");

        let asset = decoders.decode(AssetKind::Image, "any", &[]).unwrap();
        assert_eq!(asset.as_image().unwrap().pixel(0, 0), Some([255, 0, 0, 255]));
    }
}
