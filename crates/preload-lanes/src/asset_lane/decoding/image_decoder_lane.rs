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
use anyhow::Context;
use preload_core::ImageData;
use std::error::Error;

/// Decodes any format the `image` crate recognizes (PNG, JPEG, GIF, WebP, ...)
/// into RGBA8 pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDecoderLane;

impl AssetDecoderLane<ImageData> for ImageDecoderLane {
    fn decode(&self, bytes: &[u8]) -> Result<ImageData, Box<dyn Error + Send + Sync>> {
        let img = image::load_from_memory(bytes).context("Failed to decode image from memory")?;

        // Keep the sRGB values as-is.
        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();

        Ok(ImageData {
            pixels: rgba_img.into_raw(),
            width,
            height,
        })
    }

    fn strategy_name(&self) -> &'static str {
        "ImageDecoder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode_png(image: &RgbaImage) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_png_decodes_to_rgba() {
        let mut source = RgbaImage::new(3, 2);
        source.put_pixel(2, 1, Rgba([10, 20, 30, 255]));

        let image = ImageDecoderLane.decode(&encode_png(&source)).unwrap();

        assert_eq!((image.width, image.height), (3, 2));
        assert_eq!(image.pixels.len(), 3 * 2 * 4);
        assert_eq!(image.pixel(2, 1), Some([10, 20, 30, 255]));
    }

    #[test]
    fn test_garbage_bytes_fail() {
        assert!(ImageDecoderLane.decode(b"<html>404</html>").is_err());
        assert!(ImageDecoderLane.decode(&[]).is_err());
    }
}
