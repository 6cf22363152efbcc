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
use std::error::Error;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Parses structured-data assets as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDataLane;

impl AssetDecoderLane<serde_json::Value> for JsonDataLane {
    fn decode(&self, bytes: &[u8]) -> Result<serde_json::Value, Box<dyn Error + Send + Sync>> {
        // Editors on Windows like to prepend a BOM, which serde_json rejects.
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        Ok(serde_json::from_slice(bytes)?)
    }

    fn strategy_name(&self) -> &'static str {
        "JsonData"
    }
}
