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

//! Foundational types and contracts for the Preload asset loader.
//!
//! This crate holds everything the other crates agree on: the asset payload
//! types, the request and table types the aggregator works with, the error
//! taxonomy of a single load, and the collaborator traits the loader consumes
//! without implementing (fetching bytes from a source location).

#![warn(missing_docs)]

pub mod asset;
pub mod config;
pub mod io;

pub use asset::{
    Asset, AssetHandle, AssetKind, ImageData, LoadError, LoadRequest, LoadedAsset,
    LoadedAssetTable, SoundData,
};
pub use config::LoaderConfig;
pub use io::AssetFetcher;
