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

//! Asset types shared by the decoders, the fetchers, and the loading aggregator.

mod error;
mod handle;
mod kind;
mod payload;
mod request;
mod table;

pub use error::*;
pub use handle::*;
pub use kind::*;
pub use payload::*;
pub use request::*;
pub use table::*;

/// A marker trait for types that can be stored behind an [`AssetHandle`].
///
/// Assets are shared between the loader's result table and any number of
/// consumers, so they must be thread-safe and own their data.
pub trait Asset: Send + Sync + 'static {}

/// JSON data documents are stored as parsed values.
impl Asset for serde_json::Value {}
