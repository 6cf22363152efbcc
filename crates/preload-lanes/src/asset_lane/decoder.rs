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

use preload_core::Asset;
use std::error::Error;

/// A trait for types that can decode a specific kind of asset from a byte slice.
///
/// Implementors are responsible for the potentially CPU-intensive work of
/// parsing raw file data into a usable asset type. Lanes are shared between
/// every in-flight load of a cycle, so they must be stateless or internally
/// synchronized.
///
/// Each lane is specialized for a single asset type `A`.
pub trait AssetDecoderLane<A: Asset>: Send + Sync {
    /// Parses a byte slice and converts it into an instance of the asset `A`.
    ///
    /// # Returns
    /// The decoded asset on success, or a boxed, thread-safe error on failure.
    fn decode(&self, bytes: &[u8]) -> Result<A, Box<dyn Error + Send + Sync>>;

    /// A short name identifying the decoding strategy, for logs.
    fn strategy_name(&self) -> &'static str;
}
