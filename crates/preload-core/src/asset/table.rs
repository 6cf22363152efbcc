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

use super::{AssetHandle, AssetKind, ImageData, SoundData};
use std::collections::HashMap;

/// A successfully loaded asset of any kind.
#[derive(Debug, Clone)]
pub enum LoadedAsset {
    /// A decoded image.
    Image(AssetHandle<ImageData>),
    /// A decoded sound.
    Audio(AssetHandle<SoundData>),
    /// A parsed structured-data document.
    Data(AssetHandle<serde_json::Value>),
}

impl LoadedAsset {
    /// The kind of this asset.
    pub fn kind(&self) -> AssetKind {
        match self {
            LoadedAsset::Image(_) => AssetKind::Image,
            LoadedAsset::Audio(_) => AssetKind::Audio,
            LoadedAsset::Data(_) => AssetKind::Data,
        }
    }

    /// Returns the image handle if this is an image.
    pub fn as_image(&self) -> Option<&AssetHandle<ImageData>> {
        match self {
            LoadedAsset::Image(handle) => Some(handle),
            _ => None,
        }
    }

    /// Returns the sound handle if this is audio.
    pub fn as_sound(&self) -> Option<&AssetHandle<SoundData>> {
        match self {
            LoadedAsset::Audio(handle) => Some(handle),
            _ => None,
        }
    }

    /// Returns the document handle if this is structured data.
    pub fn as_data(&self) -> Option<&AssetHandle<serde_json::Value>> {
        match self {
            LoadedAsset::Data(handle) => Some(handle),
            _ => None,
        }
    }
}

/// The results of loading, keyed by `(kind, key)`.
///
/// Keys are scoped per kind: an image and a sound may share the key `"intro"`.
/// The table is cheap to clone since every entry is a shared handle.
#[derive(Debug, Clone, Default)]
pub struct LoadedAssetTable {
    entries: HashMap<(AssetKind, String), LoadedAsset>,
}

impl LoadedAssetTable {
    /// Creates a new, empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an asset under `key`, returning the entry it replaced, if any.
    /// The kind is taken from the asset itself.
    pub fn insert(&mut self, key: impl Into<String>, asset: LoadedAsset) -> Option<LoadedAsset> {
        self.entries.insert((asset.kind(), key.into()), asset)
    }

    /// Looks up an asset. Returns `None` if nothing was loaded under that key.
    pub fn get(&self, kind: AssetKind, key: &str) -> Option<&LoadedAsset> {
        // Borrowed lookup on a tuple key needs an owned String; keys are short.
        self.entries.get(&(kind, key.to_string()))
    }

    /// Checks if an asset was loaded under `(kind, key)`.
    pub fn contains(&self, kind: AssetKind, key: &str) -> bool {
        self.get(kind, key).is_some()
    }

    /// Typed lookup for images.
    pub fn image(&self, key: &str) -> Option<&AssetHandle<ImageData>> {
        self.get(AssetKind::Image, key).and_then(LoadedAsset::as_image)
    }

    /// Typed lookup for sounds.
    pub fn sound(&self, key: &str) -> Option<&AssetHandle<SoundData>> {
        self.get(AssetKind::Audio, key).and_then(LoadedAsset::as_sound)
    }

    /// Typed lookup for structured data.
    pub fn data(&self, key: &str) -> Option<&AssetHandle<serde_json::Value>> {
        self.get(AssetKind::Data, key).and_then(LoadedAsset::as_data)
    }

    /// The number of loaded assets, across all kinds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The number of loaded assets of one kind.
    pub fn count_of(&self, kind: AssetKind) -> usize {
        self.entries.keys().filter(|(k, _)| *k == kind).count()
    }

    /// The keys loaded for one kind, sorted.
    pub fn keys(&self, kind: AssetKind) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .entries
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, key)| key.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Iterates over every `(kind, key, asset)` entry in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (AssetKind, &str, &LoadedAsset)> {
        self.entries
            .iter()
            .map(|((kind, key), asset)| (*kind, key.as_str(), asset))
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: serde_json::Value) -> LoadedAsset {
        LoadedAsset::Data(AssetHandle::new(value))
    }

    fn tiny_image() -> LoadedAsset {
        LoadedAsset::Image(AssetHandle::new(ImageData {
            pixels: vec![0; 4],
            width: 1,
            height: 1,
        }))
    }

    #[test]
    fn test_keys_are_scoped_per_kind() {
        let mut table = LoadedAssetTable::new();
        table.insert("intro", data(json!({"title": "Intro"})));
        table.insert("intro", tiny_image());

        assert_eq!(table.len(), 2);
        assert!(table.data("intro").is_some());
        assert!(table.image("intro").is_some());
        assert!(table.sound("intro").is_none());
        assert_eq!(table.count_of(AssetKind::Data), 1);
    }

    #[test]
    fn test_insert_returns_replaced_entry() {
        let mut table = LoadedAssetTable::new();
        assert!(table.insert("facts", data(json!(1))).is_none());

        let previous = table.insert("facts", data(json!(2)));
        assert_eq!(**previous.unwrap().as_data().unwrap(), json!(1));
        assert_eq!(**table.data("facts").unwrap(), json!(2));
    }

    #[test]
    fn test_keys_are_sorted_and_clear_empties() {
        let mut table = LoadedAssetTable::new();
        table.insert("b", data(json!(null)));
        table.insert("a", data(json!(null)));

        assert_eq!(table.keys(AssetKind::Data), vec!["a", "b"]);
        assert!(table.keys(AssetKind::Image).is_empty());

        table.clear();
        assert!(table.is_empty());
        assert!(!table.contains(AssetKind::Data, "a"));
    }
}
