//! Game asset catalogs.
//!
//! An [`AssetCatalog`] knows which vanilla asset paths exist for one game
//! version (for example `minecraft/font/default.json`) and can fetch their
//! bytes. The remote implementation lives in `mcfont-net`; [`StaticCatalog`]
//! serves assets from memory for offline use and tests.

use std::collections::BTreeMap;
use std::future::Future;

use crate::error::{AssetError, AssetResult};

/// The game version previewed when nothing else is selected.
pub const DEFAULT_VERSION: &str = "23w46a";

/// A source of vanilla game assets for one version.
pub trait AssetCatalog {
    /// The version identifier the catalog currently serves.
    fn version(&self) -> String;

    /// Whether `path` is a known asset path.
    fn contains(&self, path: &str) -> bool;

    /// Every known asset path.
    fn paths(&self) -> Vec<String>;

    /// Fetch the bytes of an asset.
    fn fetch(&self, path: &str) -> impl Future<Output = AssetResult<Vec<u8>>> + Send;
}

/// An in-memory asset catalog.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    version: String,
    assets: BTreeMap<String, Vec<u8>>,
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_VERSION)
    }
}

impl StaticCatalog {
    /// Create an empty catalog for `version`.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            assets: BTreeMap::new(),
        }
    }

    /// Add an asset.
    pub fn insert(&mut self, path: impl Into<String>, data: Vec<u8>) {
        self.assets.insert(path.into(), data);
    }

    /// Builder-style variant of [`insert`](Self::insert).
    #[must_use]
    pub fn with_asset(mut self, path: impl Into<String>, data: Vec<u8>) -> Self {
        self.insert(path, data);
        self
    }
}

impl AssetCatalog for StaticCatalog {
    fn version(&self) -> String {
        self.version.clone()
    }

    fn contains(&self, path: &str) -> bool {
        self.assets.contains_key(path)
    }

    fn paths(&self) -> Vec<String> {
        self.assets.keys().cloned().collect()
    }

    fn fetch(&self, path: &str) -> impl Future<Output = AssetResult<Vec<u8>>> + Send {
        let result = self
            .assets
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_string()));
        async move { result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_catalog_fetch() {
        let catalog = StaticCatalog::default().with_asset("minecraft/font/default.json", b"{}".to_vec());

        assert_eq!(catalog.version(), DEFAULT_VERSION);
        assert!(catalog.contains("minecraft/font/default.json"));
        assert_eq!(catalog.fetch("minecraft/font/default.json").await, Ok(b"{}".to_vec()));
        assert_eq!(
            catalog.fetch("minecraft/font/missing.json").await,
            Err(AssetError::NotFound("minecraft/font/missing.json".into()))
        );
    }

    #[test]
    fn test_static_catalog_paths_sorted() {
        let mut catalog = StaticCatalog::new("1.20.4");
        catalog.insert("minecraft/b.png", vec![]);
        catalog.insert("minecraft/a.png", vec![]);
        assert_eq!(catalog.paths(), vec!["minecraft/a.png", "minecraft/b.png"]);
    }
}
