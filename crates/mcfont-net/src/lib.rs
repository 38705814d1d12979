//! Remote asset catalog for mcfont.
//!
//! [`RemoteCatalog`] implements [`mcfont_core::AssetCatalog`] over HTTP:
//!
//! - **Versions**: the launcher version manifest
//! - **Asset listing**: a recursive git tree of an asset mirror
//! - **Downloads**: raw files from the same mirror
//!
//! # Example
//!
//! ```ignore
//! use mcfont_core::AssetCatalog;
//! use mcfont_net::{RemoteCatalog, RemoteCatalogConfig};
//!
//! let catalog = RemoteCatalog::new(RemoteCatalogConfig::default())?;
//! let versions = catalog.fetch_versions().await?;
//! catalog.change_version(&versions[0]);
//! catalog.refresh_assets().await?;
//!
//! assert!(catalog.contains("minecraft/font/default.json"));
//! ```
//!
//! Logs are emitted under the `mcfont_net` target.

pub mod catalog;
mod error;

pub use catalog::{
    DEFAULT_MANIFEST_URL, DEFAULT_RAW_URL, DEFAULT_TREE_URL, RemoteCatalog, RemoteCatalogConfig, asset_path,
};
pub use error::{NetworkError, NetworkResult};
