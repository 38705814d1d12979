//! HTTP implementation of [`AssetCatalog`].
//!
//! Vanilla assets come from three endpoints:
//!
//! - the launcher version manifest (`versions[].id`),
//! - a git tree listing of an asset mirror, one tree per version,
//! - raw file downloads from the same mirror.
//!
//! The catalog keeps the active version and its asset path list in memory.
//! Refreshes are marked in a [`Fetching`] set under the
//! [`VERSIONS`] and [`ASSETS`] keys so that callers can defer font builds
//! until the path list is available.
//!
//! ```ignore
//! use mcfont_net::{RemoteCatalog, RemoteCatalogConfig};
//!
//! let catalog = RemoteCatalog::new(RemoteCatalogConfig::default())?;
//! catalog.refresh_assets().await?;
//! let bytes = catalog.fetch("minecraft/font/default.json").await?;
//! ```

use std::collections::BTreeSet;
use std::future::Future;
use std::time::Duration;

use mcfont_core::fetching::{ASSETS, VERSIONS};
use mcfont_core::{AssetCatalog, AssetResult, DEFAULT_VERSION, Fetching, perf_span};
use parking_lot::RwLock;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::Instrument;
use url::Url;

use crate::error::{NetworkError, NetworkResult};

/// Launcher version manifest.
pub const DEFAULT_MANIFEST_URL: &str = "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";
/// Git tree listing of the asset mirror; the version is appended as a path segment.
pub const DEFAULT_TREE_URL: &str = "https://api.github.com/repos/InventivetalentDev/minecraft-assets/git/trees";
/// Raw file root of the asset mirror.
pub const DEFAULT_RAW_URL: &str = "https://raw.githubusercontent.com/InventivetalentDev/minecraft-assets";

/// Endpoint and client configuration for [`RemoteCatalog`].
#[derive(Debug, Clone)]
pub struct RemoteCatalogConfig {
    /// Version manifest URL.
    pub manifest_url: String,
    /// Tree listing base URL.
    pub tree_url: String,
    /// Raw download base URL.
    pub raw_url: String,
    /// User agent sent with every request. The tree API rejects requests without one.
    pub user_agent: String,
    /// Overall request timeout.
    pub timeout: Option<Duration>,
}

impl Default for RemoteCatalogConfig {
    fn default() -> Self {
        Self {
            manifest_url: DEFAULT_MANIFEST_URL.to_string(),
            tree_url: DEFAULT_TREE_URL.to_string(),
            raw_url: DEFAULT_RAW_URL.to_string(),
            user_agent: format!("mcfont/{} (Rust)", env!("CARGO_PKG_VERSION")),
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl RemoteCatalogConfig {
    /// Serve every endpoint from one host: `<base>/version_manifest_v2.json`,
    /// `<base>/trees` and `<base>/raw`.
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            manifest_url: format!("{base}/version_manifest_v2.json"),
            tree_url: format!("{base}/trees"),
            raw_url: format!("{base}/raw"),
            ..Self::default()
        }
    }
}

#[derive(Deserialize)]
struct VersionManifest {
    versions: Vec<ManifestVersion>,
}

#[derive(Deserialize)]
struct ManifestVersion {
    id: String,
}

#[derive(Deserialize)]
struct Tree {
    tree: Vec<TreeEntry>,
}

#[derive(Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Map a mirror tree entry to a catalog path.
///
/// Only blobs under `assets/minecraft/` are kept, minus the generated
/// `_list.json` / `_all.json` indexes. The leading `assets/` is dropped, so
/// `assets/minecraft/font/default.json` becomes `minecraft/font/default.json`.
pub fn asset_path(tree_path: &str, kind: &str) -> Option<String> {
    if kind != "blob"
        || !tree_path.starts_with("assets/minecraft/")
        || tree_path.ends_with("_list.json")
        || tree_path.ends_with("_all.json")
    {
        return None;
    }
    tree_path.strip_prefix("assets/").map(str::to_string)
}

/// An [`AssetCatalog`] backed by the launcher manifest and an asset mirror.
pub struct RemoteCatalog {
    client: reqwest::Client,
    config: RemoteCatalogConfig,
    version: RwLock<String>,
    versions: RwLock<Vec<String>>,
    paths: RwLock<BTreeSet<String>>,
    fetching: Fetching,
}

impl RemoteCatalog {
    /// Create a catalog for [`DEFAULT_VERSION`] with an empty path list.
    pub fn new(config: RemoteCatalogConfig) -> NetworkResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            config,
            version: RwLock::new(DEFAULT_VERSION.to_string()),
            versions: RwLock::new(vec![DEFAULT_VERSION.to_string()]),
            paths: RwLock::new(BTreeSet::new()),
            fetching: Fetching::new(),
        })
    }

    /// Start from `version` instead of the default.
    #[must_use]
    pub fn with_version(self, version: impl Into<String>) -> Self {
        self.change_version(version);
        self
    }

    pub fn config(&self) -> &RemoteCatalogConfig {
        &self.config
    }

    /// The in-flight refresh set.
    pub fn fetching(&self) -> &Fetching {
        &self.fetching
    }

    /// The last fetched version list.
    pub fn versions(&self) -> Vec<String> {
        self.versions.read().clone()
    }

    /// Switch the active version and forget its path list.
    ///
    /// Call [`refresh_assets`](Self::refresh_assets) afterwards to list the
    /// new version's assets.
    pub fn change_version(&self, version: impl Into<String>) {
        let version = version.into();
        tracing::info!(target: "mcfont_net", version = %version, "changing game version");
        *self.version.write() = version;
        self.paths.write().clear();
    }

    /// Fetch every version id from the manifest.
    ///
    /// While the request runs, and after it fails, the version list holds
    /// only the active version.
    pub async fn fetch_versions(&self) -> NetworkResult<Vec<String>> {
        let _guard = self
            .fetching
            .begin(VERSIONS)
            .ok_or(NetworkError::AlreadyFetching(VERSIONS))?;
        *self.versions.write() = vec![self.version()];

        let ids = self.manifest_ids().instrument(perf_span("fetch_versions")).await?;
        tracing::debug!(target: "mcfont_net", count = ids.len(), "fetched version manifest");
        *self.versions.write() = ids.clone();
        Ok(ids)
    }

    /// List the active version's assets.
    ///
    /// The path list is cleared first and stays empty if any request fails.
    /// Returns the number of paths listed. If the version changes while the
    /// listing is in flight, the stale listing is discarded.
    pub async fn refresh_assets(&self) -> NetworkResult<usize> {
        let _guard = self
            .fetching
            .begin(ASSETS)
            .ok_or(NetworkError::AlreadyFetching(ASSETS))?;
        let version = self.version();
        self.paths.write().clear();

        let paths = self
            .list_assets(&version)
            .instrument(perf_span("refresh_assets"))
            .await
            .inspect_err(|e| {
                tracing::warn!(target: "mcfont_net", version = %version, error = %e, "asset listing failed");
            })?;

        if *self.version.read() != version {
            tracing::debug!(target: "mcfont_net", version = %version, "discarding listing for stale version");
            return Ok(0);
        }
        let count = paths.len();
        *self.paths.write() = paths;
        tracing::info!(target: "mcfont_net", version = %version, count, "listed assets");
        Ok(count)
    }

    async fn manifest_ids(&self) -> NetworkResult<Vec<String>> {
        let url = Url::parse(&self.config.manifest_url)?;
        let manifest: VersionManifest = self.get_json(url).await?;
        Ok(manifest.versions.into_iter().map(|v| v.id).collect())
    }

    async fn list_assets(&self, version: &str) -> NetworkResult<BTreeSet<String>> {
        let ids = self.manifest_ids().await?;
        if !ids.iter().any(|id| id == version) {
            return Err(NetworkError::UnknownVersion(version.to_string()));
        }

        let mut url = join_segments(&self.config.tree_url, [version])?;
        url.query_pairs_mut().append_pair("recursive", "1");
        let tree: Tree = self.get_json(url).await?;

        Ok(tree
            .tree
            .iter()
            .filter_map(|entry| asset_path(&entry.path, &entry.kind))
            .collect())
    }

    /// Download `assets/<path>` for the active version.
    pub async fn download(&self, path: &str) -> NetworkResult<Vec<u8>> {
        let version = self.version();
        let segments = std::iter::once(version.as_str())
            .chain(std::iter::once("assets"))
            .chain(path.split('/').filter(|s| !s.is_empty()));
        let url = join_segments(&self.config.raw_url, segments)?;

        tracing::trace!(target: "mcfont_net", url = %url, "downloading asset");
        let response = self.send(url).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> NetworkResult<T> {
        let response = self.send(url).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send(&self, url: Url) -> NetworkResult<reqwest::Response> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

/// Append percent-encoded path segments to `base`.
fn join_segments<'a>(base: &str, segments: impl IntoIterator<Item = &'a str>) -> NetworkResult<Url> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|()| NetworkError::InvalidUrl(format!("{base} cannot be a base")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

impl AssetCatalog for RemoteCatalog {
    fn version(&self) -> String {
        self.version.read().clone()
    }

    fn contains(&self, path: &str) -> bool {
        self.paths.read().contains(path)
    }

    fn paths(&self) -> Vec<String> {
        self.paths.read().iter().cloned().collect()
    }

    fn fetch(&self, path: &str) -> impl Future<Output = AssetResult<Vec<u8>>> + Send {
        let path = path.to_string();
        async move { self.download(&path).await.map_err(|e| e.into_asset_error(&path)) }
    }
}
