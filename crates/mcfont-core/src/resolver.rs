//! Namespaced asset resolution over a catalog and a blob store.
//!
//! Resource packs address files with namespaced ids such as
//! `minecraft:font/ascii.png`. Resolving an id inserts a type directory
//! between the namespace and the rest of the id, so with prefix `textures`
//! the id above becomes the storage path `minecraft/textures/font/ascii.png`.
//! User files in the [`BlobStore`] shadow catalog assets with the same path.

use crate::catalog::AssetCatalog;
use crate::error::{AssetError, AssetResult};
use crate::store::BlobStore;

/// Looks up namespaced ids against the known asset paths.
///
/// This is the seam used by font validation, which only needs to know
/// whether a referenced file exists.
pub trait NamespaceLookup {
    /// Resolve `id` to a storage path under `prefix`, if such a path exists.
    fn resolve_namespace(&self, id: &str, prefix: &[&str]) -> Option<String>;
}

/// Map a namespaced id to a storage path without checking existence.
///
/// `minecraft:font/default.json` with prefix `["font"]` becomes
/// `minecraft/font/font/default.json`. Everything after the first `:` is
/// the in-namespace path.
pub fn namespace_path(id: &str, prefix: &[&str]) -> String {
    let (namespace, rest) = id.split_once(':').unwrap_or((id, ""));
    let mut parts = Vec::with_capacity(prefix.len() + 2);
    parts.push(namespace);
    parts.extend_from_slice(prefix);
    parts.push(rest);
    parts.join("/")
}

/// Turn a storage path back into a namespaced id, dropping `strip`
/// directories after the namespace.
///
/// `custom/font/foobar.json` with `strip = 1` becomes `custom:foobar.json`.
pub fn to_namespace(path: &str, strip: usize) -> String {
    let mut segments = path.split('/');
    let namespace = segments.next().unwrap_or_default();
    let rest: Vec<&str> = segments.skip(strip).collect();
    format!("{namespace}:{}", rest.join("/"))
}

/// Combined view of the asset catalog and the user's blob store.
pub struct AssetResolver<'a, C, B> {
    catalog: &'a C,
    store: &'a B,
}

impl<C, B> Clone for AssetResolver<'_, C, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C, B> Copy for AssetResolver<'_, C, B> {}

impl<'a, C: AssetCatalog, B: BlobStore> AssetResolver<'a, C, B> {
    /// Create a resolver over a catalog and a store.
    pub fn new(catalog: &'a C, store: &'a B) -> Self {
        Self { catalog, store }
    }

    /// The underlying catalog.
    pub fn catalog(&self) -> &'a C {
        self.catalog
    }

    /// The underlying store.
    pub fn store(&self) -> &'a B {
        self.store
    }

    /// Whether `path` exists in either the catalog or the store.
    pub fn exists(&self, path: &str) -> bool {
        self.catalog.contains(path) || self.store.exists(path)
    }

    /// Read an asset, preferring the user's copy over the catalog's.
    pub async fn read(&self, path: &str) -> AssetResult<Vec<u8>> {
        if let Some(data) = self.store.read(path) {
            tracing::trace!(target: "mcfont_core::assets", path, "read from blob store");
            return Ok(data);
        }
        if self.catalog.contains(path) {
            tracing::trace!(target: "mcfont_core::assets", path, "fetching from catalog");
            return self.catalog.fetch(path).await;
        }
        Err(AssetError::NotFound(path.to_string()))
    }

    /// List namespaced ids under `dir` whose extension is one of `extensions`.
    ///
    /// Catalog assets only contribute from the `minecraft` namespace; user
    /// files contribute from every namespace. The result is sorted.
    pub fn assets_with(&self, dir: &str, extensions: &[&str]) -> Vec<String> {
        let dir_prefix = if dir.is_empty() { String::new() } else { format!("{dir}/") };
        let skip = if dir.is_empty() { 1 } else { dir.split('/').count() + 1 };
        let has_extension = |p: &str| extensions.iter().any(|e| p.ends_with(&format!(".{e}")));

        let catalog_prefix = format!("minecraft/{dir_prefix}");
        let base = self
            .catalog
            .paths()
            .into_iter()
            .filter(|p| p.starts_with(&catalog_prefix) && has_extension(p))
            .map(|p| format!("minecraft:{}", p.split('/').skip(skip).collect::<Vec<_>>().join("/")));

        let user = self.store.list().into_iter().filter_map(|p| {
            let (namespace, rest) = p.split_once('/')?;
            if !rest.starts_with(&dir_prefix) || !has_extension(&p) {
                return None;
            }
            Some(format!(
                "{namespace}:{}",
                p.split('/').skip(skip).collect::<Vec<_>>().join("/")
            ))
        });

        let mut all: Vec<String> = base.chain(user).collect();
        all.sort();
        all
    }
}

impl<C: AssetCatalog, B: BlobStore> NamespaceLookup for AssetResolver<'_, C, B> {
    fn resolve_namespace(&self, id: &str, prefix: &[&str]) -> Option<String> {
        let path = namespace_path(id, prefix);
        self.exists(&path).then_some(path)
    }
}
