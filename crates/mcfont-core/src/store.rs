//! Key-value blob storage for user files.
//!
//! User resource-pack files (font descriptors, atlases, hex archives) live in
//! a flat key space of `/`-separated paths such as `custom/font/foobar.json`.
//! Prefix operations ([`BlobStore::rename`], [`BlobStore::delete`]) treat the
//! key space like directories: a prefix matches whole path segments, so
//! `custom/font` matches `custom/font/a.json` but not `custom/fonts/a.json`.
//!
//! # Example
//!
//! ```
//! use mcfont_core::{BlobStore, MemoryBlobStore};
//!
//! let mut store = MemoryBlobStore::new();
//! store.write("custom/font/foobar.json", br#"{"providers":[]}"#.to_vec());
//! store.rename("custom", "mine");
//!
//! assert!(store.exists("mine/font/foobar.json"));
//! assert!(!store.exists("custom/font/foobar.json"));
//! ```

use std::collections::BTreeMap;

use crate::error::FileNameError;

/// File extensions that may be stored.
pub const ALLOWED_TYPES: [&str; 5] = ["png", "json", "ttf", "otf", "zip"];

/// A flat key-value store of file contents.
pub trait BlobStore {
    /// Read the contents of a stored file.
    fn read(&self, path: &str) -> Option<Vec<u8>>;

    /// Store a file, replacing any previous contents.
    fn write(&mut self, path: &str, data: Vec<u8>);

    /// Check whether a file is stored at `path`.
    fn exists(&self, path: &str) -> bool;

    /// List every stored path.
    fn list(&self) -> Vec<String>;

    /// Move a single file. Returns `false` if `old` is not stored.
    fn rename_file(&mut self, old: &str, new: &str) -> bool;

    /// Remove a single file. Returns `false` if nothing was stored.
    fn delete_file(&mut self, path: &str) -> bool;

    /// Move every file under `old_prefix` to `new_prefix`.
    ///
    /// Returns the number of files moved.
    fn rename(&mut self, old_prefix: &str, new_prefix: &str) -> usize {
        let old: Vec<&str> = split_segments(old_prefix);
        let new: Vec<&str> = split_segments(new_prefix);

        let mut moved = 0;
        for file in self.list() {
            let segments: Vec<&str> = file.split('/').collect();
            if !has_prefix(&segments, &old) {
                continue;
            }

            let target = new
                .iter()
                .chain(segments[old.len()..].iter())
                .copied()
                .collect::<Vec<_>>()
                .join("/");
            if target == file {
                continue;
            }
            if self.rename_file(&file, &target) {
                moved += 1;
            }
        }
        moved
    }

    /// Remove every file under `prefix`.
    ///
    /// Returns the number of files removed.
    fn delete(&mut self, prefix: &str) -> usize {
        let prefix: Vec<&str> = split_segments(prefix);

        let mut removed = 0;
        for file in self.list() {
            let segments: Vec<&str> = file.split('/').collect();
            if has_prefix(&segments, &prefix) && self.delete_file(&file) {
                removed += 1;
            }
        }
        removed
    }
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn has_prefix(segments: &[&str], prefix: &[&str]) -> bool {
    segments.len() >= prefix.len() && segments.iter().zip(prefix).all(|(a, b)| a == b)
}

/// In-memory [`BlobStore`] backed by an ordered map.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the starter font descriptor.
    ///
    /// The starter descriptor at `custom/font/foobar.json` references
    /// `minecraft:default`, so a fresh workspace previews the vanilla font.
    pub fn with_starter_font() -> Self {
        let mut store = Self::new();
        store.write(STARTER_FONT_PATH, STARTER_FONT.as_bytes().to_vec());
        store
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Path of the starter font descriptor.
pub const STARTER_FONT_PATH: &str = "custom/font/foobar.json";

const STARTER_FONT: &str = r#"{
    "providers": [
        {
            "type": "reference",
            "id": "minecraft:default"
        }
    ]
}"#;

impl BlobStore for MemoryBlobStore {
    fn read(&self, path: &str) -> Option<Vec<u8>> {
        self.files.get(path).cloned()
    }

    fn write(&mut self, path: &str, data: Vec<u8>) {
        self.files.insert(path.to_string(), data);
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn list(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    fn rename_file(&mut self, old: &str, new: &str) -> bool {
        match self.files.remove(old) {
            Some(data) => {
                self.files.insert(new.to_string(), data);
                true
            }
            None => false,
        }
    }

    fn delete_file(&mut self, path: &str) -> bool {
        self.files.remove(path).is_some()
    }
}

/// Normalize a path by dropping empty segments (`a//b/` becomes `a/b`).
pub fn filter_path(input: &str) -> String {
    split_segments(input).join("/")
}

/// Check whether `input` may be used as a new file name.
///
/// When renaming, pass the current name as `original` so that keeping the
/// same name is not reported as a conflict.
pub fn validate_file(
    store: &impl BlobStore,
    input: &str,
    original: Option<&str>,
) -> Result<String, FileNameError> {
    let input = filter_path(input);
    if original.is_none_or(|o| o != input) && store.exists(&input) {
        return Err(FileNameError::AlreadyExists(input));
    }

    let last = input.rsplit('/').next().unwrap_or_default();
    if let Some((_, extension)) = last.rsplit_once('.') {
        if !ALLOWED_TYPES.contains(&extension) {
            return Err(FileNameError::DisallowedType {
                extension: extension.to_string(),
                allowed: ALLOWED_TYPES.join(","),
            });
        }
    }

    Ok(input)
}

/// Find a free path for `name`, appending ` (n)` when it is taken.
pub fn available_path(store: &impl BlobStore, name: &str, extension: Option<&str>) -> String {
    let full = |n: &str| match extension {
        Some(ext) => format!("{n}.{ext}"),
        None => n.to_string(),
    };

    let candidate = full(name);
    if !store.exists(&candidate) {
        return candidate;
    }

    let mut last = candidate;
    for i in 1..9999 {
        last = full(&format!("{name} ({i})"));
        if !store.exists(&last) {
            return last;
        }
    }
    last
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(paths: &[&str]) -> MemoryBlobStore {
        let mut store = MemoryBlobStore::new();
        for p in paths {
            store.write(p, p.as_bytes().to_vec());
        }
        store
    }

    #[test]
    fn test_read_write_exists() {
        let mut store = MemoryBlobStore::new();
        assert!(store.is_empty());
        store.write("a/b.json", b"{}".to_vec());
        assert!(store.exists("a/b.json"));
        assert_eq!(store.read("a/b.json"), Some(b"{}".to_vec()));
        assert_eq!(store.read("a/c.json"), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_rename_prefix_matches_whole_segments() {
        let mut store = store_with(&[
            "custom/font/a.json",
            "custom/font/b.json",
            "custom/fonts/c.json",
            "other/font/d.json",
        ]);

        assert_eq!(store.rename("custom/font", "pack/font"), 2);
        assert!(store.exists("pack/font/a.json"));
        assert!(store.exists("pack/font/b.json"));
        assert!(store.exists("custom/fonts/c.json"));
        assert!(store.exists("other/font/d.json"));
        assert_eq!(store.read("pack/font/a.json"), Some(b"custom/font/a.json".to_vec()));
    }

    #[test]
    fn test_rename_to_same_prefix_is_noop() {
        let mut store = store_with(&["custom/font/a.json"]);
        assert_eq!(store.rename("custom", "custom"), 0);
        assert!(store.exists("custom/font/a.json"));
    }

    #[test]
    fn test_delete_prefix() {
        let mut store = store_with(&["custom/font/a.json", "custom/textures/a.png", "keep/a.json"]);
        assert_eq!(store.delete("custom"), 2);
        assert_eq!(store.list(), vec!["keep/a.json".to_string()]);
    }

    #[test]
    fn test_single_file_operations() {
        let mut store = store_with(&["a.json"]);
        assert!(store.rename_file("a.json", "b.json"));
        assert!(!store.rename_file("a.json", "c.json"));
        assert!(store.delete_file("b.json"));
        assert!(!store.delete_file("b.json"));
    }

    #[test]
    fn test_starter_font() {
        let store = MemoryBlobStore::with_starter_font();
        let data = store.read(STARTER_FONT_PATH).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&data).unwrap();
        assert_eq!(value["providers"][0]["id"], "minecraft:default");
    }

    #[test]
    fn test_filter_path() {
        assert_eq!(filter_path("/a//b/c.json/"), "a/b/c.json");
        assert_eq!(filter_path(""), "");
    }

    #[test]
    fn test_validate_file() {
        let store = store_with(&["custom/font/a.json"]);

        assert_eq!(
            validate_file(&store, "custom/font/a.json", None),
            Err(FileNameError::AlreadyExists("custom/font/a.json".into()))
        );
        assert_eq!(
            validate_file(&store, "custom/font/a.json", Some("custom/font/a.json")),
            Ok("custom/font/a.json".into())
        );
        assert!(matches!(
            validate_file(&store, "custom/run.exe", None),
            Err(FileNameError::DisallowedType { extension, .. }) if extension == "exe"
        ));
        // Folders without an extension are allowed.
        assert_eq!(validate_file(&store, "custom//textures", None), Ok("custom/textures".into()));
    }

    #[test]
    fn test_available_path() {
        let store = store_with(&["new.json", "new (1).json"]);
        assert_eq!(available_path(&store, "new", Some("json")), "new (2).json");
        assert_eq!(available_path(&store, "other", Some("json")), "other.json");
        assert_eq!(available_path(&store, "folder", None), "folder");
    }
}
