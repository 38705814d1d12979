//! In-flight fetch tracking.
//!
//! Bulk asset-list refreshes mark themselves in a shared [`Fetching`] set so
//! that dependent work (font builds, layout) can defer until data is
//! available, and so that a second refresh of the same kind is not started
//! while the first is still running.

use std::collections::HashSet;

use parking_lot::Mutex;

/// Key used while the asset path list is being refreshed.
pub const ASSETS: &str = "assets";
/// Key used while the version list is being refreshed.
pub const VERSIONS: &str = "versions";

/// A set of in-flight fetch keys.
#[derive(Debug, Default)]
pub struct Fetching {
    keys: Mutex<HashSet<String>>,
}

impl Fetching {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as in flight.
    ///
    /// Returns `None` if `key` is already in flight. The key is cleared when
    /// the returned guard is dropped.
    pub fn begin(&self, key: &str) -> Option<FetchGuard<'_>> {
        let inserted = self.keys.lock().insert(key.to_string());
        if !inserted {
            tracing::debug!(target: "mcfont_core::assets", key, "fetch already in flight");
            return None;
        }
        Some(FetchGuard {
            owner: self,
            key: key.to_string(),
        })
    }

    /// Whether `key` is in flight.
    pub fn is_fetching(&self, key: &str) -> bool {
        self.keys.lock().contains(key)
    }

    /// Whether anything is in flight.
    pub fn is_idle(&self) -> bool {
        self.keys.lock().is_empty()
    }
}

/// Clears its key from the owning [`Fetching`] set on drop.
#[derive(Debug)]
pub struct FetchGuard<'a> {
    owner: &'a Fetching,
    key: String,
}

impl FetchGuard<'_> {
    /// The guarded key.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.owner.keys.lock().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_is_exclusive_per_key() {
        let fetching = Fetching::new();
        let guard = fetching.begin(ASSETS).unwrap();
        assert_eq!(guard.key(), ASSETS);
        assert!(fetching.is_fetching(ASSETS));
        assert!(fetching.begin(ASSETS).is_none());

        // Other keys are independent.
        let versions = fetching.begin(VERSIONS);
        assert!(versions.is_some());

        drop(guard);
        assert!(!fetching.is_fetching(ASSETS));
        drop(versions);
        assert!(fetching.is_idle());
    }
}
