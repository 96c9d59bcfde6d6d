//! Barrel cache (`<directory>/.mbgetcache`).
//!
//! The cache maps a package name to the barrel that was downloaded for it,
//! the SHA-256 digest of that barrel and the release tag it came from. It is
//! read once at startup, entries whose barrel is missing or modified are
//! dropped, and it is rewritten after every successful update so that an
//! interrupted run keeps the barrels it already fetched.
//!
//! A corrupt or unreadable cache file is not an error: it loads as empty and
//! every dependency is fetched again.

use crate::dependency::Dependency;
use crate::error::MbgetError;
use crate::hasher;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CACHE_FILE: &str = ".mbgetcache";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(rename = "asset", alias = "artifact")]
    pub artifact: PathBuf,
    pub hash: String,
    pub version: String,
}

/// Outcome of reading the cache file from disk.
#[derive(Debug)]
pub enum CacheLoad {
    Loaded(BTreeMap<String, CacheEntry>),
    Empty,
}

pub fn read_cache_file(path: &Path) -> CacheLoad {
    if !path.exists() {
        return CacheLoad::Empty;
    }

    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            debug!("Cache file {} is unreadable: {}", path.display(), e);
            return CacheLoad::Empty;
        }
    };

    match serde_json::from_str(&content) {
        Ok(entries) => CacheLoad::Loaded(entries),
        Err(e) => {
            debug!("Cache file is corrupt: {}", e);
            CacheLoad::Empty
        }
    }
}

#[derive(Debug)]
pub struct Cache {
    path: PathBuf,
    entries: BTreeMap<String, CacheEntry>,
    dirty: bool,
}

impl Cache {
    /// Load and validate the cache stored in `barrel_dir`.
    pub fn open(barrel_dir: &Path) -> Self {
        let mut cache = Self::load(barrel_dir.join(CACHE_FILE));
        cache.validate();
        cache
    }

    /// Read the cache file without validating entries against the filesystem.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match read_cache_file(&path) {
            CacheLoad::Loaded(entries) => entries,
            CacheLoad::Empty => BTreeMap::new(),
        };
        Self {
            path,
            entries,
            dirty: false,
        }
    }

    /// Drop every entry whose barrel is missing or no longer matches its digest.
    /// Returns the names of the dropped packages.
    pub fn validate(&mut self) -> Vec<String> {
        let mut invalid = Vec::new();
        for (name, entry) in &self.entries {
            if !entry.artifact.exists() {
                debug!("Asset {} removed.", entry.artifact.display());
                invalid.push(name.clone());
            } else if !hasher::matches(&entry.artifact, &entry.hash) {
                debug!("Asset {} corrupt.", entry.artifact.display());
                invalid.push(name.clone());
            }
        }

        for name in &invalid {
            self.entries.remove(name);
        }
        invalid
    }

    /// True if the cache holds a barrel for this package whose recorded
    /// version satisfies the dependency's requirement.
    pub fn contains(&self, dep: &Dependency) -> bool {
        let Some(entry) = self.entries.get(dep.package_name()) else {
            return false;
        };
        dep.version()
            .is_some_and(|required| required.matches(&entry.version))
    }

    /// Record the barrel at `dep.barrel_path()`, replacing any previous entry
    /// for the package. The cache is not written until [`Cache::persist`].
    pub fn add(&mut self, dep: &Dependency) -> Result<()> {
        let artifact = dep
            .barrel_path()
            .ok_or_else(|| MbgetError::MissingArtifact(dep.package_name().to_string()))?;

        let hash = hasher::hash_file(artifact)
            .with_context(|| format!("Failed to hash barrel {}", artifact.display()))?;

        let version = match (dep.resolved_tag(), dep.version()) {
            (Some(tag), _) => tag.to_string(),
            (None, Some(required)) => required.to_string(),
            (None, None) => String::new(),
        };

        self.entries.insert(
            dep.package_name().to_string(),
            CacheEntry {
                artifact: artifact.to_path_buf(),
                hash,
                version,
            },
        );
        self.dirty = true;
        Ok(())
    }

    /// Overwrite the cache file with the current entries.
    pub fn persist(&mut self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.entries)?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, content)
            .with_context(|| format!("Failed to write cache file {}", tmp.display()))?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(anyhow::Error::new(e)
                .context(format!("Failed to replace cache file {}", self.path.display())));
        }

        self.dirty = false;
        Ok(())
    }

    /// Cached barrel for a dependency that satisfies [`Cache::contains`].
    pub fn barrel_for(&self, dep: &Dependency) -> Option<&Path> {
        self.entries
            .get(dep.package_name())
            .map(|entry| entry.artifact.as_path())
    }

    pub fn get(&self, package_name: &str) -> Option<&CacheEntry> {
        self.entries.get(package_name)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &CacheEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn barrel_dir(&self) -> Option<&Path> {
        match self.path.parent() {
            Some(dir) if dir.as_os_str().is_empty() => Some(Path::new(".")),
            other => other,
        }
    }

    /// Delete every recorded barrel inside the cache's directory, then the
    /// cache file. Returns the number of barrels removed.
    pub fn clean(&mut self) -> Result<usize> {
        let root = self.barrel_dir().and_then(|dir| fs::canonicalize(dir).ok());
        let mut removed = 0;
        for entry in self.entries.values() {
            let Ok(artifact) = fs::canonicalize(&entry.artifact) else {
                continue;
            };
            if !root.as_ref().is_some_and(|root| artifact.starts_with(root)) {
                debug!(
                    "Skipping {}: not inside the barrel directory",
                    entry.artifact.display()
                );
                continue;
            }
            fs::remove_file(&artifact).with_context(|| {
                format!("Failed to remove barrel {}", entry.artifact.display())
            })?;
            removed += 1;
        }
        self.entries.clear();

        if self.path.exists() {
            fs::remove_file(&self.path).with_context(|| {
                format!("Failed to remove cache file {}", self.path.display())
            })?;
        }
        self.dirty = false;
        Ok(removed)
    }
}
