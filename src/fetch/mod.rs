//! Barrel retrieval.
//!
//! A [`Fetcher`] turns a resolved [`Dependency`] into the bytes of a barrel
//! release asset. Fetch failures are per dependency: the update loop reports
//! them and moves on to the next barrel.

mod github;

pub use github::GithubFetcher;

use crate::dependency::Dependency;
use crate::version::VersionSpec;
use std::path::Path;
use thiserror::Error;

/// A downloaded barrel release asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarrelAsset {
    pub name: String,
    pub tag: String,
    pub content: Vec<u8>,
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("dependency '{0}' has no repository or required version")]
    Unresolved(String),

    #[error("Unable to find matching version {version}")]
    NoMatchingRelease { version: VersionSpec },

    #[error("No barrel asset found in release: {tag}")]
    NoBarrelAsset { tag: String },

    #[error("Release asset name '{0}' has no usable file name")]
    InvalidAssetName(String),

    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },
}

pub trait Fetcher {
    fn fetch(&self, dep: &Dependency) -> Result<BarrelAsset, FetchError>;
}

impl BarrelAsset {
    /// Final path component of the asset name. The barrel is written under
    /// the output directory with this name.
    pub fn file_name(&self) -> Result<&str, FetchError> {
        match Path::new(&self.name).file_name().and_then(|n| n.to_str()) {
            Some(file) if !file.is_empty() => Ok(file),
            _ => Err(FetchError::InvalidAssetName(self.name.clone())),
        }
    }
}
