//! # mbget - Connect IQ Barrel Package Manager
//!
//! mbget reads the barrel dependencies declared in a Connect IQ
//! `manifest.xml`, downloads matching barrels from GitHub releases and
//! writes a `barrels.jungle` file the Connect IQ compiler can include.
//!
//! ## Quick Start
//!
//! ```bash
//! # packages.txt maps each barrel to the repository that releases it
//! echo "MonkeyInject=>gcaufield/MonkeyInject" > packages.txt
//!
//! # Fetch everything not already cached and regenerate barrels.jungle
//! mbget update
//! ```
//!
//! ## Module Organization
//!
//! - [`project`] - Builds the dependency set from manifest, package map and cache
//! - [`update`] - Fetches uncached barrels and regenerates the jungle
//! - [`cache`] - Digest-checked record of downloaded barrels
//! - [`fetch`] - Barrel retrieval (GitHub releases)

/// Barrel cache (`.mbgetcache`).
pub mod cache;

/// Configuration layering (CLI, `mbget.toml`, defaults).
pub mod config;

/// Declared dependency records.
pub mod dependency;

/// Fatal error types.
pub mod error;

/// Barrel download backends.
pub mod fetch;

/// SHA-256 file digests.
pub mod hasher;

/// `barrels.jungle` generation.
pub mod jungle;

/// `manifest.xml` parsing.
pub mod manifest;

/// Package name to repository map.
pub mod packages;

/// Dependency resolution against the cache.
pub mod project;

/// Update orchestration.
pub mod update;

/// Required-version matching.
pub mod version;

pub use error::{MbgetError, MbgetResult};
