//! Working set of a project's barrel dependencies.
//!
//! A `Project` is built from the manifest, the package map and a validated
//! [`Cache`]. Each declared package becomes one [`Dependency`] with its
//! required version and repository attached; cache hits also get their
//! barrel path. The set is kept in manifest order.

use crate::cache::Cache;
use crate::dependency::Dependency;
use crate::error::{MbgetError, MbgetResult};
use crate::jungle;
use crate::manifest::Manifest;
use crate::packages::PackageMap;
use anyhow::Result;
use std::path::Path;

pub struct Project<'c> {
    dependencies: Vec<Dependency>,
    cache: &'c mut Cache,
}

impl<'c> Project<'c> {
    pub fn new(manifest: &Manifest, packages: &PackageMap, cache: &'c mut Cache) -> MbgetResult<Self> {
        let mut dependencies = Vec::new();

        for name in manifest.get_depends() {
            let mut dep = Dependency::new(name);
            if let Some(version) = manifest.get_required_version(name) {
                dep.set_version(version);
            }

            let repo = packages
                .get_repo_for_package(name)
                .ok_or_else(|| MbgetError::UnknownPackage(name.to_string()))?;
            dep.set_repo(repo);

            if cache.contains(&dep)
                && let Some(barrel) = cache.barrel_for(&dep)
            {
                dep.set_barrel_path(barrel);
            }

            dependencies.push(dep);
        }

        Ok(Self {
            dependencies,
            cache,
        })
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Dependencies already satisfied by the cache.
    pub fn cached_dependencies(&self) -> Vec<&Dependency> {
        self.dependencies
            .iter()
            .filter(|dep| self.cache.contains(dep))
            .collect()
    }

    /// Dependencies that still need to be fetched.
    pub fn uncached_dependencies(&self) -> Vec<&Dependency> {
        self.dependencies
            .iter()
            .filter(|dep| !self.cache.contains(dep))
            .collect()
    }

    /// Record a freshly fetched dependency and persist the cache immediately,
    /// so an interrupted run keeps every barrel fetched before it stopped.
    pub fn update_dependency(&mut self, dep: Dependency) -> Result<()> {
        self.cache.add(&dep)?;
        self.cache.persist()?;
        self.upsert(dep);
        Ok(())
    }

    pub fn write_barrel_jungle(&self, path: &Path) -> Result<()> {
        jungle::write(path, &self.dependencies)
    }

    fn upsert(&mut self, dep: Dependency) {
        match self
            .dependencies
            .iter_mut()
            .find(|existing| existing.package_name() == dep.package_name())
        {
            Some(existing) => *existing = dep,
            None => self.dependencies.push(dep),
        }
    }
}
