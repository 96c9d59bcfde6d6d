//! A single declared barrel dependency.

use crate::version::VersionSpec;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Dependency {
    package_name: String,
    required_version: Option<VersionSpec>,
    repo: Option<String>,
    barrel_path: Option<PathBuf>,
    resolved_tag: Option<String>,
}

impl Dependency {
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            required_version: None,
            repo: None,
            barrel_path: None,
            resolved_tag: None,
        }
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn version(&self) -> Option<&VersionSpec> {
        self.required_version.as_ref()
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.required_version = Some(VersionSpec::new(version));
    }

    pub fn repo(&self) -> Option<&str> {
        self.repo.as_deref()
    }

    pub fn set_repo(&mut self, repo: impl Into<String>) {
        self.repo = Some(repo.into());
    }

    /// Local path of the barrel, once it is known to be on disk.
    pub fn barrel_path(&self) -> Option<&Path> {
        self.barrel_path.as_deref()
    }

    pub fn set_barrel_path(&mut self, path: impl Into<PathBuf>) {
        self.barrel_path = Some(path.into());
    }

    /// Release tag the barrel was fetched from, if this run fetched it.
    pub fn resolved_tag(&self) -> Option<&str> {
        self.resolved_tag.as_deref()
    }

    pub fn set_resolved_tag(&mut self, tag: impl Into<String>) {
        self.resolved_tag = Some(tag.into());
    }

    /// `name:version` label used in user-facing messages.
    pub fn label(&self) -> String {
        match &self.required_version {
            Some(v) => format!("{}:{}", self.package_name, v),
            None => self.package_name.clone(),
        }
    }
}

// The barrel path and resolved tag are run-local state and do not take part in identity.
impl PartialEq for Dependency {
    fn eq(&self, other: &Self) -> bool {
        self.package_name == other.package_name
            && self.required_version == other.required_version
            && self.repo == other.repo
    }
}

impl Eq for Dependency {}

#[cfg(test)]
mod tests {
    use super::*;

    fn dep(name: &str, version: &str, repo: &str) -> Dependency {
        let mut d = Dependency::new(name);
        d.set_version(version);
        d.set_repo(repo);
        d
    }

    #[test]
    fn test_new_dependency_is_unresolved() {
        let d = Dependency::new("MonkeyInject");
        assert_eq!(d.package_name(), "MonkeyInject");
        assert!(d.version().is_none());
        assert!(d.repo().is_none());
        assert!(d.barrel_path().is_none());
    }

    #[test]
    fn test_equality_ignores_barrel_path() {
        let a = dep("Pkg", "1.0.0", "owner/Pkg");
        let mut b = dep("Pkg", "1.0.0", "owner/Pkg");
        b.set_barrel_path(".mbpkg/Pkg.barrel");
        b.set_resolved_tag("v1.0.0");
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_compares_version_and_repo() {
        let a = dep("Pkg", "1.0.0", "owner/Pkg");
        assert_ne!(a, dep("Pkg", "1.0.1", "owner/Pkg"));
        assert_ne!(a, dep("Pkg", "1.0.0", "fork/Pkg"));
        assert_ne!(a, dep("Other", "1.0.0", "owner/Pkg"));
    }

    #[test]
    fn test_label() {
        assert_eq!(dep("Pkg", "1.0", "o/Pkg").label(), "Pkg:1.0");
        assert_eq!(Dependency::new("Pkg").label(), "Pkg");
    }
}
