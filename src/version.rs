//! Required-version matching for barrel releases.
//!
//! A `VersionSpec` is a plain textual prefix. A release tag satisfies it when
//! the tag, with one optional leading `v` removed, starts with the required
//! string. There is no semantic version ordering: `1.2` also matches
//! `1.20.0`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionSpec(String);

impl VersionSpec {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `tag` satisfies this requirement.
    pub fn matches(&self, tag: &str) -> bool {
        let tag = tag.strip_prefix('v').unwrap_or(tag);
        tag.starts_with(&self.0)
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VersionSpec {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_tag_matches() {
        let spec = VersionSpec::new("1.0.0");
        assert!(spec.matches("1.0.0"));
        assert!(spec.matches("v1.0.0"));
    }

    #[test]
    fn test_leading_v_is_optional() {
        for tag in ["0.3.1", "1.2.3", "10.0"] {
            let spec = VersionSpec::new(tag);
            assert_eq!(spec.matches(tag), spec.matches(&format!("v{}", tag)));
        }
    }

    #[test]
    fn test_only_one_v_is_stripped() {
        let spec = VersionSpec::new("1.0");
        assert!(!spec.matches("vv1.0"));
    }

    #[test]
    fn test_mismatch() {
        let spec = VersionSpec::new("2.0.0");
        assert!(!spec.matches("v1.0.0"));
        assert!(!spec.matches("release-2.0.0"));
        assert!(!spec.matches(""));
    }

    #[test]
    fn test_partial_version_matches_patch_releases() {
        let spec = VersionSpec::new("1.2");
        assert!(spec.matches("v1.2.0"));
        assert!(spec.matches("1.2.7"));
    }

    // Known quirk: matching is a textual prefix, so "1.2" also accepts "1.20.0".
    #[test]
    fn test_prefix_quirk_over_matches_minor_versions() {
        let spec = VersionSpec::new("1.2");
        assert!(spec.matches("v1.20.0"));
    }

    #[test]
    fn test_dots_are_literal() {
        let spec = VersionSpec::new("1.2");
        assert!(!spec.matches("1x2"));
    }

    #[test]
    fn test_equality_and_display() {
        assert_eq!(VersionSpec::new("1.0"), VersionSpec::from("1.0"));
        assert_ne!(VersionSpec::new("1.0"), VersionSpec::new("1.0.0"));
        assert_eq!(VersionSpec::new("1.0").to_string(), "1.0");
    }
}
