//! Fatal errors that abort a run before or during resolution.
//!
//! Per-dependency fetch failures are not here; see [`crate::fetch::FetchError`].

use std::path::PathBuf;
use thiserror::Error;

pub type MbgetResult<T> = Result<T, MbgetError>;

#[derive(Error, Debug)]
pub enum MbgetError {
    #[error("Failed to parse manifest XML: {0}")]
    ManifestParse(String),

    #[error("Invalid manifest XML: root element is not a Connect IQ manifest")]
    ManifestRoot,

    #[error("Manifest <{element}> is missing the '{attribute}' attribute")]
    ManifestAttribute { element: String, attribute: String },

    #[error("Poorly formatted package map on line {line}: {content}")]
    PackageMapLine { line: usize, content: String },

    #[error("No repository known for package '{0}'. Add it to the package map.")]
    UnknownPackage(String),

    #[error("Invalid configuration at {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("Dependency '{0}' has no barrel on disk to record")]
    MissingArtifact(String),

    #[error("Cannot write {value:?} for '{package}' into the jungle file")]
    JungleValue { package: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_map_error_names_line() {
        let err = MbgetError::PackageMapLine {
            line: 3,
            content: "a=>b=>c".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Poorly formatted package map on line 3: a=>b=>c"
        );
    }

    #[test]
    fn test_unknown_package_display() {
        let err = MbgetError::UnknownPackage("Pkg".to_string());
        assert!(err.to_string().contains("'Pkg'"));
    }
}
