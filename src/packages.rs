//! Package map (`packages.txt`): one `PackageName=>owner/repo` per line.

use crate::error::{MbgetError, MbgetResult};
use anyhow::Context;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const SEPARATOR: &str = "=>";

#[derive(Debug, Default)]
pub struct PackageMap {
    repos: HashMap<String, String>,
}

impl PackageMap {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read package map {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to load package map {}", path.display()))
    }

    pub fn parse(content: &str) -> MbgetResult<Self> {
        let mut repos = HashMap::new();

        for (idx, line) in content.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }

            let words: Vec<&str> = line.split(SEPARATOR).collect();
            let [name, repo] = words.as_slice() else {
                return Err(MbgetError::PackageMapLine {
                    line: idx + 1,
                    content: line.to_string(),
                });
            };
            repos.insert(name.trim_end().to_string(), repo.trim_end().to_string());
        }

        Ok(Self { repos })
    }

    pub fn get_repo_for_package(&self, package_name: &str) -> Option<&str> {
        self.repos.get(package_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entries() {
        let map = PackageMap::parse(
            "MonkeyInject=>gcaufield/MonkeyInject\nMonkeyTest => gcaufield/MonkeyTest  \n",
        )
        .unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(
            map.get_repo_for_package("MonkeyInject"),
            Some("gcaufield/MonkeyInject")
        );
        // Only trailing whitespace is trimmed from each half.
        assert_eq!(
            map.get_repo_for_package("MonkeyTest"),
            Some(" gcaufield/MonkeyTest")
        );
        assert_eq!(map.get_repo_for_package("Missing"), None);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let map = PackageMap::parse("\n\nA=>o/A\n   \n\r\nB=>o/B").unwrap();
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(PackageMap::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_missing_separator_reports_line() {
        let err = PackageMap::parse("A=>o/A\nB=>o/B\nbroken line\n").unwrap_err();
        match err {
            MbgetError::PackageMapLine { line, content } => {
                assert_eq!(line, 3);
                assert_eq!(content, "broken line");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_two_separators_rejected() {
        let err = PackageMap::parse("\n\nA=>o/A=>x\n").unwrap_err();
        assert!(matches!(err, MbgetError::PackageMapLine { line: 3, .. }));
    }

    #[test]
    fn test_later_line_overrides() {
        let map = PackageMap::parse("A=>o/A\nA=>fork/A").unwrap();
        assert_eq!(map.get_repo_for_package("A"), Some("fork/A"));
    }
}
