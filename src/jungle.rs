//! `barrels.jungle` generation.
//!
//! The jungle assigns each resolved barrel to a variable named after its
//! package and appends every variable to `base.barrelPath`. Dependencies
//! without a barrel on disk are left out.

use crate::dependency::Dependency;
use crate::error::{MbgetError, MbgetResult};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub const HEADER: &str = "# Do not hand edit this auto generated file from mbget";

/// Jungle files have no quoting rules, so values that would break a line are
/// refused rather than escaped.
pub fn render<'a>(deps: impl IntoIterator<Item = &'a Dependency>) -> MbgetResult<String> {
    let mut out = String::new();
    let mut barrel_path = String::from("$(base.barrelPath)");

    out.push_str(HEADER);
    out.push('\n');

    for dep in deps {
        let Some(barrel) = dep.barrel_path() else {
            continue;
        };
        let name = dep.package_name();
        let barrel = barrel.display().to_string();
        if !is_variable_name(name) {
            return Err(jungle_value(name, name));
        }
        if barrel.contains(['"', '\n', '\r']) {
            return Err(jungle_value(name, &barrel));
        }

        out.push_str(&format!("{} = \"{}\"\n", name, barrel));
        barrel_path.push_str(&format!(";$({})", name));
    }

    out.push_str(&format!("base.barrelPath = {}\n", barrel_path));
    Ok(out)
}

pub fn write<'a>(path: &Path, deps: impl IntoIterator<Item = &'a Dependency>) -> Result<()> {
    let content = render(deps)?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write jungle file {}", path.display()))
}

fn is_variable_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '=' | '$' | '(' | ')' | ';' | '#'))
}

fn jungle_value(package: &str, value: &str) -> MbgetError {
    MbgetError::JungleValue {
        package: package.to_string(),
        value: value.to_string(),
    }
}
