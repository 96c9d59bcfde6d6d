//! `mbget update`: fetch every barrel the cache cannot satisfy.
//!
//! Dependencies are handled one at a time in manifest order. A failed fetch
//! is reported and skipped; it never stops the remaining dependencies, and
//! every barrel fetched before it stays recorded in the cache. Write
//! failures (barrel, cache or jungle) abort the run.

use crate::config::Config;
use crate::dependency::Dependency;
use crate::fetch::{FetchError, Fetcher};
use crate::project::Project;
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use tracing::info;

/// A dependency whose barrel could not be fetched this run.
#[derive(Debug)]
pub struct FailedDependency {
    pub label: String,
    pub error: FetchError,
}

#[derive(Debug, Default)]
pub struct UpdateReport {
    pub cached: Vec<String>,
    pub updated: Vec<String>,
    pub failed: Vec<FailedDependency>,
}

impl UpdateReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct Update<'a, 'c> {
    project: &'a mut Project<'c>,
    fetcher: &'a dyn Fetcher,
    config: &'a Config,
}

impl<'a, 'c> Update<'a, 'c> {
    pub fn new(project: &'a mut Project<'c>, fetcher: &'a dyn Fetcher, config: &'a Config) -> Self {
        Self {
            project,
            fetcher,
            config,
        }
    }

    pub fn update_project(&mut self) -> Result<UpdateReport> {
        self.config.prepare_project_dir()?;
        let mut report = UpdateReport::default();

        for dep in self.project.cached_dependencies() {
            let barrel = dep
                .barrel_path()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            println!(
                "{} Using cached {} for dependency {}",
                "⚡".green(),
                barrel,
                dep.label()
            );
            report.cached.push(dep.package_name().to_string());
        }

        let pending: Vec<Dependency> = self
            .project
            .uncached_dependencies()
            .into_iter()
            .cloned()
            .collect();

        for dep in pending {
            let name = dep.package_name().to_string();
            let label = dep.label();
            match self.update_dependency(dep)? {
                Ok(()) => report.updated.push(name),
                Err(error) => {
                    println!(
                        "{} Failed to download barrel for {} - {}",
                        "x".red(),
                        label,
                        error
                    );
                    report.failed.push(FailedDependency { label, error });
                }
            }
        }

        self.project
            .write_barrel_jungle(&self.config.jungle)
            .context("Failed to regenerate the jungle file")?;
        info!("Wrote {}", self.config.jungle.display());

        Ok(report)
    }

    /// The outer result carries fatal write errors, the inner one a fetch
    /// failure for this dependency only.
    fn update_dependency(&mut self, mut dep: Dependency) -> Result<Result<(), FetchError>> {
        println!(
            "{} Updating dependency {} from repository {}",
            "📦".blue(),
            dep.label(),
            dep.repo().unwrap_or("<unknown>")
        );

        let asset = match self.fetcher.fetch(&dep) {
            Ok(asset) => asset,
            Err(e) => return Ok(Err(e)),
        };
        let file_name = match asset.file_name() {
            Ok(name) => name,
            Err(e) => return Ok(Err(e)),
        };
        println!(
            "   {} Downloaded barrel {} from release {}",
            "✓".green(),
            file_name,
            asset.tag
        );

        let barrel = self.config.directory.join(file_name);
        fs::write(&barrel, &asset.content)
            .with_context(|| format!("Failed to write barrel {}", barrel.display()))?;

        dep.set_barrel_path(barrel);
        dep.set_resolved_tag(asset.tag.clone());
        self.project.update_dependency(dep)?;
        Ok(Ok(()))
    }
}
