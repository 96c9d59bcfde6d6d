//! GitHub releases backend.
//!
//! Releases of `owner/repo` are listed newest first. The first release whose
//! tag satisfies the required version is used, and within it the first asset
//! named `*.barrel`.

use super::{BarrelAsset, FetchError, Fetcher};
use crate::dependency::Dependency;
use crate::version::VersionSpec;
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;
use ureq::Agent;
use ureq::http::Response;

const API_ROOT: &str = "https://api.github.com";
const USER_AGENT: &str = concat!("mbget/", env!("CARGO_PKG_VERSION"));
const PER_PAGE: usize = 100;
const REQUEST_TIMEOUT_SECS: u64 = 60;
const MAX_BARREL_BYTES: u64 = 64 * 1024 * 1024;

static BARREL_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.+\.barrel$").expect("barrel pattern is a valid regex"));

#[derive(Deserialize, Debug)]
struct Release {
    tag_name: String,
    #[serde(default)]
    assets: Vec<Asset>,
}

#[derive(Deserialize, Debug)]
struct Asset {
    name: String,
    url: String,
}

pub struct GithubFetcher {
    agent: Agent,
    token: Option<String>,
}

impl GithubFetcher {
    pub fn new(token: Option<String>) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
            .build();
        Self {
            agent: config.into(),
            token,
        }
    }

    fn get(&self, url: &str, accept: &str) -> Result<Response<ureq::Body>, FetchError> {
        debug!("GET {}", url);
        let mut request = self
            .agent
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", accept);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
        }
        request.call().map_err(|e| http_error(url, e))
    }

    fn find_release(&self, repo: &str, version: &VersionSpec) -> Result<Release, FetchError> {
        let mut page = 1;
        loop {
            let url = format!(
                "{}/repos/{}/releases?per_page={}&page={}",
                API_ROOT, repo, PER_PAGE, page
            );
            let mut response = self.get(&url, "application/vnd.github+json")?;
            let releases: Vec<Release> = response
                .body_mut()
                .read_json()
                .map_err(|e| http_error(&url, e))?;

            let count = releases.len();
            if let Some(release) = releases
                .into_iter()
                .find(|r| version.matches(&r.tag_name))
            {
                return Ok(release);
            }

            if count < PER_PAGE {
                return Err(FetchError::NoMatchingRelease {
                    version: version.clone(),
                });
            }
            page += 1;
        }
    }

    fn download(&self, asset: &Asset) -> Result<Vec<u8>, FetchError> {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.blue} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Downloading {}...", asset.name));
        pb.enable_steady_tick(Duration::from_millis(100));

        let result = self
            .get(&asset.url, "application/octet-stream")
            .and_then(|mut response| {
                response
                    .body_mut()
                    .with_config()
                    .limit(MAX_BARREL_BYTES)
                    .read_to_vec()
                    .map_err(|e| http_error(&asset.url, e))
            });

        pb.finish_and_clear();
        result
    }
}

impl Fetcher for GithubFetcher {
    fn fetch(&self, dep: &Dependency) -> Result<BarrelAsset, FetchError> {
        let (Some(repo), Some(version)) = (dep.repo(), dep.version()) else {
            return Err(FetchError::Unresolved(dep.package_name().to_string()));
        };

        let release = self.find_release(repo, version)?;
        let asset = select_barrel(&release).ok_or_else(|| FetchError::NoBarrelAsset {
            tag: release.tag_name.clone(),
        })?;
        let content = self.download(asset)?;

        Ok(BarrelAsset {
            name: asset.name.clone(),
            tag: release.tag_name.clone(),
            content,
        })
    }
}

fn select_barrel(release: &Release) -> Option<&Asset> {
    release.assets.iter().find(|a| BARREL_FILE.is_match(&a.name))
}

fn http_error(url: &str, source: ureq::Error) -> FetchError {
    FetchError::Http {
        url: url.to_string(),
        source: Box::new(source),
    }
}
