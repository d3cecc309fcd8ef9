//! Implements the ReleaseSource trait for Github
use log::*;
use octocrab::Octocrab;
use tokio::runtime::Runtime;
use url::Url;

use crate::{
    error::{ListKind, ReqcheckError, Result},
    forge::{
        config::{Driver, RemoteConfig},
        traits::ReleaseSource,
        types::{PageOptions, Release},
    },
};

/// Hostname of the public GitHub instance.
const GITHUB_HOST: &str = "github.com";
/// API base for the public GitHub instance.
const GITHUB_API_URI: &str = "https://api.github.com";
/// API path for GitHub Enterprise instances.
const ENTERPRISE_API_PATH: &str = "./api/v3/";

/// GitHub release source using Octocrab. Octocrab is async, so each call is
/// driven to completion on a private current-thread runtime.
pub struct Github {
    instance: Octocrab,
    rt: Runtime,
}

impl Github {
    /// Create GitHub client with personal access token authentication and API
    /// base URL resolved from the instance uri.
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let base_uri = api_base_uri(&config.uri)?;

        debug!(
            "connecting to github instance: github-url: {}, base-url: {base_uri}",
            config.uri
        );

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let token = config.token.clone();

        let instance = rt
            .block_on(async {
                Octocrab::builder()
                    .personal_token(token)
                    .base_uri(base_uri.as_str())?
                    .build()
            })
            .map_err(|err| ReqcheckError::Connect {
                driver: Driver::Github.to_string(),
                uri: config.uri.clone(),
                source: err.into(),
            })?;

        Ok(Self { instance, rt })
    }
}

/// Resolve the REST API base for a GitHub instance uri. GitHub.com has a
/// dedicated API host, Enterprise serves the API under `/api/v3/`.
fn api_base_uri(uri: &str) -> Result<String> {
    let parsed = Url::parse(uri).map_err(|source| ReqcheckError::InvalidUri {
        uri: uri.to_string(),
        source,
    })?;

    if parsed.host_str() == Some(GITHUB_HOST) {
        return Ok(GITHUB_API_URI.to_string());
    }

    let base = parsed.join(ENTERPRISE_API_PATH).map_err(|source| {
        ReqcheckError::InvalidUri {
            uri: uri.to_string(),
            source,
        }
    })?;

    Ok(base.to_string())
}

impl ReleaseSource for Github {
    fn list_releases(
        &self,
        owner: &str,
        repo: &str,
        opts: PageOptions,
    ) -> Result<Vec<Release>> {
        let page = self
            .rt
            .block_on(async {
                self.instance
                    .repos(owner, repo)
                    .releases()
                    .list()
                    .per_page(opts.per_page)
                    .page(opts.page)
                    .send()
                    .await
            })
            .map_err(|err| {
                ReqcheckError::provider(ListKind::Releases, owner, repo, err)
            })?;

        let releases = page
            .items
            .into_iter()
            .map(|release| {
                debug!(
                    "found release: tag: {}, commit: {}",
                    release.tag_name, release.target_commitish
                );
                Release::new(release.tag_name)
            })
            .collect();

        Ok(releases)
    }

    fn list_tags(
        &self,
        owner: &str,
        repo: &str,
        opts: PageOptions,
    ) -> Result<Vec<Release>> {
        let page = self
            .rt
            .block_on(async {
                self.instance
                    .repos(owner, repo)
                    .list_tags()
                    .per_page(opts.per_page)
                    .page(opts.page)
                    .send()
                    .await
            })
            .map_err(|err| {
                ReqcheckError::provider(ListKind::Tags, owner, repo, err)
            })?;

        let tags = page
            .items
            .into_iter()
            .map(|tag| {
                debug!("found tag: tag: {}, commit: {}", tag.name, tag.commit.sha);
                Release::new(tag.name)
            })
            .collect();

        Ok(tags)
    }
}
