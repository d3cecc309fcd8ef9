//! Implements the ReleaseSource trait for Gitlab
use gitlab::{Gitlab as GitlabClient, api::Query};
use log::*;
use secrecy::ExposeSecret;
use url::Url;

use crate::{
    error::{ListKind, ReqcheckError, Result},
    forge::{
        config::{Driver, RemoteConfig},
        traits::ReleaseSource,
        types::{PageOptions, Release},
    },
};

mod endpoints;
mod types;

use endpoints::{ReleasesPage, TagsPage};
use types::{GitlabRelease, GitlabTag};

/// GitLab release source using the blocking gitlab client.
pub struct Gitlab {
    gl: GitlabClient,
}

impl Gitlab {
    /// Create GitLab client with token authentication. The API base is
    /// `<uri>/api/v4`.
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let parsed =
            Url::parse(&config.uri).map_err(|source| ReqcheckError::InvalidUri {
                uri: config.uri.clone(),
                source,
            })?;

        let base = instance_base(&parsed).ok_or_else(|| ReqcheckError::InvalidUri {
            uri: config.uri.clone(),
            source: url::ParseError::EmptyHost,
        })?;

        debug!(
            "connecting to gitlab instance: gitlab-url: {}, base-url: {}://{base}/api/v4",
            config.uri,
            parsed.scheme()
        );

        let mut builder =
            gitlab::GitlabBuilder::new(base, config.token.expose_secret());

        if parsed.scheme() == "http" {
            builder.insecure();
        }

        let gl = builder.build().map_err(|err| ReqcheckError::Connect {
            driver: Driver::Gitlab.to_string(),
            uri: config.uri.clone(),
            source: err.into(),
        })?;

        Ok(Self { gl })
    }
}

/// Host, optional port and path prefix of a GitLab instance uri, e.g.
/// `example.com:8443/gitlab` for an instance served under a sub-path.
fn instance_base(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    let path = url.path().trim_end_matches('/');

    match url.port() {
        Some(port) => Some(format!("{host}:{port}{path}")),
        None => Some(format!("{host}{path}")),
    }
}

fn project_path(owner: &str, repo: &str) -> String {
    format!("{owner}/{repo}")
}

impl ReleaseSource for Gitlab {
    fn list_releases(
        &self,
        owner: &str,
        repo: &str,
        opts: PageOptions,
    ) -> Result<Vec<Release>> {
        let project = project_path(owner, repo);
        let endpoint = ReleasesPage::new(project.as_str(), opts);

        let releases: Vec<GitlabRelease> =
            endpoint.query(&self.gl).map_err(|err| {
                ReqcheckError::provider(ListKind::Releases, owner, repo, err)
            })?;

        let releases = releases
            .into_iter()
            .map(|release| {
                debug!(
                    "found release: tag: {}, commit: {}",
                    release.tag_name,
                    release.commit_id()
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
        let project = project_path(owner, repo);
        let endpoint = TagsPage::new(project.as_str(), opts);

        let tags: Vec<GitlabTag> = endpoint.query(&self.gl).map_err(|err| {
            ReqcheckError::provider(ListKind::Tags, owner, repo, err)
        })?;

        let tags = tags
            .into_iter()
            .map(|tag| {
                debug!("found tag: tag: {}, commit: {}", tag.name, tag.commit.id);
                Release::new(tag.name)
            })
            .collect();

        Ok(tags)
    }
}
