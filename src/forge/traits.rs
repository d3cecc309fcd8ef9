//! Traits related to remote git forges
#[cfg(test)]
use mockall::automock;

use crate::{
    error::Result,
    forge::types::{PageOptions, Release},
};

/// Capability every forge adapter provides: one page of releases or tags.
///
/// Implementations map the forge's objects into [`Release`] values and must
/// request exactly the page described by `opts`.
#[cfg_attr(test, automock)]
pub trait ReleaseSource {
    fn list_releases(
        &self,
        owner: &str,
        repo: &str,
        opts: PageOptions,
    ) -> Result<Vec<Release>>;

    fn list_tags(
        &self,
        owner: &str,
        repo: &str,
        opts: PageOptions,
    ) -> Result<Vec<Release>>;
}
