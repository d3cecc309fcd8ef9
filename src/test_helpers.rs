//! Common test fixtures shared across test modules.
use crate::{
    forge::{traits::MockReleaseSource, types::Release},
    report::{Dependency, ResolveMode},
};

/// Releases tagged `v0.0.<start>` through `v0.0.<start + count - 1>`.
pub fn numbered_releases(start: usize, count: usize) -> Vec<Release> {
    (start..start + count)
        .map(|n| Release::new(format!("v0.0.{n}")))
        .collect()
}

/// Releases for the given tags, in order.
pub fn releases_from(tags: &[&str]) -> Vec<Release> {
    tags.iter().map(|tag| Release::new(*tag)).collect()
}

/// Mock source whose release listing is a single short page of `tags`.
pub fn single_page_source(tags: &[&str]) -> MockReleaseSource {
    let page = releases_from(tags);
    let mut mock = MockReleaseSource::new();
    mock.expect_list_releases()
        .times(1)
        .returning(move |_, _, _| Ok(page.clone()));
    mock
}

/// Dependency on `madler/zlib` releases pinned at `pinned`.
pub fn zlib_dependency(pinned: &str) -> Dependency {
    Dependency {
        name: "zlib".to_string(),
        pinned_version: pinned.to_string(),
        owner: "madler".to_string(),
        repo: "zlib".to_string(),
        use_tags: false,
        limit: None,
        constraint_format: None,
        mode: ResolveMode::Greatest,
    }
}
