//! In-memory release source for command tests.
use reqcheck::{
    error::Result,
    forge::{
        traits::ReleaseSource,
        types::{PageOptions, Release},
    },
};

/// Serves fixed tags, split into pages the size the caller asks for.
pub struct StaticSource {
    releases: Vec<String>,
    tags: Vec<String>,
}

impl StaticSource {
    pub fn releases(tags: &[&str]) -> Self {
        Self {
            releases: tags.iter().map(|t| t.to_string()).collect(),
            tags: vec![],
        }
    }

    pub fn tags(tags: &[&str]) -> Self {
        Self::releases(&[]).with_tags(tags)
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }
}

fn page(all: &[String], opts: PageOptions) -> Vec<Release> {
    let per_page = usize::from(opts.per_page);
    let start = (opts.page as usize - 1) * per_page;

    all.iter()
        .skip(start)
        .take(per_page)
        .map(|tag| Release::new(tag.as_str()))
        .collect()
}

impl ReleaseSource for StaticSource {
    fn list_releases(
        &self,
        _owner: &str,
        _repo: &str,
        opts: PageOptions,
    ) -> Result<Vec<Release>> {
        Ok(page(&self.releases, opts))
    }

    fn list_tags(
        &self,
        _owner: &str,
        _repo: &str,
        opts: PageOptions,
    ) -> Result<Vec<Release>> {
        Ok(page(&self.tags, opts))
    }
}
