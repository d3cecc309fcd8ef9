use semver::Version;

use crate::version::normalize;

/// Default page size used when walking a forge listing.
pub const DEFAULT_PER_PAGE: u8 = 30;
/// Forges number their pages from 1.
pub const STARTING_PAGE: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A tag or release found on a forge, with its normalized version.
pub struct Release {
    /// Tag exactly as the forge returned it
    pub tag: String,
    /// `None` when the tag could not be normalized
    pub semver: Option<Version>,
}

impl Release {
    /// Create a release for `tag`, normalizing it into a semantic version.
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let semver = normalize(&tag);
        Self { tag, semver }
    }

    /// Canonical version string, if the tag could be normalized.
    pub fn version_string(&self) -> Option<String> {
        self.semver.as_ref().map(|v| v.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Page of a paginated forge listing to retrieve.
pub struct PageOptions {
    /// Page of results to retrieve, starting at 1
    pub page: u32,
    /// Number of results to include per page
    pub per_page: u8,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            page: STARTING_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_normalizes_its_tag() {
        let release = Release::new("v1.2");
        assert_eq!(release.tag, "v1.2");
        assert_eq!(release.version_string().as_deref(), Some("1.2.0"));

        let release = Release::new("nightly");
        assert!(release.semver.is_none());
        assert!(release.version_string().is_none());
    }

    #[test]
    fn page_options_start_on_first_page() {
        let opts = PageOptions::default();
        assert_eq!(opts.page, 1);
        assert_eq!(opts.per_page, 30);
    }
}
