//! Release listings from Git forges (GitHub, GitLab).
//!
//! Each adapter fetches exactly one page of releases or tags and maps the
//! forge's objects into [`types::Release`] values.

/// Driver selection and the source factory.
pub mod config;

/// GitHub API client for GitHub.com and Enterprise.
pub mod github;

/// GitLab API client for GitLab.com and self-hosted instances.
pub mod gitlab;

/// Common trait for forge adapters.
pub mod traits;

/// Release and paging types shared by all adapters.
pub mod types;
