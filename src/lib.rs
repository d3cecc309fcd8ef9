//! Check upstream releases of pinned libraries.
//!
//! Tags from GitHub or GitLab are normalized into semantic versions, pulled
//! through a lazy paginated stream, filtered and reduced, then compared
//! against the versions pinned in a vcpkg checkout.
pub mod cancel;
pub mod config;
pub mod error;
pub mod forge;
pub mod manifest;
pub mod pipeline;
pub mod report;
pub mod stream;
pub mod version;

pub use error::{ReqcheckError, Result};

#[cfg(test)]
pub mod test_helpers;
