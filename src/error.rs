//! Error types for reqcheck.
//!
//! Version parse failures never show up here: an unparseable tag degrades to
//! a release without a semantic version and the pipeline keeps going.

use std::fmt;

use thiserror::Error;

/// Boxed transport error returned by a forge client.
pub type SourceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which listing a provider request was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Releases,
    Tags,
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListKind::Releases => write!(f, "releases"),
            ListKind::Tags => write!(f, "tags"),
        }
    }
}

/// Main error type for reqcheck operations.
#[derive(Error, Debug)]
pub enum ReqcheckError {
    // Forge errors
    #[error("error getting {kind} from repository {owner}/{repo}: {source}")]
    Provider {
        kind: ListKind,
        owner: String,
        repo: String,
        #[source]
        source: SourceError,
    },

    #[error("could not access {owner}/{repo} releases: {source}")]
    Stream {
        owner: String,
        repo: String,
        #[source]
        source: Box<ReqcheckError>,
    },

    #[error("release query cancelled")]
    Cancelled,

    #[error("could not connect to {driver} instance {uri}: {source}")]
    Connect {
        driver: String,
        uri: String,
        #[source]
        source: SourceError,
    },

    // Configuration errors
    #[error("unknown scm driver {0}")]
    UnknownDriver(String),

    #[error("could not find scm assigned to {0}")]
    UnknownHost(String),

    #[error("could not find token in environment variable {0}")]
    MissingEnvToken(String),

    #[error("could not parse constraint {constraint}: {source}")]
    ConstraintParse {
        constraint: String,
        #[source]
        source: semver::Error,
    },

    #[error("no releases of {name} match {constraint}")]
    NoMatchingRelease { name: String, constraint: String },

    #[error("could not find version string for {0}")]
    MissingVersion(String),

    #[error("invalid uri {uri}: {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: url::ParseError,
    },

    // Parsing and IO errors - automatic conversions via #[from]
    #[error("TOML parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template rendering failed: {0}")]
    Template(#[from] tera::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using ReqcheckError
pub type Result<T> = std::result::Result<T, ReqcheckError>;

impl ReqcheckError {
    /// Create a provider error with owner/repo context
    pub fn provider(
        kind: ListKind,
        owner: &str,
        repo: &str,
        source: impl Into<SourceError>,
    ) -> Self {
        Self::Provider {
            kind,
            owner: owner.to_string(),
            repo: repo.to_string(),
            source: source.into(),
        }
    }

    /// Wrap a failed page fetch as the terminal error of a release stream
    pub fn stream(owner: &str, repo: &str, source: ReqcheckError) -> Self {
        Self::Stream {
            owner: owner.to_string(),
            repo: repo.to_string(),
            source: Box::new(source),
        }
    }

    /// Create a constraint parse error
    pub fn constraint(constraint: &str, source: semver::Error) -> Self {
        Self::ConstraintParse {
            constraint: constraint.to_string(),
            source,
        }
    }

    /// Create a no matching release error
    pub fn no_match(name: &str, constraint: impl fmt::Display) -> Self {
        Self::NoMatchingRelease {
            name: name.to_string(),
            constraint: constraint.to_string(),
        }
    }
}
