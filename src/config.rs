//! Configuration loading and parsing for `.reqcheck.toml` files.
//!
//! The file names the forge connections (`[scm.<name>]`), the libraries to
//! check (`[repos.<port>]`) and optionally the report template.
use secrecy::SecretString;
use serde::Deserialize;
use std::{collections::BTreeMap, env, fmt, fs, path::Path, str::FromStr};

use crate::{
    error::{ReqcheckError, Result},
    forge::config::{Driver, RemoteConfig},
    report::{DEFAULT_TEMPLATE, Dependency, ResolveMode},
};

/// Default configuration filename, looked up in the vcpkg root.
pub const DEFAULT_CONFIG_FILE: &str = ".reqcheck.toml";

/// Where an access token comes from.
#[derive(Clone, Deserialize)]
#[serde(untagged)]
pub enum TokenSource {
    /// Token written directly in the file
    Literal(String),
    /// Token read from an environment variable at load time
    Environment { from_environment: String },
}

impl fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Literal(_) => write!(f, "Literal([REDACTED])"),
            TokenSource::Environment { from_environment } => f
                .debug_struct("Environment")
                .field("from_environment", from_environment)
                .finish(),
        }
    }
}

impl TokenSource {
    pub fn resolve(&self) -> Result<SecretString> {
        match self {
            TokenSource::Literal(token) => Ok(SecretString::from(token.clone())),
            TokenSource::Environment { from_environment } => {
                let token = env::var(from_environment).map_err(|_| {
                    ReqcheckError::MissingEnvToken(from_environment.clone())
                })?;
                Ok(SecretString::from(token))
            }
        }
    }
}

/// A forge connection libraries can refer to by name.
#[derive(Debug, Clone, Deserialize)]
pub struct ScmConfig {
    /// "github" or "gitlab"
    pub driver: String,
    /// Instance uri, defaults to the driver's public instance
    pub uri: Option<String>,
    pub token: TokenSource,
}

impl ScmConfig {
    pub fn remote_config(&self) -> Result<RemoteConfig> {
        let driver = self.driver.parse::<Driver>()?;
        let uri = self
            .uri
            .clone()
            .unwrap_or_else(|| driver.default_uri().to_string());

        Ok(RemoteConfig {
            driver,
            uri,
            token: self.token.resolve()?,
        })
    }
}

/// A library to check, keyed by its vcpkg port name.
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryConfig {
    /// Key into the `[scm]` table
    pub host: String,
    pub owner: String,
    pub repo: String,
    /// Read tags rather than releases (default: false)
    #[serde(default)]
    pub tags: bool,
    /// Constraint format, `%s` is replaced with the pinned version
    pub constraint: Option<String>,
    /// Maximum number of releases to read
    pub limit: Option<usize>,
    /// Only consider the first `count` matching releases
    pub count: Option<usize>,
}

impl LibraryConfig {
    /// Dependency named `name` pinned at `pinned_version`.
    pub fn dependency(&self, name: &str, pinned_version: &str) -> Dependency {
        Dependency {
            name: name.to_string(),
            pinned_version: pinned_version.to_string(),
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            use_tags: self.tags,
            limit: self.limit,
            constraint_format: self.constraint.clone(),
            mode: self
                .count
                .map(ResolveMode::First)
                .unwrap_or(ResolveMode::Greatest),
        }
    }
}

/// Root configuration structure for `.reqcheck.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scm: BTreeMap<String, ScmConfig>,
    pub repos: BTreeMap<String, LibraryConfig>,
    /// Tera report template
    pub template: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        content.parse()
    }

    /// Configured template with surrounding whitespace removed, or the
    /// default one.
    pub fn template(&self) -> &str {
        self.template
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TEMPLATE)
    }
}

impl FromStr for Config {
    type Err = ReqcheckError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}
