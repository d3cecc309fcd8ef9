//! Configuration for forge connections and the driver factory.
use secrecy::SecretString;
use std::{fmt, str::FromStr};

use crate::{
    error::{ReqcheckError, Result},
    forge::{github::Github, gitlab::Gitlab, traits::ReleaseSource},
};

/// Driver name for GitHub.com and GitHub Enterprise.
pub const DRIVER_GITHUB: &str = "github";
/// Driver name for GitLab.com and self-hosted GitLab.
pub const DRIVER_GITLAB: &str = "gitlab";

/// Default instance uri for the github driver.
pub const DEFAULT_GITHUB_URI: &str = "https://github.com";
/// Default instance uri for the gitlab driver.
pub const DEFAULT_GITLAB_URI: &str = "https://gitlab.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Supported forge drivers.
pub enum Driver {
    Github,
    Gitlab,
}

impl Driver {
    pub fn default_uri(&self) -> &'static str {
        match self {
            Driver::Github => DEFAULT_GITHUB_URI,
            Driver::Gitlab => DEFAULT_GITLAB_URI,
        }
    }

    /// Environment variable holding a token for this driver.
    pub fn token_env_var(&self) -> &'static str {
        match self {
            Driver::Github => "GITHUB_TOKEN",
            Driver::Gitlab => "GITLAB_TOKEN",
        }
    }
}

impl FromStr for Driver {
    type Err = ReqcheckError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            DRIVER_GITHUB => Ok(Driver::Github),
            DRIVER_GITLAB => Ok(Driver::Gitlab),
            other => Err(ReqcheckError::UnknownDriver(other.to_string())),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Driver::Github => write!(f, "{DRIVER_GITHUB}"),
            Driver::Gitlab => write!(f, "{DRIVER_GITLAB}"),
        }
    }
}

/// Connection details for a forge instance.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Which forge implementation to talk to.
    pub driver: Driver,
    /// Instance uri (e.g. "https://github.com").
    pub uri: String,
    /// Access token for authentication.
    pub token: SecretString,
}

/// Create the release source for a forge connection.
pub fn create_source(config: &RemoteConfig) -> Result<Box<dyn ReleaseSource>> {
    match config.driver {
        Driver::Github => Ok(Box::new(Github::new(config)?)),
        Driver::Gitlab => Ok(Box::new(Gitlab::new(config)?)),
    }
}
