//! CLI argument parsing and forge connection setup.
use clap::{Args as ClapArgs, Parser, Subcommand};
use color_eyre::eyre::{WrapErr, eyre};
use secrecy::SecretString;
use simplelog::LevelFilter;
use std::{env, path::PathBuf, str::FromStr, time::Duration};

use reqcheck::{
    cancel::CancelToken,
    forge::config::{Driver, RemoteConfig},
    pipeline::FilterPolicy,
    stream::QueryOptions,
    version::Constraint,
};

use crate::result::Result;

/// Global CLI arguments.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value = "warn", global = true)]
    /// Log level: off, error, warn, info, debug or trace.
    pub log_level: String,

    #[arg(long, global = true)]
    /// Give up on outstanding page fetches after this many seconds.
    pub timeout: Option<u64>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the releases of a GitHub repository.
    Github(QueryArgs),

    /// List the releases of a GitLab project.
    Gitlab(QueryArgs),

    /// Check the ports of a vcpkg checkout for upgrades.
    Vcpkg(VcpkgArgs),
}

/// Arguments shared by the query subcommands.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Repository owner, organization or group.
    pub owner: String,

    /// Repository name.
    pub repo: String,

    #[arg(long, default_value = "")]
    /// Instance uri. Defaults to the public instance of the forge.
    pub uri: String,

    #[arg(long, default_value = "")]
    /// Access token. Falls back to GITHUB_TOKEN or GITLAB_TOKEN env var.
    pub token: String,

    #[arg(long, default_value_t = false)]
    /// List tags instead of releases.
    pub tags: bool,

    #[arg(long, default_value_t = false)]
    /// Include prereleases when no constraint is given.
    pub prerelease: bool,

    #[arg(long, default_value = "")]
    /// Only list versions matching this constraint (e.g. ">= 1.2, < 2").
    pub constraint: String,

    #[arg(long, default_value_t = 0)]
    /// Stop after reading this many releases. 0 reads them all.
    pub limit_to: usize,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct VcpkgArgs {
    #[arg(default_value = ".")]
    /// Path to the vcpkg checkout holding .reqcheck.toml.
    pub vcpkg_path: PathBuf,

    #[arg(long)]
    /// Write the report here instead of stdout.
    pub output_file: Option<PathBuf>,
}

impl Args {
    /// Parsed `--log-level`.
    pub fn log_level(&self) -> Result<LevelFilter> {
        let level = match self.log_level.to_lowercase().as_str() {
            "warning" => "warn".to_string(),
            other => other.to_string(),
        };

        LevelFilter::from_str(&level)
            .map_err(|_| eyre!("invalid log level: {}", self.log_level))
    }

    /// Token honouring `--timeout`.
    pub fn cancel_token(&self) -> CancelToken {
        match self.timeout {
            Some(secs) => CancelToken::with_timeout(Duration::from_secs(secs)),
            None => CancelToken::new(),
        }
    }
}

impl QueryArgs {
    /// Forge connection for `driver` with the token taken from `--token`
    /// or the driver's environment variable.
    pub fn remote_config(&self, driver: Driver) -> Result<RemoteConfig> {
        let mut token = self.token.clone();

        if token.is_empty()
            && let Ok(env_var_token) = env::var(driver.token_env_var())
        {
            token = env_var_token;
        }

        if token.is_empty() {
            return Err(eyre!("no token provided"));
        }

        let uri = if self.uri.is_empty() {
            driver.default_uri().to_string()
        } else {
            self.uri.clone()
        };

        Ok(RemoteConfig {
            driver,
            uri,
            token: SecretString::from(token),
        })
    }

    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            use_tags: self.tags,
            limit: Some(self.limit_to),
        }
    }

    pub fn filter_policy(&self) -> Result<FilterPolicy> {
        let constraint = if self.constraint.is_empty() {
            None
        } else {
            Some(Constraint::parse(&self.constraint).wrap_err_with(|| {
                format!("could not parse constraint {}", self.constraint)
            })?)
        };

        Ok(FilterPolicy {
            constraint,
            prerelease: self.prerelease,
        })
    }
}
