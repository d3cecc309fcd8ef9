//! `github` and `gitlab` subcommands: print each release with its version.
use color_eyre::eyre::WrapErr;
use log::*;
use std::io::{self, Write};

use reqcheck::{
    cancel::CancelToken,
    forge::{
        config::{Driver, create_source},
        traits::ReleaseSource,
    },
    pipeline::{FilterPolicy, filter_releases},
    stream::{QueryOptions, ReleaseStream},
};

use crate::{cli::QueryArgs, result::Result};

/// Execute a query against the forge selected by `driver`.
pub fn execute(
    args: &QueryArgs,
    driver: Driver,
    cancel: &CancelToken,
) -> Result<()> {
    let remote = args.remote_config(driver)?;
    let source = create_source(&remote)?;
    let policy = args.filter_policy()?;

    info!("listing {}/{} on {}", args.owner, args.repo, remote.uri);

    let mut stdout = io::stdout().lock();

    print_releases(
        source.as_ref(),
        args.query_options(),
        &policy,
        cancel,
        &mut stdout,
    )
    .wrap_err_with(|| {
        format!(
            "error when getting releases from {}/{}/{}",
            remote.uri, args.owner, args.repo
        )
    })
}

/// Write one `tag <tag> -> semver <version>` line per release passing
/// `policy`. Unparseable tags print `???` as their version.
pub fn print_releases(
    source: &dyn ReleaseSource,
    options: QueryOptions,
    policy: &FilterPolicy,
    cancel: &CancelToken,
    out: &mut impl Write,
) -> Result<()> {
    let stream = ReleaseStream::new(source, options, cancel.clone());

    for item in filter_releases(stream, |release| policy.accepts(release)) {
        let release = item?;

        match &release.semver {
            Some(version) => {
                writeln!(out, "tag {} -> semver {version}", release.tag)?
            }
            None => writeln!(out, "tag {} -> semver ???", release.tag)?,
        }
    }

    Ok(())
}
