//! `vcpkg` subcommand: compare pinned port versions with upstream releases.
use color_eyre::eyre::WrapErr;
use log::*;
use std::{
    collections::BTreeMap,
    env, fs,
    path::{Path, PathBuf},
};

use reqcheck::{
    ReqcheckError,
    cancel::CancelToken,
    config::{Config, DEFAULT_CONFIG_FILE},
    forge::{config::create_source, traits::ReleaseSource},
    manifest::read_vcpkg_version,
    report::{Report, check_dependency},
};

use crate::{cli::VcpkgArgs, result::Result};

/// Release sources keyed by their `[scm]` name.
pub type Sources = BTreeMap<String, Box<dyn ReleaseSource>>;

/// Execute the vcpkg check and write the rendered report.
pub fn execute(args: &VcpkgArgs, cancel: &CancelToken) -> Result<()> {
    let vcpkg_path = resolve_path(&args.vcpkg_path)?;
    let config_path = vcpkg_path.join(DEFAULT_CONFIG_FILE);

    let config = Config::load(&config_path).wrap_err_with(|| {
        format!("could not open config file {}", config_path.display())
    })?;

    let sources = connect(&config)?;
    let report = build_report(&config, &vcpkg_path, &sources, cancel)?;

    let rendered = report
        .render(config.template())
        .wrap_err("could not write results")?;

    match &args.output_file {
        Some(path) => {
            fs::write(path, rendered).wrap_err_with(|| {
                format!("could not open file for writing {}", path.display())
            })?;
            info!("wrote report to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

/// Anchor a relative path at the working directory.
fn resolve_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    Ok(env::current_dir()?.join(path))
}

/// Connect to every configured forge.
pub fn connect(config: &Config) -> Result<Sources> {
    let mut sources = Sources::new();

    for (name, scm) in &config.scm {
        let source = scm
            .remote_config()
            .and_then(|remote| create_source(&remote))
            .wrap_err_with(|| format!("could not connect to scm {name}"))?;

        sources.insert(name.clone(), source);
    }

    Ok(sources)
}

/// Check every configured library, one at a time. The first failing
/// library aborts the run.
pub fn build_report(
    config: &Config,
    vcpkg_path: &Path,
    sources: &Sources,
    cancel: &CancelToken,
) -> Result<Report> {
    let mut report = Report::default();

    for (name, library) in &config.repos {
        let version = read_vcpkg_version(vcpkg_path, name)
            .wrap_err_with(|| format!("could not find version for {name}"))?;

        debug!("found pinned version: port: {name}, version: {version}");

        let source = sources
            .get(&library.host)
            .ok_or_else(|| ReqcheckError::UnknownHost(library.host.clone()))
            .wrap_err_with(|| format!("could not get releases for {name}"))?;

        let update = check_dependency(
            source.as_ref(),
            &library.dependency(name, &version),
            cancel,
        )
        .wrap_err_with(|| format!("could not get releases for {name}"))?;

        report.push(update);
    }

    Ok(report.sorted())
}
