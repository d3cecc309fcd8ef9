//! Resolve dependencies against their pinned versions and render the result.
use log::*;
use serde::Serialize;

use crate::{
    cancel::CancelToken,
    error::{ReqcheckError, Result},
    forge::traits::ReleaseSource,
    pipeline::{
        filter_releases, greatest_version, matches_constraint, reduce_greatest,
        take_matching,
    },
    stream::{QueryOptions, ReleaseStream},
    version::{Constraint, DEFAULT_CONSTRAINT_FORMAT},
};

/// Name of the template registered with tera when rendering a report.
const REPORT_TEMPLATE_NAME: &str = "report";

/// Template used when the configuration does not provide one.
pub const DEFAULT_TEMPLATE: &str = r#"The following libraries are up to date:
{% if current %}{% for dep in current %}  {{ dep.name }}: {{ dep.current_version }}
{% endfor %}{% else %}  No libraries are up to date
{% endif %}The following libraries have updates:
{% if upgrade %}{% for dep in upgrade %}  {{ dep.name }}: {{ dep.current_version }} -> {{ dep.upgrade_version }}
{% endfor %}{% else %}  All libraries are up to date
{% endif %}"#;

/// Outcome of checking one dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyUpdate {
    pub name: String,
    /// Version pinned in the manifest, as written there
    pub current_version: String,
    /// Canonical version of the best matching release
    pub upgrade_version: String,
}

impl DependencyUpdate {
    pub fn is_current(&self) -> bool {
        self.current_version == self.upgrade_version
    }
}

/// How the matching releases of a dependency collapse into one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolveMode {
    /// Walk the whole stream and keep the greatest version
    #[default]
    Greatest,
    /// Stop after the first `n` matches and keep the greatest of those
    First(usize),
}

/// A library to check: where its releases live and what is pinned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    pub pinned_version: String,
    pub owner: String,
    pub repo: String,
    pub use_tags: bool,
    pub limit: Option<usize>,
    /// Constraint format with a `%s` placeholder for the pinned version
    pub constraint_format: Option<String>,
    pub mode: ResolveMode,
}

impl Dependency {
    fn query_options(&self) -> QueryOptions {
        QueryOptions {
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            use_tags: self.use_tags,
            limit: self.limit,
        }
    }

    /// Constraint built from the pinned version. An empty format falls back
    /// to [`DEFAULT_CONSTRAINT_FORMAT`].
    pub fn constraint(&self) -> Result<Constraint> {
        let format = self
            .constraint_format
            .as_deref()
            .map(str::trim)
            .filter(|format| !format.is_empty())
            .unwrap_or(DEFAULT_CONSTRAINT_FORMAT);

        Constraint::from_format(format, &self.pinned_version)
    }
}

/// Find the best release of `dependency` that satisfies its constraint.
pub fn check_dependency(
    source: &dyn ReleaseSource,
    dependency: &Dependency,
    cancel: &CancelToken,
) -> Result<DependencyUpdate> {
    let constraint = dependency.constraint()?;

    debug!(
        "checking {}: constraint: {constraint}, mode: {:?}",
        dependency.name, dependency.mode
    );

    let stream = ReleaseStream::new(
        source,
        dependency.query_options(),
        cancel.clone(),
    );
    let matching = filter_releases(stream, matches_constraint(&constraint));

    let resolved = match dependency.mode {
        ResolveMode::Greatest => reduce_greatest(matching)?,
        ResolveMode::First(count) => take_matching(matching, count.max(1))?
            .into_iter()
            .reduce(greatest_version),
    };

    let upgrade_version = resolved
        .and_then(|release| release.version_string())
        .ok_or_else(|| ReqcheckError::no_match(&dependency.name, &constraint))?;

    info!(
        "resolved {}: current: {}, latest: {upgrade_version}",
        dependency.name, dependency.pinned_version
    );

    Ok(DependencyUpdate {
        name: dependency.name.clone(),
        current_version: dependency.pinned_version.clone(),
        upgrade_version,
    })
}

/// Checked dependencies split into those that are current and those with
/// an upgrade available.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub current: Vec<DependencyUpdate>,
    pub upgrade: Vec<DependencyUpdate>,
}

impl Report {
    pub fn push(&mut self, update: DependencyUpdate) {
        if update.is_current() {
            self.current.push(update);
        } else {
            self.upgrade.push(update);
        }
    }

    /// Both lists ordered by dependency name.
    pub fn sorted(mut self) -> Self {
        self.current.sort_by(|a, b| a.name.cmp(&b.name));
        self.upgrade.sort_by(|a, b| a.name.cmp(&b.name));
        self
    }

    /// Render with a tera template. The context exposes `current` and
    /// `upgrade`, each a list of `{name, current_version, upgrade_version}`.
    pub fn render(&self, template: &str) -> Result<String> {
        let mut tera = tera::Tera::default();
        tera.add_raw_template(REPORT_TEMPLATE_NAME, template)?;
        let context = tera::Context::from_serialize(self)?;
        Ok(tera.render(REPORT_TEMPLATE_NAME, &context)?)
    }
}
