//! Predicates and reducers over a stream of releases.
use std::collections::HashSet;

use crate::{error::Result, forge::types::Release, version::Constraint};

/// Passes releases whose tag normalized into a semantic version.
pub fn has_semver(release: &Release) -> bool {
    release.semver.is_some()
}

/// Passes releases with a semantic version and no prerelease label.
pub fn is_stable(release: &Release) -> bool {
    release
        .semver
        .as_ref()
        .is_some_and(|version| version.pre.is_empty())
}

/// Predicate passing releases whose version satisfies `constraint`.
pub fn matches_constraint(
    constraint: &Constraint,
) -> impl Fn(&Release) -> bool + '_ {
    move |release| {
        release
            .semver
            .as_ref()
            .is_some_and(|version| constraint.matches(version))
    }
}

/// Stateful predicate passing only the first release seen for each version
/// string. Releases without a version always pass.
///
/// Every call returns a predicate with its own seen set.
pub fn dedupe_by_version_string() -> impl FnMut(&Release) -> bool {
    let mut seen = HashSet::new();

    move |release| match release.version_string() {
        Some(version) => seen.insert(version),
        None => true,
    }
}

/// Keep whichever release has the greater version. An accumulator without a
/// version is always replaced and an element without one never wins. On a
/// tie the element wins.
pub fn greatest_version(acc: Release, elem: Release) -> Release {
    match (&acc.semver, &elem.semver) {
        (None, _) => elem,
        (Some(_), None) => acc,
        (Some(a), Some(e)) if a > e => acc,
        _ => elem,
    }
}

/// Filters applied to a query when nothing more specific is asked for.
#[derive(Debug, Clone, Default)]
pub struct FilterPolicy {
    pub constraint: Option<Constraint>,
    pub prerelease: bool,
}

impl FilterPolicy {
    /// A constraint wins over the prerelease flag. Without either only
    /// stable releases pass.
    pub fn accepts(&self, release: &Release) -> bool {
        match &self.constraint {
            Some(constraint) => matches_constraint(constraint)(release),
            None if !self.prerelease => is_stable(release),
            None => true,
        }
    }
}

/// Apply `predicate` to the successful items of a fallible stream. Errors
/// always pass through.
pub fn filter_releases<I, P>(
    stream: I,
    mut predicate: P,
) -> impl Iterator<Item = Result<Release>>
where
    I: Iterator<Item = Result<Release>>,
    P: FnMut(&Release) -> bool,
{
    stream.filter(move |item| match item {
        Ok(release) => predicate(release),
        Err(_) => true,
    })
}

/// Fold a fallible stream with [`greatest_version`]. `Ok(None)` when the
/// stream was empty; the first error aborts the fold.
pub fn reduce_greatest<I>(mut stream: I) -> Result<Option<Release>>
where
    I: Iterator<Item = Result<Release>>,
{
    stream.try_fold(None, |acc: Option<Release>, item| {
        let release = item?;
        Ok(Some(match acc {
            Some(acc) => greatest_version(acc, release),
            None => release,
        }))
    })
}

/// Collect at most `n` releases, stopping the stream as soon as `n` are in
/// hand.
pub fn take_matching<I>(stream: I, n: usize) -> Result<Vec<Release>>
where
    I: Iterator<Item = Result<Release>>,
{
    stream.take(n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ListKind, ReqcheckError};

    fn releases(tags: &[&str]) -> Vec<Release> {
        tags.iter().map(|tag| Release::new(*tag)).collect()
    }

    fn ok_stream(tags: &[&str]) -> impl Iterator<Item = Result<Release>> {
        releases(tags).into_iter().map(Ok)
    }

    fn error() -> ReqcheckError {
        ReqcheckError::provider(ListKind::Tags, "madler", "zlib", "boom")
    }

    #[test]
    fn has_semver_drops_unparseable_tags() {
        let kept = releases(&["v1.0.0", "nightly", "2.0"])
            .into_iter()
            .filter(has_semver)
            .map(|r| r.tag)
            .collect::<Vec<_>>();

        assert_eq!(kept, vec!["v1.0.0", "2.0"]);
    }

    #[test]
    fn is_stable_drops_prereleases_and_unparseable() {
        let kept = releases(&["1.0.0", "1.1.0-rc.1", "latest", "v2.0.0beta1"])
            .into_iter()
            .filter(is_stable)
            .map(|r| r.tag)
            .collect::<Vec<_>>();

        assert_eq!(kept, vec!["1.0.0"]);
    }

    #[test]
    fn matches_constraint_checks_versions() {
        let constraint = Constraint::parse(">= 1.2.0").unwrap();
        let pred = matches_constraint(&constraint);

        assert!(pred(&Release::new("1.2.0")));
        assert!(pred(&Release::new("v1.3")));
        assert!(!pred(&Release::new("1.1.9")));
        assert!(!pred(&Release::new("snapshot")));
    }

    #[test]
    fn dedupe_passes_first_occurrence_only() {
        let mut dedupe = dedupe_by_version_string();

        let kept = releases(&["v1.2.0", "1.2", "release-1_2_0", "1.3.0"])
            .into_iter()
            .filter(|r| dedupe(r))
            .map(|r| r.tag)
            .collect::<Vec<_>>();

        assert_eq!(kept, vec!["v1.2.0", "1.3.0"]);
    }

    #[test]
    fn dedupe_always_passes_unparseable() {
        let mut dedupe = dedupe_by_version_string();

        assert!(dedupe(&Release::new("nightly")));
        assert!(dedupe(&Release::new("nightly")));
    }

    #[test]
    fn dedupe_predicates_do_not_share_state() {
        let mut first = dedupe_by_version_string();
        let mut second = dedupe_by_version_string();

        assert!(first(&Release::new("1.0.0")));
        assert!(!first(&Release::new("1.0.0")));
        assert!(second(&Release::new("1.0.0")));
    }

    #[test]
    fn greatest_version_rules() {
        let none = Release::new("nightly");
        let one = Release::new("1.0.0");
        let two = Release::new("2.0.0");

        assert_eq!(greatest_version(none.clone(), one.clone()).tag, "1.0.0");
        assert_eq!(greatest_version(one.clone(), none.clone()).tag, "1.0.0");
        assert_eq!(greatest_version(two.clone(), one.clone()).tag, "2.0.0");
        assert_eq!(greatest_version(one, two).tag, "2.0.0");
    }

    #[test]
    fn greatest_version_prefers_release_over_prerelease() {
        let rc = Release::new("2.0.0-rc.1");
        let stable = Release::new("2.0.0");

        assert_eq!(greatest_version(stable.clone(), rc.clone()).tag, "2.0.0");
        assert_eq!(greatest_version(rc, stable).tag, "2.0.0");
    }

    #[test]
    fn reduce_greatest_skips_unparseable() {
        let greatest =
            reduce_greatest(ok_stream(&["2.0.0", "1.5.0", "nightly", "3.0.0"]))
                .unwrap()
                .unwrap();

        assert_eq!(greatest.version_string().as_deref(), Some("3.0.0"));
    }

    #[test]
    fn reduce_greatest_of_empty_stream_is_none() {
        assert!(reduce_greatest(ok_stream(&[])).unwrap().is_none());
    }

    #[test]
    fn reduce_greatest_stops_on_error() {
        let stream = ok_stream(&["1.0.0"])
            .chain(std::iter::once(Err(error())))
            .chain(ok_stream(&["9.0.0"]));

        assert!(reduce_greatest(stream).is_err());
    }

    #[test]
    fn policy_constraint_wins_over_prerelease_flag() {
        let policy = FilterPolicy {
            constraint: Some(Constraint::parse("^2.0.0-rc.1").unwrap()),
            prerelease: false,
        };

        assert!(policy.accepts(&Release::new("2.0.0-rc.2")));
        assert!(!policy.accepts(&Release::new("1.0.0")));
    }

    #[test]
    fn default_policy_passes_stable_only() {
        let policy = FilterPolicy::default();

        assert!(policy.accepts(&Release::new("1.0.0")));
        assert!(!policy.accepts(&Release::new("1.1.0-beta.1")));
        assert!(!policy.accepts(&Release::new("trunk")));
    }

    #[test]
    fn prerelease_policy_passes_everything() {
        let policy = FilterPolicy {
            constraint: None,
            prerelease: true,
        };

        assert!(policy.accepts(&Release::new("1.1.0-beta.1")));
        assert!(policy.accepts(&Release::new("trunk")));
    }

    #[test]
    fn filter_releases_keeps_errors() {
        let stream = ok_stream(&["1.0.0", "nightly"])
            .chain(std::iter::once(Err(error())));

        let items = filter_releases(stream, has_semver).collect::<Vec<_>>();

        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(items[1].is_err());
    }

    #[test]
    fn take_matching_returns_first_n() {
        let constraint = Constraint::parse(">= 1.0.0").unwrap();
        let stream = filter_releases(
            ok_stream(&["0.9.0", "1.4.0", "1.2.0", "1.3.0"]),
            matches_constraint(&constraint),
        );

        let taken = take_matching(stream, 2)
            .unwrap()
            .into_iter()
            .map(|r| r.tag)
            .collect::<Vec<_>>();

        assert_eq!(taken, vec!["1.4.0", "1.2.0"]);
    }
}
