//! Lazy, paginated stream of releases from a forge.
//!
//! [`ReleaseStream`] fetches one page at a time and only asks for page N+1
//! once every release of page N has been pulled. It ends when a short page
//! comes back, when the item limit is reached, or after yielding a single
//! terminal error.
use log::*;
use std::{iter::FusedIterator, vec};

use crate::{
    cancel::CancelToken,
    error::{ReqcheckError, Result},
    forge::{
        traits::ReleaseSource,
        types::{DEFAULT_PER_PAGE, PageOptions, Release},
    },
};

/// What to list and how much of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Repository owner (user, organization or group)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// List tags rather than releases
    pub use_tags: bool,
    /// Maximum number of releases to pull. `None` or `Some(0)` is unbounded
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// A full page came back, there may be more
    MorePages,
    /// The last fetched page was short
    LastPage,
    Done,
}

/// Iterator over the releases of one repository.
///
/// Yields `Ok(release)` in forge order. A failed fetch or a cancelled token
/// yields one `Err` and the stream is then exhausted.
pub struct ReleaseStream<'a> {
    source: &'a dyn ReleaseSource,
    options: QueryOptions,
    cancel: CancelToken,
    cursor: PageOptions,
    buffer: vec::IntoIter<Release>,
    emitted: usize,
    limit: Option<usize>,
    state: State,
}

impl<'a> ReleaseStream<'a> {
    pub fn new(
        source: &'a dyn ReleaseSource,
        options: QueryOptions,
        cancel: CancelToken,
    ) -> Self {
        Self::with_page_options(source, options, cancel, PageOptions::default())
    }

    /// Start from a custom cursor, mostly useful for small page sizes.
    pub fn with_page_options(
        source: &'a dyn ReleaseSource,
        options: QueryOptions,
        cancel: CancelToken,
        mut cursor: PageOptions,
    ) -> Self {
        let limit = options.limit.filter(|limit| *limit > 0);

        if cursor.per_page == 0 {
            cursor.per_page = DEFAULT_PER_PAGE;
        }

        Self {
            source,
            options,
            cancel,
            cursor,
            buffer: Vec::new().into_iter(),
            emitted: 0,
            limit,
            state: State::MorePages,
        }
    }

    fn limit_reached(&self) -> bool {
        self.limit.is_some_and(|limit| self.emitted >= limit)
    }

    fn fetch_page(&mut self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(ReqcheckError::Cancelled);
        }

        let QueryOptions {
            owner,
            repo,
            use_tags,
            ..
        } = &self.options;

        debug!(
            "fetching page {} of {owner}/{repo} {}",
            self.cursor.page,
            if *use_tags { "tags" } else { "releases" }
        );

        let page = if *use_tags {
            self.source.list_tags(owner, repo, self.cursor)
        } else {
            self.source.list_releases(owner, repo, self.cursor)
        }
        .map_err(|err| ReqcheckError::stream(owner, repo, err))?;

        if page.is_empty() || page.len() < usize::from(self.cursor.per_page) {
            self.state = State::LastPage;
        } else {
            self.cursor.page += 1;
        }

        self.buffer = page.into_iter();

        Ok(())
    }
}

impl Iterator for ReleaseStream<'_> {
    type Item = Result<Release>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.state == State::Done {
                return None;
            }

            if self.limit_reached() {
                debug!("reached query limit: limit-to: {:?}", self.limit);
                self.state = State::Done;
                return None;
            }

            if let Some(release) = self.buffer.next() {
                self.emitted += 1;
                return Some(Ok(release));
            }

            if self.state == State::LastPage {
                self.state = State::Done;
                return None;
            }

            if let Err(err) = self.fetch_page() {
                self.state = State::Done;
                return Some(Err(err));
            }
        }
    }
}

impl FusedIterator for ReleaseStream<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ListKind, forge::traits::MockReleaseSource, test_helpers::*,
    };

    fn options(use_tags: bool, limit: Option<usize>) -> QueryOptions {
        QueryOptions {
            owner: "madler".into(),
            repo: "zlib".into(),
            use_tags,
            limit,
        }
    }

    /// Mock source serving pages of the given sizes, numbered from 1.
    fn paged_source(sizes: Vec<usize>, use_tags: bool) -> MockReleaseSource {
        let mut mock = MockReleaseSource::new();
        let serve = move |_: &str,
                          _: &str,
                          opts: PageOptions|
              -> Result<Vec<Release>> {
            let index = opts.page as usize - 1;
            let size = sizes.get(index).copied().unwrap_or(0);
            Ok(numbered_releases(index * 100, size))
        };

        if use_tags {
            mock.expect_list_tags().returning(serve);
        } else {
            mock.expect_list_releases().returning(serve);
        }

        mock
    }

    #[test]
    fn stops_after_short_page() {
        let mut mock = MockReleaseSource::new();
        let sizes = [30, 30, 12];
        mock.expect_list_releases()
            .times(3)
            .returning(move |_, _, opts| {
                let index = opts.page as usize - 1;
                Ok(numbered_releases(index * 100, sizes[index]))
            });

        let stream =
            ReleaseStream::new(&mock, options(false, None), CancelToken::new());
        let releases = stream.collect::<Result<Vec<Release>>>().unwrap();

        assert_eq!(releases.len(), 72);
    }

    #[test]
    fn emits_pages_in_order() {
        let mock = paged_source(vec![30, 2], true);

        let stream =
            ReleaseStream::new(&mock, options(true, None), CancelToken::new());
        let tags = stream
            .map(|r| r.unwrap().tag)
            .collect::<Vec<String>>();

        assert_eq!(tags.len(), 32);
        assert_eq!(tags[0], "v0.0.0");
        assert_eq!(tags[29], "v0.0.29");
        assert_eq!(tags[30], "v0.0.100");
        assert_eq!(tags[31], "v0.0.101");
    }

    #[test]
    fn limit_stops_mid_page() {
        let mut mock = MockReleaseSource::new();
        mock.expect_list_releases()
            .times(2)
            .returning(|_, _, opts| {
                Ok(numbered_releases(opts.page as usize * 100, 30))
            });

        let stream = ReleaseStream::new(
            &mock,
            options(false, Some(50)),
            CancelToken::new(),
        );
        let releases = stream.collect::<Result<Vec<Release>>>().unwrap();

        assert_eq!(releases.len(), 50);
        assert_eq!(releases[49].tag, "v0.0.219");
    }

    #[test]
    fn limit_on_page_boundary_skips_next_fetch() {
        let mut mock = MockReleaseSource::new();
        mock.expect_list_releases()
            .times(1)
            .returning(|_, _, _| Ok(numbered_releases(0, 30)));

        let stream = ReleaseStream::new(
            &mock,
            options(false, Some(30)),
            CancelToken::new(),
        );

        assert_eq!(stream.count(), 30);
    }

    #[test]
    fn zero_limit_is_unbounded() {
        let mock = paged_source(vec![30, 30, 5], false);

        let stream = ReleaseStream::new(
            &mock,
            options(false, Some(0)),
            CancelToken::new(),
        );

        assert_eq!(stream.count(), 65);
    }

    #[test]
    fn page_index_increments_by_one() {
        let mut mock = MockReleaseSource::new();
        let mut expected_page = 1;
        mock.expect_list_tags()
            .times(3)
            .returning(move |owner, repo, opts| {
                assert_eq!(owner, "madler");
                assert_eq!(repo, "zlib");
                assert_eq!(opts.page, expected_page);
                assert_eq!(opts.per_page, 30);
                expected_page += 1;
                let size = if opts.page < 3 { 30 } else { 0 };
                Ok(numbered_releases(0, size))
            });

        let stream =
            ReleaseStream::new(&mock, options(true, None), CancelToken::new());

        assert_eq!(stream.count(), 60);
    }

    #[test_log::test]
    fn fetch_error_is_terminal() {
        let mut mock = MockReleaseSource::new();
        mock.expect_list_releases()
            .times(2)
            .returning(|owner, repo, opts| {
                if opts.page == 1 {
                    Ok(numbered_releases(0, 30))
                } else {
                    Err(ReqcheckError::provider(
                        ListKind::Releases,
                        owner,
                        repo,
                        "bad credentials",
                    ))
                }
            });

        let mut stream =
            ReleaseStream::new(&mock, options(false, None), CancelToken::new());

        for _ in 0..30 {
            assert!(stream.next().unwrap().is_ok());
        }

        let err = stream.next().unwrap().unwrap_err();
        assert!(matches!(err, ReqcheckError::Stream { .. }));
        assert!(err.to_string().contains("madler/zlib"));

        assert!(stream.next().is_none());
        assert!(stream.next().is_none());
    }

    #[test]
    fn cancelled_token_stops_before_fetching() {
        let mut mock = MockReleaseSource::new();
        mock.expect_list_releases().times(0);

        let cancel = CancelToken::new();
        cancel.cancel();

        let mut stream = ReleaseStream::new(&mock, options(false, None), cancel);

        let err = stream.next().unwrap().unwrap_err();
        assert!(matches!(err, ReqcheckError::Cancelled));
        assert!(stream.next().is_none());
    }

    #[test]
    fn cancel_between_pages_stops_next_fetch() {
        let mut mock = MockReleaseSource::new();
        mock.expect_list_releases()
            .times(1)
            .returning(|_, _, _| Ok(numbered_releases(0, 2)));

        let cancel = CancelToken::new();
        let mut stream = ReleaseStream::with_page_options(
            &mock,
            options(false, None),
            cancel.clone(),
            PageOptions {
                page: 1,
                per_page: 2,
            },
        );

        assert!(stream.next().unwrap().is_ok());
        cancel.cancel();
        // the page already fetched is still drained
        assert!(stream.next().unwrap().is_ok());
        assert!(matches!(
            stream.next().unwrap().unwrap_err(),
            ReqcheckError::Cancelled
        ));
    }

    #[test]
    fn empty_repository_yields_nothing() {
        let mock = paged_source(vec![0], false);

        let mut stream =
            ReleaseStream::new(&mock, options(false, None), CancelToken::new());

        assert!(stream.next().is_none());
    }

    #[test]
    fn zero_page_size_uses_default() {
        let mut mock = MockReleaseSource::new();
        mock.expect_list_tags()
            .times(2)
            .returning(|_, _, opts| {
                assert_eq!(opts.per_page, DEFAULT_PER_PAGE);
                let size = if opts.page == 1 { 30 } else { 4 };
                Ok(numbered_releases(0, size))
            });

        let stream = ReleaseStream::with_page_options(
            &mock,
            options(true, None),
            CancelToken::new(),
            PageOptions {
                page: 1,
                per_page: 0,
            },
        );

        assert_eq!(stream.count(), 34);
    }

    #[test]
    fn empty_page_ends_the_stream() {
        let mut mock = MockReleaseSource::new();
        mock.expect_list_releases()
            .times(1)
            .returning(|_, _, _| Ok(vec![]));

        let mut stream = ReleaseStream::with_page_options(
            &mock,
            options(false, None),
            CancelToken::new(),
            PageOptions {
                page: 4,
                per_page: 0,
            },
        );

        assert!(stream.next().is_none());
        assert!(stream.next().is_none());
    }
}
