//! Single-page listing endpoints.
//!
//! The gitlab crate's own listing endpoints only page through
//! `api::paged`, which walks every page itself. These request exactly one
//! page so the stream decides when to stop.
use gitlab::api::{common::NameOrId, endpoint_prelude::*};

use crate::forge::types::PageOptions;

fn page_params(opts: &PageOptions) -> QueryParams<'static> {
    let mut params = QueryParams::default();
    params
        .push("page", u64::from(opts.page))
        .push("per_page", u64::from(opts.per_page));
    params
}

/// `GET /projects/:id/releases` for one page.
#[derive(Debug, Clone)]
pub struct ReleasesPage<'a> {
    project: NameOrId<'a>,
    opts: PageOptions,
}

impl<'a> ReleasesPage<'a> {
    pub fn new(project: impl Into<NameOrId<'a>>, opts: PageOptions) -> Self {
        Self {
            project: project.into(),
            opts,
        }
    }
}

impl Endpoint for ReleasesPage<'_> {
    fn method(&self) -> Method {
        Method::GET
    }

    fn endpoint(&self) -> Cow<'static, str> {
        format!("projects/{}/releases", self.project).into()
    }

    fn parameters(&self) -> QueryParams<'_> {
        page_params(&self.opts)
    }
}

/// `GET /projects/:id/repository/tags` for one page.
#[derive(Debug, Clone)]
pub struct TagsPage<'a> {
    project: NameOrId<'a>,
    opts: PageOptions,
}

impl<'a> TagsPage<'a> {
    pub fn new(project: impl Into<NameOrId<'a>>, opts: PageOptions) -> Self {
        Self {
            project: project.into(),
            opts,
        }
    }
}

impl Endpoint for TagsPage<'_> {
    fn method(&self) -> Method {
        Method::GET
    }

    fn endpoint(&self) -> Cow<'static, str> {
        format!("projects/{}/repository/tags", self.project).into()
    }

    fn parameters(&self) -> QueryParams<'_> {
        page_params(&self.opts)
    }
}
