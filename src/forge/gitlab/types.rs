use serde::Deserialize;

/// Commit a tag or release points at.
#[derive(Debug, Deserialize)]
pub struct GitlabCommit {
    pub id: String,
}

/// Represents a Gitlab project Tag
#[derive(Debug, Deserialize)]
pub struct GitlabTag {
    pub name: String,
    pub commit: GitlabCommit,
}

/// Represents a Gitlab project Release
#[derive(Debug, Deserialize)]
pub struct GitlabRelease {
    pub tag_name: String,
    pub commit: Option<GitlabCommit>,
}

impl GitlabRelease {
    pub fn commit_id(&self) -> &str {
        self.commit.as_ref().map_or("", |c| c.id.as_str())
    }
}
