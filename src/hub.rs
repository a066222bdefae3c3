//! Hub abstraction: repository kinds, descriptors and the client trait
use std::{future::Future, pin::Pin};

use serde::{Deserialize, Serialize};

use crate::errors::HubError;

/// Boxed future returned by [`HubClient`] calls
pub type HubFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, HubError>> + Send + 'a>>;

/// Remote hub operations needed to move repositories between organizations
pub trait HubClient: Sync + Send {
    /// List every repository of `kind` authored by `author`
    fn list_repos(&self, kind: RepoKind, author: &str)
        -> HubFuture<'_, Vec<RepositoryDescriptor>>;

    /// Set the visibility of a repository
    fn update_visibility(&self, repo_id: &str, kind: RepoKind, private: bool)
        -> HubFuture<'_, ()>;

    /// Move a repository to a new id.
    ///
    /// Fails with a conflict error (see [`HubError::is_conflict`]) when `to_id` already exists.
    fn move_repo(&self, from_id: &str, to_id: &str, kind: RepoKind) -> HubFuture<'_, ()>;
}

/// Kind of repository hosted on the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoKind {
    /// Dataset repository
    Dataset,
    /// Model repository
    Model,
}

impl RepoKind {
    /// Every kind, in the order they are migrated
    pub const ALL: [RepoKind; 2] = [RepoKind::Dataset, RepoKind::Model];

    /// Path segment used by the REST API (`datasets`, `models`)
    pub fn api_segment(&self) -> &'static str {
        match self {
            RepoKind::Dataset => "datasets",
            RepoKind::Model => "models",
        }
    }

    /// Plural label used in progress and summary lines
    pub fn label(&self) -> &'static str {
        match self {
            RepoKind::Dataset => "Datasets",
            RepoKind::Model => "Models",
        }
    }

    /// Icon shown in front of the label
    pub(crate) fn icon(&self) -> &'static str {
        match self {
            RepoKind::Dataset => "📦",
            RepoKind::Model => "🤖",
        }
    }
}

impl std::fmt::Display for RepoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoKind::Dataset => write!(f, "dataset"),
            RepoKind::Model => write!(f, "model"),
        }
    }
}

/// A repository as returned by the hub listing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryDescriptor {
    /// Full id, `organization/name`
    pub id: String,

    /// Kind of repository
    pub kind: RepoKind,

    /// Visibility reported by the listing, `None` when the listing didn't say
    pub private: Option<bool>,
}

impl RepositoryDescriptor {
    /// Create a new descriptor of known visibility
    pub fn new(id: impl Into<String>, kind: RepoKind, private: bool) -> Self {
        Self {
            id: id.into(),
            kind,
            private: Some(private),
        }
    }

    /// Create a new descriptor whose visibility the listing didn't report
    pub fn with_unknown_visibility(id: impl Into<String>, kind: RepoKind) -> Self {
        Self {
            id: id.into(),
            kind,
            private: None,
        }
    }

    /// Whether the listing explicitly reported the repository as public
    pub fn is_known_public(&self) -> bool {
        self.private == Some(false)
    }

    /// Name of the repository without its organization
    pub fn bare_name(&self) -> &str {
        bare_name(&self.id)
    }
}

/// Component of a repository id after the last `/`
pub fn bare_name(repo_id: &str) -> &str {
    repo_id.rsplit('/').next().unwrap_or(repo_id)
}
