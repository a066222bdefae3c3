//! Error handling for the hf-hub-utils crate.
use std::{error::Error as StdError, fmt};

/// Error type for the hf-hub-utils crate.
#[derive(Debug)]
pub struct HubError {
    /// Inner error.
    inner: Box<Inner>,
}

impl HubError {
    /// Create a new error.
    pub(crate) fn new(kind: HubErrorKind) -> Self {
        Self {
            inner: Box::new(Inner {
                kind,
                source: None,
                repo_id: None,
            }),
        }
    }

    /// Create a new error with a source.
    pub(crate) fn with_text(mut self, text: &str) -> Self {
        self.inner.source = Some(Box::new(std::io::Error::other(text.to_string())));
        self
    }

    /// Create a new error with the repository it relates to.
    pub(crate) fn with_repo(mut self, repo_id: &str) -> Self {
        self.inner.repo_id = Some(repo_id.to_string());
        self
    }

    /// Create a configuration error wrapping another error.
    pub(crate) fn new_with_source<E>(text: &str, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::new(HubErrorKind::Config).with_text(&format!("{text}: {source}"))
    }

    /// Kind of the error
    pub fn kind(&self) -> &HubErrorKind {
        &self.inner.kind
    }

    /// Whether the hub refused a move because the destination already exists
    pub fn is_conflict(&self) -> bool {
        matches!(self.inner.kind, HubErrorKind::MoveConflict)
    }
}

/// Type alias for a boxed error.
pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

/// Inner error type for the hf-hub-utils crate.
#[derive(Debug)]
struct Inner {
    /// Error kind.
    kind: HubErrorKind,

    /// Repository involved, if any
    repo_id: Option<String>,

    /// Source error.
    source: Option<BoxError>,
}

/// Kind of [`HubError`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubErrorKind {
    /// Invalid or missing configuration (token, endpoint, config file)
    Config,

    /// Error related to the reqwest crate.
    Reqwest,

    /// Error related to serde.
    Serde,

    /// Error related to file access.
    Io,

    /// Listing the repositories of an author failed.
    ListRepos,

    /// Changing the visibility of a repository failed.
    UpdateVisibility,

    /// Moving a repository failed.
    MoveRepo,

    /// Moving a repository failed because the destination already exists.
    MoveConflict,
}

impl fmt::Display for HubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.inner.kind)?;
        if let Some(repo_id) = &self.inner.repo_id {
            write!(f, " ({repo_id})")?;
        }
        if let Some(source) = &self.inner.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl StdError for HubError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source.as_ref().map(|e| &**e as _)
    }
}

impl From<&str> for HubError {
    fn from(text: &str) -> Self {
        HubError::new(HubErrorKind::Config).with_text(text)
    }
}

impl From<String> for HubError {
    fn from(text: String) -> Self {
        HubError::from(text.as_str())
    }
}

impl From<reqwest::Error> for HubError {
    fn from(e: reqwest::Error) -> Self {
        Self {
            inner: Box::new(Inner {
                kind: HubErrorKind::Reqwest,
                source: Some(Box::new(e)),
                repo_id: None,
            }),
        }
    }
}

impl From<serde_json::Error> for HubError {
    fn from(e: serde_json::Error) -> Self {
        Self {
            inner: Box::new(Inner {
                kind: HubErrorKind::Serde,
                source: Some(Box::new(e)),
                repo_id: None,
            }),
        }
    }
}

impl From<toml::de::Error> for HubError {
    fn from(e: toml::de::Error) -> Self {
        Self {
            inner: Box::new(Inner {
                kind: HubErrorKind::Config,
                source: Some(Box::new(e)),
                repo_id: None,
            }),
        }
    }
}

impl From<url::ParseError> for HubError {
    fn from(e: url::ParseError) -> Self {
        Self {
            inner: Box::new(Inner {
                kind: HubErrorKind::Config,
                source: Some(Box::new(e)),
                repo_id: None,
            }),
        }
    }
}

impl From<std::io::Error> for HubError {
    fn from(e: std::io::Error) -> Self {
        Self {
            inner: Box::new(Inner {
                kind: HubErrorKind::Io,
                source: Some(Box::new(e)),
                repo_id: None,
            }),
        }
    }
}
