//! Hugging Face Hub payloads and conversion to RepositoryDescriptor
use serde::{Deserialize, Serialize};

use crate::hub::{RepoKind, RepositoryDescriptor};

/// Repository entry of `GET /api/datasets` and `GET /api/models`
#[derive(Deserialize, Debug, Clone)]
pub struct HfRepo {
    /// Full repository id, `author/name`
    pub id: String,

    /// Visibility, absent for some listings
    #[serde(default)]
    pub private: Option<bool>,
}

impl HfRepo {
    /// Attach the kind that was listed
    pub fn into_descriptor(self, kind: RepoKind) -> RepositoryDescriptor {
        RepositoryDescriptor {
            id: self.id,
            kind,
            private: self.private,
        }
    }
}

/// Body of `PUT /api/{kind}s/{id}/settings`
#[derive(Serialize, Debug, Clone)]
pub struct HfVisibility {
    /// Whether the repository is private
    pub private: bool,
}

/// Body of `POST /api/repos/move`
#[derive(Serialize, Debug, Clone)]
pub struct HfMove {
    /// Current id
    #[serde(rename = "fromRepo")]
    pub from_repo: String,

    /// New id
    #[serde(rename = "toRepo")]
    pub to_repo: String,

    /// Kind of the repository
    #[serde(rename = "type")]
    pub kind: RepoKind,
}
