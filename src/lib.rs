//! # hf-hub-utils
//!
//! Tools for managing Hugging Face Hub datasets and models
//!
//! ## Usage
//!
//! ```txt
//! Usage: hf-hub-utils org-mover [OPTIONS] --source <SOURCE> --target <TARGET>
//!
//! Options:
//!   -s, --source <SOURCE>          Source organization name
//!   -t, --target <TARGET>          Target organization name
//!       --token <TOKEN>            Hugging Face API token (if not provided, will use HF_TOKEN from environment)
//!   -e, --exceptions <EXCEPTIONS>  Path to exceptions file [default: exceptions.txt]
//!   -d, --debug                    Enable debug logging
//!       --endpoint <ENDPOINT>      Hub endpoint (if not provided, will use HF_ENDPOINT or https://huggingface.co)
//!   -c, --config <CONFIG>          Custom configuration file path
//!       --restore-visibility       Make a repository listed as public public again if its move fails
//!   -h, --help                     Print help
//! ```
//!
//! Every dataset and model of the source organization is made private, moved
//! to the target organization and made private again. A repository whose name
//! is taken in the target organization is retried once with a `_<timestamp>`
//! suffix.

#![warn(clippy::all, rust_2018_idioms)]
#![deny(
    missing_docs,
    clippy::all,
    clippy::missing_docs_in_private_items,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![warn(clippy::multiple_crate_versions)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::missing_docs_in_private_items))]

pub(crate) mod cli;
pub(crate) mod config;
pub(crate) mod errors;
pub(crate) mod exceptions;
pub(crate) mod hub;
pub(crate) mod mover;
pub(crate) mod reporter;

mod huggingface;

pub use cli::{hf_hub_utils_main, HubCommand, HubUtilsCli, OrgMoverArgs};
pub use config::{ConfigData, MoverConfig};
pub use errors::{HubError, HubErrorKind};
pub use exceptions::{load_exceptions, ExceptionSet};
pub use hub::{bare_name, HubClient, HubFuture, RepoKind, RepositoryDescriptor};
pub use huggingface::client::HfHubClient;
pub use mover::{
    filter_candidates, run_timestamp, KindSummary, MigrationOutcome, OrgMover, Summary,
    TIMESTAMP_FORMAT,
};
pub use reporter::{LogReporter, Reporter};
