//! Hugging Face Hub API module.
pub(crate) mod client;
pub(crate) mod repo;

/// Hugging Face Hub endpoint
pub(crate) const HF_DEFAULT_ENDPOINT: &str = "https://huggingface.co";

/// Environment variable overriding the endpoint
pub(crate) const HF_ENDPOINT_ENV: &str = "HF_ENDPOINT";

/// Environment variable holding the access token
pub(crate) const HF_TOKEN_ENV: &str = "HF_TOKEN";

/// Page size requested when listing repositories
const HF_LIST_LIMIT: &str = "1000";

/// User agent sent with every request
const HF_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
