//! Configuration handling
use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use home::home_dir;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    cli::OrgMoverArgs,
    errors::HubError,
    huggingface::{HF_DEFAULT_ENDPOINT, HF_ENDPOINT_ENV, HF_TOKEN_ENV},
};

/// Exceptions file used when none is configured
pub(crate) const DEFAULT_EXCEPTIONS_FILE: &str = "exceptions.txt";

/// Configuration file content
#[derive(Deserialize, Serialize, Default, Clone, Debug, PartialEq)]
pub struct ConfigData {
    /// Hub access token
    pub token: Option<String>,

    /// Hub endpoint
    pub endpoint: Option<String>,

    /// Path to the exceptions file
    pub exceptions: Option<PathBuf>,
}

/// Resolved settings of an org-mover run
#[derive(Clone, Debug)]
pub struct MoverConfig {
    /// path to the configuration file, if one was read
    pub config_path: Option<PathBuf>,

    /// Organization to move repositories from
    pub source_org: String,

    /// Organization to move repositories to
    pub target_org: String,

    /// Hub access token
    pub token: String,

    /// Hub endpoint
    pub endpoint: Url,

    /// Path to the exceptions file
    pub exceptions_path: PathBuf,

    /// Make public repositories public again when their move fails
    pub restore_visibility: bool,
}

impl MoverConfig {
    /// Resolve the configuration from the CLI arguments, the environment and the config files
    /// # Errors
    /// Error if an explicit config file can't be read, or if no token is found
    pub fn try_new(cli_args: OrgMoverArgs) -> Result<Self, HubError> {
        let (config_path, config_data) =
            Self::load_config_file(cli_args.config.clone(), Self::get_config_path())?;
        Self::resolve(
            cli_args,
            config_path,
            config_data,
            |key| std::env::var(key).ok(),
            Self::get_token_path(),
        )
    }

    /// Read the explicit config file, else the default one when it exists
    fn load_config_file(
        explicit: Option<PathBuf>,
        default: Option<PathBuf>,
    ) -> Result<(Option<PathBuf>, ConfigData), HubError> {
        match explicit {
            Some(path) => {
                let data = Self::read_config(&path)?;
                Ok((Some(path), data))
            }
            None => match default {
                Some(path) if path.is_file() => {
                    let data = Self::read_config(&path)?;
                    Ok((Some(path), data))
                }
                _ => Ok((None, ConfigData::default())),
            },
        }
    }

    /// Merge every source, the CLI having the last word
    fn resolve(
        cli_args: OrgMoverArgs,
        config_path: Option<PathBuf>,
        config_data: ConfigData,
        env: impl Fn(&str) -> Option<String>,
        token_path: Option<PathBuf>,
    ) -> Result<Self, HubError> {
        let token = cli_args
            .token
            .clone()
            .or_else(|| env(HF_TOKEN_ENV))
            .or_else(|| config_data.token.clone())
            .or_else(|| token_path.as_deref().and_then(read_token_file))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                HubError::from(format!(
                    "No token provided. Either use --token or set {HF_TOKEN_ENV} environment variable"
                ))
            })?;
        let endpoint = cli_args
            .endpoint
            .clone()
            .or_else(|| env(HF_ENDPOINT_ENV))
            .or_else(|| config_data.endpoint.clone())
            .unwrap_or_else(|| HF_DEFAULT_ENDPOINT.to_string());
        let endpoint = Url::parse(&endpoint)
            .map_err(|e| HubError::new_with_source(&format!("Invalid endpoint '{endpoint}'"), e))?;
        let exceptions_path = cli_args
            .exceptions
            .clone()
            .or_else(|| config_data.exceptions.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXCEPTIONS_FILE));
        Ok(MoverConfig {
            config_path,
            source_org: cli_args.source,
            target_org: cli_args.target,
            token,
            endpoint,
            exceptions_path,
            restore_visibility: cli_args.restore_visibility,
        })
    }

    /// Read a TOML config file
    fn read_config(path: &Path) -> Result<ConfigData, HubError> {
        let contents = read_to_string(path).map_err(|e| {
            HubError::new_with_source(&format!("Unable to open {}", path.display()), e)
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Get the path to the default config file
    pub fn get_config_path() -> Option<PathBuf> {
        let home_dir = home_dir().filter(|path| !path.as_os_str().is_empty())?;
        Some(
            home_dir
                .join(".config")
                .join(env!("CARGO_PKG_NAME"))
                .join("config.toml"),
        )
    }

    /// Get the path of the token saved by `huggingface-cli login`
    pub fn get_token_path() -> Option<PathBuf> {
        let home_dir = home_dir().filter(|path| !path.as_os_str().is_empty())?;
        Some(home_dir.join(".cache").join("huggingface").join("token"))
    }
}

/// Token stored in a file, if any
fn read_token_file(path: &Path) -> Option<String> {
    read_to_string(path).ok()
}
