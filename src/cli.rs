//! Command line options for the hf-hub-utils tool
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

use crate::{
    config::MoverConfig, errors::HubError, exceptions::load_exceptions,
    huggingface::client::HfHubClient, mover::OrgMover, reporter::LogReporter,
};

/// hf-hub-utils - Tools for managing Hugging Face Hub datasets and models
#[derive(Parser, Debug)]
#[command(version, about, arg_required_else_help = true)]
pub struct HubUtilsCli {
    /// Tool to run
    #[command(subcommand)]
    pub command: HubCommand,
}

/// Available tools
#[derive(Subcommand, Debug)]
pub enum HubCommand {
    /// Move repositories between organizations
    OrgMover(OrgMoverArgs),
}

/// Options of the org-mover tool
#[derive(Args, Default, Clone, Debug)]
pub struct OrgMoverArgs {
    /// Source organization name
    #[arg(short, long)]
    pub source: String,

    /// Target organization name
    #[arg(short, long)]
    pub target: String,

    /// Hugging Face API token (if not provided, will use HF_TOKEN from environment)
    #[arg(long)]
    pub token: Option<String>,

    /// Path to exceptions file [default: exceptions.txt]
    #[arg(short, long)]
    pub exceptions: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Hub endpoint (if not provided, will use HF_ENDPOINT or https://huggingface.co)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Custom configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Make a repository listed as public public again if its move fails
    #[arg(long)]
    pub restore_visibility: bool,
}

impl HubUtilsCli {
    /// Log level requested by the command line
    pub fn log_level(&self) -> LevelFilter {
        match &self.command {
            HubCommand::OrgMover(args) if args.debug => LevelFilter::Debug,
            HubCommand::OrgMover(_) => LevelFilter::Info,
        }
    }
}

/// Run the hf-hub-utils tool with the parsed command line options
/// # Errors
/// Error if the selected tool fails
pub async fn hf_hub_utils_main(cli: HubUtilsCli) -> Result<(), HubError> {
    dotenv::dotenv().ok();
    match cli.command {
        HubCommand::OrgMover(args) => org_mover_main(args).await,
    }
}

/// Move every repository of the source organization into the target one
async fn org_mover_main(args: OrgMoverArgs) -> Result<(), HubError> {
    let config = MoverConfig::try_new(args)?;
    if let Some(path) = &config.config_path {
        log::debug!("Using config file {}", path.display());
    }
    let client = HfHubClient::new(config.token.clone(), config.endpoint.clone());
    let reporter = LogReporter;
    let exceptions = load_exceptions(&config.exceptions_path, &reporter);
    OrgMover::new(&client, &reporter, &config.source_org, &config.target_org)
        .restore_visibility(config.restore_visibility)
        .migrate(&exceptions)
        .await?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_org_mover() {
        let cli = HubUtilsCli::try_parse_from([
            "hf-hub-utils",
            "org-mover",
            "-s",
            "org1",
            "--target",
            "org2",
            "-e",
            "skip.txt",
            "-d",
        ])
        .unwrap();
        assert_eq!(cli.log_level(), LevelFilter::Debug);
        let HubCommand::OrgMover(args) = cli.command;
        assert_eq!(args.source, "org1");
        assert_eq!(args.target, "org2");
        assert_eq!(args.exceptions, Some(PathBuf::from("skip.txt")));
        assert_eq!(args.token, None);
        assert!(!args.restore_visibility);
    }

    #[test]
    fn source_and_target_are_required() {
        assert!(HubUtilsCli::try_parse_from(["hf-hub-utils", "org-mover", "-s", "org1"]).is_err());
        assert!(HubUtilsCli::try_parse_from(["hf-hub-utils"]).is_err());
    }

    #[test]
    fn default_log_level() {
        let cli =
            HubUtilsCli::try_parse_from(["hf-hub-utils", "org-mover", "-s", "a", "-t", "b"])
                .unwrap();
        assert_eq!(cli.log_level(), LevelFilter::Info);
    }
}
