use clap::Parser;
use hf_hub_utils::{hf_hub_utils_main, HubUtilsCli};
use std::process::exit;

#[tokio::main]
async fn main() {
    let cli = HubUtilsCli::parse();
    env_logger::builder()
        .filter_level(cli.log_level())
        .format_target(false)
        .format_timestamp(None)
        .init();
    log::debug!(concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION")));
    match hf_hub_utils_main(cli).await {
        Ok(_) => {
            exit(0);
        }
        Err(e) => {
            log::error!("Failed to complete operation: {e}");
            exit(1);
        }
    };
}
