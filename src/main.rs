// Entrypoint for the CLI application.
// - Parses flags and layers them over the config file and environment,
//   which only `ClientConfig::load` reads. Then either analyzes one image
//   (`--once`) or hands off to the menu loop.

use clap::Parser;
use roadscan_cli::{api::ApiClient, config::ClientConfig, ui};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "roadscan", about = "Road defect detection client")]
struct Args {
    /// Base URL of the detection API, e.g. http://localhost:8000/api
    #[arg(long)]
    api_url: Option<String>,

    /// Request timeout in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Analyze IMAGE, print the results and exit.
    #[arg(long, requires = "image")]
    once: bool,

    /// Image to preselect.
    image: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = ClientConfig::load(args.config.as_deref())?
        .with_overrides(args.api_url, args.timeout_ms)?;
    log::debug!("using detection API at {}", config.api_url);
    let api = ApiClient::new(config)?;

    match (args.once, args.image) {
        (true, Some(image)) => {
            if !ui::run_once(&api, &image)? {
                std::process::exit(1);
            }
        }
        (_, image) => ui::main_menu(api, image)?,
    }
    Ok(())
}
