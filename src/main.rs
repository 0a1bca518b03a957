use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use ttsdk::core::config::Config;
use ttsdk::{commands, error::TtsdkError};

#[derive(Parser)]
#[clap(name = "ttsdk")]
#[clap(about = "Downloads the TeamTalk SDK and installs its Python bindings")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Directory holding the implementation package (default: current directory)
    #[clap(long, global = true)]
    base_dir: Option<PathBuf>,
    /// JSON file overriding the default settings
    #[clap(long, global = true)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v, -vv, -vvv)
    #[clap(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the newest SDK and install it into ./implementation
    Install {
        /// Install from an already downloaded archive (.7z, .zip, .tar.gz)
        #[clap(long)]
        archive: Option<PathBuf>,
    },
    /// Print the download URL of the newest SDK without downloading it
    Resolve,
    /// Print the SDK platform token of this machine
    Platform,
    /// Check the platform, extractor and installed files
    Doctor,
}

fn init_logging(verbose: u8) {
    let level_filter = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("TTSDK_LOG")
        .from_env_lossy();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = Config::load(cli.config.as_deref(), cli.base_dir.as_deref())
        .map_err(|e| anyhow::anyhow!(e))
        .and_then(|config| match cli.command {
            Commands::Install { archive } => {
                commands::install::install_sdk(&config, archive.as_deref())
            }
            Commands::Resolve => {
                commands::resolve::show_download(&config).map_err(|e| anyhow::anyhow!(e))
            }
            Commands::Platform => {
                commands::resolve::show_platform().map_err(|e| anyhow::anyhow!(e))
            }
            Commands::Doctor => {
                commands::doctor::check_environment(&config).map_err(|e| anyhow::anyhow!(e))
            }
        });

    if let Err(e) = result {
        println!("Error: {e:#}");
        if let Some(cause) = e.downcast_ref::<TtsdkError>() {
            for line in cause.remediation() {
                println!("{line}");
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
