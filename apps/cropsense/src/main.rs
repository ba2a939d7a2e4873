//! CropSense
//!
//! HTTP server and CLI for crop disease predictions from pre-trained
//! maize and wheat model bundles.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cropsense::cli::{
    Cli, CliResult, Commands, cmd_convert, cmd_inspect, cmd_predict, cmd_serve, cmd_stages,
};
use cropsense::config::ServerConfig;

#[tokio::main]
async fn main() -> CliResult {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    match cli.command {
        Commands::Serve {
            host,
            port,
            maize_model,
            wheat_model,
            index_file,
        } => {
            let config = ServerConfig {
                host,
                port,
                maize_model,
                wheat_model,
                index_file,
            };
            cmd_serve(config).await
        }
        Commands::Inspect { path, json } => cmd_inspect(&path, json),
        Commands::Stages { path, json } => cmd_stages(&path, json),
        Commands::Predict { path, stage, json } => cmd_predict(&path, stage, json),
        Commands::Convert { input, output, to } => cmd_convert(&input, &output, &to),
    }
}
