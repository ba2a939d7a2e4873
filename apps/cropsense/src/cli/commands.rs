//! Subcommand implementations.

use std::path::Path;

use cropsense_core::formats::{read_bundle, write_bundle};
use cropsense_core::{BundleFormat, Classifier, ModelBundle, Stage};
use serde::Serialize;
use tracing::{info, warn};

use crate::api::{AppState, create_router};
use crate::config::ServerConfig;

/// Result type shared by all commands.
pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

// =============================================================================
// SERVE
// =============================================================================

/// Load the configured bundles and build the router state.
///
/// Missing or corrupt bundles degrade the affected crop; an unreadable
/// `index_file` falls back to the built-in page.
pub fn build_state(config: &ServerConfig) -> AppState {
    let store = config.load_store();
    let state = AppState::new(store);

    match &config.index_file {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(html) => state.with_index_html(html),
            Err(e) => {
                warn!("Index file {:?} unreadable ({}); using built-in page", path, e);
                state
            }
        },
        None => state,
    }
}

/// Run the HTTP server until Ctrl-C.
pub async fn cmd_serve(config: ServerConfig) -> CliResult {
    if let Ok(cwd) = std::env::current_dir() {
        info!("Working directory: {}", cwd.display());
    }

    let addr = config.bind_addr()?;
    let app = create_router(build_state(&config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Crop disease prediction server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

// =============================================================================
// INSPECT
// =============================================================================

/// Summary of a bundle file.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct BundleSummary {
    pub format: String,
    pub classifier: String,
    pub stages: Vec<Stage>,
    pub labels: Vec<String>,
}

impl BundleSummary {
    fn new(format: BundleFormat, bundle: &ModelBundle) -> Self {
        Self {
            format: format.to_string(),
            classifier: bundle.classifier().kind().to_string(),
            stages: bundle.stages().to_vec(),
            labels: bundle.label_decoder().classes().to_vec(),
        }
    }
}

/// Read a bundle and summarize it.
pub fn inspect_bundle(path: &Path) -> CliResult<BundleSummary> {
    let (format, bundle) = read_bundle(path)?;
    Ok(BundleSummary::new(format, &bundle))
}

pub fn cmd_inspect(path: &Path, json: bool) -> CliResult {
    let summary = inspect_bundle(path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Bundle:     {}", path.display());
        println!("Format:     {}", summary.format);
        println!("Classifier: {}", summary.classifier);
        println!("Stages:     {}", join(&summary.stages));
        println!("Labels:     {}", summary.labels.join(", "));
    }
    Ok(())
}

// =============================================================================
// STAGES / PREDICT
// =============================================================================

pub fn cmd_stages(path: &Path, json: bool) -> CliResult {
    let (_, bundle) = read_bundle(path)?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "crop_stages": bundle.stages() })
        );
    } else {
        for stage in bundle.stages() {
            println!("{}", stage);
        }
    }
    Ok(())
}

/// Predict with a single bundle file.
pub fn predict_with_bundle(path: &Path, stage: Stage) -> CliResult<Vec<String>> {
    let (_, bundle) = read_bundle(path)?;
    Ok(bundle.predict(stage)?)
}

pub fn cmd_predict(path: &Path, stage: Stage, json: bool) -> CliResult {
    let diseases = predict_with_bundle(path, stage)?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "status": "success", "predicted_diseases": diseases })
        );
    } else if diseases.is_empty() {
        println!("No diseases predicted for stage {}", stage);
    } else {
        for disease in &diseases {
            println!("{}", disease);
        }
    }
    Ok(())
}

// =============================================================================
// CONVERT
// =============================================================================

pub fn cmd_convert(input: &Path, output: &Path, to: &str) -> CliResult {
    let target = BundleFormat::from_name(to)
        .ok_or_else(|| format!("Unknown format '{}' (expected json or binary)", to))?;

    let (source, bundle) = read_bundle(input)?;
    write_bundle(output, &bundle, target)?;

    info!(
        "Converted {} ({}) -> {} ({}), {} outputs",
        input.display(),
        source,
        output.display(),
        target,
        bundle.classifier().n_outputs()
    );
    Ok(())
}

fn join(stages: &[Stage]) -> String {
    stages
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
