//! Catalog Navigator - Entry Point

use catnav::config::{resolve_config, CliOverrides};
use catnav::integration::{build_coordinator, complete_pending_search, run_script};
use catnav::model::AppError;
use catnav::store::SnapshotStore;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

/// Catalog Navigator - drive catalog navigation and selection from commands
#[derive(Parser, Debug)]
#[command(name = "catnav")]
#[command(version)]
#[command(about = "Navigate a product catalog and manage selections from a command stream")]
pub struct Args {
    /// Path to catalog JSON (falls back to config file or CATNAV_CATALOG)
    pub catalog: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Session snapshot file
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Read commands from this file instead of stdin
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Start fresh instead of resuming the saved session
    #[arg(long)]
    pub no_restore: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("catnav: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), AppError> {
    // Defaults → Config File → Env Vars → CLI Args
    let config = resolve_config(
        args.config.clone(),
        CliOverrides {
            catalog: args.catalog.clone(),
            state_file: args.state.clone(),
            no_restore: args.no_restore,
        },
    )?;

    catnav::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let catalog_path = config.catalog.clone().ok_or(AppError::MissingCatalog)?;
    let catalog = Arc::new(catnav::parser::load_catalog(&catalog_path)?);
    info!(path = %catalog_path.display(), nodes = catalog.len(), "Catalog loaded");

    let mut coordinator = build_coordinator(catalog, &config);
    let store = SnapshotStore::new(&config.state_file);

    if config.restore_on_start {
        match store.load() {
            Ok(Some(snapshot)) => {
                if let Err(e) = coordinator.restore(snapshot) {
                    warn!(error = %e, "Saved session could not be restored");
                }
                complete_pending_search(&mut coordinator);
                for e in coordinator.take_errors() {
                    warn!(error = %e, "Reaction failed while restoring");
                }
                coordinator.ui_mut().take();
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Ignoring unreadable session snapshot"),
        }
    }

    let mut source = catnav::source::detect_command_source(args.script.clone())?;
    info!(source = %source.describe(), "Reading commands");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = run_script(&mut source, &mut coordinator, &store, &mut out)?;

    store.save(&coordinator.snapshot())?;

    if summary.failures > 0 {
        warn!(failures = summary.failures, "Some commands failed");
    }
    Ok(())
}
