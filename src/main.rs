use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use pyright_launcher::config::{STORAGE_TAG, StorageRoot};
use pyright_launcher::launch::activator::{Activator, host_search_paths};
use pyright_launcher::launch::launcher::StdioTransport;
use pyright_launcher::log;
use pyright_launcher::paths::rewriter::PathRewriter;
use pyright_launcher::provision::executor::TokioExecutor;
use pyright_launcher::provision::progress::LogProgress;
use pyright_launcher::provision::runtime::SystemDeno;
use pyright_launcher::settings::types::ServerSettings;

/// Provisions basedpyright on first use and runs it over this process's
/// stdio, so an editor can exec this binary as the language server itself.
#[derive(Debug, Parser)]
#[command(name = "pyright-launcher", version, about)]
struct Args {
    /// Host settings file (JSON). Read permissively; the reconciled
    /// extraPaths list is written back on successful activation.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Base directory for the version-tagged storage root. Defaults to the
    /// launcher's data directory.
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    /// Resource tree copied into the storage root on first install.
    #[arg(long, default_value = "resources/language-server")]
    resources: PathBuf,

    /// The host's canonical packages directory; when present in the search
    /// paths it is moved to the end of extraPaths.
    #[arg(long)]
    packages_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    log::init()?;

    let storage = match &args.storage_dir {
        Some(base) => StorageRoot::new(base, STORAGE_TAG),
        None => StorageRoot::from_env(),
    };

    let mut settings = load_settings(args.settings.as_deref());
    let activator = Activator::new(
        storage,
        args.resources.clone(),
        host_search_paths(),
        PathRewriter::new(args.packages_dir.clone()),
    );

    let (descriptor, transport) = activator
        .activate(&mut settings, &SystemDeno::new(), &TokioExecutor, &LogProgress)
        .await
        .context("activation failed")?;

    if let Some(path) = &args.settings {
        let serialized = serde_json::to_string_pretty(&settings.to_value())?;
        std::fs::write(path, serialized)
            .with_context(|| format!("writing settings back to {:?}", path))?;
    }

    info!("Bridging stdio to {:?}", descriptor.cmd);
    let status = bridge(transport).await?;
    std::process::exit(status.code().unwrap_or(1));
}

fn load_settings(path: Option<&std::path::Path>) -> ServerSettings {
    let Some(path) = path else {
        return ServerSettings::default();
    };
    match std::fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(value) => ServerSettings::from_value(&value),
            Err(e) => {
                warn!("Settings file {:?} is not valid JSON ({}), using defaults", path, e);
                ServerSettings::default()
            }
        },
        Err(e) => {
            warn!("Settings file {:?} unreadable ({}), using defaults", path, e);
            ServerSettings::default()
        }
    }
}

/// Pumps this process's stdin into the backend and the backend's stdout
/// back out, until the backend exits.
async fn bridge(transport: StdioTransport) -> anyhow::Result<std::process::ExitStatus> {
    let (mut child, mut child_in, mut child_out) = transport.into_parts();

    let stdin_pump = tokio::spawn(async move {
        let mut host_in = tokio::io::stdin();
        let _ = tokio::io::copy(&mut host_in, &mut child_in).await;
    });

    let mut host_out = tokio::io::stdout();
    tokio::io::copy(&mut child_out, &mut host_out).await?;

    let status = child.wait().await?;
    stdin_pump.abort();
    info!("Language server exited with {}", status);
    Ok(status)
}
