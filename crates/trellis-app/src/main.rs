mod app_state;
mod cli;

use tracing_subscriber::EnvFilter;
use trellis_common::{ConfigError, TrellisError};
use trellis_config::TrellisConfig;
use winit::event_loop::EventLoop;

const DEFAULT_LOG_DIRECTIVE: &str = "trellis=info";

/// Settle the config to run with. A `--config` file must load; a broken
/// default file only costs a warning and the built-in defaults.
fn settle_config(
    args: &cli::Args,
    loaded: Result<TrellisConfig, ConfigError>,
) -> trellis_common::Result<TrellisConfig> {
    match loaded {
        Ok(config) => Ok(config),
        Err(e) if args.config.is_some() => Err(e.into()),
        Err(e) => {
            tracing::warn!("Config load failed, using defaults: {e}");
            Ok(TrellisConfig::default())
        }
    }
}

fn init_logging(args: &cli::Args, config: &TrellisConfig) {
    let directive = args
        .log_directive(config)
        .parse()
        .or_else(|_| DEFAULT_LOG_DIRECTIVE.parse());
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = directive {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(args: &cli::Args) -> trellis_common::Result<()> {
    // Config is read before logging so its level applies; failures are
    // logged once the subscriber is up.
    let loaded = trellis_config::load_config_from(args.config.as_deref());
    init_logging(args, loaded.as_ref().unwrap_or(&TrellisConfig::default()));

    tracing::info!("Trellis v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {}", path.display());
    }
    let config = settle_config(args, loaded)?;

    let request = args.surface_request(&config);
    tracing::info!(
        app_root = %request.app_root.display(),
        name = %request.display_name,
        "Surface configured"
    );

    let event_loop = EventLoop::new().map_err(|e| TrellisError::EventLoop(e.to_string()))?;
    let mut app = app_state::TrellisApp::new(config, request);

    tracing::info!("Entering event loop");
    event_loop
        .run_app(&mut app)
        .map_err(|e| TrellisError::EventLoop(e.to_string()))?;
    tracing::info!("Shutdown complete");
    Ok(())
}

fn main() {
    let args = cli::parse();
    if let Err(e) = run(&args) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
