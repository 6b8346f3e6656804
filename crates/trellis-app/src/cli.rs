use std::path::PathBuf;

use clap::Parser;
use trellis_config::TrellisConfig;
use trellis_webview::SurfaceRequest;

/// Trellis: host a prebuilt web bundle in a native window.
#[derive(Parser, Debug)]
#[command(name = "trellis", version, about)]
pub struct Args {
    /// Directory holding the bundle and its asset-manifest.json.
    #[arg(long)]
    pub app_root: Option<PathBuf>,

    /// Window and document title.
    #[arg(long)]
    pub name: Option<String>,

    /// Keep the surface's state while it is hidden.
    #[arg(long)]
    pub remain_active: bool,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Args {
    /// The surface request, with command line values taking precedence
    /// over `config`.
    pub fn surface_request(&self, config: &TrellisConfig) -> SurfaceRequest {
        let root = self.app_root.clone().unwrap_or_else(|| config.app.root.clone());
        let name = self.name.clone().unwrap_or_else(|| config.app.name.clone());
        SurfaceRequest::new(root, name).remain_active(self.remain_active || config.app.remain_active)
    }

    /// Log filter directive: `--log-level` first, then the config.
    pub fn log_directive<'a>(&'a self, config: &'a TrellisConfig) -> &'a str {
        self.log_level.as_deref().unwrap_or(&config.logging.level)
    }
}

pub fn parse() -> Args {
    Args::parse()
}
