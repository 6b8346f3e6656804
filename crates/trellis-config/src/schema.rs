//! Configuration schema types for Trellis.
//!
//! All structs use `serde(default)` so partial configs work correctly.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrellisConfig {
    pub app: AppConfig,
    pub webview: WebViewSettings,
    pub logging: LoggingConfig,
}

// =============================================================================
// App Config
// =============================================================================

/// The prebuilt bundle shown inside the display surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding `asset-manifest.json` and the built assets.
    pub root: PathBuf,
    /// Name shown on the surface's title.
    pub name: String,
    /// Keep the surface running while it is hidden.
    pub remain_active: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("out/app"),
            name: "Trellis App".into(),
            remain_active: false,
        }
    }
}

// =============================================================================
// WebView Config
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebViewSettings {
    /// Enable dev tools (on by default in debug builds).
    pub devtools: bool,
    /// Custom protocol used to address bundled assets.
    pub scheme: String,
    pub user_agent: Option<String>,
}

impl Default for WebViewSettings {
    fn default() -> Self {
        Self {
            devtools: cfg!(debug_assertions),
            scheme: "trellis".into(),
            user_agent: Some("Trellis/0.1".into()),
        }
    }
}

// =============================================================================
// Logging Config
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `trellis=debug`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "trellis=info".into(),
        }
    }
}
