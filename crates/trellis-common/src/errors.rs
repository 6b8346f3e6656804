use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no platform config directory")]
    NoConfigDir,

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Faults raised by the message bridge and the surface lifecycle.
///
/// None of these are allowed to unwind into the hosting environment. The
/// owner of a registry or surface reports them as notifications instead.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("asset manifest not found at {path}: {reason}")]
    ManifestMissing { path: PathBuf, reason: String },

    #[error("the key \"{key}\" was not found in {manifest}")]
    AssetKeyMissing { key: String, manifest: PathBuf },

    #[error("a command was already registered for \"{0}\"")]
    DuplicateRegistration(String),

    #[error("no command registered for \"{0}\"")]
    UnhandledCommand(String),

    #[error("cannot {operation}: surface is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error("surface error: {0}")]
    Surface(String),
}

impl BridgeError {
    /// Short heading used when the fault is shown to the operator.
    pub fn title(&self) -> &'static str {
        match self {
            BridgeError::ManifestMissing { .. } => "Asset manifest missing",
            BridgeError::AssetKeyMissing { .. } => "Asset key missing",
            BridgeError::DuplicateRegistration(_) => "Duplicate registration",
            BridgeError::UnhandledCommand(_) => "Unhandled command",
            BridgeError::InvalidState { .. } => "Invalid surface state",
            BridgeError::MalformedMessage(_) => "Malformed message",
            BridgeError::Surface(_) => "Surface error",
        }
    }
}

/// Faults that end the host process.
#[derive(Debug, thiserror::Error)]
pub enum TrellisError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("event loop error: {0}")]
    EventLoop(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("app.name must not be empty".into());
        assert_eq!(
            err.to_string(),
            "config validation error: app.name must not be empty"
        );
    }

    #[test]
    fn bridge_error_display() {
        let err = BridgeError::AssetKeyMissing {
            key: "main.js".into(),
            manifest: PathBuf::from("/app/asset-manifest.json"),
        };
        assert_eq!(
            err.to_string(),
            "the key \"main.js\" was not found in /app/asset-manifest.json"
        );

        let err = BridgeError::DuplicateRegistration("app:start".into());
        assert_eq!(
            err.to_string(),
            "a command was already registered for \"app:start\""
        );

        let err = BridgeError::UnhandledCommand("app:stop".into());
        assert_eq!(err.to_string(), "no command registered for \"app:stop\"");

        let err = BridgeError::InvalidState {
            operation: "register",
            state: "disposed",
        };
        assert_eq!(err.to_string(), "cannot register: surface is disposed");
    }

    #[test]
    fn bridge_error_titles_are_distinct() {
        let errors = [
            BridgeError::ManifestMissing {
                path: PathBuf::new(),
                reason: String::new(),
            },
            BridgeError::AssetKeyMissing {
                key: String::new(),
                manifest: PathBuf::new(),
            },
            BridgeError::DuplicateRegistration(String::new()),
            BridgeError::UnhandledCommand(String::new()),
            BridgeError::InvalidState {
                operation: "emit",
                state: "uninitialized",
            },
            BridgeError::MalformedMessage(String::new()),
            BridgeError::Surface(String::new()),
        ];
        let mut titles: Vec<_> = errors.iter().map(BridgeError::title).collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), errors.len());
    }

    #[test]
    fn config_io_error_names_path_and_cause() {
        let err = ConfigError::Io {
            path: PathBuf::from("/etc/trellis/config.toml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "cannot access /etc/trellis/config.toml: denied");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn trellis_error_from_config() {
        let err: TrellisError = ConfigError::ParseError("bad toml".into()).into();
        assert!(matches!(err, TrellisError::Config(_)));
        assert_eq!(err.to_string(), "config parse error: bad toml");
    }

    #[test]
    fn trellis_error_event_loop_display() {
        let err = TrellisError::EventLoop("os error".into());
        assert_eq!(err.to_string(), "event loop error: os error");
    }
}
