//! Configuration validation.

use trellis_common::ConfigError;

use crate::schema::TrellisConfig;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &TrellisConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    if config.app.name.trim().is_empty() {
        errors.push("app.name must not be empty".into());
    }
    if config.app.root.as_os_str().is_empty() {
        errors.push("app.root must not be empty".into());
    }
    if !is_valid_scheme(&config.webview.scheme) {
        errors.push(format!(
            "webview.scheme must be lowercase ASCII letters, got \"{}\"",
            config.webview.scheme
        ));
    }
    if config.logging.level.trim().is_empty() {
        errors.push("logging.level must not be empty".into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn is_valid_scheme(scheme: &str) -> bool {
    !scheme.is_empty() && scheme.bytes().all(|b| b.is_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&TrellisConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = TrellisConfig::default();
        config.app.name = "  ".into();
        config.webview.scheme = "Trellis-1".into();

        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("app.name"));
        assert!(err.contains("webview.scheme"));
    }

    #[test]
    fn scheme_rules() {
        assert!(is_valid_scheme("trellis"));
        assert!(!is_valid_scheme(""));
        assert!(!is_valid_scheme("http:"));
        assert!(!is_valid_scheme("Trellis"));
    }
}
