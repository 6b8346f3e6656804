//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Trellis Configuration
# Only override what you want to change -- missing fields use defaults.

[app]
# Directory holding asset-manifest.json and the built bundle.
root = "out/app"
name = "Trellis App"
# Keep the surface running while hidden.
remain_active = false

[webview]
# devtools = false
# scheme = "trellis"
# user_agent = "Trellis/0.1"

[logging]
level = "trellis=info"
"##
    .to_string()
}
