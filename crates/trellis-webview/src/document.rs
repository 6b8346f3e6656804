//! Bootstrap HTML injected into a new surface.

use std::fmt;
use std::path::Path;

use trellis_common::BridgeError;

use crate::assets::{AssetKey, AssetResolver};
use crate::nonce::Nonce;

/// `id` of the element the bundled app mounts into.
pub const MOUNT_ELEMENT_ID: &str = "root";

/// Inputs for one document build.
#[derive(Debug, Clone, Copy)]
pub struct BootstrapParams<'a> {
    pub app_root: &'a Path,
    pub app_name: &'a str,
    pub nonce: &'a Nonce,
    pub scheme: &'a str,
}

/// The immutable document a surface boots from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapDocument(String);

impl BootstrapDocument {
    /// Assemble the document for `params`.
    ///
    /// The manifest is read once; both the script and the stylesheet are
    /// resolved from that copy. Output depends only on the inputs.
    pub fn build(params: &BootstrapParams<'_>) -> Result<Self, BridgeError> {
        let resolver = AssetResolver::new(params.app_root, params.scheme);
        let manifest = resolver.load_manifest()?;
        let script = manifest.locate(AssetKey::MainScript.manifest_key(), params.scheme)?;
        let style = manifest.locate(AssetKey::MainStyle.manifest_key(), params.scheme)?;
        let base = resolver.base();

        let nonce = params.nonce.as_str();
        let policy = content_policy(params.scheme, nonce);
        let title = escape_html(params.app_name);

        Ok(Self(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width,initial-scale=1,shrink-to-fit=no">
    <title>{title}</title>
    <link rel="stylesheet" type="text/css" href="{style}">
    <meta http-equiv="Content-Security-Policy" content="{policy}">
    <base href="{base}">
</head>
<body>
    <noscript>You need to enable JavaScript to run this app.</noscript>
    <div id="{MOUNT_ELEMENT_ID}"></div>
    <script nonce="{nonce}" src="{script}"></script>
</body>
</html>
"#
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for BootstrapDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Script execution is limited to elements carrying `nonce`. Images and
/// styles may come from the bundle itself.
fn content_policy(scheme: &str, nonce: &str) -> String {
    format!(
        "default-src 'none'; img-src {scheme}: https:; script-src 'nonce-{nonce}'; \
         style-src {scheme}: 'unsafe-inline' http: https: data:;"
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
