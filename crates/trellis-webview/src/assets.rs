//! Asset manifest lookup.
//!
//! The bundle shown inside a surface is built elsewhere and ships an
//! `asset-manifest.json` that maps logical names (`main.js`, `main.css`) to
//! content-hashed files. This module turns those names into locators the
//! surface can load through the custom protocol.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use trellis_common::BridgeError;

/// File name of the manifest inside the asset root.
pub const MANIFEST_FILE: &str = "asset-manifest.json";

/// Host part used in every locator.
const LOCATOR_HOST: &str = "localhost";

/// Well-known manifest keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKey {
    MainScript,
    MainStyle,
}

impl AssetKey {
    pub fn manifest_key(self) -> &'static str {
        match self {
            AssetKey::MainScript => "main.js",
            AssetKey::MainStyle => "main.css",
        }
    }
}

/// A resource addressed through the surface's custom protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLocator {
    scheme: String,
    root: PathBuf,
    relative: String,
}

impl AssetLocator {
    /// Locator for the asset root itself, used as the document base.
    pub fn base(scheme: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            scheme: scheme.into(),
            root: root.into(),
            relative: String::new(),
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Root-relative path, `/`-separated, without a leading slash.
    pub fn relative(&self) -> &str {
        &self.relative
    }

    /// Location of the asset on disk.
    pub fn file_path(&self) -> PathBuf {
        self.root.join(&self.relative)
    }
}

impl fmt::Display for AssetLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", self.scheme, LOCATOR_HOST, self.relative)
    }
}

#[derive(Deserialize)]
struct RawManifest {
    files: Option<BTreeMap<String, Value>>,
}

/// Parsed `asset-manifest.json`.
#[derive(Debug, Clone)]
pub struct AssetManifest {
    path: PathBuf,
    root: PathBuf,
    files: BTreeMap<String, Value>,
}

impl AssetManifest {
    /// Read the manifest under `root`.
    pub fn load(root: &Path) -> Result<Self, BridgeError> {
        let path = root.join(MANIFEST_FILE);
        let missing = |reason: String| BridgeError::ManifestMissing {
            path: path.clone(),
            reason,
        };

        let content = std::fs::read_to_string(&path).map_err(|e| missing(e.to_string()))?;
        let raw: RawManifest = serde_json::from_str(&content)
            .map_err(|e| missing(format!("failed to parse: {e}")))?;
        let files = raw
            .files
            .ok_or_else(|| missing("no \"files\" table".into()))?;

        Ok(Self {
            path,
            root: root.to_path_buf(),
            files,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve `key` to a locator under the manifest's root.
    pub fn locate(&self, key: &str, scheme: &str) -> Result<AssetLocator, BridgeError> {
        match self.files.get(key) {
            Some(Value::String(file)) => Ok(AssetLocator {
                scheme: scheme.to_string(),
                root: self.root.clone(),
                relative: normalize(file),
            }),
            _ => Err(BridgeError::AssetKeyMissing {
                key: key.to_string(),
                manifest: self.path.clone(),
            }),
        }
    }
}

/// Manifest entries are written as `/static/...` or `./static/...` depending
/// on the bundler; both mean "relative to the root".
fn normalize(file: &str) -> String {
    Path::new(file)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Resolves logical asset names against an asset root.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    root: PathBuf,
    scheme: String,
}

impl AssetResolver {
    pub fn new(root: impl Into<PathBuf>, scheme: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            scheme: scheme.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Load the manifest once, for callers resolving several keys together.
    pub fn load_manifest(&self) -> Result<AssetManifest, BridgeError> {
        AssetManifest::load(&self.root)
    }

    /// Resolve a single key. The manifest is re-read on every call.
    pub fn resolve(&self, key: &str) -> Result<AssetLocator, BridgeError> {
        self.load_manifest()?.locate(key, &self.scheme)
    }

    /// Locator for the root directory.
    pub fn base(&self) -> AssetLocator {
        AssetLocator::base(self.scheme.clone(), self.root.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_root(manifest: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), manifest).unwrap();
        dir
    }

    #[test]
    fn resolves_key_to_root_relative_locator() {
        let dir = app_root(r#"{"files": {"main.js": "static/js/main.abc123.js"}}"#);
        let resolver = AssetResolver::new(dir.path(), "trellis");

        let locator = resolver.resolve("main.js").unwrap();
        assert_eq!(
            locator.file_path(),
            dir.path().join("static/js/main.abc123.js")
        );
        assert_eq!(
            locator.to_string(),
            "trellis://localhost/static/js/main.abc123.js"
        );
        assert_eq!(locator.scheme(), "trellis");
    }

    #[test]
    fn missing_key_fails_with_asset_key_missing() {
        let dir = app_root(r#"{"files": {"main.js": "static/js/main.abc123.js"}}"#);
        let err = AssetResolver::new(dir.path(), "trellis")
            .resolve("main.css")
            .unwrap_err();
        assert!(matches!(err, BridgeError::AssetKeyMissing { ref key, .. } if key == "main.css"));
    }

    #[test]
    fn missing_manifest_fails_with_manifest_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = AssetResolver::new(dir.path(), "trellis")
            .resolve("main.js")
            .unwrap_err();
        assert!(matches!(err, BridgeError::ManifestMissing { .. }));
    }

    #[test]
    fn manifest_without_files_table_is_missing() {
        let dir = app_root(r#"{"entrypoints": ["static/js/main.js"]}"#);
        let err = AssetResolver::new(dir.path(), "trellis")
            .resolve("main.js")
            .unwrap_err();
        assert!(matches!(err, BridgeError::ManifestMissing { ref reason, .. } if reason.contains("files")));
    }

    #[test]
    fn unparsable_manifest_is_missing() {
        let dir = app_root("{ not json");
        let err = AssetResolver::new(dir.path(), "trellis")
            .load_manifest()
            .unwrap_err();
        assert!(matches!(err, BridgeError::ManifestMissing { .. }));
    }

    #[test]
    fn non_string_entry_counts_as_missing_key() {
        let dir = app_root(r#"{"files": {"main.js": ["a.js", "b.js"]}}"#);
        let err = AssetResolver::new(dir.path(), "trellis")
            .resolve("main.js")
            .unwrap_err();
        assert!(matches!(err, BridgeError::AssetKeyMissing { .. }));
    }

    #[test]
    fn leading_slash_and_dot_are_stripped() {
        let dir = app_root(
            r#"{"files": {"main.js": "/static/js/main.js", "main.css": "./static/css/main.css"}}"#,
        );
        let manifest = AssetResolver::new(dir.path(), "trellis")
            .load_manifest()
            .unwrap();
        assert_eq!(
            manifest.locate("main.js", "trellis").unwrap().relative(),
            "static/js/main.js"
        );
        assert_eq!(
            manifest.locate("main.css", "trellis").unwrap().relative(),
            "static/css/main.css"
        );
    }

    #[test]
    fn manifest_is_reread_on_every_resolve() {
        let dir = app_root(r#"{"files": {"main.js": "static/js/old.js"}}"#);
        let resolver = AssetResolver::new(dir.path(), "trellis");
        assert_eq!(resolver.resolve("main.js").unwrap().relative(), "static/js/old.js");

        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{"files": {"main.js": "static/js/new.js"}}"#,
        )
        .unwrap();
        assert_eq!(resolver.resolve("main.js").unwrap().relative(), "static/js/new.js");
    }

    #[test]
    fn base_locator_addresses_root() {
        let resolver = AssetResolver::new("/srv/app", "trellis");
        assert_eq!(resolver.base().to_string(), "trellis://localhost/");
        assert_eq!(resolver.base().file_path(), PathBuf::from("/srv/app"));
    }

    #[test]
    fn well_known_keys() {
        assert_eq!(AssetKey::MainScript.manifest_key(), "main.js");
        assert_eq!(AssetKey::MainStyle.manifest_key(), "main.css");
    }
}
