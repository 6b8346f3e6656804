//! Local content serving via custom protocol.
//!
//! Surfaces load the bundle through `<scheme>://localhost/<path>` instead of
//! `file://`, so no local HTTP server is needed and reads stay inside the
//! declared resource roots.

use std::path::{Path, PathBuf};

/// Serves files from an asset root, restricted to a set of allowed roots.
#[derive(Debug, Clone)]
pub struct ContentProvider {
    base_dir: PathBuf,
    allowed_roots: Vec<PathBuf>,
}

impl ContentProvider {
    /// A provider rooted at `base_dir` that may read anywhere below it.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            allowed_roots: vec![base_dir.clone()],
            base_dir,
        }
    }

    /// A provider rooted at `base_dir` limited to `roots`.
    pub fn with_roots(base_dir: impl Into<PathBuf>, roots: Vec<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            allowed_roots: roots,
        }
    }

    /// Resolve a request path to file contents and MIME type.
    pub fn resolve(&self, path: &str) -> Option<(&'static str, Vec<u8>)> {
        let clean = path.split(['?', '#']).next().unwrap_or("");
        let clean = clean.trim_start_matches('/');
        let clean = if clean.is_empty() { "index.html" } else { clean };
        let file_path = self.base_dir.join(clean);

        // Canonicalize both sides so `..` and symlinks cannot escape.
        let canonical_file = std::fs::canonicalize(&file_path).ok()?;
        let allowed = self
            .allowed_roots
            .iter()
            .filter_map(|root| std::fs::canonicalize(root).ok())
            .any(|root| canonical_file.starts_with(root));
        if !allowed || !canonical_file.is_file() {
            return None;
        }

        let data = std::fs::read(&canonical_file).ok()?;
        Some((mime_from_extension(&file_path), data))
    }

    /// Map a protocol URI to a request path.
    ///
    /// Handles both `scheme://localhost/...` and the `http://scheme.localhost/...`
    /// form WebView2 rewrites custom protocols to on Windows.
    pub fn request_path<'a>(uri: &'a str, scheme: &str) -> &'a str {
        let native = format!("{scheme}://localhost");
        let rewritten = format!("http://{scheme}.localhost");
        uri.strip_prefix(native.as_str())
            .or_else(|| uri.strip_prefix(rewritten.as_str()))
            .unwrap_or("")
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// Guess MIME type from file extension.
fn mime_from_extension(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") | Some("mjs") => "application/javascript",
        Some("json") | Some("map") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("wasm") => "application/wasm",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("webp") => "image/webp",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let js = dir.path().join("static").join("js");
        std::fs::create_dir_all(&js).unwrap();
        std::fs::write(js.join("main.abc123.js"), "console.log(1);").unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        dir
    }

    #[test]
    fn serves_bundle_files_with_mime() {
        let dir = bundle();
        let provider = ContentProvider::new(dir.path());

        let (mime, data) = provider.resolve("/static/js/main.abc123.js").unwrap();
        assert_eq!(mime, "application/javascript");
        assert_eq!(data, b"console.log(1);");
    }

    #[test]
    fn empty_path_serves_index() {
        let dir = bundle();
        let (mime, _) = ContentProvider::new(dir.path()).resolve("/").unwrap();
        assert_eq!(mime, "text/html");
    }

    #[test]
    fn query_string_is_ignored() {
        let dir = bundle();
        let provider = ContentProvider::new(dir.path());
        assert!(provider.resolve("static/js/main.abc123.js?v=2").is_some());
    }

    #[test]
    fn traversal_outside_root_is_blocked() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("app");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(outer.path().join("secret.txt"), "nope").unwrap();

        let provider = ContentProvider::new(&root);
        assert!(provider.resolve("../secret.txt").is_none());
    }

    #[test]
    fn files_outside_allowed_roots_are_blocked() {
        let dir = bundle();
        let provider =
            ContentProvider::with_roots(dir.path(), vec![dir.path().join("static")]);
        assert!(provider.resolve("static/js/main.abc123.js").is_some());
        assert!(provider.resolve("index.html").is_none());
    }

    #[test]
    fn missing_file_and_directories_are_none() {
        let dir = bundle();
        let provider = ContentProvider::new(dir.path());
        assert!(provider.resolve("static/js/missing.js").is_none());
        assert!(provider.resolve("static").is_none());
    }

    #[test]
    fn request_path_strips_both_uri_forms() {
        assert_eq!(
            ContentProvider::request_path("trellis://localhost/static/a.js", "trellis"),
            "/static/a.js"
        );
        assert_eq!(
            ContentProvider::request_path("http://trellis.localhost/static/a.js", "trellis"),
            "/static/a.js"
        );
        assert_eq!(ContentProvider::request_path("https://evil.com/a.js", "trellis"), "");
    }

    #[test]
    fn mime_fallback() {
        assert_eq!(mime_from_extension(Path::new("a.bin")), "application/octet-stream");
        assert_eq!(mime_from_extension(Path::new("a.css")), "text/css");
    }
}
