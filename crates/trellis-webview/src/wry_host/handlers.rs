use std::borrow::Cow;
use std::sync::Arc;

use tracing::{debug, warn};
use wry::http::{header::CONTENT_TYPE, Response, StatusCode};
use wry::WebViewBuilder;

use crate::channel::Inbox;
use crate::content::ContentProvider;
use crate::events::PageLoadState;

// =============================================================================
// NAVIGATION ALLOWLIST
// =============================================================================

/// Check whether a URL may be loaded by a surface using `scheme`.
///
/// Only the surface's own protocol and the empty page are permitted. On
/// Windows, WebView2 rewrites `scheme://localhost/…` to
/// `http://scheme.localhost/…`, so that form is allowed too.
pub fn is_navigation_allowed(url: &str, scheme: &str) -> bool {
    url == "about:blank"
        || url.starts_with(&format!("{scheme}://"))
        || url.starts_with(&format!("http://{scheme}.localhost/"))
        || url == format!("http://{scheme}.localhost")
}

// =============================================================================
// HANDLER ATTACHMENTS
// =============================================================================

pub(super) fn attach_ipc_handler<'a>(builder: WebViewBuilder<'a>, inbox: Inbox) -> WebViewBuilder<'a> {
    builder.with_ipc_handler(move |request| {
        let body = request.body().to_string();
        debug!(body_len = body.len(), "IPC message from content");
        if !inbox.push_message(body) {
            debug!("IPC message dropped: no listener");
        }
    })
}

pub(super) fn attach_page_load_handler(builder: WebViewBuilder<'_>) -> WebViewBuilder<'_> {
    builder.with_on_page_load_handler(move |event, url| {
        let state = PageLoadState::from(event);
        debug!(?state, url = %url, "page load");
    })
}

pub(super) fn attach_navigation_handler(
    builder: WebViewBuilder<'_>,
    scheme: String,
) -> WebViewBuilder<'_> {
    builder.with_navigation_handler(move |url| {
        if !is_navigation_allowed(&url, &scheme) {
            warn!(url = %url, "navigation blocked: URL not in allowlist");
            return false;
        }
        true
    })
}

pub(super) fn attach_custom_protocol<'a>(
    builder: WebViewBuilder<'a>,
    scheme: &str,
    provider: Arc<ContentProvider>,
) -> WebViewBuilder<'a> {
    let protocol = scheme.to_string();
    let origin = format!("{scheme}://localhost");
    builder.with_custom_protocol(protocol.clone(), move |_wv_id, request| {
        let uri = request.uri().to_string();
        let path = ContentProvider::request_path(&uri, &protocol);

        match provider.resolve(path) {
            Some((mime, data)) => respond(StatusCode::OK, mime, &origin, Cow::Owned(data)),
            None => {
                warn!(path = %path, "custom protocol: asset not found");
                respond(
                    StatusCode::NOT_FOUND,
                    "text/plain",
                    &origin,
                    Cow::Borrowed(&b"Not Found"[..]),
                )
            }
        }
    })
}

fn respond(
    status: StatusCode,
    mime: &str,
    origin: &str,
    body: Cow<'static, [u8]>,
) -> Response<Cow<'static, [u8]>> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, mime)
        .header("Access-Control-Allow-Origin", origin)
        .body(body)
        .unwrap_or_else(|e| {
            warn!(error = %e, "custom protocol: invalid response");
            let mut response = Response::new(Cow::Borrowed(&b""[..]));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        })
}
