//! Where to send the user after they log in.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

/// Keep `raw_url` only if it is a local path that is not the log-in page,
/// otherwise a crafted link could send the user to another site.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;

    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    local_path_and_query(&uri)
}

fn local_path_and_query(uri: &Uri) -> Option<String> {
    let path_and_query = uri.path_and_query()?;
    let path = path_and_query.path();

    let is_local = path.starts_with('/') && !path.starts_with("//");
    let is_log_in_page = path == endpoints::LOG_IN_VIEW;

    (is_local && !is_log_in_page).then(|| path_and_query.as_str().to_owned())
}

/// The log-in URL with a `redirect_url` parameter pointing back to the page the user was on.
///
/// htmx requests to `/api` routes are sent back to the page that made the
/// request (the `HX-Current-URL` header), other requests to themselves.
/// Falls back to the dashboard.
pub fn log_in_redirect_url(request: &Request) -> String {
    let target = if request.uri().path().starts_with("/api") {
        hx_current_page(request)
    } else {
        local_path_and_query(request.uri())
    };

    let target = target.unwrap_or_else(|| {
        tracing::warn!(
            "Could not determine the page for {} to return to after logging in. Falling back to dashboard.",
            request.uri().path()
        );
        endpoints::DASHBOARD_VIEW.to_owned()
    });

    log_in_url_with_redirect(&target)
}

/// The log-in URL with `redirect_target` as its `redirect_url` parameter.
pub fn log_in_url_with_redirect(redirect_target: &str) -> String {
    match serde_urlencoded::to_string([("redirect_url", redirect_target)]) {
        Ok(query) => format!("{}?{}", endpoints::LOG_IN_VIEW, query),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {redirect_target}: {error}");
            endpoints::LOG_IN_VIEW.to_owned()
        }
    }
}

fn hx_current_page(request: &Request) -> Option<String> {
    let headers = request.headers();

    let is_hx_request = headers
        .get("hx-request")
        .and_then(|header| header.to_str().ok())
        .is_some_and(|header| header.eq_ignore_ascii_case("true"));

    if !is_hx_request {
        return None;
    }

    // HX-Current-URL is absolute, only its path and query are kept.
    let current_url = headers.get("hx-current-url")?.to_str().ok()?;
    let uri = current_url.parse::<Uri>().ok()?;

    local_path_and_query(&uri)
}
