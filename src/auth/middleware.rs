//! Authentication middleware that checks for the session cookies and handles redirects.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;

use crate::{
    AppState,
    auth::{cookie::get_access_token, redirect::log_in_redirect_url},
};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

#[inline]
async fn auth_guard_internal(
    state: AuthState,
    request: Request,
    next: Next,
    get_redirect: impl Fn(&str) -> Response,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("Error getting cookie jar: {error:?}. Redirecting to log in page.");
            let request = Request::from_parts(parts, body);
            return get_redirect(&log_in_redirect_url(&request));
        }
    };

    let Some(token) = get_access_token(&jar) else {
        let request = Request::from_parts(parts, body);
        return get_redirect(&log_in_redirect_url(&request));
    };

    parts.extensions.insert(token);
    next.run(Request::from_parts(parts, body)).await
}

/// Middleware function that checks for the access token cookie.
///
/// The token is placed into the request and the request executed normally if
/// the cookie is present, otherwise a redirect to the log-in page is returned.
/// Whether the backend still accepts the token is only known once a handler uses it.
///
/// **Note**: Route handlers can use the function argument `Extension(token): Extension<AccessToken>` to receive the token.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    auth_guard_internal(state, request, next, |redirect_url| {
        Redirect::to(redirect_url).into_response()
    })
    .await
}

/// Middleware function that checks for the access token cookie.
///
/// Same as [auth_guard], but responds with an HTMX redirect for requests made by htmx.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    auth_guard_internal(state, request, next, |redirect_url| {
        (HxRedirect(redirect_url.to_owned()), StatusCode::OK).into_response()
    })
    .await
}

#[cfg(test)]
mod auth_guard_tests {
    use axum::{
        Extension, Router,
        extract::State,
        middleware,
        routing::{get, post},
    };
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use axum_test::TestServer;
    use sha2::Digest;

    use crate::{
        api::TokenPair,
        auth::{
            AccessToken, AuthState, COOKIE_ACCESS_TOKEN, DEFAULT_COOKIE_DURATION, auth_guard,
            auth_guard_hx, log_in_url_with_redirect, set_session_cookies,
        },
    };

    async fn echo_token(Extension(token): Extension<AccessToken>) -> String {
        token.as_str().to_owned()
    }

    async fn stub_log_in_route(State(_state): State<AuthState>, jar: PrivateCookieJar) -> PrivateCookieJar {
        set_session_cookies(
            jar,
            TokenPair {
                access: "access-123".to_owned(),
                refresh: "refresh-456".to_owned(),
            },
            DEFAULT_COOKIE_DURATION,
        )
    }

    const TEST_LOG_IN_ROUTE: &str = "/stub_log_in";
    const TEST_PROTECTED_ROUTE: &str = "/protected";
    const TEST_API_ROUTE: &str = "/api/protected";

    fn get_test_server() -> TestServer {
        let hash = sha2::Sha512::digest("nafstenoas");
        let state = AuthState {
            cookie_key: Key::from(&hash),
        };

        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(echo_token))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
            .merge(
                Router::new()
                    .route(TEST_API_ROUTE, get(echo_token))
                    .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
            )
            .route(TEST_LOG_IN_ROUTE, post(stub_log_in_route))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn passes_access_token_to_handler() {
        let server = get_test_server();
        let response = server.post(TEST_LOG_IN_ROUTE).await;
        response.assert_status_ok();
        let jar = response.cookies();

        let response = server.get(TEST_PROTECTED_ROUTE).add_cookies(jar).await;

        response.assert_status_ok();
        response.assert_text("access-123");
    }

    #[tokio::test]
    async fn missing_cookie_redirects_to_log_in() {
        let server = get_test_server();

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status_see_other();
        assert_eq!(
            response.header("location"),
            log_in_url_with_redirect(TEST_PROTECTED_ROUTE)
        );
    }

    #[tokio::test]
    async fn unencrypted_cookie_redirects_to_log_in() {
        let server = get_test_server();

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(axum_extra::extract::cookie::Cookie::new(
                COOKIE_ACCESS_TOKEN,
                "forged",
            ))
            .await;

        response.assert_status_see_other();
    }

    #[tokio::test]
    async fn api_route_uses_hx_current_url_for_redirect() {
        let server = get_test_server();
        let current_url = "/dashboard?category=1&month=2024-01";

        let response = server
            .get(TEST_API_ROUTE)
            .add_header("HX-Request", "true")
            .add_header("HX-Current-URL", current_url)
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.header("hx-redirect"),
            log_in_url_with_redirect(current_url)
        );
    }
}
