//! Log-out route handler that ends the backend session, clears the session cookies and redirects users.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};

use crate::{
    ApiClient, AppState,
    auth::{get_access_token, get_refresh_token, invalidate_session_cookies},
    endpoints,
};

/// The state needed to log out.
#[derive(Debug, Clone)]
pub struct LogOutState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The client for the REST backend that owns the session.
    pub api: ApiClient,
}

impl FromRef<AppState> for LogOutState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            api: state.api.clone(),
        }
    }
}

impl FromRef<LogOutState> for Key {
    fn from_ref(state: &LogOutState) -> Self {
        state.cookie_key.clone()
    }
}

/// Tell the backend to end the session, clear the session cookies and
/// redirect the client to the log-in page.
///
/// The user is logged out locally even if the backend cannot be reached.
pub async fn get_log_out(State(state): State<LogOutState>, jar: PrivateCookieJar) -> Response {
    if let (Some(access_token), Some(refresh_token)) =
        (get_access_token(&jar), get_refresh_token(&jar))
    {
        if let Err(error) = state.api.log_out(&access_token, &refresh_token).await {
            tracing::warn!("Could not end the session with the backend: {error}");
        }
    }

    let jar = invalidate_session_cookies(jar);

    (jar, Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}
