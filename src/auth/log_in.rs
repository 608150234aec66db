//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! Credentials are checked by the REST backend, which hands back the tokens kept in the session cookies.

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    ApiClient, AppState, Error,
    api::Credentials,
    auth::{normalize_redirect_url, set_session_cookies},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, base,
        loading_spinner, log_in_register, password_input,
    },
};

pub const MISSING_FIELDS_ERROR_MSG: &str = "Please fill in all fields";

fn log_in_form(username: &str, error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-target="this"
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="find button"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(error_message) = error_message {
                p class="text-red-500 text-base" role="alert" { (error_message) }
            }

            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            div
            {
                label for="username" class=(FORM_LABEL_STYLE) { "Username" }

                input
                    type="text"
                    name="username"
                    id="username"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(username)
                    required
                    autofocus;
            }

            (password_input("password", "Password", 0))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Log in"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Don't have an account? "
                a href=(endpoints::REGISTER_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                    "Register here"
                }
            }
        }
    }
}

fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    let redirect_url = raw_url.and_then(normalize_redirect_url);

    if let (None, Some(raw_url)) = (&redirect_url, raw_url) {
        tracing::warn!("Invalid redirect URL from {source}: {raw_url}");
    }

    redirect_url
}

/// Display the log-in page.
pub async fn get_log_in_page(Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "log-in query");
    let log_in_form = log_in_form("", None, redirect_url.as_deref());
    let content = log_in_register("Log in to your account", &log_in_form);
    base("Log In", &[], &content).into_response()
}

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which the session cookies are valid.
    pub cookie_duration: Duration,
    /// The client for the REST backend that checks the credentials.
    pub api: ApiClient,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            api: state.api.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the session cookies are set and the client
/// is redirected to the dashboard page, or the page they were on before being
/// asked to log in. Otherwise, the form is returned with an error message
/// explaining the problem.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let redirect_url = parse_redirect_url(user_data.redirect_url.as_deref(), "log-in form");
    let redirect_url = redirect_url.as_deref();
    let username = user_data.username.trim();

    if username.is_empty() || user_data.password.is_empty() {
        return log_in_form(username, Some(MISSING_FIELDS_ERROR_MSG), redirect_url).into_response();
    }

    let credentials = Credentials {
        username: username.to_owned(),
        password: user_data.password,
    };

    let tokens = match state.api.log_in(&credentials).await {
        Ok(tokens) => tokens,
        Err(Error::LogInRejected(message)) => {
            tracing::info!("Log-in rejected for {username}: {message}");
            return log_in_form(username, Some(&message), redirect_url).into_response();
        }
        Err(error) => {
            tracing::error!("Could not log in {username}: {error}");
            return log_in_form(
                username,
                Some("Could not reach the server. Please try again later."),
                redirect_url,
            )
            .into_response();
        }
    };

    let jar = set_session_cookies(jar, tokens, state.cookie_duration);
    let redirect_url = redirect_url.unwrap_or(endpoints::DASHBOARD_VIEW);

    (
        StatusCode::SEE_OTHER,
        HxRedirect(redirect_url.to_owned()),
        jar,
    )
        .into_response()
}

#[derive(Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

/// The raw data entered by the user in the log-in form.
///
/// Missing fields are read as empty strings so the form can say which are missing.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// Username entered during log-in.
    #[serde(default)]
    pub username: String,

    /// Password entered during log-in.
    #[serde(default)]
    pub password: String,

    /// Optional URL to redirect to after logging in.
    /// Only accepted from the log-in form submission.
    pub redirect_url: Option<String>,
}
