//! The registration page for creating an account with the REST backend.

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    ApiClient, AppState, Error,
    api::NewUser,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, base,
        loading_spinner, log_in_register, password_input,
    },
};

/// The minimum number of characters in a password.
const PASSWORD_MIN_LENGTH: usize = 8;

pub const PASSWORD_MISMATCH_ERROR_MSG: &str = "Passwords do not match";
pub const PASSWORD_TOO_SHORT_ERROR_MSG: &str = "Password must be at least 8 characters";

fn registration_form(username: &str, email: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::REGISTER_API)
            hx-target="this"
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="find button"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(error_message) = error_message {
                p class="text-red-500 text-base" role="alert" { (error_message) }
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

            div
            {
                label for="email" class=(FORM_LABEL_STYLE) { "Email" }

                input
                    type="email"
                    name="email"
                    id="email"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(email)
                    required;
            }

            (password_input("password", "Password", PASSWORD_MIN_LENGTH as u8))
            (password_input("confirm_password", "Confirm Password", PASSWORD_MIN_LENGTH as u8))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Register"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                a href=(endpoints::LOG_IN_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                    "Log in here"
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let registration_form = registration_form("", "", None);
    let content = log_in_register("Create an account", &registration_form);
    base("Register", &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The client for the REST backend that creates the account.
    pub api: ApiClient,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}

/// The raw data entered by the user in the registration form.
#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

fn validate(form: &RegisterForm) -> Result<(), &'static str> {
    if form.password != form.confirm_password {
        return Err(PASSWORD_MISMATCH_ERROR_MSG);
    }

    if form.password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(PASSWORD_TOO_SHORT_ERROR_MSG);
    }

    Ok(())
}

/// Create a new account with the backend.
///
/// On success the client is redirected to the log-in page, otherwise the form
/// is returned with the reason the account could not be created.
pub async fn register_user(
    State(state): State<RegistrationState>,
    Form(form): Form<RegisterForm>,
) -> Response {
    let username = form.username.trim();
    let email = form.email.trim();

    if let Err(message) = validate(&form) {
        return registration_form(username, email, Some(message)).into_response();
    }

    let new_user = NewUser {
        username: username.to_owned(),
        email: email.to_owned(),
        password: form.password.clone(),
    };

    match state.api.register(&new_user).await {
        Ok(()) => {
            tracing::info!("Registered new user {username}");
            (
                HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(Error::RegistrationRejected(message)) => {
            registration_form(username, email, Some(&message)).into_response()
        }
        Err(error) => {
            tracing::error!("Could not register user {username}: {error}");
            registration_form(
                username,
                email,
                Some("Could not reach the server. Please try again later."),
            )
            .into_response()
        }
    }
}
