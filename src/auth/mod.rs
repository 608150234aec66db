//! Session handling on top of the REST backend's bearer tokens.
//!
//! The backend issues an access and a refresh token on log-in. Both are kept
//! in private (encrypted) cookies and the access token is forwarded with each
//! request to the backend.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod redirect;
mod register;
mod token;

pub(crate) use cookie::{
    DEFAULT_COOKIE_DURATION, get_access_token, get_refresh_token, invalidate_session_cookies,
    set_session_cookies,
};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_hx};
pub use redirect::normalize_redirect_url;
pub use register::{get_register_page, register_user};
pub use token::AccessToken;

#[cfg(test)]
pub(crate) use cookie::{COOKIE_ACCESS_TOKEN, COOKIE_REFRESH_TOKEN};

#[cfg(test)]
pub use middleware::AuthState;

#[cfg(test)]
pub(crate) use redirect::log_in_url_with_redirect;
