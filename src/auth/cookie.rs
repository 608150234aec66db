//! Stores the backend's bearer tokens in private cookies.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{api::TokenPair, auth::AccessToken};

pub(crate) const COOKIE_ACCESS_TOKEN: &str = "access_token";
pub(crate) const COOKIE_REFRESH_TOKEN: &str = "refresh_token";
/// The default duration for which the session cookies are valid.
pub(crate) const DEFAULT_COOKIE_DURATION: Duration = Duration::days(1);

/// Add the session cookies holding `tokens` to the cookie jar.
///
/// The cookies expire `duration` from now, the backend decides separately
/// how long the tokens themselves are accepted.
pub(crate) fn set_session_cookies(
    jar: PrivateCookieJar,
    tokens: TokenPair,
    duration: Duration,
) -> PrivateCookieJar {
    let expiry = OffsetDateTime::now_utc() + duration;

    jar.add(session_cookie(COOKIE_ACCESS_TOKEN, tokens.access, expiry))
        .add(session_cookie(COOKIE_REFRESH_TOKEN, tokens.refresh, expiry))
}

/// Overwrite the session cookies with expired ones, which deletes them on the client side.
pub(crate) fn invalidate_session_cookies(jar: PrivateCookieJar) -> PrivateCookieJar {
    let mut access_cookie = session_cookie(
        COOKIE_ACCESS_TOKEN,
        "deleted".to_owned(),
        OffsetDateTime::UNIX_EPOCH,
    );
    access_cookie.set_max_age(Duration::ZERO);

    let mut refresh_cookie = session_cookie(
        COOKIE_REFRESH_TOKEN,
        "deleted".to_owned(),
        OffsetDateTime::UNIX_EPOCH,
    );
    refresh_cookie.set_max_age(Duration::ZERO);

    jar.add(access_cookie).add(refresh_cookie)
}

pub(crate) fn get_access_token(jar: &PrivateCookieJar) -> Option<AccessToken> {
    jar.get(COOKIE_ACCESS_TOKEN)
        .map(|cookie| cookie.value_trimmed().to_owned())
        .filter(|token| !token.is_empty())
        .map(AccessToken::new)
}

pub(crate) fn get_refresh_token(jar: &PrivateCookieJar) -> Option<String> {
    jar.get(COOKIE_REFRESH_TOKEN)
        .map(|cookie| cookie.value_trimmed().to_owned())
        .filter(|token| !token.is_empty())
}

fn session_cookie(name: &'static str, value: String, expiry: OffsetDateTime) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .expires(expiry)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .build()
}
