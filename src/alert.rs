//! Alert banners for success and error messages.
//!
//! Alerts are swapped into the `#alert-container` element that [crate::html::base]
//! places on every page, either as the target of an htmx error response or as an
//! out-of-band swap alongside regular content. They dismiss themselves after five
//! seconds.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, PreEscaped, html};

/// How long an alert stays on screen before dismissing itself.
pub const ALERT_TIMEOUT_MS: u32 = 5000;

/// A message to show the user in a banner.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message without details.
    SuccessSimple {
        /// The headline.
        message: String,
    },
    /// An error message with further details.
    Error {
        /// The headline.
        message: String,
        /// Shown below the headline.
        details: String,
    },
    /// An error message without details.
    ErrorSimple {
        /// The headline.
        message: String,
    },
}

impl Alert {
    fn parts(&self) -> (bool, &str, Option<&str>) {
        match self {
            Alert::SuccessSimple { message } => (true, message, None),
            Alert::Error { message, details } => (false, message, Some(details)),
            Alert::ErrorSimple { message } => (false, message, None),
        }
    }

    /// Render the alert as markup that replaces `#alert-container` out-of-band.
    pub fn into_markup(self) -> Markup {
        let (is_success, message, details) = self.parts();

        let style = if is_success {
            "flex items-start p-4 mb-4 text-green-800 border border-green-300 \
            rounded-lg bg-green-50 dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
        } else {
            "flex items-start p-4 mb-4 text-red-800 border border-red-300 \
            rounded-lg bg-red-50 dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
        };
        let role = if is_success { "status" } else { "alert" };

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(style) role=(role)
                {
                    div class="flex-1"
                    {
                        p class="font-medium" { (message) }

                        @if let Some(details) = details.filter(|details| !details.is_empty()) {
                            p class="mt-1 text-sm" { (details) }
                        }
                    }

                    button
                        type="button"
                        aria-label="Dismiss"
                        class="ms-3 text-sm font-bold"
                        onclick="this.closest('#alert-container').classList.add('hidden')"
                    {
                        "×"
                    }
                }

                script
                {
                    (PreEscaped(format!(
                        "setTimeout(() => document.getElementById('alert-container')\
                        ?.classList.add('hidden'), {ALERT_TIMEOUT_MS});"
                    )))
                }
            }
        }
    }

    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Html<String> {
        Html(self.into_markup().into_string())
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::{ALERT_TIMEOUT_MS, Alert};

    #[test]
    fn alert_replaces_container_out_of_band() {
        let html = Alert::SuccessSimple {
            message: "Expense deleted".to_owned(),
        }
        .into_html()
        .0;

        let fragment = Html::parse_fragment(&html);
        let container = fragment
            .select(&Selector::parse("#alert-container").unwrap())
            .next()
            .expect("No alert container found");

        assert_eq!(container.value().attr("hx-swap-oob"), Some("true"));
        assert!(container.text().any(|text| text.contains("Expense deleted")));
    }

    #[test]
    fn error_alert_shows_details() {
        let html = Alert::Error {
            message: "Failed to delete expense".to_owned(),
            details: "The expense could not be found.".to_owned(),
        }
        .into_html()
        .0;

        let fragment = Html::parse_fragment(&html);
        let alert = fragment
            .select(&Selector::parse("[role=alert]").unwrap())
            .next()
            .expect("No alert found");
        let text = alert.text().collect::<String>();

        assert!(text.contains("Failed to delete expense"));
        assert!(text.contains("The expense could not be found."));
    }

    #[test]
    fn alert_dismisses_itself() {
        let html = Alert::ErrorSimple {
            message: "Oops".to_owned(),
        }
        .into_html()
        .0;

        assert!(html.contains(&format!("{ALERT_TIMEOUT_MS})")));
    }
}
