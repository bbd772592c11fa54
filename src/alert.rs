//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered as fragments that `static/app.js` swaps into the
//! page's `#alert-container`, where they dismiss themselves after a few seconds.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// A toast notification describing the outcome of an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The action succeeded, with extra details.
    Success { message: String, details: String },
    /// The action succeeded.
    SuccessSimple { message: String },
    /// The action failed, with details on what went wrong.
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (is_success, message, details) = match self {
            Alert::Success { message, details } => (true, message, details),
            Alert::SuccessSimple { message } => (true, message, String::new()),
            Alert::Error { message, details } => (false, message, details),
        };

        let style = if is_success {
            "flex items-start gap-3 p-4 rounded-lg shadow-lg border \
            text-green-800 bg-green-50 border-green-300 \
            dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
        } else {
            "flex items-start gap-3 p-4 rounded-lg shadow-lg border \
            text-red-800 bg-red-50 border-red-300 \
            dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
        };

        html! {
            div
                role="alert"
                data-alert=(if is_success { "success" } else { "error" })
                class=(style)
            {
                div class="flex-1"
                {
                    p class="font-semibold" { (message) }

                    @if !details.is_empty() {
                        p class="text-sm mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    data-dismiss-alert
                    aria-label="Dismiss"
                    class="ms-auto -mx-1.5 -my-1.5 rounded-lg p-1.5 inline-flex
                        items-center justify-center h-8 w-8 hover:bg-black/5"
                {
                    "×"
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
