//! Fintrack is a web app for tracking personal income and expenses.
//!
//! This library provides a REST API that directly serves HTML pages. Records
//! are kept per user in either a SQLite database or a local JSON blob, and
//! every page derives its totals, breakdowns and filtered views from the full
//! record set on each request.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod analytics;
mod app_state;
mod auth;
mod category;
mod dashboard;
mod db;
mod endpoints;
mod error_page;
mod html;
mod live;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod session;
mod settings;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, StoreBackend};
pub use auth::{PasswordHash, User, UserID, ValidatedPassword, get_user_by_email, update_password};
pub use category::{
    Category, CategoryColor, CategoryId, CategoryKind, CategoryName, CategoryPatch, CategoryStore,
    NewCategory, SQLiteCategoryStore,
};
pub use db::initialize as initialize_db;
pub use live::{LiveFeed, Subscription};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use session::Session;
pub use transaction::{
    CategoryFilter, CategorySummary, FilterSpec, KindFilter, LocalTransactionStore, MonthSummary,
    NewTransaction, SQLiteTransactionStore, Totals, Transaction, TransactionId, TransactionKind,
    TransactionPatch, TransactionStore, category_breakdown, category_list, coerce_amount,
    export_csv, export_file_name, filter_transactions, month_breakdown, totals,
};

use crate::{
    alert::Alert,
    error_page::ErrorPage,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install the terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an email and password combination that does not match a user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The auth token cookie is missing from the cookie jar in the request.
    #[error("no auth token in the cookie jar")]
    CookieMissing,

    /// The auth token in the cookie jar has expired.
    #[error("the auth token has expired")]
    TokenExpired,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The email used to create a user is already registered.
    #[error("the email address is already in use")]
    DuplicateEmail,

    /// A mutating operation was attempted by a session without a user.
    #[error("you must be logged in to do that")]
    Unauthenticated,

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// A string that is not one of the palette keys was used to pick a category colour.
    #[error("\"{0}\" is not a category colour")]
    InvalidCategoryColor(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// The local record blob could not be read, parsed or written.
    #[error("could not access the local store: {0}")]
    StorageError(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// The CSV export could not be written.
    #[error("could not write the CSV export: {0}")]
    CsvError(String),

    /// An export was requested for an empty set of transactions.
    #[error("there are no transactions to export")]
    NothingToExport,

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the store")]
    UpdateMissingTransaction,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the store")]
    UpdateMissingCategory,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::Unauthenticated => Redirect::to(endpoints::LOG_IN_VIEW).into_response(),
            Error::NothingToExport => ErrorPage {
                status: StatusCode::BAD_REQUEST,
                description: "Nothing to export",
                fix: "There are no transactions matching your filters. \
                    Change the filters and try again.",
            }
            .into_response(),
            Error::InvalidTimezoneError(timezone) => ErrorPage {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
                ..Default::default()
            }
            .into_response(),
            Error::DatabaseLockError => ErrorPage::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                ErrorPage::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an alert that is swapped into the page's alert container.
    pub(crate) fn into_alert_response(self) -> Response {
        let (status, message, details) = match self {
            Error::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "Not logged in",
                "Log in and try again.".to_owned(),
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid Timezone Settings",
                format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            ),
            Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                "Could not update transaction",
                "The transaction could not be found. \
                Try refreshing the page to see if the transaction has been deleted."
                    .to_owned(),
            ),
            Error::UpdateMissingCategory => (
                StatusCode::NOT_FOUND,
                "Could not update category",
                "The category could not be found. \
                Try refreshing the page to see if the category has been deleted."
                    .to_owned(),
            ),
            Error::NothingToExport => (
                StatusCode::BAD_REQUEST,
                "Nothing to export",
                "There are no transactions matching your filters.".to_owned(),
            ),
            Error::EmptyCategoryName | Error::InvalidCategoryColor(_) => {
                let details = self.to_string();
                (StatusCode::BAD_REQUEST, "Invalid category", details)
            }
            Error::StorageError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not save your changes",
                "The local store could not be read or written, check the server logs for more details."
                    .to_owned(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong",
                "An unexpected error occurred, check the server logs for more details.".to_owned(),
            ),
        };

        (status, Alert::Error { message: message.to_owned(), details }).into_response()
    }
}
