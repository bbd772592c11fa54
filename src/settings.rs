//! The settings page shows the account details and lets the user change
//! their display name and password.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, PasswordHash, Session, ValidatedPassword,
    alert::Alert,
    auth::{get_user_by_id, update_display_name, update_password},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, base, loading_spinner, password_input,
    },
    navigation::NavBar,
};

/// The minimum number of characters the new password should have on the client side.
const PASSWORD_INPUT_MIN_LENGTH: u8 = 14;

/// The longest display name, in characters.
const DISPLAY_NAME_MAX_LENGTH: usize = 64;

/// The state needed for the settings page.
#[derive(Debug, Clone)]
pub struct SettingsState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SettingsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct DisplayNameForm {
    pub display_name: String,
}

#[derive(Default)]
struct ChangePasswordErrors<'a> {
    current_password: Option<&'a str>,
    new_password: Option<&'a str>,
    confirm_password: Option<&'a str>,
}

/// Display the settings page.
pub async fn get_settings_page(
    State(state): State<SettingsState>,
    session: Session,
) -> Result<Response, Error> {
    let user_id = session.require_user()?;
    let user = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        get_user_by_id(user_id, &connection)
            .inspect_err(|error| tracing::error!("Could not get user {user_id}: {error}"))?
    };

    let nav_bar = NavBar::new(endpoints::SETTINGS_VIEW).into_html();
    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full space-y-6 lg:max-w-xl"
            {
                h1 class="text-xl font-bold" { "Settings" }

                section class=(CARD_STYLE)
                {
                    h2 class="text-lg font-semibold mb-2" { "Account" }
                    p class="text-sm text-gray-500 dark:text-gray-400" { "Name" }
                    p data-account-name { (user.name_or_default()) }
                    p class="text-sm text-gray-500 dark:text-gray-400 mt-2" { "Email" }
                    p data-account-email { (user.email) }
                }

                section class=(CARD_STYLE)
                {
                    h2 class="text-lg font-semibold mb-4" { "Display Name" }
                    (display_name_form(&user.display_name, None))
                }

                section class=(CARD_STYLE)
                {
                    h2 class="text-lg font-semibold mb-4" { "Change Password" }
                    (change_password_form(ChangePasswordErrors::default()))
                }
            }
        }
    );

    Ok(base("Settings", &[], &content).into_response())
}

/// Replace the logged in user's password.
///
/// The current password must match, and the new password must be strong
/// enough and typed the same twice.
pub async fn change_password_endpoint(
    State(state): State<SettingsState>,
    session: Session,
    Form(form): Form<ChangePasswordForm>,
) -> Response {
    let user_id = match session.require_user() {
        Ok(user_id) => user_id,
        Err(error) => return error.into_alert_response(),
    };

    let Ok(connection) = state.db_connection.lock() else {
        return Error::DatabaseLockError.into_alert_response();
    };

    let user = match get_user_by_id(user_id, &connection) {
        Ok(user) => user,
        Err(error) => {
            tracing::error!("Could not get user {user_id}: {error}");
            return error.into_alert_response();
        }
    };

    match user.password_hash.verify(&form.current_password) {
        Ok(true) => {}
        Ok(false) => {
            return change_password_form(ChangePasswordErrors {
                current_password: Some("Incorrect password"),
                ..Default::default()
            })
            .into_response();
        }
        Err(error) => {
            tracing::error!("Could not verify password for user {user_id}: {error}");
            return error.into_alert_response();
        }
    }

    let validated_password =
        match ValidatedPassword::new(&form.new_password, &[user.email.as_str()]) {
            Ok(password) => password,
            Err(error) => {
                let message = error.to_string();
                return change_password_form(ChangePasswordErrors {
                    new_password: Some(&message),
                    ..Default::default()
                })
                .into_response();
            }
        };

    if form.new_password != form.confirm_password {
        return change_password_form(ChangePasswordErrors {
            confirm_password: Some("Passwords do not match"),
            ..Default::default()
        })
        .into_response();
    }

    let result = PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST)
        .and_then(|password_hash| update_password(user_id, &password_hash, &connection));

    match result {
        Ok(()) => {
            tracing::info!("User {user_id} changed their password");

            let alert = Alert::Success {
                message: "Password changed".to_owned(),
                details: "Use your new password the next time you log in.".to_owned(),
            };

            html! {
                (change_password_form(ChangePasswordErrors::default()))

                div id="alert-container" hx-swap-oob="innerHTML"
                {
                    (alert.into_html())
                }
            }
            .into_response()
        }
        Err(error) => {
            tracing::error!("Could not update password for user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}

/// Set the logged in user's display name. A blank name resets it to the default.
pub async fn change_display_name_endpoint(
    State(state): State<SettingsState>,
    session: Session,
    Form(form): Form<DisplayNameForm>,
) -> Response {
    let user_id = match session.require_user() {
        Ok(user_id) => user_id,
        Err(error) => return error.into_alert_response(),
    };

    let display_name = form.display_name.trim();
    if display_name.chars().count() > DISPLAY_NAME_MAX_LENGTH {
        let message = format!("Names can be at most {DISPLAY_NAME_MAX_LENGTH} characters long");
        return display_name_form(display_name, Some(&message)).into_response();
    }

    let Ok(connection) = state.db_connection.lock() else {
        return Error::DatabaseLockError.into_alert_response();
    };

    match update_display_name(user_id, display_name, &connection) {
        Ok(()) => {
            tracing::info!("User {user_id} changed their display name");

            let alert = Alert::SuccessSimple {
                message: "Display name saved".to_owned(),
            };

            html! {
                (display_name_form(display_name, None))

                div id="alert-container" hx-swap-oob="innerHTML"
                {
                    (alert.into_html())
                }
            }
            .into_response()
        }
        Err(error) => {
            tracing::error!("Could not update display name for user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn display_name_form(display_name: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::CHANGE_DISPLAY_NAME)
            hx-swap="outerHTML"
            hx-indicator="#display-name-indicator"
            hx-disabled-elt="#display-name-button"
            class="space-y-4"
        {
            div
            {
                label for="display_name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    type="text"
                    name="display_name"
                    id="display_name"
                    placeholder="User"
                    maxlength=(DISPLAY_NAME_MAX_LENGTH)
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(display_name);

                @if let Some(error_message) = error_message
                {
                    p class="text-red-500 text-base" { (error_message) }
                }
            }

            button type="submit" id="display-name-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="display-name-indicator" { (loading_spinner()) }
                " Save Name"
            }
        }
    }
}

fn change_password_form(errors: ChangePasswordErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::CHANGE_PASSWORD)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4"
        {
            (password_input(
                "current_password",
                "Current Password",
                1,
                errors.current_password,
            ))
            (password_input(
                "new_password",
                "New Password",
                PASSWORD_INPUT_MIN_LENGTH,
                errors.new_password,
            ))
            (password_input(
                "confirm_password",
                "Confirm New Password",
                PASSWORD_INPUT_MIN_LENGTH,
                errors.confirm_password,
            ))

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator" { (loading_spinner()) }
                " Change Password"
            }
        }
    }
}
