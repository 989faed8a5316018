//! The log-in page and handling of log-in form submissions.
//! The auth module handles the lower level authentication and cookie logic.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{invalidate_auth_cookie, normalize_redirect_url, set_auth_cookie},
    endpoints,
    forms::{FieldError, LogInFormData, error_for, validate_log_in},
    html::{
        BUTTON_PRIMARY_STYLE, base, link, log_in_register, notice_banner, password_input, render,
        text_input,
    },
    user::get_user_by_email,
};

/// The error message shown when the email/password combination does not match
/// a stored user.
///
/// The same message covers an unknown email and a wrong password so that the
/// log-in page cannot be used to find out which email addresses are registered.
pub const INVALID_CREDENTIALS_MSG: &str = "Invalid credentials. Try again.";

/// The state needed to perform a log-in.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

fn log_in_form(form_data: &LogInFormData, errors: &[FieldError]) -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::LOG_IN_VIEW)
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = &form_data.redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (text_input(
                "Email",
                "email",
                "email",
                &form_data.email,
                error_for(errors, "email"),
            ))
            (password_input("Password", "password", error_for(errors, "password")))

            button type="submit" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                "Log in"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Don't have an account? "
                (link(endpoints::REGISTER_VIEW, "Register here"))
            }
        }
    }
}

fn log_in_page(form_data: &LogInFormData, errors: &[FieldError], notice: Option<&str>) -> Markup {
    let form = log_in_form(form_data, errors);
    let content = html! {
        div class="flex flex-col items-center"
        {
            @if let Some(notice) = notice {
                (notice_banner(notice))
            }

            (log_in_register("Log in to your account", &form))
        }
    };

    base("Log In", &[], &content)
}

/// The query parameters accepted by the log-in page.
#[derive(Deserialize, Default)]
pub struct LogInQuery {
    /// Set after a successful registration to show an "account created" notice.
    pub registered: Option<String>,
    /// Set after logging out to show a "logged out" notice.
    pub logged_out: Option<String>,
    /// The URL to send the user to after a successful log-in.
    pub redirect_url: Option<String>,
}

fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    match raw_url.and_then(normalize_redirect_url) {
        Some(redirect_url) => Some(redirect_url),
        None => {
            if let Some(redirect_url) = raw_url {
                tracing::warn!("Invalid redirect URL from {source}: {redirect_url}");
            }
            None
        }
    }
}

/// Display the log-in page.
///
/// One-off notices are driven by query parameters so that the preceding
/// redirect can carry them without server-side session state.
pub async fn get_log_in_page(Query(query): Query<LogInQuery>) -> Response {
    let notice = if query.registered.is_some() {
        Some("Account created! Please log in.")
    } else if query.logged_out.is_some() {
        Some("You have been logged out.")
    } else {
        None
    };

    let form_data = LogInFormData {
        redirect_url: parse_redirect_url(query.redirect_url.as_deref(), "log-in query"),
        ..LogInFormData::default()
    };

    render(StatusCode::OK, log_in_page(&form_data, &[], notice))
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the auth cookie is set and the client is
/// redirected to the dashboard page, or to the validated `redirect_url` the
/// form carried. Otherwise, the form is returned with an error message
/// explaining the problem.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    Form(form_data): Form<LogInFormData>,
) -> Response {
    if let Err(errors) = validate_log_in(&form_data) {
        return render(
            StatusCode::UNPROCESSABLE_ENTITY,
            log_in_page(&form_data, &errors, None),
        );
    }

    let invalid_credentials_response = || {
        render(
            StatusCode::UNAUTHORIZED,
            log_in_page(
                &form_data,
                &[FieldError {
                    field: "password",
                    message: INVALID_CREDENTIALS_MSG,
                }],
                None,
            ),
        )
    };

    let user = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(_) => return Error::DatabaseLockError.into_response(),
        };

        match get_user_by_email(&form_data.email, &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => return invalid_credentials_response(),
            Err(error) => {
                tracing::error!("Unhandled error while looking up user: {error}");
                return error.into_response();
            }
        }
    };

    let is_password_valid = match user.password_hash.verify(&form_data.password) {
        Ok(is_password_valid) => is_password_valid,
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return Error::HashingError(error.to_string()).into_response();
        }
    };

    if !is_password_valid {
        return invalid_credentials_response();
    }

    let redirect_url = parse_redirect_url(form_data.redirect_url.as_deref(), "log-in form")
        .unwrap_or_else(|| endpoints::DASHBOARD_VIEW.to_owned());

    match set_auth_cookie(jar.clone(), user.id, state.cookie_duration) {
        Ok(updated_jar) => (updated_jar, Redirect::to(&redirect_url)).into_response(),
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            (invalidate_auth_cookie(jar), error).into_response()
        }
    }
}
