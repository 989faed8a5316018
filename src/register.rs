//! The registration page and handling of registration form submissions.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, PasswordHash, endpoints,
    forms::{FieldError, RegisterFormData, error_for, validate_registration},
    html::{BUTTON_PRIMARY_STYLE, base, link, log_in_register, password_input, render, text_input},
    user::create_user,
};

/// The state needed to register a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn register_form(form_data: &RegisterFormData, errors: &[FieldError]) -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::REGISTER_VIEW)
            class="space-y-4 md:space-y-6"
        {
            (text_input(
                "Username",
                "username",
                "text",
                &form_data.username,
                error_for(errors, "username"),
            ))
            (text_input(
                "Email",
                "email",
                "email",
                &form_data.email,
                error_for(errors, "email"),
            ))
            (password_input("Password", "password", error_for(errors, "password")))
            (password_input(
                "Confirm password",
                "confirm_password",
                error_for(errors, "confirm_password"),
            ))

            button type="submit" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                "Register"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                (link(endpoints::LOG_IN_VIEW, "Log in here"))
            }
        }
    }
}

fn register_page(form_data: &RegisterFormData, errors: &[FieldError]) -> Markup {
    let form = register_form(form_data, errors);
    let content = log_in_register("Create an account", &form);

    base("Register", &[], &content)
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    render(
        StatusCode::OK,
        register_page(&RegisterFormData::default(), &[]),
    )
}

/// Handler for registration form submissions.
///
/// On success the new user is stored and the client is redirected to the
/// log-in page with an "account created" notice. Otherwise the form is
/// re-rendered with an error message next to each offending field and
/// nothing is persisted. Passwords are never echoed back into the form.
pub async fn post_register(
    State(state): State<RegistrationState>,
    Form(form_data): Form<RegisterFormData>,
) -> Response {
    let registration = match validate_registration(&form_data) {
        Ok(registration) => registration,
        Err(errors) => {
            return render(
                StatusCode::UNPROCESSABLE_ENTITY,
                register_page(&form_data, &errors),
            );
        }
    };

    // Hash before taking the database lock, bcrypt is deliberately slow.
    let password_hash =
        match PasswordHash::from_raw_password(&registration.password, PasswordHash::DEFAULT_COST) {
            Ok(password_hash) => password_hash,
            Err(error) => return error.into_response(),
        };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(_) => return Error::DatabaseLockError.into_response(),
    };

    match create_user(
        &registration.username,
        registration.email,
        password_hash,
        &connection,
    ) {
        Ok(user) => {
            tracing::info!("Registered user {}", user.id);

            Redirect::to(&format!("{}?registered=true", endpoints::LOG_IN_VIEW)).into_response()
        }
        Err(Error::DuplicateEmail) => render(
            StatusCode::UNPROCESSABLE_ENTITY,
            register_page(
                &form_data,
                &[FieldError {
                    field: "email",
                    message: "This email address is already registered",
                }],
            ),
        ),
        Err(Error::DuplicateUsername) => render(
            StatusCode::UNPROCESSABLE_ENTITY,
            register_page(
                &form_data,
                &[FieldError {
                    field: "username",
                    message: "This username is already taken",
                }],
            ),
        ),
        Err(error) => error.into_response(),
    }
}


#[cfg(test)]
mod register_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode, response::Response};
    use rusqlite::Connection;

    use crate::{
        endpoints,
        expense::test_utils::get_test_connection,
        forms::RegisterFormData,
        test_utils::{
            assert_field_error_message, assert_form_input_with_value, assert_redirect,
            assert_valid_html, must_get_form, parse_html_document,
        },
        user::get_user_by_email,
    };

    use super::{RegistrationState, post_register};

    fn get_test_state() -> RegistrationState {
        RegistrationState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        }
    }

    fn valid_form() -> RegisterFormData {
        RegisterFormData {
            username: "alice".to_owned(),
            email: "alice@example.com".to_owned(),
            password: "hunter22".to_owned(),
            confirm_password: "hunter22".to_owned(),
        }
    }

    async fn new_register_request(state: RegistrationState, form: RegisterFormData) -> Response {
        post_register(State(state), Form(form)).await
    }

    fn count_users(connection: &Connection) -> i64 {
        connection
            .query_row("SELECT COUNT(id) FROM user", [], |row| row.get(0))
            .unwrap()
    }

    #[tokio::test]
    async fn register_succeeds_and_redirects_to_log_in() {
        let state = get_test_state();
        let db_connection = state.db_connection.clone();

        let response = new_register_request(state, valid_form()).await;

        assert_redirect(
            &response,
            &format!("{}?registered=true", endpoints::LOG_IN_VIEW),
        );

        let connection = db_connection.lock().unwrap();
        let user = get_user_by_email("alice@example.com", &connection).unwrap();
        assert_eq!(user.username, "alice");
        assert!(user.password_hash.verify("hunter22").unwrap());
    }

    #[tokio::test]
    async fn register_fails_with_invalid_form_and_persists_nothing() {
        let state = get_test_state();
        let db_connection = state.db_connection.clone();
        let form = RegisterFormData {
            password: "short".to_owned(),
            confirm_password: "short".to_owned(),
            ..valid_form()
        };

        let response = new_register_request(state, form).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let form = must_get_form(&document);
        assert_field_error_message(&form, "password", "Password must be at least 6 characters");

        assert_eq!(count_users(&db_connection.lock().unwrap()), 0);
    }

    #[tokio::test]
    async fn register_preserves_entered_values_but_not_passwords() {
        let state = get_test_state();
        let form = RegisterFormData {
            confirm_password: "different".to_owned(),
            ..valid_form()
        };

        let response = new_register_request(state, form).await;

        let document = parse_html_document(response).await;
        let form = must_get_form(&document);
        assert_form_input_with_value(&form, "username", "text", "alice");
        assert_form_input_with_value(&form, "email", "email", "alice@example.com");
        assert_form_input_with_value(&form, "password", "password", "");
        assert_form_input_with_value(&form, "confirm_password", "password", "");
    }

    #[tokio::test]
    async fn register_fails_with_duplicate_email_and_persists_nothing() {
        let state = get_test_state();
        let db_connection = state.db_connection.clone();

        let response = new_register_request(state.clone(), valid_form()).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let duplicate = RegisterFormData {
            username: "bob".to_owned(),
            ..valid_form()
        };
        let response = new_register_request(state, duplicate).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let document = parse_html_document(response).await;
        let form = must_get_form(&document);
        assert_field_error_message(&form, "email", "This email address is already registered");

        assert_eq!(count_users(&db_connection.lock().unwrap()), 1);
    }

    #[tokio::test]
    async fn register_fails_with_duplicate_username() {
        let state = get_test_state();

        new_register_request(state.clone(), valid_form()).await;

        let duplicate = RegisterFormData {
            email: "alice2@example.com".to_owned(),
            ..valid_form()
        };
        let response = new_register_request(state, duplicate).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let document = parse_html_document(response).await;
        let form = must_get_form(&document);
        assert_field_error_message(&form, "username", "This username is already taken");
    }
}
