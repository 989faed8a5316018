//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    middleware,
    response::Redirect,
    routing::get,
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::auth_guard,
    dashboard::{get_dashboard_page, post_create_expense},
    endpoints,
    log_in::{get_log_in_page, post_log_in},
    log_out::get_log_out,
    not_found::get_404_not_found,
    register::{get_register_page, post_register},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(
            endpoints::LOG_IN_VIEW,
            get(get_log_in_page).post(post_log_in),
        )
        .route(
            endpoints::REGISTER_VIEW,
            get(get_register_page).post(post_register),
        );

    let protected_routes = Router::new()
        .route(
            endpoints::DASHBOARD_VIEW,
            get(get_dashboard_page).post(post_create_expense),
        )
        .route(endpoints::LOG_OUT, get(get_log_out))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the log-in page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::LOG_IN_VIEW)
}

#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, auth::COOKIE_TOKEN, endpoints};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        let state = AppState::new(connection, "42").expect("Could not create app state");
        let app = build_router(state);

        TestServer::new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn index_redirects_to_log_in() {
        let server = get_test_server();

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::LOG_IN_VIEW);
    }

    #[tokio::test]
    async fn unknown_route_returns_not_found_page() {
        let server = get_test_server();

        let response = server.get("/no/such/page").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn anonymous_dashboard_request_redirects_to_log_in() {
        let server = get_test_server();

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_see_other();
        let expected_query =
            serde_urlencoded::to_string([("redirect_url", endpoints::DASHBOARD_VIEW)]).unwrap();
        assert_eq!(
            response.header("location"),
            format!("{}?{}", endpoints::LOG_IN_VIEW, expected_query)
        );
    }

    #[tokio::test]
    async fn anonymous_log_out_request_redirects_to_log_in() {
        let server = get_test_server();

        let response = server.get(endpoints::LOG_OUT).await;

        response.assert_status_see_other();
        let expected_query =
            serde_urlencoded::to_string([("redirect_url", endpoints::LOG_OUT)]).unwrap();
        assert_eq!(
            response.header("location"),
            format!("{}?{}", endpoints::LOG_IN_VIEW, expected_query)
        );
    }

    #[tokio::test]
    async fn anonymous_expense_post_persists_nothing() {
        let server = get_test_server();

        let response = server
            .post(endpoints::DASHBOARD_VIEW)
            .form(&[
                ("title", "Lunch"),
                ("amount", "12.30"),
                ("category", "Food"),
                ("date", "2025-10-05"),
                ("notes", ""),
            ])
            .await;

        response.assert_status_see_other();
        assert!(
            response
                .header("location")
                .to_str()
                .unwrap()
                .starts_with(endpoints::LOG_IN_VIEW),
            "want redirect to the log-in page"
        );
    }

    /// Walks the whole flow: register, log in, add an expense, and see it on
    /// the dashboard.
    #[tokio::test]
    async fn register_log_in_and_add_expense() {
        let server = get_test_server();

        let response = server
            .post(endpoints::REGISTER_VIEW)
            .form(&[
                ("username", "alice"),
                ("email", "alice@example.com"),
                ("password", "hunter22"),
                ("confirm_password", "hunter22"),
            ])
            .await;
        response.assert_status_see_other();
        assert_eq!(
            response.header("location"),
            format!("{}?registered=true", endpoints::LOG_IN_VIEW)
        );

        let response = server
            .post(endpoints::LOG_IN_VIEW)
            .form(&[("email", "alice@example.com"), ("password", "hunter22")])
            .await;
        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::DASHBOARD_VIEW);
        let token_cookie = response.cookie(COOKIE_TOKEN);

        let response = server
            .post(endpoints::DASHBOARD_VIEW)
            .add_cookie(token_cookie.clone())
            .form(&[
                ("title", "Lunch"),
                ("amount", "12.30"),
                ("category", "Food"),
                ("date", "2025-10-05"),
                ("notes", "sandwich"),
            ])
            .await;
        response.assert_status_see_other();
        assert_eq!(
            response.header("location"),
            format!("{}?added=true", endpoints::DASHBOARD_VIEW)
        );

        let response = server
            .get(endpoints::DASHBOARD_VIEW)
            .add_cookie(token_cookie)
            .await;
        response.assert_status_ok();
        let text = response.text();
        assert!(text.contains("Hello, alice!"));
        assert!(text.contains("Lunch"));
        assert!(text.contains("$12.30"));
    }
}
