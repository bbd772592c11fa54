//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    analytics::get_analytics_page,
    auth::{
        auth_guard, auth_guard_hx, get_log_in_page, get_log_out, get_register_page, post_log_in,
        register_user,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_page,
        get_edit_category_page, get_new_category_page, live_categories_endpoint,
        update_category_endpoint,
    },
    dashboard::get_dashboard_page,
    endpoints,
    settings::{change_display_name_endpoint, change_password_endpoint, get_settings_page},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, export_transactions_endpoint,
        get_edit_transaction_page, get_new_transaction_page, get_transactions_page,
        live_transactions_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user));

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_dashboard_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(endpoints::NEW_TRANSACTION_VIEW, get(get_new_transaction_page))
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(
            endpoints::EXPORT_TRANSACTIONS,
            get(export_transactions_endpoint),
        )
        .route(endpoints::LIVE_TRANSACTIONS, get(live_transactions_endpoint))
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(endpoints::LIVE_CATEGORIES, get(live_categories_endpoint))
        .route(endpoints::NEW_CATEGORY_VIEW, get(get_new_category_page))
        .route(endpoints::EDIT_CATEGORY_VIEW, get(get_edit_category_page))
        .route(endpoints::ANALYTICS_VIEW, get(get_analytics_page))
        .route(endpoints::SETTINGS_VIEW, get(get_settings_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST/PUT/DELETE routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(
                endpoints::TRANSACTIONS_API,
                post(create_transaction_endpoint),
            )
            .route(
                endpoints::TRANSACTION,
                put(update_transaction_endpoint).delete(delete_transaction_endpoint),
            )
            .route(endpoints::CATEGORIES_API, post(create_category_endpoint))
            .route(
                endpoints::CATEGORY,
                put(update_category_endpoint).delete(delete_category_endpoint),
            )
            .route(endpoints::CHANGE_PASSWORD, post(change_password_endpoint))
            .route(
                endpoints::CHANGE_DISPLAY_NAME,
                post(change_display_name_endpoint),
            )
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_fallback_redirect)
        .with_state(state)
}

/// Unknown routes send the client back to the dashboard.
async fn get_fallback_redirect() -> Redirect {
    Redirect::to(endpoints::ROOT)
}

#[cfg(test)]
mod routing_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;

    use crate::{build_router, endpoints, test_utils::test_app_state};

    fn server() -> TestServer {
        let app = build_router(test_app_state());

        TestServer::new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn unknown_route_redirects_to_root() {
        let response = server().get("/no/such/page").await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), endpoints::ROOT);
    }

    #[tokio::test]
    async fn protected_page_redirects_to_log_in() {
        let response = server().get(endpoints::TRANSACTIONS_VIEW).await;

        response.assert_status(StatusCode::SEE_OTHER);
        let location = response.header("location");
        let location = location.to_str().unwrap();
        assert!(
            location.starts_with(endpoints::LOG_IN_VIEW),
            "got {location}"
        );
    }

    #[tokio::test]
    async fn protected_api_route_sends_hx_redirect() {
        let response = server()
            .post(endpoints::TRANSACTIONS_API)
            .form(&[("amount", "1"), ("category", "Food")])
            .await;

        let hx_redirect = response.header("hx-redirect");
        assert!(
            hx_redirect.to_str().unwrap().starts_with(endpoints::LOG_IN_VIEW),
            "got {hx_redirect:?}"
        );
    }

    #[tokio::test]
    async fn log_in_page_is_public() {
        let response = server().get(endpoints::LOG_IN_VIEW).await;

        response.assert_status_ok();
    }
}
