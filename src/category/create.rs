//! Category creation page and endpoint.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    Session, endpoints,
    category::{
        domain::CategoryFormData,
        form::{CategoryFormValues, CategoryState, category_form_view, parse_category_form},
    },
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// Render the category creation page.
pub async fn get_new_category_page() -> Response {
    new_category_view().into_response()
}

/// Handle category creation form submission.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    session: Session,
    Form(form): Form<CategoryFormData>,
) -> Response {
    let new_category = match parse_category_form(&form) {
        Ok(new_category) => new_category,
        Err(error_message) => {
            let values = CategoryFormValues {
                name: &form.name,
                kind: form.kind.parse().unwrap_or_default(),
                color: form.color.parse().unwrap_or_default(),
            };

            return new_category_form_view(&values, &error_message).into_response();
        }
    };

    match state.category_store.add(&session, new_category) {
        Ok(category) => {
            tracing::debug!("Created category {}", category.id);

            (
                HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a category: {error}");

            error.into_alert_response()
        }
    }
}

fn new_category_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();
    let form = new_category_form_view(&CategoryFormValues::default(), "");

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "Add New Category" }
            (form)
        }
    };

    base("Create Category", &[], &content)
}

fn new_category_form_view(values: &CategoryFormValues<'_>, error_message: &str) -> Markup {
    category_form_view(
        "hx-post",
        endpoints::CATEGORIES_API,
        "Create Category",
        values,
        error_message,
    )
}

#[cfg(test)]
mod new_category_page_tests {
    use axum::http::StatusCode;

    use crate::{
        category::get_new_category_page,
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_document,
        },
    };

    #[tokio::test]
    async fn render_page() {
        let response = get_new_category_page().await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("content-type")
                .expect("content-type header missing"),
            "text/html; charset=utf-8"
        );

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::CATEGORIES_API, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_input(&form, "kind", "radio");
        assert_form_submit_button(&form);
    }
}

#[cfg(test)]
mod create_category_endpoint_tests {
    use axum::{
        Form,
        extract::State,
        http::{StatusCode, header::CONTENT_TYPE},
        response::IntoResponse,
    };

    use crate::{
        Session, UserID,
        category::{
            CategoryColor, CategoryKind, create_category_endpoint, domain::CategoryFormData,
            form::CategoryState,
        },
        endpoints,
        test_utils::{
            assert_form_error_message, assert_hx_redirect, assert_valid_html, get_header,
            must_get_form, parse_html_fragment, test_category_state,
        },
    };

    #[tokio::test]
    async fn can_create_category() {
        let state = test_category_state();
        let session = Session::authenticated(UserID::new(1));
        let form = CategoryFormData {
            name: "Salary".to_owned(),
            kind: "Income".to_owned(),
            color: "blue".to_owned(),
        };

        let response = create_category_endpoint(State(state.clone()), session, Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::CATEGORIES_VIEW);
        let categories = state.category_store.list(&session).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name.as_ref(), "Salary");
        assert_eq!(categories[0].kind, CategoryKind::Income);
        assert_eq!(categories[0].color, CategoryColor::Blue);
    }

    #[tokio::test]
    async fn create_category_fails_on_empty_name() {
        let state: CategoryState = test_category_state();
        let session = Session::authenticated(UserID::new(1));
        let form = CategoryFormData {
            name: "".to_owned(),
            kind: "Expense".to_owned(),
            color: "green".to_owned(),
        };

        let response = create_category_endpoint(State(state.clone()), session, Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            get_header(&response, CONTENT_TYPE.as_str()),
            "text/html; charset=utf-8"
        );
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: Category name cannot be empty");
        assert!(state.category_store.list(&session).unwrap().is_empty());
    }

    #[tokio::test]
    async fn anonymous_session_gets_alert() {
        let state = test_category_state();
        let form = CategoryFormData {
            name: "Food".to_owned(),
            kind: "Expense".to_owned(),
            color: "green".to_owned(),
        };

        let response = create_category_endpoint(State(state), Session::anonymous(), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
