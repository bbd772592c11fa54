//! Category editing page and endpoint.

use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    Error, Session, endpoints,
    category::{
        CategoryPatch,
        domain::{CategoryFormData, CategoryId},
        form::{CategoryFormValues, CategoryState, category_form_view, parse_category_form},
    },
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// Render the category editing page.
pub async fn get_edit_category_page(
    Path(category_id): Path<CategoryId>,
    State(state): State<CategoryState>,
    session: Session,
) -> Result<Response, Error> {
    let category = state
        .category_store
        .get(&session, &category_id)
        .inspect_err(|error| {
            if *error != Error::NotFound {
                tracing::error!("Failed to retrieve category {category_id}: {error}");
            }
        })?;

    let update_endpoint = endpoints::format_endpoint(endpoints::CATEGORY, &category_id);
    let values = CategoryFormValues {
        name: category.name.as_ref(),
        kind: category.kind,
        color: category.color,
    };

    Ok(edit_category_view(&update_endpoint, &values).into_response())
}

/// Handle category update form submission.
pub async fn update_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<CategoryState>,
    session: Session,
    Form(form): Form<CategoryFormData>,
) -> Response {
    let update_endpoint = endpoints::format_endpoint(endpoints::CATEGORY, &category_id);

    let category = match parse_category_form(&form) {
        Ok(category) => category,
        Err(error_message) => {
            let values = CategoryFormValues {
                name: &form.name,
                kind: form.kind.parse().unwrap_or_default(),
                color: form.color.parse().unwrap_or_default(),
            };

            return edit_category_form_view(&update_endpoint, &values, &error_message)
                .into_response();
        }
    };

    let patch = CategoryPatch {
        name: Some(category.name),
        kind: Some(category.kind),
        color: Some(category.color),
    };

    match state.category_store.update(&session, &category_id, patch) {
        Ok(_) => (
            HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingCategory) => Error::UpdateMissingCategory.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating category {category_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn edit_category_view(update_endpoint: &str, values: &CategoryFormValues<'_>) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();
    let form = edit_category_form_view(update_endpoint, values, "");

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "Edit Category" }
            (form)
        }
    };

    base("Edit Category", &[], &content)
}

fn edit_category_form_view(
    update_endpoint: &str,
    values: &CategoryFormValues<'_>,
    error_message: &str,
) -> Markup {
    category_form_view(
        "hx-put",
        update_endpoint,
        "Save Changes",
        values,
        error_message,
    )
}

#[cfg(test)]
mod edit_category_tests {
    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use scraper::Selector;

    use crate::{
        Error, Session, UserID,
        category::{
            CategoryColor, CategoryId, CategoryKind, CategoryName, NewCategory,
            domain::CategoryFormData, get_edit_category_page, update_category_endpoint,
        },
        endpoints,
        test_utils::{
            assert_form_input_with_value, assert_hx_endpoint, assert_hx_redirect,
            assert_valid_html, must_get_form, parse_html_document, parse_html_fragment,
            test_category_state,
        },
    };

    fn session() -> Session {
        Session::authenticated(UserID::new(1))
    }

    fn food() -> NewCategory {
        NewCategory {
            name: CategoryName::new_unchecked("Food"),
            kind: CategoryKind::Expense,
            color: CategoryColor::Red,
        }
    }

    #[tokio::test]
    async fn page_prefills_form() {
        let state = test_category_state();
        let category = state.category_store.add(&session(), food()).unwrap();

        let response = get_edit_category_page(Path(category.id.clone()), State(state), session())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &endpoints::format_endpoint(endpoints::CATEGORY, &category.id),
            "hx-put",
        );
        assert_form_input_with_value(&form, "name", "text", "Food");
        let selected = form
            .select(&Selector::parse("option[selected]").unwrap())
            .next()
            .and_then(|option| option.value().attr("value"));
        assert_eq!(selected, Some("red"));
    }

    #[tokio::test]
    async fn page_for_missing_category_is_not_found() {
        let state = test_category_state();

        let result = get_edit_category_page(
            Path(CategoryId::new("missing")),
            State(state),
            session(),
        )
        .await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }

    #[tokio::test]
    async fn can_update_category() {
        let state = test_category_state();
        let category = state.category_store.add(&session(), food()).unwrap();
        let form = CategoryFormData {
            name: "Groceries".to_owned(),
            kind: "Expense".to_owned(),
            color: "yellow".to_owned(),
        };

        let response = update_category_endpoint(
            Path(category.id.clone()),
            State(state.clone()),
            session(),
            Form(form),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::CATEGORIES_VIEW);
        let updated = state.category_store.get(&session(), &category.id).unwrap();
        assert_eq!(updated.name.as_ref(), "Groceries");
        assert_eq!(updated.color, CategoryColor::Yellow);
    }

    #[tokio::test]
    async fn update_with_empty_name_renders_error() {
        let state = test_category_state();
        let category = state.category_store.add(&session(), food()).unwrap();
        let form = CategoryFormData {
            name: "  ".to_owned(),
            kind: "Expense".to_owned(),
            color: "red".to_owned(),
        };

        let response = update_category_endpoint(
            Path(category.id.clone()),
            State(state.clone()),
            session(),
            Form(form),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Category name cannot be empty"));
        assert_eq!(
            state.category_store.get(&session(), &category.id).unwrap(),
            category
        );
    }

    #[tokio::test]
    async fn update_missing_category_returns_alert() {
        let state = test_category_state();
        let form = CategoryFormData {
            name: "Food".to_owned(),
            kind: "Expense".to_owned(),
            color: "red".to_owned(),
        };

        let response = update_category_endpoint(
            Path(CategoryId::new("missing")),
            State(state),
            session(),
            Form(form),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
