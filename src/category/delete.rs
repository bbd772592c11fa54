//! Category deletion endpoint.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Session,
    alert::Alert,
    category::{domain::CategoryId, form::CategoryState},
};

/// Handle category deletion. Returns success alert or error.
///
/// Transactions in the category keep its name.
pub async fn delete_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<CategoryState>,
    session: Session,
) -> Response {
    match state.category_store.delete(&session, &category_id) {
        // The status code has to be 200 OK or the page will not remove the category.
        Ok(()) => Alert::SuccessSimple {
            message: "Category deleted successfully".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting category {category_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_category_endpoint_tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };

    use crate::{
        Session, UserID,
        category::{
            CategoryColor, CategoryId, CategoryKind, CategoryName, CategoryState, NewCategory,
            delete_category_endpoint,
        },
        test_utils::{
            assert_valid_html, parse_html_fragment, test_category_state, test_transaction_state,
        },
        transaction::{NewTransaction, TransactionKind, category_list},
    };

    #[tokio::test]
    async fn can_delete_category() {
        let state = test_category_state();
        let session = Session::authenticated(UserID::new(1));
        let category = state
            .category_store
            .add(
                &session,
                NewCategory {
                    name: CategoryName::new_unchecked("Food"),
                    kind: CategoryKind::Expense,
                    color: CategoryColor::Green,
                },
            )
            .unwrap();

        let response =
            delete_category_endpoint(Path(category.id), State(state.clone()), session).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        assert!(state.category_store.list(&session).unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_missing_category_succeeds() {
        let state = test_category_state();

        let response = delete_category_endpoint(
            Path(CategoryId::new("missing")),
            State(state),
            Session::authenticated(UserID::new(1)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn deleting_category_keeps_its_transactions() {
        let transaction_state = test_transaction_state();
        let state = CategoryState {
            category_store: transaction_state.category_store.clone(),
        };
        let session = Session::authenticated(UserID::new(1));
        transaction_state
            .transaction_store
            .add(
                &session,
                NewTransaction {
                    kind: TransactionKind::Expense,
                    amount: "12.50".to_owned(),
                    category: "Food".to_owned(),
                    date: Some("2024-03-02".to_owned()),
                    description: None,
                },
            )
            .unwrap();
        let category = state
            .category_store
            .add(
                &session,
                NewCategory {
                    name: CategoryName::new_unchecked("Food"),
                    kind: CategoryKind::Expense,
                    color: CategoryColor::Green,
                },
            )
            .unwrap();

        let response =
            delete_category_endpoint(Path(category.id), State(state.clone()), session).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.category_store.list(&session).unwrap().is_empty());
        let transactions = transaction_state
            .transaction_store
            .list(&session)
            .unwrap();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].category, "Food");
        assert_eq!(category_list(&transactions), vec!["Food"]);
    }
}
