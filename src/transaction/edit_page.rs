//! The page for editing an existing transaction.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error, Session, endpoints,
    html::{FORM_CONTAINER_STYLE, base, dollar_input_styles},
    navigation::NavBar,
    transaction::{
        core::TransactionId,
        form::{TransactionFormValues, TransactionState, category_suggestions, transaction_form_view},
    },
};

/// Render the edit page with the form filled in from the stored transaction.
pub async fn get_edit_transaction_page(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<TransactionState>,
    session: Session,
) -> Result<Response, Error> {
    let transactions = state
        .transaction_store
        .list(&session)
        .inspect_err(|error| tracing::error!("Could not list transactions: {error}"))?;
    let transaction = transactions
        .iter()
        .find(|transaction| transaction.id == transaction_id)
        .ok_or(Error::NotFound)?;
    let category_names = category_suggestions(&state, &session, &transactions)?;

    let amount = transaction.amount.to_string();
    let values = TransactionFormValues {
        kind: transaction.kind,
        amount: &amount,
        category: &transaction.category,
        date: &transaction.date,
        description: &transaction.description,
    };
    let update_endpoint = endpoints::format_endpoint(endpoints::TRANSACTION, &transaction_id);
    let form = edit_transaction_form_view(&update_endpoint, &values, &category_names, "");

    Ok(edit_transaction_view(&form).into_response())
}

pub(super) fn edit_transaction_form_view(
    update_endpoint: &str,
    values: &TransactionFormValues<'_>,
    category_names: &[String],
    error_message: &str,
) -> Markup {
    transaction_form_view(
        "hx-put",
        update_endpoint,
        "Save Changes",
        values,
        category_names,
        error_message,
    )
}

fn edit_transaction_view(form: &Markup) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "Edit Transaction" }
            (form)
        }
    };

    base("Edit Transaction", &[dollar_input_styles()], &content)
}

#[cfg(test)]
mod edit_transaction_page_tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use scraper::Selector;

    use crate::{
        Error, Session, UserID, endpoints,
        test_utils::{
            assert_form_input_with_value, assert_hx_endpoint, assert_valid_html, must_get_form,
            parse_html_document, test_transaction_state,
        },
        transaction::{
            core::{NewTransaction, TransactionId, TransactionKind},
            get_edit_transaction_page,
        },
    };

    #[tokio::test]
    async fn page_prefills_form() {
        let state = test_transaction_state();
        let session = Session::authenticated(UserID::new(1));
        let transaction = state
            .transaction_store
            .add(
                &session,
                NewTransaction {
                    kind: TransactionKind::Income,
                    amount: "1000".to_owned(),
                    category: "Salary".to_owned(),
                    date: Some("2024-01-01".to_owned()),
                    description: Some("January pay".to_owned()),
                },
            )
            .unwrap();

        let response =
            get_edit_transaction_page(Path(transaction.id.clone()), State(state), session)
                .await
                .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &endpoints::format_endpoint(endpoints::TRANSACTION, &transaction.id),
            "hx-put",
        );
        assert_form_input_with_value(&form, "amount", "number", "1000");
        assert_form_input_with_value(&form, "category", "text", "Salary");
        assert_form_input_with_value(&form, "date", "date", "2024-01-01");
        let checked = form
            .select(&Selector::parse("input[name=kind][checked]").unwrap())
            .next()
            .and_then(|input| input.value().attr("value"));
        assert_eq!(checked, Some("income"));
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let result = get_edit_transaction_page(
            Path(TransactionId::new("missing")),
            State(test_transaction_state()),
            Session::authenticated(UserID::new(1)),
        )
        .await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }
}
