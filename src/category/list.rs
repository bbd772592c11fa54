//! Categories listing page.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error, Session, endpoints,
    category::{Category, CategoryKind, form::CategoryState},
    html::{CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, edit_delete_action_links},
    navigation::NavBar,
};

/// Render the categories page with income and expense categories side by side.
pub async fn get_categories_page(
    State(state): State<CategoryState>,
    session: Session,
) -> Result<Response, Error> {
    let categories = state
        .category_store
        .list(&session)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    Ok(categories_view(&categories).into_response())
}

fn categories_view(categories: &[Category]) -> Markup {
    let new_category_route = endpoints::NEW_CATEGORY_VIEW;
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();
    let (income, expense): (Vec<&Category>, Vec<&Category>) = categories
        .iter()
        .partition(|category| category.kind == CategoryKind::Income);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section
                class="w-full space-y-4 lg:max-w-5xl"
                data-live-url=(endpoints::LIVE_CATEGORIES)
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Categories" }

                    a href=(new_category_route) class=(LINK_STYLE)
                    {
                        "Add Category"
                    }
                }

                div class="grid grid-cols-1 md:grid-cols-2 gap-8"
                {
                    (category_group_view(
                        "Income Categories",
                        "text-green-600 dark:text-green-400",
                        "No income categories yet",
                        &income,
                    ))
                    (category_group_view(
                        "Expense Categories",
                        "text-red-500 dark:text-red-400",
                        "No expense categories yet",
                        &expense,
                    ))
                }
            }
        }
    );

    base("Categories", &[], &content)
}

fn category_group_view(
    title: &str,
    title_style: &str,
    empty_message: &str,
    categories: &[&Category],
) -> Markup {
    html! {
        section class=(CARD_STYLE) data-category-group=(title)
        {
            h2 class={ "text-lg font-semibold mb-4 " (title_style) }
            {
                (title) " (" (categories.len()) ")"
            }

            @if categories.is_empty() {
                p class="text-center py-8 text-gray-500 dark:text-gray-400" { (empty_message) }
            } @else {
                ul class="space-y-3"
                {
                    @for category in categories {
                        (category_item_view(category))
                    }
                }
            }
        }
    }
}

fn category_item_view(category: &Category) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, &category.id);
    let delete_url = endpoints::format_endpoint(endpoints::CATEGORY, &category.id);
    let confirm_message = format!(
        "Are you sure you want to delete '{}'? Transactions in this category will keep its name.",
        category.name
    );

    html! {
        li
            class="flex items-center justify-between p-3 rounded-lg border
                border-gray-200 dark:border-gray-700"
            data-category-row="true"
        {
            div class="flex items-center gap-3"
            {
                span
                    class="w-3 h-3 rounded-full"
                    style={ "background: " (category.color.hex()) }
                    title=(category.color.key())
                {}
                span { (category.name) }
            }

            div class="flex items-center gap-4 text-sm"
            {
                (edit_delete_action_links(
                    &edit_url,
                    &delete_url,
                    &confirm_message,
                    "closest [data-category-row='true']",
                ))
            }
        }
    }
}
