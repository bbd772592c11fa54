//! The form shared by the create and edit category pages.

use std::sync::Arc;

use axum::extract::FromRef;
use maud::{Markup, html};

use crate::{
    AppState,
    category::{
        CategoryStore,
        domain::{CategoryColor, CategoryFormData, CategoryKind, CategoryName, NewCategory},
    },
    html::{
        BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner,
    },
};

/// The state needed by the category pages and endpoints.
#[derive(Clone)]
pub struct CategoryState {
    pub category_store: Arc<dyn CategoryStore>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            category_store: state.category_store.clone(),
        }
    }
}

/// What to show in the form's fields.
pub(super) struct CategoryFormValues<'a> {
    pub name: &'a str,
    pub kind: CategoryKind,
    pub color: CategoryColor,
}

impl Default for CategoryFormValues<'_> {
    fn default() -> Self {
        Self {
            name: "",
            kind: CategoryKind::default(),
            color: CategoryColor::default(),
        }
    }
}

/// Check the submitted form.
///
/// The kind falls back to the default if it is missing or unknown, but an
/// empty name or an unknown colour is an error to show in the form.
pub(super) fn parse_category_form(form: &CategoryFormData) -> Result<NewCategory, String> {
    let name = CategoryName::new(&form.name).map_err(|error| format!("Error: {error}"))?;

    let color = if form.color.trim().is_empty() {
        CategoryColor::default()
    } else {
        form.color
            .parse()
            .map_err(|error| format!("Error: {error}"))?
    };

    Ok(NewCategory {
        name,
        kind: form.kind.parse().unwrap_or_default(),
        color,
    })
}

pub(super) fn category_form_view(
    hx_attribute: &str,
    endpoint: &str,
    submit_label: &str,
    values: &CategoryFormValues<'_>,
    error_message: &str,
) -> Markup {
    let spinner = loading_spinner();

    html! {
        form
            hx-put=[(hx_attribute == "hx-put").then_some(endpoint)]
            hx-post=[(hx_attribute == "hx-post").then_some(endpoint)]
            hx-swap="outerHTML"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label
                    for="name"
                    class=(FORM_LABEL_STYLE)
                {
                    "Category Name"
                }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="e.g. Groceries"
                    value=(values.name)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            fieldset class="space-y-2"
            {
                legend class=(FORM_LABEL_STYLE) { "Type" }

                div class=(FORM_RADIO_GROUP_STYLE)
                {
                    @for kind in [CategoryKind::Expense, CategoryKind::Income] {
                        @let id = format!("category-kind-{}", kind.as_str().to_lowercase());

                        div class="flex items-center gap-3"
                        {
                            input
                                name="kind"
                                id=(id)
                                type="radio"
                                value=(kind.as_str())
                                checked[values.kind == kind]
                                required
                                class=(FORM_RADIO_INPUT_STYLE);

                            label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (kind.as_str()) }
                        }
                    }
                }
            }

            div
            {
                label
                    for="color"
                    class=(FORM_LABEL_STYLE)
                {
                    "Color"
                }

                select
                    name="color"
                    id="color"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for color in CategoryColor::ALL {
                        option value=(color.key()) selected[values.color == color]
                        {
                            (color.key())
                        }
                    }
                }
            }

            @if !error_message.is_empty() {
                p class=(FORM_ERROR_STYLE)
                {
                    (error_message)
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="inline htmx-indicator" { (spinner) }
                " " (submit_label)
            }
        }
    }
}
