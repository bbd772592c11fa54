//! Categories group transactions into named, coloured buckets per user.
//!
//! This module contains the category domain types, the SQLite-backed store
//! and the pages and endpoints for listing, creating, editing and deleting categories,
//! plus a live feed of the registry.

mod create;
mod delete;
mod domain;
mod edit;
mod form;
mod list;
mod live;
mod store;

pub use create::{create_category_endpoint, get_new_category_page};
pub use delete::delete_category_endpoint;
pub use domain::{
    Category, CategoryColor, CategoryId, CategoryKind, CategoryName, CategoryPatch, NewCategory,
};
pub use edit::{get_edit_category_page, update_category_endpoint};
pub use form::CategoryState;
pub use list::get_categories_page;
pub use live::live_categories_endpoint;
pub use store::{CategoryStore, SQLiteCategoryStore, create_category_table};
