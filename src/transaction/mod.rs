//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the `TransactionStore` trait with its SQLite and local file backends
//! - The aggregation, filtering and CSV export of a user's transactions
//! - View handlers for transaction-related web pages and endpoints

mod aggregation;
mod core;
mod create_transaction_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod export;
mod export_endpoint;
mod filter;
mod form;
mod live_endpoint;
mod local_store;
mod new_transaction_page;
mod sqlite_store;
mod store;
mod transactions_page;
mod view;

pub use aggregation::{
    Analytics, CategorySummary, INVALID_DATE_LABEL, MonthSummary, Totals, category_breakdown,
    category_list, month_breakdown, totals,
};
pub use core::{
    NewTransaction, Transaction, TransactionId, TransactionKind, TransactionPatch, coerce_amount,
};
pub use create_transaction_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::update_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use export::{export_csv, export_file_name};
pub use export_endpoint::export_transactions_endpoint;
pub use filter::{CategoryFilter, FilterSpec, KindFilter, filter_transactions};
pub use form::TransactionState;
pub use live_endpoint::live_transactions_endpoint;
pub use local_store::LocalTransactionStore;
pub use new_transaction_page::get_new_transaction_page;
pub use sqlite_store::{SQLiteTransactionStore, create_transaction_table};
pub use store::TransactionStore;
pub use transactions_page::get_transactions_page;

pub(crate) use view::{totals_view, transactions_list_view};
