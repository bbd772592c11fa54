//! Dashboard module
//!
//! Provides the landing page for logged in users: the running totals and the
//! most recent transactions.

mod handlers;

pub use handlers::get_dashboard_page;
