//! The analytics page: charts and tables breaking down a user's transactions
//! by month and by category.

mod charts;
mod handlers;
mod tables;

pub use handlers::get_analytics_page;
