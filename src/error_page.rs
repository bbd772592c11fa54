//! Defines the page to display when a request fails on the server.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

pub struct ErrorPage<'a> {
    pub status: StatusCode,
    pub description: &'a str,
    pub fix: &'a str,
}

impl Default for ErrorPage<'_> {
    fn default() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
        }
    }
}

impl ErrorPage<'_> {
    pub fn into_html(self) -> Html<String> {
        let title = self
            .status
            .canonical_reason()
            .unwrap_or("Internal Server Error");
        let header = self.status.as_str();

        Html(error_view(title, header, self.description, self.fix).into_string())
    }
}

impl IntoResponse for ErrorPage<'_> {
    fn into_response(self) -> Response {
        (self.status, self.into_html()).into_response()
    }
}

#[cfg(test)]
mod error_page_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::test_utils::{assert_valid_html, parse_html_document};

    use super::ErrorPage;

    #[tokio::test]
    async fn renders_status_code_as_header() {
        let response = ErrorPage {
            status: StatusCode::BAD_REQUEST,
            description: "Nothing to export",
            fix: "Change the filters",
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let h1 = scraper::Selector::parse("h1").unwrap();
        let header = html.select(&h1).next().expect("No header found");
        assert_eq!(header.text().collect::<String>().trim(), "400");
    }
}
