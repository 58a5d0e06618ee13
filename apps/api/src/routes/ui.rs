use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// GET /
/// Serves the single-page analyzer. The page posts to `/api/v1/evaluate`.
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_posts_the_expected_fields() {
        assert!(INDEX_HTML.contains("/api/v1/evaluate"));
        assert!(INDEX_HTML.contains("name=\"job_description\""));
        assert!(INDEX_HTML.contains("name=\"resume\""));
        assert!(INDEX_HTML.contains("accept=\"application/pdf,.pdf\""));
    }
}
