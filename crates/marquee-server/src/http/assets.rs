use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::IntoResponse;

pub(crate) const INDEX_HTML: &str = include_str!("../../public/index.html");
pub(crate) const STYLES_CSS: &str = include_str!("../../public/css/styles.css");
pub(crate) const MAIN_JS: &str = include_str!("../../public/js/main.js");

fn asset(content_type: &'static str, body: &'static str) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, content_type), (CACHE_CONTROL, "no-cache")],
        body,
    )
}

pub(crate) async fn index_handler() -> impl IntoResponse {
    asset("text/html; charset=utf-8", INDEX_HTML)
}

pub(crate) async fn styles_handler() -> impl IntoResponse {
    asset("text/css; charset=utf-8", STYLES_CSS)
}

pub(crate) async fn script_handler() -> impl IntoResponse {
    asset("application/javascript; charset=utf-8", MAIN_JS)
}
