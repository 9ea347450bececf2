use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Static files bundled into the binary, addressed by `/assets/<name>`.
const ASSETS: &[(&str, &str)] = &[
    ("script.js", include_str!("../assets/script.js")),
    ("style.css", include_str!("../assets/style.css")),
];

pub(crate) async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub(crate) async fn asset_handler(Path(name): Path<String>) -> Response {
    let Some((_, body)) = ASSETS.iter().find(|(asset, _)| *asset == name) else {
        return (StatusCode::NOT_FOUND, "asset not found").into_response();
    };

    let mime = mime_guess::from_path(&name).first_or_octet_stream();
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime.essence_str().to_string()),
            (header::CACHE_CONTROL, "no-cache".to_string()),
        ],
        *body,
    )
        .into_response()
}
