use axum::{
    body::Body,
    http::{StatusCode, header::CONTENT_TYPE, header::LOCATION},
    response::Response,
};

#[track_caller]
pub(crate) fn assert_redirect(response: &Response<Body>, want_location: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let location = response
        .headers()
        .get(LOCATION)
        .expect("No location header found")
        .to_str()
        .expect("Location header is not valid UTF-8");

    assert_eq!(location, want_location);
}

#[track_caller]
pub(crate) fn assert_content_type_html(response: &Response<Body>) {
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .expect("No content type header found")
        .to_str()
        .expect("Content type header is not valid UTF-8");

    assert!(
        content_type.starts_with("text/html"),
        "want content type text/html, got {content_type}"
    );
}
