//! The fallback handler for requests that do not match any route.

use axum::{
    Json,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::ErrorBody;

pub async fn get_404_not_found(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody::new(
            "not_found",
            format!("no route for {}", uri.path()),
        )),
    )
        .into_response()
}
