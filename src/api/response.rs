// src/api/response.rs

use bytes::Bytes;
use http::{header::CONTENT_TYPE, Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;
use serde_json::json;


pub type ApiResponse = Response<Full<Bytes>>;


pub fn json_response(status: StatusCode, body: &serde_json::Value) -> ApiResponse {
    let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, http::HeaderValue::from_static("application/json"));
    response
}

/// `{"success": true, "count": n, "data": [...]}`
pub fn list<T: Serialize>(items: &[T]) -> ApiResponse {
    match serde_json::to_value(items) {
        Ok(data) => json_response(
            StatusCode::OK,
            &json!({ "success": true, "count": items.len(), "data": data }),
        ),
        Err(e) => server_error(&e),
    }
}

/// `{"success": true, "data": {...}}`
pub fn item<T: Serialize>(value: &T) -> ApiResponse {
    match serde_json::to_value(value) {
        Ok(data) => json_response(StatusCode::OK, &json!({ "success": true, "data": data })),
        Err(e) => server_error(&e),
    }
}

/// `{"success": false, "message": "..."}`
pub fn failure(status: StatusCode, message: impl std::fmt::Display) -> ApiResponse {
    json_response(status, &json!({ "success": false, "message": message.to_string() }))
}

fn server_error(e: &serde_json::Error) -> ApiResponse {
    tracing::error!(error = %e, "failed to serialize response");
    failure(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
}
