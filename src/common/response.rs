// src/common/response.rs

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

// Resposta padrão das mutações: `{ "ok": true }`.
#[derive(Debug, Serialize, ToSchema)]
pub struct OkResponse {
    #[schema(example = true)]
    pub ok: bool,
}

impl OkResponse {
    pub fn new() -> Self {
        Self { ok: true }
    }
}

impl Default for OkResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoResponse for OkResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

// Corpo binário/texto com Content-Type explícito; o Content-Length sai do tamanho do buffer.
pub fn raw(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> Response {
    let body = body.into();
    let length = body.len();
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    response
}

pub fn not_found() -> Response {
    raw(StatusCode::NOT_FOUND, "text/plain; charset=utf-8", "Not Found")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_sets_type_and_length() {
        let response = raw(StatusCode::OK, "text/html; charset=utf-8", "<h1>hola</h1>");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html; charset=utf-8");
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "13");
    }

    #[test]
    fn not_found_is_plain_text() {
        let response = not_found();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "9");
    }
}
