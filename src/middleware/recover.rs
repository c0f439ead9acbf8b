// src/middleware/recover.rs

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Handler do `CatchPanicLayer`: um handler que entra em pânico vira 500, o processo segue.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "pánico desconocido".to_string()
    };

    tracing::error!("💥 Pânico no handler: {}", details);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "ok": false, "error": "Error del servidor", "details": details })),
    )
        .into_response()
}
