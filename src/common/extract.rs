// src/common/extract.rs

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::Validate;

use crate::common::error::AppError;

// Extrator de corpo JSON: corpo vazio vale como `{}`, JSON quebrado vira 400
// e o `validate()` roda antes do handler.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        Ok(ValidatedJson(validated_body(&bytes)?))
    }
}

// Query string onde vale a primeira ocorrência de cada chave; `?month=a&month=b` lê `a`.
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        Ok(QueryParams(first_occurrences(pairs)?))
    }
}

fn first_occurrences<T: DeserializeOwned>(pairs: Vec<(String, String)>) -> Result<T, AppError> {
    let mut map = Map::new();
    for (key, value) in pairs {
        map.entry(key).or_insert(Value::String(value));
    }
    serde_json::from_value(Value::Object(map)).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Para handlers que precisam validar o path antes de olhar o corpo.
pub fn validated_body<T: DeserializeOwned + Validate>(bytes: &[u8]) -> Result<T, AppError> {
    let payload: T = parse_body(bytes)?;
    payload.validate()?;
    Ok(payload)
}

pub fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    let raw: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        bytes
    };

    serde_json::from_slice(raw).map_err(|e| AppError::MalformedJson(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: Option<String>,
    }

    #[test]
    fn empty_body_is_an_empty_object() {
        let named: Named = parse_body(b"  \n").unwrap();
        assert!(named.name.is_none());
    }

    #[test]
    fn broken_json_is_rejected() {
        let result = parse_body::<Named>(b"{\"name\": ");
        assert!(matches!(result, Err(AppError::MalformedJson(_))));
    }

    #[test]
    fn repeated_query_keys_keep_the_first_value() {
        let pairs = vec![
            ("name".to_string(), "ana".to_string()),
            ("name".to_string(), "juan".to_string()),
            ("other".to_string(), "x".to_string()),
        ];
        let named: Named = first_occurrences(pairs).unwrap();
        assert_eq!(named.name.as_deref(), Some("ana"));

        let empty: Named = first_occurrences(Vec::new()).unwrap();
        assert!(empty.name.is_none());
    }
}
