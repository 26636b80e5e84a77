use std::collections::BTreeMap;

use axum::{
    extract::Path,
    http::{HeaderMap, Method, StatusCode, Uri},
    routing::any,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::info;
use uuid::Uuid;

/// What the server saw, echoed back as the response body.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Echo {
    pub id: Uuid,
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: BTreeMap<String, String>,
    /// Parsed JSON when the body is valid JSON, the raw text otherwise.
    pub body: Option<serde_json::Value>,
}

pub fn app() -> Router {
    Router::new()
        .route("/status/{code}", any(status))
        .fallback(echo)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: String) -> Json<Echo> {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let body = if body.is_empty() {
        None
    } else {
        Some(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
    };
    let echo = Echo {
        id: Uuid::new_v4(),
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    };
    info!(id = %echo.id, method = %echo.method, path = %echo.path, "echo");
    Json(echo)
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, String), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, format!("status {code}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_serializes_to_json() {
        let echo = Echo {
            id: Uuid::nil(),
            method: "GET".to_string(),
            path: "/users/42".to_string(),
            query: None,
            headers: BTreeMap::from([("x-trace".to_string(), "abc".to_string())]),
            body: None,
        };
        let json = serde_json::to_value(&echo).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["path"], "/users/42");
        assert_eq!(json["headers"]["x-trace"], "abc");
        assert!(json["body"].is_null());
    }

    #[test]
    fn echo_reads_back_raw_text_body() {
        let echo: Echo = serde_json::from_str(
            r#"{"id":"00000000-0000-0000-0000-000000000001","method":"PUT","path":"/notes","query":"a=1","headers":{},"body":"plain"}"#,
        )
        .unwrap();
        assert_eq!(echo.method, "PUT");
        assert_eq!(echo.query.as_deref(), Some("a=1"));
        assert_eq!(echo.body, Some(serde_json::Value::String("plain".to_string())));
    }
}
