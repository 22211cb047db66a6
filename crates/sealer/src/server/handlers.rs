//! Axum request handlers for all service endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{ErrorResponse, HealthResponse, SealRequest};
use common::SealError;
use tracing::warn;

use super::state::AppState;

/// `POST /encrypt`: seal the named object and store the envelope beside it.
///
/// Responds `200` with the destination key, or with the status and
/// [`ErrorResponse`] of the failing category. Never reports partial success.
pub async fn encrypt(
    State(state): State<AppState>,
    body: Result<Json<SealRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return error_response(&SealError::InputInvalid(rejection.body_text()));
        }
    };

    match state.runner.run(&req).await {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e) => {
            warn!(code = e.code(), error = %e, "sealing job failed");
            error_response(&e)
        }
    }
}

/// `GET /health`: liveness check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

fn error_response(err: &SealError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(err))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum_test::TestServer;
    use bytes::Bytes;
    use common::protocol::SealResponse;
    use envelope::{KeyProviderError, MockKeyProvider, PublicKeyMaterial};
    use rsa::RsaPublicKey;
    use serde_json::json;

    use crate::config::Config;
    use crate::job::JobRunner;
    use crate::server::router;
    use crate::storage::{MockObjectStore, StorageError};
    use crate::test_support;

    fn server(store: MockObjectStore, provider: MockKeyProvider) -> TestServer {
        let runner = JobRunner::new(Arc::new(store), Arc::new(provider), &Config::default());
        TestServer::new(router::build(AppState::new(runner), Duration::from_secs(5))).unwrap()
    }

    fn job() -> serde_json::Value {
        json!({
            "bucket": "uploads",
            "object_key": "contracts/acme.docx",
            "key_service_url": "https://kms.us-east-1.amazonaws.com",
            "key_name": "alias/contracts"
        })
    }

    #[tokio::test]
    async fn encrypt_returns_destination_key() {
        let material =
            PublicKeyMaterial::from_public_key(&RsaPublicKey::from(test_support::rsa_key()));
        let mut provider = MockKeyProvider::new();
        provider
            .expect_fetch_public_key()
            .returning(move |_| Ok(material.clone()));
        let mut store = MockObjectStore::new();
        store
            .expect_get()
            .returning(|_, _| Ok(Bytes::from_static(b"PK\x03\x04 docx body!!!")));
        store
            .expect_put()
            .withf(|_, k, body| k == "contracts/acme.docx.encrypted" && body.len() == 552)
            .times(1)
            .returning(|_, _, _| Ok(()));

        let resp = server(store, provider).post("/encrypt").json(&job()).await;
        assert_eq!(resp.status_code(), StatusCode::OK);
        let body: SealResponse = resp.json();
        assert_eq!(body.object_key, "contracts/acme.docx.encrypted");
        assert_eq!(
            body.message,
            "Encrypted file uploaded as contracts/acme.docx.encrypted"
        );
    }

    #[tokio::test]
    async fn malformed_body_is_input_invalid() {
        let resp = test_support::idle_server()
            .post("/encrypt")
            .json(&json!({"bucket": "uploads"}))
            .await;
        assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = resp.json();
        assert_eq!(body.code, "input_invalid");
    }

    #[tokio::test]
    async fn non_json_body_is_input_invalid() {
        let resp = test_support::idle_server()
            .post("/encrypt")
            .text("bucket=uploads")
            .await;
        assert_eq!(resp.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_key_is_bad_gateway() {
        let mut provider = MockKeyProvider::new();
        provider
            .expect_fetch_public_key()
            .returning(|r| Err(KeyProviderError::NotFound(r.key_name.clone())));
        let mut store = MockObjectStore::new();
        store
            .expect_get()
            .returning(|_, _| Ok(Bytes::from_static(b"data")));
        store.expect_put().never();

        let resp = server(store, provider).post("/encrypt").json(&job()).await;
        assert_eq!(resp.status_code(), StatusCode::BAD_GATEWAY);
        let body: ErrorResponse = resp.json();
        assert_eq!(body.code, "key_resolution_failure");
        assert!(body.message.contains("alias/contracts"));
    }

    #[tokio::test]
    async fn missing_source_is_not_found() {
        let mut provider = MockKeyProvider::new();
        provider.expect_fetch_public_key().never();
        let mut store = MockObjectStore::new();
        store
            .expect_get()
            .returning(|_, _| Err(StorageError::Backend("AccessDenied".into())));

        let resp = server(store, provider).post("/encrypt").json(&job()).await;
        assert_eq!(resp.status_code(), StatusCode::NOT_FOUND);
        let body: ErrorResponse = resp.json();
        assert_eq!(body.code, "source_not_found");
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let resp = test_support::idle_server().get("/health").await;
        assert_eq!(resp.status_code(), StatusCode::OK);
        let body: HealthResponse = resp.json();
        assert_eq!(body.status, "ok");
    }

    #[tokio::test]
    async fn unknown_route_body_is_error_response() {
        let resp = test_support::idle_server().get("/decrypt").await;
        assert_eq!(resp.status_code(), StatusCode::NOT_FOUND);
        let body: ErrorResponse = resp.json();
        assert_eq!(body.code, "not_found");
    }
}
