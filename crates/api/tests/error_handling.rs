//! `AppError` to HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no router needed.

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use freeflow_api::error::AppError;
use freeflow_core::error::CoreError;
use freeflow_db::client::{FOREIGN_KEY_VIOLATION, UNIQUE_VIOLATION};
use freeflow_db::{ClientError, DbError};
use http_body_util::BodyExt;
use uuid::Uuid;

/// Convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

fn backend(code: &str, message: &str) -> AppError {
    AppError::Client(ClientError::Backend {
        code: Some(code.to_string()),
        message: message.to_string(),
    })
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let id = Uuid::nil();
    let err = AppError::Core(CoreError::NotFound {
        entity: "Invoice",
        id,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], format!("Invoice with id {id} not found"));
}

#[tokio::test]
async fn not_found_by_key_returns_404() {
    let err = AppError::Core(CoreError::NotFoundByKey {
        entity: "Booking",
        key: "confirmation code",
        value: "ZZ99ZZ99".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Booking with confirmation code ZZ99ZZ99 not found");
}

#[test]
fn db_errors_keep_their_layer() {
    let core = AppError::from(DbError::Core(CoreError::Validation("page 0".into())));
    let client = AppError::from(DbError::Client(ClientError::NoRows));

    assert_matches!(core, AppError::Core(CoreError::Validation(msg)) if msg == "page 0");
    assert_matches!(client, AppError::Client(ClientError::NoRows));
}

#[tokio::test]
async fn no_rows_returns_404() {
    let (status, json) = error_to_response(AppError::Client(ClientError::NoRows)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn forbidden_error_returns_403() {
    let err = AppError::Core(CoreError::Forbidden("Permission denied".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
    assert_eq!(json["error"], "Permission denied");
}

#[tokio::test]
async fn unauthorized_error_returns_401() {
    let err = AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("title is required".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "title is required");
}

#[tokio::test]
async fn unique_violation_returns_409_with_constraint() {
    let err = backend(
        UNIQUE_VIOLATION,
        r#"duplicate key value violates unique constraint "uq_bookings_confirmation_code""#,
    );

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(
        json["error"],
        "Duplicate value violates unique constraint: uq_bookings_confirmation_code"
    );
}

#[tokio::test]
async fn foreign_key_violation_returns_400() {
    let err = backend(FOREIGN_KEY_VIOLATION, "insert or update violates foreign key");

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Referenced record does not exist");
}

#[tokio::test]
async fn invalid_query_returns_400() {
    let err = AppError::Client(ClientError::InvalidQuery(
        "Refusing to delete tasks without filters".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn unknown_backend_error_is_sanitized() {
    let err = backend("XX000", "could not write to file \"base/16384/2619\"");

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn internal_error_hides_details() {
    let err = AppError::InternalError("pool exhausted".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}
