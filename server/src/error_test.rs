use super::*;

async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn client_errors_carry_their_message() {
    let (status, body) = body_json(AppError::NotFound("Invoice not found".into())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Invoice not found" }));
}

#[tokio::test]
async fn internal_errors_are_sanitized() {
    let (status, body) = body_json(AppError::Internal("hash exploded".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], INTERNAL_MESSAGE);

    let (status, body) = body_json(AppError::Database(sqlx::Error::PoolTimedOut)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], INTERNAL_MESSAGE);
}

#[test]
fn invalid_token_is_422() {
    assert_eq!(AppError::InvalidToken("bad header".into()).status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn auth_errors_map_to_statuses() {
    assert_eq!(AppError::from(AuthError::InvalidEmail).status(), StatusCode::BAD_REQUEST);
    assert_eq!(AppError::from(AuthError::WeakPassword(8)).status(), StatusCode::BAD_REQUEST);
    assert_eq!(AppError::from(AuthError::EmailTaken).status(), StatusCode::CONFLICT);
    assert_eq!(AppError::from(AuthError::InvalidCredentials).status(), StatusCode::UNAUTHORIZED);
    assert_eq!(AppError::from(AuthError::Hash("x".into())).status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn invoice_errors_map_to_statuses() {
    assert_eq!(AppError::from(InvoiceError::NotFound).status(), StatusCode::NOT_FOUND);
    assert_eq!(AppError::from(InvoiceError::NegativeAmount).status(), StatusCode::BAD_REQUEST);
    assert_eq!(AppError::from(InvoiceError::InvalidDate).status(), StatusCode::BAD_REQUEST);
    assert_eq!(AppError::from(InvoiceError::DuplicateNumber).status(), StatusCode::CONFLICT);
}
