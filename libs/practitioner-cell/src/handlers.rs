use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::CreatePractitionerRequest;
use crate::services::practitioner::PractitionerService;

// ==============================================================================
// PUBLIC HANDLERS (NO AUTHENTICATION REQUIRED)
// ==============================================================================

#[axum::debug_handler]
pub async fn list_practitioners(
    State(state): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = PractitionerService::new(&state);
    let practitioners = service.list(None).await?;

    Ok(Json(json!({
        "practitioners": practitioners,
        "total": practitioners.len()
    })))
}

// ==============================================================================
// PROTECTED HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_practitioner(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<CreatePractitionerRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = PractitionerService::new(&state);
    let practitioner = service.create(request, auth.token()).await?;

    Ok((StatusCode::CREATED, Json(json!(practitioner))))
}

#[axum::debug_handler]
pub async fn delete_practitioner(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Path(practitioner_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = PractitionerService::new(&state);
    service.delete(practitioner_id, auth.token()).await?;

    Ok(Json(json!({ "deleted": practitioner_id })))
}
