use axum::Json;
use axum::extract::{Path, State};
use veritrail_application::Invocation;

use crate::api_services::fresh_header;
use crate::dto::{CommitReceiptResponse, InitServiceRequest, InvokeServiceRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn invoke_service_handler(
    State(state): State<AppState>,
    Path(service): Path<String>,
    Json(payload): Json<InvokeServiceRequest>,
) -> ApiResult<Json<CommitReceiptResponse>> {
    let invocation = Invocation::new(payload.function, payload.args);
    let receipt = state
        .executor
        .submit(service.as_str(), &invocation, fresh_header())
        .await?;

    Ok(Json(CommitReceiptResponse::from(receipt)))
}

pub async fn init_service_handler(
    State(state): State<AppState>,
    Path(service): Path<String>,
    Json(payload): Json<InitServiceRequest>,
) -> ApiResult<Json<CommitReceiptResponse>> {
    let receipt = state
        .executor
        .init(service.as_str(), &payload.args, fresh_header())
        .await?;

    Ok(Json(CommitReceiptResponse::from(receipt)))
}
