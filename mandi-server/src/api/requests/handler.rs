//! Product Request API Handlers
//!
//! Thin delegation to the workflow service; state transitions live there.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    ProductRequest, ProductRequestCreate, RequestWithAcceptedOffer, RequestWithBuyer,
};
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message};
use crate::workflow::WorkflowService;

fn caller_record_id(user: &CurrentUser) -> AppResult<surrealdb::RecordId> {
    user.id
        .parse()
        .map_err(|_| AppError::invalid_token("Malformed user id in token"))
}

/// POST /api/requests - buyer files a demand record
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ProductRequestCreate>,
) -> AppResult<Json<AppResponse<ProductRequest>>> {
    let workflow = WorkflowService::new(state.get_db());
    let request = workflow.create_request(caller_record_id(&user)?, payload).await?;

    Ok(ok_with_message(
        request,
        "Product request submitted successfully",
    ))
}

/// GET /api/requests - admin list, buyer usernames joined
pub async fn list_all(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<RequestWithBuyer>>> {
    let workflow = WorkflowService::new(state.get_db());
    Ok(Json(workflow.list_all().await?))
}

/// POST /api/requests/{id}/broadcast - admin opens a request to sellers
pub async fn broadcast(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<ProductRequest>>> {
    let workflow = WorkflowService::new(state.get_db());
    let request = workflow.broadcast(&id).await?;

    Ok(ok_with_message(
        request,
        "Broadcast sent to sellers successfully",
    ))
}

/// GET /api/requests/notified - requests currently open for offers (Seller)
pub async fn list_notified(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<RequestWithBuyer>>> {
    let workflow = WorkflowService::new(state.get_db());
    Ok(Json(workflow.list_notified().await?))
}

/// GET /api/requests/my-requests - buyer's own requests with accepted offer
pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<RequestWithAcceptedOffer>>> {
    let workflow = WorkflowService::new(state.get_db());
    Ok(Json(workflow.list_mine(caller_record_id(&user)?).await?))
}
