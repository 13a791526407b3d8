//! Seller Offer API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{OfferWithRequest, OfferWithSeller, SellerOffer, SellerOfferCreate};
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message};
use crate::workflow::{AcceptOutcome, WorkflowService};

fn caller_record_id(user: &CurrentUser) -> AppResult<surrealdb::RecordId> {
    user.id
        .parse()
        .map_err(|_| AppError::invalid_token("Malformed user id in token"))
}

/// POST /api/offers/{id} - seller submits an offer against a request
pub async fn submit(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(request_id): Path<String>,
    Json(payload): Json<SellerOfferCreate>,
) -> AppResult<Json<AppResponse<SellerOffer>>> {
    let workflow = WorkflowService::new(state.get_db());
    let offer = workflow
        .submit_offer(caller_record_id(&user)?, &request_id, payload)
        .await?;

    Ok(ok_with_message(offer, "Offer submitted successfully"))
}

/// GET /api/offers/request/{id} - all offers on a request (Admin)
pub async fn list_for_request(
    State(state): State<ServerState>,
    Path(request_id): Path<String>,
) -> AppResult<Json<Vec<OfferWithSeller>>> {
    let workflow = WorkflowService::new(state.get_db());
    Ok(Json(workflow.offers_for_request(&request_id).await?))
}

/// POST /api/offers/{id}/accept - admin accepts one offer (Admin)
///
/// Rejects the pending siblings, fulfils the request, and materializes the
/// catalog item in the same transaction.
pub async fn accept(
    State(state): State<ServerState>,
    Path(offer_id): Path<String>,
) -> AppResult<Json<AppResponse<AcceptOutcome>>> {
    let workflow = WorkflowService::new(state.get_db());
    let outcome = workflow.accept_offer(&offer_id).await?;

    Ok(ok_with_message(
        outcome,
        "Offer accepted and request marked as fulfilled",
    ))
}

/// GET /api/offers/seller/my-offers - request ids this seller offered on
pub async fn my_offer_request_ids(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<String>>> {
    let workflow = WorkflowService::new(state.get_db());
    Ok(Json(
        workflow
            .my_offer_request_ids(caller_record_id(&user)?)
            .await?,
    ))
}

/// GET /api/offers/seller - this seller's offers with request context
pub async fn my_offers(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<OfferWithRequest>>> {
    let workflow = WorkflowService::new(state.get_db());
    Ok(Json(workflow.my_offers(caller_record_id(&user)?).await?))
}
