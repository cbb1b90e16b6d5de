//! Exchange lifecycle endpoints.

use actix_web::{HttpResponse, get, patch, post, web};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::exchange::{
    ExchangeStatus, ExchangeView, RatingScore, SkillExchange, SkillRef,
};
use crate::domain::{DomainError, NewExchange};

use super::auth::Authenticated;
use super::error::{ApiError, ApiResult};
use super::state::AppState;

/// Body for opening an exchange.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateExchangeRequest {
    pub receiver_id: Uuid,
    pub offered_skill: SkillRef,
    pub requested_skill: SkillRef,
    /// Session length in minutes.
    pub duration: u32,
    pub notes: Option<String>,
}

/// Body for a status change.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: ExchangeStatus,
}

/// Body for a feedback submission.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    /// Score from 1 to 5.
    pub rating: u8,
    pub comment: Option<String>,
}

/// Open a pending exchange towards another user.
#[utoipa::path(
    post,
    path = "/exchanges",
    tags = ["exchanges"],
    request_body = CreateExchangeRequest,
    responses(
        (status = 201, description = "Exchange opened", body = SkillExchange),
        (status = 400, description = "Invalid duration or self-exchange", body = ApiError),
        (status = 404, description = "Unknown receiver", body = ApiError)
    )
)]
#[post("/exchanges")]
pub async fn create_exchange(
    state: web::Data<AppState>,
    user: Authenticated,
    body: web::Json<CreateExchangeRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let exchange = state
        .ledger
        .open(
            &user.0,
            NewExchange {
                receiver: body.receiver_id,
                offered_skill: body.offered_skill,
                requested_skill: body.requested_skill,
                duration: body.duration,
                notes: body.notes,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(exchange))
}

/// All exchanges the acting user participates in, newest first.
#[utoipa::path(
    get,
    path = "/exchanges/my-exchanges",
    tags = ["exchanges"],
    responses(
        (status = 200, description = "Own exchanges", body = [ExchangeView])
    )
)]
#[get("/exchanges/my-exchanges")]
pub async fn my_exchanges(
    state: web::Data<AppState>,
    user: Authenticated,
) -> ApiResult<web::Json<Vec<ExchangeView>>> {
    Ok(web::Json(state.ledger.list_for(&user.0).await?))
}

/// Move an exchange to a new status.
#[utoipa::path(
    patch,
    path = "/exchanges/{id}/status",
    tags = ["exchanges"],
    params(("id" = Uuid, Path, description = "Exchange id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated exchange", body = SkillExchange),
        (status = 403, description = "Not a participant", body = ApiError),
        (status = 404, description = "Unknown exchange", body = ApiError)
    )
)]
#[patch("/exchanges/{id}/status")]
pub async fn update_status(
    state: web::Data<AppState>,
    user: Authenticated,
    id: web::Path<Uuid>,
    body: web::Json<UpdateStatusRequest>,
) -> ApiResult<web::Json<SkillExchange>> {
    let exchange = state
        .ledger
        .update_status(&user.0, id.into_inner(), body.status)
        .await?;
    Ok(web::Json(exchange))
}

/// Rate the other party for a session.
#[utoipa::path(
    post,
    path = "/exchanges/{id}/feedback",
    tags = ["exchanges"],
    params(("id" = Uuid, Path, description = "Exchange id")),
    request_body = FeedbackRequest,
    responses(
        (status = 200, description = "Updated exchange", body = SkillExchange),
        (status = 400, description = "Rating out of range", body = ApiError),
        (status = 404, description = "Unknown exchange", body = ApiError)
    )
)]
#[post("/exchanges/{id}/feedback")]
pub async fn submit_feedback(
    state: web::Data<AppState>,
    user: Authenticated,
    id: web::Path<Uuid>,
    body: web::Json<FeedbackRequest>,
) -> ApiResult<web::Json<SkillExchange>> {
    let body = body.into_inner();
    let rating = RatingScore::try_new(body.rating)
        .map_err(|err| ApiError::from(DomainError::invalid_request(err.to_string())))?;
    let exchange = state
        .ledger
        .submit_feedback(&user.0, id.into_inner(), rating, body.comment)
        .await?;
    Ok(web::Json(exchange))
}
