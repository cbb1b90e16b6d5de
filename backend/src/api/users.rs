//! User profile, skill-list, and user-search endpoints.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::Deserialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::DomainError;
use crate::domain::user::{LearningPriority, ProfileUpdate, PublicProfile, SkillLevel};

use super::auth::Authenticated;
use super::error::{ApiError, ApiResult};
use super::state::AppState;

/// Body for adding an offered skill.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddSkillRequest {
    pub name: String,
    /// One of `Beginner`, `Intermediate`, `Advanced`, `Expert`.
    pub level: String,
}

/// Body for adding a learning interest.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddLearningInterestRequest {
    pub name: String,
    /// One of `Low`, `Medium`, `High`.
    pub priority: String,
}

#[derive(Debug, Deserialize)]
pub struct SkillSearchQuery {
    #[serde(default)]
    skill: String,
}

/// Another user's public profile.
#[utoipa::path(
    get,
    path = "/users/{id}",
    tags = ["users"],
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Public profile", body = PublicProfile),
        (status = 404, description = "Unknown user", body = ApiError)
    )
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<AppState>,
    _user: Authenticated,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<PublicProfile>> {
    let user = state.directory.fetch(id.into_inner()).await?;
    Ok(web::Json(user.public_profile()))
}

/// Update own profile fields through the dotted-key allow-list.
#[utoipa::path(
    patch,
    path = "/users/profile",
    tags = ["users"],
    responses(
        (status = 200, description = "Updated profile", body = PublicProfile),
        (status = 400, description = "Disallowed or malformed field", body = ApiError)
    )
)]
#[patch("/users/profile")]
pub async fn update_profile(
    state: web::Data<AppState>,
    user: Authenticated,
    body: web::Json<Map<String, Value>>,
) -> ApiResult<web::Json<PublicProfile>> {
    let update = ProfileUpdate::from_fields(&body)?;
    let user = state.directory.update_profile(user.0, &update).await?;
    Ok(web::Json(user.public_profile()))
}

/// Add an offered skill to own profile.
#[utoipa::path(
    post,
    path = "/users/skills",
    tags = ["users"],
    request_body = AddSkillRequest,
    responses(
        (status = 201, description = "Updated profile", body = PublicProfile),
        (status = 400, description = "Unknown skill level", body = ApiError)
    )
)]
#[post("/users/skills")]
pub async fn add_skill(
    state: web::Data<AppState>,
    user: Authenticated,
    body: web::Json<AddSkillRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let level = SkillLevel::parse(&body.level)
        .ok_or_else(|| ApiError::from(DomainError::invalid_request("invalid skill level")))?;
    let user = state.directory.add_skill(user.0, body.name, level).await?;
    Ok(HttpResponse::Created().json(user.public_profile()))
}

/// Remove an offered skill by entry id.
#[utoipa::path(
    delete,
    path = "/users/skills/{skillId}",
    tags = ["users"],
    params(("skillId" = Uuid, Path, description = "Skill entry id")),
    responses(
        (status = 200, description = "Updated profile", body = PublicProfile)
    )
)]
#[delete("/users/skills/{skill_id}")]
pub async fn remove_skill(
    state: web::Data<AppState>,
    user: Authenticated,
    skill_id: web::Path<Uuid>,
) -> ApiResult<web::Json<PublicProfile>> {
    let user = state
        .directory
        .remove_skill(user.0, skill_id.into_inner())
        .await?;
    Ok(web::Json(user.public_profile()))
}

/// Add a learning interest to own profile.
#[utoipa::path(
    post,
    path = "/users/skills-to-learn",
    tags = ["users"],
    request_body = AddLearningInterestRequest,
    responses(
        (status = 201, description = "Updated profile", body = PublicProfile),
        (status = 400, description = "Unknown priority", body = ApiError)
    )
)]
#[post("/users/skills-to-learn")]
pub async fn add_learning_interest(
    state: web::Data<AppState>,
    user: Authenticated,
    body: web::Json<AddLearningInterestRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let priority = LearningPriority::parse(&body.priority)
        .ok_or_else(|| ApiError::from(DomainError::invalid_request("invalid priority")))?;
    let user = state
        .directory
        .add_learning_interest(user.0, body.name, priority)
        .await?;
    Ok(HttpResponse::Created().json(user.public_profile()))
}

/// Remove a learning interest by entry id.
#[utoipa::path(
    delete,
    path = "/users/skills-to-learn/{skillId}",
    tags = ["users"],
    params(("skillId" = Uuid, Path, description = "Interest entry id")),
    responses(
        (status = 200, description = "Updated profile", body = PublicProfile)
    )
)]
#[delete("/users/skills-to-learn/{skill_id}")]
pub async fn remove_learning_interest(
    state: web::Data<AppState>,
    user: Authenticated,
    skill_id: web::Path<Uuid>,
) -> ApiResult<web::Json<PublicProfile>> {
    let user = state
        .directory
        .remove_learning_interest(user.0, skill_id.into_inner())
        .await?;
    Ok(web::Json(user.public_profile()))
}

/// Users offering a skill whose name contains the query substring.
#[utoipa::path(
    get,
    path = "/users/search/skills",
    tags = ["users"],
    params(("skill" = String, Query, description = "Substring to match, case-insensitive")),
    responses(
        (status = 200, description = "Matching users", body = [PublicProfile])
    )
)]
#[get("/users/search/skills")]
pub async fn search_by_skill(
    state: web::Data<AppState>,
    _user: Authenticated,
    query: web::Query<SkillSearchQuery>,
) -> ApiResult<web::Json<Vec<PublicProfile>>> {
    let matches = state.directory.search_users_by_skill(&query.skill).await?;
    Ok(web::Json(
        matches.iter().map(|user| user.public_profile()).collect(),
    ))
}
