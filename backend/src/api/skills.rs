//! Skill-name directory endpoints.

use actix_web::{get, web};
use serde::Deserialize;

use crate::domain::user::SkillLevel;

use super::auth::Authenticated;
use super::error::ApiResult;
use super::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NameSearchQuery {
    #[serde(default)]
    q: String,
}

/// Every skill name offered by anyone, deduplicated and sorted.
#[utoipa::path(
    get,
    path = "/skills",
    tags = ["skills"],
    responses(
        (status = 200, description = "Distinct skill names", body = [String])
    )
)]
#[get("/skills")]
pub async fn list_skills(
    state: web::Data<AppState>,
    _user: Authenticated,
) -> ApiResult<web::Json<Vec<String>>> {
    Ok(web::Json(state.directory.all_skill_names().await?))
}

/// Skill names held at exactly the given level. An unknown level spelling
/// matches nothing and yields an empty list, not an error.
#[utoipa::path(
    get,
    path = "/skills/level/{level}",
    tags = ["skills"],
    params(("level" = String, Path, description = "Beginner, Intermediate, Advanced, or Expert")),
    responses(
        (status = 200, description = "Distinct skill names at that level", body = [String])
    )
)]
#[get("/skills/level/{level}")]
pub async fn list_skills_by_level(
    state: web::Data<AppState>,
    _user: Authenticated,
    level: web::Path<String>,
) -> ApiResult<web::Json<Vec<String>>> {
    let names = match SkillLevel::parse(&level) {
        Some(level) => state.directory.skill_names_by_level(level).await?,
        None => Vec::new(),
    };
    Ok(web::Json(names))
}

/// Skill names matching a case-insensitive substring.
#[utoipa::path(
    get,
    path = "/skills/search",
    tags = ["skills"],
    params(("q" = String, Query, description = "Substring to match, case-insensitive")),
    responses(
        (status = 200, description = "Matching skill names", body = [String])
    )
)]
#[get("/skills/search")]
pub async fn search_skills(
    state: web::Data<AppState>,
    _user: Authenticated,
    query: web::Query<NameSearchQuery>,
) -> ApiResult<web::Json<Vec<String>>> {
    Ok(web::Json(state.directory.search_skill_names(&query.q).await?))
}
