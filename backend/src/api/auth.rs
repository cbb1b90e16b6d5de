//! Authentication endpoints and the bearer-credential extractor.

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse, get, post, web};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::auth::{LoginCredentials, RegistrationDetails};
use crate::domain::user::{Profile, PublicProfile, User};
use crate::domain::DomainError;

use super::error::{ApiError, ApiResult};
use super::state::AppState;

/// The acting user, resolved from the `Authorization: Bearer` header.
///
/// Extraction fails with 401 when the header is missing or malformed, the
/// token does not verify, or the embedded user no longer exists.
pub struct Authenticated(pub User);

impl FromRequest for Authenticated {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let bearer = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(ToOwned::to_owned);
        Box::pin(async move {
            let state = state
                .ok_or_else(|| ApiError::from(DomainError::internal("app state not configured")))?;
            let bearer = bearer.ok_or_else(|| {
                ApiError::from(DomainError::unauthorized("missing bearer credential"))
            })?;
            let user = state
                .guard
                .authenticate(&bearer)
                .await
                .map_err(|err| ApiError::from(DomainError::from(err)))?;
            Ok(Self(user))
        })
    }
}

/// Registration request body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub profile: Option<Profile>,
}

/// Login request body.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User plus a freshly issued bearer token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: PublicProfile,
    pub token: String,
}

/// Plain acknowledgement body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

fn session_response(state: &AppState, user: &User) -> ApiResult<SessionResponse> {
    let token = state.tokens.issue(user.id).map_err(|err| {
        tracing::error!(error = %err, "token issuance failed");
        ApiError::from(DomainError::internal("could not issue session token"))
    })?;
    Ok(SessionResponse {
        user: user.public_profile(),
        token,
    })
}

/// Register a new account and open a session.
#[utoipa::path(
    post,
    path = "/auth/register",
    tags = ["auth"],
    security([]),
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = SessionResponse),
        (status = 400, description = "Validation failure or duplicate user", body = ApiError)
    )
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let details = RegistrationDetails::try_from_parts(
        &body.username,
        &body.email,
        &body.password,
        body.profile,
    )
    .map_err(|err| ApiError::from(DomainError::invalid_request(err.to_string())))?;
    let user = state.directory.register(&details).await?;
    Ok(HttpResponse::Created().json(session_response(&state, &user)?))
}

/// Exchange email and password for a session token.
#[utoipa::path(
    post,
    path = "/auth/login",
    tags = ["auth"],
    security([]),
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session opened", body = SessionResponse),
        (status = 401, description = "Invalid credentials", body = ApiError)
    )
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from_parts(&body.email, &body.password)
        .map_err(|_| ApiError::from(DomainError::unauthorized("invalid credentials")))?;
    let user = state.directory.login(&credentials).await?;
    Ok(HttpResponse::Ok().json(session_response(&state, &user)?))
}

/// The profile behind the presented token.
#[utoipa::path(
    get,
    path = "/auth/me",
    tags = ["auth"],
    responses(
        (status = 200, description = "Acting user", body = PublicProfile),
        (status = 401, description = "Unauthenticated", body = ApiError)
    )
)]
#[get("/auth/me")]
pub async fn me(user: Authenticated) -> ApiResult<web::Json<PublicProfile>> {
    Ok(web::Json(user.0.public_profile()))
}

/// End the session. Tokens are stateless, so this is an acknowledgement the
/// client uses to discard its copy.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tags = ["auth"],
    responses(
        (status = 200, description = "Acknowledged", body = MessageResponse),
        (status = 401, description = "Unauthenticated", body = ApiError)
    )
)]
#[post("/auth/logout")]
pub async fn logout(_user: Authenticated) -> ApiResult<web::Json<MessageResponse>> {
    Ok(web::Json(MessageResponse {
        message: "logged out".to_owned(),
    }))
}
