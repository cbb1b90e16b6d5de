//! Application assembly: wiring adapters into services and building the
//! actix app and server.

mod config;

pub use config::{AppConfig, ConfigError};

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use utoipa::OpenApi;

use crate::api::health::{HealthState, live, ready};
use crate::api::{AppState, auth, exchanges, skills, users};
use crate::doc::ApiDoc;
use crate::domain::ports::{ExchangeRepository, TokenCodec, UserRepository};
use crate::domain::{ExchangeLedger, SessionGuard, UserDirectory};
use crate::middleware::Trace;
use crate::outbound::memory::MemoryStore;
use crate::outbound::tokens::JwtTokenCodec;

/// Wire the in-memory store and JWT codec into the handler state.
pub fn build_state(config: &AppConfig) -> AppState {
    let store = MemoryStore::default();
    let users: Arc<dyn UserRepository> = Arc::new(store.clone());
    let exchanges: Arc<dyn ExchangeRepository> = Arc::new(store);
    let tokens: Arc<dyn TokenCodec> = Arc::new(JwtTokenCodec::new(
        &config.jwt_secret,
        config.token_validity,
    ));

    AppState {
        directory: UserDirectory::new(users.clone()),
        ledger: ExchangeLedger::new(exchanges, users.clone()),
        guard: SessionGuard::new(tokens.clone(), users),
        tokens,
    }
}

async fn openapi_document() -> web::Json<utoipa::openapi::OpenApi> {
    web::Json(ApiDoc::openapi())
}

/// Assemble the actix app: state, trace middleware, and every route.
///
/// Shared between the real server and the HTTP integration tests, so both
/// exercise identical wiring.
pub fn build_app(
    state: web::Data<AppState>,
    health: web::Data<HealthState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .app_data(health)
        .wrap(Trace)
        .service(auth::register)
        .service(auth::login)
        .service(auth::me)
        .service(auth::logout)
        .service(users::update_profile)
        .service(users::add_skill)
        .service(users::remove_skill)
        .service(users::add_learning_interest)
        .service(users::remove_learning_interest)
        .service(users::search_by_skill)
        .service(users::get_user)
        .service(skills::list_skills)
        .service(skills::list_skills_by_level)
        .service(skills::search_skills)
        .service(exchanges::create_exchange)
        .service(exchanges::my_exchanges)
        .service(exchanges::update_status)
        .service(exchanges::submit_feedback)
        .service(ready)
        .service(live)
        .route("/api-docs/openapi.json", web::get().to(openapi_document))
}

/// Bind the listener and start serving.
///
/// Marks the shared health state ready once the socket is bound; the caller
/// awaits the returned [`Server`].
pub fn create_server(
    config: &AppConfig,
    health: web::Data<HealthState>,
) -> std::io::Result<Server> {
    let state = web::Data::new(build_state(config));
    let app_health = health.clone();

    let server = HttpServer::new(move || build_app(state.clone(), app_health.clone()))
        .bind(config.bind_addr)?
        .run();

    health.mark_ready();
    Ok(server)
}
