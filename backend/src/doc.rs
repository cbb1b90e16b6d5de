//! OpenAPI document assembly.
//!
//! Endpoint annotations live next to the handlers; this module collects them
//! into one [`ApiDoc`] served as `/api-docs/openapi.json`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Registers the bearer-token security scheme the protected endpoints
/// reference.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by /auth/register or /auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the skill-exchange API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "SkillSwap backend API",
        description = "Skill-exchange marketplace: profiles, skill listings, and exchange requests."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::me,
        crate::api::auth::logout,
        crate::api::users::get_user,
        crate::api::users::update_profile,
        crate::api::users::add_skill,
        crate::api::users::remove_skill,
        crate::api::users::add_learning_interest,
        crate::api::users::remove_learning_interest,
        crate::api::users::search_by_skill,
        crate::api::skills::list_skills,
        crate::api::skills::list_skills_by_level,
        crate::api::skills::search_skills,
        crate::api::exchanges::create_exchange,
        crate::api::exchanges::my_exchanges,
        crate::api::exchanges::update_status,
        crate::api::exchanges::submit_feedback,
        crate::api::health::ready,
        crate::api::health::live,
    ),
    tags(
        (name = "auth", description = "Registration, login, and session introspection"),
        (name = "users", description = "Profiles, skill lists, and user search"),
        (name = "skills", description = "Platform-wide skill name directory"),
        (name = "exchanges", description = "Exchange lifecycle and feedback"),
        (name = "health", description = "Orchestration probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[test]
    fn document_lists_every_endpoint_group() {
        let doc = ApiDoc::openapi();
        for path in [
            "/auth/register",
            "/users/profile",
            "/skills/search",
            "/exchanges/my-exchanges",
            "/health/ready",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "missing path {path}"
            );
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("BearerToken"));
    }
}
