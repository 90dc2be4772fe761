//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every `/api/v1` handler and health probe together with
//! the request and response bodies they exchange. The document backs Swagger
//! UI in debug builds and is exported by `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, MaterialType, Role};
use crate::inbound::http::dto::{
    AuthStatusResponse, CreateRatingRequest, ExistsResponse, LoginRequest, MaterialRequest,
    MaterialResponse, MaterialSummaryResponse, RatingResponse, RegisterRequest, ScoreRequest,
    SubjectRequest, SubjectResponse, UpdateUserRequest, UserResponse,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Study materials catalog API",
        description = "Subjects, shared study materials and peer ratings behind session authentication."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::status,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::get_user_by_username,
        crate::inbound::http::users::get_user_by_email,
        crate::inbound::http::users::username_exists,
        crate::inbound::http::users::email_exists,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::subjects::create_subject,
        crate::inbound::http::subjects::list_subjects,
        crate::inbound::http::subjects::get_subject,
        crate::inbound::http::subjects::update_subject,
        crate::inbound::http::subjects::delete_subject,
        crate::inbound::http::materials::create_material,
        crate::inbound::http::materials::list_materials,
        crate::inbound::http::materials::get_material,
        crate::inbound::http::materials::material_summary,
        crate::inbound::http::materials::update_material,
        crate::inbound::http::materials::delete_material,
        crate::inbound::http::materials::list_material_ratings,
        crate::inbound::http::materials::rate_material,
        crate::inbound::http::ratings::create_rating,
        crate::inbound::http::ratings::get_rating,
        crate::inbound::http::ratings::update_rating,
        crate::inbound::http::ratings::delete_rating,
        crate::inbound::http::ratings::list_user_ratings,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Role,
        MaterialType,
        RegisterRequest,
        LoginRequest,
        UpdateUserRequest,
        UserResponse,
        ExistsResponse,
        AuthStatusResponse,
        SubjectRequest,
        SubjectResponse,
        MaterialRequest,
        MaterialResponse,
        MaterialSummaryResponse,
        ScoreRequest,
        CreateRatingRequest,
        RatingResponse,
    )),
    tags(
        (name = "auth", description = "Registration and session login"),
        (name = "users", description = "Registered accounts"),
        (name = "subjects", description = "Topics that group materials"),
        (name = "materials", description = "Shared study materials"),
        (name = "ratings", description = "Peer scores for materials"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document's structure.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    fn schema(name: &str) -> RefOr<Schema> {
        let doc = ApiDoc::openapi();
        doc.components
            .expect("components")
            .schemas
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("{name} schema registered"))
    }

    #[rstest]
    #[case("/api/v1/auth/login")]
    #[case("/api/v1/users/{id}")]
    #[case("/api/v1/subjects")]
    #[case("/api/v1/materials/{id}/summary")]
    #[case("/api/v1/materials/{id}/ratings")]
    #[case("/api/v1/ratings/{id}")]
    #[case("/health/ready")]
    fn documents_every_route_family(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    fn error_schema_has_code_and_message() {
        let error = schema("Error");
        assert_object_schema_has_field(&error, "code");
        assert_object_schema_has_field(&error, "message");
    }

    #[rstest]
    fn material_response_uses_camel_case_fields() {
        let material = schema("MaterialResponse");
        assert_object_schema_has_field(&material, "subjectId");
        assert_object_schema_has_field(&material, "uploadedBy");
        assert_object_schema_has_field(&material, "createdAt");
    }

    #[rstest]
    fn user_response_never_exposes_password_digest() {
        let RefOr::T(Schema::Object(user)) = schema("UserResponse") else {
            panic!("expected Object schema");
        };
        assert!(user.properties.keys().all(|key| !key.contains("password")));
    }

    #[rstest]
    fn registers_session_cookie_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
