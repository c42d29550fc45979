#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use serde::Deserialize;
use utoipa::{OpenApi, ToSchema};

use crate::{
    error::ErrorResponse,
    forms::{FieldErrors, RegistrationForm},
    models::{profile::ProfileResponse, user::UserResponse},
};

/// Multipart body accepted by the profile editor.
#[derive(Deserialize, ToSchema)]
pub struct ProfileUpload {
    /// Image file; must declare an `image/*` content type and be at most 2.5 MiB.
    #[schema(value_type = Option<String>, format = Binary)]
    pub avatar: Option<Vec<u8>>,
    pub bio: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_doc,
        register_doc,
        get_profile_doc,
        update_profile_doc
    ),
    components(
        schemas(
            RegistrationForm,
            UserResponse,
            ProfileUpload,
            ProfileResponse,
            FieldErrors,
            ErrorResponse
        )
    ),
    tags(
        (name = "Accounts", description = "Registration"),
        (name = "Profiles", description = "Avatar and biography")
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service is up", body = serde_json::Value))
)]
fn health_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegistrationForm,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Field errors under details.errors", body = ErrorResponse),
        (status = 409, description = "Username taken concurrently", body = ErrorResponse)
    ),
    tag = "Accounts"
)]
fn register_doc() {}

#[utoipa::path(
    get,
    path = "/api/users/{id}/profile",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, body = ProfileResponse),
        (status = 404, description = "No such profile", body = ErrorResponse)
    ),
    tag = "Profiles"
)]
fn get_profile_doc() {}

#[utoipa::path(
    put,
    path = "/api/users/{id}/profile",
    params(("id" = String, Path, description = "User id")),
    request_body(content = ProfileUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, body = ProfileResponse),
        (status = 400, description = "Field errors under details.errors", body = ErrorResponse),
        (status = 404, description = "No such profile", body = ErrorResponse)
    ),
    tag = "Profiles"
)]
fn update_profile_doc() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_form_endpoints() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();
        assert!(paths.contains(&"/api/auth/register".to_string()));
        assert!(paths.contains(&"/api/users/{id}/profile".to_string()));
    }
}
