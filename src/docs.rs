use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::jwt::IssuedToken;
use crate::courses::dto::{CourseSummary, CreateCourseRequest, EditCourseRequest};
use crate::error::{ErrorBody, FieldError};
use crate::professors::dto::{AuthRequest, ProfessorSummary, RegisterRequest};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::professors::handlers::register,
        crate::professors::handlers::authenticate,
        crate::professors::handlers::me,
        crate::courses::handlers::list_courses,
        crate::courses::handlers::create_course,
        crate::courses::handlers::edit_course,
        crate::courses::handlers::delete_course,
        crate::courses::handlers::toggle_course_active,
    ),
    components(
        schemas(
            RegisterRequest,
            AuthRequest,
            ProfessorSummary,
            IssuedToken,
            CreateCourseRequest,
            EditCourseRequest,
            CourseSummary,
            ErrorBody,
            FieldError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Professors", description = "Registration, authentication and profile"),
        (name = "Courses", description = "Course catalog; listing is public, changes are owner-only")
    ),
    info(
        title = "Course Catalog API",
        version = "0.1.0",
        description = "Professors register, authenticate with bearer tokens and manage the courses they own."
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "jwt_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        for path in [
            "/api/v1/professors",
            "/api/v1/professors/auth",
            "/api/v1/professors/me",
            "/api/v1/courses",
            "/api/v1/courses/{id}",
            "/api/v1/courses/{id}/active",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
        assert!(paths["/api/v1/courses"]["get"]["security"].is_null());
        assert!(paths["/api/v1/courses"]["post"]["security"].is_array());
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let scheme = &doc["components"]["securitySchemes"]["jwt_auth"];
        assert_eq!(scheme["type"], "http");
        assert_eq!(scheme["scheme"], "bearer");
        assert_eq!(scheme["bearerFormat"], "JWT");
    }
}
