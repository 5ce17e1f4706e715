use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::repo_types::Professor;
use crate::validation::not_blank;

/// Request body for professor registration.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(
        custom(function = "not_blank"),
        length(min = 5, max = 100, message = "name must be between 5 and 100 characters")
    )]
    pub name: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(
        custom(function = "not_blank"),
        length(min = 5, max = 100, message = "password must be between 5 and 100 characters")
    )]
    pub password: String,
}

/// Request body for authentication.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AuthRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(custom(function = "not_blank"))]
    pub password: String,
}

/// Public part of a professor returned to the client.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
pub struct ProfessorSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Professor> for ProfessorSummary {
    fn from(p: Professor) -> Self {
        Self {
            id: p.id,
            name: p.name,
            email: p.email,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}
