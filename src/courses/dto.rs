use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::repo_types::Course;
use crate::{error::AppError, validation::not_blank};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCourseRequest {
    #[validate(
        custom(function = "not_blank"),
        length(min = 5, max = 100, message = "name must be between 5 and 100 characters")
    )]
    pub name: String,
    #[validate(
        custom(function = "not_blank"),
        length(min = 5, max = 100, message = "category must be between 5 and 100 characters")
    )]
    pub category: String,
}

/// Partial update. The length rules apply only to the fields that are sent.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct EditCourseRequest {
    #[validate(length(min = 5, max = 100, message = "name must be between 5 and 100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 5, max = 100, message = "category must be between 5 and 100 characters"))]
    pub category: Option<String>,
}

/// The single field an edit touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseChange {
    Name(String),
    Category(String),
}

impl TryFrom<EditCourseRequest> for CourseChange {
    type Error = AppError;

    fn try_from(req: EditCourseRequest) -> Result<Self, Self::Error> {
        match (req.name, req.category) {
            (Some(name), None) => Ok(CourseChange::Name(name)),
            (None, Some(category)) => Ok(CourseChange::Category(category)),
            _ => Err(AppError::InvalidCourseUpdate(
                "You must provide exactly one field: name or category".into(),
            )),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseQuery {
    /// Case-insensitive substring of the course name.
    pub name: Option<String>,
    /// Case-insensitive substring of the category.
    pub category: Option<String>,
}

impl CourseQuery {
    /// Blank filters count as absent.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|s| !s.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
pub struct CourseSummary {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Course> for CourseSummary {
    fn from(c: Course) -> Self {
        Self {
            id: c.id,
            name: c.name,
            category: c.category,
            active: c.active,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_field_is_required() {
        let both = EditCourseRequest {
            name: Some("Compilers".into()),
            category: Some("Systems".into()),
        };
        assert!(matches!(
            CourseChange::try_from(both),
            Err(AppError::InvalidCourseUpdate(_))
        ));
        assert!(matches!(
            CourseChange::try_from(EditCourseRequest::default()),
            Err(AppError::InvalidCourseUpdate(_))
        ));

        let name_only = EditCourseRequest {
            name: Some("Compilers".into()),
            category: None,
        };
        assert_eq!(
            CourseChange::try_from(name_only).unwrap(),
            CourseChange::Name("Compilers".into())
        );
    }

    #[test]
    fn edit_lengths_checked_only_when_present() {
        let req = EditCourseRequest {
            name: None,
            category: Some("Go".into()),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("category"));
        assert!(!errors.field_errors().contains_key("name"));
    }

    #[test]
    fn blank_query_filters_are_ignored() {
        let q = CourseQuery {
            name: Some("  ".into()),
            category: Some("Back".into()),
        };
        assert_eq!(q.name(), None);
        assert_eq!(q.category(), Some("Back"));
    }
}
