use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, patch, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{CourseQuery, CourseSummary, CreateCourseRequest, EditCourseRequest},
    services,
};
use crate::{
    auth::extractors::RequireProfessor,
    error::{AppError, ErrorBody},
    state::AppState,
    validation::{PathParam, ValidatedJson},
};

// listing is public; every other route requires the professor role
pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses).post(create_course))
        .route("/courses/:id", put(edit_course).delete(delete_course))
        .route("/courses/:id/active", patch(toggle_course_active))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses",
    params(CourseQuery),
    responses(
        (status = 200, description = "Courses matching the filters, oldest first", body = [CourseSummary]),
        (status = 401, description = "Authorization header present but invalid", body = ErrorBody)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<CourseQuery>,
) -> Result<Json<Vec<CourseSummary>>, AppError> {
    let courses = services::list_courses(&state, query).await?;
    Ok(Json(courses))
}

#[utoipa::path(
    post,
    path = "/api/v1/courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseSummary),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Token lacks the PROFESSOR role", body = ErrorBody),
        (status = 404, description = "Professor not found", body = ErrorBody),
        (status = 409, description = "Course name already taken", body = ErrorBody)
    ),
    security(("jwt_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip_all, fields(professor_id = %principal.id))]
pub async fn create_course(
    State(state): State<AppState>,
    RequireProfessor(principal): RequireProfessor,
    ValidatedJson(payload): ValidatedJson<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseSummary>), AppError> {
    let course = services::create_course(&state, principal.id, payload).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

#[utoipa::path(
    put,
    path = "/api/v1/courses/{id}",
    params(("id" = Uuid, Path, description = "Course id")),
    request_body = EditCourseRequest,
    responses(
        (status = 200, description = "Course updated", body = CourseSummary),
        (status = 400, description = "Invalid edit or not the owner", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Token lacks the PROFESSOR role", body = ErrorBody),
        (status = 404, description = "Professor or course not found", body = ErrorBody),
        (status = 409, description = "Course name already taken", body = ErrorBody)
    ),
    security(("jwt_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip_all, fields(professor_id = %principal.id, course_id = %id))]
pub async fn edit_course(
    State(state): State<AppState>,
    RequireProfessor(principal): RequireProfessor,
    PathParam(id): PathParam<Uuid>,
    ValidatedJson(payload): ValidatedJson<EditCourseRequest>,
) -> Result<Json<CourseSummary>, AppError> {
    let course = services::edit_course(&state, id, principal.id, payload).await?;
    Ok(Json(course))
}

#[utoipa::path(
    delete,
    path = "/api/v1/courses/{id}",
    params(("id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 400, description = "Not the owner", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Token lacks the PROFESSOR role", body = ErrorBody),
        (status = 404, description = "Professor or course not found", body = ErrorBody)
    ),
    security(("jwt_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip_all, fields(professor_id = %principal.id, course_id = %id))]
pub async fn delete_course(
    State(state): State<AppState>,
    RequireProfessor(principal): RequireProfessor,
    PathParam(id): PathParam<Uuid>,
) -> Result<StatusCode, AppError> {
    services::delete_course(&state, id, principal.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/v1/courses/{id}/active",
    params(("id" = Uuid, Path, description = "Course id")),
    responses(
        (status = 204, description = "Active flag flipped"),
        (status = 400, description = "Not the owner", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Token lacks the PROFESSOR role", body = ErrorBody),
        (status = 404, description = "Professor or course not found", body = ErrorBody)
    ),
    security(("jwt_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip_all, fields(professor_id = %principal.id, course_id = %id))]
pub async fn toggle_course_active(
    State(state): State<AppState>,
    RequireProfessor(principal): RequireProfessor,
    PathParam(id): PathParam<Uuid>,
) -> Result<StatusCode, AppError> {
    services::toggle_course_active(&state, id, principal.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
