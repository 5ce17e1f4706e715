use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{AuthRequest, ProfessorSummary, RegisterRequest},
    services,
};
use crate::{
    auth::{extractors::RequireProfessor, jwt::IssuedToken},
    error::{AppError, ErrorBody},
    state::AppState,
    validation::ValidatedJson,
};

pub fn professor_routes() -> Router<AppState> {
    Router::new()
        .route("/professors", post(register))
        .route("/professors/auth", post(authenticate))
        .route("/professors/me", get(me))
}

#[utoipa::path(
    post,
    path = "/api/v1/professors",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Professor registered", body = ProfessorSummary),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    ),
    tag = "Professors"
)]
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ProfessorSummary>), AppError> {
    let professor = services::register(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(professor)))
}

#[utoipa::path(
    post,
    path = "/api/v1/professors/auth",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Access token issued", body = IssuedToken),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    ),
    tag = "Professors"
)]
#[instrument(skip(state, payload))]
pub async fn authenticate(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AuthRequest>,
) -> Result<Json<IssuedToken>, AppError> {
    let token = services::authenticate(&state, payload).await?;
    Ok(Json(token))
}

#[utoipa::path(
    get,
    path = "/api/v1/professors/me",
    responses(
        (status = 200, description = "Profile of the calling professor", body = ProfessorSummary),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 403, description = "Token lacks the PROFESSOR role", body = ErrorBody),
        (status = 404, description = "Professor not found", body = ErrorBody)
    ),
    security(("jwt_auth" = [])),
    tag = "Professors"
)]
#[instrument(skip_all, fields(professor_id = %principal.id))]
pub async fn me(
    State(state): State<AppState>,
    RequireProfessor(principal): RequireProfessor,
) -> Result<Json<ProfessorSummary>, AppError> {
    let professor = services::profile(&state, principal.id).await?;
    Ok(Json(professor))
}
