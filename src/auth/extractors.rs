use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::warn;
use uuid::Uuid;

use super::claims::{has_role, Claims, Role};
use crate::{error::AppError, state::AppState};

/// Verified caller identity, attached to the request by [`authenticate`].
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: Uuid,
    pub claims: Claims,
}

/// Runs on every request. No Authorization header means an anonymous call;
/// a header carrying a bad token is rejected before any handler runs.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(header) = req.headers().get(AUTHORIZATION) else {
        return Ok(next.run(req).await);
    };

    let raw = header.to_str().map_err(|_| {
        warn!("non-ascii Authorization header");
        AppError::Unauthorized
    })?;

    let claims = state.jwt.verify(raw).ok_or_else(|| {
        warn!("invalid or expired token");
        AppError::Unauthorized
    })?;

    let id = Uuid::parse_str(&claims.sub).map_err(|_| {
        warn!(subject = %claims.sub, "token subject is not a professor id");
        AppError::Unauthorized
    })?;

    req.extensions_mut().insert(Principal { id, claims });
    Ok(next.run(req).await)
}

/// Extracts the authenticated professor; anonymous callers get 401 and
/// callers without the professor role get 403.
pub struct RequireProfessor(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for RequireProfessor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(AppError::Unauthorized)?;

        if !has_role(&principal.claims, Role::Professor) {
            warn!(principal_id = %principal.id, "missing PROFESSOR role");
            return Err(AppError::Forbidden);
        }

        Ok(RequireProfessor(principal))
    }
}
