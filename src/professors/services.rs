use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{AuthRequest, ProfessorSummary, RegisterRequest},
    repo_types::Professor,
};
use crate::{
    auth::{
        claims::Role,
        jwt::IssuedToken,
        password::{hash_password, verify_password},
    },
    db::StoreError,
    error::AppError,
    state::AppState,
};

#[instrument(skip_all, fields(email = %req.email))]
pub async fn register(st: &AppState, req: RegisterRequest) -> Result<ProfessorSummary, AppError> {
    if st.professors.exists_by_email(&req.email).await? {
        warn!("email already registered");
        return Err(AppError::ProfessorAlreadyExists);
    }

    let password_hash = hash_password(&req.password)?;
    let now = OffsetDateTime::now_utc();
    let professor = Professor {
        id: Uuid::new_v4(),
        name: req.name,
        email: req.email,
        password_hash,
        created_at: now,
        updated_at: now,
    };

    // a concurrent registration can still lose the race at the unique index
    let saved = st.professors.save(&professor).await.map_err(|e| match e {
        StoreError::UniqueViolation(_) => AppError::ProfessorAlreadyExists,
        other => other.into(),
    })?;

    info!(professor_id = %saved.id, "professor registered");
    Ok(saved.into())
}

/// Unknown email and wrong password fail identically.
#[instrument(skip_all, fields(email = %req.email))]
pub async fn authenticate(st: &AppState, req: AuthRequest) -> Result<IssuedToken, AppError> {
    let Some(professor) = st.professors.find_by_email(&req.email).await? else {
        warn!("login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&req.password, &professor.password_hash)? {
        warn!(professor_id = %professor.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = st
        .jwt
        .issue(&professor.id.to_string(), &[Role::Professor])?;
    info!(professor_id = %professor.id, "professor authenticated");
    Ok(token)
}

pub async fn profile(st: &AppState, professor_id: Uuid) -> Result<ProfessorSummary, AppError> {
    st.professors
        .find_by_id(professor_id)
        .await?
        .map(ProfessorSummary::from)
        .ok_or(AppError::ProfessorNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::testing::{MemoryCourses, MemoryProfessors};

    fn register_req(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Grace Hopper".into(),
            email: email.into(),
            password: password.into(),
        }
    }

    fn auth_req(email: &str, password: &str) -> AuthRequest {
        AuthRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn register_stores_hash_not_plaintext() {
        let st = AppState::fake();
        let summary = register(&st, register_req("grace@x.com", "cobol-rules"))
            .await
            .unwrap();

        assert!(st.professors.exists_by_email("grace@x.com").await.unwrap());
        let stored = st.professors.find_by_id(summary.id).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "cobol-rules");
        assert_eq!(summary.email, "grace@x.com");
        assert_eq!(summary.name, "Grace Hopper");
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let st = AppState::fake();
        register(&st, register_req("dup@x.com", "password-1"))
            .await
            .unwrap();
        let err = register(&st, register_req("dup@x.com", "password-2"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ProfessorAlreadyExists));
    }

    #[tokio::test]
    async fn email_clash_found_only_at_save_is_a_conflict() {
        let st = AppState::fake_with(
            Arc::new(MemoryProfessors::with_stale_reads()),
            Arc::new(MemoryCourses::default()),
        );
        register(&st, register_req("grace@x.com", "cobol-rules"))
            .await
            .unwrap();

        let err = register(&st, register_req("grace@x.com", "another-pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ProfessorAlreadyExists));
    }

    #[tokio::test]
    async fn email_uniqueness_is_case_sensitive() {
        let st = AppState::fake();
        register(&st, register_req("a@x.com", "password-1"))
            .await
            .unwrap();
        assert!(register(&st, register_req("A@x.com", "password-1"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn authenticate_issues_professor_token() {
        let st = AppState::fake();
        let summary = register(&st, register_req("a@x.com", "rightpw"))
            .await
            .unwrap();

        let token = authenticate(&st, auth_req("a@x.com", "rightpw"))
            .await
            .unwrap();
        let claims = st.jwt.verify(&token.access_token).unwrap();
        assert_eq!(claims.sub, summary.id.to_string());
        assert!(claims.roles.contains(&Role::Professor));
        assert!(token.expires_at > OffsetDateTime::now_utc().unix_timestamp() * 1000);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_indistinguishable() {
        let st = AppState::fake();
        register(&st, register_req("a@x.com", "rightpw"))
            .await
            .unwrap();

        let wrong_pw = authenticate(&st, auth_req("a@x.com", "wrongpw"))
            .await
            .unwrap_err();
        let unknown = authenticate(&st, auth_req("nobody@x.com", "rightpw"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_pw, AppError::InvalidCredentials));
        assert!(matches!(unknown, AppError::InvalidCredentials));
        assert_eq!(wrong_pw.to_string(), unknown.to_string());
        assert_eq!(wrong_pw.status(), unknown.status());
    }

    #[tokio::test]
    async fn profile_of_missing_professor_is_not_found() {
        let st = AppState::fake();
        let err = profile(&st, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::ProfessorNotFound));
    }
}
