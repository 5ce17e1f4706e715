use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::Professor;
use crate::db::StoreError;

/// Credential store. Emails are unique; a duplicate on `save` comes back as
/// [`StoreError::UniqueViolation`].
#[async_trait]
pub trait ProfessorRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Professor>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Professor>>;
    async fn exists_by_email(&self, email: &str) -> anyhow::Result<bool>;
    async fn save(&self, professor: &Professor) -> Result<Professor, StoreError>;
}

#[derive(Clone)]
pub struct PgProfessorRepo {
    db: PgPool,
}

impl PgProfessorRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfessorRepo for PgProfessorRepo {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Professor>> {
        sqlx::query_as::<_, Professor>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM professors
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find professor by id")
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Professor>> {
        sqlx::query_as::<_, Professor>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM professors
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find professor by email")
    }

    async fn exists_by_email(&self, email: &str) -> anyhow::Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS (SELECT 1 FROM professors WHERE email = $1)"#,
        )
        .bind(email)
        .fetch_one(&self.db)
        .await
        .context("check professor email")
    }

    async fn save(&self, professor: &Professor) -> Result<Professor, StoreError> {
        let saved = sqlx::query_as::<_, Professor>(
            r#"
            INSERT INTO professors (id, name, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
               SET name = EXCLUDED.name,
                   email = EXCLUDED.email,
                   password_hash = EXCLUDED.password_hash,
                   updated_at = now()
            RETURNING id, name, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(professor.id)
        .bind(&professor.name)
        .bind(&professor.email)
        .bind(&professor.password_hash)
        .bind(professor.created_at)
        .bind(professor.updated_at)
        .fetch_one(&self.db)
        .await?;
        Ok(saved)
    }
}
