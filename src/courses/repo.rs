use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::Course;
use crate::db::StoreError;

/// Course store. Names are unique ignoring case; a clash on `save` comes
/// back as [`StoreError::UniqueViolation`].
#[async_trait]
pub trait CourseRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Course>>;
    async fn exists_by_id(&self, id: Uuid) -> anyhow::Result<bool>;
    async fn exists_by_name_ignore_case(&self, name: &str) -> anyhow::Result<bool>;
    /// Case-insensitive substring match; `None` matches everything.
    /// Ordered by creation time, then id.
    async fn search(
        &self,
        name: Option<&str>,
        category: Option<&str>,
    ) -> anyhow::Result<Vec<Course>>;
    async fn save(&self, course: &Course) -> Result<Course, StoreError>;
    async fn delete_by_id(&self, id: Uuid) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct PgCourseRepo {
    db: PgPool,
}

impl PgCourseRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// `%term%` with LIKE metacharacters escaped, so filters match literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

#[async_trait]
impl CourseRepo for PgCourseRepo {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Course>> {
        sqlx::query_as::<_, Course>(
            r#"
            SELECT id, name, category, active, professor_id, created_at, updated_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find course by id")
    }

    async fn exists_by_id(&self, id: Uuid) -> anyhow::Result<bool> {
        sqlx::query_scalar::<_, bool>(r#"SELECT EXISTS (SELECT 1 FROM courses WHERE id = $1)"#)
            .bind(id)
            .fetch_one(&self.db)
            .await
            .context("check course id")
    }

    async fn exists_by_name_ignore_case(&self, name: &str) -> anyhow::Result<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS (SELECT 1 FROM courses WHERE LOWER(name) = LOWER($1))"#,
        )
        .bind(name)
        .fetch_one(&self.db)
        .await
        .context("check course name")
    }

    async fn search(
        &self,
        name: Option<&str>,
        category: Option<&str>,
    ) -> anyhow::Result<Vec<Course>> {
        sqlx::query_as::<_, Course>(
            r#"
            SELECT id, name, category, active, professor_id, created_at, updated_at
            FROM courses
            WHERE ($1::text IS NULL OR name ILIKE $1 ESCAPE '\')
              AND ($2::text IS NULL OR category ILIKE $2 ESCAPE '\')
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(name.map(like_pattern))
        .bind(category.map(like_pattern))
        .fetch_all(&self.db)
        .await
        .context("search courses")
    }

    async fn save(&self, course: &Course) -> Result<Course, StoreError> {
        let saved = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (id, name, category, active, professor_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
               SET name = EXCLUDED.name,
                   category = EXCLUDED.category,
                   active = EXCLUDED.active,
                   updated_at = EXCLUDED.updated_at
            RETURNING id, name, category, active, professor_id, created_at, updated_at
            "#,
        )
        .bind(course.id)
        .bind(&course.name)
        .bind(&course.category)
        .bind(course.active)
        .bind(course.professor_id)
        .bind(course.created_at)
        .bind(course.updated_at)
        .fetch_one(&self.db)
        .await?;
        Ok(saved)
    }

    async fn delete_by_id(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query(r#"DELETE FROM courses WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete course")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_wraps_term() {
        assert_eq!(like_pattern("java"), "%java%");
    }

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("100%_done\\"), "%100\\%\\_done\\\\%");
    }
}
