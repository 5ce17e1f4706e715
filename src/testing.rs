//! In-memory stores for unit tests. They enforce the same unique rules as
//! the database indexes.
//!
//! `with_stale_reads` builds a store whose existence checks always answer
//! `false`, so a duplicate only surfaces at `save`, the way a concurrent
//! writer slipping in between check and insert does against Postgres.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::courses::{repo::CourseRepo, repo_types::Course};
use crate::db::StoreError;
use crate::professors::{repo::ProfessorRepo, repo_types::Professor};

#[derive(Default)]
pub struct MemoryProfessors {
    rows: Mutex<HashMap<Uuid, Professor>>,
    stale_reads: bool,
}

impl MemoryProfessors {
    pub fn with_stale_reads() -> Self {
        Self {
            stale_reads: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ProfessorRepo for MemoryProfessors {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Professor>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Professor>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.values().find(|p| p.email == email).cloned())
    }

    async fn exists_by_email(&self, email: &str) -> anyhow::Result<bool> {
        if self.stale_reads {
            return Ok(false);
        }
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn save(&self, professor: &Professor) -> Result<Professor, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .values()
            .any(|p| p.id != professor.id && p.email == professor.email)
        {
            return Err(StoreError::UniqueViolation("professors_email_key".into()));
        }
        rows.insert(professor.id, professor.clone());
        Ok(professor.clone())
    }
}

/// Rows kept in insertion order.
#[derive(Default)]
pub struct MemoryCourses {
    rows: Mutex<Vec<Course>>,
    stale_reads: bool,
}

impl MemoryCourses {
    pub fn with_stale_reads() -> Self {
        Self {
            stale_reads: true,
            ..Self::default()
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    needle.map_or(true, |n| haystack.to_lowercase().contains(&n.to_lowercase()))
}

#[async_trait]
impl CourseRepo for MemoryCourses {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Course>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|c| c.id == id).cloned())
    }

    async fn exists_by_id(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    async fn exists_by_name_ignore_case(&self, name: &str) -> anyhow::Result<bool> {
        if self.stale_reads {
            return Ok(false);
        }
        let name = name.to_lowercase();
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().any(|c| c.name.to_lowercase() == name))
    }

    async fn search(
        &self,
        name: Option<&str>,
        category: Option<&str>,
    ) -> anyhow::Result<Vec<Course>> {
        let rows = self.rows.lock().unwrap();
        let mut found: Vec<Course> = rows
            .iter()
            .filter(|c| contains_ignore_case(&c.name, name))
            .filter(|c| contains_ignore_case(&c.category, category))
            .cloned()
            .collect();
        found.sort_by_key(|c| (c.created_at, c.id));
        Ok(found)
    }

    async fn save(&self, course: &Course) -> Result<Course, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let lowered = course.name.to_lowercase();
        if rows
            .iter()
            .any(|c| c.id != course.id && c.name.to_lowercase() == lowered)
        {
            return Err(StoreError::UniqueViolation("courses_name_lower_key".into()));
        }
        match rows.iter_mut().find(|c| c.id == course.id) {
            Some(existing) => *existing = course.clone(),
            None => rows.push(course.clone()),
        }
        Ok(course.clone())
    }

    async fn delete_by_id(&self, id: Uuid) -> anyhow::Result<()> {
        self.rows.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn course_named(name: &str) -> Course {
        let now = OffsetDateTime::now_utc();
        Course {
            id: Uuid::new_v4(),
            name: name.into(),
            category: "General".into(),
            active: true,
            professor_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn course_store_enforces_unique_names_like_the_index() {
        let store = MemoryCourses::default();
        store.save(&course_named("Algorithms")).await.unwrap();
        let err = store.save(&course_named("ALGORITHMS")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn search_breaks_creation_ties_by_id() {
        let store = MemoryCourses::default();
        let mut a = course_named("Algorithms");
        let mut b = course_named("Compilers");
        b.created_at = a.created_at;
        // insert the larger id first so insertion order disagrees with id order
        if a.id < b.id {
            std::mem::swap(&mut a, &mut b);
        }
        store.save(&a).await.unwrap();
        store.save(&b).await.unwrap();

        let ids: Vec<Uuid> = store
            .search(None, None)
            .await
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn stale_reads_defer_the_conflict_to_save() {
        let store = MemoryCourses::with_stale_reads();
        store.save(&course_named("Algorithms")).await.unwrap();
        assert!(!store.exists_by_name_ignore_case("algorithms").await.unwrap());
        let err = store.save(&course_named("algorithms")).await.unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn saving_existing_course_updates_in_place() {
        let store = MemoryCourses::default();
        let mut c = store.save(&course_named("Algorithms")).await.unwrap();
        c.active = false;
        store.save(&c).await.unwrap();
        let all = store.search(None, None).await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(!all[0].active);
    }
}
