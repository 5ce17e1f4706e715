use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub active: bool,
    pub professor_id: Uuid, // owner, fixed at creation
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Course {
    pub fn is_owned_by(&self, professor_id: Uuid) -> bool {
        self.professor_id == professor_id
    }
}
