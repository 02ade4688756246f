use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A student record. `uid` is the owning user's identity, assigned once at
/// creation from the decoded bearer token and never changed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub uid: String,
    pub jd: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new student, assembled by the create handler.
#[derive(Debug, Clone)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub uid: String,
    pub jd: String,
}

/// Partial update body: only provided fields are merged into the record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub jd: Option<String>,
}
