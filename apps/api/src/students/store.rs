//! Record store for student entities.
//!
//! The store is trait-abstracted so handlers never care whether they are
//! talking to PostgreSQL or the in-memory double the tests use. Every
//! id-keyed operation takes the caller's `uid` and matches it against the
//! record's owner: another user's student is indistinguishable from an
//! absent one.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::students::models::{NewStudent, Student, StudentUpdate};

#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Persists a new student and returns it with its generated id.
    async fn create(&self, new: NewStudent) -> Result<Student, AppError>;

    /// All students owned by `uid`, oldest first.
    async fn list(&self, uid: &str) -> Result<Vec<Student>, AppError>;

    /// Single student by id, `None` if absent or owned by someone else.
    async fn get(&self, id: Uuid, uid: &str) -> Result<Option<Student>, AppError>;

    /// Merges the provided fields into an existing student. Unspecified
    /// fields keep their prior values. `None` if absent or not owned.
    async fn update(
        &self,
        id: Uuid,
        uid: &str,
        patch: StudentUpdate,
    ) -> Result<Option<Student>, AppError>;

    /// Hard delete. Returns whether a record was removed.
    async fn delete(&self, id: Uuid, uid: &str) -> Result<bool, AppError>;
}

/// PostgreSQL-backed store used in production.
pub struct PgStudentStore {
    pool: PgPool,
}

impl PgStudentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentStore for PgStudentStore {
    async fn create(&self, new: NewStudent) -> Result<Student, AppError> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (id, name, email, uid, jd, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, email, uid, jd, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.uid)
        .bind(&new.jd)
        .bind(chrono::Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(student)
    }

    async fn list(&self, uid: &str) -> Result<Vec<Student>, AppError> {
        let students = sqlx::query_as::<_, Student>(
            "SELECT id, name, email, uid, jd, created_at FROM students WHERE uid = $1 ORDER BY created_at",
        )
        .bind(uid)
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    async fn get(&self, id: Uuid, uid: &str) -> Result<Option<Student>, AppError> {
        let student = sqlx::query_as::<_, Student>(
            "SELECT id, name, email, uid, jd, created_at FROM students WHERE id = $1 AND uid = $2",
        )
        .bind(id)
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    async fn update(
        &self,
        id: Uuid,
        uid: &str,
        patch: StudentUpdate,
    ) -> Result<Option<Student>, AppError> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            UPDATE students
            SET name = COALESCE($3, name),
                email = COALESCE($4, email),
                jd = COALESCE($5, jd)
            WHERE id = $1 AND uid = $2
            RETURNING id, name, email, uid, jd, created_at
            "#,
        )
        .bind(id)
        .bind(uid)
        .bind(patch.name)
        .bind(patch.email)
        .bind(patch.jd)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    async fn delete(&self, id: Uuid, uid: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1 AND uid = $2")
            .bind(id)
            .bind(uid)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
