//! Test doubles and fixtures shared by the in-tree test modules.
//!
//! Mirrors the production seams: each external collaborator gets a stub, and
//! the record store gets an in-memory implementation, so router-level tests
//! run without PostgreSQL or any network access.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::auth::Claims;
use crate::config::Config;
use crate::errors::AppError;
use crate::extract::TextExtractor;
use crate::mailer::{MailInfo, Mailer};
use crate::scoring::{Evaluation, ResumeScorer};
use crate::state::AppState;
use crate::students::models::{NewStudent, Student, StudentUpdate};
use crate::students::store::StudentStore;

pub const TEST_JWT_SECRET: &str = "test-secret-key-that-is-long-enough";
pub const MULTIPART_BOUNDARY: &str = "studentdesk-test-boundary";

/// In-memory record store. Insertion order doubles as creation order.
#[derive(Default)]
pub struct MemoryStudentStore {
    records: Mutex<Vec<Student>>,
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn create(&self, new: NewStudent) -> Result<Student, AppError> {
        let student = Student {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            uid: new.uid,
            jd: new.jd,
            created_at: Utc::now(),
        };
        self.records.lock().await.push(student.clone());
        Ok(student)
    }

    async fn list(&self, uid: &str) -> Result<Vec<Student>, AppError> {
        let records = self.records.lock().await;
        Ok(records.iter().filter(|s| s.uid == uid).cloned().collect())
    }

    async fn get(&self, id: Uuid, uid: &str) -> Result<Option<Student>, AppError> {
        let records = self.records.lock().await;
        Ok(records.iter().find(|s| s.id == id && s.uid == uid).cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        uid: &str,
        patch: StudentUpdate,
    ) -> Result<Option<Student>, AppError> {
        let mut records = self.records.lock().await;
        let Some(student) = records.iter_mut().find(|s| s.id == id && s.uid == uid) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            student.name = name;
        }
        if let Some(email) = patch.email {
            student.email = email;
        }
        if let Some(jd) = patch.jd {
            student.jd = jd;
        }
        Ok(Some(student.clone()))
    }

    async fn delete(&self, id: Uuid, uid: &str) -> Result<bool, AppError> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|s| !(s.id == id && s.uid == uid));
        Ok(records.len() < before)
    }
}

/// Extractor double returning a fixed text for any upload.
pub struct StubExtractor {
    pub text: String,
}

impl Default for StubExtractor {
    fn default() -> Self {
        Self {
            text: "Mocked PDF content".to_string(),
        }
    }
}

#[async_trait]
impl TextExtractor for StubExtractor {
    async fn extract_text(&self, _bytes: Bytes) -> Result<String, AppError> {
        Ok(self.text.clone())
    }
}

/// Scorer double returning a fixed evaluation.
pub struct StubScorer;

#[async_trait]
impl ResumeScorer for StubScorer {
    async fn score(&self, _resume_text: &str, _jd_text: &str) -> Result<Evaluation, AppError> {
        Ok(Evaluation {
            jd_match: "85%".to_string(),
            profile_summary: "Mock profile summary".to_string(),
            missing_keywords: vec!["keyword1".to_string(), "keyword2".to_string()],
        })
    }
}

/// Mailer double recording every send.
#[derive(Default)]
pub struct StubMailer {
    sent: Mutex<Vec<(String, String, String)>>,
}

impl StubMailer {
    pub async fn sent(&self) -> Vec<(String, String, String)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for StubMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<MailInfo, AppError> {
        self.sent
            .lock()
            .await
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(MailInfo {
            message_id: "mock-message-id".to_string(),
            accepted: vec![to.to_string()],
        })
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        gemini_api_key: "unused".to_string(),
        mail_api_url: "http://mail.invalid".to_string(),
        mail_api_key: "unused".to_string(),
        mail_from: "noreply@test.com".to_string(),
        port: 0,
        rust_log: "debug".to_string(),
    }
}

/// App state wired entirely with doubles, plus handles to the ones tests
/// inspect afterwards.
pub fn test_state() -> (AppState, Arc<MemoryStudentStore>, Arc<StubMailer>) {
    let store = Arc::new(MemoryStudentStore::default());
    let mailer = Arc::new(StubMailer::default());
    let state = AppState {
        students: store.clone(),
        extractor: Arc::new(StubExtractor::default()),
        scorer: Arc::new(StubScorer),
        mailer: mailer.clone(),
        config: test_config(),
    };
    (state, store, mailer)
}

/// Signs a bearer token for `user_id` with the test secret.
pub fn auth_token(user_id: &str) -> String {
    let claims = Claims {
        user_id: user_id.to_string(),
        exp: (Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode test token")
}

/// Builds a `multipart/form-data` body with the given text fields and an
/// optional `file` part, using [`MULTIPART_BOUNDARY`].
pub fn multipart_body(fields: &[(&str, &str)], file: Option<&[u8]>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(bytes) = file {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"upload.pdf\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}
