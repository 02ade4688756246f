//! Axum route handlers for the Student API.
//!
//! Each handler is a thin translation between HTTP and the record store,
//! optionally calling one external collaborator. The owning `uid` always
//! comes from the auth guard's `AuthUser` extension, never from the request
//! body.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Extension, Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::mailer::MailInfo;
use crate::scoring::Evaluation;
use crate::state::AppState;
use crate::students::models::{NewStudent, Student, StudentUpdate};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateStudentResponse {
    #[serde(flatten)]
    pub student: Student,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<Evaluation>,
}

#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    pub info: MailInfo,
}

/// Text fields plus at most one uploaded file, read out of a multipart body.
#[derive(Debug, Default)]
struct UploadForm {
    name: Option<String>,
    email: Option<String>,
    jd: Option<String>,
    file: Option<Bytes>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => form.name = Some(read_text(field).await?),
            "email" => form.email = Some(read_text(field).await?),
            "jd" => form.jd = Some(read_text(field).await?),
            "file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
                form.file = Some(bytes);
            }
            _ => {} // unknown fields ignored
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart field: {e}")))
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Student {id} not found"))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/students
pub async fn list_students(
    State(state): State<AppState>,
    Extension(AuthUser(uid)): Extension<AuthUser>,
) -> Result<Json<Vec<Student>>, AppError> {
    let students = state.students.list(&uid).await?;
    Ok(Json(students))
}

/// GET /api/students/:id
pub async fn get_student(
    State(state): State<AppState>,
    Extension(AuthUser(uid)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Student>, AppError> {
    let student = state
        .students
        .get(id, &uid)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(student))
}

/// POST /api/students (multipart)
///
/// Accepts `name`, `email`, an optional `jd` text field, and an optional
/// `file` upload. A submitted `jd` field wins; without one, the uploaded
/// document's extracted text becomes the job description. When both a resume
/// file and a jd are present, the resume is scored against the jd and the
/// evaluation is included in the response.
///
/// External calls run before the insert, so a failed extraction or scoring
/// call leaves no partial record.
pub async fn create_student(
    State(state): State<AppState>,
    Extension(AuthUser(uid)): Extension<AuthUser>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CreateStudentResponse>), AppError> {
    let form = read_upload_form(multipart).await?;

    let name = form
        .name
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation("name is required".to_string()))?;
    let email = form
        .email
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation("email is required".to_string()))?;

    let extracted = match form.file {
        Some(bytes) => Some(state.extractor.extract_text(bytes).await?),
        None => None,
    };

    let (jd, resume_text) = match (form.jd, extracted) {
        (Some(jd), extracted) => (jd, extracted),
        (None, Some(text)) => (text, None),
        (None, None) => (String::new(), None),
    };

    let evaluation = match &resume_text {
        Some(resume) if !jd.trim().is_empty() => Some(state.scorer.score(resume, &jd).await?),
        _ => None,
    };

    let student = state
        .students
        .create(NewStudent {
            name,
            email,
            uid,
            jd,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateStudentResponse {
            student,
            evaluation,
        }),
    ))
}

/// PUT /api/students/:id
pub async fn update_student(
    State(state): State<AppState>,
    Extension(AuthUser(uid)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(patch): Json<StudentUpdate>,
) -> Result<Json<Student>, AppError> {
    let student = state
        .students
        .update(id, &uid, patch)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(student))
}

/// DELETE /api/students/:id
pub async fn delete_student(
    State(state): State<AppState>,
    Extension(AuthUser(uid)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if !state.students.delete(id, &uid).await? {
        return Err(not_found(id));
    }
    Ok(Json(json!({ "message": "Student deleted successfully" })))
}

/// POST /api/students/send-email/:id
///
/// Looks the student up for their address, then hands the message to the
/// mail collaborator. Nothing is persisted, so a mail failure surfaces as a
/// server error with the record untouched.
pub async fn send_student_email(
    State(state): State<AppState>,
    Extension(AuthUser(uid)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<SendEmailRequest>,
) -> Result<Json<SendEmailResponse>, AppError> {
    let student = state
        .students
        .get(id, &uid)
        .await?
        .ok_or_else(|| not_found(id))?;

    let info = state
        .mailer
        .send(&student.email, &req.subject, &req.message)
        .await?;

    Ok(Json(SendEmailResponse { info }))
}

/// POST /api/students/evaluate/:id (multipart)
///
/// Accepts a required `file` (resume PDF) and an optional `jd` text field;
/// without one, the student's stored job description is used.
pub async fn evaluate_student(
    State(state): State<AppState>,
    Extension(AuthUser(uid)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<Evaluation>, AppError> {
    let form = read_upload_form(multipart).await?;

    let student = state
        .students
        .get(id, &uid)
        .await?
        .ok_or_else(|| not_found(id))?;

    let bytes = form
        .file
        .ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;

    let jd = form
        .jd
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(student.jd);
    if jd.trim().is_empty() {
        return Err(AppError::Validation(
            "no job description available for this student".to_string(),
        ));
    }

    let resume_text = state.extractor.extract_text(bytes).await?;
    let evaluation = state.scorer.score(&resume_text, &jd).await?;

    Ok(Json(evaluation))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
