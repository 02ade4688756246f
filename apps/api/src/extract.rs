//! PDF text extraction behind a narrow trait so tests can substitute a stub.

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::AppError;

#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extracts plain text from an uploaded document.
    async fn extract_text(&self, bytes: Bytes) -> Result<String, AppError>;
}

/// Production extractor wrapping `pdf-extract`. Parsing is CPU-bound, so it
/// runs on the blocking pool.
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract_text(&self, bytes: Bytes) -> Result<String, AppError> {
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| AppError::Extraction(format!("extraction task failed: {e}")))?
            .map_err(|e| AppError::Extraction(format!("PDF text extraction failed: {e}")))?;

        Ok(text)
    }
}
