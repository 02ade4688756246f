use std::sync::Arc;

use crate::config::Config;
use crate::extract::TextExtractor;
use crate::mailer::Mailer;
use crate::scoring::ResumeScorer;
use crate::students::store::StudentStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// The record store and external collaborators (PDF extraction, AI scoring,
/// mail delivery) are held as trait objects so tests can substitute each one
/// independently.
#[derive(Clone)]
pub struct AppState {
    pub students: Arc<dyn StudentStore>,
    pub extractor: Arc<dyn TextExtractor>,
    pub scorer: Arc<dyn ResumeScorer>,
    pub mailer: Arc<dyn Mailer>,
    pub config: Config,
}
