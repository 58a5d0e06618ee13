//! Evaluation pipeline — Extractor → Composer → Evaluator → interpretation.
//!
//! Every submission is an independent, stateless run. Preconditions are checked
//! before any work: a missing upload short-circuits before extraction, a blank
//! job description short-circuits before extraction and the evaluator call.
//! Each stage runs at most once.

use bytes::Bytes;
use tokio::task::JoinError;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::evaluation::prompts::compose_prompt;
use crate::evaluation::result::{interpret_response, Evaluation, ParseMode};
use crate::extractor::{extract_text, is_pdf, ExtractError};
use crate::llm_client::Evaluator;

pub const MISSING_RESUME_WARNING: &str = "Please upload a resume PDF.";
pub const MISSING_JD_WARNING: &str = "Please paste the job description.";

/// The uploaded resume file as received from the form.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl ResumeUpload {
    fn is_pdf(&self) -> bool {
        let head = &self.bytes[..self.bytes.len().min(8)];
        is_pdf(self.content_type.as_deref(), self.file_name.as_deref(), head)
    }
}

/// One user submission: the job description and, if provided, the resume.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub job_description: String,
    pub resume: Option<ResumeUpload>,
}

/// Runs the full pipeline for one submission.
pub async fn evaluate_submission(
    submission: Submission,
    evaluator: &dyn Evaluator,
    mode: ParseMode,
) -> Result<Evaluation, AppError> {
    let resume = match submission.resume {
        Some(upload) if !upload.bytes.is_empty() => upload,
        _ => return Err(AppError::Precondition(MISSING_RESUME_WARNING.to_string())),
    };

    if submission.job_description.trim().is_empty() {
        return Err(AppError::Precondition(MISSING_JD_WARNING.to_string()));
    }

    if !resume.is_pdf() {
        return Err(AppError::UnsupportedDocument(format!(
            "'{}' is not a PDF; only PDF resumes are accepted",
            resume.file_name.as_deref().unwrap_or("upload")
        )));
    }

    let bytes = resume.bytes;
    let resume_text = tokio::task::spawn_blocking(move || extract_text(&bytes))
        .await
        .map_err(extraction_join_error)??;

    let prompt = compose_prompt(&resume_text, &submission.job_description);
    debug!(
        "Composed prompt: {} chars (resume {} chars, jd {} chars)",
        prompt.len(),
        resume_text.len(),
        submission.job_description.len()
    );

    let raw = evaluator.evaluate(&prompt).await?;
    let evaluation = interpret_response(&raw, mode);

    info!(
        "Evaluation complete: {}",
        match &evaluation {
            Evaluation::Structured { .. } => "structured",
            Evaluation::RawText { .. } => "raw_text",
        }
    );

    Ok(evaluation)
}

/// A panic inside the extraction task comes from the PDF parser choking on the
/// upload, so it is reported as an unreadable document.
fn extraction_join_error(e: JoinError) -> AppError {
    if e.is_panic() {
        AppError::DocumentFormat(ExtractError::Malformed(format!("extraction aborted: {e}")))
    } else {
        AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extraction: {e}"))
    }
}

#[cfg(test)]
pub mod stub {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::llm_client::{Evaluator, ServiceError};

    /// Counting evaluator with a canned reply. `reply: None` simulates a failed call.
    pub struct StubEvaluator {
        reply: Option<String>,
        calls: AtomicUsize,
        last_prompt: Mutex<Option<String>>,
    }

    impl StubEvaluator {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }

        pub fn failing() -> Self {
            Self {
                reply: None,
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_prompt(&self) -> Option<String> {
            self.last_prompt.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Evaluator for StubEvaluator {
        async fn evaluate(&self, prompt: &str) -> Result<String, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
            self.reply.clone().ok_or(ServiceError::Api {
                status: 429,
                message: "Resource has been exhausted (e.g. check quota).".to_string(),
            })
        }
    }
}
