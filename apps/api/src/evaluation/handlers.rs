//! Axum route handlers for the Evaluation API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::evaluation::pipeline::{evaluate_submission, ResumeUpload, Submission};
use crate::evaluation::result::Evaluation;
use crate::state::AppState;

pub const JD_FIELD: &str = "job_description";
pub const RESUME_FIELD: &str = "resume";

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub submission_id: Uuid,
    pub evaluated_at: DateTime<Utc>,
    pub evaluation: Evaluation,
}

/// POST /api/v1/evaluate
///
/// Multipart form: `job_description` (text) and `resume` (PDF file).
/// Returns the structured ATS result, or the model's raw reply when it does not
/// parse. Missing inputs come back as `PRECONDITION_FAILED`.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<EvaluateResponse>, AppError> {
    let submission_id = Uuid::new_v4();
    let span = info_span!("submission", %submission_id);

    async move {
        let submission = read_submission(multipart).await?;
        let evaluation = evaluate_submission(
            submission,
            state.evaluator.as_ref(),
            state.config.parse_mode(),
        )
        .await?;

        Ok::<_, AppError>(Json(EvaluateResponse {
            submission_id,
            evaluated_at: Utc::now(),
            evaluation,
        }))
    }
    .instrument(span)
    .await
}

/// Collects the form fields. Unknown fields are skipped; a repeated field keeps the last value.
async fn read_submission(mut multipart: Multipart) -> Result<Submission, AppError> {
    let mut submission = Submission::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(JD_FIELD) => {
                submission.job_description = field.text().await?;
            }
            Some(RESUME_FIELD) => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                debug!(
                    "Received resume upload: {} bytes, content_type={:?}",
                    bytes.len(),
                    content_type
                );
                submission.resume = Some(ResumeUpload {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            other => debug!("Ignoring unknown form field {other:?}"),
        }
    }

    Ok(submission)
}
