use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{error, info, instrument, warn};

use super::domain::QuoteSubmission;
use super::normalizer::normalize;
use super::pipeline::{
    FailureKind, PipelineStage, StageTracker, SubmissionReport, SubmissionResult,
    UNKNOWN_ERROR_MESSAGE,
};
use super::repository::{QuoteSink, SinkError, StoredQuote, SubmissionSummary};
use super::schema::{validate, ValidationErrors};

/// Runs quote submissions against a sink and serves the submissions listing.
pub struct QuoteIntakeService<S> {
    sink: Arc<S>,
}

impl<S> QuoteIntakeService<S>
where
    S: QuoteSink + 'static,
{
    pub fn new(sink: Arc<S>) -> Self {
        Self { sink }
    }

    /// Validate, normalize and persist one quote request.
    pub async fn submit(&self, submission: QuoteSubmission) -> SubmissionResult {
        self.submit_traced(submission).await.result
    }

    /// Same as [`submit`](Self::submit) but also returns the stages the request went through.
    pub async fn submit_traced(&self, submission: QuoteSubmission) -> SubmissionReport {
        let mut tracker = StageTracker::new();
        let outcome = AssertUnwindSafe(self.run(submission, &mut tracker))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                Err(SubmissionError::Unexpected(panic_message(payload.as_ref())))
            });

        let result = match outcome {
            Ok(stored) => {
                tracker.advance(PipelineStage::Succeeded);
                info!(quote_id = %stored.id, "quote request stored");
                SubmissionResult::succeeded(stored)
            }
            Err(err) => {
                tracker.advance(PipelineStage::Failed);
                match err.kind() {
                    FailureKind::Validation => warn!(%err, "quote request rejected"),
                    FailureKind::Persistence | FailureKind::Unexpected => {
                        error!(%err, "quote request could not be stored")
                    }
                }
                SubmissionResult::failed(&err)
            }
        };

        SubmissionReport {
            result,
            stages: tracker.into_history(),
        }
    }

    #[instrument(skip_all)]
    async fn run(
        &self,
        submission: QuoteSubmission,
        tracker: &mut StageTracker,
    ) -> Result<StoredQuote, SubmissionError> {
        tracker.advance(PipelineStage::Validating);
        let request = validate(&submission)?;

        tracker.advance(PipelineStage::Normalizing);
        let row = normalize(&request);

        tracker.advance(PipelineStage::Persisting);
        let stored = self.sink.insert(row).await?;
        Ok(stored)
    }

    /// Stored submissions for the admin listing, newest first.
    pub async fn submissions(&self) -> Result<Vec<SubmissionSummary>, SinkError> {
        let mut stored = self.sink.submissions().await.map_err(|err| {
            error!(%err, "failed to fetch quote submissions");
            err
        })?;
        stored.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(stored.iter().map(StoredQuote::summary).collect())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        UNKNOWN_ERROR_MESSAGE.to_string()
    }
}

/// Error raised by the submission pipeline.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Persistence(#[from] SinkError),
    #[error("{0}")]
    Unexpected(String),
}

impl SubmissionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SubmissionError::Validation(_) => FailureKind::Validation,
            SubmissionError::Persistence(_) => FailureKind::Persistence,
            SubmissionError::Unexpected(_) => FailureKind::Unexpected,
        }
    }
}
