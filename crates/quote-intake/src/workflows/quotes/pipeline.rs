use serde::{Deserialize, Serialize};
use tracing::debug;

use super::repository::StoredQuote;
use super::schema::FieldError;
use super::service::SubmissionError;

pub const SUCCESS_MESSAGE: &str =
    "Your quote request has been submitted successfully! Our team will contact you shortly.";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Stages a single submission moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Idle,
    Validating,
    Normalizing,
    Persisting,
    Succeeded,
    Failed,
}

impl PipelineStage {
    pub const fn label(self) -> &'static str {
        match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Validating => "validating",
            PipelineStage::Normalizing => "normalizing",
            PipelineStage::Persisting => "persisting",
            PipelineStage::Succeeded => "succeeded",
            PipelineStage::Failed => "failed",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, PipelineStage::Succeeded | PipelineStage::Failed)
    }

    pub const fn can_advance_to(self, next: PipelineStage) -> bool {
        matches!(
            (self, next),
            (PipelineStage::Idle, PipelineStage::Validating)
                | (PipelineStage::Validating, PipelineStage::Normalizing)
                | (PipelineStage::Normalizing, PipelineStage::Persisting)
                | (PipelineStage::Persisting, PipelineStage::Succeeded)
                | (PipelineStage::Idle, PipelineStage::Failed)
                | (PipelineStage::Validating, PipelineStage::Failed)
                | (PipelineStage::Normalizing, PipelineStage::Failed)
                | (PipelineStage::Persisting, PipelineStage::Failed)
        )
    }
}

/// Stage history of one submission. Owned by that submission alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTracker {
    history: Vec<PipelineStage>,
}

impl Default for StageTracker {
    fn default() -> Self {
        Self {
            history: vec![PipelineStage::Idle],
        }
    }
}

impl StageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> PipelineStage {
        self.history
            .last()
            .copied()
            .unwrap_or(PipelineStage::Idle)
    }

    pub fn history(&self) -> &[PipelineStage] {
        &self.history
    }

    pub(crate) fn advance(&mut self, next: PipelineStage) {
        let current = self.current();
        if !current.can_advance_to(next) {
            debug!(
                from = current.label(),
                to = next.label(),
                "ignoring out-of-order quote pipeline transition"
            );
            return;
        }
        debug!(from = current.label(), to = next.label(), "quote pipeline stage");
        self.history.push(next);
    }

    pub(crate) fn into_history(self) -> Vec<PipelineStage> {
        self.history
    }
}

/// Which class of problem a failed submission ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The customer has to fix their input.
    Validation,
    /// The sink refused or could not take the insert.
    Persistence,
    Unexpected,
}

/// Uniform answer handed back to the form for every submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<StoredQuote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<Vec<FieldError>>,
}

impl SubmissionResult {
    pub fn succeeded(stored: StoredQuote) -> Self {
        Self {
            success: true,
            data: Some(stored),
            message: Some(SUCCESS_MESSAGE.to_string()),
            error: None,
            failure: None,
            field_errors: None,
        }
    }

    pub fn failed(error: &SubmissionError) -> Self {
        let field_errors = match error {
            SubmissionError::Validation(errors) => Some(errors.errors().to_vec()),
            _ => None,
        };
        let message = error.to_string();

        Self {
            success: false,
            data: None,
            message: None,
            error: Some(if message.is_empty() {
                UNKNOWN_ERROR_MESSAGE.to_string()
            } else {
                message
            }),
            failure: Some(error.kind()),
            field_errors,
        }
    }

    /// Body could not be read as a quote form at all (e.g. an unparsable date).
    pub fn unreadable(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(detail.into()),
            failure: Some(FailureKind::Validation),
            field_errors: None,
        }
    }
}

/// Result plus the stage trail that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReport {
    pub result: SubmissionResult,
    pub stages: Vec<PipelineStage>,
}

impl SubmissionReport {
    pub fn final_stage(&self) -> PipelineStage {
        self.stages.last().copied().unwrap_or(PipelineStage::Idle)
    }
}
