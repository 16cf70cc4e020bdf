//! Relocation quote intake: schema validation, quote-option resolution, row normalization,
//! and the submission pipeline that writes to the quote sink.

pub mod domain;
pub mod normalizer;
pub mod pipeline;
pub mod repository;
pub mod resolver;
pub mod router;
pub mod schema;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AddressDetails, Branch, Choice, ConsignmentType, ContactDetails, Country, LocationType,
    MoveType, PackingService, PayingEntity, Province, QuoteId, QuoteMethod, QuoteOption,
    QuoteRequest, QuoteSubmission, ServiceOptions, StorageRequired,
};
pub use normalizer::{format_calendar_date, normalize, QuoteRow};
pub use pipeline::{
    FailureKind, PipelineStage, StageTracker, SubmissionReport, SubmissionResult,
    SUCCESS_MESSAGE, UNKNOWN_ERROR_MESSAGE,
};
pub use repository::{QuoteSink, SinkError, StoredQuote, SubmissionSummary};
pub use resolver::ActiveInput;
pub use router::quote_router;
pub use schema::{validate, FieldError, FieldErrorKind, ValidationErrors, MAX_TEXT_LENGTH};
pub use service::{QuoteIntakeService, SubmissionError};
