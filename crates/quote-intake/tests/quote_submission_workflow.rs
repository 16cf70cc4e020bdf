use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use quote_intake::workflows::quotes::{
    FailureKind, PipelineStage, QuoteId, QuoteIntakeService, QuoteRow, QuoteSink,
    QuoteSubmission, SinkError, StoredQuote, SUCCESS_MESSAGE,
};
use uuid::Uuid;

/// Sink that stamps rows with a fixed clock, one minute apart.
#[derive(Default)]
struct ClockedSink {
    records: Mutex<Vec<StoredQuote>>,
}

#[async_trait]
impl QuoteSink for ClockedSink {
    async fn insert(&self, row: QuoteRow) -> Result<StoredQuote, SinkError> {
        let mut records = self.records.lock().expect("sink mutex poisoned");
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let stored = StoredQuote {
            id: QuoteId(Uuid::new_v4()),
            created_at: base + Duration::minutes(records.len() as i64),
            status: "pending".to_string(),
            row,
        };
        records.push(stored.clone());
        Ok(stored)
    }

    async fn submissions(&self) -> Result<Vec<StoredQuote>, SinkError> {
        Ok(self.records.lock().expect("sink mutex poisoned").clone())
    }
}

struct OfflineSink;

#[async_trait]
impl QuoteSink for OfflineSink {
    async fn insert(&self, _row: QuoteRow) -> Result<StoredQuote, SinkError> {
        Err(SinkError::Unavailable("connection refused".to_string()))
    }

    async fn submissions(&self) -> Result<Vec<StoredQuote>, SinkError> {
        Err(SinkError::Unavailable("connection refused".to_string()))
    }
}

fn form(first_name: &str) -> QuoteSubmission {
    serde_json::from_value(serde_json::json!({
        "quote_option": "in_home_visit",
        "survey_date": "2024-06-01",
        "move_type": "international",
        "nearest_branch": "Durban",
        "consignment_type": "2_bedroom",
        "move_date": "2024-06-15",
        "first_name": first_name,
        "last_name": "Naidoo",
        "phone": "031 555 0123",
        "email": "priya.naidoo@example.com",
        "collection_city": "Durban",
        "collection_province": "KwaZulu-Natal",
        "collection_country": "ZA",
        "collection_location_type": "townhouse",
        "delivery_city": "Gaborone",
        "delivery_province": "Gauteng",
        "delivery_country": "BW",
        "delivery_location_type": "house",
        "packing_service": "full",
        "storage_required": "no",
        "paying_entity": "company",
        "additional_notes": ""
    }))
    .expect("form deserializes")
}

#[tokio::test]
async fn survey_request_flows_through_to_the_sink() {
    let sink = Arc::new(ClockedSink::default());
    let service = QuoteIntakeService::new(sink.clone());

    let report = service.submit_traced(form("Priya")).await;

    assert_eq!(report.final_stage(), PipelineStage::Succeeded);
    assert_eq!(report.result.message.as_deref(), Some(SUCCESS_MESSAGE));
    let stored = report.result.data.expect("stored quote");
    assert_eq!(stored.row.survey_date.as_deref(), Some("2024-06-01"));
    assert_eq!(stored.row.move_date, "2024-06-15");
    assert_eq!(stored.row.item_list, None);
    assert_eq!(stored.row.additional_notes, None);
    assert_eq!(
        NaiveDate::parse_from_str(&stored.row.move_date, "%Y-%m-%d").expect("plain date"),
        NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date")
    );
}

#[tokio::test]
async fn missing_survey_date_is_caught_before_persisting() {
    let sink = Arc::new(ClockedSink::default());
    let service = QuoteIntakeService::new(sink.clone());
    let mut submission = form("Priya");
    submission.survey_date = None;

    let result = service.submit(submission).await;

    assert!(!result.success);
    assert_eq!(result.failure, Some(FailureKind::Validation));
    let fields: Vec<_> = result
        .field_errors
        .expect("field errors")
        .into_iter()
        .map(|error| error.field)
        .collect();
    assert_eq!(fields, vec!["survey_date".to_string()]);
    assert!(service.submissions().await.expect("listing").is_empty());
}

#[tokio::test]
async fn unreachable_sink_reports_its_own_message() {
    let service = QuoteIntakeService::new(Arc::new(OfflineSink));

    let result = service.submit(form("Priya")).await;

    assert!(!result.success);
    assert_eq!(result.failure, Some(FailureKind::Persistence));
    assert_eq!(result.error.as_deref(), Some("connection refused"));
    assert!(service.submissions().await.is_err());
}

#[tokio::test]
async fn listing_shows_latest_requests_first() {
    let sink = Arc::new(ClockedSink::default());
    let service = QuoteIntakeService::new(sink);

    for name in ["First", "Second", "Third"] {
        assert!(service.submit(form(name)).await.success);
    }

    let listing = service.submissions().await.expect("listing");
    let names: Vec<_> = listing
        .iter()
        .map(|summary| summary.first_name.as_str())
        .collect();
    assert_eq!(names, vec!["Third", "Second", "First"]);
    assert!(listing
        .windows(2)
        .all(|pair| pair[0].created_at > pair[1].created_at));
}
