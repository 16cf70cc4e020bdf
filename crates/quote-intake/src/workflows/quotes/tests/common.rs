use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::workflows::quotes::domain::{QuoteId, QuoteSubmission};
use crate::workflows::quotes::normalizer::QuoteRow;
use crate::workflows::quotes::repository::{QuoteSink, SinkError, StoredQuote};
use crate::workflows::quotes::service::QuoteIntakeService;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Small consignment typed out by hand, every required field filled.
pub(super) fn submission() -> QuoteSubmission {
    QuoteSubmission {
        quote_option: Some("type_list".to_string()),
        item_list: Some("Sofa, 2 beds, 10 boxes".to_string()),
        move_type: Some("within_sa".to_string()),
        nearest_branch: Some("Pretoria".to_string()),
        consignment_type: Some("few_items".to_string()),
        move_date: Some(date(2024, 6, 15)),
        first_name: Some("Thandi".to_string()),
        last_name: Some("Mokoena".to_string()),
        phone: Some("012 555 0101".to_string()),
        email: Some("thandi@example.co.za".to_string()),
        collection_address: Some("14 Jacaranda Street".to_string()),
        collection_city: Some("Pretoria".to_string()),
        collection_province: Some("Gauteng".to_string()),
        collection_country: Some("ZA".to_string()),
        collection_postal_code: Some("0181".to_string()),
        collection_location_type: Some("house".to_string()),
        delivery_city: Some("Cape Town".to_string()),
        delivery_province: Some("Western Cape".to_string()),
        delivery_country: Some("ZA".to_string()),
        delivery_location_type: Some("apartment".to_string()),
        ..QuoteSubmission::default()
    }
}

pub(super) fn survey_submission() -> QuoteSubmission {
    QuoteSubmission {
        quote_option: Some("in_home_visit".to_string()),
        survey_date: Some(date(2024, 6, 1)),
        item_list: None,
        consignment_type: Some("3_bedroom".to_string()),
        ..submission()
    }
}

pub(super) fn inventory_submission() -> QuoteSubmission {
    QuoteSubmission {
        quote_option: Some("upload_inventory".to_string()),
        inventory_file_name: Some("household-inventory.xlsx".to_string()),
        item_list: None,
        ..submission()
    }
}

pub(super) fn stored_from(row: QuoteRow, created_at: DateTime<Utc>) -> StoredQuote {
    StoredQuote {
        id: QuoteId(Uuid::new_v4()),
        created_at,
        status: "pending".to_string(),
        row,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySink {
    pub(super) records: Arc<Mutex<Vec<StoredQuote>>>,
    inserts: Arc<AtomicUsize>,
}

impl MemorySink {
    pub(super) fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub(super) fn seed(&self, stored: StoredQuote) {
        self.records
            .lock()
            .expect("sink mutex poisoned")
            .push(stored);
    }
}

#[async_trait]
impl QuoteSink for MemorySink {
    async fn insert(&self, row: QuoteRow) -> Result<StoredQuote, SinkError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        let stored = stored_from(row, Utc::now());
        self.records
            .lock()
            .expect("sink mutex poisoned")
            .push(stored.clone());
        Ok(stored)
    }

    async fn submissions(&self) -> Result<Vec<StoredQuote>, SinkError> {
        Ok(self.records.lock().expect("sink mutex poisoned").clone())
    }
}

pub(super) struct RejectingSink(pub(super) &'static str);

#[async_trait]
impl QuoteSink for RejectingSink {
    async fn insert(&self, _row: QuoteRow) -> Result<StoredQuote, SinkError> {
        Err(SinkError::Rejected(self.0.to_string()))
    }

    async fn submissions(&self) -> Result<Vec<StoredQuote>, SinkError> {
        Err(SinkError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct PanickingSink;

#[async_trait]
impl QuoteSink for PanickingSink {
    async fn insert(&self, _row: QuoteRow) -> Result<StoredQuote, SinkError> {
        panic!("sink driver crashed");
    }

    async fn submissions(&self) -> Result<Vec<StoredQuote>, SinkError> {
        Ok(Vec::new())
    }
}

pub(super) fn build_service() -> (QuoteIntakeService<MemorySink>, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::default());
    let service = QuoteIntakeService::new(sink.clone());
    (service, sink)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
