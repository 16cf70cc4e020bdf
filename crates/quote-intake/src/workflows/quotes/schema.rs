use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::domain::{
    AddressDetails, AddressInput, Choice, ContactDetails, QuoteMethod, QuoteOption, QuoteRequest,
    QuoteSubmission, ServiceOptions,
};
use super::resolver::ActiveInput;

/// Upper bound, in characters, for the long free-text fields.
pub const MAX_TEXT_LENGTH: usize = 5000;

/// Inventory attachments the form accepts.
pub const INVENTORY_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "xls", "xlsx", "csv", "txt"];

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.[A-Za-z]{2,}$";

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

pub fn is_valid_email(value: &str) -> bool {
    email_pattern().is_match(value.trim())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    MissingField,
    InvalidFormat,
    InvalidValue,
    TooLong,
}

/// One failing form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
    pub message: String,
}

/// Every field that failed validation, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|error| error.field == field)
    }

    pub fn contains(&self, field: &str, kind: FieldErrorKind) -> bool {
        self.0
            .iter()
            .any(|error| error.field == field && error.kind == kind)
    }

    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|error| error.field.as_str()).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Please correct the following fields: {}",
            self.fields().join(", ")
        )
    }
}

impl std::error::Error for ValidationErrors {}

/// Field names of one address group.
struct AddressFields {
    city: (&'static str, &'static str),
    province: &'static str,
    country: &'static str,
    location_type: &'static str,
}

const COLLECTION_FIELDS: AddressFields = AddressFields {
    city: ("collection_city", "Please enter a collection city"),
    province: "collection_province",
    country: "collection_country",
    location_type: "collection_location_type",
};

const DELIVERY_FIELDS: AddressFields = AddressFields {
    city: ("delivery_city", "Please enter a delivery city"),
    province: "delivery_province",
    country: "delivery_country",
    location_type: "delivery_location_type",
};

/// Collects field errors while pulling typed values out of the raw form.
#[derive(Default)]
struct FieldChecks {
    errors: Vec<FieldError>,
}

impl FieldChecks {
    fn fail(&mut self, field: &str, kind: FieldErrorKind, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            kind,
            message: message.into(),
        });
    }

    fn required_text(&mut self, field: &str, value: Option<&str>, message: &str) -> Option<String> {
        match present(value) {
            Some(text) => Some(text.to_string()),
            None => {
                self.fail(field, FieldErrorKind::MissingField, message);
                None
            }
        }
    }

    fn bounded_text(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        let text = present(value)?;
        if text.chars().count() > MAX_TEXT_LENGTH {
            self.fail(
                field,
                FieldErrorKind::TooLong,
                format!("Must be at most {MAX_TEXT_LENGTH} characters"),
            );
            return None;
        }
        Some(text.to_string())
    }

    fn required_choice<T: Choice>(
        &mut self,
        field: &str,
        value: Option<&str>,
        message: &str,
    ) -> Option<T> {
        match present(value) {
            Some(raw) => self.choice(field, raw),
            None => {
                self.fail(field, FieldErrorKind::MissingField, message);
                None
            }
        }
    }

    fn optional_choice<T: Choice>(&mut self, field: &str, value: Option<&str>) -> Option<T> {
        present(value).and_then(|raw| self.choice(field, raw))
    }

    fn choice<T: Choice>(&mut self, field: &str, raw: &str) -> Option<T> {
        let parsed = T::parse(raw);
        if parsed.is_none() {
            self.fail(
                field,
                FieldErrorKind::InvalidValue,
                format!("'{raw}' is not a recognised {}", T::LABEL),
            );
        }
        parsed
    }

    fn required_date(
        &mut self,
        field: &str,
        value: Option<NaiveDate>,
        message: &str,
    ) -> Option<NaiveDate> {
        if value.is_none() {
            self.fail(field, FieldErrorKind::MissingField, message);
        }
        value
    }

    fn email(&mut self, value: Option<&str>) -> Option<String> {
        const MESSAGE: &str = "Please enter a valid email address";
        let email = self.required_text("email", value, MESSAGE)?;
        if !is_valid_email(&email) {
            self.fail("email", FieldErrorKind::InvalidFormat, MESSAGE);
            return None;
        }
        Some(email.trim().to_string())
    }

    fn address(&mut self, input: AddressInput<'_>, fields: &AddressFields) -> Option<AddressDetails> {
        let city = self.required_text(fields.city.0, input.city, fields.city.1);
        let province =
            self.required_choice(fields.province, input.province, "Please select a province");
        let country =
            self.required_choice(fields.country, input.country, "Please select a country");
        let location_type = self.required_choice(
            fields.location_type,
            input.location_type,
            "Please select a location type",
        );

        Some(AddressDetails {
            address: optional_text(input.address),
            city: city?,
            province: province?,
            country: country?,
            postal_code: optional_text(input.postal_code),
            location_type: location_type?,
        })
    }

    fn method(
        &mut self,
        active: ActiveInput,
        submission: &QuoteSubmission,
        item_list: Option<String>,
    ) -> Option<QuoteMethod> {
        match active {
            ActiveInput::Unselected => None,
            ActiveInput::SurveyDate => self
                .required_date(
                    "survey_date",
                    submission.survey_date,
                    "Please select a survey date",
                )
                .map(|date| QuoteMethod::SurveyVisit { date }),
            ActiveInput::InventoryUpload => {
                let file_name = self.required_text(
                    "inventory_file_name",
                    submission.inventory_file_name.as_deref(),
                    "Please upload your inventory list",
                )?;
                if !has_inventory_extension(&file_name) {
                    self.fail(
                        "inventory_file_name",
                        FieldErrorKind::InvalidFormat,
                        "Inventory list must be a PDF, Word, Excel, CSV or text file",
                    );
                    return None;
                }
                Some(QuoteMethod::InventoryUpload { file_name })
            }
            ActiveInput::ItemList => match item_list {
                Some(items) => Some(QuoteMethod::TypedList { items }),
                None => {
                    // Over-long lists were already reported by `bounded_text`.
                    if !self.errors.iter().any(|error| error.field == "item_list") {
                        self.fail(
                            "item_list",
                            FieldErrorKind::MissingField,
                            "Please list the items you are moving",
                        );
                    }
                    None
                }
            },
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

fn optional_text(value: Option<&str>) -> Option<String> {
    present(value).map(str::to_string)
}

fn has_inventory_extension(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(stem, extension)| {
            !stem.is_empty()
                && INVENTORY_EXTENSIONS
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(extension.trim()))
        })
        .unwrap_or(false)
}

/// Check a raw submission against the quote schema.
///
/// Every rule runs, so the error list names all failing fields at once. The input
/// matching the chosen quote option is mandatory; the other two are dropped.
pub fn validate(submission: &QuoteSubmission) -> Result<QuoteRequest, ValidationErrors> {
    let mut checks = FieldChecks::default();

    let option: Option<QuoteOption> = checks.required_choice(
        "quote_option",
        submission.quote_option.as_deref(),
        "Please select a quote option",
    );
    let active = ActiveInput::for_option(option);

    let item_list = checks.bounded_text("item_list", submission.item_list.as_deref());
    let method = checks.method(active, submission, item_list);

    let move_type = checks.required_choice(
        "move_type",
        submission.move_type.as_deref(),
        "Please select a move type",
    );
    let nearest_branch = checks.required_choice(
        "nearest_branch",
        submission.nearest_branch.as_deref(),
        "Please select a branch",
    );
    let consignment_type = checks.required_choice(
        "consignment_type",
        submission.consignment_type.as_deref(),
        "Please select a consignment type",
    );
    let move_date = checks.required_date("move_date", submission.move_date, "Please select a date");

    let first_name = checks.required_text(
        "first_name",
        submission.first_name.as_deref(),
        "Please enter your first name",
    );
    let last_name = checks.required_text(
        "last_name",
        submission.last_name.as_deref(),
        "Please enter your last name",
    );
    let phone = checks.required_text(
        "phone",
        submission.phone.as_deref(),
        "Please enter your phone number",
    );
    let email = checks.email(submission.email.as_deref());

    let collection = checks.address(submission.collection(), &COLLECTION_FIELDS);
    let delivery = checks.address(submission.delivery(), &DELIVERY_FIELDS);

    let services = ServiceOptions {
        packing_service: checks
            .optional_choice("packing_service", submission.packing_service.as_deref()),
        insurance_value: optional_text(submission.insurance_value.as_deref()),
        storage_required: checks
            .optional_choice("storage_required", submission.storage_required.as_deref()),
        vehicle_transport: optional_text(submission.vehicle_transport.as_deref()),
        pet_relocation: optional_text(submission.pet_relocation.as_deref()),
        paying_entity: checks.optional_choice("paying_entity", submission.paying_entity.as_deref()),
    };
    let additional_notes =
        checks.bounded_text("additional_notes", submission.additional_notes.as_deref());

    if !checks.errors.is_empty() {
        return Err(ValidationErrors(checks.errors));
    }

    let (
        Some(method),
        Some(move_type),
        Some(nearest_branch),
        Some(consignment_type),
        Some(move_date),
        Some(first_name),
        Some(last_name),
        Some(phone),
        Some(email),
        Some(collection),
        Some(delivery),
    ) = (
        method,
        move_type,
        nearest_branch,
        consignment_type,
        move_date,
        first_name,
        last_name,
        phone,
        email,
        collection,
        delivery,
    )
    else {
        return Err(ValidationErrors(checks.errors));
    };

    Ok(QuoteRequest {
        method,
        move_type,
        nearest_branch,
        consignment_type,
        move_date,
        contact: ContactDetails {
            first_name,
            last_name,
            phone,
            email,
            mobile: optional_text(submission.mobile.as_deref()),
        },
        collection,
        delivery,
        services,
        additional_notes,
    })
}
