use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    AddressDetails, Branch, ConsignmentType, Country, LocationType, MoveType, PackingService,
    PayingEntity, Province, QuoteMethod, QuoteOption, QuoteRequest, StorageRequired,
};

/// Column format for plain calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_calendar_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Insert-ready quote row, one column per form field.
///
/// Optional columns serialize as `null` rather than being omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRow {
    pub quote_option: QuoteOption,
    pub survey_date: Option<String>,
    pub inventory_file_name: Option<String>,
    pub item_list: Option<String>,
    pub move_type: MoveType,
    pub nearest_branch: Branch,
    pub consignment_type: ConsignmentType,
    pub move_date: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub mobile: Option<String>,
    pub collection_address: Option<String>,
    pub collection_city: String,
    pub collection_province: Province,
    pub collection_country: Country,
    pub collection_postal_code: Option<String>,
    pub collection_location_type: LocationType,
    pub delivery_address: Option<String>,
    pub delivery_city: String,
    pub delivery_province: Province,
    pub delivery_country: Country,
    pub delivery_postal_code: Option<String>,
    pub delivery_location_type: LocationType,
    pub packing_service: Option<PackingService>,
    pub insurance_value: Option<String>,
    pub storage_required: Option<StorageRequired>,
    pub vehicle_transport: Option<String>,
    pub pet_relocation: Option<String>,
    pub paying_entity: Option<PayingEntity>,
    pub additional_notes: Option<String>,
}

/// Flatten a validated request into the row the sink stores.
pub fn normalize(request: &QuoteRequest) -> QuoteRow {
    let (survey_date, inventory_file_name, item_list) = match &request.method {
        QuoteMethod::SurveyVisit { date } => (Some(format_calendar_date(*date)), None, None),
        QuoteMethod::InventoryUpload { file_name } => (None, Some(file_name.clone()), None),
        QuoteMethod::TypedList { items } => (None, None, Some(items.clone())),
    };

    let AddressDetails {
        address: collection_address,
        city: collection_city,
        province: collection_province,
        country: collection_country,
        postal_code: collection_postal_code,
        location_type: collection_location_type,
    } = request.collection.clone();
    let AddressDetails {
        address: delivery_address,
        city: delivery_city,
        province: delivery_province,
        country: delivery_country,
        postal_code: delivery_postal_code,
        location_type: delivery_location_type,
    } = request.delivery.clone();

    let contact = request.contact.clone();
    let services = request.services.clone();

    QuoteRow {
        quote_option: request.method.option(),
        survey_date,
        inventory_file_name,
        item_list,
        move_type: request.move_type,
        nearest_branch: request.nearest_branch,
        consignment_type: request.consignment_type,
        move_date: format_calendar_date(request.move_date),
        first_name: contact.first_name,
        last_name: contact.last_name,
        phone: contact.phone,
        email: contact.email,
        mobile: contact.mobile,
        collection_address,
        collection_city,
        collection_province,
        collection_country,
        collection_postal_code,
        collection_location_type,
        delivery_address,
        delivery_city,
        delivery_province,
        delivery_country,
        delivery_postal_code,
        delivery_location_type,
        packing_service: services.packing_service,
        insurance_value: services.insurance_value,
        storage_required: services.storage_required,
        vehicle_transport: services.vehicle_transport,
        pet_relocation: services.pet_relocation,
        paying_entity: services.paying_entity,
        additional_notes: request.additional_notes.clone(),
    }
}
