use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Fixed-set form value with a canonical wire spelling.
pub trait Choice: Copy + Sized + 'static {
    /// Human label used in validation messages.
    const LABEL: &'static str;
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;

    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL.iter().copied().find(|choice| choice.as_str() == raw)
    }
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $($variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl Choice for $name {
            const LABEL: &'static str = $label;
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum!(
    /// How the customer wants the quote to be prepared.
    QuoteOption, "quote option" {
        InHomeVisit => "in_home_visit",
        UploadInventory => "upload_inventory",
        TypeList => "type_list",
    }
);

choice_enum!(
    MoveType, "move type" {
        WithinSouthAfrica => "within_sa",
        International => "international",
    }
);

choice_enum!(
    /// Service branches that accept quote requests.
    Branch, "branch" {
        Pretoria => "Pretoria",
        Johannesburg => "Johannesburg",
        Potchefstroom => "Potchefstroom",
        Bloemfontein => "Bloemfontein",
        Pietermaritzburg => "Pietermaritzburg",
        Durban => "Durban",
        CapeTown => "Cape Town",
        George => "George",
        PortElizabeth => "Port Elizabeth",
        Harare => "Harare",
        Botswana => "Botswana",
        PretoriaCommercial => "Pretoria Commercial",
    }
);

choice_enum!(
    ConsignmentType, "consignment type" {
        FewItems => "few_items",
        OneBedroom => "1_bedroom",
        TwoBedroom => "2_bedroom",
        ThreeBedroom => "3_bedroom",
        FourPlusBedroom => "4_plus_bedroom",
        Office => "office",
        Commercial => "commercial",
        Other => "other",
    }
);

choice_enum!(
    Province, "province" {
        Gauteng => "Gauteng",
        WesternCape => "Western Cape",
        KwaZuluNatal => "KwaZulu-Natal",
        EasternCape => "Eastern Cape",
        Limpopo => "Limpopo",
        Mpumalanga => "Mpumalanga",
        NorthWest => "North West",
        FreeState => "Free State",
        NorthernCape => "Northern Cape",
    }
);

choice_enum!(
    /// ISO 3166 alpha-2 codes of the countries served.
    Country, "country" {
        SouthAfrica => "ZA",
        Botswana => "BW",
        Zimbabwe => "ZW",
    }
);

choice_enum!(
    LocationType, "location type" {
        House => "house",
        Townhouse => "townhouse",
        Apartment => "apartment",
        Office => "office",
    }
);

choice_enum!(
    PackingService, "packing service" {
        Full => "full",
        Breakables => "breakables",
        SupplyMaterials => "supply_materials",
        SelfPack => "self_pack",
    }
);

choice_enum!(
    StorageRequired, "storage option" {
        Yes => "yes",
        No => "no",
    }
);

choice_enum!(
    PayingEntity, "paying entity" {
        Individual => "self",
        Company => "company",
    }
);

/// Sink-assigned identifier of a stored quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(pub Uuid);

impl std::fmt::Display for QuoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Raw quote form as posted by the browser. Nothing here has been checked yet.
///
/// Text and choice fields stay as plain strings so that every problem can be reported
/// per field; dates arrive already parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteSubmission {
    pub quote_option: Option<String>,
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub survey_date: Option<NaiveDate>,
    #[serde(alias = "inventory_reference")]
    pub inventory_file_name: Option<String>,
    pub item_list: Option<String>,
    pub move_type: Option<String>,
    pub nearest_branch: Option<String>,
    pub consignment_type: Option<String>,
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub move_date: Option<NaiveDate>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub collection_address: Option<String>,
    pub collection_city: Option<String>,
    pub collection_province: Option<String>,
    pub collection_country: Option<String>,
    pub collection_postal_code: Option<String>,
    pub collection_location_type: Option<String>,
    pub delivery_address: Option<String>,
    pub delivery_city: Option<String>,
    pub delivery_province: Option<String>,
    pub delivery_country: Option<String>,
    pub delivery_postal_code: Option<String>,
    pub delivery_location_type: Option<String>,
    pub packing_service: Option<String>,
    pub insurance_value: Option<String>,
    pub storage_required: Option<String>,
    pub vehicle_transport: Option<String>,
    pub pet_relocation: Option<String>,
    pub paying_entity: Option<String>,
    pub additional_notes: Option<String>,
}

/// Borrowed view over one of the two address groups of a submission.
#[derive(Debug, Clone, Copy)]
pub struct AddressInput<'a> {
    pub address: Option<&'a str>,
    pub city: Option<&'a str>,
    pub province: Option<&'a str>,
    pub country: Option<&'a str>,
    pub postal_code: Option<&'a str>,
    pub location_type: Option<&'a str>,
}

impl QuoteSubmission {
    pub fn collection(&self) -> AddressInput<'_> {
        AddressInput {
            address: self.collection_address.as_deref(),
            city: self.collection_city.as_deref(),
            province: self.collection_province.as_deref(),
            country: self.collection_country.as_deref(),
            postal_code: self.collection_postal_code.as_deref(),
            location_type: self.collection_location_type.as_deref(),
        }
    }

    pub fn delivery(&self) -> AddressInput<'_> {
        AddressInput {
            address: self.delivery_address.as_deref(),
            city: self.delivery_city.as_deref(),
            province: self.delivery_province.as_deref(),
            country: self.delivery_country.as_deref(),
            postal_code: self.delivery_postal_code.as_deref(),
            location_type: self.delivery_location_type.as_deref(),
        }
    }
}

/// The one extra input the chosen quote option asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteMethod {
    SurveyVisit { date: NaiveDate },
    InventoryUpload { file_name: String },
    TypedList { items: String },
}

impl QuoteMethod {
    pub fn option(&self) -> QuoteOption {
        match self {
            QuoteMethod::SurveyVisit { .. } => QuoteOption::InHomeVisit,
            QuoteMethod::InventoryUpload { .. } => QuoteOption::UploadInventory,
            QuoteMethod::TypedList { .. } => QuoteOption::TypeList,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetails {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub mobile: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressDetails {
    pub address: Option<String>,
    pub city: String,
    pub province: Province,
    pub country: Country,
    pub postal_code: Option<String>,
    pub location_type: LocationType,
}

/// Optional extras. The free-text fields are never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceOptions {
    pub packing_service: Option<PackingService>,
    pub insurance_value: Option<String>,
    pub storage_required: Option<StorageRequired>,
    pub vehicle_transport: Option<String>,
    pub pet_relocation: Option<String>,
    pub paying_entity: Option<PayingEntity>,
}

/// A quote request that passed every schema rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub method: QuoteMethod,
    pub move_type: MoveType,
    pub nearest_branch: Branch,
    pub consignment_type: ConsignmentType,
    pub move_date: NaiveDate,
    pub contact: ContactDetails,
    pub collection: AddressDetails,
    pub delivery: AddressDetails,
    pub services: ServiceOptions,
    pub additional_notes: Option<String>,
}

/// Parse a calendar date from either `YYYY-MM-DD` or a full timestamp.
///
/// Timestamps keep the day written in their own offset; they are never shifted to UTC
/// first, so `2024-06-15T00:30:00+02:00` is still the 15th.
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.date_naive());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(timestamp.date());
    }
    Err(format!("failed to parse '{raw}' as a calendar date (expected YYYY-MM-DD)"))
}

fn deserialize_calendar_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => parse_calendar_date(&value)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
