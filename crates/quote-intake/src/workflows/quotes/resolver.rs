use super::domain::{Choice, QuoteOption};

/// Which of the three alternative quote inputs the selected option activates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveInput {
    /// No quote option chosen yet, so nothing extra is asked for.
    Unselected,
    SurveyDate,
    InventoryUpload,
    ItemList,
}

impl ActiveInput {
    pub fn for_option(option: Option<QuoteOption>) -> Self {
        match option {
            Some(QuoteOption::InHomeVisit) => ActiveInput::SurveyDate,
            Some(QuoteOption::UploadInventory) => ActiveInput::InventoryUpload,
            Some(QuoteOption::TypeList) => ActiveInput::ItemList,
            None => ActiveInput::Unselected,
        }
    }

    /// Resolve straight from the raw form value; blank or unknown options activate nothing.
    pub fn from_raw(raw: Option<&str>) -> Self {
        Self::for_option(raw.and_then(QuoteOption::parse))
    }

    /// Form field that becomes mandatory, if any.
    pub const fn field(self) -> Option<&'static str> {
        match self {
            ActiveInput::Unselected => None,
            ActiveInput::SurveyDate => Some("survey_date"),
            ActiveInput::InventoryUpload => Some("inventory_file_name"),
            ActiveInput::ItemList => Some("item_list"),
        }
    }

    pub const fn is_selected(self) -> bool {
        !matches!(self, ActiveInput::Unselected)
    }
}
