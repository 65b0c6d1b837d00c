//! Inventory record data structures.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::date;

/// A date cell as it appears in the spreadsheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DateValue {
    /// No value in the cell
    #[default]
    Empty,

    /// Native calendar date
    Date(NaiveDate),

    /// Free-form text
    Text(String),

    /// Number, usually a serial day count
    Serial(f64),
}

impl DateValue {
    /// Whether the cell holds nothing usable.
    pub fn is_empty(&self) -> bool {
        match self {
            DateValue::Empty => true,
            DateValue::Text(text) => text.trim().is_empty(),
            DateValue::Date(_) | DateValue::Serial(_) => false,
        }
    }

    /// Resolve to a calendar date using every available rule.
    ///
    /// Text is tried as a date first and as a date code second. Numbers
    /// inside the plausible serial range are day counts; anything else
    /// gets one more chance as a date code.
    pub fn resolve(&self) -> Option<NaiveDate> {
        match self {
            DateValue::Empty => None,
            DateValue::Date(d) => Some(*d),
            DateValue::Text(text) => {
                date::parse_date_text(text).or_else(|| date::date_code_text_to_date(text))
            }
            DateValue::Serial(v) if date::is_plausible_serial(*v) => date::serial_to_date(*v),
            DateValue::Serial(v) => date::date_code_to_date(*v),
        }
    }

    /// Best-effort display form: canonical when it reads as a date,
    /// otherwise the original text.
    pub fn display(&self) -> String {
        match self {
            DateValue::Empty => String::new(),
            DateValue::Date(d) => date::canonical(*d),
            DateValue::Text(text) => date::parse_date_text(text)
                .map(date::canonical)
                .unwrap_or_else(|| text.clone()),
            DateValue::Serial(v) => date::serial_to_date(*v)
                .map(date::canonical)
                .unwrap_or_else(|| v.to_string()),
        }
    }
}

impl From<NaiveDate> for DateValue {
    fn from(value: NaiveDate) -> Self {
        DateValue::Date(value)
    }
}

impl From<&str> for DateValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            DateValue::Empty
        } else {
            DateValue::Text(value.to_string())
        }
    }
}

impl From<f64> for DateValue {
    fn from(value: f64) -> Self {
        DateValue::Serial(value)
    }
}

/// A named column of the inventory sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ProductName,
    Brand,
    Volume,
    BatchNo,
    StockDate,
    ExpiryDate,
    StorageLocation,
}

impl Field {
    /// Every field, in record order.
    pub const ALL: [Field; 7] = [
        Field::ProductName,
        Field::Brand,
        Field::Volume,
        Field::BatchNo,
        Field::StockDate,
        Field::ExpiryDate,
        Field::StorageLocation,
    ];

    /// Accepted header spellings, most preferred first.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::ProductName => &["Product Name", "ProductName", "product_name"],
            Field::Brand => &["Brand", "brand"],
            Field::Volume => &["Volume (ml)", "Volume", "volume"],
            Field::BatchNo => &["Batch No.", "BatchNo", "batch_no", "Batch Number"],
            Field::StockDate => &["Stock Date", "StockDate", "stock_date"],
            Field::ExpiryDate => &["Expiry Date", "ExpiryDate", "expiry_date"],
            Field::StorageLocation => &["Storage Location", "StorageLocation", "storage_location"],
        }
    }

    /// Column title used in reports.
    pub fn title(self) -> &'static str {
        match self {
            Field::ProductName => "Product Name",
            Field::Brand => "Brand",
            Field::Volume => "Volume (ml)",
            Field::BatchNo => "Batch No.",
            Field::StockDate => "Stock Date",
            Field::ExpiryDate => "Expiry Date",
            Field::StorageLocation => "Storage Location",
        }
    }
}

/// One row of the inventory sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InventoryRecord {
    pub product_name: String,
    pub brand: String,
    /// Free-form, may carry units
    pub volume: String,
    pub batch_no: String,
    pub stock_date: DateValue,
    pub expiry_date: DateValue,
    pub storage_location: String,
}

/// An inventory row inside the look-ahead window, dates in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringRecord {
    pub product_name: String,
    pub brand: String,
    pub volume: String,
    pub batch_no: String,
    pub stock_date: String,
    pub expiry_date: String,
    pub storage_location: String,
}

impl ExpiringRecord {
    /// Build the presentation form of a record whose expiry resolved to `expiry`.
    pub fn from_record(record: &InventoryRecord, expiry: NaiveDate) -> Self {
        Self {
            product_name: record.product_name.clone(),
            brand: record.brand.clone(),
            volume: record.volume.clone(),
            batch_no: record.batch_no.clone(),
            stock_date: record.stock_date.display(),
            expiry_date: date::canonical(expiry),
            storage_location: record.storage_location.clone(),
        }
    }

    /// Text value of a report column.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::ProductName => &self.product_name,
            Field::Brand => &self.brand,
            Field::Volume => &self.volume,
            Field::BatchNo => &self.batch_no,
            Field::StockDate => &self.stock_date,
            Field::ExpiryDate => &self.expiry_date,
            Field::StorageLocation => &self.storage_location,
        }
    }
}
