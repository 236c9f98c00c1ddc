use super::timestamp::RawTimestamp;
use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Identifier of a maintenance record or customization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maintenance category. The five named variants are the tracked consumables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MaintenanceCategory {
    Oil,
    Tire,
    Brake,
    Battery,
    Coolant,
    Other(String),
}

impl MaintenanceCategory {
    pub const fn consumables() -> [Self; 5] {
        [
            Self::Oil,
            Self::Tire,
            Self::Brake,
            Self::Battery,
            Self::Coolant,
        ]
    }

    /// Parses a stored category; blank means unclassified.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let category = match trimmed.to_ascii_lowercase().as_str() {
            "oil" => Self::Oil,
            "tire" => Self::Tire,
            "brake" => Self::Brake,
            "battery" => Self::Battery,
            "coolant" => Self::Coolant,
            _ => Self::Other(trimmed.to_string()),
        };
        Some(category)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Oil => "oil",
            Self::Tire => "tire",
            Self::Brake => "brake",
            Self::Battery => "battery",
            Self::Coolant => "coolant",
            Self::Other(value) => value,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Oil => "Engine oil",
            Self::Tire => "Tires",
            Self::Brake => "Brakes",
            Self::Battery => "Battery",
            Self::Coolant => "Coolant",
            Self::Other(value) => value,
        }
    }

    pub fn is_major(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for MaintenanceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MaintenanceCategory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

fn deserialize_category<'de, D>(deserializer: D) -> Result<Option<MaintenanceCategory>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(MaintenanceCategory::parse))
}

/// Provenance tag of a maintenance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordTypeTag {
    ReceiptBacked,
    OwnerLogged,
    #[default]
    Other,
}

impl RecordTypeTag {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "receipt_backed" | "receipt" => Self::ReceiptBacked,
            "owner_logged" | "self" | "manual" => Self::OwnerLogged,
            _ => Self::Other,
        }
    }
}

fn deserialize_type_tag<'de, D>(deserializer: D) -> Result<RecordTypeTag, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(RecordTypeTag::parse).unwrap_or_default())
}

/// Numeric field as the document store may hand it over.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireNumber {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Ignored(IgnoredAny),
}

impl WireNumber {
    fn integral(self) -> Option<i128> {
        match self {
            Self::Signed(value) => Some(value.into()),
            Self::Unsigned(value) => Some(value.into()),
            Self::Float(value) if value.is_finite() && value.fract() == 0.0 => Some(value as i128),
            Self::Float(_) | Self::Ignored(_) => None,
        }
    }
}

/// Integral floats such as `5000.0` become integers. Fractions, text and
/// values outside the target range read as missing.
fn deserialize_lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i128>,
{
    let raw = Option::<WireNumber>::deserialize(deserializer)?;
    Ok(raw
        .and_then(WireNumber::integral)
        .and_then(|value| T::try_from(value).ok()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomizationStatus {
    #[default]
    Planned,
    Ordered,
    Installed,
    Removed,
    #[serde(alias = "removed_temporarily")]
    RemovedTemp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskStatus {
    #[default]
    Pending,
    Masked,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Unlisted,
    Public,
    #[default]
    Disabled,
}

impl Visibility {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unlisted => "unlisted",
            Self::Public => "public",
            Self::Disabled => "disabled",
        }
    }
}

/// Maintenance record exactly as stored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceDocument {
    pub id: RecordId,
    pub owner_uid: String,
    pub vehicle_id: String,
    #[serde(default)]
    pub date: Option<RawTimestamp>,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_category")]
    pub category: Option<MaintenanceCategory>,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub mileage: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub cost: Option<u64>,
    #[serde(default)]
    pub is_preventive: bool,
    #[serde(default, deserialize_with = "deserialize_type_tag")]
    pub type_tag: RecordTypeTag,
    #[serde(default)]
    pub deleted_at: Option<RawTimestamp>,
}

/// Live maintenance record with a normalized date.
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceRecord {
    pub id: RecordId,
    pub date: Option<DateTime<Utc>>,
    pub title: String,
    pub category: Option<MaintenanceCategory>,
    pub mileage_km: Option<u32>,
    pub cost_yen: Option<u64>,
    pub is_preventive: bool,
    pub type_tag: RecordTypeTag,
}

impl MaintenanceRecord {
    pub fn is_classified(&self) -> bool {
        self.category.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelLogDocument {
    pub id: RecordId,
    pub owner_uid: String,
    pub vehicle_id: String,
    #[serde(default)]
    pub date: Option<RawTimestamp>,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub odo_km: Option<u32>,
    #[serde(default)]
    pub quantity_liters: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub total_cost_jpy: Option<u64>,
    #[serde(default)]
    pub deleted_at: Option<RawTimestamp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuelLog {
    pub id: RecordId,
    pub date: Option<DateTime<Utc>>,
    pub odo_km: Option<u32>,
    pub quantity_liters: Option<f64>,
    pub total_cost_jpy: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationDocument {
    pub id: RecordId,
    pub owner_uid: String,
    pub vehicle_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model_code: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub status: CustomizationStatus,
    #[serde(default)]
    pub date: Option<RawTimestamp>,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub odo_km: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub parts_cost_jpy: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub labor_cost_jpy: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub other_cost_jpy: Option<u64>,
    #[serde(default)]
    pub vendor_type: Option<String>,
    #[serde(default)]
    pub vendor_name: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub deleted_at: Option<RawTimestamp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Customization {
    pub id: RecordId,
    pub title: String,
    pub brand: Option<String>,
    pub model_code: Option<String>,
    pub categories: Vec<String>,
    pub status: CustomizationStatus,
    pub date: Option<DateTime<Utc>>,
    pub odo_km: Option<u32>,
    pub parts_cost_jpy: Option<u64>,
    pub labor_cost_jpy: Option<u64>,
    pub other_cost_jpy: Option<u64>,
    pub vendor_type: Option<String>,
    pub vendor_name: Option<String>,
    pub link: Option<String>,
    pub memo: Option<String>,
    pub is_public: bool,
}

impl Customization {
    /// Sum of the cost breakdown, absent when no component is recorded.
    pub fn total_cost_jpy(&self) -> Option<u64> {
        let parts = [self.parts_cost_jpy, self.labor_cost_jpy, self.other_cost_jpy];
        if parts.iter().all(Option::is_none) {
            return None;
        }
        Some(parts.iter().flatten().fold(0u64, |acc, cost| acc.saturating_add(*cost)))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceDocument {
    pub id: String,
    pub vehicle_id: String,
    #[serde(default)]
    pub sale_profile_id: Option<String>,
    #[serde(default)]
    pub record_id: Option<RecordId>,
    pub storage_path: String,
    #[serde(default)]
    pub masked_storage_path: Option<String>,
    #[serde(default)]
    pub mask_status: MaskStatus,
    #[serde(default)]
    pub deleted_at: Option<RawTimestamp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evidence {
    pub id: String,
    pub sale_profile_id: Option<String>,
    pub record_id: Option<RecordId>,
    pub storage_path: String,
    pub masked_storage_path: Option<String>,
    pub mask_status: MaskStatus,
}

impl Evidence {
    /// Masked derivative path, only once masking has completed.
    pub fn public_path(&self) -> Option<&str> {
        match self.mask_status {
            MaskStatus::Masked => self
                .masked_storage_path
                .as_deref()
                .filter(|path| !path.trim().is_empty()),
            MaskStatus::Pending | MaskStatus::Failed => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDocument {
    pub id: String,
    pub owner_uid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub maker: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub model_code: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub year: Option<u16>,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub odo_km: Option<u32>,
    #[serde(default)]
    pub deleted_at: Option<RawTimestamp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    pub maker: Option<String>,
    pub model: Option<String>,
    pub model_code: Option<String>,
    pub year: Option<u16>,
    pub odo_km: Option<u32>,
}

fn default_highlight_top_n() -> i64 {
    10
}

fn deserialize_highlight_top_n<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_lenient_number(deserializer)?.unwrap_or_else(default_highlight_top_n))
}

/// Publication settings for one vehicle's public sale page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleProfile {
    pub id: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub owner_uid: String,
    pub vehicle_id: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub include_evidence: bool,
    #[serde(default)]
    pub include_amounts: bool,
    #[serde(
        default = "default_highlight_top_n",
        rename = "highlightTopN",
        deserialize_with = "deserialize_highlight_top_n"
    )]
    pub highlight_top_n: i64,
    #[serde(default)]
    pub created_at: Option<RawTimestamp>,
    #[serde(default)]
    pub updated_at: Option<RawTimestamp>,
}

impl SaleProfile {
    pub fn is_disabled(&self) -> bool {
        self.visibility == Visibility::Disabled
    }
}
