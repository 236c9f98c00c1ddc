use chrono::{DateTime, Utc};
use serde::Serialize;

use super::consumables::ConsumableTable;
use super::domain::{CustomizationStatus, MaintenanceCategory, RecordId, Vehicle};
use super::policy::RedactionPolicy;
use super::preventive::PreventiveEntry;
use super::timestamp::serialize_optional_iso;

/// Read-only projection served to public sale pages and document export.
///
/// Recomputed per request and never persisted. Field names are the JSON
/// contract downstream renderers depend on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalePublicViewModel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_id: Option<String>,
    pub vehicle: VehicleSummaryView,
    pub policy: RedactionPolicy,
    #[serde(rename = "recent12MonthsSummary")]
    pub recent_12_months_summary: Vec<HighlightView>,
    pub consumables: ConsumableTable,
    pub preventive_maintenance: Vec<PreventiveEntry>,
    pub unclassified_count: usize,
    pub evidences: Vec<EvidenceView>,
    pub customizations: Vec<CustomizationView>,
    pub record_counts: RecordCounts,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_optional_iso"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSummaryView {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odo_km: Option<u32>,
}

impl From<&Vehicle> for VehicleSummaryView {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id.clone(),
            name: vehicle.name.clone(),
            maker: vehicle.maker.clone(),
            model: vehicle.model.clone(),
            model_code: vehicle.model_code.clone(),
            year: vehicle.year,
            odo_km: vehicle.odo_km,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightView {
    pub record_id: RecordId,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_optional_iso"
    )]
    pub date: Option<DateTime<Utc>>,
    pub category: MaintenanceCategory,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mileage_km: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_yen: Option<u64>,
    pub is_preventive: bool,
    pub has_evidence: bool,
}

/// Publishable evidence file. `storage_path` is the private original and is
/// stripped by the public page renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceView {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<RecordId>,
    pub storage_path: String,
    pub masked_storage_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationView {
    pub id: RecordId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_code: Option<String>,
    pub categories: Vec<String>,
    pub status: CustomizationStatus,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_optional_iso"
    )]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub odo_km: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts_cost_jpy: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labor_cost_jpy: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_cost_jpy: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost_jpy: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub has_evidence: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordCounts {
    pub maintenance: usize,
    pub fuel_logs: usize,
    pub customizations: usize,
}

/// Answer to an integrity-reference lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationView {
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_id: Option<String>,
}

#[cfg(test)]
impl SalePublicViewModel {
    pub(crate) fn has_amounts(&self) -> bool {
        self.recent_12_months_summary
            .iter()
            .any(|entry| entry.amount_yen.is_some())
            || self.customizations.iter().any(|entry| {
                entry.parts_cost_jpy.is_some()
                    || entry.labor_cost_jpy.is_some()
                    || entry.other_cost_jpy.is_some()
                    || entry.total_cost_jpy.is_some()
            })
    }
}
