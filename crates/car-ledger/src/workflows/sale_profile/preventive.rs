use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{MaintenanceCategory, MaintenanceRecord};
use super::timestamp::{newest_first, serialize_optional_iso};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreventiveEntry {
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_optional_iso"
    )]
    pub date: Option<DateTime<Utc>>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mileage_km: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<MaintenanceCategory>,
}

/// Every preventive record in `records`, newest first. Not truncated.
pub fn extract_preventive(records: &[MaintenanceRecord]) -> Vec<PreventiveEntry> {
    let mut entries: Vec<PreventiveEntry> = records
        .iter()
        .filter(|record| record.is_preventive)
        .map(|record| PreventiveEntry {
            date: record.date,
            title: record.title.clone(),
            mileage_km: record.mileage_km,
            category: record.category.clone(),
        })
        .collect();

    entries.sort_by(|left, right| newest_first(left.date, right.date));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::sale_profile::domain::{RecordId, RecordTypeTag};
    use chrono::TimeZone;

    #[test]
    fn keeps_only_preventive_records_newest_first() {
        let record = |id: &str, month: u32, preventive: bool| MaintenanceRecord {
            id: RecordId::new(id),
            date: Some(Utc.with_ymd_and_hms(2024, month, 1, 0, 0, 0).unwrap()),
            title: id.to_string(),
            category: Some(MaintenanceCategory::Coolant),
            mileage_km: None,
            cost_yen: None,
            is_preventive: preventive,
            type_tag: RecordTypeTag::OwnerLogged,
        };

        let entries = extract_preventive(&[
            record("jan", 1, true),
            record("feb", 2, false),
            record("mar", 3, true),
        ]);

        let titles: Vec<&str> = entries.iter().map(|entry| entry.title.as_str()).collect();
        assert_eq!(titles, vec!["mar", "jan"]);
    }
}
