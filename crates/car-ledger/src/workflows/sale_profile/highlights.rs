use chrono::{DateTime, Utc};

use super::domain::{MaintenanceCategory, MaintenanceRecord, RecordId, RecordTypeTag};
use super::timestamp::newest_first;

pub const RECEIPT_BACKED_WEIGHT: i32 = 100;
pub const OWNER_LOGGED_WEIGHT: i32 = 50;
pub const PREVENTIVE_WEIGHT: i32 = 30;
pub const MAJOR_CATEGORY_WEIGHT: i32 = 20;

/// Maintenance record selected for the public highlight list, before redaction.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightCandidate {
    pub record_id: RecordId,
    pub date: Option<DateTime<Utc>>,
    pub category: MaintenanceCategory,
    pub title: String,
    pub mileage_km: Option<u32>,
    pub cost_yen: Option<u64>,
    pub is_preventive: bool,
    pub score: i32,
}

pub fn priority_score(record: &MaintenanceRecord) -> i32 {
    let mut score = match record.type_tag {
        RecordTypeTag::ReceiptBacked => RECEIPT_BACKED_WEIGHT,
        RecordTypeTag::OwnerLogged => OWNER_LOGGED_WEIGHT,
        RecordTypeTag::Other => 0,
    };

    if record.is_preventive {
        score += PREVENTIVE_WEIGHT;
    }

    if record
        .category
        .as_ref()
        .is_some_and(MaintenanceCategory::is_major)
    {
        score += MAJOR_CATEGORY_WEIGHT;
    }

    score
}

/// Picks the `top_n` highest-scoring classified records and returns them
/// newest first.
///
/// Score decides inclusion only. Equal scores keep the input order, so the
/// caller's collection order is the tie-breaker.
pub fn rank_highlights(records: &[MaintenanceRecord], top_n: usize) -> Vec<HighlightCandidate> {
    let mut candidates: Vec<HighlightCandidate> = records
        .iter()
        .filter_map(|record| {
            let category = record.category.clone()?;
            Some(HighlightCandidate {
                record_id: record.id.clone(),
                date: record.date,
                category,
                title: record.title.clone(),
                mileage_km: record.mileage_km,
                cost_yen: record.cost_yen,
                is_preventive: record.is_preventive,
                score: priority_score(record),
            })
        })
        .collect();

    candidates.sort_by(|left, right| right.score.cmp(&left.score));
    candidates.truncate(top_n);
    candidates.sort_by(|left, right| newest_first(left.date, right.date));
    candidates
}
