use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{MaintenanceCategory, MaintenanceRecord};
use super::timestamp::{newest_first, serialize_optional_iso};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumableEvent {
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_optional_iso"
    )]
    pub date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mileage_km: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConsumableHistory {
    pub history: Vec<ConsumableEvent>,
}

impl ConsumableHistory {
    pub fn latest(&self) -> Option<&ConsumableEvent> {
        self.history.first()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

/// Replacement history for every consumable category. Always holds all five,
/// serialized in category order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConsumableTable {
    pub oil: ConsumableHistory,
    pub tire: ConsumableHistory,
    pub brake: ConsumableHistory,
    pub battery: ConsumableHistory,
    pub coolant: ConsumableHistory,
}

impl ConsumableTable {
    pub fn history(&self, category: &MaintenanceCategory) -> Option<&ConsumableHistory> {
        match category {
            MaintenanceCategory::Oil => Some(&self.oil),
            MaintenanceCategory::Tire => Some(&self.tire),
            MaintenanceCategory::Brake => Some(&self.brake),
            MaintenanceCategory::Battery => Some(&self.battery),
            MaintenanceCategory::Coolant => Some(&self.coolant),
            MaintenanceCategory::Other(_) => None,
        }
    }

    fn history_mut(&mut self, category: &MaintenanceCategory) -> Option<&mut ConsumableHistory> {
        match category {
            MaintenanceCategory::Oil => Some(&mut self.oil),
            MaintenanceCategory::Tire => Some(&mut self.tire),
            MaintenanceCategory::Brake => Some(&mut self.brake),
            MaintenanceCategory::Battery => Some(&mut self.battery),
            MaintenanceCategory::Coolant => Some(&mut self.coolant),
            MaintenanceCategory::Other(_) => None,
        }
    }

    pub fn entries(&self) -> [(MaintenanceCategory, &ConsumableHistory); 5] {
        [
            (MaintenanceCategory::Oil, &self.oil),
            (MaintenanceCategory::Tire, &self.tire),
            (MaintenanceCategory::Brake, &self.brake),
            (MaintenanceCategory::Battery, &self.battery),
            (MaintenanceCategory::Coolant, &self.coolant),
        ]
    }
}

pub fn build_consumable_history(records: &[MaintenanceRecord]) -> ConsumableTable {
    let mut table = ConsumableTable::default();

    for record in records {
        let Some(category) = record.category.as_ref() else {
            continue;
        };
        if let Some(entry) = table.history_mut(category) {
            entry.history.push(ConsumableEvent {
                date: record.date,
                mileage_km: record.mileage_km,
            });
        }
    }

    for history in [
        &mut table.oil,
        &mut table.tire,
        &mut table.brake,
        &mut table.battery,
        &mut table.coolant,
    ] {
        history
            .history
            .sort_by(|left, right| newest_first(left.date, right.date));
    }

    table
}
