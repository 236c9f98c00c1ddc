use std::sync::Arc;

use chrono::{DateTime, Datelike, Months, Utc};
use tracing::debug;

use super::domain::{
    Customization, CustomizationDocument, Evidence, EvidenceDocument, FuelLog, FuelLogDocument,
    MaintenanceDocument, MaintenanceRecord, Vehicle, VehicleDocument,
};
use super::store::{EvidenceScope, RepositoryError, VehicleRecordStore};
use super::timestamp::{newest_first, RawTimestamp};

/// Date range a maintenance query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalWindow {
    /// Trailing 12 full calendar months up to `now`.
    Recent { now: DateTime<Utc> },
    AllTime,
}

impl RetrievalWindow {
    pub fn recent(now: DateTime<Utc>) -> Self {
        Self::Recent { now }
    }

    pub fn contains(&self, date: Option<DateTime<Utc>>) -> bool {
        match self {
            Self::AllTime => true,
            Self::Recent { now } => match date {
                Some(date) => date >= recent_window_start(*now) && date <= *now,
                None => false,
            },
        }
    }
}

/// First instant of the calendar month twelve months before `now`.
pub fn recent_window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .with_day(1)
        .and_then(|first| first.checked_sub_months(Months::new(12)))
        .and_then(|first| first.and_hms_opt(0, 0, 0))
        .map(|start| start.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn is_live(deleted_at: &Option<RawTimestamp>) -> bool {
    deleted_at.is_none()
}

fn normalize(value: Option<&RawTimestamp>) -> Option<DateTime<Utc>> {
    value.and_then(RawTimestamp::normalize)
}

/// The pipeline's only read path: soft-delete filtering and timestamp
/// normalization happen here and nowhere else.
pub struct EntityAccessors<S> {
    store: Arc<S>,
}

impl<S> Clone for EntityAccessors<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S> EntityAccessors<S>
where
    S: VehicleRecordStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn vehicle(
        &self,
        owner_uid: &str,
        vehicle_id: &str,
    ) -> Result<Option<Vehicle>, RepositoryError> {
        let document = self.store.vehicle(owner_uid, vehicle_id).await?;
        Ok(document
            .filter(|document| is_live(&document.deleted_at))
            .map(vehicle_from_document))
    }

    /// Live maintenance records, newest first (stable, undated last).
    pub async fn maintenance_records(
        &self,
        owner_uid: &str,
        vehicle_id: &str,
        window: RetrievalWindow,
    ) -> Result<Vec<MaintenanceRecord>, RepositoryError> {
        let documents = self.store.maintenance_records(owner_uid, vehicle_id).await?;
        let fetched = documents.len();

        let mut records: Vec<MaintenanceRecord> = documents
            .into_iter()
            .filter(|document| is_live(&document.deleted_at))
            .map(maintenance_from_document)
            .filter(|record| window.contains(record.date))
            .collect();
        records.sort_by(|left, right| newest_first(left.date, right.date));

        debug!(
            vehicle_id,
            fetched,
            live = records.len(),
            ?window,
            "loaded maintenance records"
        );
        Ok(records)
    }

    pub async fn fuel_logs(
        &self,
        owner_uid: &str,
        vehicle_id: &str,
    ) -> Result<Vec<FuelLog>, RepositoryError> {
        let documents = self.store.fuel_logs(owner_uid, vehicle_id).await?;
        Ok(documents
            .into_iter()
            .filter(|document| is_live(&document.deleted_at))
            .map(fuel_log_from_document)
            .collect())
    }

    pub async fn customizations(
        &self,
        owner_uid: &str,
        vehicle_id: &str,
    ) -> Result<Vec<Customization>, RepositoryError> {
        let documents = self.store.customizations(owner_uid, vehicle_id).await?;
        Ok(documents
            .into_iter()
            .filter(|document| is_live(&document.deleted_at))
            .map(customization_from_document)
            .collect())
    }

    pub async fn evidence(
        &self,
        vehicle_id: &str,
        scope: EvidenceScope,
    ) -> Result<Vec<Evidence>, RepositoryError> {
        let documents = self.store.evidence(vehicle_id, scope).await?;
        Ok(documents
            .into_iter()
            .filter(|document| is_live(&document.deleted_at))
            .map(evidence_from_document)
            .filter(|evidence| match scope {
                EvidenceScope::All => true,
                EvidenceScope::MaskedOnly => evidence.public_path().is_some(),
            })
            .collect())
    }
}

fn vehicle_from_document(document: VehicleDocument) -> Vehicle {
    Vehicle {
        id: document.id,
        name: document.name,
        maker: document.maker,
        model: document.model,
        model_code: document.model_code,
        year: document.year,
        odo_km: document.odo_km,
    }
}

fn maintenance_from_document(document: MaintenanceDocument) -> MaintenanceRecord {
    MaintenanceRecord {
        date: normalize(document.date.as_ref()),
        id: document.id,
        title: document.title,
        category: document.category,
        mileage_km: document.mileage,
        cost_yen: document.cost,
        is_preventive: document.is_preventive,
        type_tag: document.type_tag,
    }
}

fn fuel_log_from_document(document: FuelLogDocument) -> FuelLog {
    FuelLog {
        date: normalize(document.date.as_ref()),
        id: document.id,
        odo_km: document.odo_km,
        quantity_liters: document.quantity_liters,
        total_cost_jpy: document.total_cost_jpy,
    }
}

fn customization_from_document(document: CustomizationDocument) -> Customization {
    Customization {
        date: normalize(document.date.as_ref()),
        id: document.id,
        title: document.title,
        brand: document.brand,
        model_code: document.model_code,
        categories: document.categories,
        status: document.status,
        odo_km: document.odo_km,
        parts_cost_jpy: document.parts_cost_jpy,
        labor_cost_jpy: document.labor_cost_jpy,
        other_cost_jpy: document.other_cost_jpy,
        vendor_type: document.vendor_type,
        vendor_name: document.vendor_name,
        link: document.link,
        memo: document.memo,
        is_public: document.is_public,
    }
}

fn evidence_from_document(document: EvidenceDocument) -> Evidence {
    Evidence {
        id: document.id,
        sale_profile_id: document.sale_profile_id,
        record_id: document
            .record_id
            .filter(|record_id| !record_id.as_str().trim().is_empty()),
        storage_path: document.storage_path,
        masked_storage_path: document.masked_storage_path,
        mask_status: document.mask_status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn recent_window_starts_on_first_day_twelve_months_back() {
        let start = recent_window_start(utc(2025, 6, 18));
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());

        let leap = recent_window_start(utc(2024, 2, 29));
        assert_eq!(leap, Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn recent_window_excludes_undated_and_future_records() {
        let now = utc(2025, 6, 18);
        let window = RetrievalWindow::recent(now);

        assert!(window.contains(Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())));
        assert!(window.contains(Some(now)));
        assert!(!window.contains(Some(utc(2024, 5, 31))));
        assert!(!window.contains(Some(utc(2025, 6, 19))));
        assert!(!window.contains(None));
        assert!(RetrievalWindow::AllTime.contains(None));
    }
}
