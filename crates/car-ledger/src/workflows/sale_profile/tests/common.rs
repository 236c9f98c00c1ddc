use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::sale_profile::domain::{
    CustomizationDocument, CustomizationStatus, EvidenceDocument, FuelLogDocument,
    MaintenanceCategory, MaintenanceDocument, MaintenanceRecord, MaskStatus, RecordId,
    RecordTypeTag, SaleProfile, VehicleDocument, Visibility,
};
use crate::workflows::sale_profile::memory::{GarageDataset, InMemoryGarage, RecordingAnalytics};
use crate::workflows::sale_profile::store::{
    AnalyticsError, AnalyticsSink, EvidenceScope, RepositoryError, SalePageEvent,
    SaleProfileStore, VehicleRecordStore,
};
use crate::workflows::sale_profile::timestamp::RawTimestamp;
use crate::workflows::sale_profile::SalePageService;

pub(super) const OWNER: &str = "owner-1";
pub(super) const VEHICLE: &str = "car-1";
pub(super) const SLUG: &str = "roadster-2019-abc";

pub(super) fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
        .single()
        .expect("valid date")
}

/// Mid-June 2025; the recent window starts 2024-06-01.
pub(super) fn now() -> DateTime<Utc> {
    at(2025, 6, 15)
}

pub(super) fn vehicle() -> VehicleDocument {
    VehicleDocument {
        id: VEHICLE.to_string(),
        owner_uid: OWNER.to_string(),
        name: "Weekend roadster".to_string(),
        maker: Some("Mazda".to_string()),
        model: Some("Roadster".to_string()),
        model_code: Some("ND5RC".to_string()),
        year: Some(2019),
        odo_km: Some(48_200),
        deleted_at: None,
    }
}

pub(super) fn profile(visibility: Visibility) -> SaleProfile {
    SaleProfile {
        id: "profile-1".to_string(),
        slug: Some(SLUG.to_string()),
        owner_uid: OWNER.to_string(),
        vehicle_id: VEHICLE.to_string(),
        visibility,
        include_evidence: true,
        include_amounts: true,
        highlight_top_n: 10,
        created_at: Some(RawTimestamp::from(at(2025, 1, 2))),
        updated_at: Some(RawTimestamp::text("2025-06-01T10:30:00Z")),
    }
}

pub(super) struct MaintenanceFixture {
    pub id: String,
    pub date: Option<DateTime<Utc>>,
    pub category: Option<MaintenanceCategory>,
    pub type_tag: RecordTypeTag,
    pub is_preventive: bool,
    pub cost: Option<u64>,
}

impl MaintenanceFixture {
    pub(super) fn new(id: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            date: Some(date),
            category: Some(MaintenanceCategory::Oil),
            type_tag: RecordTypeTag::Other,
            is_preventive: false,
            cost: None,
        }
    }

    pub(super) fn category(mut self, category: Option<MaintenanceCategory>) -> Self {
        self.category = category;
        self
    }

    pub(super) fn tag(mut self, type_tag: RecordTypeTag) -> Self {
        self.type_tag = type_tag;
        self
    }

    pub(super) fn preventive(mut self) -> Self {
        self.is_preventive = true;
        self
    }

    pub(super) fn cost(mut self, cost: u64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub(super) fn document(&self) -> MaintenanceDocument {
        MaintenanceDocument {
            id: RecordId::new(self.id.clone()),
            owner_uid: OWNER.to_string(),
            vehicle_id: VEHICLE.to_string(),
            date: self.date.map(RawTimestamp::from),
            title: format!("Service {}", self.id),
            category: self.category.clone(),
            mileage: Some(40_000),
            cost: self.cost,
            is_preventive: self.is_preventive,
            type_tag: self.type_tag,
            deleted_at: None,
        }
    }

    pub(super) fn record(&self) -> MaintenanceRecord {
        MaintenanceRecord {
            id: RecordId::new(self.id.clone()),
            date: self.date,
            title: format!("Service {}", self.id),
            category: self.category.clone(),
            mileage_km: Some(40_000),
            cost_yen: self.cost,
            is_preventive: self.is_preventive,
            type_tag: self.type_tag,
        }
    }
}

pub(super) fn installed_customization(id: &str, date: DateTime<Utc>) -> CustomizationDocument {
    CustomizationDocument {
        id: RecordId::new(id),
        owner_uid: OWNER.to_string(),
        vehicle_id: VEHICLE.to_string(),
        title: format!("Upgrade {id}"),
        brand: Some("Bilstein".to_string()),
        model_code: None,
        categories: vec!["suspension".to_string()],
        status: CustomizationStatus::Installed,
        date: Some(RawTimestamp::from(date)),
        odo_km: Some(30_000),
        parts_cost_jpy: Some(120_000),
        labor_cost_jpy: Some(30_000),
        other_cost_jpy: None,
        vendor_type: Some("shop".to_string()),
        vendor_name: None,
        link: None,
        memo: None,
        is_public: true,
        deleted_at: None,
    }
}

pub(super) fn evidence(id: &str, record_id: &str, status: MaskStatus) -> EvidenceDocument {
    EvidenceDocument {
        id: id.to_string(),
        vehicle_id: VEHICLE.to_string(),
        sale_profile_id: None,
        record_id: Some(RecordId::new(record_id)),
        storage_path: format!("private/{id}.jpg"),
        masked_storage_path: Some(format!("masked/{id}.jpg")),
        mask_status: status,
        deleted_at: None,
    }
}

pub(super) fn fuel_log(id: &str) -> FuelLogDocument {
    FuelLogDocument {
        id: RecordId::new(id),
        owner_uid: OWNER.to_string(),
        vehicle_id: VEHICLE.to_string(),
        date: Some(RawTimestamp::from(at(2025, 5, 20))),
        odo_km: Some(48_000),
        quantity_liters: Some(38.5),
        total_cost_jpy: Some(6_900),
        deleted_at: None,
    }
}

pub(super) fn dataset(maintenance: Vec<MaintenanceDocument>) -> GarageDataset {
    GarageDataset {
        vehicles: vec![vehicle()],
        maintenance_records: maintenance,
        sale_profiles: vec![profile(Visibility::Public)],
        ..GarageDataset::default()
    }
}

pub(super) fn garage(dataset: GarageDataset) -> Arc<InMemoryGarage> {
    Arc::new(InMemoryGarage::new(dataset))
}

pub(super) type MemoryService = SalePageService<InMemoryGarage, InMemoryGarage, RecordingAnalytics>;

pub(super) fn build_service(dataset: GarageDataset) -> (Arc<MemoryService>, RecordingAnalytics) {
    let store = garage(dataset);
    let analytics = RecordingAnalytics::default();
    let service = SalePageService::new(store.clone(), store, Arc::new(analytics.clone()));
    (Arc::new(service), analytics)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json body")
}

/// Record store that counts every query it receives.
pub(super) struct CountingStore {
    inner: InMemoryGarage,
    queries: AtomicUsize,
    masked_only_queries: AtomicUsize,
}

impl CountingStore {
    pub(super) fn new(dataset: GarageDataset) -> Self {
        Self {
            inner: InMemoryGarage::new(dataset),
            queries: AtomicUsize::new(0),
            masked_only_queries: AtomicUsize::new(0),
        }
    }

    pub(super) fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub(super) fn masked_only_queries(&self) -> usize {
        self.masked_only_queries.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl VehicleRecordStore for CountingStore {
    async fn vehicle(
        &self,
        owner_uid: &str,
        vehicle_id: &str,
    ) -> Result<Option<VehicleDocument>, RepositoryError> {
        self.hit();
        self.inner.vehicle(owner_uid, vehicle_id).await
    }

    async fn maintenance_records(
        &self,
        owner_uid: &str,
        vehicle_id: &str,
    ) -> Result<Vec<MaintenanceDocument>, RepositoryError> {
        self.hit();
        self.inner.maintenance_records(owner_uid, vehicle_id).await
    }

    async fn fuel_logs(
        &self,
        owner_uid: &str,
        vehicle_id: &str,
    ) -> Result<Vec<FuelLogDocument>, RepositoryError> {
        self.hit();
        self.inner.fuel_logs(owner_uid, vehicle_id).await
    }

    async fn customizations(
        &self,
        owner_uid: &str,
        vehicle_id: &str,
    ) -> Result<Vec<CustomizationDocument>, RepositoryError> {
        self.hit();
        self.inner.customizations(owner_uid, vehicle_id).await
    }

    async fn evidence(
        &self,
        vehicle_id: &str,
        scope: EvidenceScope,
    ) -> Result<Vec<EvidenceDocument>, RepositoryError> {
        self.hit();
        if scope == EvidenceScope::MaskedOnly {
            self.masked_only_queries.fetch_add(1, Ordering::SeqCst);
        }
        self.inner.evidence(vehicle_id, scope).await
    }
}

pub(super) struct UnavailableStore;

fn offline() -> RepositoryError {
    RepositoryError::Unavailable("connection refused".to_string())
}

#[async_trait]
impl VehicleRecordStore for UnavailableStore {
    async fn vehicle(
        &self,
        _owner_uid: &str,
        _vehicle_id: &str,
    ) -> Result<Option<VehicleDocument>, RepositoryError> {
        Err(offline())
    }

    async fn maintenance_records(
        &self,
        _owner_uid: &str,
        _vehicle_id: &str,
    ) -> Result<Vec<MaintenanceDocument>, RepositoryError> {
        Err(offline())
    }

    async fn fuel_logs(
        &self,
        _owner_uid: &str,
        _vehicle_id: &str,
    ) -> Result<Vec<FuelLogDocument>, RepositoryError> {
        Err(offline())
    }

    async fn customizations(
        &self,
        _owner_uid: &str,
        _vehicle_id: &str,
    ) -> Result<Vec<CustomizationDocument>, RepositoryError> {
        Err(offline())
    }

    async fn evidence(
        &self,
        _vehicle_id: &str,
        _scope: EvidenceScope,
    ) -> Result<Vec<EvidenceDocument>, RepositoryError> {
        Err(offline())
    }
}

#[async_trait]
impl SaleProfileStore for UnavailableStore {
    async fn find_by_slug(&self, _slug: &str) -> Result<Option<SaleProfile>, RepositoryError> {
        Err(offline())
    }
}

pub(super) struct FailingAnalytics;

#[async_trait]
impl AnalyticsSink for FailingAnalytics {
    async fn record(&self, _event: SalePageEvent) -> Result<(), AnalyticsError> {
        Err(AnalyticsError::Transport("collector down".to_string()))
    }
}
