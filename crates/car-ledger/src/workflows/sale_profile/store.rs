use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{
    CustomizationDocument, EvidenceDocument, FuelLogDocument, MaintenanceDocument, SaleProfile,
    VehicleDocument,
};

/// Which evidence documents a query should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceScope {
    All,
    MaskedOnly,
}

/// Raw collection reads against the document store.
///
/// Implementations return documents as stored, soft-deleted ones included;
/// [`EntityAccessors`](super::accessors::EntityAccessors) owns the live-row filter.
#[async_trait]
pub trait VehicleRecordStore: Send + Sync {
    async fn vehicle(
        &self,
        owner_uid: &str,
        vehicle_id: &str,
    ) -> Result<Option<VehicleDocument>, RepositoryError>;

    async fn maintenance_records(
        &self,
        owner_uid: &str,
        vehicle_id: &str,
    ) -> Result<Vec<MaintenanceDocument>, RepositoryError>;

    async fn fuel_logs(
        &self,
        owner_uid: &str,
        vehicle_id: &str,
    ) -> Result<Vec<FuelLogDocument>, RepositoryError>;

    async fn customizations(
        &self,
        owner_uid: &str,
        vehicle_id: &str,
    ) -> Result<Vec<CustomizationDocument>, RepositoryError>;

    async fn evidence(
        &self,
        vehicle_id: &str,
        scope: EvidenceScope,
    ) -> Result<Vec<EvidenceDocument>, RepositoryError>;
}

/// Lookup of sale profiles by their unique public slug.
#[async_trait]
pub trait SaleProfileStore: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<SaleProfile>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("document store unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for page analytics, keyed on the sale profile slug.
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn record(&self, event: SalePageEvent) -> Result<(), AnalyticsError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SalePageEventKind {
    PageViewed,
    VerificationChecked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalePageEvent {
    pub slug: String,
    pub kind: SalePageEventKind,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("analytics transport unavailable: {0}")]
    Transport(String),
}
