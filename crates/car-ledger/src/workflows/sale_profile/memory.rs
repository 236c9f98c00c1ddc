use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard};

use async_trait::async_trait;
use serde::Deserialize;

use super::domain::{
    CustomizationDocument, EvidenceDocument, FuelLogDocument, MaintenanceDocument, MaskStatus,
    SaleProfile, VehicleDocument,
};
use super::store::{
    AnalyticsError, AnalyticsSink, EvidenceScope, RepositoryError, SaleProfileStore,
    SalePageEvent, VehicleRecordStore,
};

/// JSON export of the document collections backing the in-memory store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarageDataset {
    #[serde(default)]
    pub vehicles: Vec<VehicleDocument>,
    #[serde(default)]
    pub maintenance_records: Vec<MaintenanceDocument>,
    #[serde(default)]
    pub fuel_logs: Vec<FuelLogDocument>,
    #[serde(default)]
    pub customizations: Vec<CustomizationDocument>,
    #[serde(default)]
    pub evidence: Vec<EvidenceDocument>,
    #[serde(default)]
    pub sale_profiles: Vec<SaleProfile>,
}

impl GarageDataset {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Process-local document store used by the CLI, the demo server and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGarage {
    data: Arc<RwLock<GarageDataset>>,
}

impl InMemoryGarage {
    pub fn new(dataset: GarageDataset) -> Self {
        Self {
            data: Arc::new(RwLock::new(dataset)),
        }
    }

    pub fn insert_maintenance<I>(&self, documents: I) -> Result<(), RepositoryError>
    where
        I: IntoIterator<Item = MaintenanceDocument>,
    {
        let mut guard = self
            .data
            .write()
            .map_err(|_| RepositoryError::Unavailable("garage lock poisoned".to_string()))?;
        guard.maintenance_records.extend(documents);
        Ok(())
    }

    pub fn sale_profiles(&self) -> Result<Vec<SaleProfile>, RepositoryError> {
        Ok(self.read()?.sale_profiles.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, GarageDataset>, RepositoryError> {
        self.data
            .read()
            .map_err(|_| RepositoryError::Unavailable("garage lock poisoned".to_string()))
    }
}

#[async_trait]
impl VehicleRecordStore for InMemoryGarage {
    async fn vehicle(
        &self,
        owner_uid: &str,
        vehicle_id: &str,
    ) -> Result<Option<VehicleDocument>, RepositoryError> {
        let guard = self.read()?;
        Ok(guard
            .vehicles
            .iter()
            .find(|vehicle| vehicle.id == vehicle_id && vehicle.owner_uid == owner_uid)
            .cloned())
    }

    async fn maintenance_records(
        &self,
        owner_uid: &str,
        vehicle_id: &str,
    ) -> Result<Vec<MaintenanceDocument>, RepositoryError> {
        let guard = self.read()?;
        Ok(guard
            .maintenance_records
            .iter()
            .filter(|record| record.owner_uid == owner_uid && record.vehicle_id == vehicle_id)
            .cloned()
            .collect())
    }

    async fn fuel_logs(
        &self,
        owner_uid: &str,
        vehicle_id: &str,
    ) -> Result<Vec<FuelLogDocument>, RepositoryError> {
        let guard = self.read()?;
        Ok(guard
            .fuel_logs
            .iter()
            .filter(|log| log.owner_uid == owner_uid && log.vehicle_id == vehicle_id)
            .cloned()
            .collect())
    }

    async fn customizations(
        &self,
        owner_uid: &str,
        vehicle_id: &str,
    ) -> Result<Vec<CustomizationDocument>, RepositoryError> {
        let guard = self.read()?;
        Ok(guard
            .customizations
            .iter()
            .filter(|item| item.owner_uid == owner_uid && item.vehicle_id == vehicle_id)
            .cloned()
            .collect())
    }

    async fn evidence(
        &self,
        vehicle_id: &str,
        scope: EvidenceScope,
    ) -> Result<Vec<EvidenceDocument>, RepositoryError> {
        let guard = self.read()?;
        Ok(guard
            .evidence
            .iter()
            .filter(|item| item.vehicle_id == vehicle_id)
            .filter(|item| match scope {
                EvidenceScope::All => true,
                EvidenceScope::MaskedOnly => item.mask_status == MaskStatus::Masked,
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SaleProfileStore for InMemoryGarage {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<SaleProfile>, RepositoryError> {
        let guard = self.read()?;
        Ok(guard
            .sale_profiles
            .iter()
            .find(|profile| profile.slug.as_deref() == Some(slug))
            .cloned())
    }
}

/// Analytics sink that keeps events in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingAnalytics {
    events: Arc<Mutex<Vec<SalePageEvent>>>,
}

impl RecordingAnalytics {
    pub fn events(&self) -> Result<Vec<SalePageEvent>, AnalyticsError> {
        self.events
            .lock()
            .map(|events| events.clone())
            .map_err(|_| AnalyticsError::Transport("analytics lock poisoned".to_string()))
    }
}

#[async_trait]
impl AnalyticsSink for RecordingAnalytics {
    async fn record(&self, event: SalePageEvent) -> Result<(), AnalyticsError> {
        self.events
            .lock()
            .map_err(|_| AnalyticsError::Transport("analytics lock poisoned".to_string()))?
            .push(event);
        Ok(())
    }
}
