//! Import of maintenance logs exported as CSV.

mod normalizer;
mod parser;

use crate::workflows::sale_profile::domain::{MaintenanceDocument, RecordId};
use crate::workflows::sale_profile::timestamp::RawTimestamp;
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug)]
pub enum MaintenanceImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for MaintenanceImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaintenanceImportError::Io(err) => {
                write!(f, "failed to read maintenance export: {}", err)
            }
            MaintenanceImportError::Csv(err) => {
                write!(f, "invalid maintenance CSV data: {}", err)
            }
        }
    }
}

impl std::error::Error for MaintenanceImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MaintenanceImportError::Io(err) => Some(err),
            MaintenanceImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for MaintenanceImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for MaintenanceImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Turns a `Date,Title,Category,Mileage,Cost,Preventive,Type` export into
/// maintenance documents for one vehicle.
///
/// Dates are kept as text; they are normalized with every other stored date
/// when the records are read back.
pub struct MaintenanceCsvImporter;

impl MaintenanceCsvImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        owner_uid: &str,
        vehicle_id: &str,
    ) -> Result<Vec<MaintenanceDocument>, MaintenanceImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, owner_uid, vehicle_id)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        owner_uid: &str,
        vehicle_id: &str,
    ) -> Result<Vec<MaintenanceDocument>, MaintenanceImportError> {
        let documents: Vec<MaintenanceDocument> = parser::parse_rows(reader)?
            .into_iter()
            .enumerate()
            .map(|(index, row)| MaintenanceDocument {
                id: RecordId(format!("csv-{vehicle_id}-{:04}", index + 1)),
                owner_uid: owner_uid.to_string(),
                vehicle_id: vehicle_id.to_string(),
                date: row.date.map(RawTimestamp::Text),
                title: row.title,
                category: row.category,
                mileage: row.mileage,
                cost: row.cost,
                is_preventive: row.is_preventive,
                type_tag: row.type_tag,
                deleted_at: None,
            })
            .collect();

        info!(
            vehicle_id,
            imported = documents.len(),
            "imported maintenance CSV"
        );
        Ok(documents)
    }
}
