use async_trait::async_trait;
use car_ledger::error::AppError;
use car_ledger::workflows::sale_profile::{
    AnalyticsError, AnalyticsSink, GarageDataset, InMemoryGarage, SalePageEvent,
};
use chrono::{DateTime, NaiveDate, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Emits sale page events into the service log.
#[derive(Debug, Default, Clone)]
pub(crate) struct LogAnalyticsSink;

#[async_trait]
impl AnalyticsSink for LogAnalyticsSink {
    async fn record(&self, event: SalePageEvent) -> Result<(), AnalyticsError> {
        info!(
            slug = %event.slug,
            kind = ?event.kind,
            occurred_at = %event.occurred_at,
            "sale page event"
        );
        Ok(())
    }
}

pub(crate) fn load_garage(dataset: Option<&Path>) -> Result<InMemoryGarage, AppError> {
    let Some(path) = dataset else {
        info!("no dataset configured, starting with an empty garage");
        return Ok(InMemoryGarage::default());
    };

    let dataset = GarageDataset::from_path(path)?;
    info!(
        path = %path.display(),
        vehicles = dataset.vehicles.len(),
        sale_profiles = dataset.sale_profiles.len(),
        "loaded garage dataset"
    );
    Ok(InMemoryGarage::new(dataset))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Last second of `date` in UTC, so records logged that day fall inside the
/// recent window.
pub(crate) fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(23, 59, 59)
        .map(|value| value.and_utc())
        .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN).and_utc())
}
