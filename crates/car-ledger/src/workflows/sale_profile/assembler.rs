use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::accessors::{EntityAccessors, RetrievalWindow};
use super::consumables::{build_consumable_history, ConsumableTable};
use super::domain::{
    Customization, CustomizationStatus, Evidence, MaintenanceRecord, SaleProfile, Vehicle,
};
use super::evidence::EvidenceIndex;
use super::highlights::{rank_highlights, HighlightCandidate};
use super::policy::RedactionPolicy;
use super::preventive::{extract_preventive, PreventiveEntry};
use super::store::{EvidenceScope, RepositoryError, VehicleRecordStore};
use super::timestamp::newest_first;
use super::views::{
    CustomizationView, EvidenceView, HighlightView, RecordCounts, SalePublicViewModel,
    VehicleSummaryView,
};

pub const VERIFICATION_PREFIX: &str = "VRF-";
const VERIFICATION_SLUG_CHARS: usize = 8;

/// Short slug-derived integrity reference shown on public pages.
pub fn verification_id(slug: Option<&str>) -> Option<String> {
    let slug = slug.filter(|slug| !slug.trim().is_empty())?;
    let head: String = slug.chars().take(VERIFICATION_SLUG_CHARS).collect();
    Some(format!("{VERIFICATION_PREFIX}{}", head.to_uppercase()))
}

#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Everything the public page needs, gathered and ranked but not yet redacted.
///
/// [`SaleDataSnapshot::project`] is the single place where amounts and
/// evidence are filtered, so the same snapshot can be projected under another
/// amount policy without re-running the pipeline.
///
/// Only the amount flag may be re-projected. Masked evidence is fetched only
/// when the snapshot is built with evidence enabled, so a later projection can
/// narrow evidence away but never widen it back in.
#[derive(Debug, Clone)]
pub struct SaleDataSnapshot {
    slug: Option<String>,
    vehicle: Vehicle,
    highlights: Vec<HighlightCandidate>,
    consumables: ConsumableTable,
    preventive: Vec<PreventiveEntry>,
    unclassified_count: usize,
    evidence_index: EvidenceIndex,
    masked_evidence: Vec<Evidence>,
    evidence_fetched: bool,
    installed_customizations: Vec<Customization>,
    record_counts: RecordCounts,
    updated_at: Option<DateTime<Utc>>,
    highlight_top_n: usize,
}

impl SaleDataSnapshot {
    pub fn project(&self, policy: &RedactionPolicy) -> SalePublicViewModel {
        let include_evidence = policy.include_evidence && self.evidence_fetched;
        let recent_12_months_summary = self
            .highlights
            .iter()
            .map(|candidate| HighlightView {
                record_id: candidate.record_id.clone(),
                date: candidate.date,
                category: candidate.category.clone(),
                title: candidate.title.clone(),
                mileage_km: candidate.mileage_km,
                amount_yen: policy.amount(candidate.cost_yen),
                is_preventive: candidate.is_preventive,
                has_evidence: self.evidence_index.has_evidence(&candidate.record_id),
            })
            .collect();

        let evidences = if include_evidence {
            self.masked_evidence
                .iter()
                .filter_map(|evidence| {
                    let masked_storage_path = evidence.public_path()?.to_string();
                    Some(EvidenceView {
                        id: evidence.id.clone(),
                        record_id: evidence.record_id.clone(),
                        storage_path: evidence.storage_path.clone(),
                        masked_storage_path,
                    })
                })
                .collect()
        } else {
            Vec::new()
        };

        let customizations = self
            .installed_customizations
            .iter()
            .map(|customization| CustomizationView {
                id: customization.id.clone(),
                title: customization.title.clone(),
                brand: customization.brand.clone(),
                model_code: customization.model_code.clone(),
                categories: customization.categories.clone(),
                status: customization.status,
                date: customization.date,
                odo_km: customization.odo_km,
                parts_cost_jpy: policy.amount(customization.parts_cost_jpy),
                labor_cost_jpy: policy.amount(customization.labor_cost_jpy),
                other_cost_jpy: policy.amount(customization.other_cost_jpy),
                total_cost_jpy: policy.amount(customization.total_cost_jpy()),
                vendor_type: customization.vendor_type.clone(),
                vendor_name: customization.vendor_name.clone(),
                link: customization.link.clone(),
                memo: customization.memo.clone(),
                has_evidence: self.evidence_index.has_evidence(&customization.id),
            })
            .collect();

        SalePublicViewModel {
            slug: self.slug.clone(),
            verification_id: verification_id(self.slug.as_deref()),
            vehicle: VehicleSummaryView::from(&self.vehicle),
            policy: RedactionPolicy {
                highlight_top_n: self.highlight_top_n,
                include_evidence,
                ..*policy
            },
            recent_12_months_summary,
            consumables: self.consumables.clone(),
            preventive_maintenance: self.preventive.clone(),
            unclassified_count: self.unclassified_count,
            evidences,
            customizations,
            record_counts: self.record_counts,
            updated_at: self.updated_at,
        }
    }
}

/// Builds the public view-model for a sale profile.
pub struct SalePublicViewModelAssembler<S> {
    accessors: EntityAccessors<S>,
}

impl<S> SalePublicViewModelAssembler<S>
where
    S: VehicleRecordStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            accessors: EntityAccessors::new(store),
        }
    }

    /// Returns `Ok(None)` when the profile's vehicle does not resolve.
    ///
    /// Visibility is not checked here; callers must refuse disabled profiles
    /// before calling.
    pub async fn generate(
        &self,
        profile: &SaleProfile,
        now: DateTime<Utc>,
    ) -> Result<Option<SalePublicViewModel>, AssemblyError> {
        let policy = RedactionPolicy::from_profile(profile);
        let snapshot = self.snapshot(profile, &policy, now).await?;
        Ok(snapshot.map(|snapshot| snapshot.project(&policy)))
    }

    pub async fn snapshot(
        &self,
        profile: &SaleProfile,
        policy: &RedactionPolicy,
        now: DateTime<Utc>,
    ) -> Result<Option<SaleDataSnapshot>, AssemblyError> {
        let owner_uid = profile.owner_uid.as_str();
        let vehicle_id = profile.vehicle_id.as_str();

        let (vehicle, maintenance, fuel_logs, customizations, all_evidence) = tokio::try_join!(
            self.accessors.vehicle(owner_uid, vehicle_id),
            self.accessors
                .maintenance_records(owner_uid, vehicle_id, RetrievalWindow::AllTime),
            self.accessors.fuel_logs(owner_uid, vehicle_id),
            self.accessors.customizations(owner_uid, vehicle_id),
            self.accessors.evidence(vehicle_id, EvidenceScope::All),
        )?;

        let Some(vehicle) = vehicle else {
            debug!(
                profile_id = %profile.id,
                vehicle_id,
                "sale profile vehicle not found"
            );
            return Ok(None);
        };

        let recent_window = RetrievalWindow::recent(now);
        let unclassified_count = maintenance
            .iter()
            .filter(|record| !record.is_classified() && recent_window.contains(record.date))
            .count();

        let record_counts = RecordCounts {
            maintenance: maintenance.len(),
            fuel_logs: fuel_logs.len(),
            customizations: customizations.len(),
        };

        let evidence_index = EvidenceIndex::from_evidence(&all_evidence);

        let classified: Vec<MaintenanceRecord> = maintenance
            .into_iter()
            .filter(MaintenanceRecord::is_classified)
            .collect();
        let recent_classified: Vec<MaintenanceRecord> = classified
            .iter()
            .filter(|record| recent_window.contains(record.date))
            .cloned()
            .collect();

        let highlights = rank_highlights(&recent_classified, policy.highlight_top_n);
        let consumables = build_consumable_history(&classified);
        let preventive = extract_preventive(&classified);

        let masked_evidence = if policy.include_evidence {
            self.accessors
                .evidence(vehicle_id, EvidenceScope::MaskedOnly)
                .await?
        } else {
            Vec::new()
        };

        let mut installed_customizations: Vec<Customization> = customizations
            .into_iter()
            .filter(|customization| customization.status == CustomizationStatus::Installed)
            .collect();
        installed_customizations.sort_by(|left, right| newest_first(left.date, right.date));

        info!(
            profile_id = %profile.id,
            vehicle_id,
            highlights = highlights.len(),
            unclassified_count,
            evidence_backed = evidence_index.len(),
            masked_evidence = masked_evidence.len(),
            "assembled sale page data"
        );

        Ok(Some(SaleDataSnapshot {
            slug: profile.slug.clone(),
            vehicle,
            highlights,
            consumables,
            preventive,
            unclassified_count,
            evidence_index,
            masked_evidence,
            evidence_fetched: policy.include_evidence,
            installed_customizations,
            record_counts,
            updated_at: profile.updated_at.as_ref().and_then(|raw| raw.normalize()),
            highlight_top_n: policy.highlight_top_n,
        }))
    }
}
