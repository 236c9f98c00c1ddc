use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::assembler::{verification_id, AssemblyError, SalePublicViewModelAssembler};
use super::domain::SaleProfile;
use super::store::{
    AnalyticsSink, RepositoryError, SaleProfileStore, SalePageEvent, SalePageEventKind,
    VehicleRecordStore,
};
use super::views::{SalePublicViewModel, VerificationView};

/// Public-page boundary: slug resolution, visibility gate, assembly, analytics.
pub struct SalePageService<P, S, A> {
    profiles: Arc<P>,
    assembler: SalePublicViewModelAssembler<S>,
    analytics: Arc<A>,
}

impl<P, S, A> SalePageService<P, S, A>
where
    P: SaleProfileStore + 'static,
    S: VehicleRecordStore + 'static,
    A: AnalyticsSink + 'static,
{
    pub fn new(profiles: Arc<P>, records: Arc<S>, analytics: Arc<A>) -> Self {
        Self {
            profiles,
            assembler: SalePublicViewModelAssembler::new(records),
            analytics,
        }
    }

    /// View-model for a public or unlisted page. Disabled profiles are
    /// reported as not found without touching the record store.
    pub async fn public_view(
        &self,
        slug: &str,
        now: DateTime<Utc>,
    ) -> Result<SalePublicViewModel, SalePageError> {
        let profile = self.resolve_published(slug).await?;
        let view = self
            .assembler
            .generate(&profile, now)
            .await?
            .ok_or(SalePageError::NotFound)?;

        self.track(slug, SalePageEventKind::PageViewed, now).await;
        Ok(view)
    }

    pub async fn verification(
        &self,
        slug: &str,
        now: DateTime<Utc>,
    ) -> Result<VerificationView, SalePageError> {
        let profile = self.resolve_published(slug).await?;
        self.track(slug, SalePageEventKind::VerificationChecked, now)
            .await;

        Ok(VerificationView {
            slug: slug.to_string(),
            verification_id: verification_id(profile.slug.as_deref()),
        })
    }

    /// Owner-side preview of a profile already in hand. No visibility gate and
    /// no analytics.
    pub async fn preview(
        &self,
        profile: &SaleProfile,
        now: DateTime<Utc>,
    ) -> Result<Option<SalePublicViewModel>, SalePageError> {
        Ok(self.assembler.generate(profile, now).await?)
    }

    async fn resolve_published(&self, slug: &str) -> Result<SaleProfile, SalePageError> {
        let profile = self
            .profiles
            .find_by_slug(slug)
            .await?
            .ok_or(SalePageError::NotFound)?;

        if profile.is_disabled() {
            info!(slug, profile_id = %profile.id, "sale page disabled");
            return Err(SalePageError::NotFound);
        }

        Ok(profile)
    }

    async fn track(&self, slug: &str, kind: SalePageEventKind, now: DateTime<Utc>) {
        let event = SalePageEvent {
            slug: slug.to_string(),
            kind,
            occurred_at: now,
        };
        if let Err(err) = self.analytics.record(event).await {
            warn!(slug, ?kind, error = %err, "failed to record sale page event");
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SalePageError {
    #[error("sale profile not found")]
    NotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}
