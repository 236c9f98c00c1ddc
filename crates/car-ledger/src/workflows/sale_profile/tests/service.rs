use std::sync::Arc;

use super::common::*;
use crate::workflows::sale_profile::domain::Visibility;
use crate::workflows::sale_profile::memory::{InMemoryGarage, RecordingAnalytics};
use crate::workflows::sale_profile::store::{RepositoryError, SalePageEventKind};
use crate::workflows::sale_profile::{SalePageError, SalePageService};

#[tokio::test]
async fn disabled_profile_is_not_found_without_querying_records() {
    let mut data = dataset(vec![MaintenanceFixture::new("m1", at(2025, 5, 1)).document()]);
    data.sale_profiles = vec![profile(Visibility::Disabled)];
    let profiles = garage(data.clone());
    let records = Arc::new(CountingStore::new(data));
    let analytics = RecordingAnalytics::default();
    let service = SalePageService::new(profiles, records.clone(), Arc::new(analytics.clone()));

    let page = service.public_view(SLUG, now()).await;
    let verification = service.verification(SLUG, now()).await;

    assert!(matches!(page, Err(SalePageError::NotFound)));
    assert!(matches!(verification, Err(SalePageError::NotFound)));
    assert_eq!(records.queries(), 0);
    assert!(analytics.events().expect("events readable").is_empty());
}

#[tokio::test]
async fn unknown_slug_is_not_found() {
    let (service, analytics) = build_service(dataset(Vec::new()));

    let result = service.public_view("no-such-page", now()).await;

    assert!(matches!(result, Err(SalePageError::NotFound)));
    assert!(analytics.events().expect("events readable").is_empty());
}

#[tokio::test]
async fn unlisted_pages_render_and_record_a_view() {
    let mut data = dataset(vec![MaintenanceFixture::new("m1", at(2025, 5, 1)).document()]);
    data.sale_profiles = vec![profile(Visibility::Unlisted)];
    let (service, analytics) = build_service(data);

    let view = service
        .public_view(SLUG, now())
        .await
        .expect("unlisted page renders");

    assert_eq!(view.slug.as_deref(), Some(SLUG));
    assert_eq!(view.vehicle.name, "Weekend roadster");
    let events = analytics.events().expect("events readable");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, SalePageEventKind::PageViewed);
    assert_eq!(events[0].slug, SLUG);
    assert_eq!(events[0].occurred_at, now());
}

#[tokio::test]
async fn profile_with_missing_vehicle_is_not_found() {
    let mut data = dataset(Vec::new());
    data.vehicles.clear();
    let (service, analytics) = build_service(data);

    let result = service.public_view(SLUG, now()).await;

    assert!(matches!(result, Err(SalePageError::NotFound)));
    assert!(analytics.events().expect("events readable").is_empty());
}

#[tokio::test]
async fn verification_returns_slug_reference_and_tracks_check() {
    let (service, analytics) = build_service(dataset(Vec::new()));

    let view = service
        .verification(SLUG, now())
        .await
        .expect("verification resolves");

    assert_eq!(view.slug, SLUG);
    assert_eq!(view.verification_id.as_deref(), Some("VRF-ROADSTER"));
    assert_eq!(
        analytics.events().expect("events readable")[0].kind,
        SalePageEventKind::VerificationChecked
    );
}

#[tokio::test]
async fn analytics_failure_does_not_fail_the_page() {
    let store = garage(dataset(Vec::new()));
    let service = SalePageService::new(store.clone(), store, Arc::new(FailingAnalytics));

    let view = service.public_view(SLUG, now()).await;

    assert!(view.is_ok());
}

#[tokio::test]
async fn preview_skips_the_visibility_gate() {
    let (service, analytics) = build_service(dataset(Vec::new()));

    let view = service
        .preview(&profile(Visibility::Disabled), now())
        .await
        .expect("preview assembles");

    assert!(view.is_some());
    assert!(analytics.events().expect("events readable").is_empty());
}

#[tokio::test]
async fn profile_store_outage_is_a_repository_error() {
    let service: SalePageService<UnavailableStore, InMemoryGarage, RecordingAnalytics> =
        SalePageService::new(
            Arc::new(UnavailableStore),
            garage(dataset(Vec::new())),
            Arc::new(RecordingAnalytics::default()),
        );

    let result = service.public_view(SLUG, now()).await;

    assert!(matches!(
        result,
        Err(SalePageError::Repository(RepositoryError::Unavailable(_)))
    ));
}
