//! Public sale page generation for a vehicle.
//!
//! Owner records are read through [`accessors::EntityAccessors`], ranked and
//! grouped by the highlight, consumable, preventive and evidence modules, and
//! projected into a [`SalePublicViewModel`] under the profile's
//! [`RedactionPolicy`].

pub mod accessors;
pub mod assembler;
pub mod consumables;
pub mod domain;
pub mod evidence;
pub mod highlights;
pub mod memory;
pub mod policy;
pub mod preventive;
pub mod router;
pub mod service;
pub mod store;
pub mod timestamp;
pub mod views;

#[cfg(test)]
mod tests;

pub use accessors::{recent_window_start, EntityAccessors, RetrievalWindow};
pub use assembler::{
    verification_id, AssemblyError, SaleDataSnapshot, SalePublicViewModelAssembler,
};
pub use consumables::{ConsumableEvent, ConsumableHistory, ConsumableTable};
pub use domain::{
    Customization, CustomizationStatus, Evidence, MaintenanceCategory, MaintenanceDocument,
    MaintenanceRecord, MaskStatus, RecordId, RecordTypeTag, SaleProfile, Vehicle, Visibility,
};
pub use evidence::EvidenceIndex;
pub use highlights::{priority_score, rank_highlights, HighlightCandidate};
pub use memory::{DatasetError, GarageDataset, InMemoryGarage, RecordingAnalytics};
pub use policy::RedactionPolicy;
pub use preventive::{extract_preventive, PreventiveEntry};
pub use router::{public_page_json, sale_page_router};
pub use service::{SalePageError, SalePageService};
pub use store::{
    AnalyticsError, AnalyticsSink, EvidenceScope, RepositoryError, SaleProfileStore,
    SalePageEvent, SalePageEventKind, VehicleRecordStore,
};
pub use timestamp::{to_iso_string, RawTimestamp};
pub use views::{
    CustomizationView, EvidenceView, HighlightView, RecordCounts, SalePublicViewModel,
    VehicleSummaryView, VerificationView,
};
