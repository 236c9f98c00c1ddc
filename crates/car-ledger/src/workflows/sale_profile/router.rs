use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::error;

use super::service::{SalePageError, SalePageService};
use super::store::{AnalyticsSink, SaleProfileStore, VehicleRecordStore};
use super::views::SalePublicViewModel;

/// Router exposing the read-only public sale page endpoints.
pub fn sale_page_router<P, S, A>(service: Arc<SalePageService<P, S, A>>) -> Router
where
    P: SaleProfileStore + 'static,
    S: VehicleRecordStore + 'static,
    A: AnalyticsSink + 'static,
{
    Router::new()
        .route("/api/v1/sale/:slug", get(public_page_handler::<P, S, A>))
        .route(
            "/api/v1/sale/:slug/verification",
            get(verification_handler::<P, S, A>),
        )
        .with_state(service)
}

/// JSON for a public page. Drops `storagePath` from every evidence entry so
/// only masked derivatives reach the browser.
pub fn public_page_json(view: &SalePublicViewModel) -> Result<Value, serde_json::Error> {
    let mut value = serde_json::to_value(view)?;
    if let Some(evidences) = value.get_mut("evidences").and_then(Value::as_array_mut) {
        for entry in evidences.iter_mut() {
            if let Some(fields) = entry.as_object_mut() {
                fields.remove("storagePath");
            }
        }
    }
    Ok(value)
}

pub(crate) async fn public_page_handler<P, S, A>(
    State(service): State<Arc<SalePageService<P, S, A>>>,
    Path(slug): Path<String>,
) -> Response
where
    P: SaleProfileStore + 'static,
    S: VehicleRecordStore + 'static,
    A: AnalyticsSink + 'static,
{
    match service.public_view(&slug, Utc::now()).await {
        Ok(view) => match public_page_json(&view) {
            Ok(payload) => (StatusCode::OK, axum::Json(payload)).into_response(),
            Err(err) => internal_error(&slug, &err.to_string()),
        },
        Err(err) => error_response(&slug, err),
    }
}

pub(crate) async fn verification_handler<P, S, A>(
    State(service): State<Arc<SalePageService<P, S, A>>>,
    Path(slug): Path<String>,
) -> Response
where
    P: SaleProfileStore + 'static,
    S: VehicleRecordStore + 'static,
    A: AnalyticsSink + 'static,
{
    match service.verification(&slug, Utc::now()).await {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(&slug, err),
    }
}

fn error_response(slug: &str, err: SalePageError) -> Response {
    match err {
        SalePageError::NotFound => {
            let payload = json!({ "error": SalePageError::NotFound.to_string() });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        other => internal_error(slug, &other.to_string()),
    }
}

fn internal_error(slug: &str, message: &str) -> Response {
    error!(slug, error = message, "sale page request failed");
    let payload = json!({ "error": message });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
