use crate::infra::{end_of_day, load_garage, parse_date};
use car_ledger::error::AppError;
use car_ledger::workflows::maintenance_import::MaintenanceCsvImporter;
use car_ledger::workflows::sale_profile::{
    public_page_json, RecordingAnalytics, SalePageError, SalePageService,
    SalePublicViewModel,
};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct PreviewArgs {
    /// JSON dataset export containing vehicles, records and sale profiles
    #[arg(long)]
    pub(crate) dataset: PathBuf,
    /// Slug of the sale profile to render
    #[arg(long)]
    pub(crate) slug: String,
    /// Render as of this date (YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) now: Option<NaiveDate>,
    /// Maintenance CSV export to merge into the profile's vehicle first
    #[arg(long)]
    pub(crate) maintenance_csv: Option<PathBuf>,
    /// Print the public JSON payload instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_preview(args: PreviewArgs) -> Result<(), AppError> {
    let output = render_preview(args).await?;
    println!("{output}");
    Ok(())
}

async fn render_preview(args: PreviewArgs) -> Result<String, AppError> {
    let PreviewArgs {
        dataset,
        slug,
        now,
        maintenance_csv,
        json,
    } = args;

    let garage = Arc::new(load_garage(Some(dataset.as_path()))?);
    let profile = garage
        .sale_profiles()
        .map_err(SalePageError::from)?
        .into_iter()
        .find(|profile| profile.slug.as_deref() == Some(slug.as_str()))
        .ok_or(SalePageError::NotFound)?;

    if let Some(path) = maintenance_csv {
        let documents =
            MaintenanceCsvImporter::from_path(&path, &profile.owner_uid, &profile.vehicle_id)?;
        garage
            .insert_maintenance(documents)
            .map_err(SalePageError::from)?;
    }

    let now = now.map(end_of_day).unwrap_or_else(Utc::now);
    let service = SalePageService::new(
        garage.clone(),
        garage,
        Arc::new(RecordingAnalytics::default()),
    );
    let view = service
        .preview(&profile, now)
        .await?
        .ok_or(SalePageError::NotFound)?;

    if json {
        let payload = public_page_json(&view)?;
        return Ok(serde_json::to_string_pretty(&payload)?);
    }

    Ok(render_summary(&view, profile.visibility.label()))
}

pub(crate) fn render_summary(view: &SalePublicViewModel, visibility: &str) -> String {
    let vehicle = &view.vehicle;
    let mut lines = vec![format!("Sale page preview: {}", vehicle.name)];
    if let Some(slug) = &view.slug {
        lines.push(format!("  Slug: {slug} ({visibility})"));
    }
    if let Some(verification_id) = &view.verification_id {
        lines.push(format!("  Verification: {verification_id}"));
    }
    lines.push(format!(
        "  Policy: amounts {}, evidence {}, top {}",
        on_off(view.policy.include_amounts),
        on_off(view.policy.include_evidence),
        view.policy.highlight_top_n
    ));
    let counts = view.record_counts;
    lines.push(format!(
        "  Records: {} maintenance, {} fuel logs, {} customizations",
        counts.maintenance, counts.fuel_logs, counts.customizations
    ));

    lines.push(String::new());
    lines.push("Recent 12 months".to_string());
    if view.recent_12_months_summary.is_empty() {
        lines.push("  (no classified maintenance)".to_string());
    }
    for entry in &view.recent_12_months_summary {
        let date = entry.date.map(short_date).unwrap_or_else(|| "undated".to_string());
        let mut line = format!("  {} {} [{}]", date, entry.title, entry.category.label());
        if let Some(amount) = entry.amount_yen {
            line.push_str(&format!(" ¥{amount}"));
        }
        if entry.has_evidence {
            line.push_str(" (evidence)");
        }
        lines.push(line);
    }
    if view.unclassified_count > 0 {
        lines.push(format!(
            "  {} unclassified record(s) not shown",
            view.unclassified_count
        ));
    }

    lines.push(String::new());
    lines.push("Consumables".to_string());
    for (category, history) in view.consumables.entries() {
        let last = if history.is_empty() {
            "never".to_string()
        } else {
            history
                .latest()
                .and_then(|event| event.date)
                .map(short_date)
                .unwrap_or_else(|| "undated".to_string())
        };
        lines.push(format!(
            "  {:<10} {} event(s), last {}",
            category.label(),
            history.len(),
            last
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Preventive maintenance: {} | Installed customizations: {} | Published evidence: {}",
        view.preventive_maintenance.len(),
        view.customizations.len(),
        view.evidences.len()
    ));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn short_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "shown"
    } else {
        "hidden"
    }
}
