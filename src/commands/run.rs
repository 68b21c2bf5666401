use crate::api::Mode;
use crate::commands::Out;
use crate::merge::{join, merge_contacts};
use crate::report::{
    aggregate_all_time, assign_tier, process_annual, write_report, ReportDir, ALL_TIME_LABEL,
};
use crate::shape::{shape_contacts, shape_donations};
use crate::{api, Config, Result};
use chrono::Datelike;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// What a run did.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
pub struct RunSummary {
    /// Donations returned by the CRM.
    pub donations: usize,
    /// Donors after merging contacts that share an account.
    pub donors: usize,
    /// Donations that matched a donor and are not in the future.
    pub joined: usize,
    /// The reports that were written, all-time first.
    pub reports: Vec<PathBuf>,
}

/// Fetches donations and contacts, then writes the all-time report and one report per year to
/// `<project_dir>/data`.
pub async fn run(config: Config, mode: Mode) -> Result<Out<RunSummary>> {
    debug!("Running in {mode} mode");
    let mut crm = api::crm(&config, mode).await?;
    let data = crm.get_data().await?;

    let donations = shape_donations(&data.opportunities)?;
    let contacts = shape_contacts(&data.contacts)?;
    let donors = merge_contacts(&contacts);
    let current_year = chrono::Local::now().year();
    let joined = join(&donations, &donors, current_year);
    debug!(
        "Joined {} of {} donations with {} donors",
        joined.len(),
        donations.len(),
        donors.len()
    );

    let dir = ReportDir::new(config.project_dir());
    let all_time = assign_tier(aggregate_all_time(&joined));
    let mut reports = vec![write_report(&dir, &all_time, ALL_TIME_LABEL).await?];
    reports.extend(process_annual(&dir, &joined).await?);

    let message = format!("Wrote {} reports to {}", reports.len(), dir.path().display());
    Ok(Out::new(
        message,
        RunSummary {
            donations: donations.len(),
            donors: donors.len(),
            joined: joined.len(),
            reports,
        },
    ))
}
