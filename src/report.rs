//! Sums donations per donor, sorts donors into giving levels and writes the CSV reports.
//!
//! A report is a single column. Each giving level gets a header row holding the level's label,
//! followed by one row per donor in that level:
//!
//! ```text
//! "<strong>Editor's Circle
//! $1,000-$2,499</strong>"
//! "John Doe"
//! "<strong>Ambassador
//! $500-$999</strong>"
//! "Jane Doe"
//! ```

use crate::model::{Aggregate, Amount, JoinedDonation, Period, Tier, TieredAggregate};
use crate::{utils, Result};
use anyhow::anyhow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// The file label of the report covering every year.
pub const ALL_TIME_LABEL: &str = "all-time-donations";

const DATA_DIR: &str = "data";

/// The directory that reports are written to, `<project_dir>/data`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ReportDir {
    path: PathBuf,
}

impl ReportDir {
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            path: project_dir.as_ref().join(DATA_DIR),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The path of the report labeled `label`, e.g. `<project_dir>/data/2016.csv`.
    pub fn report_path(&self, label: &str) -> PathBuf {
        self.path.join(format!("{label}.csv"))
    }
}

/// Sums donations by year and donor.
pub fn aggregate_by_year(joined: &[JoinedDonation]) -> Vec<Aggregate> {
    let mut sums: BTreeMap<(i32, &str, &str), Amount> = BTreeMap::new();
    for donation in joined {
        *sums
            .entry((donation.year(), donation.account_id(), donation.name()))
            .or_default() += donation.amount();
    }
    sums.into_iter()
        .map(|((year, account_id, name), amount)| {
            Aggregate::new(Period::Year(year), account_id, name, amount)
        })
        .collect()
}

/// Sums donations by donor across all years.
pub fn aggregate_all_time(joined: &[JoinedDonation]) -> Vec<Aggregate> {
    let mut sums: BTreeMap<(&str, &str), Amount> = BTreeMap::new();
    for donation in joined {
        *sums
            .entry((donation.account_id(), donation.name()))
            .or_default() += donation.amount();
    }
    sums.into_iter()
        .map(|((account_id, name), amount)| {
            Aggregate::new(Period::AllTime, account_id, name, amount)
        })
        .collect()
}

/// Places each aggregate in its giving level and sorts the result by level, highest first, then
/// by last name. An aggregate whose amount is below every level is left out.
pub fn assign_tier(aggregates: Vec<Aggregate>) -> Vec<TieredAggregate> {
    let mut tiered: Vec<TieredAggregate> = aggregates
        .into_iter()
        .filter_map(|aggregate| match Tier::for_amount(aggregate.amount()) {
            Some(tier) => Some(TieredAggregate::new(aggregate, tier)),
            None => {
                warn!(
                    "{} ({}) gave {} in {}, which is below every giving level",
                    aggregate.name(),
                    aggregate.account_id(),
                    aggregate.amount(),
                    aggregate.period()
                );
                None
            }
        })
        .collect();
    tiered.sort_by(|a, b| {
        b.tier()
            .cmp(&a.tier())
            .then_with(|| a.last_name().cmp(b.last_name()))
    });
    tiered
}

/// Lays out the rows of a report: a tier's label whenever the tier changes, then the names of
/// the donors in it. `tiered` is expected to be sorted already.
pub fn report_rows(tiered: &[TieredAggregate]) -> Vec<String> {
    let mut rows = Vec::new();
    let mut current: Option<Tier> = None;
    for donor in tiered {
        if current != Some(donor.tier()) {
            current = Some(donor.tier());
            rows.push(donor.tier().label().to_string());
        }
        rows.push(donor.name().to_string());
    }
    rows
}

/// Writes the report for `tiered` to `<dir>/<label>.csv`, creating `dir` if needed. Every field
/// is quoted. Returns the path of the written file.
pub async fn write_report(
    dir: &ReportDir,
    tiered: &[TieredAggregate],
    label: &str,
) -> Result<PathBuf> {
    utils::make_dir(dir.path()).await?;
    let path = dir.report_path(label);
    let data = encode(&report_rows(tiered))?;
    utils::write(&path, data).await?;
    debug!("Wrote {} donors to {}", tiered.len(), path.display());
    Ok(path)
}

/// Writes one report per year, for every year from the earliest to the latest donation in
/// `joined`. A year without donations in between still gets an (empty) report.
pub async fn process_annual(dir: &ReportDir, joined: &[JoinedDonation]) -> Result<Vec<PathBuf>> {
    let first = joined.iter().map(JoinedDonation::year).min();
    let last = joined.iter().map(JoinedDonation::year).max();
    let (first, last) = match first.zip(last) {
        Some(range) => range,
        None => {
            warn!("There are no donations, no annual reports will be written");
            return Ok(Vec::new());
        }
    };

    let tiered = assign_tier(aggregate_by_year(joined));
    let mut paths = Vec::new();
    for year in first..=last {
        let for_year: Vec<TieredAggregate> = tiered
            .iter()
            .filter(|t| t.period() == Period::Year(year))
            .cloned()
            .collect();
        if for_year.is_empty() {
            info!("No donations in {year}, writing an empty report");
        }
        paths.push(write_report(dir, &for_year, &year.to_string()).await?);
    }
    Ok(paths)
}

fn encode(rows: &[String]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());
    for row in rows {
        writer.write_record([row])?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow!("Unable to flush CSV data: {}", e.error()))
}
