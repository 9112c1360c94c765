use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::core::error::{AppError, Result};
use crate::features::output_details::clients::OutputDetailFetcher;
use crate::features::output_details::services::{qualify_region_codes, OutputDetailStore};
use crate::features::regions::{Region, RegionSource};

/// What happened to one region during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionOutcome {
    /// Listed before the resume point
    SkippedBeforeResume,
    /// Provider returned no records
    Empty,
    /// Records stored in one transaction
    Stored(usize),
    FetchFailed(String),
    PersistFailed(String),
}

impl RegionOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            RegionOutcome::FetchFailed(_) | RegionOutcome::PersistFailed(_)
        )
    }
}

/// Per-region outcomes of a completed run, in processing order
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<(Region, RegionOutcome)>,
    /// False when a resume code was given but no listed region matched it
    pub resume_point_found: bool,
}

impl SyncReport {
    fn new(resume_point_found: bool) -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            outcomes: Vec::new(),
            resume_point_found,
        }
    }

    pub fn stored_regions(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, RegionOutcome::Stored(_)))
            .count()
    }

    pub fn stored_records(&self) -> usize {
        self.outcomes
            .iter()
            .map(|(_, outcome)| match outcome {
                RegionOutcome::Stored(count) => *count,
                _ => 0,
            })
            .sum()
    }

    pub fn failed_regions(&self) -> Vec<&Region> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_failure())
            .map(|(region, _)| region)
            .collect()
    }
}

/// Drives a synchronization run: walks the regions in catalog order, fetching,
/// qualifying and storing the output details of each one.
///
/// Failures are isolated per region; only failing to list the regions aborts
/// the run. Regions are handled strictly one after another, with
/// `request_delay` between successfully stored regions to spare the provider.
pub struct OutputDetailSynchronizer {
    region_source: Arc<dyn RegionSource>,
    fetcher: Arc<dyn OutputDetailFetcher>,
    store: Arc<dyn OutputDetailStore>,
    request_delay: Duration,
    cancel: CancellationToken,
}

impl OutputDetailSynchronizer {
    pub fn new(
        region_source: Arc<dyn RegionSource>,
        fetcher: Arc<dyn OutputDetailFetcher>,
        store: Arc<dyn OutputDetailStore>,
        request_delay: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            region_source,
            fetcher,
            store,
            request_delay,
            cancel,
        }
    }

    /// Run one synchronization pass.
    ///
    /// `province_codes` restricts the regions (empty means all). When
    /// `resume_from_regency` is set, regions are skipped until the first one
    /// whose regency code matches; that region and everything after it is
    /// processed. A resume code that never matches processes nothing.
    pub async fn synchronize(
        &self,
        province_codes: &BTreeSet<String>,
        resume_from_regency: Option<&str>,
    ) -> Result<SyncReport> {
        let resume_from_regency = resume_from_regency.filter(|code| !code.is_empty());

        tracing::info!(
            "Starting output detail synchronization (provinces={:?}, resume_from={:?})",
            province_codes,
            resume_from_regency
        );

        // Nothing processed yet, so an interruption here resumes where the caller asked
        let regions = self
            .cancellable(
                self.region_source.get_regions(province_codes),
                resume_from_regency,
                None,
            )
            .await?
            .map_err(|e| AppError::RegionSource(e.to_string()))?;

        let mut processing_started = resume_from_regency.is_none();
        let mut report = SyncReport::new(processing_started);

        if regions.is_empty() {
            tracing::info!("No regions to synchronize");
            report.finished_at = Utc::now();
            return Ok(report);
        }

        tracing::info!("Processing output details for {} regencies", regions.len());

        for (index, region) in regions.iter().enumerate() {
            if !processing_started {
                if Some(region.regency_code.as_str()) != resume_from_regency {
                    tracing::debug!("Skipping {} (before resume point)", region);
                    report
                        .outcomes
                        .push((region.clone(), RegionOutcome::SkippedBeforeResume));
                    continue;
                }
                tracing::info!("Resume point reached at {}", region);
                processing_started = true;
                report.resume_point_found = true;
            }

            let outcome = self
                .process_region(region)
                .await
                .map_err(|e| warn_if_resume_ambiguous(e, &regions, index))?;
            let stored = matches!(outcome, RegionOutcome::Stored(_));
            report.outcomes.push((region.clone(), outcome));

            if stored {
                if let Some(next) = regions.get(index + 1) {
                    self.cancellable(
                        tokio::time::sleep(self.request_delay),
                        Some(next.regency_code.as_str()),
                        Some(next.province_code.as_str()),
                    )
                    .await
                    .map_err(|e| warn_if_resume_ambiguous(e, &regions, index + 1))?;
                }
            }
        }

        report.finished_at = Utc::now();

        if !report.resume_point_found {
            tracing::warn!(
                "Resume regency {:?} matched none of the {} listed regions; nothing was processed",
                resume_from_regency,
                regions.len()
            );
        }

        let failed = report.failed_regions();
        if !failed.is_empty() {
            tracing::warn!(
                "{} regions failed and can be re-run: {}",
                failed.len(),
                failed
                    .iter()
                    .map(|region| region.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        tracing::info!(
            "Synchronization finished: {} records stored across {} regions, {} failed, took {}s",
            report.stored_records(),
            report.stored_regions(),
            failed.len(),
            (report.finished_at - report.started_at).num_seconds()
        );

        Ok(report)
    }

    /// Fetch, qualify and store one region. Only cancellation is returned as an error.
    async fn process_region(&self, region: &Region) -> Result<RegionOutcome> {
        tracing::info!("=== Processing {} ===", region);

        let details = match self
            .cancellable(
                self.fetcher.fetch_output_details(region),
                Some(region.regency_code.as_str()),
                Some(region.province_code.as_str()),
            )
            .await?
        {
            Ok(details) => details,
            Err(e) => {
                tracing::error!(
                    "Failed to fetch output details for {}: {}. Continuing with next region.",
                    region,
                    e
                );
                return Ok(RegionOutcome::FetchFailed(e.to_string()));
            }
        };

        if details.is_empty() {
            tracing::info!("No output details for {}", region);
            return Ok(RegionOutcome::Empty);
        }

        let details = qualify_region_codes(details);
        let count = details.len();

        if let Err(e) = self
            .cancellable(
                self.store.store_output_details(&details),
                Some(region.regency_code.as_str()),
                Some(region.province_code.as_str()),
            )
            .await?
        {
            tracing::error!(
                "Failed to store output details for {}: {}. Continuing with next region.",
                region,
                e
            );
            return Ok(RegionOutcome::PersistFailed(e.to_string()));
        }

        tracing::info!("=== Stored {} output details for {} ===", count, region);

        Ok(RegionOutcome::Stored(count))
    }

    /// Race `fut` against the cancellation token. On cancellation the future is
    /// dropped and `resume_from` (in `province`) is reported as the point to
    /// restart from.
    async fn cancellable<F: Future>(
        &self,
        fut: F,
        resume_from: Option<&str>,
        province: Option<&str>,
    ) -> Result<F::Output> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::warn!(
                    "Synchronization cancelled; resume with regency {:?} (province {:?})",
                    resume_from,
                    province
                );
                Err(AppError::Cancelled {
                    resume_from: resume_from.map(str::to_string),
                    province: province.map(str::to_string),
                })
            }
            output = fut => Ok(output),
        }
    }
}

/// Earlier listed regions with the same regency code as `regions[index]`.
/// Resuming matches the regency code alone, so any of these would be picked first.
fn regions_shadowing(regions: &[Region], index: usize) -> Vec<&Region> {
    match regions.get(index) {
        Some(target) => regions[..index]
            .iter()
            .filter(|region| region.regency_code == target.regency_code)
            .collect(),
        None => Vec::new(),
    }
}

fn warn_if_resume_ambiguous(err: AppError, regions: &[Region], index: usize) -> AppError {
    if matches!(err, AppError::Cancelled { .. }) {
        let shadowing = regions_shadowing(regions, index);
        if let Some(first) = shadowing.first() {
            tracing::warn!(
                "Regency code {} also matches {} earlier region(s); resuming with it restarts at {}",
                first.regency_code,
                shadowing.len(),
                first
            );
        }
    }
    err
}
