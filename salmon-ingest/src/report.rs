//! Structured outcome of an ingestion run.

use salmon_schema::RegionKind;

/// Counts and rejected-feature names accumulated across one run.
///
/// Returned to the caller instead of living only in log output; the
/// summary line reproduces the run's one-line outcome.
///
/// # Examples
/// ```
/// use salmon_ingest::IngestReport;
/// use salmon_schema::RegionKind;
///
/// let mut report = IngestReport::new(RegionKind::Watershed, false);
/// report.record_added();
/// assert_eq!(
///     report.summary(),
///     "1 watersheds added, 0 watersheds were multipolygons and could not be added"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReport {
    /// Kind every feature in the run was ingested as.
    pub kind: RegionKind,
    /// Whether persistence was skipped.
    pub dry_run: bool,
    /// Features inserted as new rows (or that would be, in a dry run).
    pub regions_added: u64,
    /// Features that matched an existing natural key and were updated.
    pub regions_updated: u64,
    /// Features rejected because their geometry was multi-part.
    pub multipolygon_count: u64,
    /// Names of the rejected features, in source order.
    pub rejected_regions: Vec<String>,
}

impl IngestReport {
    /// An empty report for a run over `kind`.
    #[must_use]
    pub const fn new(kind: RegionKind, dry_run: bool) -> Self {
        Self {
            kind,
            dry_run,
            regions_added: 0,
            regions_updated: 0,
            multipolygon_count: 0,
            rejected_regions: Vec::new(),
        }
    }

    /// Features accepted for ingestion, whether inserted or updated.
    #[must_use]
    pub const fn region_count(&self) -> u64 {
        self.regions_added + self.regions_updated
    }

    /// Count a feature persisted as a new row.
    pub fn record_added(&mut self) {
        self.regions_added += 1;
    }

    /// Count a feature that updated an existing row.
    pub fn record_updated(&mut self) {
        self.regions_updated += 1;
    }

    /// Count a rejected multi-part feature, remembering its name.
    pub fn record_rejected(&mut self, name: impl Into<String>) {
        self.multipolygon_count += 1;
        self.rejected_regions.push(name.into());
    }

    /// The run's one-line outcome.
    #[must_use]
    pub fn summary(&self) -> String {
        let Self {
            kind,
            multipolygon_count,
            ..
        } = self;
        let region_count = self.region_count();
        if self.dry_run {
            format!(
                "DRY RUN: {region_count} potential {kind}s to add found, \
                 {multipolygon_count} {kind}s cannot be added because they were multipolygons"
            )
        } else {
            format!(
                "{region_count} {kind}s added, \
                 {multipolygon_count} {kind}s were multipolygons and could not be added"
            )
        }
    }
}
