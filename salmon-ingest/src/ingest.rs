//! The region upsert engine: validate, extract, look up, persist.

use log::{info, warn};
use thiserror::Error;

use salmon_schema::{Outlet, PolygonWkt, Region, RegionKind, RegionStore, StoreError};

use crate::mapping::{OutletFields, ResolvedFields};
use crate::report::IngestReport;
use crate::source::{AttributeValue, FeatureSource, FeatureSourceError, SourceFeature};

/// Configuration for one ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    /// Kind assigned to every feature in the run.
    pub kind: RegionKind,
    /// Perform all validation and extraction but skip persistence.
    pub dry_run: bool,
}

/// Ingest every feature of `source` into `store` as regions of one kind.
///
/// Callers resolve the field mapping against the source's declared
/// attributes first ([`crate::FieldMapping::resolve`]); requiring resolved
/// fields here means configuration problems surface before a store need
/// even exist. Features whose geometry is not a single polygon are
/// skipped, counted and named in the report. Accepted features are
/// upserted by natural key: an existing `(code, kind)` row has its name,
/// boundary and outlet overwritten, otherwise a new row is inserted.
/// Writes commit per feature, so rows persisted before a later failure
/// remain in place.
pub fn ingest_regions<S, R>(
    source: &mut S,
    fields: &ResolvedFields,
    store: &mut R,
    options: IngestOptions,
) -> Result<IngestReport, IngestError>
where
    S: FeatureSource + ?Sized,
    R: RegionStore + ?Sized,
{
    let mut report = IngestReport::new(options.kind, options.dry_run);

    for feature in source.read_features()? {
        ingest_feature(&feature, fields, store, options, &mut report)?;
    }

    info!("{}", report.summary());
    Ok(report)
}

fn ingest_feature<R>(
    feature: &SourceFeature,
    resolved: &ResolvedFields,
    store: &mut R,
    options: IngestOptions,
    report: &mut IngestReport,
) -> Result<(), IngestError>
where
    R: RegionStore + ?Sized,
{
    let name = lookup_attribute(feature, &resolved.name)?.to_string();

    let boundary = match PolygonWkt::parse(feature.geometry_wkt()) {
        Ok(boundary) => boundary,
        Err(_) => {
            warn!("Could not add region {name} as it is not a single polygon");
            report.record_rejected(name);
            return Ok(());
        }
    };

    let code = lookup_attribute(feature, &resolved.code)?.to_string();
    let outlet = match &resolved.outlet {
        Some(fields) => Some(extract_outlet(feature, fields, &name)?),
        None => None,
    };

    info!(
        "Adding region {name} {} outlet data",
        match outlet {
            Some(Outlet::Point { .. }) => "with",
            Some(Outlet::Empty) | None => "without",
        }
    );

    let region = Region {
        name,
        code,
        kind: options.kind,
        boundary,
        outlet,
    };
    match store.find_region(&region.code, region.kind)? {
        Some(id) => {
            if !options.dry_run {
                store.update_region(id, &region)?;
            }
            report.record_updated();
        }
        None => {
            if !options.dry_run {
                store.insert_region(&region)?;
            }
            report.record_added();
        }
    }
    Ok(())
}

fn extract_outlet(
    feature: &SourceFeature,
    fields: &OutletFields,
    name: &str,
) -> Result<Outlet, IngestError> {
    let lat = lookup_attribute(feature, &fields.lat)?;
    let lon = lookup_attribute(feature, &fields.lon)?;
    if lat.is_empty() || lon.is_empty() {
        return Ok(Outlet::Empty);
    }
    match (lon.as_number(), lat.as_number()) {
        (Some(lon), Some(lat)) => Ok(Outlet::point(lon, lat)),
        _ => {
            warn!("Region {name} has non-numeric outlet coordinates; storing an empty outlet");
            Ok(Outlet::Empty)
        }
    }
}

fn lookup_attribute<'f>(
    feature: &'f SourceFeature,
    attribute: &str,
) -> Result<&'f AttributeValue, IngestError> {
    feature
        .lookup(attribute)
        .ok_or_else(|| IngestError::AttributeMissing {
            attribute: attribute.to_owned(),
        })
}

/// Errors that abort an ingestion run.
///
/// Per-feature shape rejections are not errors; they are counted in the
/// report and the run continues.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The feature source failed to open or decode.
    #[error(transparent)]
    Source(#[from] FeatureSourceError),
    /// The region store refused a lookup or write.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A resolved attribute was missing from an individual feature.
    #[error("attribute {attribute} not present in a feature")]
    AttributeMissing {
        /// The attribute absent from the feature.
        attribute: String,
    },
}
