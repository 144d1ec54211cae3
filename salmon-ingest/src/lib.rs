//! Shapefile-to-database ingestion for salmon occurrence regions.
//!
//! Responsibilities:
//! - Resolve logical field names against a source's attribute table.
//! - Validate per-feature geometry (single polygons only).
//! - Upsert regions by natural key through a [`salmon_schema::RegionStore`].
//! - Report counts and rejected features back to the caller.
//!
//! Boundaries:
//! - Domain types and persistence live in `salmon-schema`.
//! - Feature sources are a capability trait; the shapefile adapter is one
//!   implementation.
//!
//! Invariants:
//! - Strictly sequential, one feature at a time.
//! - Per-feature commit; a later failure never rolls back earlier rows.
//! - No global mutable state: configuration in, report out.

#![forbid(unsafe_code)]

mod ingest;
mod mapping;
mod report;
mod source;
pub mod test_support;

pub use ingest::{IngestError, IngestOptions, ingest_regions};
pub use mapping::{FieldMapping, MappingError, OutletFields, ResolvedFields};
pub use report::IngestReport;
pub use source::{
    AttributeValue, FeatureSource, FeatureSourceError, ShapefileSource, SourceFeature,
};
