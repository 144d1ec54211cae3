//! Facade crate for the salmon occurrence database tooling.
//!
//! This crate re-exports the domain types, the region store, and the
//! shapefile ingestion pipeline so downstream tools depend on one name.

#![forbid(unsafe_code)]

pub use salmon_schema::{
    ConservationUnit, GeometryError, Outlet, ParseRegionKindError, Phenology, PolygonWkt,
    Population, Reference, Region, RegionId, RegionKind, RegionStore, SchemaError,
    SqliteRegionStore, StoreError, Taxon, WGS84_SRID, initialise_schema,
};

pub use salmon_ingest::{
    AttributeValue, FeatureSource, FeatureSourceError, FieldMapping, IngestError, IngestOptions,
    IngestReport, MappingError, OutletFields, ResolvedFields, ShapefileSource, SourceFeature,
    ingest_regions,
};
