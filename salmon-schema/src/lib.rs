//! Domain types and persistence for the salmon occurrence database.
//!
//! The schema records named geographic regions (basins, watersheds and
//! conservation units), the salmon taxa and populations that occupy them,
//! and the phenology and literature references describing those
//! populations. Geometry is carried as WKT text in WGS84 longitude/latitude
//! and persisted as EWKT literals.
//!
//! Constructors return `Result` to surface invalid input early; the region
//! store trait hides how the three region kinds map onto tables.

#![forbid(unsafe_code)]

mod geometry;
mod records;
mod region;
pub mod schema;
pub mod store;

pub use geometry::{GeometryError, Outlet, PolygonWkt, WGS84_SRID};
pub use records::{ConservationUnit, Phenology, Population, Reference, Taxon};
pub use region::{ParseRegionKindError, Region, RegionKind};
pub use schema::{SchemaError, initialise_schema};
pub use store::{RegionId, RegionStore, SqliteRegionStore, StoreError};
