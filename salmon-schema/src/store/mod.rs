//! Region persistence behind a natural-key upsert interface.
//!
//! The trait hides how the three region kinds map onto tables: basins and
//! watersheds share the `region` table, conservation units live in their
//! own. Callers look up by natural key first and then insert or update
//! explicitly; the store never deletes.

mod sqlite;

use std::path::PathBuf;

use thiserror::Error;

use crate::region::{Region, RegionKind};

pub use sqlite::SqliteRegionStore;

/// Store-assigned identity of a persisted region row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionId(i64);

impl RegionId {
    /// Wrap a raw row id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw row id.
    #[must_use]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

/// Natural-key lookup and persistence for regions.
///
/// Writes are committed individually; a failure partway through a run
/// leaves earlier rows in place.
pub trait RegionStore {
    /// Find the row matching `(code, kind)`, if one exists.
    fn find_region(&self, code: &str, kind: RegionKind) -> Result<Option<RegionId>, StoreError>;

    /// Insert a new region row and return its identity.
    fn insert_region(&mut self, region: &Region) -> Result<RegionId, StoreError>;

    /// Overwrite name, boundary and outlet of an existing row.
    fn update_region(&mut self, id: RegionId, region: &Region) -> Result<(), StoreError>;
}

/// Errors raised by region stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path:?}")]
    Open {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Schema initialisation failed on open.
    #[error(transparent)]
    Schema(#[from] crate::schema::SchemaError),
    /// A statement failed during lookup or persistence.
    #[error("failed to {operation}")]
    Sqlite {
        /// The operation that failed.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
}
