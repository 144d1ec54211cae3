//! SQLite-backed region store.

use std::fmt;
use std::path::Path;

use rusqlite::{Connection, OpenFlags, OptionalExtension, params};

use crate::geometry::Outlet;
use crate::region::{Region, RegionKind};
use crate::schema::initialise_schema;

use super::{RegionId, RegionStore, StoreError};

/// Region store writing EWKT geometry literals into SQLite.
///
/// Each insert or update is its own implicit transaction, mirroring the
/// per-feature commit policy of the ingestion run: rows written before a
/// later failure stay written.
pub struct SqliteRegionStore {
    connection: Connection,
}

impl fmt::Debug for SqliteRegionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteRegionStore").finish_non_exhaustive()
    }
}

impl SqliteRegionStore {
    /// Open (or create) the database at `path` and initialise the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let mut connection = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        initialise_schema(&mut connection)?;
        Ok(Self { connection })
    }

    /// Open an existing database read-only, leaving the schema untouched.
    ///
    /// Suits runs that only look up regions: a missing database file is an
    /// error, never created.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let connection = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|source| StoreError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self { connection })
    }

    /// Wrap an already-open connection, initialising the schema if needed.
    pub fn from_connection(mut connection: Connection) -> Result<Self, StoreError> {
        initialise_schema(&mut connection)?;
        Ok(Self { connection })
    }

    /// Borrow the underlying connection, e.g. for read-back in tests.
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

fn outlet_ewkt(region: &Region) -> Option<String> {
    region.outlet.as_ref().map(Outlet::ewkt)
}

impl RegionStore for SqliteRegionStore {
    fn find_region(&self, code: &str, kind: RegionKind) -> Result<Option<RegionId>, StoreError> {
        let row = match kind {
            RegionKind::ConservationUnit => self
                .connection
                .query_row(
                    "SELECT conservation_unit_id FROM conservation_unit
                        WHERE code = ?1 LIMIT 1",
                    [code],
                    |row| row.get::<_, i64>(0),
                )
                .optional(),
            RegionKind::Basin | RegionKind::Watershed => self
                .connection
                .query_row(
                    "SELECT region_id FROM region
                        WHERE code = ?1 AND kind = ?2 LIMIT 1",
                    params![code, kind.as_str()],
                    |row| row.get::<_, i64>(0),
                )
                .optional(),
        }
        .map_err(|source| StoreError::Sqlite {
            operation: "look up region by natural key",
            source,
        })?;
        Ok(row.map(RegionId::new))
    }

    fn insert_region(&mut self, region: &Region) -> Result<RegionId, StoreError> {
        match region.kind {
            RegionKind::ConservationUnit => self
                .connection
                .execute(
                    "INSERT INTO conservation_unit (name, code, boundary, outlet)
                        VALUES (?1, ?2, ?3, ?4)",
                    params![
                        region.name,
                        region.code,
                        region.boundary.ewkt(),
                        outlet_ewkt(region),
                    ],
                )
                .map(|_| ()),
            RegionKind::Basin | RegionKind::Watershed => self
                .connection
                .execute(
                    "INSERT INTO region (name, code, kind, boundary, outlet)
                        VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        region.name,
                        region.code,
                        region.kind.as_str(),
                        region.boundary.ewkt(),
                        outlet_ewkt(region),
                    ],
                )
                .map(|_| ()),
        }
        .map_err(|source| StoreError::Sqlite {
            operation: "insert region",
            source,
        })?;
        Ok(RegionId::new(self.connection.last_insert_rowid()))
    }

    fn update_region(&mut self, id: RegionId, region: &Region) -> Result<(), StoreError> {
        match region.kind {
            RegionKind::ConservationUnit => self.connection.execute(
                "UPDATE conservation_unit
                    SET name = ?1, boundary = ?2, outlet = ?3
                    WHERE conservation_unit_id = ?4",
                params![
                    region.name,
                    region.boundary.ewkt(),
                    outlet_ewkt(region),
                    id.into_inner(),
                ],
            ),
            RegionKind::Basin | RegionKind::Watershed => self.connection.execute(
                "UPDATE region
                    SET name = ?1, boundary = ?2, outlet = ?3
                    WHERE region_id = ?4",
                params![
                    region.name,
                    region.boundary.ewkt(),
                    outlet_ewkt(region),
                    id.into_inner(),
                ],
            ),
        }
        .map_err(|source| StoreError::Sqlite {
            operation: "update region",
            source,
        })
        .map(|_| ())
    }
}
