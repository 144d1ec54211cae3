//! SQLite schema initialisation for the salmon occurrence database.

use rusqlite::{Connection, Error as SqliteError, OptionalExtension};
use thiserror::Error;

/// Version recorded by [`initialise_schema`]; bump alongside migrations.
pub const SCHEMA_VERSION: i64 = 1;

/// Initialise the salmon occurrence schema inside a SQLite database.
///
/// The function enables foreign keys, creates the region and population
/// tables with their indexes, and records the schema version. Existing
/// databases must already match the expected version; mismatches are
/// rejected so migrations can be applied explicitly.
///
/// The natural key index on `region(code, kind)` is deliberately
/// non-unique: upsert matching is the loader's responsibility.
///
/// # Examples
/// ```
/// use rusqlite::Connection;
/// use salmon_schema::initialise_schema;
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// initialise_schema(&mut conn).expect("create salmon schema");
///
/// let version: i64 = conn
///     .query_row("SELECT version FROM salmon_schema_version LIMIT 1", [], |row| row.get(0))
///     .expect("read schema version");
/// assert_eq!(version, 1);
/// ```
pub fn initialise_schema(connection: &mut Connection) -> Result<(), SchemaError> {
    connection
        .pragma_update(None, "foreign_keys", true)
        .map_err(|source| SchemaError::ForeignKeys { source })?;

    let transaction = connection
        .transaction()
        .map_err(|source| SchemaError::Migration {
            step: "begin schema transaction",
            source,
        })?;

    create_region_tables(&transaction)?;
    create_population_tables(&transaction)?;
    create_indexes(&transaction)?;
    ensure_schema_version(&transaction)?;

    transaction
        .commit()
        .map_err(|source| SchemaError::Migration {
            step: "commit schema transaction",
            source,
        })?;

    Ok(())
}

fn create_region_tables(transaction: &rusqlite::Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create region",
        "CREATE TABLE IF NOT EXISTS region (
            region_id INTEGER PRIMARY KEY,
            name TEXT,
            code TEXT,
            kind TEXT CHECK (kind IN ('basin', 'watershed')),
            boundary TEXT,
            outlet TEXT
        )",
    )?;
    run_migration_step(
        transaction,
        "create conservation_unit",
        "CREATE TABLE IF NOT EXISTS conservation_unit (
            conservation_unit_id INTEGER PRIMARY KEY,
            name TEXT,
            code TEXT,
            boundary TEXT,
            outlet TEXT
        )",
    )
}

fn create_population_tables(transaction: &rusqlite::Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create taxon",
        "CREATE TABLE IF NOT EXISTS taxon (
            taxon_id INTEGER PRIMARY KEY,
            common_name TEXT,
            scientific_name TEXT,
            subgroup TEXT
        )",
    )?;
    run_migration_step(
        transaction,
        "create reference",
        "CREATE TABLE IF NOT EXISTS reference (
            reference_id INTEGER PRIMARY KEY,
            code TEXT,
            abbrev_cite TEXT,
            full_citation TEXT
        )",
    )?;
    run_migration_step(
        transaction,
        "create phenology",
        "CREATE TABLE IF NOT EXISTS phenology (
            phenology_id INTEGER PRIMARY KEY,
            minimum REAL,
            maximum REAL,
            mean REAL,
            standard_deviation REAL,
            data_reference INTEGER REFERENCES reference(reference_id),
            precise_time_reference INTEGER REFERENCES reference(reference_id)
        )",
    )?;
    run_migration_step(
        transaction,
        "create population",
        "CREATE TABLE IF NOT EXISTS population (
            population_id INTEGER PRIMARY KEY,
            taxon_id INTEGER REFERENCES taxon(taxon_id),
            conservation_unit_id INTEGER
                REFERENCES conservation_unit(conservation_unit_id),
            overwinter INTEGER,
            extinct INTEGER,
            spawn_time_range INTEGER REFERENCES phenology(phenology_id),
            migration_time_range INTEGER REFERENCES phenology(phenology_id)
        )",
    )
}

fn create_indexes(transaction: &rusqlite::Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "index region natural key",
        "CREATE INDEX IF NOT EXISTS idx_region_code_kind ON region(code, kind)",
    )?;
    run_migration_step(
        transaction,
        "index conservation_unit code",
        "CREATE INDEX IF NOT EXISTS idx_conservation_unit_code ON conservation_unit(code)",
    )
}

fn ensure_schema_version(transaction: &rusqlite::Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create schema version table",
        "CREATE TABLE IF NOT EXISTS salmon_schema_version (
            version INTEGER PRIMARY KEY CHECK (version > 0),
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        ) WITHOUT ROWID",
    )?;

    let existing_version: Option<i64> = transaction
        .query_row(
            "SELECT version FROM salmon_schema_version LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|source| SchemaError::Migration {
            step: "read schema version",
            source,
        })?;

    match existing_version {
        Some(version) if version == SCHEMA_VERSION => {}
        Some(found) => {
            return Err(SchemaError::VersionMismatch {
                expected: SCHEMA_VERSION,
                found,
            });
        }
        None => {
            transaction
                .execute(
                    "INSERT INTO salmon_schema_version (version) VALUES (?1)",
                    [SCHEMA_VERSION],
                )
                .map_err(|source| SchemaError::Migration {
                    step: "record schema version",
                    source,
                })?;
        }
    }

    Ok(())
}

fn run_migration_step(
    transaction: &rusqlite::Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), SchemaError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| SchemaError::Migration { step, source })
}

/// Errors raised when initialising the salmon occurrence schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Enabling the foreign-key pragma failed.
    #[error("failed to enable SQLite foreign keys")]
    ForeignKeys {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// A DDL statement failed.
    #[error("failed to execute migration step '{step}'")]
    Migration {
        /// The migration step that failed.
        step: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// The database was created by a different schema version.
    #[error(
        "expected salmon schema version {expected} but found {found}; apply migrations before retrying"
    )]
    VersionMismatch {
        /// Version this build expects.
        expected: i64,
        /// Version recorded in the database.
        found: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn connection() -> Connection {
        Connection::open_in_memory().expect("create in-memory database")
    }

    #[rstest]
    fn creates_all_tables(mut connection: Connection) {
        initialise_schema(&mut connection).expect("initialise schema");
        for table in [
            "region",
            "conservation_unit",
            "taxon",
            "reference",
            "phenology",
            "population",
        ] {
            let count: i64 = connection
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .expect("query sqlite_master");
            assert_eq!(count, 1, "missing table {table}");
        }
    }

    #[rstest]
    fn initialising_twice_is_idempotent(mut connection: Connection) {
        initialise_schema(&mut connection).expect("first initialisation");
        initialise_schema(&mut connection).expect("second initialisation");
    }

    #[rstest]
    fn rejects_foreign_schema_version(mut connection: Connection) {
        initialise_schema(&mut connection).expect("initialise schema");
        connection
            .execute("UPDATE salmon_schema_version SET version = 99", [])
            .expect("bump version");

        let error = initialise_schema(&mut connection).expect_err("version mismatch should fail");
        assert!(matches!(
            error,
            SchemaError::VersionMismatch { expected: SCHEMA_VERSION, found: 99 }
        ));
    }

    #[rstest]
    fn natural_key_index_is_not_unique(mut connection: Connection) {
        initialise_schema(&mut connection).expect("initialise schema");
        // Duplicate (code, kind) pairs must be representable; dedup is the
        // loader's job, not the store's.
        for _ in 0..2 {
            connection
                .execute(
                    "INSERT INTO region (name, code, kind, boundary) VALUES ('a', 'A1', 'basin', 'SRID=4326;POLYGON((0 0,1 0,1 1,0 0))')",
                    [],
                )
                .expect("insert duplicate natural key");
        }
    }
}
