//! Storage-only records surrounding the region tables.
//!
//! These mirror the persisted schema one-to-one. Ingestion never touches
//! them; they exist so downstream loaders can share the same row types.

/// A conservation unit row. Natural key is `code` alone; the table has no
/// kind column because every row is implicitly a conservation unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ConservationUnit {
    /// Store-assigned identity.
    pub id: i64,
    /// Human-readable name.
    pub name: Option<String>,
    /// Natural-key code.
    pub code: Option<String>,
    /// Single-polygon boundary as EWKT text.
    pub boundary: Option<String>,
    /// Outlet point as EWKT text.
    pub outlet: Option<String>,
}

/// A salmon taxon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxon {
    /// Store-assigned identity.
    pub id: i64,
    /// Common name, e.g. "Chinook".
    pub common_name: Option<String>,
    /// Scientific name, e.g. "Oncorhynchus tshawytscha".
    pub scientific_name: Option<String>,
    /// Subgroup within the taxon, where one is recognised.
    pub subgroup: Option<String>,
}

/// A literature reference backing phenology data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Store-assigned identity.
    pub id: i64,
    /// Short reference code.
    pub code: Option<String>,
    /// Abbreviated citation.
    pub abbrev_cite: Option<String>,
    /// Full citation text.
    pub full_citation: Option<String>,
}

/// A phenological time range (day-of-year statistics) with its sources.
#[derive(Debug, Clone, PartialEq)]
pub struct Phenology {
    /// Store-assigned identity.
    pub id: i64,
    /// Earliest observed value.
    pub minimum: Option<f64>,
    /// Latest observed value.
    pub maximum: Option<f64>,
    /// Mean value.
    pub mean: Option<f64>,
    /// Standard deviation of observations.
    pub standard_deviation: Option<f64>,
    /// Reference for the underlying data.
    pub data_reference: Option<i64>,
    /// Reference for the precise timing methodology.
    pub precise_time_reference: Option<i64>,
}

/// A salmon population: one taxon occupying one conservation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Population {
    /// Store-assigned identity.
    pub id: i64,
    /// Taxon this population belongs to.
    pub taxon_id: Option<i64>,
    /// Conservation unit the population occupies.
    pub conservation_unit_id: Option<i64>,
    /// Whether the population overwinters in fresh water.
    pub overwinter: Option<bool>,
    /// Whether the population is extinct.
    pub extinct: Option<bool>,
    /// Phenology of spawning.
    pub spawn_time_range: Option<i64>,
    /// Phenology of migration.
    pub migration_time_range: Option<i64>,
}
