//! Regions: named, coded geographic areas keyed by `(code, kind)`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::geometry::{Outlet, PolygonWkt};

/// The three kinds of region the ingestion pipeline understands.
///
/// Basins and watersheds share the `region` table; conservation units are
/// persisted in their own table but behave as a region kind everywhere
/// else. Wire strings are the lower-snake forms used by the CLI and logs.
///
/// # Examples
/// ```
/// use salmon_schema::RegionKind;
///
/// let kind: RegionKind = "conservation_unit".parse()?;
/// assert_eq!(kind, RegionKind::ConservationUnit);
/// assert_eq!(kind.to_string(), "conservation_unit");
/// # Ok::<(), salmon_schema::ParseRegionKindError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// A drainage basin.
    Basin,
    /// A watershed.
    Watershed,
    /// A designated salmon conservation unit.
    ConservationUnit,
}

impl RegionKind {
    /// The wire string stored in the database and printed in summaries.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Basin => "basin",
            Self::Watershed => "watershed",
            Self::ConservationUnit => "conservation_unit",
        }
    }
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegionKind {
    type Err = ParseRegionKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "basin" => Ok(Self::Basin),
            "watershed" => Ok(Self::Watershed),
            "conservation_unit" => Ok(Self::ConservationUnit),
            other => Err(ParseRegionKindError(other.to_owned())),
        }
    }
}

/// Error returned when a region kind string is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown region kind {0:?}; expected basin, watershed or conservation_unit")]
pub struct ParseRegionKindError(String);

/// A region candidate ready for persistence.
///
/// The store assigns row identity; `(code, kind)` is the natural key used
/// to decide between insert and update. The outlet is `None` when the run's
/// field mapping carried no outlet attributes at all, and the explicit
/// empty sentinel when a feature merely lacked usable coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Human-readable name, overwritten on update.
    pub name: String,
    /// Code half of the natural key.
    pub code: String,
    /// Kind half of the natural key.
    pub kind: RegionKind,
    /// Single-polygon boundary.
    pub boundary: PolygonWkt,
    /// Outlet point, if the run ingests outlets.
    pub outlet: Option<Outlet>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("basin", RegionKind::Basin)]
    #[case("watershed", RegionKind::Watershed)]
    #[case("conservation_unit", RegionKind::ConservationUnit)]
    fn kind_round_trips_through_wire_string(#[case] text: &str, #[case] kind: RegionKind) {
        assert_eq!(text.parse::<RegionKind>(), Ok(kind));
        assert_eq!(kind.to_string(), text);
    }

    #[rstest]
    #[case("Basin")]
    #[case("estuary")]
    #[case("")]
    fn kind_rejects_unknown_strings(#[case] text: &str) {
        assert!(text.parse::<RegionKind>().is_err());
    }
}
