//! Text-based geometry wrappers for region boundaries and outlets.
//!
//! Geometries travel through the pipeline as WKT text and reach the store
//! as EWKT literals tagged with the WGS84 SRID. Boundaries must be single
//! polygons; multi-part shapes are rejected at construction so they can
//! never be partially imported.

use std::fmt;

use thiserror::Error;

/// SRID stamped onto every persisted geometry literal.
pub const WGS84_SRID: u32 = 4326;

/// A single-polygon boundary in WKT form, `x = longitude`, `y = latitude`.
///
/// Construction classifies the text by its leading type tag: only text
/// starting with `POLYGON` is accepted. Anything else, notably
/// `MULTIPOLYGON`, is refused so callers can count and skip the feature.
///
/// # Examples
/// ```
/// use salmon_schema::PolygonWkt;
///
/// let boundary = PolygonWkt::parse("POLYGON((0 0,1 0,1 1,0 1,0 0))")?;
/// assert_eq!(boundary.ewkt(), "SRID=4326;POLYGON((0 0,1 0,1 1,0 1,0 0))");
///
/// let multi = PolygonWkt::parse("MULTIPOLYGON(((0 0,1 0,1 1,0 0)))");
/// assert!(multi.is_err());
/// # Ok::<(), salmon_schema::GeometryError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolygonWkt(String);

impl PolygonWkt {
    /// Accept WKT text whose leading tag names a single polygon.
    pub fn parse(text: impl Into<String>) -> Result<Self, GeometryError> {
        let text = text.into();
        if text.starts_with("POLYGON") {
            Ok(Self(text))
        } else {
            Err(GeometryError::NotASinglePolygon {
                tag: leading_tag(&text),
            })
        }
    }

    /// The raw WKT text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The EWKT literal persisted by the store.
    #[must_use]
    pub fn ewkt(&self) -> String {
        format!("SRID={WGS84_SRID};{}", self.0)
    }

    /// Consume the wrapper and return the inner [`String`].
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PolygonWkt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The point where a region's water body empties.
///
/// An outlet is either a concrete point or the explicit empty sentinel used
/// when a feature carried no usable coordinates. There is no partial state:
/// a missing latitude or longitude collapses to [`Outlet::Empty`].
///
/// # Examples
/// ```
/// use salmon_schema::Outlet;
///
/// let outlet = Outlet::point(-123.1, 49.1);
/// assert_eq!(outlet.wkt(), "POINT(-123.1 49.1)");
/// assert_eq!(Outlet::Empty.wkt(), "POINT EMPTY");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outlet {
    /// A located outlet, WGS84 longitude/latitude.
    Point {
        /// Longitude in decimal degrees.
        lon: f64,
        /// Latitude in decimal degrees.
        lat: f64,
    },
    /// The explicit "no outlet data" sentinel.
    Empty,
}

impl Outlet {
    /// Construct a located outlet.
    #[must_use]
    pub const fn point(lon: f64, lat: f64) -> Self {
        Self::Point { lon, lat }
    }

    /// WKT text, `POINT(lon lat)` or the `POINT EMPTY` sentinel.
    #[must_use]
    pub fn wkt(&self) -> String {
        match self {
            Self::Point { lon, lat } => format!("POINT({lon} {lat})"),
            Self::Empty => String::from("POINT EMPTY"),
        }
    }

    /// The EWKT literal persisted by the store.
    #[must_use]
    pub fn ewkt(&self) -> String {
        format!("SRID={WGS84_SRID};{}", self.wkt())
    }

    /// Whether this outlet is the empty sentinel.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Errors raised when wrapping geometry text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    /// The leading type tag named something other than a single polygon.
    #[error("geometry tagged {tag:?} is not a single polygon")]
    NotASinglePolygon {
        /// The offending leading tag, e.g. `MULTIPOLYGON`.
        tag: String,
    },
}

fn leading_tag(text: &str) -> String {
    text.split(['(', ' '])
        .next()
        .unwrap_or_default()
        .to_owned()
}
