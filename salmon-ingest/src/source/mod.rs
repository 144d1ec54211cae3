//! Vector feature sources: named attributes plus a WKT geometry per feature.

mod shapefile_source;

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub use shapefile_source::ShapefileSource;

/// One attribute value read from a feature's attribute table.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Free text.
    Text(String),
    /// Any numeric column type, widened to `f64`.
    Number(f64),
    /// A logical column.
    Boolean(bool),
    /// The column held no value for this feature.
    Empty,
}

impl AttributeValue {
    /// Whether the value is absent or blank text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(_) | Self::Boolean(_) => false,
        }
    }

    /// Interpret the value as a coordinate, if it can be one.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
            Self::Boolean(_) | Self::Empty => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Empty => Ok(()),
        }
    }
}

/// A single feature: declared attributes and a geometry in WKT text.
///
/// Attribute access is a linear scan over the declared names, the
/// capability every source must provide regardless of how its table is
/// indexed internally.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFeature {
    attributes: Vec<(String, AttributeValue)>,
    geometry_wkt: String,
}

impl SourceFeature {
    /// Bundle attributes (in declaration order) with the geometry text.
    #[must_use]
    pub fn new(attributes: Vec<(String, AttributeValue)>, geometry_wkt: impl Into<String>) -> Self {
        Self {
            attributes,
            geometry_wkt: geometry_wkt.into(),
        }
    }

    /// Look up an attribute value by its declared name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|(attribute, _)| attribute == name)
            .map(|(_, value)| value)
    }

    /// The geometry's WKT text; the leading tag identifies its type.
    #[must_use]
    pub fn geometry_wkt(&self) -> &str {
        &self.geometry_wkt
    }
}

/// A source of vector features, consumed once per ingestion run.
pub trait FeatureSource {
    /// Attribute names the source declares, used to validate the mapping
    /// before any feature is read.
    fn field_names(&self) -> &[String];

    /// Read every feature in source order.
    fn read_features(&mut self) -> Result<Vec<SourceFeature>, FeatureSourceError>;
}

/// Errors raised when opening or reading a feature source.
#[derive(Debug, Error)]
pub enum FeatureSourceError {
    /// The shapefile geometry component could not be opened.
    #[error("could not open shapefile at {path:?}")]
    OpenShapefile {
        /// Location of the `.shp` file.
        path: PathBuf,
        /// Source error returned by the shapefile reader.
        #[source]
        source: shapefile::Error,
    },
    /// The attribute table alongside the shapefile could not be opened.
    #[error("could not open attribute table at {path:?}")]
    OpenAttributeTable {
        /// Location of the `.dbf` file.
        path: PathBuf,
        /// Source error returned by the dBase reader.
        #[source]
        source: shapefile::dbase::Error,
    },
    /// A feature failed to decode mid-file.
    #[error("failed to read a feature from the shapefile")]
    ReadFeature {
        /// Source error returned by the shapefile reader.
        #[source]
        source: shapefile::Error,
    },
    /// The file holds a shape class the pipeline cannot express as WKT.
    #[error("unsupported shape type {shape_type:?} in shapefile")]
    UnsupportedShape {
        /// The shapefile shape type encountered.
        shape_type: shapefile::ShapeType,
    },
}
