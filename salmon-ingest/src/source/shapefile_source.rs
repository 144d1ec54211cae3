//! Shapefile-backed feature source.
//!
//! Geometry is converted through `geo` types to WKT text. A shapefile
//! polygon with one ring set becomes a `POLYGON`; anything with multiple
//! parts becomes a `MULTIPOLYGON`, which downstream validation rejects.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use geo::{MultiLineString, MultiPoint, MultiPolygon, Point};
use shapefile::dbase::FieldValue;
use shapefile::{Shape, ShapeReader, dbase};
use wkt::ToWkt;

use super::{AttributeValue, FeatureSource, FeatureSourceError, SourceFeature};

/// Reads features from an ESRI shapefile and its `.dbf` attribute table.
pub struct ShapefileSource {
    reader: shapefile::Reader<BufReader<File>, BufReader<File>>,
    field_names: Vec<String>,
}

impl std::fmt::Debug for ShapefileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapefileSource")
            .field("field_names", &self.field_names)
            .finish_non_exhaustive()
    }
}

impl ShapefileSource {
    /// Open `path` (the `.shp` file) and the attribute table beside it.
    pub fn open(path: &Path) -> Result<Self, FeatureSourceError> {
        let shape_reader =
            ShapeReader::from_path(path).map_err(|source| FeatureSourceError::OpenShapefile {
                path: path.to_path_buf(),
                source,
            })?;
        let table_path = path.with_extension("dbf");
        let table_reader = dbase::Reader::from_path(&table_path).map_err(|source| {
            FeatureSourceError::OpenAttributeTable {
                path: table_path.clone(),
                source,
            }
        })?;
        let field_names = table_reader
            .fields()
            .iter()
            .map(|field| field.name().to_owned())
            .collect();
        Ok(Self {
            reader: shapefile::Reader::new(shape_reader, table_reader),
            field_names,
        })
    }
}

impl FeatureSource for ShapefileSource {
    fn field_names(&self) -> &[String] {
        &self.field_names
    }

    fn read_features(&mut self) -> Result<Vec<SourceFeature>, FeatureSourceError> {
        let mut features = Vec::new();
        for pair in self.reader.iter_shapes_and_records() {
            let (shape, record) =
                pair.map_err(|source| FeatureSourceError::ReadFeature { source })?;
            let geometry_wkt = shape_to_wkt(shape)?;
            let attributes = self
                .field_names
                .iter()
                .map(|name| (name.clone(), convert_value(record.get(name))))
                .collect();
            features.push(SourceFeature::new(attributes, geometry_wkt));
        }
        Ok(features)
    }
}

fn shape_to_wkt(shape: Shape) -> Result<String, FeatureSourceError> {
    match shape {
        Shape::Polygon(polygon) => {
            let multi: MultiPolygon<f64> = polygon.into();
            let mut polygons = multi.0;
            Ok(if polygons.len() == 1 {
                polygons.swap_remove(0).wkt_string()
            } else {
                MultiPolygon::new(polygons).wkt_string()
            })
        }
        Shape::Point(point) => Ok(Point::<f64>::from(point).wkt_string()),
        Shape::Multipoint(points) => Ok(MultiPoint::<f64>::from(points).wkt_string()),
        Shape::Polyline(line) => Ok(MultiLineString::<f64>::from(line).wkt_string()),
        other => Err(FeatureSourceError::UnsupportedShape {
            shape_type: other.shapetype(),
        }),
    }
}

fn convert_value(value: Option<&FieldValue>) -> AttributeValue {
    match value {
        None
        | Some(
            FieldValue::Character(None)
            | FieldValue::Numeric(None)
            | FieldValue::Float(None)
            | FieldValue::Logical(None),
        ) => AttributeValue::Empty,
        Some(FieldValue::Character(Some(text))) => AttributeValue::Text(text.clone()),
        Some(FieldValue::Memo(text)) => AttributeValue::Text(text.clone()),
        Some(FieldValue::Numeric(Some(value))) => AttributeValue::Number(*value),
        Some(FieldValue::Float(Some(value))) => AttributeValue::Number(f64::from(*value)),
        Some(FieldValue::Integer(value)) => AttributeValue::Number(f64::from(*value)),
        Some(FieldValue::Double(value) | FieldValue::Currency(value)) => {
            AttributeValue::Number(*value)
        }
        Some(FieldValue::Logical(Some(value))) => AttributeValue::Boolean(*value),
        Some(other) => AttributeValue::Text(format!("{other:?}")),
    }
}
