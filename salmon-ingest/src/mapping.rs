//! The correspondence table between logical fields and source attributes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Deserialize;
use thiserror::Error;

/// Logical-field-to-attribute mapping loaded from a YAML file.
///
/// `name` and `code` are required for any run; `outlet_lat` and
/// `outlet_lon` are optional but only useful together. Empty strings count
/// as absent, matching how hand-edited mapping files tend to disable a
/// field.
///
/// # Examples
/// ```
/// use salmon_ingest::FieldMapping;
///
/// let mapping: FieldMapping =
///     serde_yaml::from_str("name: NAME\ncode: CODE\n").expect("parse mapping");
/// let fields = vec!["NAME".to_owned(), "CODE".to_owned()];
/// let resolved = mapping.resolve(&fields)?;
/// assert_eq!(resolved.name, "NAME");
/// assert!(resolved.outlet.is_none());
/// # Ok::<(), salmon_ingest::MappingError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FieldMapping {
    /// Source attribute holding the region name.
    #[serde(default)]
    pub name: Option<String>,
    /// Source attribute holding the region code.
    #[serde(default)]
    pub code: Option<String>,
    /// Source attribute holding the outlet latitude.
    #[serde(default)]
    pub outlet_lat: Option<String>,
    /// Source attribute holding the outlet longitude.
    #[serde(default)]
    pub outlet_lon: Option<String>,
}

impl FieldMapping {
    /// Load a mapping from a YAML file on disk.
    pub fn from_yaml_file(path: &Path) -> Result<Self, MappingError> {
        let text = fs::read_to_string(path).map_err(|source| MappingError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| MappingError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the mapping against the attribute names the source declares.
    ///
    /// Fails when `name` or `code` is unmapped, or when any mapped
    /// attribute is missing from `source_fields`. Outlet ingestion is
    /// enabled only when both outlet fields are mapped; otherwise a single
    /// warning covers the whole run.
    pub fn resolve(&self, source_fields: &[String]) -> Result<ResolvedFields, MappingError> {
        let name = required_field(self.name.as_deref(), "name")?;
        let code = required_field(self.code.as_deref(), "code")?;

        let outlet = match (
            mapped_or_absent(self.outlet_lat.as_deref()),
            mapped_or_absent(self.outlet_lon.as_deref()),
        ) {
            (Some(lat), Some(lon)) => {
                info!("Outlet attributes found, will load outlet data");
                Some(OutletFields {
                    lat: lat.to_owned(),
                    lon: lon.to_owned(),
                })
            }
            _ => {
                warn!("Outlet data not available");
                None
            }
        };

        let resolved = ResolvedFields {
            name: name.to_owned(),
            code: code.to_owned(),
            outlet,
        };
        for attribute in resolved.mapped_attributes() {
            if source_fields.iter().any(|field| field == attribute) {
                debug!("{attribute} present in source fields");
            } else {
                return Err(MappingError::AttributeNotInSource {
                    attribute: attribute.to_owned(),
                });
            }
        }
        info!("All expected attributes present in the source");
        Ok(resolved)
    }
}

fn required_field<'a>(
    value: Option<&'a str>,
    field: &'static str,
) -> Result<&'a str, MappingError> {
    mapped_or_absent(value).ok_or(MappingError::MissingField { field })
}

fn mapped_or_absent(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

/// Attribute names for the optional outlet pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutletFields {
    /// Source attribute holding the latitude.
    pub lat: String,
    /// Source attribute holding the longitude.
    pub lon: String,
}

/// A mapping validated against a concrete source's field list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFields {
    /// Source attribute holding the region name.
    pub name: String,
    /// Source attribute holding the region code.
    pub code: String,
    /// Outlet attributes, present only when both are mapped.
    pub outlet: Option<OutletFields>,
}

impl ResolvedFields {
    fn mapped_attributes(&self) -> impl Iterator<Item = &str> {
        let outlet = self
            .outlet
            .iter()
            .flat_map(|outlet| [outlet.lat.as_str(), outlet.lon.as_str()]);
        [self.name.as_str(), self.code.as_str()]
            .into_iter()
            .chain(outlet)
    }
}

/// Errors raised while loading or resolving the field mapping.
#[derive(Debug, Error)]
pub enum MappingError {
    /// The mapping file could not be read.
    #[error("failed to read mapping file at {path:?}")]
    ReadFile {
        /// Location of the mapping file.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },
    /// The mapping file was not valid YAML.
    #[error("mapping file at {path:?} is not valid YAML")]
    ParseFile {
        /// Location of the mapping file.
        path: PathBuf,
        /// YAML decoding failure.
        #[source]
        source: serde_yaml::Error,
    },
    /// A required logical field has no mapping.
    #[error("missing {field} attribute in the mapping file")]
    MissingField {
        /// The unmapped logical field, `name` or `code`.
        field: &'static str,
    },
    /// A mapped attribute does not exist in the source.
    #[error("attribute {attribute} not present in the source's field list")]
    AttributeNotInSource {
        /// The attribute name absent from the source.
        attribute: String,
    },
}
