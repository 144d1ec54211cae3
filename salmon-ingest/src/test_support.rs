//! Test doubles for exercising the pipeline without real shapefiles.

use crate::source::{AttributeValue, FeatureSource, FeatureSourceError, SourceFeature};

/// An in-memory feature source with a fixed field list.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    field_names: Vec<String>,
    features: Vec<SourceFeature>,
}

impl MemorySource {
    /// Declare the source's field list.
    #[must_use]
    pub fn new<I, S>(field_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field_names: field_names.into_iter().map(Into::into).collect(),
            features: Vec::new(),
        }
    }

    /// Append a feature built from `(name, value)` attribute pairs.
    #[must_use]
    pub fn with_feature<I, S>(mut self, attributes: I, geometry_wkt: &str) -> Self
    where
        I: IntoIterator<Item = (S, AttributeValue)>,
        S: Into<String>,
    {
        let attributes = attributes
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .collect();
        self.features
            .push(SourceFeature::new(attributes, geometry_wkt));
        self
    }
}

impl FeatureSource for MemorySource {
    fn field_names(&self) -> &[String] {
        &self.field_names
    }

    fn read_features(&mut self) -> Result<Vec<SourceFeature>, FeatureSourceError> {
        Ok(self.features.clone())
    }
}
