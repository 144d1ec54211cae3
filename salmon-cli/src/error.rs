//! Error types emitted by the salmon CLI.

use salmon_ingest::{FeatureSourceError, IngestError, MappingError};
use salmon_schema::StoreError;
use thiserror::Error;

/// Errors emitted by the salmon CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Loading the field mapping file failed.
    #[error(transparent)]
    Mapping(#[from] MappingError),
    /// Opening the shapefile failed.
    #[error(transparent)]
    Source(#[from] FeatureSourceError),
    /// Opening or initialising the database failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The ingestion run aborted.
    #[error(transparent)]
    Ingest(#[from] IngestError),
}
