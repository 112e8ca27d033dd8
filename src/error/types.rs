use thiserror::Error;

use crate::provider::ProviderError;
use crate::schema::SchemaError;

/// Unified result type for resolution operations.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Errors surfaced by the resolution pipeline.
///
/// Lookup misses and self-references are not errors; they resolve to
/// fallbacks or omissions further down the pipeline.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("layout schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("collaborator failure: {0}")]
    Provider(#[from] ProviderError),
}
