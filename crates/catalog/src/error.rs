//! Catalog error types

use contracts::ContractError;
use thiserror::Error;

/// Catalog specific error
///
/// Malformed or unreadable entries are never errors; only a bad scan root is.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Scan root is not a directory
    #[error("'{path}' is not a directory")]
    NotADirectory { path: String },

    /// Wrapped ContractError
    #[error(transparent)]
    Contract(#[from] ContractError),
}
