//! Error types for the TUI.

use crate::config::ConfigError;
use crate::export::ExportError;
use crate::gateway::GatewayError;
use crate::persistence::PersistenceError;
use casedesk_core::PaginationError;

#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Pagination(#[from] PaginationError),
    #[error("Logging setup failed: {0}")]
    Logging(String),
}
