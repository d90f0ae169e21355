//! Error shared by every persistence port.

use crate::domain::Error;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by repository adapters.
    pub enum RepositoryError {
        /// A connection could not be checked out or was lost.
        Connection { message: String } => "repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "repository query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Conflict { message: String } => "{message}",
        /// The write referenced a row that does not exist.
        MissingReference { message: String } => "{message}",
    }
}

impl From<RepositoryError> for Error {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Connection { message } => {
                Error::service_unavailable(format!("database unavailable: {message}"))
            }
            RepositoryError::Query { message } => {
                Error::internal(format!("database error: {message}"))
            }
            RepositoryError::Conflict { message } => Error::conflict(message),
            RepositoryError::MissingReference { message } => Error::not_found(message),
        }
    }
}
