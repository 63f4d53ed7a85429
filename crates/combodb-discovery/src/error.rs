use combodb_core::CoreError;
use thiserror::Error;

/// Errors a discovery request reports to its caller.
///
/// Collaborator failures never appear here: they are logged and degrade to
/// empty results inside the pipeline.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// A required input was missing, blank or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Neither stored locations nor the geocoder could place the request.
    #[error("could not determine coordinates for the given location")]
    CoordinatesUnresolved,
}

impl From<CoreError> for DiscoveryError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::InvalidArgument(message) => Self::InvalidArgument(message),
        }
    }
}
