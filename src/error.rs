//! Error types for topology loading and identifier parsing.

use thiserror::Error;

/// Errors surfaced by the topology engine.
///
/// Resolver and layout anomalies are not errors: they are logged and the
/// layout continues. Only structural problems with the input end up here.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// A resource identifier did not have the expected shape.
    #[error("Invalid identifier '{identifier}': {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    /// A VNet selected by the user is not in the topology.
    #[error("VNet '{identifier}' not found in the topology")]
    VnetNotFound { identifier: String },

    /// A topology snapshot could not be decoded.
    #[error("Error parsing topology at path={path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl TopologyError {
    pub(crate) fn invalid_identifier(identifier: &str, reason: impl Into<String>) -> Self {
        TopologyError::InvalidIdentifier {
            identifier: identifier.to_string(),
            reason: reason.into(),
        }
    }
}
