//! Registry error taxonomy

use thiserror::Error;

use crate::path::ResourcePath;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Path {0} is not part of the device object schema")]
    InvalidPath(ResourcePath),
    #[error("Resource instance {0} has not been created")]
    InstanceNotCreated(ResourcePath),
    #[error("Resource instance {path} exceeds the declared maximum of {max} instances")]
    InstanceLimitExceeded { path: ResourcePath, max: u16 },
    #[error("Action at {path} failed with status {status}")]
    ActionFailure { path: ResourcePath, status: i32 },
    #[error("Resource {path} cannot hold {requested}")]
    KindMismatch {
        path: ResourcePath,
        requested: &'static str,
    },
    #[error("Resource {0} is read-only")]
    ReadOnly(ResourcePath),
    #[error("Nothing registered at {0}")]
    NotRegistered(ResourcePath),
    #[error("Value {value} does not fit the {width}-byte cell at {path}")]
    ValueOutOfRange {
        path: ResourcePath,
        value: i64,
        width: usize,
    },
    #[error("Malformed resource path: {0}")]
    InvalidPathSyntax(String),
}
