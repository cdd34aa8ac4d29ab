//! Shared foundation for the meshgate sharding middleware core:
//! identifier newtypes, the error taxonomy, and configuration.

pub mod config;
pub mod error;
pub mod types;

pub use config::{FanOutConfig, MeshgateConfig, PoolConfig};
pub use error::{BackendError, ErrorKind, MeshgateError, MeshgateResult, RequestError};
pub use types::{DatasourceId, SchemaObject, TargetName};
