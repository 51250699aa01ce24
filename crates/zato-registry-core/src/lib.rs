pub mod channel;
pub mod client;
pub mod config;
pub mod error;

pub use channel::{
    classify_create_failure, read_backup, to_request_params, write_backup, ChannelRecord,
    ChannelRegistry, ConnectionKind, CreateFailure, CreateRequest, RestoreOutcome, RestoreReport,
    RestoreSource, REQUEST_FIELDS,
};
pub use client::{ApiClient, ApiResponse, Credentials, HttpApiClient, DEFAULT_PATH_TEMPLATE};
pub use config::{Config, RemoteConfig, DEFAULT_CLUSTER_ID};
pub use error::{RegistryError, Result};
