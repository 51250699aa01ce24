//! HTTP channel backup and restore
//!
//! # Flow
//!
//! ```text
//! backup:  zato.http-soap.get-list ──► ChannelRegistry ──► backup.json
//! restore: backup.json ──► ChannelRegistry ──► zato.http-soap.create (one per channel)
//! ```
//!
//! Records travel in *raw* form (everything the list endpoint reports) and
//! are only narrowed to the create request shape at the moment they are sent.

mod backup;
mod channel_registry;
mod classify;
mod request;
mod types;

#[cfg(test)]
pub(crate) mod test_support;

/// Lists every HTTP/SOAP connection of a cluster
pub const LIST_OPERATION: &str = "zato.http-soap.get-list";
/// Creates one HTTP/SOAP connection
pub const CREATE_OPERATION: &str = "zato.http-soap.create";
/// Key holding the list in a `get-list` reply
pub const LIST_RESPONSE_KEY: &str = "zato_http_soap_get_list_response";

pub use backup::{read_backup, write_backup};
pub use channel_registry::{ChannelRegistry, RestoreOutcome, RestoreReport, RestoreSource};
pub use classify::{classify_create_failure, classify_message, CreateFailure, ALREADY_EXISTS_PHRASE};
pub use request::{to_request_params, CreateRequest, REQUEST_FIELDS};
pub use types::{is_truthy, ChannelRecord, ConnectionKind};
