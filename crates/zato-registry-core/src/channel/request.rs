//! Raw record → `zato.http-soap.create` request

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RegistryError, Result};

use super::types::{ChannelRecord, ConnectionKind};

/// Every key a create request carries, in wire order
pub const REQUEST_FIELDS: [&str; 27] = [
    "cluster_id",
    "is_active",
    "is_internal",
    "name",
    "transport",
    "url_path",
    "cache_expiry",
    "cache_id",
    "content_encoding",
    "content_type",
    "data_format",
    "has_rbac",
    "host",
    "match_slash",
    "merge_url_params_req",
    "method",
    "params_pri",
    "ping_method",
    "pool_size",
    "sec_tls_ca_cert_id",
    "security_id",
    "serialization_type",
    "soap_action",
    "timeout",
    "url_params_pri",
    "service",
    "connection",
];

/// Request form of a channel. Fields missing from the raw record are `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRequest {
    pub cluster_id: u64,
    pub is_active: Value,
    pub is_internal: Value,
    pub name: Value,
    pub transport: Value,
    pub url_path: Value,
    pub cache_expiry: Value,
    pub cache_id: Value,
    pub content_encoding: Value,
    pub content_type: Value,
    pub data_format: Value,
    pub has_rbac: Value,
    pub host: Value,
    pub match_slash: Value,
    pub merge_url_params_req: Value,
    pub method: Value,
    pub params_pri: Value,
    pub ping_method: Value,
    pub pool_size: Value,
    pub sec_tls_ca_cert_id: Value,
    pub security_id: Value,
    pub serialization_type: Value,
    pub soap_action: Value,
    pub timeout: Value,
    pub url_params_pri: Value,
    /// Read from the raw `service_name`
    pub service: Value,
    pub connection: ConnectionKind,
}

impl CreateRequest {
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Translate a raw record into a create request for `cluster_id`.
///
/// Only `connection` is required; `id`, `service_id`, `cache_name`,
/// `security_name`, `soap_version` and any other extra keys are dropped.
pub fn to_request_params(record: &ChannelRecord, cluster_id: u64) -> Result<CreateRequest> {
    let connection = record
        .get("connection")
        .ok_or(RegistryError::MissingField {
            field: "connection",
        })?;

    Ok(CreateRequest {
        cluster_id,
        is_active: record.field("is_active"),
        is_internal: record.field("is_internal"),
        name: record.field("name"),
        transport: record.field("transport"),
        url_path: record.field("url_path"),
        cache_expiry: record.field("cache_expiry"),
        cache_id: record.field("cache_id"),
        content_encoding: record.field("content_encoding"),
        content_type: record.field("content_type"),
        data_format: record.field("data_format"),
        has_rbac: record.field("has_rbac"),
        host: record.field("host"),
        match_slash: record.field("match_slash"),
        merge_url_params_req: record.field("merge_url_params_req"),
        method: record.field("method"),
        params_pri: record.field("params_pri"),
        ping_method: record.field("ping_method"),
        pool_size: record.field("pool_size"),
        sec_tls_ca_cert_id: record.field("sec_tls_ca_cert_id"),
        security_id: record.field("security_id"),
        serialization_type: record.field("serialization_type"),
        soap_action: record.field("soap_action"),
        timeout: record.field("timeout"),
        url_params_pri: record.field("url_params_pri"),
        service: record.field("service_name"),
        connection: ConnectionKind::from_raw(connection),
    })
}
