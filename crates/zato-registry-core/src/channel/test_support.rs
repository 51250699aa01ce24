use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tracing_subscriber::fmt::MakeWriter;

use crate::client::{response_key, ApiClient, ApiResponse};
use crate::error::{RegistryError, Result};

use super::types::ChannelRecord;
use super::{CREATE_OPERATION, LIST_OPERATION};

/// A plain-HTTP inbound channel as `get-list` reports it
pub(crate) fn single_channel_value() -> Value {
    json!({
        "sec_tls_ca_cert_id": null,
        "sec_type": null,
        "cache_type": null,
        "service_name": "account-service.account-sync-service",
        "is_internal": false,
        "soap_action": "",
        "has_rbac": false,
        "serialization_type": "string",
        "ping_method": "HEAD",
        "id": 660,
        "transport": "plain_http",
        "soap_version": null,
        "security_name": null,
        "content_encoding": "",
        "cache_expiry": 0,
        "method": "",
        "is_active": true,
        "host": null,
        "content_type": null,
        "security_id": null,
        "url_path": "/test/v1/accounts/sync",
        "merge_url_params_req": true,
        "name": "/test/v1/accounts/sync",
        "sec_use_rbac": false,
        "data_format": "json",
        "cache_id": null,
        "pool_size": 20,
        "url_params_pri": "qs-over-path",
        "connection": "channel",
        "timeout": 10,
        "service_id": 581,
        "params_pri": "channel-params-over-msg",
        "cache_name": null
    })
}

pub(crate) fn single_channel() -> ChannelRecord {
    ChannelRecord::try_from(single_channel_value()).unwrap()
}

/// A platform-managed channel that must never leave the cluster
pub(crate) fn internal_channel_value() -> Value {
    json!({
        "id": 1,
        "name": "zato.check.service",
        "url_path": "/zato/check",
        "connection": "channel",
        "transport": "plain_http",
        "is_internal": true,
        "service_name": "zato.checks.check-service"
    })
}

pub(crate) fn outgoing_channel_value() -> Value {
    json!({
        "id": 700,
        "name": "crm.outgoing",
        "host": "http://crm.internal:8080",
        "url_path": "/api/customers",
        "connection": "outgoing",
        "transport": "plain_http",
        "is_internal": false,
        "is_active": true,
        "pool_size": 5,
        "timeout": 30
    })
}

pub(crate) fn list_body(records: Vec<Value>) -> Value {
    json!({
        "zato_env": {
            "cid": "36972648978ec860883886b1",
            "details": "",
            "result": "ZATO_OK"
        },
        "zato_http_soap_get_list_response": records
    })
}

pub(crate) fn created_body(id: u64, name: &str) -> Value {
    json!({
        "zato_env": {"cid": "c1", "details": "", "result": "ZATO_OK"},
        "zato_http_soap_create_response": {"id": id, "name": name}
    })
}

/// A 200 reply to `operation` carrying `body`, classified like a live one
pub(crate) fn reply(operation: &str, body: Value) -> ApiResponse {
    ApiResponse::from_http(200, body.to_string(), &response_key(operation))
}

pub(crate) fn list_reply(records: Vec<Value>) -> ApiResponse {
    reply(LIST_OPERATION, list_body(records))
}

pub(crate) fn created_reply(id: u64, name: &str) -> ApiResponse {
    reply(CREATE_OPERATION, created_body(id, name))
}

pub(crate) fn already_exists_details(name: &str) -> String {
    json!({
        "zato_env": {
            "cid": "c2",
            "result": "ZATO_ERROR",
            "details": format!(
                "Traceback (most recent call last):\nException: An object of that name `{}` already exists on this cluster\n",
                name
            )
        }
    })
    .to_string()
}

/// Scripted [`ApiClient`] that records every call
#[derive(Debug, Default)]
pub(crate) struct FakeClient {
    responses: RefCell<VecDeque<ApiResponse>>,
    calls: RefCell<Vec<(String, Value)>>,
}

impl FakeClient {
    pub(crate) fn new(responses: Vec<ApiResponse>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<(String, Value)> {
        self.calls.borrow().clone()
    }
}

impl ApiClient for FakeClient {
    fn invoke(&self, operation: &str, payload: &Value) -> Result<ApiResponse> {
        self.calls
            .borrow_mut()
            .push((operation.to_string(), payload.clone()));
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| RegistryError::Transport {
                url: operation.to_string(),
                message: "connection refused".to_string(),
            })
    }
}

/// Captures formatted `tracing` output for assertions
#[derive(Clone, Default)]
pub(crate) struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
