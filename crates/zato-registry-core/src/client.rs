//! Zato JSON API client
//!
//! Every Zato admin service is reachable as `POST {address}/zato/json/{service}`
//! with a JSON body and HTTP Basic credentials. The client only knows how to
//! make such a call and sort the reply into a successful payload or a raw
//! diagnostic text; interpreting either is left to the caller.

use std::fmt;
use std::io::Read;
use std::str::FromStr;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;
use tracing::debug;

use crate::channel::is_truthy;
use crate::error::{RegistryError, Result};

/// Path template used by stock Zato installations
pub const DEFAULT_PATH_TEMPLATE: &str = "/zato/json/{}";

/// Static API credentials (`user:password` on the command line)
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Parse `user:password`, splitting on the first colon only
    pub fn parse(input: &str) -> Result<Self> {
        let (username, password) =
            input
                .split_once(':')
                .ok_or_else(|| RegistryError::InvalidCredentials {
                    input: redact(input),
                })?;
        if username.is_empty() {
            return Err(RegistryError::InvalidCredentials {
                input: redact(input),
            });
        }
        Ok(Self::new(username, password))
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    fn basic_auth_header(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {}", token)
    }
}

impl FromStr for Credentials {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

// Never echo a password back in an error message.
fn redact(input: &str) -> String {
    match input.split_once(':') {
        Some((user, _)) => format!("{}:***", user),
        None if input.is_empty() => String::new(),
        None => "***".to_string(),
    }
}

/// Key holding a service's payload: `zato.http-soap.create` replies
/// under `zato_http_soap_create_response`.
pub fn response_key(operation: &str) -> String {
    format!("{}_response", operation.replace(['.', '-'], "_"))
}

/// Reply of a single service invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP 2xx and `zato_env.result` is `ZATO_OK` (or absent)
    pub ok: bool,
    /// The service's own payload (`<service>_response`), only when `ok`
    pub data: Option<Value>,
    /// Raw body text
    pub details: String,
}

impl ApiResponse {
    pub fn failure(details: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            details: details.into(),
        }
    }

    /// Classify a raw HTTP reply of the service whose payload sits under
    /// `response_key`
    pub fn from_http(status: u16, body: String, response_key: &str) -> Self {
        if (200..300).contains(&status) {
            if let Ok(Value::Object(mut envelope)) = serde_json::from_str::<Value>(&body) {
                if zato_result_ok(&envelope) {
                    return Self {
                        ok: true,
                        data: envelope.remove(response_key),
                        details: body,
                    };
                }
            }
        }
        Self::failure(body)
    }

    /// Whether the call produced a non-empty payload
    pub fn has_payload(&self) -> bool {
        self.data.as_ref().is_some_and(is_truthy)
    }
}

fn zato_result_ok(envelope: &serde_json::Map<String, Value>) -> bool {
    let result = envelope
        .get("zato_env")
        .and_then(|env| env.get("result"))
        .and_then(Value::as_str);
    match result {
        Some(result) => result == "ZATO_OK",
        None => true,
    }
}

/// Something that can invoke a Zato service by name
pub trait ApiClient {
    fn invoke(&self, operation: &str, payload: &Value) -> Result<ApiResponse>;
}

impl<C: ApiClient + ?Sized> ApiClient for &C {
    fn invoke(&self, operation: &str, payload: &Value) -> Result<ApiResponse> {
        (**self).invoke(operation, payload)
    }
}

/// Blocking HTTP implementation of [`ApiClient`]
pub struct HttpApiClient {
    address: String,
    credentials: Credentials,
    path_template: String,
    agent: ureq::Agent,
}

impl HttpApiClient {
    pub fn new(address: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            address: address.into(),
            credentials,
            path_template: DEFAULT_PATH_TEMPLATE.to_string(),
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    /// Use a different path template (`{}` is replaced by the service name)
    pub fn with_path_template(mut self, template: impl Into<String>) -> Self {
        self.path_template = template.into();
        self
    }

    /// Apply an overall timeout to every call
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        self.agent = builder.build();
        self
    }

    /// Full URL of a service
    pub fn url_for(&self, operation: &str) -> String {
        format!(
            "{}{}",
            self.address.trim_end_matches('/'),
            self.path_template.replace("{}", operation)
        )
    }
}

impl fmt::Debug for HttpApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpApiClient")
            .field("address", &self.address)
            .field("credentials", &self.credentials)
            .field("path_template", &self.path_template)
            .finish_non_exhaustive()
    }
}

impl ApiClient for HttpApiClient {
    fn invoke(&self, operation: &str, payload: &Value) -> Result<ApiResponse> {
        let url = self.url_for(operation);
        debug!(%url, operation, "invoking service");

        let result = self
            .agent
            .post(&url)
            .set("Authorization", &self.credentials.basic_auth_header())
            .send_json(payload);

        let (status, body) = match result {
            Ok(response) => (response.status(), read_body(response)?),
            Err(ureq::Error::Status(status, response)) => (status, read_body(response)?),
            Err(err) => {
                return Err(RegistryError::Transport {
                    url,
                    message: err.to_string(),
                })
            }
        };

        if status == 401 || status == 403 {
            return Err(RegistryError::Unauthorized { url, status });
        }

        let response = ApiResponse::from_http(status, body, &response_key(operation));
        debug!(operation, status, ok = response.ok, "service replied");
        Ok(response)
    }
}

// `into_string` caps bodies at 10 MB; a full channel list can be larger.
fn read_body(response: ureq::Response) -> Result<String> {
    let mut body = String::new();
    response.into_reader().read_to_string(&mut body)?;
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn credentials_split_on_first_colon() {
        let creds = Credentials::parse("admin:p:ss").unwrap();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password(), "p:ss");
        assert_eq!(creds.basic_auth_header(), "Basic YWRtaW46cDpzcw==");

        let empty_password: Credentials = "pubapi:".parse().unwrap();
        assert_eq!(empty_password.password(), "");
    }

    #[test]
    fn credentials_without_colon_are_rejected() {
        let err = Credentials::parse("pubapi").unwrap_err();
        assert!(matches!(err, RegistryError::InvalidCredentials { .. }));
        assert!(Credentials::parse(":secret").is_err());
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::new("pubapi", "hunter2");
        let printed = format!("{:?}", creds);
        assert!(printed.contains("pubapi"));
        assert!(!printed.contains("hunter2"));
        assert_eq!(redact("pubapi:hunter2"), "pubapi:***");
    }

    #[test]
    fn url_for_joins_address_and_template() {
        let client = HttpApiClient::new("http://localhost:11223/", Credentials::new("a", "b"));
        assert_eq!(
            client.url_for("zato.http-soap.get-list"),
            "http://localhost:11223/zato/json/zato.http-soap.get-list"
        );

        let client = client.with_path_template("/api/{}");
        assert_eq!(client.url_for("x"), "http://localhost:11223/api/x");
    }

    #[test]
    fn response_key_follows_service_name() {
        assert_eq!(
            response_key("zato.http-soap.get-list"),
            "zato_http_soap_get_list_response"
        );
        assert_eq!(
            response_key("zato.http-soap.create"),
            "zato_http_soap_create_response"
        );
    }

    #[test]
    fn from_http_classification() {
        let key = "zato_http_soap_create_response";

        let created = ApiResponse::from_http(
            200,
            r#"{"zato_env": {"result": "ZATO_OK"}, "zato_http_soap_create_response": {"id": 7}}"#
                .into(),
            key,
        );
        assert!(created.ok);
        assert!(created.has_payload());
        assert_eq!(created.data, Some(json!({"id": 7})));

        let zato_error = ApiResponse::from_http(
            200,
            r#"{"zato_env": {"result": "ZATO_ERROR", "details": "boom"}}"#.into(),
            key,
        );
        assert!(!zato_error.ok);
        assert!(zato_error.details.contains("boom"));

        let server_error = ApiResponse::from_http(500, "Internal error".into(), key);
        assert!(!server_error.ok);
        assert_eq!(server_error.details, "Internal error");

        let not_an_object = ApiResponse::from_http(200, "[]".into(), key);
        assert!(!not_an_object.ok);
    }

    #[test]
    fn envelope_alone_is_not_a_payload() {
        let key = "zato_http_soap_create_response";

        let missing =
            ApiResponse::from_http(200, r#"{"zato_env": {"result": "ZATO_OK"}}"#.into(), key);
        assert!(missing.ok);
        assert!(missing.data.is_none());
        assert!(!missing.has_payload());

        let empty = ApiResponse::from_http(
            200,
            r#"{"zato_env": {"result": "ZATO_OK"}, "zato_http_soap_create_response": {}}"#.into(),
            key,
        );
        assert!(empty.ok);
        assert_eq!(empty.data, Some(json!({})));
        assert!(!empty.has_payload());
        assert!(empty.details.contains("ZATO_OK"));
    }

    #[test]
    fn invoke_posts_json_with_basic_auth() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/zato/json/zato.ping")
            .match_header("authorization", "Basic cHViYXBpOjEyMw==")
            .match_body(Matcher::Json(json!({"cluster_id": 1})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"zato_env": {"result": "ZATO_OK", "cid": "1", "details": ""}, "zato_ping_response": {"pong": "zato"}}"#,
            )
            .create();

        let client = HttpApiClient::new(server.url(), Credentials::new("pubapi", "123"));
        let response = client
            .invoke("zato.ping", &json!({"cluster_id": 1}))
            .unwrap();

        assert!(response.ok);
        assert_eq!(response.data, Some(json!({"pong": "zato"})));
        mock.assert();
    }

    #[test]
    fn invoke_keeps_error_body_as_details() {
        let mut server = mockito::Server::new();
        let body = r#"{"zato_env": {"result": "ZATO_ERROR", "details": "nope"}}"#;
        let mock = server
            .mock("POST", "/zato/json/zato.http-soap.create")
            .with_status(500)
            .with_body(body)
            .create();

        let client = HttpApiClient::new(server.url(), Credentials::new("pubapi", "123"));
        let response = client
            .invoke("zato.http-soap.create", &json!({}))
            .unwrap();

        assert!(!response.ok);
        assert!(response.data.is_none());
        assert_eq!(response.details, body);
        mock.assert();
    }

    #[test]
    fn invoke_unauthorized_is_an_error() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/zato/json/zato.http-soap.get-list")
            .with_status(401)
            .create();

        let client = HttpApiClient::new(server.url(), Credentials::new("pubapi", "wrong"));
        let err = client
            .invoke("zato.http-soap.get-list", &json!({"cluster_id": 1}))
            .unwrap_err();

        assert!(matches!(err, RegistryError::Unauthorized { status: 401, .. }));
        mock.assert();
    }

    #[test]
    fn invoke_transport_failure_is_an_error() {
        // Port 9 (discard) on loopback is closed on any sane test host.
        let client = HttpApiClient::new("http://127.0.0.1:9", Credentials::new("a", "b"))
            .with_timeout(Some(Duration::from_secs(2)));
        let err = client.invoke("zato.ping", &json!({})).unwrap_err();
        assert!(matches!(err, RegistryError::Transport { .. }));
    }
}
