//! Channel registry
//!
//! Holds the channels loaded from one cluster and replays channel lists
//! against it.

use std::borrow::Cow;
use std::path::Path;

use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::client::{ApiClient, Credentials, HttpApiClient};
use crate::config::{RemoteConfig, DEFAULT_CLUSTER_ID};
use crate::error::{RegistryError, Result};

use super::backup::{read_backup, write_backup};
use super::classify::{classify_create_failure, CreateFailure};
use super::request::{to_request_params, CreateRequest};
use super::types::ChannelRecord;
use super::{CREATE_OPERATION, LIST_OPERATION, LIST_RESPONSE_KEY};

/// Where a restore run takes its channels from
#[derive(Debug, Clone, Copy)]
pub enum RestoreSource<'a> {
    /// A backup file written by [`ChannelRegistry::dump_to_file`]
    File(&'a Path),
    /// Records already in memory
    List(&'a [ChannelRecord]),
}

impl<'a, C: ApiClient> From<&'a ChannelRegistry<C>> for RestoreSource<'a> {
    /// The channels another registry has loaded
    fn from(registry: &'a ChannelRegistry<C>) -> Self {
        Self::List(registry.channels())
    }
}

/// Result of restoring one channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    Created,
    AlreadyDefined,
    /// Zato refused for some other reason; the run keeps going
    Rejected { message: String },
}

/// Tally of a restore run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub created: usize,
    pub already_defined: usize,
    /// (channel name, Zato message)
    pub rejected: Vec<(String, String)>,
}

impl RestoreReport {
    fn record(&mut self, name: &str, outcome: RestoreOutcome) {
        match outcome {
            RestoreOutcome::Created => self.created += 1,
            RestoreOutcome::AlreadyDefined => self.already_defined += 1,
            RestoreOutcome::Rejected { message } => self.rejected.push((name.to_string(), message)),
        }
    }

    pub fn total(&self) -> usize {
        self.created + self.already_defined + self.rejected.len()
    }
}

/// Channels of one Zato cluster
#[derive(Debug)]
pub struct ChannelRegistry<C = HttpApiClient> {
    client: C,
    cluster_id: u64,
    channels: Vec<ChannelRecord>,
}

impl ChannelRegistry<HttpApiClient> {
    /// Registry for `address` with the stock path template and cluster 1
    pub fn connect(address: impl Into<String>, credentials: Credentials) -> Self {
        Self::new(HttpApiClient::new(address, credentials))
    }

    /// Registry for `address` with path template, timeout and cluster from config
    pub fn from_config(
        address: impl Into<String>,
        credentials: Credentials,
        remote: &RemoteConfig,
    ) -> Self {
        let client = HttpApiClient::new(address, credentials)
            .with_path_template(remote.path_template.clone())
            .with_timeout(remote.timeout());
        Self::new(client).with_cluster_id(Some(remote.cluster_id))
    }
}

impl<C: ApiClient> ChannelRegistry<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            cluster_id: DEFAULT_CLUSTER_ID,
            channels: Vec::new(),
        }
    }

    /// Target another cluster; `None` and `0` both mean the default cluster
    pub fn with_cluster_id(mut self, cluster_id: Option<u64>) -> Self {
        self.cluster_id = cluster_id
            .filter(|id| *id != 0)
            .unwrap_or(DEFAULT_CLUSTER_ID);
        self
    }

    pub fn cluster_id(&self) -> u64 {
        self.cluster_id
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Channels loaded so far, in the order the cluster reported them
    pub fn channels(&self) -> &[ChannelRecord] {
        &self.channels
    }

    /// Forget loaded channels
    pub fn clear(&mut self) {
        self.channels.clear();
    }

    /// Fetch the cluster's channels and append the non-internal ones.
    ///
    /// Appends: a second call without [`clear`](Self::clear) duplicates
    /// every entry. Returns how many records were added.
    pub fn load_channels(&mut self) -> Result<usize> {
        let response = self
            .client
            .invoke(LIST_OPERATION, &json!({ "cluster_id": self.cluster_id }))?;

        if !response.ok {
            return Err(RegistryError::RemoteCall {
                operation: LIST_OPERATION.to_string(),
                details: response.details,
            });
        }

        let Some(Value::Array(items)) = response.data else {
            return Err(RegistryError::UnexpectedResponse {
                operation: LIST_OPERATION.to_string(),
                message: format!("no {} list in reply", LIST_RESPONSE_KEY),
            });
        };

        let mut added = 0;
        let mut skipped = 0;
        for item in items {
            let record =
                ChannelRecord::try_from(item).map_err(|other| RegistryError::UnexpectedResponse {
                    operation: LIST_OPERATION.to_string(),
                    message: format!("list entry is not an object: {}", other),
                })?;

            if record.is_internal() {
                debug!(name = record.display_name(), "skipping internal channel");
                skipped += 1;
                continue;
            }

            self.channels.push(record);
            added += 1;
        }

        info!(
            cluster_id = self.cluster_id,
            added,
            skipped,
            "loaded channels"
        );
        Ok(added)
    }

    /// Write loaded channels to `path`, loading them first if none are loaded
    pub fn dump_to_file(&mut self, path: &Path) -> Result<()> {
        if self.channels.is_empty() {
            self.load_channels()?;
        }

        write_backup(path, &self.channels)?;
        info!(
            path = %path.display(),
            count = self.channels.len(),
            "backup written"
        );
        Ok(())
    }

    /// Create request for `record` on this registry's cluster
    pub fn to_request_params(&self, record: &ChannelRecord) -> Result<CreateRequest> {
        to_request_params(record, self.cluster_id)
    }

    /// Create every channel from `source`, in order.
    ///
    /// Duplicates and other refusals are tallied and skipped; any error
    /// stops the run.
    pub fn restore_channels(&self, source: RestoreSource<'_>) -> Result<RestoreReport> {
        let records: Cow<'_, [ChannelRecord]> = match source {
            RestoreSource::File(path) => {
                let records = read_backup(path)?;
                debug!(path = %path.display(), count = records.len(), "read backup");
                Cow::Owned(records)
            }
            RestoreSource::List(records) => Cow::Borrowed(records),
        };

        let mut report = RestoreReport::default();
        for record in records.iter() {
            let outcome = self.restore_channel(record)?;
            report.record(record.display_name(), outcome);
        }

        info!(
            cluster_id = self.cluster_id,
            created = report.created,
            already_defined = report.already_defined,
            rejected = report.rejected.len(),
            "restore finished"
        );
        Ok(report)
    }

    pub fn restore_from_file(&self, path: &Path) -> Result<RestoreReport> {
        self.restore_channels(RestoreSource::File(path))
    }

    pub fn restore_from_list(&self, records: &[ChannelRecord]) -> Result<RestoreReport> {
        self.restore_channels(RestoreSource::List(records))
    }

    pub fn restore_from_registry<D: ApiClient>(
        &self,
        other: &ChannelRegistry<D>,
    ) -> Result<RestoreReport> {
        self.restore_channels(RestoreSource::from(other))
    }

    /// Create one channel
    pub fn restore_channel(&self, record: &ChannelRecord) -> Result<RestoreOutcome> {
        let request = self.to_request_params(record)?;
        let response = self.client.invoke(CREATE_OPERATION, &request.to_value()?)?;
        let name = record.display_name();

        if response.has_payload() {
            info!("{} added to the connections.", name);
            return Ok(RestoreOutcome::Created);
        }

        match classify_create_failure(&response.details)? {
            CreateFailure::AlreadyExists => {
                info!("{} is already defined.", name);
                Ok(RestoreOutcome::AlreadyDefined)
            }
            CreateFailure::Other { message } => {
                warn!(%message, "{} was not created.", name);
                Ok(RestoreOutcome::Rejected { message })
            }
        }
    }
}
