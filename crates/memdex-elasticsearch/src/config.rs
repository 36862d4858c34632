//! Elasticsearch configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Elasticsearch memory backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElasticsearchConfig {
    /// Base URL of the cluster, e.g. `http://localhost:9200`
    #[serde(default = "default_server_address")]
    pub server_address: String,
    /// Basic auth user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Basic auth password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Prepended to every logical index name
    #[serde(default)]
    pub index_prefix: String,
    #[serde(default = "default_one")]
    pub replica_count: u32,
    #[serde(default = "default_one")]
    pub shard_count: u32,
    /// Payload keys whose string values are copied to `txt_<key>` for keyword search
    #[serde(default)]
    pub indexable_payload_properties: Vec<String>,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_server_address() -> String {
    "http://localhost:9200".to_string()
}

fn default_one() -> u32 {
    1
}

fn default_timeout_secs() -> u64 {
    30
}

impl ElasticsearchConfig {
    /// Create a configuration pointing at `server_address`
    pub fn new(server_address: impl Into<String>) -> Self {
        Self {
            server_address: server_address.into(),
            ..Default::default()
        }
    }

    /// Set basic auth credentials
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_index_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.index_prefix = prefix.into();
        self
    }

    pub fn with_replica_count(mut self, replica_count: u32) -> Self {
        self.replica_count = replica_count;
        self
    }

    pub fn with_shard_count(mut self, shard_count: u32) -> Self {
        self.shard_count = shard_count;
        self
    }

    /// Choose which payload properties are full-text searchable
    pub fn with_indexable_payload_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indexable_payload_properties = properties.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            server_address: default_server_address(),
            username: None,
            password: None,
            index_prefix: String::new(),
            replica_count: default_one(),
            shard_count: default_one(),
            indexable_payload_properties: Vec::new(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}
