//! GraphQL client for an OpenCTI instance.

use super::config::OpenCtiConfig;
use super::label;
use crate::graphql::{GraphQlRequest, GraphQlResponse};
use crate::http::{HttpClient, RateLimitConfig};
use crate::traits::{Connector, ConnectorHealth, ConnectorResult};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

const GRAPHQL_PATH: &str = "/graphql";

/// OpenCTI client.
///
/// One instance is built per operation call from the host-provided
/// configuration; it is cheap enough that nothing is pooled across calls.
pub struct OpenCtiClient {
    config: OpenCtiConfig,
    client: HttpClient,
}

impl OpenCtiClient {
    pub fn new(config: OpenCtiConfig) -> ConnectorResult<Self> {
        config.validate()?;

        let rate_limit = RateLimitConfig {
            max_requests: config.requests_per_minute,
            period: Duration::from_secs(60),
            ..Default::default()
        };
        let client = HttpClient::with_rate_limit(config.connector_config(), Some(rate_limit))?;

        info!(base_url = %client.base_url(), "OpenCTI client initialized");

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OpenCtiConfig {
        &self.config
    }

    /// Base URL after normalization.
    pub fn url(&self) -> &str {
        self.client.base_url()
    }

    /// Runs a GraphQL document and returns its `data` object.
    pub async fn query(&self, document: &str, variables: Value) -> ConnectorResult<Value> {
        debug!(operation = %operation_name(document), "Sending GraphQL request");

        let request = GraphQlRequest {
            query: document,
            variables,
        };
        let response: GraphQlResponse = self.client.post_json(GRAPHQL_PATH, &request).await?;
        response.into_data()
    }
}

/// Name following `query`/`mutation` in a document, for logging.
fn operation_name(document: &str) -> &str {
    document
        .split_whitespace()
        .skip_while(|word| *word != "query" && *word != "mutation")
        .nth(1)
        .map(|name| name.split('(').next().unwrap_or(name))
        .unwrap_or("anonymous")
}

#[async_trait]
impl Connector for OpenCtiClient {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn connector_type(&self) -> &str {
        "threat_intel"
    }

    async fn health_check(&self) -> ConnectorResult<ConnectorHealth> {
        match label::list(self, 1, None).await {
            Ok(_) => Ok(ConnectorHealth::Healthy),
            Err(e) => Ok(ConnectorHealth::Unhealthy(e.to_string())),
        }
    }

    async fn test_connection(&self) -> ConnectorResult<bool> {
        label::list(self, 1, None).await?;
        Ok(true)
    }
}
