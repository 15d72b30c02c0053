//! Helpers for testing code that talks to a mock OpenCTI server.

use crate::opencti::OpenCtiConfig;
use crate::traits::{ConnectorHealth, ConnectorResult};
use serde_json::{json, Value};

/// Token the test helpers put in every configuration.
pub const TEST_TOKEN: &str = "00000000-test-token";

/// A configuration pointing at `base_url` with retries disabled.
pub fn test_config(base_url: &str) -> OpenCtiConfig {
    let mut config = OpenCtiConfig::new(base_url, TEST_TOKEN).with_verify_ssl(true);
    config.max_retries = 0;
    config.timeout_secs = 5;
    config.requests_per_minute = 0;
    config
}

/// A successful GraphQL response body.
pub fn graphql_data(data: Value) -> Value {
    json!({ "data": data })
}

/// A failed GraphQL response body with an `extensions.code`.
pub fn graphql_error(message: &str, code: &str) -> Value {
    json!({
        "data": null,
        "errors": [{ "message": message, "extensions": { "code": code } }]
    })
}

/// A connection with one edge per node.
pub fn connection(nodes: Vec<Value>, end_cursor: Option<&str>, has_next_page: bool) -> Value {
    let count = nodes.len();
    json!({
        "edges": nodes.into_iter().map(|node| json!({ "node": node })).collect::<Vec<_>>(),
        "pageInfo": {
            "startCursor": null,
            "endCursor": end_cursor,
            "hasNextPage": has_next_page,
            "hasPreviousPage": false,
            "globalCount": count,
        }
    })
}

/// Asserts that a connector health check returns healthy.
pub fn assert_healthy(result: &ConnectorResult<ConnectorHealth>) {
    match result {
        Ok(ConnectorHealth::Healthy) => {}
        other => panic!("Expected Healthy, got {:?}", other),
    }
}

/// Asserts that a connector health check returns unhealthy.
pub fn assert_unhealthy(result: &ConnectorResult<ConnectorHealth>) {
    match result {
        Ok(ConnectorHealth::Unhealthy(_)) => {}
        other => panic!("Expected Unhealthy, got {:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_config() {
        let config = test_config("http://127.0.0.1:9000/");
        assert_eq!(config.base_url(), "http://127.0.0.1:9000");
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.access_token.expose_secret(), TEST_TOKEN);
    }

    #[test]
    fn test_connection_shape() {
        let conn = connection(vec![json!({"id": "a"})], Some("c1"), true);
        assert_eq!(conn["edges"][0]["node"]["id"], "a");
        assert_eq!(conn["pageInfo"]["endCursor"], "c1");
        assert_eq!(conn["pageInfo"]["globalCount"], 1);
    }

    #[test]
    fn test_assert_unhealthy() {
        let result: ConnectorResult<ConnectorHealth> =
            Ok(ConnectorHealth::Unhealthy("down".to_string()));
        assert_unhealthy(&result);
    }
}
