//! GraphQL envelope handling.
//!
//! Requests are `{query, variables}` documents. Responses carry `data`
//! and/or an `errors` array; the first error decides the `ConnectorError`
//! variant through its `extensions.code`.

use crate::traits::{ConnectorError, ConnectorResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A GraphQL request body.
#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: Value,
}

/// A GraphQL response body.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

/// A single entry of the `errors` array.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<Value>,
}

impl GraphQlError {
    /// `extensions.code`, e.g. `AUTH_REQUIRED`.
    pub fn code(&self) -> Option<&str> {
        self.extensions.as_ref()?.get("code")?.as_str()
    }

    fn into_connector_error(self) -> ConnectorError {
        match self.code() {
            Some("AUTH_REQUIRED") => ConnectorError::AuthenticationFailed(self.message),
            Some("FORBIDDEN_ACCESS") => ConnectorError::AuthorizationDenied(self.message),
            Some("NOT_FOUND") => ConnectorError::NotFound(self.message),
            _ => ConnectorError::RequestFailed(self.message),
        }
    }
}

impl GraphQlResponse {
    /// Returns `data`, or the first error mapped to a connector error.
    pub fn into_data(self) -> ConnectorResult<Value> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error.into_connector_error());
        }
        self.data
            .ok_or_else(|| ConnectorError::InvalidResponse("Response has no data".to_string()))
    }
}

/// Takes a top-level field out of `data`.
pub fn field(data: Value, name: &str) -> ConnectorResult<Value> {
    match data {
        Value::Object(mut map) => map.remove(name).ok_or_else(|| {
            ConnectorError::InvalidResponse(format!("Response is missing field: {}", name))
        }),
        _ => Err(ConnectorError::InvalidResponse(
            "Response data is not an object".to_string(),
        )),
    }
}

/// Converts a connection (`edges`/`pageInfo`) into `{entities, pagination}`.
pub fn paginated(connection: Value) -> ConnectorResult<Value> {
    let mut connection = match connection {
        Value::Object(map) => map,
        Value::Null => return Err(ConnectorError::NotFound("Empty connection".to_string())),
        _ => {
            return Err(ConnectorError::InvalidResponse(
                "Connection is not an object".to_string(),
            ))
        }
    };

    let entities: Vec<Value> = match connection.remove("edges") {
        Some(Value::Array(edges)) => edges.into_iter().filter_map(edge_node).map(entity).collect(),
        _ => Vec::new(),
    };
    let pagination = connection.remove("pageInfo").unwrap_or(Value::Null);

    Ok(json!({
        "entities": entities,
        "pagination": pagination,
    }))
}

/// Flattens nested connections (`objectLabel`, `objectMarking`, ...) into plain lists.
pub fn entity(node: Value) -> Value {
    match node {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, flatten_connection(value)))
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}

fn flatten_connection(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.get("edges").map_or(false, Value::is_array) => {
            match map.remove("edges") {
                Some(Value::Array(edges)) => {
                    Value::Array(edges.into_iter().filter_map(edge_node).collect())
                }
                _ => Value::Array(Vec::new()),
            }
        }
        other => other,
    }
}

fn edge_node(edge: Value) -> Option<Value> {
    match edge {
        Value::Object(mut map) => map.remove("node"),
        _ => None,
    }
}
