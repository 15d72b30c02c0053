//! Labels.

use super::client::OpenCtiClient;
use super::queries;
use crate::graphql::{entity, field, paginated};
use crate::traits::ConnectorResult;
use serde_json::{json, Value};
use tracing::info;

/// Creates a label. The platform assigns a color when none is given.
pub async fn create(client: &OpenCtiClient, value: &str) -> ConnectorResult<Value> {
    info!(value = %value, "Creating label");

    let variables = json!({ "input": { "value": value } });
    let data = client.query(queries::LABEL_ADD, variables).await?;
    Ok(entity(field(data, "labelAdd")?))
}

pub async fn list(
    client: &OpenCtiClient,
    first: u64,
    after: Option<String>,
) -> ConnectorResult<Value> {
    let variables = json!({
        "filters": null,
        "first": first,
        "after": after,
    });
    let data = client.query(queries::LABELS, variables).await?;
    paginated(field(data, "labels")?)
}
