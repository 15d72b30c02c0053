//! External references.

use super::client::OpenCtiClient;
use super::queries;
use crate::graphql::{entity, field, paginated};
use crate::traits::ConnectorResult;
use serde_json::{json, Value};
use tracing::info;

pub async fn create(
    client: &OpenCtiClient,
    source_name: &str,
    url: Option<&str>,
) -> ConnectorResult<Value> {
    info!(source_name = %source_name, "Creating external reference");

    let variables = json!({
        "input": {
            "source_name": source_name,
            "url": url,
        }
    });
    let data = client.query(queries::EXTERNAL_REFERENCE_ADD, variables).await?;
    Ok(entity(field(data, "externalReferenceAdd")?))
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
    let data = client.query(queries::EXTERNAL_REFERENCES, variables).await?;
    paginated(field(data, "externalReferences")?)
}
