//! Marking definitions (TLP, PAP and custom statements).

use super::client::OpenCtiClient;
use super::queries;
use crate::graphql::{field, paginated};
use crate::traits::ConnectorResult;
use serde_json::{json, Value};

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
    let data = client.query(queries::MARKING_DEFINITIONS, variables).await?;
    paginated(field(data, "markingDefinitions")?)
}
