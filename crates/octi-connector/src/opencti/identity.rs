//! Identities (organizations).

use super::client::OpenCtiClient;
use super::queries;
use crate::graphql::{entity, field, paginated};
use crate::traits::ConnectorResult;
use serde_json::{json, Value};
use tracing::info;

pub const ORGANIZATION: &str = "Organization";

/// Input for `organizationAdd`.
#[derive(Debug, Clone, Default)]
pub struct OrganizationInput {
    pub name: String,
    pub description: Option<String>,
    /// Platform reliability label, e.g. `"B - Usually reliable"`.
    pub reliability: Option<String>,
}

/// Creates an organization. The platform deduplicates on name.
pub async fn create_organization(
    client: &OpenCtiClient,
    input: OrganizationInput,
) -> ConnectorResult<Value> {
    info!(name = %input.name, "Creating organization");

    let variables = json!({
        "input": {
            "name": input.name,
            "description": input.description,
            "x_opencti_reliability": input.reliability,
        }
    });
    let data = client.query(queries::ORGANIZATION_ADD, variables).await?;
    Ok(entity(field(data, "organizationAdd")?))
}

/// Lists identities of the given types with pagination info.
pub async fn list(
    client: &OpenCtiClient,
    types: &[&str],
    first: u64,
    after: Option<String>,
) -> ConnectorResult<Value> {
    let variables = json!({
        "types": types,
        "filters": null,
        "first": first,
        "after": after,
    });
    let data = client.query(queries::IDENTITIES, variables).await?;
    paginated(field(data, "identities")?)
}
