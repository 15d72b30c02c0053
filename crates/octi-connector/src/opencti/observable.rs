//! STIX cyber observables, the objects operators call indicators.

use super::client::OpenCtiClient;
use super::filters::FilterGroup;
use super::queries;
use crate::constants::{IndicatorKind, RelationField};
use crate::graphql::{entity, field, paginated};
use crate::traits::{ConnectorError, ConnectorResult};
use serde_json::{json, Map, Value};
use tracing::{debug, info};

/// Score given to new observables when the caller does not pass one.
pub const DEFAULT_SCORE: u64 = 50;

/// Input for `stixCyberObservableAdd`.
#[derive(Debug, Clone)]
pub struct ObservableInput {
    pub kind: IndicatorKind,
    pub value: String,
    pub description: Option<String>,
    pub score: u64,
    pub created_by: Option<String>,
    pub object_marking: Vec<String>,
    pub object_label: Vec<String>,
    pub external_references: Vec<String>,
}

impl ObservableInput {
    pub fn new(kind: IndicatorKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            description: None,
            score: DEFAULT_SCORE,
            created_by: None,
            object_marking: Vec::new(),
            object_label: Vec::new(),
            external_references: Vec::new(),
        }
    }
}

/// Typed observable payload for a kind.
///
/// Registry keys carry `attribute_key`, accounts `account_login`, files a
/// single `hashes` entry; everything else carries `value`.
pub fn observable_data(kind: IndicatorKind, value: &str) -> Value {
    match kind {
        IndicatorKind::RegistryKey => json!({ "attribute_key": value }),
        IndicatorKind::Account => json!({ "account_login": value }),
        IndicatorKind::FileMd5 | IndicatorKind::FileSha1 | IndicatorKind::FileSha256 => json!({
            "hashes": [{
                "algorithm": kind.hash_algorithm(),
                "hash": value,
            }]
        }),
        _ => json!({ "value": value }),
    }
}

/// `stixCyberObservableAdd` document with the typed argument for `kind`.
fn add_mutation(kind: IndicatorKind) -> String {
    let argument = kind.input_argument();
    format!(
        "mutation StixCyberObservableAdd($type: String!, $x_opencti_score: Int, \
         $x_opencti_description: String, $createdBy: String, $objectMarking: [String], \
         $objectLabel: [String], $externalReferences: [String], ${arg}: {input}) {{\n  \
         stixCyberObservableAdd(type: $type, x_opencti_score: $x_opencti_score, \
         x_opencti_description: $x_opencti_description, createdBy: $createdBy, \
         objectMarking: $objectMarking, objectLabel: $objectLabel, \
         externalReferences: $externalReferences, {arg}: ${arg}) {{{fields}  }}\n}}\n",
        arg = argument,
        input = kind.input_type(),
        fields = queries::OBSERVABLE_FIELDS,
    )
}

pub async fn create(client: &OpenCtiClient, input: ObservableInput) -> ConnectorResult<Value> {
    info!(
        kind = %input.kind,
        add_type = %input.kind.add_type(),
        "Creating observable"
    );

    let mut variables = Map::new();
    variables.insert("type".into(), json!(input.kind.add_type()));
    variables.insert("x_opencti_score".into(), json!(input.score));
    variables.insert("x_opencti_description".into(), json!(input.description));
    variables.insert("createdBy".into(), json!(input.created_by));
    variables.insert("objectMarking".into(), json!(input.object_marking));
    variables.insert("objectLabel".into(), json!(input.object_label));
    variables.insert(
        "externalReferences".into(),
        json!(input.external_references),
    );
    variables.insert(
        input.kind.input_argument().into(),
        observable_data(input.kind, &input.value),
    );

    let data = client
        .query(&add_mutation(input.kind), Value::Object(variables))
        .await?;
    Ok(entity(field(data, "stixCyberObservableAdd")?))
}

pub async fn list(
    client: &OpenCtiClient,
    filters: Option<FilterGroup>,
    first: u64,
    after: Option<String>,
) -> ConnectorResult<Value> {
    let variables = json!({
        "types": null,
        "filters": filters,
        "first": first,
        "after": after,
    });
    let data = client.query(queries::STIX_CYBER_OBSERVABLES, variables).await?;
    paginated(field(data, "stixCyberObservables")?)
}

pub async fn delete(client: &OpenCtiClient, id: &str) -> ConnectorResult<()> {
    info!(id = %id, "Deleting observable");

    let data = client
        .query(queries::OBSERVABLE_DELETE, json!({ "id": id }))
        .await?;
    match field(data, "stixCyberObservableEdit")? {
        Value::Null => Err(ConnectorError::NotFound(format!("Observable {}", id))),
        _ => Ok(()),
    }
}

/// Patches one attribute. Scalar values are wrapped into the list `EditInput` expects.
pub async fn update_field(
    client: &OpenCtiClient,
    id: &str,
    key: &str,
    value: Value,
) -> ConnectorResult<Value> {
    info!(id = %id, key = %key, "Updating observable field");

    let values = match value {
        Value::Array(items) => items,
        other => vec![other],
    };
    let variables = json!({
        "id": id,
        "input": [{ "key": key, "value": values }],
    });
    let data = client.query(queries::OBSERVABLE_FIELD_PATCH, variables).await?;
    let edit = field(data, "stixCyberObservableEdit")?;
    Ok(entity(field(edit, "fieldPatch")?))
}

/// Attaches a marking definition or label. Returns whether the platform acknowledged it.
pub async fn add_relation(
    client: &OpenCtiClient,
    id: &str,
    relation: RelationField,
    to_id: &str,
) -> ConnectorResult<bool> {
    info!(
        id = %id,
        to_id = %to_id,
        relationship_type = %relation.relationship_type(),
        "Adding observable relation"
    );

    let variables = json!({
        "id": id,
        "input": {
            "toId": to_id,
            "relationship_type": relation.relationship_type(),
        },
    });
    let data = client.query(queries::OBSERVABLE_RELATION_ADD, variables).await?;
    Ok(acknowledged(data, "relationAdd"))
}

/// Detaches a marking definition or label. Returns whether the platform acknowledged it.
pub async fn remove_relation(
    client: &OpenCtiClient,
    id: &str,
    relation: RelationField,
    to_id: &str,
) -> ConnectorResult<bool> {
    info!(
        id = %id,
        to_id = %to_id,
        relationship_type = %relation.relationship_type(),
        "Removing observable relation"
    );

    let variables = json!({
        "id": id,
        "toId": to_id,
        "relationship_type": relation.relationship_type(),
    });
    let data = client
        .query(queries::OBSERVABLE_RELATION_DELETE, variables)
        .await?;
    Ok(acknowledged(data, "relationDelete"))
}

fn acknowledged(data: Value, mutation: &str) -> bool {
    let result = data
        .get("stixCyberObservableEdit")
        .and_then(|edit| edit.get(mutation))
        .map_or(false, |value| !value.is_null());
    debug!(mutation = %mutation, acknowledged = result, "Relation mutation result");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observable_data() {
        assert_eq!(
            observable_data(IndicatorKind::RegistryKey, "HKLM\\Run"),
            json!({"attribute_key": "HKLM\\Run"})
        );
        assert_eq!(
            observable_data(IndicatorKind::Account, "jdoe"),
            json!({"account_login": "jdoe"})
        );
        assert_eq!(
            observable_data(IndicatorKind::FileSha256, "abc"),
            json!({"hashes": [{"algorithm": "SHA-256", "hash": "abc"}]})
        );
        assert_eq!(
            observable_data(IndicatorKind::Ipv4, "198.51.100.7"),
            json!({"value": "198.51.100.7"})
        );
    }

    #[test]
    fn test_add_mutation_uses_typed_argument() {
        let doc = add_mutation(IndicatorKind::Domain);
        assert!(doc.starts_with("mutation StixCyberObservableAdd("));
        assert!(doc.contains("$DomainName: DomainNameAddInput"));
        assert!(doc.contains("DomainName: $DomainName"));
        assert!(doc.contains("observable_value"));

        let host = add_mutation(IndicatorKind::Host);
        assert!(host.contains("$Hostname: HostnameAddInput"));
        assert!(host.contains("Hostname: $Hostname"));
    }

    #[test]
    fn test_acknowledged() {
        let ok = json!({"stixCyberObservableEdit": {"relationAdd": {"id": "rel-1"}}});
        assert!(acknowledged(ok, "relationAdd"));
        let null = json!({"stixCyberObservableEdit": {"relationAdd": null}});
        assert!(!acknowledged(null, "relationAdd"));
        assert!(!acknowledged(json!({"stixCyberObservableEdit": null}), "relationDelete"));
    }
}
