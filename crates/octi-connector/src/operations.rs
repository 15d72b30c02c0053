//! Host-facing operations.
//!
//! Each operation takes the connector configuration and a parameter mapping
//! from the host, cleans the parameters, translates host parameter names
//! into platform inputs and returns the platform's answer largely as-is.

use crate::constants::{IndicatorKind, RelationField, Reliability, UpdateField};
use crate::opencti::filters::{Filter, FilterBuilder, FilterOperator};
use crate::opencti::{
    external_reference, identity, label, marking_definition, observable, ObservableInput,
    OpenCtiClient, OpenCtiConfig, OrganizationInput,
};
use crate::params::Params;
use crate::traits::{ConnectorError, ConnectorResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Operations exposed to the connector host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    CreateOrganization,
    GetOrganizations,
    CreateLabel,
    GetLabels,
    CreateExternalReference,
    GetExternalReferences,
    GetMarkingDefinition,
    CreateIndicator,
    GetIndicators,
    DeleteIndicator,
    AddIndicatorField,
    UpdateIndicatorField,
    RemoveIndicatorField,
    CheckHealth,
}

impl Operation {
    pub const ALL: [Operation; 14] = [
        Operation::CreateOrganization,
        Operation::GetOrganizations,
        Operation::CreateLabel,
        Operation::GetLabels,
        Operation::CreateExternalReference,
        Operation::GetExternalReferences,
        Operation::GetMarkingDefinition,
        Operation::CreateIndicator,
        Operation::GetIndicators,
        Operation::DeleteIndicator,
        Operation::AddIndicatorField,
        Operation::UpdateIndicatorField,
        Operation::RemoveIndicatorField,
        Operation::CheckHealth,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::CreateOrganization => "create_organization",
            Operation::GetOrganizations => "get_organizations",
            Operation::CreateLabel => "create_label",
            Operation::GetLabels => "get_labels",
            Operation::CreateExternalReference => "create_external_reference",
            Operation::GetExternalReferences => "get_external_references",
            Operation::GetMarkingDefinition => "get_marking_definition",
            Operation::CreateIndicator => "create_indicator",
            Operation::GetIndicators => "get_indicators",
            Operation::DeleteIndicator => "delete_indicator",
            Operation::AddIndicatorField => "add_indicator_field",
            Operation::UpdateIndicatorField => "update_indicator_field",
            Operation::RemoveIndicatorField => "remove_indicator_field",
            Operation::CheckHealth => "check_health",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Operation::CreateOrganization => "Creates an organization identity",
            Operation::GetOrganizations => "Lists organizations",
            Operation::CreateLabel => "Creates a label",
            Operation::GetLabels => "Lists labels",
            Operation::CreateExternalReference => "Creates an external reference",
            Operation::GetExternalReferences => "Lists external references",
            Operation::GetMarkingDefinition => "Lists marking definitions",
            Operation::CreateIndicator => "Creates a cyber observable",
            Operation::GetIndicators => "Lists cyber observables filtered by type and score",
            Operation::DeleteIndicator => "Deletes a cyber observable",
            Operation::AddIndicatorField => "Attaches a marking definition or label to an observable",
            Operation::UpdateIndicatorField => "Updates the description or score of an observable",
            Operation::RemoveIndicatorField => {
                "Detaches a marking definition or label from an observable"
            }
            Operation::CheckHealth => "Checks that the platform answers an authenticated query",
        }
    }

    pub fn parameters(&self) -> Vec<ParameterDef> {
        use ParameterType::*;
        let paging = || {
            vec![
                ParameterDef::optional("limit", "Page size", Integer, json!(50)),
                ParameterDef::optional(
                    "end_cursor_id",
                    "Cursor returned as pagination.endCursor by a previous call",
                    String,
                    Value::Null,
                ),
            ]
        };
        match self {
            Operation::CreateOrganization => vec![
                ParameterDef::required("name", "Organization name", String),
                ParameterDef::optional("description", "Description", String, Value::Null),
                ParameterDef::optional(
                    "reliability",
                    "Reliability rating, A to F",
                    String,
                    Value::Null,
                ),
            ],
            Operation::GetOrganizations
            | Operation::GetLabels
            | Operation::GetExternalReferences
            | Operation::GetMarkingDefinition => paging(),
            Operation::CreateLabel => vec![ParameterDef::required("name", "Label value", String)],
            Operation::CreateExternalReference => vec![
                ParameterDef::required("name", "Source name", String),
                ParameterDef::optional("url", "Reference URL", String, Value::Null),
            ],
            Operation::CreateIndicator => vec![
                ParameterDef::required("type", "Indicator type, e.g. IPv4 or File-SHA256", String),
                ParameterDef::required("value", "Observable value", String),
                ParameterDef::optional("description", "Description", String, Value::Null),
                ParameterDef::optional("score", "Score from 0 to 100", Integer, json!(50)),
                ParameterDef::optional("created_by", "Author identity id", String, Value::Null),
                ParameterDef::optional("marking_id", "Marking definition ids", List, Value::Null),
                ParameterDef::optional("label_id", "Label ids", List, Value::Null),
                ParameterDef::optional(
                    "external_reference_id",
                    "External reference ids",
                    List,
                    Value::Null,
                ),
            ],
            Operation::GetIndicators => {
                let mut params = vec![
                    ParameterDef::optional("type", "Indicator types", List, Value::Null),
                    ParameterDef::optional("min_score", "Minimum score", Integer, Value::Null),
                    ParameterDef::optional("max_score", "Maximum score", Integer, Value::Null),
                ];
                params.extend(paging());
                params
            }
            Operation::DeleteIndicator => vec![ParameterDef::required(
                "indicator_id",
                "Observable id",
                String,
            )],
            Operation::AddIndicatorField | Operation::RemoveIndicatorField => vec![
                ParameterDef::required("indicator_id", "Observable id", String),
                ParameterDef::optional(
                    "field",
                    "Marking Definition or Label; anything else is unsuccessful",
                    String,
                    Value::Null,
                ),
                ParameterDef::required("field_id", "Marking definition or label id", String),
            ],
            Operation::UpdateIndicatorField => vec![
                ParameterDef::required("indicator_id", "Observable id", String),
                ParameterDef::required("field", "description or score", String),
                ParameterDef::optional("field_value", "New value", String, Value::Null),
            ],
            Operation::CheckHealth => Vec::new(),
        }
    }

    /// Runs the operation against an existing client.
    #[instrument(skip_all, fields(operation = %self))]
    pub async fn run(self, client: &OpenCtiClient, params: Params) -> ConnectorResult<Value> {
        let started = Instant::now();
        let result = match self {
            Operation::CreateOrganization => create_organization(client, &params).await,
            Operation::GetOrganizations => get_organizations(client, &params).await,
            Operation::CreateLabel => create_label(client, &params).await,
            Operation::GetLabels => get_labels(client, &params).await,
            Operation::CreateExternalReference => create_external_reference(client, &params).await,
            Operation::GetExternalReferences => get_external_references(client, &params).await,
            Operation::GetMarkingDefinition => get_marking_definition(client, &params).await,
            Operation::CreateIndicator => create_indicator(client, &params).await,
            Operation::GetIndicators => get_indicators(client, &params).await,
            Operation::DeleteIndicator => delete_indicator(client, &params).await,
            Operation::AddIndicatorField => add_indicator_field(client, &params).await,
            Operation::UpdateIndicatorField => update_indicator_field(client, &params).await,
            Operation::RemoveIndicatorField => remove_indicator_field(client, &params).await,
            Operation::CheckHealth => check_health(client).await.map(Value::Bool),
        };

        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => info!(duration_ms, "Operation completed"),
            Err(e) => warn!(duration_ms, error = %e, "Operation failed"),
        }
        result
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = ConnectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s.trim())
            .ok_or_else(|| ConnectorError::InvalidRequest(format!("Unknown operation: {}", s)))
    }
}

/// Definition of an operation parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDef {
    pub name: String,
    pub description: String,
    pub param_type: ParameterType,
    pub required: bool,
    pub default: Option<Value>,
}

impl ParameterDef {
    pub fn required(name: &str, description: &str, param_type: ParameterType) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            param_type,
            required: true,
            default: None,
        }
    }

    pub fn optional(
        name: &str,
        description: &str,
        param_type: ParameterType,
        default: Value,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            param_type,
            required: false,
            default: if default.is_null() { None } else { Some(default) },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    String,
    Integer,
    List,
}

/// Runs a named operation with the host's configuration and raw parameters.
///
/// Each call builds its own client, so `requests_per_minute` only throttles
/// requests within that call. Use [`OperationRegistry`] to rate limit a
/// sequence of calls.
pub async fn execute(config: &OpenCtiConfig, name: &str, params: Value) -> ConnectorResult<Value> {
    let operation: Operation = name.parse()?;
    let client = OpenCtiClient::new(config.clone())?;
    operation.run(&client, Params::clean(params)).await
}

/// Runs operations by name against one client.
pub struct OperationRegistry {
    client: OpenCtiClient,
}

impl OperationRegistry {
    pub fn new(config: OpenCtiConfig) -> ConnectorResult<Self> {
        Ok(Self {
            client: OpenCtiClient::new(config)?,
        })
    }

    pub fn client(&self) -> &OpenCtiClient {
        &self.client
    }

    pub fn list(&self) -> &'static [Operation] {
        &Operation::ALL
    }

    pub async fn execute(&self, name: &str, params: Value) -> ConnectorResult<Value> {
        let operation: Operation = name.parse()?;
        operation.run(&self.client, Params::clean(params)).await
    }
}

fn message(success: bool) -> Value {
    json!({ "message": if success { "success" } else { "unsuccessful" } })
}

pub async fn create_organization(client: &OpenCtiClient, params: &Params) -> ConnectorResult<Value> {
    let reliability = params.get_str("reliability").and_then(|name| {
        let rating = Reliability::from_name(&name);
        if rating.is_none() {
            warn!(reliability = %name, "Unknown reliability rating, sending none");
        }
        rating
    });

    identity::create_organization(
        client,
        OrganizationInput {
            name: params.require_str("name")?,
            description: params.get_str("description"),
            reliability: reliability.map(|r| r.label().to_string()),
        },
    )
    .await
}

pub async fn get_organizations(client: &OpenCtiClient, params: &Params) -> ConnectorResult<Value> {
    identity::list(
        client,
        &[identity::ORGANIZATION],
        params.limit()?,
        params.after(),
    )
    .await
}

pub async fn create_label(client: &OpenCtiClient, params: &Params) -> ConnectorResult<Value> {
    label::create(client, &params.require_str("name")?).await
}

pub async fn get_labels(client: &OpenCtiClient, params: &Params) -> ConnectorResult<Value> {
    label::list(client, params.limit()?, params.after()).await
}

pub async fn create_external_reference(
    client: &OpenCtiClient,
    params: &Params,
) -> ConnectorResult<Value> {
    let url = params.get_str("url");
    external_reference::create(client, &params.require_str("name")?, url.as_deref()).await
}

pub async fn get_external_references(
    client: &OpenCtiClient,
    params: &Params,
) -> ConnectorResult<Value> {
    external_reference::list(client, params.limit()?, params.after()).await
}

pub async fn get_marking_definition(
    client: &OpenCtiClient,
    params: &Params,
) -> ConnectorResult<Value> {
    marking_definition::list(client, params.limit()?, params.after()).await
}

pub async fn create_indicator(client: &OpenCtiClient, params: &Params) -> ConnectorResult<Value> {
    let kind = indicator_kind(&params.require_str("type")?)?;

    let mut input = ObservableInput::new(kind, params.require_str("value")?);
    input.description = params.get_str("description");
    input.score = params
        .get_u64("score")?
        .unwrap_or(observable::DEFAULT_SCORE);
    input.created_by = params.get_str("created_by");
    input.object_marking = params.get_string_list("marking_id");
    input.object_label = params.get_string_list("label_id");
    input.external_references = params.get_string_list("external_reference_id");

    observable::create(client, input).await
}

pub async fn get_indicators(client: &OpenCtiClient, params: &Params) -> ConnectorResult<Value> {
    let mut stix_types: Vec<String> = Vec::new();
    for name in params.get_string_list("type") {
        let stix_type = indicator_kind(&name)?.stix_type().to_string();
        if !stix_types.contains(&stix_type) {
            stix_types.push(stix_type);
        }
    }

    let score_filter = |key: &str, operator| {
        params
            .get_str(key)
            .map(|score| Filter::new("x_opencti_score", vec![score], operator))
    };

    let filters = FilterBuilder::new()
        .push_if(score_filter("min_score", FilterOperator::Gte))
        .push_if(score_filter("max_score", FilterOperator::Lte))
        .push_if(
            (!stix_types.is_empty())
                .then(|| Filter::new("entity_type", stix_types, FilterOperator::Eq)),
        )
        .build();

    observable::list(client, filters, params.limit()?, params.after()).await
}

pub async fn delete_indicator(client: &OpenCtiClient, params: &Params) -> ConnectorResult<Value> {
    observable::delete(client, &params.require_str("indicator_id")?).await?;
    Ok(message(true))
}

pub async fn add_indicator_field(
    client: &OpenCtiClient,
    params: &Params,
) -> ConnectorResult<Value> {
    let Some(relation) = relation_field(params) else {
        return Ok(message(false));
    };
    let id = params.require_str("indicator_id")?;
    let to_id = params.require_str("field_id")?;

    let result = observable::add_relation(client, &id, relation, &to_id).await;
    relation_outcome(result)
}

pub async fn update_indicator_field(
    client: &OpenCtiClient,
    params: &Params,
) -> ConnectorResult<Value> {
    let id = params.require_str("indicator_id")?;
    let alias = params.require_str("field")?;
    let field = UpdateField::from_alias(&alias).ok_or_else(|| {
        ConnectorError::InvalidRequest(format!("Field cannot be updated: {}", alias))
    })?;

    let value = match (field, params.get("field_value")) {
        (UpdateField::Score, Some(Value::String(s))) => match s.trim().parse::<u64>() {
            Ok(score) => json!(score),
            Err(_) => {
                return Err(ConnectorError::InvalidRequest(format!(
                    "Score must be an integer: {}",
                    s
                )))
            }
        },
        (_, Some(value)) => value.clone(),
        (_, None) => Value::Null,
    };

    observable::update_field(client, &id, field.attribute_key(), value).await
}

pub async fn remove_indicator_field(
    client: &OpenCtiClient,
    params: &Params,
) -> ConnectorResult<Value> {
    let Some(relation) = relation_field(params) else {
        return Ok(message(false));
    };
    let id = params.require_str("indicator_id")?;
    let to_id = params.require_str("field_id")?;

    let result = observable::remove_relation(client, &id, relation, &to_id).await;
    relation_outcome(result)
}

/// Lists a single label to prove the URL and token work.
pub async fn check_health(client: &OpenCtiClient) -> ConnectorResult<bool> {
    label::list(client, 1, None).await?;
    Ok(true)
}

fn indicator_kind(name: &str) -> ConnectorResult<IndicatorKind> {
    IndicatorKind::from_name(name)
        .ok_or_else(|| ConnectorError::InvalidRequest(format!("Unknown indicator type: {}", name)))
}

fn relation_field(params: &Params) -> Option<RelationField> {
    let field = params.get_str("field")?;
    let relation = RelationField::from_name(&field);
    if relation.is_none() {
        warn!(field = %field, "Unsupported indicator field");
    }
    relation
}

/// Platform-side rejections become `unsuccessful`; transport and auth failures propagate.
fn relation_outcome(result: ConnectorResult<bool>) -> ConnectorResult<Value> {
    match result {
        Ok(acknowledged) => Ok(message(acknowledged)),
        Err(ConnectorError::RequestFailed(e)) | Err(ConnectorError::NotFound(e)) => {
            warn!(error = %e, "Relation mutation rejected");
            Ok(message(false))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>().unwrap(), op);
        }
        assert!(matches!(
            "drop_everything".parse::<Operation>(),
            Err(ConnectorError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_parameters() {
        let params = Operation::CreateIndicator.parameters();
        let required: Vec<_> = params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(required, vec!["type", "value"]);

        let limit = Operation::GetLabels
            .parameters()
            .into_iter()
            .find(|p| p.name == "limit")
            .unwrap();
        assert_eq!(limit.default, Some(json!(50)));
        assert!(Operation::CheckHealth.parameters().is_empty());
    }

    #[test]
    fn test_relation_field_parameter_is_optional() {
        for op in [Operation::AddIndicatorField, Operation::RemoveIndicatorField] {
            let required: Vec<_> = op
                .parameters()
                .into_iter()
                .filter(|p| p.required)
                .map(|p| p.name)
                .collect();
            assert_eq!(required, vec!["indicator_id", "field_id"]);
        }
    }

    #[test]
    fn test_relation_outcome() {
        assert_eq!(relation_outcome(Ok(true)).unwrap(), json!({"message": "success"}));
        assert_eq!(
            relation_outcome(Ok(false)).unwrap(),
            json!({"message": "unsuccessful"})
        );
        assert_eq!(
            relation_outcome(Err(ConnectorError::RequestFailed("x".into()))).unwrap(),
            json!({"message": "unsuccessful"})
        );
        assert!(relation_outcome(Err(ConnectorError::AuthenticationFailed("x".into()))).is_err());
    }

    #[test]
    fn test_indicator_kind_error() {
        assert_eq!(indicator_kind("IPv6").unwrap(), IndicatorKind::Ipv6);
        assert!(matches!(
            indicator_kind("mutex"),
            Err(ConnectorError::InvalidRequest(_))
        ));
    }
}
