//! GraphQL documents sent to the platform.

pub const ORGANIZATION_ADD: &str = r#"
mutation OrganizationAdd($input: OrganizationAddInput!) {
  organizationAdd(input: $input) {
    id
    standard_id
    entity_type
    parent_types
    name
    description
    x_opencti_reliability
    created_at
    updated_at
  }
}
"#;

pub const IDENTITIES: &str = r#"
query Identities($types: [String], $filters: FilterGroup, $first: Int, $after: ID) {
  identities(types: $types, filters: $filters, first: $first, after: $after) {
    edges {
      node {
        id
        standard_id
        entity_type
        parent_types
        name
        description
        created_at
        updated_at
        ... on Organization {
          x_opencti_organization_type
          x_opencti_reliability
        }
      }
    }
    pageInfo { startCursor endCursor hasNextPage hasPreviousPage globalCount }
  }
}
"#;

pub const LABEL_ADD: &str = r#"
mutation LabelAdd($input: LabelAddInput!) {
  labelAdd(input: $input) {
    id
    standard_id
    value
    color
    created_at
    updated_at
  }
}
"#;

pub const LABELS: &str = r#"
query Labels($filters: FilterGroup, $first: Int, $after: ID) {
  labels(filters: $filters, first: $first, after: $after) {
    edges {
      node {
        id
        standard_id
        value
        color
        created_at
        updated_at
      }
    }
    pageInfo { startCursor endCursor hasNextPage hasPreviousPage globalCount }
  }
}
"#;

pub const EXTERNAL_REFERENCE_ADD: &str = r#"
mutation ExternalReferenceAdd($input: ExternalReferenceAddInput!) {
  externalReferenceAdd(input: $input) {
    id
    standard_id
    entity_type
    source_name
    description
    url
    external_id
    created
    modified
  }
}
"#;

pub const EXTERNAL_REFERENCES: &str = r#"
query ExternalReferences($filters: FilterGroup, $first: Int, $after: ID) {
  externalReferences(filters: $filters, first: $first, after: $after) {
    edges {
      node {
        id
        standard_id
        entity_type
        source_name
        description
        url
        hash
        external_id
        created
        modified
      }
    }
    pageInfo { startCursor endCursor hasNextPage hasPreviousPage globalCount }
  }
}
"#;

pub const MARKING_DEFINITIONS: &str = r#"
query MarkingDefinitions($filters: FilterGroup, $first: Int, $after: ID) {
  markingDefinitions(filters: $filters, first: $first, after: $after) {
    edges {
      node {
        id
        standard_id
        entity_type
        definition_type
        definition
        x_opencti_order
        x_opencti_color
        created
        modified
      }
    }
    pageInfo { startCursor endCursor hasNextPage hasPreviousPage globalCount }
  }
}
"#;

/// Selection set returned by `stixCyberObservableAdd`.
pub const OBSERVABLE_FIELDS: &str = r#"
    id
    standard_id
    entity_type
    parent_types
    observable_value
    x_opencti_score
    x_opencti_description
    created_at
    updated_at
    createdBy { id name entity_type }
    objectMarking { id definition_type definition }
    objectLabel { id value color }
"#;

pub const STIX_CYBER_OBSERVABLES: &str = r#"
query StixCyberObservables($types: [String], $filters: FilterGroup, $first: Int, $after: ID) {
  stixCyberObservables(types: $types, filters: $filters, first: $first, after: $after) {
    edges {
      node {
        id
        standard_id
        entity_type
        parent_types
        observable_value
        x_opencti_score
        x_opencti_description
        created_at
        updated_at
        createdBy { id name entity_type }
        objectMarking { id definition_type definition }
        objectLabel { id value color }
      }
    }
    pageInfo { startCursor endCursor hasNextPage hasPreviousPage globalCount }
  }
}
"#;

pub const OBSERVABLE_DELETE: &str = r#"
mutation StixCyberObservableEdit($id: ID!) {
  stixCyberObservableEdit(id: $id) {
    delete
  }
}
"#;

pub const OBSERVABLE_FIELD_PATCH: &str = r#"
mutation StixCyberObservableEdit($id: ID!, $input: [EditInput]!) {
  stixCyberObservableEdit(id: $id) {
    fieldPatch(input: $input) {
      id
      standard_id
      entity_type
      observable_value
      x_opencti_score
      x_opencti_description
      updated_at
    }
  }
}
"#;

pub const OBSERVABLE_RELATION_ADD: &str = r#"
mutation StixCyberObservableEdit($id: ID!, $input: StixRefRelationshipAddInput!) {
  stixCyberObservableEdit(id: $id) {
    relationAdd(input: $input) {
      id
    }
  }
}
"#;

pub const OBSERVABLE_RELATION_DELETE: &str = r#"
mutation StixCyberObservableEdit($id: ID!, $toId: StixRef!, $relationship_type: String!) {
  stixCyberObservableEdit(id: $id) {
    relationDelete(toId: $toId, relationship_type: $relationship_type) {
      id
    }
  }
}
"#;
