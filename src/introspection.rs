//! introspection wire format
//!
//! serde types for the json payload returned by the standard
//! introspection query, plus the query text itself. these mirror the
//! `__schema` response shape; the composed [`crate::Schema`] is built
//! from them after merging.

use serde::{Deserialize, Serialize};

/// the standard introspection query sent to every endpoint
pub const INTROSPECTION_QUERY: &str = r#"
query IntrospectionQuery {
  __schema {
    description
    queryType { name kind }
    mutationType { name kind }
    subscriptionType { name kind }
    types {
      ...FullType
    }
    directives {
      name
      description
      locations
      args {
        ...InputValue
      }
    }
  }
}

fragment FullType on __Type {
  kind
  name
  description
  fields(includeDeprecated: true) {
    name
    description
    args {
      ...InputValue
    }
    type {
      ...TypeRef
    }
    isDeprecated
    deprecationReason
  }
  inputFields {
    ...InputValue
  }
  interfaces {
    ...TypeRef
  }
  enumValues(includeDeprecated: true) {
    name
    description
    isDeprecated
    deprecationReason
  }
  possibleTypes {
    ...TypeRef
  }
}

fragment InputValue on __InputValue {
  name
  description
  type { ...TypeRef }
  defaultValue
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType {
                kind
                name
              }
            }
          }
        }
      }
    }
  }
}
"#;

/// operation name carried alongside [`INTROSPECTION_QUERY`]
pub const INTROSPECTION_OPERATION_NAME: &str = "IntrospectionQuery";

/// top-level response body: `{ "data": { "__schema": ... } }`
#[derive(Debug, Clone, Deserialize)]
pub struct IntrospectionResponse {
    pub data: Option<IntrospectionData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntrospectionData {
    #[serde(rename = "__schema")]
    pub schema: Option<IntrospectionSchema>,
}

/// one endpoint's raw `__schema` payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionSchema {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub query_type: Option<RootTypeRef>,
    #[serde(default)]
    pub mutation_type: Option<RootTypeRef>,
    #[serde(default)]
    pub subscription_type: Option<RootTypeRef>,
    #[serde(default)]
    pub types: Vec<IntrospectionType>,
    #[serde(default)]
    pub directives: Vec<IntrospectionDirective>,
}

/// root operation pointer, e.g. `queryType: { name: "Query" }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootTypeRef {
    pub name: String,
}

/// introspected type kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

/// one entry of the `types` list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionType {
    pub kind: TypeKind,
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Option<Vec<IntrospectionField>>,
    #[serde(default)]
    pub input_fields: Option<Vec<IntrospectionInputValue>>,
    #[serde(default)]
    pub interfaces: Option<Vec<TypeRef>>,
    #[serde(default)]
    pub enum_values: Option<Vec<IntrospectionEnumValue>>,
    #[serde(default)]
    pub possible_types: Option<Vec<TypeRef>>,
}

/// field of an object or interface type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionField {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub args: Vec<IntrospectionInputValue>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

/// argument or input-object field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionInputValue {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub default_value: Option<String>,
}

/// enum member
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionEnumValue {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub deprecation_reason: Option<String>,
}

/// possibly-wrapped type reference (`ofType` chain)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    pub kind: TypeKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub of_type: Option<Box<TypeRef>>,
}

impl TypeRef {
    /// named leaf constructor, mostly for tests
    pub fn named(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: Some(name.into()),
            of_type: None,
        }
    }

    /// wrap in a NON_NULL reference
    pub fn non_null(inner: TypeRef) -> Self {
        Self {
            kind: TypeKind::NonNull,
            name: None,
            of_type: Some(Box::new(inner)),
        }
    }

    /// wrap in a LIST reference
    pub fn list(inner: TypeRef) -> Self {
        Self {
            kind: TypeKind::List,
            name: None,
            of_type: Some(Box::new(inner)),
        }
    }
}

/// directive entry; carried through the merge, otherwise unused
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionDirective {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub args: Vec<IntrospectionInputValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_schema_payload() {
        let body = r#"{
            "data": {
                "__schema": {
                    "queryType": { "name": "Query" },
                    "mutationType": null,
                    "subscriptionType": null,
                    "types": [
                        {
                            "kind": "OBJECT",
                            "name": "Query",
                            "fields": [
                                {
                                    "name": "hello",
                                    "args": [],
                                    "type": { "kind": "SCALAR", "name": "String" },
                                    "isDeprecated": false
                                }
                            ]
                        }
                    ],
                    "directives": []
                }
            }
        }"#;

        let parsed: IntrospectionResponse = serde_json::from_str(body).unwrap();
        let schema = parsed.data.unwrap().schema.unwrap();
        assert_eq!(schema.query_type.unwrap().name, "Query");
        assert_eq!(schema.types.len(), 1);
        let query = &schema.types[0];
        assert_eq!(query.kind, TypeKind::Object);
        let fields = query.fields.as_ref().unwrap();
        assert_eq!(fields[0].name, "hello");
        assert_eq!(fields[0].ty.kind, TypeKind::Scalar);
    }

    #[test]
    fn test_parse_wrapped_type_ref() {
        let body = r#"{
            "kind": "NON_NULL",
            "name": null,
            "ofType": {
                "kind": "LIST",
                "name": null,
                "ofType": { "kind": "SCALAR", "name": "Int" }
            }
        }"#;
        let parsed: TypeRef = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.kind, TypeKind::NonNull);
        let list = parsed.of_type.unwrap();
        assert_eq!(list.kind, TypeKind::List);
        assert_eq!(list.of_type.unwrap().name.as_deref(), Some("Int"));
    }

    #[test]
    fn test_query_text_requests_the_full_type_fragment() {
        assert!(INTROSPECTION_QUERY.contains("...FullType"));
        assert!(INTROSPECTION_QUERY.contains("inputFields"));
        assert!(INTROSPECTION_QUERY.contains("enumValues(includeDeprecated: true)"));
    }
}
