//! composed schema
//!
//! a merged, immutable view over one or more introspection payloads.
//! types are stored as explicit kind variants; callers that need a
//! field map must go through [`SchemaType::field_map`], which only
//! answers for object and interface kinds.

use crate::error::{Error, Result};
use crate::introspection::{
    IntrospectionDirective, IntrospectionEnumValue, IntrospectionField, IntrospectionInputValue,
    IntrospectionSchema, TypeKind,
};
use std::collections::BTreeMap;

/// composed schema built from merged introspection lists
#[derive(Debug, Clone)]
pub struct Schema {
    description: Option<String>,
    query_type: String,
    mutation_type: Option<String>,
    subscription_type: Option<String>,
    types: BTreeMap<String, SchemaType>,
    directives: Vec<IntrospectionDirective>,
}

/// one named type of the composed schema
#[derive(Debug, Clone)]
pub struct SchemaType {
    pub name: String,
    pub description: Option<String>,
    pub body: TypeBody,
}

/// kind-specific payload of a schema type
#[derive(Debug, Clone)]
pub enum TypeBody {
    Scalar,
    Object { fields: Vec<IntrospectionField> },
    Interface { fields: Vec<IntrospectionField> },
    Union { possible_types: Vec<String> },
    Enum { values: Vec<IntrospectionEnumValue> },
    InputObject { fields: Vec<IntrospectionInputValue> },
}

impl SchemaType {
    /// field map, present only for object and interface kinds
    pub fn field_map(&self) -> Option<&[IntrospectionField]> {
        match &self.body {
            TypeBody::Object { fields } | TypeBody::Interface { fields } => Some(fields),
            _ => None,
        }
    }

    /// look up one field by name on an object or interface type
    pub fn field(&self, name: &str) -> Option<&IntrospectionField> {
        self.field_map()?.iter().find(|f| f.name == name)
    }

    /// input fields, present only for input-object kinds
    pub fn input_fields(&self) -> Option<&[IntrospectionInputValue]> {
        match &self.body {
            TypeBody::InputObject { fields } => Some(fields),
            _ => None,
        }
    }

    /// enum members, present only for enum kinds
    pub fn enum_values(&self) -> Option<&[IntrospectionEnumValue]> {
        match &self.body {
            TypeBody::Enum { values } => Some(values),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.body, TypeBody::Scalar)
    }

    pub fn is_object(&self) -> bool {
        matches!(self.body, TypeBody::Object { .. })
    }
}

impl Schema {
    /// rebuild a schema from a (possibly merged) introspection payload.
    ///
    /// runs in "assume valid" mode: only structural properties are
    /// checked (every type named, no duplicate names, a query root that
    /// exists and is an object type). cross-references between types
    /// are not validated.
    pub fn build(wire: IntrospectionSchema) -> Result<Self> {
        let query_type = wire
            .query_type
            .as_ref()
            .map(|root| root.name.clone())
            .ok_or_else(|| Error::Merge("schema does not declare a query root".to_string()))?;

        let mut types = BTreeMap::new();
        for ty in wire.types {
            let name = ty
                .name
                .clone()
                .ok_or_else(|| Error::Merge("unnamed type in introspection result".to_string()))?;

            let body = match ty.kind {
                TypeKind::Scalar => TypeBody::Scalar,
                TypeKind::Object => TypeBody::Object {
                    fields: ty.fields.unwrap_or_default(),
                },
                TypeKind::Interface => TypeBody::Interface {
                    fields: ty.fields.unwrap_or_default(),
                },
                TypeKind::Union => TypeBody::Union {
                    possible_types: ty
                        .possible_types
                        .unwrap_or_default()
                        .into_iter()
                        .filter_map(|t| t.name)
                        .collect(),
                },
                TypeKind::Enum => TypeBody::Enum {
                    values: ty.enum_values.unwrap_or_default(),
                },
                TypeKind::InputObject => TypeBody::InputObject {
                    fields: ty.input_fields.unwrap_or_default(),
                },
                TypeKind::List | TypeKind::NonNull => {
                    return Err(Error::Merge(format!(
                        "wrapper kind in named type position: {name}"
                    )))
                }
            };

            let entry = SchemaType {
                name: name.clone(),
                description: ty.description,
                body,
            };
            if types.insert(name.clone(), entry).is_some() {
                return Err(Error::Merge(format!("duplicate type name: {name}")));
            }
        }

        match types.get(&query_type) {
            Some(root) if root.is_object() => {}
            Some(_) => {
                return Err(Error::Merge(format!(
                    "query root {query_type} is not an object type"
                )))
            }
            None => {
                return Err(Error::Merge(format!(
                    "query root {query_type} is missing from the type list"
                )))
            }
        }

        Ok(Self {
            description: wire.description,
            query_type,
            mutation_type: wire.mutation_type.map(|root| root.name),
            subscription_type: wire.subscription_type.map(|root| root.name),
            types,
            directives: wire.directives,
        })
    }

    /// schema description if any endpoint supplied one
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// look up a named type
    pub fn get_type(&self, name: &str) -> Option<&SchemaType> {
        self.types.get(name)
    }

    /// all named types, in name order
    pub fn types(&self) -> impl Iterator<Item = &SchemaType> {
        self.types.values()
    }

    /// directive entries carried through the merge
    pub fn directives(&self) -> &[IntrospectionDirective] {
        &self.directives
    }

    pub fn query_type_name(&self) -> &str {
        &self.query_type
    }

    pub fn mutation_type_name(&self) -> Option<&str> {
        self.mutation_type.as_deref()
    }

    pub fn subscription_type_name(&self) -> Option<&str> {
        self.subscription_type.as_deref()
    }

    /// field map of the query root
    pub fn query_fields(&self) -> Option<&[IntrospectionField]> {
        self.types.get(&self.query_type)?.field_map()
    }

    /// field map of the mutation root
    pub fn mutation_fields(&self) -> Option<&[IntrospectionField]> {
        self.types.get(self.mutation_type.as_deref()?)?.field_map()
    }

    /// field map of the subscription root, for listing only
    pub fn subscription_fields(&self) -> Option<&[IntrospectionField]> {
        self.types
            .get(self.subscription_type.as_deref()?)?
            .field_map()
    }

    /// look up a query root field by name
    pub fn query_field(&self, name: &str) -> Option<&IntrospectionField> {
        self.query_fields()?.iter().find(|f| f.name == name)
    }

    /// look up a mutation root field by name
    pub fn mutation_field(&self, name: &str) -> Option<&IntrospectionField> {
        self.mutation_fields()?.iter().find(|f| f.name == name)
    }

    /// look up a root field across operations; queries are checked
    /// first, so a name declared by both roots resolves to the query
    pub fn operation_field(&self, name: &str) -> Option<&IntrospectionField> {
        self.query_field(name).or_else(|| self.mutation_field(name))
    }
}


#[cfg(test)]
mod tests {
    use super::testutil::*;
    use super::*;
    use crate::introspection::TypeRef;

    #[test]
    fn test_build_and_root_lookup() {
        let schema = Schema::build(wire_schema(vec![
            scalar("String"),
            object(
                "Query",
                vec![field("hello", TypeRef::named(TypeKind::Scalar, "String"))],
            ),
            object(
                "Mutation",
                vec![field("rename", TypeRef::named(TypeKind::Scalar, "String"))],
            ),
        ]))
        .unwrap();

        assert!(schema.query_field("hello").is_some());
        assert!(schema.mutation_field("rename").is_some());
        assert!(schema.operation_field("rename").is_some());
        assert!(schema.operation_field("nope").is_none());
    }

    #[test]
    fn test_operation_field_prefers_query() {
        let schema = Schema::build(wire_schema(vec![
            scalar("String"),
            scalar("Int"),
            object(
                "Query",
                vec![field("thing", TypeRef::named(TypeKind::Scalar, "String"))],
            ),
            object(
                "Mutation",
                vec![field("thing", TypeRef::named(TypeKind::Scalar, "Int"))],
            ),
        ]))
        .unwrap();

        let resolved = schema.operation_field("thing").unwrap();
        assert_eq!(resolved.ty.name.as_deref(), Some("String"));
    }

    #[test]
    fn test_field_map_only_for_object_kinds() {
        let schema = Schema::build(wire_schema(vec![
            scalar("String"),
            object(
                "Query",
                vec![field("hello", TypeRef::named(TypeKind::Scalar, "String"))],
            ),
        ]))
        .unwrap();

        assert!(schema.get_type("Query").unwrap().field_map().is_some());
        assert!(schema.get_type("String").unwrap().field_map().is_none());
    }

    #[test]
    fn test_build_rejects_missing_query_root() {
        let mut wire = wire_schema(vec![scalar("String")]);
        wire.query_type = None;
        assert!(matches!(Schema::build(wire), Err(Error::Merge(_))));

        // declared but absent from the type list
        let wire = wire_schema(vec![scalar("String")]);
        assert!(matches!(Schema::build(wire), Err(Error::Merge(_))));
    }

    #[test]
    fn test_build_rejects_duplicate_type_names() {
        let wire = wire_schema(vec![
            scalar("String"),
            scalar("String"),
            object("Query", vec![]),
        ]);
        assert!(matches!(Schema::build(wire), Err(Error::Merge(_))));
    }
}
