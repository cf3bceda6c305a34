//! selection-set generation
//!
//! transforms a parsed selection set against the composed schema into
//! one nested structural declaration. fragment spreads are expanded at
//! the spread point (an undefined spread contributes nothing); a field
//! missing from its parent type, or an object-typed field without a
//! sub-selection, fails the whole transform.

use crate::declaration::DeclarationBlock;
use crate::error::{Error, Result};
use crate::introspection::{IntrospectionEnumValue, IntrospectionField};
use crate::scalars::ScalarMap;
use crate::schema::{Schema, SchemaType, TypeBody};
use crate::typeinfo::TypeInfo;
use graphql_parser::query::{Field, FragmentDefinition, Selection, SelectionSet};

/// builds result-shape declarations for selection sets
pub struct SelectionSetGenerator<'a, 'doc> {
    schema: &'a Schema,
    scalars: &'a ScalarMap,
    fragments: &'a [FragmentDefinition<'doc, String>],
}

impl<'a, 'doc> SelectionSetGenerator<'a, 'doc> {
    pub fn new(
        schema: &'a Schema,
        scalars: &'a ScalarMap,
        fragments: &'a [FragmentDefinition<'doc, String>],
    ) -> Self {
        Self {
            schema,
            scalars,
            fragments,
        }
    }

    /// transform a selection set into an object literal declaration.
    ///
    /// without a parent type the selection is an operation root and
    /// each field resolves against the query root first, then the
    /// mutation root.
    pub fn transform(
        &self,
        set: &SelectionSet<'doc, String>,
        parent: Option<&SchemaType>,
    ) -> Result<String> {
        let members = self.transform_selection_set(set, parent)?;
        Ok(format!("{{{}}}", members.join("")))
    }

    fn transform_selection_set(
        &self,
        set: &SelectionSet<'doc, String>,
        parent: Option<&SchemaType>,
    ) -> Result<Vec<String>> {
        let mut members = Vec::new();

        for selection in &set.items {
            match selection {
                Selection::Field(field) => {
                    let schema_field = match parent {
                        None => self.schema.operation_field(&field.name).ok_or_else(|| {
                            Error::UnknownRootField {
                                field: field.name.clone(),
                            }
                        })?,
                        Some(parent_type) => {
                            parent_type
                                .field(&field.name)
                                .ok_or_else(|| Error::UnknownField {
                                    field: field.name.clone(),
                                    parent: parent_type.name.clone(),
                                })?
                        }
                    };
                    members.push(format!("\n{}", self.transform_field(field, schema_field)?));
                }
                Selection::FragmentSpread(spread) => {
                    let fragment = self
                        .fragments
                        .iter()
                        .find(|fragment| fragment.name == spread.fragment_name);
                    match fragment {
                        Some(fragment) => members.extend(
                            self.transform_selection_set(&fragment.selection_set, parent)?,
                        ),
                        // undefined spreads contribute zero fields
                        None => {
                            tracing::debug!(fragment = %spread.fragment_name, "undefined fragment spread ignored")
                        }
                    }
                }
                Selection::InlineFragment(_) => {}
            }
        }

        Ok(members)
    }

    fn transform_field(
        &self,
        field: &Field<'doc, String>,
        schema_field: &IntrospectionField,
    ) -> Result<String> {
        let info = TypeInfo::of_ref(&schema_field.ty).ok_or_else(|| {
            Error::Parse(format!(
                "field {} carries a malformed type reference",
                field.name
            ))
        })?;
        let list_suffix = if info.is_list { "[]" } else { "" };
        let base_type = self.schema.get_type(&info.base);

        let name = field.alias.clone().unwrap_or_else(|| field.name.clone());
        let mut block = DeclarationBlock::new()
            .with_name(name)
            .with_required(info.is_non_null);

        block = match base_type.map(|ty| &ty.body) {
            Some(TypeBody::Scalar) => block.with_content(format!(
                "{}{list_suffix}",
                self.scalars.resolve(&info.base)
            )),
            Some(TypeBody::Enum { values }) => {
                block.with_content(format!("{}{list_suffix}", enum_union(values)))
            }
            Some(TypeBody::Object { .. }) | Some(TypeBody::Interface { .. }) => {
                if field.selection_set.items.is_empty() {
                    return Err(Error::MissingSelection {
                        field: field.name.clone(),
                    });
                }
                let nested = self.transform(&field.selection_set, base_type)?;
                block.with_content(format!("{nested}{list_suffix}"))
            }
            // unions and unresolved names fall back to the default
            Some(TypeBody::Union { .. }) | Some(TypeBody::InputObject { .. }) | None => {
                block.with_content(format!("{}{list_suffix}", self.scalars.default_type()))
            }
        };

        let description = schema_field
            .description
            .clone()
            .or_else(|| base_type.and_then(|ty| ty.description.clone()));
        if let Some(description) = description {
            let comment = match field.alias {
                Some(_) => format!("alias of {}; {description}", field.name),
                None => description,
            };
            block = block.with_comment(comment);
        }

        Ok(block.render())
    }
}

/// quoted string-literal union over an enum's values
fn enum_union(values: &[IntrospectionEnumValue]) -> String {
    values
        .iter()
        .map(|value| format!("\"{}\"", value.name))
        .collect::<Vec<_>>()
        .join("|")
}
