//! variables generation
//!
//! transforms one operation's variable definitions into member
//! declarations plus the named enum / input-object declarations they
//! pull in. referenced global types are rendered through an
//! insertion-ordered registry; an entry goes in as pending before its
//! fields are walked, so self-referential input types terminate and
//! render once.

use crate::declaration::DeclarationBlock;
use crate::introspection::IntrospectionInputValue;
use crate::scalars::ScalarMap;
use crate::schema::{Schema, SchemaType, TypeBody};
use crate::typeinfo::TypeInfo;
use graphql_parser::query::VariableDefinition;

/// output of one variable transform
#[derive(Debug, Clone, Default)]
pub struct VariablesOutput {
    /// newly registered global declarations, joined; may repeat across
    /// variables, the orchestrator dedupes identical chunks
    pub export_type: String,
    /// the variable's own member declaration
    pub content_type: String,
}

#[derive(Debug)]
enum RegistryStatus {
    /// inserted before walking the type's own fields; short-circuits
    /// re-entry on self-referential inputs
    Pending,
    Success(String),
}

/// insertion-ordered name -> rendered-declaration registry, scoped to
/// one generator
#[derive(Debug, Default)]
struct TypeRegistry {
    entries: Vec<(String, RegistryStatus)>,
}

impl TypeRegistry {
    fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(entry, _)| entry == name)
    }

    fn set_pending(&mut self, name: &str) {
        self.entries
            .push((name.to_string(), RegistryStatus::Pending));
    }

    fn set_success(&mut self, name: &str, rendered: String) {
        match self.entries.iter_mut().find(|(entry, _)| entry == name) {
            Some((_, status)) => *status = RegistryStatus::Success(rendered),
            None => self
                .entries
                .push((name.to_string(), RegistryStatus::Success(rendered))),
        }
    }

    /// join every rendered declaration in insertion order, then clear
    fn drain(&mut self) -> String {
        let rendered: Vec<&str> = self
            .entries
            .iter()
            .filter_map(|(_, status)| match status {
                RegistryStatus::Success(text) => Some(text.as_str()),
                RegistryStatus::Pending => None,
            })
            .collect();
        let joined = rendered.join("\n\n");
        self.entries.clear();
        joined
    }
}

/// builds variable declarations for one operation
pub struct VariablesGenerator<'a> {
    schema: &'a Schema,
    scalars: &'a ScalarMap,
    registry: TypeRegistry,
}

impl<'a> VariablesGenerator<'a> {
    pub fn new(schema: &'a Schema, scalars: &'a ScalarMap) -> Self {
        Self {
            schema,
            scalars,
            registry: TypeRegistry::default(),
        }
    }

    /// transform one variable definition. the registry is drained into
    /// `export_type` afterwards, so every call reports the global types
    /// it newly pulled in.
    pub fn transform(&mut self, variable: &VariableDefinition<String>) -> VariablesOutput {
        let info = TypeInfo::of_node(&variable.var_type);
        let Some(variable_type) = self.schema.get_type(&info.base) else {
            tracing::debug!(variable = %variable.name, base = %info.base, "variable type missing from schema, skipped");
            return VariablesOutput::default();
        };

        let list_suffix = if info.is_list { "[]" } else { "" };
        let content = self.build_type(variable_type);

        let mut block = DeclarationBlock::new()
            .with_name(&variable.name)
            .with_required(info.is_non_null)
            .with_content(format!("{content}{list_suffix}"));
        if !variable_type.is_scalar() {
            block = block.with_comment(variable_type.description.clone().unwrap_or_default());
        }

        VariablesOutput {
            export_type: self.registry.drain(),
            content_type: block.render(),
        }
    }

    /// resolve a named schema type into the member content expression,
    /// registering enum / input-object declarations on first sight
    fn build_type(&mut self, ty: &SchemaType) -> String {
        match &ty.body {
            TypeBody::Scalar => self.scalars.resolve(&ty.name).to_string(),
            TypeBody::Enum { values } => {
                if !self.registry.contains(&ty.name) {
                    let members: Vec<String> = values
                        .iter()
                        .map(|value| {
                            DeclarationBlock::new()
                                .with_name(&value.name)
                                .with_content(enum_member_literal(&value.name))
                                .with_comment(value.description.clone().unwrap_or_default())
                                .with_combination("=")
                                .with_terminator(",")
                                .render()
                        })
                        .collect();

                    let mut block = DeclarationBlock::new()
                        .with_name(format!("export enum {}", ty.name))
                        .with_combination("")
                        .with_content(format!("{{\n{}\n}}", members.join("\n")));
                    if let Some(description) = &ty.description {
                        block = block.with_comment(description.clone());
                    }
                    self.registry.set_success(&ty.name, block.render());
                }
                ty.name.clone()
            }
            TypeBody::InputObject { fields } => {
                if !self.registry.contains(&ty.name) {
                    self.registry.set_pending(&ty.name);
                    let body = self.render_input_fields(fields);
                    let mut block = DeclarationBlock::new()
                        .with_name(format!("export type {}", ty.name))
                        .with_combination("=")
                        .with_content(body);
                    if let Some(description) = &ty.description {
                        block = block.with_comment(description.clone());
                    }
                    self.registry.set_success(&ty.name, block.render());
                }
                ty.name.clone()
            }
            // object/interface/union kinds are not input positions
            _ => String::new(),
        }
    }

    fn render_input_fields(&mut self, fields: &[IntrospectionInputValue]) -> String {
        let schema = self.schema;
        let mut members = Vec::new();

        for field in fields {
            let Some(info) = TypeInfo::of_ref(&field.ty) else {
                continue;
            };
            let content = match schema.get_type(&info.base) {
                Some(field_type) => self.build_type(field_type),
                None => String::new(),
            };
            let list_suffix = if info.is_list { "[]" } else { "" };

            let block = DeclarationBlock::new()
                .with_name(&field.name)
                .with_required(info.is_non_null)
                .with_content(format!("{content}{list_suffix}"))
                .with_comment(field.description.clone().unwrap_or_default());
            members.push(block.render());
        }

        format!("{{\n{}\n}}", members.join("\n"))
    }
}

/// numeric enum values stay bare, everything else is quoted
fn enum_member_literal(value: &str) -> String {
    if value.parse::<f64>().is_ok() {
        value.to_string()
    } else {
        format!("\"{value}\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenConfig;
    use crate::introspection::{IntrospectionEnumValue, IntrospectionType, TypeKind, TypeRef};
    use crate::schema::testutil::{object, scalar, wire_schema};
    use graphql_parser::query::{Definition, OperationDefinition, VariableDefinition};

    fn enum_type(name: &str, values: &[&str]) -> IntrospectionType {
        IntrospectionType {
            kind: TypeKind::Enum,
            name: Some(name.to_string()),
            description: None,
            fields: None,
            input_fields: None,
            interfaces: None,
            enum_values: Some(
                values
                    .iter()
                    .map(|value| IntrospectionEnumValue {
                        name: value.to_string(),
                        description: None,
                        is_deprecated: false,
                        deprecation_reason: None,
                    })
                    .collect(),
            ),
            possible_types: None,
        }
    }

    fn input_type(name: &str, fields: Vec<(&str, TypeRef)>) -> IntrospectionType {
        IntrospectionType {
            kind: TypeKind::InputObject,
            name: Some(name.to_string()),
            description: None,
            fields: None,
            input_fields: Some(
                fields
                    .into_iter()
                    .map(|(field, ty)| IntrospectionInputValue {
                        name: field.to_string(),
                        description: None,
                        ty,
                        default_value: None,
                    })
                    .collect(),
            ),
            interfaces: None,
            enum_values: None,
            possible_types: None,
        }
    }

    fn test_schema(extra: Vec<IntrospectionType>) -> Schema {
        let mut types = vec![
            scalar("String"),
            scalar("Int"),
            object(
                "Query",
                vec![crate::schema::testutil::field(
                    "hello",
                    TypeRef::named(TypeKind::Scalar, "String"),
                )],
            ),
        ];
        types.extend(extra);
        Schema::build(wire_schema(types)).unwrap()
    }

    fn variable_definitions(source: &'static str) -> Vec<VariableDefinition<'static, String>> {
        let doc = graphql_parser::parse_query::<String>(source).unwrap();
        doc.definitions
            .into_iter()
            .find_map(|def| match def {
                Definition::Operation(OperationDefinition::Query(query)) => {
                    Some(query.variable_definitions)
                }
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_scalar_variable() {
        let schema = test_schema(vec![]);
        let scalars = ScalarMap::new(&GenConfig::new());
        let mut generator = VariablesGenerator::new(&schema, &scalars);

        let vars = variable_definitions("query Q($id: Int!, $tags: [String]) { hello }");
        let out = generator.transform(&vars[0]);
        assert_eq!(out.content_type, "id : number;");
        assert!(out.export_type.is_empty());

        let out = generator.transform(&vars[1]);
        assert_eq!(out.content_type, "tags ?: string[];");
    }

    #[test]
    fn test_enum_variable_registers_named_enum_once() {
        let schema = test_schema(vec![enum_type("Color", &["RED", "GREEN"])]);
        let scalars = ScalarMap::new(&GenConfig::new());
        let mut generator = VariablesGenerator::new(&schema, &scalars);

        let vars = variable_definitions("query Q($a: Color!, $b: Color) { hello }");
        let first = generator.transform(&vars[0]);
        assert_eq!(first.content_type, "a : Color;");
        assert!(first.export_type.contains("export enum Color"));
        assert!(first.export_type.contains("RED = \"RED\","));

        // a second variable of the same enum re-registers the same
        // chunk; the orchestrator dedupes identical text
        let second = generator.transform(&vars[1]);
        assert_eq!(second.export_type, first.export_type);
    }

    #[test]
    fn test_numeric_enum_values_stay_bare() {
        assert_eq!(enum_member_literal("42"), "42");
        assert_eq!(enum_member_literal("RED"), "\"RED\"");
    }

    #[test]
    fn test_input_object_variable() {
        let schema = test_schema(vec![input_type(
            "UserFilter",
            vec![
                (
                    "name",
                    TypeRef::non_null(TypeRef::named(TypeKind::Scalar, "String")),
                ),
                ("age", TypeRef::named(TypeKind::Scalar, "Int")),
            ],
        )]);
        let scalars = ScalarMap::new(&GenConfig::new());
        let mut generator = VariablesGenerator::new(&schema, &scalars);

        let vars = variable_definitions("query Q($filter: UserFilter!) { hello }");
        let out = generator.transform(&vars[0]);
        assert_eq!(out.content_type, "filter : UserFilter;");
        assert!(out.export_type.contains("export type UserFilter ="));
        assert!(out.export_type.contains("name : string;"));
        assert!(out.export_type.contains("age ?: number;"));
    }

    #[test]
    fn test_self_referential_input_terminates_and_renders_once() {
        let schema = test_schema(vec![input_type(
            "TreeFilter",
            vec![
                ("label", TypeRef::named(TypeKind::Scalar, "String")),
                ("child", TypeRef::named(TypeKind::InputObject, "TreeFilter")),
            ],
        )]);
        let scalars = ScalarMap::new(&GenConfig::new());
        let mut generator = VariablesGenerator::new(&schema, &scalars);

        let vars = variable_definitions("query Q($filter: TreeFilter) { hello }");
        let out = generator.transform(&vars[0]);
        assert_eq!(out.export_type.matches("export type TreeFilter").count(), 1);
        assert!(out.export_type.contains("child ?: TreeFilter;"));
    }

    #[test]
    fn test_nested_input_registers_dependencies_in_insertion_order() {
        let schema = test_schema(vec![
            input_type(
                "Outer",
                vec![("mode", TypeRef::named(TypeKind::Enum, "Mode"))],
            ),
            enum_type("Mode", &["ON", "OFF"]),
        ]);
        let scalars = ScalarMap::new(&GenConfig::new());
        let mut generator = VariablesGenerator::new(&schema, &scalars);

        let vars = variable_definitions("query Q($input: Outer!) { hello }");
        let out = generator.transform(&vars[0]);
        let outer_at = out.export_type.find("export type Outer").unwrap();
        let mode_at = out.export_type.find("export enum Mode").unwrap();
        assert!(outer_at < mode_at);
    }

    #[test]
    fn test_unknown_variable_type_is_skipped() {
        let schema = test_schema(vec![]);
        let scalars = ScalarMap::new(&GenConfig::new());
        let mut generator = VariablesGenerator::new(&schema, &scalars);

        let vars = variable_definitions("query Q($x: Mystery) { hello }");
        let out = generator.transform(&vars[0]);
        assert!(out.content_type.is_empty());
        assert!(out.export_type.is_empty());
    }
}
