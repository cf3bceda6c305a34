//! document generation
//!
//! [`Generator`] parses operation/fragment document texts and drives
//! the variables and selection-set generators against the composed
//! schema. output is assembled by an ordered list of generation
//! stages: the primary stage emits exported variable/result/fragment
//! types, the quick-import stage appends per-field `NonNullable<...>`
//! accessor types for fast previews. the concatenated text is handed
//! to an injected formatter; real formatting is an external concern.

use crate::config::GenConfig;
use crate::error::{Error, Result};
use crate::operation::OperationText;
use crate::scalars::ScalarMap;
use crate::schema::{Schema, SchemaType, TypeBody};
use crate::selection::SelectionSetGenerator;
use crate::typeinfo::TypeInfo;
use crate::variables::VariablesGenerator;
use crate::declaration::DeclarationBlock;
use crate::introspection::IntrospectionField;
use graphql_parser::query::{
    Definition, Document, Field, FragmentDefinition, OperationDefinition, Selection, SelectionSet,
    TypeCondition, VariableDefinition,
};

/// final output unit for one generated operation
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub name: String,
    /// exported operation constant (the ``gql` ` `` wrapper)
    pub operation_text: String,
    pub result_type_text: String,
    pub variables_type_text: String,
}

/// everything a generation stage may read
pub struct StageContext<'s, 'doc> {
    pub documents: &'s [Document<'doc, String>],
    pub fragments: &'s [FragmentDefinition<'doc, String>],
    pub schema: &'s Schema,
    pub scalars: &'s ScalarMap,
}

/// one stage's contribution to the output
#[derive(Debug, Clone, Default)]
pub struct StageOutput {
    pub header: Option<String>,
    pub content: Option<String>,
}

/// a pluggable generation stage
pub type StageFn = fn(&StageContext<'_, '_>) -> Result<StageOutput>;

/// external formatter seam. the default passthrough leaves the text
/// untouched
pub trait Formatter {
    fn format(&self, source: &str) -> Result<String>;
}

/// formatter that returns the text unchanged
pub struct PassthroughFormatter;

impl Formatter for PassthroughFormatter {
    fn format(&self, source: &str) -> Result<String> {
        Ok(source.to_string())
    }
}

/// orchestrates parsing and type generation for operation documents
pub struct Generator<'a> {
    schema: &'a Schema,
    config: GenConfig,
    stages: Vec<StageFn>,
    formatter: Option<Box<dyn Formatter>>,
}

impl<'a> Generator<'a> {
    pub fn new(schema: &'a Schema, config: GenConfig) -> Self {
        Self {
            schema,
            config,
            stages: vec![typescript_stage, quick_import_stage],
            formatter: None,
        }
    }

    /// replace the stage list for this generator
    pub fn with_stages(mut self, stages: Vec<StageFn>) -> Self {
        self.stages = stages;
        self
    }

    /// inject an external formatter applied to the assembled text
    pub fn with_formatter(mut self, formatter: Box<dyn Formatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// parse every document and run all stages over them.
    ///
    /// `extra_fragments` supplements the fragments discovered inside
    /// the documents themselves; supplied fragments are consulted
    /// first on name collisions.
    pub fn generate(&self, documents: &[String], extra_fragments: &[String]) -> Result<String> {
        let parsed = parse_documents(documents)?;
        let extra = parse_documents(extra_fragments)?;

        let mut fragments: Vec<FragmentDefinition<String>> = Vec::new();
        for doc in extra.iter().chain(parsed.iter()) {
            for def in &doc.definitions {
                if let Definition::Fragment(fragment) = def {
                    fragments.push(fragment.clone());
                }
            }
        }

        let scalars = ScalarMap::new(&self.config);
        let ctx = StageContext {
            documents: &parsed,
            fragments: &fragments,
            schema: self.schema,
            scalars: &scalars,
        };

        let mut headers = Vec::new();
        let mut contents = Vec::new();
        for stage in &self.stages {
            let output = stage(&ctx)?;
            if let Some(header) = output.header {
                headers.push(header);
            }
            if let Some(content) = output.content {
                contents.push(content);
            }
        }

        let assembled = format!("{}\n{}", headers.join("\n"), contents.join("\n"));
        match &self.formatter {
            Some(formatter) => formatter.format(&assembled),
            None => Ok(assembled),
        }
    }

    /// generate the typed output for one synthesized operation and
    /// bundle it into a [`GeneratedDocument`]
    pub fn generate_document(
        &self,
        operation: &OperationText,
        extra_fragments: &[String],
    ) -> Result<GeneratedDocument> {
        let documents = [operation.operation.clone()];
        let parsed = parse_documents(&documents)?;
        let extra = parse_documents(extra_fragments)?;

        let mut fragments: Vec<FragmentDefinition<String>> = Vec::new();
        for doc in extra.iter().chain(parsed.iter()) {
            for def in &doc.definitions {
                if let Definition::Fragment(fragment) = def {
                    fragments.push(fragment.clone());
                }
            }
        }

        let scalars = ScalarMap::new(&self.config);
        let ctx = StageContext {
            documents: &parsed,
            fragments: &fragments,
            schema: self.schema,
            scalars: &scalars,
        };

        let op = parsed
            .iter()
            .flat_map(|doc| doc.definitions.iter())
            .find_map(|def| match def {
                Definition::Operation(op) => Some(op),
                Definition::Fragment(_) => None,
            })
            .ok_or_else(|| Error::Parse("document contains no operation".to_string()))?;

        let pieces = operation_pieces(&ctx, op)?;
        let mut variables_parts = pieces.exports;
        if let Some(variables_type) = pieces.variables_type {
            variables_parts.push(variables_type);
        }

        Ok(GeneratedDocument {
            name: pieces.name,
            operation_text: operation.code.clone(),
            result_type_text: pieces.result_type,
            variables_type_text: variables_parts.join("\n"),
        })
    }
}

fn parse_documents(texts: &[String]) -> Result<Vec<Document<'_, String>>> {
    texts
        .iter()
        .map(|text| {
            graphql_parser::parse_query::<String>(text).map_err(|err| Error::Parse(err.to_string()))
        })
        .collect()
}

/// uppercase the first letter, leaving the rest untouched
fn upper_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

/// exported variables type name for an operation
pub fn variables_type_name(operation: &str) -> String {
    format!("T{}Variables", upper_first(operation))
}

/// exported result type name for an operation
pub fn result_type_name(operation: &str) -> String {
    format!("T{}Res", upper_first(operation))
}

/// exported type name for a fragment
pub fn fragment_type_name(fragment: &str) -> String {
    format!("T{}Fragment", upper_first(fragment))
}

struct OperationPieces {
    name: String,
    /// deduped global declaration chunks, first-seen order
    exports: Vec<String>,
    variables_type: Option<String>,
    result_type: String,
}

fn operation_parts<'s, 'doc>(
    op: &'s OperationDefinition<'doc, String>,
) -> (
    Option<&'s str>,
    &'s [VariableDefinition<'doc, String>],
    &'s SelectionSet<'doc, String>,
) {
    match op {
        OperationDefinition::Query(query) => (
            query.name.as_deref(),
            &query.variable_definitions,
            &query.selection_set,
        ),
        OperationDefinition::Mutation(mutation) => (
            mutation.name.as_deref(),
            &mutation.variable_definitions,
            &mutation.selection_set,
        ),
        OperationDefinition::Subscription(subscription) => (
            subscription.name.as_deref(),
            &subscription.variable_definitions,
            &subscription.selection_set,
        ),
        OperationDefinition::SelectionSet(set) => (None, &[], set),
    }
}

fn operation_pieces<'s, 'doc>(
    ctx: &StageContext<'s, 'doc>,
    op: &OperationDefinition<'doc, String>,
) -> Result<OperationPieces> {
    let (name, variable_definitions, selection_set) = operation_parts(op);
    let name = name.ok_or(Error::UnnamedOperation)?;

    let mut exports: Vec<String> = Vec::new();
    let mut members = Vec::new();
    let mut variables = VariablesGenerator::new(ctx.schema, ctx.scalars);
    for definition in variable_definitions {
        let output = variables.transform(definition);
        if !output.export_type.is_empty() && !exports.contains(&output.export_type) {
            exports.push(output.export_type);
        }
        if !output.content_type.is_empty() {
            members.push(output.content_type);
        }
    }

    let variables_type = (!members.is_empty()).then(|| {
        format!(
            "export type {} = {{{}}}",
            variables_type_name(name),
            members.join("\n")
        )
    });

    let selections = SelectionSetGenerator::new(ctx.schema, ctx.scalars, ctx.fragments);
    let result_body = selections.transform(selection_set, None)?;
    let result_type = format!("export type {} = {}", result_type_name(name), result_body);

    Ok(OperationPieces {
        name: name.to_string(),
        exports,
        variables_type,
        result_type,
    })
}

/// primary stage: exported fragment, variables, and result types
pub fn typescript_stage(ctx: &StageContext<'_, '_>) -> Result<StageOutput> {
    let mut parts = Vec::new();

    for doc in ctx.documents {
        for def in &doc.definitions {
            match def {
                Definition::Fragment(fragment) => {
                    parts.push(fragment_declaration(ctx, fragment)?);
                }
                Definition::Operation(op) => {
                    let pieces = operation_pieces(ctx, op)?;
                    let mut chunk = pieces.exports;
                    if let Some(variables_type) = pieces.variables_type {
                        chunk.push(variables_type);
                    }
                    chunk.push(pieces.result_type);
                    parts.push(chunk.join("\n"));
                }
            }
        }
    }

    Ok(StageOutput {
        header: None,
        content: Some(parts.join("\n")),
    })
}

fn fragment_declaration<'doc>(
    ctx: &StageContext<'_, 'doc>,
    fragment: &FragmentDefinition<'doc, String>,
) -> Result<String> {
    let TypeCondition::On(condition) = &fragment.type_condition;
    let ty = ctx
        .schema
        .get_type(condition)
        .ok_or_else(|| Error::UnknownFragmentType {
            name: condition.clone(),
        })?;
    if !ty.is_object() {
        return Err(Error::NotAnObjectType {
            name: condition.clone(),
        });
    }

    let selections = SelectionSetGenerator::new(ctx.schema, ctx.scalars, ctx.fragments);
    let body = selections.transform(&fragment.selection_set, Some(ty))?;
    Ok(format!(
        "export type {} = {body}",
        fragment_type_name(&fragment.name)
    ))
}

/// quick-import stage: per-field `NonNullable<...>` accessor types,
/// skipping variables and fragments-as-types. lenient by design — an
/// unresolvable field is skipped, not fatal; the primary stage has
/// already reported real lookup failures
pub fn quick_import_stage(ctx: &StageContext<'_, '_>) -> Result<StageOutput> {
    let mut content = String::new();

    for doc in ctx.documents {
        for def in &doc.definitions {
            let Definition::Operation(op) = def else {
                continue;
            };
            let (name, _, selection_set) = operation_parts(op);
            let name = name.ok_or(Error::UnnamedOperation)?;
            content.push_str(&quick_selections(
                ctx,
                &selection_set.items,
                &result_type_name(name),
                None,
            ));
        }
    }

    Ok(StageOutput {
        header: None,
        content: Some(content),
    })
}

fn quick_selections<'doc>(
    ctx: &StageContext<'_, 'doc>,
    selections: &[Selection<'doc, String>],
    parent_name: &str,
    parent: Option<&SchemaType>,
) -> String {
    let mut content = String::new();

    for field in flatten_fields(ctx.fragments, selections) {
        let schema_field = match parent {
            Some(parent_type) => parent_type.field(&field.name),
            None => ctx.schema.operation_field(&field.name),
        };
        if let Some(schema_field) = schema_field {
            content.push_str(&quick_field(ctx, field, parent_name, schema_field));
        }
    }

    content
}

fn quick_field<'doc>(
    ctx: &StageContext<'_, 'doc>,
    field: &Field<'doc, String>,
    parent_name: &str,
    schema_field: &IntrospectionField,
) -> String {
    let Some(info) = TypeInfo::of_ref(&schema_field.ty) else {
        return String::new();
    };
    let base_type = ctx.schema.get_type(&info.base);
    let Some(base_type) = base_type else {
        return String::new();
    };
    if base_type.is_scalar() {
        return String::new();
    }

    let display = field.alias.as_deref().unwrap_or(&field.name);
    let mut accessor_name = format!("{parent_name}{}", upper_first(display));
    let mut accessor_content = format!("NonNullable<{parent_name}['{display}']>");
    if info.is_list {
        accessor_name.push_str("Item");
        accessor_content = format!("NonNullable<{accessor_content}[number]>");
    }

    let mut block = DeclarationBlock::new()
        .with_combination("=")
        .with_name(format!("export type {accessor_name}"))
        .with_content(accessor_content);
    let description = schema_field
        .description
        .clone()
        .or_else(|| base_type.description.clone());
    if let Some(description) = description {
        block = block.with_comment(description);
    }

    let mut out = format!("\n{}", block.render());

    let recurses = matches!(
        base_type.body,
        TypeBody::Object { .. } | TypeBody::Interface { .. }
    );
    if recurses && !field.selection_set.items.is_empty() {
        out.push_str(&quick_selections(
            ctx,
            &field.selection_set.items,
            &accessor_name,
            Some(base_type),
        ));
    }

    out
}

/// fields of a selection list with fragment spreads expanded in place;
/// inline fragments and undefined spreads contribute nothing
fn flatten_fields<'x, 'doc>(
    fragments: &'x [FragmentDefinition<'doc, String>],
    selections: &'x [Selection<'doc, String>],
) -> Vec<&'x Field<'doc, String>> {
    let mut out = Vec::new();
    for selection in selections {
        match selection {
            Selection::Field(field) => out.push(field),
            Selection::FragmentSpread(spread) => {
                if let Some(fragment) = fragments
                    .iter()
                    .find(|fragment| fragment.name == spread.fragment_name)
                {
                    out.extend(flatten_fields(fragments, &fragment.selection_set.items));
                }
            }
            Selection::InlineFragment(_) => {}
        }
    }
    out
}
