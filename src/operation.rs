//! operation text synthesis
//!
//! the reverse direction of the generators: given a user-selected
//! field tree and argument list, build literal operation document
//! text. arguments with a supplied value inline directly into the
//! field call; the rest become named variables threaded through to
//! the call.

/// one argument of a root field call
#[derive(Debug, Clone, Default)]
pub struct OperationArg {
    pub name: String,
    /// literal value; inlined when present (quoted unless numeric)
    pub value: Option<String>,
    /// graphql type text, e.g. `String!` — used for `$name: Type`
    pub gql_type: Option<String>,
}

impl OperationArg {
    pub fn variable(name: impl Into<String>, gql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            gql_type: Some(gql_type.into()),
        }
    }

    pub fn literal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            gql_type: None,
        }
    }
}

/// one node of a selected field tree; `name` may carry the
/// `alias:field` form produced by the picker
#[derive(Debug, Clone)]
pub struct TreeItem {
    pub name: String,
    pub description: Option<String>,
    pub children: Option<Vec<TreeItem>>,
}

impl TreeItem {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            children: None,
        }
    }

    pub fn branch(name: impl Into<String>, children: Vec<TreeItem>) -> Self {
        Self {
            name: name.into(),
            description: None,
            children: Some(children),
        }
    }
}

/// one independently configured root field of a compound query
#[derive(Debug, Clone)]
pub struct FieldBlock {
    pub name: String,
    /// optional rename, emitted as `alias: field`
    pub alias: Option<String>,
    pub args: Vec<OperationArg>,
    pub fields: Vec<TreeItem>,
}

/// synthesized operation document
#[derive(Debug, Clone)]
pub struct OperationText {
    /// exported template constant wrapping the operation
    pub code: String,
    /// the bare operation document
    pub operation: String,
}

/// flatten a selection tree into graphql selection text
pub fn tree_to_selection_text(items: &[TreeItem]) -> String {
    let mut result = String::new();
    for item in items {
        result.push_str(&item.name);
        if let Some(children) = &item.children {
            result.push_str("{\n");
            result.push_str(&tree_to_selection_text(children));
            result.push_str("\n}");
        }
        result.push('\n');
    }
    result
}

/// build a query document for one root field
pub fn query_text(name: &str, args: &[OperationArg], fields: &[TreeItem]) -> OperationText {
    let (var_defs, call_args) = split_args(args, true);
    let operation = assemble("query", name, &var_defs, name, &call_args, fields);
    wrap(name, operation)
}

/// build a mutation document for one root field. mutation arguments
/// always become variables, literal values are not inlined
pub fn mutation_text(name: &str, args: &[OperationArg], fields: &[TreeItem]) -> OperationText {
    let (var_defs, call_args) = split_args(args, false);
    let operation = assemble("mutation", name, &var_defs, name, &call_args, fields);
    wrap(name, operation)
}

/// build one compound query over several root field blocks, each with
/// its own arguments and selection
pub fn compound_query_text(name: &str, blocks: &[FieldBlock]) -> OperationText {
    let mut var_defs = String::new();
    for block in blocks {
        let (defs, _) = split_args(&block.args, true);
        var_defs.push_str(&defs);
    }

    let mut body = Vec::new();
    for block in blocks {
        let (_, call_args) = split_args(&block.args, true);
        let field = match &block.alias {
            Some(alias) => format!("{alias}: {}", block.name),
            None => block.name.clone(),
        };
        let call = if call_args.is_empty() {
            field
        } else {
            format!("{field}({call_args})")
        };
        if block.fields.is_empty() {
            body.push(call);
        } else {
            body.push(format!(
                "{call} {{\n{}\n}}",
                tree_to_selection_text(&block.fields)
            ));
        }
    }

    let header = if var_defs.is_empty() {
        format!("query {name}")
    } else {
        format!("query {name}({var_defs})")
    };
    let operation = format!("{header} {{\n{}\n}}", body.join("\n"));
    wrap(name, operation)
}

/// split arguments into `$name: Type` definitions and the field call
/// list. when `inline_literals` is set, args carrying a value are
/// inlined into the call instead of becoming variables
fn split_args(args: &[OperationArg], inline_literals: bool) -> (String, String) {
    let mut var_defs = String::new();
    let mut call_args = String::new();

    for arg in args {
        match (&arg.value, inline_literals) {
            (Some(value), true) => {
                let literal = if value.parse::<f64>().is_ok() {
                    value.clone()
                } else {
                    format!("\"{value}\"")
                };
                call_args.push_str(&format!("{}: {literal},", arg.name));
            }
            _ => {
                var_defs.push_str(&format!(
                    "${}: {},",
                    arg.name,
                    arg.gql_type.as_deref().unwrap_or_default()
                ));
                call_args.push_str(&format!("{}: ${},", arg.name, arg.name));
            }
        }
    }

    (var_defs, call_args)
}

fn assemble(
    kind: &str,
    name: &str,
    var_defs: &str,
    field: &str,
    call_args: &str,
    fields: &[TreeItem],
) -> String {
    let header = if var_defs.is_empty() {
        format!("{kind} {name}")
    } else {
        format!("{kind} {name}({var_defs})")
    };
    let call = if call_args.is_empty() {
        field.to_string()
    } else {
        format!("{field}({call_args})")
    };

    if fields.is_empty() {
        // no selection: a bare field reference with no body
        format!("{header} {{\n{call}\n}}")
    } else {
        format!(
            "{header} {{\n{call} {{{}}}\n}}",
            tree_to_selection_text(fields)
        )
    }
}

fn wrap(name: &str, operation: String) -> OperationText {
    OperationText {
        code: format!("export const {name}Schema = gql`{operation}`"),
        operation,
    }
}
