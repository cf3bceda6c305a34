//! file emission
//!
//! writes generated documents to disk — one operation file under
//! `schema/`, one types file under `type/` — and synthesizes a barrel
//! file exposing a typed accessor per record. read-style records
//! (list/get/pagedList) become lazy-query accessors, write-style
//! records (create/update/delete/batch) become mutation accessors.

use crate::document::{result_type_name, variables_type_name, GeneratedDocument};
use crate::error::Result;
use std::fs;
use std::path::Path;

/// barrel accessor input: record name plus its display name
#[derive(Debug, Clone)]
pub struct BarrelEntry {
    pub name: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccessorKind {
    Read,
    Write,
    None,
}

fn accessor_kind(name: &str) -> AccessorKind {
    const READ_PREFIXES: &[&str] = &["list", "get", "pagedList"];
    const WRITE_PREFIXES: &[&str] = &["create", "update", "delete", "batch"];

    if READ_PREFIXES.iter().any(|prefix| name.starts_with(prefix)) {
        AccessorKind::Read
    } else if WRITE_PREFIXES.iter().any(|prefix| name.starts_with(prefix)) {
        AccessorKind::Write
    } else {
        AccessorKind::None
    }
}

/// write one file per record under `schema/` and `type/`
pub fn write_documents(out_dir: &Path, records: &[GeneratedDocument]) -> Result<()> {
    let schema_dir = out_dir.join("schema");
    let type_dir = out_dir.join("type");
    fs::create_dir_all(&schema_dir)?;
    fs::create_dir_all(&type_dir)?;

    for record in records {
        fs::write(
            schema_dir.join(format!("{}.ts", record.name)),
            &record.operation_text,
        )?;
        fs::write(
            type_dir.join(format!("{}.ts", record.name)),
            types_text(record),
        )?;
    }

    Ok(())
}

/// combined type text for one record's types file
pub fn types_text(record: &GeneratedDocument) -> String {
    [
        record.variables_type_text.as_str(),
        record.result_type_text.as_str(),
    ]
    .iter()
    .filter(|text| !text.is_empty())
    .cloned()
    .collect::<Vec<&str>>()
    .join("\n\n")
}

/// write the barrel file (`apis/index.ts`) for a set of records
pub fn write_barrel(out_dir: &Path, entries: &[BarrelEntry]) -> Result<()> {
    let apis_dir = out_dir.join("apis");
    fs::create_dir_all(&apis_dir)?;
    fs::write(apis_dir.join("index.ts"), render_barrel(entries))?;
    Ok(())
}

/// render the barrel text: hook imports, per-record schema/type
/// imports, one accessor per read/write record, and a `useApi`
/// function returning every record with a display-name comment
pub fn render_barrel(entries: &[BarrelEntry]) -> String {
    let mut import_schema = String::new();
    let mut import_types = String::new();
    let mut accessors = String::new();

    for entry in entries {
        let name = &entry.name;
        import_schema.push_str(&format!(
            "import {{ {name}Schema }} from './schema/{name}';\n"
        ));
        import_types.push_str(&format!(
            "import {{ {res}, {vars} }} from './type/{name}';\n",
            res = result_type_name(name),
            vars = variables_type_name(name),
        ));

        match accessor_kind(name) {
            AccessorKind::Read => accessors.push_str(&format!(
                "const {name} = useLazyQuery<{res}, {vars}>({name}Schema, {{ fetchPolicy: 'no-cache' }})[0];\n",
                res = result_type_name(name),
                vars = variables_type_name(name),
            )),
            AccessorKind::Write => accessors.push_str(&format!(
                "const {name} = useMutation<{res}, {vars}>({name}Schema)[0];\n",
                res = result_type_name(name),
                vars = variables_type_name(name),
            )),
            AccessorKind::None => {}
        }
    }

    let uses_lazy_query = accessors.contains("useLazyQuery");
    let uses_mutation = accessors.contains("useMutation");
    let hook_import = match (uses_lazy_query, uses_mutation) {
        (true, true) => "import { useLazyQuery, useMutation } from '@apollo/client';\n",
        (true, false) => "import { useLazyQuery } from '@apollo/client';\n",
        (false, true) => "import { useMutation } from '@apollo/client';\n",
        (false, false) => "",
    };

    let returns = entries
        .iter()
        .map(|entry| {
            let label = if entry.display_name.is_empty() {
                &entry.name
            } else {
                &entry.display_name
            };
            format!("    /** {label} */\n    {},", entry.name)
        })
        .collect::<Vec<String>>()
        .join("\n");

    format!(
        "{hook_import}{import_schema}\n{import_types}\nconst useApi = () => {{\n{accessors}\n  return {{\n{returns}\n  }};\n}};\n\nexport default useApi;\n"
    )
}
