//! field picker tree
//!
//! mirrors the schema's field graph as a checkable tree for the UI
//! layer. node keys are root-to-node paths, so sibling subtrees that
//! share field names stay distinguishable. toggling rebuilds the tree
//! instead of mutating nodes in place; the input tree is never
//! touched.

use crate::introspection::IntrospectionField;
use crate::operation::TreeItem;
use crate::schema::Schema;
use crate::typeinfo::TypeInfo;
use std::collections::BTreeSet;

/// path separator inside node keys
pub const KEY_SEPARATOR: &str = "/";

/// nesting cap when unrolling the schema graph into a tree
const MAX_DEPTH: usize = 3;

/// one checkable node mirroring a schema field
#[derive(Debug, Clone)]
pub struct PickerNode {
    pub title: String,
    pub value: String,
    /// root-to-node path, parent keys joined by [`KEY_SEPARATOR`]
    pub key: String,
    pub description: Option<String>,
    pub checked: bool,
    pub alias: Option<String>,
    pub children: Vec<PickerNode>,
}

/// unroll a root field map into a picker tree.
///
/// recursion stops at a fixed depth and on cycles, so self-referential
/// schemas terminate; capped nodes simply have no children.
pub fn build_picker_tree(schema: &Schema, fields: &[IntrospectionField]) -> Vec<PickerNode> {
    let mut visiting = BTreeSet::new();
    build_level(schema, fields, "", &mut visiting, 0)
}

fn build_level(
    schema: &Schema,
    fields: &[IntrospectionField],
    parent_key: &str,
    visiting: &mut BTreeSet<String>,
    depth: usize,
) -> Vec<PickerNode> {
    let mut nodes = Vec::new();

    for field in fields {
        let key = if parent_key.is_empty() {
            field.name.clone()
        } else {
            format!("{parent_key}{KEY_SEPARATOR}{}", field.name)
        };

        let base_type = TypeInfo::of_ref(&field.ty).and_then(|info| schema.get_type(&info.base));
        let children = match base_type {
            Some(ty) => match ty.field_map() {
                Some(child_fields) if depth < MAX_DEPTH && !visiting.contains(&ty.name) => {
                    visiting.insert(ty.name.clone());
                    let children = build_level(schema, child_fields, &key, visiting, depth + 1);
                    visiting.remove(&ty.name);
                    children
                }
                _ => Vec::new(),
            },
            None => Vec::new(),
        };

        nodes.push(PickerNode {
            title: field.name.clone(),
            value: field.name.clone(),
            key,
            description: field.description.clone(),
            checked: false,
            alias: None,
            children,
        });
    }

    nodes
}

/// return a new tree with the keyed node and its whole subtree set to
/// `checked`. the input tree is left untouched.
pub fn toggle(nodes: &[PickerNode], key: &str, checked: bool) -> Vec<PickerNode> {
    nodes
        .iter()
        .map(|node| {
            let mut rebuilt = node.clone();
            if node.key == key {
                set_subtree(&mut rebuilt, checked);
            } else {
                rebuilt.children = toggle(&node.children, key, checked);
            }
            rebuilt
        })
        .collect()
}

fn set_subtree(node: &mut PickerNode, checked: bool) {
    node.checked = checked;
    for child in &mut node.children {
        set_subtree(child, checked);
    }
}

/// return a new tree with the keyed node's alias replaced
pub fn set_alias(nodes: &[PickerNode], key: &str, alias: Option<String>) -> Vec<PickerNode> {
    nodes
        .iter()
        .map(|node| {
            let mut rebuilt = node.clone();
            if node.key == key {
                rebuilt.alias = alias.clone();
            } else {
                rebuilt.children = set_alias(&node.children, key, alias.clone());
            }
            rebuilt
        })
        .collect()
}

/// project the checked subtree into the selection tree consumed by the
/// operation text builder. a node survives when it is checked or has a
/// surviving descendant; aliases render as `alias:field`.
pub fn selected_tree(nodes: &[PickerNode]) -> Vec<TreeItem> {
    nodes
        .iter()
        .filter_map(|node| {
            let children = selected_tree(&node.children);
            if !node.checked && children.is_empty() {
                return None;
            }

            let name = match &node.alias {
                Some(alias) => format!("{alias}:{}", node.value),
                None => node.value.clone(),
            };
            Some(TreeItem {
                name,
                description: node.description.clone(),
                children: (!children.is_empty()).then_some(children),
            })
        })
        .collect()
}
