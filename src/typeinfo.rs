//! type reference decomposition
//!
//! [`TypeInfo`] strips at most one outer non-null wrapper, then at most
//! one list wrapper, and records the innermost named type. deeper
//! wrapper chains (list-of-non-null-of-list and beyond) collapse to the
//! innermost name with only the outermost flags recorded; this is a
//! known limitation, not an oversight.

use crate::introspection::{TypeKind, TypeRef};
use graphql_parser::query::Type;

/// nullability, list-ness, and base type of one type reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    /// an outermost NON_NULL wrapper was present
    pub is_non_null: bool,
    /// a LIST wrapper was outermost after non-null stripping
    pub is_list: bool,
    /// innermost named type
    pub base: String,
}

impl TypeInfo {
    /// decompose a parsed document type node
    pub fn of_node(ty: &Type<String>) -> TypeInfo {
        let mut is_non_null = false;
        let mut is_list = false;
        let mut inner = ty;

        if let Type::NonNullType(wrapped) = inner {
            inner = wrapped;
            is_non_null = true;
        }
        if let Type::ListType(wrapped) = inner {
            inner = wrapped;
            is_list = true;
        }

        TypeInfo {
            is_non_null,
            is_list,
            base: innermost_node_name(inner),
        }
    }

    /// decompose an introspection type reference chain.
    ///
    /// returns `None` when the chain never reaches a named type.
    pub fn of_ref(ty: &TypeRef) -> Option<TypeInfo> {
        let mut is_non_null = false;
        let mut is_list = false;
        let mut inner = ty;

        if inner.kind == TypeKind::NonNull {
            inner = inner.of_type.as_deref()?;
            is_non_null = true;
        }
        if inner.kind == TypeKind::List {
            inner = inner.of_type.as_deref()?;
            is_list = true;
        }

        Some(TypeInfo {
            is_non_null,
            is_list,
            base: innermost_ref_name(inner)?,
        })
    }
}

fn innermost_node_name(ty: &Type<String>) -> String {
    match ty {
        Type::NamedType(name) => name.clone(),
        Type::NonNullType(inner) | Type::ListType(inner) => innermost_node_name(inner),
    }
}

fn innermost_ref_name(ty: &TypeRef) -> Option<String> {
    match &ty.name {
        Some(name) => Some(name.clone()),
        None => innermost_ref_name(ty.of_type.as_deref()?),
    }
}
