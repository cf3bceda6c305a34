//! graphweld graphql toolkit
//!
//! this crate merges the schemas of one or more graphql endpoints and
//! generates typescript declarations for operation documents. start
//! with [`Merger`] and [`FetchConfig`] to build a composed [`Schema`],
//! then drive [`Generator`] over operation texts, or synthesize those
//! texts first from a picked field tree via [`query_text`] and
//! friends.
//!
//! ## quick start
//!
//! ```no_run
//! use graphweld::{FetchConfig, GenConfig, Generator, Merger};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let merger = Merger::new(FetchConfig::new())?;
//! let outcome = merger
//!     .merge_all(&["http://localhost:8000/graphql".to_string()])
//!     .await?;
//!
//! let generator = Generator::new(&outcome.composed, GenConfig::new());
//! let types = generator.generate(
//!     &["query GetUser { user { id name } }".to_string()],
//!     &[],
//! )?;
//! println!("{types}");
//! # Ok(())
//! # }
//! ```
//!
//! ## building operation text
//!
//! the picker module mirrors the composed schema as a checkable field
//! tree; a checked subtree plus arguments turns into operation
//! document text, which feeds straight back into the generator.

mod config;
mod convert;
mod declaration;
mod document;
mod emit;
mod error;
mod introspection;
mod merge;
mod operation;
mod picker;
mod scalars;
mod schema;
mod selection;
mod store;
mod typeinfo;
mod variables;

pub use config::{FetchConfig, GenConfig};
pub use convert::{json_to_xml, json_to_yaml};
pub use declaration::DeclarationBlock;
pub use document::{
    fragment_type_name, quick_import_stage, result_type_name, typescript_stage,
    variables_type_name, Formatter, GeneratedDocument, Generator, PassthroughFormatter,
    StageContext, StageFn, StageOutput,
};
pub use emit::{render_barrel, types_text, write_barrel, write_documents, BarrelEntry};
pub use error::{Error, Result};
pub use introspection::{
    IntrospectionData, IntrospectionDirective, IntrospectionEnumValue, IntrospectionField,
    IntrospectionInputValue, IntrospectionResponse, IntrospectionSchema, IntrospectionType,
    RootTypeRef, TypeKind, TypeRef, INTROSPECTION_OPERATION_NAME, INTROSPECTION_QUERY,
};
pub use merge::{compose, EndpointSchema, MergeOutcome, Merger};
pub use operation::{
    compound_query_text, mutation_text, query_text, tree_to_selection_text, FieldBlock,
    OperationArg, OperationText, TreeItem,
};
pub use picker::{
    build_picker_tree, selected_tree, set_alias, toggle, PickerNode, KEY_SEPARATOR,
};
pub use scalars::{ScalarMap, DEFAULT_SCALARS, DEFAULT_SCALAR_TYPE};
pub use schema::{Schema, SchemaType, TypeBody};
pub use selection::SelectionSetGenerator;
pub use store::{ConfigRecord, GroupRecord, MemoryRepository, Repository, SchemaRecord};
pub use typeinfo::TypeInfo;
pub use variables::{VariablesGenerator, VariablesOutput};
