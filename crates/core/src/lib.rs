#![deny(missing_docs)]
//! Vitrine core: component catalogue, per-instance state, markup projection and code views.

/// Code serializer: markup snippets and template includes.
pub mod codegen;
/// Minimal markup tree, selectors and serializer.
pub mod dom;
/// Core error and diagnostic types.
pub mod error;
/// Catalogue manifest: component schemas and pages.
pub mod manifest;
/// Template projector.
pub mod projector;
/// Class-root and override tables.
pub mod registry;
/// Asset sources for the manifest and fragments.
pub mod source;
/// Per-instance component state.
pub mod state;

pub use codegen::{
    DEFAULT_TEMPLATE_EXTENSION, template_arguments, template_literal, to_indented_markup,
    to_markup_snippet, to_template_snippet, to_template_snippet_with,
};
pub use dom::{Element, Fragment, Node, Selector, parse_fragment};
pub use error::{LoadDiagnostics, LoadError, LoadWarning, ProjectionError, SelectorError, StateError};
pub use manifest::{
    Catalogue, ComponentSchema, DEFAULT_MANIFEST_PATH, FieldSet, FieldSpec, FieldType, FieldValue,
    OrderedMap, PageEntry, PageVariant,
};
pub use projector::{Projector, default_projector, project};
pub use registry::{FieldEffect, OverrideRegistry, Target, default_registry};
pub use source::{AssetSource, DirectorySource, MemorySource, load_fragment};
pub use state::{ComponentState, FieldCategory, init_state};
