#![deny(missing_docs)]
//! Vitrine views: the catalogue grid and item detail views, their control
//! panels and preview hosts, and the hand-off to conformance checks.
//!
//! Both views drive the same [`ComponentInstance`] so that the preview, the
//! markup snippet and the template include are always derived from one state.

/// Catalogue grid view.
pub mod catalogue;
/// Conformance collaborator interface and report summaries.
pub mod conformance;
/// Control widgets and control changes.
pub mod controls;
/// Item detail view.
pub mod detail;
/// View error types.
pub mod error;
mod html;
/// Component instances.
pub mod instance;
/// View options.
pub mod options;
/// Preview host documents and markup snapshots.
pub mod preview;

pub use catalogue::{CatalogueView, CodeTab, FragmentRequest};
pub use conformance::{
    AccessibilitySummary, AuditOptions, BadgeStatus, ConformanceInput, ConformanceReport,
    ConformanceRunner, RuleToggle, ValidatorMessage, ValidatorSummary, Violation, run_conformance,
};
pub use controls::{Control, ControlChange, ControlKind, ControlValue, build_controls, render_controls};
pub use detail::{DetailQuery, DetailView, ItemKind, VariantOption};
pub use error::{ConformanceError, DetailError, PreviewError};
pub use instance::{ComponentInstance, FragmentStatus, RenderedViews};
pub use options::{Device, ShowcaseOptions};
pub use preview::{
    COMPONENT_CONTAINER_ID, MarkupSnapshot, PreviewHost, PreviewKind, PreviewSource,
    component_document, component_error_document, page_url,
};
