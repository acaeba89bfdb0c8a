//! One displayed component: its schema, its own state and the views derived from it.

use serde::Serialize;
use vitrine_core::{
    AssetSource, ComponentSchema, ComponentState, LoadError, Projector, init_state,
    load_fragment, to_indented_markup, to_markup_snippet, to_template_snippet_with,
};

use crate::controls::{Control, ControlChange, build_controls};

/// Progress of the one-shot fragment fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum FragmentStatus {
    /// Not fetched yet.
    Loading,
    /// Fragment attached.
    Loaded,
    /// Fetch failed; the instance shows an error placeholder.
    Failed {
        /// Error shown in the placeholder.
        message: String,
    },
}

/// Everything a view shows for one instance, derived from the same state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedViews {
    /// Projected markup; absent until the fragment is loaded.
    pub preview: Option<String>,
    /// Template include for the current state.
    pub template_snippet: String,
    /// Line-broken projected markup.
    pub markup_snippet: Option<String>,
    /// Indented projected markup.
    pub indented_markup: Option<String>,
}

/// A component shown in a view. Owns its state; nothing is shared between instances.
#[derive(Debug, Clone)]
pub struct ComponentInstance {
    schema: ComponentSchema,
    state: ComponentState,
    failure: Option<String>,
}

impl ComponentInstance {
    /// Create an instance with default state.
    ///
    /// A schema that breaks a field invariant gives an instance that is
    /// already failed and never fetches its fragment.
    pub fn new(schema: ComponentSchema) -> Self {
        let failure = schema.validate().err().map(|err| {
            log::error!("{}", err);
            err.to_string()
        });
        let state = init_state(&schema);
        Self {
            schema,
            state,
            failure,
        }
    }

    /// Component schema.
    pub fn schema(&self) -> &ComponentSchema {
        &self.schema
    }

    /// Component id.
    pub fn id(&self) -> &str {
        &self.schema.id
    }

    /// Current state.
    pub fn state(&self) -> &ComponentState {
        &self.state
    }

    /// Fetch progress.
    pub fn status(&self) -> FragmentStatus {
        match (&self.failure, self.state.base_markup()) {
            (Some(message), _) => FragmentStatus::Failed {
                message: message.clone(),
            },
            (None, Some(_)) => FragmentStatus::Loaded,
            (None, None) => FragmentStatus::Loading,
        }
    }

    /// Path of the fragment to fetch.
    pub fn fragment_path(&self) -> String {
        self.schema.fragment_path()
    }

    /// Store the fetched fragment. Later fragments are ignored.
    pub fn attach_fragment(&mut self, markup: impl Into<String>) -> bool {
        if self.failure.is_some() {
            return false;
        }
        self.state.attach_base_markup(markup)
    }

    /// Record a failed fetch.
    pub fn fail_fragment(&mut self, message: impl Into<String>) {
        if self.state.base_markup().is_none() {
            self.failure = Some(message.into());
        }
    }

    /// Fetch the fragment from a source, recording the outcome.
    pub fn load_fragment(&mut self, source: &dyn AssetSource) -> Result<(), LoadError> {
        if self.failure.is_some() {
            return Ok(());
        }
        match load_fragment(source, &self.schema) {
            Ok(markup) => {
                self.attach_fragment(markup);
                Ok(())
            }
            Err(err) => {
                self.fail_fragment(err.to_string());
                Err(err)
            }
        }
    }

    /// Controls for the current state.
    pub fn controls(&self) -> Vec<Control> {
        build_controls(&self.schema, &self.state)
    }

    /// Write a control change into the state. Returns whether it changed.
    pub fn apply_change(&mut self, change: ControlChange) -> bool {
        self.state
            .set_field(&self.schema, change.category, &change.key, change.value.into())
    }

    /// Apply a change and re-derive every view of this instance.
    pub fn handle_change(
        &mut self,
        projector: &Projector,
        change: ControlChange,
        template_extension: &str,
    ) -> RenderedViews {
        self.apply_change(change);
        self.render(projector, template_extension)
    }

    /// Projected markup, once the fragment is loaded.
    pub fn projected_markup(&self, projector: &Projector) -> Option<String> {
        if self.failure.is_some() {
            return None;
        }
        let base = self.state.base_markup()?;
        Some(projector.project(base, &self.schema, &self.state))
    }

    /// Template include for the current state.
    pub fn template_snippet(&self, template_extension: &str) -> String {
        to_template_snippet_with(&self.schema.id, &self.state, template_extension)
    }

    /// Derive every view from the current state.
    pub fn render(&self, projector: &Projector, template_extension: &str) -> RenderedViews {
        let preview = self.projected_markup(projector);
        RenderedViews {
            markup_snippet: preview.as_deref().map(to_markup_snippet),
            indented_markup: preview.as_deref().map(to_indented_markup),
            template_snippet: self.template_snippet(template_extension),
            preview,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::{FieldCategory, FieldSpec, MemorySource};

    fn instance() -> ComponentInstance {
        ComponentInstance::new(
            ComponentSchema::new("button")
                .with_variant("size", FieldSpec::select("Size", ["small", "normal", "large"], "normal"))
                .with_content("text", FieldSpec::text("Text", "Click me")),
        )
    }

    #[test]
    fn renders_nothing_until_loaded() {
        let instance = instance();
        assert_eq!(instance.status(), FragmentStatus::Loading);
        let views = instance.render(&Projector::default(), "twig");
        assert_eq!(views.preview, None);
        assert_eq!(
            views.template_snippet,
            r#"{% include 'components/button/button.twig' with { size="normal", text="Click me" } %}"#
        );
    }

    #[test]
    fn change_updates_preview_and_code_together() {
        let mut instance = instance();
        instance.attach_fragment("<button class=\"btn\"><span>Click me</span></button>");
        let projector = Projector::default();

        let views = instance.handle_change(
            &projector,
            ControlChange::text(FieldCategory::Variants, "size", "large"),
            "twig",
        );
        assert_eq!(
            views.preview.as_deref(),
            Some(r#"<button class="btn btn--large"><span>Click me</span></button>"#)
        );
        assert!(views.template_snippet.contains(r#"size="large""#));
        insta::assert_snapshot!(views.markup_snippet.unwrap(), @r#"
        <button class="btn btn--large">
        <span>Click me</span>
        </button>
        "#);
    }

    #[test]
    fn stale_control_is_ignored() {
        let mut instance = instance();
        assert!(!instance.apply_change(ControlChange::checked(FieldCategory::Variants, "loading", true)));
        assert_eq!(instance.state().variants.len(), 1);
    }

    #[test]
    fn failed_fetch_is_recorded() {
        let mut instance = instance();
        let err = instance.load_fragment(&MemorySource::new()).unwrap_err();
        assert!(matches!(err, LoadError::Unreachable { .. }));
        assert!(matches!(instance.status(), FragmentStatus::Failed { .. }));
        assert!(!instance.attach_fragment("<button></button>"));
        assert_eq!(instance.projected_markup(&Projector::default()), None);
    }

    #[test]
    fn invalid_select_default_fails_the_instance() {
        let schema = ComponentSchema::new("badge")
            .with_variant("tone", FieldSpec::select("Tone", ["info", "warning"], "danger"));
        let mut instance = ComponentInstance::new(schema);

        let FragmentStatus::Failed { message } = instance.status() else {
            panic!("expected a failed instance");
        };
        assert_eq!(
            message,
            "Invalid schema for component 'badge': tone: select default 'danger' is not one of its options"
        );

        let source = MemorySource::new().with("components/badge/badge.html", "<span class=\"badge\">New</span>");
        instance.load_fragment(&source).unwrap();
        assert!(!instance.attach_fragment("<span></span>"));
        assert_eq!(instance.render(&Projector::default(), "twig").preview, None);
    }
}
