//! Detail view of one component or page, opened from a query string.
//!
//! A component is shown with its controls through a [`PreviewHost`] that gets
//! a fresh host document after every change. A page is loaded by URL with the
//! selected variant's parameters and is never projected.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use url::form_urlencoded;
use vitrine_core::{AssetSource, Catalogue, LoadError, PageEntry, Projector, to_indented_markup};

use crate::catalogue::FragmentRequest;
use crate::controls::{Control, ControlChange, render_controls};
use crate::error::{DetailError, PreviewError};
use crate::instance::{ComponentInstance, FragmentStatus, RenderedViews};
use crate::options::{Device, ShowcaseOptions};
use crate::preview::{PreviewHost, PreviewKind};

/// Kind of item a detail view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A projected component.
    Component,
    /// A compiled page.
    #[default]
    Page,
}

impl ItemKind {
    /// Value of the `type` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Component => "component",
            ItemKind::Page => "page",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ItemKind::Component => "Component",
            ItemKind::Page => "Page",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = std::convert::Infallible;

    /// Anything but `component` is a page.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == "component" {
            ItemKind::Component
        } else {
            ItemKind::Page
        })
    }
}

/// Item addressed by a detail view URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetailQuery {
    /// Item kind (`type`, pages by default).
    pub kind: ItemKind,
    /// Item id (`id`, or the older `page`).
    pub id: Option<String>,
}

impl DetailQuery {
    /// Query for a known item.
    pub fn new(kind: ItemKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: Some(id.into()),
        }
    }

    /// Parse a query string, with or without the leading `?`.
    pub fn parse(query: &str) -> Self {
        let mut parsed = Self::default();
        let mut legacy_page = None;
        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match key.as_ref() {
                "type" if !value.is_empty() => {
                    parsed.kind = value.parse().unwrap_or_default();
                }
                "id" if !value.is_empty() => parsed.id = Some(value.into_owned()),
                "page" if !value.is_empty() => legacy_page = Some(value.into_owned()),
                _ => {}
            }
        }
        if parsed.id.is_none() {
            parsed.id = legacy_page;
        }
        parsed
    }

    /// Encode as a query string (without `?`).
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer.append_pair("type", self.kind.as_str());
        if let Some(id) = &self.id {
            serializer.append_pair("id", id);
        }
        serializer.finish()
    }
}

/// Entry of the page variant selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantOption {
    /// Variant id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Tooltip.
    pub description: Option<String>,
    /// Whether this is the current variant.
    pub selected: bool,
}

#[derive(Debug, Clone)]
enum DetailItem {
    Component(Box<ComponentInstance>),
    Page {
        page: PageEntry,
        variant: Option<String>,
    },
}

/// Full-page view of one catalogue item.
#[derive(Debug, Clone)]
pub struct DetailView {
    item: DetailItem,
    host: PreviewHost,
    options: ShowcaseOptions,
    projector: Projector,
    device: Device,
    showing_code: bool,
}

impl DetailView {
    /// Open the item a query names.
    pub fn open(
        catalogue: &Catalogue,
        query: &DetailQuery,
        options: ShowcaseOptions,
    ) -> Result<Self, DetailError> {
        let id = query.id.as_deref().ok_or(DetailError::MissingItem)?;
        let not_found = || DetailError::NotFound {
            kind: query.kind.label(),
            id: id.to_string(),
        };

        let (item, host) = match query.kind {
            ItemKind::Component => {
                let schema = catalogue.component(id).ok_or_else(not_found)?;
                let instance = ComponentInstance::new(schema.clone());
                let mut host = PreviewHost::empty(PreviewKind::Component);
                if let FragmentStatus::Failed { message } = instance.status() {
                    host.show_component_error(instance.id(), &message, &options);
                }
                (DetailItem::Component(Box::new(instance)), host)
            }
            ItemKind::Page => {
                let page = catalogue.page(id).ok_or_else(not_found)?;
                let variant = page.variants.first();
                let host = PreviewHost::for_page(page, variant);
                (
                    DetailItem::Page {
                        page: page.clone(),
                        variant: variant.map(|v| v.id.clone()),
                    },
                    host,
                )
            }
        };

        Ok(Self {
            item,
            host,
            device: options.default_device,
            options,
            projector: Projector::default(),
            showing_code: false,
        })
    }

    /// Replace the projector (custom override registry).
    pub fn with_projector(mut self, projector: Projector) -> Self {
        self.projector = projector;
        self.refresh();
        self
    }

    /// Options in use.
    pub fn options(&self) -> &ShowcaseOptions {
        &self.options
    }

    /// Kind of the item shown.
    pub fn kind(&self) -> ItemKind {
        match self.item {
            DetailItem::Component(_) => ItemKind::Component,
            DetailItem::Page { .. } => ItemKind::Page,
        }
    }

    /// Heading of the view.
    pub fn title(&self) -> &str {
        match &self.item {
            DetailItem::Component(instance) => &instance.schema().name,
            DetailItem::Page { page, .. } => &page.name,
        }
    }

    /// Line under the heading: category and description.
    pub fn meta(&self) -> String {
        let (category, description) = match &self.item {
            DetailItem::Component(instance) => (
                instance.schema().category.as_deref(),
                instance.schema().description.as_deref(),
            ),
            DetailItem::Page { page, .. } => (Some(page.category.as_str()), page.description.as_deref()),
        };
        let mut parts = Vec::new();
        if let Some(category) = category.filter(|c| !c.is_empty()) {
            parts.push(format!("Category: {category}"));
        }
        if let Some(description) = description.filter(|d| !d.is_empty()) {
            parts.push(description.to_string());
        }
        parts.join(" \u{2022} ")
    }

    /// The component instance, in component mode.
    pub fn instance(&self) -> Option<&ComponentInstance> {
        match &self.item {
            DetailItem::Component(instance) => Some(&**instance),
            DetailItem::Page { .. } => None,
        }
    }

    /// Controls of the component; empty for pages.
    pub fn controls(&self) -> Vec<Control> {
        self.instance().map(ComponentInstance::controls).unwrap_or_default()
    }

    /// Control panel markup; empty for pages.
    pub fn render_controls_html(&self) -> String {
        self.instance()
            .map(|i| render_controls(i.id(), &i.controls()))
            .unwrap_or_default()
    }

    /// Entries of the page variant selector; empty for components and pages without variants.
    pub fn variant_options(&self) -> Vec<VariantOption> {
        let DetailItem::Page { page, variant } = &self.item else {
            return Vec::new();
        };
        page.variants
            .iter()
            .map(|v| VariantOption {
                id: v.id.clone(),
                name: v.name.clone(),
                description: v.description.clone(),
                selected: variant.as_deref() == Some(v.id.as_str()),
            })
            .collect()
    }

    /// Switch the page variant and reload the page. Unknown ids are ignored.
    pub fn select_variant(&mut self, id: &str) -> bool {
        let DetailItem::Page { page, variant } = &mut self.item else {
            return false;
        };
        let Some(selected) = page.variant(id) else {
            log::debug!("Page '{}' has no variant '{}'", page.id, id);
            return false;
        };
        self.host.show_page(page, Some(selected));
        *variant = Some(selected.id.clone());
        true
    }

    /// The component fragment still to fetch, if any.
    pub fn fragment_request(&self) -> Option<FragmentRequest> {
        let instance = self.instance()?;
        (instance.status() == FragmentStatus::Loading).then(|| FragmentRequest {
            component_id: instance.id().to_string(),
            path: instance.fragment_path(),
        })
    }

    /// Attach the fetched component fragment and show it.
    pub fn attach_fragment(&mut self, markup: impl Into<String>) -> bool {
        let DetailItem::Component(instance) = &mut self.item else {
            return false;
        };
        let attached = instance.attach_fragment(markup);
        if attached {
            self.refresh();
        }
        attached
    }

    /// Record a failed fetch and show the error document.
    pub fn fail_fragment(&mut self, message: impl Into<String>) {
        let DetailItem::Component(instance) = &mut self.item else {
            return;
        };
        let message = message.into();
        log::error!("Error loading component {}: {}", instance.id(), message);
        instance.fail_fragment(message.as_str());
        self.host
            .show_component_error(instance.id(), &message, &self.options);
    }

    /// Fetch the component fragment from a source.
    pub fn load_fragment(&mut self, source: &dyn AssetSource) -> Result<(), LoadError> {
        let DetailItem::Component(instance) = &mut self.item else {
            return Ok(());
        };
        match instance.load_fragment(source) {
            Ok(()) => {
                self.refresh();
                Ok(())
            }
            Err(err) => {
                self.host
                    .show_component_error(instance.id(), &err.to_string(), &self.options);
                Err(err)
            }
        }
    }

    /// Apply a control change, re-project and reload the preview.
    pub fn handle_change(&mut self, change: ControlChange) -> Option<RenderedViews> {
        let DetailItem::Component(instance) = &mut self.item else {
            return None;
        };
        let views = instance.handle_change(&self.projector, change, &self.options.template_extension);
        if let Some(preview) = &views.preview {
            let title = instance.schema().name.clone();
            self.host.show_component(&title, preview, &self.options);
        }
        Some(views)
    }

    /// Re-render the component into the host from the current state.
    fn refresh(&mut self) {
        let DetailItem::Component(instance) = &self.item else {
            return;
        };
        if let Some(projected) = instance.projected_markup(&self.projector) {
            self.host
                .show_component(&instance.schema().name, &projected, &self.options);
        }
    }

    /// The preview host.
    pub fn host(&self) -> &PreviewHost {
        &self.host
    }

    /// The preview host, for reporting load signals.
    pub fn host_mut(&mut self) -> &mut PreviewHost {
        &mut self.host
    }

    /// Current device preset.
    pub fn device(&self) -> Device {
        self.device
    }

    /// Switch the device preset.
    pub fn set_device(&mut self, device: Device) {
        self.device = device;
    }

    /// Class list of the preview container.
    pub fn preview_class(&self) -> String {
        self.device.preview_class()
    }

    /// Flip between preview and code. Returns whether the code is now shown.
    pub fn toggle_code(&mut self) -> bool {
        self.showing_code = !self.showing_code;
        self.showing_code
    }

    /// Whether the code panel is shown.
    pub fn showing_code(&self) -> bool {
        self.showing_code
    }

    /// Indented markup of what the host currently renders.
    pub fn code_view(&self) -> Result<String, PreviewError> {
        self.host
            .rendered_markup()
            .map(|snapshot| to_indented_markup(&snapshot.markup))
    }

    /// Template include of the component's current state.
    pub fn template_snippet(&self) -> Option<String> {
        self.instance()
            .map(|i| i.template_snippet(&self.options.template_extension))
    }
}
