//! Catalogue grid view: every component as a live card, every page as a link card.

use serde::Serialize;
use vitrine_core::{AssetSource, Catalogue, PageEntry, Projector};

use crate::controls::{ControlChange, render_controls};
use crate::html::{attr, text};
use crate::instance::{ComponentInstance, FragmentStatus, RenderedViews};
use crate::options::ShowcaseOptions;

/// A fragment the host still has to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentRequest {
    /// Component the fragment belongs to.
    pub component_id: String,
    /// Path relative to the published root.
    pub path: String,
}

/// Which code view a card shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeTab {
    /// Template include snippet.
    #[default]
    Template,
    /// Projected markup.
    Html,
}

impl CodeTab {
    /// Value of the tab button's `data-tab`.
    pub fn as_str(self) -> &'static str {
        match self {
            CodeTab::Template => "template",
            CodeTab::Html => "html",
        }
    }
}

/// The grid of every component and page in a catalogue.
#[derive(Debug, Clone)]
pub struct CatalogueView {
    catalogue: Catalogue,
    instances: Vec<ComponentInstance>,
    options: ShowcaseOptions,
    projector: Projector,
    failure: Option<String>,
}

impl CatalogueView {
    /// Build the grid over a loaded catalogue, one instance per component.
    pub fn new(catalogue: Catalogue, options: ShowcaseOptions) -> Self {
        if catalogue.diagnostics.has_warnings() {
            log::warn!(
                "{} manifest entries skipped while building the grid",
                catalogue.diagnostics.count()
            );
        }
        let instances = catalogue
            .components
            .iter()
            .cloned()
            .map(ComponentInstance::new)
            .collect();
        Self {
            catalogue,
            instances,
            options,
            projector: Projector::default(),
            failure: None,
        }
    }

    /// Replace the projector (custom override registry).
    pub fn with_projector(mut self, projector: Projector) -> Self {
        self.projector = projector;
        self
    }

    /// Load the manifest from a source. An unreadable manifest gives an empty
    /// grid in its error state.
    pub fn load(source: &dyn AssetSource, options: ShowcaseOptions) -> Self {
        let loaded = Catalogue::load(source, &options.manifest_path);
        Self::from_loaded(loaded, options)
    }

    /// Build the grid from manifest text the host fetched itself.
    pub fn from_manifest_json(json: &str, options: ShowcaseOptions) -> Self {
        let loaded = Catalogue::from_json(&options.manifest_path, json);
        Self::from_loaded(loaded, options)
    }

    fn from_loaded(
        loaded: Result<Catalogue, vitrine_core::LoadError>,
        options: ShowcaseOptions,
    ) -> Self {
        match loaded {
            Ok(catalogue) => Self::new(catalogue, options),
            Err(err) => {
                log::error!("Error loading {}: {}", options.manifest_path, err);
                let mut view = Self::new(Catalogue::empty(), options);
                view.failure = Some(err.to_string());
                view
            }
        }
    }

    /// The catalogue shown.
    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Why the manifest could not be loaded, if it could not.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Options in use.
    pub fn options(&self) -> &ShowcaseOptions {
        &self.options
    }

    /// Component instances in manifest order.
    pub fn instances(&self) -> &[ComponentInstance] {
        &self.instances
    }

    /// Look up an instance by component id.
    pub fn instance(&self, id: &str) -> Option<&ComponentInstance> {
        self.instances.iter().find(|i| i.id() == id)
    }

    /// Look up an instance by component id, mutably.
    pub fn instance_mut(&mut self, id: &str) -> Option<&mut ComponentInstance> {
        self.instances.iter_mut().find(|i| i.id() == id)
    }

    /// Fragments not fetched yet.
    pub fn fragment_requests(&self) -> Vec<FragmentRequest> {
        self.instances
            .iter()
            .filter(|i| i.status() == FragmentStatus::Loading)
            .map(|i| FragmentRequest {
                component_id: i.id().to_string(),
                path: i.fragment_path(),
            })
            .collect()
    }

    /// Fetch every pending fragment. Failures are recorded per card.
    pub fn load_fragments(&mut self, source: &dyn AssetSource) {
        for instance in &mut self.instances {
            if instance.status() == FragmentStatus::Loading {
                // Recorded as the card's failed status.
                let _ = instance.load_fragment(source);
            }
        }
    }

    /// Attach a fragment the host fetched. Returns `false` for unknown ids.
    pub fn attach_fragment(&mut self, component_id: &str, markup: impl Into<String>) -> bool {
        match self.instance_mut(component_id) {
            Some(instance) => instance.attach_fragment(markup),
            None => {
                log::debug!("Fragment for unknown component '{}' dropped", component_id);
                false
            }
        }
    }

    /// Record a failed fetch reported by the host.
    pub fn fail_fragment(&mut self, component_id: &str, message: impl Into<String>) -> bool {
        let Some(instance) = self.instance_mut(component_id) else {
            return false;
        };
        let message = message.into();
        log::error!("Error loading component {}: {}", component_id, message);
        instance.fail_fragment(message);
        true
    }

    /// Apply a control change to one card and re-derive only that card's views.
    pub fn handle_change(&mut self, component_id: &str, change: ControlChange) -> Option<RenderedViews> {
        let projector = &self.projector;
        let extension = &self.options.template_extension;
        let instance = self.instances.iter_mut().find(|i| i.id() == component_id)?;
        Some(instance.handle_change(projector, change, extension))
    }

    /// Current views of one card.
    pub fn views(&self, component_id: &str) -> Option<RenderedViews> {
        self.instance(component_id)
            .map(|i| i.render(&self.projector, &self.options.template_extension))
    }

    /// Markup of the components section.
    pub fn render_components_html(&self) -> String {
        if self.failure.is_some() {
            return error_state();
        }
        if self.instances.is_empty() {
            return empty_state("No components available", "Create your first component in", "dev/components/");
        }
        self.instances
            .iter()
            .map(|i| self.render_component_card(i, CodeTab::Template))
            .collect()
    }

    /// Pages listed in the grid (the showcase's own pages are left out).
    pub fn visible_pages(&self) -> impl Iterator<Item = &PageEntry> {
        self.catalogue
            .pages
            .iter()
            .filter(|page| !self.options.is_excluded_page(&page.id))
    }

    /// Markup of the pages section.
    pub fn render_pages_html(&self) -> String {
        if self.failure.is_some() {
            return error_state();
        }
        let cards: String = self.visible_pages().map(render_page_card).collect();
        if cards.is_empty() {
            return empty_state("No pages available", "Create your pages in", "dev/pages/");
        }
        cards
    }

    /// Markup of one component card.
    pub fn render_component_card(&self, instance: &ComponentInstance, tab: CodeTab) -> String {
        let schema = instance.schema();
        let mut class = String::from("component-showcase");
        if schema.full_width {
            class.push_str(" component-showcase--full-width");
        }

        let preview = match instance.status() {
            FragmentStatus::Loading => "<div class=\"loading\">Loading...</div>".to_string(),
            FragmentStatus::Failed { message } => format!(
                "<div class=\"component-showcase__error\"><p><strong>{}</strong></p><p>Component: <code>{}</code></p><p class=\"component-showcase__error-message\">{}</p></div>",
                text(&schema.name),
                text(&instance.fragment_path()),
                text(&message)
            ),
            FragmentStatus::Loaded => instance.projected_markup(&self.projector).unwrap_or_default(),
        };

        format!(
            "<article class=\"{class}\" id=\"component-{id}\"><div class=\"component-showcase__header\"><h3>{name}</h3><p>{description}</p></div><div class=\"component-showcase__preview\" id=\"preview-{id}\">{preview}</div>{controls}{tabs}<div class=\"component-showcase__code\" id=\"code-{id}\">{code}</div></article>",
            id = attr(&schema.id),
            name = text(&schema.name),
            description = text(schema.description.as_deref().unwrap_or_default()),
            controls = render_controls(&schema.id, &instance.controls()),
            tabs = self.render_tabs(tab),
            code = self.render_code(instance, tab),
        )
    }

    fn render_tabs(&self, active: CodeTab) -> String {
        let mut html = String::from("<div class=\"component-showcase__tabs\">");
        for tab in [CodeTab::Template, CodeTab::Html] {
            html.push_str(&format!(
                "<button type=\"button\"{} data-tab=\"{}\">{}</button>",
                if tab == active { " class=\"active\"" } else { "" },
                tab.as_str(),
                text(&self.tab_title(tab))
            ));
        }
        html.push_str("</div>");
        html
    }

    fn tab_title(&self, tab: CodeTab) -> String {
        match tab {
            CodeTab::Template => self.options.template_extension.to_uppercase(),
            CodeTab::Html => "HTML".to_string(),
        }
    }

    /// Code panel of one card for the given tab.
    pub fn render_code(&self, instance: &ComponentInstance, tab: CodeTab) -> String {
        let views = instance.render(&self.projector, &self.options.template_extension);
        let code = match tab {
            CodeTab::Template => views.template_snippet,
            CodeTab::Html => views.markup_snippet.unwrap_or_default(),
        };
        format!(
            "<div class=\"component-showcase__code-header\"><h4>Code {}</h4><button type=\"button\" data-copy=\"\">Copy</button></div><pre><code>{}</code></pre>",
            text(&self.tab_title(tab)),
            text(&code)
        )
    }
}

fn empty_state(message: &str, hint: &str, directory: &str) -> String {
    format!(
        "<div class=\"empty-state\"><p>{message}</p><p class=\"empty-state__hint\">{hint} <code>{directory}</code></p></div>"
    )
}

fn error_state() -> String {
    "<div class=\"empty-state empty-state--error\"><p>Error while loading data</p></div>".to_string()
}

fn render_page_card(page: &PageEntry) -> String {
    let subtitle = page
        .description
        .as_deref()
        .map(|d| format!("<p class=\"card__subtitle\">{}</p>", text(d)))
        .unwrap_or_default();
    format!(
        "<div class=\"card card--interactive\"><div class=\"card__header\"><h3 class=\"card__title\">{}</h3>{}</div><div class=\"card__body\"><p>Category: {}</p></div><div class=\"card__footer\"><a href=\"{}.html\" class=\"btn btn--primary btn--small\" target=\"_blank\">View page</a></div></div>",
        text(&page.name),
        subtitle,
        text(&page.category),
        attr(&page.path)
    )
}
