use js_sys::Array;
use serde::Serialize;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;
use vitrine_showcase::{
    AccessibilitySummary, AuditOptions, CatalogueView, CodeTab, ConformanceInput, ControlChange,
    ControlValue, DetailQuery, DetailView, Device, ShowcaseOptions, ValidatorSummary,
};

// ============================================================================
// Config
// ============================================================================

/// View options accepted from JavaScript. Missing or invalid fields keep their defaults.
fn parse_config(config: JsValue) -> ShowcaseOptions {
    if config.is_undefined() || config.is_null() {
        return ShowcaseOptions::default();
    }
    serde_wasm_bindgen::from_value(config).unwrap_or_default()
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

fn control_change(category: &str, key: &str, value: JsValue) -> Result<ControlChange, JsError> {
    let value: ControlValue = serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsError::new(&format!("Invalid control value: {}", e)))?;
    ControlChange::from_widget(category, key, value).map_err(|e| JsError::new(&e))
}

// ============================================================================
// Catalogue grid
// ============================================================================

/// The catalogue grid, driven by a browser host.
///
/// The host fetches the manifest and each entry of `fragmentRequests()`,
/// hands the results back, and inserts the returned markup into the page.
#[wasm_bindgen]
pub struct Showcase {
    view: CatalogueView,
}

#[wasm_bindgen]
impl Showcase {
    /// Build the grid from manifest text. A malformed manifest gives an empty
    /// grid in its error state.
    #[wasm_bindgen(constructor)]
    pub fn new(manifest_json: &str, config: JsValue) -> Showcase {
        Showcase {
            view: CatalogueView::from_manifest_json(manifest_json, parse_config(config)),
        }
    }

    /// Why the manifest could not be used, if it could not.
    pub fn failure(&self) -> Option<String> {
        self.view.failure().map(str::to_string)
    }

    /// Ids of the components in manifest order.
    #[wasm_bindgen(js_name = componentIds)]
    pub fn component_ids(&self) -> Array {
        self.view
            .instances()
            .iter()
            .map(|i| JsValue::from_str(i.id()))
            .collect()
    }

    /// `[{componentId, path}]` for every fragment still to fetch.
    #[wasm_bindgen(js_name = fragmentRequests)]
    pub fn fragment_requests(&self) -> Result<JsValue, JsError> {
        to_js(&self.view.fragment_requests())
    }

    /// Hand over a fetched fragment.
    #[wasm_bindgen(js_name = attachFragment)]
    pub fn attach_fragment(&mut self, component_id: &str, markup: &str) -> bool {
        self.view.attach_fragment(component_id, markup)
    }

    /// Report a failed fetch.
    #[wasm_bindgen(js_name = failFragment)]
    pub fn fail_fragment(&mut self, component_id: &str, message: &str) -> bool {
        self.view.fail_fragment(component_id, message)
    }

    /// Apply a widget change (`category` and `key` from its data attributes)
    /// and return the card's new views.
    #[wasm_bindgen(js_name = setField)]
    pub fn set_field(
        &mut self,
        component_id: &str,
        category: &str,
        key: &str,
        value: JsValue,
    ) -> Result<JsValue, JsError> {
        let change = control_change(category, key, value)?;
        match self.view.handle_change(component_id, change) {
            Some(views) => to_js(&views),
            None => Ok(JsValue::NULL),
        }
    }

    /// Current views of one card, or `null` for unknown ids.
    pub fn views(&self, component_id: &str) -> Result<JsValue, JsError> {
        match self.view.views(component_id) {
            Some(views) => to_js(&views),
            None => Ok(JsValue::NULL),
        }
    }

    /// Markup of the components section.
    #[wasm_bindgen(js_name = componentsHtml)]
    pub fn components_html(&self) -> String {
        self.view.render_components_html()
    }

    /// Markup of the pages section.
    #[wasm_bindgen(js_name = pagesHtml)]
    pub fn pages_html(&self) -> String {
        self.view.render_pages_html()
    }

    /// Markup of one card with the given code tab (`template` or `html`).
    #[wasm_bindgen(js_name = componentCard)]
    pub fn component_card(&self, component_id: &str, tab: &str) -> Option<String> {
        let instance = self.view.instance(component_id)?;
        Some(self.view.render_component_card(instance, parse_tab(tab)))
    }

    /// Code panel of one card.
    pub fn code(&self, component_id: &str, tab: &str) -> Option<String> {
        let instance = self.view.instance(component_id)?;
        Some(self.view.render_code(instance, parse_tab(tab)))
    }
}

fn parse_tab(tab: &str) -> CodeTab {
    if tab == CodeTab::Html.as_str() {
        CodeTab::Html
    } else {
        CodeTab::Template
    }
}

// ============================================================================
// Detail view
// ============================================================================

/// The detail view of one component or page.
#[wasm_bindgen]
pub struct DetailPage {
    view: DetailView,
}

#[wasm_bindgen]
impl DetailPage {
    /// Open the item named by `query` (`?type=component&id=button`).
    ///
    /// The manifest degrades to an empty catalogue as in [`Showcase`], but a
    /// detail page has nothing to show without its item, so the constructor
    /// throws. The message is the manifest failure when there was one.
    #[wasm_bindgen(constructor)]
    pub fn new(manifest_json: &str, query: &str, config: JsValue) -> Result<DetailPage, JsError> {
        let options = parse_config(config);
        let grid = CatalogueView::from_manifest_json(manifest_json, options.clone());
        let view = DetailView::open(grid.catalogue(), &DetailQuery::parse(query), options)
            .map_err(|e| JsError::new(grid.failure().unwrap_or(&e.to_string())))?;
        Ok(DetailPage { view })
    }

    /// `component` or `page`.
    pub fn kind(&self) -> String {
        self.view.kind().to_string()
    }

    /// Heading.
    pub fn title(&self) -> String {
        self.view.title().to_string()
    }

    /// Category and description line.
    pub fn meta(&self) -> String {
        self.view.meta()
    }

    /// Control panel markup (empty for pages).
    #[wasm_bindgen(js_name = controlsHtml)]
    pub fn controls_html(&self) -> String {
        self.view.render_controls_html()
    }

    /// Page variant selector entries.
    #[wasm_bindgen(js_name = variantOptions)]
    pub fn variant_options(&self) -> Result<JsValue, JsError> {
        to_js(&self.view.variant_options())
    }

    /// Switch the page variant.
    #[wasm_bindgen(js_name = selectVariant)]
    pub fn select_variant(&mut self, id: &str) -> bool {
        self.view.select_variant(id)
    }

    /// `{componentId, path}` of the fragment to fetch, or `null`.
    #[wasm_bindgen(js_name = fragmentRequest)]
    pub fn fragment_request(&self) -> Result<JsValue, JsError> {
        to_js(&self.view.fragment_request())
    }

    /// Hand over the fetched fragment.
    #[wasm_bindgen(js_name = attachFragment)]
    pub fn attach_fragment(&mut self, markup: &str) -> bool {
        self.view.attach_fragment(markup)
    }

    /// Report a failed fetch.
    #[wasm_bindgen(js_name = failFragment)]
    pub fn fail_fragment(&mut self, message: &str) {
        self.view.fail_fragment(message);
    }

    /// Apply a widget change and return the new views.
    #[wasm_bindgen(js_name = setField)]
    pub fn set_field(&mut self, category: &str, key: &str, value: JsValue) -> Result<JsValue, JsError> {
        let change = control_change(category, key, value)?;
        match self.view.handle_change(change) {
            Some(views) => to_js(&views),
            None => Ok(JsValue::NULL),
        }
    }

    /// `{kind: "srcDoc" | "url", value}` the embedded frame should show.
    pub fn source(&self) -> Result<JsValue, JsError> {
        to_js(&self.view.host().source())
    }

    /// Report the frame's load with the document it contains.
    #[wasm_bindgen(js_name = markLoaded)]
    pub fn mark_loaded(&mut self, document: &str) {
        self.view.host_mut().mark_loaded(document);
    }

    /// Report the load of an inline document.
    #[wasm_bindgen(js_name = markSrcdocLoaded)]
    pub fn mark_srcdoc_loaded(&mut self) -> bool {
        self.view.host_mut().mark_srcdoc_loaded()
    }

    /// Switch the device preset (`mobile`, `tablet`, `desktop`).
    #[wasm_bindgen(js_name = setDevice)]
    pub fn set_device(&mut self, device: &str) -> Result<(), JsError> {
        let device = device.parse::<Device>().map_err(|e| JsError::new(&e))?;
        self.view.set_device(device);
        Ok(())
    }

    /// Class list of the preview container.
    #[wasm_bindgen(js_name = previewClass)]
    pub fn preview_class(&self) -> String {
        self.view.preview_class()
    }

    /// Flip between preview and code.
    #[wasm_bindgen(js_name = toggleCode)]
    pub fn toggle_code(&mut self) -> bool {
        self.view.toggle_code()
    }

    /// Indented markup of the rendered preview.
    #[wasm_bindgen(js_name = codeView)]
    pub fn code_view(&self) -> Result<String, JsError> {
        self.view.code_view().map_err(|e| JsError::new(&e.to_string()))
    }

    /// Template include of the component's state.
    #[wasm_bindgen(js_name = templateSnippet)]
    pub fn template_snippet(&self) -> Option<String> {
        self.view.template_snippet()
    }

    /// `{markup, isFullDocument}` for the conformance checks.
    #[wasm_bindgen(js_name = conformanceInput)]
    pub fn conformance_input(&self) -> Result<JsValue, JsError> {
        let snapshot = self
            .view
            .host()
            .rendered_markup()
            .map_err(|e| JsError::new(&e.to_string()))?;
        to_js(&ConformanceInput::from(snapshot))
    }

    /// Document to submit to an HTML validator.
    #[wasm_bindgen(js_name = validatorDocument)]
    pub fn validator_document(&self) -> Result<String, JsError> {
        let snapshot = self
            .view
            .host()
            .rendered_markup()
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(ConformanceInput::from(snapshot).validator_document(&self.view.options().lang))
    }

    /// Accessibility audit options for the current preview.
    #[wasm_bindgen(js_name = auditOptions)]
    pub fn audit_options(&self) -> Result<JsValue, JsError> {
        let snapshot = self
            .view
            .host()
            .rendered_markup()
            .map_err(|e| JsError::new(&e.to_string()))?;
        to_js(&AuditOptions::for_input(&ConformanceInput::from(snapshot)))
    }
}

// ============================================================================
// Report summaries
// ============================================================================

/// Summarize HTML validator output into counts, badge status and label.
#[wasm_bindgen(js_name = summarizeValidator)]
pub fn summarize_validator(json: &str) -> Result<JsValue, JsError> {
    let summary = ValidatorSummary::from_messages_json(json).map_err(|e| JsError::new(&e.to_string()))?;
    to_js(&BadgeSummary {
        status: summary.status(),
        label: summary.label(),
        errors: summary.errors,
        warnings: summary.warnings,
        score: None,
    })
}

/// Summarize accessibility audit results into counts, score, badge status and label.
#[wasm_bindgen(js_name = summarizeAccessibility)]
pub fn summarize_accessibility(json: &str) -> Result<JsValue, JsError> {
    let summary = AccessibilitySummary::from_results_json(json).map_err(|e| JsError::new(&e.to_string()))?;
    to_js(&BadgeSummary {
        status: summary.status(),
        label: summary.label(),
        errors: summary.violations.len(),
        warnings: summary.alerts,
        score: Some(summary.score),
    })
}

/// What a result badge shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeSummary {
    /// `success`, `warning` or `error`.
    pub status: vitrine_showcase::BadgeStatus,
    /// Badge text.
    pub label: String,
    /// Validator errors, or accessibility violations.
    pub errors: usize,
    /// Validator warnings, or accessibility alert nodes.
    pub warnings: usize,
    /// Accessibility score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
}
