//! Preview host: the isolated document a component or page is rendered in.
//!
//! Components are shown through a generated host document (`srcdoc`) that
//! embeds the projected markup inside `#component-preview`. Pages are loaded
//! by URL, with the selected variant's data as query parameters. The host
//! records the document the embedded context reported on load; the markup
//! snapshot is only available once that document has content.

use serde::Serialize;
use url::form_urlencoded;
use vitrine_core::{Fragment, PageEntry, PageVariant};

use crate::error::PreviewError;
use crate::html::{attr, text};
use crate::options::ShowcaseOptions;

/// Id of the element that wraps the component in host documents.
pub const COMPONENT_CONTAINER_ID: &str = "component-preview";

/// What the host shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PreviewKind {
    /// A projected component inside a generated host document.
    Component,
    /// A compiled page loaded by URL.
    Page,
}

/// How the embedded context gets its document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum PreviewSource {
    /// Inline document.
    SrcDoc(String),
    /// Document URL.
    Url(String),
}

/// Markup currently rendered by a host, as handed to conformance checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkupSnapshot {
    /// The component root's markup, or the full page document.
    pub markup: String,
    /// Whether `markup` is a whole document.
    pub is_full_document: bool,
}

/// An isolated rendering context for one component or page.
#[derive(Debug, Clone)]
pub struct PreviewHost {
    kind: PreviewKind,
    source: Option<PreviewSource>,
    loaded: Option<String>,
}

impl PreviewHost {
    /// A host with nothing to show yet.
    pub fn empty(kind: PreviewKind) -> Self {
        Self {
            kind,
            source: None,
            loaded: None,
        }
    }

    /// A host showing projected component markup.
    pub fn for_component(title: &str, projected: &str, options: &ShowcaseOptions) -> Self {
        let mut host = Self::empty(PreviewKind::Component);
        host.show_component(title, projected, options);
        host
    }

    /// A host showing a page, optionally with a variant's parameters.
    pub fn for_page(page: &PageEntry, variant: Option<&PageVariant>) -> Self {
        let mut host = Self::empty(PreviewKind::Page);
        host.show_page(page, variant);
        host
    }

    /// What the host shows.
    pub fn kind(&self) -> PreviewKind {
        self.kind
    }

    /// Current document source, if any.
    pub fn source(&self) -> Option<&PreviewSource> {
        self.source.as_ref()
    }

    /// Replace the shown component markup. The previous load no longer counts.
    pub fn show_component(&mut self, title: &str, projected: &str, options: &ShowcaseOptions) {
        self.kind = PreviewKind::Component;
        self.set_source(PreviewSource::SrcDoc(component_document(title, projected, options)));
    }

    /// Show the error document for a component whose fragment failed to load.
    pub fn show_component_error(&mut self, component_id: &str, message: &str, options: &ShowcaseOptions) {
        self.kind = PreviewKind::Component;
        self.set_source(PreviewSource::SrcDoc(component_error_document(
            component_id,
            message,
            options,
        )));
    }

    /// Replace the shown page. The previous load no longer counts.
    pub fn show_page(&mut self, page: &PageEntry, variant: Option<&PageVariant>) {
        self.kind = PreviewKind::Page;
        self.set_source(PreviewSource::Url(page_url(page, variant)));
    }

    fn set_source(&mut self, source: PreviewSource) {
        self.source = Some(source);
        self.loaded = None;
    }

    /// Record the embedded context's load signal with the document it contains.
    pub fn mark_loaded(&mut self, document: impl Into<String>) {
        if self.source.is_none() {
            log::debug!("Ignoring load signal of an empty preview");
            return;
        }
        self.loaded = Some(document.into());
    }

    /// Record the load of an inline document, whose content is the source itself.
    ///
    /// Returns `false` for URL sources, whose content only the host can read.
    pub fn mark_srcdoc_loaded(&mut self) -> bool {
        match &self.source {
            Some(PreviewSource::SrcDoc(document)) => {
                self.loaded = Some(document.clone());
                true
            }
            _ => false,
        }
    }

    /// Whether the current content has signalled load.
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// The markup currently rendered: the component root for components, the
    /// whole document for pages.
    pub fn rendered_markup(&self) -> Result<MarkupSnapshot, PreviewError> {
        let document = self.loaded.as_deref().ok_or(PreviewError::NotLoaded)?;
        if document.trim().is_empty() {
            return Err(PreviewError::EmptyContent);
        }

        match self.kind {
            PreviewKind::Page => Ok(MarkupSnapshot {
                markup: document.to_string(),
                is_full_document: true,
            }),
            PreviewKind::Component => {
                let parsed = Fragment::parse(document);
                let container = parsed
                    .find_by_id(COMPONENT_CONTAINER_ID)
                    .ok_or(PreviewError::NoComponentRoot)?;
                match container.first_element_child() {
                    Some(root) => Ok(MarkupSnapshot {
                        markup: root.outer_html(),
                        is_full_document: false,
                    }),
                    None if container.text_content().trim().is_empty() => {
                        Err(PreviewError::EmptyContent)
                    }
                    None => Err(PreviewError::NoComponentRoot),
                }
            }
        }
    }
}

/// Host document embedding projected component markup.
pub fn component_document(title: &str, projected: &str, options: &ShowcaseOptions) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <link rel="stylesheet" href="{stylesheet}">
  <style>
    body {{ min-height: 100vh; margin: 0; display: flex; flex-wrap: wrap; align-items: center; justify-content: center; background: #f7fafc; }}
  </style>
</head>
<body>
  <div id="{container}">{projected}</div>
</body>
</html>"#,
        lang = attr(&options.lang),
        title = text(title),
        stylesheet = attr(&options.stylesheet_href),
        container = COMPONENT_CONTAINER_ID,
    )
}

/// Host document shown when a component's fragment could not be loaded.
pub fn component_error_document(component_id: &str, message: &str, options: &ShowcaseOptions) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}"><body class="preview-error">
  <p>Failed to load component "{id}"</p>
  <p class="preview-error__message">{message}</p>
</body></html>"#,
        lang = attr(&options.lang),
        id = text(component_id),
        message = text(message),
    )
}

/// URL of a compiled page, with the variant's data as query parameters.
pub fn page_url(page: &PageEntry, variant: Option<&PageVariant>) -> String {
    let mut url = format!("{}.html", page.path);
    let pairs = variant.map(PageVariant::query_pairs).unwrap_or_default();
    if !pairs.is_empty() {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        url.push('?');
        url.push_str(&query);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> PageEntry {
        serde_json::from_str(
            r#"{"id": "landing", "name": "Landing", "path": "landing", "variants": [
                {"id": "default", "name": "Default"},
                {"id": "promo", "name": "Promo", "data": {"banner": "Spring sale", "count": 2}}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn page_urls_carry_variant_data() {
        let page = page();
        assert_eq!(page_url(&page, None), "landing.html");
        assert_eq!(page_url(&page, page.variant("default")), "landing.html");
        assert_eq!(
            page_url(&page, page.variant("promo")),
            "landing.html?banner=Spring+sale&count=2"
        );
    }

    #[test]
    fn snapshot_waits_for_load() {
        let mut host = PreviewHost::for_component(
            "Button",
            r#"<button class="btn">Go</button>"#,
            &ShowcaseOptions::default(),
        );
        assert_eq!(host.rendered_markup(), Err(PreviewError::NotLoaded));
        assert!(host.mark_srcdoc_loaded());
        assert_eq!(
            host.rendered_markup(),
            Ok(MarkupSnapshot {
                markup: r#"<button class="btn">Go</button>"#.to_string(),
                is_full_document: false,
            })
        );

        host.show_component("Button", "<button class=\"btn\">Stop</button>", &ShowcaseOptions::default());
        assert!(!host.is_loaded());
    }

    #[test]
    fn empty_documents_are_rejected() {
        let mut host = PreviewHost::for_page(&page(), None);
        host.mark_loaded("   ");
        assert_eq!(host.rendered_markup(), Err(PreviewError::EmptyContent));

        let mut host = PreviewHost::for_component("Button", "", &ShowcaseOptions::default());
        host.mark_srcdoc_loaded();
        assert_eq!(host.rendered_markup(), Err(PreviewError::EmptyContent));

        let mut host = PreviewHost::empty(PreviewKind::Component);
        host.mark_loaded("<p>x</p>");
        assert_eq!(host.rendered_markup(), Err(PreviewError::NotLoaded));
    }

    #[test]
    fn page_snapshot_is_the_full_document() {
        let mut host = PreviewHost::for_page(&page(), None);
        assert!(!host.mark_srcdoc_loaded());
        host.mark_loaded("<!DOCTYPE html><html><body><main>Hi</main></body></html>");
        let snapshot = host.rendered_markup().unwrap();
        assert!(snapshot.is_full_document);
        assert!(snapshot.markup.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn error_document_has_no_component_root() {
        let mut host = PreviewHost::empty(PreviewKind::Component);
        host.show_component_error("card", "Failed to load components/card/card.html: not found", &ShowcaseOptions::default());
        host.mark_srcdoc_loaded();
        assert_eq!(host.rendered_markup(), Err(PreviewError::NoComponentRoot));
    }
}
