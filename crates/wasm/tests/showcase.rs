use serde::Deserialize;
use vitrine_wasm::{DetailPage, Showcase, summarize_accessibility, summarize_validator};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

const MANIFEST: &str = r#"{
    "components": [{
        "id": "button",
        "name": "Button",
        "variants": {
            "size": {"type": "select", "label": "Size", "options": ["small", "normal", "large"], "default": "normal"},
            "disabled": {"type": "checkbox", "label": "Disabled", "default": false}
        },
        "content": {"text": {"type": "text", "label": "Text", "default": "Click me"}}
    }],
    "pages": [{"id": "landing", "name": "Landing", "variants": [{"id": "promo", "name": "Promo", "data": {"promo": "1"}}]}]
}"#;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Views {
    preview: Option<String>,
    template_snippet: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Request {
    component_id: String,
    path: String,
}

#[derive(Deserialize, Debug)]
struct Badge {
    status: String,
    label: String,
}

#[wasm_bindgen_test]
fn grid_round_trip() {
    let mut showcase = Showcase::new(MANIFEST, JsValue::UNDEFINED);
    assert!(showcase.failure().is_none());

    let requests: Vec<Request> =
        serde_wasm_bindgen::from_value(showcase.fragment_requests().unwrap()).unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].component_id, "button");
    assert_eq!(requests[0].path, "components/button/button.html");

    assert!(showcase.attach_fragment("button", "<button class=\"btn\">Click me</button>"));
    let views: Views = serde_wasm_bindgen::from_value(
        showcase
            .set_field("button", "variant", "disabled", JsValue::TRUE)
            .unwrap(),
    )
    .unwrap();
    assert_eq!(
        views.preview.as_deref(),
        Some("<button class=\"btn btn--disabled\" disabled=\"\" aria-disabled=\"true\">Click me</button>")
    );
    assert!(views.template_snippet.contains("disabled=true"));
    assert!(showcase.components_html().contains("id=\"component-button\""));
}

#[wasm_bindgen_test]
fn malformed_manifest_gives_error_state() {
    let showcase = Showcase::new("{", JsValue::NULL);
    assert!(showcase.failure().is_some());
    assert!(showcase.components_html().contains("Error while loading data"));
}

#[wasm_bindgen_test]
fn malformed_manifest_fails_both_views_alike() {
    let showcase = Showcase::new("{", JsValue::NULL);
    assert!(showcase.failure().is_some());
    assert!(DetailPage::new("{", "?type=component&id=button", JsValue::NULL).is_err());
    assert!(DetailPage::new(MANIFEST, "?type=component&id=missing", JsValue::NULL).is_err());
}

#[wasm_bindgen_test]
fn detail_page_flow() {
    let mut detail = DetailPage::new(MANIFEST, "?type=component&id=button", JsValue::UNDEFINED).unwrap();
    assert_eq!(detail.kind(), "component");
    assert!(detail.attach_fragment("<button class=\"btn\">Click me</button>"));
    detail
        .set_field("content", "text", JsValue::from_str("Save"))
        .unwrap();
    assert!(detail.mark_srcdoc_loaded());
    assert_eq!(detail.code_view().unwrap(), "<button class=\"btn\">Save</button>");
    assert!(detail.validator_document().unwrap().contains("<title>Component Test</title>"));

    detail.set_device("tablet").unwrap();
    assert_eq!(detail.preview_class(), "page-showcase__preview page-showcase__preview--tablet");
    assert!(detail.set_device("watch").is_err());

    assert!(DetailPage::new(MANIFEST, "type=component&id=tooltip", JsValue::UNDEFINED).is_err());
}

#[wasm_bindgen_test]
fn badge_summaries() {
    let badge: Badge =
        serde_wasm_bindgen::from_value(summarize_validator(r#"{"messages": [{"type": "warning"}]}"#).unwrap())
            .unwrap();
    assert_eq!(badge.status, "warning");
    assert_eq!(badge.label, "1 warning(s)");

    let badge: Badge = serde_wasm_bindgen::from_value(
        summarize_accessibility(r#"{"violations": [], "passes": [{}]}"#).unwrap(),
    )
    .unwrap();
    assert_eq!(badge.status, "success");
    assert_eq!(badge.label, "100%");
}
