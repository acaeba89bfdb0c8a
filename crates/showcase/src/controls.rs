//! Control panel binder: one widget per schema field and the changes they emit.

use serde::{Deserialize, Serialize};
use vitrine_core::{ComponentSchema, ComponentState, FieldCategory, FieldType, FieldValue};

use crate::html::{attr, text};

/// One control widget, seeded from the current state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Control {
    /// Namespace the field lives in.
    pub category: FieldCategory,
    /// Field key.
    pub key: String,
    /// Visible label (the key when the schema has none).
    pub label: String,
    /// Widget and its current value.
    pub kind: ControlKind,
}

/// Widget kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "widget", rename_all = "camelCase")]
pub enum ControlKind {
    /// Checkbox.
    #[serde(rename_all = "camelCase")]
    Toggle {
        /// Current state.
        checked: bool,
    },
    /// Dropdown over the field's options.
    #[serde(rename_all = "camelCase")]
    Dropdown {
        /// Options in declaration order.
        options: Vec<String>,
        /// Currently selected option.
        selected: String,
    },
    /// Text entry (`<input>` of the field type, or `<textarea>`).
    #[serde(rename_all = "camelCase")]
    TextEntry {
        /// `type` attribute of the input; `textarea` for multi-line entry.
        input_type: String,
        /// Current text.
        value: String,
    },
}

/// Build the controls of a component: variants first, then content, in
/// declaration order.
pub fn build_controls(schema: &ComponentSchema, state: &ComponentState) -> Vec<Control> {
    let mut controls = Vec::with_capacity(schema.variants.len() + schema.content.len());
    for category in FieldCategory::ALL {
        for (key, spec) in schema.fields(category).iter() {
            let value = state.value(category, key).unwrap_or(&spec.default);
            let kind = match &spec.field_type {
                FieldType::Checkbox => ControlKind::Toggle {
                    checked: value.is_truthy(),
                },
                FieldType::Select => ControlKind::Dropdown {
                    options: spec.options.clone(),
                    selected: value.as_text(),
                },
                other => ControlKind::TextEntry {
                    input_type: other.as_str().to_string(),
                    value: value.as_text(),
                },
            };
            let label = if spec.label.is_empty() {
                key.to_string()
            } else {
                spec.label.clone()
            };
            controls.push(Control {
                category,
                key: key.to_string(),
                label,
                kind,
            });
        }
    }
    controls
}

/// Render a control panel for one component instance.
///
/// Every widget carries `data-key` and `data-category`, which is what the
/// host reads back into a [`ControlChange`].
pub fn render_controls(component_id: &str, controls: &[Control]) -> String {
    let mut html = String::from(
        "<div class=\"component-showcase__controls\"><div class=\"component-showcase__controls-title\">Customize</div>",
    );
    for control in controls {
        render_control(component_id, control, &mut html);
    }
    html.push_str("</div>");
    html
}

fn render_control(component_id: &str, control: &Control, html: &mut String) {
    let id = format!("control-{}-{}-{}", component_id, control.category, control.key);
    let data = format!(
        "data-key=\"{}\" data-category=\"{}\"",
        attr(&control.key),
        control.category
    );

    html.push_str("<div class=\"component-showcase__controls-group\">");
    match &control.kind {
        ControlKind::Toggle { checked } => {
            html.push_str(&format!(
                "<label class=\"component-showcase__toggle\"><input type=\"checkbox\" id=\"{}\" {}{}><span>{}</span></label>",
                attr(&id),
                data,
                if *checked { " checked=\"\"" } else { "" },
                text(&control.label)
            ));
        }
        ControlKind::Dropdown { options, selected } => {
            push_label(html, &id, &control.label);
            html.push_str(&format!("<select id=\"{}\" {}>", attr(&id), data));
            for option in options {
                html.push_str(&format!(
                    "<option value=\"{}\"{}>{}</option>",
                    attr(option),
                    if option == selected { " selected=\"\"" } else { "" },
                    text(option)
                ));
            }
            html.push_str("</select>");
        }
        ControlKind::TextEntry { input_type, value } if input_type == "textarea" => {
            push_label(html, &id, &control.label);
            html.push_str(&format!(
                "<textarea id=\"{}\" {} rows=\"3\">{}</textarea>",
                attr(&id),
                data,
                text(value)
            ));
        }
        ControlKind::TextEntry { input_type, value } => {
            push_label(html, &id, &control.label);
            html.push_str(&format!(
                "<input type=\"{}\" id=\"{}\" {} value=\"{}\">",
                attr(input_type),
                attr(&id),
                data,
                attr(value)
            ));
        }
    }
    html.push_str("</div>");
}

fn push_label(html: &mut String, id: &str, label: &str) {
    html.push_str(&format!("<label for=\"{}\">{}</label>", attr(id), text(label)));
}

/// Value read back from a widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlValue {
    /// Checkbox state.
    Checked(bool),
    /// Dropdown or text entry value.
    Text(String),
}

impl From<ControlValue> for FieldValue {
    fn from(value: ControlValue) -> Self {
        match value {
            ControlValue::Checked(b) => FieldValue::Bool(b),
            ControlValue::Text(s) => FieldValue::Text(s),
        }
    }
}

/// A widget change, addressed by the widget's `data-category` and `data-key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlChange {
    /// Field namespace.
    pub category: FieldCategory,
    /// Field key.
    pub key: String,
    /// New value.
    pub value: ControlValue,
}

impl ControlChange {
    /// A checkbox change.
    pub fn checked(category: FieldCategory, key: impl Into<String>, checked: bool) -> Self {
        Self {
            category,
            key: key.into(),
            value: ControlValue::Checked(checked),
        }
    }

    /// A dropdown or text change.
    pub fn text(category: FieldCategory, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            category,
            key: key.into(),
            value: ControlValue::Text(value.into()),
        }
    }

    /// Build a change from raw widget data attributes.
    pub fn from_widget(category: &str, key: &str, value: ControlValue) -> Result<Self, String> {
        Ok(Self {
            category: category.parse()?,
            key: key.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::{FieldSpec, init_state};

    fn schema() -> ComponentSchema {
        ComponentSchema::new("button")
            .with_variant("size", FieldSpec::select("Size", ["small", "normal"], "normal"))
            .with_variant("disabled", FieldSpec::checkbox("", false))
            .with_content("text", FieldSpec::text("Text", "Go <now>"))
            .with_content("note", FieldSpec::textarea("Note", "a & b"))
    }

    #[test]
    fn controls_follow_declaration_order() {
        let schema = schema();
        let controls = build_controls(&schema, &init_state(&schema));
        let keys: Vec<(&str, FieldCategory)> = controls
            .iter()
            .map(|c| (c.key.as_str(), c.category))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("size", FieldCategory::Variants),
                ("disabled", FieldCategory::Variants),
                ("text", FieldCategory::Content),
                ("note", FieldCategory::Content),
            ]
        );
        assert_eq!(controls[1].label, "disabled");
        assert_eq!(
            controls[0].kind,
            ControlKind::Dropdown {
                options: vec!["small".to_string(), "normal".to_string()],
                selected: "normal".to_string(),
            }
        );
    }

    #[test]
    fn controls_reflect_current_state() {
        let schema = schema();
        let mut state = init_state(&schema);
        state.set_field(&schema, FieldCategory::Variants, "disabled", true.into());
        let controls = build_controls(&schema, &state);
        assert_eq!(controls[1].kind, ControlKind::Toggle { checked: true });
    }

    #[test]
    fn renders_escaped_widgets() {
        let schema = schema();
        let html = render_controls("button", &build_controls(&schema, &init_state(&schema)));
        assert!(html.contains(r#"<option value="normal" selected="">normal</option>"#));
        assert!(html.contains(r#"<input type="checkbox" id="control-button-variant-disabled" data-key="disabled" data-category="variant">"#));
        assert!(html.contains(r#"value="Go &lt;now&gt;""#));
        assert!(html.contains(r#"rows="3">a &amp; b</textarea>"#));
    }

    #[test]
    fn change_from_widget_attributes() {
        let change =
            ControlChange::from_widget("variant", "disabled", ControlValue::Checked(true)).unwrap();
        assert_eq!(change, ControlChange::checked(FieldCategory::Variants, "disabled", true));
        assert!(ControlChange::from_widget("style", "x", ControlValue::Text("y".into())).is_err());

        let change: ControlChange =
            serde_json::from_str(r#"{"category": "content", "key": "text", "value": "Hi"}"#).unwrap();
        assert_eq!(change, ControlChange::text(FieldCategory::Content, "text", "Hi"));
    }
}
