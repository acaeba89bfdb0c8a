//! Built-in registry for the stock component library.
//!
//! Covers the components whose markup the generic rules cannot drive:
//! `input` keeps its control inside a wrapper, `card` and `navbar` show and
//! hide sub-elements and write text into named slots.

use super::types::{CreateElement, FieldEffect, OverrideRegistry, RootCondition, Target};
use crate::state::FieldCategory::{Content, Variants};

const INPUT_ERROR_CLASS: &str = "input-group--error";

/// Creates the default registry.
///
/// # Example
///
/// ```
/// use vitrine_core::registry::default_registry;
/// use vitrine_core::FieldCategory;
///
/// let registry = default_registry();
/// assert_eq!(registry.class_root("button"), "btn");
/// assert!(registry.override_for("card", FieldCategory::Content, "title").is_some());
/// ```
pub fn default_registry() -> OverrideRegistry {
    let mut registry = OverrideRegistry::default();

    for (component, class) in [
        ("button", "btn"),
        ("card", "card"),
        ("input", "input"),
        ("navbar", "navbar"),
    ] {
        registry.set_class_root(component, class);
    }

    register_input(&mut registry);
    register_card(&mut registry);
    register_navbar(&mut registry);

    registry
}

fn register_input(registry: &mut OverrideRegistry) {
    let control = || Target::first("input");

    registry.register("input", Variants, "disabled", vec![FieldEffect::disabled(control())]);
    registry.register(
        "input",
        Variants,
        "hasError",
        vec![FieldEffect::class_toggle(Target::Root, INPUT_ERROR_CLASS)],
    );
    registry.register(
        "input",
        Variants,
        "type",
        vec![FieldEffect::attribute_set(control(), "type")],
    );
    registry.register(
        "input",
        Variants,
        "size",
        vec![FieldEffect::ClassSwap {
            target: control(),
            prefix: Some("input--".to_string()),
            baseline: Some("normal".to_string()),
        }],
    );

    registry.register(
        "input",
        Content,
        "label",
        vec![FieldEffect::text_write(Target::first(".input-group__label"))],
    );
    registry.register(
        "input",
        Content,
        "placeholder",
        vec![FieldEffect::attribute_set(control(), "placeholder")],
    );
    registry.register(
        "input",
        Content,
        "helper",
        vec![FieldEffect::TextWrite {
            target: Target::first(".input-group__helper"),
            create: Some(CreateElement {
                tag: "span".to_string(),
                class: "input-group__helper".to_string(),
                parent: None,
            }),
            when: Some(RootCondition::LacksClass {
                class: INPUT_ERROR_CLASS.to_string(),
            }),
        }],
    );
    registry.register(
        "input",
        Content,
        "error",
        vec![FieldEffect::TextWrite {
            target: Target::first(".input-group__error"),
            create: Some(CreateElement {
                tag: "span".to_string(),
                class: "input-group__error".to_string(),
                parent: None,
            }),
            when: Some(RootCondition::HasClass {
                class: INPUT_ERROR_CLASS.to_string(),
            }),
        }],
    );
}

fn register_card(registry: &mut OverrideRegistry) {
    registry.register(
        "card",
        Variants,
        "hasHeader",
        vec![FieldEffect::visibility(Target::first(".card__header"))],
    );
    registry.register(
        "card",
        Variants,
        "hasFooter",
        vec![FieldEffect::visibility(Target::first(".card__footer"))],
    );
    registry.register(
        "card",
        Content,
        "title",
        vec![FieldEffect::text_write(Target::first(".card__title"))],
    );
    registry.register(
        "card",
        Content,
        "subtitle",
        vec![FieldEffect::TextWrite {
            target: Target::first(".card__subtitle"),
            create: Some(CreateElement {
                tag: "p".to_string(),
                class: "card__subtitle".to_string(),
                parent: Some(".card__header".to_string()),
            }),
            when: None,
        }],
    );
    registry.register(
        "card",
        Content,
        "body",
        vec![FieldEffect::text_write(Target::first(".card__body"))],
    );
}

fn register_navbar(registry: &mut OverrideRegistry) {
    let search = r#"[data-element="search"]"#;
    let button = r#"[data-element="button"]"#;

    registry.register(
        "navbar",
        Variants,
        "withSearch",
        vec![FieldEffect::visibility(Target::first(search))],
    );
    registry.register(
        "navbar",
        Variants,
        "withButton",
        vec![FieldEffect::visibility(Target::first(button))],
    );
    registry.register(
        "navbar",
        Content,
        "logo",
        vec![FieldEffect::text_write(Target::first(".navbar__logo-text"))],
    );
    registry.register(
        "navbar",
        Content,
        "buttonText",
        vec![FieldEffect::text_write(Target::first(button))],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Selector;

    #[test]
    fn default_registry_selectors_parse() {
        let registry = default_registry();
        for selector in registry.selectors() {
            assert!(Selector::parse(selector).is_ok(), "{selector}");
        }
    }

    #[test]
    fn default_registry_covers_stock_components() {
        let registry = default_registry();
        assert_eq!(registry.class_root("navbar"), "navbar");
        assert_eq!(registry.overrides_for("input").count(), 8);
        assert_eq!(registry.overrides_for("card").count(), 5);
        assert_eq!(registry.overrides_for("navbar").count(), 4);
        assert_eq!(registry.overrides_for("button").count(), 0);
    }

    #[test]
    fn default_registry_serializes_to_json() {
        let json = serde_json::to_string(&default_registry()).unwrap();
        let parsed: OverrideRegistry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, default_registry());
    }
}
