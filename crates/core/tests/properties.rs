use vitrine_core::{
    Catalogue, ComponentSchema, FieldCategory, FieldSpec, FieldValue, Fragment, Selector,
    init_state, project, template_arguments, template_literal, to_template_snippet,
};

const MANIFEST: &str = r#"{
    "components": [
        {
            "id": "button",
            "name": "Button",
            "variants": {
                "variant": {"type": "select", "label": "Variant", "options": ["primary", "secondary", "ghost"], "default": "primary"},
                "size": {"type": "select", "label": "Size", "options": ["small", "normal", "large"], "default": "normal"},
                "disabled": {"type": "checkbox", "label": "Disabled", "default": false}
            },
            "content": {
                "text": {"type": "text", "label": "Text", "default": "Click me"}
            }
        },
        {
            "id": "input",
            "name": "Input",
            "variants": {
                "disabled": {"type": "checkbox", "label": "Disabled", "default": false},
                "hasError": {"type": "checkbox", "label": "Error state", "default": false},
                "type": {"type": "select", "label": "Type", "options": ["text", "email", "password"], "default": "text"},
                "size": {"type": "select", "label": "Size", "options": ["small", "normal", "large"], "default": "normal"}
            },
            "content": {
                "label": {"type": "text", "label": "Label", "default": "Email"},
                "placeholder": {"type": "text", "label": "Placeholder", "default": "you@example.com"},
                "helper": {"type": "text", "label": "Helper", "default": ""},
                "error": {"type": "text", "label": "Error", "default": "Invalid address"}
            }
        },
        {
            "id": "card",
            "name": "Card",
            "fullWidth": true,
            "variants": {
                "hasHeader": {"type": "checkbox", "label": "Header", "default": true},
                "hasFooter": {"type": "checkbox", "label": "Footer", "default": true},
                "interactive": {"type": "checkbox", "label": "Interactive", "default": false}
            },
            "content": {
                "title": {"type": "text", "label": "Title", "default": "Card title"},
                "subtitle": {"type": "text", "label": "Subtitle", "default": ""},
                "body": {"type": "textarea", "label": "Body", "default": "Body text"}
            }
        },
        {
            "id": "navbar",
            "name": "Navbar",
            "variants": {
                "withSearch": {"type": "checkbox", "label": "Search", "default": true},
                "withButton": {"type": "checkbox", "label": "Button", "default": true},
                "sticky": {"type": "checkbox", "label": "Sticky", "default": false}
            },
            "content": {
                "logo": {"type": "text", "label": "Logo", "default": "Brand"},
                "buttonText": {"type": "text", "label": "Button text", "default": "Sign in"}
            }
        }
    ],
    "pages": []
}"#;

const BUTTON: &str = r#"<button class="btn">Click me</button>"#;
const INPUT: &str = r#"<div class="input-group"><label class="input-group__label" for="email">Email</label><input class="input" id="email" type="text" placeholder="you@example.com"></div>"#;
const CARD: &str = r##"<article class="card"><header class="card__header"><h3 class="card__title">Card title</h3></header><div class="card__body">Body text</div><footer class="card__footer"><a href="#">More</a></footer></article>"##;
const NAVBAR: &str = r##"<nav class="navbar"><span class="navbar__logo-text">Brand</span><div data-element="search"><input type="search"></div><a class="btn" data-element="button" href="#">Sign in</a></nav>"##;

fn catalogue() -> Catalogue {
    Catalogue::from_json("data/showcase.json", MANIFEST).unwrap()
}

fn schema(id: &str) -> ComponentSchema {
    catalogue().component(id).cloned().unwrap()
}

fn base_markup(id: &str) -> &'static str {
    match id {
        "button" => BUTTON,
        "input" => INPUT,
        "card" => CARD,
        "navbar" => NAVBAR,
        other => panic!("no markup for {other}"),
    }
}

fn root_classes(markup: &str) -> Vec<String> {
    Fragment::parse(markup)
        .root()
        .unwrap()
        .classes()
        .map(str::to_string)
        .collect()
}

#[test]
fn fresh_state_template_arguments_equal_defaults() {
    for schema in &catalogue().components {
        let state = init_state(schema);
        let expected: Vec<String> = schema
            .variants
            .iter()
            .chain(schema.content.iter())
            .map(|(key, spec)| format!("{key}={}", template_literal(&spec.default)))
            .collect();
        assert_eq!(template_arguments(&state), expected, "{}", schema.id);
        assert!(to_template_snippet(&schema.id, &state).contains(&expected.join(", ")));
    }
}

#[test]
fn projection_is_idempotent() {
    for schema in &catalogue().components {
        let mut state = init_state(schema);
        for (key, spec) in schema.variants.iter() {
            let value = match spec.options.last() {
                Some(option) => FieldValue::from(option.as_str()),
                None => FieldValue::Bool(!spec.default.is_truthy()),
            };
            state.set_field(schema, FieldCategory::Variants, key, value);
        }
        for key in schema.content.keys() {
            state.set_field(schema, FieldCategory::Content, key, format!("New {key}").into());
        }

        let base = base_markup(&schema.id);
        let once = project(base, schema, &state);
        assert_eq!(project(base, schema, &state), once, "{}", schema.id);
        assert_eq!(project(&once, schema, &state), once, "{}", schema.id);
    }
}

#[test]
fn select_leaves_exactly_one_option_class() {
    let schema = schema("button");
    let options = ["primary", "secondary", "ghost"];
    let mut state = init_state(&schema);
    for value in options {
        state.set_field(&schema, FieldCategory::Variants, "variant", value.into());
        let classes = root_classes(&project(BUTTON, &schema, &state));
        let option_classes: Vec<&String> = classes
            .iter()
            .filter(|class| options.iter().any(|o| **class == format!("btn--{o}")))
            .collect();
        assert_eq!(option_classes, vec![&format!("btn--{value}")]);
    }
}

#[test]
fn disabled_toggles_attribute_and_aria() {
    let schema = schema("button");
    let mut state = init_state(&schema);

    state.set_field(&schema, FieldCategory::Variants, "disabled", true.into());
    let on = Fragment::parse(&project(BUTTON, &schema, &state));
    let root = on.root().unwrap();
    assert_eq!(root.attribute("disabled"), Some(""));
    assert_eq!(root.attribute("aria-disabled"), Some("true"));

    state.set_field(&schema, FieldCategory::Variants, "disabled", false.into());
    let off = Fragment::parse(&project(BUTTON, &schema, &state));
    let root = off.root().unwrap();
    assert!(!root.has_attribute("disabled"));
    assert!(!root.has_attribute("aria-disabled"));
}

#[test]
fn content_substitution_touches_only_matching_node() {
    let schema = ComponentSchema::new("note").with_content("greeting", FieldSpec::text("Greeting", "Hello"));
    let mut state = init_state(&schema);
    state.set_field(&schema, FieldCategory::Content, "greeting", "Bonjour".into());
    let base = r#"<div class="note"><p>Hello</p><p>Hello there</p><span>World</span></div>"#;
    assert_eq!(
        project(base, &schema, &state),
        r#"<div class="note"><p>Bonjour</p><p>Hello there</p><span>World</span></div>"#
    );
}

#[test]
fn button_size_baseline_adds_no_class() {
    let schema = ComponentSchema::new("button").with_variant(
        "size",
        FieldSpec::select("Size", ["small", "normal", "large"], "normal"),
    );
    let mut state = init_state(&schema);
    let base = r#"<button class="btn">X</button>"#;

    state.set_field(&schema, FieldCategory::Variants, "size", "large".into());
    assert_eq!(project(base, &schema, &state), r#"<button class="btn btn--large">X</button>"#);

    state.set_field(&schema, FieldCategory::Variants, "size", "normal".into());
    assert_eq!(project(base, &schema, &state), r#"<button class="btn">X</button>"#);
}

#[test]
fn input_disabled_and_label_apply_together() {
    let schema = schema("input");
    let mut state = init_state(&schema);
    state.set_field(&schema, FieldCategory::Variants, "disabled", true.into());
    state.set_field(&schema, FieldCategory::Content, "label", "Work email".into());

    insta::assert_snapshot!(project(INPUT, &schema, &state), @r#"<div class="input-group"><label class="input-group__label" for="email">Work email</label><input class="input" id="email" type="text" placeholder="you@example.com" disabled="" aria-disabled="true"></div>"#);
}

#[test]
fn unknown_key_leaves_state_unchanged() {
    let schema = schema("button");
    let mut state = init_state(&schema);
    let before = state.clone();
    assert!(!state.set_field(&schema, FieldCategory::Variants, "colour", "red".into()));
    assert!(!state.set_field(&schema, FieldCategory::Content, "disabled", true.into()));
    assert_eq!(state, before);
}

#[test]
fn instances_do_not_share_state() {
    let schema = schema("button");
    let mut first = init_state(&schema);
    let second = init_state(&schema);
    first.set_field(&schema, FieldCategory::Variants, "variant", "ghost".into());
    assert!(project(BUTTON, &schema, &first).contains("btn--ghost"));
    assert!(project(BUTTON, &schema, &second).contains("btn--primary"));
}

#[test]
fn input_error_state_controls_error_and_helper_text() {
    let schema = schema("input");
    let mut state = init_state(&schema);
    state.set_field(&schema, FieldCategory::Content, "helper", "We never share it".into());
    let helper = project(INPUT, &schema, &state);
    assert!(helper.ends_with(r#"<span class="input-group__helper">We never share it</span></div>"#));
    assert!(!helper.contains("input-group__error"));

    state.set_field(&schema, FieldCategory::Variants, "hasError", true.into());
    let error = project(INPUT, &schema, &state);
    assert!(error.starts_with(r#"<div class="input-group input-group--error">"#));
    assert!(error.ends_with(r#"<span class="input-group__error">Invalid address</span></div>"#));
    assert!(!error.contains("input-group__helper"));
}

#[test]
fn input_size_and_type_target_the_inner_control() {
    let schema = schema("input");
    let mut state = init_state(&schema);
    state.set_field(&schema, FieldCategory::Variants, "size", "large".into());
    state.set_field(&schema, FieldCategory::Variants, "type", "email".into());
    let fragment = Fragment::parse(&project(INPUT, &schema, &state));
    let root = fragment.root().unwrap();
    assert_eq!(root.attribute("class"), Some("input-group"));
    let control = root.find_first(&Selector::parse("input").unwrap()).unwrap();
    assert_eq!(control.attribute("class"), Some("input input--large"));
    assert_eq!(control.attribute("type"), Some("email"));
}

#[test]
fn card_hides_header_and_creates_subtitle() {
    let schema = schema("card");
    let mut state = init_state(&schema);
    state.set_field(&schema, FieldCategory::Variants, "hasHeader", false.into());
    state.set_field(&schema, FieldCategory::Content, "subtitle", "Sub".into());
    insta::assert_snapshot!(project(CARD, &schema, &state), @r##"<article class="card"><header class="card__header" style="display: none;"><h3 class="card__title">Card title</h3><p class="card__subtitle">Sub</p></header><div class="card__body">Body text</div><footer class="card__footer"><a href="#">More</a></footer></article>"##);
}

#[test]
fn card_defaults_leave_markup_untouched() {
    let schema = schema("card");
    let state = init_state(&schema);
    assert_eq!(project(CARD, &schema, &state), CARD);
}

#[test]
fn navbar_hides_search_and_renames_button() {
    let schema = schema("navbar");
    let mut state = init_state(&schema);
    state.set_field(&schema, FieldCategory::Variants, "withSearch", false.into());
    state.set_field(&schema, FieldCategory::Variants, "sticky", true.into());
    state.set_field(&schema, FieldCategory::Content, "buttonText", "Join".into());
    insta::assert_snapshot!(project(NAVBAR, &schema, &state), @r##"<nav class="navbar navbar--sticky"><span class="navbar__logo-text">Brand</span><div data-element="search" style="display: none;"><input type="search"></div><a class="btn" data-element="button" href="#">Join</a></nav>"##);
}

#[test]
fn text_match_gap_empty_default_matches_nothing() {
    let schema = ComponentSchema::new("tag").with_content("label", FieldSpec::text("Label", ""));
    let mut state = init_state(&schema);
    state.set_field(&schema, FieldCategory::Content, "label", "Beta".into());
    let base = r#"<span class="tag"> </span>"#;
    assert_eq!(project(base, &schema, &state), base);
}

#[test]
fn text_match_gap_duplicate_default_updates_every_occurrence() {
    let schema = ComponentSchema::new("pricing").with_content("amount", FieldSpec::text("Amount", "10"));
    let mut state = init_state(&schema);
    state.set_field(&schema, FieldCategory::Content, "amount", "20".into());
    let base = r#"<div class="pricing"><strong>10</strong><small>10</small></div>"#;
    assert_eq!(
        project(base, &schema, &state),
        r#"<div class="pricing"><strong>20</strong><small>20</small></div>"#
    );
}
