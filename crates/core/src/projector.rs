//! Template projector: applies a component state onto its base markup.
//!
//! Every field resolves to a list of [`FieldEffect`]s, either from the
//! override registry or from the generic rules:
//!
//! - checkbox variant: toggle `<classRoot>--<key>` on the root; a key named
//!   `disabled` also toggles `disabled` and `aria-disabled="true"`.
//! - select variant: swap `<classRoot>--<option>` classes on the root.
//! - content: replace text nodes equal to the default; `placeholder` also
//!   rewrites existing placeholders of inputs and textareas, `label` the first label.
//!
//! Projection always starts from the untouched base markup, so running it
//! again with the same state yields the same output.

use std::borrow::Cow;

use once_cell::sync::Lazy;

use crate::dom::{Element, Fragment, Node, Selector};
use crate::error::ProjectionError;
use crate::manifest::{ComponentSchema, FieldSpec, FieldType, FieldValue};
use crate::registry::{
    FieldEffect, OverrideRegistry, RootCondition, Target, default_registry,
};
use crate::state::{ComponentState, FieldCategory};

static DEFAULT_PROJECTOR: Lazy<Projector> = Lazy::new(Projector::default);

/// Projects component state onto markup using an override registry.
#[derive(Debug, Clone)]
pub struct Projector {
    registry: OverrideRegistry,
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(default_registry())
    }
}

/// Values shared by every effect of one field.
struct FieldContext<'a> {
    class_root: &'a str,
    key: &'a str,
    spec: &'a FieldSpec,
    value: &'a FieldValue,
}

impl Projector {
    /// Create a projector over a registry.
    pub fn new(registry: OverrideRegistry) -> Self {
        for selector in registry.selectors() {
            if let Err(err) = Selector::parse(selector) {
                log::warn!("Override selector will never match: {}", err);
            }
        }
        Self { registry }
    }

    /// The registry in use.
    pub fn registry(&self) -> &OverrideRegistry {
        &self.registry
    }

    /// Effects driven by one field: the registered override or the generic rule.
    pub fn effects_for<'a>(
        &'a self,
        component: &str,
        category: FieldCategory,
        key: &str,
        spec: &FieldSpec,
    ) -> Cow<'a, [FieldEffect]> {
        match self.registry.override_for(component, category, key) {
            Some(found) => Cow::Borrowed(found.effects.as_slice()),
            None => Cow::Owned(generic_effects(category, key, spec)),
        }
    }

    /// Project `state` onto `base_markup`.
    ///
    /// Fails when the markup has no root element.
    pub fn try_project(
        &self,
        base_markup: &str,
        schema: &ComponentSchema,
        state: &ComponentState,
    ) -> Result<String, ProjectionError> {
        let mut fragment = Fragment::parse(base_markup);
        let root = fragment.root_mut().ok_or(ProjectionError::NoRoot)?;
        self.apply(root, schema, state);
        Ok(fragment.to_html())
    }

    /// Project `state` onto `base_markup`, returning the markup unchanged
    /// when it has no root element.
    pub fn project(&self, base_markup: &str, schema: &ComponentSchema, state: &ComponentState) -> String {
        match self.try_project(base_markup, schema, state) {
            Ok(markup) => markup,
            Err(err) => {
                log::warn!("Skipping projection of component '{}': {}", schema.id, err);
                base_markup.to_string()
            }
        }
    }

    /// Apply every field of `state` to an already parsed root element.
    pub fn apply(&self, root: &mut Element, schema: &ComponentSchema, state: &ComponentState) {
        let class_root = self.registry.class_root(&schema.id);
        for category in FieldCategory::ALL {
            for (key, spec) in schema.fields(category).iter() {
                let value = state.value(category, key).unwrap_or(&spec.default);
                let ctx = FieldContext {
                    class_root,
                    key,
                    spec,
                    value,
                };
                for effect in self.effects_for(&schema.id, category, key, spec).iter() {
                    apply_effect(root, effect, &ctx);
                }
            }
        }
    }
}

/// Project with the built-in registry.
pub fn project(base_markup: &str, schema: &ComponentSchema, state: &ComponentState) -> String {
    DEFAULT_PROJECTOR.project(base_markup, schema, state)
}

/// Shared projector over the built-in registry.
pub fn default_projector() -> &'static Projector {
    &DEFAULT_PROJECTOR
}

fn generic_effects(category: FieldCategory, key: &str, spec: &FieldSpec) -> Vec<FieldEffect> {
    match category {
        FieldCategory::Variants => match spec.field_type {
            FieldType::Checkbox => {
                let mut effects = vec![FieldEffect::ClassToggle {
                    target: Target::Root,
                    class: None,
                }];
                if key == "disabled" {
                    effects.push(FieldEffect::disabled(Target::Root));
                }
                effects
            }
            FieldType::Select => vec![FieldEffect::ClassSwap {
                target: Target::Root,
                prefix: None,
                baseline: None,
            }],
            _ => {
                log::debug!("No generic rule for {} variant '{}'", spec.field_type, key);
                Vec::new()
            }
        },
        FieldCategory::Content => {
            let mut effects = vec![FieldEffect::TextMatch];
            match key {
                "placeholder" => effects.push(FieldEffect::attribute_set(
                    Target::all("input[placeholder], textarea[placeholder]"),
                    "placeholder",
                )),
                "label" => effects.push(FieldEffect::TextWrite {
                    target: Target::first("label"),
                    create: None,
                    when: Some(RootCondition::Contains {
                        selector: "input, textarea".to_string(),
                    }),
                }),
                _ => {}
            }
            effects
        }
    }
}

fn apply_effect(root: &mut Element, effect: &FieldEffect, ctx: &FieldContext<'_>) {
    match effect {
        FieldEffect::ClassToggle { target, class } => {
            let class = class
                .clone()
                .unwrap_or_else(|| format!("{}--{}", ctx.class_root, ctx.key));
            let on = ctx.value.is_truthy();
            for_each_target(root, target, &mut |el| {
                el.toggle_class(&class, on);
            });
        }
        FieldEffect::AttributeToggle { target, attributes } => {
            let on = ctx.value.is_truthy();
            for_each_target(root, target, &mut |el| {
                for attr in attributes {
                    if on {
                        el.set_attribute(&attr.name, &attr.value);
                    } else {
                        el.remove_attribute(&attr.name);
                    }
                }
            });
        }
        FieldEffect::ClassSwap {
            target,
            prefix,
            baseline,
        } => {
            let prefix = prefix
                .clone()
                .unwrap_or_else(|| format!("{}--", ctx.class_root));
            let baseline = baseline.as_deref().or_else(|| ctx.spec.baseline());
            let value = ctx.value.as_text();
            let wanted = (baseline != Some(value.as_str())).then(|| format!("{prefix}{value}"));
            for_each_target(root, target, &mut |el| {
                for option in &ctx.spec.options {
                    let class = format!("{prefix}{option}");
                    if wanted.as_deref() != Some(class.as_str()) {
                        el.remove_class(&class);
                    }
                }
                if let Some(class) = &wanted {
                    el.add_class(class);
                }
            });
        }
        FieldEffect::AttributeSet { target, attribute } => {
            let value = ctx.value.as_text();
            for_each_target(root, target, &mut |el| el.set_attribute(attribute, &value));
        }
        FieldEffect::Visibility { target } => {
            let display = if ctx.value.is_truthy() { "" } else { "none" };
            for_each_target(root, target, &mut |el| el.set_style_property("display", display));
        }
        FieldEffect::TextWrite {
            target,
            create,
            when,
        } => {
            if let Some(condition) = when
                && !condition_holds(root, condition)
            {
                return;
            }
            let text = ctx.value.as_text();
            let written = for_each_target(root, target, &mut |el| el.set_text_content(&text));
            if written > 0 || text.is_empty() {
                return;
            }
            if let Some(create) = create {
                let mut pending = Some(Node::Element(
                    Element::new(create.tag.as_str())
                        .with_attribute("class", &create.class)
                        .with_text(text.as_str()),
                ));
                let parent = match &create.parent {
                    Some(selector) => Target::first(selector.as_str()),
                    None => Target::Root,
                };
                for_each_target(root, &parent, &mut |el| {
                    if let Some(node) = pending.take() {
                        el.children.push(node);
                    }
                });
            }
        }
        FieldEffect::TextMatch => replace_matching_text(root, ctx),
    }
}

fn replace_matching_text(root: &mut Element, ctx: &FieldContext<'_>) {
    let default = ctx.spec.default.as_text();
    let needle = default.trim();
    if needle.is_empty() {
        log::debug!("Content field '{}' has an empty default; nothing to match", ctx.key);
        return;
    }
    let replacement = ctx.value.as_text();
    root.for_each_text_mut(&mut |text| {
        if text.trim() == needle {
            let leading = &text[..text.len() - text.trim_start().len()];
            let trailing = &text[text.trim_end().len()..];
            *text = format!("{leading}{replacement}{trailing}");
        }
    });
}

fn condition_holds(root: &Element, condition: &RootCondition) -> bool {
    match condition {
        RootCondition::HasClass { class } => root.has_class(class),
        RootCondition::LacksClass { class } => !root.has_class(class),
        RootCondition::Contains { selector } => match parse_selector(selector) {
            Some(selector) => selector.matches(root) || root.contains(&selector),
            None => false,
        },
    }
}

/// Run `f` on every element the target resolves to. Returns how many ran.
fn for_each_target(root: &mut Element, target: &Target, f: &mut dyn FnMut(&mut Element)) -> usize {
    match target {
        Target::Root => {
            f(root);
            1
        }
        Target::First { selector } => {
            let Some(selector) = parse_selector(selector) else {
                return 0;
            };
            if selector.matches(root) {
                f(root);
                return 1;
            }
            match root.find_first_mut(&selector) {
                Some(el) => {
                    f(el);
                    1
                }
                None => 0,
            }
        }
        Target::All { selector } => {
            let Some(selector) = parse_selector(selector) else {
                return 0;
            };
            let mut count = 0;
            if selector.matches(root) {
                f(root);
                count += 1;
            }
            root.for_each_descendant_mut(&mut |el| {
                if selector.matches(el) {
                    f(el);
                    count += 1;
                }
            });
            count
        }
    }
}

fn parse_selector(source: &str) -> Option<Selector> {
    match Selector::parse(source) {
        Ok(selector) => Some(selector),
        Err(err) => {
            log::warn!("Ignoring override target: {}", err);
            None
        }
    }
}
