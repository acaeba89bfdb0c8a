//! Registry type definitions for class roots and field overrides.

use serde::{Deserialize, Serialize};

use crate::state::FieldCategory;

/// Per-component projection configuration.
///
/// Holds the id to CSS class root table and the override table consulted by
/// the projector before it falls back to the generic field rules.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OverrideRegistry {
    /// Component id to class root mappings.
    #[serde(default)]
    pub class_roots: Vec<ClassRoot>,
    /// Field overrides, later entries win.
    #[serde(default)]
    pub overrides: Vec<FieldOverride>,
}

/// Maps a component id to the CSS block class its modifiers derive from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClassRoot {
    /// Component id (e.g. "button").
    pub component: String,
    /// Class root (e.g. "btn").
    pub class: String,
}

/// Replaces the generic rule of one `(component, category, key)` field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldOverride {
    /// Component id.
    pub component: String,
    /// Field namespace.
    pub category: FieldCategory,
    /// Field key.
    pub key: String,
    /// Effects applied in order. An empty list makes the field inert.
    pub effects: Vec<FieldEffect>,
}

/// Which elements an effect mutates.
///
/// Selector matching includes the root element itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Target {
    /// The fragment's root element.
    #[default]
    Root,
    /// The first element (pre-order) matching the selector.
    First {
        /// Selector text.
        selector: String,
    },
    /// Every element matching the selector.
    All {
        /// Selector text.
        selector: String,
    },
}

impl Target {
    /// First element matching `selector`.
    pub fn first(selector: impl Into<String>) -> Self {
        Target::First {
            selector: selector.into(),
        }
    }

    /// All elements matching `selector`.
    pub fn all(selector: impl Into<String>) -> Self {
        Target::All {
            selector: selector.into(),
        }
    }
}

/// A `name="value"` pair written by attribute effects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttributePair {
    /// Attribute name.
    pub name: String,
    /// Attribute value (empty for boolean attributes).
    #[serde(default)]
    pub value: String,
}

impl AttributePair {
    /// Create a pair.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Element created by a text write when its target is missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateElement {
    /// Tag of the new element.
    pub tag: String,
    /// Class of the new element.
    pub class: String,
    /// Selector of the parent to append to; the root when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// Guard evaluated against the root element before an effect runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RootCondition {
    /// Root carries the class.
    HasClass {
        /// Class name.
        class: String,
    },
    /// Root does not carry the class.
    LacksClass {
        /// Class name.
        class: String,
    },
    /// Root or one of its descendants matches the selector.
    Contains {
        /// Selector text.
        selector: String,
    },
}

/// One mutation a field value drives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "effect", rename_all = "camelCase")]
pub enum FieldEffect {
    /// Add the class while the value is truthy, remove it otherwise.
    #[serde(rename_all = "camelCase")]
    ClassToggle {
        /// Elements to mutate.
        #[serde(default)]
        target: Target,
        /// Class name; `<classRoot>--<key>` when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        class: Option<String>,
    },
    /// Set the attributes while the value is truthy, remove them otherwise.
    #[serde(rename_all = "camelCase")]
    AttributeToggle {
        /// Elements to mutate.
        #[serde(default)]
        target: Target,
        /// Attributes to set or remove.
        attributes: Vec<AttributePair>,
    },
    /// Replace one `<prefix><option>` class with `<prefix><value>`.
    #[serde(rename_all = "camelCase")]
    ClassSwap {
        /// Elements to mutate.
        #[serde(default)]
        target: Target,
        /// Class prefix; `<classRoot>--` when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prefix: Option<String>,
        /// Option that adds no class; the field's baseline when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        baseline: Option<String>,
    },
    /// Write the value into an attribute.
    #[serde(rename_all = "camelCase")]
    AttributeSet {
        /// Elements to mutate.
        #[serde(default)]
        target: Target,
        /// Attribute name.
        attribute: String,
    },
    /// Show the element while the value is truthy (`display: none` otherwise).
    #[serde(rename_all = "camelCase")]
    Visibility {
        /// Elements to mutate.
        #[serde(default)]
        target: Target,
    },
    /// Replace the text content of the target.
    #[serde(rename_all = "camelCase")]
    TextWrite {
        /// Elements to mutate.
        #[serde(default)]
        target: Target,
        /// Element to create when no target exists and the value is non-empty.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        create: Option<CreateElement>,
        /// Skip the write unless the root satisfies this.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        when: Option<RootCondition>,
    },
    /// Replace text nodes whose trimmed text equals the field default.
    TextMatch,
}

impl FieldEffect {
    /// Toggle `class` on the target.
    pub fn class_toggle(target: Target, class: impl Into<String>) -> Self {
        FieldEffect::ClassToggle {
            target,
            class: Some(class.into()),
        }
    }

    /// Toggle the `disabled` and `aria-disabled="true"` attributes on the target.
    pub fn disabled(target: Target) -> Self {
        FieldEffect::AttributeToggle {
            target,
            attributes: vec![
                AttributePair::new("disabled", ""),
                AttributePair::new("aria-disabled", "true"),
            ],
        }
    }

    /// Write the value into `attribute` of the target.
    pub fn attribute_set(target: Target, attribute: impl Into<String>) -> Self {
        FieldEffect::AttributeSet {
            target,
            attribute: attribute.into(),
        }
    }

    /// Show or hide the target.
    pub fn visibility(target: Target) -> Self {
        FieldEffect::Visibility { target }
    }

    /// Write the value as the target's text.
    pub fn text_write(target: Target) -> Self {
        FieldEffect::TextWrite {
            target,
            create: None,
            when: None,
        }
    }
}

impl OverrideRegistry {
    /// CSS class root for a component; the id itself when unmapped.
    pub fn class_root<'a>(&'a self, component: &'a str) -> &'a str {
        self.class_roots
            .iter()
            .rev()
            .find(|root| root.component == component)
            .map(|root| root.class.as_str())
            .unwrap_or(component)
    }

    /// Override registered for a field, if any.
    pub fn override_for(
        &self,
        component: &str,
        category: FieldCategory,
        key: &str,
    ) -> Option<&FieldOverride> {
        self.overrides
            .iter()
            .rev()
            .find(|o| o.component == component && o.category == category && o.key == key)
    }

    /// All overrides registered for a component.
    pub fn overrides_for<'a>(&'a self, component: &'a str) -> impl Iterator<Item = &'a FieldOverride> {
        self.overrides.iter().filter(move |o| o.component == component)
    }

    /// Map a component id to a class root.
    pub fn set_class_root(&mut self, component: impl Into<String>, class: impl Into<String>) {
        let component = component.into();
        self.class_roots.retain(|root| root.component != component);
        self.class_roots.push(ClassRoot {
            component,
            class: class.into(),
        });
    }

    /// Register an override, replacing any previous one for the same field.
    pub fn register(
        &mut self,
        component: impl Into<String>,
        category: FieldCategory,
        key: impl Into<String>,
        effects: Vec<FieldEffect>,
    ) {
        let component = component.into();
        let key = key.into();
        self.overrides
            .retain(|o| !(o.component == component && o.category == category && o.key == key));
        self.overrides.push(FieldOverride {
            component,
            category,
            key,
            effects,
        });
    }

    /// Layer another registry on top of this one.
    pub fn merge(&mut self, other: OverrideRegistry) {
        for root in other.class_roots {
            self.set_class_root(root.component, root.class);
        }
        for o in other.overrides {
            self.register(o.component, o.category, o.key, o.effects);
        }
    }

    /// Every selector referenced by the registry.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.overrides
            .iter()
            .flat_map(|o| o.effects.iter())
            .flat_map(FieldEffect::selectors)
    }
}

impl FieldEffect {
    /// The element this effect mutates.
    pub fn target(&self) -> Option<&Target> {
        match self {
            FieldEffect::ClassToggle { target, .. }
            | FieldEffect::AttributeToggle { target, .. }
            | FieldEffect::ClassSwap { target, .. }
            | FieldEffect::AttributeSet { target, .. }
            | FieldEffect::Visibility { target }
            | FieldEffect::TextWrite { target, .. } => Some(target),
            FieldEffect::TextMatch => None,
        }
    }

    fn selectors(&self) -> Vec<&str> {
        let mut out = Vec::new();
        if let Some(Target::First { selector } | Target::All { selector }) = self.target() {
            out.push(selector.as_str());
        }
        if let FieldEffect::TextWrite { create, when, .. } = self {
            if let Some(parent) = create.as_ref().and_then(|c| c.parent.as_deref()) {
                out.push(parent);
            }
            if let Some(RootCondition::Contains { selector }) = when {
                out.push(selector.as_str());
            }
        }
        out
    }
}
