//! Per-instance mutable field state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::manifest::{ComponentSchema, FieldValue, OrderedMap};

/// The two field namespaces of a component schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldCategory {
    /// Structural, class-level fields.
    #[serde(alias = "variant")]
    Variants,
    /// Text-level fields.
    Content,
}

impl FieldCategory {
    /// Both namespaces in application order.
    pub const ALL: [FieldCategory; 2] = [FieldCategory::Variants, FieldCategory::Content];

    /// Value used in control `data-category` attributes.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldCategory::Variants => "variant",
            FieldCategory::Content => "content",
        }
    }
}

impl fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "variant" | "variants" => Ok(FieldCategory::Variants),
            "content" => Ok(FieldCategory::Content),
            other => Err(format!("unknown field category '{other}'")),
        }
    }
}

/// Current values of one displayed component.
///
/// Created from schema defaults, mutated in place by control changes and
/// dropped with the view that owns it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentState {
    /// Current variant values, same keys as the schema.
    pub variants: OrderedMap<FieldValue>,
    /// Current content values, same keys as the schema.
    pub content: OrderedMap<FieldValue>,
    #[serde(skip)]
    base_markup: Option<String>,
}

impl ComponentState {
    /// Seed every field from its schema default.
    pub fn init(schema: &ComponentSchema) -> Self {
        Self {
            variants: schema
                .variants
                .iter()
                .map(|(key, spec)| (key, spec.default.clone()))
                .collect(),
            content: schema
                .content
                .iter()
                .map(|(key, spec)| (key, spec.default.clone()))
                .collect(),
            base_markup: None,
        }
    }

    /// Values of one namespace.
    pub fn values(&self, category: FieldCategory) -> &OrderedMap<FieldValue> {
        match category {
            FieldCategory::Variants => &self.variants,
            FieldCategory::Content => &self.content,
        }
    }

    fn values_mut(&mut self, category: FieldCategory) -> &mut OrderedMap<FieldValue> {
        match category {
            FieldCategory::Variants => &mut self.variants,
            FieldCategory::Content => &mut self.content,
        }
    }

    /// Current value of a field.
    pub fn value(&self, category: FieldCategory, key: &str) -> Option<&FieldValue> {
        self.values(category).get(key)
    }

    /// Write a field, reporting unknown keys and type mismatches.
    ///
    /// Returns whether the stored value changed.
    pub fn try_set_field(
        &mut self,
        schema: &ComponentSchema,
        category: FieldCategory,
        key: &str,
        value: FieldValue,
    ) -> Result<bool, StateError> {
        let unknown = || StateError::UnknownField {
            category,
            key: key.to_string(),
        };
        let spec = schema.fields(category).get(key).ok_or_else(unknown)?;
        let value = spec.coerce(value).map_err(|expected| StateError::TypeMismatch {
            key: key.to_string(),
            expected,
        })?;
        let slot = self.values_mut(category).get_mut(key).ok_or_else(unknown)?;
        if *slot == value {
            return Ok(false);
        }
        *slot = value;
        Ok(true)
    }

    /// Write a field, ignoring updates that do not apply.
    ///
    /// Stale controls may reference keys the schema no longer declares; those
    /// updates leave the state untouched.
    pub fn set_field(
        &mut self,
        schema: &ComponentSchema,
        category: FieldCategory,
        key: &str,
        value: FieldValue,
    ) -> bool {
        match self.try_set_field(schema, category, key, value) {
            Ok(changed) => changed,
            Err(err) => {
                log::debug!("Ignoring update for component '{}': {}", schema.id, err);
                false
            }
        }
    }

    /// The precompiled markup fragment, once fetched.
    pub fn base_markup(&self) -> Option<&str> {
        self.base_markup.as_deref()
    }

    /// Store the fetched fragment. The first stored fragment is kept.
    ///
    /// Returns `false` if a fragment was already attached.
    pub fn attach_base_markup(&mut self, markup: impl Into<String>) -> bool {
        if self.base_markup.is_some() {
            return false;
        }
        self.base_markup = Some(markup.into());
        true
    }
}

/// Seed a new state from schema defaults.
pub fn init_state(schema: &ComponentSchema) -> ComponentState {
    ComponentState::init(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::FieldSpec;

    fn schema() -> ComponentSchema {
        ComponentSchema::new("button")
            .with_variant(
                "size",
                FieldSpec::select("Size", ["small", "normal", "large"], "normal"),
            )
            .with_variant("disabled", FieldSpec::checkbox("Disabled", false))
            .with_content("text", FieldSpec::text("Text", "Click me"))
    }

    #[test]
    fn init_seeds_defaults_in_order() {
        let state = init_state(&schema());
        let keys: Vec<&str> = state.variants.keys().collect();
        assert_eq!(keys, vec!["size", "disabled"]);
        assert_eq!(
            state.value(FieldCategory::Variants, "size"),
            Some(&FieldValue::Text("normal".to_string()))
        );
        assert_eq!(
            state.value(FieldCategory::Content, "text"),
            Some(&FieldValue::Text("Click me".to_string()))
        );
        assert_eq!(state.base_markup(), None);
    }

    #[test]
    fn set_field_writes_known_keys() {
        let schema = schema();
        let mut state = init_state(&schema);
        assert!(state.set_field(&schema, FieldCategory::Variants, "disabled", true.into()));
        assert_eq!(
            state.value(FieldCategory::Variants, "disabled"),
            Some(&FieldValue::Bool(true))
        );
        assert!(!state.set_field(&schema, FieldCategory::Variants, "disabled", true.into()));
    }

    #[test]
    fn unknown_key_is_ignored() {
        let schema = schema();
        let mut state = init_state(&schema);
        let before = state.clone();
        assert!(!state.set_field(&schema, FieldCategory::Variants, "color", "red".into()));
        assert_eq!(state, before);

        let err = state
            .try_set_field(&schema, FieldCategory::Content, "size", "large".into())
            .unwrap_err();
        assert!(matches!(err, StateError::UnknownField { .. }));
    }

    #[test]
    fn mismatched_value_is_rejected() {
        let schema = schema();
        let mut state = init_state(&schema);
        let err = state
            .try_set_field(&schema, FieldCategory::Variants, "size", "huge".into())
            .unwrap_err();
        assert!(matches!(err, StateError::TypeMismatch { .. }));
        assert_eq!(
            state.value(FieldCategory::Variants, "size"),
            Some(&FieldValue::Text("normal".to_string()))
        );
    }

    #[test]
    fn base_markup_is_attached_once() {
        let mut state = init_state(&schema());
        assert!(state.attach_base_markup("<button class=\"btn\">X</button>"));
        assert!(!state.attach_base_markup("<p>other</p>"));
        assert_eq!(state.base_markup(), Some("<button class=\"btn\">X</button>"));
    }

    #[test]
    fn category_parses_control_spellings() {
        assert_eq!("variant".parse::<FieldCategory>(), Ok(FieldCategory::Variants));
        assert_eq!("content".parse::<FieldCategory>(), Ok(FieldCategory::Content));
        assert!("other".parse::<FieldCategory>().is_err());
    }
}
