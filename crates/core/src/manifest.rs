//! Catalogue manifest: component schemas, field specs and page entries.
//!
//! The manifest is produced by the site build and consumed read-only. Field
//! maps keep their declaration order because controls and template snippets
//! are emitted in that order.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::{LoadDiagnostics, LoadError};
use crate::source::AssetSource;

/// Default manifest location relative to the published root.
pub const DEFAULT_MANIFEST_PATH: &str = "data/showcase.json";

/// Insertion-ordered string-keyed map with unique keys.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> OrderedMap<V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Look up a value mutably by key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Insert a value, replacing in place when the key exists.
    ///
    /// Returns the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Iterate entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map with unique keys")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, V)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    if entries.iter().any(|(k, _)| *k == key) {
                        return Err(de::Error::custom(format!("duplicate key '{key}'")));
                    }
                    entries.push((key, value));
                }
                Ok(OrderedMap { entries })
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Control type declared for a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Boolean toggle.
    Checkbox,
    /// One value out of `options`.
    Select,
    /// Single-line text.
    Text,
    /// Multi-line text.
    Textarea,
    /// Any other HTML input type (`email`, `number`, `color`, ...).
    Input(String),
}

impl FieldType {
    /// The manifest spelling of this type.
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Checkbox => "checkbox",
            FieldType::Select => "select",
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Input(other) => other.as_str(),
        }
    }
}

impl From<&str> for FieldType {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "checkbox" => FieldType::Checkbox,
            "select" => FieldType::Select,
            "text" | "" => FieldType::Text,
            "textarea" => FieldType::Textarea,
            other => FieldType::Input(other.to_string()),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(FieldType::from(raw.as_str()))
    }
}

/// A field value: the type of a default or of the current state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Checkbox value.
    Bool(bool),
    /// Numeric value (number-like inputs).
    Number(serde_json::Number),
    /// Text value (select, text, textarea, other inputs).
    Text(String),
}

impl FieldValue {
    /// Text form used for markup substitution and attribute writes.
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }

    /// Truthiness used by toggle effects.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Bool(b) => *b,
            FieldValue::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            FieldValue::Text(s) => !s.is_empty() && s != "false",
        }
    }

    /// Borrow the inner string for text values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Schema of a single variant or content field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFieldSpec")]
pub struct FieldSpec {
    /// Control type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Control label (may be empty; controls fall back to the key).
    pub label: String,
    /// Default value, already matching `field_type`.
    pub default: FieldValue,
    /// Allowed values for select fields.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Select option that emits no modifier class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<String>,
}

#[derive(Deserialize)]
struct RawFieldSpec {
    #[serde(rename = "type", default)]
    field_type: Option<FieldType>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    default: Option<FieldValue>,
    #[serde(default)]
    options: Option<Vec<String>>,
    #[serde(default)]
    baseline: Option<String>,
}

impl TryFrom<RawFieldSpec> for FieldSpec {
    type Error = String;

    fn try_from(raw: RawFieldSpec) -> Result<Self, Self::Error> {
        let field_type = raw.field_type.unwrap_or(FieldType::Text);
        let options = raw.options.unwrap_or_default();
        let default = match (&field_type, raw.default) {
            (FieldType::Checkbox, None) => FieldValue::Bool(false),
            (FieldType::Checkbox, Some(FieldValue::Bool(b))) => FieldValue::Bool(b),
            (FieldType::Checkbox, Some(FieldValue::Text(s))) if s == "true" || s == "false" => {
                FieldValue::Bool(s == "true")
            }
            (FieldType::Checkbox, Some(other)) => {
                return Err(format!(
                    "checkbox default must be a boolean, got {}",
                    other.as_text()
                ));
            }
            (FieldType::Select, default) => {
                if options.is_empty() {
                    return Err("select field declares no options".to_string());
                }
                let value = match default {
                    Some(value) => value.as_text(),
                    None => options[0].clone(),
                };
                if !options.contains(&value) {
                    return Err(format!("select default '{value}' is not one of its options"));
                }
                FieldValue::Text(value)
            }
            (FieldType::Input(_), Some(FieldValue::Number(n))) => FieldValue::Number(n),
            (_, Some(value)) => FieldValue::Text(value.as_text()),
            (_, None) => FieldValue::Text(String::new()),
        };
        if let Some(baseline) = &raw.baseline
            && !options.contains(baseline)
        {
            return Err(format!("baseline '{baseline}' is not one of the options"));
        }

        Ok(FieldSpec {
            field_type,
            label: raw.label.unwrap_or_default(),
            default,
            options,
            baseline: raw.baseline,
        })
    }
}

impl FieldSpec {
    /// Create a checkbox field.
    pub fn checkbox(label: impl Into<String>, default: bool) -> Self {
        Self {
            field_type: FieldType::Checkbox,
            label: label.into(),
            default: FieldValue::Bool(default),
            options: Vec::new(),
            baseline: None,
        }
    }

    /// Create a select field. The default must be one of `options`.
    pub fn select<I, S>(label: impl Into<String>, options: I, default: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field_type: FieldType::Select,
            label: label.into(),
            default: FieldValue::Text(default.into()),
            options: options.into_iter().map(Into::into).collect(),
            baseline: None,
        }
    }

    /// Create a single-line text field.
    pub fn text(label: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            field_type: FieldType::Text,
            label: label.into(),
            default: FieldValue::Text(default.into()),
            options: Vec::new(),
            baseline: None,
        }
    }

    /// Create a multi-line text field.
    pub fn textarea(label: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            field_type: FieldType::Textarea,
            ..Self::text(label, default)
        }
    }

    /// Set an explicit baseline option.
    pub fn with_baseline(mut self, baseline: impl Into<String>) -> Self {
        self.baseline = Some(baseline.into());
        self
    }

    /// The option that emits no modifier class, if any.
    ///
    /// An explicit `baseline` wins; otherwise an option named `normal` or
    /// `default` is used.
    pub fn baseline(&self) -> Option<&str> {
        if let Some(baseline) = &self.baseline {
            return Some(baseline);
        }
        self.options
            .iter()
            .map(String::as_str)
            .find(|option| *option == "normal" || *option == "default")
    }

    /// Check the select invariant (`default` is one of `options`).
    pub fn validate(&self) -> Result<(), String> {
        if self.field_type == FieldType::Select {
            let default = self.default.as_text();
            if !self.options.contains(&default) {
                return Err(format!("select default '{default}' is not one of its options"));
            }
        }
        Ok(())
    }

    /// Coerce a control value into a value matching this field's type.
    ///
    /// Returns a description of the accepted values on mismatch.
    pub fn coerce(&self, value: FieldValue) -> Result<FieldValue, String> {
        match (&self.field_type, value) {
            (FieldType::Checkbox, FieldValue::Bool(b)) => Ok(FieldValue::Bool(b)),
            (FieldType::Checkbox, FieldValue::Text(s)) if s == "true" || s == "false" => {
                Ok(FieldValue::Bool(s == "true"))
            }
            (FieldType::Checkbox, _) => Err("a boolean".to_string()),
            (FieldType::Select, value) => {
                let text = value.as_text();
                if self.options.contains(&text) {
                    Ok(FieldValue::Text(text))
                } else {
                    Err(format!("one of [{}]", self.options.join(", ")))
                }
            }
            (_, FieldValue::Bool(_)) => Err("text".to_string()),
            (_, value) if matches!(self.default, FieldValue::Number(_)) => match value {
                FieldValue::Number(n) => Ok(FieldValue::Number(n)),
                other => other
                    .as_text()
                    .trim()
                    .parse::<serde_json::Number>()
                    .map(FieldValue::Number)
                    .map_err(|_| "a number".to_string()),
            },
            (_, value) => Ok(FieldValue::Text(value.as_text())),
        }
    }
}

/// Ordered field schemas of one namespace.
pub type FieldSet = OrderedMap<FieldSpec>;

/// Immutable schema of one showcased component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSchema {
    /// Stable slug.
    pub id: String,
    /// Display name (defaults to the id).
    #[serde(default)]
    pub name: String,
    /// Display description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Path hint (`components/<id>/<id>`) for the compiled fragment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Whether the grid card spans the whole row.
    #[serde(default)]
    pub full_width: bool,
    /// Structural (class-level) fields.
    #[serde(default)]
    pub variants: FieldSet,
    /// Text-level fields.
    #[serde(default)]
    pub content: FieldSet,
}

impl ComponentSchema {
    /// Create an empty schema with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: None,
            category: None,
            path: None,
            full_width: false,
            variants: FieldSet::new(),
            content: FieldSet::new(),
        }
    }

    /// Add a variant field.
    pub fn with_variant(mut self, key: impl Into<String>, spec: FieldSpec) -> Self {
        self.variants.insert(key, spec);
        self
    }

    /// Add a content field.
    pub fn with_content(mut self, key: impl Into<String>, spec: FieldSpec) -> Self {
        self.content.insert(key, spec);
        self
    }

    /// Path of the compiled markup fragment.
    pub fn fragment_path(&self) -> String {
        match &self.path {
            Some(path) if !path.is_empty() => format!("{path}.html"),
            _ => format!("components/{0}/{0}.html", self.id),
        }
    }

    /// Fields of one namespace.
    pub fn fields(&self, category: crate::state::FieldCategory) -> &FieldSet {
        match category {
            crate::state::FieldCategory::Variants => &self.variants,
            crate::state::FieldCategory::Content => &self.content,
        }
    }

    /// Check every field invariant.
    pub fn validate(&self) -> Result<(), LoadError> {
        for (key, spec) in self.variants.iter().chain(self.content.iter()) {
            spec.validate()
                .map_err(|message| LoadError::invalid_schema(&self.id, format!("{key}: {message}")))?;
        }
        Ok(())
    }
}

/// A named set of query parameters used to vary a page preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageVariant {
    /// Variant id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional tooltip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Query parameters appended to the page URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<OrderedMap<serde_json::Value>>,
}

impl PageVariant {
    /// Query parameters as strings, in declaration order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let Some(data) = &self.data else {
            return Vec::new();
        };
        data.iter()
            .map(|(key, value)| {
                let value = match value {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Array(items) => items
                        .iter()
                        .map(|item| match item {
                            serde_json::Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect::<Vec<_>>()
                        .join(","),
                    other => other.to_string(),
                };
                (key.to_string(), value)
            })
            .collect()
    }
}

/// A full page of the site. Pages are previewed as-is, never projected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEntry {
    /// Page id.
    pub id: String,
    /// Display name (defaults to the id).
    #[serde(default)]
    pub name: String,
    /// Display category.
    #[serde(default = "default_page_category")]
    pub category: String,
    /// Display description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Path of the compiled page without extension (defaults to the id).
    #[serde(default)]
    pub path: String,
    /// Named query-parameter variants.
    #[serde(default)]
    pub variants: Vec<PageVariant>,
}

fn default_page_category() -> String {
    "pages".to_string()
}

impl PageEntry {
    /// Look up a variant by id.
    pub fn variant(&self, id: &str) -> Option<&PageVariant> {
        self.variants.iter().find(|v| v.id == id)
    }
}

#[derive(Deserialize)]
struct RawCatalogue<'a> {
    #[serde(default, borrow)]
    components: Option<Vec<&'a RawValue>>,
    #[serde(default, borrow)]
    pages: Option<Vec<&'a RawValue>>,
}

/// The read-only catalogue of components and pages.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalogue {
    /// Components in manifest order.
    pub components: Vec<ComponentSchema>,
    /// Pages in manifest order.
    pub pages: Vec<PageEntry>,
    /// Entries skipped or normalized while loading.
    #[serde(skip)]
    pub diagnostics: LoadDiagnostics,
}

impl Catalogue {
    /// The catalogue shown when the manifest cannot be loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decode a manifest document.
    ///
    /// Fails only when the document itself is malformed. Individual entries
    /// that break an invariant are skipped and reported in `diagnostics`.
    pub fn from_json(path: &str, text: &str) -> Result<Self, LoadError> {
        let raw: RawCatalogue<'_> =
            serde_json::from_str(text).map_err(|err| LoadError::malformed(path, err.to_string()))?;
        let mut catalogue = Catalogue::empty();

        for (index, entry) in raw.components.unwrap_or_default().into_iter().enumerate() {
            match serde_json::from_str::<ComponentSchema>(entry.get()) {
                Ok(mut schema) => {
                    if catalogue.component(&schema.id).is_some() {
                        catalogue
                            .diagnostics
                            .warn(&schema.id, "duplicate component id, entry skipped");
                        continue;
                    }
                    if schema.name.is_empty() {
                        schema.name = schema.id.clone();
                    }
                    catalogue.components.push(schema);
                }
                Err(err) => catalogue
                    .diagnostics
                    .warn(item_label(entry, "component", index), err.to_string()),
            }
        }

        for (index, entry) in raw.pages.unwrap_or_default().into_iter().enumerate() {
            match serde_json::from_str::<PageEntry>(entry.get()) {
                Ok(mut page) => {
                    if page.name.is_empty() {
                        page.name = page.id.clone();
                    }
                    if page.path.is_empty() {
                        page.path = page.id.clone();
                    }
                    catalogue.pages.push(page);
                }
                Err(err) => catalogue
                    .diagnostics
                    .warn(item_label(entry, "page", index), err.to_string()),
            }
        }

        Ok(catalogue)
    }

    /// Fetch and decode the manifest from an asset source.
    pub fn load(source: &dyn AssetSource, path: &str) -> Result<Self, LoadError> {
        let text = source.read(path)?;
        Self::from_json(path, &text)
    }

    /// Load the manifest, substituting an empty catalogue on failure.
    pub fn load_or_empty(source: &dyn AssetSource, path: &str) -> Self {
        match Self::load(source, path) {
            Ok(catalogue) => catalogue,
            Err(err) => {
                log::error!("Falling back to an empty catalogue: {}", err);
                Self::empty()
            }
        }
    }

    /// Look up a component by id.
    pub fn component(&self, id: &str) -> Option<&ComponentSchema> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Look up a page by id.
    pub fn page(&self, id: &str) -> Option<&PageEntry> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// Check whether the catalogue has nothing to show.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.pages.is_empty()
    }
}

/// Best-effort label for a skipped entry: its id when readable, else its position.
fn item_label(entry: &RawValue, kind: &str, index: usize) -> String {
    #[derive(Deserialize)]
    struct IdOnly {
        id: String,
    }
    serde_json::from_str::<IdOnly>(entry.get())
        .map(|item| item.id)
        .unwrap_or_else(|_| format!("{kind} #{index}"))
}
