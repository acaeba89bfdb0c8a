//! Minimal mutable markup tree for component fragments and page documents.
//!
//! - `parse`: tolerant fragment parser (never fails).
//! - `selector`: simple selectors used by override effects.
//! - `serialize`: tree to markup, the way a browser serializes `innerHTML`.

mod parse;
mod selector;
mod serialize;

pub use parse::parse_fragment;
pub use selector::Selector;

/// Elements without content or end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is stored verbatim and never escaped.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// A node of the markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element with attributes and children.
    Element(Element),
    /// Decoded text.
    Text(String),
    /// Comment body (without `<!--`/`-->`).
    Comment(String),
    /// Declaration body (without `<!`/`>`), e.g. `DOCTYPE html`.
    Doctype(String),
}

impl Node {
    /// Borrow the element if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Mutably borrow the element if this node is one.
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// A single `name="value"` attribute. Boolean attributes hold an empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name as written.
    pub name: String,
    /// Decoded value.
    pub value: String,
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name as written.
    pub name: String,
    /// Attributes in source order.
    pub attributes: Vec<Attribute>,
    /// Child nodes.
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element without attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: set an attribute.
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder: append a text child.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Check the tag name, ignoring ASCII case.
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Whether this element never has content.
    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.iter().any(|v| self.is(v))
    }

    /// Whether this element's text is stored and written verbatim.
    pub fn is_raw_text(&self) -> bool {
        RAW_TEXT_ELEMENTS.iter().any(|v| self.is(v))
    }

    /// Value of an attribute, matching the name case-insensitively.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
            .map(|attr| attr.value.as_str())
    }

    /// Whether an attribute is present.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Set an attribute, replacing the value in place when present.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self
            .attributes
            .iter_mut()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
        {
            Some(attr) => {
                if attr.value != value {
                    attr.value = value.to_string();
                }
            }
            None => self.attributes.push(Attribute {
                name: name.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attribute(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes
            .retain(|attr| !attr.name.eq_ignore_ascii_case(name));
        self.attributes.len() != before
    }

    /// Class tokens in order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    /// Whether the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Add a class if absent. Returns whether the list changed.
    pub fn add_class(&mut self, class: &str) -> bool {
        if class.is_empty() || self.has_class(class) {
            return false;
        }
        let mut tokens: Vec<String> = self.classes().map(str::to_string).collect();
        tokens.push(class.to_string());
        self.set_attribute("class", &tokens.join(" "));
        true
    }

    /// Remove every occurrence of a class. Returns whether the list changed.
    ///
    /// The attribute is dropped once the list is empty.
    pub fn remove_class(&mut self, class: &str) -> bool {
        if !self.has_class(class) {
            return false;
        }
        let tokens: Vec<String> = self
            .classes()
            .filter(|c| *c != class)
            .map(str::to_string)
            .collect();
        if tokens.is_empty() {
            self.remove_attribute("class");
        } else {
            self.set_attribute("class", &tokens.join(" "));
        }
        true
    }

    /// Add or remove a class.
    pub fn toggle_class(&mut self, class: &str, present: bool) -> bool {
        if present {
            self.add_class(class)
        } else {
            self.remove_class(class)
        }
    }

    /// Value of an inline style property.
    pub fn style_property(&self, property: &str) -> Option<String> {
        parse_declarations(self.attribute("style").unwrap_or_default())
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(property))
            .map(|(_, value)| value)
    }

    /// Set an inline style property; an empty value removes it.
    ///
    /// The `style` attribute is only rewritten when the property changes and
    /// is dropped once no declaration remains.
    pub fn set_style_property(&mut self, property: &str, value: &str) {
        if self.style_property(property).as_deref().unwrap_or_default() == value {
            return;
        }
        let mut declarations: Vec<(String, String)> =
            parse_declarations(self.attribute("style").unwrap_or_default())
                .into_iter()
                .filter(|(name, _)| !name.eq_ignore_ascii_case(property))
                .collect();
        if !value.is_empty() {
            declarations.push((property.to_string(), value.to_string()));
        }
        if declarations.is_empty() {
            self.remove_attribute("style");
        } else {
            let style = declarations
                .iter()
                .map(|(name, value)| format!("{name}: {value};"))
                .collect::<Vec<_>>()
                .join(" ");
            self.set_attribute("style", &style);
        }
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Replace all children with a single text node.
    pub fn set_text_content(&mut self, text: &str) {
        self.children.clear();
        if !text.is_empty() {
            self.children.push(Node::Text(text.to_string()));
        }
    }

    /// First child element.
    pub fn first_element_child(&self) -> Option<&Element> {
        self.children.iter().find_map(Node::as_element)
    }

    /// First descendant (pre-order) matching the selector.
    pub fn find_first(&self, selector: &Selector) -> Option<&Element> {
        for child in &self.children {
            if let Node::Element(el) = child {
                if selector.matches(el) {
                    return Some(el);
                }
                if let Some(found) = el.find_first(selector) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Mutable variant of [`Element::find_first`].
    pub fn find_first_mut(&mut self, selector: &Selector) -> Option<&mut Element> {
        for child in &mut self.children {
            if let Node::Element(el) = child {
                if selector.matches(el) {
                    return Some(el);
                }
                if let Some(found) = el.find_first_mut(selector) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Whether any descendant matches the selector.
    pub fn contains(&self, selector: &Selector) -> bool {
        self.find_first(selector).is_some()
    }

    /// First element (self included, pre-order) whose `id` equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.attribute("id") == Some(id) {
            return Some(self);
        }
        self.children
            .iter()
            .filter_map(Node::as_element)
            .find_map(|el| el.find_by_id(id))
    }

    /// Visit every descendant element mutably, pre-order.
    pub fn for_each_descendant_mut(&mut self, f: &mut dyn FnMut(&mut Element)) {
        for child in &mut self.children {
            if let Node::Element(el) = child {
                f(el);
                el.for_each_descendant_mut(f);
            }
        }
    }

    /// Visit every descendant text node mutably, skipping raw-text elements.
    pub fn for_each_text_mut(&mut self, f: &mut dyn FnMut(&mut String)) {
        for child in &mut self.children {
            match child {
                Node::Text(text) => f(text),
                Node::Element(el) if !el.is_raw_text() => el.for_each_text_mut(f),
                _ => {}
            }
        }
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => collect_text(&el.children, out),
            _ => {}
        }
    }
}

fn parse_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// A parsed markup fragment (or whole document).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    /// Top-level nodes.
    pub nodes: Vec<Node>,
}

impl Fragment {
    /// Parse markup into a fragment.
    pub fn parse(markup: &str) -> Self {
        parse_fragment(markup)
    }

    /// First top-level element.
    pub fn root(&self) -> Option<&Element> {
        self.nodes.iter().find_map(Node::as_element)
    }

    /// Mutable first top-level element.
    pub fn root_mut(&mut self) -> Option<&mut Element> {
        self.nodes.iter_mut().find_map(Node::as_element_mut)
    }

    /// First element anywhere in the fragment whose `id` equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.nodes
            .iter()
            .filter_map(Node::as_element)
            .find_map(|el| el.find_by_id(id))
    }

    /// Serialize back to markup.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        serialize::write_nodes(&self.nodes, false, &mut out);
        out
    }
}

impl Element {
    /// Markup of this element including its tags.
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        serialize::write_element(self, &mut out);
        out
    }

    /// Markup of this element's children.
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        serialize::write_nodes(&self.children, self.is_raw_text(), &mut out);
        out
    }
}
