//! Tolerant markup parser.
//!
//! Handles what the site build emits: elements, attributes (quoted, unquoted
//! and bare), void elements, comments, declarations and raw-text elements.
//! Stray end tags are dropped and unclosed elements are closed at the end.

use super::{Attribute, Element, Fragment, Node};

/// Elements whose content runs until the matching end tag.
const RAW_CONTENT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

/// Elements closed implicitly by an opening sibling of the same name.
const SELF_NESTING_CLOSED: &[&str] = &["li", "option", "p", "dt", "dd", "tr", "td", "th"];

/// Parse markup into a fragment. Never fails.
pub fn parse_fragment(input: &str) -> Fragment {
    let mut builder = TreeBuilder::default();
    let mut cursor = Cursor::new(input);

    while !cursor.is_eof() {
        if cursor.starts_with("<!--") {
            cursor.advance(4);
            let body = cursor.take_until("-->");
            cursor.advance(3);
            builder.push(Node::Comment(body.to_string()));
        } else if cursor.starts_with("<!") || cursor.starts_with("<?") {
            cursor.advance(2);
            let body = cursor.take_until(">");
            cursor.advance(1);
            if body.get(..7).is_some_and(|head| head.eq_ignore_ascii_case("doctype")) {
                builder.push(Node::Doctype(body.to_string()));
            } else {
                builder.push(Node::Comment(body.to_string()));
            }
        } else if cursor.starts_with("</") && cursor.peek_nth(2).is_some_and(|c| c.is_ascii_alphabetic()) {
            cursor.advance(2);
            let name = cursor.take_while(is_name_char);
            cursor.take_until(">");
            cursor.advance(1);
            builder.close(name);
        } else if cursor.starts_with("<") && cursor.peek_nth(1).is_some_and(|c| c.is_ascii_alphabetic()) {
            cursor.advance(1);
            let (element, self_closing) = parse_start_tag(&mut cursor);
            if self_closing || element.is_void() {
                builder.push(Node::Element(element));
            } else if let Some(raw) = RAW_CONTENT_ELEMENTS.iter().find(|raw| element.is(raw)) {
                let content = take_raw_content(&mut cursor, raw);
                let mut element = element;
                if !content.is_empty() {
                    let text = if element.is_raw_text() {
                        content.to_string()
                    } else {
                        decode(content)
                    };
                    element.children.push(Node::Text(text));
                }
                builder.push(Node::Element(element));
            } else {
                builder.open(element);
            }
        } else {
            let text = cursor.take_text();
            builder.push(Node::Text(decode(text)));
        }
    }

    builder.finish()
}

fn parse_start_tag(cursor: &mut Cursor<'_>) -> (Element, bool) {
    let mut element = Element::new(cursor.take_while(is_name_char));

    loop {
        cursor.skip_whitespace();
        match cursor.peek() {
            None => return (element, false),
            Some('>') => {
                cursor.advance(1);
                return (element, false);
            }
            Some('/') => {
                cursor.advance(1);
                if cursor.peek() == Some('>') {
                    cursor.advance(1);
                    return (element, true);
                }
            }
            Some(_) => {
                let name = cursor.take_while(|c| !c.is_whitespace() && !matches!(c, '=' | '>' | '/'));
                if name.is_empty() {
                    // Lone '=' or similar junk.
                    cursor.advance(1);
                    continue;
                }
                cursor.skip_whitespace();
                let value = if cursor.peek() == Some('=') {
                    cursor.advance(1);
                    cursor.skip_whitespace();
                    match cursor.peek() {
                        Some(quote @ ('"' | '\'')) => {
                            cursor.advance(1);
                            let raw = cursor.take_until(quote.encode_utf8(&mut [0; 4]));
                            cursor.advance(1);
                            decode(raw)
                        }
                        _ => decode(cursor.take_while(|c| !c.is_whitespace() && c != '>')),
                    }
                } else {
                    String::new()
                };
                if !element.has_attribute(name) {
                    element.attributes.push(Attribute {
                        name: name.to_string(),
                        value,
                    });
                }
            }
        }
    }
}

/// Consume content up to (and including) the end tag of a raw-content element.
fn take_raw_content<'a>(cursor: &mut Cursor<'a>, name: &str) -> &'a str {
    let rest = cursor.rest();
    let lower = rest.to_ascii_lowercase();
    let needle = format!("</{name}");
    match lower.find(&needle) {
        Some(pos) => {
            let content = &rest[..pos];
            cursor.advance(pos);
            cursor.take_until(">");
            cursor.advance(1);
            content
        }
        None => {
            cursor.advance(rest.len());
            rest
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
}

fn decode(raw: &str) -> String {
    html_escape::decode_html_entities(raw).into_owned()
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Element>,
    roots: Vec<Node>,
}

impl TreeBuilder {
    fn push(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.roots.push(node),
        }
    }

    fn open(&mut self, element: Element) {
        let closes_sibling = SELF_NESTING_CLOSED.iter().any(|name| element.is(name))
            && self.stack.last().is_some_and(|top| top.is(&element.name));
        if closes_sibling && let Some(previous) = self.stack.pop() {
            self.push(Node::Element(previous));
        }
        self.stack.push(element);
    }

    fn close(&mut self, name: &str) {
        let Some(position) = self.stack.iter().rposition(|el| el.is(name)) else {
            return;
        };
        while self.stack.len() > position {
            if let Some(element) = self.stack.pop() {
                self.push(Node::Element(element));
            }
        }
    }

    fn finish(mut self) -> Fragment {
        while let Some(element) = self.stack.pop() {
            self.push(Node::Element(element));
        }
        Fragment { nodes: self.roots }
    }
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    /// Advance by `n` bytes, clamped to the end and to a char boundary.
    fn advance(&mut self, n: usize) {
        let mut target = (self.pos + n).min(self.src.len());
        while !self.src.is_char_boundary(target) {
            target += 1;
        }
        self.pos = target;
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let end = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    /// Take everything before `needle` (or the rest), leaving the cursor on it.
    fn take_until(&mut self, needle: &str) -> &'a str {
        let rest = self.rest();
        let end = rest.find(needle).unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    /// Take text up to the next `<` that starts markup.
    fn take_text(&mut self) -> &'a str {
        let rest = self.rest();
        let mut search_from = rest.chars().next().map_or(0, char::len_utf8);
        let end = loop {
            match rest[search_from..].find('<') {
                Some(offset) => {
                    let at = search_from + offset;
                    let next = rest[at + 1..].chars().next();
                    if next.is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?')) {
                        break at;
                    }
                    search_from = at + 1;
                }
                None => break rest.len(),
            }
        };
        self.pos += end;
        &rest[..end]
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }
}
