//! Code serializer: the markup and template-include views of a state.

use crate::manifest::{FieldValue, OrderedMap};
use crate::state::ComponentState;

/// Template extension used by [`to_template_snippet`].
pub const DEFAULT_TEMPLATE_EXTENSION: &str = "twig";

const INDENT: &str = "  ";

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Break already projected markup into one tag per line.
///
/// A line break goes between every tag end and the tag start right after it;
/// whitespace-only lines are dropped. Attribute values and comments are left
/// as they are.
pub fn to_markup_snippet(rendered: &str) -> String {
    let broken = break_between_tags(rendered);
    broken
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Line-broken markup with nested elements indented by two spaces.
pub fn to_indented_markup(rendered: &str) -> String {
    let broken = break_between_tags(rendered);
    let mut depth = 0usize;
    let mut out = Vec::new();

    for line in broken.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if line.starts_with("</") {
            depth = depth.saturating_sub(1);
        }
        out.push(format!("{}{}", INDENT.repeat(depth), line));
        if opens_block(line) {
            depth += 1;
        }
    }

    out.join("\n")
}

/// Whether a formatted line leaves an element open.
fn opens_block(line: &str) -> bool {
    if !line.starts_with('<') || line.starts_with("</") || line.starts_with("<!") {
        return false;
    }
    if line.ends_with("/>") {
        return false;
    }
    let name: String = line[1..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    if name.is_empty() || VOID_TAGS.iter().any(|tag| tag.eq_ignore_ascii_case(&name)) {
        return false;
    }
    let close = format!("</{name}>");
    !line.to_ascii_lowercase().ends_with(&close.to_ascii_lowercase())
}

/// Insert `\n` between a tag's `>` and an immediately following `<`.
fn break_between_tags(markup: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum Mode {
        Text,
        Tag(Option<char>),
        Comment,
    }

    let mut out = String::with_capacity(markup.len() + markup.len() / 8);
    let mut mode = Mode::Text;
    let mut after_tag = false;
    let mut rest = markup;

    while let Some(c) = rest.chars().next() {
        let width = c.len_utf8();
        match mode {
            Mode::Text => {
                if rest.starts_with("<!--") {
                    if after_tag {
                        out.push('\n');
                    }
                    out.push_str("<!--");
                    rest = &rest[4..];
                    mode = Mode::Comment;
                    continue;
                }
                if c == '<' {
                    if after_tag {
                        out.push('\n');
                    }
                    mode = Mode::Tag(None);
                }
                after_tag = false;
            }
            Mode::Tag(None) => match c {
                '"' | '\'' => mode = Mode::Tag(Some(c)),
                '>' => {
                    mode = Mode::Text;
                    after_tag = true;
                    out.push(c);
                    rest = &rest[width..];
                    continue;
                }
                _ => {}
            },
            Mode::Tag(Some(quote)) => {
                if c == quote {
                    mode = Mode::Tag(None);
                }
            }
            Mode::Comment => {
                if rest.starts_with("-->") {
                    out.push_str("-->");
                    rest = &rest[3..];
                    mode = Mode::Text;
                    after_tag = true;
                    continue;
                }
            }
        }
        out.push(c);
        rest = &rest[width..];
    }

    out
}

/// Emit the template include for a component, with every variant then
/// content field as `key=value`.
///
/// ```
/// use vitrine_core::{ComponentSchema, FieldSpec, init_state, to_template_snippet};
///
/// let schema = ComponentSchema::new("button")
///     .with_variant("disabled", FieldSpec::checkbox("Disabled", false))
///     .with_content("text", FieldSpec::text("Text", "Go"));
/// let state = init_state(&schema);
/// assert_eq!(
///     to_template_snippet("button", &state),
///     r#"{% include 'components/button/button.twig' with { disabled=false, text="Go" } %}"#
/// );
/// ```
pub fn to_template_snippet(component_id: &str, state: &ComponentState) -> String {
    to_template_snippet_with(component_id, state, DEFAULT_TEMPLATE_EXTENSION)
}

/// [`to_template_snippet`] with a custom template extension.
pub fn to_template_snippet_with(component_id: &str, state: &ComponentState, extension: &str) -> String {
    let args = template_arguments(state);
    let include = format!("'components/{component_id}/{component_id}.{extension}'");
    if args.is_empty() {
        format!("{{% include {include} %}}")
    } else {
        format!("{{% include {include} with {{ {} }} %}}", args.join(", "))
    }
}

/// `key=value` tokens of every variant then content field, in declaration order.
pub fn template_arguments(state: &ComponentState) -> Vec<String> {
    fn push_all(values: &OrderedMap<FieldValue>, out: &mut Vec<String>) {
        for (key, value) in values.iter() {
            out.push(format!("{key}={}", template_literal(value)));
        }
    }

    let mut args = Vec::with_capacity(state.variants.len() + state.content.len());
    push_all(&state.variants, &mut args);
    push_all(&state.content, &mut args);
    args
}

/// Template literal for a value: bare booleans and numbers, double-quoted strings.
pub fn template_literal(value: &FieldValue) -> String {
    match value {
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::Number(n) => n.to_string(),
        FieldValue::Text(s) => {
            let mut out = String::with_capacity(s.len() + 2);
            out.push('"');
            for c in s.chars() {
                if matches!(c, '"' | '\\') {
                    out.push('\\');
                }
                out.push(c);
            }
            out.push('"');
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{ComponentSchema, FieldSpec};
    use crate::state::{FieldCategory, init_state};

    #[test]
    fn breaks_between_adjacent_tags() {
        let markup = r#"<div class="card"><h3 class="card__title">Title</h3><p>Body</p></div>"#;
        insta::assert_snapshot!(to_markup_snippet(markup), @r#"
        <div class="card">
        <h3 class="card__title">Title</h3>
        <p>Body</p>
        </div>
        "#);
    }

    #[test]
    fn leaves_attribute_and_comment_content_alone() {
        let markup = r#"<a title="a><b">x</a><!--<i></i>--><br>"#;
        assert_eq!(
            to_markup_snippet(markup),
            "<a title=\"a><b\">x</a>\n<!--<i></i>-->\n<br>"
        );
    }

    #[test]
    fn drops_blank_lines_and_trims() {
        let markup = "\n\n<ul>\n\n  <li>One</li>\n   \n</ul>\n";
        assert_eq!(to_markup_snippet(markup), "<ul>\n  <li>One</li>\n</ul>");
    }

    #[test]
    fn indents_nested_elements() {
        let markup = r#"<div class="input-group"><label>Name</label><input type="text"><span class="input-group__helper">Help</span></div>"#;
        insta::assert_snapshot!(to_indented_markup(markup), @r#"
        <div class="input-group">
          <label>Name</label>
          <input type="text">
          <span class="input-group__helper">Help</span>
        </div>
        "#);
    }

    #[test]
    fn indents_text_inside_open_elements() {
        let markup = "<nav class=\"navbar\">\n<a href=\"/\">\nHome\n</a>\n</nav>";
        assert_eq!(
            to_indented_markup(markup),
            "<nav class=\"navbar\">\n  <a href=\"/\">\n    Home\n  </a>\n</nav>"
        );
    }

    #[test]
    fn template_snippet_lists_variants_then_content() {
        let schema = ComponentSchema::new("card")
            .with_content("title", FieldSpec::text("Title", "Card title"))
            .with_variant("hasHeader", FieldSpec::checkbox("Header", true))
            .with_variant("size", FieldSpec::select("Size", ["sm", "md"], "md"));
        let mut state = init_state(&schema);
        state.set_field(&schema, FieldCategory::Content, "title", "Say \"hi\"".into());
        assert_eq!(
            to_template_snippet("card", &state),
            r#"{% include 'components/card/card.twig' with { hasHeader=true, size="md", title="Say \"hi\"" } %}"#
        );
    }

    #[test]
    fn template_snippet_without_fields_omits_with() {
        let state = init_state(&ComponentSchema::new("divider"));
        assert_eq!(
            to_template_snippet_with("divider", &state, "html.twig"),
            "{% include 'components/divider/divider.html.twig' %}"
        );
    }

    #[test]
    fn numbers_are_bare_literals() {
        let value: FieldValue = serde_json::from_str("3").unwrap();
        assert_eq!(template_literal(&value), "3");
        assert_eq!(template_literal(&FieldValue::from("a\\b")), r#""a\\b""#);
    }
}
