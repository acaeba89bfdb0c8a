//! Tree to markup.
//!
//! Follows browser `innerHTML` serialization: every attribute is written
//! double-quoted (`disabled=""` for boolean ones), void elements get no end
//! tag and script/style content is written verbatim.

use super::{Element, Node};

pub(super) fn write_nodes(nodes: &[Node], raw: bool, out: &mut String) {
    for node in nodes {
        match node {
            Node::Element(el) => write_element(el, out),
            Node::Text(text) if raw => out.push_str(text),
            Node::Text(text) => out.push_str(&html_escape::encode_text(text)),
            Node::Comment(body) => {
                out.push_str("<!--");
                out.push_str(body);
                out.push_str("-->");
            }
            Node::Doctype(body) => {
                out.push_str("<!");
                out.push_str(body);
                out.push('>');
            }
        }
    }
}

pub(super) fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.name);
    for attr in &el.attributes {
        out.push(' ');
        out.push_str(&attr.name);
        out.push_str("=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(&attr.value));
        out.push('"');
    }
    out.push('>');

    if el.is_void() {
        return;
    }

    write_nodes(&el.children, el.is_raw_text(), out);
    out.push_str("</");
    out.push_str(&el.name);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use crate::dom::{Element, Fragment};

    #[test]
    fn round_trips_ordinary_markup() {
        let markup = "<!-- card -->\n<div class=\"card\" id=\"c1\">\n  <h3 class=\"card__title\">Title</h3>\n  <img src=\"a.png\" alt=\"\">\n</div>\n";
        assert_eq!(Fragment::parse(markup).to_html(), markup);
    }

    #[test]
    fn boolean_attributes_get_empty_values() {
        let fragment = Fragment::parse("<input type=checkbox disabled>");
        assert_eq!(fragment.to_html(), r#"<input type="checkbox" disabled="">"#);
    }

    #[test]
    fn escapes_text_and_attributes() {
        let el = Element::new("p")
            .with_attribute("title", "say \"hi\" & go")
            .with_text("1 < 2 & 3");
        assert_eq!(
            el.outer_html(),
            r#"<p title="say &quot;hi&quot; &amp; go">1 &lt; 2 &amp; 3</p>"#
        );
    }

    #[test]
    fn self_closed_non_void_elements_get_end_tags() {
        let fragment = Fragment::parse("<span class=\"icon\"/>");
        assert_eq!(fragment.to_html(), "<span class=\"icon\"></span>");
    }

    #[test]
    fn script_content_is_not_escaped() {
        let markup = "<script>if (a < b && c) {}</script>";
        assert_eq!(Fragment::parse(markup).to_html(), markup);
    }

    #[test]
    fn inner_html_excludes_own_tags() {
        let fragment = Fragment::parse("<div><b>x</b> y</div>");
        assert_eq!(fragment.root().unwrap().inner_html(), "<b>x</b> y");
    }
}
