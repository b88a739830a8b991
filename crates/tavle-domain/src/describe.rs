use serde::{Deserialize, Serialize};

/// An issue description: either a plain string or the tracker's recursive
/// rich-text document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Doc(DocNode),
}

/// One node of the rich-text document. The node type is an open set; every
/// type without dedicated rendering falls back to concatenating its children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocNode {
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<DocAttrs>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<DocNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocAttrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl DocNode {
    fn is_checked(&self) -> bool {
        self.attrs
            .as_ref()
            .and_then(|attrs| attrs.state.as_deref())
            .is_some_and(|state| state.eq_ignore_ascii_case("done"))
    }
}

pub const EMPTY_PLACEHOLDER: &str = "—";

/// Render a description to plain text with line breaks preserved.
/// Missing or effectively empty input renders as the placeholder dash.
pub fn render(description: Option<&Description>) -> String {
    let text = match description {
        None => String::new(),
        Some(Description::Text(text)) => text.clone(),
        Some(Description::Doc(node)) => {
            let mut out = String::new();
            walk(node, &mut out);
            out.trim_end().to_string()
        }
    };

    if text.trim().is_empty() {
        EMPTY_PLACEHOLDER.to_string()
    } else {
        text
    }
}

fn walk(node: &DocNode, out: &mut String) {
    match node.node_type.as_str() {
        "text" => {
            if let Some(text) = node.text.as_deref() {
                out.push_str(text);
            }
        }
        "hardBreak" => out.push('\n'),
        "paragraph" => {
            for child in &node.content {
                walk(child, out);
            }
            out.push_str("\n\n");
        }
        // Both list kinds render with a bullet; numbering is not computed.
        "bulletList" | "orderedList" => {
            for item in &node.content {
                out.push_str("• ");
                out.push_str(&inline_text(item));
                out.push('\n');
            }
            out.push('\n');
        }
        "taskList" => {
            for item in &node.content {
                out.push_str(if item.is_checked() { "[x] " } else { "[ ] " });
                out.push_str(&inline_text(item));
                out.push('\n');
            }
            out.push('\n');
        }
        _ => {
            for child in &node.content {
                walk(child, out);
            }
        }
    }
}

/// Flatten a node to single-line text for list items.
fn inline_text(node: &DocNode) -> String {
    let mut out = String::new();
    collect_inline(node, &mut out);
    out.trim().to_string()
}

fn collect_inline(node: &DocNode, out: &mut String) {
    match node.node_type.as_str() {
        "text" => {
            if let Some(text) = node.text.as_deref() {
                out.push_str(text);
            }
        }
        "hardBreak" => out.push(' '),
        _ => {
            for child in &node.content {
                collect_inline(child, out);
            }
        }
    }
}

/// Escape text for embedding into HTML markup. Runs after text extraction,
/// never before: escaping structured markers first would corrupt nested
/// content.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render a description as an HTML fragment: escaped text with newlines
/// turned into explicit break tags.
pub fn render_html(description: Option<&Description>) -> String {
    escape_html(&render(description)).replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(content: Vec<DocNode>) -> Description {
        Description::Doc(DocNode {
            node_type: "doc".to_string(),
            content,
            ..Default::default()
        })
    }

    fn text(value: &str) -> DocNode {
        DocNode {
            node_type: "text".to_string(),
            text: Some(value.to_string()),
            ..Default::default()
        }
    }

    fn node(node_type: &str, content: Vec<DocNode>) -> DocNode {
        DocNode {
            node_type: node_type.to_string(),
            content,
            ..Default::default()
        }
    }

    fn task_item(value: &str, done: bool) -> DocNode {
        DocNode {
            node_type: "taskItem".to_string(),
            attrs: Some(DocAttrs {
                state: Some(if done { "DONE" } else { "TODO" }.to_string()),
            }),
            content: vec![text(value)],
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_renders_placeholder() {
        assert_eq!(render(None), "—");
        assert_eq!(render(Some(&Description::Text("  ".to_string()))), "—");
    }

    #[test]
    fn test_plain_string_verbatim() {
        let description = Description::Text("just text\nwith a newline".to_string());
        assert_eq!(render(Some(&description)), "just text\nwith a newline");
    }

    #[test]
    fn test_paragraphs_separated_by_blank_line() {
        let description = doc(vec![
            node("paragraph", vec![text("First")]),
            node("paragraph", vec![text("Second")]),
        ]);
        assert_eq!(render(Some(&description)), "First\n\nSecond");
    }

    #[test]
    fn test_task_list_checked_and_unchecked_lines() {
        let description = doc(vec![node(
            "taskList",
            vec![task_item("ship it", true), task_item("write docs", false)],
        )]);
        let rendered = render(Some(&description));
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines, vec!["[x] ship it", "[ ] write docs"]);
    }

    #[test]
    fn test_bullet_and_ordered_lists_render_identically() {
        let items = vec![
            node("listItem", vec![node("paragraph", vec![text("one")])]),
            node("listItem", vec![node("paragraph", vec![text("two")])]),
        ];
        let bulleted = doc(vec![node("bulletList", items.clone())]);
        let ordered = doc(vec![node("orderedList", items)]);
        assert_eq!(render(Some(&bulleted)), render(Some(&ordered)));
        assert_eq!(render(Some(&bulleted)), "• one\n• two");
    }

    #[test]
    fn test_unknown_container_falls_back_to_children() {
        let description = doc(vec![node(
            "panel",
            vec![node("paragraph", vec![text("inside a panel")])],
        )]);
        assert_eq!(render(Some(&description)), "inside a panel");
    }

    #[test]
    fn test_hard_break_is_a_newline() {
        let description = doc(vec![node(
            "paragraph",
            vec![text("one"), node("hardBreak", vec![]), text("two")],
        )]);
        assert_eq!(render(Some(&description)), "one\ntwo");
    }

    #[test]
    fn test_escape_html_covers_all_special_characters() {
        assert_eq!(
            escape_html(r#"a < b && c > "d""#),
            "a &lt; b &amp;&amp; c &gt; &quot;d&quot;"
        );
    }

    #[test]
    fn test_render_html_escapes_after_extraction() {
        let description = doc(vec![node("paragraph", vec![text("<b>bold & \"q\"</b>")])]);
        let html = render_html(Some(&description));
        assert_eq!(html, "&lt;b&gt;bold &amp; &quot;q&quot;&lt;/b&gt;");
    }

    #[test]
    fn test_render_html_converts_newlines_to_breaks() {
        let description = doc(vec![
            node("paragraph", vec![text("First")]),
            node("paragraph", vec![text("Second")]),
        ]);
        assert_eq!(render_html(Some(&description)), "First<br><br>Second");
    }

    #[test]
    fn test_doc_deserializes_from_tracker_json() {
        let raw = r#"{
            "type": "doc",
            "content": [
                {"type": "paragraph", "content": [{"type": "text", "text": "Hello"}]},
                {"type": "taskList", "content": [
                    {"type": "taskItem", "attrs": {"state": "DONE"},
                     "content": [{"type": "text", "text": "checked"}]}
                ]}
            ]
        }"#;
        let description: Description = serde_json::from_str(raw).unwrap();
        let rendered = render(Some(&description));
        assert!(rendered.starts_with("Hello"));
        assert!(rendered.contains("[x] checked"));
    }

    #[test]
    fn test_string_description_deserializes() {
        let description: Description = serde_json::from_str(r#""plain words""#).unwrap();
        assert_eq!(description, Description::Text("plain words".to_string()));
    }
}
