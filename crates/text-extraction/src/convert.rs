//! HTML fragment to plain text, keeping document structure as section markers.
//!
//! Headings at levels 1-3 become inline markers (`[Section: ...]`,
//! `[Subsection: ...]`, `[Subsubsection: ...]`) on their own paragraph so the
//! model can cite where a passage lives. Everything else flows as ordinary
//! text: blocks on new lines, paragraphs separated by a blank line, no word
//! wrapping.

use scraper::{node::Node, ElementRef, Html};

use crate::error::ContentError;

/// Elements whose content never reaches the text.
const SKIPPED_TAGS: [&str; 11] = [
    "script", "style", "noscript", "template", "head", "title", "iframe", "svg", "canvas",
    "object", "select",
];

/// Nesting depth past which a subtree is flattened to its bare text.
const MAX_DEPTH: usize = 256;

/// Marker label for a heading level, if that level is tracked.
pub fn section_label(level: u8) -> Option<&'static str> {
    match level {
        1 => Some("Section"),
        2 => Some("Subsection"),
        3 => Some("Subsubsection"),
        _ => None,
    }
}

/// Convert an HTML fragment to text with section markers.
pub fn html_to_text_with_sections(html: &str) -> Result<String, ContentError> {
    if html.trim().is_empty() {
        return Err(ContentError::Conversion("empty HTML fragment".to_string()));
    }

    let fragment = Html::parse_fragment(html);
    let mut writer = TextWriter::default();
    writer.walk_children(fragment.root_element());
    Ok(writer.finish())
}

#[derive(Default)]
struct TextWriter {
    out: String,
    pending_breaks: usize,
    pending_space: bool,
    list_depth: usize,
    depth: usize,
}

impl TextWriter {
    fn walk_children(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => self.push_text(&text.text),
                Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        self.visit(child);
                    }
                }
                _ => {}
            }
        }
    }

    fn visit(&mut self, element: ElementRef<'_>) {
        if self.depth >= MAX_DEPTH {
            self.flatten(element);
            return;
        }
        self.depth += 1;
        self.visit_element(element);
        self.depth -= 1;
    }

    /// Push every text node under `element` without descending recursively.
    fn flatten(&mut self, element: ElementRef<'_>) {
        for node in element.descendants() {
            let Node::Text(text) = node.value() else {
                continue;
            };
            let skipped = node
                .parent()
                .and_then(ElementRef::wrap)
                .is_some_and(|parent| SKIPPED_TAGS.contains(&parent.value().name()));
            if !skipped {
                self.push_text(&text.text);
            }
        }
    }

    fn visit_element(&mut self, element: ElementRef<'_>) {
        let tag = element.value().name();
        match tag {
            _ if SKIPPED_TAGS.contains(&tag) => {}
            "h1" | "h2" | "h3" => {
                let level = tag.as_bytes()[1] - b'0';
                self.heading(element, level);
            }
            "br" => self.line_break(),
            "ul" => self.list(element, false),
            "ol" => self.list(element, true),
            "pre" => {
                let text: String = element.text().collect();
                self.block_break(2);
                self.push_literal(text.trim_end());
                self.block_break(2);
            }
            "a" => self.link(element),
            "img" => {
                if let Some(alt) = element.value().attr("alt") {
                    self.push_text(alt);
                }
            }
            "td" | "th" => {
                self.walk_children(element);
                self.pending_space = true;
            }
            "p" | "blockquote" | "table" | "h4" | "h5" | "h6" | "figure" | "dl" | "hr" => {
                self.block(element, 2);
            }
            "div" | "section" | "article" | "main" | "header" | "footer" | "aside" | "nav"
            | "form" | "tr" | "li" | "dt" | "dd" | "address" | "figcaption" | "details"
            | "summary" | "fieldset" | "caption" => {
                self.block(element, 1);
            }
            _ => self.walk_children(element),
        }
    }

    fn block(&mut self, element: ElementRef<'_>, breaks: usize) {
        self.block_break(breaks);
        self.walk_children(element);
        self.block_break(breaks);
    }

    fn heading(&mut self, element: ElementRef<'_>, level: u8) {
        let mut inner = TextWriter {
            depth: self.depth,
            ..TextWriter::default()
        };
        inner.walk_children(element);
        let text = inner.finish().split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            return;
        }

        let label = section_label(level).unwrap_or("Section");
        self.block_break(2);
        self.push_literal(&format!("[{}: {}]", label, text));
        self.block_break(2);
    }

    fn list(&mut self, element: ElementRef<'_>, ordered: bool) {
        let breaks = if self.list_depth == 0 { 2 } else { 1 };
        let mut number: i64 = element
            .value()
            .attr("start")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(1);

        self.block_break(breaks);
        self.list_depth += 1;
        for child in element.children() {
            let Some(child) = ElementRef::wrap(child) else {
                continue;
            };
            if child.value().name() != "li" {
                self.visit(child);
                continue;
            }

            let indent = "  ".repeat(self.list_depth - 1);
            let bullet = if ordered {
                format!("{}{}. ", indent, number)
            } else {
                format!("{}* ", indent)
            };
            number = number.saturating_add(1);

            self.block_break(1);
            self.push_literal(&bullet);
            self.walk_children(child);
            self.block_break(1);
        }
        self.list_depth -= 1;
        self.block_break(breaks);
    }

    fn link(&mut self, element: ElementRef<'_>) {
        self.walk_children(element);

        let Some(href) = element.value().attr("href") else {
            return;
        };
        if !(href.starts_with("http://") || href.starts_with("https://")) {
            return;
        }
        let label = element.text().collect::<Vec<_>>().join(" ");
        if label.split_whitespace().collect::<Vec<_>>().join(" ") == href {
            return;
        }

        self.pending_space = true;
        self.push_literal(&format!("[{}]", href));
    }

    /// Append flowing text, collapsing runs of whitespace.
    fn push_text(&mut self, text: &str) {
        for ch in text.chars() {
            if ch.is_whitespace() {
                self.pending_space = true;
                continue;
            }
            self.flush_pending();
            self.out.push(ch);
        }
    }

    /// Append text verbatim, after any pending separators.
    fn push_literal(&mut self, text: &str) {
        self.flush_pending();
        self.out.push_str(text);
    }

    fn block_break(&mut self, breaks: usize) {
        self.pending_breaks = self.pending_breaks.max(breaks);
    }

    fn line_break(&mut self) {
        if self.out.is_empty() {
            return;
        }
        self.trim_trailing_spaces();
        self.out.push('\n');
        self.pending_space = false;
    }

    fn flush_pending(&mut self) {
        if self.out.is_empty() {
            self.pending_breaks = 0;
            self.pending_space = false;
            return;
        }

        if self.pending_breaks > 0 {
            self.trim_trailing_spaces();
            let existing = self.out.chars().rev().take_while(|c| *c == '\n').count();
            for _ in existing..self.pending_breaks {
                self.out.push('\n');
            }
        } else if self.pending_space && !self.out.ends_with([' ', '\n']) {
            self.out.push(' ');
        }

        self.pending_breaks = 0;
        self.pending_space = false;
    }

    fn trim_trailing_spaces(&mut self) {
        let len = self.out.trim_end_matches(' ').len();
        self.out.truncate(len);
    }

    fn finish(self) -> String {
        let mut result = String::with_capacity(self.out.len());
        let mut blank_run = 0;
        for line in self.out.lines().map(str::trim_end) {
            if line.is_empty() {
                blank_run += 1;
                if blank_run > 1 {
                    continue;
                }
            } else {
                blank_run = 0;
            }
            result.push_str(line);
            result.push('\n');
        }
        result.trim().to_string()
    }
}
