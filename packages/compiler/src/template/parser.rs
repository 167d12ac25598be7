//! Template parser implementation.
//!
//! A single-pass tree builder over the template text. All malformed markup
//! is reported as `ParseError`s on the returned `ParsedTemplate`; the parser
//! itself never fails.

use once_cell::sync::Lazy;
use std::collections::HashSet;

use crate::ml_parser::defaults::{default_interpolation_config, InterpolationConfig};
use crate::parse_util::{ParseError, ParseLocation, ParseSourceFile, ParseSourceSpan};

use super::ast::*;
use super::{LexerRange, ParseTemplateOptions, ParsedTemplate, TemplateSource};

static VOID_ELEMENTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
        "track", "wbr",
    ]
    .into_iter()
    .collect()
});

pub(super) fn parse(code: &str, template_url: &str, options: ParseTemplateOptions) -> ParsedTemplate {
    let range = options.range.unwrap_or(LexerRange {
        start_pos: 0,
        start_line: 0,
        start_col: 0,
        end_pos: code.len(),
    });
    let slice = &code[range.start_pos..range.end_pos];

    let mut text = slice.to_string();
    let mut rewritten = false;
    if options.escaped_string {
        text = unescape_template_string(&text);
        rewritten = true;
    }
    if options.i18n_normalize_line_endings_in_icus && text.contains("\r\n") {
        text = text.replace("\r\n", "\n");
        rewritten = true;
    }

    // Spans stay absolute within the enclosing file as long as the template
    // text was not rewritten; otherwise they are relative to the rewritten
    // template text.
    let (file, base_offset) = if rewritten {
        (
            ParseSourceFile::new(text.clone(), template_url.to_string()),
            0,
        )
    } else {
        (
            ParseSourceFile::new(code.to_string(), template_url.to_string()),
            range.start_pos,
        )
    };

    let interpolation_config = options
        .interpolation_config
        .clone()
        .unwrap_or_else(default_interpolation_config);

    let mut builder = TreeBuilder {
        text: &text,
        file,
        line_starts: compute_line_starts(if rewritten { &text } else { code }),
        base_offset,
        interp: interpolation_config,
        errors: Vec::new(),
    };

    let mut nodes = builder.parse_nodes();
    if !options.preserve_whitespaces {
        nodes = remove_whitespaces(nodes);
    }

    let mut ng_content_selectors = Vec::new();
    collect_ng_content_selectors(&nodes, &mut ng_content_selectors);

    ParsedTemplate {
        nodes,
        ng_content_selectors,
        errors: builder.errors,
        preserve_whitespaces: options.preserve_whitespaces,
        is_inline: options.is_inline,
        template: TemplateSource::String(text),
        template_url: template_url.to_string(),
    }
}

struct OpenElement {
    name: String,
    attributes: Vec<TmplAstTextAttribute>,
    children: Vec<TmplAstNode>,
    start: usize,
}

struct TreeBuilder<'a> {
    text: &'a str,
    file: ParseSourceFile,
    line_starts: Vec<usize>,
    base_offset: usize,
    interp: InterpolationConfig,
    errors: Vec<ParseError>,
}

impl<'a> TreeBuilder<'a> {
    fn parse_nodes(&mut self) -> Vec<TmplAstNode> {
        let bytes = self.text.as_bytes();
        let len = bytes.len();
        let mut top: Vec<TmplAstNode> = Vec::new();
        let mut stack: Vec<OpenElement> = Vec::new();
        let mut pos = 0;

        while pos < len {
            if self.text[pos..].starts_with("<!--") {
                match self.text[pos + 4..].find("-->") {
                    Some(idx) => pos = pos + 4 + idx + 3,
                    None => {
                        let span = self.span(pos, len);
                        self.errors.push(ParseError::new(span, "Unterminated comment".to_string()));
                        pos = len;
                    }
                }
            } else if self.text[pos..].starts_with("</") {
                pos = self.parse_closing_tag(pos, &mut stack, &mut top);
            } else if bytes[pos] == b'<' && pos + 1 < len && bytes[pos + 1].is_ascii_alphabetic() {
                pos = self.parse_opening_tag(pos, &mut stack, &mut top);
            } else {
                // The character at `pos` is always part of the text run, so
                // step over it whole before searching for the next tag.
                let next = pos + self.text[pos..].chars().next().map_or(1, char::len_utf8);
                let end = match self.text[next..].find('<') {
                    Some(idx) => next + idx,
                    None => len,
                };
                self.consume_text(pos, end, &mut stack, &mut top);
                pos = end;
            }
        }

        // Unclosed elements are closed at the end of input, innermost first.
        while let Some(open) = stack.pop() {
            let span = self.span(open.start, len);
            self.errors.push(ParseError::new(
                span,
                format!("Unexpected end of template, expected closing tag \"</{}>\"", open.name),
            ));
            let node = self.finish_element(open, len);
            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => top.push(node),
            }
        }

        top
    }

    fn parse_closing_tag(
        &mut self,
        start: usize,
        stack: &mut Vec<OpenElement>,
        top: &mut Vec<TmplAstNode>,
    ) -> usize {
        let bytes = self.text.as_bytes();
        let len = bytes.len();
        let mut pos = start + 2;
        let name_start = pos;
        while pos < len && is_name_char(bytes[pos]) {
            pos += 1;
        }
        let name = self.text[name_start..pos].to_string();
        while pos < len && bytes[pos] != b'>' {
            pos += 1;
        }
        if pos == len {
            let span = self.span(start, len);
            self.errors.push(ParseError::new(
                span,
                format!("Unterminated closing tag \"</{}>\"", name),
            ));
            return len;
        }
        pos += 1;

        match stack.iter().rposition(|open| open.name == name) {
            Some(open_idx) => {
                // Implicitly close anything left open inside the matched element.
                while stack.len() > open_idx + 1 {
                    let open = stack.pop().unwrap();
                    let span = self.span(open.start, start);
                    self.errors.push(ParseError::new(
                        span,
                        format!("Element \"{}\" is never closed", open.name),
                    ));
                    let node = self.finish_element(open, start);
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => top.push(node),
                    }
                }
                let open = stack.pop().unwrap();
                let node = self.finish_element(open, pos);
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => top.push(node),
                }
            }
            None => {
                let span = self.span(start, pos);
                self.errors.push(ParseError::new(
                    span,
                    format!("Unexpected closing tag \"</{}>\"", name),
                ));
            }
        }
        pos
    }

    fn parse_opening_tag(
        &mut self,
        start: usize,
        stack: &mut Vec<OpenElement>,
        top: &mut Vec<TmplAstNode>,
    ) -> usize {
        let bytes = self.text.as_bytes();
        let len = bytes.len();
        let mut pos = start + 1;
        let name_start = pos;
        while pos < len && is_name_char(bytes[pos]) {
            pos += 1;
        }
        let name = self.text[name_start..pos].to_string();

        let mut attributes = Vec::new();
        let mut self_closing = false;
        loop {
            while pos < len && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if pos == len {
                let span = self.span(start, len);
                self.errors.push(ParseError::new(
                    span,
                    format!("Unexpected end of input inside tag \"<{}>\"", name),
                ));
                break;
            }
            if self.text[pos..].starts_with("/>") {
                self_closing = true;
                pos += 2;
                break;
            }
            if bytes[pos] == b'>' {
                pos += 1;
                break;
            }
            pos = self.parse_attribute(pos, &mut attributes);
        }

        let open = OpenElement {
            name: name.clone(),
            attributes,
            children: Vec::new(),
            start,
        };
        if self_closing || VOID_ELEMENTS.contains(name.as_str()) {
            let node = self.finish_element(open, pos);
            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => top.push(node),
            }
        } else {
            stack.push(open);
        }
        pos
    }

    fn parse_attribute(&mut self, start: usize, attributes: &mut Vec<TmplAstTextAttribute>) -> usize {
        let bytes = self.text.as_bytes();
        let len = bytes.len();
        let mut pos = start;
        let name_start = pos;
        while pos < len && !bytes[pos].is_ascii_whitespace() && !matches!(bytes[pos], b'=' | b'>' | b'/') {
            pos += 1;
        }
        if pos == name_start {
            // Stray character; skip it whole so the tag loop makes progress.
            return pos + self.text[pos..].chars().next().map_or(1, char::len_utf8);
        }
        let name = self.text[name_start..pos].to_string();

        let mut value = String::new();
        if pos < len && bytes[pos] == b'=' {
            pos += 1;
            while pos < len && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if pos < len && (bytes[pos] == b'"' || bytes[pos] == b'\'') {
                let quote = bytes[pos] as char;
                pos += 1;
                match self.text[pos..].find(quote) {
                    Some(idx) => {
                        value = self.text[pos..pos + idx].to_string();
                        pos += idx + 1;
                    }
                    None => {
                        let span = self.span(start, len);
                        self.errors.push(ParseError::new(
                            span,
                            format!("Unterminated value for attribute \"{}\"", name),
                        ));
                        pos = len;
                    }
                }
            } else {
                let value_start = pos;
                while pos < len && !bytes[pos].is_ascii_whitespace() && bytes[pos] != b'>' {
                    pos += 1;
                }
                value = self.text[value_start..pos].to_string();
            }
        }

        let span = self.span(start, pos);
        attributes.push(TmplAstTextAttribute { name, value, source_span: span });
        pos
    }

    fn finish_element(&mut self, open: OpenElement, end: usize) -> TmplAstNode {
        let span = self.span(open.start, end);
        if open.name == "ng-content" {
            let selector = open
                .attributes
                .iter()
                .find(|attr| attr.name == "select")
                .map(|attr| attr.value.clone())
                .unwrap_or_else(|| "*".to_string());
            TmplAstNode::Content(TmplAstContent { selector, source_span: span })
        } else {
            TmplAstNode::Element(TmplAstElement {
                name: open.name,
                attributes: open.attributes,
                children: open.children,
                source_span: span,
            })
        }
    }

    fn consume_text(
        &mut self,
        start: usize,
        end: usize,
        stack: &mut Vec<OpenElement>,
        top: &mut Vec<TmplAstNode>,
    ) {
        let interp_start = self.interp.start.clone();
        let interp_end = self.interp.end.clone();
        let mut nodes = Vec::new();
        let mut cursor = start;

        while let Some(found) = self.text[cursor..end].find(&interp_start) {
            let marker_start = cursor + found;
            if marker_start > cursor {
                let span = self.span(cursor, marker_start);
                nodes.push(TmplAstNode::Text(TmplAstText {
                    value: self.text[cursor..marker_start].to_string(),
                    source_span: span,
                }));
            }
            let expr_start = marker_start + interp_start.len();
            match self.text[expr_start..end].find(&interp_end) {
                Some(idx) => {
                    let expr_end = expr_start + idx;
                    let span = self.span(marker_start, expr_end + interp_end.len());
                    nodes.push(TmplAstNode::BoundText(TmplAstBoundText {
                        value: self.text[expr_start..expr_end].trim().to_string(),
                        source_span: span,
                    }));
                    cursor = expr_end + interp_end.len();
                }
                None => {
                    let span = self.span(marker_start, end);
                    self.errors.push(ParseError::new(
                        span.clone(),
                        format!(
                            "Unterminated interpolation, expected closing marker \"{}\"",
                            interp_end
                        ),
                    ));
                    nodes.push(TmplAstNode::BoundText(TmplAstBoundText {
                        value: self.text[expr_start..end].trim().to_string(),
                        source_span: span,
                    }));
                    cursor = end;
                }
            }
        }
        if cursor < end {
            let span = self.span(cursor, end);
            nodes.push(TmplAstNode::Text(TmplAstText {
                value: self.text[cursor..end].to_string(),
                source_span: span,
            }));
        }

        for node in nodes {
            match stack.last_mut() {
                Some(parent) => parent.children.push(node),
                None => top.push(node),
            }
        }
    }

    fn span(&self, start: usize, end: usize) -> ParseSourceSpan {
        ParseSourceSpan::new(self.location(start), self.location(end))
    }

    fn location(&self, local_offset: usize) -> ParseLocation {
        let offset = local_offset + self.base_offset;
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        ParseLocation::new(self.file.clone(), offset, line, offset - self.line_starts[line])
    }
}

fn is_name_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b':' | b'.')
}

fn compute_line_starts(content: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (idx, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            starts.push(idx + 1);
        }
    }
    starts
}

/// Drops whitespace-only text nodes and collapses interior whitespace runs,
/// mirroring the compiler's default whitespace removal.
fn remove_whitespaces(nodes: Vec<TmplAstNode>) -> Vec<TmplAstNode> {
    nodes
        .into_iter()
        .filter_map(|node| match node {
            TmplAstNode::Text(text) => {
                if text.value.trim().is_empty() {
                    None
                } else {
                    Some(TmplAstNode::Text(TmplAstText {
                        value: collapse_whitespace(&text.value),
                        source_span: text.source_span,
                    }))
                }
            }
            TmplAstNode::Element(mut element) => {
                element.children = remove_whitespaces(element.children);
                Some(TmplAstNode::Element(element))
            }
            other => Some(other),
        })
        .collect()
}

fn collapse_whitespace(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_whitespace = false;
    for ch in value.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push(' ');
                in_whitespace = true;
            }
        } else {
            out.push(ch);
            in_whitespace = false;
        }
    }
    out
}

fn collect_ng_content_selectors(nodes: &[TmplAstNode], selectors: &mut Vec<String>) {
    for node in nodes {
        match node {
            TmplAstNode::Content(content) => selectors.push(content.selector.clone()),
            TmplAstNode::Element(element) => {
                collect_ng_content_selectors(&element.children, selectors)
            }
            _ => {}
        }
    }
}

/// Undoes JavaScript string-literal escaping so the parser sees the template
/// text the author wrote.
fn unescape_template_string(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('v') => out.push('\u{b}'),
            Some('f') => out.push('\u{c}'),
            Some('b') => out.push('\u{8}'),
            Some('0') => out.push('\0'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('u');
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_template_string() {
        assert_eq!(unescape_template_string(r"<h1>\n</h1>"), "<h1>\n</h1>");
        assert_eq!(unescape_template_string(r#"\"hi\""#), "\"hi\"");
        assert_eq!(unescape_template_string(r"é"), "é");
        assert_eq!(unescape_template_string(r"a\\b"), "a\\b");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a \n\t b"), "a b");
    }

    #[test]
    fn test_line_starts() {
        assert_eq!(compute_line_starts("a\nbb\nccc"), vec![0, 2, 5]);
    }
}
