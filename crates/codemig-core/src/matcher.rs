//! Anchored matching over Java-like source text.
//!
//! Structural matching never looks at raw text. A [`CodeView`] keeps the
//! original text next to a *code mask*: a copy of the same byte length in
//! which the contents of comments, string/char literals and text blocks are
//! replaced by spaces (newlines survive). Offsets found in the mask are valid
//! offsets into the original, and braces or keywords that only appear inside
//! a literal or a comment can never be matched or counted.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{MigrateError, Result};

static IMPLEMENTS_KW: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bimplements\b").unwrap());
static EXTENDS_KW: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bextends\b").unwrap());

static CLASS_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:(?:public|protected|private|abstract|final|static|sealed|non-sealed|strictfp)\s+)*class\s+([A-Za-z_$][\w$]*)",
    )
    .unwrap()
});

/// Half-open byte range into a source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }
}

/// A located `class` declaration with a balanced body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    /// Start of the line holding the modifiers / `class` keyword.
    pub start: usize,
    /// Everything between the class name and the opening brace
    /// (type parameters, `extends`, `implements`).
    pub header: Span,
    pub open: usize,
    pub close: usize,
    /// Brace depth the declaration itself sits at.
    pub depth: usize,
}

impl Declaration {
    pub fn body(&self) -> Span {
        Span::new(self.open + 1, self.close)
    }

    /// Brace depth of the declaration's direct members.
    pub fn member_depth(&self) -> usize {
        self.depth + 1
    }
}

/// The relationship clauses of a class header, as absolute spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderClauses {
    /// The superclass, without the `extends` keyword.
    pub extends: Option<Span>,
    pub implements_kw: Option<Span>,
    /// One span per implemented interface, type arguments included.
    pub interfaces: Vec<Span>,
}

pub struct CodeView<'a> {
    text: &'a str,
    masked: String,
    code: Vec<bool>,
}

impl<'a> CodeView<'a> {
    pub fn new(text: &'a str) -> Self {
        let code = classify(text.as_bytes());
        let mut masked = String::with_capacity(text.len());
        for (idx, ch) in text.char_indices() {
            if code[idx] || ch == '\n' {
                masked.push(ch);
            } else {
                masked.extend(std::iter::repeat_n(' ', ch.len_utf8()));
            }
        }
        Self { text, masked, code }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn masked(&self) -> &str {
        &self.masked
    }

    /// Whether the byte at `pos` is code (not inside a comment or literal).
    /// Literal delimiters themselves count as code.
    pub fn is_code(&self, pos: usize) -> bool {
        self.code.get(pos).copied().unwrap_or(false)
    }

    pub fn find(&self, re: &Regex) -> Option<Span> {
        re.find(&self.masked).map(|m| Span::new(m.start(), m.end()))
    }

    pub fn find_all(&self, re: &Regex) -> Vec<Span> {
        self.find_within(re, Span::new(0, self.masked.len()))
    }

    pub fn find_within(&self, re: &Regex, within: Span) -> Vec<Span> {
        re.find_iter(&self.masked[within.start..within.end])
            .map(|m| Span::new(within.start + m.start(), within.start + m.end()))
            .collect()
    }

    /// Match `re` against the original text and return the first match that
    /// starts in code together with the text of its first capture group.
    pub fn capture(&self, re: &Regex) -> Option<(Span, String)> {
        re.captures_iter(self.text).find_map(|caps| {
            let whole = caps.get(0)?;
            if !self.is_code(whole.start()) {
                return None;
            }
            let value = caps.get(1)?.as_str().to_string();
            Some((Span::new(whole.start(), whole.end()), value))
        })
    }

    /// 1-based line number of `pos`.
    pub fn line_of(&self, pos: usize) -> usize {
        self.text[..pos.min(self.text.len())]
            .bytes()
            .filter(|&b| b == b'\n')
            .count()
            + 1
    }

    /// Brace depth at `pos`, counting only braces in code.
    pub fn depth_at(&self, pos: usize) -> usize {
        let mut depth = 0usize;
        for b in self.masked.as_bytes()[..pos.min(self.masked.len())].iter() {
            match b {
                b'{' => depth += 1,
                b'}' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        depth
    }

    /// Offset of the delimiter closing the one at `open`, balancing nested
    /// pairs. `None` when the text ends first.
    pub fn matching(&self, open: usize, open_ch: u8, close_ch: u8) -> Option<usize> {
        let bytes = self.masked.as_bytes();
        if bytes.get(open) != Some(&open_ch) {
            return None;
        }
        let mut depth = 0usize;
        for (i, &b) in bytes.iter().enumerate().skip(open) {
            if b == open_ch {
                depth += 1;
            } else if b == close_ch {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
        }
        None
    }

    pub fn matching_brace(&self, open: usize) -> Option<usize> {
        self.matching(open, b'{', b'}')
    }

    /// Locate the first top-level class declaration, or the one named `name`.
    pub fn find_class(&self, name: Option<&str>) -> Result<Declaration> {
        let anchor = match name {
            Some(name) => format!("class {name}"),
            None => "class declaration".to_string(),
        };

        let caps = CLASS_DECL
            .captures_iter(&self.masked)
            .find(|caps| {
                let whole = caps.get(0).map(|m| m.start()).unwrap_or_default();
                let matches_name = match name {
                    Some(name) => caps.get(1).is_some_and(|m| m.as_str() == name),
                    None => true,
                };
                matches_name && self.depth_at(whole) == 0
            })
            .ok_or_else(|| MigrateError::missing(anchor.clone()))?;

        // Both groups are guaranteed by the pattern.
        let (Some(whole), Some(ident)) = (caps.get(0), caps.get(1)) else {
            return Err(MigrateError::missing(anchor));
        };

        let bytes = self.masked.as_bytes();
        let open = bytes[ident.end()..]
            .iter()
            .position(|&b| b == b'{' || b == b';')
            .map(|i| ident.end() + i)
            .filter(|&i| bytes[i] == b'{')
            .ok_or_else(|| MigrateError::missing(format!("opening brace of {anchor}")))?;

        let close = self
            .matching_brace(open)
            .ok_or_else(|| MigrateError::Unbalanced {
                anchor: anchor.clone(),
                line: self.line_of(open),
            })?;

        Ok(Declaration {
            name: ident.as_str().to_string(),
            start: line_start(self.text, whole.start()),
            header: Span::new(ident.end(), open),
            open,
            close,
            depth: 0,
        })
    }

    /// Split `decl`'s header into its `extends` and `implements` clauses.
    /// Keywords inside type parameters (`<T extends Node>`) are bounds and
    /// are skipped.
    pub fn header_clauses(&self, decl: &Declaration) -> HeaderClauses {
        let header = decl.header;
        let masked = &self.masked[header.start..header.end];

        let implements = IMPLEMENTS_KW
            .find_iter(masked)
            .find(|m| angle_depth(&masked[..m.start()]) == 0);
        let extends_end = implements.map(|m| m.start()).unwrap_or(masked.len());

        let extends = EXTENDS_KW
            .find_iter(&masked[..extends_end])
            .find(|m| angle_depth(&masked[..m.start()]) == 0)
            .and_then(|m| {
                let raw = &masked[m.end()..extends_end];
                let lead = raw.len() - raw.trim_start().len();
                let target = raw.trim();
                let start = header.start + m.end() + lead;
                (!target.is_empty()).then(|| Span::new(start, start + target.len()))
            });

        let implements_kw =
            implements.map(|m| Span::new(header.start + m.start(), header.start + m.end()));
        let interfaces = implements_kw
            .map(|kw| split_top_level(&self.masked, Span::new(kw.end, header.end)))
            .unwrap_or_default();

        HeaderClauses {
            extends,
            implements_kw,
            interfaces,
        }
    }

    /// Matches of `re` that start directly inside `decl`'s body, not in a
    /// nested block.
    pub fn find_members(&self, decl: &Declaration, re: &Regex) -> Vec<Span> {
        self.find_within(re, decl.body())
            .into_iter()
            .filter(|span| self.depth_at(span.start) == decl.member_depth())
            .collect()
    }

    /// Full extent of the method whose signature match starts at `signature`:
    /// up to and including the brace closing its body (or the `;` of a
    /// body-less declaration).
    pub fn method_extent(&self, signature: Span, anchor: &str) -> Result<Span> {
        let bytes = self.masked.as_bytes();
        let params_open = bytes[signature.start..]
            .iter()
            .position(|&b| b == b'(')
            .map(|i| signature.start + i)
            .ok_or_else(|| MigrateError::missing(format!("parameter list of {anchor}")))?;
        let params_close =
            self.matching(params_open, b'(', b')')
                .ok_or_else(|| MigrateError::Unbalanced {
                    anchor: anchor.to_string(),
                    line: self.line_of(params_open),
                })?;

        let body_open = bytes[params_close..]
            .iter()
            .position(|&b| b == b'{' || b == b';')
            .map(|i| params_close + i)
            .ok_or_else(|| MigrateError::missing(format!("body of {anchor}")))?;

        if bytes[body_open] == b';' {
            return Ok(Span::new(signature.start, body_open + 1));
        }

        let body_close = self
            .matching_brace(body_open)
            .ok_or_else(|| MigrateError::Unbalanced {
                anchor: anchor.to_string(),
                line: self.line_of(body_open),
            })?;
        Ok(Span::new(signature.start, body_close + 1))
    }

    /// Leading whitespace used for `decl`'s members, taken from its first
    /// member line. Falls back to the class indentation plus two spaces.
    pub fn member_indent(&self, decl: &Declaration) -> (String, String) {
        let class_indent = leading_ws(&self.text[decl.start..]);
        let body = &self.text[decl.open + 1..decl.close];
        let member = body
            .lines()
            .skip(1)
            .find(|line| !line.trim().is_empty())
            .map(leading_ws)
            .filter(|ws| ws.len() > class_indent.len() && ws.starts_with(class_indent));

        match member {
            Some(indent) => {
                let unit = indent[class_indent.len()..].to_string();
                (indent.to_string(), unit)
            }
            None => (format!("{class_indent}  "), "  ".to_string()),
        }
    }
}

/// Literal phrase matched in code on identifier boundaries.
///
/// Whitespace inside the phrase matches any run of whitespace. A phrase that
/// starts with an identifier character does not match when preceded by an
/// identifier character or a `.` (so `mock(` does not match `Mockito.mock(`),
/// and one that ends with an identifier character does not match when
/// followed by one.
#[derive(Debug, Clone)]
pub struct Phrase {
    text: String,
    re: Regex,
    check_start: bool,
    check_end: bool,
}

impl Phrase {
    pub fn new(phrase: &str) -> std::result::Result<Self, regex::Error> {
        let pattern = phrase
            .split_whitespace()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s+");
        let trimmed = phrase.trim();
        Ok(Self {
            text: trimmed.to_string(),
            re: Regex::new(&pattern)?,
            check_start: trimmed.bytes().next().is_some_and(is_ident_byte),
            check_end: trimmed.bytes().last().is_some_and(is_ident_byte),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn find_all(&self, view: &CodeView<'_>) -> Vec<Span> {
        let bytes = view.masked().as_bytes();
        view.find_all(&self.re)
            .into_iter()
            .filter(|span| {
                let before_ok = !self.check_start
                    || span.start == 0
                    || !(is_ident_byte(bytes[span.start - 1]) || bytes[span.start - 1] == b'.');
                let after_ok =
                    !self.check_end || bytes.get(span.end).is_none_or(|&b| !is_ident_byte(b));
                before_ok && after_ok
            })
            .collect()
    }

    pub fn is_present(&self, view: &CodeView<'_>) -> bool {
        !self.find_all(view).is_empty()
    }
}

/// Simple name of a written type: `com.acme.Base<T>` becomes `Base`.
pub fn simple_type_name(written: &str) -> &str {
    let name = written.split('<').next().unwrap_or_default().trim();
    name.rsplit('.').next().unwrap_or(name).trim()
}

fn angle_depth(text: &str) -> usize {
    text.bytes().fold(0usize, |depth, b| match b {
        b'<' => depth + 1,
        b'>' => depth.saturating_sub(1),
        _ => depth,
    })
}

/// Comma-separated entries of `within`, trimmed, splitting only at commas
/// outside type arguments.
fn split_top_level(masked: &str, within: Span) -> Vec<Span> {
    let bytes = masked.as_bytes();
    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut start = within.start;

    let push = |from: usize, to: usize, entries: &mut Vec<Span>| {
        let raw = &masked[from..to];
        let lead = raw.len() - raw.trim_start().len();
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            entries.push(Span::new(from + lead, from + lead + trimmed.len()));
        }
    };

    for i in within.start..within.end {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                push(start, i, &mut entries);
                start = i + 1;
            }
            _ => {}
        }
    }
    push(start, within.end, &mut entries);
    entries
}

pub(crate) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

pub(crate) fn line_start(text: &str, pos: usize) -> usize {
    text[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// Offset just past the newline ending the line that holds `pos`.
pub(crate) fn line_end(text: &str, pos: usize) -> usize {
    text[pos..]
        .find('\n')
        .map(|i| pos + i + 1)
        .unwrap_or(text.len())
}

fn leading_ws(line: &str) -> &str {
    let trimmed = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - trimmed.len()]
}

/// Widen `span` to whole lines when only whitespace surrounds it.
pub(crate) fn expand_to_lines(text: &str, span: Span) -> Span {
    let ls = line_start(text, span.start);
    let start = if text[ls..span.start].trim().is_empty() {
        ls
    } else {
        span.start
    };
    let le = line_end(text, span.end);
    let end = if text[span.end..le].trim().is_empty() {
        le
    } else {
        span.end
    };
    Span::new(start, end)
}

/// Move `start` (a line start) upwards over the annotation lines and
/// complete comment blocks directly attached to the member below them.
/// A line that also holds code (`@Override void f() {}`) is never absorbed.
pub(crate) fn include_leading_attachments(view: &CodeView<'_>, mut start: usize) -> usize {
    let text = view.text();
    let masked = view.masked();
    let comment_only =
        |from: usize, to: usize| masked[from..to].trim().is_empty() && !text[from..to].trim().is_empty();

    while start > 0 {
        let prev = line_start(text, start - 1);
        if is_annotation_only(&masked[prev..start]) {
            start = prev;
            continue;
        }
        if !comment_only(prev, start) {
            break;
        }

        let mut top = prev;
        while top > 0 {
            let above = line_start(text, top - 1);
            if !comment_only(above, top) {
                break;
            }
            top = above;
        }
        // The block must open on its own line, not trail a statement above.
        let opening = text[top..].trim_start();
        if !(opening.starts_with("//") || opening.starts_with("/*")) {
            break;
        }
        start = top;
    }
    start
}

/// Whether a masked line holds nothing but annotations, each with balanced
/// arguments.
fn is_annotation_only(line: &str) -> bool {
    let mut rest = line.trim();
    if rest.is_empty() {
        return false;
    }
    while !rest.is_empty() {
        let Some(after_at) = rest.strip_prefix('@') else {
            return false;
        };
        let name_len = after_at
            .bytes()
            .take_while(|&b| is_ident_byte(b) || b == b'.')
            .count();
        if name_len == 0 {
            return false;
        }
        rest = after_at[name_len..].trim_start();
        if rest.starts_with('(') {
            let mut depth = 0usize;
            let Some(close) = rest.bytes().position(|b| {
                match b {
                    b'(' => depth += 1,
                    b')' => depth -= 1,
                    _ => {}
                }
                depth == 0
            }) else {
                return false;
            };
            rest = rest[close + 1..].trim_start();
        }
    }
    true
}

/// Remove `span` from `text`. When the span covers whole lines, also drop
/// one blank line above it if the removal would otherwise leave two blank
/// lines in a row or a blank line right before a closing brace.
pub fn remove_lines(text: &str, span: Span) -> String {
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..span.start]);
    out.push_str(&text[span.end..]);

    let at = span.start;
    if at == 0 || line_start(text, at) != at {
        return out;
    }

    let next = &out[at..line_end(&out, at)];
    let next_blank = next.trim().is_empty();
    let next_closes = next.trim_start().starts_with('}');

    let prev = line_start(&out, at - 1);
    if out[prev..at].trim().is_empty() && (next_blank || next_closes) {
        out.replace_range(prev..at, "");
    }
    out
}

fn classify(bytes: &[u8]) -> Vec<bool> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum State {
        Code,
        LineComment,
        BlockComment,
        Str,
        Char,
        TextBlock,
    }

    let mut code = vec![true; bytes.len()];
    let mut state = State::Code;
    let mut i = 0;
    let at = |i: usize, lit: &[u8]| bytes[i..].starts_with(lit);

    while i < bytes.len() {
        let b = bytes[i];
        match state {
            State::Code => {
                if at(i, b"//") {
                    state = State::LineComment;
                    continue;
                } else if at(i, b"/*") {
                    code[i] = false;
                    code[i + 1] = false;
                    state = State::BlockComment;
                    i += 2;
                    continue;
                } else if at(i, b"\"\"\"") {
                    state = State::TextBlock;
                    i += 3;
                    continue;
                } else if b == b'"' {
                    state = State::Str;
                } else if b == b'\'' {
                    state = State::Char;
                }
                i += 1;
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Code;
                } else {
                    code[i] = false;
                }
                i += 1;
            }
            State::BlockComment => {
                code[i] = false;
                if at(i, b"*/") {
                    code[i + 1] = false;
                    state = State::Code;
                    i += 2;
                } else {
                    i += 1;
                }
            }
            State::Str | State::Char => {
                let quote = if state == State::Str { b'"' } else { b'\'' };
                if b == b'\\' {
                    code[i] = false;
                    if i + 1 < bytes.len() {
                        code[i + 1] = false;
                    }
                    i += 2;
                    continue;
                }
                if b == quote {
                    state = State::Code;
                } else if b == b'\n' {
                    // Unterminated literal; resume as code on the next line.
                    state = State::Code;
                } else {
                    code[i] = false;
                }
                i += 1;
            }
            State::TextBlock => {
                if b == b'\\' {
                    code[i] = false;
                    if i + 1 < bytes.len() {
                        code[i + 1] = false;
                    }
                    i += 2;
                } else if at(i, b"\"\"\"") {
                    state = State::Code;
                    i += 3;
                } else {
                    code[i] = false;
                    i += 1;
                }
            }
        }
    }
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_keeps_offsets_and_blanks_literals() {
        let text = "int a = 1; // call {\nString s = \"}{\"; /* { */ char c = '}';\n";
        let view = CodeView::new(text);
        assert_eq!(view.masked().len(), text.len());
        assert!(!view.masked().contains("call"));
        assert!(!view.masked()[text.find('"').unwrap()..].starts_with("\"}{"));
        assert_eq!(view.masked().matches('{').count(), 0);
        assert_eq!(view.masked().matches('}').count(), 0);
        assert_eq!(view.masked().lines().count(), text.lines().count());
    }

    #[test]
    fn test_mask_handles_escapes_and_text_blocks() {
        let text = "String a = \"a\\\"}\"; String b = \"\"\"\n  { }\n  \"\"\"; int x;";
        let view = CodeView::new(text);
        assert!(!view.masked().contains('{'));
        assert!(view.masked().ends_with("int x;"));
    }

    #[test]
    fn test_mask_multibyte_in_comment() {
        let text = "// héllo ✓\nclass A {}";
        let view = CodeView::new(text);
        assert_eq!(view.masked().len(), text.len());
        assert!(view.masked().ends_with("class A {}"));
    }

    #[test]
    fn test_find_class_balances_nested_blocks() {
        let text = "package a;\n\npublic class Foo implements Bar {\n  void f() {\n    if (x) { y(); }\n  }\n}\n";
        let view = CodeView::new(text);
        let decl = view.find_class(None).unwrap();
        assert_eq!(decl.name, "Foo");
        assert_eq!(&text[decl.header.start..decl.header.end], " implements Bar ");
        assert_eq!(decl.close, text.rfind('}').unwrap());
    }

    #[test]
    fn test_find_class_ignores_braces_in_strings() {
        let text = "class Foo {\n  String s = \"}\";\n}\n";
        let decl = CodeView::new(text).find_class(Some("Foo")).unwrap();
        assert_eq!(decl.close, text.rfind('}').unwrap());
    }

    #[test]
    fn test_find_class_unbalanced() {
        let text = "public class Foo {\n  void f() {\n  }\n";
        let err = CodeView::new(text).find_class(None).unwrap_err();
        assert!(matches!(err, MigrateError::Unbalanced { line: 1, .. }), "{err}");
    }

    #[test]
    fn test_find_class_missing() {
        let text = "// class Foo {\ninterface Bar {}\n";
        let err = CodeView::new(text).find_class(None).unwrap_err();
        assert!(matches!(err, MigrateError::MissingAnchor { .. }));
    }

    #[test]
    fn test_method_extent_spans_nested_body() {
        let text = "class A {\n  private void helper(int a) {\n    if (a > 0) {\n      run();\n    }\n  }\n}\n";
        let view = CodeView::new(text);
        let sig = view.find(&Regex::new(r"private\s+void\s+helper").unwrap()).unwrap();
        let extent = view.method_extent(sig, "method helper").unwrap();
        assert!(text[extent.start..extent.end].ends_with("    }\n  }"));
    }

    #[test]
    fn test_find_members_skips_nested_depth() {
        let text = "class A {\n  int x = 1;\n  void f() {\n    int x = 1;\n  }\n}\n";
        let view = CodeView::new(text);
        let decl = view.find_class(None).unwrap();
        let hits = view.find_members(&decl, &Regex::new(r"int\s+x").unwrap());
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_capture_skips_comments() {
        let text = "// @Rule(key = \"OLD\")\n@Rule(key = \"MS001\")\nclass A {}\n";
        let view = CodeView::new(text);
        let re = Regex::new(r#"@Rule\(\s*key\s*=\s*"([^"]+)"\s*\)"#).unwrap();
        let (_, value) = view.capture(&re).unwrap();
        assert_eq!(value, "MS001");
    }

    #[test]
    fn test_phrase_boundaries() {
        let view = CodeView::new(
            "class A implements MuleSoftCheckFactory {}\nx = Mockito.mock(Document.class);\n",
        );
        assert!(!Phrase::new("implements MuleSoftCheck").unwrap().is_present(&view));
        assert!(!Phrase::new("mock(Document.class)").unwrap().is_present(&view));

        let view = CodeView::new("class A implements\n    MuleSoftCheck {}\n");
        assert!(Phrase::new("implements MuleSoftCheck").unwrap().is_present(&view));
    }

    #[test]
    fn test_member_indent() {
        let text = "class A {\n\n    int x;\n}\n";
        let view = CodeView::new(text);
        let decl = view.find_class(None).unwrap();
        assert_eq!(view.member_indent(&decl), ("    ".to_string(), "    ".to_string()));

        let text = "class A {}\n";
        let view = CodeView::new(text);
        let decl = view.find_class(None).unwrap();
        assert_eq!(view.member_indent(&decl).0, "  ");
    }

    #[test]
    fn test_remove_lines_collapses_blank_runs() {
        let text = "{\n\n  A;\n\n  B;\n}\n";
        let a = text.find("  A;").unwrap();
        let out = remove_lines(text, Span::new(a, a + "  A;\n".len()));
        assert_eq!(out, "{\n\n  B;\n}\n");

        let text = "  x();\n  }\n\n  void f() {\n  }\n}\n";
        let f = text.find("  void").unwrap();
        let out = remove_lines(text, Span::new(f, text.rfind("}\n").unwrap()));
        assert_eq!(out, "  x();\n  }\n}\n");
    }

    #[test]
    fn test_include_leading_attachments() {
        let text = "  int y;\n\n  /**\n   * Doc.\n   */\n  @Deprecated\n  @SuppressWarnings(\"a)\")\n  void f() {}\n";
        let view = CodeView::new(text);
        let start = text.find("  void").unwrap();
        let widened = include_leading_attachments(&view, start);
        assert_eq!(&text[widened..widened + 5], "  /**");
    }

    #[test]
    fn test_attachments_stop_at_members_and_trailing_comments() {
        let text = "class A {\n  @Override public String toString() { return \"x\"; }\n  int y;\n}\n";
        let view = CodeView::new(text);
        let start = text.find("  int y").unwrap();
        assert_eq!(include_leading_attachments(&view, start), start);

        // The comment's first line trails a statement, so the block is not
        // the member's own.
        let text = "class A {\n  int x; /* spans\n     lines */\n  int y;\n}\n";
        let view = CodeView::new(text);
        let start = text.find("  int y").unwrap();
        assert_eq!(include_leading_attachments(&view, start), start);

        let text = "class A {\n  // Old key.\n  // Still old.\n  int y;\n}\n";
        let view = CodeView::new(text);
        let start = text.find("  int y").unwrap();
        assert_eq!(include_leading_attachments(&view, start), text.find("  // Old").unwrap());
    }

    #[test]
    fn test_header_clauses() {
        let text = "class Foo<T extends Node> extends com.acme.Base<T>\n    implements Serializable, Comparable<Foo<T>, X> {\n}\n";
        let view = CodeView::new(text);
        let decl = view.find_class(None).unwrap();
        let clauses = view.header_clauses(&decl);
        let extends = clauses.extends.unwrap();
        assert_eq!(&text[extends.start..extends.end], "com.acme.Base<T>");
        let names: Vec<_> = clauses
            .interfaces
            .iter()
            .map(|s| &text[s.start..s.end])
            .collect();
        assert_eq!(names, ["Serializable", "Comparable<Foo<T>, X>"]);

        let view = CodeView::new("class Foo<T extends Base> {}\n");
        let decl = view.find_class(None).unwrap();
        let clauses = view.header_clauses(&decl);
        assert!(clauses.extends.is_none());
        assert!(clauses.implements_kw.is_none());
    }

    #[test]
    fn test_simple_type_name() {
        assert_eq!(simple_type_name("com.acme.Base<T>"), "Base");
        assert_eq!(simple_type_name(" MuleSoftCheck "), "MuleSoftCheck");
    }
}
