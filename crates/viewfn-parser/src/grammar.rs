//! Grammar rules for reading annotated declarations.
//!
//! The declaration header is read token by token. The body is split into
//! top-level statements by tracking bracket depth, and each statement is
//! classified as a binding or a plain statement from its leading tokens.

use viewfn_core::{
    ast::*,
    types::*,
    ParseError,
};

use crate::lexer::*;

/// Declaration modifiers that may precede the introducer keyword.
const DECL_MODIFIERS: &[&str] = &[
    "public",
    "private",
    "fileprivate",
    "internal",
    "package",
    "open",
    "static",
    "final",
    "override",
    "nonisolated",
    "mutating",
    "nonmutating",
    "dynamic",
    "indirect",
];

/// Modifiers that may precede `let`/`var` inside a body.
const BINDING_MODIFIERS: &[&str] = &[
    "weak",
    "unowned",
    "lazy",
    "private",
    "fileprivate",
    "nonisolated",
    "static",
];

/// Parse a complete annotated declaration.
pub fn parse_declaration(source: &str) -> Result<Declaration, ParseError> {
    let mut parser = Parser::new(source);
    parser.parse_declaration()
}

/// Stateful parser that tracks the unconsumed remainder of the source.
struct Parser<'a> {
    source: &'a str,
    rest: &'a str,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, rest: source }
    }

    fn offset(&self) -> usize {
        offset_of(self.source, self.rest)
    }

    fn span_from(&self, start: usize) -> Span {
        let (line, column) = line_col(self.source, start);
        Span::new(start, self.offset(), line, column)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        if self.rest.is_empty() {
            return ParseError::UnexpectedEof;
        }
        let (line, column) = line_col(self.source, self.offset());
        let found = self
            .rest
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        ParseError::UnexpectedToken {
            found,
            expected: expected.to_string(),
            line,
            column,
        }
    }

    fn skip_trivia(&mut self) {
        if let Ok((rest, _)) = trivia(self.rest) {
            self.rest = rest;
        }
    }

    fn identifier(&mut self) -> Option<&'a str> {
        self.skip_trivia();
        let (rest, ident) = identifier(self.rest).ok()?;
        self.rest = rest;
        Some(ident)
    }

    fn peek_identifier(&self) -> Option<&'a str> {
        let (rest, _) = trivia(self.rest).ok()?;
        identifier(rest).ok().map(|(_, ident)| ident)
    }

    fn group(&mut self, open: char, close: char) -> Result<&'a str, ParseError> {
        self.skip_trivia();
        let start = self.offset();
        match delimited_group(open, close)(self.rest) {
            Ok((rest, inner)) => {
                self.rest = rest;
                Ok(inner)
            }
            Err(_) if self.rest.starts_with(open) => {
                let (line, column) = line_col(self.source, start);
                Err(ParseError::UnbalancedDelimiter { open, line, column })
            }
            Err(_) => Err(self.unexpected(&open.to_string())),
        }
    }

    fn parse_declaration(&mut self) -> Result<Declaration, ParseError> {
        self.skip_trivia();
        let start = self.offset();

        let (rest, attributes) = attribute_list(self.rest).map_err(|_| self.unexpected("attribute"))?;
        self.rest = rest;

        self.skip_modifiers();

        let introducer = self.identifier().ok_or_else(|| self.unexpected("declaration"))?;
        if introducer != "func" {
            let name = self.identifier().unwrap_or(introducer);
            return Ok(Declaration::Other {
                kind: introducer.to_string(),
                name: Identifier::from(name),
                attributes,
                span: self.span_from(start),
            });
        }

        let name = self.identifier().ok_or_else(|| self.unexpected("function name"))?;

        self.skip_trivia();
        if self.rest.starts_with('<') {
            self.group('<', '>')?;
        }

        let params_start = {
            self.skip_trivia();
            self.offset()
        };
        let params_text = self.group('(', ')')?;
        let parameters = parse_parameters(params_text).map_err(|found| {
            let (line, column) = line_col(self.source, params_start);
            ParseError::UnexpectedToken {
                found,
                expected: "parameter".to_string(),
                line,
                column,
            }
        })?;

        // Effects, return type and where clause run up to the body, if any.
        let body = match self.rest.find('{') {
            Some(brace) => {
                self.rest = &self.rest[brace..];
                let body_offset = self.offset() + 1;
                let body_text = self.group('{', '}')?;
                let (body_line, _) = line_col(self.source, body_offset);
                let statements = split_statements(body_text)
                    .map_err(|err| relocate(err, body_line - 1))?
                    .into_iter()
                    .map(|(local, text)| {
                        let start = body_offset + local;
                        let (line, column) = line_col(self.source, start);
                        parse_statement(text, Span::new(start, start + text.len(), line, column))
                    })
                    .collect();
                Some(statements)
            }
            None => {
                self.rest = "";
                None
            }
        };

        Ok(Declaration::Function(FunctionDescriptor {
            name: Identifier::from(name),
            attributes,
            parameters,
            body,
            span: self.span_from(start),
        }))
    }

    fn skip_modifiers(&mut self) {
        while let Some(word) = self.peek_identifier() {
            if !DECL_MODIFIERS.contains(&word) {
                break;
            }
            self.identifier();
            // `private(set)` and friends
            if self.rest.starts_with('(') {
                if let Ok((rest, _)) = delimited_group('(', ')')(self.rest) {
                    self.rest = rest;
                }
            }
        }
    }
}

/// Shift a body-relative error line into declaration coordinates.
fn relocate(err: ParseError, lines: u32) -> ParseError {
    match err {
        ParseError::UnbalancedDelimiter { open, line, column } => ParseError::UnbalancedDelimiter {
            open,
            line: line + lines,
            column,
        },
        ParseError::UnterminatedString { line } => ParseError::UnterminatedString { line: line + lines },
        other => other,
    }
}

/// Parse the text between a parameter clause's parentheses.
///
/// On failure returns the offending parameter text.
fn parse_parameters(text: &str) -> Result<Vec<ParameterDescriptor>, String> {
    split_top_level(text, ',')
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(parse_parameter)
        .collect()
}

fn parse_parameter(text: &str) -> Result<ParameterDescriptor, String> {
    let Some(colon) = find_top_level(text, ':') else {
        return Err(text.to_string());
    };

    let names: Vec<&str> = text[..colon].split_whitespace().collect();
    let name = match names.as_slice() {
        [name] | [_, name] => *name,
        _ => return Err(text.to_string()),
    };

    let type_and_default = &text[colon + 1..];
    let type_text = match find_top_level(type_and_default, '=') {
        Some(eq) => &type_and_default[..eq],
        None => type_and_default,
    }
    .trim();
    if type_text.is_empty() {
        return Err(text.to_string());
    }

    let is_escaping = type_attributes(type_text).iter().any(|a| a.is("escaping"));

    Ok(ParameterDescriptor {
        name: Identifier::from(name),
        type_text: type_text.to_string(),
        is_escaping,
    })
}

/// Split text at a separator that is not nested inside brackets or strings.
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut rest = text;
    while let Some(pos) = find_top_level(rest, sep) {
        parts.push(&text[start..start + pos]);
        start += pos + sep.len_utf8();
        rest = &text[start..];
    }
    parts.push(&text[start..]);
    parts
}

/// Byte offset of the first top-level occurrence of `target`.
fn find_top_level(text: &str, target: char) -> Option<usize> {
    let mut depth = 0i32;
    let mut in_string = false;
    let mut prev = '\0';
    let mut chars = text.char_indices();

    while let Some((i, c)) = chars.next() {
        if in_string {
            match c {
                '\\' => {
                    chars.next();
                }
                '"' => in_string = false,
                _ => {}
            }
            prev = c;
            continue;
        }
        if depth == 0 && c == target {
            return Some(i);
        }
        match c {
            '"' => in_string = true,
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            // `->` is an arrow, not a closing angle bracket
            '>' if prev != '-' => depth -= 1,
            _ => {}
        }
        prev = c;
    }
    None
}

/// Words that continue the previous statement when they start a line.
const CONTINUATION_WORDS: &[&str] = &["else", "catch"];

/// Split body text into top-level statements.
///
/// Returns each statement's byte offset within `body` together with its
/// trimmed text. Statements end at a newline or `;` at bracket depth zero,
/// unless the next line continues the current one (a `.modifier` chain, an
/// `else`/`catch` clause, or a dangling operator). Comments between
/// statements are dropped.
pub fn split_statements(body: &str) -> Result<Vec<(usize, &str)>, ParseError> {
    let mut statements = Vec::new();
    let mut depth: Vec<(char, usize)> = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0usize;
    let bytes = body.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        let rest = &body[i..];
        let c = match rest.chars().next() {
            Some(c) => c,
            None => break,
        };

        // Comments: dropped at depth zero, kept verbatim inside a statement.
        if rest.starts_with("//") {
            let len = rest.find('\n').unwrap_or(rest.len());
            if !depth.is_empty() {
                end = i + len;
            }
            i += len;
            continue;
        }
        if rest.starts_with("/*") {
            let len = rest.find("*/").map(|p| p + 2).unwrap_or(rest.len());
            if !depth.is_empty() {
                end = i + len;
            }
            i += len;
            continue;
        }

        if c == '"' {
            let len = string_literal_len(rest).ok_or_else(|| {
                let (line, _) = line_col(body, i);
                ParseError::UnterminatedString { line }
            })?;
            start.get_or_insert(i);
            i += len;
            end = i;
            continue;
        }

        match c {
            '(' | '[' | '{' => {
                start.get_or_insert(i);
                depth.push((c, i));
                end = i + 1;
            }
            ')' | ']' | '}' => {
                start.get_or_insert(i);
                depth.pop();
                end = i + 1;
            }
            '\n' | ';' if depth.is_empty() => {
                let pending = start.map(|s| &body[s..end]).unwrap_or("");
                if c == ';' || !continues_on_next_line(pending, &body[i + 1..]) {
                    flush(body, &mut statements, &mut start, end);
                }
            }
            c if c.is_whitespace() => {}
            _ => {
                start.get_or_insert(i);
                end = i + c.len_utf8();
            }
        }
        i += c.len_utf8();
    }

    if let Some(&(open, at)) = depth.last() {
        let (line, column) = line_col(body, at);
        return Err(ParseError::UnbalancedDelimiter { open, line, column });
    }
    flush(body, &mut statements, &mut start, end);
    Ok(statements)
}

fn flush<'b>(
    body: &'b str,
    statements: &mut Vec<(usize, &'b str)>,
    start: &mut Option<usize>,
    end: usize,
) {
    if let Some(s) = start.take() {
        let text = body[s..end].trim_end();
        if !text.is_empty() {
            statements.push((s, text));
        }
    }
}

fn continues_on_next_line(pending: &str, following: &str) -> bool {
    let pending = pending.trim_end();
    if pending.is_empty() {
        return false;
    }
    if pending.ends_with(['=', '+', '*', '&', '|', ',', ':']) || pending.ends_with("->") {
        return true;
    }
    // Attributes on a line of their own belong to the next line's declaration.
    if let Ok((rest, attributes)) = attribute_list(pending) {
        if !attributes.is_empty() && rest.trim().is_empty() {
            return true;
        }
    }
    let next = following.trim_start();
    if next.starts_with('.') && !next.starts_with("..") {
        return true;
    }
    CONTINUATION_WORDS.iter().any(|word| {
        next.strip_prefix(word)
            .is_some_and(|after| !after.starts_with(|c: char| c.is_alphanumeric() || c == '_'))
    })
}

/// Length in bytes of the string literal at the start of `input`.
fn string_literal_len(input: &str) -> Option<usize> {
    if let Some(after) = input.strip_prefix("\"\"\"") {
        return after.find("\"\"\"").map(|p| p + 6);
    }
    let mut chars = input.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '"' => return Some(i + 1),
            '\n' => return None,
            _ => {}
        }
    }
    None
}

/// Classify a single body statement by its leading tokens.
///
/// A statement whose attributes and modifiers are followed by `let` or `var`
/// is a binding; anything else is a plain statement.
pub fn parse_statement(source: &str, span: Span) -> StatementRecord {
    let text = source.trim();
    let plain = || {
        StatementRecord::Plain(PlainStatement {
            source: text.to_string(),
            span,
        })
    };

    let Ok((mut rest, attributes)) = attribute_list(text) else {
        return plain();
    };

    let mut qualifier = None;
    loop {
        let Ok((after, word)) = identifier(rest.trim_start()) else {
            return plain();
        };
        match word {
            "let" | "var" => {
                rest = after;
                break;
            }
            "weak" => qualifier = Some(ReferenceQualifier::Weak),
            "unowned" => {
                qualifier = Some(ReferenceQualifier::Unowned);
                if let Ok((after_group, inner)) = delimited_group('(', ')')(after) {
                    if inner.trim() == "unsafe" {
                        qualifier = Some(ReferenceQualifier::UnownedUnsafe);
                    }
                    rest = after_group;
                    continue;
                }
            }
            w if BINDING_MODIFIERS.contains(&w) => {}
            _ => return plain(),
        }
        rest = after;
    }

    // `let`/`var` must be a whole word.
    if !rest.starts_with(char::is_whitespace) && !rest.starts_with('(') {
        return plain();
    }

    let rest = rest.trim_start();
    let pattern = if rest.starts_with('(') {
        match delimited_group('(', ')')(rest) {
            Ok((_, inner)) => format!("({})", inner.trim()),
            Err(_) => return plain(),
        }
    } else {
        match identifier(rest) {
            Ok((_, ident)) => ident.to_string(),
            Err(_) => return plain(),
        }
    };

    StatementRecord::Declaration(DeclarationStatement {
        pattern,
        attributes,
        qualifier,
        source: text.to_string(),
        span,
    })
}
