//! Bounded evaluator for the assignment scripts storefront pages inline.
//!
//! Bootstrap scripts are not JSON: keys are often unquoted, strings use
//! single quotes, and objects may carry function values. This module parses
//! the literal subset of the language (objects, arrays, strings, numbers,
//! booleans, `null`/`undefined`) plus `name = <literal>` statements, and
//! never executes anything. Function values are skipped and decode as `null`.

use std::collections::HashMap;

use serde_json::{Map, Number, Value};

/// Maximum object/array nesting accepted before evaluation is aborted.
pub(crate) const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at byte {offset}")]
pub struct LiteralError {
    pub offset: usize,
    pub message: String,
}

/// Bindings produced by evaluating a script fragment.
///
/// Evaluation stops at the first statement that cannot be evaluated; the
/// bindings made before it are kept and the failure is reported in `error`.
#[derive(Debug, Default)]
pub(crate) struct Evaluation {
    pub bindings: HashMap<String, Value>,
    pub error: Option<LiteralError>,
}

/// Evaluates a sequence of `[var|let|const] a.b.c = <literal>` statements.
///
/// Each statement binds the last segment of its target path, so
/// `window.FOO = {...}` and `FOO = {...}` both bind `FOO`.
pub(crate) fn evaluate(source: &str) -> Evaluation {
    let mut parser = Parser::new(source);
    let mut evaluation = Evaluation::default();

    loop {
        parser.skip_separators();
        if parser.at_end() {
            break;
        }
        match parser.statement() {
            Ok((name, value)) => {
                evaluation.bindings.insert(name, value);
            }
            Err(err) => {
                evaluation.error = Some(err);
                break;
            }
        }
    }

    evaluation
}

/// Parses a single literal spanning the whole input (surrounding whitespace,
/// comments and a trailing `;` are allowed).
///
/// # Errors
///
/// Returns [`LiteralError`] if the input is not exactly one supported literal.
#[cfg(test)]
pub(crate) fn parse_literal(source: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser::new(source);
    parser.skip_ws();
    let value = parser.value()?;
    parser.skip_separators();
    if parser.at_end() {
        Ok(value)
    } else {
        Err(parser.error("unexpected trailing input"))
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            depth: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_byte(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> LiteralError {
        LiteralError {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            Ok(())
        } else {
            Err(self.error(format!("expected '{expected}'")))
        }
    }

    /// Skips whitespace and comments. Returns `true` if a line break was crossed.
    fn skip_ws(&mut self) -> bool {
        let mut saw_newline = false;
        loop {
            let rest = self.rest();
            if let Some(after) = rest.strip_prefix("//") {
                let len = after.find('\n').unwrap_or(after.len());
                self.pos += 2 + len;
                continue;
            }
            if let Some(after) = rest.strip_prefix("/*") {
                let len = after.find("*/").map_or(after.len(), |i| i + 2);
                if after[..len.min(after.len())].contains('\n') {
                    saw_newline = true;
                }
                self.pos += 2 + len;
                continue;
            }
            match self.peek() {
                Some('\n') => {
                    saw_newline = true;
                    self.pos += 1;
                }
                Some(c) if c.is_whitespace() || c == '\u{feff}' => self.pos += c.len_utf8(),
                _ => return saw_newline,
            }
        }
    }

    fn skip_separators(&mut self) {
        loop {
            self.skip_ws();
            if self.peek() == Some(';') {
                self.pos += 1;
            } else {
                return;
            }
        }
    }

    fn statement(&mut self) -> Result<(String, Value), LiteralError> {
        let mut name = self.identifier()?;
        if matches!(name.as_str(), "var" | "let" | "const") {
            self.skip_ws();
            name = self.identifier()?;
        }

        loop {
            self.skip_ws();
            match self.peek() {
                Some('.') => {
                    self.pos += 1;
                    self.skip_ws();
                    name = self.identifier()?;
                }
                Some('[') => {
                    self.pos += 1;
                    self.skip_ws();
                    name = match self.peek() {
                        Some(q @ ('"' | '\'')) => self.string(q)?,
                        _ => return Err(self.error("expected a string property name")),
                    };
                    self.skip_ws();
                    self.expect(']')?;
                }
                _ => break,
            }
        }

        self.expect('=')?;
        if self.peek() == Some('=') {
            return Err(self.error("comparison is not an assignment"));
        }
        self.skip_ws();
        let value = self.value()?;

        let saw_newline = self.skip_ws();
        match self.peek() {
            None | Some(';') => {}
            Some(_) if saw_newline => {}
            Some(_) => return Err(self.error("expected ';' after assignment")),
        }

        Ok((name, value))
    }

    fn identifier(&mut self) -> Result<String, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            let valid = if self.pos == start {
                is_ident_start(c)
            } else {
                is_ident_continue(c)
            };
            if !valid {
                break;
            }
            self.pos += c.len_utf8();
        }
        if self.pos == start {
            Err(self.error("expected an identifier"))
        } else {
            Ok(self.src[start..self.pos].to_string())
        }
    }

    fn value(&mut self) -> Result<Value, LiteralError> {
        match self.peek() {
            Some('{') => self.object(),
            Some('[') => self.array(),
            Some(q @ ('"' | '\'' | '`')) => self.string(q).map(Value::String),
            Some('(') => self.parenthesized(),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.number(),
            Some(c) if is_ident_start(c) => self.keyword_value(),
            Some(c) => Err(self.error(format!("unexpected character '{c}'"))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn enter(&mut self) -> Result<(), LiteralError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            Err(self.error(format!("nesting deeper than {MAX_DEPTH} levels")))
        } else {
            Ok(())
        }
    }

    fn object(&mut self) -> Result<Value, LiteralError> {
        self.enter()?;
        self.expect('{')?;
        let mut map = Map::new();

        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.pos += 1;
                break;
            }

            let key = match self.peek() {
                Some(q @ ('"' | '\'')) => self.string(q)?,
                Some(c) if c.is_ascii_digit() => self.number()?.to_string(),
                Some(c) if is_ident_start(c) => self.identifier()?,
                _ => return Err(self.error("expected an object key")),
            };

            self.skip_ws();
            let value = if self.peek() == Some('(') {
                // Method shorthand: `name() { ... }`.
                self.skip_group()?;
                self.skip_ws();
                self.skip_group()?;
                Value::Null
            } else {
                self.expect(':')?;
                self.skip_ws();
                self.value()?
            };
            map.insert(key, value);

            self.skip_ws();
            match self.bump() {
                Some(',') => {}
                Some('}') => break,
                _ => return Err(self.error("expected ',' or '}' in object")),
            }
        }

        self.depth -= 1;
        Ok(Value::Object(map))
    }

    fn array(&mut self) -> Result<Value, LiteralError> {
        self.enter()?;
        self.expect('[')?;
        let mut items = Vec::new();

        loop {
            self.skip_ws();
            match self.peek() {
                Some(']') => {
                    self.pos += 1;
                    break;
                }
                Some(',') => {
                    // Elision: `[1,,2]`.
                    self.pos += 1;
                    items.push(Value::Null);
                    continue;
                }
                _ => {}
            }

            items.push(self.value()?);

            self.skip_ws();
            match self.bump() {
                Some(',') => {}
                Some(']') => break,
                _ => return Err(self.error("expected ',' or ']' in array")),
            }
        }

        self.depth -= 1;
        Ok(Value::Array(items))
    }

    fn string(&mut self, quote: char) -> Result<String, LiteralError> {
        let start = self.pos;
        self.expect(quote)?;
        let mut out = String::new();

        loop {
            let Some(c) = self.bump() else {
                return Err(LiteralError {
                    offset: start,
                    message: "unterminated string".to_string(),
                });
            };
            match c {
                c if c == quote => return Ok(out),
                '\\' => self.escape(&mut out)?,
                '$' if quote == '`' && self.peek() == Some('{') => {
                    return Err(self.error("template substitutions are not supported"));
                }
                '\n' if quote != '`' => return Err(self.error("line break in string literal")),
                c => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), LiteralError> {
        let Some(c) = self.bump() else {
            return Err(self.error("unterminated escape sequence"));
        };
        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            // Line continuation.
            '\n' => {}
            '\r' => {
                if self.peek() == Some('\n') {
                    self.pos += 1;
                }
            }
            'x' => {
                let code = self.hex_digits(2)?;
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            'u' => {
                let code = self.unicode_escape()?;
                out.push(code);
            }
            other => out.push(other),
        }
        Ok(())
    }

    fn hex_digits(&mut self, count: usize) -> Result<u32, LiteralError> {
        let rest = self.rest();
        let digits = rest.get(..count).filter(|d| d.chars().all(|c| c.is_ascii_hexdigit()));
        let Some(digits) = digits else {
            return Err(self.error("invalid hex escape"));
        };
        let code = u32::from_str_radix(digits, 16).map_err(|e| self.error(e.to_string()))?;
        self.pos += count;
        Ok(code)
    }

    fn unicode_escape(&mut self) -> Result<char, LiteralError> {
        if self.peek() == Some('{') {
            self.pos += 1;
            let len = self.rest().find('}').ok_or_else(|| self.error("unterminated \\u{...}"))?;
            let code = self.hex_digits(len)?;
            self.pos += 1;
            return char::from_u32(code).ok_or_else(|| self.error("invalid code point"));
        }

        let high = self.hex_digits(4)?;
        if (0xD800..0xDC00).contains(&high) && self.rest().starts_with("\\u") {
            let checkpoint = self.pos;
            self.pos += 2;
            if let Ok(low) = self.hex_digits(4) {
                if (0xDC00..0xE000).contains(&low) {
                    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    return Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
            }
            self.pos = checkpoint;
        }
        Ok(char::from_u32(high).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        let negative = match self.peek() {
            Some('-') => {
                self.pos += 1;
                true
            }
            Some('+') => {
                self.pos += 1;
                false
            }
            _ => false,
        };

        if self.rest().starts_with("Infinity") {
            self.pos += "Infinity".len();
            return Ok(Value::Null);
        }

        let rest = self.rest();
        if rest.starts_with("0x") || rest.starts_with("0X") {
            self.pos += 2;
            let digits_start = self.pos;
            while self.peek_byte().is_some_and(|b| b.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            let digits = &self.src[digits_start..self.pos];
            let magnitude = i64::from_str_radix(digits, 16)
                .map_err(|e| self.error(format!("invalid hex number: {e}")))?;
            return Ok(Value::Number(Number::from(if negative {
                -magnitude
            } else {
                magnitude
            })));
        }

        let digits_start = self.pos;
        let mut is_float = false;
        while let Some(b) = self.peek_byte() {
            match b {
                b'0'..=b'9' => self.pos += 1,
                b'.' => {
                    is_float = true;
                    self.pos += 1;
                }
                b'e' | b'E' => {
                    is_float = true;
                    self.pos += 1;
                    if matches!(self.peek_byte(), Some(b'+' | b'-')) {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }

        let digits = &self.src[digits_start..self.pos];
        if digits.is_empty() || digits == "." {
            self.pos = start;
            return Err(self.error("invalid number"));
        }

        let text = &self.src[start..self.pos];
        if !is_float {
            if let Ok(n) = text.trim_start_matches('+').parse::<i64>() {
                return Ok(Value::Number(Number::from(n)));
            }
        }
        let parsed = text
            .trim_start_matches('+')
            .parse::<f64>()
            .map_err(|e| LiteralError {
                offset: start,
                message: format!("invalid number \"{text}\": {e}"),
            })?;
        Ok(Number::from_f64(parsed).map_or(Value::Null, Value::Number))
    }

    fn keyword_value(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        let word = self.identifier()?;
        match word.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" | "undefined" | "NaN" | "Infinity" => Ok(Value::Null),
            "function" => {
                self.skip_ws();
                if self.peek().is_some_and(is_ident_start) {
                    self.identifier()?;
                    self.skip_ws();
                }
                self.skip_group()?;
                self.skip_ws();
                self.skip_group()?;
                Ok(Value::Null)
            }
            _ => {
                // Single-parameter arrow function: `x => ...`.
                self.skip_ws();
                if self.rest().starts_with("=>") {
                    self.pos += 2;
                    self.skip_arrow_body()?;
                    return Ok(Value::Null);
                }
                self.pos = start;
                Err(self.error(format!("unsupported expression \"{word}\"")))
            }
        }
    }

    fn parenthesized(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        self.skip_group()?;
        self.skip_ws();
        if self.rest().starts_with("=>") {
            self.pos += 2;
            self.skip_arrow_body()?;
            return Ok(Value::Null);
        }

        self.pos = start + 1;
        self.enter()?;
        self.skip_ws();
        let value = self.value()?;
        self.skip_ws();
        self.expect(')')?;
        self.depth -= 1;
        Ok(value)
    }

    fn skip_arrow_body(&mut self) -> Result<(), LiteralError> {
        self.skip_ws();
        if self.peek() == Some('{') {
            return self.skip_group();
        }
        // Expression body: runs until the enclosing separator.
        loop {
            match self.peek() {
                None | Some(',' | '}' | ']' | ';' | '\n') => return Ok(()),
                Some('(' | '{' | '[') => self.skip_group()?,
                Some(q @ ('"' | '\'' | '`')) => {
                    self.string(q)?;
                }
                Some(c) => self.pos += c.len_utf8(),
            }
        }
    }

    /// Skips a balanced `(...)`, `{...}` or `[...]` group starting at the
    /// current position, honoring strings and comments.
    fn skip_group(&mut self) -> Result<(), LiteralError> {
        let start = self.pos;
        let mut depth = 0usize;

        loop {
            if self.rest().starts_with("//") || self.rest().starts_with("/*") {
                self.skip_ws();
                continue;
            }
            let Some(c) = self.peek() else {
                return Err(LiteralError {
                    offset: start,
                    message: "unbalanced brackets".to_string(),
                });
            };
            match c {
                '(' | '{' | '[' => {
                    depth += 1;
                    self.pos += 1;
                }
                ')' | '}' | ']' => {
                    if depth == 0 {
                        return Err(self.error(format!("unexpected '{c}'")));
                    }
                    depth -= 1;
                    self.pos += 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                '"' | '\'' | '`' => {
                    self.string(c)?;
                }
                _ if depth == 0 => return Err(self.error(format!("expected a group, found '{c}'"))),
                _ => self.pos += c.len_utf8(),
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
#[path = "literal_test.rs"]
mod tests;
