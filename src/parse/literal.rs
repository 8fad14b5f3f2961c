//! Restricted JS-literal parser
//!
//! The combo data embedded in CMS snippets is authored as a JavaScript
//! array literal, not JSON: keys are usually bare identifiers, strings
//! may be single-quoted, and trailing commas and comments show up in
//! hand-edited files. This module parses that dialect directly into
//! `serde_json::Value` instead of evaluating the text as code, so
//! adversarial input can only ever produce a `ParseError`.
//!
//! Accepted grammar (JSON superset):
//! - objects with bare-identifier or quoted keys
//! - single- or double-quoted strings with JS escapes
//! - trailing commas in objects and arrays
//! - `//` and `/* */` comments
//! - `true`, `false`, `null`, `undefined` (mapped to null)

use serde_json::{Map, Number, Value};

use crate::error::ParseError;

/// Parse a complete literal; trailing semicolons and whitespace are
/// allowed, anything else after the value is an error.
pub fn parse_literal(src: &str) -> Result<Value, ParseError> {
    let mut parser = LiteralParser::new(src);
    let value = parser.parse_value()?;
    parser.skip_trivia();
    while parser.peek() == Some(';') {
        parser.bump();
        parser.skip_trivia();
    }
    match parser.peek() {
        None => Ok(value),
        Some(c) => Err(parser.error(format!("unexpected `{}` after literal", c))),
    }
}

/// Parse the first value at the start of `src`, ignoring whatever
/// follows it. Used when the literal is embedded in surrounding code.
pub fn parse_literal_prefix(src: &str) -> Result<Value, ParseError> {
    LiteralParser::new(src).parse_value()
}

struct LiteralParser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> LiteralParser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::literal(self.pos, message)
    }

    /// Skip whitespace and `//` / `/* */` comments.
    fn skip_trivia(&mut self) {
        loop {
            while matches!(self.peek(), Some(c) if c.is_whitespace()) {
                self.bump();
            }
            let rest = &self.src[self.pos..];
            if rest.starts_with("//") {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else if rest.starts_with("/*") {
                self.pos += 2;
                match self.src[self.pos..].find("*/") {
                    Some(end) => self.pos += end + 2,
                    // Unterminated block comment swallows the rest; the
                    // missing value is reported by the caller.
                    None => self.pos = self.src.len(),
                }
            } else {
                return;
            }
        }
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        self.skip_trivia();
        match self.peek() {
            Some('{') => self.parse_object(),
            Some('[') => self.parse_array(),
            Some('"') | Some('\'') => self.parse_string().map(Value::String),
            Some(c) if c == '-' || c == '+' || c.is_ascii_digit() => self.parse_number(),
            Some(c) if is_ident_start(c) => self.parse_keyword(),
            Some(c) => Err(self.error(format!("unexpected `{}`", c))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_object(&mut self) -> Result<Value, ParseError> {
        self.expect('{')?;
        let mut members = Map::new();
        loop {
            self.skip_trivia();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Value::Object(members));
            }

            let key = self.parse_key()?;
            self.skip_trivia();
            self.expect(':')?;
            let value = self.parse_value()?;
            members.insert(key, value);

            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {
                    self.bump();
                    return Ok(Value::Object(members));
                }
                Some(c) => return Err(self.error(format!("expected `,` or `}}`, found `{}`", c))),
                None => return Err(self.error("unterminated object")),
            }
        }
    }

    fn parse_array(&mut self) -> Result<Value, ParseError> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            if self.peek() == Some(']') {
                self.bump();
                return Ok(Value::Array(items));
            }

            items.push(self.parse_value()?);

            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {
                    self.bump();
                    return Ok(Value::Array(items));
                }
                Some(c) => return Err(self.error(format!("expected `,` or `]`, found `{}`", c))),
                None => return Err(self.error("unterminated array")),
            }
        }
    }

    fn parse_key(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some('"') | Some('\'') => self.parse_string(),
            Some(c) if is_ident_start(c) => Ok(self.parse_ident()),
            Some(c) => Err(self.error(format!("expected object key, found `{}`", c))),
            None => Err(self.error("unterminated object")),
        }
    }

    fn parse_ident(&mut self) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if is_ident_continue(c)) {
            self.bump();
        }
        self.src[start..self.pos].to_string()
    }

    fn parse_string(&mut self) -> Result<String, ParseError> {
        let quote = self.bump().expect("caller checked quote");
        let mut out = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('b') => out.push('\u{0008}'),
                    Some('f') => out.push('\u{000C}'),
                    Some('u') => out.push(self.parse_unicode_escape()?),
                    // JS treats an unrecognized escape as the raw char.
                    Some(c) => out.push(c),
                    None => return Err(self.error("unterminated string")),
                },
                Some('\n') => return Err(self.error("unterminated string")),
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn parse_unicode_escape(&mut self) -> Result<char, ParseError> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error("invalid \\u escape"))?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or_else(|| self.error("invalid \\u escape"))
    }

    fn parse_number(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        if matches!(self.peek(), Some('-') | Some('+')) {
            self.bump();
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E')
        {
            let c = self.bump().expect("peeked");
            if (c == 'e' || c == 'E') && matches!(self.peek(), Some('-') | Some('+')) {
                self.bump();
            }
        }

        let text = self.src[start..self.pos].trim_start_matches('+');
        if let Ok(i) = text.parse::<i64>() {
            return Ok(Value::Number(Number::from(i)));
        }
        let f = text
            .parse::<f64>()
            .map_err(|_| ParseError::literal(start, format!("invalid number `{}`", text)))?;
        Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| ParseError::literal(start, format!("invalid number `{}`", text)))
    }

    fn parse_keyword(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        let ident = self.parse_ident();
        match ident.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" | "undefined" => Ok(Value::Null),
            other => Err(ParseError::literal(
                start,
                format!("unexpected identifier `{}`", other),
            )),
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected `{}`, found `{}`", expected, c))),
            None => Err(self.error(format!("expected `{}`, found end of input", expected))),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}
