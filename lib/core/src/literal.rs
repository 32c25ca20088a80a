//! Parser for Python-style literal values
//!
//! Vendor feature columns are dumped with Python `repr`, so strings may use
//! single quotes and constants are spelled `True`/`False`/`None`. The parser
//! accepts that dialect as well as plain JSON and produces a
//! [`serde_json::Value`]. Tuples and sets become arrays.

use serde_json::{Map, Number, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at offset {offset}")]
pub struct LiteralError {
    pub offset: usize,
    pub kind: LiteralErrorKind,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LiteralErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected character {0:?}")]
    UnexpectedChar(char),
    #[error("unterminated string")]
    UnterminatedString,
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("invalid number")]
    InvalidNumber,
    #[error("unknown identifier {0:?}")]
    UnknownIdentifier(String),
    #[error("unsupported dictionary key")]
    UnsupportedKey,
    #[error("trailing characters")]
    TrailingCharacters,
    #[error("nesting too deep")]
    TooDeep,
}

const MAX_DEPTH: usize = 128;

/// Parse a complete literal. Anything but whitespace after the value is an error.
pub fn parse(input: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser {
        src: input,
        pos: 0,
        depth: 0,
    };
    let value = parser.value()?;
    parser.skip_ws();
    if parser.pos < input.len() {
        return Err(parser.error(LiteralErrorKind::TrailingCharacters));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, kind: LiteralErrorKind) -> LiteralError {
        LiteralError {
            offset: self.pos,
            kind,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn expect_some(&mut self) -> Result<char, LiteralError> {
        self.skip_ws();
        self.peek()
            .ok_or_else(|| self.error(LiteralErrorKind::UnexpectedEnd))
    }

    fn value(&mut self) -> Result<Value, LiteralError> {
        match self.expect_some()? {
            '[' => self.sequence(']'),
            '(' => self.sequence(')'),
            '{' => self.mapping(),
            '\'' | '"' => self.string().map(Value::String),
            c if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            c if c.is_alphabetic() || c == '_' => self.identifier_or_prefixed_string(),
            c => Err(self.error(LiteralErrorKind::UnexpectedChar(c))),
        }
    }

    fn enter(&mut self) -> Result<(), LiteralError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error(LiteralErrorKind::TooDeep));
        }
        Ok(())
    }

    /// `[a, b]` or `(a, b)`, trailing comma allowed
    fn sequence(&mut self, close: char) -> Result<Value, LiteralError> {
        self.enter()?;
        self.bump();
        let mut items = Vec::new();
        loop {
            if self.expect_some()? == close {
                self.bump();
                break;
            }
            items.push(self.value()?);
            match self.expect_some()? {
                ',' => {
                    self.bump();
                }
                c if c == close => {
                    self.bump();
                    break;
                }
                c => return Err(self.error(LiteralErrorKind::UnexpectedChar(c))),
            }
        }
        self.depth -= 1;
        Ok(Value::Array(items))
    }

    /// `{k: v, ...}` or a set literal `{a, b}`
    fn mapping(&mut self) -> Result<Value, LiteralError> {
        self.enter()?;
        self.bump();
        if self.expect_some()? == '}' {
            self.bump();
            self.depth -= 1;
            return Ok(Value::Object(Map::new()));
        }

        let first = self.value()?;
        let value = if self.expect_some()? == ':' {
            let mut map = Map::new();
            let mut key = first;
            loop {
                self.bump(); // ':'
                let key_str = self.key_string(key)?;
                let val = self.value()?;
                map.insert(key_str, val);
                match self.expect_some()? {
                    ',' => {
                        self.bump();
                    }
                    '}' => {
                        self.bump();
                        break;
                    }
                    c => return Err(self.error(LiteralErrorKind::UnexpectedChar(c))),
                }
                if self.expect_some()? == '}' {
                    self.bump();
                    break;
                }
                key = self.value()?;
                match self.expect_some()? {
                    ':' => {}
                    c => return Err(self.error(LiteralErrorKind::UnexpectedChar(c))),
                }
            }
            Value::Object(map)
        } else {
            let mut items = vec![first];
            loop {
                match self.expect_some()? {
                    ',' => {
                        self.bump();
                    }
                    '}' => {
                        self.bump();
                        break;
                    }
                    c => return Err(self.error(LiteralErrorKind::UnexpectedChar(c))),
                }
                if self.expect_some()? == '}' {
                    self.bump();
                    break;
                }
                items.push(self.value()?);
            }
            Value::Array(items)
        };
        self.depth -= 1;
        Ok(value)
    }

    fn key_string(&self, key: Value) -> Result<String, LiteralError> {
        match key {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(if b { "True".into() } else { "False".into() }),
            _ => Err(self.error(LiteralErrorKind::UnsupportedKey)),
        }
    }

    fn identifier_or_prefixed_string(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        let ident = &self.src[start..self.pos];

        // u'...' and r'...' prefixes
        if matches!(self.peek(), Some('\'') | Some('"')) {
            return match ident {
                "u" | "U" => self.string().map(Value::String),
                "r" | "R" => self.raw_string().map(Value::String),
                _ => Err(self.error(LiteralErrorKind::UnknownIdentifier(ident.to_string()))),
            };
        }

        match ident {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            "None" | "null" => Ok(Value::Null),
            _ => Err(LiteralError {
                offset: start,
                kind: LiteralErrorKind::UnknownIdentifier(ident.to_string()),
            }),
        }
    }

    fn raw_string(&mut self) -> Result<String, LiteralError> {
        let quote = self.bump().ok_or_else(|| self.error(LiteralErrorKind::UnexpectedEnd))?;
        let start = self.pos;
        while let Some(c) = self.bump() {
            if c == quote {
                return Ok(self.src[start..self.pos - 1].to_string());
            }
        }
        Err(self.error(LiteralErrorKind::UnterminatedString))
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let quote = self.bump().ok_or_else(|| self.error(LiteralErrorKind::UnexpectedEnd))?;
        let mut out = String::new();
        loop {
            let c = self
                .bump()
                .ok_or_else(|| self.error(LiteralErrorKind::UnterminatedString))?;
            match c {
                c if c == quote => return Ok(out),
                '\\' => self.escape(&mut out)?,
                '\n' => return Err(self.error(LiteralErrorKind::UnterminatedString)),
                c => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), LiteralError> {
        let c = self
            .bump()
            .ok_or_else(|| self.error(LiteralErrorKind::UnterminatedString))?;
        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'v' => out.push('\u{0b}'),
            '\\' | '\'' | '"' | '/' => out.push(c),
            '\n' => {}
            'x' => out.push(self.hex_char(2)?),
            'u' => out.push(self.hex_char(4)?),
            'U' => out.push(self.hex_char(8)?),
            // Python keeps unknown escapes verbatim
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn hex_char(&mut self, len: usize) -> Result<char, LiteralError> {
        let end = self.pos + len;
        let digits = self
            .src
            .get(self.pos..end)
            .ok_or_else(|| self.error(LiteralErrorKind::InvalidEscape))?;
        let code = u32::from_str_radix(digits, 16)
            .map_err(|_| self.error(LiteralErrorKind::InvalidEscape))?;
        self.pos = end;
        char::from_u32(code).ok_or_else(|| self.error(LiteralErrorKind::InvalidEscape))
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E' | '_') {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text: String = self.src[start..self.pos].chars().filter(|c| *c != '_').collect();
        let invalid = || LiteralError {
            offset: start,
            kind: LiteralErrorKind::InvalidNumber,
        };

        if let Ok(i) = text.parse::<i64>() {
            return Ok(Value::Number(i.into()));
        }
        let f = text.parse::<f64>().map_err(|_| invalid())?;
        Number::from_f64(f).map(Value::Number).ok_or_else(invalid)
    }
}
