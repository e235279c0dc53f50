// crates/serve/src/neon.rs

//! Decoder for NEON, the indentation-based configuration syntax.
//!
//! NEON documents decode into the same JSON shape a `.json` asset would
//! have, so a NEON asset can stand in for a JSON one. Supported:
//!
//! - block mappings (`key: value`) and sequences (`- item`) by indentation,
//! - inline `[..]`, `{..}` and `(..)` collections, spanning lines if needed,
//! - single and double quoted strings, `'''` / `"""` multi-line strings,
//! - booleans (`true`, `yes`, `on`, ...), `null`, integers, floats,
//! - entities `Name(args)` as `{ "value": "Name", "attributes": args }`,
//! - `#` comments.

use regex::Regex;
use serde_json::{Map as JsonMap, Number, Value as Json};
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} on line {line}")]
pub struct NeonError {
    pub line: usize,
    pub message: String,
}

/// Decode a NEON document into JSON.
///
/// An empty document (or one holding only comments) decodes to `null`.
pub fn decode(src: &str) -> Result<Json, NeonError> {
    let tokens = Lexer::new(src).tokenize()?;
    Parser { tokens, pos: 0 }.document()
}

// ─────────────────────────────────────────────────────────────────────────────
// Lexer
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    /// Quoted string, escapes already resolved.
    Str(String),
    /// Unquoted literal, converted to a scalar by the parser.
    Lit(String),
    Punct(char),
    /// Line break; carries the indentation width of the next line.
    Newline(usize),
    End,
}

#[derive(Debug, Clone)]
struct Token {
    tok: Tok,
    line: usize,
    col: usize,
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    line_start: usize,
}

impl Lexer {
    fn new(src: &str) -> Self {
        let src = src.strip_prefix('\u{FEFF}').unwrap_or(src);
        Self {
            chars: src.chars().collect(),
            pos: 0,
            line: 1,
            line_start: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, i: usize) -> Option<char> {
        self.chars.get(i).copied()
    }

    fn error(&self, message: impl Into<String>) -> NeonError {
        NeonError {
            line: self.line,
            message: message.into(),
        }
    }

    fn token(&self, tok: Tok, col: usize) -> Token {
        Token {
            tok,
            line: self.line,
            col,
        }
    }

    /// `:` and `-` only act as punctuation when followed by one of these.
    fn is_separator_at(&self, i: usize) -> bool {
        matches!(
            self.peek_at(i),
            None | Some(' ' | '\t' | '\r' | '\n' | ',' | ']' | '}' | ')')
        )
    }

    fn tokenize(mut self) -> Result<Vec<Token>, NeonError> {
        let mut out = Vec::new();
        self.newline(&mut out);

        while let Some(c) = self.peek() {
            let col = self.pos - self.line_start;
            match c {
                ' ' | '\t' | '\r' => self.pos += 1,
                '#' => self.skip_comment(),
                '\n' => self.newline(&mut out),
                '"' | '\'' => {
                    let line = self.line;
                    let s = self.string(c)?;
                    out.push(Token {
                        tok: Tok::Str(s),
                        line,
                        col,
                    });
                }
                ',' | '=' | '[' | ']' | '{' | '}' | '(' | ')' => {
                    self.pos += 1;
                    out.push(self.token(Tok::Punct(c), col));
                }
                ':' if self.is_separator_at(self.pos + 1) => {
                    self.pos += 1;
                    out.push(self.token(Tok::Punct(c), col));
                }
                '-' if matches!(
                    self.peek_at(self.pos + 1),
                    None | Some(' ' | '\t' | '\r' | '\n')
                ) =>
                {
                    self.pos += 1;
                    out.push(self.token(Tok::Punct(c), col));
                }
                _ => {
                    let lit = self.literal();
                    out.push(self.token(Tok::Lit(lit), col));
                }
            }
        }

        out.push(self.token(Tok::End, 0));
        Ok(out)
    }

    fn skip_comment(&mut self) {
        while !matches!(self.peek(), None | Some('\n')) {
            self.pos += 1;
        }
    }

    /// Consume line breaks, blank lines and comment-only lines, then emit a
    /// single `Newline` carrying the indentation of the next content line.
    fn newline(&mut self, out: &mut Vec<Token>) {
        loop {
            if self.peek() == Some('\n') {
                self.pos += 1;
                self.line += 1;
                self.line_start = self.pos;
            }

            let mut indent = 0;
            while matches!(self.peek(), Some(' ' | '\t')) {
                self.pos += 1;
                indent += 1;
            }

            match self.peek() {
                None => return,
                Some('\r') if self.peek_at(self.pos + 1) == Some('\n') => self.pos += 1,
                Some('\n') => {}
                Some('#') => self.skip_comment(),
                Some(_) => {
                    out.push(self.token(Tok::Newline(indent), indent));
                    return;
                }
            }
        }
    }

    fn literal(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            match c {
                '\n' | '\r' | ',' | '=' | ']' | '}' | ')' | '(' => break,
                ':' if self.is_separator_at(self.pos + 1) => break,
                ' ' | '\t' => {
                    let mut j = self.pos;
                    while matches!(self.peek_at(j), Some(' ' | '\t')) {
                        j += 1;
                    }
                    match self.peek_at(j) {
                        None
                        | Some('\n' | '\r' | '#' | ',' | ':' | '=' | ']' | '}' | ')' | '(') => {
                            break
                        }
                        Some(_) => self.pos = j,
                    }
                }
                _ => self.pos += 1,
            }
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn string(&mut self, quote: char) -> Result<String, NeonError> {
        if self.peek_at(self.pos + 1) == Some(quote) && self.peek_at(self.pos + 2) == Some(quote) {
            return self.multiline_string(quote);
        }

        self.pos += 1;
        let mut s = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(self.error("unterminated string"));
            };
            self.pos += 1;
            match c {
                '\n' => return Err(self.error("unterminated string")),
                c if c == quote => {
                    // '' inside a single-quoted string is a literal quote
                    if quote == '\'' && self.peek() == Some('\'') {
                        self.pos += 1;
                        s.push('\'');
                    } else {
                        return Ok(s);
                    }
                }
                '\\' if quote == '"' => s.push(self.escape()?),
                c => s.push(c),
            }
        }
    }

    fn escape(&mut self) -> Result<char, NeonError> {
        let Some(c) = self.peek() else {
            return Err(self.error("unterminated string"));
        };
        self.pos += 1;
        match c {
            'n' => Ok('\n'),
            't' => Ok('\t'),
            'r' => Ok('\r'),
            'b' => Ok('\u{8}'),
            'f' => Ok('\u{c}'),
            'e' => Ok('\u{1b}'),
            '0' => Ok('\0'),
            '"' | '\\' | '/' => Ok(c),
            'x' => self.hex_char(2),
            'u' => {
                let hi = self.hex_digits(4)?;
                if (0xD800..0xDC00).contains(&hi)
                    && self.peek() == Some('\\')
                    && self.peek_at(self.pos + 1) == Some('u')
                {
                    self.pos += 2;
                    let lo = self.hex_digits(4)?;
                    let code = 0x10000 + ((hi - 0xD800) << 10) + (lo.wrapping_sub(0xDC00) & 0x3FF);
                    return char::from_u32(code).ok_or_else(|| self.error("invalid unicode escape"));
                }
                char::from_u32(hi).ok_or_else(|| self.error("invalid unicode escape"))
            }
            other => Err(self.error(format!("invalid escape sequence \\{other}"))),
        }
    }

    fn hex_digits(&mut self, n: usize) -> Result<u32, NeonError> {
        let end = self.pos + n;
        if end > self.chars.len() {
            return Err(self.error("truncated escape sequence"));
        }
        let digits: String = self.chars[self.pos..end].iter().collect();
        let value =
            u32::from_str_radix(&digits, 16).map_err(|_| self.error("invalid escape sequence"))?;
        self.pos = end;
        Ok(value)
    }

    fn hex_char(&mut self, n: usize) -> Result<char, NeonError> {
        let code = self.hex_digits(n)?;
        char::from_u32(code).ok_or_else(|| self.error("invalid escape sequence"))
    }

    /// `'''` / `"""` block; content lines are dedented by the indentation
    /// of the first content line.
    fn multiline_string(&mut self, quote: char) -> Result<String, NeonError> {
        self.pos += 3;
        while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
            self.pos += 1;
        }
        if self.peek() != Some('\n') {
            return Err(self.error("multi-line string must start on a new line"));
        }

        let mut lines: Vec<String> = Vec::new();
        loop {
            if self.peek() != Some('\n') {
                return Err(self.error("unterminated multi-line string"));
            }
            self.pos += 1;
            self.line += 1;
            self.line_start = self.pos;

            let start = self.pos;
            while !matches!(self.peek(), None | Some('\n')) {
                self.pos += 1;
            }
            let line: String = self.chars[start..self.pos].iter().collect();
            let line = line.trim_end_matches('\r').to_string();

            let closing: String = [quote; 3].iter().collect();
            if line.trim_start() == closing {
                break;
            }
            if self.peek().is_none() {
                return Err(self.error("unterminated multi-line string"));
            }
            lines.push(line);
        }

        let indent: String = lines
            .iter()
            .find(|l| !l.trim().is_empty())
            .map(|l| l.chars().take_while(|c| *c == ' ' || *c == '\t').collect())
            .unwrap_or_default();

        let body = lines
            .iter()
            .map(|l| l.strip_prefix(indent.as_str()).unwrap_or(l.trim_start()))
            .collect::<Vec<_>>()
            .join("\n");

        if quote == '"' {
            let mut inner = Lexer {
                chars: body.chars().collect(),
                pos: 0,
                line: self.line,
                line_start: 0,
            };
            let mut out = String::new();
            while let Some(c) = inner.peek() {
                inner.pos += 1;
                if c == '\\' {
                    out.push(inner.escape()?);
                } else {
                    out.push(c);
                }
            }
            return Ok(out);
        }
        Ok(body)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parser
// ─────────────────────────────────────────────────────────────────────────────

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Tok {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> &Tok {
        self.tokens
            .get(self.pos + n)
            .map(|t| &t.tok)
            .unwrap_or(&Tok::End)
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Tok {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn error(&self, message: impl Into<String>) -> NeonError {
        NeonError {
            line: self.current().map(|t| t.line).unwrap_or(0),
            message: message.into(),
        }
    }

    fn unexpected(&self) -> NeonError {
        match self.peek() {
            Tok::End => self.error("unexpected end"),
            Tok::Newline(_) => self.error("unexpected indentation"),
            Tok::Punct(c) => self.error(format!("unexpected '{c}'")),
            Tok::Str(s) | Tok::Lit(s) => self.error(format!("unexpected '{s}'")),
        }
    }

    fn expect(&mut self, c: char) -> Result<(), NeonError> {
        if *self.peek() == Tok::Punct(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn at_bullet(&self) -> bool {
        *self.peek() == Tok::Punct('-')
    }

    fn at_key(&self) -> bool {
        matches!(self.peek(), Tok::Str(_) | Tok::Lit(_)) && *self.peek_at(1) == Tok::Punct(':')
    }

    fn at_inline_key(&self) -> bool {
        matches!(self.peek(), Tok::Str(_) | Tok::Lit(_))
            && matches!(self.peek_at(1), Tok::Punct(':' | '='))
    }

    fn document(&mut self) -> Result<Json, NeonError> {
        let value = match self.peek().clone() {
            Tok::End => Json::Null,
            Tok::Newline(indent) => {
                self.pos += 1;
                self.block(indent)?
            }
            _ => self.block(0)?,
        };

        match self.peek() {
            Tok::End => Ok(value),
            _ => Err(self.unexpected()),
        }
    }

    /// Parse the block starting at the current token, which opens a line
    /// indented by `indent`.
    fn block(&mut self, indent: usize) -> Result<Json, NeonError> {
        if self.at_bullet() {
            return self.sequence(indent);
        }
        if self.at_key() {
            return self.mapping(indent);
        }
        let value = self.inline()?;
        self.end_of_line()?;
        Ok(value)
    }

    fn end_of_line(&self) -> Result<(), NeonError> {
        match self.peek() {
            Tok::Newline(_) | Tok::End => Ok(()),
            _ => Err(self.unexpected()),
        }
    }

    fn mapping(&mut self, indent: usize) -> Result<Json, NeonError> {
        let mut map = JsonMap::new();
        loop {
            let key = match self.bump() {
                Tok::Str(s) | Tok::Lit(s) => s,
                _ => return Err(self.error("expected key")),
            };
            self.expect(':')?;
            let value = self.after_key(indent)?;
            if map.contains_key(&key) {
                return Err(self.error(format!("duplicated key '{key}'")));
            }
            map.insert(key, value);

            match self.peek().clone() {
                Tok::Newline(n) if n == indent => {
                    self.pos += 1;
                    if !self.at_key() {
                        return Err(self.unexpected());
                    }
                }
                Tok::Newline(n) if n > indent => return Err(self.unexpected()),
                _ => break,
            }
        }
        Ok(list_or_object(map))
    }

    fn after_key(&mut self, indent: usize) -> Result<Json, NeonError> {
        match self.peek().clone() {
            Tok::Newline(n) if n > indent => {
                self.pos += 1;
                self.block(n)
            }
            // a sequence may sit at the same indentation as its key
            Tok::Newline(n) if n == indent && *self.peek_at(1) == Tok::Punct('-') => {
                self.pos += 1;
                self.sequence(indent)
            }
            Tok::Newline(_) | Tok::End => Ok(Json::Null),
            _ => {
                let value = self.inline()?;
                self.end_of_line()?;
                Ok(value)
            }
        }
    }

    fn sequence(&mut self, indent: usize) -> Result<Json, NeonError> {
        let mut items = Vec::new();
        loop {
            self.expect('-')?;
            let item = match self.peek().clone() {
                Tok::Newline(n) if n > indent => {
                    self.pos += 1;
                    self.block(n)?
                }
                Tok::Newline(_) | Tok::End => Json::Null,
                _ if self.at_key() || self.at_bullet() => {
                    let col = self.current().map(|t| t.col).unwrap_or(indent);
                    self.block(col)?
                }
                _ => {
                    let value = self.inline()?;
                    self.end_of_line()?;
                    value
                }
            };
            items.push(item);

            match self.peek().clone() {
                Tok::Newline(n) if n == indent && *self.peek_at(1) == Tok::Punct('-') => {
                    self.pos += 1;
                }
                Tok::Newline(n) if n > indent => return Err(self.unexpected()),
                _ => break,
            }
        }
        Ok(Json::Array(items))
    }

    fn inline(&mut self) -> Result<Json, NeonError> {
        match self.peek().clone() {
            Tok::Punct('[') => {
                self.pos += 1;
                self.collection(']')
            }
            Tok::Punct('{') => {
                self.pos += 1;
                self.collection('}')
            }
            Tok::Punct('(') => {
                self.pos += 1;
                self.collection(')')
            }
            Tok::Str(s) => {
                self.pos += 1;
                Ok(Json::String(s))
            }
            Tok::Lit(s) => {
                self.pos += 1;
                if *self.peek() == Tok::Punct('(') {
                    self.pos += 1;
                    let attributes = self.collection(')')?;
                    let mut entity = JsonMap::new();
                    entity.insert("value".into(), Json::String(s));
                    entity.insert("attributes".into(), attributes);
                    return Ok(Json::Object(entity));
                }
                Ok(scalar(&s))
            }
            _ => Err(self.unexpected()),
        }
    }

    fn skip_newlines(&mut self) -> bool {
        let mut skipped = false;
        while matches!(self.peek(), Tok::Newline(_)) {
            self.pos += 1;
            skipped = true;
        }
        skipped
    }

    fn collection(&mut self, close: char) -> Result<Json, NeonError> {
        let mut items: Vec<(Option<String>, Json)> = Vec::new();
        loop {
            self.skip_newlines();
            if *self.peek() == Tok::Punct(close) {
                self.pos += 1;
                break;
            }
            if *self.peek() == Tok::End {
                return Err(self.error(format!("missing '{close}'")));
            }

            if self.at_inline_key() {
                let key = match self.bump() {
                    Tok::Str(s) | Tok::Lit(s) => s,
                    _ => return Err(self.error("expected key")),
                };
                self.pos += 1;
                let value = match self.peek() {
                    Tok::Punct(',') | Tok::Newline(_) => Json::Null,
                    Tok::Punct(c) if *c == close => Json::Null,
                    _ => self.inline()?,
                };
                items.push((Some(key), value));
            } else {
                items.push((None, self.inline()?));
            }

            let had_newline = self.skip_newlines();
            match self.peek() {
                Tok::Punct(',') => self.pos += 1,
                Tok::Punct(c) if *c == close => {}
                _ if had_newline => {}
                _ => return Err(self.unexpected()),
            }
        }

        if close != '}' && items.iter().all(|(k, _)| k.is_none()) {
            return Ok(Json::Array(items.into_iter().map(|(_, v)| v).collect()));
        }

        let mut map = JsonMap::new();
        let mut next_index: u64 = 0;
        for (key, value) in items {
            let key = match key {
                Some(k) => {
                    if let Ok(n) = k.parse::<u64>() {
                        next_index = next_index.max(n.saturating_add(1));
                    }
                    k
                }
                None => {
                    let k = next_index.to_string();
                    next_index = next_index.saturating_add(1);
                    k
                }
            };
            if map.contains_key(&key) {
                return Err(self.error(format!("duplicated key '{key}'")));
            }
            map.insert(key, value);
        }
        Ok(list_or_object(map))
    }
}

/// A mapping whose keys are exactly `0, 1, 2, ...` in order is a list.
///
/// Empty mappings stay objects.
fn list_or_object(map: JsonMap<String, Json>) -> Json {
    let sequential = !map.is_empty()
        && map
            .keys()
            .enumerate()
            .all(|(i, k)| *k == i.to_string());
    if sequential {
        Json::Array(map.into_iter().map(|(_, v)| v).collect())
    } else {
        Json::Object(map)
    }
}

fn float_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+\.\d*|\.\d+|\d+)(?:[eE][+-]?\d+)?$").expect("valid float regex")
    })
}

/// Convert an unquoted literal to its JSON scalar.
fn scalar(s: &str) -> Json {
    match s {
        "true" | "True" | "TRUE" | "yes" | "Yes" | "YES" | "on" | "On" | "ON" => Json::Bool(true),
        "false" | "False" | "FALSE" | "no" | "No" | "NO" | "off" | "Off" | "OFF" => {
            Json::Bool(false)
        }
        "null" | "Null" | "NULL" => Json::Null,
        _ => number(s).unwrap_or_else(|| Json::String(s.to_string())),
    }
}

fn number(s: &str) -> Option<Json> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Json::from(i));
    }

    let (negative, unsigned) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let radix = [("0x", 16), ("0o", 8), ("0b", 2)]
        .into_iter()
        .find_map(|(p, r)| unsigned.strip_prefix(p).map(|digits| (digits, r)));
    if let Some((digits, radix)) = radix {
        let v = i64::from_str_radix(digits, radix).ok()?;
        return Some(Json::from(if negative { -v } else { v }));
    }

    if float_re().is_match(s) {
        let f = s.parse::<f64>().ok()?;
        return Number::from_f64(f).map(Json::Number);
    }
    None
}
