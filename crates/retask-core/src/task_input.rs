//! Parsing of the task-description argument.
//!
//! The argument accepts three encodings, tried in order:
//! a bracketed list of quoted strings, a comma-separated string,
//! or a single plain description.

use thiserror::Error;

/// Task descriptions as handed to the orchestrator: either raw CLI text that
/// still needs parsing, or a sequence that was already split by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskInput {
    RawText(String),
    ParsedList(Vec<String>),
}

impl TaskInput {
    pub fn resolve(self) -> Vec<String> {
        match self {
            TaskInput::RawText(raw) => parse_task_input(&raw),
            TaskInput::ParsedList(tasks) => tasks,
        }
    }
}

impl From<&str> for TaskInput {
    fn from(value: &str) -> Self {
        TaskInput::RawText(value.to_string())
    }
}

impl From<String> for TaskInput {
    fn from(value: String) -> Self {
        TaskInput::RawText(value)
    }
}

impl From<Vec<String>> for TaskInput {
    fn from(value: Vec<String>) -> Self {
        TaskInput::ParsedList(value)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid list literal at byte {offset}: {reason}")]
pub struct ListLiteralError {
    pub offset: usize,
    pub reason: &'static str,
}

/// Split a raw task argument into an ordered list of task descriptions.
///
/// A malformed bracketed literal is not an error; it is handled by the
/// comma/plain rules instead.
pub fn parse_task_input(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();

    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        match parse_list_literal(trimmed) {
            Ok(tasks) => return tasks,
            Err(err) => {
                tracing::debug!(%err, "task input is not a string list; falling back to comma split")
            }
        }
    }

    if trimmed.contains(',') {
        return trimmed
            .split(',')
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .map(str::to_string)
            .collect();
    }

    vec![trimmed.to_string()]
}

/// Parse `["a", 'b', ...]`: a bracketed, comma-separated list of quoted
/// strings with an optional trailing comma. Nothing else is accepted.
pub fn parse_list_literal(text: &str) -> Result<Vec<String>, ListLiteralError> {
    let mut scanner = Scanner::new(text);
    scanner.skip_ws();
    if scanner.bump() != Some('[') {
        return Err(scanner.error_at(0, "expected '['"));
    }

    let mut items = Vec::new();
    loop {
        scanner.skip_ws();
        match scanner.peek() {
            Some(']') => {
                scanner.bump();
                break;
            }
            Some('"' | '\'') => {
                items.push(scanner.string_element()?);
                scanner.skip_ws();
                let at = scanner.pos;
                match scanner.bump() {
                    Some(',') => continue,
                    Some(']') => break,
                    Some(_) => return Err(scanner.error_at(at, "expected ',' or ']'")),
                    None => return Err(scanner.error("unterminated list")),
                }
            }
            Some(_) => return Err(scanner.error("expected a quoted string")),
            None => return Err(scanner.error("unterminated list")),
        }
    }

    scanner.skip_ws();
    if scanner.peek().is_some() {
        return Err(scanner.error("unexpected text after ']'"));
    }
    Ok(items)
}

struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.bump();
        }
    }

    fn error(&self, reason: &'static str) -> ListLiteralError {
        self.error_at(self.pos, reason)
    }

    fn error_at(&self, offset: usize, reason: &'static str) -> ListLiteralError {
        ListLiteralError { offset, reason }
    }

    /// One list element; adjacent literals (`'a' "b"`) are concatenated.
    fn string_element(&mut self) -> Result<String, ListLiteralError> {
        let mut value = self.string_literal()?;
        loop {
            let checkpoint = self.pos;
            self.skip_ws();
            match self.peek() {
                Some('"' | '\'') => value.push_str(&self.string_literal()?),
                _ => {
                    self.pos = checkpoint;
                    return Ok(value);
                }
            }
        }
    }

    fn string_literal(&mut self) -> Result<String, ListLiteralError> {
        let start = self.pos;
        let quote = match self.bump() {
            Some(ch @ ('"' | '\'')) => ch,
            _ => return Err(self.error_at(start, "expected a quoted string")),
        };

        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error_at(start, "unterminated string")),
                Some('\n') => return Err(self.error_at(start, "newline inside string")),
                Some('\\') => self.escape(&mut value)?,
                Some(ch) if ch == quote => return Ok(value),
                Some(ch) => value.push(ch),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), ListLiteralError> {
        let start = self.pos - 1;
        let Some(ch) = self.bump() else {
            return Err(self.error_at(start, "unterminated string"));
        };
        match ch {
            // line continuation
            '\n' => {}
            '\\' | '\'' | '"' => out.push(ch),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut value = ch.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|next| next.to_digit(8)) {
                        Some(digit) => {
                            self.bump();
                            value = value * 8 + digit;
                        }
                        None => break,
                    }
                }
                out.push(self.code_point(value, start)?);
            }
            'x' => out.push(self.hex_escape(2, start)?),
            'u' => out.push(self.hex_escape(4, start)?),
            'U' => out.push(self.hex_escape(8, start)?),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn hex_escape(&mut self, digits: usize, start: usize) -> Result<char, ListLiteralError> {
        let mut value: u32 = 0;
        for _ in 0..digits {
            let digit = self
                .peek()
                .and_then(|next| next.to_digit(16))
                .ok_or_else(|| self.error_at(start, "truncated escape sequence"))?;
            self.bump();
            value = value * 16 + digit;
        }
        self.code_point(value, start)
    }

    fn code_point(&self, value: u32, start: usize) -> Result<char, ListLiteralError> {
        char::from_u32(value).ok_or_else(|| self.error_at(start, "invalid code point"))
    }
}
