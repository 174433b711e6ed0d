//! Quote-aware tokenizer for delimiter-separated text.
//!
//! The tokenizer is a small state machine driven by [`transition`]. Each row
//! keeps its raw text alongside the unescaped field values, so callers can
//! inspect how a field was written (quoted or not) independently of its value.

use std::ops::Range;

use thiserror::Error;

/// Error raised when the input cannot be split into rows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    /// Input ended inside a quoted field.
    #[error("unterminated quoted field starting in row {row}")]
    UnterminatedQuote { row: usize },
}

/// One field of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Unescaped value.
    pub value: String,
    /// Byte range of the field's raw text within [`Row::raw`].
    pub span: Range<usize>,
}

/// One logical row (a quoted field may span several physical lines).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    /// Raw text of the row, without its terminator.
    pub raw: &'a str,
    pub fields: Vec<Field>,
}

impl<'a> Row<'a> {
    /// Raw text of field `idx`, before unescaping.
    pub fn raw_field(&self, idx: usize) -> Option<&'a str> {
        self.fields.get(idx).map(|f| &self.raw[f.span.clone()])
    }

    /// Whether field `idx` was written as a quoted field.
    pub fn is_quoted(&self, idx: usize) -> bool {
        self.raw_field(idx).is_some_and(|raw| raw.starts_with('"'))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.value.as_str())
    }

    /// True when every field is empty or whitespace-only.
    pub fn is_blank(&self) -> bool {
        self.values().all(|v| v.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// At the start of a field.
    FieldStart,
    /// Inside an unquoted field.
    Unquoted,
    /// Inside a quoted field.
    Quoted,
    /// Just saw a quote while inside a quoted field.
    QuoteInQuoted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Quote,
    Delimiter,
    Cr,
    Lf,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// Append the current character to the field value.
    Append,
    /// Consume the character without appending it.
    Skip,
    /// Close the current field.
    EndField,
    /// Close the current field and the row.
    EndRow,
}

/// Transition table: `(state, class) -> (next state, action)`.
fn transition(state: State, class: Class) -> (State, Action) {
    use Action::*;
    use Class::*;
    use State::*;

    match (state, class) {
        (FieldStart, Quote) => (Quoted, Skip),
        (FieldStart | Unquoted, Other) => (Unquoted, Append),
        (Unquoted, Quote) => (Unquoted, Append),
        (FieldStart | Unquoted | QuoteInQuoted, Delimiter) => (FieldStart, EndField),
        (FieldStart | Unquoted | QuoteInQuoted, Cr | Lf) => (FieldStart, EndRow),

        (Quoted, Quote) => (QuoteInQuoted, Skip),
        (Quoted, _) => (Quoted, Append),

        (QuoteInQuoted, Quote) => (Quoted, Append),
        (QuoteInQuoted, Other) => (Unquoted, Append),
    }
}

/// Iterator over the rows of delimiter-separated text.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    text: &'a str,
    delimiter: char,
    pos: usize,
    row_index: usize,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str, delimiter: u8) -> Self {
        Self {
            text,
            delimiter: delimiter as char,
            pos: 0,
            row_index: 0,
            failed: false,
        }
    }

    fn classify(&self, c: char) -> Class {
        match c {
            '"' => Class::Quote,
            '\r' => Class::Cr,
            '\n' => Class::Lf,
            c if c == self.delimiter => Class::Delimiter,
            _ => Class::Other,
        }
    }

    /// Skip the `\n` of a `\r\n` terminator.
    fn skip_pending_lf(&mut self, terminator: char) {
        if terminator == '\r' && self.text[self.pos..].starts_with('\n') {
            self.pos += 1;
        }
    }

    fn next_row(&mut self) -> Option<Result<Row<'a>, TokenizeError>> {
        if self.failed || self.pos >= self.text.len() {
            return None;
        }

        let start = self.pos;
        let mut state = State::FieldStart;
        let mut fields = Vec::new();
        let mut value = String::new();
        let mut field_start = 0usize;

        for (offset, c) in self.text[start..].char_indices() {
            let (next, action) = transition(state, self.classify(c));
            state = next;
            match action {
                Action::Append => value.push(c),
                Action::Skip => {}
                Action::EndField => {
                    fields.push(Field {
                        value: std::mem::take(&mut value),
                        span: field_start..offset,
                    });
                    field_start = offset + c.len_utf8();
                }
                Action::EndRow => {
                    fields.push(Field {
                        value: std::mem::take(&mut value),
                        span: field_start..offset,
                    });
                    self.row_index += 1;
                    self.pos = start + offset + c.len_utf8();
                    self.skip_pending_lf(c);
                    return Some(Ok(Row {
                        raw: &self.text[start..start + offset],
                        fields,
                    }));
                }
            }
        }

        self.row_index += 1;
        self.pos = self.text.len();
        if state == State::Quoted {
            self.failed = true;
            return Some(Err(TokenizeError::UnterminatedQuote {
                row: self.row_index,
            }));
        }

        let raw = &self.text[start..];
        fields.push(Field {
            value,
            span: field_start..raw.len(),
        });
        Some(Ok(Row { raw, fields }))
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Row<'a>, TokenizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row()
    }
}

/// Parse only the first row of `text`.
pub fn first_row(text: &str, delimiter: u8) -> Option<Result<Row<'_>, TokenizeError>> {
    Tokenizer::new(text, delimiter).next()
}
