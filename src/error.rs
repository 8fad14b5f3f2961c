//! Error taxonomies (spec §7)
//!
//! Two `thiserror` enums cover the two failure classes the editor core
//! can surface: [`ParseError`] for fatal problems decoding imported
//! combo data, and [`ValidationError`] for rejected mutations of the
//! row store. Both are surfaced to the JS host via their `Display`
//! rendering at the API boundary.

use thiserror::Error;

/// A fatal problem decoding imported combo data (CSV, HTML-embedded
/// script arrays, or raw JS literals). Fatal to the triggering import
/// operation; the store is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The evaluated payload was not a JSON/JS array.
    #[error("combo payload is not an array")]
    NotAnArray,

    /// A CSV import had no recognizable header row.
    #[error("missing CSV header row")]
    MissingHeader,

    /// A quoted CSV field was never closed.
    #[error("unterminated quoted field on line {line}")]
    UnterminatedQuote { line: usize },

    /// Item shape validation failed, tagged with field-level context.
    #[error("{context}: {message}")]
    Shape { context: String, message: String },

    /// The raw JS literal parser failed at a byte offset.
    #[error("literal parse error at offset {offset}: {message}")]
    Literal { offset: usize, message: String },
}

impl ParseError {
    /// Build a [`ParseError::Shape`] with field-level context.
    pub fn shape(context: &str, message: impl Into<String>) -> ParseError {
        ParseError::Shape {
            context: context.to_string(),
            message: message.into(),
        }
    }

    /// Build a [`ParseError::Literal`] positioned at a byte offset.
    pub fn literal(offset: usize, message: impl Into<String>) -> ParseError {
        ParseError::Literal {
            offset,
            message: message.into(),
        }
    }
}

/// A rejected mutation of the row store. Checked before the store is
/// touched, so the store's invariants always hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A row was supplied with a blank (empty/whitespace) SKU.
    #[error("product SKU must not be empty")]
    EmptySku,

    /// A row's SKU collides with one already present.
    #[error("duplicate product SKU `{0}`")]
    DuplicateSku(String),

    /// A row index was out of range for the current store length.
    #[error("row index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}
