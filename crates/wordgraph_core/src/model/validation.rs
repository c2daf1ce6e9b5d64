//! Field validation shared by word, link and graph inputs.
//!
//! # Invariants
//! - Length limits are counted in Unicode scalar values, not bytes.
//! - Required text is checked after trimming surrounding whitespace.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum length of word and link `content`.
pub const CONTENT_MAX_CHARS: usize = 50;
/// Maximum length of word and link `description`.
pub const DESCRIPTION_MAX_CHARS: usize = 512;
/// Maximum length of a graph name.
pub const GRAPH_NAME_MAX_CHARS: usize = 128;
/// Maximum length of a graph type tag.
pub const GRAPH_TYPE_MAX_CHARS: usize = 20;

/// Input validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is empty after trim.
    BlankField(&'static str),
    /// Field exceeds its character limit.
    TooLong {
        field: &'static str,
        max_chars: usize,
        actual_chars: usize,
    },
    /// One entry of `refs` is blank.
    BlankRef { index: usize },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "`{field}` must not be blank"),
            Self::TooLong {
                field,
                max_chars,
                actual_chars,
            } => write!(
                f,
                "`{field}` exceeds {max_chars} characters (got {actual_chars})"
            ),
            Self::BlankRef { index } => write!(f, "refs[{index}] must not be blank"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    limit_text(field, value, max_chars)
}

pub(crate) fn limit_text(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ValidationError> {
    let actual_chars = value.chars().count();
    if actual_chars > max_chars {
        return Err(ValidationError::TooLong {
            field,
            max_chars,
            actual_chars,
        });
    }
    Ok(())
}

pub(crate) fn check_refs(refs: Option<&[String]>) -> Result<(), ValidationError> {
    let Some(refs) = refs else {
        return Ok(());
    };
    match refs.iter().position(|value| value.trim().is_empty()) {
        Some(index) => Err(ValidationError::BlankRef { index }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{check_refs, limit_text, require_text, ValidationError};

    #[test]
    fn require_text_rejects_whitespace_only() {
        let err = require_text("content", "   ", 10).expect_err("blank must fail");
        assert_eq!(err, ValidationError::BlankField("content"));
    }

    #[test]
    fn limit_counts_chars_not_bytes() {
        limit_text("content", "日本語", 3).expect("three chars fit");
        let err = limit_text("content", "日本語!", 3).expect_err("four chars overflow");
        assert!(matches!(
            err,
            ValidationError::TooLong {
                actual_chars: 4,
                ..
            }
        ));
    }

    #[test]
    fn check_refs_reports_first_blank_index() {
        let refs = vec!["a".to_string(), " ".to_string(), String::new()];
        assert_eq!(
            check_refs(Some(&refs)),
            Err(ValidationError::BlankRef { index: 1 })
        );
        assert_eq!(check_refs(None), Ok(()));
    }
}
