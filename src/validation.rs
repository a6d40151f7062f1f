//! Checks applied to article text before it is sent to the model.
//!
//! Rules run in a fixed order and the first failure wins, so a text that is
//! both too short and full of filler is reported as filler.

use once_cell::sync::Lazy;
use regex::Regex;

pub const MIN_WORDS: usize = 100;
pub const MAX_WORDS: usize = 5000;

/// Length of a run of identical words that marks a text as degenerate.
pub const REPETITION_THRESHOLD: usize = 5;

static PLACEHOLDER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    ["(?i)lorem ipsum", "(?i)dolor sit amet"]
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect()
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Prompt cannot be empty.")]
    Empty,

    #[error("Invalid input: Prompt contains meaningless text.")]
    Placeholder,

    #[error("Input exceeds limit of 5000 words (got {words}). Please reduce the word count.")]
    TooLong { words: usize },

    #[error("Input must contain at least 100 words to analyze properly (got {words}).")]
    TooShort { words: usize },

    #[error("Your input contains too much repetition. Please make it more unique.")]
    Repetitive,

    #[error("Invalid input: Unknown website '{0}'.")]
    UnknownSite(String),
}

pub fn validate(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::Empty);
    }

    if PLACEHOLDER_PATTERNS.iter().any(|re| re.is_match(text)) {
        return Err(ValidationError::Placeholder);
    }

    let words = word_count(text);
    if words > MAX_WORDS {
        return Err(ValidationError::TooLong { words });
    }
    if words < MIN_WORDS {
        return Err(ValidationError::TooShort { words });
    }

    if has_excessive_repetition(text) {
        return Err(ValidationError::Repetitive);
    }

    Ok(())
}

/// Number of whitespace separated words. Blank text has zero words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// True when some word repeats `REPETITION_THRESHOLD` or more times in a row,
/// ignoring case.
pub fn has_excessive_repetition(text: &str) -> bool {
    let mut previous: Option<String> = None;
    let mut run = 0;

    for word in text.split_whitespace().map(str::to_lowercase) {
        if previous.as_deref() == Some(word.as_str()) {
            run += 1;
            if run >= REPETITION_THRESHOLD {
                return true;
            }
        } else {
            run = 1;
            previous = Some(word);
        }
    }

    false
}
