use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

static SPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());
static NEWLINE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n+").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedDocument {
    pub source_url: String,
    /// Plain-text rendering of the source markup; empty when the page has no text.
    pub text: String,
}

#[derive(Error, Debug)]
#[error("could not convert {url}: {reason}")]
pub struct ConversionError {
    pub url: String,
    pub reason: String,
}

/// Trims every line, collapses runs of spaces and tabs, and keeps at most one blank line.
pub fn normalize_whitespace(text: &str) -> String {
    let lines: Vec<String> = text
        .lines()
        .map(|line| SPACE_REGEX.replace_all(line.trim(), " ").into_owned())
        .collect();

    NEWLINE_REGEX
        .replace_all(lines.join("\n").trim(), "\n\n")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        let text = "  Hello    world  \n\n\n  Test  ";
        assert_eq!(normalize_whitespace(text), "Hello world\n\nTest");
    }

    #[test]
    fn test_normalize_whitespace_trims_each_line() {
        let text = "* one  \n    * two\t\n\tcode  line \r\nlast";
        assert_eq!(normalize_whitespace(text), "* one\n* two\ncode line\nlast");
    }

    #[test]
    fn test_normalize_whitespace_empty() {
        assert_eq!(normalize_whitespace(" \t\n "), "");
    }

    #[test]
    fn test_conversion_error_names_url() {
        let err = ConversionError {
            url: "https://example.com/a".to_string(),
            reason: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "could not convert https://example.com/a: boom");
    }
}
