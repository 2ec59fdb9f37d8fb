use regex::{Regex, RegexBuilder};

use crate::error::SearchError;
use crate::models::FileContent;

/// A pattern compiled once per search and shared by every file comparison.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Regex,
}

impl PatternMatcher {
    /// Compile `pattern`. Matching is case-sensitive and `.` also matches
    /// newlines, so a pattern may span lines of a file.
    pub fn compile(pattern: &str) -> Result<Self, SearchError> {
        let regex = RegexBuilder::new(pattern)
            .dot_matches_new_line(true)
            .build()
            .map_err(SearchError::InvalidPattern)?;
        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// True if the pattern occurs anywhere in `content`.
    pub fn matches(&self, content: &str) -> bool {
        self.regex.is_match(content)
    }

    /// Binary files never match.
    pub fn matches_file(&self, file: &FileContent) -> bool {
        file.text().is_some_and(|text| self.matches(text))
    }
}
