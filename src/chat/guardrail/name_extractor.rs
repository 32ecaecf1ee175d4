//! Heuristic extraction of a self-introduced user name.

use regex::Regex;
use tracing::debug;

/// Captured words that are never names ("I'm learning chess", "Chess here").
pub const EXCLUDED_NAMES: &[&str] = &["chess", "here", "there", "player", "learning"];

/// Pattern-based name extractor.
///
/// Patterns are tried in order; each contributes at most its first match.
pub struct NameExtractor {
    patterns: Vec<Regex>,
}

impl NameExtractor {
    /// Compile the introduction patterns.
    ///
    /// # Errors
    /// Returns an error if any regex pattern is invalid.
    pub fn new() -> Result<Self, regex::Error> {
        let patterns = vec![
            Regex::new(r"(?:i am|i'm|my name is|this is|call me)\s+([a-z]+)")?,
            Regex::new(r"^(?:hi|hello|hey),?\s+(?:i am|i'm)\s+([a-z]+)")?,
            Regex::new(r"^([a-z]+)\s+here")?,
        ];
        Ok(Self { patterns })
    }

    /// Extract a capitalized name from an introduction, if any.
    #[must_use]
    pub fn extract_name(&self, text: &str) -> Option<String> {
        let lowered = text.trim().to_lowercase();

        for pattern in &self.patterns {
            let Some(captured) = pattern
                .captures(&lowered)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str())
            else {
                continue;
            };

            if EXCLUDED_NAMES.contains(&captured) {
                debug!("Ignoring excluded name candidate: {captured}");
                continue;
            }

            return Some(capitalize(captured));
        }

        None
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> NameExtractor {
        NameExtractor::new().unwrap()
    }

    #[test]
    fn test_extract_simple_introductions() {
        let names = extractor();
        assert_eq!(names.extract_name("I'm Magnus"), Some("Magnus".to_string()));
        assert_eq!(names.extract_name("My name is Alice"), Some("Alice".to_string()));
        assert_eq!(names.extract_name("please call me BOB"), Some("Bob".to_string()));
        assert_eq!(names.extract_name("Hello, I am judit"), Some("Judit".to_string()));
    }

    #[test]
    fn test_trailing_here_pattern() {
        let names = extractor();
        assert_eq!(names.extract_name("Hikaru here"), Some("Hikaru".to_string()));
        assert_eq!(names.extract_name("Chess here"), None);
    }

    #[test]
    fn test_excluded_words_are_not_names() {
        let names = extractor();
        assert_eq!(names.extract_name("I'm learning chess"), None);
        assert_eq!(names.extract_name("this is chess"), None);
    }

    #[test]
    fn test_no_introduction() {
        let names = extractor();
        assert_eq!(names.extract_name("what is a fork"), None);
        assert_eq!(names.extract_name(""), None);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("magnus"), "Magnus");
        assert_eq!(capitalize(""), "");
    }
}
