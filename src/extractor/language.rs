//! Heuristic programming language classification for detected code fragments

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Guessed language of a code fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    Java,
    #[serde(rename = "c/c++")]
    CCpp,
    Php,
    Ruby,
    Unknown,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::Java => "java",
            Language::CCpp => "c/c++",
            Language::Php => "php",
            Language::Ruby => "ruby",
            Language::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cue-based classifier: first matching rule wins, checked in a fixed order.
///
/// The order is part of the contract. Python is checked before Ruby, so a
/// `def`-containing Ruby snippet without a `puts` cue classifies as Python;
/// downstream consumers depend on this precedence staying stable.
pub struct LanguageClassifier {
    rules: Vec<(Regex, Language)>,
}

impl LanguageClassifier {
    pub fn new() -> Self {
        let rules = vec![
            (r"def\s+\w+|import\s+|print\s*\(", Language::Python),
            (r"function\s+\w+|var\s+|let\s+|const\s+", Language::JavaScript),
            (r"public\s+class|system\.out|import\s+java", Language::Java),
            (r"#include\s+|int\s+main|printf\s*\(", Language::CCpp),
            (r"<\?php|echo\s+", Language::Php),
            (r"def\s+\w+|puts\s+", Language::Ruby),
        ];

        Self {
            rules: rules
                .into_iter()
                .map(|(pattern, lang)| (Regex::new(pattern).unwrap(), lang))
                .collect(),
        }
    }

    /// Classify a code fragment; cues are matched against a lowercased copy
    pub fn classify(&self, code_text: &str) -> Language {
        let lowered = code_text.to_lowercase();
        for (regex, language) in &self.rules {
            if regex.is_match(&lowered) {
                return *language;
            }
        }
        Language::Unknown
    }
}

impl Default for LanguageClassifier {
    fn default() -> Self {
        Self::new()
    }
}
