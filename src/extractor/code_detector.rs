//! Heuristic source-code detection over text chunks
//!
//! An ordered list of pattern rules is applied independently over each chunk.
//! Rules are not mutually exclusive: the same chunk may yield overlapping
//! fragments from different rules, and no cross-rule deduplication happens.
//! Fragments are emitted in rule order, then in text-position order within a
//! rule.

use crate::extractor::language::{Language, LanguageClassifier};
use regex::Regex;

/// Candidates whose trimmed length is at or below this are discarded as noise
const MIN_FRAGMENT_CHARS: usize = 10;

/// A detected code fragment before book/page attribution
#[derive(Debug, Clone, PartialEq)]
pub struct CodeFragment {
    pub code_text: String,
    pub detected_language: Language,
    pub line_count: usize,
    pub char_count: usize,
    pub has_functions: bool,
    pub has_imports: bool,
}

/// One detection rule.
///
/// `Capture` rules take the first capture group if present, else the whole
/// match. `Block` rules anchor on a definition header and extend the fragment
/// to the next top-level line (a newline followed by a non-whitespace
/// character) or the end of the chunk; the regex crate has no lookahead, so
/// the extension is an explicit scan.
enum Rule {
    Capture(Regex),
    Block(Regex),
}

pub struct CodeBlockDetector {
    rules: Vec<Rule>,
    function_cue: Regex,
    import_cue: Regex,
    classifier: LanguageClassifier,
}

impl CodeBlockDetector {
    pub fn new() -> Self {
        let rules = vec![
            // Markdown fenced code blocks
            Rule::Capture(Regex::new(r"(?s)```\w*\n(.*?)\n```").unwrap()),
            // Inline code spans
            Rule::Capture(Regex::new(r"`([^`]+)`").unwrap()),
            // Python-style function definitions
            Rule::Block(Regex::new(r"def\s+\w+\s*\([^)]*\):").unwrap()),
            // Import statements
            Rule::Capture(Regex::new(r"import\s+[\w\s,]+").unwrap()),
            // Class definitions
            Rule::Block(Regex::new(r"class\s+\w+").unwrap()),
            // JavaScript-style function definitions
            Rule::Block(Regex::new(r"function\s+\w+").unwrap()),
            // Java-style class declarations
            Rule::Block(Regex::new(r"public\s+class\s+\w+").unwrap()),
            // C/C++ includes
            Rule::Capture(Regex::new(r#"(?s)#include\s+[<"].*?[>"]"#).unwrap()),
            // Print statements
            Rule::Capture(Regex::new(r"(?s)print\s*\(.*?\)").unwrap()),
            // Return statements
            Rule::Capture(Regex::new(r"(?s)return\s+.*?;").unwrap()),
        ];

        Self {
            rules,
            function_cue: Regex::new(r"def\s+\w+|function\s+\w+").unwrap(),
            import_cue: Regex::new(r"import\s+|#include\s+").unwrap(),
            classifier: LanguageClassifier::new(),
        }
    }

    /// Scan one chunk and return every retained code fragment
    pub fn detect(&self, chunk_text: &str) -> Vec<CodeFragment> {
        let mut fragments = Vec::new();

        for rule in &self.rules {
            match rule {
                Rule::Capture(regex) => {
                    for caps in regex.captures_iter(chunk_text) {
                        let matched = caps
                            .get(1)
                            .unwrap_or_else(|| caps.get(0).unwrap())
                            .as_str();
                        self.push_fragment(matched, &mut fragments);
                    }
                }
                Rule::Block(anchor) => {
                    let mut pos = 0;
                    while let Some(m) = anchor.find_at(chunk_text, pos) {
                        let end = next_top_level_line(chunk_text, m.end());
                        self.push_fragment(&chunk_text[m.start()..end], &mut fragments);
                        pos = end;
                    }
                }
            }
        }

        fragments
    }

    fn push_fragment(&self, matched: &str, fragments: &mut Vec<CodeFragment>) {
        let trimmed = matched.trim();
        if trimmed.chars().count() <= MIN_FRAGMENT_CHARS {
            return;
        }

        fragments.push(CodeFragment {
            code_text: trimmed.to_string(),
            detected_language: self.classifier.classify(trimmed),
            line_count: trimmed.split('\n').count(),
            char_count: trimmed.chars().count(),
            has_functions: self.function_cue.is_match(trimmed),
            has_imports: self.import_cue.is_match(trimmed),
        });
    }
}

impl Default for CodeBlockDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte offset of the first newline at or after `from` that is followed by a
/// non-whitespace character, or the end of the text.
///
/// Comparing raw bytes against b'\n' is UTF-8 safe; the byte after a newline
/// is always a character boundary.
fn next_top_level_line(text: &str, from: usize) -> usize {
    let bytes = text.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == b'\n'
            && let Some(next) = text[i + 1..].chars().next()
            && !next.is_whitespace()
        {
            return i;
        }
        i += 1;
    }
    text.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> Vec<CodeFragment> {
        CodeBlockDetector::new().detect(text)
    }

    #[test]
    fn test_noise_filter_boundary() {
        // 10 trimmed characters is discarded, 11 is retained.
        let ten = format!("`{}`", "a".repeat(10));
        assert!(detect(&ten).is_empty());

        let eleven = format!("`{}`", "a".repeat(11));
        let fragments = detect(&eleven);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].code_text, "a".repeat(11));
        assert_eq!(fragments[0].char_count, 11);
    }

    #[test]
    fn test_fenced_python_block() {
        let fragments = detect("```python\nprint(\"hi\")\n```");

        let fenced = fragments
            .iter()
            .find(|f| f.code_text == "print(\"hi\")")
            .expect("fenced body should be extracted");
        assert_eq!(fenced.detected_language, Language::Python);
        assert!(!fenced.has_functions);
        assert!(!fenced.has_imports);
        assert_eq!(fenced.line_count, 1);
        assert_eq!(fenced.char_count, 11);
    }

    #[test]
    fn test_overlapping_rules_are_not_deduplicated() {
        // The fenced body is also hit by the print-call rule.
        let fragments = detect("```python\nprint(\"hi\")\n```");
        let print_hits = fragments
            .iter()
            .filter(|f| f.code_text == "print(\"hi\")")
            .count();
        assert!(print_hits >= 2, "expected fenced + print-rule matches");
    }

    #[test]
    fn test_def_block_extends_to_next_top_level_line() {
        let text = "def foo(x):\n    return x\nNext paragraph here";
        let fragments = detect(text);

        let def_block = fragments
            .iter()
            .find(|f| f.code_text.starts_with("def foo"))
            .expect("def rule should fire");
        assert_eq!(def_block.code_text, "def foo(x):\n    return x");
        assert_eq!(def_block.line_count, 2);
        assert!(def_block.has_functions);
        assert_eq!(def_block.detected_language, Language::Python);
    }

    #[test]
    fn test_def_block_runs_to_end_without_top_level_line() {
        let text = "def tail(a, b):\n    x = a\n    return b";
        let fragments = detect(text);

        let def_block = fragments
            .iter()
            .find(|f| f.code_text.starts_with("def tail"))
            .unwrap();
        assert_eq!(def_block.code_text, text);
    }

    #[test]
    fn test_import_statement() {
        let fragments = detect("import os, sys.\nDone");

        let import = fragments
            .iter()
            .find(|f| f.code_text.starts_with("import"))
            .expect("import rule should fire");
        assert_eq!(import.code_text, "import os, sys");
        assert!(import.has_imports);
        assert!(!import.has_functions);
        assert_eq!(import.detected_language, Language::Python);
    }

    #[test]
    fn test_include_directive() {
        let fragments = detect("#include <stdio.h>\nplain prose continues");

        let include = fragments
            .iter()
            .find(|f| f.code_text.starts_with("#include"))
            .expect("include rule should fire");
        assert_eq!(include.code_text, "#include <stdio.h>");
        assert!(include.has_imports);
        assert_eq!(include.detected_language, Language::CCpp);
    }

    #[test]
    fn test_function_block() {
        let text = "function renderAll() {\n  draw();\n}\nOutside text";
        let fragments = detect(text);

        // The fragment stops before the closing brace line: a newline followed
        // by a non-whitespace character is a top-level boundary.
        let func = fragments
            .iter()
            .find(|f| f.code_text.starts_with("function"))
            .expect("function rule should fire");
        assert_eq!(func.code_text, "function renderAll() {\n  draw();");
        assert!(func.has_functions);
        assert_eq!(func.detected_language, Language::JavaScript);
    }

    #[test]
    fn test_return_statement() {
        let fragments = detect("some prose return total_count;");

        let ret = fragments
            .iter()
            .find(|f| f.code_text.starts_with("return"))
            .expect("return rule should fire");
        assert_eq!(ret.code_text, "return total_count;");
    }

    #[test]
    fn test_plain_prose_yields_nothing() {
        let fragments = detect("This page discusses history and has no source listings at all.");
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_rule_order_is_stable() {
        // Fenced body first (rule 1), then the same span via the print rule
        // (rule 9): emission follows rule order.
        let fragments = detect("```\nprint(\"fenced body\")\n```");
        assert!(fragments.len() >= 2);
        assert_eq!(fragments[0].code_text, "print(\"fenced body\")");
    }
}
