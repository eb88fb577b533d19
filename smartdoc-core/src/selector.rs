//! Question-driven context selection.
//!
//! Large documents do not fit into a single generation call, so the text sent
//! along with a question is narrowed to windows around lines that mention the
//! question's words. This is a recall heuristic, not ranked search: every
//! matching window is kept in document order and overlapping windows are not
//! merged.

use tracing::debug;

/// Placed between head and tail when no line matches.
pub const FALLBACK_SEPARATOR: &str = "...";

/// Tunables for [`ContextSelector`].
#[derive(Debug, Clone)]
pub struct SelectorConfig {
    /// Documents up to this many characters are returned whole.
    pub small_doc_threshold: usize,
    /// Lines kept before a matching line.
    pub window_before: usize,
    /// Lines kept after a matching line.
    pub window_after: usize,
    /// Cap on collected lines.
    pub max_lines: usize,
    /// Leading lines kept when nothing matches.
    pub head_lines: usize,
    /// Trailing lines kept when nothing matches.
    pub tail_lines: usize,
    /// Question words shorter than this are ignored.
    pub min_token_len: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            small_doc_threshold: 10_000,
            window_before: 2,
            window_after: 3,
            max_lines: 200,
            head_lines: 100,
            tail_lines: 50,
            min_token_len: 4,
        }
    }
}

/// Narrows document content to the parts likely to answer a question.
#[derive(Debug, Clone, Default)]
pub struct ContextSelector {
    config: SelectorConfig,
}

impl ContextSelector {
    pub fn new(config: SelectorConfig) -> Self {
        Self { config }
    }

    /// Select the excerpt of `content` to send along with `question`.
    pub fn select(&self, content: &str, question: &str) -> String {
        if content.chars().count() <= self.config.small_doc_threshold {
            return content.to_string();
        }

        let lines: Vec<&str> = content.lines().collect();
        let tokens = self.tokenize(question);

        let selected = self.matching_windows(&lines, &tokens);
        if selected.is_empty() {
            debug!(
                "No lines matched {} question tokens, using head/tail excerpt",
                tokens.len()
            );
            return self.head_and_tail(&lines);
        }

        debug!(
            "Selected {} of {} lines for {} question tokens",
            selected.len(),
            lines.len(),
            tokens.len()
        );
        selected.join("\n")
    }

    /// Lowercase question words long enough to be meaningful.
    fn tokenize(&self, question: &str) -> Vec<String> {
        question
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|w| w.chars().count() >= self.config.min_token_len)
            .collect()
    }

    fn matching_windows<'a>(&self, lines: &[&'a str], tokens: &[String]) -> Vec<&'a str> {
        let mut selected = Vec::new();
        if tokens.is_empty() || lines.is_empty() {
            return selected;
        }

        let last = lines.len() - 1;
        for (i, line) in lines.iter().enumerate() {
            let lower = line.to_lowercase();
            if !tokens.iter().any(|t| lower.contains(t.as_str())) {
                continue;
            }

            let start = i.saturating_sub(self.config.window_before);
            let end = (i + self.config.window_after).min(last);
            selected.extend_from_slice(&lines[start..=end]);

            if selected.len() >= self.config.max_lines {
                selected.truncate(self.config.max_lines);
                break;
            }
        }

        selected
    }

    fn head_and_tail(&self, lines: &[&str]) -> String {
        let head = &lines[..self.config.head_lines.min(lines.len())];
        let tail = &lines[lines.len().saturating_sub(self.config.tail_lines)..];

        let mut excerpt: Vec<&str> = Vec::with_capacity(head.len() + tail.len() + 1);
        excerpt.extend_from_slice(head);
        excerpt.push(FALLBACK_SEPARATOR);
        excerpt.extend_from_slice(tail);
        excerpt.join("\n")
    }
}
