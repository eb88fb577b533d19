//! Character-budget truncation for extracted content.

/// Appended to content that was cut.
pub const TRUNCATION_MARKER: &str = "\n\n[Content truncated due to length...]";

/// Outcome of [`truncate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncated {
    pub text: String,
    pub was_truncated: bool,
}

/// Bound `text` to `max_chars` characters.
///
/// The cut is a hard character cut; it never lands inside a UTF-8 code point
/// but makes no attempt to respect word or sentence boundaries. Re-truncating
/// already truncated output with the same budget returns it unchanged.
pub fn truncate(text: &str, max_chars: usize) -> Truncated {
    let cut = match text.char_indices().nth(max_chars) {
        None => {
            return Truncated {
                text: text.to_string(),
                was_truncated: false,
            }
        }
        Some((byte_idx, _)) => byte_idx,
    };

    if let Some(body) = text.strip_suffix(TRUNCATION_MARKER) {
        if body.chars().count() <= max_chars {
            return Truncated {
                text: text.to_string(),
                was_truncated: true,
            };
        }
    }

    let mut out = String::with_capacity(cut + TRUNCATION_MARKER.len());
    out.push_str(&text[..cut]);
    out.push_str(TRUNCATION_MARKER);
    Truncated {
        text: out,
        was_truncated: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_unchanged() {
        let result = truncate("hello", 10);
        assert_eq!(result.text, "hello");
        assert!(!result.was_truncated);

        let exact = truncate("hello", 5);
        assert_eq!(exact.text, "hello");
        assert!(!exact.was_truncated);
    }

    #[test]
    fn test_long_text_cut_with_marker() {
        let result = truncate("abcdefghij", 4);
        assert_eq!(result.text, format!("abcd{}", TRUNCATION_MARKER));
        assert!(result.was_truncated);
    }

    #[test]
    fn test_cut_counts_characters_not_bytes() {
        let result = truncate("héllo wörld", 5);
        assert!(result.text.starts_with("héllo"));
        assert!(result.was_truncated);
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "",
            "short",
            "a somewhat longer piece of text that will be cut",
            "ünïcödé everywhere, ünïcödé",
        ];
        for input in inputs {
            for budget in [0, 1, 5, 10, 100] {
                let once = truncate(input, budget);
                let twice = truncate(&once.text, budget);
                assert_eq!(twice, once, "input {:?} budget {}", input, budget);
            }
        }
    }

    #[test]
    fn test_content_within_budget_plus_marker() {
        let text = "x".repeat(50_000);
        let result = truncate(&text, 30_000);
        assert_eq!(
            result.text.chars().count(),
            30_000 + TRUNCATION_MARKER.chars().count()
        );
    }
}
