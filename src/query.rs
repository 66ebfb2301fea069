//! Query helpers used before and after retrieval.
//!
//! Neither helper is consulted by the engine itself; the CLI uses them to
//! reject junk input and to shorten chunk previews.

/// Single-word inputs that are still accepted as questions.
const SINGLE_WORD_GREETINGS: &[&str] = &["hi", "hello", "hey", "bye", "goodbye", "thanks", "thank you"];

/// Default preview length for `truncate_text`.
pub const DEFAULT_PREVIEW_CHARS: usize = 500;

/// Check whether `question` is worth sending to the engine.
///
/// Rejects empty and one-character input. A single word is accepted only if
/// it is a common greeting; anything else needs at least two words.
pub fn validate_question(question: &str) -> bool {
    let trimmed = question.trim();
    if trimmed.chars().count() < 2 {
        return false;
    }

    let mut words = trimmed.split_whitespace();
    match (words.next(), words.next()) {
        (Some(_), Some(_)) => true,
        (Some(word), None) => {
            let word = word.to_lowercase();
            SINGLE_WORD_GREETINGS.contains(&word.as_str())
        }
        _ => false,
    }
}

/// Shorten `text` to at most `max_chars` characters plus `...`.
///
/// Cuts at the last space when it falls in the final fifth of the window,
/// otherwise mid-word. Text that already fits is returned unchanged.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    let cut = match text.char_indices().nth(max_chars) {
        Some((byte, _)) => byte,
        None => return text.to_string(),
    };

    let window = &text[..cut];
    let boundary = window
        .rfind(' ')
        .filter(|&byte| window[..byte].chars().count() * 5 > max_chars * 4);

    match boundary {
        Some(byte) => format!("{}...", &window[..byte]),
        None => format!("{window}..."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_and_tiny_input() {
        assert!(!validate_question(""));
        assert!(!validate_question("   "));
        assert!(!validate_question("a"));
        assert!(!validate_question(" ? "));
    }

    #[test]
    fn test_single_word_only_for_greetings() {
        assert!(validate_question("hi"));
        assert!(validate_question("Hello"));
        assert!(validate_question("  thanks "));
        assert!(!validate_question("ethics"));
        assert!(!validate_question("ok"));
    }

    #[test]
    fn test_two_words_accepted() {
        assert!(validate_question("define overfitting"));
        assert!(validate_question("What is AI ethics?"));
    }

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_text("short text", 20), "short text");
        assert_eq!(truncate_text("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn test_truncate_at_late_word_boundary() {
        // Last space in the window at char 9 of 10 (> 80%)
        assert_eq!(truncate_text("abcd efgh ijkl", 10), "abcd efgh...");
    }

    #[test]
    fn test_truncate_mid_word_when_boundary_too_early() {
        assert_eq!(truncate_text("ab cdefghijklmnop", 10), "ab cdefghi...");
    }

    #[test]
    fn test_truncate_counts_characters() {
        let text = "ééééééééééé";
        assert_eq!(truncate_text(text, 4), "éééé...");
    }
}
