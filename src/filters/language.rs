use regex::Regex;
use std::sync::LazyLock;

/// Minimum share of code points below 128 for text to count as English.
pub const MIN_ASCII_RATIO: f64 = 0.8;

/// Closed set of high-frequency English function words. Text longer than
/// three tokens must contain at least one of them.
const FUNCTION_WORDS: &[&str] = &[
    "the", "and", "is", "to", "in", "of", "it", "that", "for", "with", "this", "are", "was", "you",
];

static NOISE_TOKENS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"http\S+|@\S+|#\S+").expect("noise token pattern is valid"));

/// Heuristic English check used to admit comments.
///
/// URLs, @-mentions and hashtags are removed first. The remainder must be
/// mostly low code points; longer text must also contain a common English
/// function word, while short text (one to three tokens) must be pure ASCII.
/// Other Latin-script languages sharing those function words will pass.
pub fn is_target_language(text: &str) -> bool {
    let residue = NOISE_TOKENS.replace_all(text, "");
    let residue = residue.trim();
    if residue.is_empty() {
        return false;
    }

    let ratio = ascii_ratio(residue);
    if ratio < MIN_ASCII_RATIO {
        return false;
    }

    let lowered = residue.to_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();

    if tokens.len() > 3 {
        return tokens.iter().any(|t| {
            let word = t.trim_matches(|c: char| c.is_ascii_punctuation());
            FUNCTION_WORDS.contains(&word)
        });
    }

    ratio >= 1.0
}

/// Fraction of characters whose code point is below 128.
pub fn ascii_ratio(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let ascii = text.chars().filter(|c| c.is_ascii()).count();
    ascii as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_english() {
        assert!(is_target_language("This is a clear English sentence."));
        assert!(is_target_language("Peace in the Middle East."));
        assert!(is_target_language("What happened?"));
    }

    #[test]
    fn rejects_non_latin_scripts() {
        assert!(!is_target_language("这是一个中文句子"));
        assert!(!is_target_language("هذا نص عربي"));
        assert!(!is_target_language("Это русский текст"));
    }

    #[test]
    fn rejects_long_latin_text_without_function_words() {
        assert!(!is_target_language("Ez egy magyar mondat"));
    }

    #[test]
    fn noise_only_text_is_rejected() {
        assert!(!is_target_language(""));
        assert!(!is_target_language("   "));
        assert!(!is_target_language("https://example.com/watch?v=abc @someone #gaza"));
    }

    #[test]
    fn mentions_and_links_do_not_count_as_content() {
        assert!(is_target_language(
            "@reporter thanks for the update https://t.co/xyz"
        ));
    }

    #[test]
    fn short_text_must_be_pure_ascii() {
        assert!(is_target_language("Stay safe"));
        assert!(!is_target_language("Stay safe 🙏"));
    }

    #[test]
    fn function_word_match_ignores_punctuation() {
        assert!(is_target_language("Stop. Think, and breathe now"));
    }

    #[test]
    fn ratio_counts_code_points() {
        assert_eq!(ascii_ratio("abcd"), 1.0);
        assert_eq!(ascii_ratio("ab文字"), 0.5);
        assert_eq!(ascii_ratio(""), 0.0);
    }
}
