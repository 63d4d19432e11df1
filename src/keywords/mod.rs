//! Keyword normalization shared by the collector's per-query summaries and
//! the `keywords` command. Both must fold tokens identically, so there is
//! exactly one implementation here.

pub mod stopwords;

use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

use stopwords::is_stop_word;

/// Domain synonyms folded onto a canonical root. Values are fixed points of
/// [`normalize`].
const SYNONYMS: &[(&str, &str)] = &[
    ("palestinians", "palestine"),
    ("palestinian", "palestine"),
    ("gazans", "gaza"),
    ("gazan", "gaza"),
    ("israelis", "israel"),
    ("israeli", "israel"),
    ("hamas", "hamas"),
];

struct SuffixRule {
    suffix: &'static str,
    replacement: &'static str,
    /// Minimum word length (in chars) before the rule may fire.
    min_len: usize,
}

const fn rule(suffix: &'static str, replacement: &'static str, min_len: usize) -> SuffixRule {
    SuffixRule {
        suffix,
        replacement,
        min_len,
    }
}

/// Checked in order; the first rule that fires wins for that pass.
const SUFFIX_RULES: &[SuffixRule] = &[
    rule("ies", "y", 5),
    rule("tion", "", 7),
    rule("sion", "", 7),
    rule("ment", "", 7),
    rule("ness", "", 7),
    rule("less", "", 7),
    rule("able", "", 7),
    rule("ible", "", 7),
    rule("ing", "", 6),
    rule("ful", "", 6),
    rule("ous", "", 6),
    rule("ive", "", 6),
    rule("ed", "", 5),
    rule("ly", "", 5),
    rule("s", "", 4),
];

static HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\w+").expect("hashtag pattern is valid"));
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("word pattern is valid"));

/// Canonicalize one token.
///
/// Lowercases, drops every non-alphanumeric character, folds known synonyms
/// and strips English suffixes until no rule applies. Returns `None` when
/// fewer than two characters survive cleaning.
pub fn normalize(token: &str) -> Option<String> {
    let mut word: String = token
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect();

    if word.chars().count() < 2 {
        return None;
    }

    loop {
        if let Some(root) = synonym(&word) {
            return Some(root.to_string());
        }
        match strip_suffix_once(&word) {
            Some(stem) => word = stem,
            None => return Some(word),
        }
    }
}

fn synonym(word: &str) -> Option<&'static str> {
    SYNONYMS
        .iter()
        .find(|(from, _)| *from == word)
        .map(|(_, to)| *to)
}

fn strip_suffix_once(word: &str) -> Option<String> {
    let len = word.chars().count();
    for r in SUFFIX_RULES {
        if len < r.min_len {
            continue;
        }
        if let Some(stem) = word.strip_suffix(r.suffix) {
            // plural `s` must not eat the second `s` of `-ss` words
            if r.suffix == "s" && stem.ends_with('s') {
                continue;
            }
            return Some(format!("{stem}{}", r.replacement));
        }
    }
    None
}

/// Extract normalized keywords from a video title.
///
/// Hashtags are dropped, as are tokens of two characters or fewer and stop
/// words. Normalized forms shorter than three characters are discarded.
pub fn extract_keywords(title: &str) -> Vec<String> {
    if title.trim().is_empty() {
        return Vec::new();
    }

    let lowered = title.to_lowercase();
    let cleaned = HASHTAG.replace_all(&lowered, "");

    WORD.find_iter(&cleaned)
        .map(|m| m.as_str())
        .filter(|w| w.chars().count() > 2 && !is_stop_word(w))
        .filter_map(normalize)
        .filter(|k| k.chars().count() > 2)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

/// Count keywords across titles and return the `limit` most frequent,
/// ties broken alphabetically.
pub fn top_keywords<'a, I>(titles: I, limit: usize) -> Vec<KeywordCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for title in titles {
        for kw in extract_keywords(title) {
            *counts.entry(kw).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<KeywordCount> = counts
        .into_iter()
        .map(|(keyword, count)| KeywordCount { keyword, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.keyword.cmp(&b.keyword)));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(s: &str) -> String {
        normalize(s).unwrap_or_default()
    }

    #[test]
    fn folds_synonyms() {
        assert_eq!(norm("Palestinians"), "palestine");
        assert_eq!(norm("Gazans"), "gaza");
        assert_eq!(norm("Israeli"), "israel");
        assert_eq!(norm("Hamas"), "hamas");
    }

    #[test]
    fn stems_common_suffixes() {
        assert_eq!(norm("bombing"), "bomb");
        assert_eq!(norm("bombings"), "bomb");
        assert_eq!(norm("wars"), "war");
        assert_eq!(norm("countries"), "country");
        assert_eq!(norm("killed"), "kill");
        assert_eq!(norm("carefully"), "care");
    }

    #[test]
    fn short_roots_survive() {
        assert_eq!(norm("thing"), "thing");
        assert_eq!(norm("red"), "red");
        assert_eq!(norm("glass"), "glass");
    }

    #[test]
    fn strips_punctuation() {
        assert_eq!(norm("Israel!"), "israel");
        assert_eq!(norm("peace..."), "peace");
    }

    #[test]
    fn too_short_is_none() {
        assert_eq!(normalize("a"), None);
        assert_eq!(normalize("!?"), None);
        assert_eq!(normalize(""), None);
    }

    #[test]
    fn normalize_is_idempotent() {
        let tokens = [
            "Palestinians",
            "bombing",
            "wars",
            "Israel!",
            "countries",
            "Gazans",
            "peace...",
            "carefully",
            "destruction",
            "hostages",
            "ceasefire",
            "humanitarian",
            "attacks",
            "business",
            "negotiations",
        ];
        for t in tokens {
            let once = norm(t);
            assert_eq!(norm(&once), once, "normalize not stable for {t}");
        }
    }

    #[test]
    fn extracts_title_keywords() {
        let kws = extract_keywords("BREAKING: Israeli strikes hit Gaza #news #gaza live");
        assert_eq!(kws, vec!["israel", "strike", "hit", "gaza"]);
    }

    #[test]
    fn empty_title_has_no_keywords() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("#only #tags").is_empty());
    }

    #[test]
    fn ranks_keywords_by_count_then_name() {
        let titles = ["Gaza war update", "War in Gaza", "Ceasefire talks in Gaza"];
        let top = top_keywords(titles.iter().copied(), 2);
        assert_eq!(
            top,
            vec![
                KeywordCount { keyword: "gaza".into(), count: 3 },
                KeywordCount { keyword: "war".into(), count: 2 },
            ]
        );
    }
}
