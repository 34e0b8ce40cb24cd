use std::sync::LazyLock;

use regex::Regex;

/// `@` followed by one or more word characters.
#[allow(clippy::expect_used)]
static MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@\w+").expect("mention pattern compiles"));

/// Two or more uppercase ASCII letters standing alone as a word.
#[allow(clippy::expect_used)]
static ACRONYM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]{2,}\b").expect("acronym pattern compiles"));

/// Dominant script of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// Latin letters win, or it's a tie.
    English,
    /// Strictly more CJK ideographs than ASCII letters.
    Chinese,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::English => "english",
            Self::Chinese => "chinese",
        })
    }
}

/// Strip `@mentions` and bare uppercase acronyms, then trim.
pub fn clean(text: &str) -> String {
    let without_mentions = MENTION.replace_all(text, "");
    ACRONYM
        .replace_all(&without_mentions, "")
        .trim()
        .to_string()
}

/// CJK Unified Ideographs block, U+4E00..=U+9FFF.
fn is_han(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

/// Label text by comparing ideograph count against ASCII letter count.
///
/// Ties, including text with neither, resolve to [`Language::English`].
pub fn classify(text: &str) -> Language {
    let (zh, en) = text.chars().fold((0usize, 0usize), |(zh, en), c| {
        if is_han(c) {
            (zh + 1, en)
        } else if c.is_ascii_alphabetic() {
            (zh, en + 1)
        } else {
            (zh, en)
        }
    });
    if zh > en {
        Language::Chinese
    } else {
        Language::English
    }
}
