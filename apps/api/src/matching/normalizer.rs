//! Text Normalizer: turns raw document text into a canonical token stream.
//!
//! Rules:
//! 1. URL and e-mail spans (contact boilerplate) are cut out of the text;
//!    whatever surrounds them is kept.
//! 2. Each remaining whitespace-delimited word is lower-cased and every
//!    character outside the word class (letters, digits, `+`, `#`, `.`, `-`)
//!    becomes a separator.
//! 3. Each piece loses trailing `.`/`-` and leading `-`; pieces without a
//!    letter or digit are discarded.
//!
//! Multi-word phrases are not emitted as separate strings. Callers slide
//! token windows over `tokens()` (see `ngrams`), which is how the extractor
//! matches phrase aliases.
//!
//! The output is a fixed point: normalizing the rendered form of a
//! `NormalizedText` yields the same tokens.

use std::sync::LazyLock;

use regex::Regex;

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:https?://|www\.)\S*").expect("URL regex is valid")
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}")
        .expect("EMAIL regex is valid")
});

/// Ordered lowercase tokens of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    tokens: Vec<String>,
}

impl NormalizedText {
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens joined by single spaces.
    pub fn render(&self) -> String {
        self.tokens.join(" ")
    }

    /// Every run of `n` consecutive tokens, space-joined.
    pub fn ngrams(&self, n: usize) -> impl Iterator<Item = String> + '_ {
        // windows(0) panics
        let n = n.max(1);
        self.tokens.windows(n).map(|w| w.join(" "))
    }
}

/// Normalizes arbitrary text. Empty or boilerplate-only input yields an empty stream.
pub fn normalize(text: &str) -> NormalizedText {
    let without_urls = URL.replace_all(text, " ");
    let cleaned = EMAIL.replace_all(&without_urls, " ");
    let mut tokens = Vec::new();

    for word in cleaned.split_whitespace() {
        let lowered = word.to_lowercase();
        for piece in lowered.split(|c: char| !is_word_char(c)) {
            let piece = piece
                .trim_end_matches(|c| c == '.' || c == '-')
                .trim_start_matches('-');
            if piece.chars().any(char::is_alphanumeric) {
                tokens.push(piece.to_string());
            }
        }
    }

    NormalizedText { tokens }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '+' | '#' | '.' | '-')
}
