//! Reduces a raw transcript to the keyword looked up in the route table.

use serde::{Deserialize, Serialize};

/// Navigational filler stripped from transcripts, longest phrases first.
pub const FILLER_PHRASES: &[&str] = &[
    "take me to",
    "navigate to",
    "go to",
    "open",
    "show",
    "visit",
    "page",
];

/// How filler phrases are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizerMode {
    /// Remove every occurrence as a raw substring. "homepage" becomes
    /// "home" and "reopen" becomes "re".
    #[default]
    Substring,
    /// Remove phrases only when they match whole words.
    Tokenized,
}

/// Strips filler phrases using the default substring matching.
pub fn normalize_command(transcript: &str) -> String {
    Normalizer::default().normalize(transcript)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    mode: NormalizerMode,
}

impl Normalizer {
    pub fn new(mode: NormalizerMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> NormalizerMode {
        self.mode
    }

    pub fn normalize(&self, transcript: &str) -> String {
        let lower = transcript.to_lowercase();
        match self.mode {
            NormalizerMode::Substring => strip_substrings(&lower),
            NormalizerMode::Tokenized => strip_tokens(&lower),
        }
    }
}

fn strip_substrings(transcript: &str) -> String {
    FILLER_PHRASES
        .iter()
        .fold(transcript.to_string(), |acc, phrase| acc.replace(phrase, ""))
        .trim()
        .to_string()
}

fn strip_tokens(transcript: &str) -> String {
    let words: Vec<&str> = transcript.split_whitespace().collect();
    let fillers: Vec<Vec<&str>> = FILLER_PHRASES
        .iter()
        .map(|phrase| phrase.split_whitespace().collect())
        .collect();

    let mut kept = Vec::with_capacity(words.len());
    let mut i = 0;
    'outer: while i < words.len() {
        for filler in &fillers {
            if words[i..].starts_with(filler) {
                i += filler.len();
                continue 'outer;
            }
        }
        kept.push(words[i]);
        i += 1;
    }
    kept.join(" ")
}
