//! Keyword-count headline sentiment
//!
//! Matching is case-insensitive *substring* presence of each distinct keyword,
//! so "down" also matches inside "downtown". Each keyword counts at most once.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Keywords that count towards a positive reading
pub const POSITIVE_KEYWORDS: [&str; 9] = [
    "up",
    "gain",
    "growth",
    "partnership",
    "profit",
    "rise",
    "buy",
    "record",
    "bullish",
];

/// Keywords that count towards a negative reading
pub const NEGATIVE_KEYWORDS: [&str; 9] = [
    "down", "loss", "drop", "fall", "decline", "sell", "bearish", "risk", "crash",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Fixed score attached to each label
    pub fn score(self) -> f64 {
        match self {
            SentimentLabel::Positive => 0.5,
            SentimentLabel::Negative => -0.5,
            SentimentLabel::Neutral => 0.0,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub positive_hits: usize,
    pub negative_hits: usize,
    pub label: SentimentLabel,
    pub score: f64,
    /// Positive keywords found, in list order
    pub positive_matches: Vec<String>,
    /// Negative keywords found, in list order
    pub negative_matches: Vec<String>,
}

/// Score a block of headline text
pub fn score_headlines(text: &str) -> SentimentResult {
    let lowered = text.to_lowercase();
    let positive_matches = matches(&lowered, &POSITIVE_KEYWORDS);
    let negative_matches = matches(&lowered, &NEGATIVE_KEYWORDS);

    let label = match positive_matches.len().cmp(&negative_matches.len()) {
        std::cmp::Ordering::Greater => SentimentLabel::Positive,
        std::cmp::Ordering::Less => SentimentLabel::Negative,
        std::cmp::Ordering::Equal => SentimentLabel::Neutral,
    };

    SentimentResult {
        positive_hits: positive_matches.len(),
        negative_hits: negative_matches.len(),
        label,
        score: label.score(),
        positive_matches,
        negative_matches,
    }
}

fn matches(lowered: &str, keywords: &[&str]) -> Vec<String> {
    keywords
        .iter()
        .filter(|word| lowered.contains(*word))
        .map(|word| (*word).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_text_is_neutral() {
        let result = score_headlines("");
        assert_eq!(result.positive_hits, 0);
        assert_eq!(result.negative_hits, 0);
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_positive_headline() {
        let result = score_headlines("Profit surges as growth continues");
        assert_eq!(result.positive_hits, 2);
        assert_eq!(result.negative_hits, 0);
        assert_eq!(result.positive_matches, vec!["growth", "profit"]);
        assert_eq!(result.label, SentimentLabel::Positive);
        assert_eq!(result.score, 0.5);
    }

    #[test]
    fn test_negative_headline() {
        let result = score_headlines("Shares DROP on crash RISK | analysts say sell");
        assert_eq!(result.negative_hits, 4);
        assert_eq!(result.label, SentimentLabel::Negative);
        assert_eq!(result.score, -0.5);
    }

    #[test]
    fn test_repeated_keyword_counts_once() {
        let result = score_headlines("gain gain gain | loss");
        assert_eq!(result.positive_hits, 1);
        assert_eq!(result.negative_hits, 1);
        assert_eq!(result.label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_substring_matching_is_preserved() {
        // "downtown" contains "down", "supply" contains "up"
        let result = score_headlines("New downtown office to supply region");
        assert_eq!(result.positive_matches, vec!["up"]);
        assert_eq!(result.negative_matches, vec!["down"]);
        assert_eq!(result.label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_no_news_sentinel_is_neutral() {
        let result = score_headlines(crate::api::NO_NEWS_SENTINEL);
        assert_eq!(result.positive_hits, 0);
        assert_eq!(result.negative_hits, 0);
        assert_eq!(result.label, SentimentLabel::Neutral);
    }

    proptest! {
        #[test]
        fn score_is_order_independent(
            words in prop::collection::vec(
                prop::sample::select(vec![
                    "profit", "loss", "record", "decline", "quarter", "Bullish",
                    "merger", "falls", "buyback", "Risk", "steady", "growth",
                ]),
                0..12,
            ),
            seed in any::<u64>(),
        ) {
            let forward = words.join(" ");
            let mut shuffled = words.clone();
            // deterministic permutation driven by the seed
            let len = shuffled.len();
            if len > 1 {
                for i in (1..len).rev() {
                    let j = (seed.wrapping_mul(i as u64 + 31) % (i as u64 + 1)) as usize;
                    shuffled.swap(i, j);
                }
            }
            let backward = shuffled.join(" ");

            let a = score_headlines(&forward);
            let b = score_headlines(&backward);
            prop_assert_eq!(a.label, b.label);
            prop_assert_eq!(a.score, b.score);
            prop_assert_eq!(a.positive_hits, b.positive_hits);
            prop_assert_eq!(a.negative_hits, b.negative_hits);
        }

        #[test]
        fn score_matches_label(text in ".{0,80}") {
            let result = score_headlines(&text);
            prop_assert_eq!(result.score, result.label.score());
            prop_assert!(result.positive_hits <= POSITIVE_KEYWORDS.len());
            prop_assert!(result.negative_hits <= NEGATIVE_KEYWORDS.len());
        }
    }
}
