//! Naive Bayes scoring of feed items against the reader's past votes.
//!
//! Each document is reduced to the set of tokens it contains. For every token in
//! the vocabulary the classifier knows how many liked and how many disliked
//! documents contained it, and scores a new document by comparing
//! `P(tokens | liked)` with `P(tokens | disliked)`.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
static TAG_REGEX: OnceLock<Regex> = OnceLock::new();

pub const DEFAULT_ALPHA: f64 = 1.0;
pub const DEFAULT_MIN_TRAINING_VOTES: usize = 100;

const EPSILON: f64 = 1e-9;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct TokenCounts {
    liked: u32,
    disliked: u32,
}

#[derive(Debug, Clone)]
pub struct NaiveBayesClassifier {
    alpha: f64,
    min_training_votes: usize,
    token_counts: HashMap<String, TokenCounts>,
    liked_documents: u32,
    disliked_documents: u32,
}

impl NaiveBayesClassifier {
    pub fn new(min_training_votes: usize) -> Self {
        Self::with_alpha(DEFAULT_ALPHA, min_training_votes)
    }

    pub fn with_alpha(alpha: f64, min_training_votes: usize) -> Self {
        NaiveBayesClassifier {
            alpha,
            min_training_votes,
            token_counts: HashMap::new(),
            liked_documents: 0,
            disliked_documents: 0,
        }
    }

    /// Number of votes learned so far.
    pub fn votes(&self) -> usize {
        (self.liked_documents + self.disliked_documents) as usize
    }

    /// Scores are only meaningful after enough votes have been seen.
    pub fn is_ready(&self) -> bool {
        self.votes() >= self.min_training_votes
    }

    pub fn train<I, S>(&mut self, documents: I)
    where
        I: IntoIterator<Item = (S, bool)>,
        S: AsRef<str>,
    {
        for (text, liked) in documents {
            self.learn(text.as_ref(), liked);
        }
    }

    pub fn learn(&mut self, text: &str, liked: bool) {
        if liked {
            self.liked_documents += 1;
        } else {
            self.disliked_documents += 1;
        }
        for token in tokenize(text) {
            let counts = self.token_counts.entry(token).or_default();
            if liked {
                counts.liked += 1;
            } else {
                counts.disliked += 1;
            }
        }
    }

    /// Probability in `[0, 1]` that the reader likes `text`.
    ///
    /// Returns `1.0` for everything until the classifier [is ready](Self::is_ready),
    /// so callers fall back to their own ordering.
    pub fn score(&self, text: &str) -> f64 {
        if !self.is_ready() {
            return 1.0;
        }
        let tokens = tokenize(text);
        let (log_if_liked, log_if_disliked) = self.log_probabilities(&tokens);

        // p_liked / (p_liked + p_disliked), kept in log space
        1.0 / (1.0 + (log_if_disliked - log_if_liked).exp())
    }

    fn log_probabilities(&self, tokens: &HashSet<String>) -> (f64, f64) {
        let mut log_if_liked = 0.0;
        let mut log_if_disliked = 0.0;

        for (token, counts) in &self.token_counts {
            let (if_liked, if_disliked) = self.token_probabilities(counts);
            if tokens.contains(token) {
                log_if_liked += if_liked.ln();
                log_if_disliked += if_disliked.ln();
            } else {
                log_if_liked += (1.0 - if_liked).ln();
                log_if_disliked += (1.0 - if_disliked).ln();
            }
        }
        (log_if_liked, log_if_disliked)
    }

    fn token_probabilities(&self, counts: &TokenCounts) -> (f64, f64) {
        let if_liked = (counts.liked as f64 + self.alpha)
            / (self.liked_documents as f64 + 2.0 * self.alpha);
        let if_disliked = (counts.disliked as f64 + self.alpha)
            / (self.disliked_documents as f64 + 2.0 * self.alpha);

        (
            if_liked.clamp(EPSILON, 1.0 - EPSILON),
            if_disliked.clamp(EPSILON, 1.0 - EPSILON),
        )
    }
}

/// Distinct lower-case words of `text`, ignoring markup.
pub fn tokenize(text: &str) -> HashSet<String> {
    let tag_regex = TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]*>").unwrap());
    let token_regex = TOKEN_REGEX.get_or_init(|| Regex::new(r"[a-z0-9']+").unwrap());

    let without_tags = tag_regex.replace_all(text, " ");
    let decoded = html_escape::decode_html_entities(&without_tags).to_lowercase();

    token_regex
        .find_iter(&decoded)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        let tokens = tokenize("<p>Rust&#39;s <b>Borrow</b> checker, RUST again!</p>");
        let expected: HashSet<String> = ["rust's", "borrow", "checker", "rust", "again"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn test_not_ready_scores_one() {
        let mut model = NaiveBayesClassifier::new(3);
        model.learn("bitcoin deals", true);
        model.learn("garden tips", false);
        assert!(!model.is_ready());
        assert_eq!(model.score("bitcoin"), 1.0);

        model.learn("more bitcoin", true);
        assert!(model.is_ready());
        assert!(model.score("bitcoin") < 1.0);
    }

    #[test]
    fn test_prefers_liked_vocabulary() {
        let mut model = NaiveBayesClassifier::new(0);
        model.train([
            ("rust compiler release", true),
            ("rust async runtime", true),
            ("celebrity gossip roundup", false),
            ("celebrity fashion week", false),
        ]);
        let rust = model.score("new rust compiler");
        let gossip = model.score("celebrity gossip");
        assert!(rust > 0.5, "rust scored {rust}");
        assert!(gossip < 0.5, "gossip scored {gossip}");
    }

    #[test]
    fn test_naive_bayes_matches_hand_computation() {
        let mut model = NaiveBayesClassifier::new(0);
        model.train([
            ("Free Bitcoin viagra XXX christmas deals 😻😻😻", true),
            ("My dear Granddaughter, please explain Bitcoin over Christmas dinner", false),
            ("Here in my garage...", true),
        ]);
        assert_eq!(model.votes(), 3);

        let alpha = 1.0;
        let liked = 2.0;
        let disliked = 1.0;

        let probs_if_liked = [
            1. - (1. + alpha) / (liked + 2. * alpha), // "free"  (not present)
            (1. + alpha) / (liked + 2. * alpha),      // "bitcoin"  (present)
            1. - (1. + alpha) / (liked + 2. * alpha), // "viagra"  (not present)
            1. - (1. + alpha) / (liked + 2. * alpha), // "xxx"  (not present)
            (1. + alpha) / (liked + 2. * alpha),      // "christmas"  (present)
            (1. + alpha) / (liked + 2. * alpha),      // "deals"  (present)
            1. - (1. + alpha) / (liked + 2. * alpha), // "my"  (not present)
            1. - (0. + alpha) / (liked + 2. * alpha), // "dear"  (not present)
            1. - (0. + alpha) / (liked + 2. * alpha), // "granddaughter"  (not present)
            1. - (0. + alpha) / (liked + 2. * alpha), // "please"  (not present)
            1. - (0. + alpha) / (liked + 2. * alpha), // "explain"  (not present)
            1. - (0. + alpha) / (liked + 2. * alpha), // "over"  (not present)
            1. - (0. + alpha) / (liked + 2. * alpha), // "dinner"  (not present)
            1. - (1. + alpha) / (liked + 2. * alpha), // "here"  (not present)
            1. - (1. + alpha) / (liked + 2. * alpha), // "in"  (not present)
            1. - (1. + alpha) / (liked + 2. * alpha), // "garage"  (not present)
        ];

        let probs_if_disliked = [
            1. - (0. + alpha) / (disliked + 2. * alpha), // "free"  (not present)
            (1. + alpha) / (disliked + 2. * alpha),      // "bitcoin"  (present)
            1. - (0. + alpha) / (disliked + 2. * alpha), // "viagra"  (not present)
            1. - (0. + alpha) / (disliked + 2. * alpha), // "xxx"  (not present)
            (1. + alpha) / (disliked + 2. * alpha),      // "christmas"  (present)
            (0. + alpha) / (disliked + 2. * alpha),      // "deals"  (present)
            1. - (1. + alpha) / (disliked + 2. * alpha), // "my"  (not present)
            1. - (1. + alpha) / (disliked + 2. * alpha), // "dear"  (not present)
            1. - (1. + alpha) / (disliked + 2. * alpha), // "granddaughter"  (not present)
            1. - (1. + alpha) / (disliked + 2. * alpha), // "please"  (not present)
            1. - (1. + alpha) / (disliked + 2. * alpha), // "explain"  (not present)
            1. - (1. + alpha) / (disliked + 2. * alpha), // "over"  (not present)
            1. - (1. + alpha) / (disliked + 2. * alpha), // "dinner"  (not present)
            1. - (0. + alpha) / (disliked + 2. * alpha), // "here"  (not present)
            1. - (0. + alpha) / (disliked + 2. * alpha), // "in"  (not present)
            1. - (0. + alpha) / (disliked + 2. * alpha), // "garage"  (not present)
        ];

        let p_if_liked: f64 = probs_if_liked.iter().map(|p: &f64| p.ln()).sum::<f64>().exp();
        let p_if_disliked: f64 = probs_if_disliked
            .iter()
            .map(|p: &f64| p.ln())
            .sum::<f64>()
            .exp();

        let expected = p_if_liked / (p_if_liked + p_if_disliked);
        let actual = model.score("Bitcoin crypto academy Christmas deals");
        assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
    }
}
