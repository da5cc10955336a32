//! Unsupervised keyword extraction in the style of YAKE (Campos et al., 2020).
//!
//! Every word gets a statistical score from its casing, position, frequency, context
//! diversity and sentence spread; candidate phrases of up to three words are scored from
//! their member words. Lower scores are more salient.

use std::{
    collections::{
        HashMap,
        HashSet,
    },
    sync::OnceLock,
};

use regex::Regex;

use super::{
    stopwords,
    KeywordExtractor,
};
use crate::core::Result;

fn sentence_splitter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?;]+(?:\s+|$)|\n+").unwrap())
}

fn word_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\p{L}\p{N}]+(?:['’\-][\p{L}\p{N}]+)*").unwrap())
}

#[derive(Debug, Clone)]
struct Token {
    surface: String,
    key: String,
    is_stop: bool,
    is_number: bool,
}

impl Token {
    fn new(surface: &str, stop_words: &HashSet<&str>) -> Self {
        let key = surface.to_lowercase().replace('’', "'");
        Self {
            surface: surface.to_string(),
            is_stop: stop_words.contains(key.as_str()) || key.chars().count() < 2,
            is_number: surface.chars().all(|c| c.is_numeric() || c == '-' || c == '\''),
            key,
        }
    }

    fn can_bound_phrase(&self) -> bool {
        !self.is_stop && !self.is_number
    }
}

#[derive(Debug, Default)]
struct TermStats {
    tf: f64,
    tf_capitalized: f64,
    tf_acronym: f64,
    sentences: Vec<usize>,
    left: HashMap<String, usize>,
    right: HashMap<String, usize>,
    is_stop: bool,
}

#[derive(Debug)]
struct Candidate {
    surface: String,
    keys: Vec<String>,
    count: f64,
    first_seen: usize,
}

#[derive(Debug, Clone)]
pub struct YakeExtractor {
    max_ngram: usize,
    window: usize,
    dedup_threshold: f64,
}

impl Default for YakeExtractor {
    fn default() -> Self {
        Self { max_ngram: 3, window: 1, dedup_threshold: 0.9 }
    }
}

impl YakeExtractor {
    fn tokenize(&self, text: &str) -> Vec<Vec<Token>> {
        let stop_words = stopwords::english();
        sentence_splitter()
            .split(text)
            .map(|sentence| {
                word_pattern()
                    .find_iter(sentence)
                    .map(|m| Token::new(m.as_str(), stop_words))
                    .collect::<Vec<_>>()
            })
            .filter(|tokens| !tokens.is_empty())
            .collect()
    }

    fn term_stats(&self, sentences: &[Vec<Token>]) -> HashMap<String, TermStats> {
        let mut stats: HashMap<String, TermStats> = HashMap::new();

        for (sentence_idx, tokens) in sentences.iter().enumerate() {
            for (pos, token) in tokens.iter().enumerate() {
                if token.is_number {
                    continue;
                }

                let entry = stats.entry(token.key.clone()).or_default();
                entry.tf += 1.0;
                entry.is_stop = token.is_stop;
                entry.sentences.push(sentence_idx);

                let letters: Vec<char> = token.surface.chars().filter(|c| c.is_alphabetic()).collect();
                if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
                    entry.tf_acronym += 1.0;
                } else if pos > 0 && token.surface.chars().next().is_some_and(|c| c.is_uppercase()) {
                    entry.tf_capitalized += 1.0;
                }

                let start = pos.saturating_sub(self.window);
                for neighbour in tokens[start..pos].iter().filter(|t| !t.is_number) {
                    *entry.left.entry(neighbour.key.clone()).or_insert(0) += 1;
                }
                let end = (pos + 1 + self.window).min(tokens.len());
                for neighbour in tokens[pos + 1..end].iter().filter(|t| !t.is_number) {
                    *entry.right.entry(neighbour.key.clone()).or_insert(0) += 1;
                }
            }
        }

        stats
    }

    fn term_scores(
        &self,
        stats: &HashMap<String, TermStats>,
        sentence_count: usize,
    ) -> HashMap<String, f64> {
        let valid_tfs: Vec<f64> = stats.values().filter(|s| !s.is_stop).map(|s| s.tf).collect();
        if valid_tfs.is_empty() {
            return HashMap::new();
        }

        let mean = valid_tfs.iter().sum::<f64>() / valid_tfs.len() as f64;
        let variance =
            valid_tfs.iter().map(|tf| (tf - mean).powi(2)).sum::<f64>() / valid_tfs.len() as f64;
        let norm = mean + variance.sqrt();
        let max_tf = valid_tfs.iter().copied().fold(1.0, f64::max);

        stats
            .iter()
            .map(|(key, s)| {
                let casing = s.tf_capitalized.max(s.tf_acronym) / (1.0 + s.tf.ln());
                let position = (3.0 + median(&s.sentences)).ln().ln();
                let frequency = if norm > 0.0 { s.tf / norm } else { s.tf };
                let relatedness =
                    1.0 + (diversity(&s.left) + diversity(&s.right)) * (s.tf / max_tf);
                let distinct: HashSet<&usize> = s.sentences.iter().collect();
                let spread = distinct.len() as f64 / sentence_count.max(1) as f64;

                let score = (relatedness * position)
                    / (casing + frequency / relatedness + spread / relatedness);
                (key.clone(), score)
            })
            .collect()
    }

    fn candidates(&self, sentences: &[Vec<Token>]) -> Vec<Candidate> {
        let mut by_key: HashMap<String, usize> = HashMap::new();
        let mut candidates: Vec<Candidate> = Vec::new();

        for tokens in sentences {
            for start in 0..tokens.len() {
                for len in 1..=self.max_ngram {
                    let end = start + len;
                    if end > tokens.len() {
                        break;
                    }
                    let phrase = &tokens[start..end];
                    if phrase.iter().any(|t| t.is_number) {
                        break;
                    }
                    if !phrase[0].can_bound_phrase() || !phrase[len - 1].can_bound_phrase() {
                        continue;
                    }

                    let keys: Vec<String> = phrase.iter().map(|t| t.key.clone()).collect();
                    let joined = keys.join(" ");
                    match by_key.get(&joined) {
                        Some(&idx) => candidates[idx].count += 1.0,
                        None => {
                            by_key.insert(joined, candidates.len());
                            candidates.push(Candidate {
                                surface: phrase
                                    .iter()
                                    .map(|t| t.surface.as_str())
                                    .collect::<Vec<_>>()
                                    .join(" "),
                                keys,
                                count: 1.0,
                                first_seen: candidates.len(),
                            });
                        }
                    }
                }
            }
        }

        candidates
    }

    /// Scores and ranks the candidate phrases of `text`, most salient first.
    pub fn ranked(&self, text: &str) -> Vec<(String, f64)> {
        let sentences = self.tokenize(text);
        if sentences.is_empty() {
            return Vec::new();
        }

        let stats = self.term_stats(&sentences);
        let scores = self.term_scores(&stats, sentences.len());

        let mut scored: Vec<(Candidate, f64)> = self
            .candidates(&sentences)
            .into_iter()
            .map(|candidate| {
                let member_scores: Vec<f64> = candidate
                    .keys
                    .iter()
                    .filter(|key| stats.get(*key).is_some_and(|s| !s.is_stop))
                    .filter_map(|key| scores.get(key).copied())
                    .collect();
                let product: f64 = member_scores.iter().product();
                let sum: f64 = member_scores.iter().sum();
                let score = product / (candidate.count * (1.0 + sum));
                (candidate, score)
            })
            .collect();

        scored.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.first_seen.cmp(&b.0.first_seen)));

        scored.into_iter().map(|(candidate, score)| (candidate.surface, score)).collect()
    }
}

impl KeywordExtractor for YakeExtractor {
    fn extract(&self, text: &str, top_n: usize) -> Result<Vec<String>> {
        let mut selected: Vec<String> = Vec::new();

        for (phrase, _score) in self.ranked(text) {
            if selected.len() >= top_n {
                break;
            }
            let lowered = phrase.to_lowercase();
            let duplicate = selected
                .iter()
                .any(|kept| similarity(&kept.to_lowercase(), &lowered) >= self.dedup_threshold);
            if !duplicate {
                selected.push(phrase);
            }
        }

        Ok(selected)
    }
}

fn median(values: &[usize]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
    } else {
        sorted[mid] as f64
    }
}

fn diversity(neighbours: &HashMap<String, usize>) -> f64 {
    let total: usize = neighbours.values().sum();
    if total == 0 {
        0.0
    } else {
        neighbours.len() as f64 / total as f64
    }
}

/// Normalised Levenshtein similarity in `[0, 1]`.
fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 1.0;
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut current = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        previous = current;
    }

    1.0 - previous[b.len()] as f64 / longest as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequent_term_is_picked_up() {
        let extractor = YakeExtractor::default();
        let keywords = extractor
            .extract("The battery died fast. I replaced the battery twice. Now the battery works.", 5)
            .unwrap();

        assert!(!keywords.is_empty());
        assert!(keywords.len() <= 5);
        assert!(keywords.iter().any(|k| k.to_lowercase().contains("battery")));
    }

    #[test]
    fn test_top_n_is_respected() {
        let extractor = YakeExtractor::default();
        let text = "Customer support resolved my billing issue quickly and the refund arrived \
                    within two days, which made the whole subscription experience pleasant.";
        assert!(extractor.extract(text, 2).unwrap().len() <= 2);
        assert!(extractor.extract(text, 0).unwrap().is_empty());
    }

    #[test]
    fn test_phrases_never_start_or_end_with_stop_words() {
        let extractor = YakeExtractor::default();
        let text = "I think that the new update of the app is slow and the design of the menu is confusing.";
        let stop_words = stopwords::english();

        for keyword in extractor.extract(text, 5).unwrap() {
            let words: Vec<String> = keyword.split(' ').map(|w| w.to_lowercase()).collect();
            assert!(!stop_words.contains(words[0].as_str()), "{keyword}");
            assert!(!stop_words.contains(words[words.len() - 1].as_str()), "{keyword}");
        }
    }

    #[test]
    fn test_blank_and_stop_word_only_text() {
        let extractor = YakeExtractor::default();
        assert!(extractor.extract("", 5).unwrap().is_empty());
        assert!(extractor.extract("   \n ", 5).unwrap().is_empty());
        assert!(extractor.extract("it is what it is", 5).unwrap().is_empty());
        assert!(extractor.extract("2024 100 42", 5).unwrap().is_empty());
    }

    #[test]
    fn test_case_variants_are_merged() {
        let extractor = YakeExtractor::default();
        let keywords = extractor.extract("Pricing matters. pricing matters. PRICING!", 5).unwrap();
        let lowered: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
        let unique: HashSet<&String> = lowered.iter().collect();
        assert_eq!(unique.len(), lowered.len());
    }

    #[test]
    fn test_similarity() {
        assert_eq!(similarity("battery", "battery"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
        assert!(similarity("battery life", "battery lives") > 0.8);
        assert!(similarity("camera", "shipping") < 0.5);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), 0.0);
        assert_eq!(median(&[3, 1, 2]), 2.0);
        assert_eq!(median(&[0, 1, 2, 3]), 1.5);
    }
}
