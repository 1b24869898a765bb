use std::collections::{HashMap, HashSet};

use crate::extract::text::{is_stopword, split_sentences, words};

/// Sentences kept in an extractive summary
pub const SUMMARY_SENTENCES: usize = 5;

const KEYWORD_COUNT: usize = 10;
const IDEAL_SENTENCE_WORDS: f64 = 20.0;

struct Scored {
    index: usize,
    score: f64,
    sentence: String,
}

/// Extractive summary: the highest-ranked sentences of `paragraphs`,
/// re-emitted in document order.
///
/// Ranking favours overlap with the title, density of the document's most
/// frequent content words, sentences near the start or end, and sentences
/// close to a typical news-sentence length.
pub fn summarize(title: &str, paragraphs: &[String], max_sentences: usize) -> String {
    let sentences: Vec<String> = paragraphs
        .iter()
        .flat_map(|p| split_sentences(p))
        .collect();

    if sentences.len() <= max_sentences {
        return sentences.join(" ");
    }

    let keywords = keywords(&sentences);
    let title_words = content_words(title);
    let total = sentences.len();

    let mut scored: Vec<Scored> = sentences
        .into_iter()
        .enumerate()
        .map(|(index, sentence)| {
            let tokens = words(&sentence);
            let score = title_score(&tokens, &title_words) * 1.5
                + keyword_score(&tokens, &keywords) * 2.0
                + length_score(tokens.len())
                + position_score(index, total);
            Scored {
                index,
                score,
                sentence,
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.index.cmp(&b.index))
    });
    scored.truncate(max_sentences);
    scored.sort_by_key(|s| s.index);

    scored
        .into_iter()
        .map(|s| s.sentence)
        .collect::<Vec<_>>()
        .join(" ")
}

fn content_words(text: &str) -> HashSet<String> {
    words(text)
        .into_iter()
        .filter(|w| w.chars().count() > 2 && !is_stopword(w))
        .collect()
}

/// Most frequent content words, each weighted by its share of all content words
fn keywords(sentences: &[String]) -> HashMap<String, f64> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut total = 0usize;

    for sentence in sentences {
        for word in words(sentence) {
            if word.chars().count() > 2 && !is_stopword(&word) {
                *counts.entry(word).or_insert(0) += 1;
                total += 1;
            }
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(KEYWORD_COUNT);

    ranked
        .into_iter()
        .map(|(word, count)| (word, count as f64 / total.max(1) as f64))
        .collect()
}

fn title_score(tokens: &[String], title_words: &HashSet<String>) -> f64 {
    if title_words.is_empty() {
        return 0.0;
    }
    let matched: HashSet<&String> = tokens.iter().filter(|t| title_words.contains(*t)).collect();
    matched.len() as f64 / title_words.len() as f64
}

fn keyword_score(tokens: &[String], keywords: &HashMap<String, f64>) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let sum: f64 = tokens.iter().filter_map(|t| keywords.get(t)).sum();
    sum * 10.0 / tokens.len() as f64
}

fn length_score(word_count: usize) -> f64 {
    let diff = (IDEAL_SENTENCE_WORDS - word_count as f64).abs();
    (1.0 - diff / IDEAL_SENTENCE_WORDS).max(0.0)
}

fn position_score(index: usize, total: usize) -> f64 {
    let normalized = (index + 1) as f64 / total as f64;
    match normalized {
        n if n <= 0.1 => 0.17,
        n if n <= 0.2 => 0.23,
        n if n <= 0.3 => 0.14,
        n if n <= 0.4 => 0.08,
        n if n <= 0.5 => 0.05,
        n if n <= 0.6 => 0.04,
        n if n <= 0.7 => 0.06,
        n if n <= 0.8 => 0.04,
        n if n <= 0.9 => 0.04,
        _ => 0.15,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraphs(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_short_text_returned_whole() {
        let body = paragraphs(&["One sentence here.", "Another one there."]);
        assert_eq!(
            summarize("Title", &body, SUMMARY_SENTENCES),
            "One sentence here. Another one there."
        );
        assert_eq!(summarize("Title", &[], SUMMARY_SENTENCES), "");
    }

    #[test]
    fn test_summary_prefers_title_sentences_in_document_order() {
        let body = paragraphs(&[
            "The weather was mild across the region on Tuesday.",
            "Chipmaker Acme reported record quarterly revenue driven by datacenter demand.",
            "Local bakeries sold more bread than usual.",
            "A parade was held downtown.",
            "Acme expects datacenter revenue to keep climbing next quarter, the chipmaker said.",
            "Traffic was light.",
        ]);

        let summary = summarize("Chipmaker Acme posts record datacenter revenue", &body, 2);

        assert_eq!(
            summary,
            "Chipmaker Acme reported record quarterly revenue driven by datacenter demand. \
             Acme expects datacenter revenue to keep climbing next quarter, the chipmaker said."
        );
    }

    #[test]
    fn test_summary_sentence_count_bounded() {
        let body: Vec<String> = (0..20)
            .map(|i| format!("Sentence number {} talks about markets and trading.", i))
            .collect();
        let summary = summarize("Markets", &body, SUMMARY_SENTENCES);
        assert_eq!(split_sentences(&summary).len(), SUMMARY_SENTENCES);
    }

    #[test]
    fn test_length_and_position_scores() {
        assert_eq!(length_score(20), 1.0);
        assert_eq!(length_score(60), 0.0);
        assert_eq!(position_score(0, 10), 0.17);
        assert_eq!(position_score(9, 10), 0.15);
    }
}
