use crate::models::{EvaluationResult, QuestionBankEntry, SimilarityScore};
use crate::question_bank::normalize_id;
use std::collections::{HashMap, HashSet};

const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now",
];

/// TF-IDF cosine similarity between a model answer and a student answer,
/// computed over the two-document corpus they form. Returns a value in
/// `[0, 1]`; 0 when either side is empty.
pub fn tfidf_similarity(reference: &str, candidate: &str) -> f32 {
    if reference.is_empty() || candidate.is_empty() {
        return 0.0;
    }

    let docs = [tokenize(reference), tokenize(candidate)];

    let mut vocabulary: Vec<&str> = Vec::new();
    let mut seen = HashSet::new();
    for token in docs.iter().flatten() {
        if seen.insert(token.as_str()) {
            vocabulary.push(token.as_str());
        }
    }

    // Smoothed IDF over the two documents.
    let idf: HashMap<&str, f32> = vocabulary
        .iter()
        .map(|&token| {
            let df = docs.iter().filter(|doc| doc.iter().any(|t| t == token)).count();
            (token, (docs.len() as f32 / (1.0 + df as f32)).ln() + 1.0)
        })
        .collect();

    let vectors: Vec<Vec<f32>> = docs
        .iter()
        .map(|doc| {
            let tf = term_frequencies(doc);
            vocabulary
                .iter()
                .map(|token| tf.get(token).copied().unwrap_or(0.0) * idf[token])
                .collect()
        })
        .collect();

    cosine_similarity(&vectors[0], &vectors[1])
}

/// Scores each evaluation result against the bank entry with the same
/// normalized id. Results with no matching entry are skipped.
pub fn score_evaluations(
    evaluation: &[EvaluationResult],
    bank: &[QuestionBankEntry],
) -> Vec<SimilarityScore> {
    evaluation
        .iter()
        .filter_map(|result| {
            let key = normalize_id(&result.id);
            bank.iter()
                .find(|entry| normalize_id(&entry.id) == key)
                .map(|entry| SimilarityScore {
                    id: result.id.clone(),
                    score: tfidf_similarity(&entry.model_answer, &result.extracted_answer),
                })
        })
        .collect()
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect::<String>()
        })
        .filter(|word| !word.is_empty() && !STOPWORDS.contains(&word.as_str()))
        .collect()
}

fn term_frequencies(doc: &[String]) -> HashMap<&str, f32> {
    let mut counts: HashMap<&str, f32> = HashMap::new();
    for token in doc {
        *counts.entry(token.as_str()).or_insert(0.0) += 1.0;
    }
    let total = doc.len() as f32;
    for value in counts.values_mut() {
        *value /= total;
    }
    counts
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
