use std::cmp::Reverse;
use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use serde::Serialize;

pub mod export;
pub mod history;
pub mod input;

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentKind {
    Premise,
    Conclusion,
    Evidence,
}

impl ArgumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArgumentKind::Premise => "premise",
            ArgumentKind::Conclusion => "conclusion",
            ArgumentKind::Evidence => "evidence",
        }
    }
}

impl fmt::Display for ArgumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Character offsets of a sentence, counted from the start of the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Argument {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ArgumentKind,
    pub text: String,
    pub confidence: u32,
    pub position: Span,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Claim {
    pub id: String,
    pub text: String,
    pub confidence: u32,
    pub evidence: Vec<String>,
    pub contradictions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_sentences: usize,
    pub argumentative_sentences: usize,
    pub neutral_sentences: usize,
    pub average_confidence: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub main_thesis: String,
    pub arguments: Vec<Argument>,
    pub claims: Vec<Claim>,
    pub statistics: Statistics,
}

// ---------------------------------------------------------------------------
// Hyperparameters
// ---------------------------------------------------------------------------

struct Hyperparameters {
    argument_marker_bonus: f64,
    evidence_marker_bonus: f64,
    conclusion_marker_bonus: f64,
    length_bonus_min_chars: usize,
    length_bonus_max_chars: usize,
    length_bonus: f64,
    punctuation_bonus: f64,
    argument_jitter: f64,
    argument_confidence_max: f64,
    argument_threshold: u32,
    claim_marker_bonus: f64,
    strong_language_bonus: f64,
    comparative_bonus: f64,
    claim_jitter: f64,
    claim_threshold: u32,
    evidence_overlap_ratio: f64,
    evidence_cap: usize,
    contradiction_min_shared_tokens: usize,
    contradiction_cap: usize,
    thesis_strong_min: u32,
    history_capacity: usize,
    upload_max_bytes: u64,
}

static HP: Hyperparameters = Hyperparameters {
    argument_marker_bonus: 30.0,
    evidence_marker_bonus: 40.0,
    conclusion_marker_bonus: 35.0,
    length_bonus_min_chars: 50,
    length_bonus_max_chars: 200,
    length_bonus: 15.0,
    punctuation_bonus: 10.0,
    argument_jitter: 20.0,
    argument_confidence_max: 95.0,
    argument_threshold: 40,
    claim_marker_bonus: 40.0,
    strong_language_bonus: 25.0,
    comparative_bonus: 20.0,
    claim_jitter: 15.0,
    claim_threshold: 35,
    evidence_overlap_ratio: 0.3,
    evidence_cap: 3,
    contradiction_min_shared_tokens: 2,
    contradiction_cap: 2,
    thesis_strong_min: 75,
    history_capacity: 5,
    upload_max_bytes: 10 * 1024 * 1024,
};

pub const NO_THESIS: &str = "No clear thesis identified";
pub const EXTERNAL_SOURCE_NOTE: &str = "External source mentioned";
pub const RESEARCH_STUDY_NOTE: &str = "Research study referenced";

// ---------------------------------------------------------------------------
// Marker lists
// ---------------------------------------------------------------------------

// Entries are matched as substrings of the lowercased sentence, so short
// entries like "as" or "no" fire inside longer words.

static ARGUMENT_MARKERS: &[&str] = &[
    // Causal
    "therefore",
    "thus",
    "hence",
    "consequently",
    "as a result",
    "because",
    "since",
    "due to",
    "given that",
    "as",
    // Contrastive
    "however",
    "but",
    "yet",
    "nevertheless",
    "although",
    // Additive
    "furthermore",
    "moreover",
    "additionally",
    "in addition",
    // Illustrative
    "for example",
    "for instance",
    "specifically",
    "namely",
    // Summarizing
    "in conclusion",
    "to summarize",
    "in summary",
    "finally",
    // Emphatic
    "evidently",
    "clearly",
    "obviously",
    "undoubtedly",
    // Comparative
    "on the other hand",
    "conversely",
    "in contrast",
    "whereas",
];

static EVIDENCE_MARKERS: &[&str] = &[
    "according to",
    "research shows",
    "studies indicate",
    "data suggests",
    "statistics reveal",
    "evidence suggests",
    "experts believe",
    "as reported by",
    "documented in",
    "cited in",
    "referenced in",
    "survey results",
    "findings indicate",
    "analysis reveals",
];

static CONCLUSION_MARKERS: &[&str] = &["therefore", "thus", "hence", "consequently", "in conclusion"];

// The first-person entries keep their capital "I" and never match.
static CLAIM_MARKERS: &[&str] = &[
    "I believe",
    "I argue",
    "I contend",
    "I propose",
    "I suggest",
    "it is clear that",
    "it is evident that",
    "it is obvious that",
    "the fact is",
    "the truth is",
    "undeniably",
    "certainly",
    "without doubt",
    "unquestionably",
    "definitely",
];

static STRONG_LANGUAGE: &[&str] = &["must", "should", "will", "always", "never", "all", "every"];

static COMPARATIVES: &[&str] = &["better", "worse", "more", "less", "superior", "inferior"];

static NEGATIONS: &[&str] = &[
    "not",
    "never",
    "no",
    "false",
    "incorrect",
    "wrong",
    "however",
    "but",
];

// ---------------------------------------------------------------------------
// Compiled patterns
// ---------------------------------------------------------------------------

static SENTENCE_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").unwrap());

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").unwrap());

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn contains_any(lower: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| lower.contains(m))
}

fn has_evidence_marker(sentence: &str) -> bool {
    contains_any(&sentence.to_lowercase(), EVIDENCE_MARKERS)
}

fn lowercase_tokens(sentence: &str) -> Vec<String> {
    sentence
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Number of claim tokens (with repeats) that also occur in the candidate.
fn shared_token_count(claim_tokens: &[String], candidate_tokens: &[String]) -> usize {
    let candidate: HashSet<&str> = candidate_tokens.iter().map(String::as_str).collect();
    claim_tokens
        .iter()
        .filter(|t| candidate.contains(t.as_str()))
        .count()
}

// ---------------------------------------------------------------------------
// Sentence tokenization
// ---------------------------------------------------------------------------

/// Split text after every `.`, `!` or `?` that is followed by whitespace.
///
/// Pieces are trimmed and empty pieces dropped. Abbreviations, decimals and
/// quoted punctuation are not special-cased.
pub fn tokenize_sentences(text: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut last = 0;
    for m in SENTENCE_BREAK_RE.find_iter(text) {
        // The terminal mark is one ASCII byte; keep it, drop the whitespace run.
        pieces.push(&text[last..m.start() + 1]);
        last = m.end();
    }
    pieces.push(&text[last..]);

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Argument classification
// ---------------------------------------------------------------------------

fn score_argument(sentence: &str, length: usize) -> (ArgumentKind, f64) {
    let lower = sentence.to_lowercase();
    let mut score = 0.0;
    let mut kind = ArgumentKind::Premise;

    if contains_any(&lower, ARGUMENT_MARKERS) {
        score += HP.argument_marker_bonus;
    }
    if contains_any(&lower, EVIDENCE_MARKERS) {
        score += HP.evidence_marker_bonus;
        kind = ArgumentKind::Evidence;
    }
    // Runs after the evidence check: the kind is overridden, the bonus is not.
    if contains_any(&lower, CONCLUSION_MARKERS) {
        score += HP.conclusion_marker_bonus;
        kind = ArgumentKind::Conclusion;
    }
    if length > HP.length_bonus_min_chars && length < HP.length_bonus_max_chars {
        score += HP.length_bonus;
    }
    if sentence.contains(|c: char| c == ',' || c == ';') {
        score += HP.punctuation_bonus;
    }

    (kind, score)
}

/// Annotations attached to an argument: any URLs it contains, followed by
/// fixed notes for attributions and research mentions.
pub fn extract_sources(sentence: &str) -> Vec<String> {
    let mut sources: Vec<String> = URL_RE
        .find_iter(sentence)
        .map(|m| m.as_str().to_string())
        .collect();

    let lower = sentence.to_lowercase();
    if lower.contains("according to") {
        sources.push(EXTERNAL_SOURCE_NOTE.to_string());
    }
    if lower.contains("study") || lower.contains("research") {
        sources.push(RESEARCH_STUDY_NOTE.to_string());
    }
    sources
}

/// Score every sentence and keep those whose rounded confidence exceeds the
/// argument threshold.
///
/// Positions advance by `length + 1` for every sentence, retained or not,
/// which assumes exactly one separator character between sentences.
pub fn identify_arguments<R: Rng>(sentences: &[String], rng: &mut R) -> Vec<Argument> {
    let mut arguments = Vec::new();
    let mut cursor = 0usize;

    for (index, sentence) in sentences.iter().enumerate() {
        let length = sentence.chars().count();
        let (kind, score) = score_argument(sentence, length);
        let jittered = score + rng.gen_range(0.0..HP.argument_jitter);
        let confidence = jittered.min(HP.argument_confidence_max).round() as u32;

        if confidence > HP.argument_threshold {
            arguments.push(Argument {
                id: format!("arg_{index}"),
                kind,
                text: sentence.clone(),
                confidence,
                position: Span {
                    start: cursor,
                    end: cursor + length,
                },
                sources: extract_sources(sentence),
            });
        }

        cursor += length + 1;
    }

    arguments
}

// ---------------------------------------------------------------------------
// Claim extraction
// ---------------------------------------------------------------------------

fn score_claim(sentence: &str) -> f64 {
    let lower = sentence.to_lowercase();
    let mut score = 0.0;

    if contains_any(&lower, CLAIM_MARKERS) {
        score += HP.claim_marker_bonus;
    }
    if contains_any(&lower, STRONG_LANGUAGE) {
        score += HP.strong_language_bonus;
    }
    if contains_any(&lower, COMPARATIVES) {
        score += HP.comparative_bonus;
    }
    score
}

/// Sentences that share enough vocabulary with `claim` and carry an evidence
/// marker, in text order, capped at three.
///
/// Every sentence whose text equals the claim is skipped, not just the claim
/// itself.
pub fn find_supporting_evidence(claim: &str, sentences: &[String]) -> Vec<String> {
    let claim_tokens = lowercase_tokens(claim);

    sentences
        .iter()
        .filter(|s| s.as_str() != claim)
        .filter(|s| {
            let tokens = lowercase_tokens(s);
            let longest = claim_tokens.len().max(tokens.len());
            if longest == 0 {
                return false;
            }
            let ratio = shared_token_count(&claim_tokens, &tokens) as f64 / longest as f64;
            ratio > HP.evidence_overlap_ratio && has_evidence_marker(s)
        })
        .take(HP.evidence_cap)
        .cloned()
        .collect()
}

/// Negation-bearing sentences sharing more than two tokens with `claim`,
/// capped at two.
pub fn find_contradictions(claim: &str, sentences: &[String]) -> Vec<String> {
    let claim_tokens = lowercase_tokens(claim);

    sentences
        .iter()
        .filter(|s| s.as_str() != claim)
        .filter(|s| contains_any(&s.to_lowercase(), NEGATIONS))
        .filter(|s| {
            shared_token_count(&claim_tokens, &lowercase_tokens(s))
                > HP.contradiction_min_shared_tokens
        })
        .take(HP.contradiction_cap)
        .cloned()
        .collect()
}

/// Score every sentence as an assertion. Claim confidence is not clamped.
pub fn extract_claims<R: Rng>(sentences: &[String], rng: &mut R) -> Vec<Claim> {
    let mut claims = Vec::new();

    for (index, sentence) in sentences.iter().enumerate() {
        let jittered = score_claim(sentence) + rng.gen_range(0.0..HP.claim_jitter);
        let confidence = jittered.round() as u32;
        if confidence <= HP.claim_threshold {
            continue;
        }

        claims.push(Claim {
            id: format!("claim_{index}"),
            text: sentence.clone(),
            confidence,
            evidence: find_supporting_evidence(sentence, sentences),
            contradictions: find_contradictions(sentence, sentences),
        });
    }

    claims
}

// ---------------------------------------------------------------------------
// Thesis and statistics
// ---------------------------------------------------------------------------

/// Pick the central sentence: the most confident conclusion (earliest wins a
/// tie), else the first argument above 75, else the first sentence.
pub fn identify_main_thesis(sentences: &[String], arguments: &[Argument]) -> String {
    let best_conclusion = arguments
        .iter()
        .filter(|a| a.kind == ArgumentKind::Conclusion)
        .min_by_key(|a| Reverse(a.confidence));
    if let Some(conclusion) = best_conclusion {
        return conclusion.text.clone();
    }

    if let Some(strong) = arguments
        .iter()
        .find(|a| a.confidence > HP.thesis_strong_min)
    {
        return strong.text.clone();
    }

    sentences
        .first()
        .cloned()
        .unwrap_or_else(|| NO_THESIS.to_string())
}

pub fn calculate_statistics(sentences: &[String], arguments: &[Argument]) -> Statistics {
    let total_sentences = sentences.len();
    let argumentative_sentences = arguments.len();
    let average_confidence = if arguments.is_empty() {
        0.0
    } else {
        let sum: f64 = arguments.iter().map(|a| f64::from(a.confidence)).sum();
        sum / argumentative_sentences as f64
    };

    Statistics {
        total_sentences,
        argumentative_sentences,
        neutral_sentences: total_sentences.saturating_sub(argumentative_sentences),
        average_confidence,
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyze `text` with jitter drawn from the thread-local generator.
///
/// Two calls on the same text will generally disagree on confidences and
/// therefore on which sentences clear the thresholds.
pub fn analyze(text: &str) -> AnalysisResult {
    analyze_with_rng(text, &mut rand::thread_rng())
}

/// Analyze `text` drawing every jitter term from `rng`.
///
/// Arguments consume one draw per sentence, then claims consume one draw per
/// sentence, so a seeded generator reproduces a run exactly.
pub fn analyze_with_rng<R: Rng>(text: &str, rng: &mut R) -> AnalysisResult {
    let timestamp = Utc::now();

    let sentences = tokenize_sentences(text);
    let arguments = identify_arguments(&sentences, rng);
    let claims = extract_claims(&sentences, rng);
    let main_thesis = identify_main_thesis(&sentences, &arguments);
    let statistics = calculate_statistics(&sentences, &arguments);

    tracing::debug!(
        sentences = statistics.total_sentences,
        arguments = arguments.len(),
        claims = claims.len(),
        average_confidence = statistics.average_confidence,
        "Analysis complete"
    );

    AnalysisResult {
        id: format!("analysis_{}", timestamp.timestamp_millis()),
        text: text.to_string(),
        timestamp,
        main_thesis,
        arguments,
        claims,
        statistics,
    }
}
