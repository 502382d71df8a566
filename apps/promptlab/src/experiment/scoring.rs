//! Response scoring: heuristic, string-matching scores for a raw completion.
//!
//! Every function here is total: arbitrary text (empty, malformed XML, binary
//! junk) degrades to a low score instead of failing.
//!
//! The thresholds are deliberately naïve and must stay exactly as they are so
//! that results remain comparable across runs:
//! - relevance: keyword occurrences × 1.5, capped at 10
//! - clarity: 5 base, +2 question mark, +2 for 21–99 words, +1 for fewer than 3 '('
//! - format: structured 10/3 on XML tags, free text 8/5 on digits + question marks
//! - parseable: opening container plus items (a response cut off before
//!   `</questions>` still parses), or ≥3 question marks and more than 100 chars

use crate::experiment::strategy::Strategy;

const MAX_SCORE: f64 = 10.0;
const CLARITY_BASE: f64 = 5.0;
const MIN_QUESTION_MARKS: usize = 3;
const MIN_XML_ITEMS: usize = 3;
const MIN_PARSEABLE_CHARS: usize = 100;

/// Keyword set and weighting used for the relevance score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub keywords: Vec<String>,
    pub points_per_match: f64,
    pub max_relevance: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            keywords: ["python", "fastapi", "postgresql", "mongodb", "rest", "api", "backend"]
                .into_iter()
                .map(String::from)
                .collect(),
            points_per_match: 1.5,
            max_relevance: MAX_SCORE,
        }
    }
}

/// The four heuristic scores for one response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseScores {
    pub relevance: f64,
    pub clarity: f64,
    pub format_compliance: f64,
    pub parsing_success: bool,
}

/// Scores a full response. Clarity looks only at the first line; relevance,
/// format and parseability look at the whole text.
pub fn score_response(text: &str, strategy: Strategy, config: &ScoringConfig) -> ResponseScores {
    let first_line = text.split('\n').next().unwrap_or_default();

    ResponseScores {
        relevance: relevance(text, config),
        clarity: clarity(first_line),
        format_compliance: format_compliance(text, strategy),
        parsing_success: parseable(text, strategy),
    }
}

/// Counts case-insensitive, non-overlapping occurrences of every configured
/// keyword. Keywords are not derived from the job description.
pub fn relevance(text: &str, config: &ScoringConfig) -> f64 {
    let text_lower = text.to_lowercase();
    let matches: usize = config
        .keywords
        .iter()
        .filter(|kw| !kw.is_empty())
        .map(|kw| text_lower.matches(kw.to_lowercase().as_str()).count())
        .sum();

    (matches as f64 * config.points_per_match).min(config.max_relevance)
}

pub fn clarity(text: &str) -> f64 {
    let has_question_mark = text.contains('?');
    let word_count = text.split_whitespace().count();
    let good_length = word_count > 20 && word_count < 100;
    let no_jargon_overload = text.matches('(').count() < 3;

    let mut score = CLARITY_BASE;
    if has_question_mark {
        score += 2.0;
    }
    if good_length {
        score += 2.0;
    }
    if no_jargon_overload {
        score += 1.0;
    }

    score.min(MAX_SCORE)
}

pub fn format_compliance(text: &str, strategy: Strategy) -> f64 {
    if strategy.expects_xml() {
        if has_xml_structure(text) {
            10.0
        } else {
            3.0
        }
    } else if has_item_numbers(text) && question_marks(text) >= MIN_QUESTION_MARKS {
        8.0
    } else {
        5.0
    }
}

pub fn parseable(text: &str, strategy: Strategy) -> bool {
    if strategy.expects_xml() {
        text.contains("<questions>") && xml_items(text) >= MIN_XML_ITEMS
    } else {
        question_marks(text) >= MIN_QUESTION_MARKS && text.chars().count() > MIN_PARSEABLE_CHARS
    }
}

/// `<questions>` … `</questions>` container with at least three `<question>` items.
fn has_xml_structure(text: &str) -> bool {
    text.contains("<questions>")
        && text.contains("</questions>")
        && xml_items(text) >= MIN_XML_ITEMS
}

fn xml_items(text: &str) -> usize {
    text.matches("<question>").count()
}

fn has_item_numbers(text: &str) -> bool {
    text.chars().any(|c| ('1'..='5').contains(&c))
}

fn question_marks(text: &str) -> usize {
    text.matches('?').count()
}
