//! Answer Evaluator: two-stage grading of a candidate answer.
//!
//! Stage 1 is a local keyword classifier (mandatory questions only).
//! Stage 2 is a pluggable `AnswerScorer`; `LlmAnswerScorer` by default, a stub in tests.
//!
//! Stage 2 is bounded by a timeout. When it fails the evaluator never blocks the
//! interview: mandatory answers keep their keyword-only result, preferred answers
//! get partial credit. Credential errors are the one exception and propagate.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::interview::guardrail::tokenize;
use crate::interview::prompts::{build_classify_prompt, build_depth_prompt};
use crate::interview::qualifications::{Category, Points, Qualification};
use crate::interview::scoring::{AnswerRecord, Outcome};
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, ONE_WORD_SYSTEM};
use crate::llm_client::{parse_json_reply, ChatMessage, CompletionOptions, CompletionService, LlmError};

/// Depth at or above which a preferred answer earns full weight.
pub const PASS_DEPTH: f64 = 0.7;
/// Depth at or above which a preferred answer earns partial credit.
pub const PARTIAL_DEPTH: f64 = 0.3;
/// Share of the weight awarded for a partial answer.
pub const PARTIAL_CREDIT_PERCENT: u32 = 60;

/// Affirmations that count for every mandatory question.
const AFFIRMATIVE: &[&str] = &[
    "yes", "yeah", "yep", "yup", "sure", "absolutely", "definitely", "certainly", "of course",
    "correct", "i have", "i do", "i am", "i can",
];

/// Negations that count against every mandatory question.
const NEGATIVE: &[&str] = &[
    "no", "nope", "nah", "not", "never", "i don't", "i do not", "i can't", "i cannot",
    "i'm not", "i am not", "i haven't", "i have not",
];

/// Words that turn the phrase after them around.
const NEGATION_WORDS: &[&str] = &[
    "no", "nope", "nah", "not", "never", "don't", "can't", "cannot", "won't", "unable",
    "haven't", "didn't", "isn't",
];

/// Things a candidate may deny having without refusing the requirement.
const CONCERN_WORDS: &[&str] = &["problem", "problems", "issue", "issues", "trouble"];

/// Maximum number of words between a negation and the concern it denies.
const NEGATION_REACH: usize = 3;

/// Figures above this are years or counts, not ages.
const MAX_STATED_NUMBER: u32 = 120;

/// Words that put a stated figure in the future ("I'll be 21 next year").
const FUTURE_MARKERS: &[&str] = &[
    "will", "i'll", "next", "turn", "turning", "soon", "almost", "nearly", "until",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationSource {
    /// Decided by the local keyword stage.
    Keyword,
    /// Decided by the external scorer.
    Model,
    /// The external scorer failed; the conservative default was applied.
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub outcome: Outcome,
    pub points: Points,
    pub rationale: String,
    pub source: EvaluationSource,
}

impl Evaluation {
    fn new(
        q: &Qualification,
        outcome: Outcome,
        rationale: impl Into<String>,
        source: EvaluationSource,
    ) -> Self {
        Self {
            outcome,
            points: points_for(q, outcome),
            rationale: rationale.into(),
            source,
        }
    }

    /// Freezes this evaluation into the record the tracker owns.
    pub fn into_record(self, q: &'static Qualification, answers: Vec<String>) -> AnswerRecord {
        AnswerRecord {
            qualification_id: q.id,
            category: q.category,
            answers,
            outcome: self.outcome,
            points: self.points,
            rationale: self.rationale,
            source: self.source,
        }
    }
}

/// What the keyword stage saw in a mandatory answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordSignal {
    Affirmative,
    Negative,
    /// Both polarities present, e.g. "yes, but not on weekends".
    Conflicting,
    Silent,
}

/// External verdict for a mandatory answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub passed: bool,
    pub rationale: String,
}

/// External depth rating for a preferred answer, 0.0 – 1.0.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DepthRating {
    pub depth: f64,
    #[serde(default)]
    pub rationale: String,
}

/// The external scorer seam. Implement this to swap grading backends without
/// touching the evaluator or orchestrator.
#[async_trait]
pub trait AnswerScorer: Send + Sync {
    async fn classify(&self, q: &Qualification, answer: &str) -> Result<Verdict, LlmError>;

    async fn rate_depth(&self, q: &Qualification, answer: &str) -> Result<DepthRating, LlmError>;
}

/// Grades answers through the completion service.
pub struct LlmAnswerScorer {
    llm: Arc<dyn CompletionService>,
}

impl LlmAnswerScorer {
    pub fn new(llm: Arc<dyn CompletionService>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl AnswerScorer for LlmAnswerScorer {
    async fn classify(&self, q: &Qualification, answer: &str) -> Result<Verdict, LlmError> {
        let prompt = build_classify_prompt(q, answer);
        let reply = self
            .llm
            .complete(
                ONE_WORD_SYSTEM,
                &[ChatMessage::user(prompt)],
                CompletionOptions::GRADING,
            )
            .await?;
        parse_verdict(&reply)
    }

    async fn rate_depth(&self, q: &Qualification, answer: &str) -> Result<DepthRating, LlmError> {
        let prompt = build_depth_prompt(q, answer);
        let reply = self
            .llm
            .complete(
                JSON_ONLY_SYSTEM,
                &[ChatMessage::user(prompt)],
                CompletionOptions::GRADING,
            )
            .await?;
        parse_depth(&reply)
    }
}

/// Reads a PASS/FAIL reply. The first word decides.
fn parse_verdict(reply: &str) -> Result<Verdict, LlmError> {
    let first = reply
        .split_whitespace()
        .next()
        .map(|w| w.trim_matches(|c: char| !c.is_ascii_alphabetic()).to_ascii_uppercase())
        .unwrap_or_default();

    match first.as_str() {
        "PASS" => Ok(Verdict {
            passed: true,
            rationale: "Model judged the requirement met".to_string(),
        }),
        "FAIL" => Ok(Verdict {
            passed: false,
            rationale: "Model judged the requirement not met".to_string(),
        }),
        _ => Err(LlmError::Unrecognized(reply.chars().take(80).collect())),
    }
}

/// Reads `{"depth": 0.7, "rationale": "..."}`, tolerating a bare number.
fn parse_depth(reply: &str) -> Result<DepthRating, LlmError> {
    let rating = match parse_json_reply::<DepthRating>(reply) {
        Ok(rating) => rating,
        Err(json_err) => match reply.trim().parse::<f64>() {
            Ok(depth) => DepthRating {
                depth,
                rationale: String::new(),
            },
            Err(_) => return Err(json_err),
        },
    };

    if !rating.depth.is_finite() {
        return Err(LlmError::Unrecognized(reply.chars().take(80).collect()));
    }

    Ok(DepthRating {
        depth: rating.depth.clamp(0.0, 1.0),
        rationale: rating.rationale,
    })
}

/// Maps a depth rating onto the three-level outcome.
pub fn outcome_for_depth(depth: f64) -> Outcome {
    if depth >= PASS_DEPTH {
        Outcome::Pass
    } else if depth >= PARTIAL_DEPTH {
        Outcome::Partial
    } else {
        Outcome::Fail
    }
}

/// Points awarded for an outcome on the given qualification.
pub fn points_for(q: &Qualification, outcome: Outcome) -> Points {
    match outcome {
        Outcome::Pass => q.weight,
        Outcome::Partial => q.weight.percent(PARTIAL_CREDIT_PERCENT),
        Outcome::Fail => Points::ZERO,
    }
}

/// Stage 1: phrase matching on word boundaries.
///
/// A match that sits inside a longer match of the opposite polarity is dropped,
/// so "no problem" reads as affirmative and "not willing" as negative. A negation
/// that denies a concern ("not a problem", "I don't have any violations") is
/// left for the scorer. Requirements with a numeric minimum also weigh the
/// figure the candidate states.
pub fn keyword_signal(q: &Qualification, answer: &str) -> KeywordSignal {
    let words = tokenize(answer);
    let phrase_signal = phrase_signal(q, &words);

    let Some(minimum) = q.numeric_minimum else {
        return phrase_signal;
    };
    match stated_number(&words) {
        None => phrase_signal,
        Some(n) if n < minimum => KeywordSignal::Negative,
        Some(_) => match phrase_signal {
            KeywordSignal::Negative | KeywordSignal::Conflicting => phrase_signal,
            _ if mentions_future(&words) => KeywordSignal::Conflicting,
            _ => KeywordSignal::Affirmative,
        },
    }
}

fn phrase_signal(q: &Qualification, words: &[String]) -> KeywordSignal {
    let positive = find_spans(words, AFFIRMATIVE.iter().chain(q.pass_keywords));
    let negative = find_spans(words, NEGATIVE.iter().chain(q.fail_keywords));

    let positive: Vec<Span> = positive
        .iter()
        .copied()
        .filter(|p| !is_shadowed(*p, &negative))
        .collect();
    let negative: Vec<Span> = negative
        .iter()
        .copied()
        .filter(|n| !is_shadowed(*n, &positive))
        .collect();

    match (!positive.is_empty(), !negative.is_empty()) {
        (true, false) => KeywordSignal::Affirmative,
        (false, true) if denies_concern(q, words, &negative) => KeywordSignal::Conflicting,
        (false, true) => KeywordSignal::Negative,
        (true, true) => KeywordSignal::Conflicting,
        (false, false) => KeywordSignal::Silent,
    }
}

/// True when a negation is followed closely by a concern it denies.
fn denies_concern(q: &Qualification, words: &[String], negative: &[Span]) -> bool {
    let concern_phrases = q
        .fail_keywords
        .iter()
        .filter(|phrase| !tokenize(phrase).iter().any(|w| is_negation(w)))
        .chain(CONCERN_WORDS.iter());
    let concerns = find_spans(words, concern_phrases);

    negative
        .iter()
        .filter(|n| words[n.0..n.1].iter().any(|w| is_negation(w)))
        .any(|n| {
            concerns
                .iter()
                .any(|c| c.0 >= n.1 && c.0 - n.1 <= NEGATION_REACH)
        })
}

fn is_negation(word: &str) -> bool {
    NEGATION_WORDS.contains(&word)
}

/// Largest plausible age-like figure in the answer. Years and other large
/// numbers are ignored.
fn stated_number(words: &[String]) -> Option<u32> {
    words
        .iter()
        .filter_map(|w| w.parse::<u32>().ok())
        .filter(|n| *n <= MAX_STATED_NUMBER)
        .max()
}

fn mentions_future(words: &[String]) -> bool {
    words.iter().any(|w| FUTURE_MARKERS.contains(&w.as_str()))
}

type Span = (usize, usize);

fn find_spans<'a>(words: &[String], phrases: impl Iterator<Item = &'a &'a str>) -> Vec<Span> {
    let mut spans = Vec::new();
    for phrase in phrases {
        let phrase = tokenize(phrase);
        if phrase.is_empty() || phrase.len() > words.len() {
            continue;
        }
        for start in 0..=words.len() - phrase.len() {
            if words[start..start + phrase.len()] == phrase[..] {
                spans.push((start, start + phrase.len()));
            }
        }
    }
    spans
}

/// True when `span` lies inside a strictly longer span from `others`.
fn is_shadowed(span: Span, others: &[Span]) -> bool {
    others
        .iter()
        .any(|o| o.0 <= span.0 && span.1 <= o.1 && (o.1 - o.0) > (span.1 - span.0))
}

/// Runs both stages for one answer.
pub struct AnswerEvaluator {
    scorer: Arc<dyn AnswerScorer>,
    timeout: Duration,
}

impl AnswerEvaluator {
    pub fn new(scorer: Arc<dyn AnswerScorer>, timeout: Duration) -> Self {
        Self { scorer, timeout }
    }

    /// Grades `answer` against `q`. Only credential errors are returned as `Err`.
    pub async fn evaluate(&self, q: &Qualification, answer: &str) -> Result<Evaluation, LlmError> {
        match q.category {
            Category::Mandatory => self.evaluate_mandatory(q, answer).await,
            Category::Preferred => self.evaluate_preferred(q, answer).await,
        }
    }

    async fn evaluate_mandatory(
        &self,
        q: &Qualification,
        answer: &str,
    ) -> Result<Evaluation, LlmError> {
        if answer.trim().is_empty() {
            return Ok(Evaluation::new(
                q,
                Outcome::Fail,
                "No answer given",
                EvaluationSource::Keyword,
            ));
        }

        let signal = keyword_signal(q, answer);
        debug!("Keyword signal for '{}': {:?}", q.id, signal);

        match signal {
            KeywordSignal::Affirmative => {
                return Ok(Evaluation::new(
                    q,
                    Outcome::Pass,
                    "Affirmative answer",
                    EvaluationSource::Keyword,
                ))
            }
            KeywordSignal::Negative => {
                return Ok(Evaluation::new(
                    q,
                    Outcome::Fail,
                    "Negative answer",
                    EvaluationSource::Keyword,
                ))
            }
            KeywordSignal::Conflicting | KeywordSignal::Silent => {}
        }

        match self.bounded(self.scorer.classify(q, answer)).await {
            Ok(verdict) => {
                let outcome = if verdict.passed {
                    Outcome::Pass
                } else {
                    Outcome::Fail
                };
                Ok(Evaluation::new(q, outcome, verdict.rationale, EvaluationSource::Model))
            }
            Err(e) if e.is_credential_error() => {
                error!("Completion credential rejected while grading '{}': {e}", q.id);
                Err(e)
            }
            Err(e) => {
                warn!(
                    "External grading failed for '{}' ({e}); keeping keyword-only result",
                    q.id
                );
                // No unambiguous affirmative was found, so the requirement is unconfirmed.
                Ok(Evaluation::new(
                    q,
                    Outcome::Fail,
                    "Requirement could not be confirmed",
                    EvaluationSource::Fallback,
                ))
            }
        }
    }

    async fn evaluate_preferred(
        &self,
        q: &Qualification,
        answer: &str,
    ) -> Result<Evaluation, LlmError> {
        if answer.trim().is_empty() {
            return Ok(Evaluation::new(
                q,
                Outcome::Fail,
                "No answer given",
                EvaluationSource::Keyword,
            ));
        }

        match self.bounded(self.scorer.rate_depth(q, answer)).await {
            Ok(rating) => {
                let outcome = outcome_for_depth(rating.depth);
                debug!("Depth for '{}': {:.2} -> {:?}", q.id, rating.depth, outcome);
                Ok(Evaluation::new(q, outcome, rating.rationale, EvaluationSource::Model))
            }
            Err(e) if e.is_credential_error() => {
                error!("Completion credential rejected while grading '{}': {e}", q.id);
                Err(e)
            }
            Err(e) => {
                warn!(
                    "External grading failed for '{}' ({e}); awarding partial credit",
                    q.id
                );
                Ok(Evaluation::new(
                    q,
                    Outcome::Partial,
                    "Graded with default partial credit",
                    EvaluationSource::Fallback,
                ))
            }
        }
    }

    async fn bounded<T>(
        &self,
        call: impl std::future::Future<Output = Result<T, LlmError>>,
    ) -> Result<T, LlmError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout(self.timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::qualifications::{MANDATORY, PREFERRED};
    use crate::interview::testing::{ScriptedCompletion, StubScorer};

    fn evaluator(scorer: StubScorer) -> AnswerEvaluator {
        AnswerEvaluator::new(Arc::new(scorer), Duration::from_millis(200))
    }

    #[tokio::test]
    async fn test_every_configured_pass_keyword_passes_for_ten_points() {
        let evaluator = evaluator(StubScorer::failing());
        for q in &MANDATORY {
            for keyword in q.pass_keywords {
                let evaluation = evaluator.evaluate(q, keyword).await.unwrap();
                assert_eq!(
                    evaluation.outcome,
                    Outcome::Pass,
                    "'{keyword}' did not pass '{}'",
                    q.id
                );
                assert_eq!(evaluation.points, Points::from_tenths(100));
                assert_eq!(evaluation.source, EvaluationSource::Keyword);
            }
        }
    }

    #[tokio::test]
    async fn test_plain_yes_in_a_sentence_passes_all_six() {
        let evaluator = evaluator(StubScorer::failing());
        for q in &MANDATORY {
            let evaluation = evaluator.evaluate(q, "Yes, I have been doing that for years.").await;
            assert_eq!(evaluation.unwrap().outcome, Outcome::Pass, "{}", q.id);
        }
    }

    #[tokio::test]
    async fn test_explicit_negative_fails_without_external_call() {
        let scorer = StubScorer::verdict(true);
        let calls = scorer.calls();
        let evaluator = evaluator(scorer);

        let evaluation = evaluator.evaluate(&MANDATORY[2], "no").await.unwrap();
        assert_eq!(evaluation.outcome, Outcome::Fail);
        assert_eq!(evaluation.points, Points::ZERO);
        assert_eq!(evaluation.source, EvaluationSource::Keyword);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[test]
    fn test_longer_phrase_shadows_opposite_polarity() {
        assert_eq!(
            keyword_signal(&MANDATORY[3], "No problem at all"),
            KeywordSignal::Affirmative
        );
        assert_eq!(
            keyword_signal(&MANDATORY[2], "Yes, no accidents and no violations"),
            KeywordSignal::Affirmative
        );
        assert_eq!(
            keyword_signal(&MANDATORY[3], "I'm not willing to do that"),
            KeywordSignal::Negative
        );
        assert_eq!(
            keyword_signal(&MANDATORY[0], "under 21"),
            KeywordSignal::Negative
        );
        assert_eq!(
            keyword_signal(&MANDATORY[1], "I don't have one"),
            KeywordSignal::Negative
        );
    }

    #[test]
    fn test_conflicting_and_silent_signals() {
        assert_eq!(
            keyword_signal(&MANDATORY[5], "yes but not on weekends"),
            KeywordSignal::Conflicting
        );
        assert_eq!(
            keyword_signal(&MANDATORY[1], "It's a Florida one from 2019"),
            KeywordSignal::Silent
        );
    }

    #[test]
    fn test_contraction_is_not_its_stem() {
        assert_eq!(
            keyword_signal(&MANDATORY[4], "I can't lift that much"),
            KeywordSignal::Negative
        );
    }

    #[test]
    fn test_stated_age_is_checked_against_minimum() {
        let age = &MANDATORY[0];
        assert_eq!(keyword_signal(age, "I am 19"), KeywordSignal::Negative);
        assert_eq!(keyword_signal(age, "Yes, I am 25"), KeywordSignal::Affirmative);
        assert_eq!(keyword_signal(age, "I'm 34"), KeywordSignal::Affirmative);
        assert_eq!(
            keyword_signal(age, "I'll be 21 next year"),
            KeywordSignal::Conflicting
        );
        assert_eq!(
            keyword_signal(age, "Yes, born in 1990"),
            KeywordSignal::Affirmative
        );
    }

    #[tokio::test]
    async fn test_underage_answer_fails_despite_affirmative_phrase() {
        let scorer = StubScorer::verdict(true);
        let calls = scorer.calls();
        let evaluator = evaluator(scorer);

        let evaluation = evaluator.evaluate(&MANDATORY[0], "I am 19").await.unwrap();
        assert_eq!(evaluation.outcome, Outcome::Fail);
        assert_eq!(evaluation.source, EvaluationSource::Keyword);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_future_age_escalates_to_scorer() {
        let scorer = StubScorer::verdict(false);
        let calls = scorer.calls();
        let evaluator = evaluator(scorer);

        let evaluation = evaluator
            .evaluate(&MANDATORY[0], "I'll be 21 next year")
            .await
            .unwrap();
        assert_eq!(evaluation.outcome, Outcome::Fail);
        assert_eq!(evaluation.source, EvaluationSource::Model);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn test_negated_concern_is_not_a_refusal() {
        assert_eq!(
            keyword_signal(&MANDATORY[3], "Not a problem"),
            KeywordSignal::Conflicting
        );
        assert_eq!(
            keyword_signal(&MANDATORY[2], "I don't have any violations"),
            KeywordSignal::Conflicting
        );
        assert_eq!(
            keyword_signal(&MANDATORY[3], "No, I won't do that"),
            KeywordSignal::Negative
        );
    }

    #[tokio::test]
    async fn test_negated_concern_is_graded_by_scorer() {
        let scorer = StubScorer::verdict(true);
        let calls = scorer.calls();
        let evaluator = evaluator(scorer);

        let evaluation = evaluator.evaluate(&MANDATORY[3], "Not a problem").await.unwrap();
        assert_eq!(evaluation.outcome, Outcome::Pass);
        assert_eq!(evaluation.source, EvaluationSource::Model);

        let evaluation = evaluator
            .evaluate(&MANDATORY[2], "I don't have any violations")
            .await
            .unwrap();
        assert_eq!(evaluation.outcome, Outcome::Pass);
        assert_eq!(evaluation.source, EvaluationSource::Model);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_ambiguous_answer_escalates_to_scorer() {
        let scorer = StubScorer::verdict(true);
        let calls = scorer.calls();
        let evaluator = evaluator(scorer);

        let evaluation = evaluator
            .evaluate(&MANDATORY[1], "It's a Florida one from 2019")
            .await
            .unwrap();
        assert_eq!(evaluation.outcome, Outcome::Pass);
        assert_eq!(evaluation.source, EvaluationSource::Model);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_mandatory_scorer_failure_keeps_keyword_only_result() {
        let evaluator = evaluator(StubScorer::failing());
        let evaluation = evaluator
            .evaluate(&MANDATORY[5], "yes but not on weekends")
            .await
            .unwrap();
        assert_eq!(evaluation.outcome, Outcome::Fail);
        assert_eq!(evaluation.source, EvaluationSource::Fallback);
    }

    #[tokio::test]
    async fn test_mandatory_scorer_timeout_falls_back() {
        let evaluator = AnswerEvaluator::new(
            Arc::new(StubScorer::slow(Duration::from_secs(5))),
            Duration::from_millis(20),
        );
        let evaluation = evaluator
            .evaluate(&MANDATORY[1], "It's a Florida one")
            .await
            .unwrap();
        assert_eq!(evaluation.source, EvaluationSource::Fallback);
        assert_eq!(evaluation.outcome, Outcome::Fail);
    }

    #[tokio::test]
    async fn test_empty_mandatory_answer_fails() {
        let evaluator = evaluator(StubScorer::verdict(true));
        let evaluation = evaluator.evaluate(&MANDATORY[0], "   ").await.unwrap();
        assert_eq!(evaluation.outcome, Outcome::Fail);
        assert_eq!(evaluation.points, Points::ZERO);
    }

    #[tokio::test]
    async fn test_credential_error_propagates() {
        let evaluator = evaluator(StubScorer::unauthorized());
        let result = evaluator.evaluate(&PREFERRED[0], "I drove for UPS").await;
        assert!(matches!(result, Err(LlmError::Unauthorized { .. })));

        let result = evaluator.evaluate(&MANDATORY[1], "It's from Ohio").await;
        assert!(matches!(result, Err(LlmError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_preferred_depth_maps_to_outcome_and_points() {
        let cases = [
            (0.9, Outcome::Pass, 133),
            (0.7, Outcome::Pass, 133),
            (0.5, Outcome::Partial, 80),
            (0.3, Outcome::Partial, 80),
            (0.1, Outcome::Fail, 0),
        ];
        for (depth, outcome, tenths) in cases {
            let evaluator = evaluator(StubScorer::depth(depth));
            let evaluation = evaluator
                .evaluate(&PREFERRED[0], "Two years with a courier")
                .await
                .unwrap();
            assert_eq!(evaluation.outcome, outcome, "depth {depth}");
            assert_eq!(evaluation.points, Points::from_tenths(tenths), "depth {depth}");
            assert_eq!(evaluation.source, EvaluationSource::Model);
        }
    }

    #[tokio::test]
    async fn test_preferred_scoring_is_deterministic_for_same_input() {
        let evaluator = evaluator(StubScorer::depth(0.55));
        let answer = "I delivered for Amazon Flex | Around 120 stops a day";
        let first = evaluator.evaluate(&PREFERRED[0], answer).await.unwrap();
        let second = evaluator.evaluate(&PREFERRED[0], answer).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_preferred_scorer_failure_gives_partial_credit() {
        let evaluator = evaluator(StubScorer::failing());
        let evaluation = evaluator
            .evaluate(&PREFERRED[2], "I like working alone")
            .await
            .unwrap();
        assert_eq!(evaluation.outcome, Outcome::Partial);
        assert_eq!(evaluation.points, Points::from_tenths(80));
        assert_eq!(evaluation.source, EvaluationSource::Fallback);
    }

    #[tokio::test]
    async fn test_empty_preferred_answer_is_zero_depth() {
        let evaluator = evaluator(StubScorer::depth(1.0));
        let evaluation = evaluator.evaluate(&PREFERRED[1], "").await.unwrap();
        assert_eq!(evaluation.outcome, Outcome::Fail);
        assert_eq!(evaluation.points, Points::ZERO);
    }

    #[test]
    fn test_parse_verdict() {
        assert!(parse_verdict("PASS").unwrap().passed);
        assert!(parse_verdict("pass.").unwrap().passed);
        assert!(!parse_verdict("FAIL - no license").unwrap().passed);
        assert!(matches!(
            parse_verdict("Maybe"),
            Err(LlmError::Unrecognized(_))
        ));
    }

    #[test]
    fn test_parse_depth_accepts_json_or_number_and_clamps() {
        let rating = parse_depth(r#"{"depth": 0.8, "rationale": "specific"}"#).unwrap();
        assert!((rating.depth - 0.8).abs() < f64::EPSILON);
        assert_eq!(rating.rationale, "specific");

        let rating = parse_depth("0.4").unwrap();
        assert!((rating.depth - 0.4).abs() < f64::EPSILON);

        let rating = parse_depth(r#"{"depth": 1.7}"#).unwrap();
        assert!((rating.depth - 1.0).abs() < f64::EPSILON);

        assert!(parse_depth("quite good").is_err());
    }

    #[tokio::test]
    async fn test_llm_scorer_reads_completion_replies() {
        let scorer = LlmAnswerScorer::new(Arc::new(ScriptedCompletion::replying("FAIL")));
        let verdict = scorer.classify(&MANDATORY[0], "I'll be 21 next year").await.unwrap();
        assert!(!verdict.passed);

        let scorer = LlmAnswerScorer::new(Arc::new(ScriptedCompletion::replying(
            "```json\n{\"depth\": 0.75, \"rationale\": \"detailed\"}\n```",
        )));
        let rating = scorer.rate_depth(&PREFERRED[0], "Five years at FedEx").await.unwrap();
        assert!((rating.depth - 0.75).abs() < f64::EPSILON);
    }
}
