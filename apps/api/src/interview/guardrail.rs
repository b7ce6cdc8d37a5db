//! Guardrail Filter: screens each candidate message before the orchestrator sees it.
//!
//! Injection attempts are caught in every phase. Off-topic drift only matters in
//! JobQA: while questions are being asked, the evaluator judges relevance itself.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::interview::phase::PhaseKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    OnTopic,
    OffTopic,
    InjectionAttempt,
}

/// Instruction-override phrasing and requests for prompt or scoring internals.
static INJECTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)\bignore\s+(?:all\s+)?(?:(?:the|your|my|previous|prior|above|earlier)\s+)*(?:instructions?|prompts?|rules)\b",
        r"(?i)\byou\s+are\s+now\s+(?:a|an|my)\b",
        r"(?i)\bpretend\s+(?:to\s+be|you\s+are)\b",
        r"(?i)\bforget\s+(?:everything|(?:all\s+)?your\s+(?:instructions|rules))\b",
        r"(?i)\bsystem\s*prompt\b",
        r"(?i)\breveal\s+(?:your|the)\s+(?:instructions|prompt|system|scoring|rubric|criteria)\b",
        r"(?i)\b(?:show|tell|give)\s+me\s+(?:your|the)\s+(?:hidden\s+)?(?:instructions|prompt|(?:scoring|evaluation)\s+(?:rubric|criteria|weights|internals))\b",
    ])
});

/// General-knowledge and chit-chat requests that are never about the job.
static OFF_TOPIC_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(?i)what\s+is\s+(?:the\s+)?(?:capital|president|weather|meaning\s+of\s+life)",
        r"(?i)tell\s+me\s+(?:a\s+joke|about\s+(?:yourself|ai|politics|sports))",
        r"(?i)write\s+(?:me\s+)?(?:a\s+)?(?:poem|story|essay|code|script|song)",
        r"(?i)help\s+me\s+with\s+(?:my\s+)?(?:homework|math|science|coding)",
        r"(?i)what\s+do\s+you\s+think\s+about\s+(?:politics|religion|war)",
        r"(?i)who\s+(?:won|is\s+winning)\s+(?:the|in)\s+",
        r"(?i)can\s+you\s+(?:search|browse|google|look\s+up)",
        r"(?i)translate\s+.+\s+to\s+",
    ])
});

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("guardrail pattern is a valid literal regex"))
        .collect()
}

/// Words that tie a JobQA question to the job, pay, schedule or the candidate's result.
const JOB_TOPIC_KEYWORDS: &[&str] = &[
    "pay", "paid", "paycheck", "payday", "salary", "wage", "wages", "hourly", "hour", "hours",
    "money", "bonus", "bonuses", "benefits", "benefit", "insurance", "health", "dental",
    "vision", "pto", "vacation", "sick", "training", "overtime", "schedule", "shift", "shifts",
    "weekend", "weekends", "start", "job", "role", "position", "work", "working", "duties",
    "responsibilities", "responsibility", "delivery", "deliveries", "deliver", "package",
    "packages", "truck", "vehicle", "van", "route", "routes", "miles", "drive", "driving",
    "driver", "license", "cdl", "location", "located", "address", "terminal", "tampa",
    "florida", "tsavo", "fedex", "company", "qualified", "qualify", "qualification",
    "qualifications", "score", "status", "result", "results", "assessment", "decision",
    "interview", "recruiter", "apply", "application", "hire", "hiring", "hired",
    "requirements", "requirement", "lift", "lifting", "uniform", "manager", "supervisor",
    "day", "days", "daily", "week", "weekly", "holiday", "holidays", "leave", "dress",
    "attire", "break", "breaks", "lunch", "customer", "customers", "equipment", "team",
    "experience", "criteria", "expectations",
];

/// Words showing the candidate is asking about their own assessment.
const ASSESSMENT_KEYWORDS: &[&str] = &[
    "qualified", "qualify", "score", "status", "result", "results", "assessment", "decision",
    "passed", "pass", "fail", "failed",
];

/// Phrases that close the JobQA phase when they make up a short message.
const FAREWELL_PHRASES: &[&str] = &[
    "no", "nope", "none", "bye", "goodbye", "exit", "done", "thank you", "thanks",
    "that's all", "nothing else", "no questions", "i'm good", "all good",
];

/// Short replies are almost always direct answers ("Yes", "Weekly?").
const MIN_LENGTH_FOR_CHECK: usize = 15;
/// A farewell must be a short message, not a sentence that happens to say "thanks".
const MAX_FAREWELL_WORDS: usize = 5;

/// Classifies a candidate message for the given phase.
pub fn classify(message: &str, phase: PhaseKind) -> Classification {
    if is_injection(message) {
        return Classification::InjectionAttempt;
    }

    match phase {
        PhaseKind::JobQa if !is_job_related(message) => Classification::OffTopic,
        _ => Classification::OnTopic,
    }
}

pub fn is_injection(message: &str) -> bool {
    INJECTION_PATTERNS.iter().any(|re| re.is_match(message))
}

/// True when a JobQA message is about the job, the pay, the schedule, the
/// candidate's own result, or is a farewell.
pub fn is_job_related(message: &str) -> bool {
    let message = message.trim();

    if message.chars().count() < MIN_LENGTH_FOR_CHECK {
        return true;
    }

    if OFF_TOPIC_PATTERNS.iter().any(|re| re.is_match(message)) {
        return false;
    }

    if is_farewell(message) {
        return true;
    }

    tokenize(message)
        .iter()
        .any(|word| JOB_TOPIC_KEYWORDS.contains(&word.as_str()))
}

/// True for a short closing message such as "No, thanks" or "Bye!".
pub fn is_farewell(message: &str) -> bool {
    let words = tokenize(message);
    if words.is_empty() || words.len() > MAX_FAREWELL_WORDS {
        return false;
    }
    FAREWELL_PHRASES
        .iter()
        .any(|phrase| contains_phrase(&words, &tokenize(phrase)))
}

/// True when the candidate asks about their own qualification outcome.
pub fn asks_about_assessment(message: &str) -> bool {
    tokenize(message)
        .iter()
        .any(|word| ASSESSMENT_KEYWORDS.contains(&word.as_str()))
}

/// Lowercased words, apostrophes kept so "can't" never reads as "can".
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace('\u{2019}', "'")
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn contains_phrase(words: &[String], phrase: &[String]) -> bool {
    !phrase.is_empty() && words.windows(phrase.len()).any(|window| window == phrase)
}
