//! Scoring Tracker: accumulates answer outcomes into the 60 + 40 point score.
//!
//! Every total is derived from the recorded `AnswerRecord`s, never stored on
//! the side, so `grand_total()` is always the sum of what was awarded.

use std::fmt::Write as _;

use serde::Serialize;
use thiserror::Error;

use crate::interview::evaluator::EvaluationSource;
use crate::interview::qualifications::{
    self, Category, Points, Qualification, MANDATORY, MANDATORY_POINTS, PREFERRED,
    PREFERRED_POINTS, TOTAL_POINTS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Pass,
    Partial,
    Fail,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Pass => "Pass",
            Outcome::Partial => "Partial",
            Outcome::Fail => "Fail",
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Outcome::Pass => "[PASS]",
            Outcome::Partial => "[PARTIAL]",
            Outcome::Fail => "[FAIL]",
        }
    }
}

const PENDING_MARKER: &str = "[ -- ]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
    #[serde(rename = "Qualified")]
    Qualified,
    #[serde(rename = "Not Qualified")]
    NotQualified,
}

impl Decision {
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Qualified => "Qualified",
            Decision::NotQualified => "Not Qualified",
        }
    }
}

/// The evaluated answer(s) for one qualification.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerRecord {
    pub qualification_id: &'static str,
    pub category: Category,
    /// Verbatim candidate text: the primary answer, then the follow-up answer if any.
    pub answers: Vec<String>,
    pub outcome: Outcome,
    pub points: Points,
    pub rationale: String,
    pub source: EvaluationSource,
}

#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("Qualification '{0}' already has a recorded answer")]
    AlreadyRecorded(&'static str),

    #[error("Unknown qualification '{0}'")]
    UnknownQualification(&'static str),

    #[error("Awarded {awarded} points for '{id}' exceeds its weight of {weight}")]
    ExceedsWeight {
        id: &'static str,
        awarded: Points,
        weight: Points,
    },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScoringTracker {
    records: Vec<AnswerRecord>,
}

/// Per-qualification line of the structured breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct BreakdownItem {
    pub id: &'static str,
    pub label: &'static str,
    pub category: Category,
    /// `None` while the qualification has not been assessed.
    pub outcome: Option<Outcome>,
    pub points: Points,
    pub weight: Points,
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Breakdown {
    pub mandatory: Vec<BreakdownItem>,
    pub preferred: Vec<BreakdownItem>,
    pub mandatory_score: Points,
    pub preferred_score: Points,
    pub total_score: Points,
    pub decision: Decision,
}

impl ScoringTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record. Each qualification is recorded at most once and never
    /// above its weight.
    pub fn record(&mut self, record: AnswerRecord) -> Result<(), ScoringError> {
        let qualification = qualifications::find(record.qualification_id)
            .ok_or(ScoringError::UnknownQualification(record.qualification_id))?;

        if self.get(record.qualification_id).is_some() {
            return Err(ScoringError::AlreadyRecorded(record.qualification_id));
        }

        if record.points > qualification.weight {
            return Err(ScoringError::ExceedsWeight {
                id: qualification.id,
                awarded: record.points,
                weight: qualification.weight,
            });
        }

        self.records.push(record);
        Ok(())
    }

    pub fn records(&self) -> &[AnswerRecord] {
        &self.records
    }

    pub fn get(&self, qualification_id: &str) -> Option<&AnswerRecord> {
        self.records
            .iter()
            .find(|r| r.qualification_id == qualification_id)
    }

    pub fn count(&self, category: Category) -> usize {
        self.records.iter().filter(|r| r.category == category).count()
    }

    fn total_for(&self, category: Category) -> Points {
        self.records
            .iter()
            .filter(|r| r.category == category)
            .map(|r| r.points)
            .sum()
    }

    pub fn mandatory_total(&self) -> Points {
        self.total_for(Category::Mandatory)
    }

    pub fn preferred_total(&self) -> Points {
        self.total_for(Category::Preferred)
    }

    pub fn grand_total(&self) -> Points {
        self.mandatory_total() + self.preferred_total()
    }

    pub fn has_mandatory_fail(&self) -> bool {
        self.records
            .iter()
            .any(|r| r.category == Category::Mandatory && r.outcome == Outcome::Fail)
    }

    /// Qualified iff not disqualified and every mandatory qualification passed.
    pub fn decision(&self, disqualified: bool) -> Decision {
        if disqualified || self.has_mandatory_fail() || self.mandatory_total() != MANDATORY_POINTS
        {
            Decision::NotQualified
        } else {
            Decision::Qualified
        }
    }

    pub fn breakdown(&self, disqualified: bool) -> Breakdown {
        Breakdown {
            mandatory: MANDATORY.iter().map(|q| self.item(q)).collect(),
            preferred: PREFERRED.iter().map(|q| self.item(q)).collect(),
            mandatory_score: self.mandatory_total(),
            preferred_score: self.preferred_total(),
            total_score: self.grand_total(),
            decision: self.decision(disqualified),
        }
    }

    fn item(&self, q: &'static Qualification) -> BreakdownItem {
        let record = self.get(q.id);
        BreakdownItem {
            id: q.id,
            label: q.label,
            category: q.category,
            outcome: record.map(|r| r.outcome),
            points: record.map(|r| r.points).unwrap_or(Points::ZERO),
            weight: q.weight,
            answers: record.map(|r| r.answers.clone()).unwrap_or_default(),
        }
    }

    /// Recruiter report: every qualification with marker, points and verbatim answers.
    /// Output depends only on the recorded state.
    pub fn summary(&self, disqualified: bool) -> String {
        let breakdown = self.breakdown(disqualified);
        let rule = "=".repeat(50);
        let mut out = String::new();

        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "  CANDIDATE ASSESSMENT SUMMARY");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out);

        let _ = writeln!(out, "MANDATORY QUALIFICATIONS:");
        write_items(&mut out, &breakdown.mandatory, true);
        let _ = writeln!(
            out,
            "  Mandatory Score: {}/{}",
            breakdown.mandatory_score, MANDATORY_POINTS
        );
        let _ = writeln!(out);

        let _ = writeln!(out, "PREFERRED QUALIFICATIONS:");
        write_items(&mut out, &breakdown.preferred, true);
        let _ = writeln!(
            out,
            "  Preferred Score: {}/{}",
            breakdown.preferred_score, PREFERRED_POINTS
        );
        let _ = writeln!(out);

        let _ = writeln!(out, "TOTAL SCORE: {}/{}", breakdown.total_score, TOTAL_POINTS);
        let _ = writeln!(out, "DECISION: {}", breakdown.decision.label());
        let _ = write!(out, "{rule}");

        out
    }

    /// Candidate-facing result card: markers and points, no verbatim answers.
    pub fn result_card(&self, disqualified: bool) -> String {
        let breakdown = self.breakdown(disqualified);
        let mut out = String::new();

        let _ = writeln!(out, "**Decision: {}**", breakdown.decision.label());
        let _ = writeln!(out, "**Match Score: {}/{}**", breakdown.total_score, TOTAL_POINTS);
        let _ = writeln!(out);
        let _ = writeln!(out, "Mandatory Qualifications:");
        write_items(&mut out, &breakdown.mandatory, false);
        let _ = writeln!(
            out,
            "Mandatory Score: {}/{}",
            breakdown.mandatory_score, MANDATORY_POINTS
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "Preferred Qualifications:");
        write_items(&mut out, &breakdown.preferred, false);
        let _ = write!(
            out,
            "Preferred Score: {}/{}",
            breakdown.preferred_score, PREFERRED_POINTS
        );

        out
    }
}

fn write_items(out: &mut String, items: &[BreakdownItem], with_answers: bool) {
    for item in items {
        match item.outcome {
            Some(outcome) => {
                let _ = writeln!(
                    out,
                    "  {} {}: {} ({} pts)",
                    outcome.marker(),
                    item.label,
                    outcome.label(),
                    item.points
                );
            }
            None => {
                let _ = writeln!(out, "  {PENDING_MARKER} {}: Not assessed", item.label);
            }
        }
        if with_answers {
            for answer in &item.answers {
                let _ = writeln!(out, "     > \"{answer}\"");
            }
        }
    }
}
