//! Interview phases.
//!
//! `Phase` is the tagged state the orchestrator matches on; it carries the data a
//! phase needs (which question is open, the pending primary answer during a
//! follow-up). `PhaseKind` is the data-free tag used for transition checks,
//! guardrail decisions and API responses.

use serde::{Deserialize, Serialize};

use crate::interview::qualifications::{Qualification, MANDATORY, PREFERRED};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Greeting,
    /// Waiting for the answer to `MANDATORY[index]`.
    Mandatory { index: usize },
    /// Waiting for the primary answer to `PREFERRED[index]`.
    Preferred { index: usize },
    /// Waiting for the follow-up answer to `PREFERRED[index]`.
    FollowUp { index: usize, primary_answer: String },
    Decision,
    JobQa,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Greeting,
    Mandatory,
    Preferred,
    FollowUp,
    Decision,
    JobQa,
    Ended,
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Greeting
    }
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Greeting => PhaseKind::Greeting,
            Phase::Mandatory { .. } => PhaseKind::Mandatory,
            Phase::Preferred { .. } => PhaseKind::Preferred,
            Phase::FollowUp { .. } => PhaseKind::FollowUp,
            Phase::Decision => PhaseKind::Decision,
            Phase::JobQa => PhaseKind::JobQa,
            Phase::Ended => PhaseKind::Ended,
        }
    }

    /// The qualification whose answer this phase is waiting for, if any.
    pub fn open_qualification(&self) -> Option<&'static Qualification> {
        match self {
            Phase::Mandatory { index } => MANDATORY.get(*index),
            Phase::Preferred { index } | Phase::FollowUp { index, .. } => PREFERRED.get(*index),
            _ => None,
        }
    }

    /// Button labels the chat surface may offer for the open question.
    pub fn quick_options(&self) -> &'static [&'static str] {
        match self {
            Phase::Mandatory { .. } => self
                .open_qualification()
                .map(|q| q.quick_options)
                .unwrap_or(&[]),
            _ => &[],
        }
    }
}

impl PhaseKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Greeting => "Greeting",
            Self::Mandatory => "Mandatory Qualifications",
            Self::Preferred => "Preferred Qualifications",
            Self::FollowUp => "Follow-up",
            Self::Decision => "Decision",
            Self::JobQa => "Questions About the Role",
            Self::Ended => "Ended",
        }
    }

    /// Phases reachable in one step. Staying in place is always allowed.
    /// Decision is reachable from every question phase so the interview can be
    /// concluded early; it still cannot produce Qualified without six passes.
    pub fn valid_next_phases(&self) -> &'static [PhaseKind] {
        use PhaseKind::*;
        match self {
            Greeting => &[Mandatory, Decision],
            Mandatory => &[Mandatory, Preferred, Decision],
            Preferred => &[FollowUp, Decision],
            FollowUp => &[Preferred, Decision],
            Decision => &[JobQa],
            JobQa => &[JobQa, Ended],
            Ended => &[],
        }
    }

    pub fn can_transition_to(&self, target: &Self) -> bool {
        self == target || self.valid_next_phases().contains(target)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ended)
    }

    /// True once no more qualification questions will be asked.
    pub fn is_concluded(&self) -> bool {
        matches!(self, Self::Decision | Self::JobQa | Self::Ended)
    }
}
