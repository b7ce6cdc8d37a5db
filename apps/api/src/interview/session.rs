//! Per-session interview state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error};
use uuid::Uuid;

use crate::interview::phase::{Phase, PhaseKind};
use crate::interview::qualifications::{Category, Points, MANDATORY, PREFERRED};
use crate::interview::scoring::{Decision, ScoringTracker};
use crate::llm_client::ChatMessage;

/// Everything one candidate's interview depends on. Only the orchestrator
/// mutates it, and it does so on an owned copy that replaces the stored one
/// once a turn completes.
#[derive(Debug, Clone, Serialize)]
pub struct InterviewState {
    pub id: Uuid,
    pub phase: Phase,
    pub disqualified: bool,
    pub tracker: ScoringTracker,
    pub transcript: Vec<ChatMessage>,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Progress {
    pub phase: PhaseKind,
    pub answered: usize,
    pub total: usize,
    pub mandatory_done: usize,
    pub mandatory_total: usize,
    pub preferred_done: usize,
    pub preferred_total: usize,
    pub is_disqualified: bool,
    pub score: Points,
}

impl Default for InterviewState {
    fn default() -> Self {
        Self::new()
    }
}

impl InterviewState {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: Phase::Greeting,
            disqualified: false,
            tracker: ScoringTracker::new(),
            transcript: Vec::new(),
            started_at: Utc::now(),
        }
    }

    pub fn decision(&self) -> Decision {
        self.tracker.decision(self.disqualified)
    }

    /// Moves to `next`. Illegal transitions are a programming error: they are
    /// logged and trip a debug assertion but do not crash a release build.
    pub(crate) fn enter(&mut self, next: Phase) {
        let from = self.phase.kind();
        let to = next.kind();
        if !from.can_transition_to(&to) {
            error!("Illegal phase transition {:?} -> {:?} in session {}", from, to, self.id);
            debug_assert!(false, "illegal phase transition {from:?} -> {to:?}");
        }
        debug!("Session {}: {:?} -> {:?}", self.id, self.phase, next);
        self.phase = next;
    }

    /// The last `n` transcript messages, oldest first.
    pub fn recent_context(&self, n: usize) -> &[ChatMessage] {
        let start = self.transcript.len().saturating_sub(n);
        &self.transcript[start..]
    }

    pub fn progress(&self) -> Progress {
        let mandatory_done = self.tracker.count(Category::Mandatory);
        let preferred_done = self.tracker.count(Category::Preferred);
        let total = MANDATORY.len() + PREFERRED.len();
        let phase = self.phase.kind();

        let answered = if phase.is_concluded() {
            total
        } else {
            mandatory_done + preferred_done
        };

        Progress {
            phase,
            answered,
            total,
            mandatory_done,
            mandatory_total: MANDATORY.len(),
            preferred_done,
            preferred_total: PREFERRED.len(),
            is_disqualified: self.disqualified,
            score: self.tracker.grand_total(),
        }
    }
}
