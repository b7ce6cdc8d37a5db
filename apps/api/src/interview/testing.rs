//! Test doubles for the completion and grading seams.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::interview::evaluator::{AnswerScorer, DepthRating, Verdict};
use crate::interview::qualifications::Qualification;
use crate::llm_client::{ChatMessage, CompletionOptions, CompletionService, LlmError};

enum Reply {
    Text(String),
    Failure,
    Unauthorized,
}

/// Completion service that answers every request the same way and keeps the
/// prompts it was sent.
pub struct ScriptedCompletion {
    reply: Reply,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    pub fn replying(text: &str) -> Self {
        Self::with(Reply::Text(text.to_string()))
    }

    pub fn failing() -> Self {
        Self::with(Reply::Failure)
    }

    pub fn unauthorized() -> Self {
        Self::with(Reply::Unauthorized)
    }

    fn with(reply: Reply) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }
}

#[async_trait]
impl CompletionService for ScriptedCompletion {
    async fn complete(
        &self,
        _system: &str,
        messages: &[ChatMessage],
        _options: CompletionOptions,
    ) -> Result<String, LlmError> {
        if let (Ok(mut prompts), Some(last)) = (self.prompts.lock(), messages.last()) {
            prompts.push(last.content.clone());
        }
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Failure => Err(LlmError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            }),
            Reply::Unauthorized => Err(LlmError::Unauthorized { status: 401 }),
        }
    }
}

enum Grade {
    Verdict(bool),
    Depth(f64),
    Failure,
    Unauthorized,
    Slow(Duration),
}

/// Scorer with a fixed grade and a call counter.
pub struct StubScorer {
    grade: Grade,
    calls: Arc<AtomicUsize>,
}

impl StubScorer {
    pub fn verdict(passed: bool) -> Self {
        Self::with(Grade::Verdict(passed))
    }

    pub fn depth(depth: f64) -> Self {
        Self::with(Grade::Depth(depth))
    }

    pub fn failing() -> Self {
        Self::with(Grade::Failure)
    }

    pub fn unauthorized() -> Self {
        Self::with(Grade::Unauthorized)
    }

    pub fn slow(delay: Duration) -> Self {
        Self::with(Grade::Slow(delay))
    }

    fn with(grade: Grade) -> Self {
        Self {
            grade,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    async fn respond(&self) -> Result<(bool, f64), LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.grade {
            Grade::Verdict(passed) => Ok((passed, if passed { 1.0 } else { 0.0 })),
            Grade::Depth(depth) => Ok((depth >= 0.5, depth)),
            Grade::Failure => Err(LlmError::EmptyContent),
            Grade::Unauthorized => Err(LlmError::Unauthorized { status: 401 }),
            Grade::Slow(delay) => {
                tokio::time::sleep(delay).await;
                Ok((true, 1.0))
            }
        }
    }
}

#[async_trait]
impl AnswerScorer for StubScorer {
    async fn classify(&self, _q: &Qualification, _answer: &str) -> Result<Verdict, LlmError> {
        let (passed, _) = self.respond().await?;
        Ok(Verdict {
            passed,
            rationale: "stub verdict".to_string(),
        })
    }

    async fn rate_depth(&self, _q: &Qualification, _answer: &str) -> Result<DepthRating, LlmError> {
        let (_, depth) = self.respond().await?;
        Ok(DepthRating {
            depth,
            rationale: "stub rating".to_string(),
        })
    }
}
