//! Conversation Orchestrator: the interview state machine.
//!
//! Each call takes the session state by value and hands back the next state with
//! the reply. Nothing else is kept between turns, so a failed turn leaves the
//! caller's copy untouched.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::interview::evaluator::AnswerEvaluator;
use crate::interview::guardrail::{self, Classification};
use crate::interview::job::JOB;
use crate::interview::phase::Phase;
use crate::interview::prompts::{
    build_answer_prompt, build_decision_prompt, build_follow_up_prompt, build_job_qa_prompt,
    build_system_prompt, DISQUALIFY_PROMPT, INTERVIEW_COMPLETE_PROMPT, MANDATORY_ACK_PROMPT,
    MANDATORY_COMPLETE_PROMPT, PREFERRED_ACK_PROMPT,
};
use crate::interview::qualifications::{MANDATORY, PREFERRED, TOTAL_POINTS};
use crate::interview::scoring::{Breakdown, Decision, Outcome, ScoringError};
use crate::interview::session::InterviewState;
use crate::llm_client::prompts::INSTRUCTION_PREFIX;
use crate::llm_client::{ChatMessage, CompletionOptions, CompletionService, LlmError};

/// Transcript messages sent along with every generated-text request.
const CONTEXT_TURNS: usize = 8;

pub const INJECTION_REFUSAL: &str = "I'm sorry, but I can't help with that. I'm here to \
    conduct your interview for this position, and I can't share details about how I work \
    or how answers are assessed.";

pub const GUARDRAIL_REDIRECT: &str = "I can only help with questions about this position, \
    such as the pay, the schedule, the duties or your interview result.";

pub const CLOSING_MESSAGE: &str = "This interview has ended. Thank you for your interest in \
    the role! To start over, please open a new interview session.";

pub const FAREWELL: &str = "Thank you for your time today! If there are next steps, a \
    recruiter will be in touch. Have a great day!";

const MANDATORY_ACK_FALLBACK: &str = "Thank you.";
const MANDATORY_COMPLETE_FALLBACK: &str = "Great, you meet all of the essential requirements! \
    Now I'd like to learn a bit more about your experience and skills.";
const DISQUALIFY_FALLBACK: &str = "Thank you for your honesty. Unfortunately this is a \
    mandatory requirement for the role, so I'll share the final assessment now.";
const FOLLOW_UP_FALLBACK: &str = "Could you tell me a little more about that?";
const PREFERRED_ACK_FALLBACK: &str = "Thank you for sharing that.";
const INTERVIEW_COMPLETE_FALLBACK: &str = "Thank you, that completes the interview questions. \
    Here is your assessment.";

#[derive(Debug, Error)]
pub enum InterviewError {
    /// Only credential failures reach here; every other completion failure
    /// falls back inside the turn.
    #[error("Completion service error: {0}")]
    Llm(#[from] LlmError),

    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),
}

/// Result of one processed message.
#[derive(Debug, Clone)]
pub struct Turn {
    pub state: InterviewState,
    pub reply: String,
    pub classification: Classification,
}

impl Turn {
    fn on_topic(state: InterviewState, reply: String) -> Self {
        Self {
            state,
            reply,
            classification: Classification::OnTopic,
        }
    }
}

pub struct Interviewer {
    llm: Arc<dyn CompletionService>,
    evaluator: Arc<AnswerEvaluator>,
    system_prompt: String,
}

impl Interviewer {
    pub fn new(llm: Arc<dyn CompletionService>, evaluator: Arc<AnswerEvaluator>) -> Self {
        Self {
            llm,
            evaluator,
            system_prompt: build_system_prompt(&JOB),
        }
    }

    /// Emits the fixed welcome and the first mandatory question.
    pub fn greet(&self, mut state: InterviewState) -> Turn {
        if state.phase != Phase::Greeting {
            let reply = reminder(&state.phase).trim_start().to_string();
            return Turn::on_topic(state, reply);
        }

        let reply = format!("{}\n\n{}", welcome(), MANDATORY[0].question);
        state.enter(Phase::Mandatory { index: 0 });
        state.transcript.push(ChatMessage::assistant(reply.as_str()));
        Turn::on_topic(state, reply)
    }

    /// Processes one candidate message.
    pub async fn respond(
        &self,
        mut state: InterviewState,
        message: &str,
    ) -> Result<Turn, InterviewError> {
        let kind = state.phase.kind();
        if kind.is_terminal() {
            return Ok(Turn::on_topic(state, CLOSING_MESSAGE.to_string()));
        }

        let classification = guardrail::classify(message, kind);
        match classification {
            Classification::InjectionAttempt => {
                warn!("Injection attempt in session {} during {:?}", state.id, kind);
                let reply = format!("{INJECTION_REFUSAL}{}", reminder(&state.phase));
                return Ok(Turn {
                    state,
                    reply,
                    classification,
                });
            }
            Classification::OffTopic => {
                info!("Off-topic message in session {} during {:?}", state.id, kind);
                let reply = format!("{GUARDRAIL_REDIRECT}{}", reminder(&state.phase));
                return Ok(Turn {
                    state,
                    reply,
                    classification,
                });
            }
            Classification::OnTopic => {}
        }

        state.transcript.push(ChatMessage::user(message));

        let reply = match state.phase.clone() {
            Phase::Greeting => {
                let reply = format!("{}\n\n{}", welcome(), MANDATORY[0].question);
                state.enter(Phase::Mandatory { index: 0 });
                reply
            }
            Phase::Mandatory { index } => self.answer_mandatory(&mut state, index, message).await?,
            Phase::Preferred { index } => self.answer_preferred(&mut state, index, message).await?,
            Phase::FollowUp {
                index,
                primary_answer,
            } => {
                self.answer_follow_up(&mut state, index, &primary_answer, message)
                    .await?
            }
            Phase::Decision => self.conclude(&mut state).await?,
            Phase::JobQa => self.answer_job_question(&mut state, message).await?,
            Phase::Ended => CLOSING_MESSAGE.to_string(),
        };

        state.transcript.push(ChatMessage::assistant(reply.as_str()));
        Ok(Turn::on_topic(state, reply))
    }

    /// Ends the question phases early and delivers the decision from whatever
    /// has been recorded so far. Already concluded sessions get their result
    /// card again.
    pub async fn force_decision(&self, mut state: InterviewState) -> Result<Turn, InterviewError> {
        if state.phase.kind().is_concluded() {
            let reply = state.tracker.result_card(state.disqualified);
            return Ok(Turn::on_topic(state, reply));
        }

        if let Some(q) = state.phase.open_qualification() {
            info!(
                "Session {}: '{}' left unanswered on forced decision",
                state.id, q.id
            );
        }

        info!("Session {}: decision forced during {:?}", state.id, state.phase.kind());
        let reply = self.conclude(&mut state).await?;
        state.transcript.push(ChatMessage::assistant(reply.as_str()));
        Ok(Turn::on_topic(state, reply))
    }

    async fn answer_mandatory(
        &self,
        state: &mut InterviewState,
        index: usize,
        answer: &str,
    ) -> Result<String, InterviewError> {
        let Some(q) = MANDATORY.get(index) else {
            return self.conclude(state).await;
        };

        let evaluation = self.evaluator.evaluate(q, answer).await?;
        let outcome = evaluation.outcome;
        info!(
            "Session {}: '{}' -> {:?} via {:?}",
            state.id, q.id, outcome, evaluation.source
        );
        state
            .tracker
            .record(evaluation.into_record(q, vec![answer.to_string()]))?;

        if outcome == Outcome::Fail {
            state.disqualified = true;
            info!("Session {} disqualified on '{}'", state.id, q.id);
            let ack = self
                .generate(
                    state,
                    build_answer_prompt(DISQUALIFY_PROMPT, q, answer),
                    DISQUALIFY_FALLBACK,
                )
                .await?;
            let conclusion = self.conclude(state).await?;
            return Ok(format!("{ack}\n\n{conclusion}"));
        }

        match MANDATORY.get(index + 1) {
            Some(next) => {
                let ack = self
                    .generate(
                        state,
                        build_answer_prompt(MANDATORY_ACK_PROMPT, q, answer),
                        MANDATORY_ACK_FALLBACK,
                    )
                    .await?;
                state.enter(Phase::Mandatory { index: index + 1 });
                Ok(format!("{ack}\n\n{}", next.question))
            }
            None => {
                let ack = self
                    .generate(
                        state,
                        build_answer_prompt(MANDATORY_COMPLETE_PROMPT, q, answer),
                        MANDATORY_COMPLETE_FALLBACK,
                    )
                    .await?;
                state.enter(Phase::Preferred { index: 0 });
                Ok(format!("{ack}\n\n{}", PREFERRED[0].question))
            }
        }
    }

    async fn answer_preferred(
        &self,
        state: &mut InterviewState,
        index: usize,
        answer: &str,
    ) -> Result<String, InterviewError> {
        let Some(q) = PREFERRED.get(index) else {
            return self.conclude(state).await;
        };

        let fallback = q.follow_up_prompts.first().copied().unwrap_or(FOLLOW_UP_FALLBACK);
        let question = self
            .generate(state, build_follow_up_prompt(q, answer), fallback)
            .await?;

        state.enter(Phase::FollowUp {
            index,
            primary_answer: answer.to_string(),
        });
        Ok(question)
    }

    async fn answer_follow_up(
        &self,
        state: &mut InterviewState,
        index: usize,
        primary_answer: &str,
        answer: &str,
    ) -> Result<String, InterviewError> {
        let Some(q) = PREFERRED.get(index) else {
            return self.conclude(state).await;
        };

        let answers = vec![primary_answer.to_string(), answer.to_string()];
        let merged = merge_answers(&answers);

        let evaluation = self.evaluator.evaluate(q, &merged).await?;
        info!(
            "Session {}: '{}' -> {:?} via {:?}",
            state.id, q.id, evaluation.outcome, evaluation.source
        );
        state.tracker.record(evaluation.into_record(q, answers))?;

        match PREFERRED.get(index + 1) {
            Some(next) => {
                let ack = self
                    .generate(
                        state,
                        build_answer_prompt(PREFERRED_ACK_PROMPT, q, &merged),
                        PREFERRED_ACK_FALLBACK,
                    )
                    .await?;
                state.enter(Phase::Preferred { index: index + 1 });
                Ok(format!("{ack}\n\n{}", next.question))
            }
            None => {
                let ack = self
                    .generate(
                        state,
                        build_answer_prompt(INTERVIEW_COMPLETE_PROMPT, q, &merged),
                        INTERVIEW_COMPLETE_FALLBACK,
                    )
                    .await?;
                let conclusion = self.conclude(state).await?;
                Ok(format!("{ack}\n\n{conclusion}"))
            }
        }
    }

    /// Decision phase: result card plus narrative, then straight on to JobQA.
    async fn conclude(&self, state: &mut InterviewState) -> Result<String, InterviewError> {
        state.enter(Phase::Decision);

        let breakdown = state.tracker.breakdown(state.disqualified);
        let card = state.tracker.result_card(state.disqualified);
        let prompt = build_decision_prompt(
            &decision_context(&breakdown),
            &breakdown.total_score.to_string(),
            breakdown.decision.label(),
        );
        let narrative = self
            .generate(state, prompt, fallback_narrative(breakdown.decision))
            .await?;

        info!(
            "Session {} concluded: {} ({}/{})",
            state.id,
            breakdown.decision.label(),
            breakdown.total_score,
            TOTAL_POINTS
        );
        state.enter(Phase::JobQa);
        Ok(format!("{card}\n\n{narrative}"))
    }

    async fn answer_job_question(
        &self,
        state: &mut InterviewState,
        question: &str,
    ) -> Result<String, InterviewError> {
        if guardrail::is_farewell(question) {
            state.enter(Phase::Ended);
            info!("Session {} ended by candidate", state.id);
            return Ok(FAREWELL.to_string());
        }

        let wants_assessment = guardrail::asks_about_assessment(question);
        let assessment = if wants_assessment {
            format!(
                "{} with a match score of {}/{}",
                state.decision().label(),
                state.tracker.grand_total(),
                TOTAL_POINTS
            )
        } else {
            "Not requested".to_string()
        };

        let fallback = if wants_assessment {
            format!(
                "Your assessment result is **{assessment}**.\n\n\
                 Is there anything else you'd like to know about the role?"
            )
        } else {
            format!(
                "{}\n\nIs there anything else you'd like to know about the role?",
                JOB.fact_sheet()
            )
        };

        Ok(self
            .generate(
                state,
                build_job_qa_prompt(&JOB, &assessment, question),
                &fallback,
            )
            .await?)
    }

    /// Asks the completion service for candidate-facing text. Failures other
    /// than rejected credentials yield `fallback`.
    async fn generate(
        &self,
        state: &InterviewState,
        instruction: String,
        fallback: &str,
    ) -> Result<String, LlmError> {
        let mut messages = state.recent_context(CONTEXT_TURNS).to_vec();
        messages.push(ChatMessage::user(format!("{INSTRUCTION_PREFIX}{instruction}")));

        match self
            .llm
            .complete(&self.system_prompt, &messages, CompletionOptions::CONVERSATIONAL)
            .await
        {
            Ok(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
            Ok(_) => {
                warn!("Empty completion in session {}; using fixed text", state.id);
                Ok(fallback.to_string())
            }
            Err(e) if e.is_credential_error() => {
                error!("Completion credential rejected in session {}: {e}", state.id);
                Err(e)
            }
            Err(e) => {
                warn!("Completion failed in session {} ({e}); using fixed text", state.id);
                Ok(fallback.to_string())
            }
        }
    }
}

fn welcome() -> String {
    format!(
        "Hi, and welcome! I'm the hiring assistant for {company}, and I'll be conducting \
         your screening interview for the **{role}** position in {location}. I'll start with \
         a few quick eligibility questions, then ask about your experience. Afterwards you \
         can ask me anything about the role.",
        company = JOB.company,
        role = JOB.role,
        location = JOB.location,
    )
}

/// What to append to a guardrail response so the candidate knows how to continue.
fn reminder(phase: &Phase) -> String {
    match phase {
        Phase::Mandatory { .. } => phase
            .open_qualification()
            .map(|q| format!("\n\nTo continue, please answer: {}", q.question))
            .unwrap_or_default(),
        Phase::Preferred { .. } | Phase::FollowUp { .. } => {
            "\n\nPlease answer the previous question so we can continue.".to_string()
        }
        Phase::JobQa => "\n\nIs there anything about the role you'd like to know?".to_string(),
        Phase::Greeting | Phase::Decision | Phase::Ended => String::new(),
    }
}

/// Joins the non-blank answers given for one preferred qualification.
fn merge_answers(answers: &[String]) -> String {
    answers
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Outcome per qualification, without points or verbatim answers.
fn decision_context(breakdown: &Breakdown) -> String {
    breakdown
        .mandatory
        .iter()
        .chain(&breakdown.preferred)
        .map(|item| {
            let outcome = item.outcome.map(|o| o.label()).unwrap_or("Not assessed");
            format!("- {} ({:?}): {}", item.label, item.category, outcome)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn fallback_narrative(decision: Decision) -> &'static str {
    match decision {
        Decision::Qualified => {
            "Thank you for your time today! You meet all of the mandatory requirements for \
             this role, so you are **Qualified**. A recruiter will reach out to schedule an \
             in-person meeting.\n\nDo you have any questions about the role?"
        }
        Decision::NotQualified => {
            "Thank you for your time today. Unfortunately you do not meet all of the \
             mandatory requirements for this role, so you are **Not Qualified** at this time. \
             We encourage you to apply for other roles that may be a better fit.\n\n\
             Do you have any questions about the role?"
        }
    }
}
