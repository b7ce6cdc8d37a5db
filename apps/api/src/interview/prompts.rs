// Prompt templates for the screening interview.
// Templates use {placeholder} substitution via str::replace; candidate text is
// always inserted verbatim and quoted so the model treats it as data.

use crate::interview::job::JobProfile;
use crate::interview::qualifications::Qualification;
use crate::llm_client::prompts::STAY_IN_ROLE_RULES;

pub const SYSTEM_PROMPT_TEMPLATE: &str = "\
You are an AI Hiring Agent for {company}, interviewing candidates for the role of **{role}**.

**Your behavior rules:**
{rules}

**Job details for context:**
- Company: {company}
- Role: {role}
- Location: {location}
- Pay: {pay}
- Schedule: {schedule}
- Key duties: {duties}.
- Benefits: {benefits}.

The interview software decides which question comes next. You will receive a
specific instruction with each message; follow it and do not ask any other
qualification questions on your own.";

pub const MANDATORY_ACK_PROMPT: &str = "\
The candidate just answered a mandatory eligibility question about: {label}
Candidate's answer: \"{answer}\"

The candidate MEETS this requirement. Acknowledge the answer in one short, warm sentence.
Do NOT ask any question; the next question will be appended automatically.";

pub const MANDATORY_COMPLETE_PROMPT: &str = "\
The candidate just answered the last mandatory eligibility question about: {label}
Candidate's answer: \"{answer}\"

They meet all the essential requirements. In one or two sentences, congratulate them
and say you would now like to learn more about their experience and skills.
Do NOT ask any question; the next question will be appended automatically.";

pub const DISQUALIFY_PROMPT: &str = "\
The candidate just answered a mandatory eligibility question about: {label}
Candidate's answer: \"{answer}\"

The candidate does NOT meet this mandatory requirement. Acknowledge their answer politely,
briefly explain that it is a mandatory requirement for this role, and say you will now
share the final assessment. Two sentences at most. Do NOT ask any question.";

pub const FOLLOWUP_PROMPT: &str = "\
You are doing a follow-up on the candidate's previous answer.
The candidate answered about: {label}
Their answer was: \"{answer}\"

Generate ONE relevant, probing follow-up question that digs deeper into their experience
or capability. Keep it conversational and natural. Reply with the question only.
Suggested follow-ups for inspiration (pick one or create your own):
{suggestions}";

pub const PREFERRED_ACK_PROMPT: &str = "\
The candidate just finished answering about: {label}
Their answers were: \"{answer}\"

Acknowledge their answer briefly and positively in one sentence.
Do NOT ask any question; the next question will be appended automatically.";

pub const INTERVIEW_COMPLETE_PROMPT: &str = "\
The candidate just answered the last preferred qualification question about: {label}
Their answers were: \"{answer}\"

Acknowledge their answer briefly and positively, then say the interview questions are
complete and you will now share the assessment. Two sentences at most.";

pub const DECISION_PROMPT: &str = "\
Write the FINAL hiring decision message based on the following assessment.

**Qualification Results:**
{breakdown}

**Total Score:** {score}/100
**Decision:** {decision}

Format the response as a professional hiring assessment:
1. Thank the candidate for their time.
2. State whether they are **{decision}**.
3. Give a BRIEF summary of how they did on mandatory and preferred qualifications.
4. Provide clear reasoning for the decision.
5. If qualified, mention that a recruiter will reach out to schedule an in-person meeting.
6. If not qualified, be respectful and encourage them to apply for other roles.

Keep it professional and empathetic. Do not restate point values per qualification.
End by inviting the candidate to ask any questions about the role.";

pub const JOB_QA_PROMPT: &str = "\
You are answering candidate questions about the job.

Candidate Assessment: {assessment}

Job Description:
{job_description}

Candidate Question: \"{question}\"

Instructions:
1. Answer the question accurately and concisely.
2. If the candidate asks about their qualification status or score, use the Candidate Assessment.
3. If the candidate asks about job details (pay, location, schedule, duties), use the Job Description.
4. If the answer is in neither, say you don't have that information.
5. After answering, ask if they have any other questions.";

pub const CLASSIFY_PROMPT: &str = "\
The candidate was asked: \"{question}\"
They answered: \"{answer}\"

Does this answer indicate they MEET the requirement for: {label}?
Respond with ONLY 'PASS' or 'FAIL'.";

pub const DEPTH_PROMPT: &str = "\
Rate the following candidate answer for the qualification: {label}

Question context: {question}
Candidate's answer(s): \"{answer}\"

Rate the depth and relevance from 0.0 to 1.0:
- 0.0-0.2: No relevant experience or very vague
- 0.3-0.5: Some relevant experience but lacking detail
- 0.6-0.8: Good relevant experience with decent detail
- 0.9-1.0: Excellent, specific, detailed experience

Return JSON exactly in this shape: {\"depth\": 0.7, \"rationale\": \"one short sentence\"}";

pub fn build_system_prompt(job: &JobProfile) -> String {
    SYSTEM_PROMPT_TEMPLATE
        .replace("{rules}", STAY_IN_ROLE_RULES)
        .replace("{company}", job.company)
        .replace("{role}", job.role)
        .replace("{location}", job.location)
        .replace("{pay}", job.pay_range)
        .replace("{schedule}", job.schedule)
        .replace("{duties}", job.duties)
        .replace("{benefits}", job.benefits)
}

/// Fills `{label}` and `{answer}`; shared by the acknowledgement templates.
pub fn build_answer_prompt(template: &str, q: &Qualification, answer: &str) -> String {
    template
        .replace("{label}", q.label)
        .replace("{answer}", answer)
}

pub fn build_follow_up_prompt(q: &Qualification, answer: &str) -> String {
    let suggestions = q
        .follow_up_prompts
        .iter()
        .map(|s| format!("- {s}"))
        .collect::<Vec<_>>()
        .join("\n");
    let template = FOLLOWUP_PROMPT.replace("{suggestions}", &suggestions);
    build_answer_prompt(&template, q, answer)
}

pub fn build_decision_prompt(breakdown: &str, score: &str, decision: &str) -> String {
    // The breakdown quotes candidate answers, so it goes in last.
    DECISION_PROMPT
        .replace("{score}", score)
        .replace("{decision}", decision)
        .replace("{breakdown}", breakdown)
}

pub fn build_job_qa_prompt(job: &JobProfile, assessment: &str, question: &str) -> String {
    JOB_QA_PROMPT
        .replace("{assessment}", assessment)
        .replace("{job_description}", job.description)
        .replace("{question}", question)
}

pub fn build_classify_prompt(q: &Qualification, answer: &str) -> String {
    CLASSIFY_PROMPT
        .replace("{question}", q.question)
        .replace("{label}", q.label)
        .replace("{answer}", answer)
}

pub fn build_depth_prompt(q: &Qualification, answer: &str) -> String {
    DEPTH_PROMPT
        .replace("{label}", q.label)
        .replace("{question}", q.question)
        .replace("{answer}", answer)
}
