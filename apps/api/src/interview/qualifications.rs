//! Qualification Registry: the fixed question set and its scoring weights.
//!
//! Six mandatory qualifications worth 10 points each and three preferred
//! qualifications sharing 40 points. Order in the arrays is interview order.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use serde::Serialize;

/// Score in tenths of a point. Integer arithmetic keeps totals exact and the
/// one-decimal rendering stable, so `grand_total` can never drift past 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "f64")]
pub struct Points(u32);

impl Points {
    pub const ZERO: Points = Points(0);

    pub const fn from_tenths(tenths: u32) -> Self {
        Points(tenths)
    }

    pub const fn tenths(self) -> u32 {
        self.0
    }

    /// Scales by a whole percentage, rounding half up to the nearest tenth.
    pub const fn percent(self, percent: u32) -> Self {
        Points((self.0 * percent + 50) / 100)
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl From<Points> for f64 {
    fn from(points: Points) -> f64 {
        points.as_f64()
    }
}

impl Add for Points {
    type Output = Points;

    fn add(self, rhs: Points) -> Points {
        Points(self.0 + rhs.0)
    }
}

impl Sum for Points {
    fn sum<I: Iterator<Item = Points>>(iter: I) -> Points {
        iter.fold(Points::ZERO, Add::add)
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Mandatory,
    Preferred,
}

/// A single screening requirement.
#[derive(Debug, Serialize)]
pub struct Qualification {
    pub id: &'static str,
    pub label: &'static str,
    pub category: Category,
    pub question: &'static str,
    /// Canned replies the chat surface can offer as buttons.
    pub quick_options: &'static [&'static str],
    /// Affirmative phrases specific to this requirement (mandatory only).
    pub pass_keywords: &'static [&'static str],
    /// Negative phrases specific to this requirement (mandatory only).
    pub fail_keywords: &'static [&'static str],
    /// Smallest acceptable figure for requirements answered with a number. A stated
    /// figure below it fails the requirement outright.
    pub numeric_minimum: Option<u32>,
    /// Suggestions handed to the follow-up generator (preferred only).
    pub follow_up_prompts: &'static [&'static str],
    pub weight: Points,
}

pub const MANDATORY_POINTS: Points = Points::from_tenths(600);
pub const PREFERRED_POINTS: Points = Points::from_tenths(400);
pub const TOTAL_POINTS: Points = Points::from_tenths(1000);

const MANDATORY_WEIGHT: Points = Points::from_tenths(100);
const YES_NO: &[&str] = &["Yes", "No"];

pub static MANDATORY: [Qualification; 6] = [
    Qualification {
        id: "age",
        label: "Age Requirement (21+)",
        category: Category::Mandatory,
        question: "Are you 21 years of age or older?",
        quick_options: YES_NO,
        pass_keywords: &["yes", "yeah", "yep", "over 21", "older"],
        fail_keywords: &["no", "nope", "not yet", "under 21", "i'm not", "younger"],
        numeric_minimum: Some(21),
        follow_up_prompts: &[],
        weight: MANDATORY_WEIGHT,
    },
    Qualification {
        id: "license",
        label: "Valid Driver's License",
        category: Category::Mandatory,
        question: "Do you currently hold a valid driver's license?",
        quick_options: YES_NO,
        pass_keywords: &["yes", "yeah", "yep", "i do", "valid"],
        fail_keywords: &["no", "nope", "i don't", "expired", "suspended", "revoked"],
        numeric_minimum: None,
        follow_up_prompts: &[],
        weight: MANDATORY_WEIGHT,
    },
    Qualification {
        id: "clean_record",
        label: "Clean Driving Record",
        category: Category::Mandatory,
        question: "Do you have a clean driving record with no major violations or accidents?",
        quick_options: YES_NO,
        pass_keywords: &["yes", "clean", "no violations", "no accidents"],
        fail_keywords: &["no", "dui", "suspended", "violations", "accidents"],
        numeric_minimum: None,
        follow_up_prompts: &[],
        weight: MANDATORY_WEIGHT,
    },
    Qualification {
        id: "background_drug",
        label: "Background & Drug Screening",
        category: Category::Mandatory,
        question: "Are you willing and able to pass a pre-employment background check and drug screening?",
        quick_options: YES_NO,
        pass_keywords: &["yes", "willing", "no problem", "sure", "absolutely"],
        fail_keywords: &["no", "cannot", "can't", "not willing", "won't"],
        numeric_minimum: None,
        follow_up_prompts: &[],
        weight: MANDATORY_WEIGHT,
    },
    Qualification {
        id: "physical",
        label: "Physical Ability (Lift 150 lbs)",
        category: Category::Mandatory,
        question: "Are you physically able to lift packages up to 150 lbs, including bending, lifting, \
            and maneuvering in and out of a delivery truck?",
        quick_options: YES_NO,
        pass_keywords: &["yes", "can", "able", "no problem", "sure"],
        fail_keywords: &["no", "cannot", "can't", "unable", "not able"],
        numeric_minimum: None,
        follow_up_prompts: &[],
        weight: MANDATORY_WEIGHT,
    },
    Qualification {
        id: "availability",
        label: "Weekend & Long-Shift Availability",
        category: Category::Mandatory,
        question: "This role requires 10-hour shifts, 4 days a week including at least 1 weekend day \
            (with overtime opportunities). Are you available for this schedule?",
        quick_options: YES_NO,
        pass_keywords: &["yes", "available", "can do", "no problem", "flexible"],
        fail_keywords: &["no", "cannot", "can't", "not available", "weekdays only"],
        numeric_minimum: None,
        follow_up_prompts: &[],
        weight: MANDATORY_WEIGHT,
    },
];

// 40 points do not split evenly into thirds; the last qualification absorbs the
// remainder so the preferred weights sum to exactly 40.0.
pub static PREFERRED: [Qualification; 3] = [
    Qualification {
        id: "delivery_experience",
        label: "Prior Delivery / Courier Experience",
        category: Category::Preferred,
        question: "Do you have any prior experience with delivery or courier services? \
            If so, please tell me about it.",
        quick_options: &[],
        pass_keywords: &[],
        fail_keywords: &[],
        numeric_minimum: None,
        follow_up_prompts: &[
            "How long did you work in that delivery role?",
            "What types of packages or goods were you delivering?",
            "What was the typical volume of deliveries you handled per day?",
        ],
        weight: Points::from_tenths(133),
    },
    Qualification {
        id: "time_management",
        label: "Time Management & Organizational Skills",
        category: Category::Preferred,
        question: "How would you describe your time management and organizational skills? \
            Can you give me an example of how you've handled a busy workday?",
        quick_options: &[],
        pass_keywords: &[],
        fail_keywords: &[],
        numeric_minimum: None,
        follow_up_prompts: &[
            "How do you prioritize tasks when you have multiple deadlines?",
            "Have you ever had to manage a route or schedule independently?",
        ],
        weight: Points::from_tenths(133),
    },
    Qualification {
        id: "independent_work",
        label: "Ability to Work Independently",
        category: Category::Preferred,
        question: "This role requires working independently for most of the day. How comfortable \
            are you with that? Can you share an experience where you worked independently?",
        quick_options: &[],
        pass_keywords: &[],
        fail_keywords: &[],
        numeric_minimum: None,
        follow_up_prompts: &[
            "How do you handle unexpected problems when there's no supervisor nearby?",
            "What motivates you to stay productive when working alone?",
        ],
        weight: Points::from_tenths(134),
    },
];

/// All qualifications in interview order.
pub fn all() -> impl Iterator<Item = &'static Qualification> {
    MANDATORY.iter().chain(PREFERRED.iter())
}

pub fn find(id: &str) -> Option<&'static Qualification> {
    all().find(|q| q.id == id)
}
