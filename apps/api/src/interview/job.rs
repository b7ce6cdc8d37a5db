//! Job facts the interviewer is allowed to talk about.
//!
//! Compiled in and read-only; the JobQA phase answers from `JobProfile::description`
//! and nothing else.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct JobProfile {
    pub company: &'static str,
    pub role: &'static str,
    pub location: &'static str,
    pub pay_range: &'static str,
    pub schedule: &'static str,
    pub duties: &'static str,
    pub benefits: &'static str,
    #[serde(skip)]
    pub description: &'static str,
}

pub const JOB: JobProfile = JobProfile {
    company: "Tsavo West Inc",
    role: "FedEx Ground ISP Delivery Driver (Non-CDL)",
    location: "6708 Harney Road, Tampa, Florida 33610",
    pay_range: "$18/hour to $20/hour based on experience",
    schedule: "4 days a week including 1 weekend day, 10-hour shifts starting 07:30 AM",
    duties: "Delivering packages safely and on time, loading and unloading, route planning, \
        customer service, vehicle maintenance reporting",
    benefits: "Weekly pay, paid training, stop and safety bonuses, PTO, \
        health/dental/vision insurance",
    description: JOB_DESCRIPTION,
};

const JOB_DESCRIPTION: &str = "\
Tsavo West Inc, 6708 Harney Road, Tampa, Florida 33610

Payment
- $18/hour to $20/hour based on experience
- Pay structure: combination of fixed and per stop
- Payday: Friday (weekly pay)

Schedule
- 10-hour shifts, driver start time 07:30 AM
- Typical miles driven each day: 150
- 4 days a week including 1 weekend day; 1-2 days of overtime available

Responsibilities
- Safely operate a company-provided delivery vehicle to deliver packages to designated locations.
- Ensure timely and accurate delivery, maintaining package condition upon arrival.
- Load and unload packages.
- Plan and follow the most efficient route while adhering to traffic laws and safety regulations.
- Verify package accuracy and complete documentation for each delivery.
- Provide polite, professional customer service during deliveries.
- Work with dispatch to optimize delivery schedules and report delays promptly.
- Keep the delivery vehicle clean; report malfunctions, accidents or violations immediately.

Qualifications
- 21 years or older; high school diploma or equivalent.
- Valid driver's license with a clean driving record. No CDL required.
- Able to clear pre-employment background and drug screening.
- Able to lift packages up to 150 lbs, bending and moving in and out of the truck.
- Prior courier experience, time management and independent work are a plus.

Benefits
- Weekly pay, paid training ($15/hour for 1-2 weeks)
- Stop bonus and safety bonus
- 5 days PTO after 90 days of full-time employment
- Health insurance, Aflac supplemental options, dental, vision and disability coverage
- Military and veteran applicants are strongly encouraged to apply.
";

impl JobProfile {
    /// Short fact sheet used when a generated answer is unavailable.
    pub fn fact_sheet(&self) -> String {
        format!(
            "Here are the key details for the {role} role at {company}:\n\
             - Location: {location}\n\
             - Pay: {pay}\n\
             - Schedule: {schedule}\n\
             - Duties: {duties}\n\
             - Benefits: {benefits}",
            role = self.role,
            company = self.company,
            location = self.location,
            pay = self.pay_range,
            schedule = self.schedule,
            duties = self.duties,
            benefits = self.benefits,
        )
    }
}
