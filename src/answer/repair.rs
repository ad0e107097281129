use super::types::Intent;

/// Options a careful applicant would pick when nothing better is known.
const PREFERRED_OPTIONS: &[&str] = &[
    "Prefer not to say",
    "Decline to answer",
    "Decline to state",
    "Prefer not to disclose",
];

pub const SALARY_FALLBACK: &str =
    "Open to a competitive salary aligned with the role scope, market standards, and total compensation.";

pub const ADDITIONAL_INFO_FALLBACK: &str = "I’m genuinely excited about this opportunity and would welcome the chance to discuss how I can contribute. I’m quick to learn, dependable, and committed to delivering high-quality work.";

pub const WHY_FIT_FALLBACK: &str = "I’m a strong fit because I bring consistent execution, clear communication, and a practical mindset. I focus on understanding requirements quickly, delivering reliable outcomes, and collaborating well with teams to move work forward efficiently.";

pub const GENERIC_FALLBACK: &str = "I’m excited about this role and confident I can add value through strong ownership, adaptability, and a results-driven approach. I’m ready to contribute from day one.";

/// Produces a safe answer when the model output is unusable.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnswerRepairer;

impl AnswerRepairer {
    pub fn new() -> Self {
        Self
    }

    /// With options the result is always one of them. Without options it is
    /// one of the fixed fallback sentences.
    pub fn repair(&self, question: &str, options: Option<&[String]>, intent: Intent) -> String {
        if let Some(options) = options.filter(|o| !o.is_empty()) {
            return Self::pick_option(options).to_string();
        }

        let q = question.to_lowercase();

        if intent == Intent::DesiredSalary || q.contains("salary") || q.contains("compensation") {
            SALARY_FALLBACK.to_string()
        } else if intent == Intent::AdditionalInfo || q.contains("anything else") || q.contains("additional") {
            ADDITIONAL_INFO_FALLBACK.to_string()
        } else if intent == Intent::WhyFit || q.contains("strong fit") || q.contains("why should") {
            WHY_FIT_FALLBACK.to_string()
        } else {
            GENERIC_FALLBACK.to_string()
        }
    }

    /// Preference order wins over list order; original casing is kept.
    fn pick_option(options: &[String]) -> &str {
        for preferred in PREFERRED_OPTIONS {
            if let Some(opt) = options
                .iter()
                .find(|o| o.trim().eq_ignore_ascii_case(preferred))
            {
                return opt;
            }
        }
        &options[0]
    }
}
