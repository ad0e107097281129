use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of intents a question can resolve to.
/// Serialized as the dotted identifier the extension understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Intent {
    #[serde(rename = "personal.firstName")]
    FirstName,
    #[serde(rename = "personal.lastName")]
    LastName,
    #[serde(rename = "personal.email")]
    Email,
    #[serde(rename = "personal.phone")]
    Phone,
    #[serde(rename = "personal.linkedin")]
    Linkedin,
    #[serde(rename = "personal.city")]
    City,
    #[serde(rename = "personal.state")]
    State,
    #[serde(rename = "personal.country")]
    Country,
    #[serde(rename = "personal.desiredSalary")]
    DesiredSalary,
    #[serde(rename = "personal.additionalInfo")]
    AdditionalInfo,
    #[serde(rename = "experience.whyFit")]
    WhyFit,
    #[serde(rename = "experience.summary")]
    ExperienceSummary,
    #[serde(rename = "workAuthorization.authorizedUS")]
    AuthorizedUs,
    #[serde(rename = "workAuthorization.needsSponsorship")]
    NeedsSponsorship,
    #[serde(rename = "eeo.gender")]
    Gender,
    #[serde(rename = "eeo.race")]
    Race,
    #[serde(rename = "eeo.veteran")]
    Veteran,
    #[serde(rename = "eeo.disability")]
    Disability,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Intent {
    pub const ALL: [Intent; 19] = [
        Intent::FirstName,
        Intent::LastName,
        Intent::Email,
        Intent::Phone,
        Intent::Linkedin,
        Intent::City,
        Intent::State,
        Intent::Country,
        Intent::DesiredSalary,
        Intent::AdditionalInfo,
        Intent::WhyFit,
        Intent::ExperienceSummary,
        Intent::AuthorizedUs,
        Intent::NeedsSponsorship,
        Intent::Gender,
        Intent::Race,
        Intent::Veteran,
        Intent::Disability,
        Intent::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::FirstName => "personal.firstName",
            Intent::LastName => "personal.lastName",
            Intent::Email => "personal.email",
            Intent::Phone => "personal.phone",
            Intent::Linkedin => "personal.linkedin",
            Intent::City => "personal.city",
            Intent::State => "personal.state",
            Intent::Country => "personal.country",
            Intent::DesiredSalary => "personal.desiredSalary",
            Intent::AdditionalInfo => "personal.additionalInfo",
            Intent::WhyFit => "experience.whyFit",
            Intent::ExperienceSummary => "experience.summary",
            Intent::AuthorizedUs => "workAuthorization.authorizedUS",
            Intent::NeedsSponsorship => "workAuthorization.needsSponsorship",
            Intent::Gender => "eeo.gender",
            Intent::Race => "eeo.race",
            Intent::Veteran => "eeo.veteran",
            Intent::Disability => "eeo.disability",
            Intent::Unknown => "unknown",
        }
    }

    /// Exact, case-sensitive match against the dotted identifiers.
    pub fn parse(raw: &str) -> Option<Intent> {
        Intent::ALL.iter().copied().find(|i| i.as_str() == raw)
    }
}

impl Default for Intent {
    fn default() -> Self {
        Intent::Unknown
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single form question sent by the extension.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    pub question: String,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    pub field_type: String,
    #[serde(default)]
    pub user_profile: serde_json::Map<String, serde_json::Value>,
    /// Owner used when the answer is learned as a pattern.
    #[serde(default)]
    pub user_email: Option<String>,
}

impl PredictionRequest {
    pub fn new(question: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            options: None,
            field_type: field_type.into(),
            user_profile: serde_json::Map::new(),
            user_email: None,
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_profile(mut self, profile: serde_json::Map<String, serde_json::Value>) -> Self {
        self.user_profile = profile;
        self
    }

    pub fn with_user(mut self, email: impl Into<String>) -> Self {
        self.user_email = Some(email.into());
        self
    }

    /// Options as a slice; an empty list behaves like no list at all.
    pub fn option_list(&self) -> Option<&[String]> {
        match &self.options {
            Some(opts) if !opts.is_empty() => Some(opts.as_slice()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    pub answer: String,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    pub intent: Intent,
}

impl PredictionResponse {
    /// Zero-confidence response for the credentials-missing and service-error states.
    pub fn empty(reasoning: impl Into<String>) -> Self {
        Self {
            answer: String::new(),
            confidence: 0.0,
            reasoning: Some(reasoning.into()),
            intent: Intent::Unknown,
        }
    }

    /// Usable answers are worth remembering.
    pub fn is_usable(&self) -> bool {
        !self.answer.is_empty() && self.confidence >= super::MIN_CONFIDENCE
    }
}
