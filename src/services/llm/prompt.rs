use crate::answer::{Intent, PredictionRequest};

const INSTRUCTIONS: &str = "You fill out job application forms on behalf of the applicant described in the profile below.
Answer the question with a short, single-line answer using only what the profile says.
For Yes/No questions answer only Yes or No. When options are listed, copy exactly one of them.
Salary answers are plain numbers. Names are capitalized, e-mails lowercase, phone numbers digits only.";

const FREE_TEXT_MARKER: &str = "This question requires a written response.";

/// Builds the single prompt sent to the model for one question.
pub fn build_prompt(request: &PredictionRequest) -> String {
    let profile = serde_json::to_string_pretty(&request.user_profile).unwrap_or_else(|_| "{}".to_string());

    let options_block = match request.option_list() {
        Some(options) => {
            let lines: Vec<String> = options.iter().map(|o| format!("- {}", o)).collect();
            format!("AVAILABLE OPTIONS (CHOOSE EXACTLY ONE, COPY EXACTLY):\n{}", lines.join("\n"))
        }
        None => FREE_TEXT_MARKER.to_string(),
    };

    let mut intents: Vec<&str> = Intent::ALL.iter().map(Intent::as_str).collect();
    intents.sort_unstable();
    let intents_block = intents
        .iter()
        .map(|i| format!("- {}", i))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{instructions}\n\nUSER PROFILE (may be incomplete):\n{profile}\n\nQUESTION:\n{question}\n\n{options}\n\n\
ALLOWED INTENTS (MUST SELECT EXACTLY ONE):\n{intents}\n\n\
RESPONSE FORMAT (JSON ONLY, NO EXTRA TEXT):\n\
{{\"answer\": \"string\", \"confidence\": 0.70, \"reasoning\": \"short reason\", \"intent\": \"one_allowed_intent\"}}\n",
        instructions = INSTRUCTIONS,
        profile = profile,
        question = request.question,
        options = options_block,
        intents = intents_block,
    )
}
