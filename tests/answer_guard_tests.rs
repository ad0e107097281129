use autofill_answers::answer::repair::{
    ADDITIONAL_INFO_FALLBACK, GENERIC_FALLBACK, SALARY_FALLBACK, WHY_FIT_FALLBACK,
};
use autofill_answers::answer::forbidden::FORBIDDEN_PATTERNS;
use autofill_answers::answer::{AnswerRepairer, ForbiddenAnswerDetector, Intent};

fn opts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_placeholders_are_flagged() {
    let detector = ForbiddenAnswerDetector::new();

    let placeholders = [
        "Not Provided",
        "not provided by candidate",
        "I don't know",
        "Honestly, I DON'T KNOW.",
        "I don’t know",
        "I do not know",
        "N/A",
        "n/a",
        "NA",
        "Free text input",
        "No additional information",
        "Nothing to add.",
        "Not sure, I don't know",
        "",
        "   ",
    ];

    for answer in placeholders {
        assert!(detector.is_forbidden(answer), "{:?} should be forbidden", answer);
    }
}

#[test]
fn test_every_placeholder_pattern_compiles() {
    let detector = ForbiddenAnswerDetector::new();
    assert_eq!(detector.pattern_count(), FORBIDDEN_PATTERNS.len());
}

#[test]
fn test_real_answers_pass() {
    let detector = ForbiddenAnswerDetector::new();

    let answers = [
        "Yes",
        "No",
        "LinkedIn",
        "120000",
        "January",
        "Nathan",
        "Canada",
        "I am sure I can start in two weeks",
        "Decline to answer",
    ];

    for answer in answers {
        assert!(!detector.is_forbidden(answer), "{:?} should be allowed", answer);
    }
}

#[test]
fn test_fallback_sentences_are_never_placeholders() {
    let detector = ForbiddenAnswerDetector::new();

    for sentence in [SALARY_FALLBACK, ADDITIONAL_INFO_FALLBACK, WHY_FIT_FALLBACK, GENERIC_FALLBACK] {
        assert!(!sentence.is_empty());
        assert!(!detector.is_forbidden(sentence), "fallback flagged: {}", sentence);
    }
}

#[test]
fn test_repair_prefers_decline_options() {
    let repairer = AnswerRepairer::new();

    let options = opts(&["Male", "Female", "Decline to answer"]);
    assert_eq!(repairer.repair("Gender", Some(&options), Intent::Gender), "Decline to answer");

    // Preference order beats list order
    let options = opts(&["Decline to state", "Prefer not to say"]);
    assert_eq!(repairer.repair("Race", Some(&options), Intent::Race), "Prefer not to say");

    // Original casing and padding are preserved
    let options = opts(&["Yes", " decline TO answer "]);
    assert_eq!(repairer.repair("Veteran?", Some(&options), Intent::Veteran), " decline TO answer ");
}

#[test]
fn test_repair_falls_back_to_first_option() {
    let repairer = AnswerRepairer::new();

    let options = opts(&["Blue", "Green"]);
    assert_eq!(repairer.repair("Favorite color?", Some(&options), Intent::Unknown), "Blue");
}

#[test]
fn test_repair_always_returns_a_member_of_the_options() {
    let repairer = AnswerRepairer::new();

    let lists = [
        opts(&["Yes", "No"]),
        opts(&["Prefer not to disclose"]),
        opts(&["A", "B", "C", "Decline To State"]),
        opts(&["N/A"]),
    ];

    for options in &lists {
        let answer = repairer.repair("anything", Some(options), Intent::Unknown);
        assert!(options.contains(&answer), "{:?} not in {:?}", answer, options);
    }
}

#[test]
fn test_repair_free_text_by_topic() {
    let repairer = AnswerRepairer::new();

    assert_eq!(
        repairer.repair("Desired salary?", None, Intent::Unknown),
        SALARY_FALLBACK
    );
    assert_eq!(
        repairer.repair("Tell us more", None, Intent::DesiredSalary),
        SALARY_FALLBACK
    );
    assert_eq!(
        repairer.repair("Anything else we should know?", None, Intent::Unknown),
        ADDITIONAL_INFO_FALLBACK
    );
    assert_eq!(
        repairer.repair("Tell us more", None, Intent::AdditionalInfo),
        ADDITIONAL_INFO_FALLBACK
    );
    assert_eq!(
        repairer.repair("Why should we pick you?", None, Intent::Unknown),
        WHY_FIT_FALLBACK
    );
    assert_eq!(
        repairer.repair("Tell us more", None, Intent::WhyFit),
        WHY_FIT_FALLBACK
    );
    assert_eq!(
        repairer.repair("Tell us more", None, Intent::Unknown),
        GENERIC_FALLBACK
    );

    // An empty list behaves like no list
    let empty: Vec<String> = Vec::new();
    assert_eq!(
        repairer.repair("Tell us more", Some(&empty), Intent::Unknown),
        GENERIC_FALLBACK
    );
}
