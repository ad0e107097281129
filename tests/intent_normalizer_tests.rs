use autofill_answers::answer::{Intent, IntentNormalizer};

#[test]
fn test_canonical_labels_pass_through() {
    let normalizer = IntentNormalizer::new();

    for intent in Intent::ALL {
        assert_eq!(
            normalizer.normalize(Some(intent.as_str()), "irrelevant question"),
            intent,
            "{} should be returned as-is",
            intent
        );
    }

    // Surrounding whitespace is ignored
    assert_eq!(normalizer.normalize(Some("  eeo.gender "), ""), Intent::Gender);

    // Every canonical label has a collapsed entry, plus the messy aliases
    assert!(normalizer.table_len() > Intent::ALL.len());
}

#[test]
fn test_messy_labels_use_table() {
    let normalizer = IntentNormalizer::new();

    assert_eq!(normalizer.normalize(Some("why_fit"), ""), Intent::WhyFit);
    assert_eq!(normalizer.normalize(Some("Why Fit"), ""), Intent::WhyFit);
    assert_eq!(normalizer.normalize(Some("Salary"), ""), Intent::DesiredSalary);
    assert_eq!(normalizer.normalize(Some("personal.desired_salary"), ""), Intent::DesiredSalary);
    assert_eq!(normalizer.normalize(Some("additional-info"), ""), Intent::AdditionalInfo);
    assert_eq!(normalizer.normalize(Some("experience"), ""), Intent::ExperienceSummary);

    // Canonical labels in the wrong case
    assert_eq!(normalizer.normalize(Some("Personal.Email"), ""), Intent::Email);
    assert_eq!(
        normalizer.normalize(Some("workauthorization.needssponsorship"), ""),
        Intent::NeedsSponsorship
    );
}

#[test]
fn test_question_keywords_are_the_backup() {
    let normalizer = IntentNormalizer::new();

    assert_eq!(
        normalizer.normalize(None, "What are your salary expectations?"),
        Intent::DesiredSalary
    );
    assert_eq!(
        normalizer.normalize(Some("garbage"), "Expected total compensation"),
        Intent::DesiredSalary
    );
    assert_eq!(
        normalizer.normalize(None, "Is there anything else you'd like us to know?"),
        Intent::AdditionalInfo
    );
    assert_eq!(
        normalizer.normalize(Some(""), "Why should we hire you?"),
        Intent::WhyFit
    );
    assert_eq!(
        normalizer.normalize(None, "What makes you a strong fit for this team?"),
        Intent::WhyFit
    );
}

#[test]
fn test_keyword_order_salary_first() {
    // Both salary and additional keywords present: salary wins.
    assert_eq!(
        IntentNormalizer::infer_from_question("Any additional pay requirements?"),
        Intent::DesiredSalary
    );
}

#[test]
fn test_pay_keyword_is_a_plain_substring() {
    // Known imprecision: "pay" fires inside other words.
    assert_eq!(
        IntentNormalizer::infer_from_question("Have you used PayPal before?"),
        Intent::DesiredSalary
    );
}

#[test]
fn test_unmatched_everything_is_unknown() {
    let normalizer = IntentNormalizer::new();

    let labels = [None, Some(""), Some("favourite.color"), Some("personal"), Some("eeo")];
    let questions = [
        "What is your favorite color?",
        "Which city do you live in?",
        "Do you hold a driver's license?",
        "",
    ];

    for label in labels {
        for question in questions {
            assert_eq!(
                normalizer.normalize(label, question),
                Intent::Unknown,
                "label {:?} / question {:?} should be unknown",
                label,
                question
            );
        }
    }
}

#[test]
fn test_intent_wire_format() {
    let json = serde_json::to_string(&Intent::AuthorizedUs).unwrap();
    assert_eq!(json, "\"workAuthorization.authorizedUS\"");

    let parsed: Intent = serde_json::from_str("\"personal.additionalInfo\"").unwrap();
    assert_eq!(parsed, Intent::AdditionalInfo);

    assert!(serde_json::from_str::<Intent>("\"personal.shoeSize\"").is_err());
    assert_eq!(Intent::parse("unknown"), Some(Intent::Unknown));
    assert_eq!(Intent::parse("Unknown"), None);
}
