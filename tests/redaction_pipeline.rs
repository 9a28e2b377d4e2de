use std::sync::Arc;
use std::thread;

use phivault::{
    redact_comprehensive, redact_patient_names, redact_text, CustomPattern, EncryptionKey,
    FieldCodec, PatientIdentity, PhiVault, PhiVaultError, RedactionCategory, RedactionOptions,
    ViewRequest,
};

#[test]
fn test_phone_and_email_example() {
    let options = RedactionOptions {
        redact_phone: true,
        redact_email: true,
        ..RedactionOptions::default()
    };
    let result = redact_text("Call 555-123-4567 or john@x.com", &options);
    assert_eq!(result.redacted_text, "Call [REDACTED-PHONE] or [REDACTED-EMAIL]");
    assert_eq!(
        result.categories(),
        vec![RedactionCategory::Phone, RedactionCategory::Email]
    );
}

#[test]
fn test_patient_name_example() {
    let patient = PatientIdentity::new("Jane", "Doe");
    let result =
        redact_patient_names("Jane Doe visited. Jane felt better.", Some(&patient)).unwrap();
    assert_eq!(
        result.redacted_text,
        "[PATIENT-NAME] visited. [PATIENT-FIRST-NAME] felt better."
    );
    assert_eq!(
        result.categories(),
        vec![
            RedactionCategory::PatientName,
            RedactionCategory::PatientFirstName
        ]
    );
}

#[test]
fn test_default_options_keep_dates() {
    let result = redact_text("SSN: 123-45-6789, born 01/02/1990", &RedactionOptions::default());
    assert_eq!(result.redacted_text, "SSN: [REDACTED-SSN], born 01/02/1990");
    assert_eq!(result.redacted_items.len(), 1);
}

#[test]
fn test_custom_pattern_runs_last() {
    let options = RedactionOptions::default()
        .with_custom_pattern(CustomPattern::new("foo", "bar").unwrap())
        .with_custom_pattern(CustomPattern::new(r"(?i)mrn-\d+", "[MRN]").unwrap());

    let result = redact_text("foo MRN-0042 reached at 555-123-4567, foo", &options);
    assert_eq!(result.redacted_text, "bar [MRN] reached at [REDACTED-PHONE], bar");
    assert_eq!(
        result.categories(),
        vec![
            RedactionCategory::Phone,
            RedactionCategory::Custom,
            RedactionCategory::Custom,
            RedactionCategory::Custom
        ]
    );
}

#[test]
fn test_malformed_custom_pattern_surfaces_to_caller() {
    assert!(matches!(
        CustomPattern::new("[a-", "x"),
        Err(PhiVaultError::Configuration(_))
    ));
}

#[test]
fn test_identity_runs_before_patterns() {
    // A numeric-looking surname must be consumed by identity redaction
    // before the phone pattern sees it.
    let patient = PatientIdentity::new("Unit", "5551234567");
    let result = redact_comprehensive(
        "Unit 5551234567 called",
        Some(&patient),
        &RedactionOptions::default(),
    )
    .unwrap();
    assert_eq!(result.redacted_text, "[PATIENT-NAME] called");
    assert_eq!(result.categories(), vec![RedactionCategory::PatientName]);
}

#[test]
fn test_result_is_a_separate_copy() {
    let text = String::from("SSN 123-45-6789");
    let result = redact_text(&text, &RedactionOptions::default());
    assert_eq!(result.redacted_text, "SSN [REDACTED-SSN]");
    assert_eq!(result.redacted_items[0].value, "123-45-6789");
    assert_eq!(text, "SSN 123-45-6789");
}

#[test]
fn test_query_flags_drive_view() {
    let mut vault = PhiVault::new(EncryptionKey::from_bytes([1u8; 32]));
    let options = RedactionOptions::from_query(|name| {
        (name == "redactEmail").then(|| "false".to_string())
    });

    let view = vault
        .view_redacted(ViewRequest::transcript("mail a@b.org or 555-123-4567").options(options))
        .unwrap();
    assert_eq!(view.redacted_text, "mail a@b.org or [REDACTED-PHONE]");
    assert_eq!(view.redacted_items_count, 1);
    assert!(!vault.audit_log().iter().next().unwrap().options.redact_email);
}

#[test]
fn test_concurrent_use_needs_no_coordination() {
    let codec = Arc::new(FieldCodec::new(EncryptionKey::from_bytes([6u8; 32])));
    let patient = Arc::new(PatientIdentity::new("Sam", "Lee"));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let codec = Arc::clone(&codec);
            let patient = Arc::clone(&patient);
            thread::spawn(move || {
                let text = format!("Sam Lee visit {i}, phone 555-000-{i:04}");
                let result =
                    redact_comprehensive(&text, Some(&patient), &RedactionOptions::default())
                        .unwrap();
                let sealed = codec.encrypt(Some(&result.redacted_text)).unwrap();
                let opened = codec.decrypt(sealed.as_deref()).unwrap().unwrap();
                assert_eq!(opened, format!("[PATIENT-NAME] visit {i}, phone [REDACTED-PHONE]"));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
