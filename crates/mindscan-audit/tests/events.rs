use mindscan_audit::{AuditAction, AuditError, AuditEvent};

#[test]
fn builder_sets_subject_details_and_outcome() {
    let event = AuditEvent::new(AuditAction::AssessmentStored, "assessment", "a1b2")
        .for_subject("5f2c")
        .with_details(serde_json::json!({"instrument_id": "phq9"}))
        .failed();

    assert_eq!(event.subject_hash.as_deref(), Some("5f2c"));
    assert!(!event.success);
    assert_eq!(event.details.as_ref().unwrap()["instrument_id"], "phq9");
    event.emit();
}

#[test]
fn events_serialize_with_snake_case_actions() {
    let event = AuditEvent::new(AuditAction::SubjectDataErased, "subject", "5f2c");
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["action"], "subject_data_erased");
    assert_eq!(json["success"], true);

    let back: AuditEvent = serde_json::from_value(json).unwrap();
    assert_eq!(back, event);
}

#[test]
fn actions_parse_from_their_names() {
    for action in AuditAction::ALL {
        assert_eq!(action.as_str().parse::<AuditAction>().unwrap(), action);
    }
    assert!(matches!(
        "assessment_deleted".parse::<AuditAction>(),
        Err(AuditError::UnknownAction(_))
    ));
}
