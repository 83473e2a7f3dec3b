use mindscan_core::error::CoreError;
use mindscan_core::models::answer::{Answer, ResponseSet};
use mindscan_core::models::result::{RiskLevel, SeverityBand};

#[test]
fn untagged_answers_deserialize_by_shape() {
    let responses: ResponseSet = serde_json::from_str(
        r#"{"dep_001": 2, "sub_001": "Yes", "anx_004": ["Sweating or trembling", "Muscle tension"]}"#,
    )
    .unwrap();

    assert_eq!(responses.get("dep_001"), Some(&Answer::Numeric(2.0)));
    assert_eq!(responses.get("sub_001"), Some(&Answer::Choice("Yes".to_string())));
    assert_eq!(
        responses.get("anx_004"),
        Some(&Answer::MultiChoice(vec![
            "Sweating or trembling".to_string(),
            "Muscle tension".to_string()
        ]))
    );
}

#[test]
fn serialization_order_is_stable() {
    let a = ResponseSet::new().with("b", 1).with("a", 2);
    let b = ResponseSet::new().with("a", 2).with("b", 1);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
    assert_eq!(serde_json::to_string(&a).unwrap(), r#"{"a":2.0,"b":1.0}"#);
}

#[test]
fn lenient_json_drops_nulls_and_maps_booleans() {
    let value = serde_json::json!({
        "dep_001": 3,
        "dep_002": null,
        "sub_001": true,
        "sub_004": false,
    });
    let responses = ResponseSet::from_json(value).unwrap();

    assert_eq!(responses.len(), 3);
    assert!(!responses.contains("dep_002"));
    assert_eq!(responses.get("sub_001").and_then(Answer::as_choice), Some("yes"));
    assert_eq!(responses.get("sub_004").and_then(Answer::as_choice), Some("no"));
}

#[test]
fn lenient_json_rejects_nested_objects() {
    let value = serde_json::json!({"dep_001": {"value": 3}});
    let err = ResponseSet::from_json(value).unwrap_err();
    assert!(matches!(err, CoreError::UnsupportedAnswer { ref question_id, .. } if question_id == "dep_001"));
}

#[test]
fn lenient_json_requires_an_object() {
    let err = ResponseSet::from_json(serde_json::json!([1, 2, 3])).unwrap_err();
    assert!(matches!(err, CoreError::NotAnObject));
}

#[test]
fn ordered_enums_round_trip_through_strings() {
    assert!(SeverityBand::Minimal < SeverityBand::ModeratelySevere);
    assert!(RiskLevel::None < RiskLevel::Low);
    assert!(RiskLevel::High < RiskLevel::Critical);

    for band in SeverityBand::ALL {
        assert_eq!(band.as_str().parse::<SeverityBand>().unwrap(), band);
    }
    for level in RiskLevel::ALL {
        assert_eq!(level.to_string().parse::<RiskLevel>().unwrap(), level);
    }
    assert!("catastrophic".parse::<RiskLevel>().is_err());
}
