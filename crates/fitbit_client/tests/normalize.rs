use fitbit_client::normalize::{normalize_text, normalize_value};
use fitbit_client::sample_profile;
use serde_json::json;

#[test]
fn canonical_payload_is_identity() {
    // The simulated upstream payload used in development, verbatim.
    let canonical = json!({
        "id": "sample-user",
        "user": {
            "name": "Sarah Johnson",
            "age": 28,
            "gender": "female",
            "weight": 65.2,
            "height": 165.0,
            "bmi": 23.9
        },
        "activity": {
            "steps": 12450,
            "calories": 1850,
            "activeMinutes": 52,
            "sleepHours": 8.2,
            "heartRate": {"resting": 58, "average": 72}
        },
        "goals": ["Improve Sleep Quality", "Increase Daily Steps"],
        "connectedApps": {"Apple Health": false, "Fitbit": true, "Oura": false},
        "preferences": {},
        "lastSync": "2025-06-01T08:00:00Z",
        "createdAt": "2025-06-01T08:00:00Z"
    });
    let normalized = normalize_value(&canonical);
    assert_eq!(serde_json::to_value(&normalized).unwrap(), canonical);
    assert_eq!(normalized, sample_profile());
}

#[test]
fn raw_person_object_gets_defaults_and_computed_bmi() {
    let input = json!({"name": "Maya", "weight": 75.5, "height": 175});
    let p = normalize_value(&input);
    assert_eq!(p.user.name, "Maya");
    assert_eq!(p.user.bmi, 24.7);
    // Unspecified activity fields are the fixed defaults, so the default
    // goal set follows from the rules.
    assert_eq!(p.activity.sleep_hours, 7.0);
    assert_eq!(p.goals, vec!["Boost Energy".to_string()]);
}

#[test]
fn wrapped_payload_is_unwrapped_once() {
    let p = normalize_value(&json!({"profile": {"displayName": "Wrapped", "steps": 15000}}));
    assert_eq!(p.user.name, "Wrapped");
    assert_eq!(p.activity.steps, 15000);
}

#[test]
fn string_payloads_never_fail() {
    assert_eq!(normalize_text("not json at all"), sample_profile());
    let mined = normalize_text("slept 6 hours, 4,000 steps");
    assert_eq!(mined.activity.steps, 4_000);
    assert_eq!(mined.activity.sleep_hours, 6.0);
}
