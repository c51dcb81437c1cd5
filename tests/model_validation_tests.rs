use chrono::NaiveDate;
use people_crud::models::{Person, ProblemDetails};
use uuid::Uuid;

#[test]
fn test_person_json_uses_camel_case() {
    let person = Person {
        id: Uuid::from_u128(1),
        name: "Ann".to_string(),
        email: Some("ann@example.com".to_string()),
        phone: None,
        birth_date: NaiveDate::from_ymd_opt(1990, 4, 1),
    };

    let json = serde_json::to_value(&person).unwrap();

    assert_eq!(json["birthDate"], "1990-04-01");
    assert_eq!(json["email"], "ann@example.com");
    assert!(json.get("birth_date").is_none());
}

#[test]
fn test_person_minimal_payload() {
    // Only `name` is required; a missing id deserializes to nil and is assigned on create.
    let person: Person = serde_json::from_str(r#"{ "name": "Ann" }"#).unwrap();

    assert!(person.id.is_nil());
    assert_eq!(person.email, None);
    assert_eq!(person.birth_date, None);
}

#[test]
fn test_person_without_name_is_rejected() {
    let result = serde_json::from_str::<Person>(r#"{ "id": "00000000-0000-0000-0000-000000000001" }"#);
    assert!(result.is_err());
}

#[test]
fn test_with_assigned_id_keeps_client_id() {
    let client_id = Uuid::new_v4();
    let person = Person {
        id: client_id,
        name: "Ann".to_string(),
        ..Person::default()
    };

    assert_eq!(person.with_assigned_id().id, client_id);
}

#[test]
fn test_with_assigned_id_fills_nil() {
    let person = Person {
        name: "Ann".to_string(),
        ..Person::default()
    };

    assert!(!person.with_assigned_id().id.is_nil());
}

#[test]
fn test_problem_details_omits_empty_detail() {
    let problem = ProblemDetails {
        status: 404,
        title: "Not Found".to_string(),
        detail: None,
    };

    let json_output = serde_json::to_string(&problem).unwrap();
    assert_eq!(json_output, r#"{"status":404,"title":"Not Found"}"#);
}
