use super::*;

#[test]
fn validation_error_uses_first_field_message() {
    let mut fields = FieldErrors::new();
    fields.insert("title".into(), vec!["the title field is required".into()]);
    let err = ApiError::validation(fields);
    assert!(err.is_validation());
    assert_eq!(err.message, "the title field is required");
    assert_eq!(err.field("title").map(<[String]>::len), Some(1));
}

#[test]
fn error_envelope_omits_empty_fields() {
    let body = serde_json::to_value(ApiError::todo_not_found(TodoId(999))).expect("json");
    assert_eq!(
        body,
        serde_json::json!({ "code": "not_found", "message": "todo 999 not found" })
    );
}
