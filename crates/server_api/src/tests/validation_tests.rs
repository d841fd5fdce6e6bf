use super::*;

#[test]
fn create_trims_title_and_keeps_description_verbatim() {
    let todo = validate_create(CreateTodoRequest::new("  Buy milk  ", Some(String::new())))
        .expect("valid");
    assert_eq!(todo.title, "Buy milk");
    assert_eq!(todo.description.as_deref(), Some(""));
    assert!(!todo.completed);
}

#[test]
fn create_rejects_missing_blank_and_long_titles() {
    for title in [None, Some(String::new()), Some("   ".to_string())] {
        let err = validate_create(CreateTodoRequest {
            title,
            description: Some("x".into()),
        })
        .expect_err("invalid");
        assert!(err.is_validation());
        assert!(err.field("title").is_some());
    }

    let long = "a".repeat(TITLE_MAX_CHARS + 1);
    let err = validate_create(CreateTodoRequest::new(long, None)).expect_err("too long");
    assert!(err.field("title").is_some());
}

#[test]
fn title_limit_counts_characters_not_bytes() {
    let title = "é".repeat(TITLE_MAX_CHARS);
    assert!(validate_create(CreateTodoRequest::new(title, None)).is_ok());
}

#[test]
fn reports_every_offending_field() {
    let err = validate_create(CreateTodoRequest {
        title: None,
        description: Some("d".repeat(DESCRIPTION_MAX_CHARS + 1)),
    })
    .expect_err("invalid");
    assert!(err.field("title").is_some());
    assert!(err.field("description").is_some());
}

#[test]
fn update_allows_absent_title_but_not_blank_one() {
    let changes = validate_update(UpdateTodoRequest::completed(true)).expect("valid");
    assert_eq!(changes.title, None);
    assert_eq!(changes.completed, Some(true));

    let err = validate_update(UpdateTodoRequest::title(" ")).expect_err("blank title");
    assert!(err.field("title").is_some());
}

#[test]
fn update_rejects_explicit_null_title_and_completed() {
    let err = validate_update(UpdateTodoRequest {
        title: Some(None),
        completed: Some(None),
        ..UpdateTodoRequest::default()
    })
    .expect_err("nulls");
    assert_eq!(
        err.field("title"),
        Some(&["the title field is required".to_string()][..])
    );
    assert_eq!(
        err.field("completed"),
        Some(&["the completed field must be true or false".to_string()][..])
    );
}

#[test]
fn update_applies_length_limits() {
    let err = validate_update(UpdateTodoRequest::title("a".repeat(TITLE_MAX_CHARS + 1)))
        .expect_err("long title");
    assert!(err.field("title").is_some());

    let err = validate_update(UpdateTodoRequest {
        description: Some(Some("d".repeat(DESCRIPTION_MAX_CHARS + 1))),
        ..UpdateTodoRequest::default()
    })
    .expect_err("long description");
    assert!(err.field("description").is_some());
}

#[test]
fn update_passes_description_clear_through() {
    let changes = validate_update(UpdateTodoRequest {
        description: Some(None),
        ..UpdateTodoRequest::default()
    })
    .expect("valid");
    assert_eq!(changes.description, Some(None));
}
