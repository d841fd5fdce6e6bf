use shared::{
    domain::{NewTodo, TodoChanges, DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS},
    error::{ApiError, FieldErrors},
    protocol::{CreateTodoRequest, UpdateTodoRequest},
};

pub fn validate_create(req: CreateTodoRequest) -> Result<NewTodo, ApiError> {
    let mut errors = FieldErrors::new();

    let title = check_title(req.title.as_deref(), &mut errors);
    if let Some(description) = req.description.as_deref() {
        check_description(description, &mut errors);
    }

    match title {
        Some(title) if errors.is_empty() => Ok(NewTodo::new(title, req.description)),
        _ => Err(ApiError::validation(errors)),
    }
}

pub fn validate_update(req: UpdateTodoRequest) -> Result<TodoChanges, ApiError> {
    let mut errors = FieldErrors::new();

    let title = match req.title.as_ref() {
        Some(raw) => check_title(raw.as_deref(), &mut errors),
        None => None,
    };
    if let Some(Some(description)) = req.description.as_ref() {
        check_description(description, &mut errors);
    }
    let completed = match req.completed {
        Some(None) => {
            push(&mut errors, "completed", "the completed field must be true or false");
            None
        }
        Some(value) => value,
        None => None,
    };

    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }
    Ok(TodoChanges {
        title,
        description: req.description,
        completed,
    })
}

/// Returns the trimmed title when it is acceptable.
fn check_title(raw: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
    let title = raw.map(str::trim).unwrap_or_default();
    if title.is_empty() {
        push(errors, "title", "the title field is required");
        return None;
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        push(
            errors,
            "title",
            format!("the title field must not be greater than {TITLE_MAX_CHARS} characters"),
        );
        return None;
    }
    Some(title.to_string())
}

fn check_description(description: &str, errors: &mut FieldErrors) {
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        push(
            errors,
            "description",
            format!(
                "the description field must not be greater than {DESCRIPTION_MAX_CHARS} characters"
            ),
        );
    }
}

fn push(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.into());
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
