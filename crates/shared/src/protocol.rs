use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{Todo, TodoId};

pub fn index_route() -> &'static str {
    "/"
}

pub fn todos_route() -> &'static str {
    "/todos"
}

pub fn todo_route(id: impl std::fmt::Display) -> String {
    format!("/todos/{id}")
}

/// Body of `POST /todos`.
///
/// `title` is optional at the wire level so a missing title is reported as a
/// validation failure on that field rather than a body parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateTodoRequest {
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: Some(title.into()),
            description,
        }
    }
}

/// Body of `PATCH /todos/{id}`. Only the keys present in the body are applied.
///
/// Every field is `Option<Option<_>>`: the outer `None` means the key was
/// absent, `Some(None)` an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<Option<String>>,
    /// `null` clears the description.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed: Option<Option<bool>>,
}

impl UpdateTodoRequest {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(Some(completed)),
            ..Self::default()
        }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(Some(title.into())),
            ..Self::default()
        }
    }
}

// Only called when the key exists, so an explicit `null` becomes `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

/// Full state delivered on page load and after every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPage {
    pub todos: Vec<Todo>,
    pub stats: TodoStats,
}

impl TodoPage {
    pub fn new(todos: Vec<Todo>) -> Self {
        let completed = todos.iter().filter(|todo| todo.completed).count();
        let stats = TodoStats {
            total: todos.len(),
            pending: todos.len() - completed,
            completed,
        };
        Self { todos, stats }
    }

    pub fn find(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn pending(&self) -> impl Iterator<Item = &Todo> {
        self.todos.iter().filter(|todo| !todo.completed)
    }

    pub fn completed(&self) -> impl Iterator<Item = &Todo> {
        self.todos.iter().filter(|todo| todo.completed)
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
