use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest accepted title, in characters, after trimming.
pub const TITLE_MAX_CHARS: usize = 255;
/// Longest accepted description, in characters.
pub const DESCRIPTION_MAX_CHARS: usize = 2000;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(TodoId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    /// `None` means no description was given; `Some("")` is kept as-is.
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields to persist for a new todo. Ids and timestamps are assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

impl NewTodo {
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
            completed: false,
        }
    }
}

/// A validated partial update. `None` leaves the stored column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Option<String>,
    /// Outer `None`: keep. `Some(None)`: clear. `Some(Some(_))`: replace.
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
}
