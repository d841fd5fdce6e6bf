use anyhow::Result;
use chrono::Utc;
use rand::{seq::SliceRandom, Rng};
use shared::domain::{NewTodo, Todo};

use crate::TodoRepository;

pub const DEFAULT_RANDOM_TODOS: usize = 6;

const SAMPLES: [(&str, &str, bool); 4] = [
    (
        "Welcome to your Todo App!",
        "This is a sample todo item. You can add, complete, and delete todos.",
        false,
    ),
    (
        "Learn Rust",
        "Explore the language and build reliable applications.",
        false,
    ),
    (
        "Set up development environment",
        "Install all necessary tools and dependencies for development.",
        true,
    ),
    (
        "Plan project architecture",
        "Design the overall structure and components of the application.",
        true,
    ),
];

const VERBS: [&str; 8] = [
    "Review", "Write", "Refactor", "Test", "Document", "Ship", "Fix", "Sketch",
];
const OBJECTS: [&str; 8] = [
    "the release notes",
    "the login form",
    "the weekly report",
    "the storage layer",
    "the onboarding guide",
    "the flaky test",
    "the landing page",
    "the budget",
];

pub fn sample_todos() -> Vec<NewTodo> {
    SAMPLES
        .iter()
        .map(|(title, description, completed)| NewTodo {
            title: (*title).to_string(),
            description: Some((*description).to_string()),
            completed: *completed,
        })
        .collect()
}

pub fn random_todos(count: usize) -> Vec<NewTodo> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let verb = VERBS.choose(&mut rng).copied().unwrap_or("Review");
            let object = OBJECTS.choose(&mut rng).copied().unwrap_or("the backlog");
            let description = rng
                .gen_bool(0.5)
                .then(|| format!("{verb} {object} before the end of the week."));
            NewTodo {
                title: format!("{verb} {object}"),
                description,
                completed: rng.gen_bool(0.5),
            }
        })
        .collect()
}

/// Inserts the fixed samples followed by `random` generated todos.
pub async fn seed(repo: &dyn TodoRepository, random: usize) -> Result<Vec<Todo>> {
    let mut batch = sample_todos();
    batch.extend(random_todos(random));

    let mut inserted = Vec::with_capacity(batch.len());
    for todo in &batch {
        inserted.push(repo.insert_todo(todo, Utc::now()).await?);
    }
    Ok(inserted)
}
