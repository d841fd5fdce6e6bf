use std::fmt::Write as _;

use chrono::{DateTime, Duration, Utc};
use shared::{domain::Todo, error::ApiError, protocol::TodoPage};

/// Renders the page the way the web view lays it out: stats first, then
/// pending and completed todos, each newest first.
pub fn render_page(page: &TodoPage, now: DateTime<Utc>) -> String {
    let mut out = format!(
        "{} total, {} pending, {} completed\n",
        page.stats.total, page.stats.pending, page.stats.completed
    );

    if page.todos.is_empty() {
        out.push_str("\nNo todos yet. Add one with `todo add <title>`.\n");
        return out;
    }

    render_section(&mut out, "Pending", page.pending(), now);
    render_section(&mut out, "Completed", page.completed(), now);
    out
}

fn render_section<'a>(
    out: &mut String,
    heading: &str,
    todos: impl Iterator<Item = &'a Todo>,
    now: DateTime<Utc>,
) {
    let mut todos = todos.peekable();
    if todos.peek().is_none() {
        return;
    }
    let _ = writeln!(out, "\n{heading}");
    for todo in todos {
        let mark = if todo.completed { 'x' } else { ' ' };
        let _ = writeln!(
            out,
            "  [{mark}] #{} {} ({})",
            todo.id,
            todo.title,
            humanize(now - todo.created_at)
        );
        if let Some(description) = todo.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "        {description}");
        }
    }
}

pub fn render_api_error(err: &ApiError) -> String {
    let mut out = err.message.clone();
    for (field, messages) in &err.fields {
        for message in messages {
            let _ = write!(out, "\n  {field}: {message}");
        }
    }
    out
}

fn humanize(age: Duration) -> String {
    let plural = |n: i64, unit: &str| {
        if n == 1 {
            format!("1 {unit} ago")
        } else {
            format!("{n} {unit}s ago")
        }
    };
    if age < Duration::minutes(1) {
        "just now".to_string()
    } else if age < Duration::hours(1) {
        plural(age.num_minutes(), "minute")
    } else if age < Duration::days(1) {
        plural(age.num_hours(), "hour")
    } else {
        plural(age.num_days(), "day")
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
