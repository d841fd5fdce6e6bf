use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::domain::{NewTodo, Todo, TodoChanges, TodoId};

pub mod seed;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/todos.db";

const TODO_COLUMNS: &str = "id, title, description, completed, created_at, updated_at";

/// Persistence primitives the todo service needs: ordered select, insert,
/// partial update and delete by key.
///
/// Missing rows are reported as `None` / `false`, never as errors.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// All todos, newest created first.
    async fn list_todos(&self) -> Result<Vec<Todo>>;

    async fn load_todo(&self, id: TodoId) -> Result<Option<Todo>>;

    /// Inserts `todo` with both timestamps set to `now`.
    async fn insert_todo(&self, todo: &NewTodo, now: DateTime<Utc>) -> Result<Todo>;

    /// Overwrites only the columns present in `changes` and sets `updated_at`
    /// to `now`, in a single statement.
    async fn update_todo(
        &self,
        id: TodoId,
        changes: &TodoChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Todo>>;

    /// Returns whether a row was removed.
    async fn delete_todo(&self, id: TodoId) -> Result<bool>;

    async fn health_check(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn count_todos(&self) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM todos")
            .fetch_one(&self.pool)
            .await
            .context("failed to count todos")?;
        Ok(count)
    }
}

#[async_trait]
impl TodoRepository for Storage {
    async fn list_todos(&self) -> Result<Vec<Todo>> {
        let rows = sqlx::query(&format!(
            "SELECT {TODO_COLUMNS} FROM todos ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .context("failed to list todos")?;
        rows.iter().map(todo_from_row).collect()
    }

    async fn load_todo(&self, id: TodoId) -> Result<Option<Todo>> {
        let row = sqlx::query(&format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to load todo {id}"))?;
        row.as_ref().map(todo_from_row).transpose()
    }

    async fn insert_todo(&self, todo: &NewTodo, now: DateTime<Utc>) -> Result<Todo> {
        let row = sqlx::query(&format!(
            "INSERT INTO todos (title, description, completed, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING {TODO_COLUMNS}"
        ))
        .bind(&todo.title)
        .bind(todo.description.as_deref())
        .bind(todo.completed)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .context("failed to insert todo")?;
        todo_from_row(&row)
    }

    async fn update_todo(
        &self,
        id: TodoId,
        changes: &TodoChanges,
        now: DateTime<Utc>,
    ) -> Result<Option<Todo>> {
        let (set_description, description) = match &changes.description {
            Some(value) => (true, value.as_deref()),
            None => (false, None),
        };
        let row = sqlx::query(&format!(
            "UPDATE todos
             SET title = COALESCE(?, title),
                 description = CASE WHEN ? THEN ? ELSE description END,
                 completed = COALESCE(?, completed),
                 updated_at = ?
             WHERE id = ?
             RETURNING {TODO_COLUMNS}"
        ))
        .bind(changes.title.as_deref())
        .bind(set_description)
        .bind(description)
        .bind(changes.completed)
        .bind(now)
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to update todo {id}"))?;
        row.as_ref().map(todo_from_row).transpose()
    }

    async fn delete_todo(&self, id: TodoId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete todo {id}"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }
}

fn todo_from_row(row: &SqliteRow) -> Result<Todo> {
    Ok(Todo {
        id: TodoId(row.try_get::<i64, _>("id")?),
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        completed: row.try_get("completed")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

/// Normalizes `raw_database_url` and creates the parent directory of an
/// on-disk database.
pub fn prepare_database_url(raw_database_url: &str) -> Result<String> {
    let database_url = normalize_database_url(raw_database_url);
    ensure_sqlite_parent_dir_exists(&database_url)?;
    Ok(database_url)
}

/// Accepts plain file paths (including Windows ones) as well as sqlite urls.
/// A blank value falls back to [`DEFAULT_DATABASE_URL`].
pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return DEFAULT_DATABASE_URL.to_string();
    }

    if raw_database_url.starts_with("sqlite::memory:") {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite://") {
        if has_windows_drive(path) {
            return format!("sqlite:{}", path.replace('\\', "/"));
        }
        return raw_database_url.to_string();
    }

    if raw_database_url.contains("://") {
        return raw_database_url.to_string();
    }

    let path = raw_database_url
        .strip_prefix("sqlite:")
        .unwrap_or(raw_database_url)
        .replace('\\', "/");
    if has_windows_drive(&path) {
        // `sqlite://C:/...` would parse the drive letter as a host.
        return format!("sqlite:{path}");
    }
    format!("sqlite://{path}")
}

fn has_windows_drive(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
