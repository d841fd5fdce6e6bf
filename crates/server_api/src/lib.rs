use std::sync::Arc;

use chrono::Utc;
use shared::{
    domain::{Todo, TodoId},
    error::{ApiError, ErrorCode},
    protocol::{CreateTodoRequest, TodoPage, UpdateTodoRequest},
};
use storage::TodoRepository;
use tracing::{debug, error, info};

pub mod validation;

use validation::{validate_create, validate_update};

/// Handle to the todo store shared by every request.
#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<dyn TodoRepository>,
}

impl ApiContext {
    pub fn new(store: impl TodoRepository + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

pub async fn list_todos(ctx: &ApiContext) -> Result<Vec<Todo>, ApiError> {
    ctx.store.list_todos().await.map_err(internal)
}

/// Builds the payload returned on page load and after every mutation.
pub async fn render_page(ctx: &ApiContext) -> Result<TodoPage, ApiError> {
    Ok(TodoPage::new(list_todos(ctx).await?))
}

pub async fn create_todo(ctx: &ApiContext, req: CreateTodoRequest) -> Result<Todo, ApiError> {
    let new_todo = validate_create(req).inspect_err(|err| {
        debug!(fields = ?err.fields, "rejected todo creation");
    })?;
    let todo = ctx
        .store
        .insert_todo(&new_todo, Utc::now())
        .await
        .map_err(internal)?;
    info!(todo_id = %todo.id, "todo created");
    Ok(todo)
}

pub async fn update_todo(
    ctx: &ApiContext,
    id: TodoId,
    req: UpdateTodoRequest,
) -> Result<Todo, ApiError> {
    ensure_exists(ctx, id).await?;
    let changes = validate_update(req).inspect_err(|err| {
        debug!(todo_id = %id, fields = ?err.fields, "rejected todo update");
    })?;
    let todo = ctx
        .store
        .update_todo(id, &changes, Utc::now())
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::todo_not_found(id))?;
    info!(todo_id = %id, completed = todo.completed, "todo updated");
    Ok(todo)
}

pub async fn delete_todo(ctx: &ApiContext, id: TodoId) -> Result<(), ApiError> {
    let removed = ctx.store.delete_todo(id).await.map_err(internal)?;
    if !removed {
        return Err(ApiError::todo_not_found(id));
    }
    info!(todo_id = %id, "todo deleted");
    Ok(())
}

pub async fn health_check(ctx: &ApiContext) -> Result<(), ApiError> {
    ctx.store.health_check().await.map_err(|err| {
        error!(error = %format!("{err:#}"), "store health check failed");
        ApiError::new(ErrorCode::Unavailable, "store unavailable")
    })
}

// Unknown ids are reported before the body is validated.
async fn ensure_exists(ctx: &ApiContext, id: TodoId) -> Result<(), ApiError> {
    ctx.store
        .load_todo(id)
        .await
        .map_err(internal)?
        .map(|_| ())
        .ok_or_else(|| ApiError::todo_not_found(id))
}

fn internal(err: anyhow::Error) -> ApiError {
    error!(error = %format!("{err:#}"), "todo store operation failed");
    ApiError::new(ErrorCode::Internal, "internal server error")
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
