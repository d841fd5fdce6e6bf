use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use server_api::{create_todo, delete_todo, health_check, render_page, update_todo};
use shared::{
    domain::TodoId,
    error::{ApiError, ErrorCode},
    protocol::{CreateTodoRequest, TodoPage, UpdateTodoRequest},
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::app_state::AppState;

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

pub fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/todos", post(store))
        .route("/todos/:id", patch(update).delete(destroy))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> ApiResult<&'static str> {
    health_check(&state.api).await.map_err(reject)?;
    Ok("ok")
}

async fn index(State(state): State<Arc<AppState>>) -> ApiResult<Json<TodoPage>> {
    page(&state).await
}

async fn store(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTodoRequest>,
) -> ApiResult<Json<TodoPage>> {
    create_todo(&state.api, req).await.map_err(reject)?;
    page(&state).await
}

async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTodoRequest>,
) -> ApiResult<Json<TodoPage>> {
    update_todo(&state.api, TodoId(id), req)
        .await
        .map_err(reject)?;
    page(&state).await
}

async fn destroy(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TodoPage>> {
    delete_todo(&state.api, TodoId(id)).await.map_err(reject)?;
    page(&state).await
}

// Every route answers with the freshly listed collection.
async fn page(state: &AppState) -> ApiResult<Json<TodoPage>> {
    render_page(&state.api).await.map(Json).map_err(reject)
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err))
}
