use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use shared::{
    domain::TodoId,
    error::{ApiError, ErrorCode},
    protocol::{index_route, todo_route, todos_route, CreateTodoRequest, TodoPage, UpdateTodoRequest},
};
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with an error envelope (validation, not found, ...).
    #[error("{}", .0.message)]
    Api(ApiError),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid server url: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// HTTP client for the todo service. Every call returns the full page the
/// server re-rendered after the request.
#[derive(Clone)]
pub struct TodoClient {
    http: Client,
    server_url: Url,
}

impl TodoClient {
    pub fn new(server_url: &str) -> Result<Self> {
        Ok(Self::with_http(Client::new(), Url::parse(server_url)?))
    }

    pub fn with_http(http: Client, server_url: Url) -> Self {
        Self { http, server_url }
    }

    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    pub async fn page(&self) -> Result<TodoPage> {
        self.send(self.request(Method::GET, index_route())?).await
    }

    /// Trims the title and drops a blank description before sending.
    pub async fn create(&self, title: &str, description: Option<&str>) -> Result<TodoPage> {
        let description = description
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);
        let body = CreateTodoRequest::new(title.trim(), description);
        self.send_json(Method::POST, todos_route(), &body).await
    }

    pub async fn update(&self, id: TodoId, changes: &UpdateTodoRequest) -> Result<TodoPage> {
        self.send_json(Method::PATCH, &todo_route(id), changes).await
    }

    pub async fn set_completed(&self, id: TodoId, completed: bool) -> Result<TodoPage> {
        self.update(id, &UpdateTodoRequest::completed(completed))
            .await
    }

    /// Flips completion based on the current server state.
    pub async fn toggle(&self, id: TodoId) -> Result<TodoPage> {
        let current = self.page().await?;
        let todo = current
            .find(id)
            .ok_or_else(|| ClientError::Api(ApiError::todo_not_found(id)))?;
        self.set_completed(id, !todo.completed).await
    }

    pub async fn delete(&self, id: TodoId) -> Result<TodoPage> {
        self.send(self.request(Method::DELETE, &todo_route(id))?)
            .await
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.server_url.join(path)?;
        debug!(%method, %url, "todo request");
        Ok(self.http.request(method, url))
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<TodoPage> {
        self.send(self.request(method, path)?.json(body)).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<TodoPage> {
        let res = request.send().await?;
        if res.status().is_success() {
            return Ok(res.json().await?);
        }
        Err(ClientError::Api(error_from_response(res).await))
    }
}

async fn error_from_response(res: Response) -> ApiError {
    let status = res.status();
    let fallback_message = status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_ascii_lowercase();
    match res.json::<ApiError>().await {
        Ok(err) => err,
        Err(_) => ApiError::new(code_for_status(status), fallback_message),
    }
}

fn code_for_status(status: StatusCode) -> ErrorCode {
    match status {
        StatusCode::NOT_FOUND => ErrorCode::NotFound,
        StatusCode::UNPROCESSABLE_ENTITY
        | StatusCode::BAD_REQUEST
        | StatusCode::PAYLOAD_TOO_LARGE
        | StatusCode::UNSUPPORTED_MEDIA_TYPE => ErrorCode::Validation,
        StatusCode::SERVICE_UNAVAILABLE => ErrorCode::Unavailable,
        _ => ErrorCode::Internal,
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
