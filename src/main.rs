pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod validation;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use config::{Config, LegacyPaths};
use error::AppError;
use models::Todo;
use repository::{InMemoryTodoRepository, TodoRepository};
use tokio::net::TcpListener;
use tower::Layer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use validation::Valid;

// === App State ===
#[derive(Clone)]
struct AppState {
    todos: Arc<dyn TodoRepository>,
}
impl AppState {
    fn new(todos: impl TodoRepository) -> Self {
        Self {
            todos: Arc::new(todos),
        }
    }

    fn from_config(config: &Config) -> Self {
        let todos = if config.seed {
            InMemoryTodoRepository::with_todos(Todo::seed(Utc::now()))
        } else {
            InMemoryTodoRepository::new()
        };
        Self::new(todos)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "todo_api=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let app = app(AppState::from_config(&config), config.legacy_paths);

    let listener = TcpListener::bind(config.addr()).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for ctrl-c");
    }
    tracing::info!("shutting down");
}

// Requests pass, in order: request logging, legacy path handling, routing.
// The legacy rule has to sit in front of the router so a rewritten path is
// routed normally, hence the outer router that only has a fallback.
fn app(state: AppState, legacy: LegacyPaths) -> Router {
    let routes = Router::new()
        // `GET /` goes to `root`
        .route("/", get(root))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/:id", get(get_todo).delete(delete_todo))
        .with_state(state);
    let routes = axum::middleware::from_fn_with_state(legacy, middleware::legacy_paths).layer(routes);

    Router::new()
        .fallback_service(routes)
        .layer(axum::middleware::from_fn(middleware::log_requests))
}

// === Routes ===
// basic handler that responds with a static string
async fn root() -> &'static str {
    "Hello World!"
}

async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = state.todos.list_all().await?;
    tracing::debug!(count = todos.len(), "listed todos");
    Ok(Json(todos))
}

async fn create_todo(
    State(state): State<AppState>,
    Valid(todo): Valid<Todo>,
) -> Result<Response, AppError> {
    let location = todo.location();
    state.todos.add(todo.clone()).await?;
    tracing::debug!(id = todo.id, "created todo");
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(todo)).into_response())
}

async fn get_todo(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    match state.todos.get_by_id(id).await? {
        Some(todo) => Ok(Json(todo).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

async fn delete_todo(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    let removed = state.todos.delete_by_id(id).await?;
    tracing::debug!(id, removed, "deleted todos");
    Ok(StatusCode::NO_CONTENT)
}
