use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::Todo;

/// Storage capability the HTTP layer talks to.
///
/// Ids are caller-supplied and not required to be unique, so lookups return
/// the first match and deletes remove every match.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    /// Every stored todo, in insertion order.
    async fn list_all(&self) -> Result<Vec<Todo>>;
    /// The first todo with `id`, if any.
    async fn get_by_id(&self, id: i32) -> Result<Option<Todo>>;
    /// Appends `todo` without checking for duplicates.
    async fn add(&self, todo: Todo) -> Result<()>;
    /// Removes every todo with `id` and returns how many went away.
    async fn delete_by_id(&self, id: i32) -> Result<usize>;
    async fn len(&self) -> Result<usize>;
}

#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    todos: RwLock<Vec<Todo>>,
}
impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        Self {
            todos: RwLock::new(todos),
        }
    }

    // borrow immutable state
    async fn read(&self) -> RwLockReadGuard<'_, Vec<Todo>> {
        self.todos.read().await
    }
    // borrow mutable state
    async fn write(&self) -> RwLockWriteGuard<'_, Vec<Todo>> {
        self.todos.write().await
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn list_all(&self) -> Result<Vec<Todo>> {
        Ok(self.read().await.clone())
    }

    async fn get_by_id(&self, id: i32) -> Result<Option<Todo>> {
        let todos = self.read().await;
        Ok(todos.iter().find(|todo| todo.id == id).cloned())
    }

    async fn add(&self, todo: Todo) -> Result<()> {
        self.write().await.push(todo);
        Ok(())
    }

    async fn delete_by_id(&self, id: i32) -> Result<usize> {
        let mut todos = self.write().await;
        let before = todos.len();
        todos.retain(|todo| todo.id != id);
        Ok(before - todos.len())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.read().await.len())
    }
}
