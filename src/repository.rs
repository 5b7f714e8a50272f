//! Access to the `todos` table.
//!
//! Handlers only see the [`TodoRepository`] trait. [`PgTodoRepository`] talks to
//! Postgres through a shared `PgPool`; [`memory::InMemoryTodoRepository`] stands in
//! for it when the router is driven in-process.

pub mod memory;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, query, query_as, PgPool};

use crate::{
    config::Config,
    model::{NewTodo, Todo, TodoChanges},
};

const MAX_CONNECTIONS: u32 = 10;

#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    /// All todos, ascending by id.
    async fn list(&self) -> Result<Vec<Todo>, sqlx::Error>;

    async fn create(&self, todo: NewTodo) -> Result<Todo, sqlx::Error>;

    /// Returns `None` when no row has this id.
    async fn update(&self, id: i32, changes: TodoChanges) -> Result<Option<Todo>, sqlx::Error>;

    /// Removes the row and returns it as it was, or `None` when no row has this id.
    async fn delete(&self, id: i32) -> Result<Option<Todo>, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct PgTodoRepository {
    pool: PgPool,
}

impl PgTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn list(&self) -> Result<Vec<Todo>, sqlx::Error> {
        query_as::<_, Todo>("SELECT id, title, completed FROM todos ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    async fn create(&self, todo: NewTodo) -> Result<Todo, sqlx::Error> {
        query_as::<_, Todo>(
            "INSERT INTO todos (title, completed) VALUES ($1, $2) RETURNING id, title, completed",
        )
        .bind(todo.title)
        .bind(todo.completed)
        .fetch_one(&self.pool)
        .await
    }

    async fn update(&self, id: i32, changes: TodoChanges) -> Result<Option<Todo>, sqlx::Error> {
        query_as::<_, Todo>(
            "UPDATE todos SET title = COALESCE($1, title), completed = COALESCE($2, completed) \
             WHERE id = $3 RETURNING id, title, completed",
        )
        .bind(changes.title)
        .bind(changes.completed)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete(&self, id: i32) -> Result<Option<Todo>, sqlx::Error> {
        query_as::<_, Todo>("DELETE FROM todos WHERE id = $1 RETURNING id, title, completed")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }
}

/// Opens the shared connection pool described by `config`.
pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(config.connect_options())
        .await
}

/// Creates the `todos` table if it doesn't exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    query(
        r#"CREATE TABLE IF NOT EXISTS todos (
        id SERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        completed BOOLEAN NOT NULL DEFAULT FALSE
    );"#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
