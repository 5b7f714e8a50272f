//! HTTP CRUD service for todo items backed by a Postgres `todos` table.
//!
//! Startup is split in two: [`create_router`] builds the request handler
//! around an injected [`TodoRepository`], and [`serve`] binds the listener.
//! Tests only need the first.

pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod model;
pub mod repository;
pub mod route;
pub mod schema;
pub mod server;
pub mod telemetry;

use std::sync::Arc;

pub use config::Config;
pub use repository::TodoRepository;
pub use route::create_router;
pub use server::{run, serve};

// Struct representing the application state
pub struct AppState {
    pub repo: Arc<dyn TodoRepository>,
}

impl AppState {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self { repo }
    }
}
