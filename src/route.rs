use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::{handler::*, middleware::apply_layers, AppState};

/// Builds the full request handler. Does no I/O, so it can be driven
/// in-process with `tower::ServiceExt::oneshot`.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let app = Router::new()
        .route("/health", get(health_checker_handler))
        .route("/api/todos", get(get_todos).post(create_todo))
        .route("/api/todos/:id", put(update_todo).delete(delete_todo))
        .with_state(app_state);
    apply_layers(app)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        model::{NewTodo, Todo, TodoChanges},
        repository::{memory::InMemoryTodoRepository, TodoRepository},
    };

    // Every call fails the way a dropped connection pool would
    struct BrokenRepository;

    #[async_trait]
    impl TodoRepository for BrokenRepository {
        async fn list(&self) -> Result<Vec<Todo>, sqlx::Error> {
            Err(sqlx::Error::PoolClosed)
        }

        async fn create(&self, _todo: NewTodo) -> Result<Todo, sqlx::Error> {
            Err(sqlx::Error::PoolClosed)
        }

        async fn update(&self, _id: i32, _changes: TodoChanges) -> Result<Option<Todo>, sqlx::Error> {
            Err(sqlx::Error::PoolClosed)
        }

        async fn delete(&self, _id: i32) -> Result<Option<Todo>, sqlx::Error> {
            Err(sqlx::Error::PoolClosed)
        }
    }

    fn app_with(repo: Arc<dyn TodoRepository>) -> Router {
        create_router(Arc::new(AppState::new(repo)))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_fixed_payload() {
        let app = app_with(Arc::new(InMemoryTodoRepository::new()));

        let response = send(&app, Method::GET, "/health", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "status": "healthy", "version": "1.0.0" })
        );
    }

    #[tokio::test]
    async fn create_rejects_blank_title_without_persisting() {
        let repo = Arc::new(InMemoryTodoRepository::new());
        let app = app_with(repo.clone());

        let response = send(&app, Method::POST, "/api/todos", Some(json!({ "title": "   " }))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Title is required and cannot be empty" })
        );
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn malformed_json_is_a_400_with_error_body() {
        let app = app_with(Arc::new(InMemoryTodoRepository::new()));

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/todos")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn non_integer_id_is_a_400() {
        let app = app_with(Arc::new(InMemoryTodoRepository::new()));

        let response = send(&app, Method::DELETE, "/api/todos/abc", None).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "error": "Invalid todo id" }));
    }

    #[tokio::test]
    async fn update_with_empty_title_leaves_row_untouched() {
        let repo = Arc::new(InMemoryTodoRepository::new());
        let app = app_with(repo.clone());
        send(&app, Method::POST, "/api/todos", Some(json!({ "title": "Buy milk" }))).await;

        let response = send(
            &app,
            Method::PUT,
            "/api/todos/1",
            Some(json!({ "title": "", "completed": true })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "error": "Title cannot be empty" }));
        let todos = repo.list().await.unwrap();
        assert_eq!(todos[0].title, "Buy milk");
        assert!(!todos[0].completed);
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_404() {
        let app = app_with(Arc::new(InMemoryTodoRepository::new()));

        let response = send(&app, Method::PUT, "/api/todos/42", Some(json!({ "completed": true }))).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({ "error": "Todo not found" }));
    }

    #[tokio::test]
    async fn datastore_failures_become_500_on_every_endpoint() {
        let app = app_with(Arc::new(BrokenRepository));
        let expected = json!({ "error": sqlx::Error::PoolClosed.to_string() });

        let cases = [
            (Method::GET, "/api/todos", None),
            (Method::POST, "/api/todos", Some(json!({ "title": "x" }))),
            (Method::PUT, "/api/todos/1", Some(json!({ "completed": true }))),
            (Method::DELETE, "/api/todos/1", None),
        ];
        for (method, uri, body) in cases {
            let response = send(&app, method, uri, body).await;

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body_json(response).await, expected);
        }
    }

    #[tokio::test]
    async fn validation_runs_before_the_datastore() {
        let app = app_with(Arc::new(BrokenRepository));

        let response = send(&app, Method::POST, "/api/todos", Some(json!({}))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
