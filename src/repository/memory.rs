use async_trait::async_trait;
use tokio::sync::RwLock;

use super::TodoRepository;
use crate::model::{NewTodo, Todo, TodoChanges};

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Todo>,
    last_id: i32,
}

/// Keeps the `todos` table in process memory.
///
/// Rows stay sorted by id because ids only grow. Deleted ids are never handed
/// out again, matching a serial column.
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    table: RwLock<Table>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn list(&self) -> Result<Vec<Todo>, sqlx::Error> {
        Ok(self.table.read().await.rows.clone())
    }

    async fn create(&self, todo: NewTodo) -> Result<Todo, sqlx::Error> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let todo = Todo {
            id: table.last_id,
            title: todo.title,
            completed: todo.completed,
        };
        table.rows.push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: i32, changes: TodoChanges) -> Result<Option<Todo>, sqlx::Error> {
        let mut table = self.table.write().await;
        Ok(table.rows.iter_mut().find(|todo| todo.id == id).map(|todo| {
            changes.apply(todo);
            todo.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<Option<Todo>, sqlx::Error> {
        let mut table = self.table.write().await;
        let index = table.rows.iter().position(|todo| todo.id == id);
        Ok(index.map(|index| table.rows.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_todo(title: &str) -> NewTodo {
        NewTodo {
            title: title.to_string(),
            completed: false,
        }
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let repo = InMemoryTodoRepository::new();
        let first = repo.create(new_todo("a")).await.unwrap();
        repo.delete(first.id).await.unwrap();

        let second = repo.create(new_todo("b")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn update_applies_only_supplied_fields() {
        let repo = InMemoryTodoRepository::new();
        let todo = repo.create(new_todo("Buy milk")).await.unwrap();

        let updated = repo
            .update(
                todo.id,
                TodoChanges {
                    title: None,
                    completed: Some(true),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "Buy milk");
        assert!(updated.completed);
    }

    #[tokio::test]
    async fn update_and_delete_of_unknown_id_return_none() {
        let repo = InMemoryTodoRepository::new();

        assert!(repo.update(7, TodoChanges::default()).await.unwrap().is_none());
        assert!(repo.delete(7).await.unwrap().is_none());
        assert!(repo.is_empty().await);
    }
}
