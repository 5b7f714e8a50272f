use axum::http::{header::CONTENT_TYPE, HeaderMap};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};

use crate::{
    error::{ApiError, COMPLETED_NOT_BOOLEAN, TITLE_EMPTY, TITLE_REQUIRED},
    model::{NewTodo, TodoChanges},
};

// Struct representing the request body for creating a new Todo
#[derive(Debug, Default, serde::Deserialize)]
pub struct CreateTodoSchema {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

// Struct representing the request body for updating a Todo.
// Outer `None` means the key was absent, `Some(None)` means an explicit null.
#[derive(Debug, Default, serde::Deserialize)]
pub struct UpdateTodoSchema {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub completed: Option<Option<bool>>,
}

fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Decodes a request body the way a lenient JSON body parser does: a body that
/// is empty or not declared as JSON reads as `{}`.
pub fn parse_body<T>(headers: &HeaderMap, body: &[u8]) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if !is_json(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(body)
        .map_err(|err| ApiError::validation(format!("Invalid JSON body: {err}")))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

fn is_blank(title: &str) -> bool {
    title.trim().is_empty()
}

impl CreateTodoSchema {
    pub fn validate(self) -> Result<NewTodo, ApiError> {
        match self.title {
            Some(title) if !is_blank(&title) => Ok(NewTodo {
                title,
                completed: self.completed.unwrap_or(false),
            }),
            _ => Err(ApiError::validation(TITLE_REQUIRED)),
        }
    }
}

impl UpdateTodoSchema {
    pub fn validate(self) -> Result<TodoChanges, ApiError> {
        let title = match self.title {
            None => None,
            Some(Some(title)) if !is_blank(&title) => Some(title),
            Some(_) => return Err(ApiError::validation(TITLE_EMPTY)),
        };
        let completed = match self.completed {
            None => None,
            Some(Some(completed)) => Some(completed),
            Some(None) => return Err(ApiError::validation(COMPLETED_NOT_BOOLEAN)),
        };

        Ok(TodoChanges { title, completed })
    }
}
