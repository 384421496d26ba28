//! Typed request and response shapes for the task-manager API.
//!
//! # Design
//! Field names are English on the Rust side and mapped to the backend's
//! wire names with serde renames. All fields are owned so values move
//! freely between threads. The pipeline decodes responses into these types
//! at its boundary; a body that does not match is classified as an unknown
//! error rather than flowing further.

use serde::{Deserialize, Serialize};

/// Registration payload. Validated client-side before dispatch: every field
/// must be non-empty and the two passwords must match.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterUser {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "senha")]
    pub password: String,
    #[serde(rename = "confirmaSenha")]
    pub confirm_password: String,
}

/// The authenticated user's profile as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "dataCriacao")]
    pub created_at: String,
    #[serde(rename = "ativo")]
    pub active: bool,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(rename = "statusEmoji", default, skip_serializing_if = "Option::is_none")]
    pub status_emoji: Option<String>,
}

/// Partial profile update; omitted fields are left unchanged server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateProfile {
    #[serde(rename = "nome", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Password-change payload. New password and confirmation must match;
/// checked client-side before dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct ChangePassword {
    #[serde(rename = "senhaAtual")]
    pub current_password: String,
    #[serde(rename = "novaSenha")]
    pub new_password: String,
    #[serde(rename = "confirmaSenha")]
    pub confirm_password: String,
}

/// A task as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "statusId")]
    pub status_id: i64,
    #[serde(rename = "statusTexto", default)]
    pub status_text: Option<String>,
    #[serde(rename = "prioridadeId")]
    pub priority_id: i64,
    #[serde(rename = "prazo", default)]
    pub due_date: Option<String>,
    #[serde(rename = "dataConclusao", default)]
    pub completed_at: Option<String>,
    #[serde(rename = "categoriaId", default)]
    pub category_id: Option<i64>,
    #[serde(rename = "categoriaNome", default)]
    pub category_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateTask {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "statusId")]
    pub status_id: i64,
    #[serde(rename = "prioridadeId")]
    pub priority_id: i64,
    #[serde(rename = "prazo", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(rename = "categoriaId", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

/// Partial task update; omitted fields are left unchanged server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateTask {
    #[serde(rename = "titulo", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "statusId", skip_serializing_if = "Option::is_none")]
    pub status_id: Option<i64>,
    #[serde(rename = "prioridadeId", skip_serializing_if = "Option::is_none")]
    pub priority_id: Option<i64>,
    #[serde(rename = "prazo", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(rename = "categoriaId", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

/// One page of tasks from a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPage {
    pub items: Vec<Task>,
    #[serde(rename = "currentPage")]
    pub current_page: u32,
    #[serde(rename = "totalItems")]
    pub total_items: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

/// Aggregate counters for the home screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: u64,
    #[serde(rename = "concluidas")]
    pub completed: u64,
    #[serde(rename = "emAndamento")]
    pub in_progress: u64,
    #[serde(rename = "comPrazo")]
    pub with_due_date: u64,
}

/// Optional criteria for the filtered task listing. `None` fields are not
/// sent as query parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFilter {
    pub status_id: Option<i64>,
    pub priority_id: Option<i64>,
    pub category_id: Option<i64>,
}

/// Body for bulk task lifecycle operations.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct BulkTaskIds {
    #[serde(rename = "tarefasId")]
    pub task_ids: Vec<i64>,
}

/// A task category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CategoryName<'a> {
    #[serde(rename = "nome")]
    pub name: &'a str,
}
