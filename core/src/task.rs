//! Task operations: listings, CRUD and the lifecycle transitions
//! (complete, reopen, archive, restore, delete), each a 1:1 wrap of one
//! pipeline call. Bulk variants forward an id list and nothing more.

use crate::client::{ApiClient, Request};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::{BulkTaskIds, CreateTask, Task, TaskFilter, TaskPage, TaskStats, UpdateTask};

impl ApiClient {
    /// One page of active tasks.
    pub fn list_tasks(&self, page: u32, size: u32) -> Result<TaskPage, ApiError> {
        let request = Request::new(HttpMethod::Get, "/tarefas/paginado")
            .query("page", page)
            .query("size", size);
        self.execute(request)
    }

    /// One page of archived tasks.
    pub fn archived_tasks(&self, page: u32, size: u32) -> Result<TaskPage, ApiError> {
        let request = Request::new(HttpMethod::Get, "/tarefas/arquivadas")
            .query("page", page)
            .query("size", size);
        self.execute(request)
    }

    /// Tasks matching the given criteria. Absent criteria are not sent.
    pub fn filter_tasks(
        &self,
        filter: &TaskFilter,
        page: u32,
        size: u32,
    ) -> Result<TaskPage, ApiError> {
        let request = Request::new(HttpMethod::Get, "/tarefas/filtrar")
            .query("page", page)
            .query("size", size)
            .query_opt("statusId", filter.status_id)
            .query_opt("prioridadeId", filter.priority_id)
            .query_opt("categoriaId", filter.category_id);
        self.execute(request)
    }

    /// Keyword search over task titles and descriptions.
    pub fn search_tasks(&self, keyword: &str, page: u32, size: u32) -> Result<TaskPage, ApiError> {
        let request = Request::new(HttpMethod::Get, "/tarefas/filtrar/palavra")
            .query("palavraChave", keyword)
            .query("page", page)
            .query("size", size);
        self.execute(request)
    }

    /// Aggregate task counters.
    pub fn task_stats(&self) -> Result<TaskStats, ApiError> {
        self.execute(Request::new(HttpMethod::Get, "/tarefas/estatisticas"))
    }

    pub fn get_task(&self, id: i64) -> Result<Task, ApiError> {
        self.execute(Request::new(HttpMethod::Get, format!("/tarefas/{id}")))
    }

    pub fn create_task(&self, input: &CreateTask) -> Result<Task, ApiError> {
        let request = Request::new(HttpMethod::Post, "/tarefas").json(input)?;
        self.execute(request)
    }

    pub fn update_task(&self, id: i64, input: &UpdateTask) -> Result<Task, ApiError> {
        let request = Request::new(HttpMethod::Put, format!("/tarefas/{id}")).json(input)?;
        self.execute(request)
    }

    /// Mark a task completed.
    pub fn complete_task(&self, id: i64) -> Result<Task, ApiError> {
        self.execute(Request::new(
            HttpMethod::Patch,
            format!("/tarefas/concluir/{id}"),
        ))
    }

    /// Reopen a completed task.
    pub fn reopen_task(&self, id: i64) -> Result<Task, ApiError> {
        self.execute(Request::new(
            HttpMethod::Patch,
            format!("/tarefas/reabrir/{id}"),
        ))
    }

    /// Move a task to the archive.
    pub fn archive_task(&self, id: i64) -> Result<(), ApiError> {
        self.execute_unit(Request::new(
            HttpMethod::Delete,
            format!("/tarefas/arquivar/{id}"),
        ))
    }

    /// Bring an archived task back.
    pub fn restore_task(&self, id: i64) -> Result<Task, ApiError> {
        self.execute(Request::new(
            HttpMethod::Patch,
            format!("/tarefas/restaurar/{id}"),
        ))
    }

    /// Permanently delete a task.
    pub fn delete_task(&self, id: i64) -> Result<(), ApiError> {
        self.execute_unit(Request::new(
            HttpMethod::Delete,
            format!("/tarefas/deletar/{id}"),
        ))
    }

    pub fn complete_tasks(&self, ids: &[i64]) -> Result<(), ApiError> {
        self.bulk_patch("/tarefas/concluir", ids)
    }

    pub fn reopen_tasks(&self, ids: &[i64]) -> Result<(), ApiError> {
        self.bulk_patch("/tarefas/reabrir", ids)
    }

    pub fn archive_tasks(&self, ids: &[i64]) -> Result<(), ApiError> {
        self.bulk_patch("/tarefas/arquivar", ids)
    }

    pub fn restore_tasks(&self, ids: &[i64]) -> Result<(), ApiError> {
        self.bulk_patch("/tarefas/restaurar", ids)
    }

    /// Permanently delete several tasks in one call.
    pub fn delete_tasks(&self, ids: &[i64]) -> Result<(), ApiError> {
        let request = Request::new(HttpMethod::Delete, "/tarefas/deletar/multiplas")
            .json(&BulkTaskIds {
                task_ids: ids.to_vec(),
            })?;
        self.execute_unit(request)
    }

    fn bulk_patch(&self, path: &str, ids: &[i64]) -> Result<(), ApiError> {
        let request = Request::new(HttpMethod::Patch, path).json(&BulkTaskIds {
            task_ids: ids.to_vec(),
        })?;
        self.execute_unit(request)
    }
}
