//! Category CRUD.

use crate::client::{ApiClient, Request};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::{Category, CategoryName};

impl ApiClient {
    pub fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.execute(Request::new(HttpMethod::Get, "/categorias"))
    }

    pub fn create_category(&self, name: &str) -> Result<Category, ApiError> {
        let request =
            Request::new(HttpMethod::Post, "/categorias").json(&CategoryName { name })?;
        self.execute(request)
    }

    pub fn update_category(&self, id: i64, name: &str) -> Result<Category, ApiError> {
        let request =
            Request::new(HttpMethod::Put, format!("/categorias/{id}")).json(&CategoryName { name })?;
        self.execute(request)
    }

    pub fn delete_category(&self, id: i64) -> Result<(), ApiError> {
        self.execute_unit(Request::new(
            HttpMethod::Delete,
            format!("/categorias/{id}"),
        ))
    }
}
