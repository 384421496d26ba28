//! User account operations: registration, profile, password, deactivation.

use crate::client::{ApiClient, Request};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::session::SessionStore;
use crate::types::{ChangePassword, RegisterUser, UpdateProfile, UserProfile};

impl ApiClient {
    /// Create a new account. No authentication required.
    ///
    /// Field presence and password confirmation are checked before any
    /// network activity; a violation fails fast with a validation error.
    pub fn register(&self, input: &RegisterUser) -> Result<UserProfile, ApiError> {
        if input.name.trim().is_empty()
            || input.email.trim().is_empty()
            || input.password.is_empty()
            || input.confirm_password.is_empty()
        {
            return Err(ApiError::validation("All fields are required."));
        }
        if input.password != input.confirm_password {
            return Err(ApiError::validation("Passwords do not match."));
        }

        let request = Request::new(HttpMethod::Post, "/usuario").json(input)?;
        self.execute(request)
    }

    /// Profile of the authenticated user.
    pub fn get_profile(&self) -> Result<UserProfile, ApiError> {
        self.execute(Request::new(HttpMethod::Get, "/usuario/me"))
    }

    /// Apply a partial profile update and return the updated profile.
    pub fn update_profile(&self, input: &UpdateProfile) -> Result<UserProfile, ApiError> {
        let request = Request::new(HttpMethod::Put, "/usuario/me").json(input)?;
        self.execute(request)
    }

    /// Change the account password. The new password and its confirmation
    /// must match; checked before dispatch.
    pub fn change_password(&self, input: &ChangePassword) -> Result<(), ApiError> {
        if input.new_password != input.confirm_password {
            return Err(ApiError::validation("Passwords do not match."));
        }
        let request = Request::new(HttpMethod::Put, "/usuario/me/alterar-senha").json(input)?;
        self.execute_unit(request)
    }

    /// Deactivate the account server-side, then drop the local session.
    pub fn deactivate_account(&self) -> Result<(), ApiError> {
        self.execute_unit(Request::new(HttpMethod::Delete, "/usuario/me"))?;
        self.session().clear()
    }
}
