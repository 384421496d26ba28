//! API client core for the task-manager service.
//!
//! # Overview
//! Three cooperating pieces:
//! - a [`session::SessionStore`] that persists the current bearer token;
//! - a request pipeline ([`client::ApiClient`]) that attaches the token to
//!   every outgoing call and classifies failures into a stable
//!   [`error::ErrorKind`];
//! - typed endpoint operations (auth, user, task, category) layered on the
//!   pipeline, one method per REST operation.
//!
//! # Design
//! - The session is an explicit handle passed to the client; there is no
//!   global state. Every request re-reads the store at dispatch time.
//! - Failures reach callers exactly once, already classified and with a
//!   human-readable message. No retries anywhere.
//! - The wire transport sits behind the [`http::Transport`] trait; tests
//!   swap in a recording fake, production uses ureq.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod types;

mod auth;
mod category;
mod task;
mod user;

#[cfg(test)]
pub(crate) mod testing;

pub use client::ApiClient;
pub use config::{ClientConfig, DEFAULT_TIMEOUT, TOKEN_FILE};
pub use error::{ApiError, ErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError, UreqTransport};
pub use session::{mask_token, FileSessionStore, MemorySessionStore, SessionStore};
pub use types::{
    Category, ChangePassword, CreateTask, RegisterUser, Task, TaskFilter, TaskPage, TaskStats,
    UpdateProfile, UpdateTask, UserProfile,
};
