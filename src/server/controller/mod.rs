//! HTTP request handlers for the read-only policy API.
//!
//! Controllers extract path parameters and state, call the policy services and convert
//! domain models to DTOs. Errors are returned as `AppError` and rendered as JSON
//! `{ "error": ... }` bodies.

pub mod command;
pub mod policy;
pub mod status;
