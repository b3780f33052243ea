//! Data transfer objects exchanged over the HTTP API.

pub mod api;
pub mod command;
pub mod policy;
