//! Server-side bot, policy engine and read-only HTTP API.
//!
//! This module contains the complete backend: the Discord bot that gates prefix
//! commands per channel, the services that evaluate and administer guild command
//! policies, and a small Axum API exposing those policies. SeaORM persists policies
//! in Sqlite and Serenity connects to Discord.
//!
//! # Architecture
//!
//! The server follows a layered architecture with clear separation of concerns:
//!
//! - **Bot Layer** (`bot/`) - Discord event handlers, command parsing and replies
//! - **Controller Layer** (`controller/`) - HTTP request handlers and DTO conversion
//! - **Service Layer** (`service/`) - Command catalog, policy evaluation and administration
//! - **Data Layer** (`data/`) - The policy store and entity-to-domain model conversion
//! - **Model Layer** (`model/`) - Domain models for commands and policies
//! - **Error Layer** (`error/`) - Application error types and HTTP response mapping
//!
//! # Infrastructure
//!
//! - **Configuration** (`config`) - Environment-based application configuration
//! - **State** (`state`) - Shared application state for the HTTP API
//! - **Startup** (`startup`) - Tracing and database initialization
//! - **Router** (`router`) - Axum route configuration and API documentation
//!
//! # Command Flow
//!
//! A guild command flows through these layers:
//!
//! 1. **Bot** parses the prefix command and resolves it through the catalog
//! 2. **Service** gate reads the guild's policy and decides allow or deny
//! 3. **Bot** replies with the denial reason or runs the command
//! 4. Moderator commands call the **Service** administrator, which mutates one
//!    channel rule at a time through the **Data** layer

pub mod bot;
pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod model;
pub mod router;
pub mod service;
pub mod startup;
pub mod state;
