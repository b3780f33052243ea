//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer of the application, which sits between the
//! bot/API glue and the data (repository) layer. Services are responsible for:
//!
//! - **Business Logic**: Command resolution, policy evaluation and policy invariants
//! - **Validation**: Rejecting contradictory administrator requests before any write
//! - **Domain Models**: Working with domain models rather than DTOs or entity models

pub mod catalog;
pub mod policy;
