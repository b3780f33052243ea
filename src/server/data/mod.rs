//! Database repository layer for command policies.
//!
//! This module contains the `PolicyStore` contract and its SeaORM-backed repository.
//! Repositories use SeaORM entity models internally and return domain models so the
//! policy services never see database rows. All policy reads and writes go through here.

pub mod guild_policy;

#[cfg(test)]
mod test;
