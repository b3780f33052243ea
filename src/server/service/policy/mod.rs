//! Command policy services.
//!
//! - `engine` - Pure allow/deny decision for one invocation and one policy snapshot
//! - `gate` - Reads the current policy and evaluates it, failing closed on store errors
//! - `admin` - The only writer of guild policies

pub mod admin;
pub mod engine;
pub mod gate;

#[cfg(test)]
mod test;
