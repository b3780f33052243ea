//! Factory methods for creating test data.
//!
//! This module provides factory methods for creating policy rows with sensible defaults,
//! reducing boilerplate in tests. Rule factories create the owning guild policy row on
//! demand so the foreign key is always satisfied.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     // Whitelisted guild with a single `only ping` rule
//!     let policy = factory::create_whitelist_policy(&db).await?;
//!     let rule = factory::create_channel_rule(&db, &policy.guild_id, "10").await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Customization
//!
//! ```rust,ignore
//! // Corrupt rows for fail-closed tests
//! let rule = factory::channel_rule::ChannelRuleFactory::new(&db, &guild_id)
//!     .channel_id("10")
//!     .cmd_mode("sometimes")
//!     .build()
//!     .await?;
//! ```
//!
//! # Available Factories
//!
//! - `guild_policy` - Create guild command policy rows
//! - `channel_rule` - Create channel command rule rows
//! - `helpers` - Unique id generation

pub mod channel_rule;
pub mod guild_policy;
pub mod helpers;

// Re-export commonly used factory functions for concise usage
pub use channel_rule::create_channel_rule;
pub use guild_policy::{create_guild_policy, create_whitelist_policy};
