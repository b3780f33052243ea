use super::*;

use chrono::{Duration as ChronoDuration, Utc};
use test_utils::factory::channel_rule::ChannelRuleFactory;

/// Tests reading a guild that was never configured.
///
/// Verifies that the repository returns the implicit zero-config policy
/// without creating any rows.
///
/// Expected: Ok with mode `All` and no rules
#[tokio::test]
async fn returns_default_for_unconfigured_guild() -> Result<(), AppError> {
    let test = TestBuilder::new().with_policy_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildPolicyRepository::new(db, TIMEOUT);
    let policy = repo.get(42).await?;

    assert_eq!(policy.mode, PolicyMode::All);
    assert!(policy.channel_rules.is_empty());

    let rows = entity::prelude::GuildCommandPolicy::find().count(db).await?;
    assert_eq!(rows, 0);

    Ok(())
}

/// Tests that rules come back in creation order.
///
/// Verifies that rules are ordered by their creation timestamp rather than
/// by channel ID.
///
/// Expected: Ok with rules ordered oldest first
#[tokio::test]
async fn returns_rules_in_creation_order() -> Result<(), AppError> {
    let test = TestBuilder::new().with_policy_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    ChannelRuleFactory::new(db, "42")
        .channel_id("30")
        .created_at(now - ChronoDuration::minutes(2))
        .build()
        .await?;
    ChannelRuleFactory::new(db, "42")
        .channel_id("10")
        .created_at(now - ChronoDuration::minutes(1))
        .build()
        .await?;
    ChannelRuleFactory::new(db, "42")
        .channel_id("20")
        .cmd_mode("exclude")
        .allowed_commands(["rick"])
        .created_at(now)
        .build()
        .await?;

    let repo = GuildPolicyRepository::new(db, TIMEOUT);
    let policy = repo.get(42).await?;

    assert_eq!(policy.mode, PolicyMode::Whitelist);
    let channels: Vec<u64> = policy.channel_rules.iter().map(|r| r.channel_id).collect();
    assert_eq!(channels, vec![30, 10, 20]);
    assert_eq!(policy.channel_rules[2].cmd_mode, CommandMode::Exclude);

    Ok(())
}

/// Tests that policies of other guilds are not mixed in.
///
/// Expected: Ok with only the requested guild's rules
#[tokio::test]
async fn isolates_guilds() -> Result<(), AppError> {
    let test = TestBuilder::new().with_policy_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_channel_rule(db, "1", "10").await?;
    factory::create_channel_rule(db, "2", "20").await?;

    let repo = GuildPolicyRepository::new(db, TIMEOUT);
    let policy = repo.get(1).await?;

    assert_eq!(policy.channel_rules, vec![only(10, &["ping"])]);

    Ok(())
}

/// Tests reading a whitelist with no rules.
///
/// Verifies that an empty whitelist is read as unrestricted rather than
/// blocking every command.
///
/// Expected: Ok with mode `All`
#[tokio::test]
async fn treats_empty_whitelist_as_all() -> Result<(), AppError> {
    let test = TestBuilder::new().with_policy_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let guild = factory::create_whitelist_policy(db).await?;
    let guild_id: u64 = guild.guild_id.parse().unwrap();

    let repo = GuildPolicyRepository::new(db, TIMEOUT);
    let policy = repo.get(guild_id).await?;

    assert_eq!(policy.mode, PolicyMode::All);

    Ok(())
}

/// Tests reading corrupt rule rows.
///
/// Verifies that rules with an unknown mode, a non-array command list, or an
/// empty `only` list are surfaced as invalid instead of failing the read.
///
/// Expected: Ok with each corrupt rule marked `Invalid`
#[tokio::test]
async fn marks_corrupt_rules_invalid() -> Result<(), AppError> {
    let test = TestBuilder::new().with_policy_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    ChannelRuleFactory::new(db, "42")
        .channel_id("10")
        .cmd_mode("sometimes")
        .build()
        .await?;
    ChannelRuleFactory::new(db, "42")
        .channel_id("20")
        .raw_allowed_commands(serde_json::json!("ping"))
        .build()
        .await?;
    ChannelRuleFactory::new(db, "42")
        .channel_id("30")
        .allowed_commands(Vec::<String>::new())
        .build()
        .await?;

    let repo = GuildPolicyRepository::new(db, TIMEOUT);
    let policy = repo.get(42).await?;

    assert_eq!(policy.channel_rules.len(), 3);
    for rule in &policy.channel_rules {
        assert!(
            matches!(rule.cmd_mode, CommandMode::Invalid(_)),
            "channel {} should be invalid, got {:?}",
            rule.channel_id,
            rule.cmd_mode
        );
    }

    Ok(())
}

/// Tests reading a rule whose channel ID is not a snowflake.
///
/// Expected: Ok with the malformed row skipped
#[tokio::test]
async fn skips_rule_with_malformed_channel_id() -> Result<(), AppError> {
    let test = TestBuilder::new().with_policy_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_channel_rule(db, "42", "general").await?;
    factory::create_channel_rule(db, "42", "10").await?;

    let repo = GuildPolicyRepository::new(db, TIMEOUT);
    let policy = repo.get(42).await?;

    assert_eq!(policy.channel_rules, vec![only(10, &["ping"])]);

    Ok(())
}
