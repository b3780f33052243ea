use super::*;

/// Tests deleting a configured guild.
///
/// Verifies that the guild row and all of its rules are removed while other
/// guilds are untouched.
///
/// Expected: Ok with only the other guild's rows remaining
#[tokio::test]
async fn deletes_guild_and_rules() -> Result<(), AppError> {
    let test = TestBuilder::new().with_policy_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_channel_rule(db, "42", "10").await?;
    factory::create_channel_rule(db, "42", "20").await?;
    factory::create_channel_rule(db, "7", "30").await?;

    let repo = GuildPolicyRepository::new(db, TIMEOUT);
    repo.delete_guild(42).await?;

    let policy = repo.get(42).await?;
    assert_eq!(policy.mode, PolicyMode::All);
    assert!(policy.channel_rules.is_empty());

    let rules = entity::prelude::ChannelCommandRule::find().count(db).await?;
    assert_eq!(rules, 1);
    assert_eq!(repo.get(7).await?.channel_rules, vec![only(30, &["ping"])]);

    Ok(())
}

/// Tests deleting a guild that was never configured.
///
/// Expected: Ok with nothing to delete
#[tokio::test]
async fn succeeds_for_unconfigured_guild() -> Result<(), AppError> {
    let test = TestBuilder::new().with_policy_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildPolicyRepository::new(db, TIMEOUT);
    let result = repo.delete_guild(42).await;

    assert!(result.is_ok());

    Ok(())
}
