use super::*;

/// Tests the first mutation of an unconfigured guild.
///
/// Verifies that the guild policy row is created on demand and that a put
/// requesting whitelist activation switches the guild mode.
///
/// Expected: Ok with rule stored and mode `Whitelist`
#[tokio::test]
async fn creates_policy_on_first_put() -> Result<(), AppError> {
    let test = TestBuilder::new().with_policy_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildPolicyRepository::new(db, TIMEOUT);
    let mutation = repo
        .mutate_channel_rule(42, 10, &|previous, _mode| {
            assert!(previous.is_none());
            Ok(RuleEdit::Put {
                rule: only(10, &["ping"]),
                activate_whitelist: true,
            })
        })
        .await?;

    assert_eq!(mutation.previous, None);
    assert_eq!(mutation.current, Some(only(10, &["ping"])));
    assert_eq!(mutation.mode, PolicyMode::Whitelist);

    let policy = repo.get(42).await?;
    assert_eq!(policy.mode, PolicyMode::Whitelist);
    assert_eq!(policy.channel_rules, vec![only(10, &["ping"])]);

    Ok(())
}

/// Tests a put without whitelist activation.
///
/// Verifies that the rule is stored while the guild stays unrestricted.
///
/// Expected: Ok with rule stored and mode `All`
#[tokio::test]
async fn put_without_activation_keeps_mode() -> Result<(), AppError> {
    let test = TestBuilder::new().with_policy_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildPolicyRepository::new(db, TIMEOUT);
    let mutation = repo
        .mutate_channel_rule(42, 10, &|_, _| {
            Ok(RuleEdit::Put {
                rule: only(10, &["ping"]),
                activate_whitelist: false,
            })
        })
        .await?;

    assert_eq!(mutation.mode, PolicyMode::All);
    assert_eq!(repo.get(42).await?.mode, PolicyMode::All);

    Ok(())
}

/// Tests replacing an existing rule.
///
/// Verifies that the mutator sees the stored rule and that replacing it keeps
/// its position in creation order.
///
/// Expected: Ok with the rule replaced in place
#[tokio::test]
async fn replaces_existing_rule_in_place() -> Result<(), AppError> {
    let test = TestBuilder::new().with_policy_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_channel_rule(db, "42", "10").await?;
    factory::create_channel_rule(db, "42", "20").await?;

    let repo = GuildPolicyRepository::new(db, TIMEOUT);
    let mutation = repo
        .mutate_channel_rule(42, 10, &|previous, mode| {
            assert_eq!(previous, Some(&only(10, &["ping"])));
            assert_eq!(mode, &PolicyMode::Whitelist);
            Ok(RuleEdit::Put {
                rule: only(10, &["hello", "rick"]),
                activate_whitelist: true,
            })
        })
        .await?;

    assert_eq!(mutation.previous, Some(only(10, &["ping"])));
    assert!(mutation.changed());

    let policy = repo.get(42).await?;
    assert_eq!(
        policy.channel_rules,
        vec![only(10, &["hello", "rick"]), only(20, &["ping"])]
    );

    Ok(())
}

/// Tests a mutation that keeps the rule.
///
/// Verifies that nothing is written, not even the guild policy row.
///
/// Expected: Ok with no rows created
#[tokio::test]
async fn keep_writes_nothing() -> Result<(), AppError> {
    let test = TestBuilder::new().with_policy_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildPolicyRepository::new(db, TIMEOUT);
    let mutation = repo
        .mutate_channel_rule(42, 10, &|_, _| Ok(RuleEdit::Keep))
        .await?;

    assert!(!mutation.changed());
    assert_eq!(mutation.current, None);

    let rows = entity::prelude::GuildCommandPolicy::find().count(db).await?;
    assert_eq!(rows, 0);

    Ok(())
}

/// Tests a mutator that rejects the change.
///
/// Verifies that the validation error is returned unchanged and the stored
/// rule is left untouched.
///
/// Expected: Err(Validation) with rule unchanged
#[tokio::test]
async fn mutator_error_aborts_mutation() -> Result<(), AppError> {
    let test = TestBuilder::new().with_policy_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_channel_rule(db, "42", "10").await?;

    let repo = GuildPolicyRepository::new(db, TIMEOUT);
    let result = repo
        .mutate_channel_rule(42, 10, &|_, _| {
            Err(ValidationError::MissingCommandName.into())
        })
        .await;

    assert!(matches!(
        result,
        Err(PolicyError::Validation(ValidationError::MissingCommandName))
    ));
    assert_eq!(repo.get(42).await?.channel_rules, vec![only(10, &["ping"])]);

    Ok(())
}

/// Tests deleting the guild's last rule.
///
/// Verifies that the guild reverts to unrestricted in the same update.
///
/// Expected: Ok with no rules and mode `All`
#[tokio::test]
async fn deleting_last_rule_reverts_to_all() -> Result<(), AppError> {
    let test = TestBuilder::new().with_policy_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_channel_rule(db, "42", "10").await?;

    let repo = GuildPolicyRepository::new(db, TIMEOUT);
    let mutation = repo
        .mutate_channel_rule(42, 10, &|_, _| Ok(RuleEdit::Delete))
        .await?;

    assert_eq!(mutation.previous, Some(only(10, &["ping"])));
    assert_eq!(mutation.current, None);
    assert_eq!(mutation.mode, PolicyMode::All);

    let guild = entity::prelude::GuildCommandPolicy::find_by_id("42".to_string())
        .one(db)
        .await?;
    assert_eq!(guild.unwrap().mode, "all");

    Ok(())
}

/// Tests deleting one of several rules.
///
/// Expected: Ok with the remaining rule kept and mode still `Whitelist`
#[tokio::test]
async fn deleting_one_rule_keeps_whitelist() -> Result<(), AppError> {
    let test = TestBuilder::new().with_policy_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_channel_rule(db, "42", "10").await?;
    factory::create_channel_rule(db, "42", "20").await?;

    let repo = GuildPolicyRepository::new(db, TIMEOUT);
    let mutation = repo
        .mutate_channel_rule(42, 10, &|_, _| Ok(RuleEdit::Delete))
        .await?;

    assert_eq!(mutation.mode, PolicyMode::Whitelist);

    let policy = repo.get(42).await?;
    assert_eq!(policy.mode, PolicyMode::Whitelist);
    assert_eq!(policy.channel_rules, vec![only(20, &["ping"])]);

    Ok(())
}

/// Tests concurrent mutations of different channels in the same guild.
///
/// Both transactions run on separate pooled connections of a file database, so
/// they overlap. Verifies that neither update is lost.
///
/// Expected: Ok with both rules stored
#[tokio::test]
async fn concurrent_puts_on_different_channels_both_persist() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_policy_tables()
        .with_file_database(2)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildPolicyRepository::new(db, TIMEOUT);
    let put_10 = |_: Option<&ChannelRule>, _: &PolicyMode| -> Result<RuleEdit, PolicyError> {
        Ok(RuleEdit::Put {
            rule: only(10, &["ping"]),
            activate_whitelist: true,
        })
    };
    let put_20 = |_: Option<&ChannelRule>, _: &PolicyMode| -> Result<RuleEdit, PolicyError> {
        Ok(RuleEdit::Put {
            rule: only(20, &["hello"]),
            activate_whitelist: true,
        })
    };

    let (first, second) = tokio::join!(
        repo.mutate_channel_rule(42, 10, &put_10),
        repo.mutate_channel_rule(42, 20, &put_20),
    );
    first?;
    second?;

    let policy = repo.get(42).await?;
    assert_eq!(policy.mode, PolicyMode::Whitelist);
    assert!(policy.rule_for(10).is_some());
    assert!(policy.rule_for(20).is_some());
    assert_eq!(policy.channel_rules.len(), 2);

    Ok(())
}
