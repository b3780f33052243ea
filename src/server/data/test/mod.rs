mod guild_policy;
