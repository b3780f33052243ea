//! Pre-dispatch policy check.

use crate::server::{
    data::guild_policy::PolicyStore,
    model::{
        command::ResolvedCommand,
        policy::{CommandInvocation, Decision, DenyReason},
    },
    service::policy::engine,
};

/// Evaluates invocations against the current stored policy.
///
/// Every check re-reads the guild's policy; there is no in-process cache.
pub struct PolicyGate<'a, S: PolicyStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: PolicyStore + ?Sized> PolicyGate<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Decides whether a resolved command may run where it was invoked.
    ///
    /// Administration commands are allowed without reading the store so moderators
    /// can always repair a policy. When the policy cannot be read the invocation is
    /// denied with `DenyReason::StoreUnavailable`.
    ///
    /// # Arguments
    /// - `invocation` - Guild, channel and typed name of the invocation
    /// - `command` - The invoked command resolved through the catalog
    ///
    /// # Returns
    /// - `Decision` - Allow or deny with a reason; never an error
    pub async fn evaluate(
        &self,
        invocation: &CommandInvocation,
        command: &ResolvedCommand,
    ) -> Decision {
        if engine::is_administration_command(command) {
            return Decision::Allow;
        }

        let policy = match self.store.get(invocation.guild_id).await {
            Ok(policy) => policy,
            Err(err) => {
                tracing::error!(
                    "Failed to read command policy for guild {}: {}",
                    invocation.guild_id,
                    err
                );
                return Decision::Deny(DenyReason::StoreUnavailable);
            }
        };

        let decision = engine::evaluate(invocation, &policy, command);

        tracing::debug!(
            "`{}` in channel {} of guild {}: {:?}",
            invocation.invoked_name,
            invocation.channel_id,
            invocation.guild_id,
            decision
        );

        decision
    }
}
