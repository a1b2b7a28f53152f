use typed_builder::TypedBuilder;

/// Hook config.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HookConfig<A> {
    /// The only sender allowed to deliver lifecycle events.
    pool_manager: A,
}

impl<A> HookConfig<A> {
    /// Get the pool manager.
    pub fn pool_manager(&self) -> &A {
        &self.pool_manager
    }
}
