//! Load policy trait and adapters
//!
//! `LoadPolicy` carries both the production capability (how one fresh
//! resource comes into existence) and the per-member lifecycle hooks the
//! pool drives (`prepare` / `produce` / `recycle` / `destroy` / `teardown`).
//! Every hook defaults to the plain-resource behavior, so a minimal policy
//! only implements `load`.

use std::fmt;

use crate::error::PoolResult;

/// Strategy that produces and maintains resources for an
/// [`crate::pool::ObjectPool`].
pub trait LoadPolicy {
    /// The resource type this policy produces.
    type Resource;

    /// Payload handed to [`Self::setup`] during pool initialization.
    type Config;

    /// Whether the policy has completed its one-time setup.
    ///
    /// The pool calls [`Self::setup`] only while this reports `false`, and
    /// refuses bulk allocation until it reports `true`.
    fn is_ready(&self) -> bool {
        true
    }

    /// One-time setup (e.g. binding to a catalog or factory). Called by the
    /// pool during `initialize` when [`Self::is_ready`] is `false`.
    fn setup(&mut self, _config: &Self::Config) -> PoolResult<()> {
        Ok(())
    }

    /// Produce one fresh resource, optionally resolved from `locator`.
    fn load(&mut self, locator: &str) -> PoolResult<Self::Resource>;

    /// Hook run once at the start of a bulk `allocate`, before any member is
    /// produced. The attach variant resolves its template here.
    fn prepare(&mut self, _locator: &str) -> PoolResult<()> {
        Ok(())
    }

    /// Produce one pool member. Serves bulk fill, single allocation, and
    /// growth. Defaults to a plain load with an empty locator.
    fn produce(&mut self) -> PoolResult<Self::Resource> {
        self.load("")
    }

    /// Reset a member as it returns to the pool. Defaults to leaving the
    /// resource untouched.
    fn recycle(&mut self, _resource: &mut Self::Resource) {}

    /// Tear down a member removed from the pool during unload.
    fn destroy(&mut self, resource: Self::Resource) {
        drop(resource);
    }

    /// Hook run once at the end of `unload`, after the queue is drained.
    fn teardown(&mut self) {}
}

/// Adapts a closure into a [`LoadPolicy`], for resources that need no setup
/// or recycling beyond construction.
pub struct FactoryPolicy<F> {
    factory: F,
}

impl<F> FactoryPolicy<F> {
    /// Wrap `factory` as a load policy. The closure receives the locator
    /// passed to [`LoadPolicy::load`].
    pub fn new(factory: F) -> Self {
        Self { factory }
    }
}

impl<F> fmt::Debug for FactoryPolicy<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryPolicy").finish_non_exhaustive()
    }
}

impl<F, T> LoadPolicy for FactoryPolicy<F>
where
    F: FnMut(&str) -> PoolResult<T>,
{
    type Resource = T;
    type Config = ();

    fn load(&mut self, locator: &str) -> PoolResult<T> {
        (self.factory)(locator)
    }
}
