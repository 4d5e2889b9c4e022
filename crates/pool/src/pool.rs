//! Object pool — queue-backed recycling driven by a [`LoadPolicy`].
//!
//! `ObjectPool<P>` owns a FIFO queue of idle resources and a load policy
//! that knows how to produce, recycle, and destroy them. One pool
//! implementation serves both plain resources and the attach/reset variant;
//! the difference lives entirely in the policy
//! (see [`crate::attach::AttachPolicy`]).
//!
//! Required call order: `initialize` → `allocate` / `allocate_single` →
//! (`get` / `release`)* → `unload`. Every operation checks its
//! preconditions at entry and reports violations through the failure value
//! and the log, never through a panic.

use std::collections::VecDeque;
use std::fmt;

use crate::config::PoolConfig;
use crate::error::{PoolError, PoolResult};
use crate::guard::PoolGuard;
use crate::policy::LoadPolicy;
use crate::stats::PoolStats;

/// A bounded, optionally growing pool of reusable resources.
pub struct ObjectPool<P: LoadPolicy> {
    config: PoolConfig,
    /// Live capacity; starts at `config.capacity`, raised by growth only.
    capacity: usize,
    available: VecDeque<P::Resource>,
    policy: Option<P>,
    initialized: bool,
    stats: PoolStats,
}

impl<P: LoadPolicy> fmt::Debug for ObjectPool<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("label", &self.config.label)
            .field("capacity", &self.capacity)
            .field("available", &self.available.len())
            .field("initialized", &self.initialized)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<P: LoadPolicy> ObjectPool<P> {
    /// Create a pool that instantiates its own default policy.
    pub fn new(config: PoolConfig) -> PoolResult<Self>
    where
        P: Default,
    {
        Self::build(config, Some(P::default()))
    }

    /// Create a pool around a pre-bound policy instance.
    pub fn with_policy(config: PoolConfig, policy: P) -> PoolResult<Self> {
        Self::build(config, Some(policy))
    }

    /// Create a pool with no policy yet; one must be supplied through
    /// [`Self::initialize`] before allocation can succeed.
    pub fn without_policy(config: PoolConfig) -> PoolResult<Self> {
        Self::build(config, None)
    }

    fn build(config: PoolConfig, policy: Option<P>) -> PoolResult<Self> {
        config.validate()?;
        let capacity = config.capacity;
        Ok(Self {
            available: VecDeque::with_capacity(capacity),
            capacity,
            config,
            policy,
            initialized: false,
            stats: PoolStats::default(),
        })
    }

    /// Initialize the pool and its load policy.
    ///
    /// A `policy` argument replaces the stored policy. If the (now-current)
    /// policy has not completed its one-time setup, `setup` runs with the
    /// given config; a setup error propagates and leaves the pool
    /// uninitialized. Initializing without any policy is allowed — the gap
    /// is logged here and surfaced as [`PoolError::MissingPolicy`] by later
    /// operations.
    pub fn initialize(&mut self, policy: Option<P>, setup: &P::Config) -> PoolResult<()> {
        if let Some(policy) = policy {
            self.policy = Some(policy);
        }

        match self.policy.as_mut() {
            Some(policy) if !policy.is_ready() => policy.setup(setup)?,
            Some(_) => {}
            None => {
                tracing::warn!(
                    pool = %self.config.label,
                    "Initializing pool without a load policy"
                );
            }
        }

        self.initialized = true;
        Ok(())
    }

    /// Fill the pool with exactly `capacity` resources produced through the
    /// policy.
    ///
    /// Best effort, not transactional: the fill aborts on the first
    /// production failure and resources already enqueued stay enqueued. The
    /// pool remains fully usable after a failed allocate.
    pub fn allocate(&mut self, locator: &str) -> PoolResult<()> {
        self.ensure_initialized()?;

        let Some(policy) = self.policy.as_mut() else {
            tracing::error!(pool = %self.config.label, "No load policy is bound to the pool");
            return Err(PoolError::missing_policy(&self.config.label));
        };
        if !policy.is_ready() {
            tracing::error!(
                pool = %self.config.label,
                "Load policy has not been set up; call initialize first"
            );
            return Err(PoolError::policy_not_ready(&self.config.label));
        }

        if let Err(error) = policy.prepare(locator) {
            tracing::error!(
                pool = %self.config.label,
                locator = %locator,
                error = %error,
                "Failed to prepare pool allocation"
            );
            return Err(error);
        }

        for _ in 0..self.capacity {
            match policy.produce() {
                Ok(resource) => {
                    self.available.push_back(resource);
                    self.stats.record_produced();
                }
                Err(error) => {
                    tracing::error!(
                        pool = %self.config.label,
                        locator = %locator,
                        enqueued = self.available.len(),
                        error = %error,
                        "Pool allocation aborted; keeping the partial fill"
                    );
                    return Err(error);
                }
            }
        }

        Ok(())
    }

    /// Produce a single resource outside pool bookkeeping.
    ///
    /// The caller owns the result immediately; it is never enqueued. It may
    /// still be handed to [`Self::release`] later like any other resource.
    pub fn allocate_single(&mut self) -> PoolResult<P::Resource> {
        self.ensure_initialized()?;

        let Some(policy) = self.policy.as_mut() else {
            tracing::error!(pool = %self.config.label, "No load policy is bound to the pool");
            return Err(PoolError::missing_policy(&self.config.label));
        };

        match policy.produce() {
            Ok(resource) => {
                self.stats.record_produced();
                Ok(resource)
            }
            Err(error) => {
                tracing::error!(
                    pool = %self.config.label,
                    error = %error,
                    "Failed to produce a single resource"
                );
                Err(error)
            }
        }
    }

    /// Take a resource from the pool, transferring ownership to the caller.
    ///
    /// FIFO: the longest-idle resource is handed out first. An empty,
    /// non-growing pool returns `None` — the exhaustion signal, a normal
    /// flow-control case, not an error. An empty growing pool raises the
    /// capacity by exactly one and produces a fresh resource on demand.
    pub fn get(&mut self) -> Option<P::Resource> {
        if !self.initialized {
            tracing::error!(pool = %self.config.label, "Pool is not initialized");
            return None;
        }

        match self.available.pop_front() {
            Some(resource) => {
                self.stats.record_hit();
                Some(resource)
            }
            None => {
                self.stats.record_miss();
                if !self.config.grow {
                    return None;
                }
                self.capacity += 1;
                self.stats.record_grown();
                // allocate_single logs its own failure detail.
                self.allocate_single().ok()
            }
        }
    }

    /// [`Self::get`] wrapped in an RAII guard that releases the resource
    /// when dropped. [`PoolGuard::detach`] opts out of the return.
    pub fn checkout(&mut self) -> Option<PoolGuard<'_, P>>
    where
        P::Resource: PartialEq,
    {
        let resource = self.get()?;
        Some(PoolGuard::new(self, resource))
    }

    /// Return a resource to the pool.
    ///
    /// On an uninitialized (or already unloaded) pool this is a silent
    /// drop, not an error. Otherwise the policy's `recycle` hook runs
    /// unconditionally, then the resource is enqueued at the tail unless an
    /// identity-equal resource is already queued (the duplicate is dropped
    /// with a warning). Provenance is not validated: the pool accepts
    /// resources it never produced.
    pub fn release(&mut self, mut resource: P::Resource)
    where
        P::Resource: PartialEq,
    {
        if !self.initialized {
            tracing::debug!(
                pool = %self.config.label,
                "Release on an uninitialized pool; resource dropped"
            );
            return;
        }

        if let Some(policy) = self.policy.as_mut() {
            policy.recycle(&mut resource);
        }
        self.stats.record_release();

        if self.available.contains(&resource) {
            self.stats.record_duplicate_release();
            tracing::warn!(
                pool = %self.config.label,
                "Resource is already pooled; duplicate release ignored"
            );
            return;
        }

        self.available.push_back(resource);
    }

    /// Destroy every resource the pool still owns and reset the lifecycle.
    ///
    /// Safe to call repeatedly; the second call is a no-op. Resources
    /// currently checked out are not tracked and not affected. After
    /// unload the pool must be re-initialized and re-allocated before use.
    pub fn unload(&mut self) {
        while let Some(resource) = self.available.pop_front() {
            match self.policy.as_mut() {
                Some(policy) => policy.destroy(resource),
                None => drop(resource),
            }
            self.stats.record_destroyed();
        }

        if let Some(policy) = self.policy.as_mut() {
            policy.teardown();
        }

        self.initialized = false;
    }

    /// Number of resources currently idle in the pool; 0 while
    /// uninitialized.
    pub fn available(&self) -> usize {
        if self.initialized {
            self.available.len()
        } else {
            0
        }
    }

    /// Live capacity, regardless of initialization state. Grows by one per
    /// exhaustion event on a growing pool.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether `initialize` has run (and `unload` has not run since).
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The diagnostics label from the configuration.
    pub fn label(&self) -> &str {
        &self.config.label
    }

    /// The bound load policy, if any.
    pub fn policy(&self) -> Option<&P> {
        self.policy.as_ref()
    }

    /// Activity counters.
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    fn ensure_initialized(&self) -> PoolResult<()> {
        if self.initialized {
            Ok(())
        } else {
            tracing::error!(pool = %self.config.label, "Pool is not initialized");
            Err(PoolError::not_initialized(&self.config.label))
        }
    }
}
