//! RAII guard returning resources to the pool on drop

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::policy::LoadPolicy;
use crate::pool::ObjectPool;

/// RAII wrapper around a checked-out resource.
///
/// When the guard drops, the resource goes back through
/// [`ObjectPool::release`] (including the policy's recycle hook). Use
/// [`PoolGuard::detach`] to take ownership without returning it.
pub struct PoolGuard<'a, P>
where
    P: LoadPolicy,
    P::Resource: PartialEq,
{
    pool: &'a mut ObjectPool<P>,
    resource: Option<P::Resource>,
}

impl<'a, P> PoolGuard<'a, P>
where
    P: LoadPolicy,
    P::Resource: PartialEq,
{
    pub(crate) fn new(pool: &'a mut ObjectPool<P>, resource: P::Resource) -> Self {
        Self {
            pool,
            resource: Some(resource),
        }
    }

    /// Take the resource out of the guard, preventing the return to the
    /// pool.
    #[must_use]
    pub fn detach(mut self) -> P::Resource {
        self.resource.take().expect("guard resource already taken")
    }
}

impl<P> Deref for PoolGuard<'_, P>
where
    P: LoadPolicy,
    P::Resource: PartialEq,
{
    type Target = P::Resource;

    fn deref(&self) -> &P::Resource {
        self.resource.as_ref().expect("guard resource already taken")
    }
}

impl<P> DerefMut for PoolGuard<'_, P>
where
    P: LoadPolicy,
    P::Resource: PartialEq,
{
    fn deref_mut(&mut self) -> &mut P::Resource {
        self.resource.as_mut().expect("guard resource already taken")
    }
}

impl<P> Drop for PoolGuard<'_, P>
where
    P: LoadPolicy,
    P::Resource: PartialEq,
{
    fn drop(&mut self) {
        if let Some(resource) = self.resource.take() {
            self.pool.release(resource);
        }
    }
}

impl<P> fmt::Debug for PoolGuard<'_, P>
where
    P: LoadPolicy,
    P::Resource: PartialEq + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolGuard")
            .field("resource", &self.resource)
            .finish()
    }
}
