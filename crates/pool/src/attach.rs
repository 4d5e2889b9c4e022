//! Attachable-resource pooling — the template/anchor recycling variant
//!
//! `AttachPolicy<P>` decorates any inner [`LoadPolicy`] whose resource
//! implements [`Attachable`]. Instead of loading every member through the
//! inner policy, it loads one reference resource (the *template*) during
//! `allocate` and clones it for every member and every growth event. On
//! release, members are re-anchored, moved back to the canonical origin,
//! and deactivated. Unload destroys the template and the anchor along with
//! the queued members.

use crate::error::{PoolError, PoolResult};
use crate::policy::LoadPolicy;

/// Debug tag applied to the hidden template resource.
pub const TEMPLATE_LABEL: &str = "reference";

/// Debug tag applied to every pooled member.
pub const POOLED_LABEL: &str = "pooled";

/// A resource that can be cloned from a template and re-anchored under a
/// grouping context.
///
/// The anchor and the spatial operations are opaque to the pool: a scene
/// node, a render batch, or any other parent/child shaped structure fits.
/// Labels are debug bookkeeping only and default to a no-op.
pub trait Attachable: Sized {
    /// The grouping context every pooled resource is attached under.
    type Anchor;

    /// Clone a fresh instance of this resource.
    fn instantiate(&self) -> PoolResult<Self>;

    /// Re-parent this resource under `anchor`.
    fn attach(&mut self, anchor: &Self::Anchor);

    /// Toggle whether the resource participates in its host structure
    /// (visibility, simulation, …).
    fn set_active(&mut self, active: bool);

    /// Move back to the canonical origin and take the orientation of
    /// `template`.
    fn reset_transform(&mut self, template: &Self);

    /// Apply a debug tag.
    fn set_label(&mut self, _label: &str) {}

    /// Permanently tear this resource down.
    fn destroy(self) {}

    /// Permanently tear an anchor down.
    fn destroy_anchor(_anchor: Self::Anchor) {}
}

/// Policy decorator implementing the attach/reset pooling contract on top
/// of any inner load policy.
pub struct AttachPolicy<P>
where
    P: LoadPolicy,
    P::Resource: Attachable,
{
    inner: P,
    anchor: Option<<P::Resource as Attachable>::Anchor>,
    template: Option<P::Resource>,
}

impl<P> AttachPolicy<P>
where
    P: LoadPolicy,
    P::Resource: Attachable,
{
    /// Wrap `inner`, anchoring every pooled resource under `anchor`.
    pub fn new(inner: P, anchor: <P::Resource as Attachable>::Anchor) -> Self {
        Self {
            inner,
            anchor: Some(anchor),
            template: None,
        }
    }

    /// Wrap `inner` with no anchor bound. Allocation fails with
    /// [`PoolError::AnchorMissing`] until an anchored policy is used; this
    /// constructor exists to mirror pools whose anchor is torn down
    /// externally.
    pub fn detached(inner: P) -> Self {
        Self {
            inner,
            anchor: None,
            template: None,
        }
    }

    /// The hidden template resource, once `allocate` has resolved it.
    pub fn template(&self) -> Option<&P::Resource> {
        self.template.as_ref()
    }

    /// The bound anchor, if any.
    pub fn anchor(&self) -> Option<&<P::Resource as Attachable>::Anchor> {
        self.anchor.as_ref()
    }

    /// The wrapped load policy.
    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P> std::fmt::Debug for AttachPolicy<P>
where
    P: LoadPolicy,
    P::Resource: Attachable,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttachPolicy")
            .field("anchored", &self.anchor.is_some())
            .field("template_resolved", &self.template.is_some())
            .finish_non_exhaustive()
    }
}

impl<P> LoadPolicy for AttachPolicy<P>
where
    P: LoadPolicy,
    P::Resource: Attachable,
{
    type Resource = P::Resource;
    type Config = P::Config;

    fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    fn setup(&mut self, config: &Self::Config) -> PoolResult<()> {
        self.inner.setup(config)
    }

    fn load(&mut self, locator: &str) -> PoolResult<Self::Resource> {
        self.inner.load(locator)
    }

    /// Resolve the template: load one resource through the inner policy,
    /// park it under the anchor, deactivate and tag it.
    fn prepare(&mut self, locator: &str) -> PoolResult<()> {
        let Some(anchor) = self.anchor.as_ref() else {
            tracing::error!("No anchor is bound; cannot resolve a pool template");
            return Err(PoolError::AnchorMissing);
        };

        let mut template = self.inner.load(locator).inspect_err(|error| {
            tracing::error!(
                locator = %locator,
                error = %error,
                "Failed to load the template resource"
            );
        })?;

        template.attach(anchor);
        template.set_active(false);
        template.set_label(TEMPLATE_LABEL);
        self.template = Some(template);
        Ok(())
    }

    /// Clone the template into a fresh, parked member. Serves bulk fill,
    /// single allocation, and growth alike, so growth clones instead of
    /// hitting the inner loader.
    fn produce(&mut self) -> PoolResult<Self::Resource> {
        let Some(template) = self.template.as_ref() else {
            tracing::error!("No template resolved; allocate must run before single allocation");
            return Err(PoolError::TemplateMissing);
        };
        let Some(anchor) = self.anchor.as_ref() else {
            tracing::error!("No anchor is bound; cannot attach a cloned resource");
            return Err(PoolError::AnchorMissing);
        };

        let mut member = template.instantiate()?;
        member.attach(anchor);
        member.set_active(false);
        member.set_label(POOLED_LABEL);
        Ok(member)
    }

    /// Park a returning member: canonical origin, template orientation,
    /// inactive, re-anchored, re-tagged. A missing anchor is logged but the
    /// member is still recycled — the release itself never fails.
    fn recycle(&mut self, resource: &mut Self::Resource) {
        if let Some(template) = self.template.as_ref() {
            resource.reset_transform(template);
        }
        resource.set_active(false);

        match self.anchor.as_ref() {
            Some(anchor) => {
                resource.attach(anchor);
                resource.set_label(POOLED_LABEL);
            }
            None => {
                tracing::error!("No anchor is bound while recycling a pooled resource");
            }
        }
    }

    fn destroy(&mut self, resource: Self::Resource) {
        resource.destroy();
    }

    /// Tear down the template and the anchor themselves. The policy is not
    /// reusable until a fresh `allocate` resolves a new template under a
    /// new anchor.
    fn teardown(&mut self) {
        if let Some(template) = self.template.take() {
            template.destroy();
        }
        if let Some(anchor) = self.anchor.take() {
            <P::Resource as Attachable>::destroy_anchor(anchor);
        }
    }
}
