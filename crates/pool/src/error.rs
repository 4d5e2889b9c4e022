//! Error types for pool operations
use thiserror::Error;

/// Result type for pool operations
pub type PoolResult<T> = Result<T, PoolError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Error type covering every failure a pool operation can report.
///
/// Pool exhaustion is deliberately absent: an empty, non-growing pool is a
/// normal flow-control outcome and [`crate::pool::ObjectPool::get`] expresses
/// it as `None`.
#[derive(Error, Debug)]
pub enum PoolError {
    /// Pool configuration is invalid
    #[error("Configuration error: {message}")]
    Configuration {
        /// The error message
        message: String,
    },

    /// An operation ran before `initialize`
    #[error("Pool '{pool}' is not initialized")]
    NotInitialized {
        /// The pool label
        pool: String,
    },

    /// No load policy is bound to the pool
    #[error("Pool '{pool}' has no load policy bound")]
    MissingPolicy {
        /// The pool label
        pool: String,
    },

    /// The bound load policy has not completed its one-time setup
    #[error("Load policy for pool '{pool}' has not been set up")]
    PolicyNotReady {
        /// The pool label
        pool: String,
    },

    /// The attach policy has no anchor to parent resources under
    #[error("No anchor is bound to the attach policy")]
    AnchorMissing,

    /// Single allocation was requested before `allocate` resolved a template
    #[error("No template is resolved; allocate must run before single allocation")]
    TemplateMissing,

    /// The load policy's one-time setup failed
    #[error("Policy setup failed: {reason}")]
    SetupFailed {
        /// The failure reason
        reason: String,
        /// The underlying error
        #[source]
        source: Option<BoxedSource>,
    },

    /// The load policy could not produce a resource
    #[error("Failed to load resource for locator '{locator}': {reason}")]
    LoadFailed {
        /// The locator the load was attempted with
        locator: String,
        /// The failure reason
        reason: String,
        /// The underlying error
        #[source]
        source: Option<BoxedSource>,
    },

    /// Cloning the template resource failed
    #[error("Failed to clone the template resource: {reason}")]
    CloneFailed {
        /// The failure reason
        reason: String,
        /// The underlying error
        #[source]
        source: Option<BoxedSource>,
    },
}

impl PoolError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a not-initialized error for the given pool label
    pub fn not_initialized<S: Into<String>>(pool: S) -> Self {
        Self::NotInitialized { pool: pool.into() }
    }

    /// Create a missing-policy error for the given pool label
    pub fn missing_policy<S: Into<String>>(pool: S) -> Self {
        Self::MissingPolicy { pool: pool.into() }
    }

    /// Create a policy-not-ready error for the given pool label
    pub fn policy_not_ready<S: Into<String>>(pool: S) -> Self {
        Self::PolicyNotReady { pool: pool.into() }
    }

    /// Create a setup failure with a plain reason
    pub fn setup_failed<S: Into<String>>(reason: S) -> Self {
        Self::SetupFailed {
            reason: reason.into(),
            source: None,
        }
    }

    /// Create a load failure with a plain reason (the policy found nothing)
    pub fn load_failed<L, S>(locator: L, reason: S) -> Self
    where
        L: Into<String>,
        S: Into<String>,
    {
        Self::LoadFailed {
            locator: locator.into(),
            reason: reason.into(),
            source: None,
        }
    }

    /// Wrap an unexpected fault raised while loading
    pub fn load_fault<L: Into<String>>(locator: L, source: BoxedSource) -> Self {
        Self::LoadFailed {
            locator: locator.into(),
            reason: "load policy raised a fault".to_string(),
            source: Some(source),
        }
    }

    /// Create a clone failure with a plain reason
    pub fn clone_failed<S: Into<String>>(reason: S) -> Self {
        Self::CloneFailed {
            reason: reason.into(),
            source: None,
        }
    }

    /// Wrap an unexpected fault raised while cloning the template
    pub fn clone_fault(source: BoxedSource) -> Self {
        Self::CloneFailed {
            reason: "template clone raised a fault".to_string(),
            source: Some(source),
        }
    }

    /// Whether this error reports a violated call-order precondition
    /// (initialize-before-use, bind-a-policy, allocate-before-single) rather
    /// than a resource-production failure.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::NotInitialized { .. }
                | Self::MissingPolicy { .. }
                | Self::PolicyNotReady { .. }
                | Self::AnchorMissing
                | Self::TemplateMissing
        )
    }

    /// Get the pool label associated with this error (if any)
    #[must_use]
    pub fn pool(&self) -> Option<&str> {
        match self {
            Self::NotInitialized { pool }
            | Self::MissingPolicy { pool }
            | Self::PolicyNotReady { pool } => Some(pool),
            _ => None,
        }
    }
}
