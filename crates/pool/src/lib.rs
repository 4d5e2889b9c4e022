//! # respawn-pool
//!
//! Queue-backed object pooling for heavyweight resources: pre-build a fixed
//! (optionally growing) set of objects once, hand them out on demand, and
//! recycle returns instead of destroying and recreating.
//!
//! One pool implementation, [`ObjectPool`], is parameterized over a
//! [`LoadPolicy`] that knows how to produce, recycle, and destroy the
//! resource type. Plain resources use a policy that only loads
//! ([`FactoryPolicy`] adapts a closure); scene-graph shaped resources use
//! [`AttachPolicy`], which clones a hidden template, parks members under an
//! anchor, and resets transform and visibility on every return.
//!
//! The pool is single-threaded and synchronous: every operation takes
//! `&mut self` and runs to completion on the caller's thread. Expected
//! failures never panic and never surface as raised faults — operations
//! report them through `Err`/`None` and the `tracing` log carries the
//! detail.
//!
//! # Example
//!
//! ```
//! use respawn_pool::{FactoryPolicy, ObjectPool, PoolConfig, PoolResult};
//!
//! let policy = FactoryPolicy::new(|_locator: &str| -> PoolResult<String> {
//!     Ok(String::with_capacity(1024))
//! });
//! let mut pool = ObjectPool::with_policy(PoolConfig::fixed(2), policy)?;
//! pool.initialize(None, &())?;
//! pool.allocate("")?;
//!
//! let mut scratch = pool.get().expect("pool was just filled");
//! scratch.push_str("hello");
//! pool.release(scratch);
//!
//! assert_eq!(pool.available(), 2);
//! pool.unload();
//! # Ok::<(), respawn_pool::PoolError>(())
//! ```

#![warn(missing_docs)]

pub mod attach;
pub mod config;
pub mod error;
pub mod guard;
pub mod policy;
pub mod pool;
pub mod stats;

pub use attach::{AttachPolicy, Attachable};
pub use config::PoolConfig;
pub use error::{PoolError, PoolResult};
pub use guard::PoolGuard;
pub use policy::{FactoryPolicy, LoadPolicy};
pub use pool::ObjectPool;
pub use stats::PoolStats;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
