//! # redisstack — typed marshalling for Redis Stack modules
//!
//! Builds positional command argument sequences for the Redis Stack modules
//! and decodes their schema-less replies into typed results.
//!
//! ## Design Principles
//!
//! 1. **Builders are total**: every `*_args` function returns a `Vec<Arg>` and never fails
//! 2. **Decoders are atomic**: every `*_result` function either returns the full value or an [`Error`]
//! 3. **Transport is a trait**: [`Executor`] is the only seam to the outside world
//! 4. **Graph patterns are data**: [`graph::pattern::Pattern`] renders Cypher text, it never parses it
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use redisstack::{bloom_filter, Executor, ScriptedExecutor, Reply};
//!
//! # async fn example() -> redisstack::Result<()> {
//! let executor = ScriptedExecutor::new();
//! executor.push_reply(Reply::Int(1));
//!
//! let reply = executor.execute(bloom_filter::add_args("visitors", "ada")).await?;
//! let added = bloom_filter::add_result(&reply)?;
//! assert!(added);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! | Module | Commands |
//! |--------|----------|
//! | [`bloom_filter`] | `BF.*` |
//! | [`cuckoo_filter`] | `CF.*` |
//! | [`count_min_sketch`] | `CMS.*` |
//! | [`top_k`] | `TOPK.*` |
//! | [`time_series`] | `TS.*` |
//! | [`graph`] | `GRAPH.*` + Cypher pattern rendering |

// ============================================================================
// Modules
// ============================================================================

#[macro_use]
pub mod args;
pub mod reply;
pub mod model;
pub mod executor;
pub mod scan_dump;

pub mod bloom_filter;
pub mod cuckoo_filter;
pub mod count_min_sketch;
pub mod top_k;
pub mod time_series;
pub mod graph;

// ============================================================================
// Re-exports
// ============================================================================

pub use args::Arg;
pub use reply::{Reply, FromReply};
pub use model::{ItemAmount, Property};
pub use executor::{Executor, ScriptedExecutor};
pub use scan_dump::ScanDump;

#[cfg(feature = "redis")]
pub use executor::RedisExecutor;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A reply value had a different concrete variant than the decoder expected.
    #[error("Invalid type: expected {expected}, got {got}")]
    InvalidType { expected: &'static str, got: &'static str },

    /// A reply had the right variant but the wrong length, arity or content.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The executor failed to deliver the command or receive its reply.
    #[error("Transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(feature = "redis")]
impl From<redis::RedisError> for Error {
    fn from(e: redis::RedisError) -> Self {
        Error::Transport(e.to_string())
    }
}
