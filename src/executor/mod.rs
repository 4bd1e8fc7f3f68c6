//! # Executor Trait
//!
//! The contract between this crate and whatever actually talks to the store.
//! Builders produce a `Vec<Arg>`, an executor turns it into a [`Reply`].
//!
//! ## Implementations
//!
//! | Executor | Module | Description |
//! |----------|--------|-------------|
//! | `ScriptedExecutor` | `scripted` | Replays queued replies, records requests |
//! | `RedisExecutor` | `redis` | `redis` crate multiplexed connection (feature `redis`) |
//!
//! Retries, pooling, pipelining, timeouts and cancellation all belong to the
//! executor. Nothing in this crate adds them.

pub mod scripted;
#[cfg(feature = "redis")]
pub mod redis;

use std::sync::Arc;

use async_trait::async_trait;

use crate::args::Arg;
use crate::reply::Reply;
use crate::Result;

pub use scripted::ScriptedExecutor;
#[cfg(feature = "redis")]
pub use self::redis::RedisExecutor;

/// Sends one command and returns its raw reply.
///
/// Implementations must report transport failures as
/// [`Error::Transport`](crate::Error::Transport). They may be called
/// concurrently from several tasks.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, args: Vec<Arg>) -> Result<Reply>;
}

#[async_trait]
impl<'a, E: Executor + ?Sized> Executor for &'a E {
    async fn execute(&self, args: Vec<Arg>) -> Result<Reply> {
        (**self).execute(args).await
    }
}

#[async_trait]
impl<E: Executor + ?Sized> Executor for Arc<E> {
    async fn execute(&self, args: Vec<Arg>) -> Result<Reply> {
        (**self).execute(args).await
    }
}
