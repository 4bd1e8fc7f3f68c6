//! `redis` crate executor.
//!
//! Wraps a multiplexed async connection. One command per call, no
//! pipelining, no retry: a failed command surfaces as `Error::Transport`.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;

use crate::args::Arg;
use crate::reply::Reply;
use crate::Result;
use super::Executor;

/// Executor backed by a `redis::aio::MultiplexedConnection`.
#[derive(Clone)]
pub struct RedisExecutor {
    conn: MultiplexedConnection,
}

impl RedisExecutor {
    /// Connect to `url` (e.g. `redis://127.0.0.1:6379/`).
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        tracing::debug!(url, "connected");
        Ok(Self { conn })
    }

    pub fn from_connection(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl Executor for RedisExecutor {
    async fn execute(&self, args: Vec<Arg>) -> Result<Reply> {
        tracing::trace!(command = %args.first().map(Arg::to_string).unwrap_or_default(), nargs = args.len(), "execute");
        let mut cmd = redis::Cmd::new();
        for arg in args {
            cmd.arg(arg);
        }

        let mut conn = self.conn.clone();
        let value: redis::Value = cmd.query_async(&mut conn).await?;
        Ok(Reply::from(value))
    }
}
