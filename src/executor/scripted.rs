//! Scripted executor.
//!
//! This is the reference implementation of `Executor`.
//! It replays a queue of canned replies and records every request.
//!
//! ## Limitations
//!
//! - **No protocol knowledge**: replies are returned in queue order no matter
//!   which command was sent.
//! - **Finite script**: once the queue is empty every call fails with
//!   `Error::Transport`.
//!
//! Use this executor for:
//! - Testing builders and decoders end to end without a server
//! - Checking exactly which requests a multi-round-trip flow issued

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::args::Arg;
use crate::reply::Reply;
use crate::{Error, Result};
use super::Executor;

/// Executor that answers from a pre-loaded script.
#[derive(Default)]
pub struct ScriptedExecutor {
    script: Mutex<VecDeque<Result<Reply>>>,
    requests: Mutex<Vec<Vec<Arg>>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an executor that will answer with `replies` in order.
    pub fn with_replies(replies: impl IntoIterator<Item = Reply>) -> Self {
        let exec = Self::new();
        exec.script.lock().extend(replies.into_iter().map(Ok));
        exec
    }

    pub fn push_reply(&self, reply: impl Into<Reply>) {
        self.script.lock().push_back(Ok(reply.into()));
    }

    /// Queue a transport failure.
    pub fn push_error(&self, message: impl Into<String>) {
        self.script.lock().push_back(Err(Error::Transport(message.into())));
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<Vec<Arg>> {
        self.requests.lock().clone()
    }

    /// Number of scripted answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

#[async_trait]
impl Executor for ScriptedExecutor {
    async fn execute(&self, args: Vec<Arg>) -> Result<Reply> {
        tracing::trace!(command = %args.first().map(Arg::to_string).unwrap_or_default(), "scripted execute");
        self.requests.lock().push(args);
        self.script.lock().pop_front().unwrap_or_else(|| {
            tracing::warn!("scripted executor has no reply left");
            Err(Error::Transport("script exhausted".into()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order_and_records() {
        let exec = ScriptedExecutor::with_replies([Reply::Int(1), Reply::from("OK")]);
        assert_eq!(exec.execute(args!["PING"]).await.unwrap(), Reply::Int(1));
        assert_eq!(exec.execute(args!["ECHO", "x"]).await.unwrap(), Reply::from("OK"));
        assert_eq!(exec.requests(), vec![args!["PING"], args!["ECHO", "x"]]);
        assert_eq!(exec.remaining(), 0);
    }

    #[tokio::test]
    async fn test_exhausted_and_scripted_errors() {
        let exec = ScriptedExecutor::new();
        exec.push_error("connection reset");
        assert!(matches!(exec.execute(args!["PING"]).await, Err(Error::Transport(m)) if m == "connection reset"));
        assert!(matches!(exec.execute(args!["PING"]).await, Err(Error::Transport(_))));
        assert_eq!(exec.requests().len(), 2);
    }
}
