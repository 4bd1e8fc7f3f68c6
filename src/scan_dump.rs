//! Incremental dump (`BF.SCANDUMP` / `CF.SCANDUMP`).
//!
//! The only multi-round-trip flow in the crate. The caller-visible cursor is
//! the chunk iterator: each request carries the iterator of the previous
//! chunk, starting from 0, and a chunk whose iterator is 0 ends the dump.
//!
//! ```text
//! SCANDUMP key 0  → [5, <data>]
//! SCANDUMP key 5  → [9, <data>]
//! SCANDUMP key 9  → [0, nil]      (end, not returned)
//! ```

use serde::{Deserialize, Serialize};

use crate::args::Arg;
use crate::executor::Executor;
use crate::reply::{parse, Reply};
use crate::Result;

/// One chunk of an incremental dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanDump {
    /// Continuation token. `0` marks the end of the dump.
    pub iter: i64,
    /// Opaque chunk payload; empty when `iter == 0`.
    pub data: Vec<u8>,
}

impl ScanDump {
    pub fn is_last(&self) -> bool {
        self.iter == 0
    }
}

/// Decode a `[iter, data]` reply. A non-zero iterator must carry a payload.
pub fn parse_scan_dump(reply: &Reply) -> Result<ScanDump> {
    let arr = parse::array(reply, 2)?;
    let iter = parse::scalar::<i64>(&arr[0])?;
    let data = if iter == 0 { Vec::new() } else { parse::blob(&arr[1])? };
    Ok(ScanDump { iter, data })
}

/// Run the dump loop for `key`, building each request with `build(key, iter)`.
///
/// Returns every chunk before the terminal one. Transport and decode errors
/// are returned as-is and no further request is issued.
pub async fn dump_batch<E, F>(executor: &E, key: &str, build: F) -> Result<Vec<ScanDump>>
where
    E: Executor + ?Sized,
    F: Fn(&str, i64) -> Vec<Arg>,
{
    let mut chunks = Vec::new();
    let mut iter = 0;
    loop {
        let reply = executor.execute(build(key, iter)).await?;
        let chunk = parse_scan_dump(&reply)?;
        if chunk.is_last() {
            break;
        }
        tracing::debug!(key, iter = chunk.iter, bytes = chunk.data.len(), "dump chunk");
        iter = chunk.iter;
        chunks.push(chunk);
    }
    tracing::debug!(key, chunks = chunks.len(), "dump complete");
    Ok(chunks)
}
