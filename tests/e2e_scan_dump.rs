//! End-to-end tests for the incremental dump loop.
//!
//! Each test scripts the executor with SCANDUMP replies and checks both the
//! returned chunks and the exact sequence of requests issued.

use pretty_assertions::assert_eq;
use redisstack::{args, bloom_filter, cuckoo_filter, Arg, Error, Reply, ScanDump, ScriptedExecutor};

fn chunk(iter: i64, data: &[u8]) -> Reply {
    Reply::Array(vec![Reply::Int(iter), Reply::Bytes(data.to_vec())])
}

fn end() -> Reply {
    Reply::Array(vec![Reply::Int(0), Reply::Null])
}

// ============================================================================
// Happy path
// ============================================================================

#[tokio::test]
async fn test_bloom_dump_follows_iterators() {
    let exec = ScriptedExecutor::with_replies([chunk(5, b"head"), chunk(9, b"tail"), end()]);

    let chunks = bloom_filter::dump_batch(&exec, "bf").await.unwrap();

    assert_eq!(
        chunks,
        vec![
            ScanDump { iter: 5, data: b"head".to_vec() },
            ScanDump { iter: 9, data: b"tail".to_vec() },
        ]
    );
    assert_eq!(
        exec.requests(),
        vec![
            args!["BF.SCANDUMP", "bf", 0i64],
            args!["BF.SCANDUMP", "bf", 5i64],
            args!["BF.SCANDUMP", "bf", 9i64],
        ]
    );
    assert_eq!(exec.remaining(), 0);
}

#[tokio::test]
async fn test_cuckoo_dump_accepts_text_payload() {
    let exec = ScriptedExecutor::with_replies([
        Reply::from(vec![Reply::Int(3), Reply::from("abc")]),
        end(),
    ]);

    let chunks = cuckoo_filter::dump_batch(&exec, "cf").await.unwrap();

    assert_eq!(chunks, vec![ScanDump { iter: 3, data: b"abc".to_vec() }]);
    assert_eq!(exec.requests()[0][0], Arg::from("CF.SCANDUMP"));
}

#[tokio::test]
async fn test_empty_filter_dumps_nothing() {
    let exec = ScriptedExecutor::with_replies([end()]);
    let chunks = bloom_filter::dump_batch(&exec, "bf").await.unwrap();
    assert!(chunks.is_empty());
    assert_eq!(exec.requests().len(), 1);
}

#[tokio::test]
async fn test_dump_then_restore_args() {
    let exec = ScriptedExecutor::with_replies([chunk(1, &[0, 1, 2]), end()]);
    let chunks = bloom_filter::dump_batch(&exec, "src").await.unwrap();

    let restore: Vec<Vec<Arg>> = chunks
        .iter()
        .map(|c| bloom_filter::load_chunk_args("dst", c.iter, &c.data))
        .collect();
    assert_eq!(
        restore,
        vec![vec![
            Arg::from("BF.LOADCHUNK"),
            Arg::from("dst"),
            Arg::Int(1),
            Arg::Bytes(vec![0, 1, 2]),
        ]]
    );
}

// ============================================================================
// Failures stop the loop
// ============================================================================

#[tokio::test]
async fn test_transport_error_mid_dump() {
    let exec = ScriptedExecutor::with_replies([chunk(5, b"x")]);
    exec.push_error("connection reset");
    exec.push_reply(end());

    let res = bloom_filter::dump_batch(&exec, "bf").await;

    assert!(matches!(res, Err(Error::Transport(ref m)) if m == "connection reset"));
    assert_eq!(exec.requests().len(), 2);
    assert_eq!(exec.remaining(), 1);
}

#[tokio::test]
async fn test_decode_error_mid_dump() {
    let exec = ScriptedExecutor::with_replies([
        chunk(5, b"x"),
        Reply::from(vec![Reply::Int(7), Reply::Null]),
        end(),
    ]);

    let res = cuckoo_filter::dump_batch(&exec, "cf").await;

    assert!(matches!(res, Err(Error::InvalidType { .. })));
    assert_eq!(exec.requests().len(), 2);
}

#[tokio::test]
async fn test_script_exhausted() {
    let exec = ScriptedExecutor::with_replies([chunk(5, b"x")]);
    let res = bloom_filter::dump_batch(&exec, "bf").await;
    assert!(matches!(res, Err(Error::Transport(_))));
}
