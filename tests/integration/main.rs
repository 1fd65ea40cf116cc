//! End-to-end test suite: spins up a real cluster of storage nodes, a
//! metadata service, and a coordinator as subprocesses bound to ephemeral
//! loopback ports, then drives them with plain HTTP the way `dfs-ctl`
//! would.
//!
//! Tests that spawn their own cluster run independently — each gets fresh
//! ephemeral ports and temp directories, so they can run in parallel.

mod harness;

use harness::{corrupt_all_chunks_in, TestCluster};

#[tokio::test]
async fn small_upload_and_download_roundtrip() {
    let cluster = TestCluster::start(3, 3).await.expect("cluster start");

    let file_id = cluster
        .upload("greeting.txt", &[b"hello ", b"world"])
        .await
        .expect("upload");

    assert_eq!(file_id.len(), 16);
    assert!(file_id.chars().all(|c| c.is_ascii_hexdigit()));

    let data = cluster.download(&file_id).await.expect("download");
    assert_eq!(data, b"hello world");
}

#[tokio::test]
async fn zero_byte_file_is_readable() {
    let cluster = TestCluster::start(2, 2).await.expect("cluster start");

    let file_id = cluster.upload("empty.bin", &[]).await.expect("upload");
    let data = cluster.download(&file_id).await.expect("download");
    assert!(data.is_empty());
}

#[tokio::test]
async fn zero_byte_file_preserves_real_file_name() {
    // Mirrors what `dfs-ctl` actually sends for a zero-byte local file: one
    // empty-bodied multipart part carrying the real basename, rather than
    // zero parts (which would leave the coordinator with no file name to
    // learn from and fall back to a placeholder).
    let cluster = TestCluster::start(2, 2).await.expect("cluster start");

    let file_id = cluster.upload("report.pdf", &[b""]).await.expect("upload");
    let (file_name, data) = cluster.download_with_name(&file_id).await.expect("download");

    assert_eq!(file_name.as_deref(), Some("report.pdf"));
    assert!(data.is_empty());
}

#[tokio::test]
async fn chunk_ordering_is_preserved() {
    let cluster = TestCluster::start(3, 2).await.expect("cluster start");

    let frames: Vec<&[u8]> = vec![b"A", b"B", b"C", b"D", b"E"];
    let file_id = cluster.upload("sequence.bin", &frames).await.expect("upload");

    let data = cluster.download(&file_id).await.expect("download");
    assert_eq!(data, b"ABCDE");
}

#[tokio::test]
async fn replica_failover_tolerates_up_to_r_minus_one_corrupt_copies() {
    let cluster = TestCluster::start(3, 3).await.expect("cluster start");
    let dirs = cluster.storage_dirs();

    let file_id = cluster.upload("abc.bin", &[b"abc"]).await.expect("upload");
    assert_eq!(cluster.download(&file_id).await.expect("download"), b"abc");

    // Corrupt replica 0: the other two are still intact.
    corrupt_all_chunks_in(dirs[0]).expect("corrupt replica 0");
    assert_eq!(cluster.download(&file_id).await.expect("download after 1 corrupt"), b"abc");

    // Corrupt replica 1 too: only replica 2 remains intact.
    corrupt_all_chunks_in(dirs[1]).expect("corrupt replica 1");
    assert_eq!(cluster.download(&file_id).await.expect("download after 2 corrupt"), b"abc");

    // Corrupt every replica: the download must fail.
    corrupt_all_chunks_in(dirs[2]).expect("corrupt replica 2");
    let err = cluster.download(&file_id).await.expect_err("all replicas corrupt");
    assert_eq!(err, 500);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let cluster = TestCluster::start(2, 2).await.expect("cluster start");

    let file_id = cluster.upload("doomed.txt", &[b"bye"]).await.expect("upload");
    assert_eq!(cluster.delete(&file_id).await, 200);

    let download_status = cluster.download(&file_id).await.expect_err("download after delete");
    assert_eq!(download_status, 404);

    let second_delete_status = cluster.delete(&file_id).await;
    assert_eq!(second_delete_status, 404);
}

#[tokio::test]
async fn same_name_concurrent_uploads_get_distinct_ids() {
    let cluster = TestCluster::start(2, 2).await.expect("cluster start");

    let first = cluster.upload("report.pdf", &[b"v1"]).await.expect("first upload");
    // Wall-clock salted: a short pause guarantees distinct timestamps even
    // on coarse clocks.
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = cluster.upload("report.pdf", &[b"v2"]).await.expect("second upload");

    assert_ne!(first, second);
    assert_eq!(cluster.download(&first).await.expect("download first"), b"v1");
    assert_eq!(cluster.download(&second).await.expect("download second"), b"v2");
}

#[tokio::test]
async fn under_replication_guard_rejects_upload() {
    // N=2 known nodes, R=3: cannot be satisfied.
    let cluster = TestCluster::start(2, 3).await.expect("cluster start");

    let result = cluster.upload("oversubscribed.bin", &[b"data"]).await;
    assert!(result.is_err(), "upload should be rejected when R exceeds N");
}

#[tokio::test]
async fn download_of_unknown_file_id_is_not_found() {
    let cluster = TestCluster::start(1, 1).await.expect("cluster start");
    let status = cluster.download("0000000000000000").await.expect_err("unknown file");
    assert_eq!(status, 404);
}

#[tokio::test]
async fn larger_file_spans_multiple_chunks() {
    let cluster = TestCluster::start(3, 3).await.expect("cluster start");

    let chunk_a = vec![1u8; 64 * 1024];
    let chunk_b = vec![2u8; 64 * 1024];
    let chunk_c = vec![3u8; 17];
    let frames: Vec<&[u8]> = vec![&chunk_a, &chunk_b, &chunk_c];

    let file_id = cluster.upload("big.bin", &frames).await.expect("upload");
    let data = cluster.download(&file_id).await.expect("download");

    let mut expected = Vec::new();
    expected.extend_from_slice(&chunk_a);
    expected.extend_from_slice(&chunk_b);
    expected.extend_from_slice(&chunk_c);
    assert_eq!(data, expected);
}
