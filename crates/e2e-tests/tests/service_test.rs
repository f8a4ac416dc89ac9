//! Health and snapshot E2E tests, plus transport failure paths.

use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;

use e2e_tests::fake::{SERVICE_TITLE, SERVICE_VERSION};
use e2e_tests::{test_id, FakeQdrant, TestHarness};
use qdrant_client::{ClientError, Point, QdrantClient};

#[tokio::test]
async fn test_health_reports_title_and_version() {
    let harness = TestHarness::start().await.unwrap();
    let client = harness.client().await;

    let info = client.health().await.unwrap();
    assert_eq!(info.title, SERVICE_TITLE);
    assert_eq!(info.version, SERVICE_VERSION);
    assert!(info.commit.is_none());
}

#[tokio::test]
async fn test_health_unreachable_is_transport_error() {
    // Nothing listens on port 1
    let client = QdrantClient::connect_lazy("http://127.0.0.1:1").unwrap();

    let err = client.health().await.unwrap_err();
    assert!(
        matches!(err, ClientError::Rpc(_)),
        "expected transport-class error, got {err:?}"
    );
}

#[tokio::test]
async fn test_snapshot_lifecycle() {
    let harness = TestHarness::start().await.unwrap();
    let client = harness.client().await;
    client.create_collection("docs", 2, "DOT").await.unwrap();
    client
        .upsert("docs", vec![Point::new(test_id(1), vec![1.0, 0.0])], true)
        .await
        .unwrap();

    let snapshot = client.take_snapshot("docs").await.unwrap();
    assert!(snapshot.name.starts_with("docs-"));
    assert!(snapshot.size_bytes > 0);
    assert!(snapshot.created_at.is_some());

    let listed = client.list_snapshots("docs").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, snapshot.name);

    client.delete_snapshot("docs", &snapshot.name).await.unwrap();
    assert!(client.list_snapshots("docs").await.unwrap().is_empty());

    let err = client
        .delete_snapshot("docs", &snapshot.name)
        .await
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.code()), Some(tonic::Code::NotFound));
}

#[tokio::test]
async fn test_snapshot_reply_without_description() {
    let harness = TestHarness::start_with(FakeQdrant::new().with_bare_snapshot_replies())
        .await
        .unwrap();
    let client = harness.client().await;
    client.create_collection("docs", 2, "DOT").await.unwrap();

    let snapshot = client.take_snapshot("docs").await.unwrap();
    assert_eq!(snapshot.name, "");
    assert_eq!(snapshot.size_bytes, 0);
    assert!(snapshot.created_at.is_none());

    // The service still recorded it
    assert_eq!(client.list_snapshots("docs").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_snapshot_of_missing_collection_fails() {
    let harness = TestHarness::start().await.unwrap();
    let client = harness.client().await;

    let err = client.take_snapshot("nope").await.unwrap_err();
    assert_eq!(err.status().map(|s| s.code()), Some(tonic::Code::NotFound));
}

#[tokio::test]
async fn test_request_timeout_bounds_slow_calls() {
    let harness = TestHarness::start_with(FakeQdrant::new().with_latency(Duration::from_secs(2)))
        .await
        .unwrap();
    let client = harness.client_with_timeout(Duration::from_millis(100)).await;
    assert_eq!(client.request_timeout(), Some(Duration::from_millis(100)));

    let started = Instant::now();
    let err = client.health().await.unwrap_err();

    assert!(err.status().is_some(), "expected RPC status, got {err:?}");
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "call was not cut short: {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn test_sub_clients_share_connection() {
    let harness = TestHarness::start().await.unwrap();
    let client = harness.client().await;

    let collections = client.collections();
    let points = client.points();

    collections.create_collection("docs", 2, "COSINE").await.unwrap();
    points
        .upsert("docs", vec![Point::new(test_id(7), vec![0.0, 1.0])], false)
        .await
        .unwrap();

    let hits = points.search("docs", &[0.0, 1.0], 5).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, test_id(7));
    assert_eq!(client.service().health().await.unwrap().title, SERVICE_TITLE);
    assert!(client.snapshots().list_snapshots("docs").await.unwrap().is_empty());
}
