use pdns_cof_application::services::AggregationStore;
use pdns_cof_domain::{CounterPolicy, DomainError, Observation, ObservationSource};
use std::sync::Arc;

mod helpers;
use helpers::{store_over, store_with_policy, MockKeyValueStore};

fn obs(first: u64, last: u64) -> Observation {
    Observation::new("example.com", "1.2.3.4", 1, first).with_window(first, last)
}

// ============================================================================
// Index writes
// ============================================================================

#[tokio::test]
async fn test_merge_writes_both_indexes() {
    let kv = Arc::new(MockKeyValueStore::new());
    let store = store_over(kv.clone());

    store.merge(&obs(1000, 1000)).await.unwrap();

    assert_eq!(kv.members("r:example.com:1").await, vec!["1.2.3.4"]);
    assert_eq!(kv.members("v:1.2.3.4:1").await, vec!["example.com"]);
    assert_eq!(kv.raw_string("s:example.com:1.2.3.4:1").await.as_deref(), Some("1000"));
    assert_eq!(kv.raw_string("l:example.com:1.2.3.4:1").await.as_deref(), Some("1000"));
    assert_eq!(kv.raw_string("o:example.com:1.2.3.4:1").await.as_deref(), Some("1"));
    assert_eq!(kv.raw_string("stats:processed").await.as_deref(), Some("1"));
}

// ============================================================================
// Write-once first-seen / monotone last-seen
// ============================================================================

#[tokio::test]
async fn test_first_seen_is_write_once() {
    let kv = Arc::new(MockKeyValueStore::new());
    let store = store_over(kv.clone());

    store.merge(&obs(5000, 5000)).await.unwrap();
    // Later arrival claiming an earlier time does not displace the stored value
    store.merge(&obs(1000, 1000)).await.unwrap();
    store.merge(&obs(9000, 9000)).await.unwrap();

    assert_eq!(store.first_seen("example.com", "1.2.3.4", 1).await.unwrap(), Some(5000));
}

#[tokio::test]
async fn test_last_seen_is_monotone_max_in_any_order() {
    let orders = [[1, 2, 3], [3, 1, 2], [2, 3, 1], [3, 2, 1]];
    let times = [1000u64, 2000, 3000];

    for order in orders {
        let kv = Arc::new(MockKeyValueStore::new());
        let store = store_over(kv.clone());
        for i in order {
            let t = times[i - 1];
            store.merge(&obs(t, t)).await.unwrap();
        }
        assert_eq!(
            store.last_seen("example.com", "1.2.3.4", 1).await.unwrap(),
            Some(3000),
            "order {order:?}"
        );
    }
}

#[tokio::test]
async fn test_equal_last_seen_is_not_rewritten() {
    let kv = Arc::new(MockKeyValueStore::new());
    let store = store_over(kv.clone());
    kv.put_string("l:example.com:1.2.3.4:1", "2000.0").await;

    store.merge(&obs(2000, 2000)).await.unwrap();

    assert_eq!(kv.raw_string("l:example.com:1.2.3.4:1").await.as_deref(), Some("2000.0"));
}

#[tokio::test]
async fn test_corrupt_last_seen_is_replaced() {
    let kv = Arc::new(MockKeyValueStore::new());
    let store = store_over(kv.clone());
    kv.put_string("l:example.com:1.2.3.4:1", "garbage").await;

    store.merge(&obs(10, 20)).await.unwrap();

    assert_eq!(store.last_seen("example.com", "1.2.3.4", 1).await.unwrap(), Some(20));
}

// ============================================================================
// Counter policy
// ============================================================================

#[tokio::test]
async fn test_auto_policy_overwrites_cof_counts() {
    let kv = Arc::new(MockKeyValueStore::new());
    let store = store_with_policy(kv.clone(), CounterPolicy::Auto);

    store.merge(&obs(1, 1).with_count(40)).await.unwrap();
    store.merge(&obs(2, 2).with_count(12)).await.unwrap();

    assert_eq!(store.count("example.com", "1.2.3.4", 1).await.unwrap(), Some(12));
}

#[tokio::test]
async fn test_auto_policy_increments_raw_lines() {
    let kv = Arc::new(MockKeyValueStore::new());
    let store = store_with_policy(kv.clone(), CounterPolicy::Auto);
    let raw = obs(1, 1).with_count(12).with_source(ObservationSource::RawLine);

    store.merge(&raw).await.unwrap();
    store.merge(&raw).await.unwrap();
    store.merge(&raw).await.unwrap();

    assert_eq!(store.count("example.com", "1.2.3.4", 1).await.unwrap(), Some(3));
}

#[tokio::test]
async fn test_increment_policy_ignores_carried_counts() {
    let kv = Arc::new(MockKeyValueStore::new());
    let store = store_with_policy(kv.clone(), CounterPolicy::Increment);

    store.merge(&obs(1, 1).with_count(40)).await.unwrap();
    store.merge(&obs(1, 1).with_count(40)).await.unwrap();

    assert_eq!(store.count("example.com", "1.2.3.4", 1).await.unwrap(), Some(2));
}

// ============================================================================
// Stats
// ============================================================================

#[tokio::test]
async fn test_sensor_stats_ranked_descending() {
    let kv = Arc::new(MockKeyValueStore::new());
    let store = store_over(kv.clone());

    for _ in 0..3 {
        store.merge(&obs(1, 1).with_sensor("sensor-b")).await.unwrap();
    }
    store.merge(&obs(1, 1).with_sensor("sensor-a")).await.unwrap();
    store.merge(&obs(1, 1)).await.unwrap();

    let stats = store.stats().await.unwrap();
    assert_eq!(stats.processed, 5);
    assert_eq!(stats.sensors.len(), 2);
    assert_eq!(stats.sensors[0].sensor_id, "sensor-b");
    assert_eq!(stats.sensors[0].count, 3);
    assert_eq!(stats.sensors[1].sensor_id, "sensor-a");
    assert_eq!(kv.members("sensors:seen").await, vec!["sensor-a", "sensor-b"]);
}

#[tokio::test]
async fn test_histograms_only_for_raw_lines() {
    let kv = Arc::new(MockKeyValueStore::new());
    let store = store_over(kv.clone());

    let mut raw = obs(1, 1).with_source(ObservationSource::RawLine);
    raw.ttl = Some("299".to_string());
    raw.class = Some("IN".to_string());
    store.merge(&raw).await.unwrap();
    store.merge(&obs(1, 1)).await.unwrap();

    assert_eq!(kv.hash_field("dist:ttl", "299").await, Some(1));
    assert_eq!(kv.hash_field("dist:class", "IN").await, Some(1));
    assert_eq!(kv.hash_field("dist:type", "1").await, Some(1));
}

#[tokio::test]
async fn test_histograms_can_be_disabled() {
    let kv = Arc::new(MockKeyValueStore::new());
    let store = AggregationStore::new(kv.clone()).with_histograms(false);

    let raw = obs(1, 1).with_source(ObservationSource::RawLine);
    store.merge(&raw).await.unwrap();

    assert!(!kv.has_key("dist:type").await);
}

#[tokio::test]
async fn test_empty_store_stats_are_zero() {
    let kv = Arc::new(MockKeyValueStore::new());
    let stats = store_over(kv).stats().await.unwrap();
    assert_eq!(stats.processed, 0);
    assert!(stats.sensors.is_empty());
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_unreachable_store_fails_merge() {
    let kv = Arc::new(MockKeyValueStore::new());
    kv.set_should_fail(true);
    let store = store_over(kv.clone());

    let result = store.merge(&obs(1, 1)).await;
    assert!(matches!(result, Err(DomainError::StoreUnavailable(_))));
}

#[tokio::test]
async fn test_corrupt_first_seen_is_reported() {
    let kv = Arc::new(MockKeyValueStore::new());
    kv.put_string("s:example.com:1.2.3.4:1", "not-a-number").await;
    let store = store_over(kv);

    let result = store.first_seen("example.com", "1.2.3.4", 1).await;
    assert!(matches!(result, Err(DomainError::CorruptValue { .. })));
}

#[tokio::test]
async fn test_forward_scan_reads_every_page() {
    let kv = Arc::new(MockKeyValueStore::new());
    for i in 0..25 {
        kv.put_member("r:big.example:1", &format!("10.0.0.{i}")).await;
    }
    let store = store_over(kv.clone());

    let members = store.forward_scan("big.example", 1, 10).await.unwrap();
    assert_eq!(members.len(), 25);
    assert_eq!(kv.scan_calls(), 3);
}
