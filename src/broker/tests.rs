use std::sync::Arc;

use futures::future::join_all;

use super::Broker;
use super::mailbox::{DEFAULT_CAPACITY, Mailbox};
use super::subscription::Subscription;
use super::topic::Topic;
use crate::config::BrokerSettings;
use crate::utils::error::BrokerError;

#[test]
fn test_mailbox_enqueue_and_drain_in_order() {
    let mailbox = Mailbox::new(4);
    assert!(mailbox.enqueue("a"));
    assert!(mailbox.enqueue("b"));
    assert!(mailbox.enqueue("c"));
    assert_eq!(mailbox.len(), 3);
    assert_eq!(mailbox.drain_all(), vec!["a", "b", "c"]);
    assert!(mailbox.is_empty());
}

#[test]
fn test_mailbox_rejects_when_full() {
    let mailbox = Mailbox::new(2);
    assert!(mailbox.enqueue(1));
    assert!(mailbox.enqueue(2));
    assert!(!mailbox.enqueue(3));
    assert_eq!(mailbox.len(), 2);
    assert_eq!(mailbox.drain_all(), vec![1, 2]);

    // Draining frees room again
    assert!(mailbox.enqueue(4));
    assert_eq!(mailbox.drain_all(), vec![4]);
}

#[test]
fn test_mailbox_drain_empty() {
    let mailbox: Mailbox<String> = Mailbox::default();
    assert_eq!(mailbox.capacity(), DEFAULT_CAPACITY);
    assert!(mailbox.drain_all().is_empty());
}

#[test]
fn test_mailbox_zero_capacity_rejects_everything() {
    let mailbox = Mailbox::new(0);
    assert!(!mailbox.enqueue("x"));
    assert!(mailbox.drain_all().is_empty());
}

#[test]
fn test_subscription_new() {
    let sub = Subscription::new("alice");
    assert_eq!(sub.name(), "alice");
    assert_eq!(sub.capacity(), DEFAULT_CAPACITY);
    assert_eq!(sub.pending(), 0);
    assert!(sub.pull().is_empty());
}

#[test]
fn test_subscription_pull_drains() {
    let sub = Subscription::with_capacity("alice", 3);
    assert!(sub.deliver("one".to_string()));
    assert!(sub.deliver("two".to_string()));
    assert_eq!(sub.pending(), 2);
    assert_eq!(sub.pull(), vec!["one", "two"]);
    assert!(sub.pull().is_empty());
}

#[test]
fn test_topic_new() {
    let topic = Topic::new("test_topic");
    assert_eq!(topic.name, "test_topic");
    assert!(topic.subscribers.is_empty());
}

#[test]
fn test_topic_subscribe() {
    let mut topic = Topic::new("test_topic");
    topic.subscribe("client1", 10).unwrap();
    assert!(topic.subscribers.contains_key("client1"));
}

#[test]
fn test_topic_subscribe_duplicate() {
    let mut topic = Topic::new("test_topic");
    topic.subscribe("client1", 10).unwrap();
    let err = topic.subscribe("client1", 10).unwrap_err();
    assert_eq!(
        err,
        BrokerError::DuplicateSubscription {
            topic: "test_topic".to_string(),
            name: "client1".to_string(),
        }
    );
    assert_eq!(topic.len(), 1);
}

#[test]
fn test_topic_unsubscribe() {
    let mut topic = Topic::new("test_topic");
    topic.subscribe("client1", 10).unwrap();
    let removed = topic.unsubscribe("client1").unwrap();
    assert_eq!(removed.name(), "client1");
    assert!(!topic.subscribers.contains_key("client1"));
    assert!(matches!(
        topic.unsubscribe("client1"),
        Err(BrokerError::SubscriptionNotFound { .. })
    ));
}

#[test]
fn test_broker_new() {
    let broker = Broker::default();
    assert!(broker.topics().is_empty());
    assert_eq!(broker.mailbox_capacity(), DEFAULT_CAPACITY);
}

#[test]
fn test_broker_from_settings() {
    let broker = Broker::from_settings(&BrokerSettings {
        mailbox_capacity: 7,
    });
    let sub = broker.subscribe("t", "s").unwrap();
    assert_eq!(sub.capacity(), 7);
}

#[test]
fn test_broker_create_and_delete_topic() {
    let broker = Broker::new();
    broker.create_topic("news");
    assert!(broker.has_topic("news"));
    assert_eq!(broker.subscriber_count("news"), 0);

    broker.delete_topic("news");
    assert!(!broker.has_topic("news"));

    // Deleting an absent topic is a no-op
    broker.delete_topic("news");
    assert!(broker.topics().is_empty());
}

#[test]
fn test_broker_publish_single_subscriber() {
    let broker = Broker::new();
    broker.create_topic("test_topic");
    let sub = broker.subscribe("test_topic", "test_subscriber").unwrap();

    let msgs = ["test message 1", "test message 2", "test message 3"];
    for msg in msgs {
        assert_eq!(broker.publish("test_topic", msg), 1);
    }

    assert_eq!(sub.pull(), msgs);
}

#[test]
fn test_broker_publish_fans_out() {
    let broker = Broker::new();
    broker.create_topic("test_topic");
    let subs: Vec<_> = (1..=3)
        .map(|i| {
            broker
                .subscribe("test_topic", &format!("test_subscriber{i}"))
                .unwrap()
        })
        .collect();

    assert_eq!(broker.publish("test_topic", "test message"), 3);

    for sub in subs {
        assert_eq!(sub.pull(), vec!["test message"]);
    }
}

#[test]
fn test_broker_same_name_on_different_topics() {
    let broker = Broker::new();
    broker.create_topic("topic1");
    broker.create_topic("topic2");
    let sub1 = broker.subscribe("topic1", "test_subscriber").unwrap();
    let sub2 = broker.subscribe("topic2", "test_subscriber").unwrap();

    broker.publish("topic1", "for one");
    broker.publish("topic2", "for two");

    assert_eq!(sub1.pull(), vec!["for one"]);
    assert_eq!(sub2.pull(), vec!["for two"]);
}

#[test]
fn test_broker_duplicate_subscription() {
    let broker = Broker::new();
    broker.create_topic("news");
    let first = broker.subscribe("news", "alice").unwrap();

    let err = broker.subscribe("news", "alice").unwrap_err();
    assert!(matches!(err, BrokerError::DuplicateSubscription { .. }));
    assert_eq!(broker.subscriber_count("news"), 1);

    broker.publish("news", "hello");
    assert_eq!(first.pull(), vec!["hello"]);
}

#[test]
fn test_broker_unsubscribe_stops_delivery() {
    let broker = Broker::new();
    broker.create_topic("test_topic");
    let sub = broker.subscribe("test_topic", "test_subscriber").unwrap();

    broker.publish("test_topic", "before");
    broker.unsubscribe("test_topic", "test_subscriber").unwrap();
    assert_eq!(broker.publish("test_topic", "after"), 0);

    // Already buffered content survives the unsubscribe
    assert_eq!(sub.pull(), vec!["before"]);
    assert!(sub.pull().is_empty());
}

#[test]
fn test_broker_unsubscribe_unknown() {
    let broker = Broker::new();
    broker.create_topic("news");
    assert_eq!(
        broker.unsubscribe("news", "ghost"),
        Err(BrokerError::SubscriptionNotFound {
            topic: "news".to_string(),
            name: "ghost".to_string(),
        })
    );
    assert!(matches!(
        broker.unsubscribe("missing_topic", "ghost"),
        Err(BrokerError::SubscriptionNotFound { .. })
    ));
}

#[test]
fn test_broker_resubscribe_after_unsubscribe() {
    let broker = Broker::new();
    let old = broker.subscribe("news", "alice").unwrap();
    broker.unsubscribe("news", "alice").unwrap();
    let new = broker.subscribe("news", "alice").unwrap();

    broker.publish("news", "fresh");
    assert!(old.pull().is_empty());
    assert_eq!(new.pull(), vec!["fresh"]);
}

#[test]
fn test_publish_to_nonexistent_topic() {
    let broker = Broker::new();
    assert_eq!(broker.publish("nonexistent_topic", "hello"), 0);
    assert!(!broker.has_topic("nonexistent_topic"));
}

#[test]
fn test_publish_to_topic_without_subscribers() {
    let broker = Broker::new();
    broker.create_topic("empty");
    assert_eq!(broker.publish("empty", "hello"), 0);
    assert_eq!(broker.subscriber_count("empty"), 0);
}

#[test]
fn test_publish_drops_on_full_mailbox() {
    let broker = Broker::with_mailbox_capacity(2);
    broker.create_topic("news");
    let sub = broker.subscribe("news", "slow").unwrap();

    assert_eq!(broker.publish("news", "m1"), 1);
    assert_eq!(broker.publish("news", "m2"), 1);
    assert_eq!(broker.publish("news", "m3"), 0);

    assert_eq!(sub.pull(), vec!["m1", "m2"]);
}

#[test]
fn test_full_mailbox_does_not_affect_other_subscribers() {
    let broker = Broker::with_mailbox_capacity(1);
    broker.create_topic("news");
    let slow = broker.subscribe("news", "slow").unwrap();
    let fast = broker.subscribe("news", "fast").unwrap();

    assert_eq!(broker.publish("news", "m1"), 2);
    assert_eq!(fast.pull(), vec!["m1"]);

    // slow still holds m1, fast has room
    assert_eq!(broker.publish("news", "m2"), 1);
    assert_eq!(fast.pull(), vec!["m2"]);
    assert_eq!(slow.pull(), vec!["m1"]);
}

#[test]
fn test_subscribe_creates_absent_topic() {
    let broker = Broker::new();
    let sub = broker.subscribe("lazy", "alice").unwrap();
    assert!(broker.has_topic("lazy"));
    assert_eq!(broker.subscriber_count("lazy"), 1);

    broker.publish("lazy", "hi");
    assert_eq!(sub.pull(), vec!["hi"]);
}

#[test]
fn test_create_topic_twice_orphans_subscriptions() {
    let broker = Broker::new();
    broker.create_topic("news");
    let sub = broker.subscribe("news", "alice").unwrap();
    broker.publish("news", "buffered");

    broker.create_topic("news");
    assert!(broker.has_topic("news"));
    assert_eq!(broker.subscriber_count("news"), 0);

    broker.publish("news", "lost");
    assert_eq!(sub.pull(), vec!["buffered"]);

    // The name is free again in the replaced map
    assert!(broker.subscribe("news", "alice").is_ok());
}

#[test]
fn test_delete_topic_orphans_subscriptions() {
    let broker = Broker::new();
    let sub = broker.subscribe("news", "alice").unwrap();
    broker.publish("news", "kept");
    broker.delete_topic("news");

    assert_eq!(broker.publish("news", "gone"), 0);
    assert_eq!(sub.pull(), vec!["kept"]);
}

#[test]
fn test_topics_sorted() {
    let broker = Broker::new();
    broker.create_topic("b");
    broker.create_topic("a");
    broker.subscribe("c", "x").unwrap();
    assert_eq!(broker.topics(), vec!["a", "b", "c"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_subscribe_concurrency() {
    let wanted_subscriptions = 10;
    let broker = Arc::new(Broker::new());
    broker.create_topic("test_topic");

    let handles = (0..wanted_subscriptions).map(|i| {
        let broker = Arc::clone(&broker);
        tokio::spawn(async move { broker.subscribe("test_topic", &format!("test_subscriber{i}")) })
    });

    for result in join_all(handles).await {
        assert!(result.unwrap().is_ok());
    }

    assert_eq!(broker.subscriber_count("test_topic"), wanted_subscriptions);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicate_subscribe_only_one_wins() {
    let broker = Arc::new(Broker::new());

    let handles = (0..8).map(|_| {
        let broker = Arc::clone(&broker);
        tokio::spawn(async move { broker.subscribe("news", "alice") })
    });

    let wins = join_all(handles)
        .await
        .into_iter()
        .filter(|r| r.as_ref().unwrap().is_ok())
        .count();

    assert_eq!(wins, 1);
    assert_eq!(broker.subscriber_count("news"), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_publish_concurrency() {
    let wanted_messages = 10;
    let broker = Arc::new(Broker::new());
    broker.create_topic("test_topic");
    let sub = broker.subscribe("test_topic", "test_subscriber").unwrap();

    let handles = (0..wanted_messages).map(|i| {
        let broker = Arc::clone(&broker);
        tokio::spawn(async move { broker.publish("test_topic", &format!("test message {i}")) })
    });

    for delivered in join_all(handles).await {
        assert_eq!(delivered.unwrap(), 1);
    }

    let mut got = sub.pull();
    got.sort();
    let mut want: Vec<String> = (0..wanted_messages)
        .map(|i| format!("test message {i}"))
        .collect();
    want.sort();
    assert_eq!(got, want);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_single_producer_order_under_concurrent_churn() {
    let broker = Arc::new(Broker::new());
    let sub = broker.subscribe("news", "reader").unwrap();

    // Other subscribers come and go while one producer publishes in order
    let churn = {
        let broker = Arc::clone(&broker);
        tokio::spawn(async move {
            for i in 0..50 {
                let name = format!("churn{i}");
                broker.subscribe("news", &name).unwrap();
                broker.unsubscribe("news", &name).unwrap();
            }
        })
    };

    let producer = {
        let broker = Arc::clone(&broker);
        tokio::spawn(async move {
            for i in 0..50 {
                broker.publish("news", &i.to_string());
            }
        })
    };

    churn.await.unwrap();
    producer.await.unwrap();

    let want: Vec<String> = (0..50).map(|i| i.to_string()).collect();
    assert_eq!(sub.pull(), want);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_unsubscribe_during_publishing_stops_delivery() {
    for _ in 0..50 {
        let broker = Arc::new(Broker::with_mailbox_capacity(2000));
        let sub = broker.subscribe("news", "reader").unwrap();

        let producer = {
            let broker = Arc::clone(&broker);
            tokio::spawn(async move {
                for i in 0..2000u32 {
                    broker.publish("news", &i.to_string());
                }
            })
        };

        tokio::task::yield_now().await;
        broker.unsubscribe("news", "reader").unwrap();
        let before: Vec<u32> = sub.pull().iter().map(|s| s.parse().unwrap()).collect();

        producer.await.unwrap();

        assert!(sub.pull().is_empty(), "delivered after unsubscribe");
        assert!(before.windows(2).all(|w| w[0] < w[1]), "out of order: {before:?}");
    }
}
