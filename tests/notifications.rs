mod support;

use std::sync::atomic::Ordering;

use support::{sample_notification, FakeNotificationBackend};
use taskflow::error::Error;
use taskflow::notifications::{NotificationFeed, FEED_CAP};

#[test]
fn unread_count_ignores_read_items() {
    let mut feed = NotificationFeed::new();
    let mut read = sample_notification("n1", "seen");
    read.is_read = true;
    feed.set_items(vec![read, sample_notification("n2", "new")]);

    assert_eq!(feed.unread_count(), 1);
}

#[test]
fn feed_is_capped() {
    let mut feed = NotificationFeed::new();
    let items: Vec<_> = (0..FEED_CAP + 20)
        .map(|i| sample_notification(&format!("n{i}"), "spam"))
        .collect();
    feed.set_items(items);

    assert_eq!(feed.len(), FEED_CAP);

    // Pushes keep the cap too, evicting the oldest.
    feed.apply_push(sample_notification("fresh", "newest"));
    assert_eq!(feed.len(), FEED_CAP);
    assert_eq!(feed.items()[0].id, "fresh");
}

#[test]
fn pushed_duplicate_is_ignored() {
    let mut feed = NotificationFeed::new();
    feed.apply_push(sample_notification("n1", "once"));
    feed.apply_push(sample_notification("n1", "twice"));

    assert_eq!(feed.len(), 1);
    assert_eq!(feed.items()[0].message, "once");
}

#[tokio::test]
async fn mark_read_flips_optimistically_then_persists() {
    let backend = FakeNotificationBackend::new(vec![
        sample_notification("n1", "a"),
        sample_notification("n2", "b"),
    ]);

    let mut feed = NotificationFeed::new();
    feed.load(&backend).await.unwrap();

    feed.mark_read(&backend, "n1").await.unwrap();

    assert_eq!(feed.unread_count(), 1);
    assert_eq!(backend.read_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn rejected_mark_read_reverts() {
    let backend = FakeNotificationBackend::new(vec![sample_notification("n1", "a")]);
    backend.reject_reads.store(true, Ordering::SeqCst);

    let mut feed = NotificationFeed::new();
    feed.load(&backend).await.unwrap();

    let err = feed.mark_read(&backend, "n1").await.unwrap_err();
    assert!(matches!(err, Error::ServerRejected { .. }));

    // The reload brought back the server's unread flag.
    assert_eq!(feed.unread_count(), 1);
}

#[tokio::test]
async fn mark_all_read_clears_the_counter() {
    let backend = FakeNotificationBackend::new(vec![
        sample_notification("n1", "a"),
        sample_notification("n2", "b"),
        sample_notification("n3", "c"),
    ]);

    let mut feed = NotificationFeed::new();
    feed.load(&backend).await.unwrap();
    assert_eq!(feed.unread_count(), 3);

    feed.mark_all_read(&backend).await.unwrap();
    assert_eq!(feed.unread_count(), 0);
}

#[tokio::test]
async fn rejected_mark_all_reverts() {
    let backend = FakeNotificationBackend::new(vec![sample_notification("n1", "a")]);
    backend.reject_reads.store(true, Ordering::SeqCst);

    let mut feed = NotificationFeed::new();
    feed.load(&backend).await.unwrap();

    assert!(feed.mark_all_read(&backend).await.is_err());
    assert_eq!(feed.unread_count(), 1);
}
