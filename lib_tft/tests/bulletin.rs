mod common;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use common::{Call, MockPages, MockPlatform};
use lib_tft::core::{Bulletin, MessageLocation, MessageLog, MessageRef, PublishError, PublishOutcome};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

struct Fixture {
    dir: TempDir,
    platform: Arc<MockPlatform>,
    pages: Arc<Mutex<Option<Vec<String>>>>,
    bulletin: Bulletin<MockPages, MockPlatform>,
}

fn fixture(titles: &[&str]) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let log = Arc::new(MessageLog::empty(dir.path().join("faq_messages.json")));
    let platform = MockPlatform::new(500);
    platform.add_channel(10);
    platform.add_channel(20);
    let (source, pages) = MockPages::new(titles);
    let bulletin = Bulletin::new("FAQ", source, Arc::clone(&platform), log, CancellationToken::new());
    Fixture {
        dir,
        platform,
        pages,
        bulletin,
    }
}

fn posted(outcome: PublishOutcome) -> Vec<MessageLocation> {
    match outcome {
        PublishOutcome::Published { posted, .. } => posted,
        PublishOutcome::NoPayload => panic!("nothing was published"),
    }
}

#[tokio::test]
async fn first_publish_posts_every_page_in_order() {
    let f = fixture(&["Getting Started", "Payouts"]);

    let outcome = f.bulletin.publish(10).await.unwrap();

    assert_eq!(
        outcome,
        PublishOutcome::Published {
            retracted: 0,
            posted: vec![MessageLocation::new(10, 500), MessageLocation::new(10, 501)],
        }
    );
    assert_eq!(f.platform.calls(), vec![Call::Send(10), Call::Send(10)]);
    assert_eq!(f.bulletin.log().snapshot().await, BTreeMap::from([(10, vec![500, 501])]));
}

#[tokio::test]
async fn republish_takes_down_previous_set_across_channels() {
    let f = fixture(&["Getting Started", "Payouts"]);
    f.bulletin.publish(10).await.unwrap();

    let outcome = f.bulletin.publish(20).await.unwrap();

    assert_eq!(
        f.platform.deletes(),
        vec![
            MessageRef { channel_id: 10, message_id: 500 },
            MessageRef { channel_id: 10, message_id: 501 },
        ]
    );
    assert_eq!(posted(outcome), vec![MessageLocation::new(20, 502), MessageLocation::new(20, 503)]);
    assert_eq!(f.bulletin.log().snapshot().await, BTreeMap::from([(20, vec![502, 503])]));
}

#[tokio::test]
async fn failed_deletes_are_forgotten_like_the_rest() {
    let f = fixture(&["a", "b", "c"]);
    f.bulletin.publish(10).await.unwrap();
    f.platform.mark_missing(500);
    f.platform.mark_forbidden(501);
    f.platform.mark_failing(502);

    let outcome = f.bulletin.publish(10).await.unwrap();

    match outcome {
        PublishOutcome::Published { retracted, posted } => {
            assert_eq!(retracted, 0);
            assert_eq!(posted.len(), 3);
        }
        PublishOutcome::NoPayload => panic!("nothing was published"),
    }
    assert_eq!(f.platform.deletes().len(), 3);
    assert_eq!(f.bulletin.log().snapshot().await, BTreeMap::from([(10, vec![503, 504, 505])]));
}

#[tokio::test]
async fn nothing_to_post_leaves_previous_set_up() {
    let f = fixture(&["Payouts"]);
    f.bulletin.publish(10).await.unwrap();
    *f.pages.lock().unwrap() = Some(Vec::new());

    let outcome = f.bulletin.publish(10).await.unwrap();

    assert_eq!(outcome, PublishOutcome::NoPayload);
    assert!(f.platform.deletes().is_empty());
    assert_eq!(f.bulletin.log().len().await, 1);
}

#[tokio::test]
async fn failed_build_leaves_previous_set_up() {
    let f = fixture(&["Payouts"]);
    f.bulletin.publish(10).await.unwrap();
    *f.pages.lock().unwrap() = None;

    let result = f.bulletin.publish(10).await;

    assert!(matches!(result, Err(PublishError::Source(_))));
    assert!(f.platform.deletes().is_empty());
    assert_eq!(f.bulletin.log().snapshot().await, BTreeMap::from([(10, vec![500])]));
}

#[tokio::test]
async fn send_failure_reports_position() {
    let f = fixture(&["Payouts"]);

    let result = f.bulletin.publish(99).await;

    assert!(matches!(result, Err(PublishError::Send { index: 0, .. })));
    assert!(f.bulletin.log().is_empty().await);
}

#[tokio::test]
async fn posted_set_survives_a_restart() {
    let f = fixture(&["Getting Started", "Payouts"]);
    f.bulletin.publish(20).await.unwrap();

    let reloaded = MessageLog::load(f.dir.path().join("faq_messages.json")).await.unwrap();

    assert_eq!(reloaded.snapshot().await, BTreeMap::from([(20, vec![500, 501])]));
}
