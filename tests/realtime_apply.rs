mod support;

use support::sample_comment;
use taskflow::comments::CommentThread;
use taskflow::realtime::{parse_frame, ServerEvent};

#[test]
fn double_delivered_comment_is_deduplicated() {
    let mut thread = CommentThread::new("t1");
    let comment = sample_comment("c1", "t1", "hello");

    thread.apply_added(comment.clone());
    thread.apply_added(comment);

    assert_eq!(thread.len(), 1);
}

#[test]
fn comments_for_other_tasks_are_ignored() {
    let mut thread = CommentThread::new("t1");

    thread.apply_added(sample_comment("c1", "t1", "mine"));
    thread.apply_added(sample_comment("c2", "t2", "someone else's"));

    assert_eq!(thread.len(), 1);
    assert_eq!(thread.comments()[0].id, "c1");
}

#[test]
fn new_comments_land_first() {
    let mut thread = CommentThread::new("t1");

    thread.apply_added(sample_comment("c1", "t1", "older"));
    thread.apply_added(sample_comment("c2", "t1", "newer"));

    let ids: Vec<&str> = thread.comments().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["c2", "c1"]);
}

#[test]
fn update_replaces_in_place() {
    let mut thread = CommentThread::new("t1");
    thread.apply_added(sample_comment("c1", "t1", "typo"));
    thread.apply_added(sample_comment("c2", "t1", "fine"));

    thread.apply_updated(sample_comment("c1", "t1", "fixed"));

    let ids: Vec<&str> = thread.comments().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["c2", "c1"]);
    assert_eq!(thread.comments()[1].content, "fixed");
}

#[test]
fn update_for_unknown_comment_is_ignored() {
    let mut thread = CommentThread::new("t1");
    thread.apply_updated(sample_comment("ghost", "t1", "nothing to replace"));
    assert!(thread.is_empty());
}

#[test]
fn delete_missing_comment_is_a_noop() {
    let mut thread = CommentThread::new("t1");
    thread.apply_added(sample_comment("c1", "t1", "stays"));

    thread.apply_deleted("ghost", "t1");
    assert_eq!(thread.len(), 1);

    thread.apply_deleted("c1", "t1");
    assert!(thread.is_empty());

    // Deleting again changes nothing.
    thread.apply_deleted("c1", "t1");
    assert!(thread.is_empty());
}

#[test]
fn delete_for_other_task_is_ignored() {
    let mut thread = CommentThread::new("t1");
    thread.apply_added(sample_comment("c1", "t1", "stays"));

    thread.apply_deleted("c1", "t2");
    assert_eq!(thread.len(), 1);
}

#[test]
fn set_comments_filters_by_task() {
    let mut thread = CommentThread::new("t1");
    thread.set_comments(vec![
        sample_comment("c1", "t1", "mine"),
        sample_comment("c2", "t9", "stray"),
    ]);
    assert_eq!(thread.len(), 1);
}

#[test]
fn parsed_frames_flow_into_the_thread() {
    let mut thread = CommentThread::new("t1");

    let added = parse_frame(
        r#"{"type":"comment_added","_id":"c1","taskId":"t1","content":"from the wire"}"#,
    )
    .unwrap()
    .unwrap();
    match added {
        ServerEvent::CommentAdded(comment) => thread.apply_added(comment),
        other => panic!("unexpected event: {other:?}"),
    }

    let deleted = parse_frame(r#"{"type":"comment_deleted","_id":"c1","taskId":"t1"}"#)
        .unwrap()
        .unwrap();
    match deleted {
        ServerEvent::CommentDeleted {
            comment_id,
            task_id,
        } => thread.apply_deleted(&comment_id, &task_id),
        other => panic!("unexpected event: {other:?}"),
    }

    assert!(thread.is_empty());
}
