mod support;

use std::sync::atomic::Ordering;

use support::{sample_stage, sample_task, stage_ref, FakeTaskBackend};
use taskflow::board::{build_columns, move_task, resolve_move};
use taskflow::error::Error;
use taskflow::store::TaskStore;

#[test]
fn columns_follow_stage_order_with_stable_ties() {
    let stages = vec![
        sample_stage("s3", "Done", 3),
        sample_stage("s1", "To Do", 1),
        sample_stage("s2", "Doing", 1),
    ];
    let columns = build_columns(&[], &stages, "Other");

    // s1 and s2 tie on order; collection order breaks the tie.
    let names: Vec<&str> = columns.iter().map(|col| col.stage.name.as_str()).collect();
    assert_eq!(names, ["To Do", "Doing", "Done"]);
}

#[test]
fn unresolved_stage_lands_in_fallback_column() {
    let stages = vec![sample_stage("s1", "To Do", 1)];
    let mut orphan = sample_task("t2", "orphan", None);
    orphan.workflow_stage = Some(stage_ref("deleted-stage"));
    let tasks = vec![sample_task("t1", "ok", Some(&stages[0])), orphan];

    let columns = build_columns(&tasks, &stages, "Other");

    assert_eq!(columns.len(), 2);
    let fallback = columns.last().unwrap();
    assert!(fallback.synthetic);
    assert_eq!(fallback.stage.name, "Other");
    assert_eq!(fallback.stage.id, "deleted-stage");
    assert_eq!(fallback.tasks[0].id, "t2");

    // Nothing was dropped.
    let total: usize = columns.iter().map(|col| col.tasks.len()).sum();
    assert_eq!(total, tasks.len());
}

#[test]
fn task_without_stage_falls_into_first_column() {
    let stages = vec![sample_stage("s1", "To Do", 1), sample_stage("s2", "Doing", 2)];
    let tasks = vec![sample_task("t1", "floating", None)];

    let columns = build_columns(&tasks, &stages, "Other");
    assert_eq!(columns[0].tasks.len(), 1);
    assert_eq!(columns[1].tasks.len(), 0);
}

#[test]
fn resolve_move_accepts_column_or_task_target() {
    let stages = vec![sample_stage("s1", "To Do", 1), sample_stage("s2", "Doing", 2)];
    let tasks = vec![
        sample_task("t1", "a", Some(&stages[0])),
        sample_task("t2", "b", Some(&stages[1])),
    ];
    let columns = build_columns(&tasks, &stages, "Other");

    let by_column = resolve_move(&columns, "t1", "s2").unwrap();
    assert_eq!(by_column.dest_stage_id, "s2");

    // Dropping onto a task resolves to that task's column.
    let by_task = resolve_move(&columns, "t1", "t2").unwrap();
    assert_eq!(by_task.dest_stage_id, "s2");

    // Same column and unknown targets are no-ops.
    assert!(resolve_move(&columns, "t1", "s1").is_none());
    assert!(resolve_move(&columns, "t1", "nowhere").is_none());
    assert!(resolve_move(&columns, "ghost", "s2").is_none());
}

#[tokio::test]
async fn successful_move_updates_stage_and_reloads() {
    let stages = vec![sample_stage("s1", "To Do", 1), sample_stage("s2", "Doing", 2)];
    let backend = FakeTaskBackend::new(
        vec![sample_task("t1", "drag me", Some(&stages[0]))],
        stages.clone(),
    );

    let mut store = TaskStore::new();
    store.load_tasks(&backend).await.unwrap();

    move_task(&mut store, &stages, &backend, "t1", "s2", "Other")
        .await
        .unwrap();

    let columns = build_columns(store.tasks(), &stages, "Other");
    assert!(columns[0].tasks.is_empty());
    assert_eq!(columns[1].tasks[0].id, "t1");
    assert_eq!(columns[1].tasks[0].stage_id(), Some("s2"));

    let total: usize = columns.iter().map(|col| col.tasks.len()).sum();
    assert_eq!(total, 1);
    assert_eq!(backend.move_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn same_stage_move_skips_persistence() {
    let stages = vec![sample_stage("s1", "To Do", 1)];
    let backend = FakeTaskBackend::new(
        vec![sample_task("t1", "stay", Some(&stages[0]))],
        stages.clone(),
    );

    let mut store = TaskStore::new();
    store.load_tasks(&backend).await.unwrap();

    move_task(&mut store, &stages, &backend, "t1", "s1", "Other")
        .await
        .unwrap();

    assert_eq!(backend.move_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn rejected_move_reverts_to_server_state() {
    let stages = vec![sample_stage("s1", "To Do", 1), sample_stage("s2", "Doing", 2)];
    let backend = FakeTaskBackend::new(
        vec![sample_task("t1", "bounce", Some(&stages[0]))],
        stages.clone(),
    );
    backend.reject_moves.store(true, Ordering::SeqCst);

    let mut store = TaskStore::new();
    store.load_tasks(&backend).await.unwrap();

    let err = move_task(&mut store, &stages, &backend, "t1", "s2", "Other")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ServerRejected { .. }));

    // The optimistic change was discarded by the reload.
    assert_eq!(store.tasks(), backend.server_tasks());
    assert_eq!(store.get("t1").unwrap().stage_id(), Some("s1"));
}

#[tokio::test]
async fn move_to_unknown_stage_fails_before_touching_store() {
    let stages = vec![sample_stage("s1", "To Do", 1)];
    let backend = FakeTaskBackend::new(
        vec![sample_task("t1", "here", Some(&stages[0]))],
        stages.clone(),
    );

    let mut store = TaskStore::new();
    store.load_tasks(&backend).await.unwrap();
    let fetches_before = backend.fetch_calls.load(Ordering::SeqCst);

    let err = move_task(&mut store, &stages, &backend, "t1", "ghost", "Other")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::StageNotFound(_)));
    assert_eq!(backend.move_calls.load(Ordering::SeqCst), 0);
    assert_eq!(backend.fetch_calls.load(Ordering::SeqCst), fetches_before);
}

#[tokio::test]
async fn move_unknown_task_fails() {
    let stages = vec![sample_stage("s1", "To Do", 1), sample_stage("s2", "Doing", 2)];
    let backend = FakeTaskBackend::new(Vec::new(), stages.clone());

    let mut store = TaskStore::new();
    store.load_tasks(&backend).await.unwrap();

    let err = move_task(&mut store, &stages, &backend, "ghost", "s2", "Other")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::TaskNotFound(_)));
}
