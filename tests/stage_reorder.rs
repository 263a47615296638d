mod support;

use std::sync::atomic::Ordering;

use support::{sample_stage, FakeStageBackend};
use taskflow::error::Error;
use taskflow::stages::StageList;

fn pipeline() -> Vec<taskflow::model::Stage> {
    vec![
        sample_stage("s1", "To Do", 1),
        sample_stage("s2", "Doing", 2),
        sample_stage("s3", "Done", 3),
    ]
}

#[test]
fn move_stage_renumbers_from_one() {
    let mut list = StageList::new();
    list.set_stages(pipeline());

    let moved = list.move_stage("s3", 0).unwrap();
    assert!(moved);

    let ids: Vec<&str> = list.stages().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["s3", "s1", "s2"]);
    let orders: Vec<i64> = list.stages().iter().map(|s| s.order).collect();
    assert_eq!(orders, [1, 2, 3]);
}

#[test]
fn move_stage_to_same_index_reports_no_change() {
    let mut list = StageList::new();
    list.set_stages(pipeline());

    assert!(!list.move_stage("s2", 1).unwrap());
}

#[test]
fn move_stage_validates_id_and_index() {
    let mut list = StageList::new();
    list.set_stages(pipeline());

    assert!(matches!(
        list.move_stage("ghost", 0),
        Err(Error::StageNotFound(_))
    ));
    assert!(matches!(
        list.move_stage("s1", 9),
        Err(Error::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn reorder_persists_full_id_sequence() {
    let backend = FakeStageBackend::new(pipeline());
    let mut list = StageList::new();
    list.load(&backend).await.unwrap();

    list.reorder(&backend, "s3", 0).await.unwrap();

    let server_ids: Vec<String> = backend
        .server_stages()
        .iter()
        .map(|s| s.id.clone())
        .collect();
    assert_eq!(server_ids, ["s3", "s1", "s2"]);
    assert_eq!(backend.order_calls.load(Ordering::SeqCst), 1);

    // Local list matches the authoritative copy after the reload.
    assert_eq!(list.stages(), backend.server_stages());
}

#[tokio::test]
async fn reorder_to_same_position_skips_persistence() {
    let backend = FakeStageBackend::new(pipeline());
    let mut list = StageList::new();
    list.load(&backend).await.unwrap();

    list.reorder(&backend, "s1", 0).await.unwrap();
    assert_eq!(backend.order_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn rejected_reorder_restores_server_order() {
    let backend = FakeStageBackend::new(pipeline());
    backend.reject_order.store(true, Ordering::SeqCst);

    let mut list = StageList::new();
    list.load(&backend).await.unwrap();

    let err = list.reorder(&backend, "s3", 0).await.unwrap_err();
    assert!(matches!(err, Error::ServerRejected { .. }));

    let ids: Vec<&str> = list.stages().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["s1", "s2", "s3"]);
}

#[tokio::test]
async fn create_trims_name_and_appends() {
    let backend = FakeStageBackend::new(pipeline());
    let mut list = StageList::new();
    list.load(&backend).await.unwrap();

    let stage = list.create(&backend, "  Review  ", "#fca5a5").await.unwrap();
    assert_eq!(stage.name, "Review");
    assert_eq!(list.len(), 4);
    assert_eq!(list.stages().last().unwrap().id, stage.id);
}

#[tokio::test]
async fn create_rejects_blank_name_locally() {
    let backend = FakeStageBackend::new(pipeline());
    let mut list = StageList::new();
    list.load(&backend).await.unwrap();

    let err = list.create(&backend, "   ", "#fff").await.unwrap_err();
    assert!(matches!(err, Error::MissingField(_)));
    assert_eq!(backend.server_stages().len(), 3);
}

#[tokio::test]
async fn edit_patches_after_confirmation() {
    let backend = FakeStageBackend::new(pipeline());
    let mut list = StageList::new();
    list.load(&backend).await.unwrap();

    let stage = list.edit(&backend, "s2", "In Review", "#999").await.unwrap();
    assert_eq!(stage.name, "In Review");
    assert_eq!(list.get("s2").unwrap().name, "In Review");
}

#[tokio::test]
async fn delete_removes_locally_after_confirmation() {
    let backend = FakeStageBackend::new(pipeline());
    let mut list = StageList::new();
    list.load(&backend).await.unwrap();

    list.delete(&backend, "s2").await.unwrap();
    assert!(list.get("s2").is_none());
    assert_eq!(backend.server_stages().len(), 2);
}
