//! Collection store against a real authority on a local port.

mod common;

use assert_matches::assert_matches;

use pothole_client::authority::{Authority, Upload};
use pothole_client::store::StoreError;
use pothole_core::pothole::StoredPothole;

use common::{api_client, spawn_authority, store_for};

#[tokio::test]
async fn add_insert_remove_scenario() {
    let authority = spawn_authority().await;
    let mut store = store_for(&authority.base_url);

    store.add(2.0, 3.0).await.unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.potholes()[0].area, 6.0);
    assert_eq!(store.summary().medium_area, 6.0);

    // Position 2 puts the record second.
    let index = store.insert_at(2, 10.0, 10.0).await.unwrap();
    assert_eq!(index, 1);
    assert_eq!(store.potholes()[0].area, 6.0);
    assert_eq!(store.potholes()[1].area, 100.0);
    assert_eq!(store.summary().medium_area, 6.0);
    assert_eq!(store.summary().large_area, 100.0);
    assert_eq!(store.summary().total_area, 106.0);

    store.remove(0).await.unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.potholes()[0].area, 100.0);

    store.remove(0).await.unwrap();
    assert!(store.is_empty());
    assert_eq!(store.summary().total_area, 0.0);
}

#[tokio::test]
async fn local_validation_never_reaches_the_authority() {
    let authority = spawn_authority().await;
    let mut store = store_for(&authority.base_url);

    assert_matches!(store.add(-1.0, 2.0).await, Err(StoreError::Validation(_)));
    assert_matches!(store.remove(0).await, Err(StoreError::Validation(_)));
    assert_matches!(store.insert_at(0, 1.0, 1.0).await, Err(StoreError::Validation(_)));
    assert_matches!(store.insert_at(2, 1.0, 1.0).await, Err(StoreError::Validation(_)));
    assert_matches!(store.save("../up", &[]).await, Err(StoreError::Validation(_)));

    // The authority still holds nothing.
    let snapshot = api_client(&authority.base_url).reset().await.unwrap();
    assert!(snapshot.potholes.is_empty());
}

#[tokio::test]
async fn authority_rejection_leaves_local_state_unchanged() {
    let authority = spawn_authority().await;
    let mut store = store_for(&authority.base_url);
    store.add(1.0, 1.0).await.unwrap();

    // Another client empties the authoritative collection behind our back.
    api_client(&authority.base_url).reset().await.unwrap();

    let err = store.remove(0).await.unwrap_err();
    assert_matches!(err, StoreError::Rejected(ref message) if !message.is_empty());
    assert_eq!(store.len(), 1);
    assert_eq!(store.summary().total_area, 1.0);
}

#[tokio::test]
async fn save_then_load_restores_records_and_positions() {
    let authority = spawn_authority().await;
    let mut store = store_for(&authority.base_url);
    store.add(2.0, 3.0).await.unwrap();
    store.add(6.0, 5.0).await.unwrap();

    let records = vec![
        StoredPothole {
            x: Some(120.0),
            y: Some(40.0),
            ..StoredPothole::from(store.potholes()[0])
        },
        StoredPothole::from(store.potholes()[1]),
    ];
    store.save("main street", &records).await.unwrap();

    store.reset().await.unwrap();
    assert!(store.is_empty());

    let loaded = store.load("main street").await.unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].x, Some(120.0));
    assert_eq!(loaded[0].y, Some(40.0));
    assert_eq!(loaded[1].position(), None);
    assert_eq!(store.len(), 2);
    assert_eq!(store.potholes()[1].area, 30.0);
    assert_eq!(store.summary().large_area, 30.0);
}

#[tokio::test]
async fn loading_an_unknown_name_is_rejected() {
    let authority = spawn_authority().await;
    let mut store = store_for(&authority.base_url);
    store.add(1.0, 2.0).await.unwrap();

    assert_matches!(store.load("nowhere").await, Err(StoreError::Rejected(_)));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn exported_spreadsheet_imports_back() {
    let authority = spawn_authority().await;
    let mut store = store_for(&authority.base_url);
    store.add(2.0, 3.0).await.unwrap();
    store.add(4.0, 4.0).await.unwrap();

    let records: Vec<StoredPothole> = store
        .potholes()
        .iter()
        .copied()
        .map(StoredPothole::from)
        .collect();
    let download = store.export("survey", &records).await.unwrap();
    assert_eq!(download.filename, "survey.xlsx");
    assert!(download
        .content_type
        .starts_with("application/vnd.openxmlformats-officedocument.spreadsheetml"));
    assert!(download.bytes.starts_with(b"PK\x03\x04"));

    store.reset().await.unwrap();
    let imported = store
        .import(Upload {
            filename: download.filename.clone(),
            bytes: download.bytes.clone(),
        })
        .await
        .unwrap();
    assert_eq!(imported.len(), 2);
    assert_eq!(store.potholes()[1].area, 16.0);
    assert_eq!(store.summary().total_area, 22.0);
}

#[tokio::test]
async fn empty_upload_is_rejected_locally() {
    let authority = spawn_authority().await;
    let mut store = store_for(&authority.base_url);
    let result = store
        .import(Upload {
            filename: "blank.csv".into(),
            bytes: Vec::new(),
        })
        .await;
    assert_matches!(result, Err(StoreError::Validation(msg)) if msg.contains("blank.csv"));
}

#[tokio::test]
async fn report_downloads_a_pdf() {
    let authority = spawn_authority().await;
    let mut store = store_for(&authority.base_url);
    store.add(2.0, 3.0).await.unwrap();

    let download = store.report("survey").await.unwrap();
    assert_eq!(download.filename, "survey.pdf");
    assert!(download.bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn unreachable_authority_is_a_transport_error() {
    let mut store = store_for("http://127.0.0.1:9");
    assert_matches!(store.add(1.0, 1.0).await, Err(StoreError::Transport(_)));
    assert!(store.is_empty());
}
