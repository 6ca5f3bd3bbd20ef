//! Session behaviour against an in-process authority that records calls.

use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use async_trait::async_trait;

use pothole_client::api::AuthorityError;
use pothole_client::authority::{Authority, Download, Upload};
use pothole_client::session::Session;
use pothole_client::store::StoreError;
use pothole_core::board::{DragState, Point};
use pothole_core::pothole::{Dimensions, Pothole, StoredPothole};
use pothole_core::summary::Summary;
use pothole_core::wire::{decode_data_url, CollectionSnapshot};

#[derive(Default)]
struct Recorded {
    records: Vec<StoredPothole>,
    saved: Vec<(String, Vec<StoredPothole>)>,
    calls: Vec<&'static str>,
    images: Vec<Vec<u8>>,
    reject_next: Option<String>,
}

#[derive(Default)]
struct FakeAuthority {
    inner: Mutex<Recorded>,
}

impl FakeAuthority {
    fn calls(&self) -> Vec<&'static str> {
        self.inner.lock().unwrap().calls.clone()
    }

    fn reject_next(&self, message: &str) {
        self.inner.lock().unwrap().reject_next = Some(message.to_string());
    }

    fn image_count(&self) -> usize {
        self.inner.lock().unwrap().images.len()
    }

    fn with<T>(
        &self,
        call: &'static str,
        f: impl FnOnce(&mut Recorded) -> T,
    ) -> Result<T, AuthorityError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(call);
        if let Some(message) = inner.reject_next.take() {
            return Err(AuthorityError::Rejected {
                status: 400,
                message,
            });
        }
        Ok(f(&mut inner))
    }
}

fn snapshot(records: &[StoredPothole]) -> CollectionSnapshot {
    // The authority echoes measurements only.
    let potholes: Vec<StoredPothole> = records
        .iter()
        .map(|r| StoredPothole::from(r.pothole()))
        .collect();
    CollectionSnapshot {
        summary: Summary::from_areas(potholes.iter().map(|p| p.area)),
        potholes,
    }
}

#[async_trait]
impl Authority for FakeAuthority {
    async fn add(&self, dimensions: Dimensions, index: Option<usize>) -> Result<CollectionSnapshot, AuthorityError> {
        self.with("add", |r| {
            let record = StoredPothole::from(Pothole::measured(dimensions));
            match index {
                Some(i) => r.records.insert(i, record),
                None => r.records.push(record),
            }
            snapshot(&r.records)
        })
    }

    async fn update(&self, index: usize, dimensions: Dimensions) -> Result<CollectionSnapshot, AuthorityError> {
        self.with("update", |r| {
            r.records[index] = StoredPothole::from(Pothole::measured(dimensions));
            snapshot(&r.records)
        })
    }

    async fn remove(&self, index: usize) -> Result<CollectionSnapshot, AuthorityError> {
        self.with("remove", |r| {
            r.records.remove(index);
            snapshot(&r.records)
        })
    }

    async fn reset(&self) -> Result<CollectionSnapshot, AuthorityError> {
        self.with("reset", |r| {
            r.records.clear();
            snapshot(&r.records)
        })
    }

    async fn save(&self, name: &str, records: &[StoredPothole]) -> Result<(), AuthorityError> {
        self.with("save", |r| r.saved.push((name.to_string(), records.to_vec())))
    }

    async fn load(&self, name: &str) -> Result<CollectionSnapshot, AuthorityError> {
        self.with("load", |r| {
            let records = r
                .saved
                .iter()
                .rev()
                .find(|(saved, _)| saved == name)
                .map(|(_, records)| records.clone())
                .unwrap_or_default();
            r.records = records.clone();
            CollectionSnapshot {
                summary: Summary::from_areas(records.iter().map(|p| p.area)),
                potholes: records,
            }
        })
    }

    async fn export(&self, name: &str, _records: &[StoredPothole]) -> Result<Download, AuthorityError> {
        self.with("export", |_| Download {
            filename: format!("{name}.xlsx"),
            content_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".into(),
            bytes: b"PK\x03\x04".to_vec(),
        })
    }

    async fn import(&self, _upload: Upload) -> Result<CollectionSnapshot, AuthorityError> {
        self.with("import", |r| {
            r.records = vec![StoredPothole {
                width: 1.0,
                length: 2.0,
                area: 2.0,
                x: Some(10.0),
                y: Some(20.0),
            }];
            CollectionSnapshot {
                summary: Summary::from_areas([2.0]),
                potholes: r.records.clone(),
            }
        })
    }

    async fn store_image(&self, data_url: String) -> Result<(), AuthorityError> {
        let png = decode_data_url(&data_url).expect("data url");
        self.with("store_image", |r| r.images.push(png))
    }

    async fn report(&self, name: &str) -> Result<Download, AuthorityError> {
        self.with("report", |_| Download {
            filename: format!("{name}.pdf"),
            content_type: "application/pdf".into(),
            bytes: b"%PDF-1.4".to_vec(),
        })
    }
}

fn session() -> (Arc<FakeAuthority>, Session<FakeAuthority>) {
    let authority = Arc::new(FakeAuthority::default());
    (Arc::clone(&authority), Session::new(authority))
}

fn data_calls(authority: &FakeAuthority) -> Vec<&'static str> {
    authority
        .calls()
        .into_iter()
        .filter(|c| *c != "store_image")
        .collect()
}

#[tokio::test]
async fn invalid_input_makes_no_calls() {
    let (authority, mut session) = session();

    assert_matches!(session.add(0.0, 1.0).await, Err(StoreError::Validation(_)));
    assert_matches!(session.update(0, 1.0, 1.0).await, Err(StoreError::Validation(_)));
    assert_matches!(session.save("   ").await, Err(StoreError::Validation(_)));
    assert!(authority.calls().is_empty());
}

#[tokio::test]
async fn rejection_is_reported_verbatim_and_state_kept() {
    let (authority, mut session) = session();
    session.add(2.0, 3.0).await.unwrap();

    authority.reject_next("Invalid pothole index.");
    let err = session.update(0, 9.0, 9.0).await.unwrap_err();
    assert_eq!(err, StoreError::Rejected("Invalid pothole index.".into()));
    assert_eq!(session.potholes()[0].area, 6.0);
    assert_eq!(session.summary().medium_area, 6.0);
}

#[tokio::test]
async fn successful_operations_upload_the_board() {
    let (authority, mut session) = session();
    session.add(2.0, 3.0).await.unwrap();
    session.wait_for_upload().await;
    session.add(1.0, 1.0).await.unwrap();
    session.wait_for_upload().await;

    assert_eq!(authority.image_count(), 2);
    assert!(session.scene().is_some());
}

#[tokio::test]
async fn drag_moves_by_pointer_delta_without_calling_the_authority() {
    let (authority, mut session) = session();
    session.add(2.0, 3.0).await.unwrap();
    session.wait_for_upload().await;
    let calls_before = data_calls(&authority);

    // Width 2 lands at x = 400 - 5 * 2 = 390, first row y = 0.
    assert_eq!(session.pointer_down(Point::new(395.0, 10.0)), Some(0));
    assert_matches!(session.drag_state(), DragState::Dragging { index: 0, .. });
    assert_eq!(session.pointer_move(Point::new(405.0, 30.0)), Some(0));
    session.pointer_up();
    assert_eq!(session.drag_state(), DragState::Idle);

    assert_eq!(session.board().positions().get(0), Some(Point::new(400.0, 20.0)));
    assert_eq!(data_calls(&authority), calls_before);
}

#[tokio::test]
async fn press_on_empty_space_grabs_nothing() {
    let (_authority, mut session) = session();
    session.add(2.0, 3.0).await.unwrap();
    assert_eq!(session.pointer_down(Point::new(10.0, 700.0)), None);
    assert_eq!(session.pointer_move(Point::new(20.0, 710.0)), None);
}

#[tokio::test]
async fn positions_follow_inserts_and_removals() {
    let (_authority, mut session) = session();
    session.add(2.0, 3.0).await.unwrap();
    session.add(4.0, 4.0).await.unwrap();

    // Drag the second record somewhere recognisable.
    session.pointer_down(Point::new(385.0, 55.0)).unwrap();
    session.pointer_move(Point::new(85.0, 255.0));
    session.pointer_up();
    let moved = session.board().positions().get(1).unwrap();
    assert_eq!(moved, Point::new(80.0, 250.0));

    // Insert before it: the moved record becomes index 2.
    session.insert_at(1, 1.0, 1.0).await.unwrap();
    assert_eq!(session.potholes()[0].area, 1.0);
    assert_eq!(session.board().positions().get(2), Some(moved));

    // Remove the head: it shifts back to index 1.
    session.remove(0).await.unwrap();
    assert_eq!(session.board().positions().get(1), Some(moved));
    assert_eq!(session.stored()[1].x, Some(80.0));
}

#[tokio::test]
async fn save_carries_positions_and_load_restores_them() {
    let (_authority, mut session) = session();
    session.add(2.0, 3.0).await.unwrap();
    session.pointer_down(Point::new(395.0, 10.0)).unwrap();
    session.pointer_move(Point::new(195.0, 110.0));
    session.pointer_up();
    session.save("road").await.unwrap();

    session.reset().await.unwrap();
    assert!(session.potholes().is_empty());
    assert_eq!(session.board().positions().get(0), None);

    session.load("road").await.unwrap();
    assert_eq!(session.potholes().len(), 1);
    assert_eq!(session.board().positions().get(0), Some(Point::new(190.0, 100.0)));
}

#[tokio::test]
async fn import_replaces_positions() {
    let (_authority, mut session) = session();
    session.add(8.0, 8.0).await.unwrap();
    session
        .import(Upload {
            filename: "survey.csv".into(),
            bytes: b"width,length\n1,2\n".to_vec(),
        })
        .await
        .unwrap();
    assert_eq!(session.potholes().len(), 1);
    assert_eq!(session.board().positions().get(0), Some(Point::new(10.0, 20.0)));
}

#[tokio::test]
async fn report_stores_the_image_first() {
    let (authority, mut session) = session();
    session.add(2.0, 3.0).await.unwrap();

    let download = session.generate_report("road").await.unwrap();
    assert_eq!(download.filename, "road.pdf");

    let calls = authority.calls();
    let report_at = calls.iter().position(|c| *c == "report").unwrap();
    assert_eq!(calls[report_at - 1], "store_image");
}

#[tokio::test]
async fn snapshot_is_a_png() {
    let (_authority, mut session) = session();
    session.add(2.0, 3.0).await.unwrap();
    let png = session.snapshot_png().unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}
