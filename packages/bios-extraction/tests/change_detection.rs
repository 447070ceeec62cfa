//! Integration tests for state tracking across runs.
//!
//! These tests verify the tracking workflow:
//! 1. First sighting of a model fires exactly one change
//! 2. Unchanged or date-only changes stay silent
//! 3. Failed scrapes never touch stored state
//! 4. State survives a process restart through the JSON file backend

use bios_extraction::testing::{FailingBackend, StaticPageSource};
use bios_extraction::{
    JsonFileBackend, MemoryBackend, PageContent, ReleasePipeline, ReleaseRecord, ScrapeResult,
    StateSnapshot, StateStore, StoreError, TrackedModel, Tracker,
};
use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;

fn board(name: &str) -> TrackedModel {
    TrackedModel::new(name, "gigabyte", format!("https://gigabyte.example/{name}/support"))
}

fn gigabyte_page(rows: &[(&str, &str)]) -> String {
    let cells: String = rows
        .iter()
        .map(|(v, d)| format!("<div>{v}</div><div>{d}</div>"))
        .collect();
    format!(r#"<html><body><div id="support-dl-bios">{cells}</div></body></html>"#)
}

#[tokio::test]
async fn test_first_seen_fires_exactly_once() {
    let model = board("B650");
    let source = StaticPageSource::new()
        .with_html(&model.url, gigabyte_page(&[("F10", "2024/01/02"), ("F9", "2023/12/01")]));
    let store = StateStore::open(MemoryBackend::new()).await.unwrap();
    let tracker = Tracker::default();
    let models = vec![model.clone()];

    let first = tracker
        .run(&models, &source, &store, &CancellationToken::new())
        .await;
    let event = first[0].event.as_ref().unwrap();
    assert!(event.is_first_seen());
    assert_eq!(event.new.version, "F10");

    let note = event.notification();
    assert_eq!(note.model_identity, "gigabyte/B650");
    assert_eq!(note.old_version, None);
    assert_eq!(note.new_date, NaiveDate::from_ymd_opt(2024, 1, 2));

    let second = tracker
        .run(&models, &source, &store, &CancellationToken::new())
        .await;
    assert!(second[0].event.is_none());
}

#[tokio::test]
async fn test_date_correction_is_not_a_release() {
    let model = board("B650");
    let mut seeded = StateSnapshot::new();
    seeded.insert(
        model.identity(),
        Some(ReleaseRecord::new("F10").with_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())),
    );
    let store = StateStore::open(MemoryBackend::with_snapshot(seeded))
        .await
        .unwrap();

    let corrected = ScrapeResult::found(
        model.clone(),
        ReleaseRecord::new("F10").with_date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()),
        None,
    );
    assert!(store.record(&corrected).await.unwrap().is_none());
}

#[tokio::test]
async fn test_new_version_reports_old_one() {
    let model = board("X670");
    let mut seeded = StateSnapshot::new();
    seeded.insert(model.identity(), Some(ReleaseRecord::new("F9")));
    let store = StateStore::open(MemoryBackend::with_snapshot(seeded))
        .await
        .unwrap();

    let page = PageContent::Html(gigabyte_page(&[("F10", "2024/01/02"), ("F9", "2023/12/01")]));
    let result = ReleasePipeline::default().run(&model, &page);
    let event = store.record(&result).await.unwrap().unwrap();

    assert_eq!(event.old.as_ref().unwrap().version, "F9");
    assert_eq!(event.new.version, "F10");
    assert_eq!(store.get(&model).await.unwrap().version, "F10");
}

#[tokio::test]
async fn test_errored_model_keeps_state() {
    let ok = board("A");
    let broken = board("B");
    let mut seeded = StateSnapshot::new();
    seeded.insert(broken.identity(), Some(ReleaseRecord::new("F5")));

    let source = StaticPageSource::new()
        .with_html(&ok.url, gigabyte_page(&[("F3", "2024/03/03")]))
        .fail_url(&broken.url);
    let store = StateStore::open(MemoryBackend::with_snapshot(seeded.clone()))
        .await
        .unwrap();

    let outcomes = Tracker::default()
        .run(&[ok.clone(), broken.clone()], &source, &store, &CancellationToken::new())
        .await;

    assert!(outcomes[0].result.is_ok());
    assert!(outcomes[1].result.error().is_some());
    assert!(outcomes[1].event.is_none());
    assert_eq!(store.get(&broken).await, seeded.latest(&broken.identity()).cloned());
}

#[tokio::test]
async fn test_persistence_failure_is_per_model() {
    let a = board("A");
    let b = board("B");
    let source = StaticPageSource::new()
        .with_html(&a.url, gigabyte_page(&[("F3", "2024/03/03")]))
        .with_html(&b.url, gigabyte_page(&[("F7", "2024/04/04")]));
    let store = StateStore::open(FailingBackend::new().fail_for(b.identity()))
        .await
        .unwrap();

    let outcomes = Tracker::default()
        .with_concurrency(2)
        .run(&[a.clone(), b.clone()], &source, &store, &CancellationToken::new())
        .await;

    assert!(outcomes[0].commit_error.is_none());
    assert!(matches!(
        outcomes[1].commit_error,
        Some(StoreError::PersistenceWriteConflict { .. })
    ));
    assert!(store.backend().stored().contains(&a.identity()));
    assert!(!store.backend().stored().contains(&b.identity()));
}

#[tokio::test]
async fn test_json_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let model = board("B650");
    let source = StaticPageSource::new()
        .with_html(&model.url, gigabyte_page(&[("F10", "2024/01/02")]));
    let models = vec![model.clone()];

    {
        let store = StateStore::open(JsonFileBackend::new(&path)).await.unwrap();
        let outcomes = Tracker::default()
            .run(&models, &source, &store, &CancellationToken::new())
            .await;
        assert!(outcomes[0].event.is_some());
    }

    let store = StateStore::open(JsonFileBackend::new(&path)).await.unwrap();
    assert_eq!(store.get(&model).await.unwrap().version, "F10");

    let outcomes = Tracker::default()
        .run(&models, &source, &store, &CancellationToken::new())
        .await;
    assert!(outcomes[0].event.is_none());
}
