#![cfg(test)]

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rocket::http::{Header, Status};
use rocket::local::blocking::Client;
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::AppConfig;
use crate::field;
use crate::manage::api::{ApiError, ContentApi, FileField, PendingFile, WriteMode};
use crate::manage::list::{ListManager, NOTHING_TO_SAVE, SCROLL_DELAY};
use crate::manage::local::StoreApi;
use crate::manage::{
    Completion, DeleteTarget, DocumentManager, ManageError, PlanType, Record, SiteContext,
};
use crate::models::form_data::{FormRecord, RecordKey, Shape};
use crate::pages::{
    FaqItem, HeroDocument, HighlightItem, NewsItem, ServicesDocument, ShowcaseDocument, StatItem,
};
use crate::store::sqlite::SqliteStore;
use crate::store::Store;
use crate::uploads::UploadDir;

/// Atomic counter for unique shared-cache DB names so parallel tests don't collide.
static TEST_DB_COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

/// Fresh in-memory store with migrations applied. Named shared-cache DB so every
/// pooled connection sees the same data.
fn test_store() -> Arc<dyn Store> {
    let id = TEST_DB_COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    let uri = format!("file:formdesk_testdb_{}?mode=memory&cache=shared", id);
    let manager = SqliteConnectionManager::file(uri);
    let pool = Pool::builder()
        .max_size(2)
        .build(manager)
        .expect("Failed to create test pool");
    let store = SqliteStore::new(pool);
    store.run_migrations().expect("Failed to run migrations");
    Arc::new(store)
}

fn temp_upload_dir() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("formdesk-test-{}", uuid::Uuid::new_v4()))
}

fn test_uploads() -> UploadDir {
    UploadDir {
        root: temp_upload_dir(),
        public_base: "/uploads".to_string(),
        max_bytes: 1024 * 1024,
    }
}

fn site(plan: PlanType) -> SiteContext {
    SiteContext::new("acme", plan)
}

fn png() -> PendingFile {
    PendingFile::new("Cover Photo.png", Some("image/png"), vec![0x89, b'P', b'N', b'G'])
}

fn mp4() -> PendingFile {
    PendingFile::new("launch.mp4", Some("video/mp4"), vec![0, 0, 0, 0x18])
}

/// Wraps an API, records every call, and can be switched to fail.
struct Recording<A> {
    inner: A,
    fetches: Cell<usize>,
    upserts: RefCell<Vec<(WriteMode, Value, Vec<String>)>>,
    deletes: Cell<usize>,
    uploads: Cell<usize>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
}

impl<A: ContentApi> Recording<A> {
    fn new(inner: A) -> Self {
        Recording {
            inner,
            fetches: Cell::new(0),
            upserts: RefCell::new(Vec::new()),
            deletes: Cell::new(0),
            uploads: Cell::new(0),
            fail_reads: Cell::new(false),
            fail_writes: Cell::new(false),
        }
    }

    fn upsert_count(&self) -> usize {
        self.upserts.borrow().len()
    }

    fn last_upsert(&self) -> (WriteMode, Value, Vec<String>) {
        self.upserts.borrow().last().cloned().expect("no upsert recorded")
    }
}

impl<A: ContentApi> ContentApi for Recording<A> {
    fn fetch(&self, shape: Shape, key: &RecordKey) -> Result<Option<FormRecord>, ApiError> {
        self.fetches.set(self.fetches.get() + 1);
        if self.fail_reads.get() {
            return Err(ApiError::new(None, "connection refused"));
        }
        self.inner.fetch(shape, key)
    }

    fn upsert(
        &self,
        shape: Shape,
        key: &RecordKey,
        values: &Value,
        files: &[FileField],
        mode: WriteMode,
    ) -> Result<FormRecord, ApiError> {
        let names = files.iter().map(|f| f.field_name()).collect();
        self.upserts.borrow_mut().push((mode, values.clone(), names));
        if self.fail_writes.get() {
            return Err(ApiError::new(Some(500), "Error saving"));
        }
        self.inner.upsert(shape, key, values, files, mode)
    }

    fn delete(&self, shape: Shape, key: &RecordKey) -> Result<(), ApiError> {
        self.deletes.set(self.deletes.get() + 1);
        if self.fail_writes.get() {
            return Err(ApiError::new(Some(500), "Error deleting"));
        }
        self.inner.delete(shape, key)
    }

    fn upload(&self, file: &PendingFile) -> Result<String, ApiError> {
        self.uploads.set(self.uploads.get() + 1);
        if self.fail_writes.get() {
            return Err(ApiError::new(Some(500), "Error uploading"));
        }
        self.inner.upload(file)
    }
}

type Api = Recording<StoreApi>;

fn recording_api() -> (Api, Arc<dyn Store>) {
    let store = test_store();
    let api = Recording::new(StoreApi::new(store.clone(), test_uploads()));
    (api, store)
}

fn faq_manager(plan: PlanType) -> (ListManager<FaqItem, Api>, Arc<dyn Store>) {
    let (api, store) = recording_api();
    let mut mgr = ListManager::new(api, &site(plan));
    mgr.load().expect("load");
    (mgr, store)
}

fn fill_faq(mgr: &mut ListManager<FaqItem, Api>, index: usize, q: &str, a: &str) {
    assert!(mgr.update_item(index, |item| {
        item.question = q.to_string();
        item.answer = a.to_string();
    }));
}

fn questions(mgr: &ListManager<FaqItem, Api>) -> Vec<String> {
    mgr.items().iter().map(|i| i.question.clone()).collect()
}

// ═══════════════════════════════════════════════════════════
// List manager
// ═══════════════════════════════════════════════════════════

#[test]
fn faq_list_stops_growing_at_plan_limit() {
    let (mut mgr, _) = faq_manager(PlanType::Basic);
    assert_eq!(mgr.len(), 1);
    assert_eq!(mgr.limit(), 8);
    for expected in 1..8 {
        assert_eq!(mgr.add_item().unwrap(), expected);
    }
    assert_eq!(mgr.len(), 8);
    assert!(mgr.limit_warning().unwrap().contains('8'));

    let err = mgr.add_item().unwrap_err();
    assert_eq!(
        err,
        ManageError::LimitReached {
            kind: "faq",
            limit: 8,
            plan: PlanType::Basic
        }
    );
    assert_eq!(mgr.len(), 8);
    assert!(mgr.add_item().is_err());
    assert_eq!(mgr.len(), 8);
}

#[test]
fn pro_plan_raises_the_ceiling_without_truncating() {
    let (mut mgr, _) = faq_manager(PlanType::Pro);
    while mgr.add_item().is_ok() {}
    assert_eq!(mgr.len(), 12);

    mgr.set_plan(PlanType::Basic);
    assert_eq!(mgr.len(), 12);
    assert!(mgr.is_limit_reached());
    assert!(mgr.add_item().is_err());
    assert!(mgr.remove_item(0));
    assert_eq!(mgr.len(), 11);
    assert!(mgr.add_item().is_err());
}

#[test]
fn removing_everything_leaves_one_blank_record() {
    let (mut mgr, _) = faq_manager(PlanType::Basic);
    mgr.add_item().unwrap();
    mgr.add_item().unwrap();
    for i in 0..3 {
        fill_faq(&mut mgr, i, &format!("Q{}", i), "A");
    }
    for _ in 0..5 {
        mgr.remove_item(0);
        assert!(mgr.len() >= 1);
    }
    assert_eq!(mgr.len(), 1);
    assert_eq!(mgr.items()[0], FaqItem::blank(0));
    assert!(!mgr.remove_item(3));
}

#[test]
fn reorder_moves_rather_than_swaps() {
    let (mut mgr, _) = faq_manager(PlanType::Basic);
    mgr.add_item().unwrap();
    mgr.add_item().unwrap();
    for (i, q) in ["item0", "item1", "item2"].iter().enumerate() {
        fill_faq(&mut mgr, i, q, "a");
    }
    let keys: Vec<String> = (0..3).map(|i| mgr.list().render_key(i).unwrap()).collect();

    assert!(mgr.reorder(0, 2));
    assert_eq!(questions(&mgr), ["item1", "item2", "item0"]);
    assert_eq!(mgr.list().render_key(2).unwrap(), keys[0]);
    assert!(!mgr.reorder(0, 3));
    assert_eq!(mgr.len(), 3);
}

#[test]
fn live_drag_reorders_on_hover() {
    let (mut mgr, _) = faq_manager(PlanType::Basic);
    for _ in 0..3 {
        mgr.add_item().unwrap();
    }
    for (i, q) in ["a", "b", "c", "d"].iter().enumerate() {
        fill_faq(&mut mgr, i, q, "x");
    }
    mgr.drag_start(0);
    assert!(mgr.drag_over(1));
    assert_eq!(questions(&mgr), ["b", "a", "c", "d"]);
    assert!(!mgr.drag_over(1));
    assert!(mgr.drag_over(3));
    assert_eq!(questions(&mgr), ["b", "c", "d", "a"]);
    assert_eq!(mgr.dragging(), Some(3));
    mgr.drag_end();
    assert_eq!(mgr.dragging(), None);
    assert!(!mgr.drag_over(0));
}

#[test]
fn removing_a_record_ends_the_drag() {
    let (mut mgr, _) = faq_manager(PlanType::Basic);
    for _ in 0..2 {
        mgr.add_item().unwrap();
    }
    for (i, q) in ["a", "b", "c"].iter().enumerate() {
        fill_faq(&mut mgr, i, q, "x");
    }
    mgr.drag_start(2);
    assert!(mgr.remove_item(0));
    assert_eq!(mgr.dragging(), None);
    assert!(!mgr.drag_over(0));
    assert_eq!(questions(&mgr), ["b", "c"]);
}

#[test]
fn removing_a_nested_record_ends_the_drag() {
    let (api, _) = recording_api();
    let mut mgr: DocumentManager<ServicesDocument, Api> =
        DocumentManager::new(api, &site(PlanType::Basic));
    mgr.load().unwrap();
    let services = field!(ServicesDocument, services_arsenal.services);
    mgr.add_record(services).unwrap();
    mgr.add_record(services).unwrap();
    mgr.update_record(services, 2, |s| s.title = "last".into());

    mgr.drag_start(services, 2);
    assert!(mgr.remove_record(services, 0));
    assert!(!mgr.drag_over(services, 0));
    assert_eq!(mgr.doc().services_arsenal.services.get(1).unwrap().title, "last");
}

#[test]
fn added_record_is_scrolled_to_after_delay() {
    let (mut mgr, _) = faq_manager(PlanType::Basic);
    let index = mgr.add_item().unwrap();
    let key = mgr.list().render_key(index).unwrap();
    let later = Instant::now() + SCROLL_DELAY + Duration::from_millis(5);
    assert_eq!(mgr.take_scroll_target(later), Some(key));
    assert_eq!(mgr.take_scroll_target(later), None);
}

#[test]
fn submit_persists_only_complete_records() {
    let (mut mgr, store) = faq_manager(PlanType::Basic);
    fill_faq(&mut mgr, 0, "Q1", "A1");
    mgr.add_item().unwrap();

    mgr.submit().unwrap();
    assert_eq!(mgr.api().upsert_count(), 1);
    let (mode, values, files) = mgr.api().last_upsert();
    assert_eq!(mode, WriteMode::Create);
    assert!(files.is_empty());
    assert_eq!(values.as_array().unwrap().len(), 1);
    assert_eq!(values[0]["question"], "Q1");

    assert_eq!(mgr.len(), 1);
    let id = mgr.items()[0].id.clone();
    assert!(id.starts_with("faq-") && id.ends_with("-0"), "{}", id);
    assert!(mgr.status().is_success());
    assert!(mgr.exists().is_some());

    let stored = store
        .form_find(Shape::List, &RecordKey::new("faq", "acme"))
        .unwrap()
        .unwrap();
    assert_eq!(stored.values[0]["id"], id.as_str());

    // second submit replaces and keeps the assigned id
    fill_faq(&mut mgr, 0, "Q1 edited", "A1");
    mgr.submit().unwrap();
    let (mode, values, _) = mgr.api().last_upsert();
    assert_eq!(mode, WriteMode::Replace);
    assert_eq!(values[0]["id"], id.as_str());
}

#[test]
fn submit_with_nothing_complete_makes_no_call() {
    let (mut mgr, _) = faq_manager(PlanType::Basic);
    fill_faq(&mut mgr, 0, "Only a question", "");

    let err = mgr.submit().unwrap_err();
    assert_eq!(err, ManageError::Validation(NOTHING_TO_SAVE.to_string()));
    assert_eq!(mgr.api().upsert_count(), 0);
    assert_eq!(mgr.status().error(), Some(NOTHING_TO_SAVE));
    assert!(mgr.status().show_validation());
    assert!(mgr.highlight_incomplete(0));
    assert_eq!(mgr.items()[0].question, "Only a question");
}

#[test]
fn incomplete_stat_blocks_submit() {
    let (api, _) = recording_api();
    let mut mgr: ListManager<StatItem, Api> = ListManager::new(api, &site(PlanType::Basic));
    mgr.load().unwrap();
    mgr.update_item(0, |s| {
        s.label = "A".into();
        s.desc = String::new();
        s.icon = String::new();
    });
    assert!(matches!(mgr.submit(), Err(ManageError::Validation(_))));
    assert_eq!(mgr.api().upsert_count(), 0);
}

#[test]
fn submit_before_load_is_busy() {
    let (api, _) = recording_api();
    let mut mgr: ListManager<FaqItem, Api> = ListManager::new(api, &site(PlanType::Basic));
    assert_eq!(mgr.submit(), Err(ManageError::Busy));
}

#[test]
fn failed_submit_keeps_local_edits() {
    let (mut mgr, _) = faq_manager(PlanType::Basic);
    fill_faq(&mut mgr, 0, "Q", "A");
    mgr.add_item().unwrap();
    mgr.api().fail_writes.set(true);

    let err = mgr.submit().unwrap_err();
    assert_eq!(err.to_string(), "Error saving");
    assert_eq!(mgr.len(), 2);
    assert_eq!(mgr.items()[0].id, "");
    assert_eq!(mgr.status().error(), Some("Error saving"));
    assert!(mgr.exists().is_none());

    mgr.api().fail_writes.set(false);
    mgr.submit().unwrap();
    assert_eq!(mgr.status().error(), None);
}

#[test]
fn load_failure_falls_back_to_blank_form() {
    let (api, _) = recording_api();
    api.fail_reads.set(true);
    let mut mgr: ListManager<FaqItem, Api> = ListManager::new(api, &site(PlanType::Basic));
    let err = mgr.load().unwrap_err();
    assert_eq!(err, ManageError::Load("connection refused".into()));
    assert_eq!(mgr.len(), 1);
    assert_eq!(mgr.status().error(), Some("connection refused"));
    assert!(mgr.update_item(0, |i| i.question = "still editable".into()));
}

#[test]
fn load_reads_stored_collection() {
    let (api, store) = recording_api();
    store
        .form_upsert(
            Shape::List,
            &RecordKey::new("faq", "acme"),
            &json!([{"id": "faq-1", "question": "Q1", "answer": "A1"}, {"question": "Q2"}]),
        )
        .unwrap();
    let mut mgr: ListManager<FaqItem, Api> = ListManager::new(api, &site(PlanType::Basic));
    mgr.load().unwrap();
    assert_eq!(questions(&mgr), ["Q1", "Q2"]);
    assert_eq!(mgr.items()[1].answer, "");
    assert_eq!(mgr.list().render_key(0).unwrap(), "faq-1");
    assert_eq!(mgr.complete_count(), 1);
}

#[test]
fn search_returns_canonical_indices() {
    let (mut mgr, _) = faq_manager(PlanType::Basic);
    mgr.add_item().unwrap();
    mgr.add_item().unwrap();
    fill_faq(&mut mgr, 0, "Shipping times", "3 days");
    fill_faq(&mut mgr, 1, "Returns", "30 days");
    fill_faq(&mut mgr, 2, "Do you ship abroad?", "Yes");

    let hits = mgr.search("SHIP");
    assert_eq!(hits, vec![0, 2]);
    mgr.update_item(hits[1], |i| i.answer = "Worldwide".into());
    assert_eq!(mgr.items()[2].answer, "Worldwide");
    assert_eq!(mgr.items()[1].answer, "30 days");
    assert_eq!(mgr.search("days"), vec![0, 1]);
}

#[test]
fn completion_tracks_fields_and_records() {
    let (mut mgr, _) = faq_manager(PlanType::Basic);
    assert_eq!(mgr.completion(), Completion { completed: 0, total: 2 });
    mgr.update_item(0, |i| i.question = "Q".into());
    assert_eq!(mgr.completion(), Completion { completed: 1, total: 2 });
    mgr.update_item(0, |i| i.answer = "A".into());
    assert_eq!(mgr.completion(), Completion { completed: 2, total: 2 });
    mgr.add_item().unwrap();
    assert_eq!(mgr.completion(), Completion { completed: 2, total: 4 });
    assert_eq!(mgr.completion().percent(), 50);
}

#[test]
fn single_delete_of_saved_record_persists_at_once() {
    let (mut mgr, store) = faq_manager(PlanType::Basic);
    mgr.add_item().unwrap();
    mgr.add_item().unwrap();
    fill_faq(&mut mgr, 0, "Keep", "a");
    fill_faq(&mut mgr, 1, "Drop me", "b");
    fill_faq(&mut mgr, 2, "Keep too", "c");
    mgr.submit().unwrap();
    let before = mgr.api().upsert_count();
    mgr.add_item().unwrap();

    mgr.request_delete_single(1).unwrap();
    assert!(mgr.modal().is_open());
    assert_eq!(mgr.modal().title(), "Drop me");
    assert_eq!(mgr.modal().target(), Some(DeleteTarget::Single(1)));
    mgr.confirm_delete().unwrap();

    assert!(!mgr.modal().is_open());
    assert_eq!(mgr.api().upsert_count(), before + 1);
    let (mode, values, _) = mgr.api().last_upsert();
    assert_eq!(mode, WriteMode::Replace);
    // the trailing blank record is not sent
    assert_eq!(values.as_array().unwrap().len(), 2);
    assert_eq!(questions(&mgr), ["Keep", "Keep too", ""]);

    let stored = store
        .form_find(Shape::List, &RecordKey::new("faq", "acme"))
        .unwrap()
        .unwrap();
    assert_eq!(stored.values.as_array().unwrap().len(), 2);
}

#[test]
fn single_delete_of_unsaved_list_stays_local() {
    let (mut mgr, _) = faq_manager(PlanType::Basic);
    mgr.add_item().unwrap();
    fill_faq(&mut mgr, 0, "a", "a");
    mgr.request_delete_single(0).unwrap();
    mgr.confirm_delete().unwrap();
    assert_eq!(mgr.api().upsert_count(), 0);
    assert_eq!(mgr.len(), 1);
}

#[test]
fn failed_single_delete_keeps_the_record() {
    let (mut mgr, _) = faq_manager(PlanType::Basic);
    mgr.add_item().unwrap();
    fill_faq(&mut mgr, 0, "a", "a");
    fill_faq(&mut mgr, 1, "b", "b");
    mgr.submit().unwrap();
    mgr.api().fail_writes.set(true);

    mgr.request_delete_single(0).unwrap();
    assert!(mgr.confirm_delete().is_err());
    assert_eq!(questions(&mgr), ["a", "b"]);
    assert!(mgr.status().error().is_some());
}

#[test]
fn cancel_delete_changes_nothing() {
    let (mut mgr, _) = faq_manager(PlanType::Basic);
    fill_faq(&mut mgr, 0, "a", "a");
    mgr.request_delete_single(0).unwrap();
    mgr.cancel_delete();
    assert!(!mgr.modal().is_open());
    mgr.confirm_delete().unwrap();
    assert_eq!(questions(&mgr), ["a"]);
    assert_eq!(
        mgr.request_delete_single(4),
        Err(ManageError::IndexOutOfRange(4))
    );
}

#[test]
fn delete_all_removes_stored_record() {
    let (mut mgr, store) = faq_manager(PlanType::Basic);
    fill_faq(&mut mgr, 0, "a", "a");
    mgr.submit().unwrap();

    mgr.request_delete_all();
    assert_eq!(mgr.modal().target(), Some(DeleteTarget::All));
    mgr.confirm_delete().unwrap();
    assert_eq!(mgr.api().deletes.get(), 1);
    assert_eq!(mgr.len(), 1);
    assert_eq!(mgr.items()[0], FaqItem::blank(0));
    assert!(mgr.exists().is_none());
    assert!(store
        .form_find(Shape::List, &RecordKey::new("faq", "acme"))
        .unwrap()
        .is_none());
}

#[test]
fn odd_stored_highlight_survives_load_and_submit() {
    let (api, store) = recording_api();
    let key = RecordKey::new("highlights", "acme");
    store
        .form_upsert(
            Shape::List,
            &key,
            &json!([
                {"id": "h1", "textLists": ["first"], "video": "/uploads/a.mp4", "videoDuration": -4},
                {"id": "h2", "textLists": ["second"], "video": "/uploads/b.mp4", "videoDuration": 10}
            ]),
        )
        .unwrap();
    let mut mgr: ListManager<HighlightItem, Api> = ListManager::new(api, &site(PlanType::Basic));
    mgr.load().unwrap();
    assert_eq!(mgr.len(), 2);

    mgr.submit().unwrap();
    let stored = store.form_find(Shape::List, &key).unwrap().unwrap();
    let ids: Vec<&str> = stored
        .values
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["h1", "h2"]);
    assert_eq!(stored.values[0]["videoDuration"], -4);
}

#[test]
fn highlight_video_uploads_follow_filtered_positions() {
    let (api, store) = recording_api();
    let mut mgr: ListManager<HighlightItem, Api> = ListManager::new(api, &site(PlanType::Basic));
    mgr.load().unwrap();
    mgr.add_item().unwrap();
    mgr.update_item(1, |h| h.text_lists[0] = "Launch day".into());
    assert!(!mgr.is_item_complete(1));
    mgr.attach_file(1, mp4()).unwrap();
    assert!(mgr.is_item_complete(1));
    // the attachment follows its record
    mgr.reorder(1, 0);
    assert!(mgr.has_pending_upload(0));

    mgr.submit().unwrap();
    let (_, _, files) = mgr.api().last_upsert();
    assert_eq!(files, ["video0"]);
    assert_eq!(mgr.len(), 1);
    let video = &mgr.items()[0].video;
    assert!(video.starts_with("/uploads/") && video.ends_with("-launch.mp4"), "{}", video);
    assert!(!mgr.has_pending_upload(0));

    let stored = store
        .form_find(Shape::List, &RecordKey::new("highlights", "acme"))
        .unwrap()
        .unwrap();
    assert_eq!(stored.values[0]["video"], video.as_str());
    assert!(stored.values[0].get("image").is_none());
}

#[test]
fn news_image_lands_in_image_field() {
    let (api, _) = recording_api();
    let mut mgr: ListManager<NewsItem, Api> = ListManager::new(api, &site(PlanType::Basic));
    mgr.load().unwrap();
    mgr.update_item(0, |n| {
        n.title = "Featured".into();
        n.fallback = "Press".into();
    });
    mgr.attach_file(0, png()).unwrap();
    mgr.submit().unwrap();
    assert!(mgr.items()[0].image.ends_with("-cover-photo.png"));
    assert_eq!(mgr.api().last_upsert().2, ["file0"]);
}

#[test]
fn faq_takes_no_uploads() {
    let (mut mgr, _) = faq_manager(PlanType::Basic);
    assert!(matches!(mgr.attach_file(0, png()), Err(ManageError::Validation(_))));
}

#[test]
fn success_flag_clears_after_three_seconds() {
    let (mut mgr, _) = faq_manager(PlanType::Basic);
    fill_faq(&mut mgr, 0, "Q", "A");
    mgr.submit().unwrap();
    assert!(mgr.status().is_success());
    mgr.tick(Instant::now() + Duration::from_secs(4));
    assert!(!mgr.status().is_success());
}

// ═══════════════════════════════════════════════════════════
// Document manager
// ═══════════════════════════════════════════════════════════

fn hero_manager() -> (DocumentManager<HeroDocument, Api>, Arc<dyn Store>) {
    let (api, store) = recording_api();
    (DocumentManager::new(api, &site(PlanType::Basic)), store)
}

#[test]
fn partial_stored_document_is_merged_with_defaults() {
    let (mut mgr, store) = hero_manager();
    store
        .form_upsert(
            Shape::Document,
            &RecordKey::new("headline", "acme"),
            &json!({"hero": {"badge": "Launch", "primaryCta": null}}),
        )
        .unwrap();
    mgr.load().unwrap();
    assert!(mgr.exists().is_some());
    assert_eq!(mgr.doc().hero.badge, "Launch");
    assert_eq!(mgr.doc().hero.subheadline, "");
    assert_eq!(mgr.doc().hero.primary_cta.text, "");
}

#[test]
fn missing_document_loads_defaults() {
    let (mut mgr, _) = hero_manager();
    mgr.load().unwrap();
    assert!(mgr.exists().is_none());
    assert_eq!(mgr.doc(), &HeroDocument::default());
}

#[test]
fn field_update_and_save_round_trip() {
    let (mut mgr, store) = hero_manager();
    mgr.load().unwrap();
    mgr.update_field(field!(HeroDocument, hero.headline.text_normal), "Grow".to_string());
    mgr.update_field(field!(HeroDocument, hero.primary_cta.link), "/start".to_string());
    assert_eq!(mgr.doc().hero.headline.text_accent, "");
    assert_eq!(mgr.completion(), Completion { completed: 2, total: 9 });

    mgr.save().unwrap();
    assert!(mgr.status().is_success());
    assert_eq!(mgr.api().last_upsert().0, WriteMode::Create);
    let stored = store
        .form_find(Shape::Document, &RecordKey::new("headline", "acme"))
        .unwrap()
        .unwrap();
    assert_eq!(stored.values["hero"]["headline"]["textNormal"], "Grow");
    assert_eq!(stored.values["hero"]["primaryCta"]["link"], "/start");

    mgr.update(|d| d.hero.badge = "New".into());
    mgr.save().unwrap();
    assert_eq!(mgr.api().last_upsert().0, WriteMode::Replace);
}

#[test]
fn attachments_upload_before_the_document_is_saved() {
    let (api, _) = recording_api();
    let mut mgr: DocumentManager<ShowcaseDocument, Api> =
        DocumentManager::new(api, &site(PlanType::Basic));
    mgr.load().unwrap();
    mgr.attach(field!(ShowcaseDocument, showcase.video.src), mp4());
    mgr.attach(field!(ShowcaseDocument, showcase.background_image.src), png());
    mgr.attach(field!(ShowcaseDocument, showcase.background_image.src), png());
    assert_eq!(mgr.pending_attachments(), 2);

    mgr.save().unwrap();
    assert_eq!(mgr.api().uploads.get(), 2);
    assert!(mgr.doc().showcase.video.src.ends_with("-launch.mp4"));
    assert!(mgr.doc().showcase.background_image.src.starts_with("/uploads/"));
    assert_eq!(mgr.pending_attachments(), 0);
    let (_, values, _) = mgr.api().last_upsert();
    assert_eq!(values["showcase"]["video"]["src"], mgr.doc().showcase.video.src.as_str());
}

#[test]
fn failed_document_save_leaves_everything_pending() {
    let (api, _) = recording_api();
    let mut mgr: DocumentManager<ShowcaseDocument, Api> =
        DocumentManager::new(api, &site(PlanType::Basic));
    mgr.load().unwrap();
    mgr.update(|d| d.showcase.content.badge = "Reel".into());
    mgr.attach(field!(ShowcaseDocument, showcase.video.src), mp4());
    mgr.api().fail_writes.set(true);

    assert!(mgr.save().is_err());
    assert_eq!(mgr.doc().showcase.content.badge, "Reel");
    assert_eq!(mgr.doc().showcase.video.src, "");
    assert_eq!(mgr.pending_attachments(), 1);
    assert_eq!(mgr.status().error(), Some("Error uploading"));
    assert_eq!(mgr.api().upsert_count(), 0);
    assert!(mgr.exists().is_none());
}

#[test]
fn document_delete_all_resets_to_defaults() {
    let (mut mgr, store) = hero_manager();
    mgr.load().unwrap();
    mgr.update(|d| d.hero.badge = "X".into());
    mgr.save().unwrap();

    mgr.request_delete_all();
    assert!(mgr.modal().is_open());
    mgr.confirm_delete().unwrap();
    assert_eq!(mgr.doc(), &HeroDocument::default());
    assert!(mgr.exists().is_none());
    assert!(store
        .form_find(Shape::Document, &RecordKey::new("headline", "acme"))
        .unwrap()
        .is_none());
}

#[test]
fn services_stay_numbered_through_nested_edits() {
    let (api, _) = recording_api();
    let mut mgr: DocumentManager<ServicesDocument, Api> =
        DocumentManager::new(api, &site(PlanType::Basic));
    mgr.load().unwrap();
    let services = field!(ServicesDocument, services_arsenal.services);
    let ids = |m: &DocumentManager<ServicesDocument, Api>| -> Vec<String> {
        m.doc()
            .services_arsenal
            .services
            .iter()
            .map(|s| s.id.clone())
            .collect()
    };

    for _ in 0..5 {
        mgr.add_record(services).unwrap();
    }
    assert_eq!(mgr.record_limit::<crate::pages::ServiceItem>(), 6);
    assert!(mgr.is_record_limit_reached(services));
    assert!(matches!(
        mgr.add_record(services),
        Err(ManageError::LimitReached { limit: 6, .. })
    ));
    assert_eq!(ids(&mgr), ["01", "02", "03", "04", "05", "06"]);

    mgr.update_record(services, 5, |s| s.title = "Last".into());
    assert!(mgr.remove_record(services, 1));
    assert_eq!(ids(&mgr), ["01", "02", "03", "04", "05"]);
    assert!(mgr.reorder_records(services, 4, 0));
    assert_eq!(mgr.doc().services_arsenal.services.get(0).unwrap().title, "Last");
    assert_eq!(ids(&mgr), ["01", "02", "03", "04", "05"]);

    mgr.drag_start(services, 0);
    assert!(mgr.drag_over(services, 2));
    mgr.drag_end();
    assert_eq!(mgr.doc().services_arsenal.services.get(2).unwrap().title, "Last");
    assert_eq!(ids(&mgr), ["01", "02", "03", "04", "05"]);
}

#[test]
fn document_save_is_refused_while_loading() {
    let (mut mgr, _) = hero_manager();
    assert_eq!(mgr.save(), Err(ManageError::Busy));
    assert_eq!(mgr.api().upsert_count(), 0);
}

// ═══════════════════════════════════════════════════════════
// HTTP routes
// ═══════════════════════════════════════════════════════════

const BOUNDARY: &str = "formdesk-test-boundary";

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a str, &'a [u8]),
}

fn multipart(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, content_type, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn multipart_header() -> Header<'static> {
    Header::new(
        "Content-Type",
        format!("multipart/form-data; boundary={}", BOUNDARY),
    )
}

fn test_client() -> (Client, Arc<dyn Store>) {
    let store = test_store();
    let config = AppConfig {
        upload_dir: temp_upload_dir().to_string_lossy().into_owned(),
        ..AppConfig::default()
    };
    let figment = rocket::figment::Figment::from(rocket::Config::debug_default())
        .merge(("log_level", "off"));
    let rocket = crate::build(figment, &config, store.clone());
    (Client::tracked(rocket).expect("valid rocket"), store)
}

fn json_body(resp: rocket::local::blocking::LocalResponse<'_>) -> Value {
    resp.into_json::<Value>().expect("json body")
}

#[test]
fn route_get_missing_is_null() {
    let (client, _) = test_client();
    let resp = client.get("/api/acme/form/faq").dispatch();
    assert_eq!(resp.status(), Status::Ok);
    assert_eq!(
        resp.headers().get_one("Cache-Control"),
        Some("no-store, no-cache, must-revalidate, max-age=0")
    );
    assert_eq!(json_body(resp), Value::Null);
}

#[test]
fn route_list_lifecycle() {
    let (client, _) = test_client();
    let values = json!([{"question": "Q1", "answer": "A1"}]).to_string();
    let resp = client
        .post("/api/acme/form/faq")
        .header(multipart_header())
        .body(multipart(&[Part::Text("values", &values), Part::Text("id", "ignored")]))
        .dispatch();
    assert_eq!(resp.status(), Status::Ok);
    let created = json_body(resp);
    assert_eq!(created["type"], "faq");
    assert_eq!(created["subtype"], "acme");
    assert_eq!(created["values"][0]["question"], "Q1");

    let values = json!([{"question": "Q2", "answer": "A2"}]).to_string();
    let resp = client
        .put("/api/acme/form/faq")
        .header(multipart_header())
        .body(multipart(&[Part::Text("values", &values)]))
        .dispatch();
    let updated = json_body(resp);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["values"][0]["question"], "Q2");

    let fetched = json_body(client.get("/api/acme/form/faq").dispatch());
    assert_eq!(fetched["values"], updated["values"]);
    // the document family is a separate namespace
    assert_eq!(json_body(client.get("/api/acme/json/faq").dispatch()), Value::Null);

    let resp = client.delete("/api/acme/form/faq").dispatch();
    assert_eq!(resp.status(), Status::Ok);
    assert_eq!(json_body(resp), json!({"success": true}));

    let resp = client.delete("/api/acme/form/faq").dispatch();
    assert_eq!(resp.status(), Status::NotFound);
    assert!(json_body(resp)["error"].is_string());
}

#[test]
fn route_highlights_upload_writes_video_url() {
    let (client, _) = test_client();
    let values = json!([{"textLists": ["Clip"], "video": ""}]).to_string();
    let resp = client
        .post("/api/acme/form/highlights")
        .header(multipart_header())
        .body(multipart(&[
            Part::Text("values", &values),
            Part::File("video0", "Reel Final.mp4", "video/mp4", b"\x00\x00\x00\x18ftyp"),
        ]))
        .dispatch();
    assert_eq!(resp.status(), Status::Ok);
    let record = json_body(resp);
    let url = record["values"][0]["video"].as_str().unwrap().to_string();
    assert!(url.starts_with("/uploads/") && url.ends_with("-reel-final.mp4"), "{}", url);
    assert!(record["values"][0].get("image").is_none());

    let served = client.get(url.as_str()).dispatch();
    assert_eq!(served.status(), Status::Ok);
}

#[test]
fn route_other_types_write_image_url() {
    let (client, _) = test_client();
    let values = json!([{"title": "A"}, {"title": "B"}]).to_string();
    let record = json_body(
        client
            .post("/api/acme/form/sectors")
            .header(multipart_header())
            .body(multipart(&[
                Part::Text("values", &values),
                Part::File("file1", "b.png", "image/png", b"png"),
            ]))
            .dispatch(),
    );
    assert!(record["values"][0].get("image").is_none());
    assert!(record["values"][1]["image"].as_str().unwrap().ends_with("-b.png"));
}

#[test]
fn route_rejects_invalid_values() {
    let (client, _) = test_client();
    let resp = client
        .post("/api/acme/form/faq")
        .header(multipart_header())
        .body(multipart(&[Part::Text("values", "{not json")]))
        .dispatch();
    assert_eq!(resp.status(), Status::BadRequest);
    assert!(json_body(resp)["error"].as_str().unwrap().contains("values"));
}

#[test]
fn route_values_are_coerced_to_shape() {
    let (client, _) = test_client();
    let list = json_body(
        client
            .post("/api/acme/form/faq")
            .header(multipart_header())
            .body(multipart(&[Part::Text("values", r#"{"question":"Q"}"#)]))
            .dispatch(),
    );
    assert_eq!(list["values"], json!([]));

    let doc = json_body(
        client
            .post("/api/acme/json/headline")
            .header(multipart_header())
            .body(multipart(&[Part::Text("values", "[1,2]")]))
            .dispatch(),
    );
    assert_eq!(doc["values"], json!({}));
}

#[test]
fn route_document_round_trip_and_sections() {
    let (client, _) = test_client();
    let values = json!({"hero": {"badge": "Launch"}}).to_string();
    let resp = client
        .post("/api/acme/json/headline")
        .header(multipart_header())
        .body(multipart(&[Part::Text("values", &values)]))
        .dispatch();
    assert_eq!(resp.status(), Status::Ok);

    let fetched = json_body(client.get("/api/acme/json/headline").dispatch());
    let doc = <HeroDocument as crate::manage::Document>::from_stored(&fetched["values"]).unwrap();
    assert_eq!(doc.hero.badge, "Launch");

    let sections = json_body(client.get("/api/acme/sections").dispatch());
    assert_eq!(sections.as_array().unwrap().len(), 1);
    assert_eq!(sections[0]["type"], "headline");
    assert_eq!(sections[0]["shape"], "document");
    assert_eq!(json_body(client.get("/api/other/sections").dispatch()), json!([]));
}

#[test]
fn route_upload_side_channel() {
    let (client, _) = test_client();
    let resp = client
        .post("/api/upload")
        .header(multipart_header())
        .body(multipart(&[Part::File("file", "logo.svg", "image/svg+xml", b"<svg/>")]))
        .dispatch();
    assert_eq!(resp.status(), Status::Ok);
    let url = json_body(resp)["url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/uploads/") && url.ends_with("-logo.svg"));
}

#[test]
fn route_unknown_path_is_json_404() {
    let (client, _) = test_client();
    let resp = client.get("/api/acme/nope/faq").dispatch();
    assert_eq!(resp.status(), Status::NotFound);
    assert_eq!(json_body(resp), json!({"error": "Not found"}));
}

// ═══════════════════════════════════════════════════════════
// HTTP client against a live server
// ═══════════════════════════════════════════════════════════

/// Launch the service on a free local port. The returned handle stops it.
fn spawn_server() -> (String, rocket::Shutdown) {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|a| a.port())
        .expect("free port");
    let config = AppConfig {
        upload_dir: temp_upload_dir().to_string_lossy().into_owned(),
        ..AppConfig::default()
    };
    let figment = rocket::figment::Figment::from(rocket::Config::debug_default())
        .merge(("address", "127.0.0.1"))
        .merge(("port", port))
        .merge(("log_level", "off"));
    let rocket = crate::build(figment, &config, test_store());

    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        rocket::execute(async move {
            let ignited = rocket.ignite().await.expect("ignite");
            let _ = tx.send(ignited.shutdown());
            let _ = ignited.launch().await;
        })
    });
    let shutdown = rx.recv().expect("server ignited");

    let addr = format!("127.0.0.1:{}", port);
    for _ in 0..250 {
        if std::net::TcpStream::connect(&addr).is_ok() {
            break;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    (format!("http://{}", addr), shutdown)
}

#[test]
fn http_api_round_trips_through_the_routes() {
    use crate::manage::http::HttpApi;
    use crate::manage::UploadSlot;

    let (base, shutdown) = spawn_server();
    let api = HttpApi::new(&base).unwrap();
    let key = RecordKey::new("highlights", "acme");

    assert_eq!(api.fetch(Shape::List, &key).unwrap(), None);

    let files = [FileField {
        index: 0,
        slot: UploadSlot::Video,
        file: mp4(),
    }];
    let created = api
        .upsert(
            Shape::List,
            &key,
            &json!([{"textLists": ["Clip"], "video": ""}]),
            &files,
            WriteMode::Create,
        )
        .unwrap();
    let video = created.values[0]["video"].as_str().unwrap();
    assert!(video.starts_with("/uploads/") && video.ends_with("-launch.mp4"), "{}", video);

    let fetched = api.fetch(Shape::List, &key).unwrap().unwrap();
    assert_eq!(fetched.id, created.id);

    let replaced = api
        .upsert(
            Shape::List,
            &key,
            &json!([{"textLists": ["Other"]}]),
            &[],
            WriteMode::Replace,
        )
        .unwrap();
    assert_eq!(replaced.id, created.id);
    assert_eq!(replaced.values[0]["textLists"][0], "Other");

    let url = api.upload(&png()).unwrap();
    assert!(url.starts_with("/uploads/") && url.ends_with("-cover-photo.png"), "{}", url);

    api.delete(Shape::List, &key).unwrap();
    let err = api.delete(Shape::List, &key).unwrap_err();
    assert_eq!(err.status, Some(404));
    assert_eq!(err.message, "Record not found");

    shutdown.notify();
}

#[test]
fn list_manager_runs_over_http() {
    use crate::manage::http::HttpApi;

    let (base, shutdown) = spawn_server();
    let mut mgr: ListManager<FaqItem, HttpApi> =
        ListManager::new(HttpApi::new(&base).unwrap(), &site(PlanType::Basic));
    mgr.load().unwrap();
    assert!(mgr.exists().is_none());

    mgr.update_item(0, |i| {
        i.question = "Over the wire?".into();
        i.answer = "Yes".into();
    });
    mgr.submit().unwrap();
    assert!(mgr.exists().is_some());
    assert!(mgr.items()[0].id.starts_with("faq-"));

    let mut reloaded: ListManager<FaqItem, HttpApi> =
        ListManager::new(HttpApi::new(&base).unwrap(), &site(PlanType::Basic));
    reloaded.load().unwrap();
    assert_eq!(reloaded.items()[0].question, "Over the wire?");

    reloaded.request_delete_all();
    reloaded.confirm_delete().unwrap();
    // the first manager's copy is already gone; a 404 counts as deleted
    mgr.request_delete_all();
    mgr.confirm_delete().unwrap();
    assert!(mgr.exists().is_none());

    shutdown.notify();
}
